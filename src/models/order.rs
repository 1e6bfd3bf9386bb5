// src/models/order.rs
// DOCUMENTATION: Order data structures and status enums
// PURPOSE: Checkout payload validation and the order record exposed to the admin

use crate::errors::StoreError;
use crate::models::input::{
    coerce_text, non_empty, parse_amount, parse_integer, round_money, sanitize_text,
};
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// Fulfilment status of an order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Processing,
    Completed,
    Cancelled,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 4] = [
        OrderStatus::Pending,
        OrderStatus::Processing,
        OrderStatus::Completed,
        OrderStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Processing => "processing",
            OrderStatus::Completed => "completed",
            OrderStatus::Cancelled => "cancelled",
        }
    }
}

impl FromStr for OrderStatus {
    type Err = StoreError;

    /// Case-insensitive, surrounding whitespace ignored
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == normalized)
            .ok_or_else(|| StoreError::InvalidInput("Invalid order status value.".to_string()))
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Payment status of an order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Paid,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Paid => "paid",
        }
    }
}

impl FromStr for PaymentStatus {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Ok(PaymentStatus::Pending),
            "paid" => Ok(PaymentStatus::Paid),
            _ => Err(StoreError::InvalidInput(
                "Invalid payment status value.".to_string(),
            )),
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A cart line read back from the stored cart snapshot.
/// Numbers may arrive as strings; unknown keys (image, category, ...) are kept.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_amount")]
    pub price: f64,
    #[serde(default, deserialize_with = "lenient_quantity")]
    pub quantity: u32,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn lenient_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(coerce_text(value.as_ref()).unwrap_or_default())
}

fn lenient_amount<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(parse_amount(value.as_ref()).unwrap_or(0.0))
}

fn lenient_quantity<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(parse_integer(value.as_ref())
        .and_then(|q| u32::try_from(q).ok())
        .unwrap_or(0))
}

/// Complete order record
/// DOCUMENTATION: Maps to the orders table; returned by admin endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: i64,
    pub order_number: String,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,
    pub customer_address: String,
    pub customer_city: String,
    pub customer_postal: String,
    pub customer_country: String,
    pub items: Vec<OrderItem>,
    pub shipping_method: String,
    pub shipping_cost: f64,
    pub payment_method: String,
    pub payment_status: PaymentStatus,
    pub subtotal: f64,
    pub total: f64,
    pub status: OrderStatus,
    pub order_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Checkout form values arrive as strings or numbers (postal codes, phones)
#[derive(Debug, Default, Deserialize)]
pub struct CustomerInput {
    pub name: Option<Value>,
    pub email: Option<Value>,
    pub phone: Option<Value>,
    pub address: Option<Value>,
    pub city: Option<Value>,
    pub postal: Option<Value>,
    pub country: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ShippingInput {
    pub method: Option<Value>,
    pub cost: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PaymentInput {
    pub method: Option<Value>,
}

/// Request DTO for POST /api/orders (checkout)
/// DOCUMENTATION: Any JSON object parses; missing or mistyped parts are reported
/// as incomplete data by `into_new_order`
#[derive(Debug, Default, Deserialize)]
pub struct CreateOrderRequest {
    pub customer: Option<Value>,
    pub items: Option<Value>,
    pub shipping: Option<Value>,
    pub payment: Option<Value>,
    pub subtotal: Option<Value>,
    pub total: Option<Value>,
}

/// Read a nested block; anything that is not an object counts as empty
fn block<T: DeserializeOwned + Default>(value: Option<Value>) -> T {
    match value {
        Some(value @ Value::Object(_)) => serde_json::from_value(value).unwrap_or_default(),
        _ => T::default(),
    }
}

/// Validated checkout data, ready to be inserted
#[derive(Debug, Clone, PartialEq)]
pub struct NewOrder {
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,
    pub customer_address: String,
    pub customer_city: String,
    pub customer_postal: String,
    pub customer_country: String,
    /// Cart lines exactly as submitted
    pub items: Vec<Value>,
    pub shipping_method: String,
    pub shipping_cost: f64,
    pub payment_method: String,
    pub subtotal: f64,
    pub total: f64,
}

impl CreateOrderRequest {
    /// Validate and sanitize the checkout payload
    pub fn into_new_order(self) -> Result<NewOrder, StoreError> {
        let incomplete =
            || StoreError::InvalidInput("Unable to create order. Data is incomplete.".to_string());

        let customer: CustomerInput = block(self.customer);
        let shipping: ShippingInput = block(self.shipping);
        let payment: PaymentInput = block(self.payment);

        let (name, email, phone, address, city, postal, country) = match (
            coerce_text(customer.name.as_ref()),
            coerce_text(customer.email.as_ref()),
            coerce_text(customer.phone.as_ref()),
            coerce_text(customer.address.as_ref()),
            coerce_text(customer.city.as_ref()),
            coerce_text(customer.postal.as_ref()),
            coerce_text(customer.country.as_ref()),
        ) {
            (Some(a), Some(b), Some(c), Some(d), Some(e), Some(f), Some(g)) => {
                (a, b, c, d, e, f, g)
            }
            _ => return Err(incomplete()),
        };

        let shipping_method = coerce_text(shipping.method.as_ref()).ok_or_else(incomplete)?;
        let payment_method = coerce_text(payment.method.as_ref()).ok_or_else(incomplete)?;
        let items = match self.items {
            Some(Value::Array(items))
                if !items.is_empty() && items.iter().all(Value::is_object) =>
            {
                items
            }
            _ => return Err(incomplete()),
        };

        if !validator::validate_email(email.as_str()) {
            return Err(StoreError::ValidationError("Invalid email format.".to_string()));
        }

        let amounts = (
            parse_amount(self.subtotal.as_ref()),
            parse_amount(self.total.as_ref()),
            parse_amount(shipping.cost.as_ref()),
        );
        let (subtotal, total, shipping_cost) = match amounts {
            (Some(s), Some(t), Some(c)) if s >= 0.0 && t >= 0.0 && c >= 0.0 => (s, t, c),
            _ => return Err(StoreError::InvalidInput("Invalid numeric values.".to_string())),
        };

        Ok(NewOrder {
            customer_name: sanitize_text(&name),
            customer_email: email,
            customer_phone: sanitize_text(&phone),
            customer_address: sanitize_text(&address),
            customer_city: sanitize_text(&city),
            customer_postal: sanitize_text(&postal),
            customer_country: sanitize_text(&country),
            shipping_method: sanitize_text(&shipping_method),
            shipping_cost: round_money(shipping_cost),
            payment_method: sanitize_text(&payment_method),
            subtotal: round_money(subtotal),
            total: round_money(total),
            items,
        })
    }
}

/// Response for a successful checkout
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderResponse {
    pub success: bool,
    pub message: String,
    pub order_number: String,
    pub order_id: i64,
}

/// Request DTO for POST /api/orders/{id}
#[derive(Debug, Default, Deserialize)]
pub struct OrderActionRequest {
    pub action: Option<String>,
    pub email: Option<String>,
}

/// Outcome of a payment confirmation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentConfirmation {
    Confirmed,
    AlreadyPaid,
}

/// Query string for order listings
#[derive(Debug, Default, Deserialize)]
pub struct OrderListQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
    pub status: Option<String>,
    pub search: Option<String>,
}

/// Normalized listing filter
#[derive(Debug, Clone, PartialEq)]
pub struct OrderFilter {
    pub limit: i64,
    pub offset: i64,
    pub status: Option<OrderStatus>,
    pub search: Option<String>,
}

impl OrderListQuery {
    pub const DEFAULT_LIMIT: i64 = 50;
    pub const MAX_LIMIT: i64 = 200;

    pub fn into_filter(self) -> Result<OrderFilter, StoreError> {
        let status = match non_empty(&self.status) {
            Some(s) => Some(s.parse::<OrderStatus>()?),
            None => None,
        };

        Ok(OrderFilter {
            limit: self
                .limit
                .unwrap_or(Self::DEFAULT_LIMIT)
                .clamp(1, Self::MAX_LIMIT),
            offset: self.offset.unwrap_or(0).max(0),
            status,
            search: non_empty(&self.search).map(str::to_string),
        })
    }
}

/// Admin order listing response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderListResponse {
    pub orders: Vec<Order>,
    pub total_count: i64,
    pub limit: i64,
    pub offset: i64,
}

/// Request DTO for POST /api/admin/orders/update
#[derive(Debug, Default, Deserialize)]
pub struct UpdateOrderStatusRequest {
    pub id: Option<Value>,
    pub status: Option<String>,
    pub payment_status: Option<String>,
}

/// Validated status change
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrderStatusUpdate {
    pub id: i64,
    pub status: OrderStatus,
    pub payment_status: Option<PaymentStatus>,
}

impl UpdateOrderStatusRequest {
    pub fn into_update(self) -> Result<OrderStatusUpdate, StoreError> {
        let incomplete = || {
            StoreError::InvalidInput(
                "Unable to update order status. Data is incomplete.".to_string(),
            )
        };

        let id = parse_integer(self.id.as_ref())
            .filter(|id| *id > 0)
            .ok_or_else(incomplete)?;
        let status = non_empty(&self.status).ok_or_else(incomplete)?.parse()?;
        let payment_status = match non_empty(&self.payment_status) {
            Some(p) => Some(p.parse()?),
            None => None,
        };

        Ok(OrderStatusUpdate {
            id,
            status,
            payment_status,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn checkout_payload() -> Value {
        json!({
            "customer": {
                "name": "  Somchai <Jaidee> ",
                "email": "somchai@example.com",
                "phone": "081-234-5678",
                "address": "99 Sukhumvit Rd",
                "city": "Bangkok",
                "postal": "10110",
                "country": "Thailand"
            },
            "items": [
                {"id": 3, "name": "Black Bow", "price": 150.0, "quantity": 2, "image": "img/bow.jpg"}
            ],
            "shipping": {"method": "ems", "cost": "50"},
            "payment": {"method": "promptpay"},
            "subtotal": 300,
            "total": "350.00"
        })
    }

    fn parse(payload: Value) -> Result<NewOrder, StoreError> {
        serde_json::from_value::<CreateOrderRequest>(payload)
            .unwrap()
            .into_new_order()
    }

    #[test]
    fn test_valid_checkout_is_sanitized() {
        let order = parse(checkout_payload()).unwrap();
        assert_eq!(order.customer_name, "Somchai &lt;Jaidee&gt;");
        assert_eq!(order.shipping_cost, 50.0);
        assert_eq!(order.total, 350.0);
        assert_eq!(order.items.len(), 1);
        assert_eq!(order.items[0]["quantity"], 2);
        assert_eq!(order.items[0]["image"], "img/bow.jpg");
    }

    #[test]
    fn test_missing_customer_field_is_incomplete() {
        let mut payload = checkout_payload();
        payload["customer"]["postal"] = json!("   ");
        let err = parse(payload).unwrap_err();
        assert!(err.to_string().contains("Data is incomplete"));
    }

    #[test]
    fn test_empty_cart_is_incomplete() {
        let mut payload = checkout_payload();
        payload["items"] = json!([]);
        assert!(matches!(parse(payload), Err(StoreError::InvalidInput(_))));
    }

    #[test]
    fn test_null_blocks_are_incomplete() {
        let payload = json!({"customer": null, "items": null, "shipping": "ems"});
        let err = parse(payload).unwrap_err();
        assert_eq!(err.to_string(), "Unable to create order. Data is incomplete.");

        let mut payload = checkout_payload();
        payload["items"] = json!(["Black Bow"]);
        assert!(parse(payload).unwrap_err().to_string().contains("Data is incomplete"));
    }

    #[test]
    fn test_numeric_form_values_accepted() {
        let mut payload = checkout_payload();
        payload["customer"]["postal"] = json!(10110);
        payload["customer"]["phone"] = json!(812345678);
        payload["items"][0]["price"] = json!("150");
        payload["items"][0]["quantity"] = json!("2");

        let order = parse(payload).unwrap();
        assert_eq!(order.customer_postal, "10110");
        assert_eq!(order.customer_phone, "812345678");
        // the cart snapshot is stored untouched
        assert_eq!(order.items[0]["price"], "150");
    }

    #[test]
    fn test_order_item_reads_string_numbers() {
        let item: OrderItem =
            serde_json::from_value(json!({"name": "Bow", "price": "150.5", "quantity": "2"}))
                .unwrap();
        assert_eq!(item.price, 150.5);
        assert_eq!(item.quantity, 2);

        let item: OrderItem = serde_json::from_value(json!({"price": null, "quantity": -1})).unwrap();
        assert_eq!(item.name, "");
        assert_eq!(item.price, 0.0);
        assert_eq!(item.quantity, 0);
    }

    #[test]
    fn test_invalid_email_rejected() {
        let mut payload = checkout_payload();
        payload["customer"]["email"] = json!("not-an-email");
        assert!(matches!(parse(payload), Err(StoreError::ValidationError(_))));
    }

    #[test]
    fn test_non_numeric_total_rejected() {
        let mut payload = checkout_payload();
        payload["total"] = json!("free");
        let err = parse(payload).unwrap_err();
        assert_eq!(err.to_string(), "Invalid numeric values.");
    }

    #[test]
    fn test_negative_amount_rejected() {
        let mut payload = checkout_payload();
        payload["shipping"]["cost"] = json!(-1);
        assert!(parse(payload).is_err());
    }

    #[test]
    fn test_order_item_round_trips_unknown_keys() {
        let raw = json!({"id": "7", "name": "Bow", "price": 10.5, "quantity": 1, "color": "black"});
        let item: OrderItem = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(serde_json::to_value(&item).unwrap(), raw);
    }

    #[test]
    fn test_order_status_parsing() {
        assert_eq!(" Completed ".parse::<OrderStatus>().unwrap(), OrderStatus::Completed);
        assert_eq!("CANCELLED".parse::<OrderStatus>().unwrap(), OrderStatus::Cancelled);
        assert!("shipped".parse::<OrderStatus>().is_err());
        assert_eq!("paid".parse::<PaymentStatus>().unwrap(), PaymentStatus::Paid);
        assert!("refunded".parse::<PaymentStatus>().is_err());
    }

    #[test]
    fn test_list_query_clamps_and_validates() {
        let filter = OrderListQuery {
            limit: Some(10_000),
            offset: Some(-5),
            status: Some("".to_string()),
            search: Some("  ORD2024 ".to_string()),
        }
        .into_filter()
        .unwrap();
        assert_eq!(filter.limit, OrderListQuery::MAX_LIMIT);
        assert_eq!(filter.offset, 0);
        assert_eq!(filter.status, None);
        assert_eq!(filter.search.as_deref(), Some("ORD2024"));

        let bad = OrderListQuery {
            status: Some("lost".to_string()),
            ..Default::default()
        };
        assert!(bad.into_filter().is_err());
    }

    #[test]
    fn test_status_update_request() {
        let update: UpdateOrderStatusRequest =
            serde_json::from_value(json!({"id": "12", "status": " Processing "})).unwrap();
        let update = update.into_update().unwrap();
        assert_eq!(update.id, 12);
        assert_eq!(update.status, OrderStatus::Processing);
        assert_eq!(update.payment_status, None);

        let missing: UpdateOrderStatusRequest =
            serde_json::from_value(json!({"status": "pending"})).unwrap();
        assert!(missing.into_update().is_err());

        let invalid: UpdateOrderStatusRequest =
            serde_json::from_value(json!({"id": 1, "status": "shipped"})).unwrap();
        assert_eq!(
            invalid.into_update().unwrap_err().to_string(),
            "Invalid order status value."
        );
    }
}
