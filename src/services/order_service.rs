// src/services/order_service.rs
// DOCUMENTATION: Business logic for orders
// PURPOSE: Checkout, payment confirmation and admin order management

use crate::db::OrderRepository;
use crate::errors::StoreError;
use crate::models::{
    CreateOrderRequest, CreateOrderResponse, Order, OrderActionRequest, OrderListQuery,
    OrderListResponse, PaymentConfirmation, PaymentStatus, UpdateOrderStatusRequest,
};
use crate::services::Notifier;
use chrono::Utc;
use rand::Rng;
use sqlx::PgPool;

/// Order numbers are random within a day, so a clash is retried a few times
const ORDER_NUMBER_ATTEMPTS: usize = 5;

const CONFIRM_PAYMENT_ACTION: &str = "confirm_payment";

pub struct OrderService;

impl OrderService {
    /// Validate the checkout payload, persist it and notify the shop
    pub async fn create_order(
        pool: &PgPool,
        notifier: &Notifier,
        req: CreateOrderRequest,
    ) -> Result<CreateOrderResponse, StoreError> {
        let new_order = req.into_new_order()?;

        for _ in 0..ORDER_NUMBER_ATTEMPTS {
            let order_number = generate_order_number();

            let created = OrderRepository::create(pool, &order_number, &new_order)
                .await
                .map_err(|_| StoreError::ServiceUnavailable("Unable to create order.".to_string()))?;

            let Some(order_id) = created else {
                log::warn!("Order number {} already taken, retrying", order_number);
                continue;
            };

            match OrderRepository::get_by_id(pool, order_id).await {
                Ok(order) => notifier.spawn_new_order(order),
                Err(e) => log::error!("Order {} created but could not be reloaded: {}", order_id, e),
            }

            return Ok(CreateOrderResponse {
                success: true,
                message: "Order was created.".to_string(),
                order_number,
                order_id,
            });
        }

        log::error!("Could not allocate a unique order number");
        Err(StoreError::ServiceUnavailable("Unable to create order.".to_string()))
    }

    pub async fn get_order(pool: &PgPool, id: i64) -> Result<Order, StoreError> {
        OrderRepository::get_by_id(pool, id).await
    }

    /// Plain listing (limit/offset/status)
    pub async fn list_orders(pool: &PgPool, query: OrderListQuery) -> Result<Vec<Order>, StoreError> {
        let filter = query.into_filter()?;
        OrderRepository::list(pool, &filter).await
    }

    /// Admin listing with search and total count
    pub async fn search_orders(
        pool: &PgPool,
        query: OrderListQuery,
    ) -> Result<OrderListResponse, StoreError> {
        let filter = query.into_filter()?;
        let (orders, total_count) = OrderRepository::search(pool, &filter).await?;

        Ok(OrderListResponse {
            orders,
            total_count,
            limit: filter.limit,
            offset: filter.offset,
        })
    }

    /// Customer-side payment confirmation
    /// DOCUMENTATION: The customer proves ownership with the email used at checkout
    pub async fn confirm_payment(
        pool: &PgPool,
        notifier: &Notifier,
        id: i64,
        req: OrderActionRequest,
    ) -> Result<PaymentConfirmation, StoreError> {
        let order = OrderRepository::get_by_id(pool, id).await?;

        if verify_confirmation(&order, &req)? == PaymentConfirmation::AlreadyPaid {
            return Ok(PaymentConfirmation::AlreadyPaid);
        }

        if !OrderRepository::confirm_payment(pool, id).await? {
            // a concurrent request got there first
            return Ok(PaymentConfirmation::AlreadyPaid);
        }

        log::info!("Payment confirmed for order {}", order.order_number);
        match OrderRepository::get_by_id(pool, id).await {
            Ok(updated) => notifier.spawn_payment_confirmed(updated),
            Err(e) => log::error!("Order {} paid but could not be reloaded: {}", id, e),
        }

        Ok(PaymentConfirmation::Confirmed)
    }

    pub async fn update_status(
        pool: &PgPool,
        req: UpdateOrderStatusRequest,
    ) -> Result<(), StoreError> {
        let update = req.into_update()?;
        OrderRepository::update_status(pool, &update).await
    }

    pub async fn delete_order(pool: &PgPool, id: i64) -> Result<(), StoreError> {
        OrderRepository::delete(pool, id).await
    }
}

/// Checks a customer's confirmation against the stored order: action first, then email.
/// `AlreadyPaid` means nothing is left to update.
pub fn verify_confirmation(
    order: &Order,
    req: &OrderActionRequest,
) -> Result<PaymentConfirmation, StoreError> {
    if req.action.as_deref().map(str::trim) != Some(CONFIRM_PAYMENT_ACTION) {
        log::warn!("Rejected action {:?} on order {}", req.action, order.id);
        return Err(StoreError::Forbidden("Action not permitted.".to_string()));
    }

    let email = req.email.as_deref().map(str::trim).unwrap_or_default();
    if !validator::validate_email(email) || !email.eq_ignore_ascii_case(&order.customer_email) {
        log::warn!("Payment confirmation for order {} failed verification", order.id);
        return Err(StoreError::Forbidden("Verification failed.".to_string()));
    }

    if order.payment_status == PaymentStatus::Paid {
        return Ok(PaymentConfirmation::AlreadyPaid);
    }
    Ok(PaymentConfirmation::Confirmed)
}

/// `ORD` + UTC date + 4 random digits, e.g. ORD202403151234
pub fn generate_order_number() -> String {
    let suffix: u16 = rand::thread_rng().gen_range(1000..=9999);
    format!("ORD{}{}", Utc::now().format("%Y%m%d"), suffix)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::OrderStatus;

    fn pending_order() -> Order {
        let now = Utc::now();
        Order {
            id: 21,
            order_number: "ORD202403151234".to_string(),
            customer_name: "Somchai".to_string(),
            customer_email: "somchai@example.com".to_string(),
            customer_phone: "0812345678".to_string(),
            customer_address: "1 Road".to_string(),
            customer_city: "Bangkok".to_string(),
            customer_postal: "10110".to_string(),
            customer_country: "TH".to_string(),
            items: Vec::new(),
            shipping_method: "ems".to_string(),
            shipping_cost: 50.0,
            payment_method: "promptpay".to_string(),
            payment_status: PaymentStatus::Pending,
            subtotal: 450.0,
            total: 500.0,
            status: OrderStatus::Pending,
            order_date: now,
            created_at: now,
            updated_at: now,
        }
    }

    fn action(action: Option<&str>, email: Option<&str>) -> OrderActionRequest {
        OrderActionRequest {
            action: action.map(str::to_string),
            email: email.map(str::to_string),
        }
    }

    #[test]
    fn test_confirmation_accepted_with_case_insensitive_email() {
        let order = pending_order();
        let req = action(Some("confirm_payment"), Some(" SomChai@Example.com "));
        assert_eq!(
            verify_confirmation(&order, &req).unwrap(),
            PaymentConfirmation::Confirmed
        );
    }

    #[test]
    fn test_confirmation_rejects_other_actions() {
        let order = pending_order();
        for req in [
            action(None, Some("somchai@example.com")),
            action(Some("cancel"), Some("somchai@example.com")),
        ] {
            let err = verify_confirmation(&order, &req).unwrap_err();
            assert!(matches!(err, StoreError::Forbidden(_)));
            assert_eq!(err.to_string(), "Action not permitted.");
        }
    }

    #[test]
    fn test_confirmation_rejects_bad_email() {
        let order = pending_order();
        for email in [None, Some(""), Some("not-an-email"), Some("other@example.com")] {
            let err = verify_confirmation(&order, &action(Some("confirm_payment"), email))
                .unwrap_err();
            assert_eq!(err.to_string(), "Verification failed.");
        }
    }

    #[test]
    fn test_action_checked_before_email() {
        let order = pending_order();
        let err = verify_confirmation(&order, &action(Some("refund"), Some("x"))).unwrap_err();
        assert_eq!(err.to_string(), "Action not permitted.");
    }

    #[test]
    fn test_paid_order_is_idempotent() {
        let mut order = pending_order();
        order.payment_status = PaymentStatus::Paid;
        let req = action(Some("confirm_payment"), Some("somchai@example.com"));
        assert_eq!(
            verify_confirmation(&order, &req).unwrap(),
            PaymentConfirmation::AlreadyPaid
        );

        // a paid order still demands a matching email
        let req = action(Some("confirm_payment"), Some("other@example.com"));
        assert!(verify_confirmation(&order, &req).is_err());
    }

    #[test]
    fn test_order_number_format() {
        let number = generate_order_number();
        assert_eq!(number.len(), 15);
        assert!(number.starts_with("ORD"));
        assert!(number[3..].chars().all(|c| c.is_ascii_digit()));

        let suffix: u16 = number[11..].parse().unwrap();
        assert!((1000..=9999).contains(&suffix));
        assert_eq!(&number[3..11], Utc::now().format("%Y%m%d").to_string());
    }
}
