// src/db/order_repository.rs
// DOCUMENTATION: Database access for orders and sales aggregates
// PURPOSE: All SQL touching the orders table

use crate::errors::StoreError;
use crate::models::input::escape_like;
use crate::models::*;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};

/// Internal struct for mapping database rows to Order struct
/// DOCUMENTATION: Statuses are VARCHAR columns, parsed into enums on the way out
#[derive(Debug, FromRow)]
struct OrderRow {
    pub id: i64,
    pub order_number: String,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,
    pub customer_address: String,
    pub customer_city: String,
    pub customer_postal: String,
    pub customer_country: String,
    pub items: Json<Vec<OrderItem>>,
    pub shipping_method: String,
    pub shipping_cost: f64,
    pub payment_method: String,
    pub payment_status: String,
    pub subtotal: f64,
    pub total: f64,
    pub status: String,
    pub order_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl OrderRow {
    /// Convert OrderRow to Order model
    fn to_order(self) -> Result<Order, StoreError> {
        let status = self.status.parse::<OrderStatus>().map_err(|_| {
            log::error!("Order {} has unknown status '{}'", self.id, self.status);
            StoreError::InternalError
        })?;
        let payment_status = self.payment_status.parse::<PaymentStatus>().map_err(|_| {
            log::error!(
                "Order {} has unknown payment status '{}'",
                self.id,
                self.payment_status
            );
            StoreError::InternalError
        })?;

        Ok(Order {
            id: self.id,
            order_number: self.order_number,
            customer_name: self.customer_name,
            customer_email: self.customer_email,
            customer_phone: self.customer_phone,
            customer_address: self.customer_address,
            customer_city: self.customer_city,
            customer_postal: self.customer_postal,
            customer_country: self.customer_country,
            items: self.items.0,
            shipping_method: self.shipping_method,
            shipping_cost: self.shipping_cost,
            payment_method: self.payment_method,
            payment_status,
            subtotal: self.subtotal,
            total: self.total,
            status,
            order_date: self.order_date,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

const ORDER_COLUMNS: &str = r#"
    id, order_number,
    customer_name, customer_email, customer_phone,
    customer_address, customer_city, customer_postal, customer_country,
    items, shipping_method, shipping_cost, payment_method, payment_status,
    subtotal, total, status, order_date, created_at, updated_at
"#;

/// Shared WHERE clause for admin listings.
/// $1 = status filter, $2 = ILIKE pattern; NULL disables either filter.
const ORDER_FILTER: &str = r#"
    WHERE ($1::text IS NULL OR status = $1)
      AND ($2::text IS NULL
           OR order_number ILIKE $2
           OR customer_name ILIKE $2
           OR customer_phone ILIKE $2
           OR customer_email ILIKE $2)
"#;

/// OrderRepository: All database operations for orders
pub struct OrderRepository;

impl OrderRepository {
    /// Insert a validated order, returns the new id
    /// DOCUMENTATION: status and payment_status start as pending.
    /// Returns None when the order number is already taken.
    pub async fn create(
        pool: &PgPool,
        order_number: &str,
        order: &NewOrder,
    ) -> Result<Option<i64>, StoreError> {
        let inserted: Option<(i64,)> = sqlx::query_as(
            r#"
            INSERT INTO orders (
                order_number,
                customer_name, customer_email, customer_phone,
                customer_address, customer_city, customer_postal, customer_country,
                items, shipping_method, shipping_cost, payment_method,
                payment_status, subtotal, total, status,
                order_date, created_at, updated_at
            )
            VALUES (
                $1,
                $2, $3, $4,
                $5, $6, $7, $8,
                $9, $10, $11, $12,
                $13, $14, $15, $16,
                NOW(), NOW(), NOW()
            )
            ON CONFLICT (order_number) DO NOTHING
            RETURNING id
            "#,
        )
        .bind(order_number) // $1
        .bind(&order.customer_name) // $2
        .bind(&order.customer_email) // $3
        .bind(&order.customer_phone) // $4
        .bind(&order.customer_address) // $5
        .bind(&order.customer_city) // $6
        .bind(&order.customer_postal) // $7
        .bind(&order.customer_country) // $8
        .bind(Json(&order.items)) // $9
        .bind(&order.shipping_method) // $10
        .bind(order.shipping_cost) // $11
        .bind(&order.payment_method) // $12
        .bind(PaymentStatus::Pending.as_str()) // $13
        .bind(order.subtotal) // $14
        .bind(order.total) // $15
        .bind(OrderStatus::Pending.as_str()) // $16
        .fetch_optional(pool)
        .await
        .map_err(|e| {
            log::error!("Failed to create order {}: {}", order_number, e);
            StoreError::DatabaseError(e.to_string())
        })?;

        if let Some((id,)) = inserted {
            log::info!("Created order {} with id: {}", order_number, id);
        }
        Ok(inserted.map(|(id,)| id))
    }

    /// Retrieve order by ID
    pub async fn get_by_id(pool: &PgPool, id: i64) -> Result<Order, StoreError> {
        let sql = format!("SELECT {} FROM orders WHERE id = $1", ORDER_COLUMNS);
        let row = sqlx::query_as::<_, OrderRow>(&sql)
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(|e| {
                log::error!("Database error fetching order {}: {}", id, e);
                StoreError::DatabaseError(e.to_string())
            })?
            .ok_or_else(|| {
                log::warn!("Order not found: {}", id);
                StoreError::NotFound("Order does not exist.".to_string())
            })?;

        row.to_order()
    }

    /// List orders newest first, optional status filter, no count
    /// DOCUMENTATION: Used by GET /api/orders
    pub async fn list(pool: &PgPool, filter: &OrderFilter) -> Result<Vec<Order>, StoreError> {
        let sql = format!(
            "SELECT {} FROM orders {} ORDER BY order_date DESC, id DESC LIMIT $3 OFFSET $4",
            ORDER_COLUMNS, ORDER_FILTER
        );

        let rows = sqlx::query_as::<_, OrderRow>(&sql)
            .bind(filter.status.map(|s| s.as_str()))
            .bind(Option::<String>::None)
            .bind(filter.limit)
            .bind(filter.offset)
            .fetch_all(pool)
            .await
            .map_err(|e| {
                log::error!("Order list query error: {}", e);
                StoreError::DatabaseError(e.to_string())
            })?;

        rows.into_iter().map(OrderRow::to_order).collect()
    }

    /// Search orders with filters
    /// DOCUMENTATION: Used by GET /api/admin/orders
    /// Returns tuple: (results, total_count) for pagination
    pub async fn search(
        pool: &PgPool,
        filter: &OrderFilter,
    ) -> Result<(Vec<Order>, i64), StoreError> {
        let status = filter.status.map(|s| s.as_str());
        let pattern = filter
            .search
            .as_deref()
            .map(|term| format!("%{}%", escape_like(term)));

        let count_sql = format!("SELECT COUNT(*) FROM orders {}", ORDER_FILTER);
        let (total,): (i64,) = sqlx::query_as(&count_sql)
            .bind(status)
            .bind(pattern.as_deref())
            .fetch_one(pool)
            .await
            .map_err(|e| {
                log::error!("Order count query error: {}", e);
                StoreError::DatabaseError(e.to_string())
            })?;

        let sql = format!(
            "SELECT {} FROM orders {} ORDER BY order_date DESC, id DESC LIMIT $3 OFFSET $4",
            ORDER_COLUMNS, ORDER_FILTER
        );
        let rows = sqlx::query_as::<_, OrderRow>(&sql)
            .bind(status)
            .bind(pattern.as_deref())
            .bind(filter.limit)
            .bind(filter.offset)
            .fetch_all(pool)
            .await
            .map_err(|e| {
                log::error!("Order search query error: {}", e);
                StoreError::DatabaseError(e.to_string())
            })?;

        let orders = rows
            .into_iter()
            .map(OrderRow::to_order)
            .collect::<Result<Vec<_>, _>>()?;

        log::debug!(
            "Order search completed: {} results, {} total",
            orders.len(),
            total
        );
        Ok((orders, total))
    }

    /// Mark an order paid and move it to processing in one statement
    /// DOCUMENTATION: Returns false when the order was already paid (or vanished)
    pub async fn confirm_payment(pool: &PgPool, id: i64) -> Result<bool, StoreError> {
        let rows = sqlx::query(
            r#"
            UPDATE orders
            SET payment_status = $1,
                status = $2,
                updated_at = NOW()
            WHERE id = $3 AND payment_status <> $1
            "#,
        )
        .bind(PaymentStatus::Paid.as_str())
        .bind(OrderStatus::Processing.as_str())
        .bind(id)
        .execute(pool)
        .await
        .map_err(|e| {
            log::error!("Payment confirmation failed for order {}: {}", id, e);
            StoreError::DatabaseError(e.to_string())
        })?
        .rows_affected();

        Ok(rows > 0)
    }

    /// Update order status and, optionally, payment status
    pub async fn update_status(pool: &PgPool, update: &OrderStatusUpdate) -> Result<(), StoreError> {
        let rows = sqlx::query(
            r#"
            UPDATE orders
            SET status = $1,
                payment_status = COALESCE($2, payment_status),
                updated_at = NOW()
            WHERE id = $3
            "#,
        )
        .bind(update.status.as_str())
        .bind(update.payment_status.map(|p| p.as_str()))
        .bind(update.id)
        .execute(pool)
        .await
        .map_err(|e| {
            log::error!("Status update failed for order {}: {}", update.id, e);
            StoreError::DatabaseError(e.to_string())
        })?
        .rows_affected();

        if rows == 0 {
            return Err(StoreError::NotFound("Order does not exist.".to_string()));
        }

        log::info!("Order {} status set to {}", update.id, update.status);
        Ok(())
    }

    /// Permanently delete an order
    pub async fn delete(pool: &PgPool, id: i64) -> Result<(), StoreError> {
        let rows = sqlx::query("DELETE FROM orders WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await
            .map_err(|e| {
                log::error!("Delete failed for order {}: {}", id, e);
                StoreError::DatabaseError(e.to_string())
            })?
            .rows_affected();

        if rows == 0 {
            return Err(StoreError::NotFound("Order does not exist.".to_string()));
        }

        log::info!("Deleted order: {}", id);
        Ok(())
    }

    /// Totals over an optional `[start, end)` window
    pub async fn sales_stats(pool: &PgPool, range: &DateRange) -> Result<SalesStats, StoreError> {
        sqlx::query_as::<_, SalesStats>(
            r#"
            SELECT
                COUNT(*) AS total_orders,
                COALESCE(SUM(total), 0)::float8 AS total_sales,
                COALESCE(AVG(total), 0)::float8 AS avg_order_value,
                COUNT(*) FILTER (WHERE status = 'completed') AS completed_orders
            FROM orders
            WHERE ($1::timestamptz IS NULL OR order_date >= $1)
              AND ($2::timestamptz IS NULL OR order_date < $2)
            "#,
        )
        .bind(range.start)
        .bind(range.end)
        .fetch_one(pool)
        .await
        .map_err(|e| {
            log::error!("Sales stats query error: {}", e);
            StoreError::DatabaseError(e.to_string())
        })
    }

    /// Orders and revenue per day over the last `days` days
    pub async fn daily_sales(pool: &PgPool, days: i64) -> Result<Vec<DailySales>, StoreError> {
        // make_interval takes an int4
        let days = i32::try_from(days).unwrap_or(MAX_REPORT_DAYS as i32);

        sqlx::query_as::<_, DailySales>(
            r#"
            SELECT
                (order_date AT TIME ZONE 'UTC')::date AS date,
                COUNT(*) AS orders,
                COALESCE(SUM(total), 0)::float8 AS sales
            FROM orders
            WHERE order_date >= NOW() - make_interval(days => $1)
            GROUP BY 1
            ORDER BY 1 ASC
            "#,
        )
        .bind(days)
        .fetch_all(pool)
        .await
        .map_err(|e| {
            log::error!("Daily sales query error: {}", e);
            StoreError::DatabaseError(e.to_string())
        })
    }

    /// Orders and revenue per month over the last 12 months
    pub async fn monthly_sales(pool: &PgPool) -> Result<Vec<MonthlySales>, StoreError> {
        sqlx::query_as::<_, MonthlySales>(
            r#"
            SELECT
                to_char(order_date AT TIME ZONE 'UTC', 'YYYY-MM') AS month,
                COUNT(*) AS orders,
                COALESCE(SUM(total), 0)::float8 AS sales
            FROM orders
            WHERE order_date >= NOW() - INTERVAL '12 months'
            GROUP BY 1
            ORDER BY 1 ASC
            "#,
        )
        .fetch_all(pool)
        .await
        .map_err(|e| {
            log::error!("Monthly sales query error: {}", e);
            StoreError::DatabaseError(e.to_string())
        })
    }
}
