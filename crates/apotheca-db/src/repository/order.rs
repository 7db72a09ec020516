//! # Order Repository
//!
//! Database operations for orders and their line items.
//!
//! ## Order Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Order Lifecycle                                   │
//! │                                                                         │
//! │  1. CREATE                                                             │
//! │     └── create(&order) → orders row + order_items rows,                │
//! │         one transaction; UNIQUE(order_number) enforced here            │
//! │                                                                         │
//! │  2. READ                                                               │
//! │     └── get_by_id() / list_for_user() → Order with its items          │
//! │                                                                         │
//! │  3. FULFIL                                                             │
//! │     └── update_status() → pending → processing → shipped → delivered  │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Addresses are written once as JSON payloads; line items as rows.

use sqlx::SqlitePool;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use apotheca_core::{Address, Order, OrderLineSnapshot, OrderStatus, PaymentMethod};

/// Flat row shape of the `orders` table; items and addresses are folded in
/// after the fetch.
#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    id: String,
    order_number: String,
    user_id: String,
    subtotal_cents: i64,
    vat_cents: i64,
    total_cents: i64,
    shipping_address: String,
    billing_address: String,
    payment_method: PaymentMethod,
    notes: Option<String>,
    status: OrderStatus,
    created_at: chrono::DateTime<chrono::Utc>,
}

impl OrderRow {
    fn into_order(self, items: Vec<OrderLineSnapshot>) -> DbResult<Order> {
        Ok(Order {
            id: self.id,
            order_number: self.order_number,
            user_id: self.user_id,
            items,
            subtotal_cents: self.subtotal_cents,
            vat_cents: self.vat_cents,
            total_cents: self.total_cents,
            shipping_address: parse_address(&self.shipping_address)?,
            billing_address: parse_address(&self.billing_address)?,
            payment_method: self.payment_method,
            notes: self.notes,
            status: self.status,
            created_at: self.created_at,
        })
    }
}

fn parse_address(json: &str) -> DbResult<Address> {
    serde_json::from_str(json)
        .map_err(|e| DbError::Internal(format!("corrupt address payload: {e}")))
}

const ORDER_COLUMNS: &str = "id, order_number, user_id, subtotal_cents, vat_cents, total_cents, \
     shipping_address, billing_address, payment_method, notes, status, created_at";

/// Repository for order database operations.
#[derive(Debug, Clone)]
pub struct OrderRepository {
    pool: SqlitePool,
}

impl OrderRepository {
    /// Creates a new OrderRepository.
    pub fn new(pool: SqlitePool) -> Self {
        OrderRepository { pool }
    }

    /// Persists an assembled order with its line items in one transaction.
    ///
    /// A duplicate order number surfaces as
    /// [`DbError::UniqueViolation`] carrying the offending number; the order
    /// is not partially written.
    pub async fn create(&self, order: &Order) -> DbResult<()> {
        debug!(id = %order.id, order_number = %order.order_number, "Inserting order");

        let shipping_json = encode_address(&order.shipping_address)?;
        let billing_json = encode_address(&order.billing_address)?;

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            "INSERT INTO orders \
             (id, order_number, user_id, subtotal_cents, vat_cents, total_cents, \
              shipping_address, billing_address, payment_method, notes, status, created_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
        )
        .bind(&order.id)
        .bind(&order.order_number)
        .bind(&order.user_id)
        .bind(order.subtotal_cents)
        .bind(order.vat_cents)
        .bind(order.total_cents)
        .bind(&shipping_json)
        .bind(&billing_json)
        .bind(order.payment_method)
        .bind(&order.notes)
        .bind(order.status)
        .bind(order.created_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            let err = DbError::from(e);
            match &err {
                DbError::UniqueViolation { field, .. } if field.contains("order_number") => {
                    DbError::duplicate("order_number", &order.order_number)
                }
                _ => err,
            }
        })?;

        for item in &order.items {
            sqlx::query(
                "INSERT INTO order_items (id, order_id, product_id, name, quantity, price_cents) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            )
            .bind(Uuid::new_v4().to_string())
            .bind(&order.id)
            .bind(&item.product_id)
            .bind(&item.name)
            .bind(item.quantity)
            .bind(item.price_cents)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        info!(
            id = %order.id,
            order_number = %order.order_number,
            total_cents = order.total_cents,
            items = order.items.len(),
            "Order created"
        );
        Ok(())
    }

    /// Gets an order with its line items.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Order>> {
        let sql = format!("SELECT {ORDER_COLUMNS} FROM orders WHERE id = ?1");
        let Some(row) = sqlx::query_as::<_, OrderRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
        else {
            return Ok(None);
        };

        let items = self.get_items(id).await?;
        row.into_order(items).map(Some)
    }

    /// Lists a user's orders, newest first, each with its line items.
    pub async fn list_for_user(&self, user_id: &str) -> DbResult<Vec<Order>> {
        let sql = format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE user_id = ?1 ORDER BY created_at DESC"
        );
        let rows = sqlx::query_as::<_, OrderRow>(&sql)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;

        let mut orders = Vec::with_capacity(rows.len());
        for row in rows {
            let items = self.get_items(&row.id).await?;
            orders.push(row.into_order(items)?);
        }
        Ok(orders)
    }

    /// Updates the fulfilment status of an order.
    pub async fn update_status(&self, id: &str, status: OrderStatus) -> DbResult<()> {
        let result = sqlx::query("UPDATE orders SET status = ?1 WHERE id = ?2")
            .bind(status)
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Order", id));
        }

        debug!(id = %id, status = ?status, "Order status updated");
        Ok(())
    }

    async fn get_items(&self, order_id: &str) -> DbResult<Vec<OrderLineSnapshot>> {
        let items = sqlx::query_as::<_, OrderLineSnapshot>(
            "SELECT product_id, name, quantity, price_cents FROM order_items \
             WHERE order_id = ?1 ORDER BY rowid",
        )
        .bind(order_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }
}

fn encode_address(address: &Address) -> DbResult<String> {
    serde_json::to_string(address)
        .map_err(|e| DbError::Internal(format!("address serialization failed: {e}")))
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use chrono::Utc;

    fn test_address() -> Address {
        Address {
            name: "Adler Apotheke".to_string(),
            street: "Hauptstr. 1".to_string(),
            city: "Berlin".to_string(),
            postal_code: "10115".to_string(),
            country: "Germany".to_string(),
        }
    }

    fn test_order(id: &str, order_number: &str, user_id: &str) -> Order {
        Order {
            id: id.to_string(),
            order_number: order_number.to_string(),
            user_id: user_id.to_string(),
            items: vec![
                OrderLineSnapshot {
                    product_id: "p-1".to_string(),
                    name: "Cannabisblüten 20/1".to_string(),
                    quantity: 2,
                    price_cents: 1000,
                },
                OrderLineSnapshot {
                    product_id: "p-2".to_string(),
                    name: "Extrakt 25/1".to_string(),
                    quantity: 1,
                    price_cents: 2000,
                },
            ],
            subtotal_cents: 4000,
            vat_cents: 760,
            total_cents: 4760,
            shipping_address: test_address(),
            billing_address: test_address(),
            payment_method: PaymentMethod::Invoice,
            notes: Some("Bitte vormittags liefern".to_string()),
            status: OrderStatus::Pending,
            created_at: Utc::now(),
        }
    }

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    #[tokio::test]
    async fn test_create_and_get_round_trip() {
        let db = test_db().await;
        let repo = db.orders();

        let order = test_order("o-1", "RX-user-600000-b1f0", "user123456");
        repo.create(&order).await.unwrap();

        let found = repo.get_by_id("o-1").await.unwrap().unwrap();
        assert_eq!(found.order_number, "RX-user-600000-b1f0");
        assert_eq!(found.total_cents, 4760);
        assert_eq!(found.items.len(), 2);
        assert_eq!(found.items[0].name, "Cannabisblüten 20/1");
        assert_eq!(found.items[0].quantity, 2);
        assert_eq!(found.shipping_address, test_address());
        assert_eq!(found.payment_method, PaymentMethod::Invoice);
        assert_eq!(found.status, OrderStatus::Pending);

        assert!(repo.get_by_id("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_order_number_is_rejected() {
        let db = test_db().await;
        let repo = db.orders();

        repo.create(&test_order("o-1", "RX-user-600000-b1f0", "user123456"))
            .await
            .unwrap();

        let err = repo
            .create(&test_order("o-2", "RX-user-600000-b1f0", "user123456"))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            DbError::UniqueViolation { ref field, ref value }
                if field == "order_number" && value == "RX-user-600000-b1f0"
        ));

        // The failed insert left no partial order behind
        assert!(repo.get_by_id("o-2").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_for_user_newest_first() {
        let db = test_db().await;
        let repo = db.orders();

        let mut first = test_order("o-1", "RX-user-000001-aaaa", "user123456");
        first.created_at = Utc::now() - chrono::Duration::hours(2);
        let second = test_order("o-2", "RX-user-000002-bbbb", "user123456");
        let other = test_order("o-3", "RX-othr-000003-cccc", "other-user");

        repo.create(&first).await.unwrap();
        repo.create(&second).await.unwrap();
        repo.create(&other).await.unwrap();

        let orders = repo.list_for_user("user123456").await.unwrap();
        assert_eq!(orders.len(), 2);
        assert_eq!(orders[0].id, "o-2");
        assert_eq!(orders[1].id, "o-1");
    }

    #[tokio::test]
    async fn test_update_status() {
        let db = test_db().await;
        let repo = db.orders();

        repo.create(&test_order("o-1", "RX-user-000001-aaaa", "user123456"))
            .await
            .unwrap();

        repo.update_status("o-1", OrderStatus::Shipped).await.unwrap();
        let found = repo.get_by_id("o-1").await.unwrap().unwrap();
        assert_eq!(found.status, OrderStatus::Shipped);

        let err = repo
            .update_status("missing", OrderStatus::Cancelled)
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }
}
