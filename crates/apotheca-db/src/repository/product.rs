//! # Product Repository
//!
//! Database operations for the catalog: lookups, cart enrichment, search,
//! and stock updates.
//!
//! ## Cart Enrichment
//! ```text
//! CartLineItem { product_id, quantity }
//!      │                                    products table
//!      ▼                                         │
//! enrich() ───── per-id lookup ──────────────────┘
//!      │
//!      ▼
//! EnrichedCartItem { product_id, quantity, product: Option<Product> }
//! ```
//!
//! A failed lookup (deleted or delisted product) is preserved as
//! `product: None`, not an error; the checkout core decides how to react.

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use apotheca_core::sanitize::sanitize_string;
use apotheca_core::{CartLineItem, EnrichedCartItem, Product};

const PRODUCT_COLUMNS: &str =
    "id, name, description, price_cents, stock, is_active, created_at, updated_at";

/// Repository for product database operations.
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Gets a product by ID. Inactive products resolve like missing ones.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Product>> {
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ?1 AND is_active = 1");
        let product = sqlx::query_as::<_, Product>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(product)
    }

    /// Joins cart line items with their catalog products.
    ///
    /// Absent products come back as `None` inside the enriched item; order
    /// assembly decides whether that skips (subtotal) or aborts
    /// (normalization).
    pub async fn enrich(&self, items: &[CartLineItem]) -> DbResult<Vec<EnrichedCartItem>> {
        debug!(count = items.len(), "Enriching cart items");

        let mut enriched = Vec::with_capacity(items.len());
        for item in items {
            let product = self.get_by_id(&item.product_id).await?;
            enriched.push(item.enrich(product));
        }
        Ok(enriched)
    }

    /// Searches active products by name or description.
    ///
    /// The query goes through [`sanitize_string`] (the filter policy) before
    /// being bound into a LIKE pattern.
    pub async fn search(&self, query: &str, limit: i64) -> DbResult<Vec<Product>> {
        let sanitized = sanitize_string(query);
        debug!(query = %sanitized, limit, "Searching products");

        let pattern = format!("%{sanitized}%");
        let sql = format!(
            "SELECT {PRODUCT_COLUMNS} FROM products \
             WHERE is_active = 1 AND (name LIKE ?1 OR description LIKE ?1) \
             ORDER BY name LIMIT ?2"
        );
        let products = sqlx::query_as::<_, Product>(&sql)
            .bind(&pattern)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;

        Ok(products)
    }

    /// Inserts a product.
    pub async fn insert(&self, product: &Product) -> DbResult<()> {
        debug!(id = %product.id, name = %product.name, "Inserting product");

        sqlx::query(
            "INSERT INTO products \
             (id, name, description, price_cents, stock, is_active, created_at, updated_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        )
        .bind(&product.id)
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.price_cents)
        .bind(product.stock)
        .bind(product.is_active)
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Sets the stock level for a product.
    pub async fn update_stock(&self, id: &str, stock: i64) -> DbResult<()> {
        let result = sqlx::query(
            "UPDATE products SET stock = ?1, updated_at = ?2 WHERE id = ?3",
        )
        .bind(stock)
        .bind(chrono::Utc::now())
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use chrono::Utc;

    fn test_product(id: &str, name: &str, price_cents: i64) -> Product {
        Product {
            id: id.to_string(),
            name: name.to_string(),
            description: Some(format!("{name} description")),
            price_cents,
            stock: 50,
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let db = test_db().await;
        let repo = db.products();

        repo.insert(&test_product("p-1", "Cannabisblüten 20/1", 1250))
            .await
            .unwrap();

        let found = repo.get_by_id("p-1").await.unwrap().unwrap();
        assert_eq!(found.name, "Cannabisblüten 20/1");
        assert_eq!(found.price_cents, 1250);
        assert!(repo.get_by_id("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_enrich_preserves_missing_products() {
        let db = test_db().await;
        let repo = db.products();
        repo.insert(&test_product("p-1", "Extrakt 25/1", 3990))
            .await
            .unwrap();

        let cart = vec![
            CartLineItem {
                product_id: "p-1".to_string(),
                quantity: 2,
            },
            CartLineItem {
                product_id: "deleted".to_string(),
                quantity: 1,
            },
        ];

        let enriched = repo.enrich(&cart).await.unwrap();
        assert_eq!(enriched.len(), 2);
        assert!(enriched[0].product.is_some());
        assert_eq!(enriched[0].quantity, 2);
        assert!(enriched[1].product.is_none());
    }

    #[tokio::test]
    async fn test_search_applies_filter_policy() {
        let db = test_db().await;
        let repo = db.products();
        repo.insert(&test_product("p-1", "Cannabisblüten 20/1", 1250))
            .await
            .unwrap();
        repo.insert(&test_product("p-2", "Extrakt 25/1", 3990))
            .await
            .unwrap();

        // Angle brackets are dropped by the filter policy before the query runs
        let results = repo.search("  <blüten>  ", 10).await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id, "p-1");
    }

    #[tokio::test]
    async fn test_update_stock() {
        let db = test_db().await;
        let repo = db.products();
        repo.insert(&test_product("p-1", "Blüten 18/1", 990))
            .await
            .unwrap();

        repo.update_stock("p-1", 7).await.unwrap();
        let found = repo.get_by_id("p-1").await.unwrap().unwrap();
        assert_eq!(found.stock, 7);

        let err = repo.update_stock("missing", 1).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }
}
