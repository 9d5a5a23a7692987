//! # Product Repository
//!
//! Product CRUD, SKU generation, the public catalog query, the admin
//! listing and the stats aggregates.
//!
//! ## SKU generation
//! `CODE-NNN-YYYY`: category code, per-category sequence (count + 1,
//! zero-padded), current year. Counting is racy and deletions can free a
//! sequence that still clashes with a prior year's SKU, so
//! [`ProductRepository::insert_with_generated_sku`] leans on UNIQUE(sku):
//! on a sku conflict it recounts with a bumped sequence and tries again,
//! at most [`MAX_GENERATE_ATTEMPTS`] times.

use chrono::{Datelike, Utc};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use tracing::{debug, warn};

use crate::error::{DbError, DbResult};
use crate::repository::new_id;
use shopfront_core::catalog::{CatalogFilter, SortBy, SortOrder};
use shopfront_core::sku::format_sku;
use shopfront_core::{
    BarcodeType, Product, ProductStats, ADMIN_LIST_CAP, LOW_STOCK_THRESHOLD,
    MAX_GENERATE_ATTEMPTS,
};

const COLUMNS: &str = "id, sku, name, category_code, price_cents, stock_quantity, \
    description, brand, model, dimensions, image_url, barcode_type, \
    is_active, is_featured, tags, created_at, updated_at";

// =============================================================================
// Input Types
// =============================================================================

/// Fields for creating a product. The SKU is supplied separately (explicit
/// or generated).
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub name: String,
    pub category_code: String,
    pub price_cents: i64,
    pub stock_quantity: i64,
    pub description: Option<String>,
    pub brand: Option<String>,
    pub model: Option<String>,
    pub dimensions: Option<String>,
    pub image_url: Option<String>,
    pub barcode_type: BarcodeType,
    pub is_featured: bool,
    pub tags: Option<String>,
}

impl NewProduct {
    /// A product with the required fields set and everything else defaulted.
    pub fn new(name: impl Into<String>, category_code: impl Into<String>, price_cents: i64) -> Self {
        NewProduct {
            name: name.into(),
            category_code: category_code.into(),
            price_cents,
            stock_quantity: 0,
            description: None,
            brand: None,
            model: None,
            dimensions: None,
            image_url: None,
            barcode_type: BarcodeType::default(),
            is_featured: false,
            tags: None,
        }
    }
}

/// Partial product update. `None` fields are left untouched; `updated_at`
/// is always refreshed.
#[derive(Debug, Clone, Default)]
pub struct ProductUpdate {
    pub name: Option<String>,
    pub category_code: Option<String>,
    pub price_cents: Option<i64>,
    pub stock_quantity: Option<i64>,
    pub description: Option<String>,
    pub brand: Option<String>,
    pub model: Option<String>,
    pub dimensions: Option<String>,
    pub image_url: Option<String>,
    pub barcode_type: Option<BarcodeType>,
    pub is_active: Option<bool>,
    pub is_featured: Option<bool>,
    pub tags: Option<String>,
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for product database operations.
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    // -------------------------------------------------------------------------
    // SKU generation
    // -------------------------------------------------------------------------

    /// Generates the next SKU for a category: `CODE-NNN-YYYY`.
    ///
    /// ## Errors
    /// `DbError::NotFound` if no category with this code exists.
    pub async fn generate_sku(&self, category_code: &str) -> DbResult<String> {
        self.generate_sku_bumped(category_code, 0).await
    }

    /// Like [`Self::generate_sku`] but with the sequence bumped by `bump`,
    /// used by the conflict-retry loop.
    async fn generate_sku_bumped(&self, category_code: &str, bump: u32) -> DbResult<String> {
        let exists: Option<i64> =
            sqlx::query_scalar("SELECT 1 FROM categories WHERE code = ?1")
                .bind(category_code)
                .fetch_optional(&self.pool)
                .await?;

        if exists.is_none() {
            return Err(DbError::not_found("Category", category_code));
        }

        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM products WHERE category_code = ?1")
                .bind(category_code)
                .fetch_one(&self.pool)
                .await?;

        let sequence = count as u32 + 1 + bump;
        Ok(format_sku(category_code, sequence, Utc::now().year()))
    }

    // -------------------------------------------------------------------------
    // CRUD
    // -------------------------------------------------------------------------

    /// Inserts a product with an explicit SKU.
    ///
    /// ## Errors
    /// `DbError::UniqueViolation` on a duplicate SKU,
    /// `DbError::ForeignKeyViolation` on an unknown category code.
    pub async fn insert(&self, sku: &str, new: &NewProduct) -> DbResult<Product> {
        let now = Utc::now();
        let product = Product {
            id: new_id(),
            sku: sku.to_string(),
            name: new.name.clone(),
            category_code: new.category_code.clone(),
            price_cents: new.price_cents,
            stock_quantity: new.stock_quantity,
            description: new.description.clone(),
            brand: new.brand.clone(),
            model: new.model.clone(),
            dimensions: new.dimensions.clone(),
            image_url: new.image_url.clone(),
            barcode_type: new.barcode_type,
            is_active: true,
            is_featured: new.is_featured,
            tags: new.tags.clone(),
            created_at: now,
            updated_at: now,
        };

        debug!(sku = %product.sku, "Inserting product");

        sqlx::query(
            "INSERT INTO products (id, sku, name, category_code, price_cents, \
             stock_quantity, description, brand, model, dimensions, image_url, \
             barcode_type, is_active, is_featured, tags, created_at, updated_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17)",
        )
        .bind(&product.id)
        .bind(&product.sku)
        .bind(&product.name)
        .bind(&product.category_code)
        .bind(product.price_cents)
        .bind(product.stock_quantity)
        .bind(&product.description)
        .bind(&product.brand)
        .bind(&product.model)
        .bind(&product.dimensions)
        .bind(&product.image_url)
        .bind(product.barcode_type)
        .bind(product.is_active)
        .bind(product.is_featured)
        .bind(&product.tags)
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(product)
    }

    /// Inserts a product under a freshly generated SKU, retrying with a
    /// bumped sequence when the computed SKU collides with an existing row.
    pub async fn insert_with_generated_sku(&self, new: &NewProduct) -> DbResult<Product> {
        let mut last_err = None;

        for attempt in 0..MAX_GENERATE_ATTEMPTS {
            let sku = self.generate_sku_bumped(&new.category_code, attempt).await?;

            match self.insert(&sku, new).await {
                Err(err) if err.is_unique_violation_on("sku") => {
                    warn!(sku = %sku, attempt, "Generated SKU already taken, retrying");
                    last_err = Some(err);
                }
                other => return other,
            }
        }

        Err(last_err.unwrap_or_else(|| {
            DbError::Internal("SKU generation exhausted without a conflict".to_string())
        }))
    }

    /// Gets a product by id.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(&format!(
            "SELECT {COLUMNS} FROM products WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    /// Gets a product by SKU.
    pub async fn get_by_sku(&self, sku: &str) -> DbResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(&format!(
            "SELECT {COLUMNS} FROM products WHERE sku = ?1"
        ))
        .bind(sku)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    /// Applies a partial update and returns the updated row.
    pub async fn update(&self, id: &str, update: &ProductUpdate) -> DbResult<Product> {
        debug!(id = %id, "Updating product");

        let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new("UPDATE products SET updated_at = ");
        qb.push_bind(Utc::now());

        macro_rules! set_field {
            ($field:ident) => {
                if let Some(value) = &update.$field {
                    qb.push(concat!(", ", stringify!($field), " = "));
                    qb.push_bind(value.clone());
                }
            };
        }

        set_field!(name);
        set_field!(category_code);
        set_field!(price_cents);
        set_field!(stock_quantity);
        set_field!(description);
        set_field!(brand);
        set_field!(model);
        set_field!(dimensions);
        set_field!(image_url);
        set_field!(barcode_type);
        set_field!(is_active);
        set_field!(is_featured);
        set_field!(tags);

        qb.push(" WHERE id = ");
        qb.push_bind(id.to_string());

        let result = qb.build().execute(&self.pool).await?;
        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        self.get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("Product", id))
    }

    /// Hard-deletes a product. Reviews and wishlist rows cascade; receipt
    /// items keep their snapshot.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting product");

        let result = sqlx::query("DELETE FROM products WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        Ok(())
    }

    // -------------------------------------------------------------------------
    // Queries
    // -------------------------------------------------------------------------

    /// Public catalog query. Inactive products never appear; the remaining
    /// filters are AND-ed; rows are sorted by the chosen key with an id
    /// ascending tie-break so pagination stays stable across equal keys.
    pub async fn query_catalog(&self, filter: &CatalogFilter) -> DbResult<Vec<Product>> {
        let mut qb: QueryBuilder<Sqlite> =
            QueryBuilder::new(format!("SELECT {COLUMNS} FROM products WHERE is_active = 1"));

        if let Some(search) = filter.search.as_deref().filter(|s| !s.trim().is_empty()) {
            let pattern = format!("%{}%", search.trim().to_lowercase());
            qb.push(" AND (LOWER(name) LIKE ");
            qb.push_bind(pattern.clone());
            qb.push(" OR LOWER(sku) LIKE ");
            qb.push_bind(pattern.clone());
            qb.push(" OR LOWER(IFNULL(description, '')) LIKE ");
            qb.push_bind(pattern.clone());
            qb.push(" OR LOWER(IFNULL(brand, '')) LIKE ");
            qb.push_bind(pattern.clone());
            qb.push(" OR LOWER(IFNULL(tags, '')) LIKE ");
            qb.push_bind(pattern);
            qb.push(")");
        }

        if let Some(category) = &filter.category {
            qb.push(" AND category_code = ");
            qb.push_bind(category.clone());
        }

        if let Some(min) = filter.min_price_cents {
            qb.push(" AND price_cents >= ");
            qb.push_bind(min);
        }

        if let Some(max) = filter.max_price_cents {
            qb.push(" AND price_cents <= ");
            qb.push_bind(max);
        }

        if filter.in_stock == Some(true) {
            qb.push(" AND stock_quantity > 0");
        }

        if filter.featured == Some(true) {
            qb.push(" AND is_featured = 1");
        }

        let key = match filter.sort_by {
            SortBy::Name => "name COLLATE NOCASE",
            SortBy::Price => "price_cents",
            SortBy::Created => "created_at",
        };
        let direction = match filter.sort_order {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        };
        qb.push(format!(" ORDER BY {key} {direction}, id ASC"));

        // SQLite wants LIMIT before OFFSET; -1 means unbounded.
        match (filter.limit, filter.offset) {
            (Some(limit), offset) => {
                qb.push(" LIMIT ");
                qb.push_bind(limit as i64);
                if let Some(offset) = offset {
                    qb.push(" OFFSET ");
                    qb.push_bind(offset as i64);
                }
            }
            (None, Some(offset)) => {
                qb.push(" LIMIT -1 OFFSET ");
                qb.push_bind(offset as i64);
            }
            (None, None) => {}
        }

        let products = qb.build_query_as::<Product>().fetch_all(&self.pool).await?;
        Ok(products)
    }

    /// Admin listing: inactive rows included, newest first, hard-capped at
    /// [`ADMIN_LIST_CAP`] rows per page.
    pub async fn list_admin(
        &self,
        search: Option<&str>,
        category: Option<&str>,
        limit: Option<u32>,
        offset: Option<u32>,
    ) -> DbResult<Vec<Product>> {
        let mut qb: QueryBuilder<Sqlite> =
            QueryBuilder::new(format!("SELECT {COLUMNS} FROM products WHERE 1 = 1"));

        if let Some(search) = search.filter(|s| !s.trim().is_empty()) {
            let pattern = format!("%{}%", search.trim().to_lowercase());
            qb.push(" AND (LOWER(name) LIKE ");
            qb.push_bind(pattern.clone());
            qb.push(" OR LOWER(sku) LIKE ");
            qb.push_bind(pattern);
            qb.push(")");
        }

        if let Some(category) = category {
            qb.push(" AND category_code = ");
            qb.push_bind(category.to_string());
        }

        let limit = limit.unwrap_or(ADMIN_LIST_CAP).min(ADMIN_LIST_CAP);

        qb.push(" ORDER BY created_at DESC, id ASC LIMIT ");
        qb.push_bind(limit as i64);
        qb.push(" OFFSET ");
        qb.push_bind(offset.unwrap_or(0) as i64);

        let products = qb.build_query_as::<Product>().fetch_all(&self.pool).await?;
        Ok(products)
    }

    /// Scalar aggregates over the whole product table (active and inactive).
    /// The low-stock count uses `stock_quantity <= LOW_STOCK_THRESHOLD` and
    /// so includes out-of-stock rows.
    pub async fn stats(&self) -> DbResult<ProductStats> {
        let (total_products, total_value_cents, low_stock_count, categories_count) =
            sqlx::query_as::<_, (i64, i64, i64, i64)>(
                "SELECT COUNT(*), \
                        IFNULL(SUM(price_cents * stock_quantity), 0), \
                        IFNULL(SUM(stock_quantity <= ?1), 0), \
                        (SELECT COUNT(*) FROM categories) \
                 FROM products",
            )
            .bind(LOW_STOCK_THRESHOLD)
            .fetch_one(&self.pool)
            .await?;

        Ok(ProductStats {
            total_products,
            total_value_cents,
            low_stock_count,
            categories_count,
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    async fn db() -> Database {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.categories()
            .insert("Electronics", "ELEC", None, None)
            .await
            .unwrap();
        db.categories()
            .insert("Groceries", "GRO", None, None)
            .await
            .unwrap();
        db
    }

    fn year() -> i32 {
        Utc::now().year()
    }

    #[tokio::test]
    async fn generated_skus_are_sequential() {
        let db = db().await;
        let repo = db.products();

        let first = repo
            .insert_with_generated_sku(&NewProduct::new("Cable", "ELEC", 999))
            .await
            .unwrap();
        let second = repo
            .insert_with_generated_sku(&NewProduct::new("Mouse", "ELEC", 2500))
            .await
            .unwrap();

        assert_eq!(first.sku, format!("ELEC-001-{}", year()));
        assert_eq!(second.sku, format!("ELEC-002-{}", year()));
    }

    #[tokio::test]
    async fn generate_sku_rejects_unknown_category() {
        let db = db().await;
        let err = db.products().generate_sku("NOPE").await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { entity: "Category", .. }));
    }

    #[tokio::test]
    async fn sku_conflict_retries_with_bumped_sequence() {
        let db = db().await;
        let repo = db.products();

        // One product occupying the sequence the generator will compute next
        // (count = 1 → 002).
        repo.insert(
            &format!("ELEC-002-{}", year()),
            &NewProduct::new("Squatter", "ELEC", 100),
        )
        .await
        .unwrap();

        let created = repo
            .insert_with_generated_sku(&NewProduct::new("Cable", "ELEC", 999))
            .await
            .unwrap();
        assert_eq!(created.sku, format!("ELEC-003-{}", year()));
    }

    #[tokio::test]
    async fn duplicate_explicit_sku_is_a_conflict() {
        let db = db().await;
        let repo = db.products();

        repo.insert("CUSTOM-1", &NewProduct::new("A", "ELEC", 100))
            .await
            .unwrap();
        let err = repo
            .insert("CUSTOM-1", &NewProduct::new("B", "ELEC", 200))
            .await
            .unwrap_err();
        assert!(err.is_unique_violation_on("sku"));
    }

    #[tokio::test]
    async fn catalog_hides_inactive_but_admin_listing_keeps_them() {
        let db = db().await;
        let repo = db.products();

        let active = repo
            .insert_with_generated_sku(&NewProduct::new("Visible", "ELEC", 100))
            .await
            .unwrap();
        let hidden = repo
            .insert_with_generated_sku(&NewProduct::new("Hidden", "ELEC", 100))
            .await
            .unwrap();
        repo.update(
            &hidden.id,
            &ProductUpdate { is_active: Some(false), ..Default::default() },
        )
        .await
        .unwrap();

        let catalog = repo.query_catalog(&CatalogFilter::default()).await.unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog[0].id, active.id);

        let admin = repo.list_admin(None, None, None, None).await.unwrap();
        assert_eq!(admin.len(), 2);
    }

    #[tokio::test]
    async fn catalog_price_bounds_are_inclusive() {
        let db = db().await;
        let repo = db.products();

        for (name, price) in [("Low", 500), ("Mid", 1000), ("High", 1500)] {
            repo.insert_with_generated_sku(&NewProduct::new(name, "ELEC", price))
                .await
                .unwrap();
        }

        let filter = CatalogFilter {
            min_price_cents: Some(500),
            max_price_cents: Some(1000),
            sort_by: SortBy::Price,
            ..Default::default()
        };
        let rows = repo.query_catalog(&filter).await.unwrap();
        let prices: Vec<i64> = rows.iter().map(|p| p.price_cents).collect();
        assert_eq!(prices, vec![500, 1000]);
    }

    #[tokio::test]
    async fn catalog_search_spans_name_brand_and_tags() {
        let db = db().await;
        let repo = db.products();

        let mut by_name = NewProduct::new("USB Cable", "ELEC", 999);
        by_name.tags = Some("accessory".to_string());
        repo.insert_with_generated_sku(&by_name).await.unwrap();

        let mut by_brand = NewProduct::new("Mouse", "ELEC", 2500);
        by_brand.brand = Some("UsbCo".to_string());
        repo.insert_with_generated_sku(&by_brand).await.unwrap();

        repo.insert_with_generated_sku(&NewProduct::new("Apples", "GRO", 300))
            .await
            .unwrap();

        let filter = CatalogFilter {
            search: Some("usb".to_string()),
            ..Default::default()
        };
        assert_eq!(repo.query_catalog(&filter).await.unwrap().len(), 2);

        let filter = CatalogFilter {
            search: Some("accessory".to_string()),
            ..Default::default()
        };
        assert_eq!(repo.query_catalog(&filter).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn catalog_pagination_is_stable_across_equal_sort_keys() {
        let db = db().await;
        let repo = db.products();

        // Same price everywhere, so ordering falls through to the id
        // tie-break.
        for name in ["A", "B", "C", "D", "E"] {
            repo.insert_with_generated_sku(&NewProduct::new(name, "ELEC", 1000))
                .await
                .unwrap();
        }

        let page = |offset| CatalogFilter {
            sort_by: SortBy::Price,
            limit: Some(2),
            offset: Some(offset),
            ..Default::default()
        };

        let first = repo.query_catalog(&page(0)).await.unwrap();
        let second = repo.query_catalog(&page(2)).await.unwrap();
        let third = repo.query_catalog(&page(4)).await.unwrap();

        let mut ids: Vec<String> = first
            .iter()
            .chain(&second)
            .chain(&third)
            .map(|p| p.id.clone())
            .collect();
        assert_eq!(ids.len(), 5);
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 5, "pages must not overlap");
    }

    #[tokio::test]
    async fn admin_listing_caps_page_size() {
        let db = db().await;
        let repo = db.products();

        let rows = repo.list_admin(None, None, Some(5000), None).await.unwrap();
        assert!(rows.is_empty());

        // The cap is applied to the SQL limit, not post-hoc; verify with a
        // small table that limit still works below the cap.
        for i in 0..3 {
            repo.insert_with_generated_sku(&NewProduct::new(format!("P{i}"), "ELEC", 100))
                .await
                .unwrap();
        }
        assert_eq!(repo.list_admin(None, None, Some(2), None).await.unwrap().len(), 2);
        assert_eq!(
            repo.list_admin(None, None, Some(2), Some(2)).await.unwrap().len(),
            1
        );
    }

    #[tokio::test]
    async fn stats_on_empty_table_keep_category_count() {
        let db = db().await;
        let stats = db.products().stats().await.unwrap();
        assert_eq!(
            stats,
            ProductStats {
                total_products: 0,
                total_value_cents: 0,
                low_stock_count: 0,
                categories_count: 2,
            }
        );
    }

    #[tokio::test]
    async fn stats_low_stock_includes_out_of_stock() {
        let db = db().await;
        let repo = db.products();

        let mut none = NewProduct::new("None", "ELEC", 1000);
        none.stock_quantity = 0;
        let mut low = NewProduct::new("Low", "ELEC", 1000);
        low.stock_quantity = 10;
        let mut plenty = NewProduct::new("Plenty", "ELEC", 1000);
        plenty.stock_quantity = 50;

        for p in [&none, &low, &plenty] {
            repo.insert_with_generated_sku(p).await.unwrap();
        }

        let stats = repo.stats().await.unwrap();
        assert_eq!(stats.total_products, 3);
        assert_eq!(stats.low_stock_count, 2);
        assert_eq!(stats.total_value_cents, 60 * 1000);
    }

    #[tokio::test]
    async fn update_refreshes_fields_and_missing_id_is_not_found() {
        let db = db().await;
        let repo = db.products();

        let created = repo
            .insert_with_generated_sku(&NewProduct::new("Cable", "ELEC", 999))
            .await
            .unwrap();

        let updated = repo
            .update(
                &created.id,
                &ProductUpdate {
                    price_cents: Some(1099),
                    is_featured: Some(true),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.price_cents, 1099);
        assert!(updated.is_featured);
        assert_eq!(updated.name, "Cable");

        let err = repo.update("missing", &ProductUpdate::default()).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }
}
