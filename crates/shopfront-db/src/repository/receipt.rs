//! # Receipt Repository
//!
//! Receipts are written once and never edited. `create` recomputes every
//! amount from the line items (client totals are never trusted) and writes
//! the header plus all items inside one transaction, so a receipt is either
//! fully persisted or not at all.
//!
//! Line items are frozen snapshots: they copy product name, SKU and unit
//! price at sale time and reference the product only by a weak id, so
//! historical receipts survive product edits and deletions untouched.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{debug, warn};

use crate::error::{DbError, DbResult};
use crate::repository::new_id;
use shopfront_core::receipt::{LineAmount, ReceiptTotals};
use shopfront_core::{
    Money, PaymentMethod, Product, Rate, Receipt, ReceiptItem, MAX_GENERATE_ATTEMPTS,
};

const RECEIPT_COLUMNS: &str = "id, receipt_number, customer_name, business_name, \
    business_address, business_phone, subtotal_cents, tax_rate_bps, tax_cents, \
    discount_rate_bps, discount_cents, total_cents, payment_method, created_at";

const ITEM_COLUMNS: &str = "id, receipt_id, product_id, product_name, product_sku, \
    quantity, unit_price_cents, total_price_cents";

// =============================================================================
// Input Types
// =============================================================================

/// Header fields for a new receipt. Amounts are absent on purpose; they are
/// always recomputed from the items.
#[derive(Debug, Clone, Default)]
pub struct NewReceipt {
    pub customer_name: Option<String>,
    pub business_name: Option<String>,
    pub business_address: Option<String>,
    pub business_phone: Option<String>,
    /// Tax rate in basis points.
    pub tax_rate_bps: u32,
    /// Discount rate in basis points.
    pub discount_rate_bps: u32,
    pub payment_method: PaymentMethod,
}

/// One line item for a new receipt, already carrying the product snapshot.
#[derive(Debug, Clone)]
pub struct NewReceiptItem {
    pub product_id: String,
    pub product_name: String,
    pub product_sku: String,
    pub quantity: i64,
    pub unit_price_cents: i64,
}

impl NewReceiptItem {
    /// Snapshots a catalog product at its current name, SKU and price.
    pub fn from_product(product: &Product, quantity: i64) -> Self {
        NewReceiptItem {
            product_id: product.id.clone(),
            product_name: product.name.clone(),
            product_sku: product.sku.clone(),
            quantity,
            unit_price_cents: product.price_cents,
        }
    }

    fn line_amount(&self) -> LineAmount {
        LineAmount::new(Money::from_cents(self.unit_price_cents), self.quantity)
    }
}

/// A receipt header together with its line items.
#[derive(Debug, Clone, serde::Serialize)]
pub struct ReceiptWithItems {
    pub receipt: Receipt,
    pub items: Vec<ReceiptItem>,
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for receipt database operations.
#[derive(Debug, Clone)]
pub struct ReceiptRepository {
    pool: SqlitePool,
}

impl ReceiptRepository {
    pub fn new(pool: SqlitePool) -> Self {
        ReceiptRepository { pool }
    }

    /// Creates a receipt with its items in one transaction.
    ///
    /// Totals are recomputed here from the line items; any precondition
    /// violation (no items, quantity < 1, negative price) fails before a
    /// single row is written. The receipt number is generated from the
    /// timestamp and retried on the rare uniqueness collision.
    pub async fn create(
        &self,
        new: &NewReceipt,
        items: &[NewReceiptItem],
    ) -> DbResult<ReceiptWithItems> {
        let amounts: Vec<LineAmount> = items.iter().map(NewReceiptItem::line_amount).collect();
        let totals = ReceiptTotals::compute(
            &amounts,
            Rate::from_bps(new.discount_rate_bps),
            Rate::from_bps(new.tax_rate_bps),
        )?;

        for attempt in 0..MAX_GENERATE_ATTEMPTS {
            let receipt_number = generate_receipt_number(attempt);

            match self.try_create(new, items, &totals, &receipt_number).await {
                Err(err) if err.is_unique_violation_on("receipt_number") => {
                    warn!(%receipt_number, attempt, "Receipt number taken, retrying");
                }
                other => return other,
            }
        }

        Err(DbError::Internal(format!(
            "could not allocate a receipt number in {MAX_GENERATE_ATTEMPTS} attempts"
        )))
    }

    async fn try_create(
        &self,
        new: &NewReceipt,
        items: &[NewReceiptItem],
        totals: &ReceiptTotals,
        receipt_number: &str,
    ) -> DbResult<ReceiptWithItems> {
        let receipt = Receipt {
            id: new_id(),
            receipt_number: receipt_number.to_string(),
            customer_name: new.customer_name.clone(),
            business_name: new.business_name.clone(),
            business_address: new.business_address.clone(),
            business_phone: new.business_phone.clone(),
            subtotal_cents: totals.subtotal.cents(),
            tax_rate_bps: new.tax_rate_bps,
            tax_cents: totals.tax.cents(),
            discount_rate_bps: new.discount_rate_bps,
            discount_cents: totals.discount.cents(),
            total_cents: totals.total.cents(),
            payment_method: new.payment_method,
            created_at: Utc::now(),
        };

        debug!(number = %receipt.receipt_number, items = items.len(), "Creating receipt");

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            "INSERT INTO receipts (id, receipt_number, customer_name, business_name, \
             business_address, business_phone, subtotal_cents, tax_rate_bps, tax_cents, \
             discount_rate_bps, discount_cents, total_cents, payment_method, created_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)",
        )
        .bind(&receipt.id)
        .bind(&receipt.receipt_number)
        .bind(&receipt.customer_name)
        .bind(&receipt.business_name)
        .bind(&receipt.business_address)
        .bind(&receipt.business_phone)
        .bind(receipt.subtotal_cents)
        .bind(receipt.tax_rate_bps)
        .bind(receipt.tax_cents)
        .bind(receipt.discount_rate_bps)
        .bind(receipt.discount_cents)
        .bind(receipt.total_cents)
        .bind(receipt.payment_method)
        .bind(receipt.created_at)
        .execute(&mut *tx)
        .await?;

        let mut saved_items = Vec::with_capacity(items.len());
        for item in items {
            let row = ReceiptItem {
                id: new_id(),
                receipt_id: receipt.id.clone(),
                product_id: item.product_id.clone(),
                product_name: item.product_name.clone(),
                product_sku: item.product_sku.clone(),
                quantity: item.quantity,
                unit_price_cents: item.unit_price_cents,
                total_price_cents: item.unit_price_cents * item.quantity,
            };

            sqlx::query(
                "INSERT INTO receipt_items (id, receipt_id, product_id, product_name, \
                 product_sku, quantity, unit_price_cents, total_price_cents) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            )
            .bind(&row.id)
            .bind(&row.receipt_id)
            .bind(&row.product_id)
            .bind(&row.product_name)
            .bind(&row.product_sku)
            .bind(row.quantity)
            .bind(row.unit_price_cents)
            .bind(row.total_price_cents)
            .execute(&mut *tx)
            .await?;

            saved_items.push(row);
        }

        tx.commit().await?;

        Ok(ReceiptWithItems { receipt, items: saved_items })
    }

    /// Gets a receipt with its items.
    pub async fn get_with_items(&self, id: &str) -> DbResult<Option<ReceiptWithItems>> {
        let receipt = sqlx::query_as::<_, Receipt>(&format!(
            "SELECT {RECEIPT_COLUMNS} FROM receipts WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(receipt) = receipt else {
            return Ok(None);
        };

        let items = sqlx::query_as::<_, ReceiptItem>(&format!(
            "SELECT {ITEM_COLUMNS} FROM receipt_items WHERE receipt_id = ?1 ORDER BY id"
        ))
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        Ok(Some(ReceiptWithItems { receipt, items }))
    }

    /// Lists receipt headers, newest first.
    pub async fn list(&self) -> DbResult<Vec<Receipt>> {
        let receipts = sqlx::query_as::<_, Receipt>(&format!(
            "SELECT {RECEIPT_COLUMNS} FROM receipts ORDER BY created_at DESC, id"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(receipts)
    }

    /// Deletes a receipt; its items cascade.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting receipt");

        let result = sqlx::query("DELETE FROM receipts WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Receipt", id));
        }

        Ok(())
    }
}

/// `RCP-` plus the low-order timestamp digits, with the attempt folded in
/// so a retry never reproduces the colliding number within the same
/// millisecond.
fn generate_receipt_number(attempt: u32) -> String {
    let millis = Utc::now().timestamp_millis() as u64 + attempt as u64;
    format!("RCP-{:08}", millis % 100_000_000)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use crate::repository::product::NewProduct;
    use shopfront_core::ValidationError;

    async fn db() -> Database {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.categories()
            .insert("Electronics", "ELEC", None, None)
            .await
            .unwrap();
        db
    }

    fn tax_825() -> NewReceipt {
        NewReceipt { tax_rate_bps: 825, ..Default::default() }
    }

    #[tokio::test]
    async fn worked_example_persists_recomputed_totals() {
        let db = db().await;
        let products = db.products();

        let mut widget = NewProduct::new("Widget", "ELEC", 1000);
        widget.stock_quantity = 10;
        let widget = products.insert_with_generated_sku(&widget).await.unwrap();
        let gadget = products
            .insert_with_generated_sku(&NewProduct::new("Gadget", "ELEC", 500))
            .await
            .unwrap();

        let created = db
            .receipts()
            .create(
                &tax_825(),
                &[
                    NewReceiptItem::from_product(&widget, 2),
                    NewReceiptItem::from_product(&gadget, 1),
                ],
            )
            .await
            .unwrap();

        assert_eq!(created.receipt.subtotal_cents, 2500);
        assert_eq!(created.receipt.discount_cents, 0);
        assert_eq!(created.receipt.tax_cents, 206);
        assert_eq!(created.receipt.total_cents, 2706);
        assert!(created.receipt.receipt_number.starts_with("RCP-"));

        let fetched = db
            .receipts()
            .get_with_items(&created.receipt.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(fetched.items.len(), 2);
        assert_eq!(fetched.receipt.total_cents, 2706);
    }

    #[tokio::test]
    async fn discount_applies_before_tax() {
        let db = db().await;
        let product = db
            .products()
            .insert_with_generated_sku(&NewProduct::new("Big", "ELEC", 10000))
            .await
            .unwrap();

        let header = NewReceipt {
            tax_rate_bps: 1000,
            discount_rate_bps: 1000,
            ..Default::default()
        };
        let created = db
            .receipts()
            .create(&header, &[NewReceiptItem::from_product(&product, 1)])
            .await
            .unwrap();

        assert_eq!(created.receipt.discount_cents, 1000);
        assert_eq!(created.receipt.tax_cents, 900);
        assert_eq!(created.receipt.total_cents, 9900);
    }

    #[tokio::test]
    async fn rejected_items_leave_nothing_persisted() {
        let db = db().await;

        let err = db.receipts().create(&tax_825(), &[]).await.unwrap_err();
        assert!(matches!(
            err,
            DbError::Validation(ValidationError::Required { field: "items" })
        ));

        let bad_item = NewReceiptItem {
            product_id: "p1".to_string(),
            product_name: "Ghost".to_string(),
            product_sku: "G-1".to_string(),
            quantity: 0,
            unit_price_cents: 100,
        };
        let err = db.receipts().create(&tax_825(), &[bad_item]).await.unwrap_err();
        assert!(matches!(
            err,
            DbError::Validation(ValidationError::NotPositive { field: "quantity" })
        ));

        assert!(db.receipts().list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn totals_survive_product_deletion() {
        let db = db().await;
        let product = db
            .products()
            .insert_with_generated_sku(&NewProduct::new("Ephemeral", "ELEC", 1234))
            .await
            .unwrap();

        let created = db
            .receipts()
            .create(&tax_825(), &[NewReceiptItem::from_product(&product, 2)])
            .await
            .unwrap();

        db.products().delete(&product.id).await.unwrap();

        let fetched = db
            .receipts()
            .get_with_items(&created.receipt.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(fetched.receipt.subtotal_cents, 2468);
        assert_eq!(fetched.items.len(), 1);
        assert_eq!(fetched.items[0].product_name, "Ephemeral");
        assert_eq!(fetched.items[0].product_id, product.id);
    }

    #[tokio::test]
    async fn delete_cascades_items() {
        let db = db().await;
        let product = db
            .products()
            .insert_with_generated_sku(&NewProduct::new("Thing", "ELEC", 100))
            .await
            .unwrap();

        let created = db
            .receipts()
            .create(&NewReceipt::default(), &[NewReceiptItem::from_product(&product, 1)])
            .await
            .unwrap();

        db.receipts().delete(&created.receipt.id).await.unwrap();

        let orphans: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM receipt_items")
            .fetch_one(db.pool())
            .await
            .unwrap();
        assert_eq!(orphans, 0);
        assert!(db.receipts().get_with_items(&created.receipt.id).await.unwrap().is_none());
    }
}
