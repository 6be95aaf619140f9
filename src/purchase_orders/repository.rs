use chrono::{DateTime, Utc};
use sqlx::{types::Json, PgExecutor};

use crate::error::ApiError;
use crate::purchase_orders::{PurchaseOrder, PurchaseOrderWrite};
use crate::query::ValidatedQuery;

const PURCHASE_ORDER_COLUMNS: &str = "id, po_number, vendor_id, order_date, delivery_date, items, \
     quantity, status, quality_rating, issue_date, acknowledgment_date";

/// Repository for purchase-order rows
pub struct PurchaseOrderRepository;

impl PurchaseOrderRepository {
    /// Insert a purchase order
    pub async fn insert<'e, E: PgExecutor<'e>>(
        executor: E,
        write: &PurchaseOrderWrite,
    ) -> Result<PurchaseOrder, ApiError> {
        let order = sqlx::query_as::<_, PurchaseOrder>(&format!(
            "INSERT INTO purchase_orders \
                 (po_number, vendor_id, order_date, delivery_date, items, quantity, status, \
                  quality_rating, issue_date) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) RETURNING {}",
            PURCHASE_ORDER_COLUMNS
        ))
        .bind(&write.po_number)
        .bind(write.vendor)
        .bind(write.order_date)
        .bind(write.delivery_date)
        .bind(Json(&write.items))
        .bind(write.quantity)
        .bind(write.status.as_str())
        .bind(write.quality_rating)
        .bind(write.issue_date)
        .fetch_one(executor)
        .await?;

        Ok(order)
    }

    /// List purchase orders with the validated filter and ordering
    pub async fn list<'e, E: PgExecutor<'e>>(
        executor: E,
        query: &ValidatedQuery,
    ) -> Result<Vec<PurchaseOrder>, ApiError> {
        let (sql, params) = query.to_builder(PURCHASE_ORDER_COLUMNS).build();

        let mut db_query = sqlx::query_as::<_, PurchaseOrder>(&sql);
        for param in params {
            db_query = db_query.bind(param);
        }

        let orders = db_query.fetch_all(executor).await?;
        Ok(orders)
    }

    /// Find a purchase order by id
    pub async fn find_by_id<'e, E: PgExecutor<'e>>(executor: E, id: i64) -> Result<Option<PurchaseOrder>, ApiError> {
        let order = sqlx::query_as::<_, PurchaseOrder>(&format!(
            "SELECT {} FROM purchase_orders WHERE id = $1",
            PURCHASE_ORDER_COLUMNS
        ))
        .bind(id)
        .fetch_optional(executor)
        .await?;

        Ok(order)
    }

    /// Find a purchase order and lock its row until the surrounding transaction ends
    pub async fn lock_by_id<'e, E: PgExecutor<'e>>(executor: E, id: i64) -> Result<Option<PurchaseOrder>, ApiError> {
        let order = sqlx::query_as::<_, PurchaseOrder>(&format!(
            "SELECT {} FROM purchase_orders WHERE id = $1 FOR UPDATE",
            PURCHASE_ORDER_COLUMNS
        ))
        .bind(id)
        .fetch_optional(executor)
        .await?;

        Ok(order)
    }

    /// Overwrite the client-writable fields of a purchase order
    pub async fn update<'e, E: PgExecutor<'e>>(
        executor: E,
        id: i64,
        write: &PurchaseOrderWrite,
    ) -> Result<Option<PurchaseOrder>, ApiError> {
        let order = sqlx::query_as::<_, PurchaseOrder>(&format!(
            "UPDATE purchase_orders SET po_number = $1, vendor_id = $2, order_date = $3, \
                 delivery_date = $4, items = $5, quantity = $6, status = $7, \
                 quality_rating = $8, issue_date = $9 \
             WHERE id = $10 RETURNING {}",
            PURCHASE_ORDER_COLUMNS
        ))
        .bind(&write.po_number)
        .bind(write.vendor)
        .bind(write.order_date)
        .bind(write.delivery_date)
        .bind(Json(&write.items))
        .bind(write.quantity)
        .bind(write.status.as_str())
        .bind(write.quality_rating)
        .bind(write.issue_date)
        .bind(id)
        .fetch_optional(executor)
        .await?;

        Ok(order)
    }

    /// Record an acknowledgment and the derived delivery date
    pub async fn set_acknowledgment<'e, E: PgExecutor<'e>>(
        executor: E,
        id: i64,
        acknowledged_at: DateTime<Utc>,
        delivery_date: DateTime<Utc>,
    ) -> Result<Option<PurchaseOrder>, ApiError> {
        let order = sqlx::query_as::<_, PurchaseOrder>(&format!(
            "UPDATE purchase_orders SET acknowledgment_date = $1, delivery_date = $2 \
             WHERE id = $3 RETURNING {}",
            PURCHASE_ORDER_COLUMNS
        ))
        .bind(acknowledged_at)
        .bind(delivery_date)
        .bind(id)
        .fetch_optional(executor)
        .await?;

        Ok(order)
    }

    /// Delete a purchase order, returning the id of the vendor it belonged to
    pub async fn delete<'e, E: PgExecutor<'e>>(executor: E, id: i64) -> Result<Option<i64>, ApiError> {
        let vendor_id: Option<i64> = sqlx::query_scalar("DELETE FROM purchase_orders WHERE id = $1 RETURNING vendor_id")
            .bind(id)
            .fetch_optional(executor)
            .await?;

        Ok(vendor_id)
    }
}
