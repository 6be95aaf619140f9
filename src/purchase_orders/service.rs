use chrono::{DateTime, Utc};
use sqlx::{PgConnection, PgPool};
use tracing::{debug, info, warn};
use validator::Validate;

use crate::error::ApiError;
use crate::performance::MetricsRecalculator;
use crate::purchase_orders::{
    Acknowledgment, PurchaseOrder, PurchaseOrderPatch, PurchaseOrderRepository, PurchaseOrderRequest,
    PurchaseOrderResponse, PurchaseOrderStatus, PurchaseOrderWrite,
};
use crate::query::{PurchaseOrderQuery, QueryValidator};
use crate::vendors::VendorRepository;

/// Service for purchase-order business logic
///
/// Every write runs in one transaction together with the metric
/// recalculation of the affected vendor(s); either both commit or neither.
#[derive(Clone)]
pub struct PurchaseOrderService {
    pool: PgPool,
}

impl PurchaseOrderService {
    /// Create a new PurchaseOrderService
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a purchase order and recalculate its vendor's metrics
    pub async fn create(&self, request: PurchaseOrderRequest) -> Result<PurchaseOrderResponse, ApiError> {
        let now = Utc::now();
        let write = request.into_new(now);
        write.validate()?;

        let mut tx = self.pool.begin().await?;
        Self::ensure_vendor_exists(&mut tx, write.vendor).await?;

        let order = PurchaseOrderRepository::insert(&mut *tx, &write).await?;
        MetricsRecalculator::recalculate(&mut tx, order.vendor, now).await?;

        tx.commit().await?;

        info!("Created purchase order {} ({}) for vendor {}", order.id, order.po_number, order.vendor);
        Ok(order.into())
    }

    /// List purchase orders, optionally filtered by vendor and ordered
    pub async fn list(&self, params: PurchaseOrderQuery) -> Result<Vec<PurchaseOrderResponse>, ApiError> {
        let query = QueryValidator::validate(params).map_err(|e| ApiError::BadRequest(e.message))?;

        let orders = PurchaseOrderRepository::list(&self.pool, &query).await?;
        debug!("Retrieved {} purchase orders", orders.len());
        Ok(orders.into_iter().map(PurchaseOrderResponse::from).collect())
    }

    /// Get a single purchase order
    pub async fn get(&self, id: i64) -> Result<PurchaseOrderResponse, ApiError> {
        let order = PurchaseOrderRepository::find_by_id(&self.pool, id)
            .await?
            .ok_or_else(|| ApiError::not_found("PurchaseOrder", id))?;

        Ok(order.into())
    }

    /// Replace a purchase order (PUT)
    pub async fn update(&self, id: i64, request: PurchaseOrderRequest) -> Result<PurchaseOrderResponse, ApiError> {
        self.rewrite(id, |existing| request.into_replacement(existing)).await
    }

    /// Partially update a purchase order (PATCH)
    pub async fn patch(&self, id: i64, patch: PurchaseOrderPatch) -> Result<PurchaseOrderResponse, ApiError> {
        self.rewrite(id, |existing| patch.apply_to(existing)).await
    }

    /// Delete a purchase order and recalculate its former vendor's metrics
    pub async fn delete(&self, id: i64) -> Result<(), ApiError> {
        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        let vendor_id = PurchaseOrderRepository::delete(&mut *tx, id)
            .await?
            .ok_or_else(|| ApiError::not_found("PurchaseOrder", id))?;
        MetricsRecalculator::recalculate(&mut tx, vendor_id, now).await?;

        tx.commit().await?;

        info!("Deleted purchase order {} of vendor {}", id, vendor_id);
        Ok(())
    }

    /// Acknowledge a purchase order
    ///
    /// Sets `acknowledgment_date` to now, derives the delivery date from it
    /// and recalculates the vendor's metrics, including the average response
    /// time. The order's status is not consulted and repeated
    /// acknowledgments overwrite both dates.
    pub async fn acknowledge(&self, id: i64) -> Result<PurchaseOrderResponse, ApiError> {
        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        let existing = PurchaseOrderRepository::lock_by_id(&mut *tx, id)
            .await?
            .ok_or_else(|| ApiError::not_found("PurchaseOrder", id))?;

        if existing.status != PurchaseOrderStatus::Pending {
            warn!("Acknowledging purchase order {} with status {}", id, existing.status.as_str());
        }
        if let Some(previous) = existing.acknowledgment_date {
            warn!("Purchase order {} was already acknowledged at {}, overwriting", id, previous);
        }

        let ack = Acknowledgment::at(now);
        let order = PurchaseOrderRepository::set_acknowledgment(&mut *tx, id, ack.acknowledged_at, ack.delivery_date)
            .await?
            .ok_or_else(|| ApiError::not_found("PurchaseOrder", id))?;
        MetricsRecalculator::recalculate(&mut tx, order.vendor, now).await?;

        tx.commit().await?;

        info!("Acknowledged purchase order {}, delivery expected {}", id, ack.delivery_date);
        Ok(order.into())
    }

    /// Shared path of PUT and PATCH: lock, merge, validate, store, recalculate
    async fn rewrite<F>(&self, id: i64, merge: F) -> Result<PurchaseOrderResponse, ApiError>
    where
        F: FnOnce(&PurchaseOrder) -> PurchaseOrderWrite,
    {
        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        let existing = PurchaseOrderRepository::lock_by_id(&mut *tx, id)
            .await?
            .ok_or_else(|| ApiError::not_found("PurchaseOrder", id))?;

        let write = merge(&existing);
        write.validate()?;
        if write.vendor != existing.vendor {
            Self::ensure_vendor_exists(&mut tx, write.vendor).await?;
        }

        let order = PurchaseOrderRepository::update(&mut *tx, id, &write)
            .await?
            .ok_or_else(|| ApiError::not_found("PurchaseOrder", id))?;
        Self::recalculate_affected(&mut tx, existing.vendor, order.vendor, now).await?;

        tx.commit().await?;

        info!("Updated purchase order {}", id);
        Ok(order.into())
    }

    /// Recalculate the old and new vendor of an order, in id order
    async fn recalculate_affected(
        conn: &mut PgConnection,
        previous_vendor: i64,
        current_vendor: i64,
        now: DateTime<Utc>,
    ) -> Result<(), ApiError> {
        let mut vendors = vec![previous_vendor, current_vendor];
        vendors.sort_unstable();
        vendors.dedup();

        for vendor_id in vendors {
            MetricsRecalculator::recalculate(conn, vendor_id, now).await?;
        }
        Ok(())
    }

    /// An order referencing a missing vendor is a client error, not a 404
    async fn ensure_vendor_exists(conn: &mut PgConnection, vendor_id: i64) -> Result<(), ApiError> {
        if VendorRepository::exists(&mut *conn, vendor_id).await? {
            Ok(())
        } else {
            Err(ApiError::BadRequest(format!("Vendor with id {} does not exist", vendor_id)))
        }
    }
}
