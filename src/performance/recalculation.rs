use chrono::{DateTime, Utc};
use sqlx::PgConnection;
use tracing::debug;

use crate::error::ApiError;
use crate::performance::{MetricsEngine, PerformanceRepository, VendorMetrics};

/// Recomputes a vendor's cached metrics after one of its orders changed
pub struct MetricsRecalculator;

impl MetricsRecalculator {
    /// Recalculate and store all four metrics of a vendor
    ///
    /// Runs on the caller's connection, normally the transaction that wrote
    /// the order, so the order write and the metric update commit together.
    /// A history snapshot of the stored values is appended as well.
    pub async fn recalculate(
        conn: &mut PgConnection,
        vendor_id: i64,
        now: DateTime<Utc>,
    ) -> Result<VendorMetrics, ApiError> {
        if !PerformanceRepository::lock_vendor(&mut *conn, vendor_id).await? {
            return Err(ApiError::not_found("Vendor", vendor_id));
        }

        let orders = PerformanceRepository::order_snapshots(&mut *conn, vendor_id).await?;
        let computed = MetricsEngine::compute(&orders, now);

        let stored = PerformanceRepository::store_metrics(&mut *conn, vendor_id, &computed)
            .await?
            .ok_or_else(|| ApiError::not_found("Vendor", vendor_id))?;

        PerformanceRepository::record_snapshot(&mut *conn, vendor_id, now, &stored).await?;

        debug!(
            "Recalculated metrics for vendor {} over {} orders: {:?}",
            vendor_id,
            orders.len(),
            stored
        );
        Ok(stored)
    }
}
