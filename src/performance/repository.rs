use chrono::{DateTime, Utc};
use sqlx::PgExecutor;

use crate::error::ApiError;
use crate::performance::{HistoricalPerformance, OrderSnapshot, VendorMetrics};

/// Reads and writes for the cached vendor metrics and their history
pub struct PerformanceRepository;

impl PerformanceRepository {
    /// Lock a vendor row against concurrent recalculation
    ///
    /// `FOR NO KEY UPDATE` serializes recalculations of one vendor, so each
    /// one sees every previously committed order, without conflicting with
    /// the key-share locks taken by order inserts referencing the vendor.
    /// Returns `false` when the vendor does not exist.
    pub async fn lock_vendor<'e, E: PgExecutor<'e>>(executor: E, vendor_id: i64) -> Result<bool, ApiError> {
        let locked: Option<i64> = sqlx::query_scalar("SELECT id FROM vendors WHERE id = $1 FOR NO KEY UPDATE")
            .bind(vendor_id)
            .fetch_optional(executor)
            .await?;

        Ok(locked.is_some())
    }

    /// Load the metric-relevant fields of every order of a vendor
    pub async fn order_snapshots<'e, E: PgExecutor<'e>>(
        executor: E,
        vendor_id: i64,
    ) -> Result<Vec<OrderSnapshot>, ApiError> {
        let snapshots = sqlx::query_as::<_, OrderSnapshot>(
            r#"
            SELECT status, delivery_date, quality_rating, issue_date, acknowledgment_date
            FROM purchase_orders
            WHERE vendor_id = $1
            "#,
        )
        .bind(vendor_id)
        .fetch_all(executor)
        .await?;

        Ok(snapshots)
    }

    /// Store freshly computed metrics on the vendor row
    ///
    /// `average_response_time` keeps its stored value when no order of the
    /// vendor has been acknowledged. Returns the metrics as stored.
    pub async fn store_metrics<'e, E: PgExecutor<'e>>(
        executor: E,
        vendor_id: i64,
        metrics: &VendorMetrics,
    ) -> Result<Option<VendorMetrics>, ApiError> {
        let stored: Option<(Option<f64>, Option<f64>, Option<f64>, Option<f64>)> = sqlx::query_as(
            r#"
            UPDATE vendors
            SET on_time_delivery_rate = $1,
                quality_rating_avg = $2,
                average_response_time = COALESCE($3, average_response_time),
                fulfillment_rate = $4
            WHERE id = $5
            RETURNING on_time_delivery_rate, quality_rating_avg, average_response_time, fulfillment_rate
            "#,
        )
        .bind(metrics.on_time_delivery_rate)
        .bind(metrics.quality_rating_avg)
        .bind(metrics.average_response_time)
        .bind(metrics.fulfillment_rate)
        .bind(vendor_id)
        .fetch_optional(executor)
        .await?;

        Ok(stored.map(
            |(on_time_delivery_rate, quality_rating_avg, average_response_time, fulfillment_rate)| VendorMetrics {
                on_time_delivery_rate,
                quality_rating_avg,
                average_response_time,
                fulfillment_rate,
            },
        ))
    }

    /// Append a history snapshot
    pub async fn record_snapshot<'e, E: PgExecutor<'e>>(
        executor: E,
        vendor_id: i64,
        date: DateTime<Utc>,
        metrics: &VendorMetrics,
    ) -> Result<HistoricalPerformance, ApiError> {
        let entry = sqlx::query_as::<_, HistoricalPerformance>(
            r#"
            INSERT INTO historical_performance
                (vendor_id, date, on_time_delivery_rate, quality_rating_avg,
                 average_response_time, fulfillment_rate)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, vendor_id, date, on_time_delivery_rate, quality_rating_avg,
                      average_response_time, fulfillment_rate
            "#,
        )
        .bind(vendor_id)
        .bind(date)
        .bind(metrics.on_time_delivery_rate)
        .bind(metrics.quality_rating_avg)
        .bind(metrics.average_response_time)
        .bind(metrics.fulfillment_rate)
        .fetch_one(executor)
        .await?;

        Ok(entry)
    }

    /// History of a vendor, newest first
    pub async fn list_history<'e, E: PgExecutor<'e>>(
        executor: E,
        vendor_id: i64,
    ) -> Result<Vec<HistoricalPerformance>, ApiError> {
        let entries = sqlx::query_as::<_, HistoricalPerformance>(
            r#"
            SELECT id, vendor_id, date, on_time_delivery_rate, quality_rating_avg,
                   average_response_time, fulfillment_rate
            FROM historical_performance
            WHERE vendor_id = $1
            ORDER BY date DESC, id DESC
            "#,
        )
        .bind(vendor_id)
        .fetch_all(executor)
        .await?;

        Ok(entries)
    }
}
