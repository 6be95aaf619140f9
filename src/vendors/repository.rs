use sqlx::PgExecutor;

use crate::error::ApiError;
use crate::vendors::{Vendor, VendorRequest};

const VENDOR_COLUMNS: &str = "id, name, contact_details, address, vendor_code, \
     on_time_delivery_rate, quality_rating_avg, average_response_time, fulfillment_rate";

/// Repository for vendor rows
///
/// Methods take any Postgres executor so they run on the pool or inside a
/// caller's transaction.
pub struct VendorRepository;

impl VendorRepository {
    /// Insert a vendor; metric fields start out NULL
    pub async fn create<'e, E: PgExecutor<'e>>(executor: E, request: &VendorRequest) -> Result<Vendor, ApiError> {
        let vendor = sqlx::query_as::<_, Vendor>(&format!(
            "INSERT INTO vendors (name, contact_details, address, vendor_code) \
             VALUES ($1, $2, $3, $4) RETURNING {}",
            VENDOR_COLUMNS
        ))
        .bind(&request.name)
        .bind(&request.contact_details)
        .bind(&request.address)
        .bind(&request.vendor_code)
        .fetch_one(executor)
        .await?;

        Ok(vendor)
    }

    /// List all vendors ordered by id
    pub async fn list<'e, E: PgExecutor<'e>>(executor: E) -> Result<Vec<Vendor>, ApiError> {
        let vendors = sqlx::query_as::<_, Vendor>(&format!(
            "SELECT {} FROM vendors ORDER BY id",
            VENDOR_COLUMNS
        ))
        .fetch_all(executor)
        .await?;

        Ok(vendors)
    }

    /// Find a vendor by id
    pub async fn find_by_id<'e, E: PgExecutor<'e>>(executor: E, id: i64) -> Result<Option<Vendor>, ApiError> {
        let vendor = sqlx::query_as::<_, Vendor>(&format!(
            "SELECT {} FROM vendors WHERE id = $1",
            VENDOR_COLUMNS
        ))
        .bind(id)
        .fetch_optional(executor)
        .await?;

        Ok(vendor)
    }

    /// Find a vendor and lock its row until the surrounding transaction ends
    pub async fn lock_by_id<'e, E: PgExecutor<'e>>(executor: E, id: i64) -> Result<Option<Vendor>, ApiError> {
        let vendor = sqlx::query_as::<_, Vendor>(&format!(
            "SELECT {} FROM vendors WHERE id = $1 FOR UPDATE",
            VENDOR_COLUMNS
        ))
        .bind(id)
        .fetch_optional(executor)
        .await?;

        Ok(vendor)
    }

    /// Check whether a vendor exists
    pub async fn exists<'e, E: PgExecutor<'e>>(executor: E, id: i64) -> Result<bool, ApiError> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM vendors WHERE id = $1)")
            .bind(id)
            .fetch_one(executor)
            .await?;

        Ok(exists)
    }

    /// Replace the client-owned fields of a vendor, leaving metrics untouched
    pub async fn update<'e, E: PgExecutor<'e>>(
        executor: E,
        id: i64,
        request: &VendorRequest,
    ) -> Result<Option<Vendor>, ApiError> {
        let vendor = sqlx::query_as::<_, Vendor>(&format!(
            "UPDATE vendors SET name = $1, contact_details = $2, address = $3, vendor_code = $4 \
             WHERE id = $5 RETURNING {}",
            VENDOR_COLUMNS
        ))
        .bind(&request.name)
        .bind(&request.contact_details)
        .bind(&request.address)
        .bind(&request.vendor_code)
        .bind(id)
        .fetch_optional(executor)
        .await?;

        Ok(vendor)
    }

    /// Lock every purchase order of a vendor, in id order
    ///
    /// Taken before deleting the vendor so the cascade acquires row locks in
    /// the same order as order writes: order rows first, vendor row second.
    pub async fn lock_orders<'e, E: PgExecutor<'e>>(executor: E, id: i64) -> Result<usize, ApiError> {
        let locked: Vec<i64> =
            sqlx::query_scalar("SELECT id FROM purchase_orders WHERE vendor_id = $1 ORDER BY id FOR UPDATE")
                .bind(id)
                .fetch_all(executor)
                .await?;

        Ok(locked.len())
    }

    /// Delete a vendor; purchase orders and history go with it (ON DELETE CASCADE)
    ///
    /// Returns `false` when no vendor had this id.
    pub async fn delete<'e, E: PgExecutor<'e>>(executor: E, id: i64) -> Result<bool, ApiError> {
        let result = sqlx::query("DELETE FROM vendors WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
