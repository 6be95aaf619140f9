use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::vendors::Vendor;

/// The four cached metrics of a vendor, as served by the performance endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct VendorPerformance {
    #[schema(example = 95.5)]
    pub on_time_delivery_rate: Option<f64>,
    #[schema(example = 4.2)]
    pub quality_rating_avg: Option<f64>,
    #[schema(example = 1.75)]
    pub average_response_time: Option<f64>,
    #[schema(example = 88.0)]
    pub fulfillment_rate: Option<f64>,
}

impl From<&Vendor> for VendorPerformance {
    fn from(vendor: &Vendor) -> Self {
        Self {
            on_time_delivery_rate: vendor.on_time_delivery_rate,
            quality_rating_avg: vendor.quality_rating_avg,
            average_response_time: vendor.average_response_time,
            fulfillment_rate: vendor.fulfillment_rate,
        }
    }
}

/// A point-in-time snapshot of a vendor's metrics
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct HistoricalPerformance {
    pub id: i64,
    #[sqlx(rename = "vendor_id")]
    pub vendor: i64,
    pub date: DateTime<Utc>,
    pub on_time_delivery_rate: Option<f64>,
    pub quality_rating_avg: Option<f64>,
    pub average_response_time: Option<f64>,
    pub fulfillment_rate: Option<f64>,
}
