use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{types::Json, FromRow};
use utoipa::ToSchema;
use validator::Validate;

use crate::purchase_orders::LineItemCalculator;
use crate::validation::{validate_code, validate_not_blank, validate_quality_rating, validate_unit_price};

/// Purchase order status
///
/// Transitions are driven by clients; any status may follow any other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum PurchaseOrderStatus {
    #[default]
    Pending,
    Completed,
    Canceled,
}

impl PurchaseOrderStatus {
    /// Convert to the stored string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            PurchaseOrderStatus::Pending => "pending",
            PurchaseOrderStatus::Completed => "completed",
            PurchaseOrderStatus::Canceled => "canceled",
        }
    }
}

/// A status string that is not one of the known values
#[derive(Debug, thiserror::Error)]
#[error("unknown purchase order status: {0}")]
pub struct UnknownStatus(pub String);

impl TryFrom<String> for PurchaseOrderStatus {
    type Error = UnknownStatus;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "pending" => Ok(PurchaseOrderStatus::Pending),
            "completed" => Ok(PurchaseOrderStatus::Completed),
            "canceled" => Ok(PurchaseOrderStatus::Canceled),
            _ => Err(UnknownStatus(value)),
        }
    }
}

/// One line of a purchase order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
pub struct LineItem {
    #[validate(length(min = 1, max = 255), custom = "validate_not_blank")]
    #[schema(example = "Widget")]
    pub name: String,
    #[validate(range(min = 1))]
    #[schema(example = 10)]
    pub quantity: i32,
    #[serde(with = "rust_decimal::serde::float")]
    #[validate(custom = "validate_unit_price")]
    #[schema(value_type = f64, example = 4.5)]
    pub unit_price: Decimal,
}

/// Database row of a purchase order
#[derive(Debug, Clone, FromRow)]
pub struct PurchaseOrder {
    pub id: i64,
    pub po_number: String,
    #[sqlx(rename = "vendor_id")]
    pub vendor: i64,
    pub order_date: DateTime<Utc>,
    pub delivery_date: Option<DateTime<Utc>>,
    pub items: Json<Vec<LineItem>>,
    pub quantity: i32,
    #[sqlx(try_from = "String")]
    pub status: PurchaseOrderStatus,
    pub quality_rating: Option<f64>,
    pub issue_date: DateTime<Utc>,
    pub acknowledgment_date: Option<DateTime<Utc>>,
}

/// Purchase order as returned by the API, with its derived total value
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PurchaseOrderResponse {
    #[schema(example = 1)]
    pub id: i64,
    #[schema(example = "PO-2024-0001")]
    pub po_number: String,
    #[schema(example = 1)]
    pub vendor: i64,
    pub order_date: DateTime<Utc>,
    pub delivery_date: Option<DateTime<Utc>>,
    pub items: Vec<LineItem>,
    pub quantity: i32,
    pub status: PurchaseOrderStatus,
    pub quality_rating: Option<f64>,
    pub issue_date: DateTime<Utc>,
    pub acknowledgment_date: Option<DateTime<Utc>>,
    /// Sum of quantity × unit_price over all items
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64, example = 45.0)]
    pub total_value: Decimal,
}

impl From<PurchaseOrder> for PurchaseOrderResponse {
    fn from(order: PurchaseOrder) -> Self {
        let items = order.items.0;
        let total_value = LineItemCalculator::total_value(&items);

        Self {
            id: order.id,
            po_number: order.po_number,
            vendor: order.vendor,
            order_date: order.order_date,
            delivery_date: order.delivery_date,
            items,
            quantity: order.quantity,
            status: order.status,
            quality_rating: order.quality_rating,
            issue_date: order.issue_date,
            acknowledgment_date: order.acknowledgment_date,
            total_value,
        }
    }
}

/// Request body for creating a purchase order or replacing one with PUT
///
/// Optional fields fall back to a default on create (`now`, `pending`) and to
/// the stored value on PUT. `acknowledgment_date` is not accepted.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PurchaseOrderRequest {
    #[schema(example = "PO-2024-0001")]
    pub po_number: String,
    #[schema(example = 1)]
    pub vendor: i64,
    pub order_date: Option<DateTime<Utc>>,
    pub delivery_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub items: Vec<LineItem>,
    #[schema(example = 10)]
    pub quantity: i32,
    pub status: Option<PurchaseOrderStatus>,
    #[schema(example = 4.5)]
    pub quality_rating: Option<f64>,
    pub issue_date: Option<DateTime<Utc>>,
}

impl PurchaseOrderRequest {
    /// Resolve a create request, defaulting dates to `now`
    pub fn into_new(self, now: DateTime<Utc>) -> PurchaseOrderWrite {
        PurchaseOrderWrite {
            po_number: self.po_number,
            vendor: self.vendor,
            order_date: self.order_date.unwrap_or(now),
            delivery_date: self.delivery_date,
            items: self.items,
            quantity: self.quantity,
            status: self.status.unwrap_or_default(),
            quality_rating: self.quality_rating,
            issue_date: self.issue_date.unwrap_or(now),
        }
    }

    /// Resolve a PUT request over the stored order
    pub fn into_replacement(self, existing: &PurchaseOrder) -> PurchaseOrderWrite {
        PurchaseOrderWrite {
            po_number: self.po_number,
            vendor: self.vendor,
            order_date: self.order_date.unwrap_or(existing.order_date),
            delivery_date: self.delivery_date.or(existing.delivery_date),
            items: self.items,
            quantity: self.quantity,
            status: self.status.unwrap_or(existing.status),
            quality_rating: self.quality_rating.or(existing.quality_rating),
            issue_date: self.issue_date.unwrap_or(existing.issue_date),
        }
    }
}

/// Request body for PATCH; omitted fields keep their current value
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct PurchaseOrderPatch {
    pub po_number: Option<String>,
    pub vendor: Option<i64>,
    pub order_date: Option<DateTime<Utc>>,
    pub delivery_date: Option<DateTime<Utc>>,
    pub items: Option<Vec<LineItem>>,
    pub quantity: Option<i32>,
    pub status: Option<PurchaseOrderStatus>,
    pub quality_rating: Option<f64>,
    pub issue_date: Option<DateTime<Utc>>,
}

impl PurchaseOrderPatch {
    /// Merge the patch over the stored order
    pub fn apply_to(self, existing: &PurchaseOrder) -> PurchaseOrderWrite {
        PurchaseOrderWrite {
            po_number: self.po_number.unwrap_or_else(|| existing.po_number.clone()),
            vendor: self.vendor.unwrap_or(existing.vendor),
            order_date: self.order_date.unwrap_or(existing.order_date),
            delivery_date: self.delivery_date.or(existing.delivery_date),
            items: self.items.unwrap_or_else(|| existing.items.0.clone()),
            quantity: self.quantity.unwrap_or(existing.quantity),
            status: self.status.unwrap_or(existing.status),
            quality_rating: self.quality_rating.or(existing.quality_rating),
            issue_date: self.issue_date.unwrap_or(existing.issue_date),
        }
    }
}

/// The client-writable fields of a purchase order after defaults are applied
///
/// Create, PUT and PATCH all validate and store this shape.
#[derive(Debug, Clone, Validate)]
pub struct PurchaseOrderWrite {
    #[validate(length(min = 1, max = 50), custom = "validate_code")]
    pub po_number: String,
    pub vendor: i64,
    pub order_date: DateTime<Utc>,
    pub delivery_date: Option<DateTime<Utc>>,
    #[validate]
    pub items: Vec<LineItem>,
    #[validate(range(min = 1))]
    pub quantity: i32,
    pub status: PurchaseOrderStatus,
    #[validate(custom = "validate_quality_rating")]
    pub quality_rating: Option<f64>,
    pub issue_date: DateTime<Utc>,
}
