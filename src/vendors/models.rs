use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::validation::{validate_code, validate_not_blank};

/// A supplier with contact details and cached performance metrics
///
/// The four metric fields are written only by the metrics recalculation;
/// `None` means there is not yet any order data to compute them from.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Vendor {
    #[schema(example = 1)]
    pub id: i64,
    #[schema(example = "Acme Supplies")]
    pub name: String,
    #[schema(example = "123-456-7890")]
    pub contact_details: String,
    #[schema(example = "123 Main St")]
    pub address: String,
    #[schema(example = "ABC123")]
    pub vendor_code: String,
    pub on_time_delivery_rate: Option<f64>,
    pub quality_rating_avg: Option<f64>,
    pub average_response_time: Option<f64>,
    pub fulfillment_rate: Option<f64>,
}

/// Request body for creating a vendor or replacing one with PUT
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct VendorRequest {
    #[validate(length(min = 1, max = 255), custom = "validate_not_blank")]
    #[schema(example = "Acme Supplies")]
    pub name: String,
    #[validate(custom = "validate_not_blank")]
    #[schema(example = "123-456-7890")]
    pub contact_details: String,
    #[validate(custom = "validate_not_blank")]
    #[schema(example = "123 Main St")]
    pub address: String,
    #[validate(length(min = 1, max = 50), custom = "validate_code")]
    #[schema(example = "ABC123")]
    pub vendor_code: String,
}

/// Request body for PATCH; omitted fields keep their current value
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct VendorPatch {
    #[validate(length(min = 1, max = 255), custom = "validate_not_blank")]
    pub name: Option<String>,
    #[validate(custom = "validate_not_blank")]
    pub contact_details: Option<String>,
    #[validate(custom = "validate_not_blank")]
    pub address: Option<String>,
    #[validate(length(min = 1, max = 50), custom = "validate_code")]
    pub vendor_code: Option<String>,
}

impl VendorPatch {
    /// Merge the patch over an existing vendor into a full request
    pub fn apply_to(self, existing: &Vendor) -> VendorRequest {
        VendorRequest {
            name: self.name.unwrap_or_else(|| existing.name.clone()),
            contact_details: self
                .contact_details
                .unwrap_or_else(|| existing.contact_details.clone()),
            address: self.address.unwrap_or_else(|| existing.address.clone()),
            vendor_code: self.vendor_code.unwrap_or_else(|| existing.vendor_code.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_vendor() -> Vendor {
        Vendor {
            id: 1,
            name: "Test Vendor".to_string(),
            contact_details: "123-456-7890".to_string(),
            address: "123 Main St".to_string(),
            vendor_code: "ABC123".to_string(),
            on_time_delivery_rate: None,
            quality_rating_avg: Some(4.25),
            average_response_time: None,
            fulfillment_rate: Some(50.0),
        }
    }

    #[test]
    fn test_vendor_serializes_missing_metrics_as_null() {
        let json = serde_json::to_value(sample_vendor()).unwrap();
        assert_eq!(json["vendor_code"], "ABC123");
        assert!(json["on_time_delivery_rate"].is_null());
        assert_eq!(json["quality_rating_avg"], 4.25);
        assert_eq!(json["fulfillment_rate"], 50.0);
    }

    #[test]
    fn test_request_ignores_metric_fields() {
        let request: VendorRequest = serde_json::from_value(serde_json::json!({
            "name": "Test Vendor",
            "contact_details": "123-456-7890",
            "address": "123 Main St",
            "vendor_code": "ABC123",
            "on_time_delivery_rate": 100.0
        }))
        .unwrap();
        assert!(request.validate().is_ok());
        assert_eq!(request.vendor_code, "ABC123");
    }

    #[test]
    fn test_request_validation() {
        let request = VendorRequest {
            name: "".to_string(),
            contact_details: "x".to_string(),
            address: "y".to_string(),
            vendor_code: "BAD CODE".to_string(),
        };
        let errors = request.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("name"));
        assert!(fields.contains_key("vendor_code"));
        assert!(!fields.contains_key("address"));
    }

    #[test]
    fn test_patch_keeps_omitted_fields() {
        let patch = VendorPatch {
            name: Some("Renamed".to_string()),
            ..Default::default()
        };
        let merged = patch.apply_to(&sample_vendor());
        assert_eq!(merged.name, "Renamed");
        assert_eq!(merged.vendor_code, "ABC123");
        assert_eq!(merged.address, "123 Main St");
    }
}
