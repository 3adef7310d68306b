use serde::{Deserialize, Serialize};

use crate::{
    domain::{OrderId, PatientId, PractitionerId},
    error::{ApiErrorDetail, Rejection},
};

/// Response envelope every endpoint wraps its payload in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub success: bool,
    pub message: String,
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<ApiErrorDetail>>,
}

impl<T> Envelope<T> {
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: Some(data),
            errors: None,
        }
    }

    pub fn rejected(message: impl Into<String>, errors: Vec<ApiErrorDetail>) -> Self {
        Self {
            success: false,
            message: message.into(),
            data: None,
            errors: Some(errors),
        }
    }

    /// Unwraps the payload, turning `success == false` (and the degenerate
    /// success-without-data case) into a [`Rejection`].
    pub fn into_result(self) -> Result<T, Rejection> {
        if !self.success {
            return Err(Rejection {
                message: self.message,
                errors: self.errors.unwrap_or_default(),
            });
        }
        self.data
            .ok_or_else(|| Rejection::new("response envelope carried no data"))
    }
}

/// One page of a paginated result set.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub total_items: i64,
    pub page_number: u32,
    pub page_size: u32,
    pub total_pages: u32,
    pub has_previous_page: bool,
    pub has_next_page: bool,
    pub items: Vec<T>,
}

/// Body for `Orders/SearchOrders`.
///
/// `start_date`/`end_date` are tri-state on the wire: omitted when no filter
/// set has been applied, explicit `null` when a filter set is applied without
/// that bound, and an ISO date string when chosen. The server distinguishes
/// the three, so the outer `Option` controls presence and the inner one
/// nullability.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchOrdersRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub practitioner_id: Option<PractitionerId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<Option<String>>,
    pub sort_by: String,
    pub page_number: u32,
    pub page_size: u32,
    pub display_uploaded_scans: bool,
}

/// One row of the order search results. `order_id` is the row identity;
/// everything optional is descriptive data the server passes through to the
/// presentation layer untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRecord {
    pub order_id: OrderId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patient_id: Option<PatientId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patient_first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patient_last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_orders: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entry_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completion_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub complete_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modify_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modify_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_create_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub office_location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub practice_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider_account: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub physician_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doctor_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tracking_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shipped_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivery_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shoe_size: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sex: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_left: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_right: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_bl: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub foam_cast: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub in_complete: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub other: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_instructions: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notepad: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attachment_url: Option<String>,
}

/// Body for `Patient` (create).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePatientRequest {
    pub first_name: String,
    pub last_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ssn: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fax: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dob: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight_uom: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shoe_size: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shoe_uom: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub practitioner_id: Option<PractitionerId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub street: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zip: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}

/// Body for `Orders/SubmitOrder`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitOrderRequest {
    pub order_id: OrderId,
}

/// Body for `Orders/SubmitOrderDetails`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOrderStatusRequest {
    pub order_id: OrderId,
    pub order_status: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn date_bounds_keep_absent_null_and_value_distinct() {
        let mut request = SearchOrdersRequest {
            search_text: Some(String::new()),
            sort_by: String::new(),
            page_number: 1,
            page_size: 20,
            ..SearchOrdersRequest::default()
        };

        let wire = serde_json::to_value(&request).expect("serialize");
        assert!(wire.get("startDate").is_none());
        assert!(wire.get("endDate").is_none());

        request.start_date = Some(None);
        request.end_date = Some(Some("2025-03-26".to_string()));
        let wire = serde_json::to_value(&request).expect("serialize");
        assert_eq!(wire["startDate"], serde_json::Value::Null);
        assert_eq!(wire["endDate"], "2025-03-26");
    }

    #[test]
    fn envelope_rejection_carries_error_details() {
        let envelope: Envelope<Page<OrderRecord>> = Envelope::rejected(
            "search failed",
            vec![ApiErrorDetail::new("ORD-401", "practitioner not allowed")],
        );
        let rejection = envelope.into_result().expect_err("must reject");
        assert_eq!(rejection.message, "search failed");
        assert_eq!(rejection.errors[0].code, "ORD-401");
    }

    #[test]
    fn success_envelope_without_data_is_rejected() {
        let envelope = Envelope::<OrderRecord> {
            success: true,
            message: "ok".to_string(),
            data: None,
            errors: None,
        };
        assert!(envelope.into_result().is_err());
    }
}
