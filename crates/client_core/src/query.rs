use chrono::NaiveDate;
use shared::{domain::PractitionerId, protocol::SearchOrdersRequest};

/// Fixed server page size.
pub const PAGE_SIZE: u32 = 20;

/// Tri-state date filter bound.
///
/// The wire format distinguishes a bound that was never part of a filter set
/// (omitted) from one the user left unset inside an applied filter set
/// (explicit null).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DateBound {
    #[default]
    Unfiltered,
    Cleared,
    On(NaiveDate),
}

impl DateBound {
    pub(crate) fn to_wire(self) -> Option<Option<String>> {
        match self {
            DateBound::Unfiltered => None,
            DateBound::Cleared => Some(None),
            DateBound::On(date) => Some(Some(date.format("%Y-%m-%d").to_string())),
        }
    }
}

/// Inputs of one coordinator fetch. Retained verbatim by the coordinator so
/// `load_more` can repeat the previous query with only the page bumped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FetchParams {
    pub status: Option<String>,
    pub search_text: String,
    pub page: u32,
    pub is_searching: bool,
    pub sort_option: Option<String>,
    pub practitioner_id: Option<PractitionerId>,
    pub start_date: DateBound,
    pub end_date: DateBound,
    pub display_uploaded_scans: bool,
}

impl FetchParams {
    pub fn first_page(search_text: impl Into<String>) -> Self {
        Self {
            search_text: search_text.into(),
            page: 1,
            ..Self::default()
        }
    }
}

/// Translates the human sort labels the filter sheet offers into the server's
/// sort codes. Anything unrecognized means "default server ordering".
pub fn sort_code(label: Option<&str>) -> &'static str {
    match label {
        Some("Alphabetical") => "Name",
        Some("Modified recently first") => "ModifyAsc",
        Some("Modified recently last") => "ModifyDesc",
        Some("Latest scan") => "ScanDesc",
        _ => "",
    }
}

pub fn build_search_request(params: &FetchParams) -> SearchOrdersRequest {
    SearchOrdersRequest {
        search_text: Some(params.search_text.clone()),
        status: params.status.clone(),
        practitioner_id: params.practitioner_id,
        start_date: params.start_date.to_wire(),
        end_date: params.end_date.to_wire(),
        sort_by: sort_code(params.sort_option.as_deref()).to_string(),
        page_number: params.page,
        page_size: PAGE_SIZE,
        display_uploaded_scans: params.display_uploaded_scans,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sort_labels_translate_to_server_codes() {
        assert_eq!(sort_code(Some("Alphabetical")), "Name");
        assert_eq!(sort_code(Some("Modified recently first")), "ModifyAsc");
        assert_eq!(sort_code(Some("Modified recently last")), "ModifyDesc");
        assert_eq!(sort_code(Some("Latest scan")), "ScanDesc");
        assert_eq!(sort_code(Some("Random")), "");
        assert_eq!(sort_code(None), "");
    }

    #[test]
    fn search_request_carries_fixed_page_size_and_sort_code() {
        let request = build_search_request(&FetchParams {
            status: Some("Not Scanned".to_string()),
            search_text: "smith".to_string(),
            page: 3,
            sort_option: Some("Latest scan".to_string()),
            ..FetchParams::default()
        });
        assert_eq!(request.search_text.as_deref(), Some("smith"));
        assert_eq!(request.status.as_deref(), Some("Not Scanned"));
        assert_eq!(request.sort_by, "ScanDesc");
        assert_eq!(request.page_number, 3);
        assert_eq!(request.page_size, PAGE_SIZE);
    }

    #[test]
    fn date_bounds_map_to_absent_null_or_value() {
        assert_eq!(DateBound::Unfiltered.to_wire(), None);
        assert_eq!(DateBound::Cleared.to_wire(), Some(None));
        let date = NaiveDate::from_ymd_opt(2025, 3, 26).expect("date");
        assert_eq!(
            DateBound::On(date).to_wire(),
            Some(Some("2025-03-26".to_string()))
        );
    }
}
