use std::sync::Arc;

use chrono::NaiveDate;
use shared::domain::PractitionerId;
use tokio::sync::Mutex;

use crate::query::{DateBound, FetchParams};

/// Filter selections made in the filter sheet. One set is live at a time;
/// applying a new set replaces the old one wholesale.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterValues {
    pub sort_option: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub display_uploaded_scans: bool,
}

/// Maps a status tab caption to the status tag sent to the server. "All" and
/// unknown captions mean no status filter.
pub fn status_for_tab(tab: &str) -> Option<&'static str> {
    match tab {
        "In Progress" => Some("In Progress"),
        "Completed" => Some("Completed"),
        "Pending" => Some("Pending"),
        "Patients not scan yet" => Some("Not Scanned"),
        "Submitted" => Some("Scanned and Submitted"),
        _ => None,
    }
}

/// Tab and filter state for one browsing session. Cloning shares the state,
/// so the handle can be passed between the screens of one logical session
/// without a process-wide singleton. Filters are dropped whenever the tab
/// changes or the user clears them.
#[derive(Clone, Default)]
pub struct BrowseSession {
    inner: Arc<Mutex<SessionState>>,
}

struct SessionState {
    filters: Option<FilterValues>,
    selected_tab: String,
    practitioner_id: Option<PractitionerId>,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            filters: None,
            selected_tab: "All".to_string(),
            practitioner_id: None,
        }
    }
}

impl BrowseSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn set_practitioner(&self, practitioner_id: Option<PractitionerId>) {
        self.inner.lock().await.practitioner_id = practitioner_id;
    }

    pub async fn set_filters(&self, values: FilterValues) {
        self.inner.lock().await.filters = Some(values);
    }

    pub async fn clear_filters(&self) {
        self.inner.lock().await.filters = None;
    }

    pub async fn filters(&self) -> Option<FilterValues> {
        self.inner.lock().await.filters.clone()
    }

    pub async fn select_tab(&self, tab: impl Into<String>) {
        let mut state = self.inner.lock().await;
        state.selected_tab = tab.into();
        state.filters = None;
    }

    pub async fn selected_tab(&self) -> String {
        self.inner.lock().await.selected_tab.clone()
    }

    /// Assembles the fetch inputs for the current tab and filter set. With no
    /// filter set applied the date bounds stay off the wire entirely; with
    /// one applied, an unset bound is sent as an explicit null.
    pub async fn fetch_params(
        &self,
        search_text: impl Into<String>,
        page: u32,
        is_searching: bool,
    ) -> FetchParams {
        let state = self.inner.lock().await;
        let mut params = FetchParams {
            status: status_for_tab(&state.selected_tab).map(str::to_string),
            search_text: search_text.into(),
            page,
            is_searching,
            practitioner_id: state.practitioner_id,
            ..FetchParams::default()
        };
        if let Some(filters) = &state.filters {
            params.sort_option = filters.sort_option.clone();
            params.start_date = filters
                .start_date
                .map(DateBound::On)
                .unwrap_or(DateBound::Cleared);
            params.end_date = filters
                .end_date
                .map(DateBound::On)
                .unwrap_or(DateBound::Cleared);
            params.display_uploaded_scans = filters.display_uploaded_scans;
        }
        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tab_captions_translate_to_status_tags() {
        assert_eq!(status_for_tab("All"), None);
        assert_eq!(status_for_tab("In Progress"), Some("In Progress"));
        assert_eq!(status_for_tab("Completed"), Some("Completed"));
        assert_eq!(status_for_tab("Pending"), Some("Pending"));
        assert_eq!(status_for_tab("Patients not scan yet"), Some("Not Scanned"));
        assert_eq!(status_for_tab("Submitted"), Some("Scanned and Submitted"));
        assert_eq!(status_for_tab("Archive"), None);
    }

    #[tokio::test]
    async fn changing_tab_drops_applied_filters() {
        let session = BrowseSession::new();
        session
            .set_filters(FilterValues {
                sort_option: Some("Alphabetical".to_string()),
                ..FilterValues::default()
            })
            .await;
        assert!(session.filters().await.is_some());

        session.select_tab("Pending").await;
        assert_eq!(session.selected_tab().await, "Pending");
        assert!(session.filters().await.is_none());
    }

    #[tokio::test]
    async fn applying_filters_replaces_the_previous_set() {
        let session = BrowseSession::new();
        session
            .set_filters(FilterValues {
                sort_option: Some("Alphabetical".to_string()),
                display_uploaded_scans: true,
                ..FilterValues::default()
            })
            .await;
        session
            .set_filters(FilterValues {
                sort_option: Some("Latest scan".to_string()),
                ..FilterValues::default()
            })
            .await;

        let filters = session.filters().await.expect("filters");
        assert_eq!(filters.sort_option.as_deref(), Some("Latest scan"));
        assert!(!filters.display_uploaded_scans);
    }

    #[tokio::test]
    async fn fetch_params_reflect_tab_and_filter_state() {
        let session = BrowseSession::new();

        let params = session.fetch_params("", 1, false).await;
        assert_eq!(params.status, None);
        assert_eq!(params.start_date, DateBound::Unfiltered);
        assert_eq!(params.end_date, DateBound::Unfiltered);

        session.select_tab("Submitted").await;
        let start = NaiveDate::from_ymd_opt(2025, 3, 1).expect("date");
        session
            .set_filters(FilterValues {
                sort_option: Some("Alphabetical".to_string()),
                start_date: Some(start),
                end_date: None,
                display_uploaded_scans: true,
            })
            .await;

        let params = session.fetch_params("smith", 2, true).await;
        assert_eq!(params.status.as_deref(), Some("Scanned and Submitted"));
        assert_eq!(params.search_text, "smith");
        assert_eq!(params.page, 2);
        assert!(params.is_searching);
        assert_eq!(params.start_date, DateBound::On(start));
        assert_eq!(params.end_date, DateBound::Cleared);
        assert!(params.display_uploaded_scans);
    }
}
