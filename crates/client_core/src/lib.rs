use std::sync::Arc;

use shared::{domain::OrderId, protocol::OrderRecord};
use tokio::sync::{broadcast, Mutex};
use tracing::{info, warn};

pub mod error;
pub mod query;
pub mod session;
pub mod transport;

pub use error::OrderApiError;
pub use query::{sort_code, DateBound, FetchParams, PAGE_SIZE};
pub use session::{status_for_tab, BrowseSession, FilterValues};
pub use transport::{HttpScanOrderApi, MissingScanOrderApi, ScanOrderApi};

/// Change notifications for whoever renders the feed. Carries enough to react
/// without holding a reference into the state itself; renderers pull the data
/// through [`OrderFeed::snapshot`].
#[derive(Debug, Clone)]
pub enum FeedEvent {
    LoadingChanged(bool),
    PageApplied {
        page: u32,
        received: usize,
        total_items: i64,
    },
    ListEdited {
        len: usize,
        total_items: i64,
    },
    Reset,
    SearchFailed(String),
}

/// Point-in-time copy of the feed for rendering.
#[derive(Debug, Clone, Default)]
pub struct FeedSnapshot {
    pub orders: Vec<OrderRecord>,
    pub total_items: i64,
    pub current_page: u32,
    pub loading: bool,
    pub can_load_more: bool,
}

struct FeedState {
    orders: Vec<OrderRecord>,
    total_items: i64,
    current_page: u32,
    loading: bool,
    can_load_more: bool,
    last_params: FetchParams,
}

/// Paginated order feed: the single source of truth for which page of which
/// query is being shown.
///
/// All mutation goes through the internal mutex; the lock is not held across
/// the network await, so a renderer can read a consistent snapshot while a
/// request is in flight. Pagination- and tab-driven fetches are serialized by
/// the loading guard. Live-search fetches bypass the guard, so several may
/// overlap and the last response to arrive wins, regardless of which request
/// the user typed last.
pub struct OrderFeed {
    api: Arc<dyn ScanOrderApi>,
    state: Mutex<FeedState>,
    events: broadcast::Sender<FeedEvent>,
}

impl OrderFeed {
    pub fn new(api: Arc<dyn ScanOrderApi>) -> Arc<Self> {
        let (events, _) = broadcast::channel(256);
        Arc::new(Self {
            api,
            state: Mutex::new(FeedState {
                orders: Vec::new(),
                total_items: 0,
                current_page: 0,
                loading: false,
                can_load_more: true,
                last_params: FetchParams::default(),
            }),
            events,
        })
    }

    pub fn over_http(base_url: impl Into<String>) -> Arc<Self> {
        Self::new(Arc::new(HttpScanOrderApi::new(base_url)))
    }

    pub fn disconnected() -> Arc<Self> {
        Self::new(Arc::new(MissingScanOrderApi))
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<FeedEvent> {
        self.events.subscribe()
    }

    pub async fn snapshot(&self) -> FeedSnapshot {
        let state = self.state.lock().await;
        FeedSnapshot {
            orders: state.orders.clone(),
            total_items: state.total_items,
            current_page: state.current_page,
            loading: state.loading,
            can_load_more: state.can_load_more,
        }
    }

    /// Runs one search request and folds the response into the feed.
    ///
    /// Page 1 replaces the accumulated list, later pages append. Unless
    /// `is_searching` is set the call is dropped while another fetch is in
    /// flight or the previous page came back short. On any failure the list
    /// and pagination bookkeeping stay untouched; the error is logged,
    /// emitted as an event, and returned. Guard drops return `Ok`.
    pub async fn fetch(&self, params: FetchParams) -> Result<(), OrderApiError> {
        let request = {
            let mut state = self.state.lock().await;
            if !params.is_searching && (state.loading || !state.can_load_more) {
                info!(
                    page = params.page,
                    loading = state.loading,
                    can_load_more = state.can_load_more,
                    "orders: fetch dropped by pagination guard"
                );
                return Ok(());
            }
            state.loading = true;
            if params.page == 1 {
                state.can_load_more = true;
            }
            state.last_params = params.clone();
            query::build_search_request(&params)
        };
        let _ = self.events.send(FeedEvent::LoadingChanged(true));

        let outcome = match self.api.search_orders(&request).await {
            Ok(envelope) => envelope.into_result().map_err(OrderApiError::from),
            Err(err) => Err(err),
        };

        let mut state = self.state.lock().await;
        state.loading = false;
        match outcome {
            Ok(page_data) => {
                let received = page_data.items.len();
                if params.page == 1 {
                    state.orders = page_data.items;
                } else {
                    state.orders.extend(page_data.items);
                }
                state.total_items = page_data.total_items;
                state.current_page = params.page;
                state.can_load_more = received == PAGE_SIZE as usize;
                let total_items = state.total_items;
                info!(
                    page = params.page,
                    received,
                    total_items,
                    can_load_more = state.can_load_more,
                    "orders: search page applied"
                );
                drop(state);
                let _ = self.events.send(FeedEvent::LoadingChanged(false));
                let _ = self.events.send(FeedEvent::PageApplied {
                    page: params.page,
                    received,
                    total_items,
                });
                Ok(())
            }
            Err(err) => {
                drop(state);
                warn!(page = params.page, error = %err, "orders: search failed");
                let _ = self.events.send(FeedEvent::LoadingChanged(false));
                let _ = self.events.send(FeedEvent::SearchFailed(err.to_string()));
                Err(err)
            }
        }
    }

    /// Fetches the next page with the filters of the previous fetch.
    pub async fn load_more(&self) -> Result<(), OrderApiError> {
        let params = {
            let state = self.state.lock().await;
            if !state.can_load_more {
                return Ok(());
            }
            let mut params = state.last_params.clone();
            params.page = state.current_page + 1;
            params.is_searching = false;
            params
        };
        self.fetch(params).await
    }

    /// Empties the feed ahead of a fresh page-1 fetch (tab change,
    /// pull-to-refresh).
    pub async fn reset(&self) {
        {
            let mut state = self.state.lock().await;
            state.orders.clear();
            state.total_items = 0;
            state.current_page = 0;
            state.can_load_more = true;
        }
        let _ = self.events.send(FeedEvent::Reset);
    }

    /// Shows a record created out-of-band at the head of the list without a
    /// round trip.
    pub async fn append_new_patient(&self, record: OrderRecord) {
        let (len, total_items) = {
            let mut state = self.state.lock().await;
            state.orders.insert(0, record);
            state.total_items += 1;
            (state.orders.len(), state.total_items)
        };
        let _ = self.events.send(FeedEvent::ListEdited { len, total_items });
    }

    /// Drops the first record with the given id, e.g. after an order was
    /// submitted and no longer belongs in a not-yet-submitted view. No-op
    /// when the id is absent.
    pub async fn remove_by_id(&self, id: OrderId) {
        let edited = {
            let mut state = self.state.lock().await;
            match state.orders.iter().position(|order| order.order_id == id) {
                Some(index) => {
                    state.orders.remove(index);
                    state.total_items = (state.total_items - 1).max(0);
                    Some((state.orders.len(), state.total_items))
                }
                None => None,
            }
        };
        if let Some((len, total_items)) = edited {
            let _ = self.events.send(FeedEvent::ListEdited { len, total_items });
        }
    }

    /// Rewrites the status tag of the matching record in place. Ordering and
    /// totals are untouched; no-op when the id is absent.
    pub async fn update_status(&self, id: OrderId, status: impl Into<String>) {
        let status = status.into();
        let edited = {
            let mut state = self.state.lock().await;
            let found = state
                .orders
                .iter_mut()
                .find(|order| order.order_id == id)
                .map(|order| order.status = Some(status))
                .is_some();
            found.then(|| (state.orders.len(), state.total_items))
        };
        if let Some((len, total_items)) = edited {
            let _ = self.events.send(FeedEvent::ListEdited { len, total_items });
        }
    }
}

#[cfg(test)]
#[path = "tests/feed_tests.rs"]
mod tests;
