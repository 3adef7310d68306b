use async_trait::async_trait;
use reqwest::Client;
use serde::{de::DeserializeOwned, Serialize};
use shared::protocol::{
    CreatePatientRequest, Envelope, OrderRecord, Page, SearchOrdersRequest, SubmitOrderRequest,
    UpdateOrderStatusRequest,
};

use crate::error::OrderApiError;

const SEARCH_ORDERS_PATH: &str = "Orders/SearchOrders";
const CREATE_PATIENT_PATH: &str = "Patient";
const SUBMIT_ORDER_PATH: &str = "Orders/SubmitOrder";
const UPDATE_ORDER_STATUS_PATH: &str = "Orders/SubmitOrderDetails";

/// The remote order endpoints the coordinator and its callers consume.
#[async_trait]
pub trait ScanOrderApi: Send + Sync {
    async fn search_orders(
        &self,
        request: &SearchOrdersRequest,
    ) -> Result<Envelope<Page<OrderRecord>>, OrderApiError>;

    async fn create_patient(
        &self,
        request: &CreatePatientRequest,
    ) -> Result<Envelope<OrderRecord>, OrderApiError>;

    async fn submit_order(
        &self,
        request: &SubmitOrderRequest,
    ) -> Result<Envelope<OrderRecord>, OrderApiError>;

    async fn update_order_status(
        &self,
        request: &UpdateOrderStatusRequest,
    ) -> Result<Envelope<OrderRecord>, OrderApiError>;
}

/// Production transport: JSON over HTTP against one base URL, one shared
/// connection pool.
pub struct HttpScanOrderApi {
    http: Client,
    base_url: String,
}

impl HttpScanOrderApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, OrderApiError>
    where
        B: Serialize + Sync,
        T: DeserializeOwned,
    {
        let response = self
            .http
            .post(format!("{}/{path}", self.base_url))
            .json(body)
            .send()
            .await?
            .error_for_status()?;
        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

#[async_trait]
impl ScanOrderApi for HttpScanOrderApi {
    async fn search_orders(
        &self,
        request: &SearchOrdersRequest,
    ) -> Result<Envelope<Page<OrderRecord>>, OrderApiError> {
        self.post_json(SEARCH_ORDERS_PATH, request).await
    }

    async fn create_patient(
        &self,
        request: &CreatePatientRequest,
    ) -> Result<Envelope<OrderRecord>, OrderApiError> {
        self.post_json(CREATE_PATIENT_PATH, request).await
    }

    async fn submit_order(
        &self,
        request: &SubmitOrderRequest,
    ) -> Result<Envelope<OrderRecord>, OrderApiError> {
        self.post_json(SUBMIT_ORDER_PATH, request).await
    }

    async fn update_order_status(
        &self,
        request: &UpdateOrderStatusRequest,
    ) -> Result<Envelope<OrderRecord>, OrderApiError> {
        self.post_json(UPDATE_ORDER_STATUS_PATH, request).await
    }
}

/// Backend used when a feed is constructed without a server. Every call
/// fails, so misconfiguration shows up as an error instead of an empty list.
pub struct MissingScanOrderApi;

#[async_trait]
impl ScanOrderApi for MissingScanOrderApi {
    async fn search_orders(
        &self,
        _request: &SearchOrdersRequest,
    ) -> Result<Envelope<Page<OrderRecord>>, OrderApiError> {
        Err(OrderApiError::Unconfigured)
    }

    async fn create_patient(
        &self,
        _request: &CreatePatientRequest,
    ) -> Result<Envelope<OrderRecord>, OrderApiError> {
        Err(OrderApiError::Unconfigured)
    }

    async fn submit_order(
        &self,
        _request: &SubmitOrderRequest,
    ) -> Result<Envelope<OrderRecord>, OrderApiError> {
        Err(OrderApiError::Unconfigured)
    }

    async fn update_order_status(
        &self,
        _request: &UpdateOrderStatusRequest,
    ) -> Result<Envelope<OrderRecord>, OrderApiError> {
        Err(OrderApiError::Unconfigured)
    }
}

#[cfg(test)]
#[path = "tests/api_tests.rs"]
mod tests;
