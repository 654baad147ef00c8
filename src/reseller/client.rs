//! HTTP client for the upstream phone-number reseller
//!
//! Pure forwarding with error translation: upstream failures collapse to a
//! generic `Upstream` error so reseller internals never leak to callers.

use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::reseller::{ActivationList, PhoneActivation, ResellerProfile};

/// Reseller client errors
#[derive(Error, Debug)]
pub enum ResellerError {
    #[error("Reseller API request failed")]
    Upstream(StatusCode),

    #[error("Reseller API unreachable: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Unexpected reseller response: {0}")]
    Decode(String),
}

/// Client for the reseller's REST API
#[derive(Clone)]
pub struct ResellerClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl ResellerClient {
    /// Create a new reseller client
    pub fn new(base_url: String, api_key: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        }
    }

    /// Raw GET pass-through for the proxy endpoint
    pub async fn forward_get(&self, endpoint: &str) -> Result<serde_json::Value, ResellerError> {
        self.get(endpoint).await
    }

    /// Raw POST pass-through for the proxy endpoint
    pub async fn forward_post(
        &self,
        endpoint: &str,
        body: serde_json::Value,
    ) -> Result<serde_json::Value, ResellerError> {
        let response = self
            .http
            .post(format!("{}{}", self.base_url, endpoint))
            .bearer_auth(&self.api_key)
            .header("Accept", "application/json")
            .json(&body)
            .send()
            .await?;

        Self::decode(response).await
    }

    /// Country/operator/product price table (deeply nested; kept untyped)
    pub async fn prices(&self) -> Result<serde_json::Value, ResellerError> {
        self.get("/guest/prices").await
    }

    /// Buy a number for receiving an activation SMS
    pub async fn buy_activation(
        &self,
        country: &str,
        operator: &str,
        product: &str,
    ) -> Result<PhoneActivation, ResellerError> {
        self.get(&format!(
            "/user/buy/activation/{}/{}/{}",
            country, operator, product
        ))
        .await
    }

    /// Numbers purchased on the reseller account
    pub async fn activations(&self) -> Result<Vec<PhoneActivation>, ResellerError> {
        let list: ActivationList = self.get("/user/activations").await?;
        Ok(list.activations)
    }

    /// Poll an activation's SMS inbox
    pub async fn check(&self, activation_id: i64) -> Result<PhoneActivation, ResellerError> {
        self.get(&format!("/user/check/{}", activation_id)).await
    }

    /// Cancel an activation
    pub async fn cancel(&self, activation_id: i64) -> Result<PhoneActivation, ResellerError> {
        self.get(&format!("/user/cancel/{}", activation_id)).await
    }

    /// Mark an activation finished
    pub async fn finish(&self, activation_id: i64) -> Result<PhoneActivation, ResellerError> {
        self.get(&format!("/user/finish/{}", activation_id)).await
    }

    /// Reseller account balance
    pub async fn balance(&self) -> Result<f64, ResellerError> {
        let profile: ResellerProfile = self.get("/user/profile").await?;
        Ok(profile.balance)
    }

    async fn get<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, ResellerError> {
        let response = self
            .http
            .get(format!("{}{}", self.base_url, endpoint))
            .bearer_auth(&self.api_key)
            .header("Accept", "application/json")
            .send()
            .await?;

        Self::decode(response).await
    }

    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ResellerError> {
        let status = response.status();
        if !status.is_success() {
            tracing::warn!(status = %status, "Reseller API returned an error");
            return Err(ResellerError::Upstream(status));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| ResellerError::Decode(e.to_string()))
    }
}
