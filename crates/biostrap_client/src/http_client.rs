//! HTTP adapter for the Biostrap API.
//!
//! This module provides a reqwest-based implementation of the
//! [`BiostrapClient`](crate::BiostrapClient) trait. Every endpoint goes
//! through one request/response primitive that authenticates, traces,
//! classifies the status code, and decodes the JSON body.

use crate::config::Config;
use crate::models::{
    ApiResponse, Biometrics, CalorieDetailsGranular, DeviceInfo, Granularity, JobStatus,
    LockOperation, LockStatus, RawDataRequest, Scores, User, Users,
};
use crate::{BiostrapClient, BiostrapError};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use reqwest::Method;
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, error, warn};

/// Client for the Biostrap API using reqwest.
#[derive(Clone, Debug)]
pub struct ReqwestBiostrapClient {
    base_url: String,
    api_key: SecretString,
    client: reqwest::Client,
}

impl ReqwestBiostrapClient {
    /// Create a new client instance.
    ///
    /// # Arguments
    /// * `base_url` - The base URL of the Biostrap API (e.g., "https://api-beta.biostrap.com/v1")
    /// * `api_key` - The API key for authentication
    /// * `verify_tls` - Whether to verify TLS certificates; disabling is a
    ///   construction-time decision and applies to every request this client
    ///   sends
    pub fn new(
        base_url: &str,
        api_key: SecretString,
        verify_tls: bool,
    ) -> Result<Self, BiostrapError> {
        if !verify_tls {
            warn!("TLS certificate verification is disabled for this client");
        }
        let client = reqwest::Client::builder()
            .danger_accept_invalid_certs(!verify_tls)
            .build()?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            client,
        })
    }

    /// Create a client from environment-derived configuration.
    pub fn from_config(config: &Config) -> Result<Self, BiostrapError> {
        Self::new(&config.base_url(), config.api_key.clone(), config.verify_tls)
    }

    /// Issue a GET request against an endpoint path.
    pub async fn get(
        &self,
        endpoint: &str,
        params: &[(&str, String)],
    ) -> Result<ApiResponse, BiostrapError> {
        self.send(Method::GET, endpoint, params, None::<&serde_json::Value>)
            .await
    }

    /// Issue a POST request against an endpoint path, with an optional JSON
    /// body.
    pub async fn post<B: serde::Serialize + ?Sized>(
        &self,
        endpoint: &str,
        params: &[(&str, String)],
        body: Option<&B>,
    ) -> Result<ApiResponse, BiostrapError> {
        self.send(Method::POST, endpoint, params, body).await
    }

    /// Dispatch one request and interpret the response.
    ///
    /// The body is decoded as JSON before the status code is classified, so a
    /// garbage body is a decode failure whatever the status. An empty body
    /// decodes to `{}`. Success is a status in [200, 299]; anything else
    /// fails with `"{status}: {reason}"`.
    async fn send<B: serde::Serialize + ?Sized>(
        &self,
        method: Method,
        endpoint: &str,
        params: &[(&str, String)],
        body: Option<&B>,
    ) -> Result<ApiResponse, BiostrapError> {
        let url = format!("{}/{}", self.base_url, endpoint);
        debug!(%method, %url, ?params, "dispatching request");

        let mut request = self.client.request(method, &url).header(
            reqwest::header::AUTHORIZATION,
            format!("APIKey {}", self.api_key.expose_secret()),
        );
        if !params.is_empty() {
            request = request.query(params);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|e| {
            error!(%url, error = %e, "request failed before a response was obtained");
            BiostrapError::Transport(e)
        })?;

        let status = response.status();
        let reason = status.canonical_reason().unwrap_or_default().to_string();
        let text = response.text().await.map_err(|e| {
            error!(%url, error = %e, "failed to read response body");
            BiostrapError::Transport(e)
        })?;

        let data = if text.trim().is_empty() {
            serde_json::Value::Object(serde_json::Map::new())
        } else {
            serde_json::from_str(&text).map_err(|e| {
                error!(%url, status = status.as_u16(), error = %e, "response body is not JSON");
                BiostrapError::Decode(e)
            })?
        };

        if !status.is_success() {
            error!(%url, status = status.as_u16(), %reason, success = false, "request rejected");
            return Err(BiostrapError::Http {
                status: status.as_u16(),
                reason,
            });
        }

        debug!(%url, status = status.as_u16(), %reason, success = true, "request completed");
        Ok(ApiResponse {
            status_code: status.as_u16(),
            message: reason,
            data,
        })
    }
}

#[async_trait]
impl BiostrapClient for ReqwestBiostrapClient {
    async fn get_users(&self, page: u32, items_per_page: u32) -> Result<Users, BiostrapError> {
        let params = [
            ("page", page.to_string()),
            ("items_per_page", items_per_page.to_string()),
        ];
        let resp = self.get("organizations/users", &params).await?;
        Users::from_payload(&resp.data)
    }

    async fn get_user(&self, user_id: &str) -> Result<User, BiostrapError> {
        let params = [("user_id", user_id.to_string())];
        let resp = self.get("user", &params).await?;
        User::from_payload(&resp.data)
    }

    async fn get_user_scores(
        &self,
        day: NaiveDate,
        user_id: &str,
    ) -> Result<Scores, BiostrapError> {
        let params = [("date", day.to_string()), ("user_id", user_id.to_string())];
        let resp = self.get("scores", &params).await?;
        Scores::from_payload(&resp.data)
    }

    async fn get_user_biometrics(
        &self,
        last_timestamp: DateTime<Utc>,
        limit: u32,
        user_id: &str,
    ) -> Result<Vec<Biometrics>, BiostrapError> {
        if !(1..=50).contains(&limit) {
            return Err(BiostrapError::InvalidInput(
                "limit must be between 1 and 50, inclusive".into(),
            ));
        }
        let params = [
            (
                "last-timestamp",
                last_timestamp.timestamp_millis().to_string(),
            ),
            ("limit", limit.to_string()),
            ("user_id", user_id.to_string()),
        ];
        let resp = self.get("biometrics", &params).await?;
        Biometrics::list_from_payload(&resp.data)
    }

    async fn get_user_sleep_stats(
        &self,
        day: NaiveDate,
        user_id: &str,
    ) -> Result<serde_json::Value, BiostrapError> {
        let params = [("date", day.to_string()), ("user_id", user_id.to_string())];
        Ok(self.get("sleep", &params).await?.data)
    }

    async fn get_user_step_details(
        &self,
        day: NaiveDate,
        user_id: &str,
        granularity: Granularity,
    ) -> Result<serde_json::Value, BiostrapError> {
        let params = [
            ("date", day.to_string()),
            ("user_id", user_id.to_string()),
            ("granularity", granularity.as_str().to_string()),
        ];
        Ok(self.get("step/details", &params).await?.data)
    }

    async fn get_calorie_details_granular(
        &self,
        user_id: &str,
        date: NaiveDate,
        granularity: Granularity,
        user_timezone_offset_in_mins: i32,
    ) -> Result<CalorieDetailsGranular, BiostrapError> {
        let params = [
            ("user_id", user_id.to_string()),
            (
                "user_timezone_offset_in_mins",
                user_timezone_offset_in_mins.to_string(),
            ),
            ("date", date.to_string()),
            ("granularity", granularity.as_str().to_string()),
        ];
        let resp = self.get("calorie/details", &params).await?;
        CalorieDetailsGranular::from_payload(&resp.data)
    }

    async fn get_device_info(&self, user_id: &str) -> Result<Vec<DeviceInfo>, BiostrapError> {
        let params = [("user_id", user_id.to_string())];
        let resp = self.get("device-info", &params).await?;
        DeviceInfo::list_from_payload(&resp.data)
    }

    async fn download_raw_data(
        &self,
        request: &RawDataRequest,
    ) -> Result<serde_json::Value, BiostrapError> {
        let resp = self
            .post(
                "organizations/data-download/raw/send-request",
                &[],
                Some(request),
            )
            .await?;
        Ok(resp.data)
    }

    async fn get_job_status(&self, job_id: &str) -> Result<JobStatus, BiostrapError> {
        let params = [("job_id", job_id.to_string())];
        let resp = self.get("organizations/job-status", &params).await?;
        JobStatus::from_payload(&resp.data)
    }

    async fn lock_or_unlock_device(
        &self,
        user_id: &str,
        device_type: &str,
        device_mac_address_or_id_encoded: &str,
        operation: LockOperation,
    ) -> Result<LockStatus, BiostrapError> {
        let body = serde_json::json!({
            "user_id": user_id,
            "device_type": device_type,
            "device_mac_address_or_id_encoded": device_mac_address_or_id_encoded,
            "operation": operation.as_str(),
        });
        let resp = self
            .post("organizations/user-device-lock", &[], Some(&body))
            .await?;
        LockStatus::from_payload(&resp.data)
    }
}
