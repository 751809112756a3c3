//! Typed `BiostrapClient` trait and a reqwest-based implementation for the
//! Biostrap health/biometrics API.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use thiserror::Error;

pub mod config;
pub mod http_client;
pub mod models;

pub use models::{
    ActivityScore, AdditionalBiometrics, ApiResponse, Biometrics, CalorieDetailsGranular,
    DeviceInfo, Goals, Granularity, JobStatus, LockOperation, LockStatus, Metric, Pagination,
    RawDataRequest, RecoveryScore, Scores, SleepScore, Timepoint, User, Users,
};

#[derive(Debug, Error)]
pub enum BiostrapError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("bad JSON in response: {0}")]
    Decode(#[source] serde_json::Error),
    #[error("{status}: {reason}")]
    Http { status: u16, reason: String },
    #[error("malformed {entity} payload: {detail}")]
    Payload { entity: &'static str, detail: String },
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("configuration error: {0}")]
    Config(String),
}

#[async_trait]
pub trait BiostrapClient: Send + Sync + 'static {
    /// Fetch one page of the organization's users.
    async fn get_users(&self, page: u32, items_per_page: u32) -> Result<Users, BiostrapError>;

    async fn get_user(&self, user_id: &str) -> Result<User, BiostrapError>;

    /// Fetch the activity/recovery/sleep scores for one calendar day.
    async fn get_user_scores(
        &self,
        day: NaiveDate,
        user_id: &str,
    ) -> Result<Scores, BiostrapError>;

    /// Fetch up to `limit` biometric samples recorded after `last_timestamp`.
    ///
    /// `limit` must lie within `1..=50`; out-of-range values are rejected
    /// before any request is dispatched.
    async fn get_user_biometrics(
        &self,
        last_timestamp: DateTime<Utc>,
        limit: u32,
        user_id: &str,
    ) -> Result<Vec<Biometrics>, BiostrapError>;

    async fn get_user_sleep_stats(
        &self,
        day: NaiveDate,
        user_id: &str,
    ) -> Result<serde_json::Value, BiostrapError>;

    /// Fetch step details aggregated at the given granularity.
    async fn get_user_step_details(
        &self,
        day: NaiveDate,
        user_id: &str,
        granularity: Granularity,
    ) -> Result<serde_json::Value, BiostrapError>;

    /// Fetch the calorie breakdown for one date, metric by metric.
    async fn get_calorie_details_granular(
        &self,
        user_id: &str,
        date: NaiveDate,
        granularity: Granularity,
        user_timezone_offset_in_mins: i32,
    ) -> Result<CalorieDetailsGranular, BiostrapError>;

    /// Fetch the devices registered for a user.
    async fn get_device_info(&self, user_id: &str) -> Result<Vec<DeviceInfo>, BiostrapError>;

    /// Request an asynchronous raw-data export job for the organization.
    async fn download_raw_data(
        &self,
        request: &RawDataRequest,
    ) -> Result<serde_json::Value, BiostrapError>;

    /// Fetch the status of a previously requested export job.
    async fn get_job_status(&self, job_id: &str) -> Result<JobStatus, BiostrapError>;

    /// Lock a device to a user, or release it again.
    async fn lock_or_unlock_device(
        &self,
        user_id: &str,
        device_type: &str,
        device_mac_address_or_id_encoded: &str,
        operation: LockOperation,
    ) -> Result<LockStatus, BiostrapError>;
}
