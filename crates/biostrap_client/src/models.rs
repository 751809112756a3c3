//! Typed models for Biostrap API payloads.
//!
//! Every entity is an immutable value object decoded from the payload subtree
//! its endpoint returns. Decoding validates field presence and primitive
//! shape, parses date/time strings under fixed formats, and reports failures
//! with the entity name and field-level detail. Extra payload fields are
//! ignored; sequences keep their source order.

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::BiostrapError;

/// Envelope produced by the adapter for every successful (2xx) exchange.
///
/// `data` holds the decoded response body; an empty success body decodes to
/// an empty JSON object so callers never deal with a missing payload.
#[derive(Clone, Debug, PartialEq)]
pub struct ApiResponse {
    pub status_code: u16,
    pub message: String,
    pub data: Value,
}

/// Deserialize `T` out of a payload subtree, tagging failures with the
/// entity name.
fn decode<T: DeserializeOwned>(entity: &'static str, payload: &Value) -> Result<T, BiostrapError> {
    T::deserialize(payload).map_err(|e| BiostrapError::Payload {
        entity,
        detail: e.to_string(),
    })
}

#[derive(Deserialize)]
struct DataEnvelope<T> {
    data: T,
}

/// Page cursor state for the users listing.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct Pagination {
    pub available_pages: u32,
    pub items_per_page: u32,
    pub page: u32,
    pub total_items: u32,
}

/// Daily targets attached to a user profile.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct Goals {
    pub steps: u32,
    pub sleep: u32,
    pub calories: u32,
    pub workout: u32,
}

/// A member of the organization.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(deserialize_with = "deserialize_calendar_date")]
    pub birthday: NaiveDate,
    pub gender: String,
    pub height: f64,
    pub weight: f64,
    pub goals: Goals,
}

impl User {
    /// Decode the `{"data": {...}}` envelope returned by the single-user
    /// endpoint.
    pub fn from_payload(payload: &Value) -> Result<Self, BiostrapError> {
        let envelope: DataEnvelope<User> = decode("User", payload)?;
        Ok(envelope.data)
    }
}

/// One page of users plus whether further pages remain.
#[derive(Clone, Debug, PartialEq)]
pub struct Users {
    pub users: Vec<User>,
    pub data_left: bool,
}

impl Users {
    /// Decode a users listing payload (`{"pagination": ..., "users": [...]}`).
    ///
    /// `data_left` is true iff the listed page precedes the last available
    /// page.
    pub fn from_payload(payload: &Value) -> Result<Self, BiostrapError> {
        #[derive(Deserialize)]
        struct Listing {
            pagination: Pagination,
            users: Vec<User>,
        }
        let listing: Listing = decode("Users", payload)?;
        Ok(Users {
            data_left: listing.pagination.page < listing.pagination.available_pages,
            users: listing.users,
        })
    }
}

/// Status of an asynchronous raw-data export job.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct JobStatus {
    pub job_id: String,
    pub job_type: String,
    pub latest_status: String,
    pub status_updated_at_ts: i64,
}

impl JobStatus {
    /// Decode the `{"data": {...}}` envelope returned by the job-status
    /// endpoint.
    pub fn from_payload(payload: &Value) -> Result<Self, BiostrapError> {
        let envelope: DataEnvelope<JobStatus> = decode("JobStatus", payload)?;
        Ok(envelope.data)
    }
}

/// Sync and battery state of a wearable registered to a user.
///
/// Battery fields are absent until the device reports them once; they default
/// to zero rather than being optional.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct DeviceInfo {
    pub last_data_uploaded_at_ts: i64,
    pub last_updated_at_tz_offset_mins: i32,
    #[serde(rename = "type")]
    pub device_type: String,
    #[serde(default)]
    pub battery_percentage: u8,
    #[serde(default)]
    pub last_battery_info_updated_at_ts: i64,
}

impl DeviceInfo {
    /// Decode a device-info payload (`{"devices": [...]}`), preserving the
    /// source order of the devices.
    pub fn list_from_payload(payload: &Value) -> Result<Vec<Self>, BiostrapError> {
        #[derive(Deserialize)]
        struct Devices {
            devices: Vec<DeviceInfo>,
        }
        let devices: Devices = decode("DeviceInfo", payload)?;
        Ok(devices.devices)
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct ActivityScore {
    pub avg: u32,
    pub goal: u32,
    pub processing: bool,
    pub value: u32,
}

/// Recovery carries a coaching message and stage label alongside the score.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct RecoveryScore {
    pub avg: u32,
    pub message: String,
    pub processing: bool,
    pub stage: String,
    pub value: u32,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct SleepScore {
    pub avg: u32,
    pub duration_secs: u32,
    pub goal: u32,
    pub processing: bool,
    pub value: u32,
}

/// The three daily scores the scores endpoint returns together.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct Scores {
    pub activity: ActivityScore,
    pub recovery: RecoveryScore,
    pub sleep: SleepScore,
}

impl Scores {
    pub fn from_payload(payload: &Value) -> Result<Self, BiostrapError> {
        decode("Scores", payload)
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct AdditionalBiometrics {
    pub ae: u32,
    pub arterial_health_score: u32,
    pub pe: u32,
}

/// One biometric sample as recorded by the wearable.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct Biometrics {
    pub additional_biometrics: AdditionalBiometrics,
    pub bpm: u32,
    pub brpm: u32,
    pub hrv: u32,
    pub resting_bpm: u32,
    pub resting_hrv: u32,
    pub spo2: u32,
    pub state: String,
    /// Recording timestamp, carried verbatim from the payload.
    pub timestamp: String,
}

impl Biometrics {
    /// Decode a biometrics listing payload (`{"biometrics": [...]}`).
    pub fn list_from_payload(payload: &Value) -> Result<Vec<Self>, BiostrapError> {
        #[derive(Deserialize)]
        struct Samples {
            biometrics: Vec<Biometrics>,
        }
        let samples: Samples = decode("Biometrics", payload)?;
        Ok(samples.biometrics)
    }
}

/// One sample in a metric timeseries.
///
/// `time` is `None` when the payload carries an empty string; `date` is
/// always derived from `time`, never read from the payload.
#[derive(Clone, Debug, PartialEq)]
pub struct Timepoint {
    pub time: Option<NaiveDateTime>,
    pub date: Option<NaiveDate>,
    pub value: f64,
}

impl<'de> Deserialize<'de> for Timepoint {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Raw {
            #[serde(deserialize_with = "deserialize_opt_timestamp")]
            time: Option<NaiveDateTime>,
            value: f64,
        }
        let raw = Raw::deserialize(deserializer)?;
        Ok(Timepoint {
            date: raw.time.map(|t| t.date()),
            time: raw.time,
            value: raw.value,
        })
    }
}

/// A named metric with its sampled timeseries.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct Metric {
    #[serde(rename = "type")]
    pub kind: String,
    pub name: String,
    pub value: f64,
    pub unit: String,
    pub value_is_an_avg: bool,
    pub timeseries: Vec<Timepoint>,
}

/// Calorie breakdown for one date at a requested granularity.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct CalorieDetailsGranular {
    #[serde(deserialize_with = "deserialize_calendar_date")]
    pub date: NaiveDate,
    pub granularity: Granularity,
    pub daily_calories_goal: u32,
    pub calories_goal_achieved_percentage: u32,
    pub metrics: Vec<Metric>,
}

impl CalorieDetailsGranular {
    pub fn from_payload(payload: &Value) -> Result<Self, BiostrapError> {
        decode("CalorieDetailsGranular", payload)
    }
}

/// Outcome of a device lock or unlock request.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct LockStatus {
    pub status: String,
    pub status_message: String,
}

impl LockStatus {
    pub fn from_payload(payload: &Value) -> Result<Self, BiostrapError> {
        decode("LockStatus", payload)
    }
}

/// Aggregation window accepted by the step and calorie detail endpoints.
#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    Day,
    Week,
    Month,
    Year,
}

impl Granularity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Granularity::Day => "day",
            Granularity::Week => "week",
            Granularity::Month => "month",
            Granularity::Year => "year",
        }
    }
}

/// Direction of a device lock request.
#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LockOperation {
    Lock,
    Unlock,
}

impl LockOperation {
    pub fn as_str(&self) -> &'static str {
        match self {
            LockOperation::Lock => "lock",
            LockOperation::Unlock => "unlock",
        }
    }
}

/// Body of a raw-data export request.
///
/// The time window serializes as RFC 3339 with seconds precision, which is
/// what the export endpoint expects.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct RawDataRequest {
    pub target_email: String,
    #[serde(serialize_with = "serialize_rfc3339")]
    pub start_time: DateTime<Utc>,
    #[serde(serialize_with = "serialize_rfc3339")]
    pub end_time: DateTime<Utc>,
    pub user_ids: Vec<String>,
    pub data_to_download: Vec<String>,
    pub output_file_formats: Vec<String>,
    pub anonymize_ids: bool,
}

fn serialize_rfc3339<S>(dt: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&dt.to_rfc3339_opts(SecondsFormat::Secs, true))
}

fn deserialize_calendar_date<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;
    let s = String::deserialize(deserializer)?;
    NaiveDate::parse_from_str(&s, "%Y-%m-%d")
        .map_err(|e| D::Error::custom(format!("invalid calendar date {s:?}: {e}")))
}

fn deserialize_opt_timestamp<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;
    let s = String::deserialize(deserializer)?;
    if s.is_empty() {
        return Ok(None);
    }
    parse_timestamp(&s)
        .map(Some)
        .ok_or_else(|| D::Error::custom(format!("invalid timestamp {s:?}")))
}

/// Parse a timestamp under the ISO-8601 profile the API emits: RFC 3339 with
/// an offset, or a naive `YYYY-MM-DDTHH:MM:SS` with optional fractional
/// seconds. Offset timestamps keep their wall-clock time.
fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_local());
    }
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f").ok()
}
