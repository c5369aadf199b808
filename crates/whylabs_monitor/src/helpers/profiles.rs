use crate::error::MonitorError;
use crate::helpers::DatasetClient;
use crate::setup::ToUtc;
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone};
use serde_json::Value;
use tracing::{info, instrument};
use whylabs_types::http::DeleteProfilesRequest;

/// A point in time expressed as epoch milliseconds
pub trait ToEpochMillis {
    fn to_epoch_millis(&self) -> i64;
}

impl ToEpochMillis for i64 {
    fn to_epoch_millis(&self) -> i64 {
        *self
    }
}

impl<Tz: TimeZone> ToEpochMillis for DateTime<Tz> {
    fn to_epoch_millis(&self) -> i64 {
        self.timestamp_millis()
    }
}

impl ToEpochMillis for NaiveDateTime {
    fn to_epoch_millis(&self) -> i64 {
        self.to_utc_datetime().timestamp_millis()
    }
}

impl ToEpochMillis for NaiveDate {
    fn to_epoch_millis(&self) -> i64 {
        self.to_utc_datetime().timestamp_millis()
    }
}

impl DatasetClient {
    /// Deletes every profile uploaded between `start` (inclusive) and `end`
    #[instrument(skip_all)]
    pub fn delete_all_profiles_for_period(
        &self,
        start: impl ToEpochMillis,
        end: impl ToEpochMillis,
    ) -> Result<Value, MonitorError> {
        let request = DeleteProfilesRequest {
            profile_start_timestamp: start.to_epoch_millis(),
            profile_end_timestamp: end.to_epoch_millis(),
        };

        if request.profile_start_timestamp >= request.profile_end_timestamp {
            return Err(MonitorError::validation(format!(
                "start {} must be before end {}",
                request.profile_start_timestamp, request.profile_end_timestamp
            )));
        }

        let response =
            self.api()
                .delete_dataset_profiles(&self.org_id, &self.dataset_id, &request)?;
        info!(
            "Requested deletion of profiles in [{}, {}) for dataset {}",
            request.profile_start_timestamp, request.profile_end_timestamp, self.dataset_id
        );
        Ok(response)
    }
}
