use crate::adapter::{TypeAdapter, TypeAdapterError};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

///
/// BoolAdapter
/// Stored as `1` / `0`; any non-zero value reads back as `true`.
///

#[derive(Clone, Copy, Debug, Default)]
pub struct BoolAdapter;

impl TypeAdapter<bool, i64> for BoolAdapter {
    fn serialize(&self, value: &bool) -> i64 {
        i64::from(*value)
    }

    fn deserialize(&self, value: i64) -> Result<bool, TypeAdapterError> {
        Ok(value != 0)
    }
}

///
/// SystemTimeAdapter
/// Milliseconds since the Unix epoch; sub-millisecond precision is dropped.
///

#[derive(Clone, Copy, Debug, Default)]
pub struct SystemTimeAdapter;

impl TypeAdapter<SystemTime, i64> for SystemTimeAdapter {
    fn serialize(&self, value: &SystemTime) -> i64 {
        match value.duration_since(UNIX_EPOCH) {
            Ok(after) => i64::try_from(after.as_millis()).unwrap_or(i64::MAX),
            Err(before) => i64::try_from(before.duration().as_millis()).map_or(i64::MIN, |ms| -ms),
        }
    }

    fn deserialize(&self, value: i64) -> Result<SystemTime, TypeAdapterError> {
        let offset = Duration::from_millis(value.unsigned_abs());
        let time = if value >= 0 {
            UNIX_EPOCH.checked_add(offset)
        } else {
            UNIX_EPOCH.checked_sub(offset)
        };

        time.ok_or_else(|| TypeAdapterError::out_of_range::<SystemTime>(value))
    }
}

///
/// DateTimeAdapter
///

#[derive(Clone, Copy, Debug, Default)]
pub struct DateTimeAdapter;

impl TypeAdapter<DateTime<Utc>, i64> for DateTimeAdapter {
    fn serialize(&self, value: &DateTime<Utc>) -> i64 {
        value.timestamp_millis()
    }

    fn deserialize(&self, value: i64) -> Result<DateTime<Utc>, TypeAdapterError> {
        DateTime::from_timestamp_millis(value)
            .ok_or_else(|| TypeAdapterError::out_of_range::<DateTime<Utc>>(value))
    }
}

///
/// NaiveDateAdapter
/// Midnight UTC of the date, in milliseconds since the Unix epoch.
///

#[derive(Clone, Copy, Debug, Default)]
pub struct NaiveDateAdapter;

impl TypeAdapter<NaiveDate, i64> for NaiveDateAdapter {
    fn serialize(&self, value: &NaiveDate) -> i64 {
        value.and_time(NaiveTime::MIN).and_utc().timestamp_millis()
    }

    fn deserialize(&self, value: i64) -> Result<NaiveDate, TypeAdapterError> {
        DateTime::from_timestamp_millis(value)
            .map(|time| time.date_naive())
            .ok_or_else(|| TypeAdapterError::out_of_range::<NaiveDate>(value))
    }
}
