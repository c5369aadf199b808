use crate::error::TypeError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use strum_macros::EnumIter;

/// WhyLabs-managed metadata attached to monitors, analyzers and schemas.
/// Values set client side are ignored by the platform.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    pub version: i64,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema_version: Option<i64>,

    pub updated_timestamp: i64,

    pub author: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Inclusive start, exclusive end
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct TimeRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeRange {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, TypeError> {
        if start >= end {
            return Err(TypeError::StartTimeError {
                start: start.to_rfc3339(),
                end: end.to_rfc3339(),
            });
        }
        Ok(TimeRange { start, end })
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter)]
#[serde(rename_all = "lowercase")]
pub enum Cadence {
    Hourly,
    Daily,
    Weekly,
    Monthly,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FixedCadenceSchedule {
    pub cadence: Cadence,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclusion_ranges: Option<Vec<TimeRange>>,
}

impl FixedCadenceSchedule {
    pub fn new(cadence: Cadence) -> Self {
        FixedCadenceSchedule {
            cadence,
            exclusion_ranges: None,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CronSchedule {
    pub cron: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclusion_ranges: Option<Vec<TimeRange>>,
}

/// Run schedule of a monitor or analyzer.
///
/// Analyzers only accept [`Schedule::Fixed`]; monitors produced by a setup
/// always run [`Schedule::Immediate`].
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Schedule {
    Fixed(FixedCadenceSchedule),
    Cron(CronSchedule),
    Immediate,
}

impl Schedule {
    pub fn fixed(cadence: Cadence) -> Self {
        Schedule::Fixed(FixedCadenceSchedule::new(cadence))
    }

    pub fn is_fixed(&self) -> bool {
        matches!(self, Schedule::Fixed(_))
    }
}

/// Time bucket at which profiles are rolled up
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    Hourly,
    Daily,
    Weekly,
    Monthly,
}

impl From<Granularity> for Cadence {
    fn from(granularity: Granularity) -> Self {
        match granularity {
            Granularity::Hourly => Cadence::Hourly,
            Granularity::Daily => Cadence::Daily,
            Granularity::Weekly => Cadence::Weekly,
            Granularity::Monthly => Cadence::Monthly,
        }
    }
}

/// Dataset time period as stored on the model metadata
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter)]
pub enum TimePeriod {
    #[serde(rename = "PT1H")]
    Hourly,
    #[serde(rename = "P1D")]
    Daily,
    #[serde(rename = "P1W")]
    Weekly,
    #[serde(rename = "P1M")]
    Monthly,
}

impl TimePeriod {
    pub fn as_str(&self) -> &str {
        match self {
            TimePeriod::Hourly => "PT1H",
            TimePeriod::Daily => "P1D",
            TimePeriod::Weekly => "P1W",
            TimePeriod::Monthly => "P1M",
        }
    }

    pub fn granularity(&self) -> Granularity {
        match self {
            TimePeriod::Hourly => Granularity::Hourly,
            TimePeriod::Daily => Granularity::Daily,
            TimePeriod::Weekly => Granularity::Weekly,
            TimePeriod::Monthly => Granularity::Monthly,
        }
    }
}

impl Display for TimePeriod {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TimePeriod {
    type Err = TypeError;

    /// Matches on the unit letter, checked in hour, day, week, month order
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let upper = value.to_uppercase();
        if upper.contains('H') {
            Ok(TimePeriod::Hourly)
        } else if upper.contains('D') {
            Ok(TimePeriod::Daily)
        } else if upper.contains('W') {
            Ok(TimePeriod::Weekly)
        } else if upper.contains('M') {
            Ok(TimePeriod::Monthly)
        } else {
            Err(TypeError::parse_error("TimePeriod", value))
        }
    }
}
