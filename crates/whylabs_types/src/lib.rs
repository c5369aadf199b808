pub mod analyzer;
pub mod column_schema;
pub mod commons;
pub mod document;
pub mod error;
pub mod http;
pub mod models;
pub mod monitor;
pub mod schema;
pub mod segments;
pub mod util;

pub use analyzer::*;
pub use column_schema::{
    ColumnClassifier, ColumnDataType, ColumnDiscreteness, ColumnSchema, EntitySchema,
};
pub use commons::{
    Cadence, CronSchedule, FixedCadenceSchedule, Granularity, Metadata, Schedule, TimePeriod,
    TimeRange,
};
pub use document::Document;
pub use error::{TracedError, TypeError};
pub use models::ModelMetadata;
pub use monitor::*;
pub use segments::{Segment, SegmentTag};
pub use util::JsonFuncs;

/// Tag marking an analyzer as a constraint
pub const CONSTRAINT_TAG: &str = "whylabs.constraint";
