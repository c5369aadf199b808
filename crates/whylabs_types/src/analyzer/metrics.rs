use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use strum_macros::{AsRefStr, EnumIter, EnumString};

pub const MISSING_DATA_POINT: &str = "missingDataPoint";
pub const SECONDS_SINCE_LAST_UPLOAD: &str = "secondsSinceLastUpload";

/// Ingestion metrics that can only be evaluated against the whole dataset
pub const INGESTION_METRICS: [&str; 2] = [MISSING_DATA_POINT, SECONDS_SINCE_LAST_UPLOAD];

/// Metrics that are applicable at the dataset level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, AsRefStr, EnumIter)]
pub enum DatasetMetric {
    #[strum(serialize = "profile.count")]
    ProfileCount,
    #[strum(serialize = "profile.last_ingestion_time")]
    ProfileLastIngestionTime,
    #[strum(serialize = "profile.first_ingestion_time")]
    ProfileFirstIngestionTime,
    #[strum(serialize = "column_row_count_sum")]
    ColumnRowCountSum,
    #[strum(serialize = "shape_column_count")]
    ShapeColumnCount,
    #[strum(serialize = "shape_row_count")]
    ShapeRowCount,
    #[strum(serialize = "input.count")]
    InputCount,
    #[strum(serialize = "output.count")]
    OutputCount,
    #[strum(serialize = "classification.f1")]
    ClassificationF1,
    #[strum(serialize = "classification.precision")]
    ClassificationPrecision,
    #[strum(serialize = "classification.recall")]
    ClassificationRecall,
    #[strum(serialize = "classification.accuracy")]
    ClassificationAccuracy,
    #[strum(serialize = "classification.auc")]
    ClassificationAuc,
    #[strum(serialize = "regression.mse")]
    RegressionMse,
    #[strum(serialize = "regression.mae")]
    RegressionMae,
    #[strum(serialize = "regression.rmse")]
    RegressionRmse,
}

/// Column metrics that resolve to a single number
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, AsRefStr, EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum SimpleColumnMetric {
    Count,
    Median,
    Max,
    Min,
    Mean,
    Stddev,
    Variance,
    UniqueUpper,
    UniqueUpperRatio,
    UniqueEst,
    UniqueEstRatio,
    UniqueLower,
    UniqueLowerRatio,
    CountBool,
    CountBoolRatio,
    CountIntegral,
    CountIntegralRatio,
    CountFractional,
    CountFractionalRatio,
    CountString,
    CountStringRatio,
    CountNull,
    CountNullRatio,
    InferredDataType,
    #[strum(serialize = "quantile_5")]
    Quantile5,
    #[strum(serialize = "quantile_25")]
    Quantile25,
    #[strum(serialize = "quantile_75")]
    Quantile75,
    #[strum(serialize = "quantile_90")]
    Quantile90,
    #[strum(serialize = "quantile_95")]
    Quantile95,
    #[strum(serialize = "quantile_99")]
    Quantile99,
}

/// Sketch based metrics only some algorithms can process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, AsRefStr, EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum ComplexMetric {
    Histogram,
    FrequentItems,
    UniqueSketch,
    ColumnList,
}

/// The metric an analyzer evaluates. Serialized as its plain string value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Metric {
    Dataset(DatasetMetric),
    Column(SimpleColumnMetric),
    Complex(ComplexMetric),
    Custom(String),
}

impl Metric {
    pub fn missing_data_point() -> Self {
        Metric::Custom(MISSING_DATA_POINT.to_string())
    }

    pub fn seconds_since_last_upload() -> Self {
        Metric::Custom(SECONDS_SINCE_LAST_UPLOAD.to_string())
    }

    pub fn as_str(&self) -> &str {
        match self {
            Metric::Dataset(metric) => metric.as_ref(),
            Metric::Column(metric) => metric.as_ref(),
            Metric::Complex(metric) => metric.as_ref(),
            Metric::Custom(metric) => metric.as_str(),
        }
    }

    pub fn is_dataset_metric(&self) -> bool {
        matches!(self, Metric::Dataset(_))
    }

    pub fn is_ingestion_metric(&self) -> bool {
        INGESTION_METRICS.contains(&self.as_str())
    }
}

impl FromStr for Metric {
    type Err = std::convert::Infallible;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        if let Ok(metric) = DatasetMetric::from_str(value) {
            return Ok(Metric::Dataset(metric));
        }
        if let Ok(metric) = SimpleColumnMetric::from_str(value) {
            return Ok(Metric::Column(metric));
        }
        if let Ok(metric) = ComplexMetric::from_str(value) {
            return Ok(Metric::Complex(metric));
        }
        Ok(Metric::Custom(value.to_string()))
    }
}

impl From<&str> for Metric {
    fn from(value: &str) -> Self {
        match Metric::from_str(value) {
            Ok(metric) => metric,
            Err(never) => match never {},
        }
    }
}

impl From<DatasetMetric> for Metric {
    fn from(metric: DatasetMetric) -> Self {
        Metric::Dataset(metric)
    }
}

impl From<SimpleColumnMetric> for Metric {
    fn from(metric: SimpleColumnMetric) -> Self {
        Metric::Column(metric)
    }
}

impl From<ComplexMetric> for Metric {
    fn from(metric: ComplexMetric) -> Self {
        Metric::Complex(metric)
    }
}

impl Display for Metric {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Serialize for Metric {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Metric {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        Ok(Metric::from(value.as_str()))
    }
}
