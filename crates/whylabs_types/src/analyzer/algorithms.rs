use crate::analyzer::baseline::Baseline;
use crate::analyzer::metrics::{ComplexMetric, Metric};
use crate::commons::TimeRange;
use crate::error::TypeError;
use crate::util::{check_length, check_max_items};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

type Params = Option<BTreeMap<String, String>>;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DiffMode {
    Abs,
    Pct,
}

/// Restricts a diff to one side of the baseline. Unset means both sides.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ThresholdType {
    Lower,
    Upper,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DiffConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema_version: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Params,

    pub metric: Metric,

    pub mode: DiffMode,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub threshold_type: Option<ThresholdType>,

    pub threshold: f64,

    pub baseline: Baseline,
}

impl DiffConfig {
    pub fn new(
        metric: impl Into<Metric>,
        mode: DiffMode,
        threshold: f64,
        baseline: Baseline,
    ) -> Self {
        DiffConfig {
            schema_version: None,
            params: None,
            metric: metric.into(),
            mode,
            threshold_type: None,
            threshold,
            baseline,
        }
    }
}

/// Upper and lower bounds built from the stddev of the baseline.
/// Falls back to a Poisson distribution when the baseline holds a single value.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StddevConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema_version: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Params,

    pub metric: Metric,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_upper_threshold: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_lower_threshold: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub factor: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_batch_size: Option<u32>,

    pub baseline: Baseline,
}

impl StddevConfig {
    pub fn new(metric: impl Into<Metric>, baseline: Baseline) -> Self {
        StddevConfig {
            schema_version: None,
            params: None,
            metric: metric.into(),
            max_upper_threshold: None,
            min_lower_threshold: None,
            factor: Some(3.0),
            min_batch_size: Some(1),
            baseline,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum SeasonalAlgorithm {
    #[default]
    Arima,
    Rego,
    Stastforecast,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SeasonalConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema_version: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Params,

    pub metric: Metric,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_upper_threshold: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_lower_threshold: Option<f64>,

    #[serde(default)]
    pub algorithm: SeasonalAlgorithm,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_batch_size: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub alpha: Option<f64>,

    /// Only a trailing window is meaningful for seasonal analysis
    pub baseline: Baseline,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub stddev_time_ranges: Option<Vec<TimeRange>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub stddev_max_batch_size: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub stddev_factor: Option<f64>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum DriftAlgorithm {
    #[default]
    Hellinger,
    KsTest,
    KlDivergence,
    VariationDistance,
}

/// Distribution drift over `histogram` or `frequent_items`
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DriftConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema_version: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Params,

    pub metric: Metric,

    #[serde(default)]
    pub algorithm: DriftAlgorithm,

    pub threshold: f64,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_batch_size: Option<u32>,

    pub baseline: Baseline,
}

impl DriftConfig {
    pub fn new(metric: ComplexMetric, baseline: Baseline) -> Self {
        DriftConfig {
            schema_version: None,
            params: None,
            metric: metric.into(),
            algorithm: DriftAlgorithm::Hellinger,
            threshold: 0.7,
            min_batch_size: Some(1),
            baseline,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ComparisonOperator {
    Eq,
    Gt,
    Lt,
    Ge,
    Le,
}

/// One of the fields must be set
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct ExpectedValue {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub str: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub int: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub float: Option<f64>,
}

/// Compares the target against an expected value, or against the baseline when no value is set
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema_version: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Params,

    pub metric: Metric,

    pub operator: ComparisonOperator,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected: Option<ExpectedValue>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub baseline: Option<Baseline>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ColumnListChangeMode {
    #[default]
    OnAddAndRemove,
    OnAdd,
    OnRemove,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ColumnListChangeConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema_version: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Params,

    pub metric: Metric,

    #[serde(default)]
    pub mode: ColumnListChangeMode,

    /// Column names to ignore, regexes allowed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclude: Option<Vec<String>>,

    pub baseline: Baseline,
}

/// Static thresholds. A no-op when neither bound is set.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FixedThresholdsConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema_version: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Params,

    pub metric: Metric,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub upper: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub lower: Option<f64>,
}

impl FixedThresholdsConfig {
    pub fn new(metric: impl Into<Metric>, lower: Option<f64>, upper: Option<f64>) -> Self {
        FixedThresholdsConfig {
            schema_version: None,
            params: None,
            metric: metric.into(),
            upper,
            lower,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExperimentalConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema_version: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Params,

    pub metric: Metric,

    pub implementation: String,

    pub baseline: Baseline,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub stub: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ListComparisonOperator {
    In,
    NotIn,
}

/// Checks the target value for membership in an expected list
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ListComparisonConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema_version: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Params,

    pub metric: Metric,

    pub operator: ListComparisonOperator,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected: Option<Vec<ExpectedValue>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub baseline: Option<Baseline>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FrequentStringComparisonOperator {
    Eq,
    TargetIncludesAllBaseline,
    BaselineIncludesAllTarget,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FrequentStringComparisonConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema_version: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Params,

    pub metric: Metric,

    pub operator: FrequentStringComparisonOperator,

    pub baseline: Baseline,
}

/// Combines the results of other analyzers. Fires only when all of them fire.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ConjunctionConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema_version: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Params,

    pub metric: Metric,

    pub analyzer_ids: Vec<String>,
}

/// Combines the results of other analyzers. Fires when any of them fires.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DisjunctionConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema_version: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Params,

    pub metric: Metric,

    pub analyzer_ids: Vec<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AlgorithmConfig {
    Diff(DiffConfig),
    Stddev(StddevConfig),
    Drift(DriftConfig),
    Comparison(ComparisonConfig),
    #[serde(rename = "fixed")]
    FixedThresholds(FixedThresholdsConfig),
    Seasonal(SeasonalConfig),
    #[serde(rename = "column_list")]
    ColumnListChange(ColumnListChangeConfig),
    Experimental(ExperimentalConfig),
    Conjunction(ConjunctionConfig),
    Disjunction(DisjunctionConfig),
    ListComparison(ListComparisonConfig),
    FrequentStringComparison(FrequentStringComparisonConfig),
}

impl AlgorithmConfig {
    pub fn type_name(&self) -> &'static str {
        match self {
            AlgorithmConfig::Diff(_) => "diff",
            AlgorithmConfig::Stddev(_) => "stddev",
            AlgorithmConfig::Drift(_) => "drift",
            AlgorithmConfig::Comparison(_) => "comparison",
            AlgorithmConfig::FixedThresholds(_) => "fixed",
            AlgorithmConfig::Seasonal(_) => "seasonal",
            AlgorithmConfig::ColumnListChange(_) => "column_list",
            AlgorithmConfig::Experimental(_) => "experimental",
            AlgorithmConfig::Conjunction(_) => "conjunction",
            AlgorithmConfig::Disjunction(_) => "disjunction",
            AlgorithmConfig::ListComparison(_) => "list_comparison",
            AlgorithmConfig::FrequentStringComparison(_) => "frequent_string_comparison",
        }
    }

    pub fn metric(&self) -> &Metric {
        match self {
            AlgorithmConfig::Diff(config) => &config.metric,
            AlgorithmConfig::Stddev(config) => &config.metric,
            AlgorithmConfig::Drift(config) => &config.metric,
            AlgorithmConfig::Comparison(config) => &config.metric,
            AlgorithmConfig::FixedThresholds(config) => &config.metric,
            AlgorithmConfig::Seasonal(config) => &config.metric,
            AlgorithmConfig::ColumnListChange(config) => &config.metric,
            AlgorithmConfig::Experimental(config) => &config.metric,
            AlgorithmConfig::Conjunction(config) => &config.metric,
            AlgorithmConfig::Disjunction(config) => &config.metric,
            AlgorithmConfig::ListComparison(config) => &config.metric,
            AlgorithmConfig::FrequentStringComparison(config) => &config.metric,
        }
    }

    pub fn baseline(&self) -> Option<&Baseline> {
        match self {
            AlgorithmConfig::Diff(config) => Some(&config.baseline),
            AlgorithmConfig::Stddev(config) => Some(&config.baseline),
            AlgorithmConfig::Drift(config) => Some(&config.baseline),
            AlgorithmConfig::Comparison(config) => config.baseline.as_ref(),
            AlgorithmConfig::Seasonal(config) => Some(&config.baseline),
            AlgorithmConfig::ColumnListChange(config) => Some(&config.baseline),
            AlgorithmConfig::Experimental(config) => Some(&config.baseline),
            AlgorithmConfig::ListComparison(config) => config.baseline.as_ref(),
            AlgorithmConfig::FrequentStringComparison(config) => Some(&config.baseline),
            AlgorithmConfig::FixedThresholds(_)
            | AlgorithmConfig::Conjunction(_)
            | AlgorithmConfig::Disjunction(_) => None,
        }
    }

    /// Replaces the baseline of configs that compare against one.
    ///
    /// Fixed thresholds and composed configs have no baseline, and seasonal
    /// analysis only supports a trailing window.
    pub fn set_baseline(&mut self, baseline: Baseline) -> Result<(), TypeError> {
        let type_name = self.type_name();
        match self {
            AlgorithmConfig::Diff(config) => config.baseline = baseline,
            AlgorithmConfig::Stddev(config) => config.baseline = baseline,
            AlgorithmConfig::Drift(config) => config.baseline = baseline,
            AlgorithmConfig::Comparison(config) => config.baseline = Some(baseline),
            AlgorithmConfig::ColumnListChange(config) => config.baseline = baseline,
            AlgorithmConfig::Experimental(config) => config.baseline = baseline,
            AlgorithmConfig::ListComparison(config) => config.baseline = Some(baseline),
            AlgorithmConfig::FrequentStringComparison(config) => config.baseline = baseline,
            AlgorithmConfig::Seasonal(config) => {
                if !matches!(baseline, Baseline::TrailingWindow(_)) {
                    return Err(TypeError::invalid_field(
                        "config.baseline",
                        "seasonal configs only support a TrailingWindow baseline",
                    ));
                }
                config.baseline = baseline;
            }
            AlgorithmConfig::FixedThresholds(_)
            | AlgorithmConfig::Conjunction(_)
            | AlgorithmConfig::Disjunction(_) => {
                return Err(TypeError::invalid_field(
                    "config.baseline",
                    format!("{type_name} configs do not use a baseline"),
                ));
            }
        }
        Ok(())
    }

    /// Composed configs whose inner analyzers are validated independently
    pub fn is_composed(&self) -> bool {
        matches!(
            self,
            AlgorithmConfig::Conjunction(_) | AlgorithmConfig::Disjunction(_)
        )
    }

    /// Configs that may carry the constraint tag
    pub fn supports_constraint(&self) -> bool {
        matches!(
            self,
            AlgorithmConfig::FixedThresholds(_)
                | AlgorithmConfig::Conjunction(_)
                | AlgorithmConfig::Disjunction(_)
        )
    }

    fn params(&self) -> Option<&BTreeMap<String, String>> {
        match self {
            AlgorithmConfig::Diff(config) => config.params.as_ref(),
            AlgorithmConfig::Stddev(config) => config.params.as_ref(),
            AlgorithmConfig::Drift(config) => config.params.as_ref(),
            AlgorithmConfig::Comparison(config) => config.params.as_ref(),
            AlgorithmConfig::FixedThresholds(config) => config.params.as_ref(),
            AlgorithmConfig::Seasonal(config) => config.params.as_ref(),
            AlgorithmConfig::ColumnListChange(config) => config.params.as_ref(),
            AlgorithmConfig::Experimental(config) => config.params.as_ref(),
            AlgorithmConfig::Conjunction(config) => config.params.as_ref(),
            AlgorithmConfig::Disjunction(config) => config.params.as_ref(),
            AlgorithmConfig::ListComparison(config) => config.params.as_ref(),
            AlgorithmConfig::FrequentStringComparison(config) => config.params.as_ref(),
        }
    }

    pub fn validate(&self) -> Result<(), TypeError> {
        if let Metric::Custom(name) = self.metric() {
            check_length("config.metric", name, 1, 100)?;
        }

        if let Some(params) = self.params() {
            for (key, value) in params {
                check_length("config.params", key, 1, 100)?;
                check_length("config.params", value, 0, 1000)?;
            }
        }

        if let Some(baseline) = self.baseline() {
            baseline.validate()?;
        }

        match self {
            AlgorithmConfig::Drift(config) => {
                if !matches!(
                    config.metric,
                    Metric::Complex(ComplexMetric::Histogram)
                        | Metric::Complex(ComplexMetric::FrequentItems)
                ) {
                    return Err(TypeError::invalid_field(
                        "config.metric",
                        format!(
                            "drift requires histogram or frequent_items, got {}",
                            config.metric
                        ),
                    ));
                }
                if !(0.0..=1.0).contains(&config.threshold) {
                    return Err(TypeError::invalid_field(
                        "config.threshold",
                        "drift threshold must be between 0 and 1",
                    ));
                }
            }
            AlgorithmConfig::ColumnListChange(config) => {
                if config.metric != Metric::Complex(ComplexMetric::ColumnList) {
                    return Err(TypeError::invalid_field(
                        "config.metric",
                        "column_list configs require the column_list metric",
                    ));
                }
                if let Some(exclude) = &config.exclude {
                    check_max_items("config.exclude", exclude, 1000)?;
                }
            }
            AlgorithmConfig::Seasonal(config) => {
                if !matches!(config.baseline, Baseline::TrailingWindow(_)) {
                    return Err(TypeError::invalid_field(
                        "config.baseline",
                        "seasonal configs only support a TrailingWindow baseline",
                    ));
                }
            }
            AlgorithmConfig::Stddev(config) => {
                if matches!(config.baseline, Baseline::CurrentBatch(_)) {
                    return Err(TypeError::invalid_field(
                        "config.baseline",
                        "stddev configs do not support a CurrentBatch baseline",
                    ));
                }
                if config.min_batch_size == Some(0) {
                    return Err(TypeError::invalid_field(
                        "config.minBatchSize",
                        "must be at least 1",
                    ));
                }
            }
            AlgorithmConfig::Conjunction(ConjunctionConfig { analyzer_ids, .. })
            | AlgorithmConfig::Disjunction(DisjunctionConfig { analyzer_ids, .. }) => {
                if analyzer_ids.is_empty() {
                    return Err(TypeError::invalid_field(
                        "config.analyzerIds",
                        "composed configs need at least one analyzer id",
                    ));
                }
            }
            AlgorithmConfig::Experimental(config) => {
                check_length("config.implementation", &config.implementation, 1, 100)?;
            }
            _ => {}
        }
        Ok(())
    }
}

impl From<DiffConfig> for AlgorithmConfig {
    fn from(config: DiffConfig) -> Self {
        AlgorithmConfig::Diff(config)
    }
}

impl From<StddevConfig> for AlgorithmConfig {
    fn from(config: StddevConfig) -> Self {
        AlgorithmConfig::Stddev(config)
    }
}

impl From<DriftConfig> for AlgorithmConfig {
    fn from(config: DriftConfig) -> Self {
        AlgorithmConfig::Drift(config)
    }
}

impl From<FixedThresholdsConfig> for AlgorithmConfig {
    fn from(config: FixedThresholdsConfig) -> Self {
        AlgorithmConfig::FixedThresholds(config)
    }
}

impl From<ComparisonConfig> for AlgorithmConfig {
    fn from(config: ComparisonConfig) -> Self {
        AlgorithmConfig::Comparison(config)
    }
}

impl From<SeasonalConfig> for AlgorithmConfig {
    fn from(config: SeasonalConfig) -> Self {
        AlgorithmConfig::Seasonal(config)
    }
}

impl From<ConjunctionConfig> for AlgorithmConfig {
    fn from(config: ConjunctionConfig) -> Self {
        AlgorithmConfig::Conjunction(config)
    }
}

impl From<DisjunctionConfig> for AlgorithmConfig {
    fn from(config: DisjunctionConfig) -> Self {
        AlgorithmConfig::Disjunction(config)
    }
}
