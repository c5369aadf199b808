use tracing::warn;
use whylabs_types::{
    AlgorithmConfig, Analyzer, ColumnMatrix, DatasetMatrix, Metric, Schedule, Segment,
    TargetMatrix,
};

/// Everything the analyzer is built from, gathered by the setup
#[derive(Debug, Clone, PartialEq)]
pub struct AnalyzerDraft {
    pub analyzer_id: String,
    pub config: AlgorithmConfig,
    pub schedule: Schedule,
    pub target_matrix: Option<TargetMatrix>,
    pub target_columns: Option<Vec<String>>,
    pub exclude_columns: Option<Vec<String>>,
    pub tags: Option<Vec<String>>,
    pub disable_target_rollup: Option<bool>,
    pub data_readiness_duration: Option<String>,
}

/// A target matrix rewrite applied to keep the metric and the matrix compatible
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Correction {
    /// Dataset metric paired with a column matrix
    ToDatasetMatrix { metric: String },
    /// Column metric paired with a dataset matrix
    ToColumnMatrix { metric: String },
    /// Ingestion metric paired with a column matrix
    IngestionToDatasetMatrix { metric: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Reconciliation {
    pub analyzer: Analyzer,
    pub corrections: Vec<Correction>,
}

fn default_column_matrix(
    target_columns: Option<&Vec<String>>,
    exclude_columns: Option<&Vec<String>>,
    segments: Vec<Segment>,
) -> ColumnMatrix {
    let include = target_columns
        .cloned()
        .unwrap_or_else(|| vec!["*".to_string()]);
    let exclude = exclude_columns.cloned().unwrap_or_default();
    ColumnMatrix::new(include, exclude, segments)
}

fn segments_of(matrix: &TargetMatrix) -> Vec<Segment> {
    matrix.segments().cloned().unwrap_or_default()
}

/// Picks the target matrix matching the metric of `config`.
///
/// Composed configs skip the dataset metric rule, the ingestion rule always applies.
pub fn reconcile_target_matrix(
    target_matrix: Option<&TargetMatrix>,
    config: &AlgorithmConfig,
    target_columns: Option<&Vec<String>>,
    exclude_columns: Option<&Vec<String>>,
) -> (TargetMatrix, Vec<Correction>) {
    let mut corrections = vec![];
    let mut matrix = match target_matrix {
        Some(matrix) => matrix.clone(),
        None => default_column_matrix(target_columns, exclude_columns, vec![]).into(),
    };
    let metric: &Metric = config.metric();

    if !config.is_composed() {
        if metric.is_dataset_metric() && matrix.is_column() {
            warn!(
                "Metric {} is a dataset metric, switching the target matrix to a DatasetMatrix",
                metric
            );
            matrix = DatasetMatrix {
                segments: Some(segments_of(&matrix)),
            }
            .into();
            corrections.push(Correction::ToDatasetMatrix {
                metric: metric.to_string(),
            });
        } else if !metric.is_dataset_metric()
            && !metric.is_ingestion_metric()
            && matrix.is_dataset()
        {
            warn!(
                "Metric {} is a column metric, switching the target matrix to a ColumnMatrix",
                metric
            );
            matrix = default_column_matrix(target_columns, exclude_columns, segments_of(&matrix))
                .into();
            corrections.push(Correction::ToColumnMatrix {
                metric: metric.to_string(),
            });
        }
    }

    if metric.is_ingestion_metric() && matrix.is_column() {
        warn!(
            "Metric {} is only available for the whole dataset, switching the target matrix to a DatasetMatrix",
            metric
        );
        matrix = DatasetMatrix {
            segments: Some(segments_of(&matrix)),
        }
        .into();
        corrections.push(Correction::IngestionToDatasetMatrix {
            metric: metric.to_string(),
        });
    }

    (matrix, corrections)
}

/// Builds the analyzer for `draft` without touching the remote store
pub fn reconcile(draft: &AnalyzerDraft) -> Reconciliation {
    let (target_matrix, corrections) = reconcile_target_matrix(
        draft.target_matrix.as_ref(),
        &draft.config,
        draft.target_columns.as_ref(),
        draft.exclude_columns.as_ref(),
    );

    let mut analyzer = Analyzer::new(&draft.analyzer_id, target_matrix, draft.config.clone());
    analyzer.display_name = Some(draft.analyzer_id.clone());
    analyzer.disable_target_rollup = draft.disable_target_rollup;
    analyzer.data_readiness_duration = draft.data_readiness_duration.clone();
    analyzer.tags = draft.tags.clone();
    analyzer.schedule = Some(draft.schedule.clone());

    Reconciliation {
        analyzer,
        corrections,
    }
}
