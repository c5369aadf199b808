use crate::credentials::MonitorCredentials;
use crate::error::MonitorError;
use crate::helpers::optional;
use crate::reconcile::{reconcile, AnalyzerDraft};
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, info, instrument};
use whylabs_http::WhyLabsApi;
use whylabs_types::util::is_iso8601_duration;
use whylabs_types::{
    AlgorithmConfig, Analyzer, Baseline, ColumnGroup, EntitySchema, Granularity, JsonFuncs,
    Monitor, MonitorAction, MonitorMode, Schedule, TargetMatrix, TimeRange, CONSTRAINT_TAG,
};

/// Position of a setup in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetupStatus {
    Uninitialized,
    Mutated,
    Applied,
    Saved,
}

/// Converts a point in time to UTC. Naive values are taken as UTC.
pub trait ToUtc {
    fn to_utc_datetime(&self) -> DateTime<Utc>;
}

impl<Tz: TimeZone> ToUtc for DateTime<Tz> {
    fn to_utc_datetime(&self) -> DateTime<Utc> {
        self.with_timezone(&Utc)
    }
}

impl ToUtc for NaiveDateTime {
    fn to_utc_datetime(&self) -> DateTime<Utc> {
        Utc.from_utc_datetime(self)
    }
}

impl ToUtc for NaiveDate {
    fn to_utc_datetime(&self) -> DateTime<Utc> {
        Utc.from_utc_datetime(&self.and_time(NaiveTime::default()))
    }
}

/// Builds one monitor and its analyzer.
///
/// Any monitor or analyzer already stored under the credentials is loaded on
/// construction and pre-fills the settable fields. Setters only change local
/// state, [`MonitorSetup::apply`] turns it into a [`Monitor`] and an [`Analyzer`].
pub struct MonitorSetup {
    api: Arc<dyn WhyLabsApi>,
    credentials: MonitorCredentials,
    existing_monitor: Option<Monitor>,
    existing_analyzer: Option<Analyzer>,

    schedule: Option<Schedule>,
    target_matrix: Option<TargetMatrix>,
    config: Option<AlgorithmConfig>,
    actions: Option<Vec<MonitorAction>>,
    mode: Option<MonitorMode>,
    target_columns: Option<Vec<String>>,
    exclude_columns: Option<Vec<String>>,
    monitor_tags: Option<Vec<String>>,
    analyzer_tags: Option<Vec<String>>,
    disable_target_rollup: Option<bool>,
    data_readiness_duration: Option<String>,

    monitor: Option<Monitor>,
    analyzer: Option<Analyzer>,
    status: SetupStatus,
}

impl MonitorSetup {
    #[instrument(skip_all)]
    pub fn new(
        api: Arc<dyn WhyLabsApi>,
        credentials: MonitorCredentials,
    ) -> Result<Self, MonitorError> {
        let existing_monitor = optional(
            api.get_monitor(
                &credentials.org_id,
                &credentials.dataset_id,
                &credentials.monitor_id,
            )
            .map_err(MonitorError::from),
            "Monitor",
        )?;
        if existing_monitor.is_some() {
            info!("Found existing monitor {}", credentials.monitor_id);
        }

        let existing_analyzer = optional(
            api.get_analyzer(
                &credentials.org_id,
                &credentials.dataset_id,
                &credentials.analyzer_id,
            )
            .map_err(MonitorError::from),
            "Analyzer",
        )?;
        if existing_analyzer.is_some() {
            info!("Found existing analyzer {}", credentials.analyzer_id);
        }

        let mut setup = MonitorSetup {
            api,
            credentials,
            existing_monitor,
            existing_analyzer,
            schedule: None,
            target_matrix: None,
            config: None,
            actions: None,
            mode: None,
            target_columns: None,
            exclude_columns: None,
            monitor_tags: None,
            analyzer_tags: None,
            disable_target_rollup: None,
            data_readiness_duration: None,
            monitor: None,
            analyzer: None,
            status: SetupStatus::Uninitialized,
        };
        setup.prefill();
        Ok(setup)
    }

    fn prefill(&mut self) {
        if let Some(monitor) = &self.existing_monitor {
            self.mode = Some(monitor.mode.clone());
            self.actions = Some(monitor.actions.clone());
            self.monitor_tags = monitor.tags.clone();
        }

        if let Some(analyzer) = &self.existing_analyzer {
            self.schedule = analyzer.schedule.clone();
            self.target_matrix = Some(analyzer.target_matrix.clone());
            self.config = Some(analyzer.config.clone());
            self.analyzer_tags = analyzer.tags.clone();
            self.disable_target_rollup = analyzer.disable_target_rollup;
            self.data_readiness_duration = analyzer.data_readiness_duration.clone();
        }
    }

    fn mark_mutated(&mut self) {
        self.status = SetupStatus::Mutated;
    }

    pub(crate) fn mark_saved(&mut self) {
        self.status = SetupStatus::Saved;
    }

    pub(crate) fn api(&self) -> &Arc<dyn WhyLabsApi> {
        &self.api
    }

    pub(crate) fn monitor_mut(&mut self) -> Option<&mut Monitor> {
        self.monitor.as_mut()
    }

    pub fn status(&self) -> SetupStatus {
        self.status
    }

    pub fn credentials(&self) -> &MonitorCredentials {
        &self.credentials
    }

    pub fn existing_monitor(&self) -> Option<&Monitor> {
        self.existing_monitor.as_ref()
    }

    pub fn existing_analyzer(&self) -> Option<&Analyzer> {
        self.existing_analyzer.as_ref()
    }

    /// Set by [`MonitorSetup::apply`]
    pub fn monitor(&self) -> Option<&Monitor> {
        self.monitor.as_ref()
    }

    /// Set by [`MonitorSetup::apply`]
    pub fn analyzer(&self) -> Option<&Analyzer> {
        self.analyzer.as_ref()
    }

    pub fn schedule(&self) -> Option<&Schedule> {
        self.schedule.as_ref()
    }

    pub fn target_matrix(&self) -> Option<&TargetMatrix> {
        self.target_matrix.as_ref()
    }

    pub fn config(&self) -> Option<&AlgorithmConfig> {
        self.config.as_ref()
    }

    pub fn actions(&self) -> Option<&Vec<MonitorAction>> {
        self.actions.as_ref()
    }

    pub fn mode(&self) -> Option<&MonitorMode> {
        self.mode.as_ref()
    }

    pub fn target_columns(&self) -> Option<&Vec<String>> {
        self.target_columns.as_ref()
    }

    pub fn exclude_columns(&self) -> Option<&Vec<String>> {
        self.exclude_columns.as_ref()
    }

    pub fn monitor_tags(&self) -> Option<&Vec<String>> {
        self.monitor_tags.as_ref()
    }

    pub fn analyzer_tags(&self) -> Option<&Vec<String>> {
        self.analyzer_tags.as_ref()
    }

    pub fn disable_target_rollup(&self) -> Option<bool> {
        self.disable_target_rollup
    }

    pub fn data_readiness_duration(&self) -> Option<&str> {
        self.data_readiness_duration.as_deref()
    }

    pub fn is_constraint(&self) -> bool {
        self.analyzer_tags
            .as_ref()
            .is_some_and(|tags| tags.iter().any(|tag| tag == CONSTRAINT_TAG))
    }

    pub fn set_credentials(&mut self, credentials: MonitorCredentials) {
        self.credentials = credentials;
        self.mark_mutated();
    }

    pub fn set_schedule(&mut self, schedule: Schedule) {
        self.schedule = Some(schedule);
        self.mark_mutated();
    }

    pub fn set_target_matrix(&mut self, target_matrix: TargetMatrix) {
        self.target_matrix = Some(target_matrix);
        self.mark_mutated();
    }

    /// Drops the constraint tag when the new config cannot be a constraint
    pub fn set_config(&mut self, config: impl Into<AlgorithmConfig>) {
        let config = config.into();
        if !config.supports_constraint() && self.is_constraint() {
            debug!("Config cannot be a constraint, removing {}", CONSTRAINT_TAG);
            if let Some(tags) = self.analyzer_tags.as_mut() {
                tags.retain(|tag| tag != CONSTRAINT_TAG);
            }
        }
        self.config = Some(config);
        self.mark_mutated();
    }

    pub fn set_actions(&mut self, actions: Vec<MonitorAction>) {
        self.actions = Some(actions);
        self.mark_mutated();
    }

    pub fn set_mode(&mut self, mode: MonitorMode) {
        self.mode = Some(mode);
        self.mark_mutated();
    }

    pub fn set_monitor_tags(&mut self, tags: Vec<String>) {
        self.monitor_tags = Some(tags);
        self.mark_mutated();
    }

    pub fn set_analyzer_tags(&mut self, tags: Vec<String>) {
        self.analyzer_tags = Some(tags);
        self.mark_mutated();
    }

    pub fn set_disable_target_rollup(&mut self, disable_target_rollup: bool) {
        self.disable_target_rollup = Some(disable_target_rollup);
        self.mark_mutated();
    }

    fn entity_schema(&self) -> Result<EntitySchema, MonitorError> {
        let schema = optional(
            self.api
                .get_entity_schema(&self.credentials.org_id, &self.credentials.dataset_id)
                .map_err(MonitorError::from),
            "Entity schema",
        )?;
        Ok(schema.unwrap_or_default())
    }

    /// Group tokens are always accepted. Anything else must be a column of
    /// the dataset, so the entity schema is only fetched when needed.
    fn check_columns(&self, columns: &[String]) -> Result<(), MonitorError> {
        let named: Vec<&String> = columns
            .iter()
            .filter(|column| !ColumnGroup::is_group(column))
            .collect();
        if named.is_empty() {
            return Ok(());
        }

        let schema = self.entity_schema()?;
        let invalid: Vec<&str> = named
            .into_iter()
            .filter(|column| !schema.has_column(column))
            .map(String::as_str)
            .collect();

        if invalid.is_empty() {
            return Ok(());
        }

        Err(MonitorError::traced_validation_error(format!(
            "Columns {:?} are not present in dataset {}. Available columns: {:?}",
            invalid,
            self.credentials.dataset_id,
            schema.column_names()
        )))
    }

    /// Columns (or group tokens) the analyzer targets
    #[instrument(skip_all)]
    pub fn set_target_columns(&mut self, columns: Vec<String>) -> Result<(), MonitorError> {
        self.check_columns(&columns)?;

        if let Some(TargetMatrix::Column(matrix)) = &mut self.target_matrix {
            matrix.include = Some(columns.clone());
        }
        debug!("Target columns set to {:?}", columns);
        self.target_columns = Some(columns);
        self.mark_mutated();
        Ok(())
    }

    /// Columns (or group tokens) removed after the targets are resolved
    #[instrument(skip_all)]
    pub fn exclude_target_columns(&mut self, columns: Vec<String>) -> Result<(), MonitorError> {
        self.check_columns(&columns)?;

        if let Some(TargetMatrix::Column(matrix)) = &mut self.target_matrix {
            matrix.exclude = Some(columns.clone());
        }
        debug!("Excluded columns set to {:?}", columns);
        self.exclude_columns = Some(columns);
        self.mark_mutated();
        Ok(())
    }

    /// Compares against a fixed window instead of the configured baseline
    pub fn set_fixed_dates_baseline(
        &mut self,
        start: impl ToUtc,
        end: impl ToUtc,
    ) -> Result<(), MonitorError> {
        let Some(config) = self.config.as_mut() else {
            return Err(MonitorError::validation(
                "config must first be set before setting a fixed dates baseline",
            ));
        };

        let range = TimeRange::new(start.to_utc_datetime(), end.to_utc_datetime())?;
        config.set_baseline(Baseline::time_range(range))?;
        self.mark_mutated();
        Ok(())
    }

    pub fn set_data_readiness_duration(&mut self, duration: &str) -> Result<(), MonitorError> {
        if !is_iso8601_duration(duration) {
            return Err(MonitorError::validation(format!(
                "data readiness duration '{duration}' must be an ISO 8601 duration such as P1DT18H"
            )));
        }
        self.data_readiness_duration = Some(duration.to_string());
        self.mark_mutated();
        Ok(())
    }

    /// Constraints are only supported for fixed thresholds and composed configs
    pub fn set_is_constraint(&mut self, is_constraint: bool) -> Result<(), MonitorError> {
        if is_constraint {
            let supported = self
                .config
                .as_ref()
                .is_some_and(AlgorithmConfig::supports_constraint);
            if !supported {
                return Err(MonitorError::validation(
                    "constraints are only supported for fixed, conjunction and disjunction configs",
                ));
            }
            let tags = self.analyzer_tags.get_or_insert_with(Vec::new);
            if !tags.iter().any(|tag| tag == CONSTRAINT_TAG) {
                tags.push(CONSTRAINT_TAG.to_string());
            }
        } else if let Some(tags) = self.analyzer_tags.as_mut() {
            tags.retain(|tag| tag != CONSTRAINT_TAG);
        }
        self.mark_mutated();
        Ok(())
    }

    /// Granularity of the dataset, read from its model metadata
    pub fn granularity(&self) -> Result<Granularity, MonitorError> {
        match self
            .api
            .get_model(&self.credentials.org_id, &self.credentials.dataset_id)
        {
            Ok(model) => Ok(model.granularity()),
            Err(e) if e.is_not_found() => Err(MonitorError::Granularity(
                self.credentials.dataset_id.clone(),
            )),
            Err(e) => Err(e.into()),
        }
    }

    fn build_monitor(&self, mode: MonitorMode, actions: Vec<MonitorAction>) -> Monitor {
        let mut monitor = Monitor::new(
            &self.credentials.monitor_id,
            vec![self.credentials.analyzer_id.clone()],
            mode,
        );
        monitor.display_name = Some(self.credentials.monitor_id.clone());
        monitor.tags = self.monitor_tags.clone();
        monitor.schedule = Schedule::Immediate;
        monitor.disabled = Some(false);
        monitor.actions = actions;
        monitor
    }

    /// Synthesizes the monitor and analyzer from the current state
    #[instrument(skip_all)]
    pub fn apply(&mut self) -> Result<(), MonitorError> {
        let Some(config) = self.config.clone() else {
            return Err(MonitorError::traced_validation_error(
                "config must be set before calling apply()",
            ));
        };

        let mode = self.mode.get_or_insert_with(MonitorMode::default).clone();
        let actions = self.actions.get_or_insert_with(Vec::new).clone();

        let schedule = match &self.schedule {
            Some(schedule) => schedule.clone(),
            None => {
                let schedule = Schedule::fixed(self.granularity()?.into());
                debug!("Defaulting analyzer schedule to {:?}", schedule);
                self.schedule = Some(schedule.clone());
                schedule
            }
        };

        let monitor = self.build_monitor(mode, actions);

        let reconciliation = reconcile(&AnalyzerDraft {
            analyzer_id: self.credentials.analyzer_id.clone(),
            config,
            schedule,
            target_matrix: self.target_matrix.clone(),
            target_columns: self.target_columns.clone(),
            exclude_columns: self.exclude_columns.clone(),
            tags: self.analyzer_tags.clone(),
            disable_target_rollup: self.disable_target_rollup,
            data_readiness_duration: self.data_readiness_duration.clone(),
        });

        self.target_matrix = Some(reconciliation.analyzer.target_matrix.clone());
        self.monitor = Some(monitor);
        self.analyzer = Some(reconciliation.analyzer);
        self.status = SetupStatus::Applied;

        debug!(
            "Applied monitor {} with {} target matrix correction(s)",
            self.credentials.monitor_id,
            reconciliation.corrections.len()
        );
        Ok(())
    }

    /// Colored json of the credentials and the applied monitor and analyzer
    pub fn describe(&self) -> String {
        JsonFuncs::colored_str(json!({
            "credentials": self.credentials,
            "status": format!("{:?}", self.status),
            "monitor": self.monitor,
            "analyzer": self.analyzer,
        }))
    }
}

impl std::fmt::Debug for MonitorSetup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MonitorSetup")
            .field("credentials", &self.credentials)
            .field("status", &self.status)
            .field("config", &self.config)
            .field("target_matrix", &self.target_matrix)
            .finish()
    }
}
