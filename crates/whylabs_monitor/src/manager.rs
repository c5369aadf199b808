use crate::error::MonitorError;
use crate::setup::MonitorSetup;
use serde_json::{json, Value};
use std::collections::HashSet;
use std::path::PathBuf;
use tracing::{debug, info, instrument};
use whylabs_types::schema::validate_document;
use whylabs_types::{Document, Granularity, JsonFuncs, MonitorAction};

const ALLOW_PARTIAL_TARGET_BATCHES: &str = "allowPartialTargetBatches";

/// Validates an applied [`MonitorSetup`] and persists it
#[derive(Debug)]
pub struct MonitorManager {
    setup: MonitorSetup,
    eager: Option<bool>,
}

impl MonitorManager {
    pub fn new(setup: MonitorSetup) -> Self {
        MonitorManager { setup, eager: None }
    }

    /// Analyze partial target batches as soon as they arrive.
    /// Applies to every monitor of the dataset.
    pub fn with_eager(mut self, eager: bool) -> Self {
        self.eager = Some(eager);
        self
    }

    pub fn eager(&self) -> Option<bool> {
        self.eager
    }

    pub fn setup(&self) -> &MonitorSetup {
        &self.setup
    }

    pub fn setup_mut(&mut self) -> &mut MonitorSetup {
        &mut self.setup
    }

    pub fn into_setup(self) -> MonitorSetup {
        self.setup
    }

    pub fn get_granularity(&self) -> Result<Granularity, MonitorError> {
        self.setup.granularity()
    }

    /// Registers non-global actions the organization does not know yet and
    /// rewrites every action into a global reference
    #[instrument(skip_all)]
    fn reconcile_actions(&mut self) -> Result<(), MonitorError> {
        let api = self.setup.api().clone();
        let org_id = self.setup.credentials().org_id.clone();

        let Some(monitor) = self.setup.monitor_mut() else {
            return Err(MonitorError::NotApplied);
        };

        if monitor
            .actions
            .iter()
            .all(|action| matches!(action, MonitorAction::Global(_)))
        {
            return Ok(());
        }

        let registered: HashSet<String> = api
            .list_notification_actions(&org_id)?
            .into_iter()
            .map(|action| action.id)
            .collect();

        for action in &monitor.actions {
            let Some((action_type, destination)) = action.registration() else {
                continue;
            };
            if registered.contains(action.id()) {
                debug!("Notification action {} already registered", action.id());
                continue;
            }

            let payload = json!({ action_type.payload_key(): destination });
            api.put_notification_action(&org_id, action_type, action.id(), &payload)?;
            info!(
                "Registered {} notification action {}",
                action_type,
                action.id()
            );
        }

        monitor.actions = monitor
            .actions
            .iter()
            .map(MonitorAction::to_global)
            .collect();
        Ok(())
    }

    /// The configuration document holding the applied monitor and analyzer
    pub fn document(&mut self) -> Result<Document, MonitorError> {
        self.reconcile_actions()?;

        let (Some(monitor), Some(analyzer)) = (self.setup.monitor(), self.setup.analyzer()) else {
            return Err(MonitorError::NotApplied);
        };
        let (monitor, analyzer) = (monitor.clone(), analyzer.clone());

        let credentials = self.setup.credentials();
        let mut document = Document::new(
            &credentials.org_id,
            &credentials.dataset_id,
            self.get_granularity()?,
        );
        document.allow_partial_target_batches = self.eager;
        document.analyzers = vec![analyzer];
        document.monitors = vec![monitor];
        Ok(document)
    }

    /// Pretty printed document json. Unset fields are omitted.
    pub fn dump(&mut self) -> Result<String, MonitorError> {
        Ok(self.document()?.to_json()?)
    }

    /// Structural checks first, then the bundled JSON schema
    #[instrument(skip_all)]
    pub fn validate(&mut self) -> Result<bool, MonitorError> {
        let document = self.document()?;

        for monitor in &document.monitors {
            monitor.validate()?;
        }
        for analyzer in &document.analyzers {
            analyzer.validate()?;
        }

        let value = serde_json::to_value(&document)?;
        validate_document(&value)?;
        debug!("Monitor {} is valid", self.setup.credentials().monitor_id);
        Ok(true)
    }

    /// Validates, then overwrites the stored analyzer and monitor.
    ///
    /// The analyzer is written first so the monitor never references a
    /// missing analyzer. The two writes are not atomic.
    #[instrument(skip_all)]
    pub fn save(&mut self) -> Result<(), MonitorError> {
        self.validate()?;

        let (Some(monitor), Some(analyzer)) = (self.setup.monitor(), self.setup.analyzer()) else {
            return Err(MonitorError::NotApplied);
        };
        let api = self.setup.api();
        let credentials = self.setup.credentials();

        api.put_analyzer(
            &credentials.org_id,
            &credentials.dataset_id,
            &credentials.analyzer_id,
            analyzer,
        )?;
        api.put_monitor(
            &credentials.org_id,
            &credentials.dataset_id,
            &credentials.monitor_id,
            monitor,
        )?;
        info!(
            "Saved monitor {} and analyzer {}",
            credentials.monitor_id, credentials.analyzer_id
        );

        if let Some(eager) = self.eager {
            self.update_eager(eager)?;
        }

        self.setup.mark_saved();
        Ok(())
    }

    /// Sends only the flag, so other dataset-wide settings are left untouched
    fn update_eager(&self, eager: bool) -> Result<(), MonitorError> {
        let api = self.setup.api();
        let credentials = self.setup.credentials();

        let config = api.get_monitor_config(&credentials.org_id, &credentials.dataset_id)?;
        let stored = config
            .get(ALLOW_PARTIAL_TARGET_BATCHES)
            .and_then(Value::as_bool);
        if stored == Some(eager) {
            debug!("{} already set to {}", ALLOW_PARTIAL_TARGET_BATCHES, eager);
            return Ok(());
        }

        api.patch_monitor_config(
            &credentials.org_id,
            &credentials.dataset_id,
            &json!({ ALLOW_PARTIAL_TARGET_BATCHES: eager }),
        )?;
        info!("Set {} to {}", ALLOW_PARTIAL_TARGET_BATCHES, eager);
        Ok(())
    }

    /// Writes the document to `path` (extension forced to json), or to
    /// `{monitor_id}.json` in the working directory
    pub fn dump_to_file(&mut self, path: Option<PathBuf>) -> Result<PathBuf, MonitorError> {
        let document = self.document()?;
        let filename = format!("{}.json", self.setup.credentials().monitor_id);
        Ok(JsonFuncs::save_to_json(document, path, &filename)?)
    }

    pub fn describe(&self) -> String {
        self.setup.describe()
    }
}
