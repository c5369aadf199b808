use crate::error::MonitorError;
use crate::setup::MonitorSetup;
use whylabs_types::{Baseline, DiffConfig, DiffMode, SimpleColumnMetric};

/// A reusable monitor recipe
pub trait MonitorBuilder {
    /// Sets the fields the recipe owns on `setup`
    fn configure(&self, setup: &mut MonitorSetup) -> Result<(), MonitorError>;

    fn build(&self, setup: &mut MonitorSetup) -> Result<(), MonitorError> {
        self.configure(setup)?;
        setup.apply()
    }
}

/// Alerts when the share of null values changes by more than `percentage`
/// compared to the last 14 batches
#[derive(Debug, Clone, PartialEq)]
pub struct MissingDataPreset {
    percentage: f64,
    columns: Option<Vec<String>>,
}

impl MissingDataPreset {
    pub const TRAILING_WINDOW: u32 = 14;

    pub fn new(percentage: f64, columns: Option<Vec<String>>) -> Result<Self, MonitorError> {
        if !(0.0..100.0).contains(&percentage) {
            return Err(MonitorError::validation(format!(
                "percentage must be between 0 and 100, got {percentage}"
            )));
        }
        Ok(MissingDataPreset {
            percentage,
            columns,
        })
    }

    pub fn percentage(&self) -> f64 {
        self.percentage
    }
}

impl MonitorBuilder for MissingDataPreset {
    fn configure(&self, setup: &mut MonitorSetup) -> Result<(), MonitorError> {
        setup.set_config(DiffConfig::new(
            SimpleColumnMetric::CountNullRatio,
            DiffMode::Pct,
            self.percentage,
            Baseline::trailing_window(Self::TRAILING_WINDOW),
        ));
        if let Some(columns) = &self.columns {
            setup.set_target_columns(columns.clone())?;
        }
        Ok(())
    }
}
