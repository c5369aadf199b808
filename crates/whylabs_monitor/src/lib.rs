pub mod credentials;
pub mod error;
pub mod helpers;
pub mod manager;
pub mod presets;
pub mod reconcile;
pub mod setup;

pub use credentials::MonitorCredentials;
pub use error::MonitorError;
pub use helpers::DatasetClient;
pub use manager::MonitorManager;
pub use presets::{MissingDataPreset, MonitorBuilder};
pub use reconcile::{reconcile, AnalyzerDraft, Correction, Reconciliation};
pub use setup::{MonitorSetup, SetupStatus, ToUtc};
