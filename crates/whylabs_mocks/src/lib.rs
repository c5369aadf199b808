pub mod mock;

use std::sync::Once;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

static TRACING_INIT: Once = Once::new();

pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        let filter =
            EnvFilter::try_from_env("LOG_LEVEL").unwrap_or_else(|_| EnvFilter::new("info"));

        let fmt_layer = fmt::layer()
            .with_target(true)
            .with_test_writer()
            .with_line_number(true);

        let _ = tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .try_init();

        tracing::debug!("Tracing initialized successfully");
    });
}

pub use mock::{
    default_entity_schema, MockWhyLabsApi, RecordedCall, MOCK_DATASET_ID, MOCK_ORG_ID,
};
