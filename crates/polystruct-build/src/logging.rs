//! Log output for build scripts.

use std::sync::OnceLock;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

static INIT: OnceLock<()> = OnceLock::new();

/// Installs a `tracing` subscriber writing to stderr.
///
/// Only the first call has an effect. The level
/// comes from `RUST_LOG` and defaults to `polystruct_core=info`. Stdout is
/// left alone because cargo reads build-script directives from it.
pub fn init_logging() {
    INIT.get_or_init(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("polystruct_core=info,polystruct_build=info"));

        // Another subscriber may already be installed by the caller.
        let _ = tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .try_init();
    });
}
