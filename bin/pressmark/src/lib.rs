//! pressmark CLI library
//!
//! Command implementations behind the `publish` binary.
//!
//! # Modules
//!
//! - [`cmd`] - one-shot publish, watch mode and upload
//! - [`server`] - local static file server for watch mode

pub mod cmd;
pub mod server;

pub use pressmark_core::Config;
pub use pressmark_generator::{PublishReport, Publisher};

/// Initialize tracing. `debug` lowers the default level from INFO to DEBUG;
/// `RUST_LOG` directives still apply on top.
pub fn init_tracing(debug: bool) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let level = if debug {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();
}
