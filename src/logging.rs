use tracing_subscriber::{fmt, prelude::*, EnvFilter, Registry};

/// Installs the global subscriber: `RUST_LOG` if set, `info` otherwise.
/// Does nothing when a subscriber is already running (e.g. tests).
pub fn init_logging() {
	let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

	let subscriber = Registry::default()
		.with(env_filter)
		.with(fmt::layer().with_target(true));

	let _ = subscriber.try_init();
}
