use tracing_subscriber::EnvFilter;
use tracing_subscriber::Registry;
use tracing_subscriber::fmt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::util::TryInitError;

/// Install a stderr subscriber. `RUST_LOG` takes precedence over the level
/// derived from `verbosity` (the number of `-v` flags).
pub fn init(verbosity: u8) -> Result<(), TryInitError> {
	let env_filter = EnvFilter::try_from_default_env()
		.unwrap_or_else(|_| EnvFilter::new(default_directive(verbosity)));

	let fmt_layer = fmt::layer()
		.with_writer(std::io::stderr)
		.with_target(false)
		.without_time();

	Registry::default().with(env_filter).with(fmt_layer).try_init()
}

fn default_directive(verbosity: u8) -> &'static str {
	match verbosity {
		0 => "castui_cli=warn",
		1 => "castui_cli=info",
		_ => "castui_cli=debug",
	}
}
