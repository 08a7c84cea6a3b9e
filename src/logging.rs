use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Console logging. `RUST_LOG` overrides the default `republican_coins=info`.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("republican_coins=info"));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .try_init();
}
