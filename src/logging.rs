use tracing_subscriber::EnvFilter;

/// Initialise logging. The default level is `info`; enabling debug via the
/// settings file raises it to `debug` and lets `RUST_LOG` override the
/// filter. With debug disabled `RUST_LOG` is ignored so a stray variable
/// in the environment cannot make the client verbose.
pub fn init(debug: bool) {
    let filter = if debug {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        EnvFilter::new("info")
    };

    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
