/// Development helper: initialize a tracing subscriber when `LZMQ_LOG` or
/// `RUST_LOG` is set.
///
/// Benches and tests can call `lzmq::dev_tracing::init_tracing()` to enable
/// structured logging for debugging. `LZMQ_LOG` takes precedence. This is a
/// no-op when neither variable is set or when a global subscriber is already
/// installed.
pub fn init_tracing() {
    use std::env;
    use tracing_subscriber::EnvFilter;

    let filter = match env::var("LZMQ_LOG") {
        Ok(directives) => EnvFilter::new(directives),
        Err(_) if env::var("RUST_LOG").is_ok() => EnvFilter::from_default_env(),
        Err(_) => return,
    };

    // Best-effort: another subscriber may already be installed.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}
