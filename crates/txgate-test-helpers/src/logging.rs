//! Test logging initialisation.

/// Install a `tracing` subscriber writing through the test harness.
///
/// Honours `RUST_LOG`, defaulting to debug output for the txgate crates.
/// Safe to call from every test; only the first call installs a subscriber.
pub fn init_test_logging() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        tracing_subscriber::EnvFilter::new("txgate_controller=debug,txgate_primitives=debug")
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init()
        .ok(); // Ignore error if already initialized
}
