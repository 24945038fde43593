//! Log output for library users and the Python bindings.
//!
//! The library only emits `tracing` events; nothing is printed unless a
//! subscriber is installed, either by the host application or by [`init`].

use tracing_subscriber::EnvFilter;

/// Default directive when neither `filter` nor `RUST_LOG` is set.
pub const DEFAULT_FILTER: &str = "rdframes_core=info";

/// Install a fmt subscriber writing to stderr.
///
/// `filter` uses `EnvFilter` syntax (`"debug"`, `"rdframes_core=trace"`);
/// an empty string falls back to `RUST_LOG`, then [`DEFAULT_FILTER`].
/// Returns `false` if a global subscriber was already set; calling this
/// more than once is harmless.
pub fn init(filter: &str) -> bool {
    let filter = if filter.trim().is_empty() {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
    } else {
        EnvFilter::new(filter)
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .try_init()
        .is_ok()
}

/// Like [`init`] but routed through the test harness's captured output.
pub fn init_for_tests() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_init_is_harmless() {
        init_for_tests();
        assert!(!init("info"));
    }
}
