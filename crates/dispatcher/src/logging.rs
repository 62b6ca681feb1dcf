//! Tracing subscriber setup for the `user-relay` binary.

use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is unset. `user_relay` is the target of
/// events logged from the binary's `main`.
pub const DEFAULT_FILTER: &str = "user_relay=info,relay_dispatcher=info,relay_client=info";

pub fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

pub fn init_tracing(json: bool) {
    if json {
        tracing_subscriber::fmt().with_env_filter(env_filter()).json().init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter()).init();
    }
}
