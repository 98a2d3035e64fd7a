//! Connection options with environment variable overrides.
//!
//! Everything here is externally supplied configuration: endpoint URL,
//! credential, per-call timeout. Defaults are compiled in, and each value
//! can be overridden from the environment with strict parsing — invalid
//! values are logged and ignored rather than failing the connection.

use std::time::Duration;

use tally_protocol::subscription;

/// Endpoint URL override.
const ENV_URL: &str = "TALLY_WS_URL";
/// Password override.
const ENV_PASSWORD: &str = "TALLY_WS_PASSWORD";
/// Per-call timeout override, in milliseconds.
const ENV_CALL_TIMEOUT_MS: &str = "TALLY_CALL_TIMEOUT_MS";

/// Options for [`crate::Session::connect`].
#[derive(Clone, Debug)]
pub struct ConnectOptions {
    /// WebSocket endpoint URL.
    pub url: String,
    /// Password for the handshake challenge, if the endpoint requires one.
    pub password: Option<String>,
    /// Budget each call waits for its response.
    pub call_timeout: Duration,
    /// Bitmask of event categories to receive, see
    /// [`tally_protocol::subscription`].
    pub event_subscriptions: u32,
    /// Capacity of the server-pushed event broadcast buffer.
    pub event_buffer: usize,
}

impl Default for ConnectOptions {
    fn default() -> Self {
        Self {
            url: "ws://localhost:4455".to_owned(),
            password: None,
            call_timeout: Duration::from_secs(15),
            event_subscriptions: subscription::ALL,
            event_buffer: 256,
        }
    }
}

impl ConnectOptions {
    /// Options for a specific endpoint URL, defaults otherwise.
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    /// Defaults with environment variable overrides applied.
    #[must_use]
    pub fn from_env() -> Self {
        let mut options = Self::default();
        options.apply_env_overrides();
        options
    }

    /// Set the handshake password.
    #[must_use]
    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    /// Set the per-call timeout.
    #[must_use]
    pub fn with_call_timeout(mut self, timeout: Duration) -> Self {
        self.call_timeout = timeout;
        self
    }

    /// Set the event categories to receive.
    #[must_use]
    pub fn with_event_subscriptions(mut self, subscriptions: u32) -> Self {
        self.event_subscriptions = subscriptions;
        self
    }

    /// Set the event broadcast buffer capacity.
    #[must_use]
    pub fn with_event_buffer(mut self, capacity: usize) -> Self {
        self.event_buffer = capacity;
        self
    }

    /// Apply environment variable overrides to these options.
    pub fn apply_env_overrides(&mut self) {
        if let Some(v) = read_env_string(ENV_URL) {
            self.url = v;
        }
        if let Some(v) = read_env_string(ENV_PASSWORD) {
            self.password = Some(v);
        }
        if let Some(v) = read_env_u64(ENV_CALL_TIMEOUT_MS, 100, 600_000) {
            self.call_timeout = Duration::from_millis(v);
        }
    }
}

// ── Pure parsing functions (testable without env vars) ──────────────────────

/// Parse a string as a `u64` within a range.
#[must_use]
pub fn parse_u64_range(val: &str, min: u64, max: u64) -> Option<u64> {
    let n: u64 = val.parse().ok()?;
    (n >= min && n <= max).then_some(n)
}

// ── Env var readers (thin wrappers) ─────────────────────────────────────────

fn read_env_string(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

fn read_env_u64(name: &str, min: u64, max: u64) -> Option<u64> {
    let val = std::env::var(name).ok()?;
    let result = parse_u64_range(&val, min, max);
    if result.is_none() {
        tracing::warn!(key = name, value = %val, "invalid u64 env var, ignoring");
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let options = ConnectOptions::default();
        assert_eq!(options.url, "ws://localhost:4455");
        assert!(options.password.is_none());
        assert_eq!(options.call_timeout, Duration::from_secs(15));
        assert_eq!(options.event_subscriptions, subscription::ALL);
        assert_eq!(options.event_buffer, 256);
    }

    #[test]
    fn new_keeps_other_defaults() {
        let options = ConnectOptions::new("ws://studio:4455");
        assert_eq!(options.url, "ws://studio:4455");
        assert_eq!(options.call_timeout, Duration::from_secs(15));
    }

    #[test]
    fn builders() {
        let options = ConnectOptions::new("ws://studio:4455")
            .with_password("hunter2")
            .with_call_timeout(Duration::from_secs(3))
            .with_event_subscriptions(subscription::SCENES | subscription::INPUTS)
            .with_event_buffer(64);
        assert_eq!(options.password.as_deref(), Some("hunter2"));
        assert_eq!(options.call_timeout, Duration::from_secs(3));
        assert_eq!(
            options.event_subscriptions,
            subscription::SCENES | subscription::INPUTS
        );
        assert_eq!(options.event_buffer, 64);
    }

    #[test]
    fn parse_u64_valid() {
        assert_eq!(parse_u64_range("30000", 100, 600_000), Some(30_000));
        assert_eq!(parse_u64_range("100", 100, 600_000), Some(100));
        assert_eq!(parse_u64_range("600000", 100, 600_000), Some(600_000));
    }

    #[test]
    fn parse_u64_out_of_range() {
        assert_eq!(parse_u64_range("99", 100, 600_000), None);
        assert_eq!(parse_u64_range("600001", 100, 600_000), None);
    }

    #[test]
    fn parse_u64_invalid() {
        assert_eq!(parse_u64_range("abc", 100, 600_000), None);
        assert_eq!(parse_u64_range("", 100, 600_000), None);
        assert_eq!(parse_u64_range("-5", 100, 600_000), None);
    }
}
