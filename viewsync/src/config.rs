//! Front-end tuning knobs.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use std::time::Duration;

/// Bounded, fixed-delay reconnect schedule used by the transports.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReconnectPolicy {
    pub max_attempts: u32,
    pub delay: Duration,
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            delay: Duration::from_secs(1),
        }
    }
}

impl ReconnectPolicy {
    /// Delay before reconnect `attempt` (1-based), or `None` once exhausted.
    #[must_use]
    pub fn delay_for(&self, attempt: u32) -> Option<Duration> {
        (1..=self.max_attempts)
            .contains(&attempt)
            .then_some(self.delay)
    }
}

/// Settings shared by every front end.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientConfig {
    /// HTTP origin of the game server, e.g. `http://localhost:5000`.
    /// Empty means "same origin" in the browser.
    pub origin: String,
    pub reconnect: ReconnectPolicy,
    /// How long a notice stays on screen.
    pub notice_ttl: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            origin: String::new(),
            reconnect: ReconnectPolicy::default(),
            notice_ttl: Duration::from_secs(5),
        }
    }
}

impl ClientConfig {
    #[must_use]
    pub fn with_origin(origin: impl Into<String>) -> Self {
        let origin = origin.into().trim_end_matches('/').to_owned();
        Self {
            origin,
            ..Self::default()
        }
    }

    /// Absolute URL for an API `path`.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.origin)
    }
}
