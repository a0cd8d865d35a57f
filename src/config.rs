//! Session configuration.
//!
//! Small tuning knobs resolved once per session, either explicitly or from
//! the environment (`.env` files are honored via `dotenvy`).

use crate::types::LabelMatch;

/// Configuration for a [`FlowSession`](crate::session::FlowSession).
#[derive(Clone, Copy, Debug)]
pub struct SessionConfig {
    /// How wire-level outcome labels are matched against known enum names.
    ///
    /// The remote contract is ambiguous about casing, so this stays
    /// configuration until confirmed against the real service. Defaults to
    /// exact matching.
    pub label_match: LabelMatch,
    /// Whether structural edits dispatch a background persistence call.
    ///
    /// On by default; turned off for offline editing and for tests that
    /// assert on local behavior only.
    pub auto_sync: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            label_match: LabelMatch::Exact,
            auto_sync: true,
        }
    }
}

impl SessionConfig {
    /// Resolves configuration from the environment.
    ///
    /// Recognized variables:
    /// - `ROUTELOOM_LABEL_MATCH`: `exact` (default) or `ignore-case`
    /// - `ROUTELOOM_AUTO_SYNC`: `false`/`0` to disable background sync
    #[must_use]
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        let label_match = match std::env::var("ROUTELOOM_LABEL_MATCH").as_deref() {
            Ok("ignore-case") => LabelMatch::IgnoreCase,
            _ => LabelMatch::Exact,
        };
        let auto_sync = !matches!(
            std::env::var("ROUTELOOM_AUTO_SYNC").as_deref(),
            Ok("false") | Ok("0")
        );
        Self {
            label_match,
            auto_sync,
        }
    }

    /// Overrides the label matching mode.
    #[must_use]
    pub fn with_label_match(mut self, mode: LabelMatch) -> Self {
        self.label_match = mode;
        self
    }

    /// Enables or disables background persistence.
    #[must_use]
    pub fn with_auto_sync(mut self, auto_sync: bool) -> Self {
        self.auto_sync = auto_sync;
        self
    }
}
