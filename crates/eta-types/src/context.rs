//! Evaluation configuration.

use serde::{Deserialize, Serialize};

/// Environment variable consulted by [`EvalContext::from_env`].
pub const TRACE_ENV_VAR: &str = "ETA_TRACE";

/// Settings for one evaluation session.
///
/// Stored on the global frame and inherited by every nested frame, so
/// builtins that re-enter the evaluator see the same settings. Evaluation
/// only reads it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvalContext {
    /// Emit a rendering of every reduced form to the `tracing` sink.
    pub trace: bool,
}

impl EvalContext {
    pub fn traced() -> Self {
        Self { trace: true }
    }

    /// Parse a context from JSON; missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Read the context from the process environment (`ETA_TRACE`).
    pub fn from_env() -> Self {
        let trace = std::env::var(TRACE_ENV_VAR)
            .map(|v| parse_flag(&v))
            .unwrap_or(false);
        Self { trace }
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "on" | "yes"
    )
}
