//! Runtime configuration loaded from environment variables.

use std::str::FromStr;

/// Which orchestration design answers questions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QaMode {
    /// Explicit SQL-generation → execution → summarization stages.
    TwoPass,
    /// The model drives tool calls itself within a step budget.
    Agent,
}

impl FromStr for QaMode {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "two_pass" | "two-pass" | "twopass" => Ok(QaMode::TwoPass),
            "agent" => Ok(QaMode::Agent),
            _ => Err(()),
        }
    }
}

/// Config bag for the pipeline. All fields have defaults via `from_env`.
#[derive(Clone, Debug)]
pub struct PipelineConfig {
    /// Orchestration design (`QA_MODE`: `two_pass` default, `agent`).
    pub mode: QaMode,
    /// Agent iteration budget (`QA_MAX_STEPS`, default 10).
    pub max_steps: usize,
    /// Row cap for ad-hoc queries (`QA_ROW_LIMIT`, default 10).
    pub row_limit: usize,
    /// Include executed SQL and row count in API responses (`QA_DEBUG`).
    pub debug: bool,
}

impl PipelineConfig {
    /// Build from environment variables with sensible defaults.
    pub fn from_env() -> Self {
        Self {
            mode: std::env::var("QA_MODE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(QaMode::TwoPass),
            max_steps: parse("QA_MAX_STEPS", 10usize).max(1),
            row_limit: parse("QA_ROW_LIMIT", 10usize).max(1),
            debug: env("QA_DEBUG", "false") == "true",
        }
    }
}

fn env(k: &str, dflt: &str) -> String {
    std::env::var(k).unwrap_or_else(|_| dflt.to_string())
}

fn parse<T: std::str::FromStr>(k: &str, dflt: T) -> T {
    std::env::var(k)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(dflt)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_parses_spellings() {
        assert_eq!("two_pass".parse::<QaMode>(), Ok(QaMode::TwoPass));
        assert_eq!("Two-Pass".parse::<QaMode>(), Ok(QaMode::TwoPass));
        assert_eq!("agent".parse::<QaMode>(), Ok(QaMode::Agent));
        assert!("autopilot".parse::<QaMode>().is_err());
    }
}
