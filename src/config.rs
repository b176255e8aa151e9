/*
 * Quality of life structs for the scorer. The `ScorerConfig` struct implements the default
 * trait and can be customized with the `ScorerConfigBuilder`. It is passed to `score_sentence`
 * and `score_corpus`.
*/
use enum_iterator::{all, Sequence};
use itertools::Itertools;
use std::fmt::Display;
use std::str::FromStr;
use thiserror::Error;

/// What to do when the gold and predicted token sequences of a sentence differ. Predicted spans
/// index into the gold tokens, so a drifting tokenization silently shifts them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Sequence)]
pub enum TokenCheck {
    /// Do not compare the token sequences.
    #[default]
    Disabled,
    /// Log a warning and keep scoring.
    Warn,
    /// Stop with a `TokenMismatch` error.
    Strict,
}

impl Display for TokenCheck {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let str_content = match self {
            Self::Disabled => "disabled",
            Self::Warn => "warn",
            Self::Strict => "strict",
        };
        write!(f, "{}", str_content)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Could not parse `{0}` into a token check policy. Expected one of: {1}")]
pub struct ParsingTokenCheckError(String, String);

impl FromStr for TokenCheck {
    type Err = ParsingTokenCheckError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_ref() {
            "disabled" | "off" | "none" => Ok(TokenCheck::Disabled),
            "warn" | "warning" => Ok(TokenCheck::Warn),
            "strict" | "error" => Ok(TokenCheck::Strict),
            _ => Err(ParsingTokenCheckError(
                String::from(s),
                all::<TokenCheck>().join(", "),
            )),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
/// Parameters of the sentence scorer.
pub struct ScorerConfig {
    /// Policy applied when gold and predicted tokens differ. Disabled by default, which tolerates
    /// tokenization drift between the two files.
    pub token_check: TokenCheck,
}

impl Display for ScorerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Token sequence check: {}", self.token_check)
    }
}

/// This builder can be used to build and customize a `ScorerConfig` structure.
#[derive(Debug, Default)]
pub struct ScorerConfigBuilder {
    token_check: Option<TokenCheck>,
}

impl ScorerConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn token_check(mut self, token_check: TokenCheck) -> Self {
        self.token_check = Some(token_check);
        self
    }
    pub fn build(self) -> ScorerConfig {
        ScorerConfig {
            token_check: self.token_check.unwrap_or_default(),
        }
    }
}
