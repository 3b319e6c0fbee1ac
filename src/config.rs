use serde::Deserialize;

use crate::levenshtein::{DEFAULT_MAX_DISTANCE, DEFAULT_MAX_SUGGESTIONS};

/// Per-validator settings. The language is resolved on every call.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ValidatorConfig {
  /// Default language identifier (canonical key or alias); English if unset
  pub language: Option<String>,
  pub max_suggestions: usize,
  pub max_distance: usize,
}

impl Default for ValidatorConfig {
  fn default() -> Self {
    Self {
      language: None,
      max_suggestions: DEFAULT_MAX_SUGGESTIONS,
      max_distance: DEFAULT_MAX_DISTANCE,
    }
  }
}

impl ValidatorConfig {
  /// Read `BIP39CHECK_LANG`, `BIP39CHECK_MAX_SUGGESTIONS` and
  /// `BIP39CHECK_MAX_DISTANCE`; anything unset or unparsable keeps its default.
  pub fn from_env() -> Self {
    Self::from_lookup(|name| std::env::var(name).ok())
  }

  fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
    let defaults = Self::default();
    Self {
      language: lookup("BIP39CHECK_LANG").filter(|v| !v.trim().is_empty()),
      max_suggestions: lookup("BIP39CHECK_MAX_SUGGESTIONS")
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(defaults.max_suggestions),
      max_distance: lookup("BIP39CHECK_MAX_DISTANCE")
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(defaults.max_distance),
    }
  }
}
