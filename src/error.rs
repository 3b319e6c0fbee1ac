use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
  /// Identifier matched neither a canonical key nor an alias
  #[error("unsupported language \"{identifier}\" - supported: {}", supported.join(", "))]
  UnsupportedLanguage {
    identifier: String,
    supported: Vec<&'static str>,
  },
  /// Registry lookup by a key outside the canonical set
  #[error("unknown language key \"{0}\"")]
  UnknownLanguage(String),
  /// Wordlist bundle failed its load-time checks
  #[error("malformed wordlist for {language}: {reason}")]
  MalformedWordlist {
    language: &'static str,
    reason: String,
  },
  /// Two languages claim the same alias
  #[error("alias \"{alias}\" maps to both {first} and {second}")]
  AliasConflict {
    alias: &'static str,
    first: &'static str,
    second: &'static str,
  },
  #[error("invalid entropy length: {0} bytes (expected 16, 20, 24, 28 or 32)")]
  InvalidEntropyLength(usize),
  #[error("invalid word count: {0} (expected 12, 15, 18, 21 or 24)")]
  InvalidWordCount(usize),
}

pub type Result<T> = std::result::Result<T, Error>;
