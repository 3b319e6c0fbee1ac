//! Word-set and full-mnemonic validation.
//!
//! A phrase moves through four stages, stopping at the first failure:
//!
//! 1. resolve the language (an unknown identifier is an `Err`)
//! 2. membership: every word must be in the resolved wordlist; misses are
//!    reported with suggestions before anything else is checked
//! 3. length: 12, 15, 18, 21 or 24 words
//! 4. checksum
//!
//! Word-set validation stops after stage 2.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Serialize, Serializer};

use crate::bip39::language::{Language, LanguageResolver};
use crate::bip39::wordlist::{Word, Wordlist, WordlistRegistry};
use crate::bip39::{self, WordCount};
use crate::config::ValidatorConfig;
use crate::detect::{Detection, LanguageDetector, WordMatch};
use crate::error::Result;
use crate::levenshtein;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationError {
  InvalidLength,
  UnknownWords,
  InvalidChecksum,
}

impl ValidationError {
  pub fn code(self) -> &'static str {
    match self {
      ValidationError::InvalidLength => "invalid_length",
      ValidationError::UnknownWords => "unknown_words",
      ValidationError::InvalidChecksum => "invalid_checksum",
    }
  }
}

impl fmt::Display for ValidationError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.code())
  }
}

fn serialize_error<S: Serializer>(
  error: &Option<ValidationError>,
  serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
  serializer.serialize_str(error.map_or("", ValidationError::code))
}

/// Outcome of a validation call. `error` is set exactly when `valid` is false.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ValidationResult {
  pub valid: bool,
  pub language: Language,
  #[serde(serialize_with = "serialize_error")]
  pub error: Option<ValidationError>,
  pub valid_words: Vec<String>,
  pub invalid_words: Vec<String>,
  /// Close matches from the resolved wordlist, per invalid word
  pub suggestions: BTreeMap<String, Vec<String>>,
  /// Best-scoring language for the whole input, set when words were unknown
  #[serde(skip_serializing_if = "Option::is_none")]
  pub detected_language: Option<Language>,
  #[serde(skip_serializing_if = "BTreeMap::is_empty")]
  pub word_matches: BTreeMap<String, WordMatch>,
}

impl ValidationResult {
  fn valid(language: Language, words: Vec<String>) -> Self {
    Self {
      valid: true,
      language,
      error: None,
      valid_words: words,
      invalid_words: Vec::new(),
      suggestions: BTreeMap::new(),
      detected_language: None,
      word_matches: BTreeMap::new(),
    }
  }

  fn rejected(language: Language, error: ValidationError, words: Vec<String>) -> Self {
    Self {
      valid: false,
      error: Some(error),
      ..Self::valid(language, words)
    }
  }

  /// `""` when valid, otherwise the snake_case error code.
  pub fn error_code(&self) -> &'static str {
    self.error.map_or("", ValidationError::code)
  }
}

/// Result of the membership stage.
struct Membership {
  valid: Vec<String>,
  invalid: Vec<String>,
  indices: Vec<u16>,
}

pub struct Validator<'r> {
  registry: &'r WordlistRegistry,
  resolver: &'r LanguageResolver,
  config: ValidatorConfig,
}

impl Validator<'static> {
  /// Validator over the process-wide wordlists and alias table.
  pub fn new(config: ValidatorConfig) -> Self {
    Validator::with_parts(WordlistRegistry::global(), LanguageResolver::global(), config)
  }
}

impl Default for Validator<'static> {
  fn default() -> Self {
    Validator::new(ValidatorConfig::default())
  }
}

impl<'r> Validator<'r> {
  pub fn with_parts(
    registry: &'r WordlistRegistry,
    resolver: &'r LanguageResolver,
    config: ValidatorConfig,
  ) -> Self {
    Self {
      registry,
      resolver,
      config,
    }
  }

  pub fn config(&self) -> &ValidatorConfig {
    &self.config
  }

  /// Resolve `language`, falling back to the configured default and then
  /// to English.
  pub fn resolve_language(&self, language: Option<&str>) -> Result<&'r Wordlist> {
    let identifier = language.or(self.config.language.as_deref());
    let lang = self.resolver.resolve(identifier)?;
    Ok(self.registry.wordlist(lang))
  }

  pub fn is_valid_word(&self, word: &str, language: Option<&str>) -> Result<bool> {
    let wordlist = self.resolve_language(language)?;
    Ok(Word::new(word).is_some_and(|w| wordlist.contains(&w)))
  }

  pub fn suggest_word(
    &self,
    input: &str,
    language: Option<&str>,
    max_suggestions: Option<usize>,
  ) -> Result<Vec<String>> {
    let wordlist = self.resolve_language(language)?;
    Ok(levenshtein::suggest(
      input,
      wordlist.composed(),
      max_suggestions.unwrap_or(self.config.max_suggestions),
      self.config.max_distance,
    ))
  }

  pub fn detect_language(&self, text: &str) -> Detection {
    LanguageDetector::new(self.registry, self.config.max_suggestions, self.config.max_distance)
      .detect_text(text)
  }

  /// Membership check only: no length or checksum stage. Blank entries are
  /// skipped.
  pub fn validate_words<S: AsRef<str>>(
    &self,
    words: &[S],
    language: Option<&str>,
  ) -> Result<ValidationResult> {
    let wordlist = self.resolve_language(language)?;
    let words: Vec<Word> = words.iter().filter_map(|w| Word::new(w.as_ref())).collect();

    let result = match self.check_membership(wordlist, &words) {
      Ok(membership) => ValidationResult::valid(wordlist.language(), membership.valid),
      Err(rejected) => rejected,
    };
    tracing::debug!(
      language = wordlist.language().key(),
      words = words.len(),
      outcome = result.error_code(),
      "word set validated"
    );
    Ok(result)
  }

  /// Full BIP-39 validation of a whitespace-separated phrase.
  pub fn is_valid_mnemonic(&self, phrase: &str, language: Option<&str>) -> Result<ValidationResult> {
    let wordlist = self.resolve_language(language)?;
    let words = Word::split(phrase);
    let result = self.run_pipeline(wordlist, &words);
    tracing::debug!(
      language = wordlist.language().key(),
      words = words.len(),
      outcome = result.error_code(),
      "mnemonic validated"
    );
    Ok(result)
  }

  fn run_pipeline(&self, wordlist: &Wordlist, words: &[Word]) -> ValidationResult {
    let language = wordlist.language();

    let membership = match self.check_membership(wordlist, words) {
      Ok(membership) => membership,
      Err(rejected) => return rejected,
    };

    let Some(count) = WordCount::new(membership.indices.len()) else {
      return ValidationResult::rejected(language, ValidationError::InvalidLength, membership.valid);
    };
    tracing::trace!(
      entropy_bits = count.entropy_bits(),
      checksum_bits = count.checksum_bits(),
      "checking checksum"
    );

    match bip39::verify_checksum(&membership.indices) {
      Ok(true) => ValidationResult::valid(language, membership.valid),
      Ok(false) => {
        ValidationResult::rejected(language, ValidationError::InvalidChecksum, membership.valid)
      }
      Err(e) => unreachable!("word count {} passed the length stage: {e}", count.words()),
    }
  }

  /// Split `words` by membership in `wordlist`. Any miss yields the
  /// finished `unknown_words` result with diagnostics.
  fn check_membership(
    &self,
    wordlist: &Wordlist,
    words: &[Word],
  ) -> std::result::Result<Membership, ValidationResult> {
    let mut membership = Membership {
      valid: Vec::with_capacity(words.len()),
      invalid: Vec::new(),
      indices: Vec::with_capacity(words.len()),
    };
    let mut missing: Vec<&Word> = Vec::new();

    for word in words {
      match wordlist.index_of(word) {
        Some(idx) => {
          membership.valid.push(word.as_str().to_string());
          membership.indices.push(idx);
        }
        None => {
          membership.invalid.push(word.as_str().to_string());
          missing.push(word);
        }
      }
    }

    if missing.is_empty() {
      return Ok(membership);
    }
    Err(self.diagnose(wordlist, words, &missing, membership))
  }

  fn diagnose(
    &self,
    wordlist: &Wordlist,
    words: &[Word],
    missing: &[&Word],
    membership: Membership,
  ) -> ValidationResult {
    let detected_language = LanguageDetector::new(self.registry, 0, self.config.max_distance)
      .score(words)
      .top();

    let mut suggestions = BTreeMap::new();
    let mut word_matches = BTreeMap::new();
    for word in missing {
      if suggestions.contains_key(word.as_str()) {
        continue;
      }
      let close = levenshtein::suggest(
        word.as_str(),
        wordlist.composed(),
        self.config.max_suggestions,
        self.config.max_distance,
      );
      let other_languages = self
        .registry
        .languages_containing(word)
        .into_iter()
        .filter(|lang| *lang != wordlist.language())
        .collect();
      word_matches.insert(
        word.as_str().to_string(),
        WordMatch {
          exists: false,
          other_languages,
          suggestions: close.clone(),
        },
      );
      suggestions.insert(word.as_str().to_string(), close);
    }

    ValidationResult {
      valid: false,
      language: wordlist.language(),
      error: Some(ValidationError::UnknownWords),
      valid_words: membership.valid,
      invalid_words: membership.invalid,
      suggestions,
      detected_language,
      word_matches,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::error::Error;

  const ABOUT: &str =
    "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";

  fn validator() -> Validator<'static> {
    Validator::default()
  }

  fn twelve(last: &str) -> String {
    let mut words = vec!["abandon"; 11];
    words.push(last);
    words.join(" ")
  }

  #[test]
  fn valid_english_mnemonic() {
    let result = validator().is_valid_mnemonic(ABOUT, Some("english")).unwrap();
    assert!(result.valid);
    assert_eq!(result.error, None);
    assert_eq!(result.error_code(), "");
    assert_eq!(result.language, Language::English);
    assert_eq!(result.valid_words.len(), 12);
    assert_eq!(result.valid_words[11], "about");
    assert!(result.invalid_words.is_empty());
    assert!(result.suggestions.is_empty());
  }

  #[test]
  fn bad_checksum() {
    let result = validator().is_valid_mnemonic(&twelve("abandon"), Some("english")).unwrap();
    assert!(!result.valid);
    assert_eq!(result.error, Some(ValidationError::InvalidChecksum));
    assert_eq!(result.valid_words.len(), 12);
    assert!(result.invalid_words.is_empty());
  }

  #[test]
  fn unknown_word_reported_with_suggestions() {
    let result = validator().is_valid_mnemonic(&twelve("friday"), Some("english")).unwrap();
    assert!(!result.valid);
    assert_eq!(result.error, Some(ValidationError::UnknownWords));
    assert_eq!(result.invalid_words, vec!["friday"]);
    assert_eq!(result.valid_words.len(), 11);
    assert!(result.suggestions.contains_key("friday"));
    assert_eq!(result.detected_language, Some(Language::English));
    assert!(!result.word_matches["friday"].exists);
  }

  #[test]
  fn unknown_words_reported_before_length() {
    let result = validator().is_valid_mnemonic("abandon abandn", None).unwrap();
    assert_eq!(result.error, Some(ValidationError::UnknownWords));
    assert_eq!(result.suggestions["abandn"].first().map(String::as_str), Some("abandon"));
  }

  #[test]
  fn wrong_length() {
    let result = validator().is_valid_mnemonic("abandon abandon abandon", None).unwrap();
    assert_eq!(result.error, Some(ValidationError::InvalidLength));
    assert_eq!(result.valid_words.len(), 3);

    let empty = validator().is_valid_mnemonic("   ", None).unwrap();
    assert_eq!(empty.error, Some(ValidationError::InvalidLength));
    assert!(empty.valid_words.is_empty());
  }

  #[test]
  fn length_stage_runs_before_checksum_for_every_count() {
    for n in 0..=30 {
      let phrase = vec!["abandon"; n].join(" ");
      let result = validator().is_valid_mnemonic(&phrase, None).unwrap();
      if crate::bip39::ALLOWED_WORD_COUNTS.contains(&n) {
        assert_ne!(result.error, Some(ValidationError::InvalidLength), "{n} words");
      } else {
        assert_eq!(result.error, Some(ValidationError::InvalidLength), "{n} words");
      }
    }
  }

  #[test]
  fn korean_typo_suggests_composed_word() {
    let result = validator().is_valid_mnemonic("가쀍", Some("kr")).unwrap();
    assert_eq!(result.error, Some(ValidationError::UnknownWords));
    let close = &result.suggestions["가쀍"];
    assert!(close.iter().any(|s| s == "가격"), "{close:?}");
    assert!(close.iter().all(|s| s.chars().count() <= 3));
    assert_eq!(result.detected_language, None);
  }

  #[test]
  fn messy_whitespace_and_case() {
    let messy = format!("  {}\t\n", ABOUT.replace(' ', "   ").to_uppercase());
    let result = validator().is_valid_mnemonic(&messy, None).unwrap();
    assert!(result.valid, "{result:?}");
  }

  #[test]
  fn unsupported_language_is_an_error() {
    let err = validator().is_valid_mnemonic(ABOUT, Some("latin")).unwrap_err();
    assert!(matches!(err, Error::UnsupportedLanguage { ref identifier, .. } if identifier == "latin"));
  }

  #[test]
  fn words_from_another_language_point_at_it() {
    let phrase = "ábaco abdomen abeja abierto";
    let result = validator().is_valid_mnemonic(phrase, Some("en")).unwrap();
    assert_eq!(result.error, Some(ValidationError::UnknownWords));
    assert_eq!(result.detected_language, Some(Language::Spanish));
    assert!(result.word_matches["abeja"].other_languages.contains(&Language::Spanish));
  }

  #[test]
  fn configured_language_is_the_default() {
    let config = ValidatorConfig {
      language: Some("es".to_string()),
      ..ValidatorConfig::default()
    };
    let spanish = Validator::new(config);
    assert!(spanish.is_valid_word("abeja", None).unwrap());
    assert!(!spanish.is_valid_word("abeja", Some("english")).unwrap());
  }

  #[test]
  fn word_set_partitions_input() {
    let result = validator()
      .validate_words(&["abandon", "hello", "zebra", "", "potatoe"], Some("english"))
      .unwrap();
    assert_eq!(result.valid_words, vec!["abandon", "zebra"]);
    assert_eq!(result.invalid_words, vec!["hello", "potatoe"]);
    assert!(!result.valid);
    assert_eq!(result.error, Some(ValidationError::UnknownWords));
    assert_eq!(result.suggestions["potatoe"].first().map(String::as_str), Some("potato"));
  }

  #[test]
  fn word_set_never_checks_length() {
    let result = validator().validate_words(&["zoo", "zebra"], None).unwrap();
    assert!(result.valid);
    assert_eq!(result.error, None);
  }

  #[test]
  fn suggest_word_defaults() {
    let out = validator().suggest_word("abandn", Some("english"), None).unwrap();
    assert_eq!(out.first().map(String::as_str), Some("abandon"));
    assert!(out.len() <= 3);
    let one = validator().suggest_word("abandn", None, Some(1)).unwrap();
    assert_eq!(one, vec!["abandon"]);
  }

  #[test]
  fn error_serializes_as_code() {
    let ok = serde_json::to_value(validator().is_valid_mnemonic(ABOUT, None).unwrap()).unwrap();
    assert_eq!(ok["error"], "");
    assert_eq!(ok["language"], "english");
    assert!(ok.get("word_matches").is_none());

    let bad = validator().is_valid_mnemonic(&twelve("abandon"), None).unwrap();
    let bad = serde_json::to_value(bad).unwrap();
    assert_eq!(bad["error"], "invalid_checksum");
  }
}
