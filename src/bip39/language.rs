//! Supported BIP-39 languages and resolution of user-supplied identifiers.
//!
//! Resolution order:
//! 1. exact canonical key (`english`, `chinese_simplified`, ...)
//! 2. alias lookup (`en`, `zh-cn`, ...)
//!
//! Both steps are case-insensitive and ignore surrounding whitespace.
//! A missing (or blank) identifier resolves to English.

use std::collections::HashMap;
use std::fmt;
use std::sync::OnceLock;

use serde::{Serialize, Serializer};

use crate::error::{Error, Result};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Language {
  English,
  Spanish,
  French,
  Italian,
  Japanese,
  Korean,
  ChineseSimplified,
  ChineseTraditional,
}

impl Language {
  /// Declaration order doubles as the detector's tie-break order.
  pub const ALL: [Language; 8] = [
    Language::English,
    Language::Spanish,
    Language::French,
    Language::Italian,
    Language::Japanese,
    Language::Korean,
    Language::ChineseSimplified,
    Language::ChineseTraditional,
  ];

  pub const DEFAULT: Language = Language::English;

  pub fn key(self) -> &'static str {
    match self {
      Language::English => "english",
      Language::Spanish => "spanish",
      Language::French => "french",
      Language::Italian => "italian",
      Language::Japanese => "japanese",
      Language::Korean => "korean",
      Language::ChineseSimplified => "chinese_simplified",
      Language::ChineseTraditional => "chinese_traditional",
    }
  }

  /// Exact canonical key match, no alias handling.
  pub fn from_key(key: &str) -> Option<Language> {
    Language::ALL.into_iter().find(|lang| lang.key() == key)
  }

  pub fn supported_keys() -> Vec<&'static str> {
    Language::ALL.iter().map(|lang| lang.key()).collect()
  }

  /// Position in [`Language::ALL`].
  pub(crate) fn ordinal(self) -> usize {
    self as usize
  }

  /// The upstream wordlist bundle backing this language.
  pub(crate) fn source(self) -> ::bip39::Language {
    match self {
      Language::English => ::bip39::Language::English,
      Language::Spanish => ::bip39::Language::Spanish,
      Language::French => ::bip39::Language::French,
      Language::Italian => ::bip39::Language::Italian,
      Language::Japanese => ::bip39::Language::Japanese,
      Language::Korean => ::bip39::Language::Korean,
      Language::ChineseSimplified => ::bip39::Language::SimplifiedChinese,
      Language::ChineseTraditional => ::bip39::Language::TraditionalChinese,
    }
  }
}

impl Default for Language {
  fn default() -> Self {
    Language::DEFAULT
  }
}

impl fmt::Display for Language {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.key())
  }
}

impl Serialize for Language {
  fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_str(self.key())
  }
}

/// Free-form identifiers accepted for each language, in addition to its key.
pub const LANGUAGE_ALIASES: &[(Language, &[&str])] = &[
  (Language::English, &["en", "eng"]),
  (Language::Spanish, &["es", "sp"]),
  (Language::French, &["fr"]),
  (Language::Italian, &["it"]),
  (Language::Japanese, &["jp", "ja"]),
  (Language::Korean, &["kr", "ko"]),
  (Language::ChineseSimplified, &["cn", "zh-cn", "chinese"]),
  (Language::ChineseTraditional, &["tw", "zh-tw"]),
];

pub struct LanguageResolver {
  aliases: HashMap<&'static str, Language>,
}

static RESOLVER: OnceLock<LanguageResolver> = OnceLock::new();

impl LanguageResolver {
  /// Build a resolver from an alias table, rejecting any alias (or canonical
  /// key) claimed by two different languages.
  pub fn new(table: &[(Language, &[&'static str])]) -> Result<Self> {
    let mut aliases: HashMap<&'static str, Language> = HashMap::new();
    let canonical = Language::ALL.iter().map(|lang| (*lang, lang.key()));
    let extra = table
      .iter()
      .flat_map(|(lang, names)| names.iter().map(move |name| (*lang, *name)));

    for (lang, name) in canonical.chain(extra) {
      match aliases.get(name) {
        Some(existing) if *existing != lang => {
          return Err(Error::AliasConflict {
            alias: name,
            first: existing.key(),
            second: lang.key(),
          });
        }
        Some(_) => {}
        None => {
          aliases.insert(name, lang);
        }
      }
    }
    Ok(Self { aliases })
  }

  /// Process-wide resolver over [`LANGUAGE_ALIASES`].
  ///
  /// # Panics
  /// Panics on first use if the built-in alias table is inconsistent.
  pub fn global() -> &'static LanguageResolver {
    RESOLVER.get_or_init(|| match LanguageResolver::new(LANGUAGE_ALIASES) {
      Ok(resolver) => resolver,
      Err(e) => panic!("built-in alias table rejected: {e}"),
    })
  }

  pub fn resolve(&self, identifier: Option<&str>) -> Result<Language> {
    let Some(raw) = identifier else {
      return Ok(Language::DEFAULT);
    };
    let needle = raw.trim().to_lowercase();
    if needle.is_empty() {
      return Ok(Language::DEFAULT);
    }

    if let Some(lang) = Language::from_key(&needle) {
      return Ok(lang);
    }
    self
      .aliases
      .get(needle.as_str())
      .copied()
      .ok_or_else(|| Error::UnsupportedLanguage {
        identifier: raw.to_string(),
        supported: Language::supported_keys(),
      })
  }

  /// Aliases registered for `lang`, sorted.
  pub fn aliases_of(&self, lang: Language) -> Vec<&'static str> {
    let mut names: Vec<_> = self
      .aliases
      .iter()
      .filter(|(name, l)| **l == lang && **name != lang.key())
      .map(|(name, _)| *name)
      .collect();
    names.sort_unstable();
    names
  }
}
