//! Per-language BIP-39 wordlists with O(1) word -> index lookup.
//!
//! Every list is checked once at load: exactly 2048 entries, no two entries
//! sharing the same normalized form. Lookups compare NFKD forms, so both
//! precomposed and decomposed accented input match. Edit distance and
//! anything shown to a user use the composed (NFC) form instead, where a
//! Hangul syllable or a voiced kana is one code point.

use std::collections::HashMap;
use std::sync::OnceLock;

use unicode_normalization::UnicodeNormalization;

use crate::bip39::language::Language;
use crate::error::{Error, Result};

pub const WORDLIST_LEN: usize = 2048;

/// Lookup key for a token: lower-cased, then NFKD.
pub(crate) fn fold(word: &str) -> String {
  word.trim().to_lowercase().nfkd().collect()
}

/// Comparison form for edit distance: lower-cased, then NFC.
pub(crate) fn compose(word: &str) -> String {
  word.trim().to_lowercase().nfc().collect()
}

/// A single input token, trimmed and lower-cased.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Word {
  text: String,
  key: String,
}

impl Word {
  /// `None` for empty or whitespace-only tokens.
  pub fn new(raw: &str) -> Option<Word> {
    let text = raw.trim().to_lowercase();
    if text.is_empty() {
      return None;
    }
    let key = text.nfkd().collect();
    Some(Word { text, key })
  }

  /// Split on any run of whitespace, dropping empty tokens.
  pub fn split(phrase: &str) -> Vec<Word> {
    phrase.split_whitespace().filter_map(Word::new).collect()
  }

  pub fn as_str(&self) -> &str {
    &self.text
  }

  pub(crate) fn key(&self) -> &str {
    &self.key
  }
}

pub struct Wordlist {
  language: Language,
  words: &'static [&'static str],
  composed: Vec<String>,
  index: HashMap<String, u16>,
}

impl Wordlist {
  pub fn build(language: Language, words: &'static [&'static str]) -> Result<Wordlist> {
    if words.len() != WORDLIST_LEN {
      return Err(Error::MalformedWordlist {
        language: language.key(),
        reason: format!("expected {WORDLIST_LEN} words, found {}", words.len()),
      });
    }

    let mut index = HashMap::with_capacity(WORDLIST_LEN);
    let mut composed = Vec::with_capacity(WORDLIST_LEN);
    for (i, word) in words.iter().enumerate() {
      let key = fold(word);
      if key.is_empty() {
        return Err(Error::MalformedWordlist {
          language: language.key(),
          reason: format!("empty entry at index {i}"),
        });
      }
      // i < 2048 by the length check above
      if let Some(prev) = index.insert(key, i as u16) {
        return Err(Error::MalformedWordlist {
          language: language.key(),
          reason: format!("duplicate entry at indices {prev} and {i}"),
        });
      }
      composed.push(compose(word));
    }
    Ok(Wordlist {
      language,
      words,
      composed,
      index,
    })
  }

  pub fn language(&self) -> Language {
    self.language
  }

  pub fn words(&self) -> &'static [&'static str] {
    self.words
  }

  /// Entries in NFC form, in index order.
  pub fn composed(&self) -> &[String] {
    &self.composed
  }

  pub fn word(&self, index: u16) -> Option<&'static str> {
    self.words.get(index as usize).copied()
  }

  pub fn index_of(&self, word: &Word) -> Option<u16> {
    self.index.get(word.key()).copied()
  }

  pub fn contains(&self, word: &Word) -> bool {
    self.index.contains_key(word.key())
  }
}

/// All supported wordlists, loaded once and shared read-only.
pub struct WordlistRegistry {
  lists: Vec<Wordlist>,
}

static REGISTRY: OnceLock<WordlistRegistry> = OnceLock::new();

impl WordlistRegistry {
  pub fn load() -> Result<WordlistRegistry> {
    let lists = Language::ALL
      .iter()
      .map(|lang| Wordlist::build(*lang, lang.source().word_list()))
      .collect::<Result<Vec<_>>>()?;
    tracing::debug!(languages = lists.len(), "wordlist registry loaded");
    Ok(WordlistRegistry { lists })
  }

  /// Process-wide registry.
  ///
  /// # Panics
  /// Panics on first use if any bundled wordlist fails its load-time checks.
  pub fn global() -> &'static WordlistRegistry {
    REGISTRY.get_or_init(|| match WordlistRegistry::load() {
      Ok(registry) => registry,
      Err(e) => panic!("cannot initialise wordlists: {e}"),
    })
  }

  pub fn wordlist(&self, language: Language) -> &Wordlist {
    // `lists` is built from Language::ALL, so ordinals line up
    &self.lists[language.ordinal()]
  }

  pub fn wordlist_for_key(&self, key: &str) -> Result<&Wordlist> {
    Language::from_key(key)
      .map(|lang| self.wordlist(lang))
      .ok_or_else(|| Error::UnknownLanguage(key.to_string()))
  }

  pub fn index_of(&self, language: Language, word: &str) -> Option<u16> {
    Word::new(word).and_then(|w| self.wordlist(language).index_of(&w))
  }

  /// Languages whose wordlist contains `word`, in declaration order.
  pub fn languages_containing(&self, word: &Word) -> Vec<Language> {
    self
      .lists
      .iter()
      .filter(|list| list.contains(word))
      .map(|list| list.language)
      .collect()
  }
}
