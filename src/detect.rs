//! Guess the language of an unlabelled word sequence.
//!
//! Each word scores one point for every wordlist containing it. The top
//! language is the one with the strictly highest score; equal scores go to
//! the language declared first in [`Language::ALL`]. The result is a
//! diagnostic aid only and never decides whether a mnemonic is valid.

use std::collections::BTreeMap;

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::bip39::language::Language;
use crate::bip39::wordlist::{Word, WordlistRegistry};
use crate::levenshtein;

/// Per-word diagnostic.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct WordMatch {
  /// Present in the target wordlist
  pub exists: bool,
  /// Other languages whose wordlist contains the word
  pub other_languages: Vec<Language>,
  pub suggestions: Vec<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LanguageScores([usize; Language::ALL.len()]);

impl LanguageScores {
  fn bump(&mut self, lang: Language) {
    self.0[lang.ordinal()] += 1;
  }

  pub fn get(&self, lang: Language) -> usize {
    self.0[lang.ordinal()]
  }

  /// Highest non-zero score, first declared language on ties.
  pub fn top(&self) -> Option<Language> {
    let mut best: Option<(Language, usize)> = None;
    for lang in Language::ALL {
      let score = self.get(lang);
      if score > best.map_or(0, |(_, s)| s) {
        best = Some((lang, score));
      }
    }
    best.map(|(lang, _)| lang)
  }
}

impl Serialize for LanguageScores {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    let mut map = serializer.serialize_map(Some(Language::ALL.len()))?;
    for lang in Language::ALL {
      map.serialize_entry(lang.key(), &self.get(lang))?;
    }
    map.end()
  }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Detection {
  pub top_language: Option<Language>,
  pub scores: LanguageScores,
  pub per_word: BTreeMap<String, WordMatch>,
}

pub struct LanguageDetector<'r> {
  registry: &'r WordlistRegistry,
  max_suggestions: usize,
  max_distance: usize,
}

impl<'r> LanguageDetector<'r> {
  pub fn new(registry: &'r WordlistRegistry, max_suggestions: usize, max_distance: usize) -> Self {
    Self {
      registry,
      max_suggestions,
      max_distance,
    }
  }

  pub fn detect_text(&self, text: &str) -> Detection {
    self.detect(&Word::split(text))
  }

  /// Scores only, without per-word suggestions.
  pub fn score(&self, words: &[Word]) -> LanguageScores {
    self.tally(words).0
  }

  fn tally<'w>(&self, words: &'w [Word]) -> (LanguageScores, BTreeMap<&'w str, Vec<Language>>) {
    let mut scores = LanguageScores::default();
    let mut found: BTreeMap<&str, Vec<Language>> = BTreeMap::new();
    for word in words {
      let langs = self.registry.languages_containing(word);
      for lang in &langs {
        scores.bump(*lang);
      }
      found.entry(word.as_str()).or_insert(langs);
    }
    (scores, found)
  }

  pub fn detect(&self, words: &[Word]) -> Detection {
    let (scores, found) = self.tally(words);
    let top_language = scores.top();
    tracing::debug!(
      words = words.len(),
      top = top_language.map(Language::key),
      "language detection scored"
    );

    let per_word = found
      .into_iter()
      .map(|(text, langs)| {
        let exists = top_language.is_some_and(|top| langs.contains(&top));
        let suggestions = match top_language {
          Some(top) if langs.is_empty() => levenshtein::suggest(
            text,
            self.registry.wordlist(top).composed(),
            self.max_suggestions,
            self.max_distance,
          ),
          _ => Vec::new(),
        };
        let other_languages = langs
          .into_iter()
          .filter(|lang| Some(*lang) != top_language)
          .collect();
        (
          text.to_string(),
          WordMatch {
            exists,
            other_languages,
            suggestions,
          },
        )
      })
      .collect();

    Detection {
      top_language,
      scores,
      per_word,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn detector() -> LanguageDetector<'static> {
    LanguageDetector::new(WordlistRegistry::global(), 3, 2)
  }

  #[test]
  fn english_phrase_detected() {
    let d = detector().detect_text("abandon ability able about above absent");
    assert_eq!(d.top_language, Some(Language::English));
    assert_eq!(d.scores.get(Language::English), 6);
    assert!(d.per_word.values().all(|m| m.exists));
  }

  #[test]
  fn spanish_phrase_detected() {
    let d = detector().detect_text("ábaco abdomen abeja abierto abogado");
    assert_eq!(d.top_language, Some(Language::Spanish));
  }

  #[test]
  fn nothing_matches() {
    let d = detector().detect_text("qqqqq xxxxxx");
    assert_eq!(d.top_language, None);
    assert_eq!(d.per_word.len(), 2);
    for m in d.per_word.values() {
      assert!(!m.exists);
      assert!(m.other_languages.is_empty());
      assert!(m.suggestions.is_empty());
    }
  }

  #[test]
  fn empty_input() {
    let d = detector().detect_text("   ");
    assert_eq!(d.top_language, None);
    assert!(d.per_word.is_empty());
  }

  #[test]
  fn unknown_words_get_suggestions_from_top_language() {
    let d = detector().detect_text("abandon about abandn");
    assert_eq!(d.top_language, Some(Language::English));
    let typo = &d.per_word["abandn"];
    assert!(!typo.exists);
    assert_eq!(typo.suggestions.first().map(String::as_str), Some("abandon"));
  }

  #[test]
  fn shared_hanzi_tie_goes_to_simplified() {
    // "的" is in both Chinese lists; a tie resolves in declaration order
    let d = detector().detect_text("的");
    assert_eq!(d.scores.get(Language::ChineseSimplified), 1);
    assert_eq!(d.scores.get(Language::ChineseTraditional), 1);
    assert_eq!(d.top_language, Some(Language::ChineseSimplified));
    let m = &d.per_word["的"];
    assert!(m.exists);
    assert_eq!(m.other_languages, vec![Language::ChineseTraditional]);
  }

  #[test]
  fn score_matches_full_detection() {
    let words = Word::split("ábaco abdomen abeja zzzz");
    let scores = detector().score(&words);
    let full = detector().detect(&words);
    assert_eq!(scores, full.scores);
    assert_eq!(scores.top(), Some(Language::Spanish));
  }

  #[test]
  fn repeated_words_count_each_time() {
    let d = detector().detect_text("abandon abandon abandon");
    assert_eq!(d.scores.get(Language::English), 3);
    assert_eq!(d.per_word.len(), 1);
  }

  #[test]
  fn scores_serialize_by_key() {
    let d = detector().detect_text("zoo");
    let json = serde_json::to_value(&d).unwrap();
    assert_eq!(json["top_language"], "english");
    assert_eq!(json["scores"]["english"], 1);
    assert_eq!(json["scores"]["korean"], 0);
  }
}
