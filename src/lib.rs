//! BIP-39 word and mnemonic validation with close-match suggestions.
//!
//! The free functions below use the process-wide wordlists and the default
//! [`ValidatorConfig`]; build a [`Validator`] to change defaults. Nothing here
//! logs or stores the words being checked.

pub mod bip39;
pub mod config;
pub mod detect;
pub mod error;
pub mod levenshtein;
mod validate;

use std::process::ExitCode;

use clap::{arg, ArgMatches, Command};

pub use crate::bip39::language::{Language, LanguageResolver, LANGUAGE_ALIASES};
pub use crate::bip39::wordlist::{Word, Wordlist, WordlistRegistry, WORDLIST_LEN};
pub use crate::bip39::{
  entropy_to_indices, entropy_to_mnemonic, verify_checksum, WordCount, ALLOWED_WORD_COUNTS,
};
pub use crate::config::ValidatorConfig;
pub use crate::detect::{Detection, LanguageDetector, LanguageScores, WordMatch};
pub use crate::error::{Error, Result};
pub use crate::validate::{ValidationError, ValidationResult, Validator};

/// Resolve a language identifier (canonical key or alias) to its wordlist.
/// `None` means English.
pub fn resolve_language(identifier: Option<&str>) -> Result<&'static Wordlist> {
  Validator::default().resolve_language(identifier)
}

pub fn is_valid_word(word: &str, language: Option<&str>) -> Result<bool> {
  Validator::default().is_valid_word(word, language)
}

pub fn validate_words<S: AsRef<str>>(words: &[S], language: Option<&str>) -> Result<ValidationResult> {
  Validator::default().validate_words(words, language)
}

pub fn is_valid_mnemonic(phrase: &str, language: Option<&str>) -> Result<ValidationResult> {
  Validator::default().is_valid_mnemonic(phrase, language)
}

/// Up to `max_suggestions` (default 3) wordlist entries within edit
/// distance 2 of `input`.
pub fn suggest_word(
  input: &str,
  language: Option<&str>,
  max_suggestions: Option<usize>,
) -> Result<Vec<String>> {
  Validator::default().suggest_word(input, language, max_suggestions)
}

pub fn detect_language(text: &str) -> Detection {
  Validator::default().detect_language(text)
}

/* ------------------------------ CLI ------------------------------ */

const EXIT_INVALID: u8 = 1;
const EXIT_USAGE: u8 = 2;

fn config_from_matches(matches: &ArgMatches) -> ValidatorConfig {
  let mut config = ValidatorConfig::from_env();
  if let Some(lang) = matches.get_one::<String>("lang") {
    config.language = Some(lang.clone());
  }
  if let Some(n) = matches.get_one::<usize>("max-suggestions") {
    config.max_suggestions = *n;
  }
  if let Some(n) = matches.get_one::<usize>("max-distance") {
    config.max_distance = *n;
  }
  config
}

fn emit<T: serde::Serialize>(value: &T, json: bool, human: impl FnOnce()) -> anyhow::Result<()> {
  if json {
    println!("{}", serde_json::to_string_pretty(value)?);
  } else {
    human();
  }
  Ok(())
}

fn print_invalid_words(result: &ValidationResult) {
  println!("Invalid words:");
  for word in &result.invalid_words {
    println!("  - {word}");
    if let Some(close) = result.suggestions.get(word).filter(|s| !s.is_empty()) {
      println!("    did you mean: {}", close.join(", "));
    }
    if let Some(other) = result.word_matches.get(word).filter(|m| !m.other_languages.is_empty()) {
      let langs: Vec<_> = other.other_languages.iter().map(|l| l.key()).collect();
      println!("    found in: {}", langs.join(", "));
    }
  }
  if let Some(detected) = result.detected_language.filter(|l| *l != result.language) {
    println!("Input looks like {detected}; try --lang {detected}");
  }
}

fn exit_for(valid: bool) -> ExitCode {
  if valid {
    ExitCode::SUCCESS
  } else {
    ExitCode::from(EXIT_INVALID)
  }
}

fn run_cmd_words(validator: &Validator, matches: &ArgMatches, json: bool) -> anyhow::Result<ExitCode> {
  let words: Vec<&String> = matches
    .get_many::<String>("WORD")
    .map(Iterator::collect)
    .unwrap_or_default();
  let result = validator.validate_words(&words, None)?;
  emit(&result, json, || {
    println!("Language: {}", result.language);
    println!("Valid words: {}", result.valid_words.join(" "));
    if result.valid {
      println!("All words are valid.");
    } else {
      print_invalid_words(&result);
    }
  })?;
  Ok(exit_for(result.valid))
}

fn run_cmd_mnemonic(validator: &Validator, matches: &ArgMatches, json: bool) -> anyhow::Result<ExitCode> {
  let phrase: &String = matches
    .get_one("PHRASE")
    .expect("PHRASE should be a required argument");
  let result = validator.is_valid_mnemonic(phrase, None)?;
  emit(&result, json, || {
    if result.valid {
      println!("Valid mnemonic.");
      println!("Language: {}", result.language);
    } else {
      println!("Invalid mnemonic.");
      println!("Reason: {}", result.error_code());
      if !result.invalid_words.is_empty() {
        print_invalid_words(&result);
      }
    }
  })?;
  Ok(exit_for(result.valid))
}

fn run_cmd_suggest(validator: &Validator, matches: &ArgMatches, json: bool) -> anyhow::Result<ExitCode> {
  let input: &String = matches
    .get_one("WORD")
    .expect("WORD should be a required argument");
  let suggestions = validator.suggest_word(input, None, None)?;
  emit(&suggestions, json, || {
    if suggestions.is_empty() {
      println!("No suggestions.");
    } else {
      println!("{}", suggestions.join("\n"));
    }
  })?;
  Ok(exit_for(!suggestions.is_empty()))
}

fn run_cmd_detect(validator: &Validator, matches: &ArgMatches, json: bool) -> anyhow::Result<ExitCode> {
  let text = matches
    .get_many::<String>("TEXT")
    .map(|words| words.map(String::as_str).collect::<Vec<_>>().join(" "))
    .unwrap_or_default();
  let detection = validator.detect_language(&text);
  emit(&detection, json, || match detection.top_language {
    Some(lang) => {
      println!("Language: {lang} ({} matching words)", detection.scores.get(lang));
      for (word, m) in detection.per_word.iter().filter(|(_, m)| !m.exists) {
        println!("  - {word}");
        if !m.suggestions.is_empty() {
          println!("    did you mean: {}", m.suggestions.join(", "));
        }
      }
    }
    None => println!("No language detected."),
  })?;
  Ok(exit_for(detection.top_language.is_some()))
}

fn run_cmd_languages(json: bool) -> anyhow::Result<ExitCode> {
  let resolver = LanguageResolver::global();
  let table: Vec<(&str, Vec<&str>)> = Language::ALL
    .iter()
    .map(|lang| (lang.key(), resolver.aliases_of(*lang)))
    .collect();
  emit(&table, json, || {
    for (key, aliases) in &table {
      println!("{key:<20} {}", aliases.join(", "));
    }
  })?;
  Ok(ExitCode::SUCCESS)
}

fn cli() -> Command {
  Command::new(env!("CARGO_PKG_NAME"))
    .version(env!("CARGO_PKG_VERSION"))
    .about("Validate BIP-39 words and mnemonic phrases, with suggestions for typos")
    .arg_required_else_help(true)
    .arg(
      arg!(-l --lang <LANGUAGE> "Language key or alias (en, es, fr, it, jp, kr, cn, tw, ...)")
        .global(true),
    )
    .arg(
      arg!(--"max-suggestions" <N> "Maximum suggestions per unknown word")
        .value_parser(clap::value_parser!(usize))
        .global(true),
    )
    .arg(
      arg!(--"max-distance" <N> "Maximum edit distance for suggestions")
        .value_parser(clap::value_parser!(usize))
        .global(true),
    )
    .arg(arg!(--json "Print the result as JSON").global(true))
    .subcommand(
      Command::new("words")
        .about("Check individual words against the wordlist")
        .visible_alias("w")
        .arg(arg!(<WORD>... "Words to check")),
    )
    .subcommand(
      Command::new("mnemonic")
        .about("Validate a full mnemonic phrase, checksum included")
        .visible_alias("m")
        .arg(arg!(<PHRASE> "Mnemonic phrase - 12, 15, 18, 21, or 24 words, quoted")),
    )
    .subcommand(
      Command::new("suggest")
        .about("Suggest wordlist entries close to a mistyped word")
        .visible_alias("s")
        .arg(arg!(<WORD> "Word to find close matches for")),
    )
    .subcommand(
      Command::new("detect")
        .about("Guess which wordlist a phrase was written from")
        .visible_alias("d")
        .arg(arg!(<TEXT>... "Words or phrase to analyse")),
    )
    .subcommand(Command::new("languages").about("List supported languages and their aliases"))
}

/// Parse the command line, run the selected check and report the exit code.
pub fn run() -> anyhow::Result<ExitCode> {
  let matches = cli().get_matches();
  let Some((cmdname, sub)) = matches.subcommand() else {
    unreachable!("top-level subcommand should be required")
  };
  let json = sub.get_flag("json");
  let validator = Validator::new(config_from_matches(sub));

  let outcome = match cmdname {
    "words" => run_cmd_words(&validator, sub, json),
    "mnemonic" => run_cmd_mnemonic(&validator, sub, json),
    "suggest" => run_cmd_suggest(&validator, sub, json),
    "detect" => run_cmd_detect(&validator, sub, json),
    "languages" => run_cmd_languages(json),
    _ => unreachable!("unknown subcommand"),
  };

  match outcome {
    Err(e) if matches!(e.downcast_ref::<Error>(), Some(Error::UnsupportedLanguage { .. })) => {
      eprintln!("error: {e}");
      Ok(ExitCode::from(EXIT_USAGE))
    }
    other => other,
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  const ABOUT: &str =
    "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";

  #[test]
  fn cli_definition_is_consistent() {
    cli().debug_assert();
  }

  #[test]
  fn global_flags_reach_subcommands() {
    let matches = cli()
      .try_get_matches_from(["bip39check", "mnemonic", ABOUT, "--lang", "es", "--max-distance", "1"])
      .unwrap();
    let (name, sub) = matches.subcommand().unwrap();
    assert_eq!(name, "mnemonic");
    let config = config_from_matches(sub);
    assert_eq!(config.language.as_deref(), Some("es"));
    assert_eq!(config.max_distance, 1);
  }

  #[test]
  fn words_subcommand_takes_many() {
    let matches = cli()
      .try_get_matches_from(["bip39check", "w", "apple", "zebra", "amaze"])
      .unwrap();
    let (_, sub) = matches.subcommand().unwrap();
    assert_eq!(sub.get_many::<String>("WORD").unwrap().count(), 3);
  }

  #[test]
  fn public_scenarios() {
    let ok = is_valid_mnemonic(ABOUT, Some("english")).unwrap();
    assert!(ok.valid);
    assert_eq!(ok.error_code(), "");

    let zh = resolve_language(Some("zh-cn")).unwrap();
    assert_eq!(zh.language().key(), "chinese_simplified");

    assert!(is_valid_word("abandon", None).unwrap());
    assert!(!is_valid_word("helloworld", None).unwrap());

    let suggestions = suggest_word("abandn", Some("english"), None).unwrap();
    assert!(suggestions.iter().any(|s| s == "abandon"));
    assert!(suggestions
      .iter()
      .all(|s| levenshtein::distance("abandn", s) <= levenshtein::DEFAULT_MAX_DISTANCE));
    assert_eq!(levenshtein::distance("abandn", "abandon"), 1);

    let detection = detect_language("abandon zoo");
    assert_eq!(detection.top_language, Some(Language::English));
  }
}
