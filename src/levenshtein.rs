//! Levenshtein distance over code points, and dictionary suggestions.

use crate::bip39::wordlist::compose;

pub const DEFAULT_MAX_SUGGESTIONS: usize = 3;
pub const DEFAULT_MAX_DISTANCE: usize = 2;

/// Unit-cost insert/delete/substitute distance between `a` and `b`,
/// counted in `char`s.
pub fn distance(a: &str, b: &str) -> usize {
  let a: Vec<char> = a.chars().collect();
  let b: Vec<char> = b.chars().collect();
  row_distance(&a, &b, usize::MAX).unwrap_or(usize::MAX)
}

/// Like [`distance`], but gives up with `None` as soon as the result is
/// known to exceed `max`.
pub fn distance_within(a: &str, b: &str, max: usize) -> Option<usize> {
  let a: Vec<char> = a.chars().collect();
  let b: Vec<char> = b.chars().collect();
  row_distance(&a, &b, max)
}

fn row_distance(a: &[char], b: &[char], max: usize) -> Option<usize> {
  if a.len().abs_diff(b.len()) > max {
    return None;
  }
  if a.is_empty() || b.is_empty() {
    return Some(a.len().max(b.len()));
  }

  let mut row: Vec<usize> = (0..=b.len()).collect();
  for (i, ca) in a.iter().enumerate() {
    let mut diag = row[0];
    row[0] = i + 1;
    let mut row_min = row[0];
    for (j, cb) in b.iter().enumerate() {
      let above = row[j + 1];
      row[j + 1] = if ca == cb {
        diag
      } else {
        1 + diag.min(above).min(row[j])
      };
      diag = above;
      row_min = row_min.min(row[j + 1]);
    }
    // every later row is >= the minimum of this one
    if row_min > max {
      return None;
    }
  }

  let d = row[b.len()];
  (d <= max).then_some(d)
}

/// Words from `dictionary` within `max_distance` of `input`, closest first,
/// ties broken by the word itself, at most `max_suggestions` of them.
///
/// Both sides are compared case-folded and in NFC form, so a Hangul
/// syllable or an accented letter counts as one code point. Suggestions are
/// returned in that composed form. Blank input yields nothing.
pub fn suggest<I, S>(
  input: &str,
  dictionary: I,
  max_suggestions: usize,
  max_distance: usize,
) -> Vec<String>
where
  I: IntoIterator<Item = S>,
  S: AsRef<str>,
{
  let needle: Vec<char> = compose(input).chars().collect();
  if needle.is_empty() || max_suggestions == 0 {
    return Vec::new();
  }

  let mut scored: Vec<(usize, String)> = dictionary
    .into_iter()
    .filter_map(|entry| {
      let word = compose(entry.as_ref());
      let candidate: Vec<char> = word.chars().collect();
      row_distance(&needle, &candidate, max_distance).map(|d| (d, word))
    })
    .collect();

  scored.sort_unstable();
  scored.dedup();
  scored
    .into_iter()
    .take(max_suggestions)
    .map(|(_, word)| word)
    .collect()
}
