//! Heading slugs compatible with github-slugger.
use std::{collections::HashMap, ops::RangeInclusive};

/// Slug used when a heading has no usable characters.
const EMPTY_SLUG: &str = "heading";

/// Combining mark blocks (general categories Mn, Mc, Me) kept in slugs.
const COMBINING_MARKS: &[RangeInclusive<u32>] = &[
  0x0300..=0x036F, // combining diacritical marks
  0x0483..=0x0489, // cyrillic
  0x0591..=0x05BD, // hebrew
  0x05BF..=0x05BF,
  0x05C1..=0x05C2,
  0x05C4..=0x05C5,
  0x05C7..=0x05C7,
  0x0610..=0x061A, // arabic
  0x064B..=0x065F,
  0x0670..=0x0670,
  0x06D6..=0x06DC,
  0x06DF..=0x06E4,
  0x06E7..=0x06E8,
  0x06EA..=0x06ED,
  0x0900..=0x0903, // devanagari
  0x093A..=0x094F,
  0x0951..=0x0957,
  0x0962..=0x0963,
  0x0981..=0x0983, // bengali
  0x09BC..=0x09BC,
  0x09BE..=0x09CD,
  0x0A01..=0x0A03, // gurmukhi
  0x0A3C..=0x0A4D,
  0x0A81..=0x0A83, // gujarati
  0x0ABC..=0x0ACD,
  0x0B82..=0x0B82, // tamil
  0x0BBE..=0x0BCD,
  0x0E31..=0x0E31, // thai
  0x0E34..=0x0E3A,
  0x0E47..=0x0E4E,
  0x1AB0..=0x1AFF, // combining diacritical marks extended
  0x1DC0..=0x1DFF, // combining diacritical marks supplement
  0x20D0..=0x20FF, // combining marks for symbols
  0x3099..=0x309A, // kana voicing marks
  0xFE20..=0xFE2F, // combining half marks
];

/// Generates unique slugs within one document.
///
/// Follows github-slugger: the first occurrence of a slug is returned as is,
/// repeats get `-1`, `-2`, ... appended. A suffixed candidate that collides
/// with a slug generated earlier (say a heading literally titled "Intro 1")
/// is skipped.
#[derive(Debug, Default)]
pub struct Slugger {
  occurrences: HashMap<String, usize>,
}

impl Slugger {
  /// Creates an empty slugger.
  #[must_use]
  pub fn new() -> Self {
    Self::default()
  }

  /// Generates the next unique slug for `text`.
  pub fn slug(&mut self, text: &str) -> String {
    let original = slugify(text);
    let mut candidate = original.clone();

    while self.occurrences.contains_key(&candidate) {
      let count = self.occurrences.entry(original.clone()).or_insert(0);
      *count += 1;
      candidate = format!("{original}-{count}");
    }

    self.occurrences.insert(candidate.clone(), 0);
    candidate
  }

  /// Forgets every slug generated so far.
  pub fn reset(&mut self) {
    self.occurrences.clear();
  }
}

/// Slugify a heading text.
///
/// Lowercases, keeps letters, digits, combining marks, `-` and `_`, turns
/// each space into `-` and drops everything else. Hyphens are neither collapsed nor trimmed.
#[must_use]
pub fn slugify(text: &str) -> String {
  let mut slug = String::with_capacity(text.len());

  for ch in text.chars() {
    if ch.is_alphanumeric() || is_combining_mark(ch) || ch == '-' || ch == '_'
    {
      slug.extend(ch.to_lowercase());
    } else if ch == ' ' {
      slug.push('-');
    }
  }

  if slug.is_empty() {
    EMPTY_SLUG.to_string()
  } else {
    slug
  }
}

fn is_combining_mark(ch: char) -> bool {
  let code = u32::from(ch);
  COMBINING_MARKS.iter().any(|range| range.contains(&code))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_slugify_basic() {
    assert_eq!(slugify("Hello World"), "hello-world");
    assert_eq!(slugify("What's new in 2.0?"), "whats-new-in-20");
  }

  #[test]
  fn test_slugify_unicode() {
    assert_eq!(slugify("多言語 ガイド"), "多言語-ガイド");
    assert_eq!(slugify("Über Straße"), "über-straße");
  }

  #[test]
  fn test_slugify_keeps_combining_marks() {
    assert_eq!(slugify("हिन्दी"), "हिन्दी");
    assert_eq!(slugify("Cafe\u{301}"), "cafe\u{301}");
    assert_eq!(slugify("ภาษาไทย"), "ภาษาไทย");
    assert_eq!(slugify("a\u{301}!"), "a\u{301}");
  }

  #[test]
  fn test_slugify_no_collapsing() {
    assert_eq!(slugify("  a---b  "), "--a---b--");
    assert_eq!(slugify("<Image />"), "image-");
  }

  #[test]
  fn test_slugify_empty_fallback() {
    assert_eq!(slugify(""), "heading");
    assert_eq!(slugify("!!!"), "heading");
  }

  #[test]
  fn test_slugger_deduplicates() {
    let mut slugger = Slugger::new();
    assert_eq!(slugger.slug("Title"), "title");
    assert_eq!(slugger.slug("Title"), "title-1");
    assert_eq!(slugger.slug("Title"), "title-2");
  }

  #[test]
  fn test_slugger_skips_taken_suffixes() {
    let mut slugger = Slugger::new();
    assert_eq!(slugger.slug("Intro 1"), "intro-1");
    assert_eq!(slugger.slug("Intro"), "intro");
    assert_eq!(slugger.slug("Intro"), "intro-2");
    assert_eq!(slugger.slug("Intro 1"), "intro-1-1");
  }

  #[test]
  fn test_slugger_reset() {
    let mut slugger = Slugger::new();
    assert_eq!(slugger.slug("Same"), "same");
    slugger.reset();
    assert_eq!(slugger.slug("Same"), "same");
  }
}
