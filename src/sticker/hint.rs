//! Unique-prefix hints for sticker names
//!
//! A hint length is the number of leading characters a user has to type so
//! that the prefix identifies one name among its siblings. Lengths count
//! `char`s, never bytes, so a hint boundary never splits a code point.

use thiserror::Error;

/// Two names that no prefix can tell apart.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Found contained strings: {first:?} vs {second:?}")]
pub struct ConflictingNames {
    pub first: String,
    pub second: String,
}

fn common_prefix_len(a: &str, b: &str) -> usize {
    a.chars()
        .zip(b.chars())
        .take_while(|(x, y)| x == y)
        .count()
}

/// Compute the hint length of every name, aligned with the input.
///
/// Fails on the first pair where the names are equal or one is a prefix of
/// the other. A name without siblings gets a hint of one character.
pub fn unique_prefix_lengths<S: AsRef<str>>(names: &[S]) -> Result<Vec<usize>, ConflictingNames> {
    let mut lengths: Vec<usize> = names
        .iter()
        .map(|n| n.as_ref().chars().count().min(1))
        .collect();

    for i in 0..names.len() {
        for j in i + 1..names.len() {
            let s = names[i].as_ref();
            let t = names[j].as_ref();
            if s.starts_with(t) || t.starts_with(s) {
                return Err(ConflictingNames {
                    first: s.to_string(),
                    second: t.to_string(),
                });
            }
            let l = common_prefix_len(s, t) + 1;
            lengths[i] = lengths[i].max(l);
            lengths[j] = lengths[j].max(l);
        }
    }

    Ok(lengths)
}

/// Every pair `(outer, inner)` of indexes where `names[inner]` occurs
/// anywhere inside `names[outer]`, in input order.
pub fn contained_pairs<S: AsRef<str>>(names: &[S]) -> Vec<(usize, usize)> {
    let mut pairs = Vec::new();
    for i in 0..names.len() {
        for j in i + 1..names.len() {
            let s = names[i].as_ref();
            let t = names[j].as_ref();
            if s.contains(t) {
                pairs.push((i, j));
            }
            if t.contains(s) {
                pairs.push((j, i));
            }
        }
    }
    pairs
}

/// Render `name` with everything past the hint wrapped in brackets.
///
/// `with_hint("abcde", 3)` gives `"abc[de]"`.
pub fn with_hint(name: &str, hint_len: usize) -> String {
    let chars: Vec<char> = name.chars().collect();
    if hint_len >= chars.len() {
        return name.to_string();
    }
    let head: String = chars[..hint_len].iter().collect();
    let tail: String = chars[hint_len..].iter().collect();
    format!("{head}[{tail}]")
}
