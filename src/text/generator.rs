use rand::Rng;
use rand::seq::IndexedRandom;
use std::fmt;
use std::ops::RangeInclusive;

use super::pools::{CLOSINGS, GREETINGS, SENTENCES, SIGNATURE};

/// Sentences per email, inclusive.
pub const SENTENCE_COUNT: RangeInclusive<usize> = 8..=12;

/// Sentences per paragraph, inclusive. The last paragraph may be shorter.
pub const PARAGRAPH_LEN: RangeInclusive<usize> = 2..=3;

/// A throwaway email body. Built fresh for every mail step and dropped with
/// the draft.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailContent {
    pub greeting: &'static str,
    /// Each paragraph is the ordered list of its sentences.
    pub paragraphs: Vec<Vec<&'static str>>,
    pub closing: &'static str,
}

impl EmailContent {
    /// Every sentence in reading order.
    pub fn sentences(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.paragraphs.iter().flatten().copied()
    }

    /// Rendered body: greeting, paragraphs, closing and signature separated
    /// by blank lines.
    pub fn body(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for EmailContent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\n\n", self.greeting)?;
        for (idx, paragraph) in self.paragraphs.iter().enumerate() {
            if idx > 0 {
                f.write_str("\n\n")?;
            }
            f.write_str(&paragraph.join(" "))?;
        }
        write!(f, "\n\n{}\n{}", self.closing, SIGNATURE)
    }
}

/// Draw `count` words uniformly from `pool`, with replacement.
///
/// An empty pool yields an empty list.
pub fn sample_words<'a, R: Rng + ?Sized>(
    pool: &[&'a str],
    count: usize,
    rng: &mut R,
) -> Vec<&'a str> {
    if pool.is_empty() {
        return Vec::new();
    }
    (0..count)
        .map(|_| pool[rng.random_range(0..pool.len())])
        .collect()
}

/// Build a professional-looking email from the static pools.
pub fn generate_email<R: Rng + ?Sized>(rng: &mut R) -> EmailContent {
    let count = rng.random_range(SENTENCE_COUNT).min(SENTENCES.len());
    let selected: Vec<&'static str> = SENTENCES.choose_multiple(rng, count).copied().collect();

    let mut paragraphs = Vec::new();
    let mut rest = selected.as_slice();
    while !rest.is_empty() {
        let take = rng.random_range(PARAGRAPH_LEN).min(rest.len());
        let (head, tail) = rest.split_at(take);
        paragraphs.push(head.to_vec());
        rest = tail;
    }

    EmailContent {
        greeting: GREETINGS.choose(rng).copied().unwrap_or("Hello,"),
        paragraphs,
        closing: CLOSINGS.choose(rng).copied().unwrap_or("Best regards,"),
    }
}
