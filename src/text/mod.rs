//! Randomized text: the word stream typed into the editor and the email
//! bodies placed on mail drafts.

pub mod generator;
pub mod pools;

pub use generator::{EmailContent, generate_email, sample_words};
pub use pools::WORDS;
