//! CyberSentinel: a study-mentor chat console that turns model replies into
//! Anki flashcards and Notion pages.

pub mod commands;
pub mod error;
pub mod parser;
pub mod payload;
pub mod prompt;
pub mod providers;
pub mod proxy;
pub mod storage;
pub mod types;
pub mod util;

#[cfg(test)]
pub(crate) mod testing;
