//! Schemas for the news feed
//!
//! `guardian` models the search endpoint's JSON; `news_record` is the
//! normalized record handed to callers.

pub mod guardian;
pub mod news_record;

pub use guardian::*;
pub use news_record::*;
