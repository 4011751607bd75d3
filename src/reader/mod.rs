//! Pull-parser XML reading
//!
//! - Events: the event vocabulary produced by the reader
//! - Slice: pull reader over an in-memory byte slice

pub mod events;
pub mod slice;
