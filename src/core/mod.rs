//! Core XML scanning primitives
//!
//! Building blocks shared by the reader:
//! - Scanner: memchr-accelerated delimiter detection
//! - Entities: XML entity decoding and serialization escaping
//! - Attributes: attribute list parsing from tag content

pub mod attributes;
pub mod entities;
pub mod scanner;
