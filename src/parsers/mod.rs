//! Textual scanning of scene and material documents
//!
//! This module provides the pattern battery that pulls path tokens out of
//! document text, and the classification of those tokens.

pub mod pattern_extractor;

pub use pattern_extractor::{classify, PatternExtractor, RawToken, TokenClass, TokenHint};
