//! Field extraction and text cleanup
//!
//! This module derives computed columns from vacancy records and cleans
//! collected tables for downstream analysis.

pub mod extractor;
pub mod normalizer;
pub mod sanitize;
pub mod vocabulary;

pub use extractor::FieldExtractor;
pub use normalizer::{NormalizeReport, TextNormalizer};
pub use vocabulary::{GradeKeywords, Vocabulary};
