//! Graph construction and representation
//!
//! This module provides graph building and storage for the sentence
//! similarity graph ranked by TextRank.

pub mod builder;
pub mod csr;

pub use builder::{EdgeMode, GraphBuilder};
pub use csr::SentenceGraph;
