//! Test and bench helpers: comparisons and divan-shaped sample documents.

pub mod sample_docs;
pub mod test_support;
