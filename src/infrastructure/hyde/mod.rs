//! Hypothesis-driven retrieval service

mod augmenter;

pub use augmenter::HypothesisAugmenter;
