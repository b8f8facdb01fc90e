//! Agentic controller - sequences routing, retrieval, grading, repair and generation

mod controller;

pub use controller::AgenticController;
