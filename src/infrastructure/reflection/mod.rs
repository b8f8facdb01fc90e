//! Self-reflective generation service

mod generator;

pub use generator::ReflectiveGenerator;
