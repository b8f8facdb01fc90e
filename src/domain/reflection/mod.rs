//! Self-reflective generation domain
//!
//! The generator tags every factual claim with an inline marker; this module
//! owns the marker grammar and the confidence arithmetic.

mod claims;
mod config;

pub use claims::{
    build_context, clean_response, overall_confidence, parse_claims, ReflectedClaim,
    ReflectionResult, ReflectionToken,
};
pub(crate) use claims::doubtful_claims;
pub use config::{ReflectionConfig, REFLECTION_SYSTEM_PROMPT, VERIFICATION_SYSTEM_PROMPT};
