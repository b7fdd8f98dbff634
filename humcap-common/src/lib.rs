//! # Hum Captcha Common Library
//!
//! Shared code for the hum captcha service:
//! - Tune catalog (the melodies users are asked to hum)
//! - Verification core (recording analysis, scoring, verdicts)
//! - Bootstrap configuration loading
//! - Common error types
//!
//! Nothing in this crate performs network I/O. The verification core is made
//! of pure functions so it can be exercised directly from unit tests.

pub mod catalog;
pub mod config;
pub mod error;
pub mod verification;

pub use catalog::{Note, Tune};
pub use error::{Error, Result};
pub use verification::{verify, RecordingSubmission, VerificationResult};
