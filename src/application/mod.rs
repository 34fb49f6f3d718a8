//! # Application Layer
//!
//! Trait seams for external collaborators and the use cases that drive the
//! classification pipeline through them.

pub mod interfaces;
pub mod use_cases;

pub use interfaces::*;
pub use use_cases::*;
