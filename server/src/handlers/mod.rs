//! Request handlers for form submissions.

mod submit;

pub use submit::*;
