//! Output targets.

pub mod cpp;
pub mod curly;
pub mod pseudocode;
pub mod typescript;
