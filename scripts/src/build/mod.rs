//! Compilation of the contracts and loading of their artifacts

pub mod artifact;
pub mod compile;
