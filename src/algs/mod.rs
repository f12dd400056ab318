//! Re-export public algorithms.

pub mod lab;
pub mod stencil;
pub mod sweep;
