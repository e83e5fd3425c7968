//! Foundation types and utilities
//!
//! Small building blocks shared by the script compiler and the material object model.

pub mod collections;
pub mod logging;
pub mod math;
