//! Shared primitives: geometry, errors and colors.

/// CSS color parsing.
pub mod color;
/// Geometry and identifier types.
pub mod core;
/// Error taxonomy.
pub mod error;
