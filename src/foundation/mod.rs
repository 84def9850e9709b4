//! Foundation types: errors, colors, rectangle/affine utilities.

pub mod color;
pub mod error;
pub mod geometry;
