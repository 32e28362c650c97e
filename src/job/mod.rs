//! JSON job files: a canvas, named sources and an ordered list of operations.

pub(crate) mod color;
pub(crate) mod model;
pub(crate) mod runner;
