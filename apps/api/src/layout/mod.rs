// Layout Generator: 12-column grid rules and template-driven placement.
// Pure functions only; the document store decides when to call them.

pub mod generator;
pub mod grid;

pub use generator::{alignment_for, generate_layout, line_height_for};
