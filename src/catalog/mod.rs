//! SoFiA text catalogue parsing
//!
//! Reads the fixed-width ASCII catalogue SoFiA writes next to its output cubes.
//! Column boundaries are not declared anywhere in the file; they are inferred
//! from where each label ends on the commented header line. The velocity
//! column comes in three flavours depending on the SoFiA version and settings,
//! so it is reconciled before rows are sliced.

pub mod columns;
pub mod parser;
pub mod velocity;


pub use columns::{Column, ColumnSchema};
pub use parser::CatalogParser;
pub use velocity::{VelocityVariant, reconcile_fields};
