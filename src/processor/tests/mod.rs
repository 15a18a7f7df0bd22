//! Processor tests
//!
//! Build small SoFiA run directories (parameter file, cube, catalogue, mask)
//! and convert them end to end.

mod fixtures;
