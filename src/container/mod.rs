//! Hierarchical output container
//!
//! The writer collects cube, mask and catalogue, lays them out as a
//! [`Document`] and hands it to a [`DocumentStore`] that serialises it.

pub mod layout;
pub mod writer;

#[cfg(feature = "hdf5")]
pub mod hdf5_store;

#[cfg(test)]
pub(crate) mod json_store;

#[cfg(test)]
mod tests;

pub use layout::{Dataset, DatasetData, Document, Section};
pub use writer::{ContainerWriter, DocumentStore};

#[cfg(feature = "hdf5")]
pub use hdf5_store::Hdf5Store;
