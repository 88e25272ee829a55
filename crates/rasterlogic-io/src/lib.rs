//! # Rasterlogic I/O
//!
//! The persistence boundary around the core pipeline: PNG decoding of source
//! bitmaps and JSON serialization plus directory-catalog registration of
//! assembled schematics.

pub mod catalog;
pub mod image;

pub use catalog::{load_schematic, save_schematic, Catalog, CatalogEntry, CatalogError};
pub use image::{load_png, save_png, PngError};
