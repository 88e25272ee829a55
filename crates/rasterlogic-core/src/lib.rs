//! # Rasterlogic Core
//!
//! Compiles a raster image into programs for an array of resource-limited
//! display processors and assembles the processors and their displays into a
//! single wired schematic: grid planning, rectangle extraction,
//! budget-bounded instruction-stream encoding, and layout assembly.

pub mod assemble;
pub mod color;
pub mod config;
pub mod encode;
pub mod export;
pub mod extract;
pub mod geometry;
pub mod grid;
pub mod pixmap;
pub mod schematic;

pub use assemble::{assemble, assemble_schematic, Bounds, LayoutSink, SchematicSink};
pub use color::{Color, Rgba};
pub use config::{ConfigError, ExportConfig};
pub use encode::{build_program, FlushAction, FlushGate, InstructionBlock, ResourceLimits, TileProgram};
pub use export::{export, ExportError};
pub use extract::{ColorRectangles, ExtractError, RectExtractor, RowRunExtractor};
pub use geometry::{GridPos, Rect};
pub use grid::{GridCell, GridPlan};
pub use pixmap::Pixmap;
pub use schematic::{link_name, DisplayTile, LogicLink, ProcessorTile, Schematic, TilePair};
