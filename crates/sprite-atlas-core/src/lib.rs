//! Core library for building sprite atlases.
//!
//! - Crop: tight alpha bounding boxes (`alpha > 0` is opaque)
//! - Packer: MaxRects (BAF/BSSF/BLSF/BL/CP) into one square canvas, optional 90° rotation
//! - Pipeline: canvas grows 2, 4, 8, ... until every image fits, then images are composited
//! - Metadata: one `FrameDescriptor` per image, exported as plist (format 2) or JSON
//!
//! Quick example:
//! ```ignore
//! use sprite_atlas_core::prelude::*;
//! # fn main() -> anyhow::Result<()> {
//! let cfg = AtlasConfig::builder().output_name("map").crop(true).build();
//! let (out, png, plist) = pack_files(&["a.png", "b.png"], std::path::Path::new("."), &cfg)?;
//! println!("{} -> {:?} {:?}", out.stats().summary(), png, plist);
//! # Ok(()) }
//! ```

pub mod compositing;
pub mod config;
pub mod crop;
pub mod error;
pub mod export;
pub mod export_plist;
pub mod model;
pub mod packer;
pub mod pipeline;
pub mod source;

pub use config::*;
pub use crop::*;
pub use error::*;
pub use export::*;
pub use export_plist::*;
pub use model::*;
pub use packer::*;
pub use pipeline::*;
pub use source::*;

/// Convenience prelude for common types and functions.
/// Importing `sprite_atlas_core::prelude::*` brings the primary APIs into scope.
pub mod prelude {
    pub use crate::config::{
        AtlasConfig, AtlasConfigBuilder, MaxRectsHeuristic, MetadataFormat, TransparentPolicy,
    };
    pub use crate::crop::{CroppedImage, crop_image, opaque_bounds, uncropped};
    pub use crate::error::{AtlasError, Result};
    pub use crate::model::{AtlasStats, FrameDescriptor, Point, Rect, Size};
    pub use crate::packer::{PackFailure, PackOptions, PackRequest, PackResult, Placement, pack};
    pub use crate::pipeline::{
        AtlasOutput, Growth, build_atlas, build_atlas_from_paths, grow_and_pack, pack_files,
    };
    pub use crate::source::{SourceImage, load_source, load_sources, write_outputs};
    pub use crate::{AtlasMeta, to_json_hash, to_plist};
}
