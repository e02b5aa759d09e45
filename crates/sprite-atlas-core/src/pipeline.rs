use std::collections::HashSet;
use std::path::{Path, PathBuf};

use image::RgbaImage;
use tracing::{debug, info, instrument, warn};

use crate::compositing::compose;
use crate::config::{AtlasConfig, MetadataFormat};
use crate::crop::{CroppedImage, crop_image, uncropped};
use crate::error::{AtlasError, Result};
use crate::model::{AtlasStats, FrameDescriptor};
use crate::packer::{PackOptions, PackRequest, PackResult, pack};
use crate::source::{SourceImage, load_sources, output_paths, write_outputs};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Finished atlas: canvas pixels plus one frame per packed image, in input order.
pub struct AtlasOutput {
    pub canvas: RgbaImage,
    /// Canvas side length (always a power of two when `initial_size` is).
    pub size: u32,
    pub frames: Vec<FrameDescriptor>,
    /// Canvas sizes tried, in order; the last one succeeded.
    pub attempts: Vec<u32>,
    /// Canvas area left uncovered.
    pub unused_area: u64,
}

impl AtlasOutput {
    pub fn stats(&self) -> AtlasStats {
        AtlasStats::from_frames(&self.frames, self.size, self.attempts.len())
    }
}

/// Result of the growth loop.
#[derive(Debug, Clone)]
pub struct Growth {
    pub result: PackResult,
    pub attempts: Vec<u32>,
}

/// Packs `requests` into the smallest canvas of the doubling sequence that works.
///
/// Starts at `cfg.initial_size` and doubles after every failure, packing from
/// scratch each time. Stops with `CanvasLimit` once the next size would exceed
/// `cfg.max_size` (or `u32`).
pub fn grow_and_pack(requests: &[PackRequest], cfg: &AtlasConfig) -> Result<Growth> {
    let options = PackOptions {
        allow_rotation: cfg.allow_rotation,
        heuristic: cfg.heuristic,
    };
    let mut size = cfg.initial_size;
    let mut attempts = Vec::new();
    loop {
        attempts.push(size);
        debug!(size, "try to pack");
        let failure = match pack(requests, size, &options) {
            Ok(result) => return Ok(Growth { result, attempts }),
            Err(failure) => failure,
        };
        debug!(size, %failure, "canvas too small, growing");
        let limit = cfg.max_size.unwrap_or(u32::MAX);
        match size.checked_mul(2) {
            Some(next) if next <= limit => size = next,
            _ => {
                return Err(AtlasError::CanvasLimit {
                    failed_size: size,
                    max_size: limit,
                    failure,
                });
            }
        }
    }
}

fn crop_one(source: &SourceImage, cfg: &AtlasConfig) -> Option<CroppedImage> {
    if source.image.width() == 0 || source.image.height() == 0 {
        warn!(name = %source.name, "skip empty image");
        return None;
    }
    if !cfg.crop {
        return Some(uncropped(source));
    }
    let cropped = crop_image(source, cfg.transparent_policy);
    if cropped.is_none() {
        warn!(name = %source.name, "skip fully transparent image");
    }
    cropped
}

fn crop_sources(sources: &[SourceImage], cfg: &AtlasConfig) -> Vec<CroppedImage> {
    #[cfg(feature = "parallel")]
    {
        if cfg.parallel {
            // collect keeps input order
            let out: Vec<Option<CroppedImage>> =
                sources.par_iter().map(|s| crop_one(s, cfg)).collect();
            return out.into_iter().flatten().collect();
        }
    }
    sources.iter().filter_map(|s| crop_one(s, cfg)).collect()
}

/// Crops, packs and composites `sources` into one atlas. No file system access.
///
/// Notes:
/// - Input order is kept for packing, drawing and the returned frames.
/// - Fully transparent images follow `cfg.transparent_policy` when cropping.
/// - Returns `Empty` if nothing is left to pack.
/// - Returns `DuplicateFrame` for repeated names when the metadata is JSON.
#[instrument(skip_all, fields(sources = sources.len()))]
pub fn build_atlas(sources: Vec<SourceImage>, cfg: &AtlasConfig) -> Result<AtlasOutput> {
    cfg.validate()?;

    let cropped = crop_sources(&sources, cfg);
    drop(sources);
    if cropped.is_empty() {
        return Err(AtlasError::Empty);
    }

    let mut seen = HashSet::new();
    for c in &cropped {
        if seen.insert(c.name.as_str()) {
            continue;
        }
        // a JSON object keeps only one value per key
        if cfg.metadata == MetadataFormat::Json {
            return Err(AtlasError::DuplicateFrame {
                name: c.name.clone(),
            });
        }
        warn!(name = %c.name, "duplicate frame name, plist will hold both entries under one key");
    }

    let requests: Vec<PackRequest> = cropped
        .iter()
        .enumerate()
        .map(|(i, c)| PackRequest::new(i, c.width(), c.height()))
        .collect();
    let Growth { result, attempts } = grow_and_pack(&requests, cfg)?;
    info!(
        size = result.canvas_size,
        attempts = attempts.len(),
        unused = result.unused_area,
        "packed"
    );

    let canvas = compose(result.canvas_size, &cropped, &result.placements);
    let frames = cropped
        .iter()
        .zip(&result.placements)
        .map(|(c, p)| {
            FrameDescriptor::new(
                c.name.clone(),
                p.x,
                p.y,
                p.rotated,
                c.source_rect(),
                c.original_size,
                cfg.crop,
            )
        })
        .collect();

    Ok(AtlasOutput {
        canvas,
        size: result.canvas_size,
        frames,
        attempts,
        unused_area: result.unused_area,
    })
}

/// Loads `paths` (skipping undecodable files and the outputs in `out_dir`) and builds the atlas.
pub fn build_atlas_from_paths<P: AsRef<Path>>(
    paths: &[P],
    out_dir: &Path,
    cfg: &AtlasConfig,
) -> Result<AtlasOutput> {
    let (png, meta) = output_paths(out_dir, cfg);
    let reserved: Vec<PathBuf> = vec![png, meta];
    let sources = load_sources(paths, &reserved, |_| {});
    info!(count = sources.len(), "loaded source images");
    build_atlas(sources, cfg)
}

/// Full run: load, build, then write `<name>.png` and its metadata into `out_dir`.
///
/// Nothing is written unless the whole build succeeded.
pub fn pack_files<P: AsRef<Path>>(
    paths: &[P],
    out_dir: &Path,
    cfg: &AtlasConfig,
) -> Result<(AtlasOutput, PathBuf, PathBuf)> {
    let output = build_atlas_from_paths(paths, out_dir, cfg)?;
    let (png, meta) = write_outputs(&output, out_dir, cfg)?;
    Ok((output, png, meta))
}
