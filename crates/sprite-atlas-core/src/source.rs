//! Image I/O: loading sources and writing the finished atlas.

use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};

use image::{ImageFormat, ImageReader, RgbaImage};
use tracing::{error, info, warn};

use crate::config::{AtlasConfig, MetadataFormat};
use crate::error::{AtlasError, Result};
use crate::export::to_json_hash;
use crate::export_plist::{AtlasMeta, to_plist};
use crate::pipeline::AtlasOutput;

/// Decoded input image, normalized to RGBA8.
#[derive(Debug, Clone)]
pub struct SourceImage {
    /// File name used as the metadata key (no directories).
    pub name: String,
    /// Where the image was read from, if it came from disk.
    pub path: Option<PathBuf>,
    pub image: RgbaImage,
}

impl SourceImage {
    /// In-memory source, e.g. for tests or generated sprites.
    pub fn new(name: impl Into<String>, image: RgbaImage) -> Self {
        Self {
            name: name.into(),
            path: None,
            image,
        }
    }
}

/// Decode one file into a `SourceImage`.
pub fn load_source(path: &Path) -> Result<SourceImage> {
    let decode = |source| AtlasError::Decode {
        path: path.to_path_buf(),
        source,
    };
    let img = ImageReader::open(path)?
        .with_guessed_format()?
        .decode()
        .map_err(decode)?;
    let name = path
        .file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned());
    Ok(SourceImage {
        name,
        path: Some(path.to_path_buf()),
        image: img.to_rgba8(),
    })
}

/// True when `path` names one of the files the build is about to write.
pub fn is_reserved(path: &Path, reserved: &[PathBuf]) -> bool {
    reserved.iter().any(|r| {
        r == path
            || match (fs::canonicalize(r), fs::canonicalize(path)) {
                (Ok(a), Ok(b)) => a == b,
                _ => false,
            }
    })
}

/// Load every path, skipping (with a logged diagnostic) reserved output files,
/// files that fail to decode and images with a zero dimension.
///
/// `on_progress` is called once per path, after it was handled.
pub fn load_sources<P: AsRef<Path>>(
    paths: &[P],
    reserved: &[PathBuf],
    mut on_progress: impl FnMut(&Path),
) -> Vec<SourceImage> {
    let mut out = Vec::with_capacity(paths.len());
    for p in paths {
        let p = p.as_ref();
        if is_reserved(p, reserved) {
            warn!(?p, "skip output file given as source");
        } else {
            match load_source(p) {
                Ok(src) if src.image.width() == 0 || src.image.height() == 0 => {
                    warn!(?p, "skip empty image");
                }
                Ok(src) => out.push(src),
                Err(e) => error!(?p, error = %e, "skip image"),
            }
        }
        on_progress(p);
    }
    out
}

/// Output files a build will produce for `cfg` in `out_dir`.
pub fn output_paths(out_dir: &Path, cfg: &AtlasConfig) -> (PathBuf, PathBuf) {
    (
        out_dir.join(cfg.texture_file_name()),
        out_dir.join(cfg.metadata_file_name()),
    )
}

/// Encode and write the canvas and its metadata.
///
/// Both files are encoded in memory first, so an encoding problem leaves
/// nothing on disk. If the metadata cannot be written the texture is removed again.
pub fn write_outputs(output: &AtlasOutput, out_dir: &Path, cfg: &AtlasConfig) -> Result<(PathBuf, PathBuf)> {
    let (png_path, meta_path) = output_paths(out_dir, cfg);

    let mut png = Vec::new();
    output
        .canvas
        .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
        .map_err(|source| AtlasError::Encode {
            path: png_path.clone(),
            source,
        })?;

    let meta = AtlasMeta::new(cfg.texture_file_name(), output.size);
    let metadata = match cfg.metadata {
        MetadataFormat::Plist => to_plist(&output.frames, &meta),
        MetadataFormat::Json => {
            let value = to_json_hash(&output.frames, &meta);
            serde_json::to_string_pretty(&value).map_err(std::io::Error::from)?
        }
    };

    write_file(&png_path, &png)?;
    if let Err(e) = write_file(&meta_path, metadata.as_bytes()) {
        // no texture without its frames
        if let Err(rm) = fs::remove_file(&png_path) {
            warn!(?png_path, error = %rm, "cannot remove texture after metadata write failed");
        }
        return Err(e);
    }
    info!(?png_path, ?meta_path, "atlas written");
    Ok((png_path, meta_path))
}

fn write_file(path: &Path, bytes: &[u8]) -> Result<()> {
    fs::write(path, bytes).map_err(|source| AtlasError::Write {
        path: path.to_path_buf(),
        source,
    })
}
