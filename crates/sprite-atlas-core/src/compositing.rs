use image::{RgbaImage, imageops};

use crate::crop::CroppedImage;
use crate::packer::Placement;

/// Copy `src` into `canvas` with its top-left at (dx, dy).
///
/// When `rotated`, `src` is turned 90° clockwise first, so the drawn footprint is
/// `src.height() x src.width()` and starts exactly at (dx, dy).
/// Pixels are replaced, not blended; callers draw into disjoint regions.
pub fn blit_rgba(src: &RgbaImage, canvas: &mut RgbaImage, dx: u32, dy: u32, rotated: bool) {
    if rotated {
        let turned = imageops::rotate90(src);
        imageops::replace(canvas, &turned, dx as i64, dy as i64);
    } else {
        imageops::replace(canvas, src, dx as i64, dy as i64);
    }
}

/// Allocate a transparent `canvas_size` square and draw every image at its placement.
///
/// `images` and `placements` are parallel slices in input order.
pub fn compose(canvas_size: u32, images: &[CroppedImage], placements: &[Placement]) -> RgbaImage {
    debug_assert_eq!(images.len(), placements.len());
    let mut canvas = RgbaImage::new(canvas_size, canvas_size);
    for (img, pl) in images.iter().zip(placements) {
        blit_rgba(&img.image, &mut canvas, pl.x, pl.y, pl.rotated);
    }
    canvas
}
