//! Alpha bounding boxes and cropped sub-images.

use image::RgbaImage;
use image::imageops;

use crate::config::TransparentPolicy;
use crate::model::{Rect, Size};
use crate::source::SourceImage;

/// A source image reduced to its opaque content.
#[derive(Debug, Clone)]
pub struct CroppedImage {
    pub name: String,
    /// Pixels inside the crop rectangle.
    pub image: RgbaImage,
    /// Top-left of the crop rectangle within the original image.
    pub crop_x: u32,
    pub crop_y: u32,
    /// Size of the un-cropped source.
    pub original_size: Size,
}

impl CroppedImage {
    pub fn width(&self) -> u32 {
        self.image.width()
    }
    pub fn height(&self) -> u32 {
        self.image.height()
    }
    /// Crop rectangle in source coordinates (pre-rotation).
    pub fn source_rect(&self) -> Rect {
        Rect::new(self.crop_x, self.crop_y, self.width(), self.height())
    }
}

/// Smallest rectangle containing every pixel with alpha > 0.
///
/// Returns `None` for images without any such pixel (including 0x0 images).
pub fn opaque_bounds(rgba: &RgbaImage) -> Option<Rect> {
    let mut x1 = u32::MAX;
    let mut y1 = u32::MAX;
    let mut x2 = 0u32;
    let mut y2 = 0u32;
    let mut found = false;
    for (x, y, px) in rgba.enumerate_pixels() {
        if px[3] == 0 {
            continue;
        }
        found = true;
        x1 = x1.min(x);
        y1 = y1.min(y);
        x2 = x2.max(x);
        y2 = y2.max(y);
    }
    if !found {
        return None;
    }
    Some(Rect::new(x1, y1, x2 - x1 + 1, y2 - y1 + 1))
}

/// Treats the whole source as its own crop (offset 0,0).
pub fn uncropped(source: &SourceImage) -> CroppedImage {
    let (w, h) = source.image.dimensions();
    CroppedImage {
        name: source.name.clone(),
        image: source.image.clone(),
        crop_x: 0,
        crop_y: 0,
        original_size: Size::new(w, h),
    }
}

/// Crops `source` to its opaque bounds.
///
/// Fully transparent sources are resolved by `policy`; `None` means the image
/// must be left out of the atlas.
pub fn crop_image(source: &SourceImage, policy: TransparentPolicy) -> Option<CroppedImage> {
    let (w, h) = source.image.dimensions();
    let original_size = Size::new(w, h);
    match opaque_bounds(&source.image) {
        Some(r) => Some(CroppedImage {
            name: source.name.clone(),
            image: imageops::crop_imm(&source.image, r.x, r.y, r.w, r.h).to_image(),
            crop_x: r.x,
            crop_y: r.y,
            original_size,
        }),
        None => match policy {
            TransparentPolicy::Skip => None,
            TransparentPolicy::OneByOne => Some(CroppedImage {
                name: source.name.clone(),
                image: RgbaImage::new(1, 1),
                crop_x: 0,
                crop_y: 0,
                original_size,
            }),
            TransparentPolicy::Keep => Some(uncropped(source)),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn faint_alpha_counts_as_opaque() {
        let mut img = RgbaImage::new(6, 6);
        img.put_pixel(4, 1, Rgba([0, 0, 0, 1]));
        assert_eq!(opaque_bounds(&img), Some(Rect::new(4, 1, 1, 1)));
    }

    #[test]
    fn empty_image_has_no_bounds() {
        assert_eq!(opaque_bounds(&RgbaImage::new(0, 0)), None);
        assert_eq!(opaque_bounds(&RgbaImage::new(3, 3)), None);
    }
}
