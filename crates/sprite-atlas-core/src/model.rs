use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle (pixels). `x,y` is top-left; `w,h` are sizes.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

impl Rect {
    pub fn new(x: u32, y: u32, w: u32, h: u32) -> Self {
        Self { x, y, w, h }
    }
    /// Exclusive right edge (`x + w`).
    pub fn right_ex(&self) -> u32 {
        self.x + self.w
    }
    /// Exclusive bottom edge (`y + h`).
    pub fn bottom_ex(&self) -> u32 {
        self.y + self.h
    }
    pub fn area(&self) -> u64 {
        self.w as u64 * self.h as u64
    }
    pub fn is_empty(&self) -> bool {
        self.w == 0 || self.h == 0
    }
    /// Returns true if `r` is fully inside `self` (exclusive edges, so empty rects on the edge count).
    pub fn contains(&self, r: &Rect) -> bool {
        r.x >= self.x && r.y >= self.y && r.right_ex() <= self.right_ex() && r.bottom_ex() <= self.bottom_ex()
    }
    /// True when the two rectangles share a positive area.
    pub fn intersects(&self, other: &Rect) -> bool {
        !(self.x >= other.right_ex()
            || other.x >= self.right_ex()
            || self.y >= other.bottom_ex()
            || other.y >= self.bottom_ex())
    }
}

/// Signed 2D point; frame offsets may be negative.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Width/height pair.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Size {
    pub w: u32,
    pub h: u32,
}

impl Size {
    pub fn new(w: u32, h: u32) -> Self {
        Self { w, h }
    }
}

/// Per-image metadata record: where a source image lives in the atlas.
///
/// Created once after a successful pack and never mutated; serializers
/// (`to_plist`, `to_json_hash`) consume it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FrameDescriptor {
    /// Source file name (metadata key).
    pub name: String,
    /// Footprint in the atlas; width/height are swapped when `rotated`.
    pub frame: Rect,
    /// Crop displacement relative to the center of the original image.
    pub offset: Point,
    /// True if the image was stored rotated 90° clockwise.
    pub rotated: bool,
    /// Opaque content within the original image (pre-rotation).
    pub source_color_rect: Rect,
    /// Original, un-cropped size.
    pub source_size: Size,
}

impl FrameDescriptor {
    /// Builds the descriptor for a cropped image placed at `(x, y)`.
    ///
    /// With `cropped == true` the offset is `crop_offset - (original - cropped) / 2`
    /// per axis; otherwise it is `(0, 0)`.
    pub fn new(
        name: impl Into<String>,
        x: u32,
        y: u32,
        rotated: bool,
        source_color_rect: Rect,
        source_size: Size,
        cropped: bool,
    ) -> Self {
        let (fw, fh) = if rotated {
            (source_color_rect.h, source_color_rect.w)
        } else {
            (source_color_rect.w, source_color_rect.h)
        };
        let offset = if cropped {
            Point::new(
                centered_offset(source_color_rect.x, source_size.w, source_color_rect.w),
                centered_offset(source_color_rect.y, source_size.h, source_color_rect.h),
            )
        } else {
            Point::default()
        };
        Self {
            name: name.into(),
            frame: Rect::new(x, y, fw, fh),
            offset,
            rotated,
            source_color_rect,
            source_size,
        }
    }
}

fn centered_offset(crop_origin: u32, original: u32, cropped: u32) -> i32 {
    let slack = original.saturating_sub(cropped) as i64 / 2;
    (crop_origin as i64 - slack) as i32
}

/// Statistics about a finished atlas.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AtlasStats {
    /// Number of frames in the atlas.
    pub num_frames: usize,
    /// Number of frames stored rotated.
    pub num_rotated: usize,
    /// Number of frames whose content is smaller than the source image.
    pub num_cropped: usize,
    /// Canvas side length.
    pub canvas_size: u32,
    /// Canvas area in pixels.
    pub canvas_area: u64,
    /// Sum of frame areas.
    pub used_area: u64,
    /// used_area / canvas_area (0.0 to 1.0).
    pub occupancy: f64,
    /// Canvas sizes tried before success.
    pub attempts: usize,
}

impl AtlasStats {
    pub fn from_frames(frames: &[FrameDescriptor], canvas_size: u32, attempts: usize) -> Self {
        let canvas_area = canvas_size as u64 * canvas_size as u64;
        let used_area: u64 = frames.iter().map(|f| f.frame.area()).sum();
        let num_rotated = frames.iter().filter(|f| f.rotated).count();
        let num_cropped = frames
            .iter()
            .filter(|f| {
                f.source_color_rect.w != f.source_size.w || f.source_color_rect.h != f.source_size.h
            })
            .count();
        let occupancy = if canvas_area > 0 {
            used_area as f64 / canvas_area as f64
        } else {
            0.0
        };
        Self {
            num_frames: frames.len(),
            num_rotated,
            num_cropped,
            canvas_size,
            canvas_area,
            used_area,
            occupancy,
            attempts,
        }
    }

    /// Returns a human-readable summary of the statistics.
    pub fn summary(&self) -> String {
        format!(
            "Canvas: {}x{}, Frames: {}, Occupancy: {:.2}%, Used Area: {} px², Rotated: {}, Cropped: {}, Attempts: {}",
            self.canvas_size,
            self.canvas_size,
            self.num_frames,
            self.occupancy * 100.0,
            self.used_area,
            self.num_rotated,
            self.num_cropped,
            self.attempts,
        )
    }

    /// Returns wasted space in pixels.
    pub fn wasted_area(&self) -> u64 {
        self.canvas_area.saturating_sub(self.used_area)
    }
}
