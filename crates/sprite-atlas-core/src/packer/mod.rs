use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::trace;

use crate::config::MaxRectsHeuristic;
use crate::model::Rect;

pub mod maxrects;

use maxrects::MaxRectsPacker;

/// One rectangle to place. `index` ties the result back to the caller's list.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct PackRequest {
    pub index: usize,
    pub w: u32,
    pub h: u32,
}

impl PackRequest {
    pub fn new(index: usize, w: u32, h: u32) -> Self {
        Self { index, w, h }
    }
}

/// Where a request landed. When `rotated`, the footprint is `h x w`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Placement {
    pub index: usize,
    pub x: u32,
    pub y: u32,
    pub rotated: bool,
}

impl Placement {
    /// Footprint of `req` at this placement (post-rotation).
    pub fn footprint(&self, req: &PackRequest) -> Rect {
        if self.rotated {
            Rect::new(self.x, self.y, req.h, req.w)
        } else {
            Rect::new(self.x, self.y, req.w, req.h)
        }
    }
}

/// Successful packing of every request into one square canvas.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackResult {
    pub canvas_size: u32,
    /// One entry per request, in request order.
    pub placements: Vec<Placement>,
    /// Canvas area not covered by any placement. Diagnostic only.
    pub unused_area: u64,
}

/// A request could not be placed in the current canvas.
///
/// This is the expected signal for the growth loop to try a larger canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("rectangle #{index} ({w}x{h}) does not fit in a {canvas_size}x{canvas_size} canvas")]
pub struct PackFailure {
    pub index: usize,
    pub w: u32,
    pub h: u32,
    pub canvas_size: u32,
}

/// Options shared by every attempt of one build.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct PackOptions {
    pub allow_rotation: bool,
    pub heuristic: MaxRectsHeuristic,
}

impl Default for PackOptions {
    fn default() -> Self {
        Self {
            allow_rotation: true,
            heuristic: MaxRectsHeuristic::BestAreaFit,
        }
    }
}

/// A packer places rectangles into a single canvas.
///
/// Implementations must ensure no overlaps and keep every placement inside the canvas.
/// `pack` returns `None` if the rectangle cannot be placed in the remaining space.
pub trait Packer {
    fn can_pack(&self, req: &PackRequest) -> bool;
    fn pack(&mut self, req: &PackRequest) -> Option<Placement>;
}

/// Packs `requests` into a `canvas_size` square, in the given order.
///
/// Each call builds a fresh packer; no state survives between attempts.
pub fn pack(
    requests: &[PackRequest],
    canvas_size: u32,
    options: &PackOptions,
) -> Result<PackResult, PackFailure> {
    let failure = |req: &PackRequest| PackFailure {
        index: req.index,
        w: req.w,
        h: req.h,
        canvas_size,
    };

    // a square canvas fits a rectangle in both orientations or in neither
    if let Some(req) = requests.iter().find(|r| r.w > canvas_size || r.h > canvas_size) {
        return Err(failure(req));
    }

    let mut packer = MaxRectsPacker::new(canvas_size, options);
    let mut placements = Vec::with_capacity(requests.len());
    let mut used_area = 0u64;
    for req in requests {
        if req.w == 0 || req.h == 0 {
            // zero-area content occupies nothing
            placements.push(Placement {
                index: req.index,
                x: 0,
                y: 0,
                rotated: false,
            });
            continue;
        }
        let placement = packer.pack(req).ok_or_else(|| failure(req))?;
        trace!(index = req.index, x = placement.x, y = placement.y, rotated = placement.rotated, "placed");
        used_area += req.w as u64 * req.h as u64;
        placements.push(placement);
    }

    let canvas_area = canvas_size as u64 * canvas_size as u64;
    Ok(PackResult {
        canvas_size,
        placements,
        unused_area: canvas_area.saturating_sub(used_area),
    })
}
