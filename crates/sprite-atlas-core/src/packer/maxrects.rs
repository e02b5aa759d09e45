use super::{PackOptions, PackRequest, Packer, Placement};
use crate::config::MaxRectsHeuristic;
use crate::model::Rect;

/// MaxRects packer over one square canvas.
///
/// Keeps the list of maximal free rectangles; every placement splits the free
/// rectangles it touches into up to four maximal remainders, then dominated
/// free rectangles are pruned.
pub struct MaxRectsPacker {
    border: Rect,
    free: Vec<Rect>,
    used: Vec<Rect>,
    heuristic: MaxRectsHeuristic,
    allow_rotation: bool,
}

/// Candidate position with its score; lower is better on every component.
///
/// Ties go to the smaller bottom edge, then the smaller x, then the unrotated candidate.
#[derive(Clone, Copy)]
struct Candidate {
    rect: Rect,
    rotated: bool,
    score: (i64, i64),
}

impl Candidate {
    fn better_than(&self, other: &Candidate) -> bool {
        let key = |c: &Candidate| (c.score.0, c.score.1, c.rect.bottom_ex(), c.rect.x, c.rotated);
        key(self) < key(other)
    }
}

impl MaxRectsPacker {
    pub fn new(canvas_size: u32, options: &PackOptions) -> Self {
        let border = Rect::new(0, 0, canvas_size, canvas_size);
        Self {
            border,
            free: vec![border],
            used: Vec::new(),
            heuristic: options.heuristic,
            allow_rotation: options.allow_rotation,
        }
    }

    pub fn free_list_len(&self) -> usize {
        self.free.len()
    }

    fn place_rect(&mut self, node: &Rect) {
        let mut split: Vec<Rect> = Vec::new();
        self.free.retain(|fr| {
            if fr.intersects(node) {
                split_free_node(fr, node, &mut split);
                false
            } else {
                true
            }
        });
        self.free.extend(split);
        self.prune_free_list();
        self.used.push(*node);
    }

    fn prune_free_list(&mut self) {
        let mut i = 0;
        while i < self.free.len() {
            let a = self.free[i];
            let mut remove_i = false;
            let mut j = i + 1;
            while j < self.free.len() {
                let b = self.free[j];
                if b.contains(&a) {
                    remove_i = true;
                    break;
                }
                if a.contains(&b) {
                    self.free.remove(j);
                    continue;
                }
                j += 1;
            }
            if remove_i {
                self.free.remove(i);
            } else {
                i += 1;
            }
        }
    }

    fn score(&self, fr: &Rect, w: u32, h: u32) -> (i64, i64) {
        let leftover_h = fr.w as i64 - w as i64;
        let leftover_v = fr.h as i64 - h as i64;
        let short_fit = leftover_h.abs().min(leftover_v.abs());
        let long_fit = leftover_h.abs().max(leftover_v.abs());
        let area_fit = fr.area() as i64 - (w as i64 * h as i64);
        match self.heuristic {
            MaxRectsHeuristic::BestAreaFit => (area_fit, short_fit),
            MaxRectsHeuristic::BestShortSideFit => (short_fit, long_fit),
            MaxRectsHeuristic::BestLongSideFit => (long_fit, short_fit),
            MaxRectsHeuristic::BottomLeft => (fr.y as i64 + h as i64, fr.x as i64),
            MaxRectsHeuristic::ContactPoint => {
                // maximize contact: negate for minimization
                let contact = self.contact_point_score(&Rect::new(fr.x, fr.y, w, h));
                (-(contact as i64), area_fit)
            }
        }
    }

    fn find_position(&self, w: u32, h: u32) -> Option<(Rect, bool)> {
        let mut best: Option<Candidate> = None;
        let mut consider = |cand: Candidate| {
            if best.as_ref().is_none_or(|b| cand.better_than(b)) {
                best = Some(cand);
            }
        };
        for fr in &self.free {
            if fr.w >= w && fr.h >= h {
                consider(Candidate {
                    rect: Rect::new(fr.x, fr.y, w, h),
                    rotated: false,
                    score: self.score(fr, w, h),
                });
            }
            if self.allow_rotation && w != h && fr.w >= h && fr.h >= w {
                consider(Candidate {
                    rect: Rect::new(fr.x, fr.y, h, w),
                    rotated: true,
                    score: self.score(fr, h, w),
                });
            }
        }
        best.map(|c| (c.rect, c.rotated))
    }

    fn contact_point_score(&self, node: &Rect) -> u32 {
        let mut score = 0u32;
        if node.x == self.border.x || node.right_ex() == self.border.right_ex() {
            score += node.h;
        }
        if node.y == self.border.y || node.bottom_ex() == self.border.bottom_ex() {
            score += node.w;
        }
        for u in &self.used {
            if node.x == u.right_ex() || u.x == node.right_ex() {
                score += overlap_1d(node.y, node.bottom_ex(), u.y, u.bottom_ex());
            }
            if node.y == u.bottom_ex() || u.y == node.bottom_ex() {
                score += overlap_1d(node.x, node.right_ex(), u.x, u.right_ex());
            }
        }
        score
    }
}

/// Pushes the maximal parts of `fr` not covered by `node` (left, right, top, bottom).
fn split_free_node(fr: &Rect, node: &Rect, out: &mut Vec<Rect>) {
    if node.x > fr.x {
        out.push(Rect::new(fr.x, fr.y, node.x - fr.x, fr.h));
    }
    if node.right_ex() < fr.right_ex() {
        out.push(Rect::new(node.right_ex(), fr.y, fr.right_ex() - node.right_ex(), fr.h));
    }
    if node.y > fr.y {
        out.push(Rect::new(fr.x, fr.y, fr.w, node.y - fr.y));
    }
    if node.bottom_ex() < fr.bottom_ex() {
        out.push(Rect::new(fr.x, node.bottom_ex(), fr.w, fr.bottom_ex() - node.bottom_ex()));
    }
}

fn overlap_1d(a1: u32, a2: u32, b1: u32, b2: u32) -> u32 {
    let start = a1.max(b1);
    let end = a2.min(b2);
    end.saturating_sub(start)
}

impl Packer for MaxRectsPacker {
    fn can_pack(&self, req: &PackRequest) -> bool {
        self.find_position(req.w, req.h).is_some()
    }

    fn pack(&mut self, req: &PackRequest) -> Option<Placement> {
        let (place, rotated) = self.find_position(req.w, req.h)?;
        self.place_rect(&place);
        Some(Placement {
            index: req.index,
            x: place.x,
            y: place.y,
            rotated,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_leaves_maximal_remainders() {
        let mut out = Vec::new();
        split_free_node(&Rect::new(0, 0, 10, 10), &Rect::new(0, 0, 4, 3), &mut out);
        assert_eq!(out, vec![Rect::new(4, 0, 6, 10), Rect::new(0, 3, 10, 7)]);
    }

    #[test]
    fn free_list_is_pruned_after_fill() {
        let mut p = MaxRectsPacker::new(8, &PackOptions::default());
        assert!(p.pack(&PackRequest::new(0, 8, 8)).is_some());
        assert_eq!(p.free_list_len(), 0);
        assert!(!p.can_pack(&PackRequest::new(1, 1, 1)));
    }

    #[test]
    fn rotation_is_used_when_only_rotated_fits() {
        let mut p = MaxRectsPacker::new(8, &PackOptions::default());
        p.pack(&PackRequest::new(0, 8, 6)).expect("first");
        // remaining free area is 8x2; a 2x8 only fits rotated
        let pl = p.pack(&PackRequest::new(1, 2, 8)).expect("rotated");
        assert!(pl.rotated);
        assert_eq!((pl.x, pl.y), (0, 6));
    }

    #[test]
    fn exact_tie_prefers_unrotated() {
        let rotated = Candidate {
            rect: Rect::new(0, 0, 2, 4),
            rotated: true,
            score: (0, 0),
        };
        let upright = Candidate {
            rect: Rect::new(0, 2, 4, 2),
            rotated: false,
            score: (0, 0),
        };
        assert!(upright.better_than(&rotated));
        assert!(!rotated.better_than(&upright));
    }
}
