use rand::{Rng, SeedableRng};
use sprite_atlas_core::config::MaxRectsHeuristic;
use sprite_atlas_core::model::Rect;
use sprite_atlas_core::packer::{PackOptions, PackRequest, PackResult, pack};

fn footprints(requests: &[PackRequest], result: &PackResult) -> Vec<Rect> {
    requests
        .iter()
        .zip(&result.placements)
        .map(|(r, p)| p.footprint(r))
        .collect()
}

fn assert_disjoint_and_contained(rects: &[Rect], canvas: u32) {
    let bounds = Rect::new(0, 0, canvas, canvas);
    for (i, a) in rects.iter().enumerate() {
        assert!(bounds.contains(a), "{:?} outside {}x{}", a, canvas, canvas);
        for b in &rects[i + 1..] {
            assert!(!a.intersects(b), "overlap: {:?} vs {:?}", a, b);
        }
    }
}

fn random_requests(seed: u64, n: usize) -> Vec<PackRequest> {
    let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
    (0..n)
        .map(|i| PackRequest::new(i, rng.gen_range(1..=48), rng.gen_range(1..=48)))
        .collect()
}

#[test]
fn no_overlap_and_containment_for_every_heuristic() {
    let requests = random_requests(2024, 150);
    for heuristic in [
        MaxRectsHeuristic::BestAreaFit,
        MaxRectsHeuristic::BestShortSideFit,
        MaxRectsHeuristic::BestLongSideFit,
        MaxRectsHeuristic::BottomLeft,
        MaxRectsHeuristic::ContactPoint,
    ] {
        for allow_rotation in [true, false] {
            let opts = PackOptions {
                allow_rotation,
                heuristic,
            };
            let result = pack(&requests, 1024, &opts).expect("1024 fits 150 rects of <=48");
            assert_eq!(result.placements.len(), requests.len());
            let rects = footprints(&requests, &result);
            assert_disjoint_and_contained(&rects, 1024);
            if !allow_rotation {
                assert!(result.placements.iter().all(|p| !p.rotated));
            }
        }
    }
}

#[test]
fn placements_follow_request_order() {
    let requests = random_requests(7, 40);
    let result = pack(&requests, 512, &PackOptions::default()).expect("pack");
    for (req, p) in requests.iter().zip(&result.placements) {
        assert_eq!(req.index, p.index);
    }
}

#[test]
fn repeatable_for_identical_input() {
    let requests = random_requests(42, 120);
    let a = pack(&requests, 512, &PackOptions::default());
    let b = pack(&requests, 512, &PackOptions::default());
    match (a, b) {
        (Ok(a), Ok(b)) => {
            assert_eq!(a.placements, b.placements);
            assert_eq!(a.unused_area, b.unused_area);
        }
        (Err(a), Err(b)) => assert_eq!(a, b),
        _ => panic!("same input gave different outcomes"),
    }
}

#[test]
fn zero_requests_succeed_trivially() {
    let result = pack(&[], 2, &PackOptions::default()).expect("empty");
    assert!(result.placements.is_empty());
    assert_eq!(result.unused_area, 4);
}

#[test]
fn oversized_request_fails_immediately() {
    let requests = vec![PackRequest::new(0, 4, 4), PackRequest::new(1, 3, 9)];
    let err = pack(&requests, 8, &PackOptions::default()).unwrap_err();
    assert_eq!(err.index, 1);
    assert_eq!((err.w, err.h, err.canvas_size), (3, 9, 8));
}

#[test]
fn out_of_space_reports_the_first_unplaced_request() {
    let requests: Vec<PackRequest> = (0..5).map(|i| PackRequest::new(i, 4, 4)).collect();
    let err = pack(&requests, 8, &PackOptions::default()).unwrap_err();
    assert_eq!(err.index, 4);
}

#[test]
fn unused_area_accounts_for_placed_rects() {
    let requests = vec![PackRequest::new(0, 3, 2), PackRequest::new(1, 1, 4)];
    let result = pack(&requests, 8, &PackOptions::default()).expect("pack");
    assert_eq!(result.unused_area, 64 - 6 - 4);
}

#[test]
fn zero_area_request_takes_no_space() {
    let requests = vec![PackRequest::new(0, 0, 3), PackRequest::new(1, 4, 4)];
    let result = pack(&requests, 4, &PackOptions::default()).expect("pack");
    assert_eq!((result.placements[1].x, result.placements[1].y), (0, 0));
}

#[test]
fn full_canvas_is_filled_exactly() {
    // four quadrants of an 8x8 canvas
    let requests: Vec<PackRequest> = (0..4).map(|i| PackRequest::new(i, 4, 4)).collect();
    let result = pack(&requests, 8, &PackOptions::default()).expect("pack");
    assert_eq!(result.unused_area, 0);
    assert_disjoint_and_contained(&footprints(&requests, &result), 8);
}
