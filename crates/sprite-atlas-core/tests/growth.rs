use image::{Rgba, RgbaImage};
use sprite_atlas_core::prelude::*;

fn solid(name: &str, w: u32, h: u32) -> SourceImage {
    SourceImage::new(name, RgbaImage::from_pixel(w, h, Rgba([200, 40, 40, 255])))
}

#[test]
fn single_ten_by_ten_lands_in_sixteen() {
    let cfg = AtlasConfig::builder().crop(false).build();
    let out = build_atlas(vec![solid("a.png", 10, 10)], &cfg).expect("build");
    assert_eq!(out.size, 16);
    assert_eq!(out.attempts, vec![2, 4, 8, 16]);
    assert_eq!(out.canvas.dimensions(), (16, 16));
    let f = &out.frames[0];
    assert_eq!(f.frame, Rect::new(0, 0, 10, 10));
    assert_eq!(f.source_size, Size::new(10, 10));
    assert_eq!(f.offset, Point::new(0, 0));
    assert!(!f.rotated);
}

#[test]
fn two_eight_by_eight_fit_in_sixteen() {
    let cfg = AtlasConfig::builder().crop(false).build();
    let out = build_atlas(vec![solid("a.png", 8, 8), solid("b.png", 8, 8)], &cfg).expect("build");
    assert_eq!(out.size, 16);
    let (a, b) = (&out.frames[0].frame, &out.frames[1].frame);
    assert!(!a.intersects(b));
}

#[test]
fn attempts_double_from_initial_size() {
    let cfg = AtlasConfig::builder().crop(false).build();
    let sources: Vec<SourceImage> = (0..9)
        .map(|i| solid(&format!("s{}.png", i), 13, 7))
        .collect();
    let out = build_atlas(sources, &cfg).expect("build");
    assert!(out.size.is_power_of_two() && out.size >= 2);
    assert_eq!(out.attempts[0], 2);
    for pair in out.attempts.windows(2) {
        assert_eq!(pair[1], pair[0] * 2);
    }
    assert_eq!(*out.attempts.last().unwrap(), out.size);
}

#[test]
fn previous_size_really_failed() {
    let requests: Vec<PackRequest> = (0..6).map(|i| PackRequest::new(i, 5, 9)).collect();
    let cfg = AtlasConfig::default();
    let growth = grow_and_pack(&requests, &cfg).expect("grow");
    let size = growth.result.canvas_size;
    let opts = PackOptions {
        allow_rotation: cfg.allow_rotation,
        heuristic: cfg.heuristic,
    };
    assert!(pack(&requests, size / 2, &opts).is_err());
}

#[test]
fn capped_growth_reports_failure() {
    let cfg = AtlasConfig::builder().max_size(Some(64)).build();
    let err = build_atlas(vec![solid("big.png", 100, 100)], &cfg)
        .err()
        .expect("must fail");
    match err {
        AtlasError::CanvasLimit {
            failed_size,
            max_size,
            failure,
        } => {
            assert_eq!(failed_size, 64);
            assert_eq!(max_size, 64);
            assert_eq!(failure.index, 0);
        }
        other => panic!("expected CanvasLimit, got {other}"),
    }
}

#[test]
fn cap_equal_to_needed_size_succeeds() {
    let cfg = AtlasConfig::builder().max_size(Some(16)).build();
    let out = build_atlas(vec![solid("a.png", 16, 16)], &cfg).expect("build");
    assert_eq!(out.size, 16);
}

#[test]
fn empty_input_is_rejected_before_packing() {
    let err = build_atlas(Vec::new(), &AtlasConfig::default()).err().expect("empty");
    assert!(matches!(err, AtlasError::Empty));
}

#[test]
fn invalid_initial_size_is_rejected() {
    let cfg = AtlasConfig::builder().initial_size(3).build();
    let err = build_atlas(vec![solid("a.png", 1, 1)], &cfg).err().expect("invalid");
    assert!(matches!(err, AtlasError::InvalidConfig(_)));

    let cfg = AtlasConfig::builder().initial_size(8).max_size(Some(4)).build();
    assert!(cfg.validate().is_err());

    let cfg = AtlasConfig::builder().output_name("  ").build();
    assert!(cfg.validate().is_err());
}

#[test]
fn stats_summarize_the_build() {
    let cfg = AtlasConfig::builder().crop(false).build();
    let out = build_atlas(vec![solid("a.png", 8, 8), solid("b.png", 8, 8)], &cfg).expect("build");
    let stats = out.stats();
    assert_eq!(stats.num_frames, 2);
    assert_eq!(stats.canvas_area, 256);
    assert_eq!(stats.used_area, 128);
    assert_eq!(stats.wasted_area(), out.unused_area);
    assert!((stats.occupancy - 0.5).abs() < 1e-9);
    assert!(stats.summary().contains("Frames: 2"));
}

#[test]
fn duplicate_names_rejected_for_json_only() {
    let sources = || vec![solid("a.png", 4, 4), solid("a.png", 6, 2)];

    let json = AtlasConfig::builder().metadata(MetadataFormat::Json).build();
    match build_atlas(sources(), &json) {
        Err(AtlasError::DuplicateFrame { name }) => assert_eq!(name, "a.png"),
        Err(other) => panic!("expected DuplicateFrame, got {other}"),
        Ok(_) => panic!("duplicate names accepted for JSON"),
    }

    let plist = AtlasConfig::builder().metadata(MetadataFormat::Plist).build();
    let out = build_atlas(sources(), &plist).expect("plist keeps both");
    assert_eq!(out.frames.len(), 2);
}
