use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use rand::{Rng, SeedableRng};
use sprite_atlas_core::prelude::*;

fn generate_requests(count: usize, min_size: u32, max_size: u32) -> Vec<PackRequest> {
    let mut rng = rand::rngs::StdRng::seed_from_u64(count as u64);
    (0..count)
        .map(|i| {
            let w = rng.gen_range(min_size..=max_size);
            let h = rng.gen_range(min_size..=max_size);
            PackRequest::new(i, w, h)
        })
        .collect()
}

fn bench_growth(c: &mut Criterion) {
    let mut group = c.benchmark_group("grow_and_pack");

    for count in [50, 100, 200] {
        let requests = generate_requests(count, 16, 64);
        group.throughput(Throughput::Elements(count as u64));

        for (label, heuristic) in [
            ("BestAreaFit", MaxRectsHeuristic::BestAreaFit),
            ("BottomLeft", MaxRectsHeuristic::BottomLeft),
            ("ContactPoint", MaxRectsHeuristic::ContactPoint),
        ] {
            let cfg = AtlasConfig::builder().heuristic(heuristic).build();
            group.bench_with_input(BenchmarkId::new(label, count), &requests, |b, requests| {
                b.iter(|| black_box(grow_and_pack(requests, &cfg).map(|g| g.result.canvas_size)))
            });
        }
    }

    group.finish();
}

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("build_atlas");
    let sprites: Vec<SourceImage> = generate_requests(100, 8, 48)
        .into_iter()
        .map(|r| {
            let mut img = image::RgbaImage::new(r.w, r.h);
            // opaque core with a transparent margin so cropping has work to do
            for y in r.h / 4..r.h - r.h / 4 {
                for x in r.w / 4..r.w - r.w / 4 {
                    img.put_pixel(x, y, image::Rgba([255, 255, 255, 255]));
                }
            }
            SourceImage::new(format!("sprite_{}.png", r.index), img)
        })
        .collect();

    for crop in [false, true] {
        let cfg = AtlasConfig::builder().crop(crop).build();
        group.bench_with_input(BenchmarkId::new("crop", crop), &sprites, |b, sprites| {
            b.iter(|| black_box(build_atlas(sprites.clone(), &cfg).map(|o| o.size)))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_growth, bench_build);
criterion_main!(benches);
