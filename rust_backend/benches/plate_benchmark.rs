use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use hector_obs::catalogue::{StarCatalogue, StarRecord, TargetCatalogue, TargetRecord};
use hector_obs::geometry::{circle_rectangle_intersection, Circle, Point, Rectangle, Tolerance};
use hector_obs::plate::{
    ConflictTable, HexabundleLabel, InstrumentConfig, MemberKind, Placement, PlateLayout,
};
use hector_obs::tiling::{PipelineConfig, TilingEngine};
use qtty::Radians;

/// Science bundles on two rings plus guides near the edge.
fn full_plate() -> Vec<Placement> {
    let mut placements = Vec::new();
    for i in 0..21 {
        let ring = if i % 2 == 0 { 90.0 } else { 160.0 };
        let angle = i as f64 * std::f64::consts::TAU / 21.0;
        placements.push(Placement {
            label: HexabundleLabel::science(i).unwrap(),
            member_id: i as i64,
            kind: MemberKind::Target,
            position: Point::new(ring * angle.cos(), ring * angle.sin()),
        });
    }
    for i in 0..6 {
        let angle = (i as f64 + 0.5) * std::f64::consts::TAU / 6.0;
        placements.push(Placement {
            label: HexabundleLabel::guide(i).unwrap(),
            member_id: 100 + i as i64,
            kind: MemberKind::Guide,
            position: Point::new(140.0 * angle.cos(), 140.0 * angle.sin()),
        });
    }
    placements
}

fn bench_geometry(c: &mut Criterion) {
    let mut group = c.benchmark_group("geometry");

    let circle = Circle::new(Point::ORIGIN, 1.0, Radians::new(0.0)).unwrap();
    let rect = Rectangle::new(Point::new(0.3, 0.1), 2.0, 1.5, Radians::new(0.4)).unwrap();
    group.bench_function("circle_rectangle_intersection", |b| {
        let tol = Tolerance::default();
        b.iter(|| circle_rectangle_intersection(black_box(&circle), black_box(&rect), tol));
    });

    group.finish();
}

fn bench_conflicts(c: &mut Criterion) {
    let mut group = c.benchmark_group("conflicts");
    let cfg = InstrumentConfig::default();
    let layout = PlateLayout::build(&full_plate(), &cfg).unwrap();

    group.bench_with_input(
        BenchmarkId::new("detect", layout.magnets().len()),
        &layout,
        |b, layout| {
            b.iter(|| ConflictTable::detect(black_box(layout.magnets()), &cfg));
        },
    );

    group.finish();
}

fn bench_tiling(c: &mut Criterion) {
    let mut group = c.benchmark_group("tiling");
    group.sample_size(10);

    for n in [50usize, 200] {
        let records: Vec<TargetRecord> = (0..n)
            .map(|i| TargetRecord {
                id: i as i64,
                ra: 150.0 + (i % 20) as f64 * 0.25,
                dec: (i / 20) as f64 * 0.25,
                r_mag: 17.0,
                priority: (i % 4) as i32,
                remaining_observations: 1.0,
                n_observations_to_complete: 1.0,
                kind: 1,
            })
            .collect();
        let stars: Vec<StarRecord> = (0..n)
            .map(|i| StarRecord {
                id: 10_000 + i as i64,
                ra: 150.1 + (i % 20) as f64 * 0.25,
                dec: 0.1 + (i / 20) as f64 * 0.25,
                r_mag: 12.0,
            })
            .collect();

        let mut config = PipelineConfig::default();
        config.tiling.nsel_guides = 1;
        config.tiling.nsel_standards = 0;
        config.tiling.n_targets_per_field = 8;
        config.tiling.proximity = 1200.0;
        config.tiling.best_effort = true;
        let engine = TilingEngine::new(config, StarCatalogue::new(stars), StarCatalogue::default());

        group.bench_with_input(BenchmarkId::new("run", n), &records, |b, records| {
            b.iter(|| {
                let catalogue = TargetCatalogue::from_records(records.clone()).unwrap();
                black_box(engine.run(catalogue))
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_geometry, bench_conflicts, bench_tiling);
criterion_main!(benches);
