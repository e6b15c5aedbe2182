//! Benchmarks for the full anchor session

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use head_pose_anchor::{
    config::Config,
    pose::PoseMatrix,
    render::{RenderFrame, RenderSurface},
    session::AnchorSession,
    Result,
};
use nalgebra::{Matrix4, Vector3};

struct DiscardSurface;

impl RenderSurface for DiscardSurface {
    fn resize(&mut self, _width: u32, _height: u32) -> Result<()> {
        Ok(())
    }

    fn draw(&mut self, frame: &RenderFrame) -> Result<()> {
        black_box(frame);
        Ok(())
    }
}

fn configured_session(width: f64, height: f64) -> AnchorSession<DiscardSurface> {
    let mut session = AnchorSession::new(Config::default(), DiscardSurface);
    session.on_viewport_change(width, height);
    session
}

fn benchmark_pose_updates(c: &mut Criterion) {
    let mut group = c.benchmark_group("pose_update");
    let pose = PoseMatrix::from_matrix(Matrix4::new_translation(&Vector3::new(1.0, 2.0, -30.0)));
    let corrupted = PoseMatrix::from_matrix(Matrix4::from_element(f32::NAN));

    for (name, pose) in [("valid", pose), ("non_finite", corrupted)] {
        group.bench_with_input(BenchmarkId::new("on_pose_result", name), &pose, |b, pose| {
            let mut session = configured_session(1280.0, 720.0);
            b.iter(|| black_box(session.on_pose_result(Some(black_box(*pose)))));
        });
    }

    group.finish();
}

fn benchmark_viewport(c: &mut Criterion) {
    let mut group = c.benchmark_group("viewport");

    group.bench_function("unchanged", |b| {
        let mut session = configured_session(1280.0, 720.0);
        b.iter(|| black_box(session.on_viewport_change(black_box(1280.0), black_box(720.0))));
    });

    group.bench_function("rotate", |b| {
        let mut session = configured_session(1280.0, 720.0);
        let mut portrait = false;
        b.iter(|| {
            portrait = !portrait;
            let (w, h) = if portrait { (720.0, 1280.0) } else { (1280.0, 720.0) };
            black_box(session.on_viewport_change(w, h))
        });
    });

    group.finish();
}

fn benchmark_render_ticks(c: &mut Criterion) {
    let mut group = c.benchmark_group("render");

    group.bench_function("tick", |b| {
        let mut session = configured_session(1920.0, 1080.0);
        session.on_pose_result(Some(PoseMatrix::from_matrix(Matrix4::new_translation(&Vector3::new(
            0.0, 0.0, -30.0,
        )))));
        let mut tick = 0u64;
        b.iter(|| {
            tick += 1;
            black_box(session.tick(tick))
        });
    });

    group.finish();
}

criterion_group!(benches, benchmark_pose_updates, benchmark_viewport, benchmark_render_ticks);
criterion_main!(benches);
