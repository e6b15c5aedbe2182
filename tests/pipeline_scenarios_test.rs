//! End-to-end scenarios through the anchor session


use head_pose_anchor::{
    anchor::TransformMode,
    camera::{Orientation, ViewportUpdate},
    config::Config,
    detection::DetectionStep,
    normalizer::{PoseComponents, PoseNormalizer},
    pose::PoseMatrix,
    render::{LoopState, TickOutcome},
    session::{AnchorSession, PoseUpdate},
    transform::SpaceTransformer,
};
use nalgebra::{Isometry3, Matrix4, UnitQuaternion, Vector3};
use test_helpers::{frame, pose, with_component, RecordingSurface, ScriptedDetector};

fn session() -> (AnchorSession<RecordingSurface>, RecordingSurface) {
    let surface = RecordingSurface::default();
    (AnchorSession::new(Config::default(), surface.clone()), surface)
}

#[test]
fn test_landscape_then_portrait_viewport() {
    let (mut session, surface) = session();

    assert_eq!(session.on_viewport_change(1920.0, 1080.0), ViewportUpdate::Configured);
    let camera = *session.camera().unwrap();
    assert!((camera.aspect - 1.7778).abs() < 1e-4);
    assert_eq!(camera.fov_deg, 50.0);

    assert_eq!(session.on_viewport_change(480.0, 640.0), ViewportUpdate::Reconfigured);
    let camera = *session.camera().unwrap();
    assert!((camera.aspect - 0.75).abs() < 1e-6);
    assert_eq!(camera.fov_deg, 65.0);

    assert_eq!(surface.log.borrow().sizes, vec![(1920, 1080), (480, 640)]);
}

#[test]
fn test_fov_follows_orientation_crossings() {
    let (mut session, _surface) = session();
    let sizes = [(1280.0, 720.0), (720.0, 1280.0), (1000.0, 1000.0), (999.0, 1000.0), (1600.0, 900.0)];

    let mut previous: Option<(Orientation, f32)> = None;
    for (w, h) in sizes {
        session.on_viewport_change(w, h);
        let camera = session.camera().unwrap();
        assert!((camera.aspect - (w / h) as f32).abs() < 1e-6);

        if let Some((orientation, fov)) = previous {
            match (orientation, camera.orientation()) {
                (Orientation::Landscape, Orientation::Portrait) => assert!(camera.fov_deg > fov),
                (Orientation::Portrait, Orientation::Landscape) => assert!(camera.fov_deg < fov),
                _ => assert_eq!(camera.fov_deg, fov),
            }
        }
        previous = Some((camera.orientation(), camera.fov_deg));
    }
}

#[test]
fn test_anisotropic_scale_normalized_in_world() {
    let (mut session, _surface) = session();
    session.on_viewport_change(1920.0, 1080.0);

    let raw = pose([0.0, 0.0, 0.0], [0.0, 0.0, 0.0], [1.0, 1.2, 0.8]);
    assert_eq!(session.on_pose_result(Some(raw)), PoseUpdate::Applied);

    // Camera at z = 5 with identity rotation only adds a translation
    let world = session.anchor().world_matrix();
    let expected = Isometry3::translation(0.0, 0.0, 5.0).to_homogeneous();
    assert!((world - expected).amax() < 1e-6);
}

#[test]
fn test_nan_frame_keeps_previous_anchor() {
    let (mut session, _surface) = session();
    session.on_viewport_change(1280.0, 720.0);

    let first = pose([1.0, 2.0, -30.0], [0.1, 0.2, 0.0], [1.0, 1.0, 1.0]);
    let third = pose([-1.0, 0.0, -25.0], [0.0, -0.2, 0.1], [1.1, 1.0, 0.9]);

    for index in 0..16 {
        let (mut session, _surface) = self::session();
        session.on_viewport_change(1280.0, 720.0);

        assert_eq!(session.on_pose_result(Some(first)), PoseUpdate::Applied);
        let after_first = session.anchor().world_matrix();

        let second = with_component(&third, index, f32::NAN);
        assert_eq!(session.on_pose_result(Some(second)), PoseUpdate::Rejected);
        assert_eq!(session.anchor().world_matrix(), after_first, "component {index}");

        assert_eq!(session.on_pose_result(Some(third)), PoseUpdate::Applied);
        assert_ne!(session.anchor().world_matrix(), after_first);
    }

    // Infinity behaves the same
    session.on_pose_result(Some(first));
    let before = session.anchor().world_matrix();
    session.on_pose_result(Some(with_component(&first, 14, f32::INFINITY)));
    assert_eq!(session.anchor().world_matrix(), before);
}

#[test]
fn test_anchor_equals_camera_times_normalized_pose() {
    let (mut session, _surface) = session();
    session.on_viewport_change(640.0, 480.0);

    let raw = pose([3.0, -2.0, -40.0], [0.3, -0.4, 0.2], [0.9, 1.3, 1.1]);
    session.on_pose_result(Some(raw));

    let camera = session.camera().unwrap();
    let normalized = PoseNormalizer::new().normalize(&raw);
    let expected = camera.world_matrix() * normalized.as_matrix();
    let reversed = normalized.as_matrix() * camera.world_matrix();

    let world = session.anchor().world_matrix();
    assert!((world - expected).amax() < 1e-5);
    assert!((world - reversed).amax() > 1e-2);
}

#[test]
fn test_compose_order_with_non_commuting_pair() {
    let camera = UnitQuaternion::from_axis_angle(&Vector3::z_axis(), std::f32::consts::FRAC_PI_2).to_homogeneous();
    let pose = PoseMatrix::from_matrix(Matrix4::new_translation(&Vector3::new(2.0, 0.0, 0.0)));

    let world = SpaceTransformer::new().compose(&camera, &pose);
    // +X rotated 90° about Z lands on +Y
    assert!((world[(0, 3)]).abs() < 1e-6);
    assert!((world[(1, 3)] - 2.0).abs() < 1e-6);

    let identity = SpaceTransformer::new().compose(&Matrix4::identity(), &pose);
    assert_eq!(identity, *pose.as_matrix());
}

#[test]
fn test_full_frame_cycle_with_detector() {
    let (mut session, surface) = session();
    let detector = ScriptedDetector::default();
    session.install_detector(Box::new(detector.clone()));
    session.start();

    // Mode switch on the first frame, detection from the second
    let outcome = session.process_video_frame(&frame(1280.0, 720.0, 0.0), 0.0);
    assert_eq!(outcome.viewport, ViewportUpdate::Configured);
    assert_eq!(outcome.detection, DetectionStep::ModeSwitched);
    assert_eq!(session.render_state(), LoopState::Active);

    let tracked = pose([0.0, 1.0, -35.0], [0.0, 0.1, 0.0], [1.0, 1.0, 1.0]);
    detector.push_pose(&tracked);
    let outcome = session.process_video_frame(&frame(1280.0, 720.0, 0.033), 33.0);
    assert_eq!(outcome.viewport, ViewportUpdate::Unchanged);
    assert_eq!(outcome.pose, Some(PoseUpdate::Applied));

    assert_eq!(session.tick(1), TickOutcome::Drawn);
    let log = surface.log.borrow();
    let drawn = log.frames.last().unwrap();
    assert_eq!(drawn.anchor_world, session.anchor().world_matrix());
    assert!(drawn.visible);
    assert!(drawn.asset_world.is_none());
}

#[test]
fn test_render_continues_without_new_poses() {
    let (mut session, surface) = session();
    session.on_viewport_change(1280.0, 720.0);
    session.on_pose_result(Some(pose([0.0, 0.0, -30.0], [0.0, 0.0, 0.0], [1.0, 1.0, 1.0])));

    for tick in 1..=10 {
        assert_eq!(session.tick(tick), TickOutcome::Drawn);
    }

    let log = surface.log.borrow();
    assert_eq!(log.frames.len(), 10);
    assert!(log.frames.windows(2).all(|w| w[0].anchor_world == w[1].anchor_world));
}

#[test]
fn test_stop_keeps_rendering_last_anchor() {
    let (mut session, surface) = session();
    let detector = ScriptedDetector::default();
    session.install_detector(Box::new(detector.clone()));
    session.start();
    session.process_video_frame(&frame(640.0, 480.0, 0.0), 0.0);

    detector.push_pose(&pose([0.0, 0.0, -20.0], [0.0, 0.0, 0.0], [1.0, 1.0, 1.0]));
    session.process_video_frame(&frame(640.0, 480.0, 0.1), 100.0);
    let tracked = session.anchor().world_matrix();

    session.stop();
    detector.push_pose(&pose([5.0, 5.0, -20.0], [0.0, 0.0, 0.0], [1.0, 1.0, 1.0]));
    let outcome = session.process_video_frame(&frame(640.0, 480.0, 0.2), 200.0);
    assert_eq!(outcome.detection, DetectionStep::Stopped);

    assert_eq!(session.tick(1), TickOutcome::Drawn);
    assert_eq!(surface.log.borrow().frames[0].anchor_world, tracked);
    assert_eq!(detector.calls.borrow().len(), 1);
}

#[test]
fn test_visibility_toggle_is_independent_of_pose() {
    let (mut session, surface) = session();
    session.on_viewport_change(640.0, 480.0);
    let tracked = pose([0.0, 0.0, -20.0], [0.0, 0.0, 0.0], [1.0, 1.0, 1.0]);
    session.on_pose_result(Some(tracked));
    let world = session.anchor().world_matrix();

    session.set_visible(false);
    session.tick(1);
    session.on_pose_result(Some(tracked));
    session.set_visible(true);
    session.tick(2);

    let log = surface.log.borrow();
    assert!(!log.frames[0].visible);
    assert!(log.frames[1].visible);
    assert_eq!(log.frames[0].anchor_world, world);
    assert_eq!(log.frames[1].anchor_world, world);
}

#[test]
fn test_rest_placement_before_tracking_and_after_teardown() {
    let (mut session, surface) = session();
    let rest = PoseComponents {
        translation: Vector3::new(0.0, 0.0, -15.0),
        rotation: UnitQuaternion::identity(),
        scale: Vector3::repeat(1.0),
    };
    session.set_anchor_local(rest);
    session.on_viewport_change(1280.0, 720.0);

    session.tick(1);
    assert_eq!(surface.log.borrow().frames[0].anchor_world, rest.to_matrix());

    session.on_pose_result(Some(pose([3.0, 0.0, -30.0], [0.0, 0.0, 0.0], [1.0, 1.0, 1.0])));
    assert_eq!(session.anchor().mode(), TransformMode::External);
    assert_ne!(session.anchor().world_matrix(), rest.to_matrix());

    session.teardown();
    assert_eq!(session.anchor().mode(), TransformMode::Auto);
    assert_eq!(session.anchor().world_matrix(), rest.to_matrix());
}
