use fix2pose_core::common::msg::{
    EstimateStatus, Heading, NavSatFix, PoseStamped, Time, TransformStamped,
};
use fix2pose_core::geodesy::{
    ConstantGeoid, ConvertHeight, GeodeticProjector, Geodetic, HeightCorrection, HeightMode,
    MgrsProjector, PlaneProjector, Projection,
};
use fix2pose_core::output::{PoseSink, TransformBroadcaster};
use fix2pose_core::{Emitters, FusionConfig, FusionService};
use std::f64::consts::FRAC_PI_2;
use std::path::Path;
use std::sync::{Arc, Mutex};

#[derive(Clone, Default)]
struct Recorder {
    poses: Arc<Mutex<Vec<PoseStamped>>>,
    transforms: Arc<Mutex<Vec<TransformStamped>>>,
}

impl PoseSink for Recorder {
    fn publish(&self, pose: &PoseStamped) {
        self.poses.lock().unwrap().push(pose.clone());
    }
}

impl TransformBroadcaster for Recorder {
    fn send_transform(&self, transform: &TransformStamped) {
        self.transforms.lock().unwrap().push(transform.clone());
    }
}

impl Recorder {
    fn emitters(&self) -> Emitters {
        Emitters::new(Box::new(self.clone()), Box::new(self.clone()))
    }

    fn pose_count(&self) -> usize {
        self.poses.lock().unwrap().len()
    }

    fn transform_count(&self) -> usize {
        self.transforms.lock().unwrap().len()
    }
}

fn fix(sec: i32, lat: f64, lon: f64, alt: f64) -> NavSatFix {
    let mut fix = NavSatFix::default();
    fix.header.stamp = Time::new(sec, 0);
    fix.latitude = lat;
    fix.longitude = lon;
    fix.altitude = alt;
    fix
}

fn heading(angle: f64, valid: bool) -> Heading {
    Heading {
        heading_angle: angle,
        status: EstimateStatus {
            enabled_status: valid,
            estimate_status: valid,
        },
        ..Heading::default()
    }
}

fn plane_service(zone: i64, recorder: &Recorder) -> FusionService {
    FusionService::new(
        Box::new(PlaneProjector::new(zone).unwrap()),
        HeightCorrection::None,
        recorder.emitters(),
        "map",
        "gnss",
    )
}

#[test]
fn zone_nine_scenario() {
    let recorder = Recorder::default();
    let mut service = plane_service(9, &recorder);
    service.handle_heading(heading(0.0, true));

    let out = service.handle_fix(&fix(1, 35.0, 139.0, 10.0)).unwrap();

    let native = PlaneProjector::new(9)
        .unwrap()
        .project(&Geodetic::from_degrees(35.0, 139.0, 10.0))
        .unwrap();
    let position = out.pose.pose.position;
    assert!((position.x - native[1]).abs() < 1e-9);
    assert!((position.y - native[0]).abs() < 1e-9);
    assert_eq!(position.z, 10.0);
    assert!((out.pose.pose.orientation.yaw() - FRAC_PI_2).abs() < 1e-12);

    assert_eq!(recorder.pose_count(), 1);
    assert_eq!(recorder.transform_count(), 1);
}

#[test]
fn one_output_pair_per_fix() {
    let recorder = Recorder::default();
    let mut service = plane_service(9, &recorder);

    for sec in 0..5 {
        service.handle_heading(heading(0.1 * f64::from(sec), true));
        service.handle_fix(&fix(sec, 35.5, 139.5, 0.0)).unwrap();
    }

    let poses = recorder.poses.lock().unwrap();
    let transforms = recorder.transforms.lock().unwrap();
    assert_eq!(poses.len(), 5);
    assert_eq!(transforms.len(), 5);
    for (sec, (pose, tf)) in poses.iter().zip(transforms.iter()).enumerate() {
        assert_eq!(pose.header.stamp, Time::new(sec as i32, 0));
        assert_eq!(tf.header.stamp, pose.header.stamp);
        assert_eq!(tf.transform.translation, pose.pose.position);
        assert_eq!(tf.transform.rotation, pose.pose.orientation);
    }
}

#[test]
fn out_of_domain_fix_is_dropped_and_stream_continues() {
    let recorder = Recorder::default();
    let mut service = plane_service(11, &recorder);

    assert!(service.handle_fix(&fix(1, 89.0, 140.0, 0.0)).is_err());
    assert_eq!(recorder.pose_count(), 0);
    assert_eq!(recorder.transform_count(), 0);

    assert!(service.handle_fix(&fix(2, 43.0, 141.0, 0.0)).is_ok());
    assert_eq!(recorder.pose_count(), 1);

    let stats = service.stats();
    assert_eq!((stats.fixes, stats.emitted, stats.dropped), (2, 1, 1));
}

#[test]
fn heading_turning_invalid_falls_back() {
    let recorder = Recorder::default();
    let mut service = plane_service(9, &recorder);

    service.handle_heading(heading(1.0, true));
    let before = service.handle_fix(&fix(1, 36.0, 139.8, 0.0)).unwrap();
    assert!((before.pose.pose.orientation.yaw() - (FRAC_PI_2 - 1.0)).abs() < 1e-12);

    service.handle_heading(heading(1.0, false));
    let after = service.handle_fix(&fix(2, 36.0, 139.8, 0.0)).unwrap();
    assert!(after.pose.pose.orientation.yaw().abs() < 1e-12);
}

#[test]
fn non_finite_heading_angle_keeps_orientation_finite() {
    let recorder = Recorder::default();
    let mut service = plane_service(9, &recorder);

    service.handle_heading(heading(f64::NAN, true));
    let out = service.handle_fix(&fix(1, 36.0, 139.8, 0.0)).unwrap();
    let q = out.pose.pose.orientation;
    assert!([q.x, q.y, q.z, q.w].iter().all(|c| c.is_finite()));
    assert!(q.yaw().abs() < 1e-12);
    assert_eq!(out.transform.transform.rotation, q);
}

#[test]
fn orthometric_conversion_with_constant_geoid() {
    let recorder = Recorder::default();
    let height = HeightCorrection::new(
        HeightMode::EllipsoidToOrthometric,
        Some(Box::new(ConvertHeight::new(ConstantGeoid(36.7)))),
    )
    .unwrap();
    let mut service = FusionService::new(
        Box::new(MgrsProjector),
        height,
        recorder.emitters(),
        "map",
        "gnss",
    );

    let out = service.handle_fix(&fix(1, 35.0, 139.0, 46.7)).unwrap();
    assert!((out.pose.pose.position.z - 10.0).abs() < 1e-9);
    assert!((0.0..100_000.0).contains(&out.pose.pose.position.x));
    assert!((0.0..100_000.0).contains(&out.pose.pose.position.y));
}

#[test]
fn shipped_parameter_file_is_valid() {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("config/fix2pose.param.yaml");
    let config = FusionConfig::from_file(&path).unwrap();
    assert_eq!(config.projection, Projection::Plane { zone: 7 });
    assert_eq!(config.height_mode, HeightMode::None);

    let recorder = Recorder::default();
    let mut service = FusionService::from_config(&config, recorder.emitters()).unwrap();
    let out = service.handle_fix(&fix(1, 36.0, 137.0 + 10.0 / 60.0, 3.0)).unwrap();
    assert!(out.pose.pose.position.x.abs() < 1e-6);
    assert!(out.pose.pose.position.y.abs() < 1e-6);
    assert_eq!(out.transform.header.frame_id, "map");
    assert_eq!(out.transform.child_frame_id, "gnss");
}

#[test]
fn configured_frame_ids_reach_the_transform() {
    let yaml = "tf_num: 2\nparent_frame_id: world\nchild_frame_id: antenna\n";
    let config = FusionConfig::from_yaml_str(yaml).unwrap();
    let recorder = Recorder::default();
    let mut service = FusionService::from_config(&config, recorder.emitters()).unwrap();

    let out = service.handle_fix(&fix(1, 48.0, 11.0, 500.0)).unwrap();
    assert_eq!(out.pose.header.frame_id, "map");
    assert_eq!(out.transform.header.frame_id, "world");
    assert_eq!(out.transform.child_frame_id, "antenna");
}
