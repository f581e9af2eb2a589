//! End-to-end checks against the total solar eclipse of 2024 April 8

use approx::assert_relative_eq;
use eclipse_path::outline::shadow_outline_point;
use eclipse_path::polynomial::Polynomial;
use eclipse_path::{
    compute_global_eclipse_features, compute_global_eclipse_features_with_config,
    compute_local_eclipse_features, compute_local_eclipse_features_with_config, geojson,
    observer_to_fundamental_plane_coordinates, BesselianTable, EclipseError, ShadowType, SolverConfig,
};
use std::path::PathBuf;

fn table_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data/2024-04-08.json")
}

fn load_table() -> BesselianTable {
    BesselianTable::from_file(table_path()).unwrap()
}

fn assert_closed(ring: &[[f64; 2]]) {
    let first = ring[0];
    let last = ring[ring.len() - 1];
    assert_relative_eq!(first[0], last[0], epsilon = 1e-9);
    assert_relative_eq!(first[1], last[1], epsilon = 1e-9);
}

#[test]
fn test_umbra_outline_at_mid_eclipse() {
    let table = load_table();
    let features = compute_local_eclipse_features(&table, 18.0);

    assert!(features.umbra_outline.len() >= 30);
    for [long, lat] in &features.umbra_outline {
        assert!((-180.0..=180.0).contains(long));
        assert!((-90.0..=90.0).contains(lat));
    }
    assert_closed(&features.umbra_outline);
    assert_closed(&features.penumbra_outline);
}

#[test]
fn test_umbra_visible_throughout_central_eclipse() {
    let table = load_table();

    for i in 0..=10 {
        let t = 17.0 + i as f64 * 0.25;
        let features = compute_local_eclipse_features(&table, t);
        assert!(
            features.umbra_outline.len() > 100,
            "only {} umbra vertices at t = {}",
            features.umbra_outline.len(),
            t
        );
        assert!(!features.penumbra_outline.is_empty());
        assert_closed(&features.umbra_outline);
        assert_closed(&features.penumbra_outline);
    }
}

#[test]
fn test_shadow_absent_before_first_contact() {
    let table = load_table();
    let features = compute_local_eclipse_features(&table, 15.0);
    assert!(features.umbra_outline.is_empty());
}

#[test]
fn test_query_functions_are_idempotent() {
    let table = load_table();

    assert_eq!(
        compute_local_eclipse_features(&table, 18.3),
        compute_local_eclipse_features(&table, 18.3)
    );
    assert_eq!(
        compute_global_eclipse_features(&table),
        compute_global_eclipse_features(&table)
    );

    let elements = table.elements_at(18.3);
    assert_eq!(
        observer_to_fundamental_plane_coordinates(&elements, 32.0, -97.0, 150.0),
        observer_to_fundamental_plane_coordinates(&elements, 32.0, -97.0, 150.0)
    );
}

#[test]
fn test_path_of_totality() {
    let table = load_table();
    let features = compute_global_eclipse_features(&table);

    assert!(features.begin_time < features.end_time);
    assert!(table.contains_time(features.begin_time));
    assert!(table.contains_time(features.end_time));
    assert_relative_eq!(features.begin_time, 16.686, epsilon = 1e-2);
    assert_relative_eq!(features.end_time, 19.927, epsilon = 1e-2);

    assert_eq!(features.umbra_limit_north.unresolved, 0);
    assert_eq!(features.umbra_limit_south.unresolved, 0);

    // The north limit runs north of the south limit at every sampled longitude
    for (n, s) in features
        .umbra_limit_north
        .points
        .iter()
        .zip(&features.umbra_limit_south.points)
    {
        assert_eq!(n.lon, s.lon);
        assert!(n.lat > s.lat);
        assert!(table.contains_time(n.t));
    }

    // Dallas lies inside the path
    let bounds = features.bounds.unwrap();
    assert!(bounds.limits[0][0] < -96.8 && bounds.limits[1][0] > -96.8);
    assert!(bounds.limits[0][1] < 32.8 && bounds.limits[1][1] > 32.8);
}

#[test]
fn test_observer_on_center_line_sees_totality() {
    let table = load_table();
    let features = compute_global_eclipse_features(&table);

    let n = &features.umbra_limit_north.points[100];
    let s = &features.umbra_limit_south.points[100];
    let lat = (n.lat + s.lat) / 2.0;
    let t = (n.t + s.t) / 2.0;

    let elements = table.elements_at(t);
    let observer = observer_to_fundamental_plane_coordinates(&elements, lat, n.lon, 0.0);
    let umbra_radius = elements.l2 - observer.z * elements.tan_f2;
    assert!(observer.distance_from_axis(&elements) < umbra_radius.abs());
}

#[test]
fn test_axis_sub_point_round_trip() {
    let table = load_table();
    let mut elements = table.elements_at(17.5);
    elements.l2 = 0.0;
    elements.tan_f2 = 0.0;

    let sub_point = shadow_outline_point(&elements, 0.0, ShadowType::Umbra, 3);
    let observer =
        observer_to_fundamental_plane_coordinates(&elements, sub_point.lat, sub_point.long, 0.0);
    assert_relative_eq!(observer.x, elements.x, epsilon = 1e-9);
    assert_relative_eq!(observer.y, elements.y, epsilon = 1e-9);
}

#[test]
fn test_stationary_shadow_is_handled() {
    let table = BesselianTable {
        date: "2000-01-01".to_string(),
        x: Polynomial::new(vec![0.1]),
        y: Polynomial::new(vec![0.2]),
        d: Polynomial::new(vec![10.0]),
        mu: Polynomial::new(vec![0.0]),
        l1: Polynomial::new(vec![0.54]),
        l2: Polynomial::new(vec![-0.01]),
        tan_f1: 0.0046,
        tan_f2: 0.0046,
        t0: 12.0,
        t_range: [9.0, 15.0],
        delta_t: 64.0,
    };
    table.validate().unwrap();

    let features = compute_global_eclipse_features(&table);
    assert!(features.begin_time.is_nan());
    assert!(features.umbra_limit_north.is_empty());
    assert!(features.umbra_limit_south.is_empty());
    assert!(features.bounds.is_none());

    // The instantaneous shadow is still well defined
    let local = compute_local_eclipse_features(&table, 12.0);
    assert!(!local.umbra_outline.is_empty());
}

#[test]
fn test_configured_longitude_step() {
    let table = load_table();
    let config = SolverConfig::from_json_str(r#"{ "path": { "longitude_step_deg": 1.0 } }"#).unwrap();

    let features = compute_global_eclipse_features_with_config(&table, &config);
    assert_eq!(features.umbra_limit_north.len(), 139);
}

#[test]
fn test_zero_steps_terminate_with_empty_results() {
    let table = load_table();
    let mut config = SolverConfig::default();
    config.path.longitude_step_deg = 0.0;
    config.outline.angle_step_deg = 0.0;
    assert!(config.validate().is_err());

    let global = compute_global_eclipse_features_with_config(&table, &config);
    assert!(global.umbra_limit_north.is_empty());
    assert!(global.umbra_limit_south.is_empty());
    assert!(global.bounds.is_none());
    assert_relative_eq!(global.begin_time, 16.686, epsilon = 1e-2);

    let local = compute_local_eclipse_features_with_config(&table, 18.0, &config);
    assert!(local.umbra_outline.is_empty());
    assert!(local.penumbra_outline.is_empty());
}

#[test]
fn test_global_geojson() {
    let table = load_table();
    let features = compute_global_eclipse_features(&table);
    let collection = geojson::global_features(&features);

    let items = collection["features"].as_array().unwrap();
    assert_eq!(items.len(), 3);
    assert_eq!(items[0]["geometry"]["type"], "LineString");
    assert_eq!(items[1]["geometry"]["type"], "LineString");
    assert_eq!(items[2]["geometry"]["type"], "Point");
    assert_eq!(
        items[0]["geometry"]["coordinates"].as_array().unwrap().len(),
        features.umbra_limit_north.len()
    );
}

#[test]
fn test_malformed_table_rejected() {
    let result = BesselianTable::from_json_str(r#"{ "x": [] }"#);
    assert!(matches!(result, Err(EclipseError::Json(_))));

    let json = std::fs::read_to_string(table_path())
        .unwrap()
        .replace("\"t0\": 18", "\"t0\": 22");
    let result = BesselianTable::from_json_str(&json);
    assert!(matches!(result, Err(EclipseError::InvalidTable(_))));
}
