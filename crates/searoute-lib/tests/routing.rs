mod common;

use common::{fixture_graph, off_antimeridian, pos, NEW_YORK, PORT_SAID};
use searoute_lib::{
    compose_route, find_path, great_circle_km, plan_route, segment, Error, GeometryKind,
    LegRouting, NavigableLines, RouteAlgorithm, RouteOptions, RouteRequest, RoutingGraph,
};

#[test]
fn new_york_to_port_said_is_a_single_line() {
    let graph = fixture_graph();
    let route = compose_route(&graph, &[NEW_YORK, PORT_SAID]).expect("route composes");

    assert!(route.is_fully_routed());
    assert!(
        route.distance_km > 8_000.0 && route.distance_km < 12_000.0,
        "unexpected distance {}",
        route.distance_km
    );
    assert_eq!(route.coordinates.first(), Some(&NEW_YORK));
    assert_eq!(route.coordinates.last(), Some(&PORT_SAID));

    let geometry = segment(&route);
    assert_eq!(geometry.kind(), GeometryKind::LineString);
    assert_eq!(geometry.coordinates(), route.coordinates);
}

#[test]
fn dateline_straddle_renders_as_two_segments() {
    let graph = fixture_graph();
    let route = compose_route(&graph, &[pos(179.5, 10.0), pos(-179.5, 10.0)])
        .expect("route composes");

    assert!(route.is_fully_routed());
    assert!(route.distance_km < 150.0);

    let geometry = segment(&route);
    assert_eq!(geometry.kind(), GeometryKind::MultiLineString);
    assert_eq!(geometry.segment_count(), 2);
    assert_eq!(
        off_antimeridian(&geometry.coordinates()),
        off_antimeridian(&route.coordinates)
    );
}

#[test]
fn dateline_fallback_leg_keeps_its_geometry() {
    let graph = RoutingGraph::from_lines(&NavigableLines::new(vec![vec![
        pos(-10.0, 40.0),
        pos(-5.0, 40.0),
    ]]));
    let route = compose_route(&graph, &[pos(179.5, 10.0), pos(-179.5, 10.0)])
        .expect("fallback route composes");

    assert_eq!(route.fallback_count(), 1);
    assert_eq!(route.coordinates, vec![pos(179.5, 10.0), pos(-179.5, 10.0)]);

    let geometry = segment(&route);
    assert_eq!(geometry.kind(), GeometryKind::MultiLineString);
    assert_eq!(
        geometry.into_segments(),
        vec![
            vec![pos(179.5, 10.0), pos(180.0, 10.0)],
            vec![pos(-180.0, 10.0), pos(-179.5, 10.0)],
        ]
    );
}

#[test]
fn single_waypoint_has_no_partial_output() {
    let graph = fixture_graph();
    let error = compose_route(&graph, &[NEW_YORK]).expect_err("one waypoint is rejected");
    assert!(matches!(error, Error::InsufficientWaypoints { count: 1 }));
}

#[test]
fn unreachable_pair_falls_back_with_flag() {
    let graph = fixture_graph();
    let isolated = pos(100.5, -40.0);
    let route = compose_route(&graph, &[NEW_YORK, isolated]).expect("route still composes");

    assert_eq!(route.leg_count(), 1);
    assert_eq!(route.fallback_count(), 1);
    assert!(matches!(
        route.legs[0].routing,
        LegRouting::Fallback { .. }
    ));
    assert_eq!(route.coordinates, vec![NEW_YORK, isolated]);
    assert!((route.distance_km - great_circle_km(NEW_YORK, isolated)).abs() < 1e-9);
}

#[test]
fn waypoint_beyond_tolerance_falls_back_only_for_its_legs() {
    let graph = fixture_graph();
    let southern_ocean = pos(-150.0, -60.0);
    let route = compose_route(&graph, &[NEW_YORK, PORT_SAID, southern_ocean])
        .expect("route composes");

    assert_eq!(route.leg_count(), 2);
    assert!(!route.legs[0].is_fallback());
    assert!(route.legs[1].is_fallback());
}

#[test]
fn shared_waypoint_is_not_duplicated() {
    let graph = fixture_graph();
    let gibraltar = pos(-5.6, 35.9);
    let route = compose_route(&graph, &[NEW_YORK, gibraltar, PORT_SAID]).expect("route composes");

    let occurrences = route
        .coordinates
        .iter()
        .filter(|&&point| point == gibraltar)
        .count();
    assert_eq!(occurrences, 1);
    assert!(route.coordinates.windows(2).all(|pair| pair[0] != pair[1]));
}

#[test]
fn adapter_returns_origin_side_first() {
    let graph = fixture_graph();
    let segment = find_path(&graph, NEW_YORK, PORT_SAID, 250.0).expect("path exists");

    let first = segment.first().expect("non-empty path");
    let last = segment.last().expect("non-empty path");
    assert!(great_circle_km(NEW_YORK, first) < great_circle_km(NEW_YORK, last));
    assert!(great_circle_km(PORT_SAID, last) < great_circle_km(PORT_SAID, first));
}

#[test]
fn direct_edge_distance_equals_edge_length() {
    let graph = fixture_graph();
    let from = pos(-74.0, 40.4);
    let to = pos(-72.0, 40.0);
    let route = compose_route(&graph, &[from, to]).expect("route composes");

    assert!((route.distance_km - great_circle_km(from, to)).abs() < 1e-6);
    assert_eq!(route.coordinates, vec![from, to]);
}

#[test]
fn dijkstra_and_a_star_agree() {
    let graph = fixture_graph();
    let request = |algorithm| {
        RouteRequest::new(vec![NEW_YORK, PORT_SAID]).with_options(RouteOptions {
            algorithm,
            ..RouteOptions::default()
        })
    };

    let dijkstra = plan_route(&graph, &request(RouteAlgorithm::Dijkstra)).expect("dijkstra");
    let a_star = plan_route(&graph, &request(RouteAlgorithm::AStar)).expect("a-star");

    assert!((dijkstra.distance_km - a_star.distance_km).abs() < 1e-6);
    assert_eq!(dijkstra.coordinates, a_star.coordinates);
    assert_eq!(dijkstra.algorithm, RouteAlgorithm::Dijkstra);
}

#[test]
fn empty_graph_cannot_route_without_fallback() {
    let graph = RoutingGraph::from_edges(&[]);
    let request = RouteRequest::new(vec![NEW_YORK, PORT_SAID]).with_options(RouteOptions {
        allow_fallback: false,
        ..RouteOptions::default()
    });

    let error = plan_route(&graph, &request).expect_err("no vertices to snap to");
    assert!(matches!(error, Error::PathNotFound { .. }));
}
