//! Splitting stitched routes into antimeridian-safe line segments.

use std::fmt;

use serde::Serialize;

use crate::coords::Position;
use crate::routing::StitchedRoute;

/// Geometry type a route renders as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GeometryKind {
    LineString,
    MultiLineString,
}

impl fmt::Display for GeometryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = match self {
            GeometryKind::LineString => "LineString",
            GeometryKind::MultiLineString => "MultiLineString",
        };
        f.write_str(value)
    }
}

/// Route coordinates cut into segments that never cross the antimeridian.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteGeometry {
    segments: Vec<Vec<Position>>,
}

impl RouteGeometry {
    /// Segment an ordered coordinate sequence.
    pub fn from_coordinates(coordinates: &[Position]) -> Self {
        Self {
            segments: split_at_antimeridian(coordinates),
        }
    }

    /// A single segment is a `LineString`; anything else is a `MultiLineString`.
    pub fn kind(&self) -> GeometryKind {
        if self.segments.len() == 1 {
            GeometryKind::LineString
        } else {
            GeometryKind::MultiLineString
        }
    }

    pub fn segments(&self) -> &[Vec<Position>] {
        &self.segments
    }

    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    /// All segment points in order, including the points added on the meridian
    /// at each cut.
    pub fn coordinates(&self) -> Vec<Position> {
        self.segments.iter().flatten().copied().collect()
    }

    pub fn into_segments(self) -> Vec<Vec<Position>> {
        self.segments
    }
}

/// Whether the step from `from` to `to` jumps across the antimeridian.
///
/// A jump of more than 180° always crosses. A jump of exactly 180° crosses
/// only when one end lies on the antimeridian itself, such as 180 followed by 0.
pub fn crosses_antimeridian(from: Position, to: Position) -> bool {
    let jump = (to.longitude - from.longitude).abs();
    if jump > 180.0 {
        return true;
    }
    jump == 180.0 && (on_antimeridian(from) || on_antimeridian(to))
}

fn on_antimeridian(position: Position) -> bool {
    position.longitude.abs() == 180.0
}

/// Latitude at which the step from `from` to `to` meets the antimeridian,
/// and the sign (`1.0` or `-1.0`) of the meridian on the `from` side.
fn antimeridian_cut(from: Position, to: Position) -> (f64, f64) {
    let (side, unwrapped) = if from.longitude > to.longitude {
        (1.0, to.longitude + 360.0)
    } else {
        (-1.0, to.longitude - 360.0)
    };
    let span = unwrapped - from.longitude;
    let t = if span == 0.0 {
        0.0
    } else {
        ((side * 180.0 - from.longitude) / span).clamp(0.0, 1.0)
    };
    (from.latitude + t * (to.latitude - from.latitude), side)
}

/// Cut `points` wherever consecutive positions cross the antimeridian.
///
/// Each cut closes the current segment on the meridian and opens the next
/// segment on the opposite side of it, at the latitude where the step meets
/// 180°. Segments left with fewer than two points (a lone point sitting on the
/// meridian, whose twin opens or closes the neighbouring segment) are dropped.
pub fn split_at_antimeridian(points: &[Position]) -> Vec<Vec<Position>> {
    let mut segments = Vec::new();
    let mut current: Vec<Position> = Vec::new();

    for &point in points {
        if let Some(&previous) = current.last() {
            if crosses_antimeridian(previous, point) {
                let (latitude, side) = antimeridian_cut(previous, point);
                let closing = Position::new(side * 180.0, latitude);
                let opening = Position::new(-side * 180.0, latitude);

                if previous != closing {
                    current.push(closing);
                }
                segments.push(std::mem::take(&mut current));
                if point != opening {
                    current.push(opening);
                }
            }
        }
        current.push(point);
    }
    segments.push(current);

    segments.retain(|segment| segment.len() >= 2);
    segments
}

/// Produce the renderable geometry of a stitched route.
pub fn segment(route: &StitchedRoute) -> RouteGeometry {
    RouteGeometry::from_coordinates(&route.coordinates)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::pos;

    #[test]
    fn route_without_crossing_is_one_line() {
        let points = vec![pos(0.0, 0.0), pos(10.0, 5.0), pos(20.0, 5.0)];
        let geometry = RouteGeometry::from_coordinates(&points);

        assert_eq!(geometry.kind(), GeometryKind::LineString);
        assert_eq!(geometry.segments(), &[points.clone()]);
        assert_eq!(geometry.coordinates(), points);
    }

    #[test]
    fn crossing_splits_into_two_segments() {
        let points = vec![
            pos(179.0, 10.0),
            pos(179.9, 10.0),
            pos(-179.9, 10.0),
            pos(-179.0, 10.0),
        ];
        let geometry = RouteGeometry::from_coordinates(&points);

        assert_eq!(geometry.kind(), GeometryKind::MultiLineString);
        assert_eq!(
            geometry.segments(),
            &[
                vec![pos(179.0, 10.0), pos(179.9, 10.0), pos(180.0, 10.0)],
                vec![pos(-180.0, 10.0), pos(-179.9, 10.0), pos(-179.0, 10.0)],
            ]
        );
    }

    #[test]
    fn cut_latitude_is_interpolated() {
        let segments = split_at_antimeridian(&[pos(179.0, 0.0), pos(-179.0, 2.0)]);
        assert_eq!(
            segments,
            vec![
                vec![pos(179.0, 0.0), pos(180.0, 1.0)],
                vec![pos(-180.0, 1.0), pos(-179.0, 2.0)],
            ]
        );
    }

    #[test]
    fn westward_crossing_closes_on_negative_meridian() {
        let segments = split_at_antimeridian(&[pos(-179.5, 0.0), pos(179.5, 0.0)]);
        assert_eq!(
            segments,
            vec![
                vec![pos(-179.5, 0.0), pos(-180.0, 0.0)],
                vec![pos(180.0, 0.0), pos(179.5, 0.0)],
            ]
        );
    }

    #[test]
    fn exact_dateline_transition_splits() {
        let points = vec![
            pos(179.0, 0.0),
            pos(180.0, 0.0),
            pos(-180.0, 0.0),
            pos(-179.0, 0.0),
        ];
        let segments = split_at_antimeridian(&points);
        assert_eq!(
            segments,
            vec![
                vec![pos(179.0, 0.0), pos(180.0, 0.0)],
                vec![pos(-180.0, 0.0), pos(-179.0, 0.0)],
            ]
        );
    }

    #[test]
    fn two_point_crossing_keeps_both_ends() {
        let points = vec![pos(179.5, 10.0), pos(-179.5, 10.0)];
        let geometry = RouteGeometry::from_coordinates(&points);

        assert_eq!(geometry.kind(), GeometryKind::MultiLineString);
        assert_eq!(geometry.segment_count(), 2);
        assert_eq!(geometry.segments()[0][0], points[0]);
        assert_eq!(geometry.segments()[1][1], points[1]);
    }

    #[test]
    fn origin_next_to_seam_vertex_is_kept() {
        let points = vec![pos(-179.99, 5.0), pos(180.0, 5.0), pos(179.0, 5.0)];
        let segments = split_at_antimeridian(&points);
        assert_eq!(
            segments,
            vec![
                vec![pos(-179.99, 5.0), pos(-180.0, 5.0)],
                vec![pos(180.0, 5.0), pos(179.0, 5.0)],
            ]
        );
    }

    #[test]
    fn lone_meridian_point_is_carried_by_its_twin() {
        let segments = split_at_antimeridian(&[pos(180.0, 3.0), pos(-179.0, 3.0)]);
        assert_eq!(segments, vec![vec![pos(-180.0, 3.0), pos(-179.0, 3.0)]]);
    }

    #[test]
    fn half_turn_away_from_dateline_is_not_a_crossing() {
        let points = vec![pos(-90.0, 0.0), pos(90.0, 0.0)];
        assert!(!crosses_antimeridian(points[0], points[1]));
        let geometry = RouteGeometry::from_coordinates(&points);
        assert_eq!(geometry.kind(), GeometryKind::LineString);
    }

    #[test]
    fn half_turn_onto_dateline_is_a_crossing() {
        assert!(crosses_antimeridian(pos(0.0, 0.0), pos(180.0, 0.0)));
        assert!(crosses_antimeridian(pos(-180.0, 0.0), pos(0.0, 0.0)));
    }

    #[test]
    fn multiple_crossings() {
        let points = vec![
            pos(179.0, 0.0),
            pos(-179.0, 0.0),
            pos(-179.0, 1.0),
            pos(179.0, 3.0),
            pos(178.0, 3.0),
        ];
        let geometry = RouteGeometry::from_coordinates(&points);
        assert_eq!(geometry.segment_count(), 3);
        assert_eq!(geometry.segments()[1][0], pos(-180.0, 0.0));
        assert_eq!(geometry.segments()[2][0], pos(180.0, 2.0));
    }

    #[test]
    fn empty_input_has_no_segments() {
        let geometry = RouteGeometry::from_coordinates(&[]);
        assert_eq!(geometry.segment_count(), 0);
        assert_eq!(geometry.kind(), GeometryKind::MultiLineString);
    }
}
