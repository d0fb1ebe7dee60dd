use std::fmt::Write;

use serde::Serialize;

use crate::coords::Position;
use crate::error::{Error, Result};
use crate::geometry::{segment, GeometryKind, RouteGeometry};
use crate::routing::{LegRouting, RouteLeg, StitchedRoute};
use crate::RouteAlgorithm;

/// Name given to single-pair passage collections.
pub const PASSAGE_COLLECTION_NAME: &str = "Short Sea Route";

/// Route name used when a request carries none.
pub const DEFAULT_ROUTE_NAME: &str = "Sea Route";

/// GeoJSON geometry object for route lines.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "type")]
pub enum GeoJsonGeometry {
    LineString { coordinates: Vec<Position> },
    MultiLineString { coordinates: Vec<Vec<Position>> },
}

impl GeoJsonGeometry {
    pub fn kind(&self) -> GeometryKind {
        match self {
            GeoJsonGeometry::LineString { .. } => GeometryKind::LineString,
            GeoJsonGeometry::MultiLineString { .. } => GeometryKind::MultiLineString,
        }
    }
}

impl From<RouteGeometry> for GeoJsonGeometry {
    fn from(geometry: RouteGeometry) -> Self {
        match geometry.kind() {
            GeometryKind::LineString => GeoJsonGeometry::LineString {
                coordinates: geometry.into_segments().into_iter().flatten().collect(),
            },
            GeometryKind::MultiLineString => GeoJsonGeometry::MultiLineString {
                coordinates: geometry.into_segments(),
            },
        }
    }
}

/// Properties of a [`RouteFeature`].
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RouteProperties {
    pub route_name: String,
    pub algorithm: RouteAlgorithm,
    pub distance_km: f64,
    pub legs: usize,
    pub segments: usize,
    pub fallback_legs: usize,
    pub leg_details: Vec<RouteLeg>,
}

/// GeoJSON `Feature` carrying a whole route.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RouteFeature {
    #[serde(rename = "type")]
    pub feature_type: &'static str,
    pub geometry: GeoJsonGeometry,
    pub properties: RouteProperties,
}

impl RouteFeature {
    /// Build the feature, segmenting the route at the antimeridian.
    pub fn from_route(route: &StitchedRoute) -> Self {
        let geometry = segment(route);
        let segments = geometry.segment_count();
        Self {
            feature_type: "Feature",
            geometry: geometry.into(),
            properties: RouteProperties {
                route_name: route_name(route),
                algorithm: route.algorithm,
                distance_km: route.distance_km,
                legs: route.leg_count(),
                segments,
                fallback_legs: route.fallback_count(),
                leg_details: route.legs.clone(),
            },
        }
    }
}

/// Properties attached to each feature of a [`PassageCollection`].
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PassageProperties {
    pub o_coords: Position,
    pub d_coords: Position,
    pub o_to_wp_dist: f64,
    pub wp_to_d_dist: f64,
    pub wp_dist: f64,
    pub total_dist: f64,
    pub route_name: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PassageFeature {
    #[serde(rename = "type")]
    pub feature_type: &'static str,
    pub geometry: GeoJsonGeometry,
    pub properties: PassageProperties,
    pub id: String,
}

/// Single-pair route as a FeatureCollection of the origin access leg, the
/// graph route and the destination access leg.
///
/// Fallback legs have no graph route and produce just the `main_route`
/// feature, drawn as the direct line between the two waypoints.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PassageCollection {
    #[serde(rename = "type")]
    pub collection_type: &'static str,
    pub name: &'static str,
    pub features: Vec<PassageFeature>,
}

impl PassageCollection {
    /// Build the collection for a route with exactly one leg.
    pub fn from_route(route: &StitchedRoute) -> Result<Self> {
        let leg = match route.legs.as_slice() {
            [leg] => leg,
            legs => {
                return Err(Error::UnsupportedOutput {
                    message: format!(
                        "passage output needs exactly 2 waypoints, route has {} legs",
                        legs.len()
                    ),
                })
            }
        };

        let name = route_name(route);
        let mut features = Vec::with_capacity(3);

        let (first, last) = match (leg.path.first(), leg.path.last()) {
            (Some(&first), Some(&last)) => (first, last),
            _ => {
                features.push(passage_feature(
                    "main_route",
                    &[leg.origin, leg.destination],
                    PassageProperties {
                        o_coords: leg.origin,
                        d_coords: leg.destination,
                        o_to_wp_dist: 0.0,
                        wp_to_d_dist: 0.0,
                        wp_dist: 0.0,
                        total_dist: leg.distance_km,
                        route_name: name,
                    },
                ));
                return Ok(Self::new(features));
            }
        };

        features.push(passage_feature(
            "origin_connection",
            &[leg.origin, first],
            PassageProperties {
                o_coords: leg.origin,
                d_coords: first,
                o_to_wp_dist: leg.origin_access_km,
                wp_to_d_dist: 0.0,
                wp_dist: 0.0,
                total_dist: leg.origin_access_km,
                route_name: format!("{name} - Origin Connection"),
            },
        ));
        features.push(passage_feature(
            "main_route",
            &leg.path,
            PassageProperties {
                o_coords: leg.origin,
                d_coords: leg.destination,
                o_to_wp_dist: leg.origin_access_km,
                wp_to_d_dist: leg.destination_access_km,
                wp_dist: leg.graph_km,
                total_dist: leg.distance_km,
                route_name: name.clone(),
            },
        ));
        features.push(passage_feature(
            "destination_connection",
            &[last, leg.destination],
            PassageProperties {
                o_coords: last,
                d_coords: leg.destination,
                o_to_wp_dist: 0.0,
                wp_to_d_dist: leg.destination_access_km,
                wp_dist: 0.0,
                total_dist: leg.destination_access_km,
                route_name: format!("{name} - Destination Connection"),
            },
        ));

        Ok(Self::new(features))
    }

    fn new(features: Vec<PassageFeature>) -> Self {
        Self {
            collection_type: "FeatureCollection",
            name: PASSAGE_COLLECTION_NAME,
            features,
        }
    }

    pub fn feature(&self, id: &str) -> Option<&PassageFeature> {
        self.features.iter().find(|feature| feature.id == id)
    }
}

fn passage_feature(id: &str, points: &[Position], properties: PassageProperties) -> PassageFeature {
    PassageFeature {
        feature_type: "Feature",
        geometry: RouteGeometry::from_coordinates(points).into(),
        properties,
        id: id.to_string(),
    }
}

fn route_name(route: &StitchedRoute) -> String {
    route
        .name
        .clone()
        .unwrap_or_else(|| DEFAULT_ROUTE_NAME.to_string())
}

/// Presentation style for turning a [`RouteSummary`] into text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteRenderMode {
    PlainText,
    RichText,
}

/// Structured representation of a composed route that higher-level consumers can serialise.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RouteSummary {
    pub name: String,
    pub algorithm: RouteAlgorithm,
    pub distance_km: f64,
    pub geometry: GeometryKind,
    pub segments: usize,
    pub fallback_legs: usize,
    pub legs: Vec<RouteLeg>,
    pub coordinates: Vec<Position>,
}

impl RouteSummary {
    pub fn from_route(route: &StitchedRoute) -> Self {
        let geometry = segment(route);
        Self {
            name: route_name(route),
            algorithm: route.algorithm,
            distance_km: route.distance_km,
            geometry: geometry.kind(),
            segments: geometry.segment_count(),
            fallback_legs: route.fallback_count(),
            legs: route.legs.clone(),
            coordinates: route.coordinates.clone(),
        }
    }

    /// Render the summary using the requested textual mode.
    pub fn render(&self, mode: RouteRenderMode) -> String {
        match mode {
            RouteRenderMode::PlainText => self.render_plain(),
            RouteRenderMode::RichText => self.render_rich(),
        }
    }

    fn render_plain(&self) -> String {
        let mut buffer = String::new();
        let _ = writeln!(
            buffer,
            "{}: {:.1} km over {} legs (algorithm: {}, geometry: {} with {} segments)",
            self.name,
            self.distance_km,
            self.legs.len(),
            self.algorithm,
            self.geometry,
            self.segments
        );

        for leg in &self.legs {
            let _ = writeln!(
                buffer,
                "{:>3}: {} -> {} {:>10.1} km  [{}]",
                leg.index,
                leg.origin,
                leg.destination,
                leg.distance_km,
                leg_status(leg)
            );
        }

        if self.fallback_legs > 0 {
            let _ = writeln!(
                buffer,
                "warning: {} of {} legs use a direct line instead of the sea route network",
                self.fallback_legs,
                self.legs.len()
            );
        }

        buffer
    }

    fn render_rich(&self) -> String {
        let mut buffer = String::new();
        let _ = writeln!(
            buffer,
            "**{}**: _{:.1} km_ ({} legs, algorithm: `{}`, geometry: `{}`)",
            self.name,
            self.distance_km,
            self.legs.len(),
            self.algorithm,
            self.geometry
        );
        for leg in &self.legs {
            let _ = writeln!(
                buffer,
                "* {:>2}. `{}` → `{}` **{:.1} km** _{}_",
                leg.index,
                leg.origin,
                leg.destination,
                leg.distance_km,
                leg_status(leg)
            );
        }
        buffer
    }
}

fn leg_status(leg: &RouteLeg) -> String {
    match &leg.routing {
        LegRouting::Routed => format!("routed, {} graph points", leg.graph_points),
        LegRouting::Fallback { reason } => format!("direct line: {reason}"),
    }
}
