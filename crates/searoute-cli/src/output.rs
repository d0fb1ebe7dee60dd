//! Output formats for route results.

use clap::ValueEnum;

use searoute_lib::{
    Error, PassageCollection, Result, RouteFeature, RouteRenderMode, RouteSummary, StitchedRoute,
};

/// How a composed route is written to stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Plain text summary with one line per leg.
    #[default]
    Text,
    /// Markdown-flavoured summary.
    Rich,
    /// Route summary including coordinates and leg details as JSON.
    Json,
    /// GeoJSON Feature with a LineString or MultiLineString geometry.
    Geojson,
    /// GeoJSON FeatureCollection of access legs and main route (two waypoints only).
    Passage,
}

impl OutputFormat {
    /// Whether this format is JSON, so failures are reported as JSON too.
    pub fn is_structured(self) -> bool {
        matches!(
            self,
            OutputFormat::Json | OutputFormat::Geojson | OutputFormat::Passage
        )
    }

    /// Render a route in this format.
    pub fn render(self, route: &StitchedRoute) -> Result<String> {
        let rendered = match self {
            OutputFormat::Text => {
                RouteSummary::from_route(route).render(RouteRenderMode::PlainText)
            }
            OutputFormat::Rich => RouteSummary::from_route(route).render(RouteRenderMode::RichText),
            OutputFormat::Json => to_json(&RouteSummary::from_route(route))?,
            OutputFormat::Geojson => to_json(&RouteFeature::from_route(route))?,
            OutputFormat::Passage => to_json(&PassageCollection::from_route(route)?)?,
        };
        Ok(rendered)
    }
}

/// Render the structured report for a failed request.
pub fn render_error(error: &Error) -> Result<String> {
    to_json(&error.report())
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String> {
    let mut rendered = serde_json::to_string_pretty(value)?;
    rendered.push('\n');
    Ok(rendered)
}
