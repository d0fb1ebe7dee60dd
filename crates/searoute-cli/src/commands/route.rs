//! Route command handler for composing sea routes between waypoints.

use std::path::Path;

use anyhow::Result;
use clap::{Args, ValueEnum};

use searoute_lib::routing::DEFAULT_SNAP_TOLERANCE_KM;
use searoute_lib::{
    load_graph, plan_route, resolve_dataset, GraphLoadOptions, Position, RouteAlgorithm,
    RouteOptions, RouteRequest,
};

use crate::output::{render_error, OutputFormat};

/// Search algorithm names accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum AlgorithmArg {
    Dijkstra,
    #[default]
    #[value(name = "a-star")]
    AStar,
}

impl From<AlgorithmArg> for RouteAlgorithm {
    fn from(value: AlgorithmArg) -> Self {
        match value {
            AlgorithmArg::Dijkstra => RouteAlgorithm::Dijkstra,
            AlgorithmArg::AStar => RouteAlgorithm::AStar,
        }
    }
}

/// Arguments for the route command.
#[derive(Debug, Clone, Args)]
pub struct RouteArgs {
    /// Waypoint as `LON,LAT`; repeat for each waypoint in visiting order.
    #[arg(
        long = "point",
        value_name = "LON,LAT",
        required = true,
        allow_hyphen_values = true,
        value_parser = parse_point
    )]
    pub points: Vec<Position>,

    /// Name attached to the route output.
    #[arg(long)]
    pub name: Option<String>,

    /// Maximum distance in kilometres between a waypoint and the sea route network.
    #[arg(long, default_value_t = DEFAULT_SNAP_TOLERANCE_KM, value_parser = parse_tolerance)]
    pub tolerance_km: f64,

    /// Search algorithm.
    #[arg(long, value_enum, default_value_t = AlgorithmArg::AStar)]
    pub algorithm: AlgorithmArg,

    /// Fail instead of drawing a direct line when a leg cannot be routed.
    #[arg(long)]
    pub no_fallback: bool,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

impl RouteArgs {
    /// Convert CLI args to a library RouteRequest.
    pub fn to_request(&self) -> RouteRequest {
        let request = RouteRequest::new(self.points.clone()).with_options(RouteOptions {
            snap_tolerance_km: self.tolerance_km,
            algorithm: self.algorithm.into(),
            allow_fallback: !self.no_fallback,
        });
        match &self.name {
            Some(name) => request.with_name(name.clone()),
            None => request,
        }
    }
}

/// Handle the route subcommand.
///
/// Prints the rendered route on success. On failure with a JSON output format,
/// the structured error report is printed to stdout before the error is
/// returned.
pub fn handle_route_command(
    dataset: Option<&Path>,
    graph_options: GraphLoadOptions,
    args: &RouteArgs,
) -> Result<()> {
    match compose_and_render(dataset, graph_options, args) {
        Ok(rendered) => {
            print!("{rendered}");
            Ok(())
        }
        Err(error) => {
            if args.format.is_structured() {
                print!("{}", render_error(&error)?);
            }
            Err(anyhow::Error::new(error).context("route request failed"))
        }
    }
}

fn compose_and_render(
    dataset: Option<&Path>,
    graph_options: GraphLoadOptions,
    args: &RouteArgs,
) -> searoute_lib::Result<String> {
    let paths = resolve_dataset(dataset)?;
    let graph = load_graph(&paths, &graph_options)?;
    let route = plan_route(&graph, &args.to_request())?;
    if !route.is_fully_routed() {
        tracing::warn!(
            fallback_legs = route.fallback_count(),
            legs = route.leg_count(),
            "route contains direct-line legs"
        );
    }
    args.format.render(&route)
}

/// Parse a `LON,LAT` pair. Range checks happen in the library.
pub fn parse_point(value: &str) -> std::result::Result<Position, String> {
    let (longitude, latitude) = value
        .split_once(',')
        .ok_or_else(|| format!("expected LON,LAT but got '{value}'"))?;
    let parse = |part: &str, label: &str| {
        part.trim()
            .parse::<f64>()
            .map_err(|e| format!("invalid {label} '{}': {e}", part.trim()))
    };
    Ok(Position::new(
        parse(longitude, "longitude")?,
        parse(latitude, "latitude")?,
    ))
}

fn parse_tolerance(value: &str) -> std::result::Result<f64, String> {
    let tolerance: f64 = value
        .parse()
        .map_err(|e| format!("invalid tolerance '{value}': {e}"))?;
    if !tolerance.is_finite() || tolerance < 0.0 {
        return Err("tolerance must be a non-negative number of kilometres".to_string());
    }
    Ok(tolerance)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_negative_coordinates() {
        assert_eq!(parse_point("-74.0,40.7"), Ok(Position::new(-74.0, 40.7)));
        assert_eq!(parse_point(" 31.2 , 30 "), Ok(Position::new(31.2, 30.0)));
    }

    #[test]
    fn rejects_malformed_points() {
        assert!(parse_point("31.2").is_err());
        assert!(parse_point("east,30").is_err());
    }

    #[test]
    fn rejects_negative_tolerance() {
        assert!(parse_tolerance("-1").is_err());
        assert!(parse_tolerance("inf").is_err());
        assert_eq!(parse_tolerance("50"), Ok(50.0));
    }

    #[test]
    fn request_carries_options() {
        let args = RouteArgs {
            points: vec![Position::new(0.0, 0.0), Position::new(1.0, 0.0)],
            name: Some("Test".to_string()),
            tolerance_km: 10.0,
            algorithm: AlgorithmArg::Dijkstra,
            no_fallback: true,
            format: OutputFormat::Json,
        };

        let request = args.to_request();
        assert_eq!(request.name.as_deref(), Some("Test"));
        assert_eq!(request.options.snap_tolerance_km, 10.0);
        assert_eq!(request.options.algorithm, RouteAlgorithm::Dijkstra);
        assert!(!request.options.allow_fallback);
    }
}
