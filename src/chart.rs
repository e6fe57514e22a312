//! Chart builders: filtered rows in, serialisable chart description out.
//!
//! The builders do no filtering of their own. The page turns a [`ChartSpec`]
//! into a Plotly figure, so everything here stays framework-agnostic.

use serde::Serialize;

use crate::color::{ColorMap, generate_palette};
use crate::data::model::{Outcome, PieSlice, ScatterPoint, SiteSelection};

pub const ALL_SITES_TITLE: &str = "Total Successful Launches by Site";
pub const SCATTER_TITLE: &str = "Payload vs Launch Outcome";
pub const EMPTY_PLACEHOLDER: &str = "No launches match the current selection";

/// A renderable chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    pub title: String,
    #[serde(flatten)]
    pub kind: ChartKind,
    /// Shown instead of marks when there is nothing to draw.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ChartKind {
    Pie {
        sectors: Vec<Sector>,
    },
    Scatter {
        x_axis: Axis,
        y_axis: Axis,
        series: Vec<Series>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Sector {
    pub label: String,
    pub value: u64,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Axis {
    pub label: String,
    /// Explicit tick positions and their text; empty means automatic ticks.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub ticks: Vec<Tick>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tick {
    pub value: f64,
    pub text: String,
}

/// All marks sharing one booster category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    pub name: String,
    pub color: String,
    pub points: Vec<Mark>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Mark {
    pub x: f64,
    pub y: u8,
}

// ---------------------------------------------------------------------------
// Proportion (pie) chart
// ---------------------------------------------------------------------------

/// Title for the pie chart under the given site selection.
pub fn proportion_title(site: &SiteSelection) -> String {
    match site {
        SiteSelection::All => ALL_SITES_TITLE.to_string(),
        SiteSelection::Site(name) => format!("Success vs Failure for site {name}"),
    }
}

/// One sector per slice, in slice order.
pub fn build_proportion_chart(slices: &[PieSlice], site: &SiteSelection) -> ChartSpec {
    let palette = generate_palette(slices.len());
    let sectors = slices
        .iter()
        .zip(palette)
        .map(|(slice, color)| Sector {
            label: slice.label.clone(),
            value: slice.value,
            color,
        })
        .collect::<Vec<_>>();

    ChartSpec {
        title: proportion_title(site),
        placeholder: sectors.is_empty().then(|| EMPTY_PLACEHOLDER.to_string()),
        kind: ChartKind::Pie { sectors },
    }
}

// ---------------------------------------------------------------------------
// Payload/outcome scatter chart
// ---------------------------------------------------------------------------

fn outcome_axis() -> Axis {
    Axis {
        label: "Launch Outcome".to_string(),
        ticks: [Outcome::Failure, Outcome::Success]
            .into_iter()
            .map(|o| Tick {
                value: f64::from(o.class()),
                text: o.label().to_string(),
            })
            .collect(),
    }
}

/// One mark per point at (payload, class), grouped into a series per
/// booster category in first-appearance order.
pub fn build_scatter_chart(points: &[ScatterPoint], colors: &ColorMap) -> ChartSpec {
    let mut series: Vec<Series> = Vec::new();
    for point in points {
        let mark = Mark {
            x: point.payload_mass_kg,
            y: point.outcome.class(),
        };
        match series.iter_mut().find(|s| s.name == point.booster_category) {
            Some(s) => s.points.push(mark),
            None => series.push(Series {
                name: point.booster_category.clone(),
                color: colors.color_for(&point.booster_category).to_string(),
                points: vec![mark],
            }),
        }
    }

    ChartSpec {
        title: SCATTER_TITLE.to_string(),
        placeholder: series.is_empty().then(|| EMPTY_PLACEHOLDER.to_string()),
        kind: ChartKind::Scatter {
            x_axis: Axis {
                label: "Payload Mass (kg)".to_string(),
                ticks: Vec::new(),
            },
            y_axis: outcome_axis(),
            series,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn point(mass: f64, outcome: Outcome, booster: &str) -> ScatterPoint {
        ScatterPoint {
            payload_mass_kg: mass,
            outcome,
            booster_category: booster.to_string(),
        }
    }

    fn boosters() -> ColorMap {
        let cats: BTreeSet<String> = ["FT", "v1.0", "B5"].iter().map(|s| s.to_string()).collect();
        ColorMap::new(&cats)
    }

    #[test]
    fn pie_titles_follow_selection() {
        assert_eq!(proportion_title(&SiteSelection::All), ALL_SITES_TITLE);
        assert_eq!(
            proportion_title(&SiteSelection::parse("KSC LC-39A")),
            "Success vs Failure for site KSC LC-39A"
        );
    }

    #[test]
    fn pie_sectors_mirror_slices() {
        let slices = vec![
            PieSlice { label: "Success".into(), value: 10 },
            PieSlice { label: "Failure".into(), value: 3 },
        ];
        let chart = build_proportion_chart(&slices, &SiteSelection::parse("KSC LC-39A"));
        assert!(chart.placeholder.is_none());
        let ChartKind::Pie { sectors } = &chart.kind else {
            panic!("expected pie chart");
        };
        let labelled: Vec<(&str, u64)> =
            sectors.iter().map(|s| (s.label.as_str(), s.value)).collect();
        assert_eq!(labelled, vec![("Success", 10), ("Failure", 3)]);
        assert_ne!(sectors[0].color, sectors[1].color);
    }

    #[test]
    fn empty_inputs_render_placeholders() {
        let pie = build_proportion_chart(&[], &SiteSelection::All);
        assert_eq!(pie.placeholder.as_deref(), Some(EMPTY_PLACEHOLDER));
        assert_eq!(pie.kind, ChartKind::Pie { sectors: Vec::new() });

        let scatter = build_scatter_chart(&[], &boosters());
        assert_eq!(scatter.placeholder.as_deref(), Some(EMPTY_PLACEHOLDER));
        let ChartKind::Scatter { series, .. } = &scatter.kind else {
            panic!("expected scatter chart");
        };
        assert!(series.is_empty());
    }

    #[test]
    fn scatter_groups_by_booster_and_keeps_order() {
        let colors = boosters();
        let points = vec![
            point(500.0, Outcome::Success, "v1.0"),
            point(9000.0, Outcome::Failure, "FT"),
            point(3000.0, Outcome::Success, "v1.0"),
        ];
        let chart = build_scatter_chart(&points, &colors);
        assert_eq!(chart.title, SCATTER_TITLE);

        let ChartKind::Scatter { series, y_axis, .. } = &chart.kind else {
            panic!("expected scatter chart");
        };
        assert_eq!(series.len(), 2);
        assert_eq!(series[0].name, "v1.0");
        assert_eq!(series[0].color, colors.color_for("v1.0"));
        assert_eq!(
            series[0].points,
            vec![Mark { x: 500.0, y: 1 }, Mark { x: 3000.0, y: 1 }]
        );
        assert_eq!(series[1].points, vec![Mark { x: 9000.0, y: 0 }]);

        assert_eq!(y_axis.label, "Launch Outcome");
        let ticks: Vec<&str> = y_axis.ticks.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(ticks, vec!["Failure", "Success"]);
    }

    #[test]
    fn chart_json_is_tagged_by_kind() {
        let chart = build_proportion_chart(
            &[PieSlice { label: "A".into(), value: 1 }],
            &SiteSelection::All,
        );
        let json = serde_json::to_value(&chart).unwrap();
        assert_eq!(json["kind"], "pie");
        assert_eq!(json["title"], ALL_SITES_TITLE);
        assert_eq!(json["sectors"][0]["label"], "A");
        assert!(json.get("placeholder").is_none());
    }
}
