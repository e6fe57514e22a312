use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::chart::{ChartSpec, build_proportion_chart, build_scatter_chart};
use crate::color::ColorMap;
use crate::data::filter::{payload_outcome_points, site_success_breakdown};
use crate::data::model::{Dataset, FilterSelection, PayloadRange, SiteSelection};

// ---------------------------------------------------------------------------
// Figures & inputs
// ---------------------------------------------------------------------------

/// Both dashboard outputs for one selection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardFigures {
    pub proportion: ChartSpec,
    pub scatter: ChartSpec,
}

/// A change to exactly one control.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterChange {
    Site(SiteSelection),
    PayloadRange(PayloadRange),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Recomputing,
}

/// Render both charts for a selection. Pure.
pub fn render(dataset: &Dataset, selection: &FilterSelection, colors: &ColorMap) -> DashboardFigures {
    let slices = site_success_breakdown(dataset, &selection.site);
    let points = payload_outcome_points(dataset, &selection.site, &selection.payload_range);
    DashboardFigures {
        proportion: build_proportion_chart(&slices, &selection.site),
        scatter: build_scatter_chart(&points, colors),
    }
}

// ---------------------------------------------------------------------------
// Dashboard – input controls bound to output charts
// ---------------------------------------------------------------------------

/// Binds the two controls to the two charts.
///
/// Every [`FilterChange`] swaps the selection in one step and recomputes both
/// charts before returning, so callers only ever observe `Idle`. Figures for
/// the starting selection are only rendered when first asked for.
pub struct Dashboard {
    dataset: Arc<Dataset>,
    colors: Arc<ColorMap>,
    selection: FilterSelection,
    figures: Option<DashboardFigures>,
    phase: Phase,
}

impl Dashboard {
    pub fn with_selection(
        dataset: Arc<Dataset>,
        colors: Arc<ColorMap>,
        selection: FilterSelection,
    ) -> Self {
        Self {
            dataset,
            colors,
            selection,
            figures: None,
            phase: Phase::Idle,
        }
    }

    pub fn selection(&self) -> &FilterSelection {
        &self.selection
    }

    /// Figures for the current selection.
    pub fn figures(&mut self) -> &DashboardFigures {
        let Self { dataset, colors, selection, figures, .. } = self;
        figures.get_or_insert_with(|| render(dataset, selection, colors))
    }

    #[cfg(test)]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Apply one control change and recompute both charts.
    pub fn apply(&mut self, change: FilterChange) -> &DashboardFigures {
        debug_assert_eq!(self.phase, Phase::Idle, "re-entrant filter change");
        self.phase = Phase::Recomputing;
        log::debug!("recomputing charts after {change:?}");

        let mut next = self.selection.clone();
        match change {
            FilterChange::Site(site) => next.site = site,
            FilterChange::PayloadRange(range) => next.payload_range = range,
        }
        let figures = render(&self.dataset, &next, &self.colors);
        self.selection = next;

        self.phase = Phase::Idle;
        self.figures.insert(figures)
    }
}
