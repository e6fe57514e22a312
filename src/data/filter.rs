use super::model::{Dataset, Outcome, PayloadRange, PieSlice, ScatterPoint, SiteSelection};

// ---------------------------------------------------------------------------
// Proportion chart input
// ---------------------------------------------------------------------------

/// Aggregate launches into pie slices for the given site selection.
///
/// * `All` → successful launches only, one slice per site (first-appearance
///   order) valued by its success count. This is a share of successes, not a
///   per-site success rate.
/// * `Site(s)` → launches from `s`, split into `"Success"` then `"Failure"`.
///   A class with no launches gets no slice.
///
/// An unknown site yields an empty vector.
pub fn site_success_breakdown(dataset: &Dataset, site: &SiteSelection) -> Vec<PieSlice> {
    match site {
        SiteSelection::All => {
            let mut slices: Vec<PieSlice> = Vec::new();
            for rec in dataset
                .records
                .iter()
                .filter(|r| r.outcome == Outcome::Success)
            {
                match slices.iter_mut().find(|s| s.label == rec.launch_site) {
                    Some(slice) => slice.value += 1,
                    None => slices.push(PieSlice {
                        label: rec.launch_site.clone(),
                        value: 1,
                    }),
                }
            }
            slices
        }
        SiteSelection::Site(name) => {
            let (mut successes, mut failures) = (0u64, 0u64);
            for rec in dataset.records.iter().filter(|r| &r.launch_site == name) {
                match rec.outcome {
                    Outcome::Success => successes += 1,
                    Outcome::Failure => failures += 1,
                }
            }
            [(Outcome::Success, successes), (Outcome::Failure, failures)]
                .into_iter()
                .filter(|&(_, count)| count > 0)
                .map(|(outcome, count)| PieSlice {
                    label: outcome.label().to_string(),
                    value: count,
                })
                .collect()
        }
    }
}

// ---------------------------------------------------------------------------
// Scatter chart input
// ---------------------------------------------------------------------------

/// Project every launch inside `range` (inclusive) and matching `site` onto
/// the payload/outcome plane, in dataset order.
///
/// `range` is trusted to satisfy `low <= high`; an inverted range simply
/// matches nothing.
pub fn payload_outcome_points(
    dataset: &Dataset,
    site: &SiteSelection,
    range: &PayloadRange,
) -> Vec<ScatterPoint> {
    dataset
        .records
        .iter()
        .filter(|r| site.matches(&r.launch_site) && range.contains(r.payload_mass_kg))
        .map(|r| ScatterPoint {
            payload_mass_kg: r.payload_mass_kg,
            outcome: r.outcome,
            booster_category: r.booster_category.clone(),
        })
        .collect()
}
