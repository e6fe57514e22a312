use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Sentinel value the site selector uses for "every launch site".
pub const ALL_SITES: &str = "ALL";

// ---------------------------------------------------------------------------
// Outcome – the binary `class` column
// ---------------------------------------------------------------------------

/// Launch outcome, stored in the source table as `class` (1 = success, 0 = failure).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum Outcome {
    Failure,
    Success,
}

impl Outcome {
    /// The raw 0/1 class value.
    pub fn class(self) -> u8 {
        match self {
            Outcome::Failure => 0,
            Outcome::Success => 1,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Outcome::Failure => "Failure",
            Outcome::Success => "Success",
        }
    }
}

impl From<Outcome> for u8 {
    fn from(outcome: Outcome) -> Self {
        outcome.class()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("outcome class must be 0 or 1, got {0}")]
pub struct OutcomeError(pub u8);

impl TryFrom<u8> for Outcome {
    type Error = OutcomeError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Outcome::Failure),
            1 => Ok(Outcome::Success),
            other => Err(OutcomeError(other)),
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// LaunchRecord – one row of the launch table
// ---------------------------------------------------------------------------

/// A single launch attempt (one row of the source table).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LaunchRecord {
    pub launch_site: String,
    /// Always finite and non-negative; checked by the loader.
    pub payload_mass_kg: f64,
    pub outcome: Outcome,
    /// Only used to colour scatter marks.
    pub booster_category: String,
}

// ---------------------------------------------------------------------------
// PayloadRange – inclusive [low, high] window
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RangeError {
    #[error("payload range bounds must be finite (got {low}..{high})")]
    NotFinite { low: f64, high: f64 },
    #[error("payload range is inverted: low {low} > high {high}")]
    Inverted { low: f64, high: f64 },
}

/// Inclusive payload-mass window in kilograms.
///
/// The range control guarantees `low <= high`; [`PayloadRange::new`] is the
/// checked constructor used wherever the bounds arrive from outside.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PayloadRange {
    pub low: f64,
    pub high: f64,
}

impl PayloadRange {
    pub fn new(low: f64, high: f64) -> Result<Self, RangeError> {
        if !low.is_finite() || !high.is_finite() {
            return Err(RangeError::NotFinite { low, high });
        }
        if low > high {
            return Err(RangeError::Inverted { low, high });
        }
        Ok(Self { low, high })
    }

    /// Inclusive on both ends.
    pub fn contains(&self, mass_kg: f64) -> bool {
        self.low <= mass_kg && mass_kg <= self.high
    }
}

// ---------------------------------------------------------------------------
// SiteSelection / FilterSelection – transient UI state
// ---------------------------------------------------------------------------

/// Value of the site dropdown: the `"ALL"` sentinel or one exact site name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum SiteSelection {
    #[default]
    All,
    Site(String),
}

impl SiteSelection {
    pub fn parse(value: &str) -> Self {
        if value == ALL_SITES {
            SiteSelection::All
        } else {
            SiteSelection::Site(value.to_string())
        }
    }

    /// Whether a record launched from `site` passes this selection.
    pub fn matches(&self, site: &str) -> bool {
        match self {
            SiteSelection::All => true,
            SiteSelection::Site(selected) => selected == site,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            SiteSelection::All => ALL_SITES,
            SiteSelection::Site(site) => site,
        }
    }
}

impl fmt::Display for SiteSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// Serialised as the bare dropdown value so the page can round-trip it.
impl Serialize for SiteSelection {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for SiteSelection {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        Ok(SiteSelection::parse(&value))
    }
}

/// Current state of both dashboard controls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterSelection {
    pub site: SiteSelection,
    pub payload_range: PayloadRange,
}

impl FilterSelection {
    /// The selection the page opens with: every site, full payload span.
    pub fn initial(dataset: &Dataset) -> Self {
        Self {
            site: SiteSelection::All,
            payload_range: dataset.payload_bounds,
        }
    }
}

// ---------------------------------------------------------------------------
// Derived rows
// ---------------------------------------------------------------------------

/// One pie sector before styling: a label and a launch count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PieSlice {
    pub label: String,
    pub value: u64,
}

/// Projection of a record onto the payload/outcome plane.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterPoint {
    pub payload_mass_kg: f64,
    pub outcome: Outcome,
    pub booster_category: String,
}

// ---------------------------------------------------------------------------
// Dataset – the complete loaded table
// ---------------------------------------------------------------------------

/// The full parsed table with values pre-computed at load time.
///
/// Never mutated after construction; shared behind an `Arc` by the server.
#[derive(Debug, Clone)]
pub struct Dataset {
    /// All launches in file order.
    pub records: Vec<LaunchRecord>,
    /// Global payload min/max, used to seed the range control.
    pub payload_bounds: PayloadRange,
    /// Distinct launch sites in order of first appearance.
    pub sites: Vec<String>,
    /// Distinct booster categories, sorted.
    pub booster_categories: BTreeSet<String>,
}

impl Dataset {
    /// Build the derived indices. Returns `None` for an empty table since
    /// payload bounds are undefined without rows.
    pub fn from_records(records: Vec<LaunchRecord>) -> Option<Self> {
        let first = records.first()?;
        let mut low = first.payload_mass_kg;
        let mut high = first.payload_mass_kg;
        let mut sites: Vec<String> = Vec::new();
        let mut booster_categories = BTreeSet::new();

        for rec in &records {
            low = low.min(rec.payload_mass_kg);
            high = high.max(rec.payload_mass_kg);
            if !sites.iter().any(|s| s == &rec.launch_site) {
                sites.push(rec.launch_site.clone());
            }
            booster_categories.insert(rec.booster_category.clone());
        }

        Some(Dataset {
            records,
            payload_bounds: PayloadRange { low, high },
            sites,
            booster_categories,
        })
    }

    /// Number of launches; never zero.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.records.len()
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;

    #[test]
    fn dataset_computes_bounds_and_site_order() {
        let ds = Dataset::from_records(vec![
            record("KSC LC-39A", 2500.0, Outcome::Success, "FT"),
            record("CCAFS LC-40", 0.0, Outcome::Failure, "v1.0"),
            record("KSC LC-39A", 9600.0, Outcome::Success, "B5"),
        ])
        .unwrap();

        assert_eq!(ds.payload_bounds, PayloadRange { low: 0.0, high: 9600.0 });
        assert_eq!(ds.sites, vec!["KSC LC-39A", "CCAFS LC-40"]);
        assert_eq!(
            ds.booster_categories.iter().collect::<Vec<_>>(),
            vec!["B5", "FT", "v1.0"]
        );
    }

    #[test]
    fn empty_table_has_no_dataset() {
        assert!(Dataset::from_records(Vec::new()).is_none());
    }

    #[test]
    fn payload_range_rejects_inverted_and_nan() {
        assert!(matches!(
            PayloadRange::new(10.0, 1.0),
            Err(RangeError::Inverted { .. })
        ));
        assert!(matches!(
            PayloadRange::new(f64::NAN, 1.0),
            Err(RangeError::NotFinite { .. })
        ));
        let point = PayloadRange::new(5.0, 5.0).unwrap();
        assert!(point.contains(5.0));
        assert!(!point.contains(5.000001));
    }

    #[test]
    fn site_selection_parses_sentinel() {
        assert_eq!(SiteSelection::parse("ALL"), SiteSelection::All);
        assert_eq!(
            SiteSelection::parse("VAFB SLC-4E"),
            SiteSelection::Site("VAFB SLC-4E".into())
        );
        // Case matters: only the exact sentinel means every site.
        assert_eq!(SiteSelection::parse("all"), SiteSelection::Site("all".into()));
    }

    #[test]
    fn selection_serialises_as_dropdown_value() {
        let sel = FilterSelection::initial(&three_launches());
        let json = serde_json::to_value(&sel).unwrap();
        assert_eq!(json["site"], "ALL");
        assert_eq!(json["payload_range"]["low"], 500.0);
        assert_eq!(json["payload_range"]["high"], 9000.0);

        let back: FilterSelection = serde_json::from_value(json).unwrap();
        assert_eq!(back, sel);
    }

    #[test]
    fn outcome_serialises_as_class() {
        assert_eq!(serde_json::to_value(Outcome::Success).unwrap(), 1);
        let err = serde_json::from_value::<Outcome>(serde_json::json!(2)).unwrap_err();
        assert!(err.to_string().contains("outcome class must be 0 or 1, got 2"));
    }

    #[test]
    fn outcome_from_class_is_typed() {
        assert_eq!(Outcome::try_from(1u8), Ok(Outcome::Success));
        assert_eq!(Outcome::try_from(0u8), Ok(Outcome::Failure));
        assert_eq!(Outcome::try_from(7u8), Err(OutcomeError(7)));
    }
}
