use serde::Serialize;

use crate::data::model::{ALL_SITES, Dataset, FilterSelection};

pub const HEADING: &str = "SpaceX Launch Records Dashboard";
pub const SITE_PLACEHOLDER: &str = "Select a Launch Site here";

pub const SLIDER_MIN: f64 = 0.0;
pub const SLIDER_MAX: f64 = 10000.0;
pub const SLIDER_STEP: f64 = 1000.0;
pub const SLIDER_MARKS: [f64; 5] = [0.0, 2500.0, 5000.0, 7500.0, 10000.0];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DropdownOption {
    pub label: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SiteDropdown {
    pub options: Vec<DropdownOption>,
    pub placeholder: &'static str,
    pub searchable: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RangeSlider {
    pub min: f64,
    pub max: f64,
    pub step: f64,
    pub marks: Vec<f64>,
}

/// Everything the page needs to draw its controls.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Layout {
    pub heading: &'static str,
    pub site_dropdown: SiteDropdown,
    pub payload_slider: RangeSlider,
    pub initial: FilterSelection,
}

impl Layout {
    /// Dropdown lists "All Sites" then every site in the data.
    pub fn for_dataset(dataset: &Dataset) -> Self {
        let options = std::iter::once(DropdownOption {
            label: "All Sites".to_string(),
            value: ALL_SITES.to_string(),
        })
        .chain(dataset.sites.iter().map(|site| DropdownOption {
            label: site.clone(),
            value: site.clone(),
        }))
        .collect();

        Layout {
            heading: HEADING,
            site_dropdown: SiteDropdown {
                options,
                placeholder: SITE_PLACEHOLDER,
                searchable: true,
            },
            payload_slider: RangeSlider {
                min: SLIDER_MIN,
                max: SLIDER_MAX,
                step: SLIDER_STEP,
                marks: SLIDER_MARKS.to_vec(),
            },
            initial: FilterSelection::initial(dataset),
        }
    }
}
