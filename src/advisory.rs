use serde::Serialize;

use crate::scorer::Band;

/// Fixed operator guidance shown alongside a verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Advisory {
    pub summary: &'static str,
    pub actions: &'static [&'static str],
}

const LOW: Advisory = Advisory {
    summary: "Traffic flow is stable with minimal disruption.",
    actions: &["Normal traffic operations", "Continue passive monitoring"],
};

const MODERATE: Advisory = Advisory {
    summary: "Traffic buildup detected. Preventive measures recommended.",
    actions: &[
        "Monitor congestion-prone zones",
        "Adjust signal timings",
        "Inform commuters in advance",
    ],
};

const HIGH: Advisory = Advisory {
    summary: "Severe congestion with high accident probability.",
    actions: &[
        "Activate traffic diversion plans",
        "Deploy traffic police & emergency teams",
        "Issue public travel advisories",
    ],
};

impl Advisory {
    pub fn for_band(band: Band) -> &'static Advisory {
        match band {
            Band::Low => &LOW,
            Band::Moderate => &MODERATE,
            Band::High => &HIGH,
        }
    }
}
