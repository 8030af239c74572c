//! CloudControl API endpoints per geography

use nlb_common::{NlbError, Result};
use serde::Serialize;

/// Region used when none is configured
pub const DEFAULT_REGION: &str = "dd-na";

/// CloudControl geography
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Region {
    pub key: &'static str,
    pub name: &'static str,
    pub host: &'static str,
    pub vendor: &'static str,
}

pub static REGIONS: [Region; 8] = [
    Region {
        key: "dd-na",
        name: "North America (NA)",
        host: "api-na.dimensiondata.com",
        vendor: "DimensionData",
    },
    Region {
        key: "dd-eu",
        name: "Europe (EU)",
        host: "api-eu.dimensiondata.com",
        vendor: "DimensionData",
    },
    Region {
        key: "dd-au",
        name: "Australia (AU)",
        host: "api-au.dimensiondata.com",
        vendor: "DimensionData",
    },
    Region {
        key: "dd-au-gov",
        name: "Australia Canberra ACT (AU)",
        host: "api-canberra.dimensiondata.com",
        vendor: "DimensionData",
    },
    Region {
        key: "dd-af",
        name: "Africa (AF)",
        host: "api-mea.dimensiondata.com",
        vendor: "DimensionData",
    },
    Region {
        key: "dd-ap",
        name: "Asia Pacific (AP)",
        host: "api-ap.dimensiondata.com",
        vendor: "DimensionData",
    },
    Region {
        key: "dd-latam",
        name: "South America (LATAM)",
        host: "api-latam.dimensiondata.com",
        vendor: "DimensionData",
    },
    Region {
        key: "dd-canada",
        name: "Canada (CA)",
        host: "api-canada.dimensiondata.com",
        vendor: "DimensionData",
    },
];

/// Look up a region by key. Unknown keys are a configuration error.
pub fn lookup(key: &str) -> Result<&'static Region> {
    REGIONS
        .iter()
        .find(|r| r.key == key)
        .ok_or_else(|| NlbError::InvalidRegion(key.to_string()))
}
