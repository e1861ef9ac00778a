//! VolumeUnit - Display Units for Volume Charts

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::constants::GALLONS_TO_LITERS;
use crate::error::Error;

/// Unit a chart displays volumes in.
///
/// Stored values are always in the base unit; conversion only affects presentation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VolumeUnit {
    #[default]
    Gallons,
    Mmbtu,
    Liters,
}

impl VolumeUnit {
    /// Multiplier from stored values to this unit
    pub fn factor(&self) -> f64 {
        match self {
            VolumeUnit::Gallons | VolumeUnit::Mmbtu => 1.0,
            VolumeUnit::Liters => GALLONS_TO_LITERS,
        }
    }

    /// Option value used by the unit select
    pub fn as_str(&self) -> &'static str {
        match self {
            VolumeUnit::Gallons => "gallons",
            VolumeUnit::Mmbtu => "mmbtu",
            VolumeUnit::Liters => "liters",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            VolumeUnit::Gallons => "Gallons",
            VolumeUnit::Mmbtu => "MMBTU",
            VolumeUnit::Liters => "Liters",
        }
    }

    pub fn axis_title(&self) -> String {
        format!("Volume ({})", self.label())
    }
}

impl std::fmt::Display for VolumeUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VolumeUnit {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "gallons" | "gal" => Ok(VolumeUnit::Gallons),
            "mmbtu" => Ok(VolumeUnit::Mmbtu),
            "liters" | "litres" | "l" => Ok(VolumeUnit::Liters),
            other => Err(Error::Invalid {
                message: format!("Unknown volume unit: {other}"),
            }),
        }
    }
}
