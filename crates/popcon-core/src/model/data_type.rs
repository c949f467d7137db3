use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::PopConError;

/// Closed set of strip-tracker conditions a handler can upload.
///
/// Supplied in the handler configuration instead of being inferred from
/// the payload's runtime type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataType {
    #[default]
    Undefined,
    Cabling,
    Pedestal,
    Noise,
    Threshold,
    BadStrip,
}

impl DataType {
    /// Stable lowercase name used in configuration and logs
    pub fn as_str(&self) -> &'static str {
        match self {
            DataType::Undefined => "undefined",
            DataType::Cabling => "cabling",
            DataType::Pedestal => "pedestal",
            DataType::Noise => "noise",
            DataType::Threshold => "threshold",
            DataType::BadStrip => "bad_strip",
        }
    }

    /// Conditions record the payload is registered under
    pub fn record_name(&self) -> Option<&'static str> {
        match self {
            DataType::Undefined => None,
            DataType::Cabling => Some("SiStripFedCablingRcd"),
            DataType::Pedestal => Some("SiStripPedestalsRcd"),
            DataType::Noise => Some("SiStripNoisesRcd"),
            DataType::Threshold => Some("SiStripThresholdRcd"),
            DataType::BadStrip => Some("SiStripBadStripRcd"),
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DataType {
    type Err = PopConError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "undefined" => Ok(DataType::Undefined),
            "cabling" => Ok(DataType::Cabling),
            "pedestal" => Ok(DataType::Pedestal),
            "noise" => Ok(DataType::Noise),
            "threshold" => Ok(DataType::Threshold),
            "bad_strip" => Ok(DataType::BadStrip),
            other => Err(PopConError::InvalidConfig {
                reason: format!("unknown data_type '{}'", other),
            }),
        }
    }
}
