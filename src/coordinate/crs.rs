//! Coordinate Reference System handling

use std::collections::HashMap;
use std::fmt;
use lazy_static::lazy_static;
use log::debug;

use crate::errors::{ConvertError, ConvertResult};

lazy_static! {
    // Parse the alias table once, on first lookup
    static ref CRS_ALIASES: AliasTable = {
        let content = include_str!("../../crs_aliases.toml");
        AliasTable::from_str(content).unwrap_or_else(|e| {
                eprintln!("Warning: Failed to parse coordinate system aliases: {}", e);
                AliasTable::builtin()
            })
    };
}

/// Identifier for the coordinate systems used on maps of mainland China
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CoordinateSystem {
    /// WGS 84 (EPSG:4326), as reported by GPS
    WGS84,
    /// GCJ-02 "Mars coordinates"
    GCJ02,
    /// BD-09, Baidu's derivative of GCJ-02
    BD09,
    /// Any other EPSG code; recognised but not convertible
    Other(u32),
}

impl CoordinateSystem {
    /// The three systems between which coordinates can be converted
    pub const SUPPORTED: [CoordinateSystem; 3] = [
        CoordinateSystem::WGS84,
        CoordinateSystem::GCJ02,
        CoordinateSystem::BD09,
    ];

    /// Get the EPSG code for this coordinate system, if it has one
    pub fn epsg_code(&self) -> Option<u32> {
        match self {
            CoordinateSystem::WGS84 => Some(4326),
            CoordinateSystem::GCJ02 | CoordinateSystem::BD09 => None,
            CoordinateSystem::Other(code) => Some(*code),
        }
    }

    /// Short name, suitable for file names
    pub fn name(&self) -> String {
        match self {
            CoordinateSystem::WGS84 => "WGS84".to_string(),
            CoordinateSystem::GCJ02 => "GCJ02".to_string(),
            CoordinateSystem::BD09 => "BD09".to_string(),
            CoordinateSystem::Other(code) => format!("EPSG{}", code),
        }
    }

    /// Get a description of this coordinate system
    pub fn description(&self) -> String {
        match self {
            CoordinateSystem::Other(code) => format!("EPSG:{} (unsupported)", code),
            known => CRS_ALIASES.descriptions
                .get(known)
                .cloned()
                .unwrap_or_else(|| known.name()),
        }
    }

    /// Whether coordinates can be converted to or from this system
    pub fn is_supported(&self) -> bool {
        !matches!(self, CoordinateSystem::Other(_))
    }
}

impl fmt::Display for CoordinateSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoordinateSystem::Other(code) => write!(f, "EPSG:{}", code),
            known => write!(f, "{}", known.name()),
        }
    }
}

/// Lookup table from accepted names to coordinate systems
#[derive(Debug, Default)]
struct AliasTable {
    // Upper-cased alias -> system
    systems: HashMap<String, CoordinateSystem>,
    // Human readable description per system
    descriptions: HashMap<CoordinateSystem, String>,
}

impl AliasTable {
    /// Parse the alias table from a TOML string
    fn from_str(content: &str) -> ConvertResult<Self> {
        let table: toml::Table = content.parse()
            .map_err(|e| ConvertError::ConfigurationError(format!("Failed to parse TOML: {}", e)))?;

        let mut aliases = AliasTable::default();

        for system in CoordinateSystem::SUPPORTED {
            let section = match table.get(&system.name()).and_then(|v| v.as_table()) {
                Some(section) => section,
                None => {
                    return Err(ConvertError::ConfigurationError(format!(
                        "Missing alias section [{}]", system.name()
                    )))
                }
            };

            aliases.systems.insert(system.name(), system);

            if let Some(names) = section.get("aliases").and_then(|v| v.as_array()) {
                for name in names.iter().filter_map(|n| n.as_str()) {
                    aliases.systems.insert(name.trim().to_uppercase(), system);
                }
            }

            if let Some(description) = section.get("description").and_then(|v| v.as_str()) {
                aliases.descriptions.insert(system, description.to_string());
            }
        }

        Ok(aliases)
    }

    /// Canonical names only, used if the embedded table is unreadable
    fn builtin() -> Self {
        let mut aliases = AliasTable::default();
        for system in CoordinateSystem::SUPPORTED {
            aliases.systems.insert(system.name(), system);
        }
        aliases
    }
}

/// Factory for creating coordinate systems
pub struct CoordinateSystemFactory;

impl CoordinateSystemFactory {
    /// Create a coordinate system from an EPSG code
    pub fn from_epsg(epsg: u32) -> CoordinateSystem {
        match epsg {
            4326 => CoordinateSystem::WGS84,
            _ => CoordinateSystem::Other(epsg),
        }
    }

    /// Parse a coordinate system from a string (e.g. "GCJ02", "baidu", "EPSG:4326")
    ///
    /// # Arguments
    /// * `crs_str` - Name, alias or EPSG code of the coordinate system
    ///
    /// # Returns
    /// The coordinate system, or a configuration error for unknown names
    pub fn from_string(crs_str: &str) -> ConvertResult<CoordinateSystem> {
        let key = crs_str.trim().to_uppercase();

        if let Some(system) = CRS_ALIASES.systems.get(&key) {
            debug!("Resolved coordinate system '{}' to {}", crs_str, system);
            return Ok(*system);
        }

        let code = key.strip_prefix("EPSG:").unwrap_or(&key);
        match code.parse::<u32>() {
            Ok(epsg) => Ok(Self::from_epsg(epsg)),
            Err(_) => Err(ConvertError::ConfigurationError(format!(
                "Unknown coordinate system: '{}'", crs_str.trim()
            ))),
        }
    }
}
