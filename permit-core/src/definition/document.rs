//! Policy document types
//!
//! A policy document is the declarative unit of configuration: permit types,
//! vehicle types, commodities, regions, vehicle sequencing, and the
//! regulatory constant blocks. Documents are camelCase JSON. One engine is
//! built from an ordered list of documents, most-general-first; see
//! [`PolicyDefinition`](super::PolicyDefinition) for the merge rule.
//!
//! Per-document validation here is purely structural (duplicate codes, empty
//! identifiers, malformed version string). Cross-reference invariants span
//! documents - an overlay may reference vehicles declared by the base - so
//! they are checked after the merge, not here.

use serde::{Deserialize, Serialize};

use crate::axle::WeightDefaults;
use crate::display::DisplayDefaults;
use crate::rules::Rule;

use super::version::EngineVersion;

/// The main policy document structure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PolicyDocument {
    /// Minimum engine version this document was written for (e.g., "0.1.0")
    #[serde(rename = "minPEVersion")]
    pub min_engine_version: String,

    /// Human-readable name
    #[serde(default)]
    pub name: String,

    /// Description of the document
    #[serde(default)]
    pub description: String,

    /// Permit type definitions
    #[serde(default)]
    pub permit_types: Vec<PermitType>,

    /// Vehicle type definitions (power units, trailers, accessories)
    #[serde(default)]
    pub vehicle_types: Vec<VehicleType>,

    /// Commodity definitions
    #[serde(default)]
    pub commodities: Vec<Commodity>,

    /// Geographic region definitions
    #[serde(default)]
    pub regions: Vec<Region>,

    /// Vehicle ordering rules (which category may follow which)
    #[serde(default)]
    pub sequencing: Vec<SequencingRule>,

    /// Display-code regulatory constants (thresholds, markers)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_defaults: Option<DisplayDefaults>,

    /// Weight-check regulatory constants (axle maxima, bridge formula)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight_defaults: Option<WeightDefaults>,
}

impl PolicyDocument {
    /// Create a new policy document builder
    pub fn builder(min_engine_version: &str) -> PolicyDocumentBuilder {
        PolicyDocumentBuilder::new(min_engine_version)
    }

    /// Parse a document from a JSON string
    pub fn from_json(json: &str) -> crate::error::Result<Self> {
        let document: PolicyDocument = serde_json::from_str(json)?;
        Ok(document)
    }

    /// Get a permit type by ID
    pub fn get_permit_type(&self, id: &str) -> Option<&PermitType> {
        self.permit_types.iter().find(|p| p.id == id)
    }

    /// Get a vehicle type by code
    pub fn get_vehicle_type(&self, code: &str) -> Option<&VehicleType> {
        self.vehicle_types.iter().find(|v| v.code == code)
    }

    /// Get a commodity by code
    pub fn get_commodity(&self, code: &str) -> Option<&Commodity> {
        self.commodities.iter().find(|c| c.code == code)
    }

    /// Get a region by code
    pub fn get_region(&self, code: &str) -> Option<&Region> {
        self.regions.iter().find(|r| r.code == code)
    }

    /// Validate the document structure
    ///
    /// Structural checks only; cross-reference invariants are enforced at
    /// merge time by [`PolicyDefinition`](super::PolicyDefinition).
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = vec![];

        if self.min_engine_version.parse::<EngineVersion>().is_err() {
            errors.push(format!(
                "minPEVersion '{}' is not a valid MAJOR.MINOR.PATCH version",
                self.min_engine_version
            ));
        }

        check_unique("permit type", self.permit_types.iter().map(|p| p.id.as_str()), &mut errors);
        check_unique("vehicle type", self.vehicle_types.iter().map(|v| v.code.as_str()), &mut errors);
        check_unique("commodity", self.commodities.iter().map(|c| c.code.as_str()), &mut errors);
        check_unique("region", self.regions.iter().map(|r| r.code.as_str()), &mut errors);

        for vehicle in &self.vehicle_types {
            if let Some(0) = vehicle.axle_units {
                errors.push(format!(
                    "vehicle type '{}' declares zero axle units",
                    vehicle.code
                ));
            }
        }

        for permit_type in &self.permit_types {
            for rule in &permit_type.rules {
                if rule.id.is_empty() {
                    errors.push(format!(
                        "permit type '{}' contains a rule with an empty id",
                        permit_type.id
                    ));
                }
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

fn check_unique<'a>(
    table: &str,
    codes: impl Iterator<Item = &'a str>,
    errors: &mut Vec<String>,
) {
    let mut seen = std::collections::HashSet::new();
    for code in codes {
        if code.is_empty() {
            errors.push(format!("{} code cannot be empty", table));
        } else if !seen.insert(code) {
            errors.push(format!("duplicate {} code: {}", table, code));
        }
    }
}

/// Builder for PolicyDocument
#[derive(Debug)]
pub struct PolicyDocumentBuilder {
    document: PolicyDocument,
}

impl PolicyDocumentBuilder {
    pub fn new(min_engine_version: &str) -> Self {
        Self {
            document: PolicyDocument {
                min_engine_version: min_engine_version.to_string(),
                name: String::new(),
                description: String::new(),
                permit_types: vec![],
                vehicle_types: vec![],
                commodities: vec![],
                regions: vec![],
                sequencing: vec![],
                display_defaults: None,
                weight_defaults: None,
            },
        }
    }

    pub fn name(mut self, name: &str) -> Self {
        self.document.name = name.to_string();
        self
    }

    pub fn add_permit_type(mut self, permit_type: PermitType) -> Self {
        self.document.permit_types.push(permit_type);
        self
    }

    pub fn add_vehicle_type(mut self, vehicle_type: VehicleType) -> Self {
        self.document.vehicle_types.push(vehicle_type);
        self
    }

    pub fn add_commodity(mut self, commodity: Commodity) -> Self {
        self.document.commodities.push(commodity);
        self
    }

    pub fn add_region(mut self, region: Region) -> Self {
        self.document.regions.push(region);
        self
    }

    pub fn add_sequencing_rule(mut self, rule: SequencingRule) -> Self {
        self.document.sequencing.push(rule);
        self
    }

    pub fn display_defaults(mut self, defaults: DisplayDefaults) -> Self {
        self.document.display_defaults = Some(defaults);
        self
    }

    pub fn weight_defaults(mut self, defaults: WeightDefaults) -> Self {
        self.document.weight_defaults = Some(defaults);
        self
    }

    pub fn build(self) -> PolicyDocument {
        self.document
    }
}

/// A permit type definition
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PermitType {
    /// Unique identifier (e.g., "TROS")
    pub id: String,

    /// Human-readable name
    pub name: String,

    /// Commodities this permit type covers; absent means "not specified",
    /// which queries treat as all and overlays leave untouched
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commodities: Option<CommodityScope>,

    /// Permittable vehicle type codes, split by role
    #[serde(default)]
    pub allowed_vehicles: AllowedVehicles,

    /// Size/weight dimension limit tables, keyed by qualifier tags
    #[serde(default)]
    pub dimension_limits: Vec<DimensionLimit>,

    /// Validation rules, evaluated in declared order
    #[serde(default)]
    pub rules: Vec<Rule>,
}

impl PermitType {
    /// Create a new permit type with empty tables
    pub fn new(id: &str, name: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            commodities: None,
            allowed_vehicles: AllowedVehicles::default(),
            dimension_limits: vec![],
            rules: vec![],
        }
    }

    /// Every vehicle code this permit type declares, power units first
    pub fn all_vehicle_codes(&self) -> impl Iterator<Item = &str> {
        self.allowed_vehicles
            .power_units
            .iter()
            .chain(self.allowed_vehicles.trailers.iter())
            .map(|s| s.as_str())
    }

    /// Whether the given commodity code is in scope for this permit type
    pub fn covers_commodity(&self, code: &str) -> bool {
        match &self.commodities {
            None | Some(CommodityScope::All) => true,
            Some(CommodityScope::Listed(codes)) => codes.iter().any(|c| c == code),
        }
    }
}

/// Commodity coverage of a permit type: everything, or a declared list
///
/// Serializes as the string `"all"` or as `{"listed": ["LOGS", ...]}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CommodityScope {
    /// All declared commodities are in scope
    #[default]
    All,
    /// Only the listed commodity codes are in scope
    Listed(Vec<String>),
}

/// Permittable vehicle codes for a permit type, split by role
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AllowedVehicles {
    /// Power unit vehicle type codes
    #[serde(default)]
    pub power_units: Vec<String>,

    /// Trailer and accessory vehicle type codes
    #[serde(default)]
    pub trailers: Vec<String>,
}

/// A vehicle type definition (power unit, trailer, or accessory)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleType {
    /// Unique code (e.g., "TRKTRAC")
    pub code: String,

    /// Human-readable name
    pub name: String,

    /// Role in a vehicle combination
    pub category: VehicleCategory,

    /// Group classifier driving the display-code letter
    pub group: GroupClassifier,

    /// Leading display-code fragment for this type (e.g., "TT")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_prefix: Option<String>,

    /// Number of axle units this type consumes in a configuration.
    /// Defaults to 2 for power units (steer + drive), 1 otherwise.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub axle_units: Option<u8>,

    /// Long-combination-vehicle types require special authorization
    #[serde(default)]
    pub lcv_only: bool,
}

impl VehicleType {
    /// Create a new vehicle type
    pub fn new(code: &str, name: &str, category: VehicleCategory, group: GroupClassifier) -> Self {
        Self {
            code: code.to_string(),
            name: name.to_string(),
            category,
            group,
            display_prefix: None,
            axle_units: None,
            lcv_only: false,
        }
    }

    /// Set the display prefix
    pub fn with_display_prefix(mut self, prefix: &str) -> Self {
        self.display_prefix = Some(prefix.to_string());
        self
    }

    /// Set the declared axle unit count
    pub fn with_axle_units(mut self, units: u8) -> Self {
        self.axle_units = Some(units);
        self
    }

    /// Mark as LCV-only
    pub fn lcv_only(mut self) -> Self {
        self.lcv_only = true;
        self
    }

    /// Axle units consumed by this type, applying the category default
    pub fn effective_axle_units(&self) -> usize {
        match self.axle_units {
            Some(n) => n as usize,
            None => match self.category {
                VehicleCategory::PowerUnit => 2,
                _ => 1,
            },
        }
    }
}

/// Role of a vehicle type in a combination
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum VehicleCategory {
    PowerUnit,
    Trailer,
    Jeep,
    Booster,
    Dolly,
}

impl std::fmt::Display for VehicleCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VehicleCategory::PowerUnit => write!(f, "powerUnit"),
            VehicleCategory::Trailer => write!(f, "trailer"),
            VehicleCategory::Jeep => write!(f, "jeep"),
            VehicleCategory::Booster => write!(f, "booster"),
            VehicleCategory::Dolly => write!(f, "dolly"),
        }
    }
}

/// Group classifier: how a vehicle type's axle units render in display codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GroupClassifier {
    /// Drive axle group: first unit steers, the rest drive
    Drive,
    /// Multisteer: every unit steers
    Multisteer,
    /// Trailer axle group
    Trailer,
    /// Booster axles
    Booster,
    /// Converter dolly
    Dolly,
    /// Jeep axles
    Jeep,
    /// Additional axle
    Additional,
}

impl GroupClassifier {
    /// One-letter group code for an axle unit of this classifier
    ///
    /// `first_unit` is true for the vehicle's leading axle unit.
    pub fn axle_letter(&self, first_unit: bool) -> char {
        match self {
            GroupClassifier::Drive => {
                if first_unit {
                    'S'
                } else {
                    'D'
                }
            }
            GroupClassifier::Multisteer => 'S',
            GroupClassifier::Trailer => 'T',
            GroupClassifier::Booster | GroupClassifier::Dolly => 'B',
            GroupClassifier::Jeep => 'J',
            GroupClassifier::Additional => 'A',
        }
    }
}

/// A commodity definition
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Commodity {
    /// Unique code (e.g., "LOGS")
    pub code: String,

    /// Human-readable name
    pub name: String,

    /// Permit types this commodity is associated with; empty means
    /// unrestricted (available wherever the permit type's scope allows)
    #[serde(default)]
    pub permit_types: Vec<String>,

    /// Multiplier applied to permittable weights when carrying this commodity
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight_factor: Option<f64>,
}

impl Commodity {
    /// Create a new commodity
    pub fn new(code: &str, name: &str) -> Self {
        Self {
            code: code.to_string(),
            name: name.to_string(),
            permit_types: vec![],
            weight_factor: None,
        }
    }

    /// Set the weight adjustment factor
    pub fn with_weight_factor(mut self, factor: f64) -> Self {
        self.weight_factor = Some(factor);
        self
    }
}

/// A geographic region definition
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Region {
    /// Unique code (e.g., "PCE")
    pub code: String,

    /// Human-readable name
    pub name: String,

    /// Description of the region
    #[serde(default)]
    pub description: String,
}

/// Which categories a vehicle category may immediately follow
///
/// An empty `follows` list means the category must lead the combination.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SequencingRule {
    /// The category being positioned
    pub category: VehicleCategory,

    /// Categories allowed immediately before it
    #[serde(default)]
    pub follows: Vec<VehicleCategory>,
}

/// A size/weight dimension limit table entry
///
/// Entries are selected by matching commodity, vehicle, and qualifier tags;
/// the entry with the most matching qualifiers wins, first declared on ties.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DimensionLimit {
    /// Qualifier tags this entry applies to (region codes, season tags);
    /// empty matches any query
    #[serde(default)]
    pub qualifiers: Vec<String>,

    /// Commodity codes this entry is restricted to; empty matches any
    #[serde(default)]
    pub commodities: Vec<String>,

    /// Vehicle type codes this entry is restricted to; empty matches any
    #[serde(default)]
    pub vehicle_types: Vec<String>,

    /// The limits themselves
    pub limits: SizeLimits,
}

/// Size and weight limits, in metres and kilograms
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SizeLimits {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub length: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
}
