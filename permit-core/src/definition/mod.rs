//! Policy definition: documents, version gate, and the merged model
//!
//! A policy definition starts life as one or more JSON documents
//! ([`document`]), passes the version compatibility gate ([`version`]),
//! and is merged into the immutable [`PolicyDefinition`] aggregate
//! ([`model`]) that every other component reads.

mod document;
mod loader;
mod model;
pub mod version;

pub use document::{
    AllowedVehicles, Commodity, CommodityScope, DimensionLimit, GroupClassifier, PermitType,
    PolicyDocument, PolicyDocumentBuilder, Region, SequencingRule, SizeLimits, VehicleCategory,
    VehicleType,
};
pub use loader::{load_from_directory, load_from_file};
pub use model::PolicyDefinition;
pub use version::{check_minimum, EngineVersion, ENGINE_VERSION};
