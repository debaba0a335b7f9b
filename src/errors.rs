use thiserror::Error;

use crate::types::AreaType;

/// A required input item that could not be consumed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemShortfall {
    /// Inventory item instance id that was requested.
    pub item_id: String,
    /// Quantity requested.
    pub requested: u32,
    /// Quantity actually available (0 when the item is missing entirely).
    pub available: u32,
}

/// Errors that can arise from hideout operations and the profile store.
#[derive(Debug, Error)]
pub enum HideoutError {
    /// No area template is registered for this area type.
    #[error("unknown area template: {0:?}")]
    UnknownAreaTemplate(AreaType),

    /// The profile has no state for this area type.
    #[error("unknown area on profile: {0:?}")]
    UnknownArea(AreaType),

    /// The target stage (current level + 1) is not defined on the template.
    #[error("stage {level} is not defined for area {area_type:?}")]
    StageUndefined { area_type: AreaType, level: usize },

    /// An upgrade is already running for this area.
    #[error("area {0:?} is already constructing")]
    UpgradeInProgress(AreaType),

    /// Completion was requested before the construction timer elapsed.
    #[error("area {area_type:?} construction completes at {ready_at}")]
    ConstructionPending { area_type: AreaType, ready_at: i64 },

    /// No production or scavcase recipe with this id.
    #[error("unknown recipe: {0}")]
    UnknownRecipe(String),

    /// A production entry for this recipe already exists on the profile.
    #[error("production already running for recipe {0}")]
    ProductionInProgress(String),

    /// One or more required input items could not be consumed.
    #[error("unable to take required items ({} short)", .shortfalls.len())]
    InsufficientItems { shortfalls: Vec<ItemShortfall> },

    /// Referenced inventory item does not exist on the profile.
    #[error("unknown inventory item: {0}")]
    UnknownItem(String),

    /// Wrapper around sled's error type.
    #[error("sled error: {0}")]
    Sled(#[from] sled::Error),

    /// Wrapper around bincode serialization and deserialization errors.
    #[error("serialization error: {0}")]
    Bincode(#[from] bincode::Error),

    /// Wrapper around IO errors (directory creation, seed files, etc.).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Returned when fetching a record that is not present.
    #[error("record not found: {0}")]
    NotFound(String),

    /// Returned when deserializing a record with an unexpected schema version.
    #[error("schema mismatch for {entity}: expected {expected}, got {found}")]
    SchemaMismatch {
        entity: &'static str,
        expected: u8,
        found: u8,
    },
}
