use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const PROFILE_SCHEMA_VERSION: u8 = 1;

/// Facility kinds a profile can build out. Discriminants are stable wire ids.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum AreaType {
    Vents,
    Security,
    WaterCollector,
    Workbench,
    Generator,
    Heating,
    Illumination,
    Lavatory,
    Stash,
    MedStation,
    NutritionUnit,
    RestSpace,
    ScavCase,
    IntelligenceCenter,
    ShootingRange,
    Library,
    BoozeGenerator,
    SolarPower,
    AirFilteringUnit,
}

impl AreaType {
    /// All area types, in build-menu order. New profiles seed one state per entry.
    pub const ALL: [AreaType; 19] = [
        AreaType::Vents,
        AreaType::Security,
        AreaType::WaterCollector,
        AreaType::Workbench,
        AreaType::Generator,
        AreaType::Heating,
        AreaType::Illumination,
        AreaType::Lavatory,
        AreaType::Stash,
        AreaType::MedStation,
        AreaType::NutritionUnit,
        AreaType::RestSpace,
        AreaType::ScavCase,
        AreaType::IntelligenceCenter,
        AreaType::ShootingRange,
        AreaType::Library,
        AreaType::BoozeGenerator,
        AreaType::SolarPower,
        AreaType::AirFilteringUnit,
    ];
}

/// Kinds of effects an area stage can grant on completion.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BonusType {
    /// Additional stash rows.
    StashRows,
    /// Percentage boost to out-of-raid energy regeneration.
    EnergyRegeneration,
    /// Percentage boost to out-of-raid hydration regeneration.
    HydrationRegeneration,
    /// Percentage boost to out-of-raid health regeneration.
    HealthRegeneration,
    /// Change to generator fuel consumption, percent (negative = cheaper).
    FuelConsumption,
    /// Flat experience awarded on completion.
    Experience,
    /// Percentage change to the scav case cooldown.
    ScavCooldown,
    /// Unlocks a crafting station feature by name.
    UnlockCraft,
    /// Text-only bonus carried for the client (e.g. visual upgrades).
    Cosmetic,
}

/// One effect granted to the profile when an area stage finishes
/// construction. `value` carries magnitudes, `name` carries unlock keys.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Bonus {
    #[serde(rename = "type")]
    pub bonus_type: BonusType,
    #[serde(default)]
    pub value: i64,
    #[serde(default)]
    pub name: Option<String>,
}

impl Bonus {
    pub fn valued(bonus_type: BonusType, value: i64) -> Self {
        Self {
            bonus_type,
            value,
            name: None,
        }
    }

    pub fn named(bonus_type: BonusType, name: &str) -> Self {
        Self {
            bonus_type,
            value: 0,
            name: Some(name.to_string()),
        }
    }
}

/// A required input item for an upgrade stage or production recipe.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ItemRequirement {
    pub template_id: String,
    #[serde(default = "default_count")]
    pub count: u32,
}

fn default_count() -> u32 {
    1
}

/// Per-level definition of an area: cost, duration, rewards.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Stage {
    /// Construction duration in seconds. 0 means the stage applies instantly.
    #[serde(default, alias = "constructionTime")]
    pub construction_time: i64,
    #[serde(default)]
    pub requirements: Vec<ItemRequirement>,
    #[serde(default)]
    pub bonuses: Vec<Bonus>,
}

/// Immutable area definition: an ordered list of stages indexed by level.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AreaTemplate {
    pub area_type: AreaType,
    /// `stages[0]` is the base (already-built) level.
    pub stages: Vec<Stage>,
}

impl AreaTemplate {
    pub fn new(area_type: AreaType) -> Self {
        Self {
            area_type,
            stages: vec![Stage {
                construction_time: 0,
                requirements: Vec::new(),
                bonuses: Vec::new(),
            }],
        }
    }

    pub fn with_stage(mut self, stage: Stage) -> Self {
        self.stages.push(stage);
        self
    }

    /// Stage definition for `level`, if the template goes that high.
    pub fn stage(&self, level: usize) -> Option<&Stage> {
        self.stages.get(level)
    }
}

/// Identity snapshot taken when an inventory item is relocated into an area slot.
/// Slot storage and stash storage are disjoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ItemSnapshot {
    pub id: String,
    pub template_id: String,
    pub count: u32,
    #[serde(default)]
    pub found_in_raid: bool,
}

/// Contents of one mount point on an area (fuel cans, water filters, ...).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SlotSnapshot {
    pub items: Vec<ItemSnapshot>,
}

/// Per-profile mutable state of one facility area.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AreaState {
    pub area_type: AreaType,
    /// Current level; starts at 0 and only ever increases one step at a time.
    pub level: usize,
    pub constructing: bool,
    /// Absolute completion time, epoch seconds. 0 when no upgrade is running.
    pub complete_time: i64,
    pub active: bool,
    #[serde(default)]
    pub slots: BTreeMap<u32, SlotSnapshot>,
}

impl AreaState {
    pub fn new(area_type: AreaType) -> Self {
        Self {
            area_type,
            level: 0,
            constructing: false,
            complete_time: 0,
            active: true,
            slots: BTreeMap::new(),
        }
    }
}

/// Immutable crafting recipe definition.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProductionRecipe {
    pub id: String,
    /// Duration in seconds. Historical data carried this under two spellings;
    /// both deserialize into this one field.
    #[serde(default, alias = "ProductionTime", alias = "productionTime")]
    pub production_time: i64,
    pub end_product: String,
    #[serde(default = "default_count")]
    pub count: u32,
    #[serde(default)]
    pub requirements: Vec<ItemRequirement>,
    /// Continuous recipes regenerate output indefinitely and consume inputs
    /// incrementally outside this crate.
    #[serde(default)]
    pub continuous: bool,
}

impl ProductionRecipe {
    pub fn new(id: &str, end_product: &str, production_time: i64) -> Self {
        Self {
            id: id.to_string(),
            production_time,
            end_product: end_product.to_string(),
            count: 1,
            requirements: Vec::new(),
            continuous: false,
        }
    }

    pub fn with_count(mut self, count: u32) -> Self {
        self.count = count;
        self
    }

    pub fn with_requirement(mut self, template_id: &str, count: u32) -> Self {
        self.requirements.push(ItemRequirement {
            template_id: template_id.to_string(),
            count,
        });
        self
    }

    pub fn continuous(mut self) -> Self {
        self.continuous = true;
        self
    }
}

/// One resolved output unit of a production job.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProductItem {
    pub id: String,
    pub template_id: String,
    #[serde(default = "default_count")]
    pub count: u32,
}

/// A running or collectible crafting job, keyed by recipe id on the profile.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProductionState {
    /// Reserved; always 0 at creation.
    pub progress: u32,
    pub in_progress: bool,
    /// Resolved outputs. Continuous jobs omit this until collection resolves
    /// it through a separate path.
    #[serde(default)]
    pub products: Option<Vec<ProductItem>>,
    pub recipe_id: String,
    pub skip_time: i64,
    /// Duration in seconds.
    pub production_time: i64,
    /// Epoch seconds at job start.
    pub start_timestamp: i64,
}

impl ProductionState {
    pub fn started(recipe_id: &str, production_time: i64, now: i64) -> Self {
        Self {
            progress: 0,
            in_progress: true,
            products: None,
            recipe_id: recipe_id.to_string(),
            skip_time: 0,
            production_time,
            start_timestamp: now,
        }
    }

    pub fn with_products(mut self, products: Vec<ProductItem>) -> Self {
        self.products = Some(products);
        self
    }
}

/// An entry in a scavcase reward pool. Higher weight, more likely.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RewardEntry {
    pub template_id: String,
    #[serde(default = "default_weight")]
    pub weight: u32,
}

fn default_weight() -> u32 {
    1
}

/// One rarity band of a scavcase reward table: roll a count in
/// `min_count..=max_count`, then pick that many entries by weight.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RewardPool {
    pub name: String,
    pub min_count: u32,
    pub max_count: u32,
    pub entries: Vec<RewardEntry>,
}

/// Weighted reward table of a scavcase recipe.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RewardTable {
    pub pools: Vec<RewardPool>,
}

/// Immutable loot-box recipe: pay the input, wait, collect a random set.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScavcaseRecipe {
    pub id: String,
    #[serde(default, alias = "ProductionTime", alias = "productionTime")]
    pub production_time: i64,
    #[serde(default)]
    pub requirements: Vec<ItemRequirement>,
    pub reward_table: RewardTable,
}

/// An inventory item instance. Composite items form a flat arena linked by
/// `parent_id`; the stash root has no parent.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ItemRecord {
    pub id: String,
    pub template_id: String,
    #[serde(default)]
    pub parent_id: Option<String>,
    #[serde(default)]
    pub slot_id: Option<String>,
    #[serde(default = "default_count")]
    pub count: u32,
    #[serde(default)]
    pub found_in_raid: bool,
}

impl ItemRecord {
    /// A bare, parentless instance with a fresh identity.
    pub fn bare(template_id: &str, count: u32, found_in_raid: bool) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            template_id: template_id.to_string(),
            parent_id: None,
            slot_id: None,
            count,
            found_in_raid,
        }
    }
}

/// Reference to an inventory item in a request payload.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ItemRef {
    pub id: String,
    #[serde(default = "default_count")]
    pub count: u32,
}

impl ItemRef {
    pub fn new(id: &str, count: u32) -> Self {
        Self {
            id: id.to_string(),
            count,
        }
    }
}
