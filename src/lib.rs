//! # Hideout - base-building and crafting engine for persistent player profiles
//!
//! Hideout implements the facility subsystem of a game profile service:
//! constructing and upgrading facility areas, running timed crafting
//! ("production") jobs, resolving loot-box style scavcase rewards, and moving
//! items between the stash and facility slots.
//!
//! ## Design
//!
//! - Every operation takes the read-only [`templates::TemplateDb`] and the
//!   owning [`profile::Profile`] by mutable reference, and returns a
//!   [`ledger::TransactionLedger`] describing the item diff (or a typed
//!   [`errors::HideoutError`]).
//! - There is no scheduler. Timers are absolute epoch-second stamps checked
//!   lazily ([`areas::is_construction_complete`],
//!   [`production::is_production_ready`]) whenever a caller asks.
//! - Profiles are single-writer. [`storage::ProfileStore::with_profile`]
//!   serializes mutations per profile id; run every operation through it when
//!   the store is in play.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use hideout::config::HideoutConfig;
//! use hideout::profile::Profile;
//! use hideout::storage::ProfileStore;
//! use hideout::templates::TemplateDb;
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = HideoutConfig::load("hideout.toml")?;
//!     let templates = TemplateDb::load_from_dir(&config.seeds_dir)?;
//!     let store = ProfileStore::open(&config.data_dir)?;
//!
//!     store.put_profile(Profile::new("alice"))?;
//!     let ledger = store.with_profile("alice", |profile| {
//!         hideout::production::take_production(&templates, profile, "craft-wire")
//!     })?;
//!     println!("collected {} items", ledger.new.len());
//!     Ok(())
//! }
//! ```

pub mod areas;
pub mod config;
pub mod errors;
pub mod inventory;
pub mod ledger;
pub mod presets;
pub mod production;
pub mod profile;
pub mod scavcase;
pub mod storage;
pub mod templates;
pub mod types;

pub use areas::{
    add_item_to_area_slot, complete_upgrade, is_construction_complete, start_upgrade,
    take_item_from_area_slot, toggle_area,
};
pub use config::HideoutConfig;
pub use errors::{HideoutError, ItemShortfall};
pub use inventory::{ConsumePolicy, RemovalOutcome};
pub use ledger::TransactionLedger;
pub use presets::{PresetNode, PresetRecord};
pub use production::{
    is_production_ready, start_continuous_production, start_scavcase_production,
    start_single_production, take_production,
};
pub use profile::Profile;
pub use scavcase::generate_rewards;
pub use storage::{ProfileStore, ProfileStoreBuilder};
pub use templates::TemplateDb;
pub use types::*;
