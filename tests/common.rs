//! Test utilities & fixtures shared by the integration suites.

use hideout::presets::PresetRecord;
use hideout::profile::Profile;
use hideout::storage::{ProfileStore, ProfileStoreBuilder};
use hideout::templates::TemplateDb;
use hideout::types::{
    AreaTemplate, AreaType, Bonus, BonusType, ItemRecord, ItemRequirement, ProductionRecipe,
    RewardEntry, RewardPool, RewardTable, ScavcaseRecipe, Stage,
};
use tempfile::TempDir;

/// Open a throwaway profile store in a temp directory.
#[allow(dead_code)]
pub fn open_store() -> (TempDir, ProfileStore) {
    let dir = TempDir::new().expect("tempdir");
    let store = ProfileStoreBuilder::new(dir.path()).open().expect("store");
    (dir, store)
}

/// A small but complete template set: one upgradeable area, crafting
/// recipes, one scavcase recipe, one preset-backed weapon.
#[allow(dead_code)]
pub fn seeded_templates() -> TemplateDb {
    let mut db = TemplateDb::new();

    db.insert_area(
        AreaTemplate::new(AreaType::Workbench).with_stage(Stage {
            construction_time: 600,
            requirements: vec![
                ItemRequirement {
                    template_id: "bolts".into(),
                    count: 5,
                },
                ItemRequirement {
                    template_id: "duct_tape".into(),
                    count: 2,
                },
            ],
            bonuses: vec![Bonus::named(BonusType::UnlockCraft, "basic_assembly")],
        }),
    );

    db.insert_recipe(
        ProductionRecipe::new("craft-wire", "wires", 600)
            .with_count(3)
            .with_requirement("bolts", 2),
    );
    db.insert_recipe(ProductionRecipe::new("gen-water", "purified_water", 7_200).continuous());
    db.insert_recipe(ProductionRecipe::new("craft-mp-pistol", "mp_pistol", 14_400));

    db.insert_scavcase(ScavcaseRecipe {
        id: "scav-95k".to_string(),
        production_time: 8_100,
        requirements: vec![ItemRequirement {
            template_id: "roubles".into(),
            count: 95_000,
        }],
        reward_table: RewardTable {
            pools: vec![
                RewardPool {
                    name: "common".to_string(),
                    min_count: 3,
                    max_count: 5,
                    entries: vec![
                        RewardEntry {
                            template_id: "bandage".into(),
                            weight: 6,
                        },
                        RewardEntry {
                            template_id: "bolts".into(),
                            weight: 5,
                        },
                    ],
                },
                RewardPool {
                    name: "rare".to_string(),
                    min_count: 1,
                    max_count: 1,
                    entries: vec![RewardEntry {
                        template_id: "mp_pistol".into(),
                        weight: 1,
                    }],
                },
            ],
        },
    });

    db.insert_preset(
        PresetRecord::new("preset-mp-standard", "MP Standard", "mp_pistol")
            .encyclopedia()
            .with_part("mp_barrel", 0, "mod_barrel")
            .with_part("mp_mag", 0, "mod_magazine"),
    );

    db
}

/// A profile stocked with the given stacks; returns it with the item ids in
/// the same order as `stacks`.
#[allow(dead_code)]
pub fn stocked_profile(id: &str, stacks: &[(&str, u32)]) -> (Profile, Vec<String>) {
    let mut profile = Profile::new(id);
    let mut ids = Vec::new();
    for (template, count) in stacks {
        let item = ItemRecord::bare(template, *count, false);
        ids.push(item.id.clone());
        profile.stash.push(item);
    }
    (profile, ids)
}
