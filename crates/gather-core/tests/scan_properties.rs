//! End-to-end scan pass tests.
//!
//! Each test builds a [`Region`] by hand, drives the engine through
//! [`SessionHooks::on_tick`], and checks the properties every pass must
//! keep: whole-bundle atomicity, one skill credit per spawn cycle,
//! tracking flags that follow skills, and no skinning over unlooted corpses.

#![allow(clippy::unwrap_used, clippy::panic, clippy::arithmetic_side_effects)]

use std::collections::BTreeSet;
use std::sync::Arc;

use gather_agents::Avatar;
use gather_core::{
    AutoGather, GatherSettings, Region, ScanReport, ScanSkip, SessionHooks, World,
};
use gather_data::{StaticData, StaticDataStore};
use gather_types::{
    AvatarId, CorpseId, CorpseState, CreatureEntry, GameObjectType, ItemEntry, ItemStack, LockId,
    LootBundle, LootTableId, MapId, NodeId, NodeState, Position, ResourceNode, SkillType,
    TrackingFlags, TransactionOutcome,
};

const DATA: &str = r"
items:
  - { entry: 2447, name: Peacebloom, max_stack: 20 }
  - { entry: 2770, name: Copper Ore, max_stack: 20 }
  - { entry: 2318, name: Light Leather, max_stack: 20 }
  - { entry: 2589, name: Linen Cloth, max_stack: 20 }
locks:
  - id: 29
    cases:
      - { key_type: skill, lock_type: herbalism, skill: 1 }
  - id: 38
    cases:
      - { key_type: skill, lock_type: mining, skill: 1 }
spells:
  - { id: 2383, name: Find Herbs, effects: [ { misc_value: 2 } ] }
  - { id: 2580, name: Find Minerals, effects: [ { misc_value: 3 } ] }
creatures:
  - { entry: 2956, name: Adult Plainstrider, skin_loot: 2956 }
  - { entry: 721, name: Rabbit, creature_type: critter, skin_loot: 2956 }
  - entry: 4028
    name: Charred Ancient
    skin_loot: 2956
    type_flags: { skin_with_herbalism: true }
loot:
  - id: 1414
    entries:
      - { item: 2447, chance: 100.0, min_count: 2, max_count: 2 }
  - id: 1505
    entries:
      - { item: 2770, chance: 100.0, min_count: 3, max_count: 3 }
    money_min: 7
    money_max: 7
  - id: 2956
    entries:
      - { item: 2318, chance: 100.0, min_count: 1, max_count: 1 }
";

const HERB_BIT: u32 = 0b10;
const MINERAL_BIT: u32 = 0b100;
const PEACEBLOOM: ItemEntry = ItemEntry(2447);
const COPPER_ORE: ItemEntry = ItemEntry(2770);
const LIGHT_LEATHER: ItemEntry = ItemEntry(2318);
const LINEN: ItemEntry = ItemEntry(2589);

fn data() -> StaticDataStore {
    StaticDataStore::parse(DATA).unwrap()
}

/// Settings with yellow skill-ups made certain so progression is observable.
fn settings() -> GatherSettings {
    let mut settings = GatherSettings::default();
    settings.skill_gain.chance_yellow = 100;
    settings.skill_gain.chance_green = 100;
    settings
}

fn engine(settings: GatherSettings) -> AutoGather<StaticDataStore> {
    let mut engine = AutoGather::new(Arc::new(settings), Arc::new(data()), 99);
    engine.on_startup();
    engine
}

fn here() -> Position {
    Position::new(MapId(0), 0.0, 0.0, 0.0)
}

fn near(x: f32) -> Position {
    Position::new(MapId(0), x, 0.0, 0.0)
}

fn avatar(skills: &[(SkillType, u32)], slots: usize) -> Avatar {
    let mut avatar = Avatar::new("Gatherer", here(), slots);
    for &(skill, value) in skills {
        avatar.skills.learn(skill, value, 300);
    }
    avatar
}

fn node(lock: u32, loot: u32, x: f32) -> ResourceNode {
    ResourceNode {
        id: NodeId::new(),
        name: String::from("Node"),
        kind: GameObjectType::Chest,
        position: near(x),
        phase_mask: 1,
        spawned: true,
        state: NodeState::Ready,
        lock: Some(LockId(lock)),
        loot: Some(LootTableId(loot)),
        respawn_delay_ms: 5_000,
        respawn_remaining_ms: 0,
        skillup_credited: BTreeSet::new(),
    }
}

fn killed(region: &mut Region, entry: u32, level: u32, loot: LootBundle) -> CorpseId {
    let data = data();
    let template = data.creature_template(CreatureEntry(entry)).unwrap();
    let mut corpse = template.spawn(near(1.0), 1, level);
    corpse.die(loot);
    region.add_corpse(corpse)
}

fn linen(count: u32) -> LootBundle {
    LootBundle {
        items: vec![ItemStack::new(LINEN, count)],
        money: 0,
    }
}

/// Run one pass right now, whatever the countdown says.
fn pass(engine: &mut AutoGather<StaticDataStore>, region: &mut Region, id: AvatarId) -> ScanReport {
    if let Some(a) = region.avatar_mut(id) {
        a.scan_state = None;
    }
    engine.on_tick(region, id, 0).unwrap()
}

fn the_avatar(region: &Region, id: AvatarId) -> &Avatar {
    region.avatar(id).unwrap()
}

fn fill_bags(region: &mut Region, id: AvatarId) {
    let a = region.avatar_mut(id).unwrap();
    let slots = a.bags.slot_count();
    for _ in 0..slots {
        a.bags.store(&[ItemStack::new(LINEN, 20)], |_| Some(20)).unwrap();
    }
}

// ---------------------------------------------------------------------------
// Scenarios
// ---------------------------------------------------------------------------

#[test]
fn scenario_a_harvest_with_room() {
    let mut e = engine(settings());
    let mut region = Region::new();
    let id = region.add_avatar(avatar(&[(SkillType::Herbalism, 50)], 8));
    let herb = region.add_node(node(29, 1414, 3.0));

    let report = pass(&mut e, &mut region, id);
    assert_eq!(report.node, Some(TransactionOutcome::Success));

    assert_eq!(region.node(herb).unwrap().state, NodeState::Deactivated);
    let a = the_avatar(&region, id);
    assert_eq!(a.bags.count_of(PEACEBLOOM), 2);
    assert_eq!(a.skills.pure_value(SkillType::Herbalism), 51);
}

#[test]
fn scenario_b_full_bags_leave_node_ready() {
    let mut e = engine(settings());
    let mut region = Region::new();
    let id = region.add_avatar(avatar(&[(SkillType::Herbalism, 50)], 2));
    fill_bags(&mut region, id);
    let herb = region.add_node(node(29, 1414, 3.0));
    let before = the_avatar(&region, id).bags.clone();

    let report = pass(&mut e, &mut region, id);
    assert_eq!(report.node, Some(TransactionOutcome::BagFull));
    assert_eq!(region.node(herb).unwrap().state, NodeState::Ready);
    let a = the_avatar(&region, id);
    assert_eq!(a.bags, before);
    assert_eq!(a.skills.pure_value(SkillType::Herbalism), 50);
}

#[test]
fn full_bags_leave_corpse_skinnable_and_undecayed() {
    let mut e = engine(settings());
    let mut region = Region::new();
    let id = region.add_avatar(avatar(&[(SkillType::Skinning, 40)], 2));
    fill_bags(&mut region, id);
    let corpse = killed(&mut region, 2956, 5, LootBundle::empty());
    assert_eq!(region.corpse(corpse).unwrap().state, CorpseState::DeadSkinnable);
    let before = the_avatar(&region, id).bags.clone();

    let report = pass(&mut e, &mut region, id);
    assert_eq!(report.corpse, Some(TransactionOutcome::BagFull));
    let a = the_avatar(&region, id);
    assert_eq!(a.bags, before);
    assert_eq!(a.money, 0);
    assert_eq!(a.skills.pure_value(SkillType::Skinning), 40);

    let c = region.corpse(corpse).unwrap();
    assert_eq!(c.state, CorpseState::DeadSkinnable);
    assert!(c.skillup_credited.is_empty());
    assert_eq!(c.decay_remaining_ms, None);

    let events = region.advance(600_000);
    assert!(events.decayed.is_empty());
    assert!(region.corpse(corpse).is_some());
}

#[test]
fn scenario_c_unlooted_corpse_is_not_skinned() {
    let mut e = engine(settings());
    let mut region = Region::new();
    let id = region.add_avatar(avatar(&[(SkillType::Skinning, 100)], 8));
    let corpse = killed(&mut region, 2956, 5, linen(2));

    let report = pass(&mut e, &mut region, id);
    assert_eq!(report.corpse, None);
    let c = region.corpse(corpse).unwrap();
    assert_eq!(c.state, CorpseState::DeadLootable);
    assert_eq!(the_avatar(&region, id).bags.count_of(LIGHT_LEATHER), 0);
}

#[test]
fn scenario_d_unskilled_corpse_ineligible_and_tracking_cleared() {
    let mut e = engine(settings());
    let mut region = Region::new();
    let mut miner = avatar(&[(SkillType::Mining, 40)], 8);
    miner.tracking.set(HERB_BIT);
    let id = region.add_avatar(miner);
    // Skinned with herbalism, level 15 needs 50.
    let corpse = killed(&mut region, 4028, 15, LootBundle::empty());

    let report = pass(&mut e, &mut region, id);
    assert_eq!(report.corpse, None);
    assert_eq!(region.corpse(corpse).unwrap().state, CorpseState::DeadSkinnable);
    let a = the_avatar(&region, id);
    assert!(!a.tracking.has(HERB_BIT));
    assert!(a.tracking.has(MINERAL_BIT));
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

#[test]
fn transactions_are_all_or_nothing() {
    // Copper node drops 3 ore and 7 copper. Sweep free space from none to
    // plenty; every pass either delivers everything and deactivates, or
    // delivers nothing and leaves the node ready.
    for free_units in [0_u32, 1, 2, 3, 4, 25] {
        let mut e = engine(settings());
        let mut region = Region::new();
        let id = region.add_avatar(avatar(&[(SkillType::Mining, 10)], 2));
        {
            let a = region.avatar_mut(id).unwrap();
            a.bags.store(&[ItemStack::new(LINEN, 20)], |_| Some(20)).unwrap();
            let ore_in_bag = 20_u32.saturating_sub(free_units);
            if free_units < 20 {
                a.bags.store(&[ItemStack::new(COPPER_ORE, ore_in_bag)], |_| Some(20)).unwrap();
            }
        }
        let vein = region.add_node(node(38, 1505, 2.0));
        let before = the_avatar(&region, id).clone();

        let report = pass(&mut e, &mut region, id);
        let after = the_avatar(&region, id);
        let state = region.node(vein).unwrap().state;
        match report.node {
            Some(TransactionOutcome::Success) => {
                assert_eq!(state, NodeState::Deactivated);
                assert_eq!(
                    after.bags.count_of(COPPER_ORE),
                    before.bags.count_of(COPPER_ORE) + 3
                );
                assert_eq!(after.money, before.money + 7);
            }
            Some(TransactionOutcome::BagFull) => {
                assert_eq!(state, NodeState::Ready);
                assert_eq!(after.bags, before.bags);
                assert_eq!(after.money, before.money);
                assert!(free_units < 3);
            }
            other => panic!("unexpected outcome {other:?} with {free_units} free"),
        }
    }
}

#[test]
fn node_credits_skill_once_per_spawn_cycle() {
    let mut e = engine(settings());
    let mut region = Region::new();
    let id = region.add_avatar(avatar(&[(SkillType::Herbalism, 50)], 16));
    let herb = region.add_node(node(29, 1414, 3.0));

    for _ in 0..4 {
        let _ = pass(&mut e, &mut region, id);
        // Reopen without a respawn: same spawn cycle.
        region.node_mut(herb).unwrap().state = NodeState::Ready;
    }
    let a = the_avatar(&region, id);
    assert_eq!(a.bags.count_of(PEACEBLOOM), 8);
    assert_eq!(a.skills.pure_value(SkillType::Herbalism), 51);

    // A real respawn starts a new cycle and credits again.
    region.node_mut(herb).unwrap().deactivate();
    let _ = region.advance(5_000);
    let _ = pass(&mut e, &mut region, id);
    assert_eq!(the_avatar(&region, id).skills.pure_value(SkillType::Herbalism), 52);
}

#[test]
fn tracking_follows_skills_after_every_pass() {
    let combos: [&[(SkillType, u32)]; 4] = [
        &[],
        &[(SkillType::Herbalism, 1)],
        &[(SkillType::Mining, 1)],
        &[(SkillType::Herbalism, 1), (SkillType::Mining, 1)],
    ];
    for skills in combos {
        for initial in [0, HERB_BIT, MINERAL_BIT, HERB_BIT | MINERAL_BIT] {
            let mut e = engine(settings());
            let mut region = Region::new();
            let mut a = avatar(skills, 4);
            a.tracking = TrackingFlags(initial);
            let id = region.add_avatar(a);

            let _ = pass(&mut e, &mut region, id);
            let a = the_avatar(&region, id);
            assert_eq!(a.tracking.has(HERB_BIT), a.skills.has(SkillType::Herbalism));
            assert_eq!(a.tracking.has(MINERAL_BIT), a.skills.has(SkillType::Mining));
        }
    }
}

#[test]
fn losing_a_skill_clears_its_flag_next_pass() {
    let mut e = engine(settings());
    let mut region = Region::new();
    let id = region.add_avatar(avatar(&[(SkillType::Herbalism, 1), (SkillType::Mining, 1)], 4));
    let _ = pass(&mut e, &mut region, id);
    assert!(the_avatar(&region, id).tracking.has(HERB_BIT));

    let _ = region.avatar_mut(id).unwrap().skills.unlearn(SkillType::Herbalism);
    let report = pass(&mut e, &mut region, id);
    assert_eq!(report.tracking.cleared, HERB_BIT);
    assert!(!the_avatar(&region, id).tracking.has(HERB_BIT));
}

#[test]
fn corpse_is_never_skinned_over_regular_loot() {
    let mut e = engine(settings());
    let mut region = Region::new();
    let id = region.add_avatar(avatar(&[(SkillType::Skinning, 100)], 8));
    let corpse = killed(&mut region, 2956, 5, linen(1));

    for _ in 0..5 {
        let _ = pass(&mut e, &mut region, id);
        let c = region.corpse(corpse).unwrap();
        assert_ne!(c.state, CorpseState::Skinned);
        assert!(!c.regular_loot_emptied());
    }

    let _ = region.corpse_mut(corpse).unwrap().take_regular_loot();
    let report = pass(&mut e, &mut region, id);
    assert_eq!(report.corpse, Some(TransactionOutcome::Success));
    assert_eq!(region.corpse(corpse).unwrap().state, CorpseState::Skinned);
}

#[test]
fn critter_is_skinned_despite_regular_loot() {
    let mut e = engine(settings());
    let mut region = Region::new();
    let id = region.add_avatar(avatar(&[(SkillType::Skinning, 1)], 8));
    let rabbit = killed(&mut region, 721, 1, linen(1));

    let report = pass(&mut e, &mut region, id);
    assert_eq!(report.corpse, Some(TransactionOutcome::Success));
    assert_eq!(region.corpse(rabbit).unwrap().state, CorpseState::Skinned);
    assert_eq!(the_avatar(&region, id).bags.count_of(LIGHT_LEATHER), 1);
}

// ---------------------------------------------------------------------------
// Pass shape
// ---------------------------------------------------------------------------

#[test]
fn at_most_one_node_and_one_corpse_per_pass() {
    let mut e = engine(settings());
    let mut region = Region::new();
    let id = region.add_avatar(avatar(
        &[(SkillType::Herbalism, 50), (SkillType::Skinning, 50)],
        16,
    ));
    let first = region.add_node(node(29, 1414, 2.0));
    let second = region.add_node(node(29, 1414, 4.0));
    let c1 = killed(&mut region, 2956, 5, LootBundle::empty());
    let c2 = killed(&mut region, 2956, 5, LootBundle::empty());

    let report = pass(&mut e, &mut region, id);
    assert_eq!(report.node, Some(TransactionOutcome::Success));
    assert_eq!(report.corpse, Some(TransactionOutcome::Success));
    assert_eq!(region.node(first).unwrap().state, NodeState::Deactivated);
    assert_eq!(region.node(second).unwrap().state, NodeState::Ready);
    assert_eq!(region.corpse(c1).unwrap().state, CorpseState::Skinned);
    assert_eq!(region.corpse(c2).unwrap().state, CorpseState::DeadSkinnable);

    let _ = pass(&mut e, &mut region, id);
    assert_eq!(region.node(second).unwrap().state, NodeState::Deactivated);
    assert_eq!(region.corpse(c2).unwrap().state, CorpseState::Skinned);
}

#[test]
fn bag_full_on_first_candidate_does_not_try_the_next() {
    let mut e = engine(settings());
    let mut region = Region::new();
    let id = region.add_avatar(avatar(&[(SkillType::Herbalism, 50)], 1));
    fill_bags(&mut region, id);
    let first = region.add_node(node(29, 1414, 2.0));
    // No loot table: would succeed with an empty bundle if tried.
    let mut empty = node(29, 0, 3.0);
    empty.loot = None;
    let second = region.add_node(empty);

    let report = pass(&mut e, &mut region, id);
    assert_eq!(report.node, Some(TransactionOutcome::BagFull));
    assert_eq!(region.node(first).unwrap().state, NodeState::Ready);
    assert_eq!(region.node(second).unwrap().state, NodeState::Ready);
}

#[test]
fn miner_does_not_take_herbs() {
    let mut e = engine(settings());
    let mut region = Region::new();
    let id = region.add_avatar(avatar(&[(SkillType::Mining, 300)], 8));
    let herb = region.add_node(node(29, 1414, 2.0));
    let vein = region.add_node(node(38, 1505, 3.0));

    let _ = pass(&mut e, &mut region, id);
    assert_eq!(region.node(herb).unwrap().state, NodeState::Ready);
    assert_eq!(region.node(vein).unwrap().state, NodeState::Deactivated);
}

#[test]
fn out_of_range_and_other_phase_are_ignored() {
    let mut e = engine(settings());
    let mut region = Region::new();
    let id = region.add_avatar(avatar(&[(SkillType::Herbalism, 50)], 8));
    let far = region.add_node(node(29, 1414, 10.5));
    let mut phased = node(29, 1414, 1.0);
    phased.phase_mask = 2;
    let phased = region.add_node(phased);

    let report = pass(&mut e, &mut region, id);
    assert_eq!(report.node, None);
    assert_eq!(report.stopped, None);
    assert_eq!(region.node(far).unwrap().state, NodeState::Ready);
    assert_eq!(region.node(phased).unwrap().state, NodeState::Ready);
}

#[test]
fn skinned_corpse_decays_out_of_the_region() {
    let mut settings = settings();
    settings.corpse.decay_ms = 2_000;
    let mut e = engine(settings);
    let mut region = Region::new();
    let id = region.add_avatar(avatar(&[(SkillType::Skinning, 1)], 8));
    let corpse = killed(&mut region, 2956, 1, LootBundle::empty());

    let _ = pass(&mut e, &mut region, id);
    assert_eq!(region.corpse(corpse).unwrap().decay_remaining_ms, Some(2_000));
    let events = region.advance(2_000);
    assert_eq!(events.decayed, vec![corpse]);
    assert!(region.corpse(corpse).is_none());
}

#[test]
fn logged_out_avatar_is_not_scanned() {
    let mut e = engine(settings());
    let mut region = Region::new();
    let id = region.add_avatar(avatar(&[(SkillType::Herbalism, 50)], 8));
    let herb = region.add_node(node(29, 1414, 2.0));
    let mut gone = region.remove_avatar(id).unwrap();
    e.on_logout(&mut gone);
    assert!(gone.scan_state.is_none());

    let report = e.on_tick(&mut region, id, 0).unwrap();
    assert_eq!(report.stopped, Some(ScanSkip::NotInWorld));
    assert_eq!(region.node(herb).unwrap().state, NodeState::Ready);
}
