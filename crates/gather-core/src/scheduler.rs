//! The per-avatar scan scheduler.
//!
//! [`AutoGather`] implements [`SessionHooks`]. Each tick counts an avatar's
//! countdown down; when it runs out the countdown is reset to the scan
//! interval and one pass runs:
//!
//! 1. Gating: the avatar must be alive, out of combat (unless allowed),
//!    not flying or on a taxi, not on a vehicle, not mid-cast, and not
//!    stunned, confused, or fleeing.
//! 2. Tracking flags are synchronized (when `AutoTrack` is on).
//! 3. The pass stops if the avatar has no gathering skill, if `AutoLoot`
//!    is off, or if the avatar is mounted and mounted looting is off.
//! 4. At most one node and one corpse are attempted: the first eligible
//!    candidate of each kind, in discovery order. Whatever that attempt
//!    returns, no other candidate of the same kind is tried this pass.

use std::sync::Arc;

use gather_agents::Avatar;
use gather_data::{StaticData, TrackingBits, resolve_tracking_bits};
use gather_types::{
    AvatarId, NotificationKind, PlayerScanState, SkillType, TransactionOutcome,
};
use rand::SeedableRng;
use rand::rngs::SmallRng;
use tracing::{debug, info};

use crate::config::{GatherConfig, GatherSettings};
use crate::eligibility::{evaluate_corpse, evaluate_node};
use crate::error::GatherError;
use crate::hooks::SessionHooks;
use crate::tracking::{TrackingChange, sync_tracking};
use crate::transaction::LootTransaction;
use crate::world::World;

/// Login announcement text.
pub const ANNOUNCE_MESSAGE: &str =
    "[Auto-Gather] Module active. Gathering nodes and skinnable creatures will be auto-collected.";

/// Why a tick did not run (or finish) a pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanSkip {
    /// `Enable` is off.
    Disabled,
    /// The avatar is unknown or not in the world.
    NotInWorld,
    /// The countdown has not run out.
    Waiting,
    /// The avatar is dead.
    Dead,
    /// The avatar is in combat and combat scanning is off.
    InCombat,
    /// The avatar is flying or on a taxi.
    Flying,
    /// The avatar is on a vehicle.
    OnVehicle,
    /// The avatar is casting a spell with a cast bar.
    Casting,
    /// The avatar is stunned, confused, or fleeing.
    Incapacitated,
    /// The avatar has no herbalism, mining, or skinning.
    NoGatheringSkill,
    /// `AutoLoot` is off.
    AutoLootDisabled,
    /// The avatar is mounted and mounted looting is off.
    Mounted,
}

/// What one tick did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScanReport {
    /// Whether the countdown ran out and a pass started.
    pub scanned: bool,
    /// Why the pass did not run to the candidate stage, if it did not.
    pub stopped: Option<ScanSkip>,
    /// Tracking flags changed by this pass.
    pub tracking: TrackingChange,
    /// Outcome of the node attempt, if one was made.
    pub node: Option<TransactionOutcome>,
    /// Outcome of the corpse attempt, if one was made.
    pub corpse: Option<TransactionOutcome>,
}

impl ScanReport {
    const fn skipped(reason: ScanSkip) -> Self {
        Self {
            scanned: false,
            stopped: Some(reason),
            tracking: TrackingChange { set: 0, cleared: 0 },
            node: None,
            corpse: None,
        }
    }

    const fn stop(mut self, reason: ScanSkip) -> Self {
        self.stopped = Some(reason);
        self
    }
}

/// The auto-gather scan engine.
#[derive(Debug)]
pub struct AutoGather<D: StaticData> {
    settings: Arc<GatherSettings>,
    tracking_bits: Arc<TrackingBits>,
    data: Arc<D>,
    rng: SmallRng,
}

impl<D: StaticData> AutoGather<D> {
    /// Build an engine. Tracking bits stay unresolved until
    /// [`on_startup`](SessionHooks::on_startup) runs.
    pub fn new(settings: Arc<GatherSettings>, data: Arc<D>, seed: u64) -> Self {
        Self {
            settings,
            tracking_bits: Arc::new(TrackingBits::default()),
            data,
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    /// The configuration snapshot in effect.
    pub const fn settings(&self) -> &Arc<GatherSettings> {
        &self.settings
    }

    /// The resolved tracking bits in effect.
    pub const fn tracking_bits(&self) -> &Arc<TrackingBits> {
        &self.tracking_bits
    }

    /// The static data in effect.
    pub const fn data(&self) -> &Arc<D> {
        &self.data
    }

    /// Swap in reloaded static data and re-resolve tracking bits.
    pub fn replace_data(&mut self, data: Arc<D>) {
        self.data = data;
        self.on_startup();
    }

    /// Parse, validate, and apply a configuration document.
    ///
    /// # Errors
    ///
    /// Returns [`GatherError::Config`] if the document is rejected; the
    /// current snapshot stays in effect.
    pub fn reload_config(&mut self, yaml: &str) -> Result<(), GatherError> {
        let settings = GatherSettings::parse(yaml)?;
        self.on_config_reload(Arc::new(settings));
        Ok(())
    }
}

impl<D: StaticData> SessionHooks for AutoGather<D> {
    fn on_config_reload(&mut self, snapshot: Arc<GatherSettings>) {
        let cfg = snapshot.auto_gather;
        info!(
            enable = cfg.enable,
            auto_track = cfg.auto_track,
            auto_loot = cfg.auto_loot,
            loot_range = cfg.loot_range,
            scan_interval_ms = cfg.scan_interval_ms,
            "auto-gather configuration loaded"
        );
        self.settings = snapshot;
        self.on_startup();
    }

    fn on_startup(&mut self) {
        self.tracking_bits = Arc::new(resolve_tracking_bits(&*self.data));
    }

    fn on_login(&mut self, avatar: &mut Avatar) {
        avatar.scan_state = Some(PlayerScanState::default());
        let cfg = &self.settings.auto_gather;
        if cfg.enable && cfg.announce {
            avatar.notify(NotificationKind::System {
                text: String::from(ANNOUNCE_MESSAGE),
            });
        }
    }

    fn on_logout(&mut self, avatar: &mut Avatar) {
        avatar.scan_state = None;
    }

    fn on_tick(
        &mut self,
        world: &mut dyn World,
        avatar_id: AvatarId,
        elapsed_ms: u32,
    ) -> Result<ScanReport, GatherError> {
        let settings = Arc::clone(&self.settings);
        let bits = Arc::clone(&self.tracking_bits);
        let cfg = &settings.auto_gather;
        if !cfg.enable {
            return Ok(ScanReport::skipped(ScanSkip::Disabled));
        }

        let Some(avatar) = world.avatar_mut(avatar_id) else {
            return Ok(ScanReport::skipped(ScanSkip::NotInWorld));
        };
        if !countdown_expired(avatar, elapsed_ms, cfg.scan_interval_ms) {
            return Ok(ScanReport::skipped(ScanSkip::Waiting));
        }

        let mut report = ScanReport {
            scanned: true,
            ..ScanReport::default()
        };
        if let Some(reason) = gate(avatar, cfg) {
            debug!(avatar = %avatar_id, reason = ?reason, "scan pass gated");
            return Ok(report.stop(reason));
        }

        if cfg.auto_track {
            report.tracking = sync_tracking(avatar, &bits);
        }

        if !avatar.skills.has_any_gathering() {
            return Ok(report.stop(ScanSkip::NoGatheringSkill));
        }
        if !cfg.auto_loot {
            return Ok(report.stop(ScanSkip::AutoLootDisabled));
        }
        if !cfg.allow_while_mounted && avatar.conditions.mounted {
            return Ok(report.stop(ScanSkip::Mounted));
        }

        let scans_nodes =
            avatar.skills.has(SkillType::Herbalism) || avatar.skills.has(SkillType::Mining);
        let data: &D = &self.data;
        let rng = &mut self.rng;
        let tx = LootTransaction::new(
            data,
            &settings.skill_gain,
            cfg.loot_range,
            settings.corpse.decay_ms,
        );

        if scans_nodes {
            report.node = harvest_first_node(world, data, &tx, avatar_id, cfg.loot_range, rng)?;
        }
        report.corpse = skin_first_corpse(world, &tx, avatar_id, cfg.loot_range, rng)?;

        debug!(
            avatar = %avatar_id,
            node = ?report.node,
            corpse = ?report.corpse,
            "scan pass complete"
        );
        Ok(report)
    }
}

/// Count the avatar's countdown down. Returns `true` (and resets it) when
/// it has run out.
fn countdown_expired(avatar: &mut Avatar, elapsed_ms: u32, interval_ms: u32) -> bool {
    let state = avatar.scan_state.get_or_insert_with(PlayerScanState::default);
    if elapsed_ms < state.remaining_ms {
        state.remaining_ms = state.remaining_ms.saturating_sub(elapsed_ms);
        return false;
    }
    state.remaining_ms = interval_ms;
    true
}

/// The first condition that blocks a pass, if any.
fn gate(avatar: &Avatar, cfg: &GatherConfig) -> Option<ScanSkip> {
    let c = &avatar.conditions;
    if !avatar.in_world {
        Some(ScanSkip::NotInWorld)
    } else if !c.alive {
        Some(ScanSkip::Dead)
    } else if c.in_combat && !cfg.allow_in_combat {
        Some(ScanSkip::InCombat)
    } else if c.flying || c.in_taxi_flight {
        Some(ScanSkip::Flying)
    } else if c.on_vehicle {
        Some(ScanSkip::OnVehicle)
    } else if avatar.is_casting_non_instant() {
        Some(ScanSkip::Casting)
    } else if avatar.is_incapacitated() {
        Some(ScanSkip::Incapacitated)
    } else {
        None
    }
}

fn harvest_first_node<D: StaticData + ?Sized>(
    world: &mut dyn World,
    data: &D,
    tx: &LootTransaction<'_, D>,
    avatar_id: AvatarId,
    range: f32,
    rng: &mut SmallRng,
) -> Result<Option<TransactionOutcome>, GatherError> {
    let Some(avatar) = world.avatar(avatar_id) else {
        return Ok(None);
    };
    let candidates = world.nodes_near(&avatar.position, avatar.phase_mask, range);
    for node_id in candidates {
        let requirement = match (world.node(node_id), world.avatar(avatar_id)) {
            (Some(node), Some(avatar)) => evaluate_node(data, node, avatar, range),
            _ => None,
        };
        if let Some(requirement) = requirement {
            return tx
                .harvest_node(world, avatar_id, node_id, requirement, rng)
                .map(Some);
        }
    }
    Ok(None)
}

fn skin_first_corpse<D: StaticData + ?Sized>(
    world: &mut dyn World,
    tx: &LootTransaction<'_, D>,
    avatar_id: AvatarId,
    range: f32,
    rng: &mut SmallRng,
) -> Result<Option<TransactionOutcome>, GatherError> {
    let Some(avatar) = world.avatar(avatar_id) else {
        return Ok(None);
    };
    let candidates = world.corpses_near(&avatar.position, avatar.phase_mask, range);
    for corpse_id in candidates {
        let eligible = match (world.corpse(corpse_id), world.avatar(avatar_id)) {
            (Some(corpse), Some(avatar)) => evaluate_corpse(corpse, avatar, range),
            _ => false,
        };
        if eligible {
            return tx.skin_corpse(world, avatar_id, corpse_id, rng).map(Some);
        }
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use gather_agents::CastKind;
    use gather_data::{FIND_HERBS, FIND_MINERALS, SpellEffect, SpellEntry, StaticDataStore};
    use gather_types::{MapId, Position, ResourceCategory};

    use super::*;
    use crate::region::Region;

    fn data() -> StaticDataStore {
        let mut store = StaticDataStore::new();
        for (id, misc_value) in [(FIND_HERBS, 2), (FIND_MINERALS, 3)] {
            store.insert_spell(SpellEntry {
                id,
                name: String::new(),
                effects: vec![SpellEffect { misc_value }],
            });
        }
        store
    }

    fn engine(settings: GatherSettings) -> AutoGather<StaticDataStore> {
        let mut engine = AutoGather::new(Arc::new(settings), Arc::new(data()), 1);
        engine.on_startup();
        engine
    }

    fn region_with_herbalist() -> (Region, AvatarId) {
        let mut region = Region::new();
        let mut avatar = Avatar::new("Sage", Position::new(MapId(0), 0.0, 0.0, 0.0), 8);
        avatar.skills.learn(SkillType::Herbalism, 10, 75);
        let id = region.add_avatar(avatar);
        (region, id)
    }

    fn tick(
        engine: &mut AutoGather<StaticDataStore>,
        region: &mut Region,
        avatar: AvatarId,
        elapsed_ms: u32,
    ) -> ScanReport {
        engine.on_tick(region, avatar, elapsed_ms).ok().unwrap_or_default()
    }

    #[test]
    fn startup_resolves_tracking_bits() {
        let e = engine(GatherSettings::default());
        assert_eq!(e.tracking_bits().bit(ResourceCategory::Herb), 0b10);
        assert_eq!(e.tracking_bits().bit(ResourceCategory::Mineral), 0b100);
    }

    #[test]
    fn first_tick_scans_then_waits_for_interval() {
        let mut e = engine(GatherSettings::default());
        let (mut region, avatar) = region_with_herbalist();

        assert!(tick(&mut e, &mut region, avatar, 0).scanned);
        let waiting = tick(&mut e, &mut region, avatar, 400);
        assert_eq!(waiting.stopped, Some(ScanSkip::Waiting));
        assert_eq!(tick(&mut e, &mut region, avatar, 599).stopped, Some(ScanSkip::Waiting));
        // 1 ms left; an elapsed step of 1 is not below it, so the pass runs.
        assert!(tick(&mut e, &mut region, avatar, 1).scanned);
    }

    #[test]
    fn pass_syncs_tracking_before_autoloot_check() {
        let mut settings = GatherSettings::default();
        settings.auto_gather.auto_loot = false;
        let mut e = engine(settings);
        let (mut region, avatar) = region_with_herbalist();

        let report = tick(&mut e, &mut region, avatar, 0);
        assert_eq!(report.stopped, Some(ScanSkip::AutoLootDisabled));
        assert_eq!(report.tracking.set, 0b10);
        assert!(region.avatar(avatar).is_some_and(|a| a.tracking.has(0b10)));
    }

    #[test]
    fn no_gathering_skill_stops_after_tracking() {
        let mut e = engine(GatherSettings::default());
        let mut region = Region::new();
        let mut avatar = Avatar::new("Nobody", Position::new(MapId(0), 0.0, 0.0, 0.0), 8);
        avatar.tracking.set(0b100);
        let id = region.add_avatar(avatar);

        let report = tick(&mut e, &mut region, id, 0);
        assert_eq!(report.stopped, Some(ScanSkip::NoGatheringSkill));
        assert_eq!(report.tracking.cleared, 0b100);
    }

    #[test]
    fn gating_conditions_skip_pass() {
        let mut e = engine(GatherSettings::default());
        let (mut region, avatar) = region_with_herbalist();
        let cases: [(fn(&mut Avatar), ScanSkip); 9] = [
            (|a| a.conditions.alive = false, ScanSkip::Dead),
            (|a| a.conditions.in_combat = true, ScanSkip::InCombat),
            (|a| a.conditions.flying = true, ScanSkip::Flying),
            (|a| a.conditions.in_taxi_flight = true, ScanSkip::Flying),
            (|a| a.conditions.on_vehicle = true, ScanSkip::OnVehicle),
            (|a| a.conditions.casting = Some(CastKind::Timed), ScanSkip::Casting),
            (|a| a.conditions.stunned = true, ScanSkip::Incapacitated),
            (|a| a.conditions.confused = true, ScanSkip::Incapacitated),
            (|a| a.conditions.fleeing = true, ScanSkip::Incapacitated),
        ];
        for (apply, expected) in cases {
            if let Some(a) = region.avatar_mut(avatar) {
                a.conditions = gather_agents::Conditions::default();
                a.scan_state = None;
                apply(a);
            }
            let report = tick(&mut e, &mut region, avatar, 0);
            assert_eq!(report.stopped, Some(expected));
            assert_eq!(report.tracking, TrackingChange::default());
        }
    }

    #[test]
    fn combat_allowed_when_configured() {
        let mut settings = GatherSettings::default();
        settings.auto_gather.allow_in_combat = true;
        let mut e = engine(settings);
        let (mut region, avatar) = region_with_herbalist();
        if let Some(a) = region.avatar_mut(avatar) {
            a.conditions.in_combat = true;
        }
        assert_eq!(tick(&mut e, &mut region, avatar, 0).stopped, None);
    }

    #[test]
    fn mounted_stops_only_when_disallowed() {
        let (mut region, avatar) = region_with_herbalist();
        if let Some(a) = region.avatar_mut(avatar) {
            a.conditions.mounted = true;
        }
        let mut allowed = engine(GatherSettings::default());
        assert_eq!(tick(&mut allowed, &mut region, avatar, 0).stopped, None);

        let mut settings = GatherSettings::default();
        settings.auto_gather.allow_while_mounted = false;
        let mut denied = engine(settings);
        if let Some(a) = region.avatar_mut(avatar) {
            a.scan_state = None;
        }
        let report = tick(&mut denied, &mut region, avatar, 0);
        assert_eq!(report.stopped, Some(ScanSkip::Mounted));
    }

    #[test]
    fn disabled_module_does_nothing() {
        let mut settings = GatherSettings::default();
        settings.auto_gather.enable = false;
        let mut e = engine(settings);
        let (mut region, avatar) = region_with_herbalist();
        let report = tick(&mut e, &mut region, avatar, 0);
        assert_eq!(report.stopped, Some(ScanSkip::Disabled));
        assert!(region.avatar(avatar).is_some_and(|a| a.scan_state.is_none()));
    }

    #[test]
    fn login_announces_and_logout_drops_state() {
        let mut e = engine(GatherSettings::default());
        let mut avatar = Avatar::new("Sage", Position::new(MapId(0), 0.0, 0.0, 0.0), 8);
        e.on_login(&mut avatar);
        assert!(avatar.scan_state.is_some());
        let notes = avatar.drain_notifications();
        assert_eq!(notes.len(), 1);
        assert!(matches!(
            notes.first().map(|n| &n.kind),
            Some(NotificationKind::System { text }) if text == ANNOUNCE_MESSAGE
        ));

        e.on_logout(&mut avatar);
        assert!(avatar.scan_state.is_none());
    }

    #[test]
    fn login_is_silent_when_announce_off() {
        let mut settings = GatherSettings::default();
        settings.auto_gather.announce = false;
        let mut e = engine(settings);
        let mut avatar = Avatar::new("Sage", Position::new(MapId(0), 0.0, 0.0, 0.0), 8);
        e.on_login(&mut avatar);
        assert!(avatar.outbox.is_empty());
    }

    #[test]
    fn reload_swaps_snapshot_and_rejects_bad_config() {
        let mut e = engine(GatherSettings::default());
        let before = Arc::clone(e.settings());
        assert!(e.reload_config("AutoGather:\n  ScanIntervalMs: 250\n").is_ok());
        assert_eq!(e.settings().auto_gather.scan_interval_ms, 250);
        assert_eq!(before.auto_gather.scan_interval_ms, 1000);

        assert!(e.reload_config("AutoGather:\n  ScanIntervalMs: 0\n").is_err());
        assert_eq!(e.settings().auto_gather.scan_interval_ms, 250);
    }

    #[test]
    fn config_reload_re_resolves_bits() {
        let mut e = AutoGather::new(Arc::new(GatherSettings::default()), Arc::new(data()), 1);
        assert_eq!(e.tracking_bits().bit(ResourceCategory::Herb), 0);

        e.on_config_reload(Arc::new(GatherSettings::default()));
        assert_eq!(e.tracking_bits().bit(ResourceCategory::Herb), 0b10);
        assert_eq!(e.tracking_bits().bit(ResourceCategory::Mineral), 0b100);
    }

    #[test]
    fn data_reload_re_resolves_bits() {
        let mut e = engine(GatherSettings::default());
        let mut reloaded = data();
        let _ = reloaded.remove_spell(FIND_MINERALS);
        e.replace_data(Arc::new(reloaded));
        assert_eq!(e.tracking_bits().bit(ResourceCategory::Mineral), 0);
        assert_eq!(e.tracking_bits().bit(ResourceCategory::Herb), 0b10);
    }
}
