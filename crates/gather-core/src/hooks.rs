//! Lifecycle callbacks the host drives.
//!
//! The host server calls these at fixed points: once at startup (and on
//! every static data reload), whenever configuration is reloaded, when a
//! player logs in or out, and once per player per simulation step. The
//! contract is plain method calls on the region thread; implementors do not
//! inherit from any host type.

use std::sync::Arc;

use gather_agents::Avatar;
use gather_types::AvatarId;

use crate::config::GatherSettings;
use crate::error::GatherError;
use crate::scheduler::ScanReport;
use crate::world::World;

/// Per-session lifecycle callbacks.
pub trait SessionHooks {
    /// Replace the configuration snapshot and re-resolve tracking bits. A
    /// pass already under way keeps the snapshot it started with.
    fn on_config_reload(&mut self, snapshot: Arc<GatherSettings>);

    /// Resolve data-derived values (tracking bits). Called at startup and
    /// after every static data reload.
    fn on_startup(&mut self);

    /// A player entered the world.
    fn on_login(&mut self, avatar: &mut Avatar);

    /// A player is leaving the world.
    fn on_logout(&mut self, avatar: &mut Avatar);

    /// Advance one player's scan countdown by `elapsed_ms`, running a scan
    /// pass when it expires.
    ///
    /// # Errors
    ///
    /// Returns [`GatherError`] only when a transaction hits a broken
    /// invariant; full bags and stale targets are reported in the
    /// [`ScanReport`].
    fn on_tick(
        &mut self,
        world: &mut dyn World,
        avatar: AvatarId,
        elapsed_ms: u32,
    ) -> Result<ScanReport, GatherError>;
}
