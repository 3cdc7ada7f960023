//! Background maintenance tasks.
//!
//! Both loops are detached units of work with best-effort semantics: they
//! log what they do and never affect in-flight moderation decisions.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

use warden_core::PendingEditRegistry;
use warden_storage::RuleCache;

/// Spawns the poll loop that picks up rule edits made by external writers
/// (the management surface, a hand-edited document).
pub fn spawn_rule_reload(cache: Arc<RuleCache>, interval: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            if cache.refresh_if_changed() {
                info!("rule set reloaded after external change");
            }
        }
    })
}

/// Spawns the periodic sweep that drops expired pending edits.
///
/// Consumption already checks expiry; the sweep only bounds the registry's
/// memory when edits are abandoned.
pub fn spawn_pending_sweep(
    registry: Arc<PendingEditRegistry>,
    interval: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            let purged = registry.purge_expired();
            if purged > 0 {
                debug!(purged, "dropped expired pending edits");
            }
        }
    })
}
