use std::collections::HashSet;

use sysinfo::{ProcessesToUpdate, System};
use tokio::sync::mpsc;
use tokio::time::{interval, Duration, MissedTickBehavior};
use tracing::debug;

use crate::event::DaemonEvent;

/// Polls the OS process list on a fixed interval and reports the detection
/// result as a [`DaemonEvent::Detection`] EVERY tick, not just on change.
/// The state machine decides whether a tick is a transition or a no-op; the
/// unconditional events are what make a failed profile switch retry itself
/// on the next poll without any dedicated retry machinery.
///
/// Enumeration problems never surface here: entries sysinfo cannot read are
/// simply absent from the table, and an empty or partial table degrades to
/// "not detected". Staying in Desktop mode is safer than killing the loop.
pub async fn run(watch_list: Vec<String>, poll_interval_secs: u64, tx: mpsc::Sender<DaemonEvent>) {
    let mut sys = System::new();
    let mut ticker = interval(Duration::from_secs(poll_interval_secs));
    // A slow cycle (blocked hardware call downstream) must not cause a
    // burst of catch-up ticks afterwards.
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;

        sys.refresh_processes(ProcessesToUpdate::All, true);
        let running: HashSet<String> = sys
            .processes()
            .values()
            .map(|p| p.name().to_string_lossy().into_owned())
            .collect();
        let matched = first_match(&running, &watch_list);

        debug!(detected = matched.is_some(), "poll complete");
        if tx.send(DaemonEvent::Detection { matched }).await.is_err() {
            break; // event loop is gone; nothing left to report to
        }
    }
}

/// Returns the first watch-list entry that names a running process. If
/// several watched executables are running at once, the first match in
/// config order wins.
///
/// Comparison is exact string equality: no path normalization, no wildcard,
/// and no case folding, so the configured name must match the process image
/// name verbatim.
fn first_match(running: &HashSet<String>, watch_list: &[String]) -> Option<String> {
    watch_list.iter().find(|name| running.contains(*name)).cloned()
}
