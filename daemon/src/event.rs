/// Events consumed by the daemon's main loop.
pub enum DaemonEvent {
    /// Result of one process-list poll. `matched` holds the first watch-list
    /// entry currently running, if any. Emitted every poll, unchanged or
    /// not, so that a transition whose hardware write failed is re-attempted
    /// on the next tick.
    Detection { matched: Option<String> },
    /// Ctrl+C received; restore the saved setting if one exists and exit.
    Shutdown,
}
