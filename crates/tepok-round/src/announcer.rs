//! The speech collaborator.

/// Speaks the current prompt.
///
/// Fire-and-forget: the engine never waits on speech. The engine calls
/// [`stop`](Self::stop) before every [`announce`](Self::announce), and on
/// its own whenever play is interrupted, so utterances never overlap.
pub trait Announcer: Send + 'static {
    /// Starts speaking `word`.
    fn announce(&mut self, word: &str);

    /// Cuts off any utterance in flight. Default: nothing to stop.
    fn stop(&mut self) {}
}

/// Discards every announcement.
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentAnnouncer;

impl Announcer for SilentAnnouncer {
    fn announce(&mut self, _word: &str) {}
}

/// Logs announcements through `tracing` instead of speaking them.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingAnnouncer;

impl Announcer for TracingAnnouncer {
    fn announce(&mut self, word: &str) {
        tracing::info!(%word, "announce");
    }

    fn stop(&mut self) {
        tracing::trace!("announcement stopped");
    }
}
