//! Mixer error taxonomy.
//!
//! Grounded on `nethercore_zx`'s `core::analysis::AnalysisError` and
//! `nether_it::ItError`: a single `thiserror` enum covering every terminal
//! failure. Everything else (missing sample, zero increment, out-of-range
//! reverb depth) recovers silently inside the mixer and never surfaces as
//! an `Err` here.

/// Errors returned by the mixer's lifecycle entry points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum MixerError {
    /// An allocation request in `Init`, `PlayStart`, or `SetNumVoices`
    /// could not be satisfied (size overflow, or zero voices requested
    /// where at least one is required).
    #[error("failed to allocate {what}")]
    AllocationFailed {
        /// What was being allocated, for diagnostics (e.g. "voice table").
        what: &'static str,
    },

    /// `WriteSamples` or `PlayStart` was called before `Init`.
    #[error("mixer used before Init()")]
    NotInitialized,

    /// `WriteSamples` was called before `PlayStart` (or after `PlayStop`).
    #[error("mixer used before PlayStart() or after PlayStop()")]
    PlaybackNotStarted,
}

/// Convenience alias for the mixer's fallible lifecycle operations.
pub type Result<T> = std::result::Result<T, MixerError>;
