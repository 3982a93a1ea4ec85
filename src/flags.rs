//! Bit-per-concern flag sets.
//!
//! Mirrors `nethercore_zx::state::rollback_state::tracker_flags`: plain
//! `pub const` bit values in a namespacing module rather than a `bitflags!`
//! newtype. Both flag sets here are small, internal, and never serialized,
//! so the extra machinery a crate like `bitflags` buys isn't earning its
//! keep.

/// Per-voice sample flags (`Voice::flags`).
pub mod sample_flags {
    /// Sample data is 16-bit signed (vs. 8-bit); currently the mixer always
    /// stores `i16` PCM, so this bit is reserved for a future 8-bit sample
    /// path and has no effect on mixing today.
    pub const SF_16BITS: u16 = 1 << 0;
    /// Voice loops between `reppos` and `repend`.
    pub const SF_LOOP: u16 = 1 << 1;
    /// Loop direction flips at each endpoint (ping-pong) instead of
    /// snapping back to the loop start.
    pub const SF_BIDI: u16 = 1 << 2;
    /// Voice stops itself once it reaches `size` (no-op without `SF_LOOP`,
    /// documents one-shot playback explicitly).
    pub const SF_ONESHOT: u16 = 1 << 3;
    /// Voice is currently playing backwards. Flipped by the bidi bounce
    /// logic in [`crate::mixer::advance`]; never set directly by a caller
    /// for a voice that isn't also `SF_BIDI` or manually reversed.
    pub const SF_REVERSE: u16 = 1 << 4;
}

/// Mixer-wide configuration flags (`MixerConfig::flags`).
pub mod mixer_flags {
    /// Output is interleaved stereo; otherwise mono.
    pub const STEREO: u32 = 1 << 0;
    /// Down-convert to `i16` (default path unless `FLOAT` is set); if
    /// neither this nor `FLOAT` is set the output is `u8`.
    pub const SIXTEEN_BITS: u32 = 1 << 1;
    /// Down-convert to `f32`, overrides `SIXTEEN_BITS`.
    pub const FLOAT: u32 = 1 << 2;
    /// Use linear interpolation mixers instead of nearest-neighbour.
    pub const INTERP: u32 = 1 << 3;
    /// Allow `pan == PAN_SURROUND` voices to invert phase (Dolby matrix).
    pub const SURROUND: u32 = 1 << 4;
    /// Enable the one-pole noise-reduction lowpass post-filter.
    pub const NOISEREDUCTION: u32 = 1 << 5;
    /// Use SIMD down-converters where built in.
    pub const SIMDMIXER: u32 = 1 << 6;
    /// Drive the sequencer callback from the mixer's own tick counter.
    pub const SOFT_MUSIC: u32 = 1 << 7;
    /// Delegate to a higher-quality mixer (out of scope for this crate;
    /// recognised only so callers porting flag values don't need to mask
    /// it out themselves).
    pub const HQMIXER: u32 = 1 << 8;
}
