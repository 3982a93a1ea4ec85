//! In-process configuration surface.
//!
//! There is no file/CLI config loader in this crate. `MixerConfig` is a
//! plain data struct an embedder constructs directly, the way
//! `nethercore_zx::state::config` holds plain structs rather than a loader.

use crate::flags::mixer_flags;

/// Output channel layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelMode {
    /// Single interleaved channel.
    Mono,
    /// Interleaved `L, R` pairs.
    Stereo,
}

impl ChannelMode {
    /// Number of `i32` words one output frame occupies in the scratch bus.
    pub fn channels(self) -> usize {
        match self {
            ChannelMode::Mono => 1,
            ChannelMode::Stereo => 2,
        }
    }
}

/// Output sample representation produced by [`crate::mixer::convert`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleFormat {
    /// Unsigned 8-bit PCM, bias 128.
    U8,
    /// Signed 16-bit PCM, native endian.
    I16,
    /// 32-bit float, range `[-1.0, 1.0]`.
    F32,
}

impl SampleFormat {
    /// Size in bytes of one sample in this format.
    pub fn sample_bytes(self) -> usize {
        match self {
            SampleFormat::U8 => 1,
            SampleFormat::I16 => 2,
            SampleFormat::F32 => 4,
        }
    }
}

/// Construction-time and mutable runtime settings for a [`crate::Mixer`].
#[derive(Debug, Clone, Copy)]
pub struct MixerConfig {
    /// Output sample rate in Hz (`mixfreq`).
    pub mix_freq: u32,
    /// Mono or stereo output.
    pub channel_mode: ChannelMode,
    /// Output sample representation.
    pub sample_format: SampleFormat,
    /// Raw `mixer_flags` bits (`INTERP`, `SURROUND`, `NOISEREDUCTION`,
    /// `SIMDMIXER`, `SOFT_MUSIC`, ...). `STEREO`/`SIXTEEN_BITS`/`FLOAT`
    /// bits are derived from `channel_mode`/`sample_format` and ignored if
    /// set here directly.
    pub flags: u32,
    /// Reverb depth, `0..=15`; values above 15 are silently clamped.
    pub md_reverb: u8,
    /// Sequencer tempo in BPM, used to derive the per-tick sample count.
    pub bpm: u16,
}

impl MixerConfig {
    /// Whether `flag` (one of the `mixer_flags` bits) is set.
    pub fn has(&self, flag: u32) -> bool {
        self.flags & flag != 0
    }
}

impl Default for MixerConfig {
    fn default() -> Self {
        Self {
            mix_freq: 44_100,
            channel_mode: ChannelMode::Stereo,
            sample_format: SampleFormat::I16,
            flags: mixer_flags::INTERP,
            md_reverb: 0,
            bpm: 125,
        }
    }
}
