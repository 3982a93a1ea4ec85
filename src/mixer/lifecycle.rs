//! Allocation and playback lifecycle: `init`, `set_num_voices`,
//! `play_start`, `play_stop`.
//!
//! The only points in the crate that allocate, log, or can fail — the
//! hot path in `tick`/`mixers`/`advance` never does any of the three.

use crate::config::MixerConfig;
use crate::error::{MixerError, Result};
use crate::flags::mixer_flags;
use crate::voice::Voice;

use super::{Mixer, NoiseReduction, ReverbBank};

impl Mixer {
    /// Allocates a mixer for `config`, ready for `set_num_voices` and
    /// `play_start`. Mirrors `TrackerEngine::new` plus the original's
    /// `Init()` entry point.
    pub fn init(config: MixerConfig) -> Result<Self> {
        tracing::debug!(mix_freq = config.mix_freq, ?config.channel_mode, ?config.sample_format, "mixer init");
        let mut mixer = Mixer::new(config);
        mixer.initialized = true;
        Ok(mixer)
    }

    /// (Re)allocates the voice table to `count` fresh slots. Any prior
    /// voice table, including one from an earlier `set_num_voices` call,
    /// is dropped entirely rather than resized in place — a voice's
    /// frq/pan/position carry no meaning across a reallocation. `count
    /// == 0` is rejected: a mixer with no voices can never produce sound.
    pub fn set_num_voices(&mut self, count: usize) -> Result<()> {
        if !self.initialized {
            return Err(MixerError::NotInitialized);
        }
        if count == 0 {
            return Err(MixerError::AllocationFailed { what: "voice table (zero voices requested)" });
        }
        tracing::debug!(count, "set_num_voices");
        self.voices = (0..count).map(Voice::new_default).collect();
        Ok(())
    }

    /// Begins playback: allocates the scratch bus and, if configured,
    /// the reverb bank and noise-reduction filter. Safe to call again
    /// after `play_stop` to restart with the same voice table.
    pub fn play_start(&mut self) -> Result<()> {
        if !self.initialized {
            return Err(MixerError::NotInitialized);
        }
        if self.voices.is_empty() {
            return Err(MixerError::AllocationFailed { what: "voice table (call set_num_voices first)" });
        }

        let channels = self.config.channel_mode.channels();
        self.bus = vec![0i32; crate::constants::TICKLSIZE * channels];
        self.samplesthatfit = crate::constants::TICKLSIZE;

        if self.config.has(mixer_flags::NOISEREDUCTION) {
            self.lowpass = Some(NoiseReduction::new(channels));
        } else {
            self.lowpass = None;
        }

        self.reverb = Some(ReverbBank::new(self.config.mix_freq, channels));
        self.md_reverb = self.config.md_reverb;
        self.clamp_reverb_depth();

        self.tickleft = 0;
        self.playing = true;
        tracing::debug!(mix_freq = self.config.mix_freq, voices = self.voices.len(), "play_start");
        Ok(())
    }

    /// Stops playback and releases the reverb/lowpass state. The voice
    /// table and its contents are left untouched.
    pub fn play_stop(&mut self) {
        tracing::debug!("play_stop");
        self.playing = false;
        self.reverb = None;
        self.lowpass = None;
        self.bus.clear();
    }

    /// Updates the reverb depth at runtime. Values above
    /// `MD_REVERB_MAX` are silently clamped, logging a warning the
    /// first time it happens rather than rejecting the call.
    pub fn set_reverb_depth(&mut self, depth: u8) {
        self.md_reverb = depth;
        self.clamp_reverb_depth();
    }

    fn clamp_reverb_depth(&mut self) {
        if self.md_reverb > crate::constants::MD_REVERB_MAX {
            if !self.reverb_clamp_logged {
                tracing::warn!(
                    requested = self.md_reverb,
                    max = crate::constants::MD_REVERB_MAX,
                    "reverb depth clamped"
                );
                self.reverb_clamp_logged = true;
            }
            self.md_reverb = crate::constants::MD_REVERB_MAX;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_then_set_voices_then_play_start_succeeds() {
        let mut mixer = Mixer::init(MixerConfig::default()).unwrap();
        mixer.set_num_voices(8).unwrap();
        mixer.play_start().unwrap();
        assert!(mixer.playing);
        assert_eq!(mixer.num_voices(), 8);
    }

    #[test]
    fn set_num_voices_rejects_zero() {
        let mut mixer = Mixer::init(MixerConfig::default()).unwrap();
        assert_eq!(mixer.set_num_voices(0), Err(MixerError::AllocationFailed { what: "voice table (zero voices requested)" }));
    }

    #[test]
    fn play_start_rejects_an_empty_voice_table() {
        let mut mixer = Mixer::init(MixerConfig::default()).unwrap();
        assert!(mixer.play_start().is_err());
    }

    #[test]
    fn reverb_depth_above_max_is_clamped() {
        let mut mixer = Mixer::init(MixerConfig::default()).unwrap();
        mixer.set_num_voices(4).unwrap();
        mixer.play_start().unwrap();
        mixer.set_reverb_depth(200);
        assert_eq!(mixer.md_reverb, crate::constants::MD_REVERB_MAX);
    }

    #[test]
    fn play_stop_releases_reverb_and_lowpass() {
        let mut mixer = Mixer::init(MixerConfig::default()).unwrap();
        mixer.set_num_voices(2).unwrap();
        mixer.play_start().unwrap();
        mixer.play_stop();
        assert!(!mixer.playing);
        assert!(mixer.reverb.is_none());
    }
}
