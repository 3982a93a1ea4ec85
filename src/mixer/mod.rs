//! The mixer engine itself.
//!
//! Layout mirrors `nethercore_zx::tracker`: a single owned struct
//! (`Mixer`) defined here, with its behaviour split across sibling files
//! that each add one `impl Mixer` block — `advance` (loop-boundary
//! resolution), `mixers` (the sample-mixer matrix), `reverb`, `lowpass`,
//! `convert` (down-conversion), `tick` (the outer driver), `lifecycle`
//! (init/start/stop).

mod advance;
mod convert;
mod lifecycle;
mod lowpass;
mod mixers;
mod reverb;
mod tick;


pub use lowpass::NoiseReduction;
pub use reverb::ReverbBank;
pub use tick::Sequencer;

use crate::config::MixerConfig;
use crate::constants::TICKLSIZE;
use crate::voice::Voice;

/// Per-chunk hook invoked over the scratch bus after noise reduction and
/// reverb, before down-conversion.
pub type ChunkCallback = Box<dyn FnMut(&mut [i32], usize)>;

/// Owns every piece of mutable mixer state: the voice table, the scratch
/// bus, the reverb lines, the lowpass filter state, and tick timing,
/// threaded explicitly through every call rather than kept as process
/// globals.
pub struct Mixer {
    pub(crate) config: MixerConfig,
    pub(crate) voices: Vec<Voice>,
    pub(crate) bus: Vec<i32>,

    pub(crate) reverb: Option<ReverbBank>,
    pub(crate) lowpass: Option<NoiseReduction>,

    pub(crate) md_reverb: u8,
    /// Set once `md_reverb > 15` has been clamped, so the warning for it
    /// only fires the first time it happens rather than on every call.
    pub(crate) reverb_clamp_logged: bool,

    pub(crate) tickleft: u32,
    pub(crate) samplesthatfit: usize,

    pub(crate) sequencer: Option<Box<dyn Sequencer>>,
    pub(crate) callback: Option<ChunkCallback>,

    pub(crate) initialized: bool,
    pub(crate) playing: bool,
}

impl Mixer {
    /// Construct a mixer from configuration without performing the
    /// allocations `init()` performs. Prefer [`Mixer::init`].
    fn new(config: MixerConfig) -> Self {
        Self {
            config,
            voices: Vec::new(),
            bus: Vec::new(),
            reverb: None,
            lowpass: None,
            md_reverb: config.md_reverb.min(crate::constants::MD_REVERB_MAX),
            reverb_clamp_logged: false,
            tickleft: 0,
            samplesthatfit: TICKLSIZE,
            sequencer: None,
            callback: None,
            initialized: false,
            playing: false,
        }
    }

    /// Current number of voice slots.
    pub fn num_voices(&self) -> usize {
        self.voices.len()
    }

    /// Mutable access to a voice slot, for the caller/sequencer to set up
    /// or update playback parameters between ticks.
    pub fn voice_mut(&mut self, index: usize) -> Option<&mut Voice> {
        self.voices.get_mut(index)
    }

    /// Read-only access to a voice slot.
    pub fn voice(&self, index: usize) -> Option<&Voice> {
        self.voices.get(index)
    }

    /// Register (or clear) the per-chunk bus callback.
    pub fn set_callback(&mut self, callback: Option<ChunkCallback>) {
        self.callback = callback;
    }

    /// Register (or clear) the sequencer callback invoked at tick
    /// boundaries when `SOFT_MUSIC` is set.
    pub fn set_sequencer(&mut self, sequencer: Option<Box<dyn Sequencer>>) {
        self.sequencer = sequencer;
    }
}
