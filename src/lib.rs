//! Fixed-point virtual-channel mixing core for tracker-style module
//! playback.
//!
//! A [`Mixer`] owns a table of [`Voice`] slots and, given borrowed PCM
//! data through a [`SampleSource`], advances and blends them into an
//! output buffer one [`Mixer::write_samples`] call at a time. Sequencing
//! (what note plays when), sample storage, and delivering the output
//! buffer to an audio device are all the caller's job — see the
//! [`mixer::Sequencer`] trait for the one seam this crate exposes into
//! that outside world.

pub mod config;
pub mod constants;
pub mod error;
pub mod flags;
pub mod mixer;
pub mod sample;
pub mod voice;

pub use config::{ChannelMode, MixerConfig, SampleFormat};
pub use error::{MixerError, Result};
pub use mixer::{Mixer, Sequencer};
pub use sample::{SampleSource, SampleTable};
pub use voice::Voice;
