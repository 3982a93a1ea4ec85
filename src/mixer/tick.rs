//! The outer tick driver: `write_samples`.
//!
//! Slices the caller's output buffer into tick-length runs (the
//! sequencer-callback boundary) and then into `samplesthatfit`-sized
//! chunks, clearing, mixing, filtering, and down-converting each chunk
//! in turn. This is the one place in the crate that sees the whole
//! pipeline end to end.

use crate::config::{ChannelMode, SampleFormat};
use crate::constants::FRACBITS;
use crate::error::{MixerError, Result};
use crate::flags::mixer_flags;
use crate::mixer::mixers::{self, Interpolator, Linear, Nearest};
use crate::sample::SampleSource;
use crate::voice::Voice;

use super::Mixer;

/// Out-of-scope sequencer collaborator: advances pattern/row state and
/// mutates voice parameters once per tick. The mixer only calls this
/// when `SOFT_MUSIC` is set and a sequencer has been registered via
/// [`Mixer::set_sequencer`] — it never interprets pattern data itself.
pub trait Sequencer {
    fn player_tick(&mut self, voices: &mut [Voice]);
}

impl Mixer {
    /// Samples-per-tick derived from the configured tempo, the classic
    /// tracker `bpm/2.5` ticks-per-second relation.
    fn samples_per_tick(&self) -> u32 {
        ((self.config.mix_freq as u64 * 5) / (self.config.bpm.max(1) as u64 * 2)) as u32
    }

    /// Produces output into `out`, which must hold whole frames
    /// (`out.len()` a multiple of `channels * sample_bytes`). Returns the
    /// number of frames written, which is always `out`'s full frame
    /// count — `write_samples` never partially fills the buffer.
    pub fn write_samples(&mut self, samples: &dyn SampleSource, out: &mut [u8]) -> Result<usize> {
        if !self.initialized {
            return Err(MixerError::NotInitialized);
        }
        if !self.playing {
            return Err(MixerError::PlaybackNotStarted);
        }

        let channels = self.config.channel_mode.channels();
        let sample_bytes = self.config.sample_format.sample_bytes();
        let frame_bytes = channels * sample_bytes;
        let total_frames = out.len() / frame_bytes;

        let mut frames_left = total_frames;
        let mut out_off = 0usize;

        while frames_left > 0 {
            if self.tickleft == 0 {
                if self.config.has(mixer_flags::SOFT_MUSIC) {
                    if let Some(mut seq) = self.sequencer.take() {
                        seq.player_tick(&mut self.voices);
                        self.sequencer = Some(seq);
                    }
                }
                self.tickleft = self.samples_per_tick().max(1);
            }

            let chunk = frames_left.min(self.tickleft as usize).min(self.samplesthatfit);
            let bus_len = chunk * channels;
            if self.bus.len() < bus_len {
                self.bus.resize(bus_len, 0);
            }
            self.bus[..bus_len].fill(0);

            for idx in 0..self.voices.len() {
                self.mix_voice(idx, samples, chunk);
            }

            if self.config.has(mixer_flags::NOISEREDUCTION) {
                if let Some(lp) = self.lowpass.as_mut() {
                    lp.process(&mut self.bus[..bus_len], chunk);
                }
            }

            if let Some(reverb) = self.reverb.as_mut() {
                if self.md_reverb > 0 {
                    reverb.process(&mut self.bus[..bus_len], chunk, self.md_reverb);
                }
            }

            if let Some(cb) = self.callback.as_mut() {
                cb(&mut self.bus[..bus_len], chunk);
            }

            self.down_convert(bus_len, &mut out[out_off..out_off + chunk * frame_bytes]);

            out_off += chunk * frame_bytes;
            frames_left -= chunk;
            self.tickleft -= chunk as u32;
        }

        Ok(total_frames)
    }

    fn down_convert(&self, bus_len: usize, out: &mut [u8]) {
        let bus = &self.bus[..bus_len];
        match self.config.sample_format {
            SampleFormat::U8 => {
                if self.config.has(mixer_flags::SIMDMIXER) {
                    super::convert::to_u8_simd(bus, out);
                } else {
                    super::convert::to_u8_scalar(bus, out);
                }
            }
            SampleFormat::I16 => {
                let out: &mut [i16] = bytemuck::cast_slice_mut(out);
                if self.config.has(mixer_flags::SIMDMIXER) {
                    super::convert::to_i16_simd(bus, out);
                } else {
                    super::convert::to_i16_scalar(bus, out);
                }
            }
            SampleFormat::F32 => {
                let out: &mut [f32] = bytemuck::cast_slice_mut(out);
                if self.config.has(mixer_flags::SIMDMIXER) {
                    super::convert::to_f32_simd(bus, out);
                } else {
                    super::convert::to_f32_scalar(bus, out);
                }
            }
        }
    }

    /// Mixes one voice's contribution to the current chunk, handling
    /// kick/retrigger, volume-ramp setup, and repeated `advance`/mixer
    /// dispatch across any loop boundaries crossed mid-chunk.
    fn mix_voice(&mut self, index: usize, samples: &dyn SampleSource, chunk: usize) {
        let stereo = matches!(self.config.channel_mode, ChannelMode::Stereo);
        let surround_enabled = self.config.has(mixer_flags::SURROUND);
        let interp = self.config.has(mixer_flags::INTERP);

        let voice = &mut self.voices[index];
        if voice.kick {
            voice.current = (voice.start as i64) << FRACBITS;
            voice.kick = false;
            voice.active = true;
            voice.oldlvol = 0;
            voice.oldrvol = 0;
            voice.rampvol = crate::constants::CLICK_BUFFER;
        }
        if !voice.active || voice.handle == 0 {
            return;
        }

        let pcm = match samples.lookup(voice.handle) {
            Some(pcm) if !pcm.is_empty() => pcm,
            _ => {
                tracing::debug!(voice = index, handle = voice.handle, "voice deactivated: missing sample");
                voice.deactivate();
                return;
            }
        };

        let mix_freq = self.config.mix_freq.max(1) as i64;
        let mut increment = ((voice.frq as i64) << FRACBITS) / mix_freq;
        if voice.is_reverse() {
            increment = -increment;
        }
        voice.increment = increment;

        let pan_surround = stereo && voice.pan == crate::constants::PAN_SURROUND;
        let surround_voice = pan_surround && surround_enabled;
        let (newlvol, newrvol, dominant_left) = if pan_surround {
            let v = (voice.vol as i32) / 2;
            (v, v, true)
        } else {
            let pan = voice.pan.min(crate::constants::PAN_RIGHT) as i32;
            let vol = voice.vol as i32;
            ((vol * (crate::constants::PAN_RIGHT as i32 - pan)) >> 8, (vol * pan) >> 8, true)
        };
        if newlvol != voice.lvolsel || newrvol != voice.rvolsel {
            voice.oldlvol = voice.lvolsel;
            voice.oldrvol = voice.rvolsel;
            voice.rampvol = crate::constants::CLICK_BUFFER;
        }
        voice.lvolsel = newlvol;
        voice.rvolsel = newrvol;

        let mut produced = 0usize;
        while produced < chunk && self.voices[index].active {
            let voice = &self.voices[index];
            let run = voice.plan_run(chunk - produced);
            if run.length == 0 && run.boundary {
                self.voices[index].resolve_boundary();
                continue;
            }
            if run.length == 0 {
                break;
            }

            let voice = &mut self.voices[index];
            let bus_off = if stereo { produced * 2 } else { produced };
            let bus_slice = &mut self.bus[bus_off..];

            let ramp = voice.rampvol.min(run.length as u32) as usize;
            let steady = run.length - ramp;

            let mut pos = voice.current;
            if ramp > 0 {
                pos = mix_ramped(
                    voice, pcm, pos, stereo, surround_voice, dominant_left, interp, bus_slice, ramp,
                );
                voice.rampvol -= ramp as u32;
            }
            if steady > 0 {
                let bus_steady = if stereo { &mut bus_slice[ramp * 2..] } else { &mut bus_slice[ramp..] };
                pos = mix_steady(
                    voice, pcm, pos, stereo, surround_voice, dominant_left, interp, bus_steady, steady,
                );
            }
            voice.current = pos;

            produced += run.length;
            if run.boundary {
                self.voices[index].resolve_boundary();
            }
        }
    }
}

/// Per-sample volume ramp covering a click-suppression run: blends
/// `oldvol -> newvol` over up to `CLICK_BUFFER` samples, folding the
/// volume blend and the sample multiply into a single `CLICK_SHIFT`
/// shift rather than computing an intermediate blended volume first —
/// dividing the volume delta down before multiplying by the sample
/// would throw away fractional precision for most sample values.
#[allow(clippy::too_many_arguments)]
fn mix_ramped(
    voice: &Voice,
    pcm: &[i16],
    mut pos: i64,
    stereo: bool,
    surround: bool,
    dominant_left: bool,
    interp: bool,
    bus: &mut [i32],
    count: usize,
) -> i64 {
    let shift = crate::constants::CLICK_SHIFT;
    let mut remaining = voice.rampvol as i32;
    for i in 0..count {
        remaining -= 1;
        let idx = (pos >> FRACBITS) as usize;
        let frac = pos & crate::constants::FRACMASK;
        let s = if interp { Linear::sample(pcm, idx.min(pcm.len() - 1), frac) } else { Nearest::sample(pcm, idx.min(pcm.len() - 1), frac) };
        let lvol = (((voice.lvolsel << shift) + (voice.oldlvol - voice.lvolsel) * remaining) * s) >> shift;
        if stereo {
            if surround {
                let (lsign, rsign) = if dominant_left { (1, -1) } else { (-1, 1) };
                bus[2 * i] += lsign * lvol;
                bus[2 * i + 1] += rsign * lvol;
            } else {
                let rvol = (((voice.rvolsel << shift) + (voice.oldrvol - voice.rvolsel) * remaining) * s) >> shift;
                bus[2 * i] += lvol;
                bus[2 * i + 1] += rvol;
            }
        } else {
            bus[i] += lvol;
        }
        pos += voice.increment;
    }
    pos
}

#[allow(clippy::too_many_arguments)]
fn mix_steady(
    voice: &Voice,
    pcm: &[i16],
    pos: i64,
    stereo: bool,
    surround: bool,
    dominant_left: bool,
    interp: bool,
    bus: &mut [i32],
    count: usize,
) -> i64 {
    let narrow = mixers::narrow_enough(voice.current, voice.current + voice.increment * count as i64);
    match (stereo, surround, interp, narrow) {
        (false, _, false, true) => mixers::mix_mono::<i32, Nearest>(pcm, pos, voice.increment, voice.lvolsel, bus, count),
        (false, _, false, false) => mixers::mix_mono::<i64, Nearest>(pcm, pos, voice.increment, voice.lvolsel, bus, count),
        (false, _, true, true) => mixers::mix_mono::<i32, Linear>(pcm, pos, voice.increment, voice.lvolsel, bus, count),
        (false, _, true, false) => mixers::mix_mono::<i64, Linear>(pcm, pos, voice.increment, voice.lvolsel, bus, count),
        (true, true, false, true) => mixers::mix_surround::<i32, Nearest>(pcm, pos, voice.increment, voice.lvolsel, dominant_left, bus, count),
        (true, true, false, false) => mixers::mix_surround::<i64, Nearest>(pcm, pos, voice.increment, voice.lvolsel, dominant_left, bus, count),
        (true, true, true, true) => mixers::mix_surround::<i32, Linear>(pcm, pos, voice.increment, voice.lvolsel, dominant_left, bus, count),
        (true, true, true, false) => mixers::mix_surround::<i64, Linear>(pcm, pos, voice.increment, voice.lvolsel, dominant_left, bus, count),
        (true, false, false, true) => mixers::mix_stereo::<i32, Nearest>(pcm, pos, voice.increment, voice.lvolsel, voice.rvolsel, bus, count),
        (true, false, false, false) => mixers::mix_stereo::<i64, Nearest>(pcm, pos, voice.increment, voice.lvolsel, voice.rvolsel, bus, count),
        (true, false, true, true) => mixers::mix_stereo::<i32, Linear>(pcm, pos, voice.increment, voice.lvolsel, voice.rvolsel, bus, count),
        (true, false, true, false) => mixers::mix_stereo::<i64, Linear>(pcm, pos, voice.increment, voice.lvolsel, voice.rvolsel, bus, count),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ramp_formula_matches_the_worked_example() {
        // oldlvol=0, lvolsel=200, sample=1000, one sample into a 64-sample
        // ramp (remaining=63) -> 3125.
        let mut voice = Voice { oldlvol: 0, lvolsel: 200, rampvol: 64, increment: 0, ..Voice::default() };
        voice.active = true;
        let pcm = [1000i16];
        let mut bus = [0i32; 1];
        mix_ramped(&voice, &pcm, 0, false, false, true, false, &mut bus, 1);
        assert_eq!(bus[0], 3125);
    }
}
