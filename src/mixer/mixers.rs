//! The sample-mixer matrix: {mono, stereo, surround} x {nearest, linear}
//! x {32-bit, 64-bit index width}.
//!
//! Rather than twelve hand-written functions, each of the six
//! channel/interpolation combinations is written once as a function
//! generic over an index-width trait, and the width is picked per call
//! by [`narrow_enough`]. Monomorphization gives twelve code paths
//! without duplicating the loop body twelve times.

use crate::constants::{FRACBITS, FRACMASK};

/// Index-width abstraction: the fixed-point position/step either fit in
/// an `i32` for the whole run (faster on 32-bit-native targets) or need
/// the full `i64`. Both impls are exact — this only changes the integer
/// type the hot loop carries, never the arithmetic result.
pub(crate) trait MixWidth: Copy {
    fn from_i64(v: i64) -> Self;
    fn to_i64(self) -> i64;
    fn step(self, inc: i64) -> Self;
}

impl MixWidth for i32 {
    fn from_i64(v: i64) -> Self {
        v as i32
    }
    fn to_i64(self) -> i64 {
        self as i64
    }
    fn step(self, inc: i64) -> Self {
        (self as i64 + inc) as i32
    }
}

impl MixWidth for i64 {
    fn from_i64(v: i64) -> Self {
        v
    }
    fn to_i64(self) -> i64 {
        self
    }
    fn step(self, inc: i64) -> Self {
        self + inc
    }
}

/// Picks the narrower index width for a run: safe whenever both the
/// current position and the run's endpoint fit comfortably under
/// `i32::MAX` in fixed-point units.
pub(crate) fn narrow_enough(current: i64, endpos: i64) -> bool {
    current < 0x7fff_ffff && endpos < 0x7fff_ffff
}

/// Nearest-neighbour and linear interpolation, factored out so the
/// channel-layout mixers below don't each special-case both.
pub(crate) trait Interpolator {
    fn sample(pcm: &[i16], idx: usize, frac: i64) -> i32;
}

pub(crate) struct Nearest;
impl Interpolator for Nearest {
    fn sample(pcm: &[i16], idx: usize, _frac: i64) -> i32 {
        pcm[idx] as i32
    }
}

pub(crate) struct Linear;
impl Interpolator for Linear {
    fn sample(pcm: &[i16], idx: usize, frac: i64) -> i32 {
        let a = pcm[idx] as i32;
        let b = *pcm.get(idx + 1).unwrap_or(&pcm[idx]) as i32;
        a + (((b - a) * frac as i32) >> FRACBITS)
    }
}

/// Mixes `count` mono samples of `pcm` at volume `vol` (`0..=256`) into
/// `bus`, starting at fixed-point `pos` and stepping by `inc` each
/// sample. Returns the advanced fixed-point position. Contributions are
/// summed raw (no headroom shift) — that happens once, in
/// [`super::convert`], after every voice and the reverb/lowpass stages
/// have added their share.
pub(crate) fn mix_mono<W: MixWidth, I: Interpolator>(
    pcm: &[i16],
    pos: i64,
    inc: i64,
    vol: i32,
    bus: &mut [i32],
    count: usize,
) -> i64 {
    let mut p = W::from_i64(pos);
    for slot in bus.iter_mut().take(count) {
        let raw = p.to_i64();
        let idx = (raw >> FRACBITS) as usize;
        let frac = raw & FRACMASK;
        let s = I::sample(pcm, idx, frac);
        *slot += s * vol;
        p = p.step(inc);
    }
    p.to_i64()
}

/// Stereo form of [`mix_mono`]: writes independently panned `L`/`R`
/// contributions into interleaved `bus` pairs.
pub(crate) fn mix_stereo<W: MixWidth, I: Interpolator>(
    pcm: &[i16],
    pos: i64,
    inc: i64,
    lvol: i32,
    rvol: i32,
    bus: &mut [i32],
    count: usize,
) -> i64 {
    let mut p = W::from_i64(pos);
    for i in 0..count {
        let raw = p.to_i64();
        let idx = (raw >> FRACBITS) as usize;
        let frac = raw & FRACMASK;
        let s = I::sample(pcm, idx, frac);
        bus[2 * i] += s * lvol;
        bus[2 * i + 1] += s * rvol;
        p = p.step(inc);
    }
    p.to_i64()
}

/// Dolby-matrix surround form: the dominant side (`dominant_left`) gets
/// `+vol`, the other `-vol`, so a mono down-mix of the two cancels the
/// voice out instead of doubling it.
pub(crate) fn mix_surround<W: MixWidth, I: Interpolator>(
    pcm: &[i16],
    pos: i64,
    inc: i64,
    vol: i32,
    dominant_left: bool,
    bus: &mut [i32],
    count: usize,
) -> i64 {
    let (lsign, rsign) = if dominant_left { (1, -1) } else { (-1, 1) };
    let mut p = W::from_i64(pos);
    for i in 0..count {
        let raw = p.to_i64();
        let idx = (raw >> FRACBITS) as usize;
        let frac = raw & FRACMASK;
        let s = I::sample(pcm, idx, frac);
        let contribution = s * vol;
        bus[2 * i] += lsign * contribution;
        bus[2 * i + 1] += rsign * contribution;
        p = p.step(inc);
    }
    p.to_i64()
}
