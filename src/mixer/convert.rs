//! 32-bit bus to output-format down-conversion.
//!
//! Every converter saturates rather than wraps: a bus value that
//! overflows the target range clamps to that range's extreme instead of
//! rolling over, so a handful of loud voices produce clipping, not
//! noise. `*_simd` variants use `wide` to process eight lanes at a time
//! and fall back to the scalar path for the tail and any platform where
//! `wide` can't vectorize; both paths must agree bit-for-bit.
//!
//! This is also the one place `BITSHIFT` gets applied: voice mixing sums
//! raw `sample * volume` products into the bus with no shift at all, so
//! several loud voices have the full summation headroom before this
//! stage brings the bus back down to output range.

use crate::constants::BITSHIFT;
use wide::{f32x8, i32x8};

const U8_BIAS: i32 = 128;

/// Bus values, once shifted down by `BITSHIFT`, land in approximately
/// `i16` range; this is the normalization divisor back to `[-1.0, 1.0]`.
const F32_SCALE: f32 = 1.0 / 32_768.0;

#[inline]
fn clamp_i16(v: i32) -> i16 {
    v.clamp(i16::MIN as i32, i16::MAX as i32) as i16
}

#[inline]
fn clamp_u8(v: i32) -> u8 {
    (v + U8_BIAS).clamp(0, u8::MAX as i32) as u8
}

#[inline]
fn to_f32_sample(v: i32) -> f32 {
    ((v >> BITSHIFT) as f32 * F32_SCALE).clamp(-1.0, 1.0)
}

/// Scalar `i32` bus -> signed 16-bit PCM.
pub(crate) fn to_i16_scalar(bus: &[i32], out: &mut [i16]) {
    for (o, &b) in out.iter_mut().zip(bus) {
        *o = clamp_i16(b >> BITSHIFT);
    }
}

/// Scalar `i32` bus -> unsigned 8-bit PCM (bias 128).
pub(crate) fn to_u8_scalar(bus: &[i32], out: &mut [u8]) {
    for (o, &b) in out.iter_mut().zip(bus) {
        *o = clamp_u8((b >> BITSHIFT) >> 8);
    }
}

/// Scalar `i32` bus -> `f32` in `[-1.0, 1.0]`.
pub(crate) fn to_f32_scalar(bus: &[i32], out: &mut [f32]) {
    for (o, &b) in out.iter_mut().zip(bus) {
        *o = to_f32_sample(b);
    }
}

/// SIMD `i32` bus -> signed 16-bit PCM. Processes full 8-lane groups
/// with `wide`, then finishes any remainder with [`to_i16_scalar`].
pub(crate) fn to_i16_simd(bus: &[i32], out: &mut [i16]) {
    let lo = i32x8::splat(i16::MIN as i32);
    let hi = i32x8::splat(i16::MAX as i32);
    let chunks = bus.len() / 8;
    for i in 0..chunks {
        let shifted: [i32; 8] = <[i32; 8]>::try_from(&bus[i * 8..i * 8 + 8]).unwrap().map(|v| v >> BITSHIFT);
        let v = i32x8::from(shifted);
        let clamped = v.max(lo).min(hi);
        let arr: [i32; 8] = clamped.into();
        for (j, &c) in arr.iter().enumerate() {
            out[i * 8 + j] = c as i16;
        }
    }
    let done = chunks * 8;
    to_i16_scalar(&bus[done..], &mut out[done..]);
}

/// SIMD `i32` bus -> unsigned 8-bit PCM. The `BITSHIFT + 8` headroom
/// shift stays scalar (integer lane shifts aren't uniformly exposed
/// across `wide`'s backends); the bias-add and clamp run vectorized.
pub(crate) fn to_u8_simd(bus: &[i32], out: &mut [u8]) {
    let bias = i32x8::splat(U8_BIAS);
    let lo = i32x8::splat(0);
    let hi = i32x8::splat(u8::MAX as i32);
    let chunks = bus.len() / 8;
    for i in 0..chunks {
        let shifted: [i32; 8] = <[i32; 8]>::try_from(&bus[i * 8..i * 8 + 8]).unwrap().map(|v| v >> (BITSHIFT + 8));
        let v = i32x8::from(shifted);
        let clamped = (v + bias).max(lo).min(hi);
        let arr: [i32; 8] = clamped.into();
        for (j, &c) in arr.iter().enumerate() {
            out[i * 8 + j] = c as u8;
        }
    }
    let done = chunks * 8;
    to_u8_scalar(&bus[done..], &mut out[done..]);
}

/// SIMD `i32` bus -> `f32`. The headroom shift and int->float widen stay
/// scalar; the scale-and-clamp runs vectorized.
pub(crate) fn to_f32_simd(bus: &[i32], out: &mut [f32]) {
    let scale = f32x8::splat(F32_SCALE);
    let lo = f32x8::splat(-1.0);
    let hi = f32x8::splat(1.0);
    let chunks = bus.len() / 8;
    for i in 0..chunks {
        let widened: [f32; 8] = <[i32; 8]>::try_from(&bus[i * 8..i * 8 + 8]).unwrap().map(|v| (v >> BITSHIFT) as f32);
        let f = f32x8::from(widened);
        let scaled = (f * scale).max(lo).min(hi);
        let arr: [f32; 8] = scaled.into();
        out[i * 8..i * 8 + 8].copy_from_slice(&arr);
    }
    let done = chunks * 8;
    to_f32_scalar(&bus[done..], &mut out[done..]);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn i16_conversion_saturates_both_directions() {
        let bus = [i32::MIN, i32::MAX, 0];
        let mut out = [0i16; 3];
        to_i16_scalar(&bus, &mut out);
        assert_eq!(out, [i16::MIN, i16::MAX, 0]);
    }

    #[test]
    fn i16_conversion_applies_the_headroom_shift_before_saturating() {
        // vol=256 against a PCM peak of 3000 sums to 768000 raw; the
        // BITSHIFT=9 headroom shift brings that down to 1500.
        let bus = [3000i32 * 256];
        let mut out = [0i16; 1];
        to_i16_scalar(&bus, &mut out);
        assert_eq!(out[0], 1500);
    }

    #[test]
    fn u8_conversion_centers_on_128() {
        let bus = [0i32];
        let mut out = [0u8; 1];
        to_u8_scalar(&bus, &mut out);
        assert_eq!(out[0], 128);
    }

    #[test]
    fn f32_conversion_stays_in_unit_range() {
        let bus = [i32::MIN, i32::MAX, 0];
        let mut out = [0.0f32; 3];
        to_f32_scalar(&bus, &mut out);
        for s in out {
            assert!((-1.0..=1.0).contains(&s));
        }
    }

    #[test]
    fn simd_and_scalar_i16_paths_agree_with_a_ragged_tail() {
        let bus: Vec<i32> = (0..37).map(|i| (i * 10_000_007) as i32).collect();
        let mut scalar_out = vec![0i16; bus.len()];
        let mut simd_out = vec![0i16; bus.len()];
        to_i16_scalar(&bus, &mut scalar_out);
        to_i16_simd(&bus, &mut simd_out);
        assert_eq!(scalar_out, simd_out);
    }

    #[test]
    fn simd_and_scalar_u8_paths_agree_with_a_ragged_tail() {
        let bus: Vec<i32> = (0..19).map(|i| i * 1_234_567 - 3_000_000).collect();
        let mut scalar_out = vec![0u8; bus.len()];
        let mut simd_out = vec![0u8; bus.len()];
        to_u8_scalar(&bus, &mut scalar_out);
        to_u8_simd(&bus, &mut simd_out);
        assert_eq!(scalar_out, simd_out);
    }

    #[test]
    fn simd_and_scalar_f32_paths_agree_with_a_ragged_tail() {
        let bus: Vec<i32> = (0..23).map(|i| (i - 11) * 500_000).collect();
        let mut scalar_out = vec![0.0f32; bus.len()];
        let mut simd_out = vec![0.0f32; bus.len()];
        to_f32_scalar(&bus, &mut scalar_out);
        to_f32_simd(&bus, &mut simd_out);
        for (a, b) in scalar_out.iter().zip(simd_out.iter()) {
            assert!((a - b).abs() < f32::EPSILON);
        }
    }
}
