//! Confirms the `SIMDMIXER` down-conversion path is numerically
//! identical to the scalar path, driven only through the public API
//! (the two paths are private to `mixer::convert`; this compares their
//! effect on `write_samples` output instead of calling them directly).

use approx::assert_relative_eq;
use virtch::{ChannelMode, Mixer, MixerConfig, SampleFormat, SampleTable};

fn build(mix_freq: u32, format: SampleFormat, simd: bool, frame_count: usize) -> (Mixer, SampleTable, Vec<u8>) {
    let mut flags = virtch::flags::mixer_flags::INTERP;
    if simd {
        flags |= virtch::flags::mixer_flags::SIMDMIXER;
    }
    let config = MixerConfig { mix_freq, channel_mode: ChannelMode::Stereo, sample_format: format, flags, ..MixerConfig::default() };
    let mut mixer = Mixer::init(config).unwrap();
    mixer.set_num_voices(8).unwrap();
    mixer.play_start().unwrap();

    let mut table = SampleTable::new();
    table.set(1, Some((0..256).map(|i| ((i * 137) % 30000) as i16 - 15000).collect()));
    for i in 0..8 {
        let voice = mixer.voice_mut(i).unwrap();
        voice.handle = 1;
        voice.size = 256;
        voice.vol = 200 + i as u16 * 5;
        voice.pan = (i * 30) as u16;
        voice.frq = 9_000 + i as u32 * 100;
        voice.kick = true;
    }

    let bytes = frame_count * 2 * format.sample_bytes();
    (mixer, table, vec![0u8; bytes])
}

#[test]
fn i16_simd_and_scalar_outputs_match_for_a_ragged_frame_count() {
    let (mut scalar_mixer, table, mut scalar_out) = build(44_100, SampleFormat::I16, false, 8192 + 37);
    let (mut simd_mixer, table2, mut simd_out) = build(44_100, SampleFormat::I16, true, 8192 + 37);

    scalar_mixer.write_samples(&table, &mut scalar_out).unwrap();
    simd_mixer.write_samples(&table2, &mut simd_out).unwrap();

    assert_eq!(scalar_out, simd_out);
}

#[test]
fn u8_simd_and_scalar_outputs_match() {
    let (mut scalar_mixer, table, mut scalar_out) = build(22_050, SampleFormat::U8, false, 513);
    let (mut simd_mixer, table2, mut simd_out) = build(22_050, SampleFormat::U8, true, 513);

    scalar_mixer.write_samples(&table, &mut scalar_out).unwrap();
    simd_mixer.write_samples(&table2, &mut simd_out).unwrap();

    assert_eq!(scalar_out, simd_out);
}

#[test]
fn f32_simd_and_scalar_outputs_match() {
    let (mut scalar_mixer, table, mut scalar_out) = build(48_000, SampleFormat::F32, false, 701);
    let (mut simd_mixer, table2, mut simd_out) = build(48_000, SampleFormat::F32, true, 701);

    scalar_mixer.write_samples(&table, &mut scalar_out).unwrap();
    simd_mixer.write_samples(&table2, &mut simd_out).unwrap();

    let scalar_samples: &[f32] = bytemuck::cast_slice(&scalar_out);
    let simd_samples: &[f32] = bytemuck::cast_slice(&simd_out);
    for (a, b) in scalar_samples.iter().zip(simd_samples.iter()) {
        assert_relative_eq!(a, b, epsilon = f32::EPSILON);
    }
}
