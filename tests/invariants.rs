//! Properties that should hold across a broad range of inputs, as
//! opposed to one concrete scenario.

use virtch::{ChannelMode, Mixer, MixerConfig, SampleFormat, SampleTable};

fn mixer_with(mix_freq: u32, format: SampleFormat) -> Mixer {
    let config = MixerConfig { mix_freq, channel_mode: ChannelMode::Stereo, sample_format: format, ..MixerConfig::default() };
    let mut mixer = Mixer::init(config).unwrap();
    mixer.set_num_voices(4).unwrap();
    mixer.play_start().unwrap();
    mixer
}

#[test]
fn write_samples_always_fills_the_whole_buffer() {
    for frames in [1usize, 7, 64, 513, 8192 + 3] {
        let mut mixer = mixer_with(44_100, SampleFormat::I16);
        let table = SampleTable::new();
        let mut out = vec![0u8; frames * 4];
        let written = mixer.write_samples(&table, &mut out).unwrap();
        assert_eq!(written, frames);
    }
}

#[test]
fn f32_output_never_leaves_the_unit_range() {
    let mut mixer = mixer_with(22_050, SampleFormat::F32);
    let mut table = SampleTable::new();
    table.set(1, Some(vec![i16::MIN; 64]));
    for i in 0..4 {
        let voice = mixer.voice_mut(i).unwrap();
        voice.handle = 1;
        voice.size = 64;
        voice.vol = 256;
        voice.pan = 128;
        voice.frq = 22_050;
        voice.kick = true;
    }
    let mut out = vec![0u8; 8 * 64];
    mixer.write_samples(&table, &mut out).unwrap();
    let samples: &[f32] = bytemuck::cast_slice(&out);
    assert!(samples.iter().all(|&s| (-1.0..=1.0).contains(&s)));
}

#[test]
fn an_inactive_voice_never_contributes_to_the_mix() {
    let mut mixer = mixer_with(8_000, SampleFormat::I16);
    let table = SampleTable::new();
    {
        let voice = mixer.voice_mut(0).unwrap();
        voice.handle = 1;
        voice.size = 8;
        voice.vol = 256;
        voice.active = false;
        voice.kick = false;
    }
    let mut out = vec![0u8; 4 * 32];
    mixer.write_samples(&table, &mut out).unwrap();
    assert!(out.iter().all(|&b| b == 0));
}

#[test]
fn repeated_init_and_play_start_cycles_do_not_panic() {
    for _ in 0..5 {
        let mut mixer = mixer_with(16_000, SampleFormat::U8);
        mixer.play_stop();
        mixer.play_start().unwrap();
        let table = SampleTable::new();
        let mut out = vec![0u8; 2 * 32];
        mixer.write_samples(&table, &mut out).unwrap();
    }
}
