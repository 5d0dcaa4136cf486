use macroquad::audio::{PlaySoundParams, Sound, load_sound_from_bytes, play_sound};

use crate::app::Clip;

const SAMPLE_RATE: u32 = 44_100;

/// Mono 16-bit PCM WAV holding a sine tone.
pub fn sine_wav(frequency_hz: f32, duration_seconds: f32, amplitude: f32) -> Vec<u8> {
    let num_samples = (duration_seconds.max(0.0) * SAMPLE_RATE as f32) as u32;
    let block_align: u16 = 2;
    let byte_rate = SAMPLE_RATE * block_align as u32;
    let data_size = num_samples * 2;

    let mut data: Vec<u8> = Vec::with_capacity(data_size as usize + 44);
    data.extend_from_slice(b"RIFF");
    data.extend_from_slice(&(36 + data_size).to_le_bytes());
    data.extend_from_slice(b"WAVE");
    data.extend_from_slice(b"fmt ");
    data.extend_from_slice(&16u32.to_le_bytes());
    data.extend_from_slice(&1u16.to_le_bytes()); // PCM
    data.extend_from_slice(&1u16.to_le_bytes()); // mono
    data.extend_from_slice(&SAMPLE_RATE.to_le_bytes());
    data.extend_from_slice(&byte_rate.to_le_bytes());
    data.extend_from_slice(&block_align.to_le_bytes());
    data.extend_from_slice(&16u16.to_le_bytes());
    data.extend_from_slice(b"data");
    data.extend_from_slice(&data_size.to_le_bytes());

    let amplitude = amplitude.clamp(0.0, 1.0) * i16::MAX as f32;
    for n in 0..num_samples {
        let t = n as f32 / SAMPLE_RATE as f32;
        // linear fade-out
        let fade = 1.0 - n as f32 / num_samples as f32;
        let sample = (amplitude * fade * (std::f32::consts::TAU * frequency_hz * t).sin()) as i16;
        data.extend_from_slice(&sample.to_le_bytes());
    }
    data
}

pub struct Sounds {
    eat: Sound,
    game_over: Sound,
}

impl Sounds {
    pub async fn load() -> Result<Self, macroquad::Error> {
        let eat = load_sound_from_bytes(&sine_wav(880.0, 0.08, 0.6)).await?;
        let game_over = load_sound_from_bytes(&sine_wav(110.0, 0.4, 0.7)).await?;
        Ok(Self { eat, game_over })
    }

    pub fn play(&self, clip: Clip, volume: f32) {
        if volume <= 0.0 {
            return;
        }
        let sound = match clip {
            Clip::Eat => &self.eat,
            Clip::GameOver => &self.game_over,
        };
        play_sound(
            sound,
            PlaySoundParams {
                looped: false,
                volume: volume.clamp(0.0, 1.0),
            },
        );
    }
}
