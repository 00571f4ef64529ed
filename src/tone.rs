// Copyright (c) 2026 rezky_nightky

#![cfg_attr(not(feature = "audio"), allow(dead_code))]

use std::f32::consts::TAU;
use std::time::Duration;

use crate::diag::Diagnostics;
use crate::error::ToneError;

pub const POP_SAMPLE_RATE: u32 = 44_100;
pub const POP_DURATION: Duration = Duration::from_millis(100);
pub const POP_FREQ_START: f32 = 800.0;
pub const POP_FREQ_END: f32 = 100.0;
pub const POP_GAIN_START: f32 = 0.1;
pub const POP_GAIN_END: f32 = 0.01;

pub trait Tone {
    fn pop(&mut self) -> Result<(), ToneError>;
}

#[derive(Debug, Default)]
pub struct Silent;

impl Tone for Silent {
    fn pop(&mut self) -> Result<(), ToneError> {
        Ok(())
    }
}

// 0.1 s sine, pitch 800 -> 100 Hz and gain 0.1 -> 0.01, both exponential.
#[derive(Clone, Debug)]
pub struct PopWave {
    index: u32,
    total: u32,
    phase: f32,
}

impl Default for PopWave {
    fn default() -> Self {
        Self::new()
    }
}

impl PopWave {
    pub fn new() -> Self {
        let total = (POP_SAMPLE_RATE as f64 * POP_DURATION.as_secs_f64()).round() as u32;
        Self {
            index: 0,
            total,
            phase: 0.0,
        }
    }

    fn sweep(start: f32, end: f32, t: f32) -> f32 {
        start * (end / start).powf(t)
    }

    pub fn frequency_at(t: f32) -> f32 {
        Self::sweep(POP_FREQ_START, POP_FREQ_END, t.clamp(0.0, 1.0))
    }

    pub fn gain_at(t: f32) -> f32 {
        Self::sweep(POP_GAIN_START, POP_GAIN_END, t.clamp(0.0, 1.0))
    }
}

impl Iterator for PopWave {
    type Item = f32;

    fn next(&mut self) -> Option<f32> {
        if self.index >= self.total {
            return None;
        }
        let t = self.index as f32 / self.total as f32;
        let sample = self.phase.sin() * Self::gain_at(t);

        self.phase += TAU * Self::frequency_at(t) / POP_SAMPLE_RATE as f32;
        if self.phase >= TAU {
            self.phase -= TAU;
        }
        self.index += 1;
        Some(sample)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = (self.total - self.index) as usize;
        (left, Some(left))
    }
}

#[cfg(feature = "audio")]
mod speaker {
    use std::time::Duration;

    use rodio::{OutputStream, OutputStreamHandle, Sink, Source};

    use super::{PopWave, Tone, POP_DURATION, POP_SAMPLE_RATE};
    use crate::error::ToneError;

    impl Source for PopWave {
        fn current_frame_len(&self) -> Option<usize> {
            None
        }

        fn channels(&self) -> u16 {
            1
        }

        fn sample_rate(&self) -> u32 {
            POP_SAMPLE_RATE
        }

        fn total_duration(&self) -> Option<Duration> {
            Some(POP_DURATION)
        }
    }

    pub struct Speaker {
        _stream: OutputStream,
        handle: OutputStreamHandle,
    }

    impl Speaker {
        pub fn open() -> Result<Self, ToneError> {
            let (stream, handle) =
                OutputStream::try_default().map_err(|e| ToneError::Device(e.to_string()))?;
            Ok(Self {
                _stream: stream,
                handle,
            })
        }
    }

    impl Tone for Speaker {
        fn pop(&mut self) -> Result<(), ToneError> {
            let sink =
                Sink::try_new(&self.handle).map_err(|e| ToneError::Playback(e.to_string()))?;
            sink.append(PopWave::new());
            sink.detach();
            Ok(())
        }
    }
}

#[cfg(feature = "audio")]
pub fn open_default(diag: &mut Diagnostics) -> Box<dyn Tone> {
    match speaker::Speaker::open() {
        Ok(s) => Box::new(s),
        Err(e) => {
            diag.warn(format!("{e}; clicks will be silent"));
            Box::new(Silent)
        }
    }
}

#[cfg(not(feature = "audio"))]
pub fn open_default(diag: &mut Diagnostics) -> Box<dyn Tone> {
    diag.warn("built without the `audio` feature; clicks will be silent");
    Box::new(Silent)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pop_lasts_a_tenth_of_a_second() {
        let w = PopWave::new();
        assert_eq!(w.size_hint(), (4410, Some(4410)));
        assert_eq!(w.count(), 4410);
    }

    #[test]
    fn sweeps_hit_their_endpoints() {
        assert!((PopWave::frequency_at(0.0) - 800.0).abs() < 1e-3);
        assert!((PopWave::frequency_at(1.0) - 100.0).abs() < 1e-3);
        assert!((PopWave::gain_at(0.0) - 0.1).abs() < 1e-6);
        assert!((PopWave::gain_at(1.0) - 0.01).abs() < 1e-6);
        // exponential: geometric mean at the midpoint
        assert!((PopWave::frequency_at(0.5) - (800.0f32 * 100.0).sqrt()).abs() < 0.01);
    }

    #[test]
    fn samples_stay_under_the_gain_envelope() {
        let samples: Vec<f32> = PopWave::new().collect();
        assert!(samples.iter().all(|s| s.is_finite() && s.abs() <= 0.1 + 1e-6));
        assert!(samples.iter().any(|s| s.abs() > 0.05));
        let tail_peak = samples[samples.len() - 50..]
            .iter()
            .fold(0.0f32, |m, s| m.max(s.abs()));
        assert!(tail_peak < 0.012);
    }

    #[cfg(feature = "audio")]
    #[test]
    fn pop_wave_plays_as_a_mono_source() {
        use rodio::Source;

        let w = PopWave::new();
        assert_eq!(w.channels(), 1);
        assert_eq!(w.sample_rate(), POP_SAMPLE_RATE);
        assert_eq!(w.total_duration(), Some(POP_DURATION));
    }

    #[test]
    fn silent_tone_never_fails() {
        let mut s = Silent;
        assert!(s.pop().is_ok());
    }
}
