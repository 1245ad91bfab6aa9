//! Sound - mono PCM samples with a sample rate, and framing helpers.
//!
//! The recognizer works on fixed-size frames. This module holds a whole
//! recording and slices it into those frames, either strictly (only full
//! windows) or padded (every step position, zero-filled past the end).
//!
//! # Sample Format
//!
//! Samples are stored as 64-bit floats. Integer WAV data is scaled to
//! [-1.0, 1.0]; float WAV data is loaded as-is.

use std::path::Path;

use ndarray::Array1;

use crate::error::{Error, Result};

/// Mono audio samples with their sample rate.
///
/// # Example
///
/// ```no_run
/// use vowelsync::Sound;
///
/// let sound = Sound::from_file("speech.wav").unwrap().normalize();
/// println!("Duration: {:.3}s", sound.duration());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Sound {
    samples: Array1<f64>,
    /// Sample rate in Hz.
    sample_rate: u32,
}

impl Sound {
    /// Create a Sound from samples and sample rate.
    pub fn new(samples: Array1<f64>, sample_rate: u32) -> Self {
        Self {
            samples,
            sample_rate,
        }
    }

    /// Create a Sound by copying a slice of samples.
    pub fn from_slice(samples: &[f64], sample_rate: u32) -> Self {
        Self::new(Array1::from_vec(samples.to_vec()), sample_rate)
    }

    /// Load a mono WAV file.
    ///
    /// # Errors
    ///
    /// - `Error::NotMono` if the file has more than one channel
    /// - `Error::AudioRead` if the file cannot be read
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let reader = hound::WavReader::open(path)?;
        let channels = reader.spec().channels;
        if channels != 1 {
            return Err(Error::NotMono(channels));
        }
        let sample_rate = reader.spec().sample_rate;
        let samples = read_samples(reader)?;
        Ok(Self::new(Array1::from_vec(samples), sample_rate))
    }

    /// Load one channel of a (possibly multi-channel) WAV file.
    ///
    /// WAV data is interleaved `[L0, R0, L1, R1, …]`; every Nth sample
    /// starting at `channel` is kept.
    ///
    /// # Errors
    ///
    /// - `Error::InvalidConfiguration` if `channel` does not exist
    /// - `Error::AudioRead` if the file cannot be read
    pub fn from_file_channel<P: AsRef<Path>>(path: P, channel: usize) -> Result<Self> {
        let reader = hound::WavReader::open(path)?;
        let n_channels = reader.spec().channels as usize;
        if channel >= n_channels {
            return Err(Error::InvalidConfiguration(format!(
                "Channel {} does not exist. File has {} channels.",
                channel, n_channels
            )));
        }
        let sample_rate = reader.spec().sample_rate;

        let samples: Vec<f64> = read_samples(reader)?
            .into_iter()
            .skip(channel)
            .step_by(n_channels)
            .collect();

        Ok(Self::new(Array1::from_vec(samples), sample_rate))
    }

    /// Get the audio samples.
    #[inline]
    pub fn samples(&self) -> &Array1<f64> {
        &self.samples
    }

    /// Get the sample rate in Hz.
    #[inline]
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Get the number of samples.
    #[inline]
    pub fn n_samples(&self) -> usize {
        self.samples.len()
    }

    /// Duration in seconds (0 for a zero sample rate).
    #[inline]
    pub fn duration(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f64 / self.sample_rate as f64
    }

    /// Scale so that the largest absolute sample becomes 1.0.
    ///
    /// A silent sound is returned unchanged.
    pub fn normalize(mut self) -> Self {
        let peak = self.samples.iter().fold(0.0f64, |m, &x| m.max(x.abs()));
        if peak > 0.0 {
            self.samples.mapv_inplace(|x| x / peak);
        }
        self
    }

    /// Full windows of `window` samples starting at `0, step, 2·step, …`.
    ///
    /// Only windows that fit entirely inside the sound are produced, so a
    /// sound shorter than `window` yields nothing. A zero `window` or
    /// `step` yields nothing too.
    pub fn frames(&self, window: usize, step: usize) -> impl Iterator<Item = Vec<f64>> + '_ {
        let count = if window == 0 || step == 0 || self.n_samples() < window {
            0
        } else {
            (self.n_samples() - window) / step + 1
        };
        (0..count).map(move |i| {
            let start = i * step;
            self.samples
                .slice(ndarray::s![start..start + window])
                .to_vec()
        })
    }

    /// One window per step position, `ceil(n_samples / step)` in total,
    /// zero-padded where the window runs past the end.
    pub fn padded_frames(&self, window: usize, step: usize) -> impl Iterator<Item = Vec<f64>> + '_ {
        let n = self.n_samples();
        let count = if step == 0 { 0 } else { n.div_ceil(step) };
        (0..count).map(move |i| {
            let start = i * step;
            let end = (start + window).min(n);
            let mut frame = vec![0.0; window];
            for (dst, &src) in frame.iter_mut().zip(self.samples.slice(ndarray::s![start..end])) {
                *dst = src;
            }
            frame
        })
    }
}

/// Convert a duration in milliseconds to a whole number of samples.
///
/// Rounds down, like an integer `ms · fs / 1000`.
pub fn ms_to_samples(ms: f64, sample_rate: u32) -> usize {
    if ms.is_nan() || ms <= 0.0 {
        return 0;
    }
    (ms * sample_rate as f64 / 1000.0).floor() as usize
}

fn read_samples<R: std::io::Read>(reader: hound::WavReader<R>) -> Result<Vec<f64>> {
    let spec = reader.spec();
    let samples = match spec.sample_format {
        hound::SampleFormat::Float => reader
            .into_samples::<f32>()
            .map(|s| s.map(|v| v as f64))
            .collect::<std::result::Result<Vec<f64>, _>>()?,
        hound::SampleFormat::Int => {
            // 2^(bits-1), e.g. 32768 for 16-bit audio
            let max_val = (1i64 << (spec.bits_per_sample - 1)) as f64;
            reader
                .into_samples::<i32>()
                .map(|s| s.map(|v| v as f64 / max_val))
                .collect::<std::result::Result<Vec<f64>, _>>()?
        }
    };
    Ok(samples)
}

impl std::fmt::Display for Sound {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Sound({} samples, {} Hz, {:.3}s)",
            self.n_samples(),
            self.sample_rate,
            self.duration()
        )
    }
}
