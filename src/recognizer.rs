//! Recognizer - frame-by-frame vowel recognition.
//!
//! Two analysis paths share one configuration:
//!
//! - **Fast path** ([`Recognizer::recognize`], [`Recognizer::analyze_fast`]):
//!   window → magnitude spectrum → energy gate → Gaussian smoothing →
//!   first local peak → `formant = position · sample_rate / window_size`
//!   → vowel table lookup.
//! - **Accurate path** ([`Recognizer::analyze_accurate`]): pre-emphasis →
//!   window → LPC → polynomial roots → formants sorted ascending → F1/F2
//!   by [`FORMANT_INDICES`] → vowel table lookup on F1.
//!
//! Everything derived from the configuration (window coefficients,
//! smoothing kernel, vowel table) is built once in [`Recognizer::new`].
//! Every frame is then classified independently, so a `Recognizer` can be
//! shared across threads.
//!
//! The built-in vowel thresholds are calibrated against the default DCT
//! spectrum, whose peak for a tone at f0 sits near bin `2·f0·N/fs`; the
//! fast path therefore reports about twice the tone frequency under DCT.
//! With [`SpectralTransform::Fft`] bins map directly to frequency.

use std::sync::Arc;

use crate::error::{Error, Result};
use crate::formant::{
    roots_to_formants, select_formants, FormantFrame, FormantPoint, FormantTrack, FORMANT_INDICES,
};
use crate::lpc::{self, LpcMethod};
use crate::roots::{lpc_polynomial, LaguerreSolver, RootFinder};
use crate::smoothing::{convolve, find_local_peaks, gaussian_kernel, BoundaryPolicy, Peaks};
use crate::sound::Sound;
use crate::spectrum::{frequency_unit, spectral_energy, SpectralTransform};
use crate::vowel::{Language, VowelTable};
use crate::window::{apply_window, generate_window, WindowType};

/// Smallest accepted window size.
pub const MIN_WINDOW_SIZE: usize = 32;
/// Largest accepted window size.
pub const MAX_WINDOW_SIZE: usize = 8192;

/// LPC model order for the accurate path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LpcOrder {
    /// `2 + sample_rate / 1000` (integer division), e.g. 10 at 8 kHz.
    #[default]
    FromSampleRate,
    /// A fixed order.
    Fixed(usize),
}

impl LpcOrder {
    /// Resolve the order for a sample rate.
    pub fn resolve(self, sample_rate: u32) -> usize {
        match self {
            LpcOrder::FromSampleRate => 2 + (sample_rate / 1000) as usize,
            LpcOrder::Fixed(order) => order,
        }
    }
}

/// Recognition parameters.
///
/// # Example
///
/// ```
/// use vowelsync::{Language, RecognizerConfig, SpectralTransform};
///
/// let config = RecognizerConfig::default()
///     .with_window_size(2048)
///     .with_language(Language::Chinese)
///     .with_transform(SpectralTransform::Fft);
/// assert_eq!(config.vowel_table.labels().len(), 6);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct RecognizerConfig {
    /// Samples per frame. Rounded to the closest power of two, which must
    /// lie in `[32, 8192]`.
    pub window_size: usize,
    /// Minimum summed spectral magnitude for a frame to be classified.
    pub amplitude_threshold: f64,
    /// Vowel labels and formant floors.
    pub vowel_table: VowelTable,
    /// Window applied before either transform.
    pub window_type: WindowType,
    /// Fast-path spectral source.
    pub transform: SpectralTransform,
    /// Accurate-path LPC estimator.
    pub lpc_method: LpcMethod,
    /// Accurate-path LPC order.
    pub lpc_order: LpcOrder,
    /// Accurate-path pre-emphasis coefficient.
    pub pre_emphasis: f64,
    /// Gaussian smoothing kernel length (odd).
    pub filter_size: usize,
    /// Gaussian smoothing kernel variance.
    pub filter_variance: f64,
    /// Peaks to collect before stopping the scan.
    pub peak_count: usize,
}

impl Default for RecognizerConfig {
    fn default() -> Self {
        Self {
            window_size: 1024,
            amplitude_threshold: 0.01,
            vowel_table: VowelTable::japanese(),
            window_type: WindowType::Hamming,
            transform: SpectralTransform::Dct,
            lpc_method: LpcMethod::LevinsonDurbin,
            lpc_order: LpcOrder::FromSampleRate,
            pre_emphasis: 0.67,
            filter_size: 7,
            filter_variance: 5.0,
            peak_count: 1,
        }
    }
}

impl RecognizerConfig {
    /// Set the window size.
    pub fn with_window_size(mut self, window_size: usize) -> Self {
        self.window_size = window_size;
        self
    }

    /// Set the energy gate.
    pub fn with_amplitude_threshold(mut self, threshold: f64) -> Self {
        self.amplitude_threshold = threshold;
        self
    }

    /// Use a built-in vowel table.
    pub fn with_language(mut self, language: Language) -> Self {
        self.vowel_table = VowelTable::for_language(language);
        self
    }

    /// Use a custom vowel table.
    pub fn with_vowel_table(mut self, table: VowelTable) -> Self {
        self.vowel_table = table;
        self
    }

    /// Set the window function.
    pub fn with_window_type(mut self, window_type: WindowType) -> Self {
        self.window_type = window_type;
        self
    }

    /// Set the fast-path spectral transform.
    pub fn with_transform(mut self, transform: SpectralTransform) -> Self {
        self.transform = transform;
        self
    }

    /// Set the LPC estimator.
    pub fn with_lpc_method(mut self, method: LpcMethod) -> Self {
        self.lpc_method = method;
        self
    }

    /// Set the LPC order.
    pub fn with_lpc_order(mut self, order: LpcOrder) -> Self {
        self.lpc_order = order;
        self
    }

    /// Set the pre-emphasis coefficient.
    pub fn with_pre_emphasis(mut self, a: f64) -> Self {
        self.pre_emphasis = a;
        self
    }

    /// Set the smoothing kernel.
    pub fn with_filter(mut self, size: usize, variance: f64) -> Self {
        self.filter_size = size;
        self.filter_variance = variance;
        self
    }

    /// Set the peak count.
    pub fn with_peak_count(mut self, count: usize) -> Self {
        self.peak_count = count;
        self
    }
}

/// Closest power of two, ties rounding up (`0` maps to `0`).
pub fn closest_power_of_two(value: usize) -> usize {
    let next = match value.checked_next_power_of_two() {
        Some(next) => next,
        None => return 1 << (usize::BITS - 1),
    };
    if next == value {
        return value;
    }
    let prev = next >> 1;
    if value - prev < next - value {
        prev
    } else {
        next
    }
}

/// Intermediate results of the fast path.
#[derive(Debug, Clone, PartialEq)]
pub struct FastAnalysis {
    /// Summed spectral magnitude compared against the gate.
    pub energy: f64,
    /// Peaks of the smoothed spectrum; empty for a gated frame.
    pub peaks: Peaks,
    /// Formant estimate in Hz.
    pub formant: Option<f64>,
    /// Recognized vowel.
    pub vowel: Option<String>,
}

/// Results of the accurate path.
#[derive(Debug, Clone, PartialEq)]
pub struct AccurateAnalysis {
    /// Every formant, ascending by frequency.
    pub formants: Vec<FormantPoint>,
    /// Frequency at `FORMANT_INDICES[0]`.
    pub f1: Option<f64>,
    /// Frequency at `FORMANT_INDICES[1]`.
    pub f2: Option<f64>,
    /// Vowel recognized from `f1`.
    pub vowel: Option<String>,
    /// Whether every polynomial root converged.
    pub converged: bool,
}

impl AccurateAnalysis {
    /// No formants and no vowel.
    fn unclassified() -> Self {
        Self {
            formants: Vec::new(),
            f1: None,
            f2: None,
            vowel: None,
            converged: true,
        }
    }
}

/// Frame-by-frame vowel recognizer.
///
/// # Example
///
/// ```
/// use vowelsync::{Recognizer, RecognizerConfig};
///
/// let recognizer = Recognizer::new(RecognizerConfig::default().with_window_size(256)).unwrap();
/// let silence = vec![0.0; 256];
/// assert_eq!(recognizer.recognize(&silence, 16000).unwrap(), None);
/// ```
#[derive(Debug, Clone)]
pub struct Recognizer {
    config: RecognizerConfig,
    window: Vec<f64>,
    kernel: Vec<f64>,
    root_finder: Arc<dyn RootFinder>,
}

impl Recognizer {
    /// Validate the configuration and precompute window and kernel.
    ///
    /// # Errors
    ///
    /// `InvalidConfiguration` when the rounded window size is outside
    /// `[32, 8192]`, the threshold is negative or not finite, the kernel
    /// size is even, the variance is not positive, the peak count or a
    /// fixed LPC order is zero, or the pre-emphasis is not finite.
    pub fn new(mut config: RecognizerConfig) -> Result<Self> {
        let window_size = closest_power_of_two(config.window_size);
        if !(MIN_WINDOW_SIZE..=MAX_WINDOW_SIZE).contains(&window_size) {
            return Err(Error::InvalidConfiguration(format!(
                "window size {} (rounded to {}) is outside [{}, {}]",
                config.window_size, window_size, MIN_WINDOW_SIZE, MAX_WINDOW_SIZE
            )));
        }
        config.window_size = window_size;

        if !(config.amplitude_threshold.is_finite() && config.amplitude_threshold >= 0.0) {
            return Err(Error::InvalidConfiguration(format!(
                "amplitude threshold must be a non-negative number, got {}",
                config.amplitude_threshold
            )));
        }
        if config.peak_count == 0 {
            return Err(Error::InvalidConfiguration(
                "peak count must be at least 1".into(),
            ));
        }
        if config.lpc_order == LpcOrder::Fixed(0) {
            return Err(Error::InvalidConfiguration(
                "LPC order must be greater than 0".into(),
            ));
        }
        if !config.pre_emphasis.is_finite() {
            return Err(Error::InvalidConfiguration(format!(
                "pre-emphasis must be finite, got {}",
                config.pre_emphasis
            )));
        }

        let kernel = gaussian_kernel(config.filter_size, config.filter_variance)?;
        let window = generate_window(window_size, config.window_type);

        Ok(Self {
            config,
            window,
            kernel,
            root_finder: Arc::new(LaguerreSolver::default()),
        })
    }

    /// Replace the accurate-path root finder.
    pub fn with_root_finder(mut self, root_finder: Arc<dyn RootFinder>) -> Self {
        self.root_finder = root_finder;
        self
    }

    /// The validated configuration (window size already rounded).
    #[inline]
    pub fn config(&self) -> &RecognizerConfig {
        &self.config
    }

    /// Frame length every call expects.
    #[inline]
    pub fn window_size(&self) -> usize {
        self.config.window_size
    }

    fn check_frame(&self, frame: &[f64], sample_rate: u32) -> Result<()> {
        if frame.len() != self.config.window_size {
            return Err(Error::InvalidConfiguration(format!(
                "frame has {} samples, window size is {}",
                frame.len(),
                self.config.window_size
            )));
        }
        if sample_rate == 0 {
            return Err(Error::InvalidConfiguration(
                "sample rate must be positive".into(),
            ));
        }
        Ok(())
    }

    /// Recognize the vowel of one frame (fast path).
    ///
    /// Returns `None` for frames below the energy gate, frames without a
    /// spectral peak, and formants below the vowel table's second
    /// threshold.
    ///
    /// # Errors
    ///
    /// `InvalidConfiguration` if `frame.len()` differs from the window
    /// size or `sample_rate` is zero.
    pub fn recognize(&self, frame: &[f64], sample_rate: u32) -> Result<Option<String>> {
        Ok(self.analyze_fast(frame, sample_rate)?.vowel)
    }

    /// Run the fast path and keep its intermediate results.
    ///
    /// # Errors
    ///
    /// Same as [`Recognizer::recognize`].
    pub fn analyze_fast(&self, frame: &[f64], sample_rate: u32) -> Result<FastAnalysis> {
        self.check_frame(frame, sample_rate)?;

        let windowed = apply_window(frame, &self.window);
        let spectrum = self.config.transform.magnitudes(&windowed);
        let energy = spectral_energy(&spectrum);

        if energy < self.config.amplitude_threshold {
            tracing::debug!(energy, threshold = self.config.amplitude_threshold, "frame below energy gate");
            return Ok(FastAnalysis {
                energy,
                peaks: Peaks::default(),
                formant: None,
                vowel: None,
            });
        }

        let smoothed = convolve(&spectrum, &self.kernel, BoundaryPolicy::Repeat);
        let peaks = find_local_peaks(&smoothed, self.config.peak_count);

        let unit = frequency_unit(sample_rate, self.config.window_size);
        let formant = peaks.first().map(|(_, position)| position as f64 * unit);
        let vowel = formant
            .and_then(|f| self.config.vowel_table.classify(f))
            .map(str::to_owned);

        tracing::trace!(energy, ?formant, ?vowel, "fast path");

        Ok(FastAnalysis {
            energy,
            peaks,
            formant,
            vowel,
        })
    }

    /// Estimate formants from LPC roots and classify F1 (accurate path).
    ///
    /// A frame no longer than the LPC order, or one whose prediction error
    /// vanishes before the first coefficient (digital silence), has no
    /// usable model and yields an analysis without formants or vowel.
    ///
    /// # Errors
    ///
    /// - `InvalidConfiguration` for a bad frame length or sample rate
    /// - `Singular` from the normal-equations estimator on a silent frame
    pub fn analyze_accurate(&self, frame: &[f64], sample_rate: u32) -> Result<AccurateAnalysis> {
        self.check_frame(frame, sample_rate)?;

        let emphasized = lpc::pre_emphasis(frame, self.config.pre_emphasis);
        let windowed = apply_window(&emphasized, &self.window);

        let order = self.config.lpc_order.resolve(sample_rate);
        if frame.len() <= order {
            tracing::debug!(order, window = frame.len(), "LPC order exceeds frame");
            return Ok(AccurateAnalysis::unclassified());
        }

        let coefficients = lpc::estimate(&windowed, order, self.config.lpc_method)?;
        if coefficients[1..].iter().all(|&a| a == 0.0) {
            tracing::trace!(order, "degenerate LPC model");
            return Ok(AccurateAnalysis::unclassified());
        }

        let root_set = self.root_finder.find_roots(&lpc_polynomial(&coefficients))?;

        let formants = roots_to_formants(&root_set.roots, sample_rate as f64);
        let (f1, f2) = match select_formants(&formants) {
            Some((f1, f2)) => (Some(f1), Some(f2)),
            None => (formants.get(FORMANT_INDICES[0]).map(|f| f.frequency), None),
        };
        let vowel = f1
            .and_then(|f| self.config.vowel_table.classify(f))
            .map(str::to_owned);

        tracing::trace!(order, ?f1, ?f2, ?vowel, "accurate path");

        Ok(AccurateAnalysis {
            formants,
            f1,
            f2,
            vowel,
            converged: root_set.is_converged(),
        })
    }

    /// Recognize every `step` samples of a sound (fast path).
    ///
    /// Produces `ceil(n_samples / step)` results; the last frames are
    /// zero-padded.
    ///
    /// # Errors
    ///
    /// `InvalidConfiguration` if `step` or the sound's sample rate is zero.
    pub fn recognize_all(&self, sound: &Sound, step: usize) -> Result<Vec<Option<String>>> {
        let frames = self.batch_frames(sound, step)?;
        let sample_rate = sound.sample_rate();

        let vowels = map_frames(&frames, |frame| self.recognize(frame, sample_rate))
            .into_iter()
            .collect::<Result<Vec<_>>>()?;

        tracing::debug!(
            frames = vowels.len(),
            voiced = vowels.iter().filter(|v| v.is_some()).count(),
            "recognized sound"
        );
        Ok(vowels)
    }

    /// Formants every `step` samples of a sound (accurate path).
    ///
    /// Frames whose analysis fails with a recoverable error are logged and
    /// kept as empty frames.
    ///
    /// # Errors
    ///
    /// `InvalidConfiguration` if `step` or the sound's sample rate is zero.
    pub fn formant_tracks(&self, sound: &Sound, step: usize) -> Result<FormantTrack> {
        let frames = self.batch_frames(sound, step)?;
        let sample_rate = sound.sample_rate();
        let time_step = step as f64 / sample_rate as f64;

        let results = map_frames(&frames, |frame| self.analyze_accurate(frame, sample_rate));

        let mut track_frames = Vec::with_capacity(results.len());
        let mut dropped = 0;
        for (i, result) in results.into_iter().enumerate() {
            let time = i as f64 * time_step;
            match result {
                Ok(analysis) => track_frames.push(FormantFrame::new(time, analysis.formants)),
                Err(e) if e.is_recoverable() => {
                    tracing::warn!(frame = i, time, error = %e, "dropping frame");
                    dropped += 1;
                    track_frames.push(FormantFrame::new(time, Vec::new()));
                }
                Err(e) => return Err(e),
            }
        }

        tracing::debug!(frames = track_frames.len(), dropped, "formant tracks");
        Ok(FormantTrack::new(track_frames, time_step))
    }

    fn batch_frames(&self, sound: &Sound, step: usize) -> Result<Vec<Vec<f64>>> {
        if step == 0 {
            return Err(Error::InvalidConfiguration("frame step must be positive".into()));
        }
        if sound.sample_rate() == 0 {
            return Err(Error::InvalidConfiguration(
                "sample rate must be positive".into(),
            ));
        }
        Ok(sound.padded_frames(self.config.window_size, step).collect())
    }
}

#[cfg(feature = "parallel")]
fn map_frames<T, F>(frames: &[Vec<f64>], f: F) -> Vec<T>
where
    T: Send,
    F: Fn(&[f64]) -> T + Sync + Send,
{
    use rayon::prelude::*;
    frames.par_iter().map(|frame| f(frame)).collect()
}

#[cfg(not(feature = "parallel"))]
fn map_frames<T, F>(frames: &[Vec<f64>], f: F) -> Vec<T>
where
    F: Fn(&[f64]) -> T,
{
    frames.iter().map(|frame| f(frame)).collect()
}
