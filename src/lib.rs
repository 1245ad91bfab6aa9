//! # vowelsync
//!
//! Formant-based vowel recognition for lip-sync animation.
//!
//! Each analysis window of a speech recording is classified into a vowel
//! category (Japanese `i u e o a` or Chinese `i v u e o a`, or a custom
//! table) that a renderer can map onto mouth blend shapes. The crate owns
//! the signal-processing side only: it never touches an animation engine,
//! a UI or an audio device.
//!
//! # Recognition Paths
//!
//! - **Fast**: windowed DCT (or FFT) magnitude spectrum, Gaussian
//!   smoothing, first local peak → formant → vowel. Cheap enough to run
//!   per frame during playback.
//! - **Accurate**: pre-emphasis, LPC (Levinson-Durbin or normal
//!   equations), complex polynomial roots (Laguerre or companion matrix)
//!   → sorted formants → F1/F2 → vowel. Meant for offline analysis.
//!
//! # Quick Start
//!
//! ```no_run
//! use vowelsync::{Recognizer, RecognizerConfig, Sound, ms_to_samples};
//!
//! let sound = Sound::from_file("speech.wav").unwrap().normalize();
//! let recognizer = Recognizer::new(RecognizerConfig::default()).unwrap();
//!
//! // One label per 10 ms
//! let step = ms_to_samples(10.0, sound.sample_rate());
//! for (i, vowel) in recognizer.recognize_all(&sound, step).unwrap().iter().enumerate() {
//!     println!("{:4}: {}", i, vowel.as_deref().unwrap_or("-"));
//! }
//!
//! // Formant tracks from the accurate path
//! let track = recognizer.formant_tracks(&sound, step).unwrap();
//! let f1 = track.formant_values(1);
//! ```
//!
//! # Module Organization
//!
//! The numeric building blocks (`complex`, `window`, `spectrum`,
//! `smoothing`, `toeplitz`, `lpc`, `roots`) are public and usable on their
//! own. `formant` and `vowel` turn their output into labels, and
//! `recognizer` wires everything together behind one configuration.
//!
//! # Logging
//!
//! Diagnostics go through `tracing`. The library never installs a
//! subscriber; see `demos/recognize_wav.rs` for one way to do it.

// Module declarations
pub mod complex;
pub mod error;
pub mod formant;
pub mod lpc;
pub mod recognizer;
pub mod roots;
pub mod smoothing;
pub mod sound;
pub mod spectrum;
pub mod toeplitz;
pub mod vowel;
pub mod window;

/// Error types for vowelsync operations.
pub use error::{Error, Result};

/// Complex numbers used by the root finders.
pub use complex::Complex;

/// Formant extraction and tracks.
///
/// - `FormantPoint`: Individual formant (frequency + bandwidth)
/// - `FormantFrame` / `FormantTrack`: Formants over time
/// - `Interpolation`: Method for querying a track between frames
pub use formant::{
    roots_to_formants, FormantFrame, FormantPoint, FormantTrack, Interpolation, FORMANT_INDICES,
};

/// LPC estimation.
pub use lpc::LpcMethod;

/// Recognition façade and configuration.
pub use recognizer::{AccurateAnalysis, FastAnalysis, LpcOrder, Recognizer, RecognizerConfig};

/// Polynomial root finding strategies.
pub use roots::{CompanionMatrixSolver, LaguerreSolver, RootFinder, RootSet};

/// Sample container and framing.
pub use sound::{ms_to_samples, Sound};

/// Spectral sources for the fast path.
pub use spectrum::SpectralTransform;

/// Vowel tables.
pub use vowel::{Language, VowelTable};

/// Window functions.
pub use window::WindowType;
