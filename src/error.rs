//! Error types for vowelsync.
//!
//! Errors fall into two groups:
//!
//! - **Configuration errors** (`InvalidConfiguration`, `DimensionMismatch`):
//!   the call cannot succeed until the caller fixes its inputs. The
//!   recognizer raises these at construction time, never mid-stream.
//! - **Per-frame numeric failures** (`Singular`, `RootFindingNonConvergence`):
//!   local to one analysis window. Batch processing logs them and moves on
//!   to the next frame.
//!
//! `DivisionByZero` is guarded against inside the pipeline; seeing it from a
//! public entry point means a degenerate input slipped past a guard.

use thiserror::Error;

/// Result type alias using vowelsync's Error type.
///
/// # Example
///
/// ```
/// use vowelsync::{Recognizer, RecognizerConfig, Result};
///
/// fn build() -> Result<Recognizer> {
///     Recognizer::new(RecognizerConfig::default().with_window_size(512))
/// }
/// # build().unwrap();
/// ```
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during analysis and recognition.
#[derive(Error, Debug)]
pub enum Error {
    /// A parameter is outside its valid range.
    ///
    /// Examples: window size outside `[32, 8192]`, LPC order of zero,
    /// a vowel table whose thresholds are not strictly increasing,
    /// a frame whose length differs from the configured window size.
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Two arrays that must agree in length do not.
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Length required by the operation.
        expected: usize,
        /// Length actually supplied.
        actual: usize,
    },

    /// A Toeplitz (or dense) matrix is not invertible.
    ///
    /// Typical cause: a silent frame, whose autocorrelation is all zero.
    /// Callers may fall back to the Levinson-Durbin LPC method or skip
    /// the frame.
    #[error("Matrix is singular")]
    Singular,

    /// Laguerre iteration hit its cap without converging.
    ///
    /// The root finder itself never returns this; it keeps its best
    /// estimate and reports the count in `RootSet::unconverged`. Callers
    /// that demand full convergence use `RootSet::require_converged`.
    #[error("Root finding did not converge for {roots} root(s)")]
    RootFindingNonConvergence {
        /// Number of roots whose iteration hit the cap.
        roots: usize,
    },

    /// Complex division by zero.
    #[error("Complex division by zero")]
    DivisionByZero,

    /// Error reading a WAV file.
    ///
    /// This wraps errors from the `hound` WAV library.
    #[error("Failed to read audio file: {0}")]
    AudioRead(#[from] hound::Error),

    /// Audio file must be mono.
    ///
    /// The u16 parameter contains the actual number of channels.
    #[error("Audio must be mono (single channel), got {0} channels")]
    NotMono(u16),
}

impl Error {
    /// Whether the error is local to one frame.
    ///
    /// Recoverable errors let a batch continue with the next frame;
    /// everything else needs a configuration change.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Error::Singular | Error::RootFindingNonConvergence { .. }
        )
    }
}
