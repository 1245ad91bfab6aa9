//! Vowel classification by formant thresholds.
//!
//! A [`VowelTable`] pairs vowel labels with ascending formant floors. The
//! classifier scans every threshold and keeps the label of the last one the
//! formant exceeds; a formant at or below the second threshold is treated as
//! silence or unclassifiable and yields no vowel.
//!
//! The built-in Japanese and Chinese tables are calibration constants for
//! the fast recognition path and must not be tuned per call.

use crate::error::{Error, Result};

/// Languages with a built-in vowel table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Language {
    /// Japanese: i, u, e, o, a.
    #[default]
    Japanese,
    /// Chinese: i, v, u, e, o, a.
    Chinese,
}

/// Ordered vowel labels with their formant floors (Hz).
#[derive(Debug, Clone, PartialEq)]
pub struct VowelTable {
    labels: Vec<String>,
    thresholds: Vec<f64>,
}

impl VowelTable {
    /// Build a table from parallel label/threshold lists.
    ///
    /// # Errors
    ///
    /// `InvalidConfiguration` unless both lists are non-empty and equally
    /// long, `thresholds[0] == 0`, and thresholds are finite and strictly
    /// increasing.
    pub fn new<S: Into<String>>(labels: Vec<S>, thresholds: Vec<f64>) -> Result<Self> {
        if labels.is_empty() || labels.len() != thresholds.len() {
            return Err(Error::InvalidConfiguration(format!(
                "vowel table needs matching non-empty lists, got {} labels and {} thresholds",
                labels.len(),
                thresholds.len()
            )));
        }
        if thresholds[0] != 0.0 {
            return Err(Error::InvalidConfiguration(format!(
                "first vowel threshold must be 0, got {}",
                thresholds[0]
            )));
        }
        if thresholds.iter().any(|t| !t.is_finite()) || thresholds.windows(2).any(|w| w[0] >= w[1]) {
            return Err(Error::InvalidConfiguration(
                "vowel thresholds must be finite and strictly increasing".into(),
            ));
        }

        Ok(Self {
            labels: labels.into_iter().map(Into::into).collect(),
            thresholds,
        })
    }

    /// Built-in table for `language`.
    pub fn for_language(language: Language) -> Self {
        match language {
            Language::Japanese => Self::japanese(),
            Language::Chinese => Self::chinese(),
        }
    }

    /// Japanese table.
    pub fn japanese() -> Self {
        Self::builtin(&["i", "u", "e", "o", "a"], &[0.0, 250.0, 300.0, 450.0, 600.0])
    }

    /// Chinese table.
    pub fn chinese() -> Self {
        Self::builtin(
            &["i", "v", "u", "e", "o", "a"],
            &[0.0, 100.0, 250.0, 300.0, 450.0, 600.0],
        )
    }

    fn builtin(labels: &[&str], thresholds: &[f64]) -> Self {
        Self {
            labels: labels.iter().map(|l| l.to_string()).collect(),
            thresholds: thresholds.to_vec(),
        }
    }

    /// Vowel labels in threshold order.
    #[inline]
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Formant floors in Hz.
    #[inline]
    pub fn thresholds(&self) -> &[f64] {
        &self.thresholds
    }

    /// Classify a formant frequency.
    ///
    /// Returns the label of the largest threshold the formant exceeds, or
    /// `None` if it does not exceed the second threshold (or is NaN).
    ///
    /// # Example
    ///
    /// ```
    /// use vowelsync::VowelTable;
    ///
    /// let table = VowelTable::new(vec!["u", "e", "a"], vec![0.0, 250.0, 450.0]).unwrap();
    /// assert_eq!(table.classify(300.0), Some("e"));
    /// assert_eq!(table.classify(100.0), None);
    /// assert_eq!(table.classify(500.0), Some("a"));
    /// ```
    pub fn classify(&self, formant: f64) -> Option<&str> {
        let mut selected = None;
        for (i, &threshold) in self.thresholds.iter().enumerate() {
            if formant > threshold {
                selected = Some(i);
            }
        }

        match selected {
            Some(i) if i >= 1 => Some(self.labels[i].as_str()),
            _ => None,
        }
    }
}

impl Default for VowelTable {
    fn default() -> Self {
        Self::japanese()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classification_picks_the_last_exceeded_threshold() {
        let table = VowelTable::new(vec!["u", "e", "a"], vec![0.0, 250.0, 450.0]).unwrap();
        assert_eq!(table.classify(300.0), Some("e"));
        assert_eq!(table.classify(100.0), None);
        assert_eq!(table.classify(500.0), Some("a"));
        // Thresholds are exclusive floors
        assert_eq!(table.classify(250.0), None);
        assert_eq!(table.classify(450.0), Some("e"));
        assert_eq!(table.classify(f64::NAN), None);
    }

    #[test]
    fn builtin_tables() {
        let jp = VowelTable::for_language(Language::Japanese);
        assert_eq!(jp.labels(), ["i", "u", "e", "o", "a"]);
        assert_eq!(jp.thresholds(), [0.0, 250.0, 300.0, 450.0, 600.0]);
        assert_eq!(jp.classify(275.0), Some("u"));
        assert_eq!(jp.classify(700.0), Some("a"));

        let cn = VowelTable::for_language(Language::Chinese);
        assert_eq!(cn.labels(), ["i", "v", "u", "e", "o", "a"]);
        assert_eq!(cn.thresholds(), [0.0, 100.0, 250.0, 300.0, 450.0, 600.0]);
        assert_eq!(cn.classify(150.0), Some("v"));
        assert_eq!(cn.classify(80.0), None);
    }

    #[test]
    fn invalid_tables_are_rejected() {
        assert!(VowelTable::new(Vec::<String>::new(), vec![]).is_err());
        assert!(VowelTable::new(vec!["a", "b"], vec![0.0]).is_err());
        assert!(VowelTable::new(vec!["a", "b"], vec![10.0, 20.0]).is_err());
        assert!(VowelTable::new(vec!["a", "b", "c"], vec![0.0, 300.0, 300.0]).is_err());
        assert!(VowelTable::new(vec!["a", "b"], vec![0.0, f64::INFINITY]).is_err());
    }
}
