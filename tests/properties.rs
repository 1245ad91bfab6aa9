//! Property tests for the numeric building blocks.

use proptest::prelude::*;
use vowelsync::lpc::{estimate, LpcMethod};
use vowelsync::smoothing::{convolve, find_local_peaks, gaussian_kernel, BoundaryPolicy};
use vowelsync::window::{generate_window, WindowType};
use vowelsync::{Complex, LaguerreSolver, RootFinder, VowelTable};

fn window_type() -> impl Strategy<Value = WindowType> {
    prop_oneof![
        Just(WindowType::Rectangular),
        Just(WindowType::Triangular),
        Just(WindowType::Hamming),
        Just(WindowType::Hanning),
        Just(WindowType::Blackman),
        Just(WindowType::BlackmanHarris),
    ]
}

fn vowel_rank(table: &VowelTable, formant: f64) -> Option<usize> {
    let label = table.classify(formant)?;
    table.labels().iter().position(|l| l == label)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn windows_are_deterministic_and_bounded(size in 0usize..600, kind in window_type()) {
        let w = generate_window(size, kind);
        prop_assert_eq!(w.len(), size);
        prop_assert_eq!(&w, &generate_window(size, kind));
        for &v in &w {
            prop_assert!((-1e-12..=1.0 + 1e-12).contains(&v));
        }
    }

    #[test]
    fn kernel_is_normalized(half in 0usize..15, variance in 0.1f64..20.0) {
        let kernel = gaussian_kernel(2 * half + 1, variance).unwrap();
        prop_assert!((kernel.iter().sum::<f64>() - 1.0).abs() < 1e-12);
        // Symmetric around the middle tap
        for i in 0..kernel.len() {
            prop_assert!((kernel[i] - kernel[kernel.len() - 1 - i]).abs() < 1e-15);
        }
    }

    #[test]
    fn smoothing_keeps_constant_signals(level in -10.0f64..10.0, len in 1usize..64) {
        let kernel = gaussian_kernel(7, 5.0).unwrap();
        let out = convolve(&vec![level; len], &kernel, BoundaryPolicy::Repeat);
        prop_assert_eq!(out.len(), len);
        for v in out {
            prop_assert!((v - level).abs() < 1e-9);
        }
    }

    #[test]
    fn peaks_are_local_maxima(data in prop::collection::vec(0.0f64..1.0, 0..200), max_count in 1usize..6) {
        let peaks = find_local_peaks(&data, max_count);
        prop_assert!(peaks.len() <= max_count);
        prop_assert_eq!(peaks.values.len(), peaks.positions.len());
        for (&value, &p) in peaks.values.iter().zip(peaks.positions.iter()) {
            prop_assert_eq!(value, data[p]);
            prop_assert!(p >= 1 && p + 1 < data.len());
            prop_assert!(data[p - 1] < data[p] && data[p] >= data[p + 1]);
        }
        prop_assert!(peaks.positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn classification_is_monotonic(a in 0.0f64..1000.0, b in 0.0f64..1000.0) {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        for table in [VowelTable::japanese(), VowelTable::chinese()] {
            prop_assert!(vowel_rank(&table, lo) <= vowel_rank(&table, hi));
            if lo <= table.thresholds()[1] {
                prop_assert_eq!(table.classify(lo), None);
            }
        }
    }

    #[test]
    fn lpc_is_normalized(
        frame in prop::collection::vec(-1.0f64..1.0, 20..200),
        order in 1usize..12,
    ) {
        let a = estimate(&frame, order, LpcMethod::LevinsonDurbin).unwrap();
        prop_assert_eq!(a.len(), order + 1);
        prop_assert_eq!(a[0], 1.0);
        prop_assert!(a.iter().all(|c| c.is_finite()));
    }

    #[test]
    fn laguerre_roots_satisfy_the_polynomial(roots in prop::collection::vec(-0.95f64..0.95, 1..7)) {
        // Expand Π (x − rᵢ), constant term first
        let mut coefficients = vec![1.0];
        for &r in &roots {
            let mut next = vec![0.0; coefficients.len() + 1];
            for (i, &c) in coefficients.iter().enumerate() {
                next[i] -= r * c;
                next[i + 1] += c;
            }
            coefficients = next;
        }

        let set = LaguerreSolver::default().find_roots(&coefficients).unwrap();
        prop_assert_eq!(set.roots.len(), roots.len());
        for z in &set.roots {
            let residual = coefficients
                .iter()
                .rev()
                .fold(Complex::ZERO, |acc, &c| acc * *z + c);
            prop_assert!(residual.abs() < 1e-9, "residual {} at {}", residual, z);
        }
    }
}
