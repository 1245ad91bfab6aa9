//! End-to-end recognition through the public API.

use std::f64::consts::PI;
use std::sync::Arc;

use approx::assert_abs_diff_eq;
use vowelsync::{
    CompanionMatrixSolver, Error, Interpolation, Language, Recognizer, RecognizerConfig, Sound,
    SpectralTransform, VowelTable,
};

fn tone(freq: f64, amplitude: f64, sample_rate: u32, n: usize) -> Vec<f64> {
    (0..n)
        .map(|i| amplitude * (2.0 * PI * freq * i as f64 / sample_rate as f64).sin())
        .collect()
}

fn write_wav(name: &str, samples: &[f64], sample_rate: u32) -> std::path::PathBuf {
    let path = std::env::temp_dir().join(name);
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(&path, spec).unwrap();
    for &s in samples {
        writer.write_sample((s * 32767.0).round() as i16).unwrap();
    }
    writer.finalize().unwrap();
    path
}

#[test]
fn wav_file_to_vowels() {
    let mut samples = vec![0.0; 1024];
    samples.extend(tone(500.0, 0.5, 16000, 2048));
    let path = write_wav("vowelsync_wav_file_to_vowels.wav", &samples, 16000);

    let sound = Sound::from_file(&path).unwrap().normalize();
    std::fs::remove_file(&path).ok();
    assert_eq!(sound.sample_rate(), 16000);
    assert_eq!(sound.n_samples(), 3072);

    let config = RecognizerConfig::default().with_transform(SpectralTransform::Fft);
    let vowels = Recognizer::new(config).unwrap().recognize_all(&sound, 1024).unwrap();
    assert_eq!(vowels.len(), 3);
    assert_eq!(vowels[0], None);
    assert_eq!(vowels[1].as_deref(), Some("o"));
    assert_eq!(vowels[2].as_deref(), Some("o"));
}

#[test]
fn language_changes_the_label_set() {
    // 1000 Hz plus a weaker 4000 Hz component lands in the top bucket
    let frame: Vec<f64> = tone(1000.0, 1.0, 16000, 1024)
        .iter()
        .zip(tone(4000.0, 0.3, 16000, 1024))
        .map(|(a, b)| a + b)
        .collect();

    let base = RecognizerConfig::default().with_transform(SpectralTransform::Fft);
    let jp = Recognizer::new(base.clone()).unwrap();
    let cn = Recognizer::new(base.clone().with_language(Language::Chinese)).unwrap();
    assert_eq!(jp.recognize(&frame, 16000).unwrap().as_deref(), Some("a"));
    assert_eq!(cn.recognize(&frame, 16000).unwrap().as_deref(), Some("a"));

    let table = VowelTable::new(vec!["closed", "mid", "open"], vec![0.0, 400.0, 1200.0]).unwrap();
    let custom = Recognizer::new(base.with_vowel_table(table)).unwrap();
    assert_eq!(custom.recognize(&frame, 16000).unwrap().as_deref(), Some("mid"));
}

#[test]
fn formant_track_over_a_synthetic_vowel() {
    // Impulse train through resonances at 500, 1500 and 2500 Hz
    let sample_rate = 8000;
    let poles = [(500.0, 0.97), (1500.0, 0.95), (2500.0, 0.93)];
    let mut a = vec![1.0];
    for &(freq, radius) in &poles {
        let theta = 2.0 * PI * freq / sample_rate as f64;
        let section = [1.0, -2.0 * radius * f64::cos(theta), radius * radius];
        let mut next = vec![0.0; a.len() + 2];
        for (i, &ai) in a.iter().enumerate() {
            for (j, &sj) in section.iter().enumerate() {
                next[i + j] += ai * sj;
            }
        }
        a = next;
    }
    let mut state: u32 = 12345;
    let mut x = vec![0.0; 1024];
    for i in 0..x.len() {
        state = state.wrapping_mul(1_103_515_245).wrapping_add(12345);
        let noise = ((state >> 16) & 0x7fff) as f64 / 32768.0 - 0.5;
        let excitation = if i % 80 == 0 { 1.0 } else { 0.0 } + 0.01 * noise;
        let feedback: f64 = (1..a.len()).filter(|&k| k <= i).map(|k| a[k] * x[i - k]).sum();
        x[i] = excitation - feedback;
    }
    let sound = Sound::from_slice(&x, sample_rate);

    let recognizer = Recognizer::new(RecognizerConfig::default().with_window_size(512))
        .unwrap()
        .with_root_finder(Arc::new(CompanionMatrixSolver::default()));
    let track = recognizer.formant_tracks(&sound, 512).unwrap();

    assert_eq!(track.n_frames(), 2);
    assert_eq!(track.times().to_vec(), vec![0.0, 0.064]);
    let first = &track.frames()[0];
    assert!(first
        .formants
        .iter()
        .any(|f| (f.frequency - 1500.0).abs() < 20.0));
    assert_abs_diff_eq!(
        track.get_value_at_time(1, 0.0, Interpolation::Nearest).unwrap(),
        first.formants[1].frequency
    );
}

#[test]
fn configuration_errors_surface_early() {
    assert!(matches!(
        Recognizer::new(RecognizerConfig::default().with_window_size(8)),
        Err(Error::InvalidConfiguration(_))
    ));
    assert!(!Error::InvalidConfiguration(String::new()).is_recoverable());

    let recognizer = Recognizer::new(RecognizerConfig::default()).unwrap();
    let silent = Sound::from_slice(&[0.0; 100], 0);
    assert!(matches!(
        recognizer.recognize_all(&silent, 10),
        Err(Error::InvalidConfiguration(_))
    ));
}
