//! Recognize vowels in a WAV file with both recognition paths.
//!
//! Usage: cargo run --example recognize_wav -- <file.wav> [channel]
//!
//! Set `RUST_LOG=vowelsync=debug` to see per-batch diagnostics.

use std::time::Instant;

use tracing_subscriber::EnvFilter;
use vowelsync::{ms_to_samples, Recognizer, RecognizerConfig, Sound};

fn main() -> vowelsync::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut args = std::env::args().skip(1);
    let path = match args.next() {
        Some(p) => p,
        None => {
            eprintln!("usage: recognize_wav <file.wav> [channel]");
            std::process::exit(2);
        }
    };
    let channel: Option<usize> = args.next().and_then(|c| c.parse().ok());

    println!("Loading: {}", path);
    let sound = match channel {
        Some(ch) => Sound::from_file_channel(&path, ch)?,
        None => match Sound::from_file(&path) {
            Ok(s) => s,
            Err(vowelsync::Error::NotMono(ch)) => {
                println!("{} channels, extracting channel 0...", ch);
                Sound::from_file_channel(&path, 0)?
            }
            Err(e) => return Err(e),
        },
    }
    .normalize();
    println!("{}", sound);

    let recognizer = Recognizer::new(RecognizerConfig::default())?;
    let step = ms_to_samples(10.0, sound.sample_rate()).max(1);

    let start = Instant::now();
    let vowels = recognizer.recognize_all(&sound, step)?;
    println!("Fast path: {} frames in {:.2?}", vowels.len(), start.elapsed());

    let start = Instant::now();
    let track = recognizer.formant_tracks(&sound, step)?;
    println!("Accurate path: {} frames in {:.2?}", track.n_frames(), start.elapsed());

    let f1 = track.formant_values(1);
    let f2 = track.formant_values(2);
    println!("\n  time   fast   F1 (Hz)   F2 (Hz)");
    for (i, vowel) in vowels.iter().enumerate() {
        println!(
            "{:6.3}   {:>4}   {:7.1}   {:7.1}",
            i as f64 * track.time_step(),
            vowel.as_deref().unwrap_or("-"),
            f1[i],
            f2[i]
        );
    }

    Ok(())
}
