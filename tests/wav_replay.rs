mod common;

use approx::assert_abs_diff_eq;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use bandscope::audio::{AnalyzerSystem, CaptureDevice, SampleSource, WavFile};
use bandscope::error::{CaptureError, StartError};
use bandscope::params::{AnalyzerConfig, Tunables};

use common::{sine, wait_for_frame, FRAME_SIZE, SAMPLE_RATE_HZ};

fn fixture(name: &str, samples: &[i16]) -> PathBuf {
    let path = std::env::temp_dir().join(format!("bandscope-{}-{}.wav", name, std::process::id()));
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: SAMPLE_RATE_HZ,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(&path, spec).unwrap();
    for &sample in samples {
        writer.write_sample(sample).unwrap();
    }
    writer.finalize().unwrap();
    path
}

#[test]
fn test_wav_samples_replay_in_order_and_loop() {
    let path = fixture("order", &[1, -2, 300, -4000]);
    let mut source = WavFile::new(&path).configure(SAMPLE_RATE_HZ, FRAME_SIZE).unwrap();
    assert!(!source.is_clocked());

    let read: Vec<i16> = (0..6)
        .map(|_| source.read_sample(Duration::from_millis(1)).unwrap().0)
        .collect();
    assert_eq!(read, vec![1, -2, 300, -4000, 1, -2]);
}

#[test]
fn test_wav_tone_through_running_system() {
    let path = fixture("tone", &sine(500.0, 40.0, FRAME_SIZE * 4));
    let system = AnalyzerSystem::start(
        AnalyzerConfig::default(),
        WavFile::new(&path),
        Arc::new(Tunables::new(4, 30)),
    )
    .unwrap();

    let reader = system.reader();
    // Replay is paced at the sample rate, about 50ms per frame
    assert!(wait_for_frame(&reader, 2, Duration::from_secs(5)));

    let spectrum = reader.latest();
    assert!(spectrum.bands[7] > 0);
    assert_eq!(spectrum.bands.iter().copied().max(), Some(spectrum.bands[7]));
    assert_abs_diff_eq!(spectrum.peak.frequency_hz, 500.0, epsilon = 2.0);
}

#[test]
fn test_empty_wav_is_fatal() {
    let path = fixture("empty", &[]);
    let result = AnalyzerSystem::start(
        AnalyzerConfig::default(),
        WavFile::new(&path),
        Arc::new(Tunables::default()),
    );
    assert!(matches!(
        result,
        Err(StartError::Capture(CaptureError::EmptyWav(_)))
    ));
}

#[test]
fn test_missing_wav_is_fatal() {
    let path = std::env::temp_dir().join("bandscope-does-not-exist.wav");
    let result = WavFile::new(&path).configure(SAMPLE_RATE_HZ, FRAME_SIZE);
    assert!(matches!(result, Err(CaptureError::Wav(_, _))));
}
