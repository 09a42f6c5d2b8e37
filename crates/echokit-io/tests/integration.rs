//! Integration tests for echokit-io WAV I/O.

use echokit_core::{PcmRecording, PcmSource, up_chirp};
use echokit_io::{Error, deinterleave, read_wav, read_wav_info, write_wav};
use tempfile::NamedTempFile;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Interleaves two equal-length channels.
fn interleave(left: &[i16], right: &[i16]) -> Vec<i16> {
    left.iter().zip(right).flat_map(|(&l, &r)| [l, r]).collect()
}

// ---------------------------------------------------------------------------
// Roundtrips
// ---------------------------------------------------------------------------

#[test]
fn wav_roundtrip_mono_chirp() {
    let chirp = up_chirp(48_000, 16_000.0, 23_000.0, 0.05).unwrap();
    let recording = PcmRecording::mono(48_000, chirp.clone()).unwrap();

    let file = NamedTempFile::new().unwrap();
    write_wav(file.path(), &recording).unwrap();

    let loaded = read_wav(file.path()).unwrap();
    assert_eq!(loaded.sample_rate(), 48_000);
    assert_eq!(loaded.channels(), 1);
    assert_eq!(loaded.samples(), chirp.as_slice());
    assert_eq!(loaded, recording);
}

#[test]
fn wav_roundtrip_stereo_keeps_channels_apart() {
    let left = up_chirp(8000, 100.0, 1000.0, 0.1).unwrap();
    let right: Vec<i16> = left.iter().map(|&s| -(s / 3)).collect();
    let recording = PcmRecording::new(8000, 2, interleave(&left, &right)).unwrap();

    let file = NamedTempFile::new().unwrap();
    write_wav(file.path(), &recording).unwrap();
    let loaded = read_wav(file.path()).unwrap();

    assert_eq!(loaded.num_frames(), left.len());
    assert_eq!(loaded.channel(0).unwrap(), left);
    assert_eq!(loaded.channel(1).unwrap(), right);

    let split = deinterleave(loaded.samples(), loaded.channels()).unwrap();
    assert_eq!(split, vec![left, right]);
}

#[test]
fn extremes_survive() {
    let samples = vec![i16::MIN, -1, 0, 1, i16::MAX];
    let recording = PcmRecording::mono(44_100, samples.clone()).unwrap();

    let file = NamedTempFile::new().unwrap();
    write_wav(file.path(), &recording).unwrap();
    assert_eq!(read_wav(file.path()).unwrap().into_samples(), samples);
}

// ---------------------------------------------------------------------------
// Header
// ---------------------------------------------------------------------------

#[test]
fn info_reports_header() {
    let recording = PcmRecording::new(48_000, 2, vec![0; 2 * 24_000]).unwrap();
    let file = NamedTempFile::new().unwrap();
    write_wav(file.path(), &recording).unwrap();

    let info = read_wav_info(file.path()).unwrap();
    assert_eq!(info.channels, 2);
    assert_eq!(info.sample_rate, 48_000);
    assert_eq!(info.bits_per_sample, 16);
    assert!(info.is_pcm16());
    assert_eq!(info.num_frames, 24_000);
    assert!((info.duration_secs - 0.5).abs() < 1e-12);
}

// ---------------------------------------------------------------------------
// Rejections
// ---------------------------------------------------------------------------

#[test]
fn float_files_are_rejected() {
    let file = NamedTempFile::new().unwrap();
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: 48_000,
        bits_per_sample: 32,
        sample_format: hound::SampleFormat::Float,
    };
    let mut writer = hound::WavWriter::create(file.path(), spec).unwrap();
    writer.write_sample(0.5f32).unwrap();
    writer.finalize().unwrap();

    let info = read_wav_info(file.path()).unwrap();
    assert!(info.is_float);
    assert!(!info.is_pcm16());

    let err = read_wav(file.path()).unwrap_err();
    assert!(matches!(err, Error::UnsupportedFormat(_)));
    assert!(err.to_string().contains("32-bit float"));
}

#[test]
fn twenty_four_bit_files_are_rejected() {
    let file = NamedTempFile::new().unwrap();
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: 48_000,
        bits_per_sample: 24,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(file.path(), spec).unwrap();
    writer.write_sample(1000i32).unwrap();
    writer.finalize().unwrap();

    assert!(matches!(
        read_wav(file.path()),
        Err(Error::UnsupportedFormat(_))
    ));
}

#[test]
fn missing_file_is_a_wav_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = read_wav(dir.path().join("absent.wav")).unwrap_err();
    assert!(matches!(err, Error::Wav(_)));
}
