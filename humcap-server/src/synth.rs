//! WAV synthesis
//!
//! Renders sine-tone melodies to in-memory 16-bit mono PCM WAV files. Used to
//! serve playable versions of catalog tunes and a fixed test tone.

use hound::{SampleFormat, WavSpec, WavWriter};
use humcap_common::catalog::{Note, Tune};
use std::f64::consts::PI;
use std::io::Cursor;

/// Output sample rate for all synthesized audio
pub const SAMPLE_RATE: u32 = 44_100;

/// Peak amplitude of a single tone (full scale = 1.0)
const AMPLITUDE: f64 = 0.3;

/// Linear fade applied at note edges to avoid clicks
const EDGE_FADE_SECS: f64 = 0.01;

/// Test tone frequency (A4)
pub const TEST_TONE_HZ: f64 = 440.0;

/// Test tone length
pub const TEST_TONE_SECS: f64 = 2.0;

fn wav_spec() -> WavSpec {
    WavSpec {
        channels: 1,
        sample_rate: SAMPLE_RATE,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    }
}

fn encode(samples: &[f64]) -> Result<Vec<u8>, hound::Error> {
    let mut cursor = Cursor::new(Vec::with_capacity(44 + samples.len() * 2));
    {
        let mut writer = WavWriter::new(&mut cursor, wav_spec())?;
        for &sample in samples {
            let value = (sample.clamp(-1.0, 1.0) * i16::MAX as f64).round() as i16;
            writer.write_sample(value)?;
        }
        writer.finalize()?;
    }
    Ok(cursor.into_inner())
}

fn seconds_to_samples(secs: f64) -> usize {
    (secs.max(0.0) * SAMPLE_RATE as f64).round() as usize
}

/// Mix a note into `buffer` with short linear fades at both ends
fn add_note(buffer: &mut [f64], note: &Note) {
    let start = seconds_to_samples(note.time);
    let length = seconds_to_samples(note.duration);
    let fade = seconds_to_samples(EDGE_FADE_SECS).min(length / 2).max(1);
    let rate = SAMPLE_RATE as f64;

    for i in 0..length {
        let Some(slot) = buffer.get_mut(start + i) else {
            break;
        };
        let envelope = if i < fade {
            i as f64 / fade as f64
        } else if length - i <= fade {
            (length - i) as f64 / fade as f64
        } else {
            1.0
        };
        *slot += (2.0 * PI * note.freq * i as f64 / rate).sin() * AMPLITUDE * envelope;
    }
}

/// Render a sequence of notes to a WAV file `total_secs` long
pub fn render_notes(notes: &[Note], total_secs: f64) -> Result<Vec<u8>, hound::Error> {
    let mut buffer = vec![0.0; seconds_to_samples(total_secs)];
    for note in notes {
        add_note(&mut buffer, note);
    }
    encode(&buffer)
}

/// Render a catalog tune
///
/// The file lasts for the tune's playback duration, or longer if the last
/// note would otherwise be cut off.
pub fn render_tune(tune: &Tune) -> Result<Vec<u8>, hound::Error> {
    let playback_secs = tune.playback_duration_ms as f64 / 1000.0;
    render_notes(tune.notes, playback_secs.max(tune.melody_length_secs()))
}

/// Render a single steady sine tone without edge fades
pub fn render_tone(freq: f64, duration_secs: f64) -> Result<Vec<u8>, hound::Error> {
    let rate = SAMPLE_RATE as f64;
    let samples: Vec<f64> = (0..seconds_to_samples(duration_secs))
        .map(|i| (2.0 * PI * freq * i as f64 / rate).sin() * AMPLITUDE)
        .collect();
    encode(&samples)
}

/// Render the fixed 2 second 440 Hz test tone
pub fn render_test_tone() -> Result<Vec<u8>, hound::Error> {
    render_tone(TEST_TONE_HZ, TEST_TONE_SECS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use humcap_common::catalog;

    fn read_back(bytes: Vec<u8>) -> (WavSpec, Vec<i16>) {
        let mut reader = hound::WavReader::new(Cursor::new(bytes)).unwrap();
        let spec = reader.spec();
        let samples = reader.samples::<i16>().map(|s| s.unwrap()).collect();
        (spec, samples)
    }

    #[test]
    fn test_test_tone_format() {
        let bytes = render_test_tone().unwrap();
        assert_eq!(&bytes[0..4], b"RIFF");
        assert_eq!(&bytes[8..12], b"WAVE");

        let (spec, samples) = read_back(bytes);
        assert_eq!(spec.channels, 1);
        assert_eq!(spec.sample_rate, 44_100);
        assert_eq!(spec.bits_per_sample, 16);
        assert_eq!(samples.len(), 88_200);

        let peak = samples.iter().map(|s| s.unsigned_abs()).max().unwrap();
        let expected_peak = (AMPLITUDE * i16::MAX as f64).round() as u16;
        assert!(peak <= expected_peak && peak > expected_peak - 50);
    }

    #[test]
    fn test_tune_length_and_silence_between_notes() {
        let tune = catalog::lookup("mcdonalds-jingle").unwrap();
        let (_, samples) = read_back(render_tune(tune).unwrap());
        assert_eq!(samples.len(), 3 * 44_100);

        // Gap between the first note (ends 0.3s) and second (starts 0.4s)
        let gap = &samples[seconds_to_samples(0.32)..seconds_to_samples(0.38)];
        assert!(gap.iter().all(|&s| s == 0));

        // Silence after the last note (ends 1.9s)
        assert!(samples[seconds_to_samples(2.0)..].iter().all(|&s| s == 0));
    }

    #[test]
    fn test_tune_extends_past_short_playback_duration() {
        // Last note ends at 4.5s, playback duration is 4.0s
        let tune = catalog::lookup("jingle-bells").unwrap();
        let (_, samples) = read_back(render_tune(tune).unwrap());
        assert_eq!(samples.len(), seconds_to_samples(tune.melody_length_secs()));
    }

    #[test]
    fn test_note_edges_fade() {
        let (_, samples) = read_back(
            render_notes(&[Note { freq: 440.0, time: 0.0, duration: 0.5 }], 0.5).unwrap(),
        );
        assert_eq!(samples[0], 0);
        assert!(samples[1].unsigned_abs() < 100);
    }
}
