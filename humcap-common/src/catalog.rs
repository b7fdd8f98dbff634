//! Tune catalog
//!
//! Fixed table of the melodies a user can be asked to hum. Defined at compile
//! time and never mutated.
//!
//! Each tune carries two kinds of data:
//! - **Playback data** (name, audio URL, beat pattern, note list) consumed by
//!   the browser client and the WAV synthesizer
//! - **Scoring data** (expected hum duration, tolerance) consumed by the
//!   verification core
//!
//! The note list is never read by scoring. Verification only looks at the
//! expected duration.

use rand::seq::SliceRandom;
use serde::Serialize;

/// A single synthesized note
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Note {
    /// Frequency in Hz
    pub freq: f64,
    /// Onset time in seconds from the start of the tune
    pub time: f64,
    /// Note length in seconds
    pub duration: f64,
}

/// A named melody used as a verification target
///
/// Serializes to the wire record served by the tune-selection endpoint:
/// `{ id, name, audioUrl, pattern, duration, notes }`. Scoring fields are not
/// exposed to clients.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Tune {
    pub id: &'static str,
    pub name: &'static str,
    pub audio_url: &'static str,
    /// Visual beat pattern (`x` = hit, `.` = rest)
    pub pattern: &'static str,
    /// Playback length in milliseconds
    #[serde(rename = "duration")]
    pub playback_duration_ms: u32,
    pub notes: &'static [Note],
    /// How long a correct hum is expected to take
    #[serde(skip)]
    pub expected_duration_secs: f64,
    /// Per-tune leniency factor (carried in the catalog, not used by scoring)
    #[serde(skip)]
    pub tolerance: f64,
}

const fn note(freq: f64, time: f64, duration: f64) -> Note {
    Note {
        freq,
        time,
        duration,
    }
}

static TUNES: [Tune; 8] = [
    Tune {
        id: "mcdonalds-jingle",
        name: "McDonald's Jingle",
        audio_url: "/api/audio/mcdonalds-jingle.wav",
        pattern: "x.x.x...x.x.x...",
        playback_duration_ms: 3000,
        notes: &[
            note(523.0, 0.0, 0.3),
            note(440.0, 0.4, 0.2),
            note(523.0, 0.7, 0.3),
            note(440.0, 1.1, 0.2),
            note(523.0, 1.4, 0.5),
        ],
        expected_duration_secs: 3.5,
        tolerance: 0.8,
    },
    Tune {
        id: "happy-birthday",
        name: "Happy Birthday",
        audio_url: "/api/audio/happy-birthday.wav",
        pattern: "x..x.x..x.x..x..",
        playback_duration_ms: 4000,
        notes: &[
            note(262.0, 0.0, 0.5),
            note(262.0, 0.5, 0.3),
            note(294.0, 0.8, 0.7),
            note(262.0, 1.5, 0.7),
            note(349.0, 2.2, 0.7),
            note(330.0, 2.9, 1.1),
        ],
        expected_duration_secs: 5.0,
        tolerance: 0.9,
    },
    Tune {
        id: "twinkle-star",
        name: "Twinkle Twinkle Little Star",
        audio_url: "/api/audio/twinkle-star.wav",
        pattern: "x.x.x.x.x.x.x...",
        playback_duration_ms: 5000,
        notes: &[
            note(262.0, 0.0, 0.5),
            note(262.0, 0.5, 0.5),
            note(392.0, 1.0, 0.5),
            note(392.0, 1.5, 0.5),
            note(440.0, 2.0, 0.5),
            note(440.0, 2.5, 0.5),
            note(392.0, 3.0, 1.0),
        ],
        expected_duration_secs: 6.0,
        tolerance: 0.8,
    },
    Tune {
        id: "mary-lamb",
        name: "Mary Had a Little Lamb",
        audio_url: "/api/audio/mary-lamb.wav",
        pattern: "x.x.x.x.x..x.x..",
        playback_duration_ms: 4500,
        notes: &[
            note(330.0, 0.0, 0.5),
            note(294.0, 0.5, 0.5),
            note(262.0, 1.0, 0.5),
            note(294.0, 1.5, 0.5),
            note(330.0, 2.0, 0.5),
            note(330.0, 2.5, 0.5),
            note(330.0, 3.0, 1.0),
        ],
        expected_duration_secs: 4.5,
        tolerance: 0.7,
    },
    Tune {
        id: "jingle-bells",
        name: "Jingle Bells",
        audio_url: "/api/audio/jingle-bells.wav",
        pattern: "x.x.x..x.x.x..x.",
        playback_duration_ms: 4000,
        notes: &[
            note(330.0, 0.0, 0.3),
            note(330.0, 0.3, 0.3),
            note(330.0, 0.6, 0.6),
            note(330.0, 1.2, 0.3),
            note(330.0, 1.5, 0.3),
            note(330.0, 1.8, 0.6),
            note(330.0, 2.4, 0.3),
            note(392.0, 2.7, 0.3),
            note(262.0, 3.0, 0.5),
            note(294.0, 3.5, 0.3),
            note(330.0, 3.8, 0.7),
        ],
        expected_duration_secs: 5.0,
        tolerance: 0.8,
    },
    Tune {
        id: "old-macdonald",
        name: "Old MacDonald",
        audio_url: "/api/audio/old-macdonald.wav",
        pattern: "x.x.x.x.x.x.x.x.",
        playback_duration_ms: 5500,
        notes: &[
            note(392.0, 0.0, 0.5),
            note(392.0, 0.5, 0.5),
            note(392.0, 1.0, 0.5),
            note(294.0, 1.5, 0.5),
            note(330.0, 2.0, 0.5),
            note(330.0, 2.5, 0.5),
            note(294.0, 3.0, 1.0),
        ],
        expected_duration_secs: 7.0,
        tolerance: 0.9,
    },
    Tune {
        id: "london-bridge",
        name: "London Bridge",
        audio_url: "/api/audio/london-bridge.wav",
        pattern: "x.x.x.x.x.x.x.x.",
        playback_duration_ms: 4800,
        notes: &[
            note(392.0, 0.0, 0.4),
            note(440.0, 0.4, 0.4),
            note(392.0, 0.8, 0.4),
            note(349.0, 1.2, 0.4),
            note(392.0, 1.6, 0.4),
            note(440.0, 2.0, 0.4),
            note(392.0, 2.4, 0.8),
        ],
        expected_duration_secs: 6.0,
        tolerance: 0.8,
    },
    Tune {
        id: "row-boat",
        name: "Row Your Boat",
        audio_url: "/api/audio/row-boat.wav",
        pattern: "x..x..x.x.x.x...",
        playback_duration_ms: 4200,
        notes: &[
            note(262.0, 0.0, 0.6),
            note(262.0, 0.6, 0.3),
            note(262.0, 0.9, 0.3),
            note(294.0, 1.2, 0.6),
            note(330.0, 1.8, 1.2),
        ],
        expected_duration_secs: 5.0,
        tolerance: 0.7,
    },
];

/// All tunes in catalog order
pub fn all() -> &'static [Tune] {
    &TUNES
}

/// Find a tune by identifier
///
/// A missing id is a normal outcome, not an error.
pub fn lookup(tune_id: &str) -> Option<&'static Tune> {
    TUNES.iter().find(|t| t.id == tune_id)
}

/// Fallback tune used when a request cannot be interpreted
pub fn default_tune() -> &'static Tune {
    &TUNES[0]
}

/// Pick a tune uniformly at random
pub fn random() -> &'static Tune {
    TUNES
        .choose(&mut rand::thread_rng())
        .unwrap_or_else(default_tune)
}

impl Tune {
    /// End of the last note in seconds
    pub fn melody_length_secs(&self) -> f64 {
        self.notes
            .iter()
            .map(|n| n.time + n.duration)
            .fold(0.0, f64::max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_ids_are_unique() {
        let ids: HashSet<_> = all().iter().map(|t| t.id).collect();
        assert_eq!(ids.len(), all().len());
    }

    #[test]
    fn test_lookup_known_and_unknown() {
        let tune = lookup("row-boat").unwrap();
        assert_eq!(tune.expected_duration_secs, 5.0);
        assert_eq!(tune.tolerance, 0.7);
        assert!(lookup("unknown-tune").is_none());
        assert!(lookup("").is_none());
    }

    #[test]
    fn test_expected_durations() {
        let expected = [
            ("mcdonalds-jingle", 3.5),
            ("happy-birthday", 5.0),
            ("twinkle-star", 6.0),
            ("mary-lamb", 4.5),
            ("jingle-bells", 5.0),
            ("old-macdonald", 7.0),
            ("london-bridge", 6.0),
            ("row-boat", 5.0),
        ];
        for (id, secs) in expected {
            assert_eq!(lookup(id).unwrap().expected_duration_secs, secs, "{}", id);
        }
    }

    #[test]
    fn test_random_is_from_catalog() {
        for _ in 0..32 {
            let tune = random();
            assert!(lookup(tune.id).is_some());
        }
    }

    #[test]
    fn test_notes_are_in_time_order() {
        for tune in all() {
            assert!(!tune.notes.is_empty(), "{} has no notes", tune.id);
            assert!(
                tune.notes.windows(2).all(|w| w[0].time <= w[1].time),
                "{} notes out of order",
                tune.id
            );
            assert!(tune.melody_length_secs() > 0.0);
        }
    }

    #[test]
    fn test_wire_format_hides_scoring_fields() {
        let value = serde_json::to_value(lookup("row-boat").unwrap()).unwrap();
        assert_eq!(value["id"], "row-boat");
        assert_eq!(value["audioUrl"], "/api/audio/row-boat.wav");
        assert_eq!(value["duration"], 4200);
        assert_eq!(value["notes"].as_array().unwrap().len(), 5);
        assert!(value.get("expectedDurationSecs").is_none());
        assert!(value.get("tolerance").is_none());
    }
}
