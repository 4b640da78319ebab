//! Frequency to musical note conversion

use std::fmt;

use crate::error::{AnalysisError, Result};

const A4_HZ: f32 = 440.0;
const NOTE_NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

/// A musical note with its octave and the cent deviation of the source
/// frequency from equal temperament.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Note {
    pub name: &'static str,
    pub octave: i32,
    pub cents: f32,
}

impl Note {
    /// Nearest equal-tempered note to `frequency`, A4 = 440 Hz.
    pub fn from_frequency(frequency: f32) -> Result<Self> {
        if frequency <= 0.0 || !frequency.is_finite() {
            return Err(AnalysisError::InvalidInput(format!(
                "frequency must be positive, got {frequency}"
            )));
        }

        let semitones_from_a4 = 12.0 * (frequency / A4_HZ).log2();
        let nearest = semitones_from_a4.round() as i32;
        let cents = (semitones_from_a4 - nearest as f32) * 100.0;

        // A sits 9 semitones above C within its octave
        let name = NOTE_NAMES[(nearest + 9).rem_euclid(12) as usize];
        let octave = 4 + (nearest + 9).div_euclid(12);

        Ok(Self {
            name,
            octave,
            cents,
        })
    }
}

impl fmt::Display for Note {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.name, self.octave)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_notes() {
        let a4 = Note::from_frequency(440.0).unwrap();
        assert_eq!(a4.to_string(), "A4");
        assert!(a4.cents.abs() < 0.5);

        let c4 = Note::from_frequency(261.63).unwrap();
        assert_eq!(c4.to_string(), "C4");

        let b3 = Note::from_frequency(246.94).unwrap();
        assert_eq!(b3.to_string(), "B3");

        let e2 = Note::from_frequency(82.41).unwrap();
        assert_eq!(e2.to_string(), "E2");
    }

    #[test]
    fn test_cent_deviation() {
        // 450 Hz sits sharp of A4 by ~39 cents
        let note = Note::from_frequency(450.0).unwrap();
        assert_eq!(note.to_string(), "A4");
        assert!(note.cents > 35.0 && note.cents < 43.0);
    }

    #[test]
    fn test_rejects_non_positive() {
        assert!(Note::from_frequency(0.0).is_err());
        assert!(Note::from_frequency(-100.0).is_err());
        assert!(Note::from_frequency(f32::NAN).is_err());
    }
}
