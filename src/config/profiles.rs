// src/config/profiles.rs
//
// Reference voice-type profiles the classifier scores against

use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

/// A closed frequency interval in Hz.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrequencyRange {
    pub min_hz: f32,
    pub max_hz: f32,
}

impl FrequencyRange {
    pub const fn new(min_hz: f32, max_hz: f32) -> Self {
        Self { min_hz, max_hz }
    }

    /// Zero-width range used when an aggregate never received a value.
    pub const fn empty() -> Self {
        Self {
            min_hz: 0.0,
            max_hz: 0.0,
        }
    }

    pub fn contains(&self, hz: f32) -> bool {
        hz >= self.min_hz && hz <= self.max_hz
    }

    pub fn center(&self) -> f32 {
        (self.min_hz + self.max_hz) / 2.0
    }

    pub fn span(&self) -> f32 {
        self.max_hz - self.min_hz
    }

    /// Length of the intersection with `other`, 0 when disjoint. Symmetric.
    pub fn overlap_length(&self, other: &FrequencyRange) -> f32 {
        (self.max_hz.min(other.max_hz) - self.min_hz.max(other.min_hz)).max(0.0)
    }
}

/// The six classified voice types, brightest to darkest.
/// Enumeration order doubles as the tie-break order when scores are equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VoiceType {
    Soprano,
    MezzoSoprano,
    Alto,
    Tenor,
    Baritone,
    Bass,
}

impl VoiceType {
    pub fn all() -> Vec<Self> {
        vec![
            Self::Soprano,
            Self::MezzoSoprano,
            Self::Alto,
            Self::Tenor,
            Self::Baritone,
            Self::Bass,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Soprano => "Soprano",
            Self::MezzoSoprano => "Mezzo-Soprano",
            Self::Alto => "Alto",
            Self::Tenor => "Tenor",
            Self::Baritone => "Baritone",
            Self::Bass => "Bass",
        }
    }
}

impl std::fmt::Display for VoiceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Target timbre character for a voice type, each value in [0,1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimbreTargets {
    pub brightness: f32,
    pub clarity: f32,
    pub resonance: f32,
    pub warmth: f32,
}

/// Reference profile for one voice type.
///
/// Fundamental and optimal ranges follow the usual pedagogical note
/// boundaries (bass E2–E4 with A2–B3 optimal, soprano C4–C6 with A4–A5
/// optimal, and so on); formant bands and timbre targets shift smoothly
/// from dark/warm at the bottom to bright at the top.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoiceTypeProfile {
    pub voice_type: VoiceType,
    pub fundamental: FrequencyRange,
    pub optimal: FrequencyRange,
    pub f1_range: FrequencyRange,
    pub f2_range: FrequencyRange,
    pub timbre: TimbreTargets,
}

impl VoiceTypeProfile {
    pub fn for_type(voice_type: VoiceType) -> Self {
        match voice_type {
            VoiceType::Soprano => Self::soprano(),
            VoiceType::MezzoSoprano => Self::mezzo_soprano(),
            VoiceType::Alto => Self::alto(),
            VoiceType::Tenor => Self::tenor(),
            VoiceType::Baritone => Self::baritone(),
            VoiceType::Bass => Self::bass(),
        }
    }

    fn soprano() -> Self {
        Self {
            voice_type: VoiceType::Soprano,
            fundamental: FrequencyRange::new(261.63, 1046.50), // C4-C6
            optimal: FrequencyRange::new(440.00, 880.00),      // A4-A5
            f1_range: FrequencyRange::new(350.0, 850.0),
            f2_range: FrequencyRange::new(1800.0, 2800.0),
            timbre: TimbreTargets {
                brightness: 0.80,
                clarity: 0.80,
                resonance: 0.70,
                warmth: 0.40,
            },
        }
    }

    fn mezzo_soprano() -> Self {
        Self {
            voice_type: VoiceType::MezzoSoprano,
            fundamental: FrequencyRange::new(220.00, 880.00), // A3-A5
            optimal: FrequencyRange::new(329.63, 659.26),     // E4-E5
            f1_range: FrequencyRange::new(330.0, 800.0),
            f2_range: FrequencyRange::new(1600.0, 2600.0),
            timbre: TimbreTargets {
                brightness: 0.65,
                clarity: 0.75,
                resonance: 0.70,
                warmth: 0.55,
            },
        }
    }

    fn alto() -> Self {
        Self {
            voice_type: VoiceType::Alto,
            fundamental: FrequencyRange::new(174.61, 698.46), // F3-F5
            optimal: FrequencyRange::new(261.63, 523.25),     // C4-C5
            f1_range: FrequencyRange::new(300.0, 750.0),
            f2_range: FrequencyRange::new(1400.0, 2400.0),
            timbre: TimbreTargets {
                brightness: 0.50,
                clarity: 0.70,
                resonance: 0.75,
                warmth: 0.70,
            },
        }
    }

    fn tenor() -> Self {
        Self {
            voice_type: VoiceType::Tenor,
            fundamental: FrequencyRange::new(130.81, 523.25), // C3-C5
            optimal: FrequencyRange::new(196.00, 392.00),     // G3-G4
            f1_range: FrequencyRange::new(280.0, 700.0),
            f2_range: FrequencyRange::new(1200.0, 2200.0),
            timbre: TimbreTargets {
                brightness: 0.60,
                clarity: 0.75,
                resonance: 0.80,
                warmth: 0.60,
            },
        }
    }

    fn baritone() -> Self {
        Self {
            voice_type: VoiceType::Baritone,
            fundamental: FrequencyRange::new(98.00, 392.00), // G2-G4
            optimal: FrequencyRange::new(146.83, 293.66),    // D3-D4
            f1_range: FrequencyRange::new(260.0, 650.0),
            f2_range: FrequencyRange::new(1000.0, 2000.0),
            timbre: TimbreTargets {
                brightness: 0.45,
                clarity: 0.70,
                resonance: 0.85,
                warmth: 0.80,
            },
        }
    }

    fn bass() -> Self {
        Self {
            voice_type: VoiceType::Bass,
            fundamental: FrequencyRange::new(82.41, 329.63), // E2-E4
            optimal: FrequencyRange::new(110.00, 246.94),    // A2-B3
            f1_range: FrequencyRange::new(250.0, 600.0),
            f2_range: FrequencyRange::new(800.0, 1800.0),
            timbre: TimbreTargets {
                brightness: 0.30,
                clarity: 0.65,
                resonance: 0.90,
                warmth: 0.90,
            },
        }
    }
}

/// The static catalogue, initialized once, read-only afterwards.
pub fn builtin_profiles() -> &'static [VoiceTypeProfile] {
    static PROFILES: OnceLock<Vec<VoiceTypeProfile>> = OnceLock::new();
    PROFILES.get_or_init(|| {
        VoiceType::all()
            .into_iter()
            .map(VoiceTypeProfile::for_type)
            .collect()
    })
}
