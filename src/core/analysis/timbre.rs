//! Timbre feature objects exchanged with collaborators

use serde::{Deserialize, Serialize};

/// Timbre features supplied by the external timbre-analysis collaborator.
///
/// Values are nominally in [0,1]; consumers run them through [`clamped`]
/// before any scoring so upstream noise cannot leave the unit interval.
///
/// [`clamped`]: TimbreAnalysis::clamped
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimbreAnalysis {
    pub brightness: f32,
    pub warmth: f32,
    pub resonance: f32,
    pub roughness: f32,
    pub inharmonicity: f32,
    pub spectral_balance: f32,
    pub pitch_stability: f32,
}

impl TimbreAnalysis {
    pub fn clamped(&self) -> Self {
        Self {
            brightness: self.brightness.clamp(0.0, 1.0),
            warmth: self.warmth.clamp(0.0, 1.0),
            resonance: self.resonance.clamp(0.0, 1.0),
            roughness: self.roughness.clamp(0.0, 1.0),
            inharmonicity: self.inharmonicity.clamp(0.0, 1.0),
            spectral_balance: self.spectral_balance.clamp(0.0, 1.0),
            pitch_stability: self.pitch_stability.clamp(0.0, 1.0),
        }
    }
}

/// Timbre character reported back to callers alongside a classification.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimbreProfile {
    pub brightness: f32,
    pub warmth: f32,
    pub resonance: f32,
    pub clarity: f32,
}

impl TimbreProfile {
    /// Clarity is the harmonic cleanliness of the tone, reported as the
    /// inverse of the measured inharmonicity.
    pub fn from_analysis(timbre: &TimbreAnalysis) -> Self {
        let t = timbre.clamped();
        Self {
            brightness: t.brightness,
            warmth: t.warmth,
            resonance: t.resonance,
            clarity: 1.0 - t.inharmonicity,
        }
    }
}
