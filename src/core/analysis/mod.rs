//! Voice analysis algorithms
//!
//! Contains specialized analysis passes for:
//! - Pitch statistics (contour, stability, range)
//! - Formant extraction (F1/F2/F3, singer's formant)
//! - Vibrato detection (rate, extent, regularity)
//! - Timbre description (brightness, warmth, resonance)

mod formant;
mod pitch;
mod timbre;
mod vibrato;

// Re-export all analysis modules
pub use formant::{analyze_formants, FormantAnalysis, SINGERS_FORMANT_BAND};
pub use pitch::{
    analyze_pitch, AutocorrelationPitchEstimator, McLeodPitchEstimator, PitchAnalysis,
    PitchEstimator,
};
pub use timbre::{TimbreAnalysis, TimbreProfile};
pub use vibrato::{analyze_vibrato, VibratoAnalysis, VibratoKind};
