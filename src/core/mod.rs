//! Core analysis and classification modules

pub mod analysis;
pub mod analyzer;
pub mod buffer;
pub mod classifier;
pub mod dsp;
pub mod health;
pub mod note;

pub use analyzer::{VoiceAnalyzer, VoiceAnalyzerBuilder};
pub use buffer::SampleBuffer;
