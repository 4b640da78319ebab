//! Digital signal processing utilities

pub mod fft;
pub mod spectrum;
pub mod stats;
pub mod windows;

pub use fft::FftProcessor;
pub use spectrum::{bin_to_frequency, find_peaks, magnitude_spectrum, SpectralPeak};
