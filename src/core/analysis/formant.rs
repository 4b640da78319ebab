//! Formant extraction from frame-wise spectral peaks

use log::debug;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config::{AnalysisConfig, FrequencyRange};
use crate::core::buffer::SampleBuffer;
use crate::core::dsp::{spectrum, windows};

/// Singer's formant band: the 2.8-3.2 kHz cluster trained voices project.
pub const SINGERS_FORMANT_BAND: FrequencyRange = FrequencyRange::new(2800.0, 3200.0);

/// Aggregated formant estimates for one take.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormantAnalysis {
    /// Mean first-formant frequency, 0.0 when no frame supplied one.
    pub f1_hz: f32,
    pub f2_hz: f32,
    pub f3_hz: f32,
    pub f1_range: FrequencyRange,
    pub f2_range: FrequencyRange,
    /// Mean share of spectral energy in [`SINGERS_FORMANT_BAND`].
    pub singers_formant_prominence: f32,
}

impl FormantAnalysis {
    /// Aggregate for a take too short to fill a single frame.
    pub fn empty() -> Self {
        Self {
            f1_hz: 0.0,
            f2_hz: 0.0,
            f3_hz: 0.0,
            f1_range: FrequencyRange::empty(),
            f2_range: FrequencyRange::empty(),
            singers_formant_prominence: 0.0,
        }
    }
}

/// Formant candidates of a single frame.
struct FrameFormants {
    slots: [Option<f32>; 3],
    singers_band_share: f32,
}

/// Slide Hann-windowed frames across the take and aggregate per-slot
/// formant candidates. Frames are independent, so they run in parallel;
/// collecting by frame index keeps aggregation deterministic.
pub fn analyze_formants(buffer: &SampleBuffer, config: &AnalysisConfig) -> FormantAnalysis {
    let samples = buffer.samples();
    let sample_rate = buffer.sample_rate();
    let frame_size = config.formant_frame_size;
    let hop_size = config.formant_hop_size;

    let num_frames = if samples.len() >= frame_size {
        (samples.len() - frame_size) / hop_size + 1
    } else {
        0
    };

    if num_frames == 0 {
        debug!("formant analysis: take shorter than one frame, empty aggregate");
        return FormantAnalysis::empty();
    }

    let window = windows::hann_window(frame_size);
    let band = config.formant_band;

    let frames: Vec<FrameFormants> = (0..num_frames)
        .into_par_iter()
        .map(|i| {
            let start = i * hop_size;
            frame_formants(
                &samples[start..start + frame_size],
                &window,
                &band,
                sample_rate,
            )
        })
        .collect();

    let mut sums = [0.0f32; 3];
    let mut counts = [0usize; 3];
    let mut ranges: [Option<(f32, f32)>; 2] = [None, None];
    let mut band_share_sum = 0.0f32;

    for frame in &frames {
        for (slot, candidate) in frame.slots.iter().enumerate() {
            if let Some(hz) = candidate {
                sums[slot] += hz;
                counts[slot] += 1;
                if slot < 2 {
                    ranges[slot] = Some(match ranges[slot] {
                        Some((lo, hi)) => (lo.min(*hz), hi.max(*hz)),
                        None => (*hz, *hz),
                    });
                }
            }
        }
        band_share_sum += frame.singers_band_share;
    }

    let slot_mean = |slot: usize| {
        if counts[slot] > 0 {
            sums[slot] / counts[slot] as f32
        } else {
            0.0
        }
    };
    let slot_range = |slot: usize| match ranges[slot] {
        Some((lo, hi)) => FrequencyRange::new(lo, hi),
        None => FrequencyRange::empty(),
    };

    let analysis = FormantAnalysis {
        f1_hz: slot_mean(0),
        f2_hz: slot_mean(1),
        f3_hz: slot_mean(2),
        f1_range: slot_range(0),
        f2_range: slot_range(1),
        singers_formant_prominence: band_share_sum / num_frames as f32,
    };
    debug!(
        "formant analysis: {} frames, F1 {:.0} Hz, F2 {:.0} Hz, F3 {:.0} Hz",
        num_frames, analysis.f1_hz, analysis.f2_hz, analysis.f3_hz
    );
    analysis
}

fn frame_formants(
    frame: &[f32],
    window: &[f32],
    band: &FrequencyRange,
    sample_rate: u32,
) -> FrameFormants {
    let windowed: Vec<f32> = frame.iter().zip(window).map(|(s, w)| s * w).collect();
    let mag = spectrum::magnitude_spectrum(&windowed, frame.len() / 2);

    // Surviving peaks ordered low to high; the three lowest are F1-F3
    let mut candidates: Vec<f32> = spectrum::find_peaks(&mag)
        .iter()
        .map(|p| spectrum::bin_to_frequency(p.bin, frame.len(), sample_rate))
        .filter(|hz| band.contains(*hz))
        .collect();
    candidates.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let mut slots = [None; 3];
    for (slot, hz) in candidates.into_iter().take(3).enumerate() {
        slots[slot] = Some(hz);
    }

    let total: f32 = mag.iter().sum();
    let singers_band_share = if total > 1e-10 {
        mag.iter()
            .enumerate()
            .filter(|(bin, _)| {
                SINGERS_FORMANT_BAND
                    .contains(spectrum::bin_to_frequency(*bin, frame.len(), sample_rate))
            })
            .map(|(_, m)| m)
            .sum::<f32>()
            / total
    } else {
        0.0
    };

    FrameFormants {
        slots,
        singers_band_share,
    }
}
