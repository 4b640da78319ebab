//! FFT processing with windowing

use rustfft::{num_complex::Complex, FftPlanner};

use super::windows::hann_window;

/// Frames folded into an averaged spectrum are capped for efficiency.
const MAX_AVG_FRAMES: usize = 100;

/// Hann-windowed FFT magnitude spectra.
///
/// Used for buffer-level spectral features (irregularity, band energies,
/// tilt, centroid) where speed matters. The direct projection in
/// [`super::spectrum`] stays the primitive for per-frame formant peaks.
pub struct FftProcessor {
    planner: FftPlanner<f32>,
    window: Vec<f32>,
    fft_size: usize,
}

impl FftProcessor {
    pub fn new(fft_size: usize) -> Self {
        Self {
            planner: FftPlanner::new(),
            window: hann_window(fft_size),
            fft_size,
        }
    }

    /// Compute magnitude spectrum of one frame (zero-padded if short).
    pub fn magnitude_spectrum(&mut self, samples: &[f32]) -> Vec<f32> {
        let fft = self.planner.plan_fft_forward(self.fft_size);

        let mut buffer: Vec<Complex<f32>> = samples
            .iter()
            .take(self.fft_size)
            .enumerate()
            .map(|(i, &s)| Complex::new(s * self.window[i], 0.0))
            .collect();

        buffer.resize(self.fft_size, Complex::new(0.0, 0.0));

        fft.process(&mut buffer);

        buffer[..self.fft_size / 2]
            .iter()
            .map(|c| (c.re * c.re + c.im * c.im).sqrt())
            .collect()
    }

    /// Average magnitude spectrum across hopped frames.
    pub fn average_spectrum(&mut self, samples: &[f32], hop_size: usize) -> Vec<f32> {
        let spectrum_size = self.fft_size / 2;
        if samples.len() < self.fft_size || hop_size == 0 {
            return vec![0.0; spectrum_size];
        }

        let num_frames = ((samples.len() - self.fft_size) / hop_size + 1).min(MAX_AVG_FRAMES);

        let mut avg_spectrum = vec![0.0f32; spectrum_size];
        let mut frame_count = 0;

        for i in 0..num_frames {
            let start = i * hop_size;
            let frame = &samples[start..start + self.fft_size];

            let spectrum = self.magnitude_spectrum(frame);
            for (acc, mag) in avg_spectrum.iter_mut().zip(&spectrum) {
                *acc += mag;
            }
            frame_count += 1;
        }

        if frame_count > 0 {
            for val in &mut avg_spectrum {
                *val /= frame_count as f32;
            }
        }

        avg_spectrum
    }

    pub fn fft_size(&self) -> usize {
        self.fft_size
    }
}
