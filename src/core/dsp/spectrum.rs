//! Direct-summation spectral primitives
//!
//! The magnitude spectrum here is a deliberately simple O(N²) cosine
//! projection, not a fast transform. Formant picking only needs a handful
//! of coarse peaks per frame, and the direct form keeps bin magnitudes on
//! the raw amplitude scale the peak threshold is defined against. For
//! averaged spectra over many frames use [`super::fft::FftProcessor`].

/// Minimum magnitude for a bin to qualify as a peak.
pub const MIN_PEAK_HEIGHT: f32 = 0.1;
/// A peak must be a strict local maximum within this many bins on each side.
pub const PEAK_NEIGHBORHOOD: usize = 5;
/// At most this many peaks are returned per spectrum.
pub const MAX_PEAKS: usize = 10;

/// One spectral peak: bin index plus raw magnitude.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpectralPeak {
    pub bin: usize,
    pub magnitude: f32,
}

/// Magnitude spectrum of `window_size` bins over `2 * window_size` samples:
/// bin k holds `|Σ samples[n]·cos(2π·k·n/N)|` with `N = 2 * window_size`.
///
/// The per-bin sum runs in f64: the projection phase reaches k·n ≈ N²/2
/// cycles and single-precision rounding across thousands of terms leaves
/// residuals large enough to cross [`MIN_PEAK_HEIGHT`], which would turn
/// silent bins into phantom peaks.
///
/// Inputs shorter than `2 * window_size` produce an empty spectrum.
pub fn magnitude_spectrum(samples: &[f32], window_size: usize) -> Vec<f32> {
    let n = window_size * 2;
    if window_size == 0 || samples.len() < n {
        return Vec::new();
    }

    let step = 2.0 * std::f64::consts::PI / n as f64;
    (0..window_size)
        .map(|k| {
            let mut sum = 0.0f64;
            for (i, &s) in samples[..n].iter().enumerate() {
                sum += s as f64 * (step * k as f64 * i as f64).cos();
            }
            sum.abs() as f32
        })
        .collect()
}

/// Strict local maxima above [`MIN_PEAK_HEIGHT`], separated by at least
/// [`PEAK_NEIGHBORHOOD`] bins, sorted descending by magnitude and capped to
/// [`MAX_PEAKS`]. Empty input yields an empty list.
pub fn find_peaks(spectrum: &[f32]) -> Vec<SpectralPeak> {
    if spectrum.is_empty() {
        return Vec::new();
    }

    let mut peaks = Vec::new();
    for (bin, &magnitude) in spectrum.iter().enumerate() {
        if magnitude <= MIN_PEAK_HEIGHT {
            continue;
        }

        let lo = bin.saturating_sub(PEAK_NEIGHBORHOOD);
        let hi = (bin + PEAK_NEIGHBORHOOD).min(spectrum.len() - 1);
        let is_local_max = (lo..=hi).all(|j| j == bin || spectrum[j] < magnitude);

        if is_local_max {
            peaks.push(SpectralPeak { bin, magnitude });
        }
    }

    peaks.sort_by(|a, b| {
        b.magnitude
            .partial_cmp(&a.magnitude)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    peaks.truncate(MAX_PEAKS);
    peaks
}

/// Center frequency of a spectrum bin for the given transform length.
pub fn bin_to_frequency(bin: usize, fft_len: usize, sample_rate: u32) -> f32 {
    if fft_len == 0 {
        return 0.0;
    }
    bin as f32 * sample_rate as f32 / fft_len as f32
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    #[test]
    fn test_spectrum_locates_cosine() {
        // Cosine at exactly bin 32 of a 512-sample projection
        let n = 512;
        let samples: Vec<f32> = (0..n)
            .map(|i| (2.0 * PI * 32.0 * i as f32 / n as f32).cos())
            .collect();

        let spectrum = magnitude_spectrum(&samples, n / 2);
        assert_eq!(spectrum.len(), n / 2);

        let peaks = find_peaks(&spectrum);
        assert!(!peaks.is_empty());
        assert_eq!(peaks[0].bin, 32);
        // A unit cosine projects to N/2 at its own bin
        assert!((peaks[0].magnitude - n as f32 / 2.0).abs() < 1.0);
    }

    #[test]
    fn test_full_frame_noise_floor_stays_below_peak_threshold() {
        // Formant-sized frame: one on-bin cosine, every other bin is exactly
        // orthogonal, so anything nonzero there is accumulation residue.
        // That residue must stay far under the peak threshold or silent
        // bins become phantom peak candidates.
        let n = 4096;
        let bin = 56;
        let samples: Vec<f32> = (0..n)
            .map(|i| {
                (2.0 * std::f64::consts::PI * bin as f64 * i as f64 / n as f64).cos() as f32
            })
            .collect();

        let spectrum = magnitude_spectrum(&samples, n / 2);
        for (k, &magnitude) in spectrum.iter().enumerate() {
            if k != bin {
                assert!(
                    magnitude < MIN_PEAK_HEIGHT / 10.0,
                    "bin {k} residue {magnitude} near peak threshold"
                );
            }
        }

        let peaks = find_peaks(&spectrum);
        assert_eq!(peaks.len(), 1);
        assert_eq!(peaks[0].bin, bin);
    }

    #[test]
    fn test_spectrum_short_input_is_empty() {
        let samples = vec![0.5; 100];
        assert!(magnitude_spectrum(&samples, 64).is_empty());
        assert!(magnitude_spectrum(&[], 64).is_empty());
    }

    #[test]
    fn test_find_peaks_empty_input() {
        assert!(find_peaks(&[]).is_empty());
    }

    #[test]
    fn test_find_peaks_sorted_and_capped() {
        // 15 isolated spikes with increasing heights
        let mut spectrum = vec![0.0f32; 200];
        for i in 0..15 {
            spectrum[i * 12 + 6] = 1.0 + i as f32;
        }

        let peaks = find_peaks(&spectrum);
        assert_eq!(peaks.len(), MAX_PEAKS);
        for pair in peaks.windows(2) {
            assert!(pair[0].magnitude >= pair[1].magnitude);
        }
        // The tallest spike survives the cap
        assert!((peaks[0].magnitude - 15.0).abs() < 1e-6);
    }

    #[test]
    fn test_find_peaks_neighborhood_suppression() {
        let mut spectrum = vec![0.0f32; 64];
        spectrum[20] = 5.0;
        spectrum[23] = 4.0; // within ±5 of the taller peak

        let peaks = find_peaks(&spectrum);
        assert_eq!(peaks.len(), 1);
        assert_eq!(peaks[0].bin, 20);
    }

    #[test]
    fn test_find_peaks_height_threshold() {
        let mut spectrum = vec![0.0f32; 64];
        spectrum[30] = 0.05; // below minimum height

        assert!(find_peaks(&spectrum).is_empty());
    }

    #[test]
    fn test_bin_to_frequency() {
        // Bin 100 of a 4096-point transform at 44.1 kHz
        let freq = bin_to_frequency(100, 4096, 44100);
        assert!((freq - 1076.66).abs() < 0.1);
    }
}
