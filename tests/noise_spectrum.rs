use std::f32::consts::PI;

use rustfft::{num_complex::Complex, FftPlanner};
use soundscape_dsp::dsp::noise::{NoiseColor, NoiseGenerator};

const FFT_SIZE: usize = 4096;
const SAMPLE_RATE: f32 = 44_100.0;

/// Averaged power spectrum over Hann-windowed frames.
fn power_spectrum(samples: &[f32]) -> Vec<f32> {
    let fft = FftPlanner::<f32>::new().plan_fft_forward(FFT_SIZE);
    let window: Vec<f32> = (0..FFT_SIZE)
        .map(|i| 0.5 - 0.5 * (2.0 * PI * i as f32 / FFT_SIZE as f32).cos())
        .collect();

    let mut power = vec![0.0f32; FFT_SIZE / 2];
    let mut frames = 0;
    for frame in samples.chunks_exact(FFT_SIZE) {
        let mut buffer: Vec<Complex<f32>> = frame
            .iter()
            .zip(&window)
            .map(|(&s, &w)| Complex::new(s * w, 0.0))
            .collect();
        fft.process(&mut buffer);
        for (p, bin) in power.iter_mut().zip(&buffer) {
            *p += bin.norm_sqr();
        }
        frames += 1;
    }

    for p in power.iter_mut() {
        *p /= frames as f32;
    }
    power
}

fn bin(frequency: f32) -> usize {
    (frequency / SAMPLE_RATE * FFT_SIZE as f32).round() as usize
}

fn band_energy(power: &[f32], low: f32, high: f32) -> f32 {
    power[bin(low)..bin(high)].iter().sum()
}

fn band_density(power: &[f32], low: f32, high: f32) -> f32 {
    let bins = &power[bin(low)..bin(high)];
    bins.iter().sum::<f32>() / bins.len() as f32
}

fn spectrum(color: NoiseColor) -> Vec<f32> {
    let buffer = NoiseGenerator::new(2024).generate(color, 4.0, SAMPLE_RATE, 1);
    power_spectrum(&buffer.channels()[0])
}

#[test]
fn low_to_high_energy_ratio_orders_colors() {
    let ratio = |color| {
        let power = spectrum(color);
        band_energy(&power, 20.0, 500.0) / band_energy(&power, 2_000.0, 8_000.0)
    };

    let white = ratio(NoiseColor::White);
    let pink = ratio(NoiseColor::Pink);
    let brown = ratio(NoiseColor::Brown);

    assert!(pink > white * 2.0, "white {white}, pink {pink}");
    assert!(brown > pink * 2.0, "pink {pink}, brown {brown}");
}

#[test]
fn white_noise_is_flat() {
    let power = spectrum(NoiseColor::White);
    let low = band_density(&power, 200.0, 800.0);
    let high = band_density(&power, 6_400.0, 12_800.0);
    let ratio = low / high;
    assert!((0.8..1.25).contains(&ratio), "white density ratio {ratio}");
}

#[test]
fn pink_noise_falls_three_db_per_octave() {
    let power = spectrum(NoiseColor::Pink);
    let octaves = [200.0, 400.0, 800.0, 1_600.0, 3_200.0, 6_400.0];

    for pair in octaves.windows(3) {
        let lower = band_density(&power, pair[0], pair[1]);
        let upper = band_density(&power, pair[1], pair[2]);
        // Half the power per bin, one octave up
        let ratio = upper / lower;
        assert!(
            (0.35..0.7).contains(&ratio),
            "{}-{} Hz vs {}-{} Hz: ratio {ratio}",
            pair[1],
            pair[2],
            pair[0],
            pair[1]
        );
    }
}

#[test]
fn brown_noise_falls_faster_than_pink() {
    let power = spectrum(NoiseColor::Brown);
    let lower = band_density(&power, 800.0, 1_600.0);
    let upper = band_density(&power, 1_600.0, 3_200.0);
    // Six dB per octave well above the integrator's corner
    let ratio = upper / lower;
    assert!(ratio < 0.35, "brown octave ratio {ratio}");
}
