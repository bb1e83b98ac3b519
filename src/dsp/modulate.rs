//! Parameter modulation primitives.

/*
Block-Rate Modulation
=====================

A modulator (an LFO) continuously moves a parameter of another node around a
base value:

    modulated_value = base_value + (modulator × depth)

Ocean swell: low-pass at 400 Hz, depth 200 Hz, sine LFO at 0.1 Hz

    LFO = -1.0  →  cutoff = 400 + (-1 × 200) = 200 Hz   (trough, muffled)
    LFO =  0.0  →  cutoff = 400 + ( 0 × 200) = 400 Hz
    LFO = +1.0  →  cutoff = 400 + (+1 × 200) = 600 Hz   (crest, brighter)

We update the parameter once per block rather than once per sample. A 0.1 Hz
LFO has a 10 second period; at 48 kHz with 512-sample blocks that is ~940
updates per cycle, far below any audible stepping.

Within a block we use the AVERAGE of the modulator samples, so the block's
single value represents its middle rather than its first sample.

The target node clamps the result (FilterNode keeps cutoff in [20, 20000] Hz).
*/

/// Average of a modulator signal over a block.
#[inline]
pub fn block_average(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    samples.iter().sum::<f32>() / samples.len() as f32
}
