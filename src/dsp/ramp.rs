use crate::MIN_TIME;

/*
Linear Gain Ramps
=================

Every gain change in the engine goes through a ramp. Jumping a gain from one
value to another in a single sample puts a step into the waveform, which is
heard as a click. Ramping over a few milliseconds removes it.

  value
    v1 ┐              ╱‾‾‾‾‾‾‾‾‾‾‾‾‾╲
       │            ╱                 ╲
       │          ╱                     ╲
    0  └────────╱─────────────────────────╲──→ samples
              ramp_to(v1, attack)   ramp_to(0, release)

The ramp is scheduled in samples, not wall-clock time: `ramp_to` snapshots the
current value and the total sample count, then every `next_sample` moves one
step along the straight line. The last step lands exactly on the target, so a
fade-out reaches 0.0 and a restored volume is bit-identical to the request.

A new `ramp_to` while a ramp is in flight starts from wherever the value is
right now, so retargeting never jumps.
*/

#[derive(Debug, Clone)]
pub struct GainRamp {
    value: f32,
    start: f32,
    target: f32,
    total_samples: u32,
    elapsed_samples: u32,
}

impl GainRamp {
    pub fn new(value: f32) -> Self {
        Self {
            value,
            start: value,
            target: value,
            total_samples: 0,
            elapsed_samples: 0,
        }
    }

    /// Jump to `value` with no ramp.
    pub fn set(&mut self, value: f32) {
        self.value = value;
        self.start = value;
        self.target = value;
        self.total_samples = 0;
        self.elapsed_samples = 0;
    }

    /// Schedule a linear ramp from the current value to `target`.
    pub fn ramp_to(&mut self, target: f32, seconds: f32, sample_rate: f32) {
        if seconds <= MIN_TIME {
            self.set(target);
            return;
        }

        self.start = self.value;
        self.target = target;
        self.total_samples = (seconds * sample_rate).round().max(1.0) as u32;
        self.elapsed_samples = 0;
    }

    /// Advance one sample and return the gain to apply to it.
    #[inline]
    pub fn next_sample(&mut self) -> f32 {
        if self.elapsed_samples < self.total_samples {
            self.elapsed_samples += 1;
            if self.elapsed_samples == self.total_samples {
                self.value = self.target;
            } else {
                let progress = self.elapsed_samples as f32 / self.total_samples as f32;
                self.value = self.start + (self.target - self.start) * progress;
            }
        }
        self.value
    }

    /// Fill `out` with consecutive gain values.
    pub fn render(&mut self, out: &mut [f32]) {
        for sample in out.iter_mut() {
            *sample = self.next_sample();
        }
    }

    pub fn is_ramping(&self) -> bool {
        self.elapsed_samples < self.total_samples
    }

    pub fn value(&self) -> f32 {
        self.value
    }
}

impl Default for GainRamp {
    fn default() -> Self {
        Self::new(0.0)
    }
}
