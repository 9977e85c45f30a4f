//! Dry/wet blending with a ramped suppression power.
//!
//! Jumping straight to a new power produces an audible step, so the mix
//! follows a linear ramp toward the requested value.

/// Linear ramp toward a target, advanced once per frame.
#[derive(Debug, Clone)]
pub struct PowerRamp {
    current: f32,
    target: f32,
    step: f32,
    remaining: u32,
    ramp_frames: u32,
}

impl PowerRamp {
    pub fn new(initial: f32, ramp_secs: f32, sample_rate: u32) -> Self {
        Self {
            current: initial,
            target: initial,
            step: 0.0,
            remaining: 0,
            ramp_frames: (ramp_secs * sample_rate as f32).round().max(1.0) as u32,
        }
    }

    #[inline]
    pub fn set_target(&mut self, target: f32) {
        if (target - self.target).abs() < f32::EPSILON {
            return;
        }
        self.target = target;
        self.remaining = self.ramp_frames;
        self.step = (self.target - self.current) / self.ramp_frames as f32;
    }

    #[inline]
    pub fn next_frame(&mut self) -> f32 {
        if self.remaining > 0 {
            self.remaining -= 1;
            self.current = if self.remaining == 0 {
                self.target
            } else {
                self.current + self.step
            };
        }
        self.current
    }

    #[inline]
    pub fn current(&self) -> f32 {
        self.current
    }

    #[inline]
    pub fn is_ramping(&self) -> bool {
        self.remaining > 0
    }

    pub fn skip_to_target(&mut self) {
        self.current = self.target;
        self.step = 0.0;
        self.remaining = 0;
    }
}

/// `power == 0` is the dry signal, `power == 1` the fully processed one.
#[inline]
pub fn blend(dry: f32, wet: f32, power: f32) -> f32 {
    dry + (wet - dry) * power
}
