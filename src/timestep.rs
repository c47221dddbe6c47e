/// Default fixed physics step, in seconds.
pub const PHYSICS_DT: f32 = 1.0 / 60.0;

/// Fixed-timestep accumulator. Frame time is accumulated and paid out as
/// whole physics ticks; the fractional remainder is exposed as `alpha` so
/// render-side consumers can interpolate between the previous and current
/// physics state.
pub struct FixedTimestep {
    step: f32,
    accumulator: f32,
}

impl FixedTimestep {
    pub fn new() -> Self {
        Self::with_step(PHYSICS_DT)
    }

    pub fn with_step(step: f32) -> Self {
        Self {
            step,
            accumulator: 0.0,
        }
    }

    pub fn step(&self) -> f32 {
        self.step
    }

    /// Add a render frame's elapsed time and return how many fixed ticks
    /// should run. Zero when the frame rate outpaces the physics rate.
    pub fn advance(&mut self, frame_dt: f32) -> usize {
        self.accumulator += frame_dt;
        let mut ticks = 0;
        while self.accumulator >= self.step {
            self.accumulator -= self.step;
            ticks += 1;
        }
        ticks
    }

    /// How far into the next physics step the current render frame falls,
    /// in 0..1.
    pub fn alpha(&self) -> f32 {
        self.accumulator / self.step
    }
}

impl Default for FixedTimestep {
    fn default() -> Self {
        Self::new()
    }
}
