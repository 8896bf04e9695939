/// Fixed-step frame clock.
///
/// Game logic is expressed in frames (velocities are pixels per frame), so the
/// host's variable frame time is converted into a whole number of steps.
pub struct FixedTimestep {
    dt: f32,
    accumulator: f32,
    max_steps: u32,
}

impl FixedTimestep {
    pub fn new(dt: f32) -> Self {
        Self {
            dt,
            accumulator: 0.0,
            max_steps: 4,
        }
    }

    /// Add host frame time. Returns the number of fixed steps to run.
    /// A long stall (tab in background) is capped so the game never fast-forwards.
    pub fn accumulate(&mut self, frame_dt: f32) -> u32 {
        self.accumulator = (self.accumulator + frame_dt).min(self.dt * self.max_steps as f32);
        let steps = (self.accumulator / self.dt) as u32;
        self.accumulator -= steps as f32 * self.dt;
        steps
    }

    pub fn dt(&self) -> f32 {
        self.dt
    }

    /// Steps per second, rounded (60 for the default 1/60 s step).
    pub fn rate(&self) -> u32 {
        (1.0 / self.dt).round() as u32
    }

    /// Number of fixed steps that cover `seconds`.
    pub fn frames_in(&self, seconds: f32) -> u32 {
        (seconds / self.dt).round() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_step_per_sixtieth() {
        let mut ts = FixedTimestep::new(1.0 / 60.0);
        assert_eq!(ts.accumulate(1.0 / 60.0), 1);
    }

    #[test]
    fn partial_frames_carry_over() {
        let mut ts = FixedTimestep::new(1.0 / 60.0);
        assert_eq!(ts.accumulate(0.010), 0);
        assert_eq!(ts.accumulate(0.010), 1);
    }

    #[test]
    fn stall_is_capped() {
        let mut ts = FixedTimestep::new(1.0 / 60.0);
        assert_eq!(ts.accumulate(2.0), 4);
    }

    #[test]
    fn hold_duration_in_frames() {
        let ts = FixedTimestep::new(1.0 / 60.0);
        assert_eq!(ts.rate(), 60);
        assert_eq!(ts.frames_in(3.0), 180);
    }
}
