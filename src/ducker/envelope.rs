use super::params::{DuckerParams, Mode};

/// One segment of the envelope lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Attack,
    Hold,
    Release,
}

/// The ducking envelope state machine. Gain is 1.0 at rest and dips toward
/// `1.0 - vel_depth` while ducked; it is recomputed from the phase position
/// on every sample rather than accumulated, so it cannot drift.
///
/// Phase lengths are read from the parameters once, at phase entry. A
/// parameter edit takes effect on the next phase start.
#[derive(Debug)]
pub struct DuckEnvelope {
    phase: Phase,
    /// Sample counter within the current phase
    phase_pos: u32,
    /// Total samples in the current phase; may be 0
    phase_len: u32,
    /// Velocity-scaled depth captured at trigger start, fixed for the cycle
    vel_depth: f32,
    /// Gain the release ramp recovers from
    release_from: f32,
    gain: f32,
}

impl Default for DuckEnvelope {
    fn default() -> Self {
        Self {
            phase: Phase::Idle,
            phase_pos: 0,
            phase_len: 0,
            vel_depth: 0.0,
            release_from: 1.0,
            gain: 1.0,
        }
    }
}

impl DuckEnvelope {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn gain(&self) -> f32 {
        self.gain
    }

    pub fn is_active(&self) -> bool {
        self.phase != Phase::Idle
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    fn set_phase(&mut self, phase: Phase, phase_len: u32) {
        self.phase = phase;
        self.phase_pos = 0;
        self.phase_len = phase_len;
    }

    /// Begin a new envelope cycle with the given velocity-scaled depth.
    /// Restarts from Attack even if a cycle is already in flight.
    pub fn start_attack(&mut self, depth: f32, params: &DuckerParams, sample_rate: f32) {
        self.vel_depth = depth.clamp(0.0, 1.0);
        self.set_phase(Phase::Attack, params.attack_samples(sample_rate));
        if self.phase_len == 0 {
            self.enter_hold(params, sample_rate);
        }
    }

    /// Begin recovery. Only meaningful while ducking (Attack or Hold);
    /// a zero-length release snaps straight back to pass-through.
    pub fn start_release(&mut self, params: &DuckerParams, sample_rate: f32) {
        if !matches!(self.phase, Phase::Attack | Phase::Hold) {
            return;
        }
        let len = params.release_samples(sample_rate);
        if len == 0 {
            self.set_phase(Phase::Idle, 0);
            self.gain = 1.0;
            return;
        }
        self.release_from = self.gain;
        self.set_phase(Phase::Release, len);
    }

    /// Entering Hold always lands at full duck. A zero-length Hold falls
    /// through to Release in Trigger mode; in Gate mode it stays held until
    /// an explicit release, however long that takes.
    fn enter_hold(&mut self, params: &DuckerParams, sample_rate: f32) {
        self.gain = 1.0 - self.vel_depth;
        self.set_phase(Phase::Hold, params.hold_samples(sample_rate));
        if self.phase_len == 0 && params.mode == Mode::Trigger {
            self.enter_release(params, sample_rate);
        }
    }

    /// Release is entered even at zero length; the transition out to Idle
    /// is taken on the next sample tick.
    fn enter_release(&mut self, params: &DuckerParams, sample_rate: f32) {
        self.release_from = self.gain;
        self.set_phase(Phase::Release, params.release_samples(sample_rate));
    }

    /// Advance the envelope by one sample and return the gain to apply to
    /// that sample.
    pub fn advance(&mut self, params: &DuckerParams, sample_rate: f32) -> f32 {
        match self.phase {
            Phase::Idle => {}
            Phase::Attack => {
                if self.phase_len > 0 {
                    let t = self.phase_pos as f32 / self.phase_len as f32;
                    self.gain = 1.0 - self.vel_depth * params.curve.shape(t, false);
                }
                self.phase_pos += 1;
                if self.phase_pos >= self.phase_len {
                    self.enter_hold(params, sample_rate);
                }
            }
            Phase::Hold => {
                self.gain = 1.0 - self.vel_depth;
                self.phase_pos = self.phase_pos.saturating_add(1);
                if params.mode == Mode::Trigger && self.phase_pos >= self.phase_len {
                    self.enter_release(params, sample_rate);
                }
            }
            Phase::Release => {
                if self.phase_len > 0 {
                    let t = self.phase_pos as f32 / self.phase_len as f32;
                    self.gain =
                        self.release_from + (1.0 - self.release_from) * params.curve.shape(t, true);
                }
                self.phase_pos += 1;
                if self.phase_pos >= self.phase_len {
                    self.gain = 1.0;
                    self.set_phase(Phase::Idle, 0);
                }
            }
        }
        self.gain
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ducker::Curve;

    // 1ms == 1 sample keeps the duration math easy to read
    const SAMPLE_RATE: f32 = 1000.0;

    fn params(attack: f32, hold: f32, release: f32, mode: Mode) -> DuckerParams {
        DuckerParams {
            mode,
            depth: 1.0,
            attack,
            hold,
            release,
            ..DuckerParams::default()
        }
    }

    fn run(env: &mut DuckEnvelope, params: &DuckerParams, samples: usize) -> Vec<f32> {
        (0..samples)
            .map(|_| env.advance(params, SAMPLE_RATE))
            .collect()
    }

    #[test]
    fn test_idle_passes_through() {
        let params = params(0.1, 0.1, 0.1, Mode::Trigger);
        let mut env = DuckEnvelope::new();
        assert_eq!(env.gain(), 1.0);
        for gain in run(&mut env, &params, 32) {
            assert_eq!(gain, 1.0);
        }
        assert_eq!(env.phase(), Phase::Idle);
    }

    #[test]
    fn test_attack_ramps_down_to_hold() {
        // attack 0.2 * 50ms = 10 samples, depth 1.0
        let params = params(0.2, 0.2, 0.2, Mode::Trigger);
        let mut env = DuckEnvelope::new();
        env.start_attack(1.0, &params, SAMPLE_RATE);
        assert_eq!(env.phase(), Phase::Attack);

        let gains = run(&mut env, &params, 10);
        // first sample is still unducked, then the ramp descends
        assert_eq!(gains[0], 1.0);
        for pair in gains.windows(2) {
            assert!(pair[1] <= pair[0]);
        }
        // the completing sample snaps to full duck
        assert_eq!(*gains.last().unwrap(), 0.0);
        assert_eq!(env.phase(), Phase::Hold);
    }

    #[test]
    fn test_zero_attack_lands_at_full_duck() {
        let params = params(0.0, 0.2, 0.2, Mode::Trigger);
        let mut env = DuckEnvelope::new();
        env.start_attack(0.8, &params, SAMPLE_RATE);
        assert_eq!(env.phase(), Phase::Hold);
        // no transient: the very first processed sample is fully ducked
        let gain = env.advance(&params, SAMPLE_RATE);
        assert!((gain - 0.2).abs() < 1e-6);
    }

    #[test]
    fn test_zero_attack_and_hold_reaches_release_in_trigger_mode() {
        let params = params(0.0, 0.0, 0.2, Mode::Trigger);
        let mut env = DuckEnvelope::new();
        env.start_attack(1.0, &params, SAMPLE_RATE);
        assert_eq!(env.phase(), Phase::Release);
    }

    #[test]
    fn test_zero_hold_stays_held_in_gate_mode() {
        let params = params(0.0, 0.0, 0.2, Mode::Gate);
        let mut env = DuckEnvelope::new();
        env.start_attack(1.0, &params, SAMPLE_RATE);
        assert_eq!(env.phase(), Phase::Hold);
        // gate mode holds at full duck until an explicit release
        for gain in run(&mut env, &params, 100) {
            assert_eq!(gain, 0.0);
        }
        assert_eq!(env.phase(), Phase::Hold);
    }

    #[test]
    fn test_trigger_cycle_returns_to_idle() {
        // 10 + 50 + 100 samples
        let params = params(0.2, 0.1, 0.1, Mode::Trigger);
        let mut env = DuckEnvelope::new();
        env.start_attack(1.0, &params, SAMPLE_RATE);

        let total = 10 + 50 + 100;
        let gains = run(&mut env, &params, total + 1);
        for gain in &gains {
            assert!((0.0..=1.0).contains(gain));
        }
        // back to pass-through within one sample of the computed length
        assert_eq!(*gains.last().unwrap(), 1.0);
        assert_eq!(env.phase(), Phase::Idle);
    }

    #[test]
    fn test_release_starts_from_reached_gain() {
        // stop halfway through a 10-sample linear attack
        let params = params(0.2, 0.2, 0.2, Mode::Gate);
        let mut env = DuckEnvelope::new();
        env.start_attack(1.0, &params, SAMPLE_RATE);
        run(&mut env, &params, 5);
        let reached = env.gain();
        assert!(reached > 0.0 && reached < 1.0);

        env.start_release(&params, SAMPLE_RATE);
        let gain = env.advance(&params, SAMPLE_RATE);
        // recovery begins at the reached gain, not at full depth
        assert!((gain - reached).abs() < 1e-6);
        let gains = run(&mut env, &params, 200);
        for pair in gains.windows(2) {
            assert!(pair[1] >= pair[0]);
        }
        assert_eq!(env.phase(), Phase::Idle);
        assert_eq!(env.gain(), 1.0);
    }

    #[test]
    fn test_zero_release_snaps_to_idle() {
        let params = params(0.0, 0.2, 0.0, Mode::Gate);
        let mut env = DuckEnvelope::new();
        env.start_attack(1.0, &params, SAMPLE_RATE);
        run(&mut env, &params, 10);
        assert_eq!(env.gain(), 0.0);

        env.start_release(&params, SAMPLE_RATE);
        assert_eq!(env.phase(), Phase::Idle);
        assert_eq!(env.gain(), 1.0);
    }

    #[test]
    fn test_release_is_ignored_outside_attack_and_hold() {
        let params = params(0.2, 0.1, 0.1, Mode::Gate);
        let mut env = DuckEnvelope::new();
        env.start_release(&params, SAMPLE_RATE);
        assert_eq!(env.phase(), Phase::Idle);

        env.start_attack(1.0, &params, SAMPLE_RATE);
        run(&mut env, &params, 10 + 50);
        env.start_release(&params, SAMPLE_RATE);
        assert_eq!(env.phase(), Phase::Release);
        let gain_before = env.gain();
        // a second call must not restart the ramp
        run(&mut env, &params, 10);
        env.start_release(&params, SAMPLE_RATE);
        assert_eq!(env.phase(), Phase::Release);
        assert!(env.gain() > gain_before);
    }

    #[test]
    fn test_phase_length_latched_at_entry() {
        let mut params = params(0.2, 0.2, 0.2, Mode::Trigger);
        let mut env = DuckEnvelope::new();
        env.start_attack(1.0, &params, SAMPLE_RATE);
        run(&mut env, &params, 5);

        // editing the attack mid-phase must not stretch the current ramp
        params.attack = 1.0;
        let gains = run(&mut env, &params, 5);
        assert_eq!(*gains.last().unwrap(), 0.0);
        assert_eq!(env.phase(), Phase::Hold);
    }

    #[test]
    fn test_retrigger_recaptures_depth() {
        let params = params(0.0, 0.2, 0.2, Mode::Trigger);
        let mut env = DuckEnvelope::new();
        env.start_attack(1.0, &params, SAMPLE_RATE);
        assert_eq!(env.advance(&params, SAMPLE_RATE), 0.0);

        env.start_attack(0.5, &params, SAMPLE_RATE);
        let gain = env.advance(&params, SAMPLE_RATE);
        assert!((gain - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_pump_release_recovers_fast() {
        let mut params = params(0.0, 0.1, 0.5, Mode::Trigger);
        params.curve = Curve::Pump;
        let mut env = DuckEnvelope::new();
        env.start_attack(1.0, &params, SAMPLE_RATE);
        // run through hold (50 samples) into release (500 samples)
        run(&mut env, &params, 50);
        let gains = run(&mut env, &params, 125);
        // halfway through a pump release the gain is already past the
        // linear midpoint
        assert!(*gains.last().unwrap() > 0.5);
    }
}
