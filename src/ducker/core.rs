use std::path::PathBuf;

use super::envelope::{DuckEnvelope, Phase};
use super::note::{TriggerEvent, TriggerSource};
use super::params::{DuckerParams, Mode, ParamKey};

pub const DEFAULT_SAMPLE_RATE: f32 = 44100.0;

const EFFECT_NAME: &str = "DUCKER";

/// The ducking effect engine: one envelope, one set of parameters, one
/// stereo stream. Trigger events and block processing must be serialized
/// onto a single execution context by the host; nothing in here locks.
pub struct Ducker {
    params: DuckerParams,
    envelope: DuckEnvelope,
    /// Unreleased qualifying triggers; Gate mode releases when it hits 0
    held_count: u32,
    sample_rate: f32,
    /// Opaque working-directory hint from the host
    module_dir: Option<PathBuf>,
    log: Option<fn(&str)>,
}

impl Default for Ducker {
    fn default() -> Self {
        Self {
            params: DuckerParams::default(),
            envelope: DuckEnvelope::new(),
            held_count: 0,
            sample_rate: DEFAULT_SAMPLE_RATE,
            module_dir: None,
            log: None,
        }
    }
}

impl Ducker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Host-facing constructor: an optional working-directory hint, an
    /// optional serialized configuration applied over the defaults, and an
    /// optional log callback.
    pub fn with_config(
        module_dir: Option<PathBuf>,
        config_json: Option<&str>,
        log: Option<fn(&str)>,
    ) -> Self {
        let mut ducker = Self {
            module_dir,
            log,
            ..Self::default()
        };
        if let Some(json) = config_json {
            ducker.params.apply_state(json);
        }
        ducker.log("instance created");
        ducker
    }

    fn log(&self, msg: &str) {
        if let Some(log) = self.log {
            log(&format!("[{}] {}", EFFECT_NAME, msg));
        }
    }

    pub fn params(&self) -> &DuckerParams {
        &self.params
    }

    pub fn module_dir(&self) -> Option<&PathBuf> {
        self.module_dir.as_ref()
    }

    pub fn phase(&self) -> Phase {
        self.envelope.phase()
    }

    pub fn gain(&self) -> f32 {
        self.envelope.gain()
    }

    pub fn held_count(&self) -> u32 {
        self.held_count
    }

    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        if sample_rate > 0.0 {
            self.sample_rate = sample_rate;
        }
    }

    /// Decode and dispatch a raw trigger message. Garbage is a no-op.
    pub fn on_raw_message(&mut self, msg: &[u8], source: TriggerSource) {
        if let Some(event) = TriggerEvent::from_raw(msg, source) {
            self.on_event(&event);
        }
    }

    /// Dispatch a decoded trigger event: filter by channel and identity,
    /// track held triggers, and drive the envelope.
    pub fn on_event(&mut self, event: &TriggerEvent) {
        // channel 0 is omni
        if self.params.channel > 0 && event.channel != self.params.channel {
            return;
        }
        if event.note != self.params.trigger_note {
            return;
        }

        if event.is_on {
            self.held_count += 1;
            let scale = 1.0 - self.params.vel_sens
                + self.params.vel_sens * (f32::from(event.velocity) / 127.0);
            let depth = self.params.depth * scale;
            self.envelope.start_attack(depth, &self.params, self.sample_rate);
        } else {
            self.held_count = self.held_count.saturating_sub(1);
            // Trigger mode is time-driven; stops only matter to Gate mode
            if self.params.mode == Mode::Gate
                && self.held_count == 0
                && matches!(self.envelope.phase(), Phase::Attack | Phase::Hold)
            {
                self.envelope.start_release(&self.params, self.sample_rate);
            }
        }
    }

    /// Process an interleaved stereo block of 16-bit samples in place.
    /// The envelope advances exactly once per frame, and the advanced gain
    /// applies to that same frame.
    pub fn process(&mut self, samples: &mut [i16]) {
        for frame in samples.chunks_exact_mut(2) {
            let gain = self.envelope.advance(&self.params, self.sample_rate);
            for sample in frame.iter_mut() {
                let scaled = f32::from(*sample) * gain;
                *sample = scaled.clamp(f32::from(i16::MIN), f32::from(i16::MAX)) as i16;
            }
        }
    }

    /// Set a parameter by name. Unknown keys are ignored; the reserved key
    /// `state` applies a full serialized configuration.
    pub fn set_param(&mut self, key: &str, value: &str) {
        if key == "state" {
            self.params.apply_state(value);
            return;
        }
        if let Ok(key) = key.parse::<ParamKey>() {
            self.params.set(key, value);
        }
    }

    /// Get a parameter by name. Returns None for unknown keys, which is
    /// distinct from a successful empty value.
    pub fn get_param(&self, key: &str) -> Option<String> {
        if let Ok(key) = key.parse::<ParamKey>() {
            return Some(self.params.get(key));
        }
        match key {
            "state" => Some(self.params.state_json()),
            "name" => Some(EFFECT_NAME.to_string()),
            "ui_hierarchy" => Some(ui_hierarchy_json()),
            "chain_params" => Some(chain_params_json()),
            _ => None,
        }
    }
}

/// Static UI layout metadata, passed through to hosts that want it.
fn ui_hierarchy_json() -> String {
    serde_json::json!({
        "modes": null,
        "levels": {
            "root": {
                "children": null,
                "knobs": [
                    "channel", "trigger_note", "mode", "depth",
                    "attack", "hold", "release", "curve"
                ],
                "params": [
                    "channel", "trigger_note", "mode", "depth",
                    "attack", "hold", "release", "curve", "vel_sens"
                ],
            }
        }
    })
    .to_string()
}

/// Static parameter descriptors for chaining hosts.
fn chain_params_json() -> String {
    serde_json::json!([
        {
            "key": "channel", "name": "Channel", "type": "enum",
            "options": [
                "Omni", "1", "2", "3", "4", "5", "6", "7", "8",
                "9", "10", "11", "12", "13", "14", "15", "16"
            ],
            "default": "1"
        },
        { "key": "trigger_note", "name": "Trigger", "type": "int", "min": 0, "max": 127, "default": 36, "step": 1 },
        { "key": "mode", "name": "Mode", "type": "enum", "options": ["Trigger", "Gate"], "default": "Trigger" },
        { "key": "depth", "name": "Depth", "type": "float", "min": 0, "max": 1, "default": 1, "step": 0.01 },
        { "key": "attack", "name": "Attack", "type": "float", "min": 0, "max": 1, "default": 0.1, "step": 0.01 },
        { "key": "hold", "name": "Hold", "type": "float", "min": 0, "max": 1, "default": 0.2, "step": 0.01 },
        { "key": "release", "name": "Release", "type": "float", "min": 0, "max": 1, "default": 0.3, "step": 0.01 },
        { "key": "curve", "name": "Curve", "type": "enum", "options": ["Linear", "Expo", "S-Curve", "Pump"], "default": "Linear" }
    ])
    .to_string()
}
