use std::str::FromStr;

use serde::Serialize;

use super::curve::Curve;

/// Duration ceilings for the normalized 0-1 time parameters.
pub const ATTACK_MAX_MS: f32 = 50.0;
pub const HOLD_MAX_MS: f32 = 500.0;
pub const RELEASE_MAX_MS: f32 = 1000.0;

/// How the envelope releases: a fixed-duration one-shot, or sustained
/// until the matching stop event arrives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Trigger,
    Gate,
}

impl Mode {
    pub fn index(self) -> u8 {
        match self {
            Mode::Trigger => 0,
            Mode::Gate => 1,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Mode::Trigger => "Trigger",
            Mode::Gate => "Gate",
        }
    }

    pub fn parse(value: &str) -> Self {
        match value {
            "Trigger" => Mode::Trigger,
            "Gate" => Mode::Gate,
            _ => {
                if value.parse::<f32>().unwrap_or(0.0) > 0.5 {
                    Mode::Gate
                } else {
                    Mode::Trigger
                }
            }
        }
    }
}

/// Identifier for a single named parameter. String keys from the host are
/// resolved to this once, then dispatched on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKey {
    Channel,
    TriggerNote,
    Mode,
    Depth,
    Attack,
    Hold,
    Release,
    Curve,
    VelSens,
}

impl FromStr for ParamKey {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "channel" => ParamKey::Channel,
            "trigger_note" => ParamKey::TriggerNote,
            "mode" => ParamKey::Mode,
            "depth" => ParamKey::Depth,
            "attack" => ParamKey::Attack,
            "hold" => ParamKey::Hold,
            "release" => ParamKey::Release,
            "curve" => ParamKey::Curve,
            "vel_sens" => ParamKey::VelSens,
            _ => return Err(()),
        })
    }
}

/// Validated, clamped configuration for one ducker instance.
/// Every write coerces into the legal domain; a bad value from a lossy UI
/// control lands on the nearest valid one instead of being rejected.
#[derive(Debug, Clone)]
pub struct DuckerParams {
    /// 0 = omni, 1-16 = single channel
    pub channel: u8,
    /// Note number that starts/stops the envelope, 0-127
    pub trigger_note: u8,
    pub mode: Mode,
    /// Maximum attenuation fraction at full duck, 0-1
    pub depth: f32,
    /// 0-1, scaled to 0-50ms
    pub attack: f32,
    /// 0-1, scaled to 0-500ms
    pub hold: f32,
    /// 0-1, scaled to 0-1000ms
    pub release: f32,
    pub curve: Curve,
    /// Blend between fixed depth and velocity-scaled depth, 0-1
    pub vel_sens: f32,
}

impl Default for DuckerParams {
    fn default() -> Self {
        Self {
            channel: 1,
            trigger_note: 36, // C1
            mode: Mode::Trigger,
            depth: 1.0,
            attack: 0.1,  // 5ms
            hold: 0.2,    // 100ms
            release: 0.3, // 300ms
            curve: Curve::Linear,
            vel_sens: 0.0,
        }
    }
}

fn ms_to_samples(ms: f32, sample_rate: f32) -> u32 {
    (ms * (sample_rate / 1000.0)) as u32
}

fn parse_unit(value: &str) -> f32 {
    value.parse::<f32>().unwrap_or(0.0).clamp(0.0, 1.0)
}

fn parse_channel(value: &str) -> u8 {
    if value == "Omni" {
        return 0;
    }
    let f = value.parse::<f32>().unwrap_or(0.0);
    let ch = f as i32;
    if (1..=16).contains(&ch) {
        return ch as u8;
    }
    // 0-1 fraction mapped across Omni + 16 channels
    ((f * 16.0 + 0.5) as i32).clamp(0, 16) as u8
}

fn channel_name(channel: u8) -> String {
    if channel == 0 {
        "Omni".to_string()
    } else {
        channel.to_string()
    }
}

impl DuckerParams {
    pub fn attack_samples(&self, sample_rate: f32) -> u32 {
        ms_to_samples(self.attack * ATTACK_MAX_MS, sample_rate)
    }

    pub fn hold_samples(&self, sample_rate: f32) -> u32 {
        ms_to_samples(self.hold * HOLD_MAX_MS, sample_rate)
    }

    pub fn release_samples(&self, sample_rate: f32) -> u32 {
        ms_to_samples(self.release * RELEASE_MAX_MS, sample_rate)
    }

    pub fn set(&mut self, key: ParamKey, value: &str) {
        match key {
            ParamKey::Channel => self.channel = parse_channel(value),
            ParamKey::TriggerNote => {
                self.trigger_note = (value.parse::<f32>().unwrap_or(0.0) as i32).clamp(0, 127) as u8
            }
            ParamKey::Mode => self.mode = Mode::parse(value),
            ParamKey::Depth => self.depth = parse_unit(value),
            ParamKey::Attack => self.attack = parse_unit(value),
            ParamKey::Hold => self.hold = parse_unit(value),
            ParamKey::Release => self.release = parse_unit(value),
            ParamKey::Curve => self.curve = Curve::parse(value),
            ParamKey::VelSens => self.vel_sens = parse_unit(value),
        }
    }

    pub fn get(&self, key: ParamKey) -> String {
        match key {
            ParamKey::Channel => channel_name(self.channel),
            ParamKey::TriggerNote => self.trigger_note.to_string(),
            ParamKey::Mode => self.mode.name().to_string(),
            ParamKey::Depth => format!("{:.2}", self.depth),
            ParamKey::Attack => format!("{:.2}", self.attack),
            ParamKey::Hold => format!("{:.2}", self.hold),
            ParamKey::Release => format!("{:.2}", self.release),
            ParamKey::Curve => self.curve.name().to_string(),
            ParamKey::VelSens => format!("{:.2}", self.vel_sens),
        }
    }

    pub fn to_state(&self) -> DuckerState {
        DuckerState {
            channel: self.channel,
            trigger_note: self.trigger_note,
            mode: self.mode.index(),
            depth: self.depth,
            attack: self.attack,
            hold: self.hold,
            release: self.release,
            curve: self.curve.index(),
            vel_sens: self.vel_sens,
        }
    }

    pub fn state_json(&self) -> String {
        serde_json::to_string(&self.to_state()).unwrap_or_default()
    }

    /// Apply every recognized field of a flat serialized state object.
    /// Enum-valued fields accept either a display name or a numeric
    /// encoding; unknown fields are ignored, missing fields stay as-is.
    pub fn apply_state(&mut self, json: &str) {
        let Ok(state) = serde_json::from_str::<serde_json::Value>(json) else {
            return;
        };

        if let Some(s) = state.get("channel").and_then(|v| v.as_str()) {
            self.channel = parse_channel(s);
        } else if let Some(n) = state.get("channel").and_then(|v| v.as_f64()) {
            self.channel = (n as f32).clamp(0.0, 16.0) as u8;
        }
        if let Some(n) = state.get("trigger_note").and_then(|v| v.as_f64()) {
            self.trigger_note = (n as f32).clamp(0.0, 127.0) as u8;
        }
        if let Some(s) = state.get("mode").and_then(|v| v.as_str()) {
            self.mode = Mode::parse(s);
        } else if let Some(n) = state.get("mode").and_then(|v| v.as_f64()) {
            self.mode = if (n as f32).clamp(0.0, 1.0) as u8 > 0 {
                Mode::Gate
            } else {
                Mode::Trigger
            };
        }
        if let Some(n) = state.get("depth").and_then(|v| v.as_f64()) {
            self.depth = (n as f32).clamp(0.0, 1.0);
        }
        if let Some(n) = state.get("attack").and_then(|v| v.as_f64()) {
            self.attack = (n as f32).clamp(0.0, 1.0);
        }
        if let Some(n) = state.get("hold").and_then(|v| v.as_f64()) {
            self.hold = (n as f32).clamp(0.0, 1.0);
        }
        if let Some(n) = state.get("release").and_then(|v| v.as_f64()) {
            self.release = (n as f32).clamp(0.0, 1.0);
        }
        if let Some(s) = state.get("curve").and_then(|v| v.as_str()) {
            self.curve = Curve::parse(s);
        } else if let Some(n) = state.get("curve").and_then(|v| v.as_f64()) {
            self.curve = Curve::from_index((n as f32).clamp(0.0, 3.0) as u8);
        }
        if let Some(n) = state.get("vel_sens").and_then(|v| v.as_f64()) {
            self.vel_sens = (n as f32).clamp(0.0, 1.0);
        }
    }
}

/// Flat persisted form of the configuration. Enums are stored as their
/// numeric encodings.
#[derive(Debug, Clone, Serialize)]
pub struct DuckerState {
    pub channel: u8,
    pub trigger_note: u8,
    pub mode: u8,
    pub depth: f32,
    pub attack: f32,
    pub hold: f32,
    pub release: f32,
    pub curve: u8,
    pub vel_sens: f32,
}
