use super::{ControlEvent, CycleDirection};
use crate::ducker::{TriggerEvent, TriggerSource};
use device_query::{DeviceQuery, DeviceState, Keycode};
use std::collections::HashMap;
use std::sync::mpsc::Sender;

/// Velocity used for key-driven trigger events
const KEY_VELOCITY: u8 = 100;
/// Key-driven events always go out on channel 1
const KEY_CHANNEL: u8 = 1;

pub struct KeyboardHandler {
    device_state: DeviceState,
    key_states: HashMap<Keycode, bool>,
    key_to_note: HashMap<Keycode, u8>,
    control_keys: HashMap<Keycode, bool>, // Track control keys separately
    event_sender: Sender<TriggerEvent>,
    control_sender: Sender<ControlEvent>,
}

impl KeyboardHandler {
    pub fn new(event_sender: Sender<TriggerEvent>, control_sender: Sender<ControlEvent>) -> Self {
        let device_state = DeviceState::new();
        let mut key_states: HashMap<Keycode, bool> = HashMap::new();
        let mut control_keys: HashMap<Keycode, bool> = HashMap::new();

        // A short run of trigger keys around the default kick note
        let key_to_note: HashMap<Keycode, u8> = [
            (Keycode::Z, 35), // B0
            (Keycode::X, 36), // C1 - the default trigger note
            (Keycode::C, 38), // D1
            (Keycode::V, 40), // E1
        ]
        .iter()
        .cloned()
        .collect();

        // Initialize all keys as not pressed
        for key in key_to_note.keys() {
            key_states.insert(*key, false);
        }

        // Initialize control keys
        control_keys.insert(Keycode::Comma, false);
        control_keys.insert(Keycode::Dot, false);
        control_keys.insert(Keycode::M, false);

        Self {
            device_state,
            key_states,
            key_to_note,
            control_keys,
            event_sender,
            control_sender,
        }
    }

    pub fn update(&mut self) {
        let keys: Vec<Keycode> = self.device_state.get_keys();

        // Check each mapped key for triggers
        for (key, note) in &self.key_to_note {
            let is_pressed = keys.contains(key);
            let was_pressed = self.key_states.get(key).cloned().unwrap_or(false);

            if is_pressed != was_pressed {
                let event = if is_pressed {
                    println!("Key '{:?}' pressed - trigger start for note {}", key, note);
                    TriggerEvent::start(KEY_CHANNEL, *note, KEY_VELOCITY, TriggerSource::Keyboard)
                } else {
                    println!("Key '{:?}' released - trigger stop for note {}", key, note);
                    TriggerEvent::stop(KEY_CHANNEL, *note, TriggerSource::Keyboard)
                };

                if let Err(e) = self.event_sender.send(event) {
                    eprintln!("Error sending trigger event: {}", e);
                }
                self.key_states.insert(*key, is_pressed);
            }
        }

        // Check control keys for curve cycling and mode toggling
        for key in [Keycode::Comma, Keycode::Dot, Keycode::M].iter() {
            let is_pressed = keys.contains(key);
            let was_pressed = self.control_keys.get(key).cloned().unwrap_or(false);

            if is_pressed && !was_pressed {
                // Key just pressed
                let event = match key {
                    Keycode::Comma => {
                        println!("Cycling curve backward");
                        ControlEvent::CycleCurve(CycleDirection::Backward)
                    }
                    Keycode::Dot => {
                        println!("Cycling curve forward");
                        ControlEvent::CycleCurve(CycleDirection::Forward)
                    }
                    Keycode::M => {
                        println!("Toggling trigger/gate mode");
                        ControlEvent::ToggleMode
                    }
                    _ => continue,
                };
                if let Err(e) = self.control_sender.send(event) {
                    eprintln!("Error sending control event: {}", e);
                }
            }

            self.control_keys.insert(*key, is_pressed);
        }
    }
}
