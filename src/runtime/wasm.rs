use crate::ducker::{Ducker, TriggerSource};
use js_sys::Int16Array;
use wasm_bindgen::prelude::*;

/// WASM ducker runtime (no threads, no channels, direct API)
#[wasm_bindgen]
pub struct WasmDucker {
    ducker: Ducker,
    temp_buffer: Vec<i16>,
}

#[wasm_bindgen]
impl WasmDucker {
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: Option<String>) -> WasmDucker {
        WasmDucker {
            ducker: Ducker::with_config(None, config_json.as_deref(), Some(console_log)),
            temp_buffer: Vec::new(),
        }
    }

    #[wasm_bindgen]
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.ducker.set_sample_rate(sample_rate);
    }

    /// Duck an interleaved stereo block and hand it back as a JS-friendly
    /// Int16Array.
    #[wasm_bindgen]
    pub fn process(&mut self, samples: &[i16]) -> Int16Array {
        if self.temp_buffer.len() != samples.len() {
            self.temp_buffer = vec![0; samples.len()];
        }
        self.temp_buffer.copy_from_slice(samples);
        self.ducker.process(&mut self.temp_buffer);

        Int16Array::from(self.temp_buffer.as_slice())
    }

    /// Raw trigger entry point: a status/note/velocity triple.
    #[wasm_bindgen]
    pub fn on_midi(&mut self, status: u8, data1: u8, data2: u8) {
        self.ducker
            .on_raw_message(&[status, data1, data2], TriggerSource::Midi);
    }

    #[wasm_bindgen]
    pub fn set_param(&mut self, key: &str, value: &str) {
        self.ducker.set_param(key, value);
    }

    #[wasm_bindgen]
    pub fn get_param(&self, key: &str) -> Option<String> {
        self.ducker.get_param(key)
    }

    /// Full configuration as a structured JS object.
    #[wasm_bindgen]
    pub fn get_state(&self) -> JsValue {
        serde_wasm_bindgen::to_value(&self.ducker.params().to_state()).unwrap_or(JsValue::NULL)
    }
}

fn console_log(msg: &str) {
    web_sys::console::log_1(&msg.into());
}
