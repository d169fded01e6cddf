use crate::audio::{AudioBackend, CpalBackend};
use crate::ducker::{Curve, Ducker, Mode, TriggerEvent, DEFAULT_SAMPLE_RATE};
use crate::input::{ControlEvent, CycleDirection, KeyboardHandler, MidiHandler};
use std::sync::mpsc::channel;
use std::sync::mpsc::Receiver;
use std::sync::{Arc, Mutex};

const TONE_HZ: f32 = 220.0;
const TONE_AMPLITUDE: f32 = 12_000.0;

/// Steady sine tone the native host runs through the ducker so the effect
/// is audible without an external audio source.
struct TestTone {
    phase: f32,
    sample_rate: f32,
}

impl TestTone {
    fn new(sample_rate: f32) -> Self {
        Self {
            phase: 0.0,
            sample_rate,
        }
    }

    fn fill_stereo(&mut self, out: &mut [i16]) {
        for frame in out.chunks_exact_mut(2) {
            let sample = ((self.phase * std::f32::consts::TAU).sin() * TONE_AMPLITUDE) as i16;
            frame[0] = sample;
            frame[1] = sample;
            self.phase += TONE_HZ / self.sample_rate;
            if self.phase >= 1.0 {
                self.phase -= 1.0;
            }
        }
    }
}

/// Native runtime: owns the engine and drains trigger/control events into
/// it at the top of every audio block, so event handling and processing
/// stay on one execution context.
pub struct NativeDucker {
    ducker: Ducker,
    event_receiver: Receiver<TriggerEvent>,
    control_receiver: Receiver<ControlEvent>,
    tone: TestTone,
    scratch: Vec<i16>,
}

impl NativeDucker {
    pub fn new(
        event_receiver: Receiver<TriggerEvent>,
        control_receiver: Receiver<ControlEvent>,
    ) -> Self {
        Self {
            ducker: Ducker::with_config(None, None, Some(log_line)),
            event_receiver,
            control_receiver,
            tone: TestTone::new(DEFAULT_SAMPLE_RATE),
            scratch: Vec::new(),
        }
    }

    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.ducker.set_sample_rate(sample_rate);
        self.tone.sample_rate = sample_rate;
    }

    /// Render one block of ducked test tone, stereo interleaved.
    pub fn render_stereo(&mut self, frames: usize) -> &[i16] {
        self.drain_events();
        if self.scratch.len() != frames * 2 {
            self.scratch.resize(frames * 2, 0);
        }
        self.tone.fill_stereo(&mut self.scratch);
        self.ducker.process(&mut self.scratch);
        &self.scratch
    }

    fn drain_events(&mut self) {
        while let Ok(event) = self.event_receiver.try_recv() {
            self.ducker.on_event(&event);
        }
        while let Ok(event) = self.control_receiver.try_recv() {
            self.apply_control(event);
        }
    }

    fn apply_control(&mut self, event: ControlEvent) {
        match event {
            ControlEvent::CycleCurve(direction) => {
                let index = self.ducker.params().curve.index();
                let next = match direction {
                    CycleDirection::Forward => (index + 1) % 4,
                    CycleDirection::Backward => (index + 3) % 4,
                };
                let curve = Curve::from_index(next);
                self.ducker.set_param("curve", curve.name());
                println!("Curve: {}", curve.name());
            }
            ControlEvent::ToggleMode => {
                let mode = match self.ducker.params().mode {
                    Mode::Trigger => Mode::Gate,
                    Mode::Gate => Mode::Trigger,
                };
                self.ducker.set_param("mode", mode.name());
                println!("Mode: {}", mode.name());
            }
        }
    }
}

fn log_line(msg: &str) {
    println!("{}", msg);
}

pub fn start() {
    let (event_tx, event_rx) = channel();
    let (control_tx, control_rx) = channel();

    let ducker = Arc::new(Mutex::new(NativeDucker::new(event_rx, control_rx)));

    let mut audio_backend = CpalBackend::new(ducker.clone());
    audio_backend.start();

    let mut keyboard_handler = KeyboardHandler::new(event_tx.clone(), control_tx);
    let mut midi_handler = MidiHandler::new(event_tx);

    println!("Hold Z/X/C/V to duck, ',' '.' cycle the curve, 'M' toggles gate mode.");

    loop {
        keyboard_handler.update();
        midi_handler.update();

        std::thread::sleep(std::time::Duration::from_millis(10));
    }
}
