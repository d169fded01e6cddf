#[cfg(feature = "native")]
mod keyboard;
#[cfg(feature = "native")]
mod midi;
#[cfg(feature = "native")]
pub use self::keyboard::KeyboardHandler;
#[cfg(feature = "native")]
pub use self::midi::MidiHandler;

/// Host-side control gestures (curve cycling, mode toggling) picked up
/// from the computer keyboard alongside the trigger keys.
#[derive(Debug, Clone, Copy)]
pub enum ControlEvent {
    CycleCurve(CycleDirection),
    ToggleMode,
}

#[derive(Debug, Clone, Copy)]
pub enum CycleDirection {
    Backward,
    Forward,
}
