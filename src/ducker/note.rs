/// Where a trigger event came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerSource {
    Midi,
    Keyboard,
}

/// A decoded start/stop trigger event.
#[derive(Debug, Clone, Copy)]
pub struct TriggerEvent {
    /// 1-16
    pub channel: u8,
    /// Note number identifying the trigger, 0-127
    pub note: u8,
    /// Intensity of a start event, 0-127; always 0 for stop events
    pub velocity: u8,
    pub is_on: bool,
    pub source: TriggerSource,
}

impl TriggerEvent {
    pub fn start(channel: u8, note: u8, velocity: u8, source: TriggerSource) -> Self {
        Self {
            channel,
            note,
            velocity,
            is_on: true,
            source,
        }
    }

    pub fn stop(channel: u8, note: u8, source: TriggerSource) -> Self {
        Self {
            channel,
            note,
            velocity: 0,
            is_on: false,
            source,
        }
    }

    /// Decode a raw status/note/velocity triple. Uses the standard note
    /// message convention: high nibble selects note-on/note-off, low nibble
    /// is channel minus one, and a zero-velocity note-on counts as note-off.
    /// Anything truncated or non-note comes back as None.
    pub fn from_raw(msg: &[u8], source: TriggerSource) -> Option<Self> {
        if msg.len() < 3 {
            return None;
        }
        let status = msg[0] & 0xF0;
        let channel = (msg[0] & 0x0F) + 1;
        let note = msg[1];
        let velocity = msg[2];
        if note > 127 || velocity > 127 {
            return None;
        }

        let note_on = status == 0x90 && velocity > 0;
        let note_off = status == 0x80 || (status == 0x90 && velocity == 0);
        if note_on {
            Some(Self::start(channel, note, velocity, source))
        } else if note_off {
            Some(Self::stop(channel, note, source))
        } else {
            None
        }
    }
}
