use tracing::trace;

use super::midi::MidiEvent;

/// Latest value of every control change, for mapping knobs onto parameters.
pub struct ControlParser {
    group: Option<u8>,
    channel: Option<u8>,
    values: [u8; 128],
}

impl ControlParser {
    pub fn new() -> Self {
        Self {
            group: None,
            channel: None,
            values: [0; 128],
        }
    }

    pub fn with_group(mut self, group: u8) -> Self {
        self.group = Some(group & 0x0F);
        self
    }

    pub fn with_channel(mut self, channel: u8) -> Self {
        self.channel = Some(channel & 0x0F);
        self
    }

    /// Preset a controller before any message arrives.
    pub fn with_value(mut self, controller: u8, value: u8) -> Self {
        self.values[(controller & 0x7F) as usize] = value & 0x7F;
        self
    }

    pub fn parse<P: AsRef<[u8]>>(&mut self, packets: &[P]) {
        for packet in packets {
            let bytes = packet.as_ref();
            match MidiEvent::from_ump(bytes) {
                Some(event) => self.handle(event),
                None => trace!(?bytes, "ignoring MIDI packet"),
            }
        }
    }

    pub fn handle(&mut self, event: MidiEvent) {
        if let MidiEvent::ControlChange {
            group,
            channel,
            controller,
            value,
        } = event
        {
            if self.group.map_or(true, |g| g == group) && self.channel.map_or(true, |c| c == channel) {
                self.values[(controller & 0x7F) as usize] = value;
            }
        }
    }

    /// Raw 7-bit value.
    pub fn value(&self, controller: u8) -> u8 {
        self.values[(controller & 0x7F) as usize]
    }

    /// Value mapped linearly onto `min ..= max`.
    pub fn scaled(&self, controller: u8, min: f32, max: f32) -> f32 {
        min + (max - min) * self.value(controller) as f32 / 127.0
    }

    /// 14-bit value from a coarse/fine controller pair, mapped onto `min ..= max`.
    pub fn scaled14(&self, msb: u8, lsb: u8, min: f32, max: f32) -> f32 {
        let raw = ((self.value(msb) as u16) << 7) | self.value(lsb) as u16;
        min + (max - min) * raw as f32 / 16383.0
    }
}

impl Default for ControlParser {
    fn default() -> Self {
        Self::new()
    }
}
