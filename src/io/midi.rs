/*
Universal MIDI Packets
======================

Hosts deliver MIDI as Universal MIDI Packets (UMP). MIDI 1.0 channel voice
messages are one 32-bit word, four bytes:

    byte 0   0x2g    message type 2, group g (0-15)
    byte 1   0xSc    status S, channel c (0-15)
    byte 2   data 1  key / controller / program / bend LSB
    byte 3   data 2  velocity / value / bend MSB

Handled statuses:

    0x8  note off         key, velocity
    0x9  note on          key, velocity (0 is treated as note off by parsers)
    0xB  control change   controller, value
    0xC  program change   program
    0xE  pitch bend       14-bit value, centred: ((msb << 7) | lsb) - 8192

Everything else decodes to `None`.
*/

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MidiEvent {
    NoteOn { group: u8, channel: u8, key: u8, velocity: u8 },
    NoteOff { group: u8, channel: u8, key: u8, velocity: u8 },
    ControlChange { group: u8, channel: u8, controller: u8, value: u8 },
    /// Signed, -8192 ..= 8191.
    PitchBend { group: u8, channel: u8, value: i16 },
    ProgramChange { group: u8, channel: u8, program: u8 },
}

/// UMP message type for MIDI 1.0 channel voice messages.
const MIDI1_CHANNEL_VOICE: u8 = 0x2;

impl MidiEvent {
    /// Decode one packet. `None` for anything but a 4-byte MIDI 1.0 channel
    /// voice message with a handled status.
    pub fn from_ump(packet: &[u8]) -> Option<Self> {
        let &[b0, b1, b2, b3] = packet else {
            return None;
        };
        if b0 >> 4 != MIDI1_CHANNEL_VOICE {
            return None;
        }

        let group = b0 & 0x0F;
        let channel = b1 & 0x0F;
        let (data1, data2) = (b2 & 0x7F, b3 & 0x7F);

        let event = match b1 >> 4 {
            0x8 => MidiEvent::NoteOff {
                group,
                channel,
                key: data1,
                velocity: data2,
            },
            0x9 => MidiEvent::NoteOn {
                group,
                channel,
                key: data1,
                velocity: data2,
            },
            0xB => MidiEvent::ControlChange {
                group,
                channel,
                controller: data1,
                value: data2,
            },
            0xC => MidiEvent::ProgramChange {
                group,
                channel,
                program: data1,
            },
            0xE => MidiEvent::PitchBend {
                group,
                channel,
                value: (((data2 as i16) << 7) | data1 as i16) - 8192,
            },
            _ => return None,
        };
        Some(event)
    }

    pub fn group(&self) -> u8 {
        match *self {
            MidiEvent::NoteOn { group, .. }
            | MidiEvent::NoteOff { group, .. }
            | MidiEvent::ControlChange { group, .. }
            | MidiEvent::PitchBend { group, .. }
            | MidiEvent::ProgramChange { group, .. } => group,
        }
    }

    pub fn channel(&self) -> u8 {
        match *self {
            MidiEvent::NoteOn { channel, .. }
            | MidiEvent::NoteOff { channel, .. }
            | MidiEvent::ControlChange { channel, .. }
            | MidiEvent::PitchBend { channel, .. }
            | MidiEvent::ProgramChange { channel, .. } => channel,
        }
    }

    /// Encode as a MIDI 1.0 channel voice packet.
    pub fn to_ump(&self) -> [u8; 4] {
        let head = |status: u8, group: u8, channel: u8| {
            [
                (MIDI1_CHANNEL_VOICE << 4) | (group & 0x0F),
                (status << 4) | (channel & 0x0F),
            ]
        };
        match *self {
            MidiEvent::NoteOff {
                group,
                channel,
                key,
                velocity,
            } => {
                let [b0, b1] = head(0x8, group, channel);
                [b0, b1, key, velocity]
            }
            MidiEvent::NoteOn {
                group,
                channel,
                key,
                velocity,
            } => {
                let [b0, b1] = head(0x9, group, channel);
                [b0, b1, key, velocity]
            }
            MidiEvent::ControlChange {
                group,
                channel,
                controller,
                value,
            } => {
                let [b0, b1] = head(0xB, group, channel);
                [b0, b1, controller, value]
            }
            MidiEvent::ProgramChange {
                group,
                channel,
                program,
            } => {
                let [b0, b1] = head(0xC, group, channel);
                [b0, b1, program, 0]
            }
            MidiEvent::PitchBend {
                group,
                channel,
                value,
            } => {
                let [b0, b1] = head(0xE, group, channel);
                let raw = (value.clamp(-8192, 8191) + 8192) as u16;
                [b0, b1, (raw & 0x7F) as u8, (raw >> 7) as u8]
            }
        }
    }
}
