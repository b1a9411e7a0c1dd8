//! Host-link command dialect: fixed request frames in, short textual
//! replies out.
//!
//! The transport that carries the bytes (USB HID in the reference hardware)
//! is not this crate's concern. This module owns everything between the
//! bytes: parsing the frame, driving the radio or the encoder, and
//! formatting the reply the host reads back. Frames that don't parse are
//! no-ops with no reply; the link has no error vocabulary.
//!
//! | First byte | Frame                          | Effect                        |
//! |------------|--------------------------------|-------------------------------|
//! | `r`        | `r` + 2 hex digits             | raw register read             |
//! | `w`        | `w` + 2 hex + pad + 2 hex      | raw register write            |
//! | `s`        | `s` + group + device + command | transmit a switch command     |
//! | `\0`       | -                              | no-op                         |

use crate::consts::{REPLY_CAPACITY, SWITCH_REPEAT_GAP_MS, SWITCH_SEND_REPEATS};
use crate::encoder::SwitchEncoder;
use crate::radio::Rfm22;
use core::fmt::Write;
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use embedded_hal::spi::SpiBus;
use heapless::String;

/// Textual reply to a request frame. The transport guarantees the host
/// never sees more than [`REPLY_CAPACITY`] bytes, so neither do we.
pub type Reply = String<REPLY_CAPACITY>;

/// A decoded request frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub enum Command {
    /// Read one register and report its value.
    ReadRegister {
        /// Register address from the frame's hex digits.
        register: u8,
    },
    /// Write one register and echo the write.
    WriteRegister {
        /// Register address from the frame's hex digits.
        register: u8,
        /// Value from the frame's hex digits.
        value: u8,
    },
    /// Configure the radio and transmit a switch command frame, repeated
    /// for the receiver's benefit.
    Switch {
        /// Group index decoded from the letter `'a'..='d'`.
        group: u8,
        /// Device index decoded from the digit `'1'..='3'`.
        device: u8,
        /// Command index decoded from the digit `'0'..='1'`.
        command: u8,
    },
    /// An explicit empty frame.
    Noop,
}

impl Command {
    /// Decodes the leading bytes of a request frame.
    ///
    /// Returns `None` for unknown first bytes, truncated frames, and
    /// malformed hex, all of which the link treats as no-ops. The switch
    /// letter/digit mapping is *not* range-checked here; out-of-range
    /// indices are caught by the encoder's precondition, which is the
    /// single enforcement point for the code tables.
    pub fn parse(frame: &[u8]) -> Option<Self> {
        match *frame.first()? {
            0 => Some(Command::Noop),
            b'r' => {
                let register = hex_byte(frame.get(1..3)?)?;
                Some(Command::ReadRegister { register })
            }
            b'w' => {
                // one pad byte between the address and value digits
                let register = hex_byte(frame.get(1..3)?)?;
                let value = hex_byte(frame.get(4..6)?)?;
                Some(Command::WriteRegister { register, value })
            }
            b's' => Some(Command::Switch {
                group: frame.get(1)?.wrapping_sub(b'a'),
                device: frame.get(2)?.wrapping_sub(b'1'),
                command: frame.get(3)?.wrapping_sub(b'0'),
            }),
            _ => None,
        }
    }
}

fn hex_digit(byte: u8) -> Option<u8> {
    match byte {
        b'0'..=b'9' => Some(byte - b'0'),
        b'a'..=b'f' => Some(byte - b'a' + 10),
        b'A'..=b'F' => Some(byte - b'A' + 10),
        _ => None,
    }
}

fn hex_byte(digits: &[u8]) -> Option<u8> {
    Some((hex_digit(digits[0])? << 4) | hex_digit(digits[1])?)
}

/// Processes one request frame end to end and returns the reply, if any.
///
/// Register frames go straight to the raw register path and always reply.
/// Switch frames first run the radio's configuration sequence (idempotent;
/// the chip must be in transmit mode before the first pulse, including
/// straight after power-up), then transmit the command [`SWITCH_SEND_REPEATS`] times with
/// a [`SWITCH_REPEAT_GAP_MS`] pause after each frame. Both numbers are
/// receiver requirements: a single transmission is never latched.
///
/// An out-of-range switch address aborts the repetition loop and yields no
/// reply, like any other invalid frame.
///
/// `gap` is the router's own timing source for the inter-repetition pause;
/// it has no bearing on pulse timing.
pub fn process_frame<SPI, CS, TX, RD, ED, GD>(
    frame: &[u8],
    radio: &mut Rfm22<SPI, CS, RD>,
    encoder: &mut SwitchEncoder<TX, ED>,
    gap: &mut GD,
) -> Option<Reply>
where
    SPI: SpiBus<u8>,
    CS: OutputPin,
    TX: OutputPin,
    RD: DelayNs,
    ED: DelayNs,
    GD: DelayNs,
{
    match Command::parse(frame)? {
        Command::Noop => None,
        Command::ReadRegister { register } => {
            let value = radio.read_register(register);
            let mut reply = Reply::new();
            write!(reply, "read 0x{:02x} = 0x{:02x}\n", register, value).ok()?;
            Some(reply)
        }
        Command::WriteRegister { register, value } => {
            radio.write_register(register, value);
            let mut reply = Reply::new();
            write!(reply, "wrote 0x{:02x} = 0x{:02x}\n", register, value).ok()?;
            Some(reply)
        }
        Command::Switch {
            group,
            device,
            command,
        } => {
            #[cfg(feature = "log")]
            log::trace!("switch command {}/{}/{}", group, device, command);

            radio.init();
            for _ in 0..SWITCH_SEND_REPEATS {
                encoder.send(group, device, command).ok()?;
                gap.delay_ms(SWITCH_REPEAT_GAP_MS);
            }
            let mut reply = Reply::new();
            write!(
                reply,
                "switch {}{}={}\n",
                (b'a' + group) as char,
                (b'1' + device) as char,
                (b'0' + command) as char
            )
            .ok()?;
            Some(reply)
        }
    }
}
