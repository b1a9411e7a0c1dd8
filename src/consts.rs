//! Constants shared across the driver and the switch protocol.
//!
//! Two groups live here:
//!
//! - **Radio configuration values**: the register payloads written by
//!   [`Rfm22::init`](crate::radio::Rfm22::init). Together they put the chip
//!   into direct asynchronous OOK transmit mode on a 433.92 MHz carrier.
//! - **Switch protocol values**: repetition count and spacing of the socket
//!   command transmissions, and the host-link reply cap.
//!
//! The switch-protocol numbers were established empirically against real
//! receiver hardware. They encode a third-party receiver's expectations and
//! must be carried verbatim; there is no decoding-side reference to
//! validate looser or tighter values against.

/// Settle time between asserting chip-select and the first clocked bit, in
/// microseconds.
pub const CS_SETTLE_US: u32 = 1;

/// GPIO0 function code: RX-state output, used to drive the antenna switch.
pub const GPIO0_FUNCTION: u8 = 0x12;

/// GPIO1 function code: TX-state output, used to drive the antenna switch.
pub const GPIO1_FUNCTION: u8 = 0x15;

/// Crystal oscillator load capacitance trim.
pub const OSC_LOAD_TRIM: u8 = 0x7f;

/// TX FIFO almost-empty threshold, in bytes.
pub const TX_FIFO_THRESHOLD: u8 = 0x04;

/// Transmit power step (0 = minimum, 7 = maximum).
pub const TX_POWER_LEVEL: u8 = 0x03;

/// Frequency offset word. Zero: the carrier is set by band and nominal
/// frequency alone.
pub const FREQUENCY_OFFSET: u16 = 0;

/// Frequency band select for the 430 MHz band.
pub const FREQUENCY_BAND_433: u8 = 19;

/// Nominal carrier frequency word. With band select 19 this lands the
/// carrier on 433.92 MHz (shifted -40 kHz to sit where the receivers
/// actually listen).
pub const NOMINAL_CARRIER_433_92: u16 = 25340;

/// TX data rate word, programmed to the chip's maximum. In direct
/// asynchronous mode the pin timing, not this rate, shapes the waveform.
pub const TX_DATA_RATE_MAX: u16 = 0xffff;

/// Number of times a switch command frame is transmitted back to back.
///
/// The receiving sockets need redundant transmission to latch a command at
/// all: one frame never works, two work badly, five are reliable.
pub const SWITCH_SEND_REPEATS: usize = 5;

/// Pause between repeated switch command transmissions, in milliseconds.
///
/// Also receiver-critical: 2 ms gaps are not decoded.
pub const SWITCH_REPEAT_GAP_MS: u32 = 5;

/// Upper bound on the length of a textual reply to a host command frame.
pub const REPLY_CAPACITY: usize = 64;

/// Version code the Si4432 rev B1 die reports in register 0x01.
pub const VERSION_CODE_B1: u8 = 0x06;
