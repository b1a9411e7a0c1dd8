//! Pulse encoder for the socket-switch OOK protocol.
//!
//! A switch command is addressed by a (group, device, command) triple. Each
//! axis indexes a fixed table of 8-bit codes; the three selected codes are
//! bit-blasted most-significant bit first onto a dedicated output pin, with
//! a single zero-bit pulse separating the group code from the device code.
//! A frame is therefore always [`FRAME_PULSES`] pulses long.
//!
//! Each bit is one high/low pulse pair with sub-millisecond half-pulse
//! durations ([`PULSE_ZERO`], [`PULSE_ONE`]). The receiving sockets decode
//! these by shape alone, with no clock line and no acknowledgment, so
//! the delay provider must busy-wait with roughly ±20% accuracy and the
//! train must not be preempted. With the `critical-section` feature
//! enabled (the default), [`SwitchEncoder::send`] wraps the whole frame in
//! `critical_section::with`.
//!
//! The encoder drives its own pin and nothing else: it is independent of
//! the register bus, which is why the radio driver and this module meet
//! only in the command layer.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use thiserror::Error;

/// One encoded bit: carrier on for `high_us`, then off for `low_us`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub struct Pulse {
    /// Carrier-on duration in microseconds.
    pub high_us: u32,
    /// Carrier-off duration in microseconds.
    pub low_us: u32,
}

/// Pulse shape of a zero bit.
pub const PULSE_ZERO: Pulse = Pulse {
    high_us: 400,
    low_us: 940,
};

/// Pulse shape of a one bit.
pub const PULSE_ONE: Pulse = Pulse {
    high_us: 1005,
    low_us: 340,
};

/// Pulses per frame: eight group bits, one gap, eight device bits, eight
/// command bits.
pub const FRAME_PULSES: usize = 25;

/// Code bytes for the four switch groups.
pub static GROUP_CODES: [u8; 4] = [0x15, 0x45, 0x51, 0x54];

/// Code bytes for the three device slots within a group.
pub static DEVICE_CODES: [u8; 3] = [0x2a, 0x8a, 0xa2];

/// Code bytes for the two commands: off, on.
pub static COMMAND_CODES: [u8; 2] = [0xa8, 0xae];

/// A switch-address index fell outside its code table.
///
/// This is a caller precondition violation, not a runtime fault: nothing is
/// transmitted, and the offending index is carried for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub enum AddressError {
    /// Group index outside `0..=3`.
    #[error("group index {0} out of range")]
    Group(u8),
    /// Device index outside `0..=2`.
    #[error("device index {0} out of range")]
    Device(u8),
    /// Command index outside `0..=1`.
    #[error("command index {0} out of range")]
    Command(u8),
}

/// Bit-blasts switch command frames onto a dedicated OOK output pin.
///
/// ## Type Parameters
///
/// - `TX`: the output pin feeding the transmitter's asynchronous data line,
///   [`embedded_hal::digital::OutputPin`]
/// - `D`: busy-wait delay provider, [`embedded_hal::delay::DelayNs`],
///   accurate to ±20% and non-suspending
#[derive(Debug)]
pub struct SwitchEncoder<TX, D>
where
    TX: OutputPin,
    D: DelayNs,
{
    /// Output pin driving the transmitter's TX data line.
    pub tx: TX,
    /// Delay provider used for half-pulse timing.
    pub delay: D,
}

impl<TX, D> SwitchEncoder<TX, D>
where
    TX: OutputPin,
    D: DelayNs,
{
    /// Creates a new encoder with the carrier off.
    pub fn new(tx: TX, delay: D) -> Self {
        let mut tx = tx;
        let _ = tx.set_low(); // Ensure idle
        Self { tx, delay }
    }

    /// Encodes and transmits one switch command frame.
    ///
    /// Checks all three indices against their code tables before touching
    /// the pin, then emits the 25-pulse frame and returns only after the
    /// final pulse's low period has elapsed (roughly 34 ms). The caller is
    /// responsible for the redundant repetition the receivers require; see
    /// [`SWITCH_SEND_REPEATS`](crate::consts::SWITCH_SEND_REPEATS).
    pub fn send(&mut self, group: u8, device: u8, command: u8) -> Result<(), AddressError> {
        let group_code = *GROUP_CODES
            .get(group as usize)
            .ok_or(AddressError::Group(group))?;
        let device_code = *DEVICE_CODES
            .get(device as usize)
            .ok_or(AddressError::Device(device))?;
        let command_code = *COMMAND_CODES
            .get(command as usize)
            .ok_or(AddressError::Command(command))?;

        #[cfg(feature = "critical-section")]
        critical_section::with(|_| self.transmit(group_code, device_code, command_code));
        #[cfg(not(feature = "critical-section"))]
        self.transmit(group_code, device_code, command_code);

        Ok(())
    }

    fn transmit(&mut self, group_code: u8, device_code: u8, command_code: u8) {
        self.bitblast(group_code);
        // inter-field gap between group and device
        self.emit(PULSE_ZERO);
        self.bitblast(device_code);
        self.bitblast(command_code);
    }

    fn bitblast(&mut self, code: u8) {
        for bit in (0..8).rev() {
            if code & (1 << bit) != 0 {
                self.emit(PULSE_ONE);
            } else {
                self.emit(PULSE_ZERO);
            }
        }
    }

    fn emit(&mut self, pulse: Pulse) {
        let _ = self.tx.set_high();
        self.delay.delay_us(pulse.high_us);
        let _ = self.tx.set_low();
        self.delay.delay_us(pulse.low_us);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal_mock::eh1::digital::{
        Mock as PinMock, State as PinState, Transaction as PinTransaction,
    };

    /// Captures every requested delay in microseconds instead of waiting.
    #[derive(Debug, Default)]
    struct RecordingDelay {
        log: Vec<u32>,
    }

    impl DelayNs for RecordingDelay {
        fn delay_ns(&mut self, ns: u32) {
            self.log.push(ns / 1_000);
        }

        fn delay_us(&mut self, us: u32) {
            self.log.push(us);
        }

        fn delay_ms(&mut self, ms: u32) {
            self.log.push(ms * 1_000);
        }
    }

    fn push_bits(bits: &mut Vec<bool>, code: u8) {
        for bit in (0..8).rev() {
            bits.push(code & (1 << bit) != 0);
        }
    }

    /// Bit sequence of one frame, gap included.
    fn frame_bits(group: usize, device: usize, command: usize) -> Vec<bool> {
        let mut bits = Vec::new();
        push_bits(&mut bits, GROUP_CODES[group]);
        bits.push(false);
        push_bits(&mut bits, DEVICE_CODES[device]);
        push_bits(&mut bits, COMMAND_CODES[command]);
        bits
    }

    /// Pin expectations for a frame: the initial idle set from `new()`,
    /// then one high/low pair per pulse.
    fn frame_pin_transactions(bits: &[bool]) -> Vec<PinTransaction> {
        let mut pin = vec![PinTransaction::set(PinState::Low)];
        for _ in bits {
            pin.push(PinTransaction::set(PinState::High));
            pin.push(PinTransaction::set(PinState::Low));
        }
        pin
    }

    /// Expected half-pulse durations for a frame, in microseconds.
    fn frame_durations(bits: &[bool]) -> Vec<u32> {
        let mut durations = Vec::new();
        for &bit in bits {
            let pulse = if bit { PULSE_ONE } else { PULSE_ZERO };
            durations.push(pulse.high_us);
            durations.push(pulse.low_us);
        }
        durations
    }

    #[test]
    fn frame_is_exactly_25_pulses_with_exact_timings() {
        let bits = frame_bits(1, 1, 0);
        assert_eq!(bits.len(), FRAME_PULSES);

        let tx = PinMock::new(&frame_pin_transactions(&bits));
        let mut encoder = SwitchEncoder::new(tx, RecordingDelay::default());

        encoder.send(1, 1, 0).unwrap();

        assert_eq!(encoder.delay.log, frame_durations(&bits));
        encoder.tx.done();
    }

    #[test]
    fn frame_duration_lands_in_the_receiver_window() {
        for command in 0..COMMAND_CODES.len() {
            let bits = frame_bits(0, 0, command);
            let tx = PinMock::new(&frame_pin_transactions(&bits));
            let mut encoder = SwitchEncoder::new(tx, RecordingDelay::default());

            encoder.send(0, 0, command as u8).unwrap();

            let total_us: u32 = encoder.delay.log.iter().sum();
            assert!(
                (20_000..=40_000).contains(&total_us),
                "frame took {} us",
                total_us
            );
            encoder.tx.done();
        }
    }

    #[test]
    fn every_in_range_address_transmits() {
        for group in 0..GROUP_CODES.len() {
            for device in 0..DEVICE_CODES.len() {
                for command in 0..COMMAND_CODES.len() {
                    let bits = frame_bits(group, device, command);
                    let tx = PinMock::new(&frame_pin_transactions(&bits));
                    let mut encoder = SwitchEncoder::new(tx, RecordingDelay::default());

                    encoder
                        .send(group as u8, device as u8, command as u8)
                        .unwrap();

                    assert_eq!(encoder.delay.log.len(), 2 * FRAME_PULSES);
                    encoder.tx.done();
                }
            }
        }
    }

    #[test]
    fn out_of_range_indices_fail_before_the_first_pulse() {
        let cases = [
            (4, 0, 0, AddressError::Group(4)),
            (0xff, 0, 0, AddressError::Group(0xff)),
            (0, 3, 0, AddressError::Device(3)),
            (0, 0, 2, AddressError::Command(2)),
        ];
        for (group, device, command, expected) in cases {
            let tx = PinMock::new(&[PinTransaction::set(PinState::Low)]);
            let mut encoder = SwitchEncoder::new(tx, RecordingDelay::default());

            assert_eq!(encoder.send(group, device, command), Err(expected));
            assert!(encoder.delay.log.is_empty());
            encoder.tx.done();
        }
    }

    #[test]
    fn group_validation_wins_over_device_and_command() {
        let tx = PinMock::new(&[PinTransaction::set(PinState::Low)]);
        let mut encoder = SwitchEncoder::new(tx, RecordingDelay::default());

        assert_eq!(encoder.send(9, 9, 9), Err(AddressError::Group(9)));
        encoder.tx.done();
    }
}
