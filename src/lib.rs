//! # ook433
//!
//! A portable, no_std Rust driver for HopeRF RFM22 (Silicon Labs Si4432)
//! 433 MHz transceiver modules operated as transmit-only OOK senders, plus an
//! encoder for the on/off-keyed pulse protocol spoken by cheap
//! remote-controlled mains socket switches.
//!
//! The crate has three layers, composed bottom-up:
//! - [`radio::Rfm22`]: register-level access to the transceiver over a
//!   synchronous serial bus (`embedded-hal` [`SpiBus`](embedded_hal::spi::SpiBus)
//!   plus a chip-select pin), and the fixed one-time configuration sequence
//!   that puts the chip into direct asynchronous OOK transmit mode.
//! - [`encoder::SwitchEncoder`]: converts a (group, device, command) switch
//!   address into a precisely timed pulse train on a dedicated output pin,
//!   busy-waiting through an `embedded-hal`
//!   [`DelayNs`](embedded_hal::delay::DelayNs) provider.
//! - [`command`]: the byte-oriented command dialect of the host link: fixed
//!   request frames in, short textual replies out. The transport that carries
//!   those bytes (USB, serial, ...) is not part of this crate.
//!
//! ## Crate features
//! | Feature                      | Description |
//! |------------------------------|-------------|
//! | `std`                        | Disables `#![no_std]` support (host builds and tests) |
//! | `critical-section` (default) | Runs each pulse train inside `critical_section::with` so it cannot be preempted |
//! | `defmt-0-3`                  | Uses `defmt` logging and derives `defmt::Format` |
//! | `log`                        | Uses `log` logging |
//!
//! ## Usage
//!
//! ```ignore
//! use ook433::{command::process_frame, encoder::SwitchEncoder, radio::Rfm22};
//!
//! let mut radio = Rfm22::new(spi, cs_pin, spi_delay);
//! let mut encoder = SwitchEncoder::new(ook_pin, pulse_delay);
//!
//! // One inbound request frame, one optional reply to hand back to the host.
//! if let Some(reply) = process_frame(b"sb20", &mut radio, &mut encoder, &mut gap_delay) {
//!     host.write(reply.as_bytes());
//! }
//! ```
//!
//! ## Timing
//!
//! Pulse timing is the entire correctness contract of the socket protocol:
//! the receivers decode half-pulses of a few hundred microseconds and offer
//! no feedback channel, so a pulse train that jitters beyond roughly ±20% is
//! silently lost. The delay provider handed to [`encoder::SwitchEncoder`]
//! must busy-wait (no suspension), and on preemptible platforms the
//! `critical-section` feature should stay enabled.
//!
//! ## Status
//!
//! Transmit-only by design: the radio's receive chain is never powered and
//! no acknowledgment path exists.
//!
//! --
//! Designed for `#![no_std]` use in resource-constrained embedded environments.

#![deny(
    bad_style,
    dead_code,
    improper_ctypes,
    non_shorthand_field_patterns,
    no_mangle_generic_items,
    overflowing_literals,
    path_statements,
    patterns_in_fns_without_body,
    unconditional_recursion,
    unused,
    while_true,
    missing_debug_implementations,
    missing_docs,
    trivial_casts,
    trivial_numeric_casts,
    unused_extern_crates,
    unused_import_braces,
    unused_qualifications,
    unused_results
)]
#![cfg_attr(not(feature = "std"), no_std)]

pub mod command;
pub mod consts;
pub mod encoder;
pub mod radio;
pub mod registers;
