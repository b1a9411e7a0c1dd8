//! Register-level driver for the RFM22 (Si4432) transceiver.
//!
//! The chip hangs off a synchronous serial bus with a dedicated active-low
//! chip-select line. Every transaction addresses exactly one register: the
//! first byte on the bus carries the 7-bit register number plus a
//! read/write flag in the high bit, the second byte carries the payload in
//! whichever direction the flag selects.
//!
//! [`Rfm22::init`] performs the one-time configuration that turns the chip
//! into a transmit-only OOK sender in direct asynchronous mode: the
//! waveform is shaped entirely by an external data pin, and the on-chip
//! packet engine (CRC, headers, preamble) is switched off so it cannot
//! impose structure on the raw pulse train.
//!
//! The serial link is assumed to be correctly wired and lossless; there is
//! no transport error taxonomy and no retry logic at this layer.
//! Misconfiguration is not detected either: the chip offers no
//! acknowledgment for register writes, and verification is left to the
//! operator through the raw [`read_register`](Rfm22::read_register) path.

use crate::consts::{
    CS_SETTLE_US, FREQUENCY_BAND_433, FREQUENCY_OFFSET, GPIO0_FUNCTION, GPIO1_FUNCTION,
    NOMINAL_CARRIER_433_92, OSC_LOAD_TRIM, TX_DATA_RATE_MAX, TX_FIFO_THRESHOLD, TX_POWER_LEVEL,
};
use crate::registers;
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use embedded_hal::spi::SpiBus;

/// Configuration state of the transceiver as seen by this driver.
///
/// [`Rfm22::init`] is the only transition, and it is idempotent. Raw
/// register access is valid in either state so the hardware can be
/// diagnosed before it is configured.
#[derive(PartialEq, Eq, Clone, Copy, Default, Debug)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub enum RadioState {
    /// Power-on state: no configuration sequence has run yet.
    #[default]
    Uninitialized,
    /// The fixed configuration sequence has been written.
    Configured,
}

/// Register-level RFM22/Si4432 driver over a shared serial bus and a
/// dedicated chip-select pin.
///
/// ## Type Parameters
///
/// - `SPI`: the serial bus, [`embedded_hal::spi::SpiBus`]
/// - `CS`: active-low chip-select, [`embedded_hal::digital::OutputPin`]
/// - `D`: settle-delay provider, [`embedded_hal::delay::DelayNs`]
///
/// The bus and pin are assumed reliable; their error values are discarded.
#[derive(Debug)]
pub struct Rfm22<SPI, CS, D>
where
    SPI: SpiBus<u8>,
    CS: OutputPin,
    D: DelayNs,
{
    /// Serial bus the transceiver is attached to.
    pub spi: SPI,
    /// Chip-select pin, active low.
    pub cs: CS,
    delay: D,
    state: RadioState,
}

impl<SPI, CS, D> Rfm22<SPI, CS, D>
where
    SPI: SpiBus<u8>,
    CS: OutputPin,
    D: DelayNs,
{
    /// Creates a new driver and de-asserts chip-select.
    ///
    /// No bus traffic happens until the first register access.
    pub fn new(spi: SPI, cs: CS, delay: D) -> Self {
        let mut cs = cs;
        let _ = cs.set_high();
        Self {
            spi,
            cs,
            delay,
            state: RadioState::Uninitialized,
        }
    }

    /// Current [`RadioState`].
    pub fn state(&self) -> RadioState {
        self.state
    }

    /// Reads one register and returns its value.
    ///
    /// Valid in either state; this is the operator's diagnostic window into
    /// the chip, including before [`init`](Self::init) has run.
    pub fn read_register(&mut self, register: u8) -> u8 {
        let mut response = [0u8; 2];
        let _ = self.cs.set_low();
        self.delay.delay_us(CS_SETTLE_US);
        let _ = self
            .spi
            .transfer(&mut response, &[register & !registers::WRITE_FLAG, 0x00]);
        let _ = self.cs.set_high();
        response[1]
    }

    /// Writes one register.
    pub fn write_register(&mut self, register: u8, value: u8) {
        let _ = self.cs.set_low();
        self.delay.delay_us(CS_SETTLE_US);
        let _ = self.spi.write(&[register | registers::WRITE_FLAG, value]);
        let _ = self.cs.set_high();
    }

    /// Version code of the die (register 0x01), a fixed hardware constant.
    ///
    /// Reading it is the canonical smoke test that the serial transaction
    /// framing is correct.
    pub fn version_code(&mut self) -> u8 {
        self.read_register(registers::VERSION_CODE)
    }

    /// Device status register (0x02).
    pub fn device_status(&mut self) -> u8 {
        self.read_register(registers::DEVICE_STATUS)
    }

    /// Frequency offset word, split over registers 0x73/0x74 low byte first.
    pub fn set_frequency_offset(&mut self, offset: u16) {
        self.write_register(registers::FREQUENCY_OFFSET1, offset as u8);
        self.write_register(registers::FREQUENCY_OFFSET2, (offset >> 8) as u8);
    }

    /// Nominal carrier frequency word, registers 0x76/0x77 high byte first.
    pub fn set_carrier_frequency(&mut self, carrier: u16) {
        self.write_register(registers::CARRIER_FREQUENCY1, (carrier >> 8) as u8);
        self.write_register(registers::CARRIER_FREQUENCY0, carrier as u8);
    }

    /// TX data rate word, registers 0x6e/0x6f high byte first.
    pub fn set_tx_data_rate(&mut self, rate: u16) {
        self.write_register(registers::TX_DATA_RATE1, (rate >> 8) as u8);
        self.write_register(registers::TX_DATA_RATE0, rate as u8);
    }

    /// Clears both FIFOs by toggling the clear bits in operating mode
    /// control 2, preserving the other mode bits.
    pub fn reset_fifo(&mut self) {
        let ctrl = self.read_register(registers::OP_FUNC_CTRL2);
        self.write_register(
            registers::OP_FUNC_CTRL2,
            ctrl | registers::FFCLRRX | registers::FFCLRTX,
        );
        self.write_register(
            registers::OP_FUNC_CTRL2,
            ctrl & !(registers::FFCLRRX | registers::FFCLRTX),
        );
    }

    /// Writes the fixed configuration sequence.
    ///
    /// Order matters and is part of the contract: GPIO routing, oscillator
    /// trim, operating mode, interrupt masking, FIFO threshold, TX power,
    /// frequency, modulation, data rate, packet-handler shutdown, FIFO
    /// reset. Idempotent: running it again rewrites the same values.
    ///
    /// There is no error return: the chip does not acknowledge
    /// configuration, and read-back verification is deliberately left to
    /// the raw diagnostic path.
    pub fn init(&mut self) {
        // antenna switch on GPIO0/GPIO1
        self.write_register(registers::GPIO_CONFIG0, GPIO0_FUNCTION);
        self.write_register(registers::GPIO_CONFIG1, GPIO1_FUNCTION);

        // crystal load capacitance
        self.write_register(registers::OSC_LOAD_CAP, OSC_LOAD_TRIM);

        // pll, tx, xtal on; the receive chain stays dark
        self.write_register(
            registers::OP_FUNC_CTRL1,
            registers::TXON | registers::PLLON | registers::XTON,
        );

        // automatic transmission
        self.write_register(registers::OP_FUNC_CTRL2, registers::AUTOTX);

        // no interrupt sources
        self.write_register(registers::INTERRUPT_ENABLE2, 0x00);

        // tx fifo almost-empty threshold
        self.write_register(registers::TX_FIFO_CTRL1, TX_FIFO_THRESHOLD);

        self.write_register(registers::TX_POWER, TX_POWER_LEVEL);

        // 433.92 MHz carrier
        self.set_frequency_offset(FREQUENCY_OFFSET);
        self.write_register(registers::FREQUENCY_BAND, FREQUENCY_BAND_433);
        self.set_carrier_frequency(NOMINAL_CARRIER_433_92);

        // ook, direct asynchronous mode: tx data clock on SDO, tx data on SDI
        self.write_register(registers::MODULATION_CTRL1, 0x00);
        self.write_register(
            registers::MODULATION_CTRL2,
            registers::DTMOD_DIRECT_ASYNC | registers::MODTYP_OOK,
        );

        self.set_tx_data_rate(TX_DATA_RATE_MAX);

        // the payload is a raw waveform, not a packet: the packet handler
        // must not insert or require any structure
        self.write_register(registers::DATA_ACCESS_CTRL, 0x00);
        self.write_register(registers::HEADER_CTRL1, 0x00);
        self.write_register(registers::HEADER_CTRL2, 0x00);
        self.write_register(registers::PREAMBLE_LENGTH, 0x00);

        self.reset_fifo();

        self.state = RadioState::Configured;

        #[cfg(feature = "log")]
        log::debug!("rfm22 configured: 433.92 MHz carrier, direct async OOK, tx only");
        #[cfg(feature = "defmt-0-3")]
        defmt::debug!("rfm22 configured: 433.92 MHz carrier, direct async OOK, tx only");
    }
}
