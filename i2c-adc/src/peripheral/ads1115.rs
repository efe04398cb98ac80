//! ADS1115 16-bit delta-sigma ADC driver.
//!
//! The ADS1115 is an I2C converter with a four-input multiplexer and a
//! programmable gain amplifier. This driver runs single-shot conversions of
//! one input against ground at the ±4.096 V range and 128 samples/s.
//!
//! Datasheet: <https://www.ti.com/lit/ds/symlink/ads1115.pdf>

use crate::hw_trait::adc::{Adc, AdcChannel};
use crate::hw_trait::delay::{Delay, StdDelay};
use crate::hw_trait::i2c::I2cBus;
use crate::hw_trait::{HwError, Result};
use crate::tracing::prelude::*;

pub use protocol::DEFAULT_ADDRESS;
use protocol::{ConfigWord, SETTLE_TIME};

/// Register map, configuration bit-fields and result scaling.
///
/// Pure data and arithmetic; nothing here touches the bus.
pub mod protocol {
    use std::time::Duration;

    use crate::hw_trait::adc::AdcChannel;
    use crate::hw_trait::{HwError, Result};

    /// Default I2C address (ADDR pin tied to GND)
    pub const DEFAULT_ADDRESS: u8 = 0x48;

    /// Register pointer values
    pub mod regs {
        /// Conversion result register
        pub const CONVERSION: u8 = 0x00;
        /// Configuration register
        pub const CONFIG: u8 = 0x01;
    }

    /// Configuration register bit-fields
    pub mod config {
        /// OS: start a single conversion (write)
        pub const START_SINGLE_CONVERSION: u16 = 0x8000;

        /// MUX[14:12] field mask
        pub const MUX_MASK: u16 = 0x7000;
        /// AIN0 against GND
        pub const MUX_AIN0_GND: u16 = 0x4000;
        /// AIN1 against GND
        pub const MUX_AIN1_GND: u16 = 0x5000;
        /// AIN2 against GND
        pub const MUX_AIN2_GND: u16 = 0x6000;
        /// AIN3 against GND
        pub const MUX_AIN3_GND: u16 = 0x7000;

        /// PGA: full-scale range ±4.096 V
        pub const PGA_4_096V: u16 = 0x0200;

        /// MODE: single-shot, power down after conversion
        pub const MODE_SINGLE_SHOT: u16 = 0x0100;

        /// DR: 128 samples per second
        pub const DATA_RATE_128SPS: u16 = 0x0080;

        /// COMP_QUE: comparator disabled
        pub const COMPARATOR_QUEUE_DISABLED: u16 = 0x0003;
    }

    /// Multiplexer codes indexed by channel.
    pub const CHANNEL_MUX: [u16; 4] = [
        config::MUX_AIN0_GND,
        config::MUX_AIN1_GND,
        config::MUX_AIN2_GND,
        config::MUX_AIN3_GND,
    ];

    /// Fields common to every conversion request.
    pub const FIXED_FIELDS: u16 = config::START_SINGLE_CONVERSION
        | config::PGA_4_096V
        | config::MODE_SINGLE_SHOT
        | config::DATA_RATE_128SPS
        | config::COMPARATOR_QUEUE_DISABLED;

    /// Full-scale voltage for the PGA setting in [`FIXED_FIELDS`].
    pub const FULL_SCALE_VOLTS: f64 = 4.096;

    /// Code corresponding to [`FULL_SCALE_VOLTS`].
    pub const FULL_SCALE_CODE: f64 = 32767.0;

    /// Wait for one conversion at 128 SPS (7.8 ms) with a wide margin.
    ///
    /// Tied to [`config::DATA_RATE_128SPS`]; a different rate needs a
    /// different wait.
    pub const SETTLE_TIME: Duration = Duration::from_millis(150);

    /// Multiplexer code for a channel, if the chip has it.
    pub fn mux_for_channel(channel: AdcChannel) -> Option<u16> {
        CHANNEL_MUX.get(usize::from(channel.0)).copied()
    }

    /// Value written to the configuration register.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ConfigWord(u16);

    impl ConfigWord {
        /// Single-shot conversion of `channel` against ground.
        pub fn single_shot(channel: AdcChannel) -> Result<Self> {
            let mux = mux_for_channel(channel).ok_or(HwError::InvalidChannel(channel.0))?;
            Ok(Self(FIXED_FIELDS | mux))
        }

        pub fn bits(self) -> u16 {
            self.0
        }

        /// The MUX field alone.
        pub fn mux(self) -> u16 {
            self.0 & config::MUX_MASK
        }

        /// Frame writing this word: register pointer, then the word MSB first.
        pub fn to_frame(self) -> [u8; 3] {
            let [high, low] = self.0.to_be_bytes();
            [regs::CONFIG, high, low]
        }
    }

    /// Combine the two result bytes, MSB first, without sign extension.
    pub fn decode_raw(bytes: [u8; 2]) -> u16 {
        (u16::from(bytes[0]) << 8) | u16::from(bytes[1])
    }

    /// Scale a raw code to volts.
    ///
    /// Codes with the top bit set are not treated as negative, so 0x8000
    /// scales to just above full scale.
    pub fn raw_to_volts(raw: u16) -> f64 {
        (f64::from(raw) * FULL_SCALE_VOLTS) / FULL_SCALE_CODE
    }
}

/// ADS1115 driver
pub struct Ads1115<B: I2cBus, D: Delay = StdDelay> {
    bus: B,
    address: u8,
    delay: D,
}

impl<B: I2cBus> Ads1115<B> {
    /// Create a new ADS1115 driver with default address
    pub fn new(bus: B) -> Self {
        Self::new_with_address(bus, DEFAULT_ADDRESS)
    }

    /// Create a new ADS1115 driver with custom address
    pub fn new_with_address(bus: B, address: u8) -> Self {
        Self::with_delay(bus, address, StdDelay)
    }
}

impl<B: I2cBus, D: Delay> Ads1115<B, D> {
    /// Create a driver that waits for conversions with `delay`.
    pub fn with_delay(bus: B, address: u8, delay: D) -> Self {
        Self {
            bus,
            address,
            delay,
        }
    }

    pub fn address(&self) -> u8 {
        self.address
    }

    pub fn bus(&self) -> &B {
        &self.bus
    }

    pub fn bus_mut(&mut self) -> &mut B {
        &mut self.bus
    }

    /// Give the bus back, leaving its open state untouched.
    pub fn release(self) -> B {
        self.bus
    }

    /// Run one conversion on `channel` and return the undecoded result.
    ///
    /// The channel must already be open. An unsupported channel fails before
    /// any bus traffic. Bus errors abort the sequence and are returned as is.
    pub fn read_raw(&mut self, channel: AdcChannel) -> Result<u16> {
        let config = ConfigWord::single_shot(channel)?;

        self.bus.set_target(self.address)?;
        self.start_conversion(channel, config)?;
        self.read_conversion()
    }

    fn start_conversion(&mut self, channel: AdcChannel, config: ConfigWord) -> Result<()> {
        debug!(
            channel = %channel,
            config = %format!("{:#06x}", config.bits()),
            "Configuring ADS1115 for single-shot read"
        );

        self.bus.write(&config.to_frame())?;
        self.delay.delay(SETTLE_TIME);
        Ok(())
    }

    fn read_conversion(&mut self) -> Result<u16> {
        self.bus.write(&[protocol::regs::CONVERSION])?;

        let data = self.bus.read(2)?;
        let raw = match data.as_slice() {
            &[high, low] => protocol::decode_raw([high, low]),
            other => {
                return Err(HwError::UnexpectedLength {
                    address: self.address,
                    expected: 2,
                    received: other.len(),
                })
            }
        };

        trace!(raw = %format!("{:#06x}", raw), "ADS1115 conversion result");
        Ok(raw)
    }
}

impl<B: I2cBus, D: Delay> Adc for Ads1115<B, D> {
    fn voltage(&mut self, channel: AdcChannel) -> Result<f64> {
        let raw = self.read_raw(channel)?;
        Ok(protocol::raw_to_volts(raw))
    }
}
