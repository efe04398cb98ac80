//! ADC hardware abstraction trait.

use std::fmt;

use super::Result;

/// ADC channel identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AdcChannel(pub u8);

impl fmt::Display for AdcChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AIN{}", self.0)
    }
}

impl From<u8> for AdcChannel {
    fn from(index: u8) -> Self {
        AdcChannel(index)
    }
}

/// ADC abstraction for reading analog values
pub trait Adc {
    /// Read the voltage present on a channel, in volts.
    fn voltage(&mut self, channel: AdcChannel) -> Result<f64>;

    /// Read the voltage present on a channel, in millivolts.
    fn millivolts(&mut self, channel: AdcChannel) -> Result<f64> {
        Ok(self.voltage(channel)? * 1000.0)
    }
}
