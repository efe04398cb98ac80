//! Userspace I2C bus access for Linux and an ADS1115 ADC driver.
//!
//! Layers, bottom up:
//!
//! - [`transport`]: the bus channel ([`transport::I2cDev`]) over an i2c-dev
//!   node, with system calls behind [`transport::DeviceSys`].
//! - [`hw_trait`]: bus, ADC and delay traits plus the shared [`hw_trait::HwError`].
//! - [`peripheral`]: chip drivers composed from those traits.
//!
//! ```no_run
//! use i2c_adc::hw_trait::{Adc, AdcChannel, I2cBus};
//! use i2c_adc::peripheral::Ads1115;
//! use i2c_adc::transport::I2cDev;
//!
//! let mut bus = I2cDev::new("/dev/i2c-1");
//! bus.open()?;
//! let mut adc = Ads1115::new(bus);
//! let volts = adc.voltage(AdcChannel(1))?;
//! println!("AIN1 = {volts:.4} V");
//! # Ok::<(), i2c_adc::hw_trait::HwError>(())
//! ```

pub mod config;
pub mod error;
pub mod hw_trait;
pub mod peripheral;
pub mod tracing;
pub mod transport;
