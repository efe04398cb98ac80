//! Drivers for chips attached to an I2C bus.

pub mod ads1115;

pub use ads1115::Ads1115;
