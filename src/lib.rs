//! Port-oriented access to I2C I/O expanders.
//!
//! Every supported chip implements [`IoExpander`]: a port is selected with
//! [`IoExpander::set_active_port`] and all following value/configuration
//! calls target that port.
//!
//! ```no_run
//! # let i2c = embedded_hal_mock::eh1::i2c::Mock::new(&[]);
//! use io_expander::{IoExpander, PortConfigRaw};
//!
//! let mut exp = io_expander::Pca9555::new(i2c, 0x20).unwrap();
//! exp.set_active_port(0).unwrap();
//! exp.set_port_config_raw(PortConfigRaw::direction(0x00)).unwrap();
//! exp.set_port_value(0xff).unwrap();
//! ```
#![cfg_attr(not(any(test, feature = "std")), no_std)]

mod bus;
mod common;
pub mod dev;
mod error;
mod mutex;

pub use bus::{ByteOrder, Device, I2cBus};
pub use common::{IoExpander, PinConfig, PortConfigAddr, PortConfigRaw, PortInfo, PortValues};
pub use error::Error;
pub use mutex::{ExpanderMutex, SharedExpander};

pub use dev::any::AnyExpander;
pub use dev::mcp23x17::Mcp23x17;
pub use dev::pcf8574::Pcf8574;
pub use dev::xca9555::{Pca9555, Tca9555, Xca9555};
