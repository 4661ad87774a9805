//! Support for the `PCA9555` and `TCA9555` "16-bit I2C-bus and SMBus I/O port with interrupt"
//!
//! Both chips share the same register map: two eight-bit ports, each with an input, output,
//! polarity inversion and configuration register.  There are no pull resistors.  The chip
//! raises its interrupt line on any change of an input.
use crate::bus::{ByteOrder, Device};
use crate::common::sealed::Sealed;
use crate::common::{IoExpander, PortConfigAddr, PortConfigRaw, PortCursor};
use crate::Error;

/// `PCA9555` "16-bit I2C-bus and SMBus I/O port with interrupt"
pub type Pca9555<I2C> = Xca9555<I2C>;
/// `TCA9555` "Low-voltage 16-bit I2C and SMBus I/O expander"
pub type Tca9555<I2C> = Xca9555<I2C>;

const ADDRESSES: core::ops::Range<u8> = 0x20..0x28;

#[allow(dead_code)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Regs {
    InputPort0 = 0x00,
    InputPort1 = 0x01,
    OutputPort0 = 0x02,
    OutputPort1 = 0x03,
    PolarityInversion0 = 0x04,
    PolarityInversion1 = 0x05,
    Configuration0 = 0x06,
    Configuration1 = 0x07,
}

impl From<Regs> for u8 {
    fn from(r: Regs) -> u8 {
        r as u8
    }
}

/// Whether a port register is accessed for reading or writing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Read,
    Write,
}

pub struct Xca9555<I2C> {
    dev: Device<I2C>,
    cursor: PortCursor,
}

impl<I2C> Xca9555<I2C> {
    /// Create a driver for the chip at `address` (`0x20..=0x27`).
    pub fn new(i2c: I2C, address: u8) -> Result<Self, Error<I2C::Error>>
    where
        I2C: crate::I2cBus,
    {
        if !ADDRESSES.contains(&address) {
            return Err(Error::InvalidAddress(address));
        }
        Ok(Self::at(i2c, address))
    }

    /// Create a driver from the levels of the A2..A0 address pins.
    pub fn with_address_pins(i2c: I2C, a0: bool, a1: bool, a2: bool) -> Self {
        let addr = 0x20 | ((a2 as u8) << 2) | ((a1 as u8) << 1) | (a0 as u8);
        Self::at(i2c, addr)
    }

    fn at(i2c: I2C, address: u8) -> Self {
        Self {
            dev: Device::new(i2c, address, ByteOrder::Little),
            cursor: PortCursor::new(2, 8),
        }
    }

    pub fn address(&self) -> u8 {
        self.dev.address()
    }

    /// Give back the bus.
    pub fn destroy(self) -> I2C {
        self.dev.release()
    }
}

impl<I2C: crate::I2cBus> Xca9555<I2C> {
    /// Address of the input (read) or output (write) register of `n_port`.
    pub fn io_port_addr(&self, n_port: u8, access: Access) -> Result<u8, Error<I2C::Error>> {
        let n_port = self.cursor.check_port::<I2C::Error>(n_port)?;
        Ok(match access {
            Access::Read => u8::from(Regs::InputPort0) + n_port,
            Access::Write => u8::from(Regs::OutputPort0) + n_port,
        })
    }

    /// Addresses of the configuration registers of `n_port`.
    pub fn config_addr(&self, n_port: u8) -> Result<PortConfigAddr, Error<I2C::Error>> {
        let n_port = self.cursor.check_port::<I2C::Error>(n_port)?;
        Ok(PortConfigAddr {
            direction_reg: Some(u8::from(Regs::Configuration0) + n_port),
            input_invert_reg: Some(u8::from(Regs::PolarityInversion0) + n_port),
            pull_reg: None,
        })
    }

    /// Read both input ports in one transaction.  Port 1 ends up in the upper byte.
    pub fn inputs(&mut self) -> Result<u16, Error<I2C::Error>> {
        self.dev.read_reg_wide(Regs::InputPort0)
    }

    /// Write both output ports in one transaction.  The upper byte goes to port 1.
    pub fn set_outputs(&mut self, value: u16) -> Result<(), Error<I2C::Error>> {
        self.dev.write_reg_wide(Regs::OutputPort0, value)
    }
}

impl<I2C> Sealed for Xca9555<I2C> {
    fn cursor(&self) -> &PortCursor {
        &self.cursor
    }

    fn select_port<E>(&mut self, n_port: u8) -> Result<(), Error<E>> {
        self.cursor.select(n_port)
    }
}

impl<I2C: crate::I2cBus> IoExpander for Xca9555<I2C> {
    type BusError = I2C::Error;

    fn port_value(&mut self) -> Result<u8, Error<Self::BusError>> {
        let addr = self.io_port_addr(self.cursor.active(), Access::Read)?;
        self.dev.read_reg(addr)
    }

    fn set_port_value(&mut self, value: u8) -> Result<(), Error<Self::BusError>> {
        let addr = self.io_port_addr(self.cursor.active(), Access::Write)?;
        self.dev.write_reg(addr, value)
    }

    fn port_config_raw(&mut self) -> Result<PortConfigRaw, Error<Self::BusError>> {
        let addr = self.config_addr(self.cursor.active())?;
        let mut cfg = PortConfigRaw::default();
        if let Some(reg) = addr.direction_reg {
            cfg.direction_reg = Some(self.dev.read_reg(reg)?);
        }
        if let Some(reg) = addr.input_invert_reg {
            cfg.input_invert_reg = Some(self.dev.read_reg(reg)?);
        }
        Ok(cfg)
    }

    fn set_port_config_raw(
        &mut self,
        config: PortConfigRaw,
    ) -> Result<(), Error<Self::BusError>> {
        let addr = self.config_addr(self.cursor.active())?;
        if let (Some(reg), Some(value)) = (addr.direction_reg, config.direction_reg) {
            self.dev.write_reg(reg, value)?;
        }
        if let (Some(reg), Some(value)) = (addr.input_invert_reg, config.input_invert_reg) {
            self.dev.write_reg(reg, value)?;
        }
        Ok(())
    }
}
