//! Support for the `PCF8574` & `PCF8574A` "Remote 8-bit I/O expander for I2C-bus with interrupt"
//!
//! The chip has a single register and no register pointer: a plain I2C write sets the eight
//! lines, a plain read returns their levels.  The lines are quasi-bidirectional.  Writing a 1
//! makes a line weakly high through a current source, so it can be used as an input pulled up
//! to VDD.  Writing a 0 pulls the line hard to ground.  There is no direction, polarity or
//! pull register.
use crate::bus::{ByteOrder, Device};
use crate::common::sealed::Sealed;
use crate::common::{IoExpander, PortConfigRaw, PortCursor};
use crate::Error;

/// Which address block the chip answers on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Variant {
    /// `PCF8574`, addresses `0x20..=0x27`
    Pcf8574,
    /// `PCF8574A`, addresses `0x38..=0x3F`
    Pcf8574a,
}

impl Variant {
    fn base_address(self) -> u8 {
        match self {
            Variant::Pcf8574 => 0x20,
            Variant::Pcf8574a => 0x38,
        }
    }

    /// The variant `address` has to belong to: below `0x38` it can only be a `PCF8574`, from
    /// `0x38` on only a `PCF8574A`.  Whether it is in the block at all is up to the caller.
    fn for_address(address: u8) -> Self {
        if address < Variant::Pcf8574a.base_address() {
            Variant::Pcf8574
        } else {
            Variant::Pcf8574a
        }
    }
}

/// `PCF8574`/`PCF8574A` "Remote 8-bit I/O expander for I2C-bus with interrupt"
pub struct Pcf8574<I2C> {
    dev: Device<I2C>,
    cursor: PortCursor,
    variant: Variant,
}

impl<I2C: crate::I2cBus> Pcf8574<I2C> {
    /// Create a driver for the chip at `address`.
    ///
    /// Addresses below `0x38` must be in `0x20..=0x27` (`PCF8574`), all others in
    /// `0x38..=0x3F` (`PCF8574A`).  All lines are set high, i.e. usable as inputs.
    pub fn new(i2c: I2C, address: u8) -> Result<Self, Error<I2C::Error>> {
        let variant = Variant::for_address(address);
        let base = variant.base_address();
        if !(base..base + 8).contains(&address) {
            return Err(Error::InvalidAddress(address));
        }
        let mut this = Self {
            dev: Device::new(i2c, address, ByteOrder::Big),
            cursor: PortCursor::new(1, 8),
            variant,
        };
        this.set_port_value(0xff)?;
        Ok(this)
    }

    pub fn new_pcf8574(i2c: I2C, a0: bool, a1: bool, a2: bool) -> Result<Self, Error<I2C::Error>> {
        Self::with_address_pins(i2c, Variant::Pcf8574, a0, a1, a2)
    }

    pub fn new_pcf8574a(
        i2c: I2C,
        a0: bool,
        a1: bool,
        a2: bool,
    ) -> Result<Self, Error<I2C::Error>> {
        Self::with_address_pins(i2c, Variant::Pcf8574a, a0, a1, a2)
    }

    fn with_address_pins(
        i2c: I2C,
        variant: Variant,
        a0: bool,
        a1: bool,
        a2: bool,
    ) -> Result<Self, Error<I2C::Error>> {
        let addr =
            variant.base_address() | ((a2 as u8) << 2) | ((a1 as u8) << 1) | (a0 as u8);
        Self::new(i2c, addr)
    }

    pub fn address(&self) -> u8 {
        self.dev.address()
    }

    pub fn variant(&self) -> Variant {
        self.variant
    }

    /// Give back the bus.
    pub fn destroy(self) -> I2C {
        self.dev.release()
    }
}

impl<I2C> Sealed for Pcf8574<I2C> {
    fn cursor(&self) -> &PortCursor {
        &self.cursor
    }

    fn select_port<E>(&mut self, n_port: u8) -> Result<(), Error<E>> {
        self.cursor.select(n_port)
    }
}

impl<I2C: crate::I2cBus> IoExpander for Pcf8574<I2C> {
    type BusError = I2C::Error;

    fn port_value(&mut self) -> Result<u8, Error<Self::BusError>> {
        self.dev.read_direct()
    }

    fn set_port_value(&mut self, value: u8) -> Result<(), Error<Self::BusError>> {
        self.dev.write_direct(value)
    }

    /// The line levels, reported as `direction_reg`.
    fn port_config_raw(&mut self) -> Result<PortConfigRaw, Error<Self::BusError>> {
        Ok(PortConfigRaw::direction(self.port_value()?))
    }

    /// Writes `direction_reg` to the lines; 1 makes a line a pulled-up input, 0 drives it low.
    fn set_port_config_raw(
        &mut self,
        config: PortConfigRaw,
    ) -> Result<(), Error<Self::BusError>> {
        match config.direction_reg {
            Some(value) => self.set_port_value(value),
            None => Ok(()),
        }
    }
}
