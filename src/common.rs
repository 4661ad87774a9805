use crate::Error;

/// Port topology of an expander.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PortInfo {
    /// Number of ports, at least 1.
    pub count: u8,
    /// Bits per port.
    pub width: u8,
}

/// Raw contents of the configuration registers of one port.
///
/// `None` means "leave this register untouched" when writing and "chip has no such register"
/// when reading.  It never stands for zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PortConfigRaw {
    /// Direction bits, usually 1 = input and 0 = output (check the datasheet).
    pub direction_reg: Option<u8>,
    /// Input polarity inversion bits.
    pub input_invert_reg: Option<u8>,
    /// Pull resistor enable bits.
    pub pull_reg: Option<u8>,
}

impl PortConfigRaw {
    /// Configuration which only touches the direction register.
    pub const fn direction(value: u8) -> Self {
        Self {
            direction_reg: Some(value),
            input_invert_reg: None,
            pull_reg: None,
        }
    }
}

/// Register addresses holding the configuration of one port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PortConfigAddr {
    pub direction_reg: Option<u8>,
    pub input_invert_reg: Option<u8>,
    pub pull_reg: Option<u8>,
}

/// Configuration of a single pin.
///
/// Reserved for chips with per-pin control; none of the drivers in this crate accept it yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PinConfig {
    pub digital_input: bool,
    pub pull_up: bool,
    pub pull_down: bool,
    pub int_req_enable: bool,
}

/// Port count, port width and the currently active port of an expander.
///
/// Only drivers in this crate create and move the cursor, so `active < info.count` always holds.
#[derive(Debug, PartialEq, Eq)]
pub struct PortCursor {
    info: PortInfo,
    active: u8,
}

impl PortCursor {
    pub(crate) const fn new(count: u8, width: u8) -> Self {
        Self {
            info: PortInfo { count, width },
            active: 0,
        }
    }

    pub(crate) fn info(&self) -> PortInfo {
        self.info
    }

    pub(crate) fn active(&self) -> u8 {
        self.active
    }

    pub(crate) fn check_port<E>(&self, n_port: u8) -> Result<u8, Error<E>> {
        if n_port < self.info.count {
            Ok(n_port)
        } else {
            Err(Error::InvalidPort(n_port))
        }
    }

    pub(crate) fn check_pin<E>(&self, n_pin: u8) -> Result<u8, Error<E>> {
        if n_pin < self.info.width {
            Ok(n_pin)
        } else {
            Err(Error::InvalidPin(n_pin))
        }
    }

    /// Make `n_port` the active port.  The cursor is left alone on error.
    pub(crate) fn select<E>(&mut self, n_port: u8) -> Result<(), Error<E>> {
        self.active = self.check_port::<E>(n_port)?;
        Ok(())
    }
}

/// Common interface of all I/O expanders.
///
/// All value and configuration methods work on the *active port*.  Select it with
/// [`set_active_port()`](IoExpander::set_active_port) before touching another port.  The active
/// port is plain mutable state of the driver: sharing a driver between execution contexts needs
/// the select-then-operate sequence to run under one lock, see
/// [`SharedExpander`](crate::SharedExpander).
///
/// The trait is sealed.  The port bookkeeping stays inside the driver:
///
/// ```compile_fail
/// # let i2c = embedded_hal_mock::eh1::i2c::Mock::new(&[]);
/// use io_expander::IoExpander;
///
/// let mut pca = io_expander::Pca9555::new(i2c, 0x20).unwrap();
/// let _ = pca.cursor();
/// ```
pub trait IoExpander: sealed::Sealed {
    /// Error type of the underlying bus.
    type BusError;

    /// Read the input level register of the active port.
    fn port_value(&mut self) -> Result<u8, Error<Self::BusError>>;

    /// Write the output register of the active port.
    fn set_port_value(&mut self, value: u8) -> Result<(), Error<Self::BusError>>;

    /// Read the configuration registers of the active port.
    ///
    /// Registers the chip does not have are returned as `None`.
    fn port_config_raw(&mut self) -> Result<PortConfigRaw, Error<Self::BusError>>;

    /// Write the configuration registers of the active port.
    ///
    /// Fields set to `None` are not written.
    fn set_port_config_raw(&mut self, config: PortConfigRaw)
        -> Result<(), Error<Self::BusError>>;

    fn set_active_port(&mut self, n_port: u8) -> Result<(), Error<Self::BusError>> {
        self.select_port(n_port)
    }

    fn active_port(&self) -> u8 {
        self.cursor().active()
    }

    fn port_count(&self) -> u8 {
        self.cursor().info().count
    }

    fn port_info(&self) -> PortInfo {
        self.cursor().info()
    }

    /// Endless iterator reading the active port over and over.
    fn port_values(&mut self) -> PortValues<'_, Self>
    where
        Self: Sized,
    {
        PortValues { expander: self }
    }

    fn pin_config(&mut self, n_pin: u8) -> Result<PinConfig, Error<Self::BusError>> {
        self.cursor().check_pin::<Self::BusError>(n_pin)?;
        Err(Error::NotSupported)
    }

    fn set_pin_config(
        &mut self,
        n_pin: u8,
        _config: PinConfig,
    ) -> Result<(), Error<Self::BusError>> {
        self.cursor().check_pin::<Self::BusError>(n_pin)?;
        Err(Error::NotSupported)
    }

    fn pin_value(&mut self, n_pin: u8) -> Result<bool, Error<Self::BusError>> {
        self.cursor().check_pin::<Self::BusError>(n_pin)?;
        Err(Error::NotSupported)
    }

    fn set_pin_value(&mut self, n_pin: u8, _value: bool) -> Result<(), Error<Self::BusError>> {
        self.cursor().check_pin::<Self::BusError>(n_pin)?;
        Err(Error::NotSupported)
    }
}

pub(crate) mod sealed {
    use super::PortCursor;
    use crate::Error;

    /// Port bookkeeping of a driver.  The cursor is only ever moved through `select_port`.
    pub trait Sealed {
        fn cursor(&self) -> &PortCursor;
        fn select_port<E>(&mut self, n_port: u8) -> Result<(), Error<E>>;
    }
}

/// Iterator returned by [`IoExpander::port_values()`].
pub struct PortValues<'a, X> {
    expander: &'a mut X,
}

impl<X: IoExpander> Iterator for PortValues<'_, X> {
    type Item = Result<u8, Error<X::BusError>>;

    fn next(&mut self) -> Option<Self::Item> {
        Some(self.expander.port_value())
    }
}

#[cfg(test)]
mod tests {
    use super::{PortConfigRaw, PortCursor, PortInfo};
    use crate::Error;

    #[test]
    fn cursor_selects_valid_ports() {
        let mut cursor = PortCursor::new(2, 8);
        for n_port in 0..2 {
            cursor.select::<()>(n_port).unwrap();
            assert_eq!(cursor.active(), n_port);
        }
    }

    #[test]
    fn cursor_rejects_invalid_ports() {
        let mut cursor = PortCursor::new(2, 8);
        cursor.select::<()>(1).unwrap();
        for n_port in [2, 3, 0xff] {
            assert_eq!(cursor.select::<()>(n_port), Err(Error::InvalidPort(n_port)));
            assert_eq!(cursor.active(), 1);
        }
    }

    #[test]
    fn cursor_checks_pins() {
        let cursor = PortCursor::new(1, 8);
        assert_eq!(cursor.check_pin::<()>(7), Ok(7));
        assert_eq!(cursor.check_pin::<()>(8), Err(Error::InvalidPin(8)));
        assert_eq!(cursor.info(), PortInfo { count: 1, width: 8 });
    }

    #[test]
    fn direction_only_config() {
        let cfg = PortConfigRaw::direction(0x0f);
        assert_eq!(cfg.direction_reg, Some(0x0f));
        assert_eq!(cfg.input_invert_reg, None);
        assert_eq!(cfg.pull_reg, None);
    }
}
