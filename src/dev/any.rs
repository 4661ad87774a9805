//! Runtime selection between the supported chips.
use crate::common::sealed::Sealed;
use crate::common::{IoExpander, PortConfigRaw, PortCursor};
use crate::dev::{mcp23x17::Mcp23x17, pcf8574::Pcf8574, xca9555::Xca9555};
use crate::Error;

/// Any of the supported expanders, for when the chip is only known at runtime.
pub enum AnyExpander<I2C> {
    Xca9555(Xca9555<I2C>),
    Mcp23x17(Mcp23x17<I2C>),
    Pcf8574(Pcf8574<I2C>),
}

macro_rules! dispatch {
    ($self:expr, $exp:ident => $body:expr) => {
        match $self {
            AnyExpander::Xca9555($exp) => $body,
            AnyExpander::Mcp23x17($exp) => $body,
            AnyExpander::Pcf8574($exp) => $body,
        }
    };
}

impl<I2C: crate::I2cBus> AnyExpander<I2C> {
    /// Give back the bus.
    pub fn destroy(self) -> I2C {
        dispatch!(self, exp => exp.destroy())
    }
}

impl<I2C> From<Xca9555<I2C>> for AnyExpander<I2C> {
    fn from(exp: Xca9555<I2C>) -> Self {
        AnyExpander::Xca9555(exp)
    }
}

impl<I2C> From<Mcp23x17<I2C>> for AnyExpander<I2C> {
    fn from(exp: Mcp23x17<I2C>) -> Self {
        AnyExpander::Mcp23x17(exp)
    }
}

impl<I2C> From<Pcf8574<I2C>> for AnyExpander<I2C> {
    fn from(exp: Pcf8574<I2C>) -> Self {
        AnyExpander::Pcf8574(exp)
    }
}

impl<I2C> Sealed for AnyExpander<I2C> {
    fn cursor(&self) -> &PortCursor {
        dispatch!(self, exp => exp.cursor())
    }

    fn select_port<E>(&mut self, n_port: u8) -> Result<(), Error<E>> {
        dispatch!(self, exp => exp.select_port(n_port))
    }
}

impl<I2C: crate::I2cBus> IoExpander for AnyExpander<I2C> {
    type BusError = I2C::Error;

    fn port_value(&mut self) -> Result<u8, Error<Self::BusError>> {
        dispatch!(self, exp => exp.port_value())
    }

    fn set_port_value(&mut self, value: u8) -> Result<(), Error<Self::BusError>> {
        dispatch!(self, exp => exp.set_port_value(value))
    }

    fn port_config_raw(&mut self) -> Result<PortConfigRaw, Error<Self::BusError>> {
        dispatch!(self, exp => exp.port_config_raw())
    }

    fn set_port_config_raw(
        &mut self,
        config: PortConfigRaw,
    ) -> Result<(), Error<Self::BusError>> {
        dispatch!(self, exp => exp.set_port_config_raw(config))
    }
}

#[cfg(test)]
mod tests {
    use super::AnyExpander;
    use crate::{IoExpander, PortInfo};
    use embedded_hal_mock::eh1::i2c as mock_i2c;

    #[test]
    fn delegates_to_the_chip() {
        let expectations = [
            mock_i2c::Transaction::write(0x20, vec![0xff]),
            mock_i2c::Transaction::read(0x20, vec![0x0f]),
            mock_i2c::Transaction::write_read(0x24, vec![0x01], vec![0xf0]),
        ];
        let mut bus = mock_i2c::Mock::new(&expectations);

        let mut expanders: [AnyExpander<_>; 2] = [
            crate::Pcf8574::new(bus.clone(), 0x20).unwrap().into(),
            crate::Pca9555::new(bus.clone(), 0x24).unwrap().into(),
        ];
        assert_eq!(expanders[0].port_info(), PortInfo { count: 1, width: 8 });
        assert_eq!(expanders[1].port_info(), PortInfo { count: 2, width: 8 });

        assert_eq!(expanders[0].port_value().unwrap(), 0x0f);
        expanders[1].set_active_port(1).unwrap();
        assert_eq!(expanders[1].active_port(), 1);
        assert_eq!(expanders[1].port_value().unwrap(), 0xf0);

        bus.done();
    }

    #[test]
    fn delegates_to_the_mcp23x17() {
        let mut expectations = Vec::new();
        // layout detection on a chip fresh out of reset, then IOCON
        for reg in [0x0a, 0x0b] {
            expectations.extend([
                mock_i2c::Transaction::write_read(0x21, vec![reg], vec![0x00]),
                mock_i2c::Transaction::write(0x21, vec![reg, 0x03]),
                mock_i2c::Transaction::write_read(0x21, vec![reg], vec![0x02]),
                mock_i2c::Transaction::write(0x21, vec![reg, 0x00]),
            ]);
        }
        expectations.extend([
            mock_i2c::Transaction::write(0x21, vec![0x0a, 0xa0]),
            // GPIOB, then IODIR/IPOL/GPPU of port B
            mock_i2c::Transaction::write(0x21, vec![0x19, 0x81]),
            mock_i2c::Transaction::write_read(0x21, vec![0x10], vec![0x0f]),
            mock_i2c::Transaction::write_read(0x21, vec![0x11], vec![0x00]),
            mock_i2c::Transaction::write_read(0x21, vec![0x16], vec![0x0f]),
        ]);
        let bus = mock_i2c::Mock::new(&expectations);

        let mut exp: AnyExpander<_> = crate::Mcp23x17::new(bus, 0x21).unwrap().into();
        assert_eq!(exp.port_info(), PortInfo { count: 2, width: 8 });

        exp.set_active_port(1).unwrap();
        exp.set_port_value(0x81).unwrap();
        assert_eq!(
            exp.port_config_raw().unwrap(),
            crate::PortConfigRaw {
                direction_reg: Some(0x0f),
                input_invert_reg: Some(0x00),
                pull_reg: Some(0x0f),
            }
        );
        assert_eq!(exp.set_active_port(2), Err(crate::Error::InvalidPort(2)));
        assert_eq!(exp.active_port(), 1);

        let mut bus = exp.destroy();
        bus.done();
    }
}
