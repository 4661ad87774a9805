use embedded_hal::i2c as hal_i2c;

use crate::Error;

/// Blanket trait for types implementing `i2c::I2c`
///
/// Pass `&mut bus` (or a bus-sharing wrapper) to let several drivers use the same bus.
pub trait I2cBus: hal_i2c::I2c {}

impl<T: hal_i2c::I2c> I2cBus for T {}

/// Order of the bytes of a two-byte register access on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ByteOrder {
    /// Most significant byte first.
    Big,
    /// Least significant byte first.
    Little,
}

/// A single device on an I2C bus.
///
/// Every register access is one bus transaction.  The register pointer is written first, followed
/// by the data (writes) or a repeated-start read (reads).
pub struct Device<I2C> {
    i2c: I2C,
    address: u8,
    byte_order: ByteOrder,
}

impl<I2C> Device<I2C> {
    pub fn new(i2c: I2C, address: u8, byte_order: ByteOrder) -> Self {
        Self {
            i2c,
            address,
            byte_order,
        }
    }

    pub fn address(&self) -> u8 {
        self.address
    }

    /// Give back the bus.
    pub fn release(self) -> I2C {
        self.i2c
    }
}

impl<I2C: I2cBus> Device<I2C> {
    pub fn read_reg<R: Into<u8>>(&mut self, reg: R) -> Result<u8, Error<I2C::Error>> {
        let mut buf = [0x00];
        self.i2c
            .write_read(self.address, &[reg.into()], &mut buf)
            .map_err(Error::Bus)?;
        Ok(buf[0])
    }

    pub fn write_reg<R: Into<u8>>(&mut self, reg: R, value: u8) -> Result<(), Error<I2C::Error>> {
        self.i2c
            .write(self.address, &[reg.into(), value])
            .map_err(Error::Bus)
    }

    /// Read two consecutive bytes starting at `reg`.
    pub fn read_reg_wide<R: Into<u8>>(&mut self, reg: R) -> Result<u16, Error<I2C::Error>> {
        let mut buf = [0x00; 2];
        self.i2c
            .write_read(self.address, &[reg.into()], &mut buf)
            .map_err(Error::Bus)?;
        Ok(match self.byte_order {
            ByteOrder::Big => u16::from_be_bytes(buf),
            ByteOrder::Little => u16::from_le_bytes(buf),
        })
    }

    /// Write two consecutive bytes starting at `reg`.
    pub fn write_reg_wide<R: Into<u8>>(
        &mut self,
        reg: R,
        value: u16,
    ) -> Result<(), Error<I2C::Error>> {
        let [b0, b1] = match self.byte_order {
            ByteOrder::Big => value.to_be_bytes(),
            ByteOrder::Little => value.to_le_bytes(),
        };
        self.i2c
            .write(self.address, &[reg.into(), b0, b1])
            .map_err(Error::Bus)
    }

    /// Read one byte without addressing a register first.
    pub fn read_direct(&mut self) -> Result<u8, Error<I2C::Error>> {
        let mut buf = [0x00];
        self.i2c.read(self.address, &mut buf).map_err(Error::Bus)?;
        Ok(buf[0])
    }

    /// Write one byte without addressing a register first.
    pub fn write_direct(&mut self, value: u8) -> Result<(), Error<I2C::Error>> {
        self.i2c.write(self.address, &[value]).map_err(Error::Bus)
    }
}

#[cfg(test)]
mod tests {
    use super::{ByteOrder, Device};
    use embedded_hal::i2c::ErrorKind;
    use embedded_hal_mock::eh1::i2c as mock_i2c;

    #[test]
    fn wide_access_honours_byte_order() {
        let expectations = [
            mock_i2c::Transaction::write_read(0x20, vec![0x00], vec![0x12, 0x34]),
            mock_i2c::Transaction::write(0x20, vec![0x02, 0x12, 0x34]),
            mock_i2c::Transaction::write_read(0x21, vec![0x00], vec![0x12, 0x34]),
            mock_i2c::Transaction::write(0x21, vec![0x02, 0x34, 0x12]),
        ];
        let mut bus = mock_i2c::Mock::new(&expectations);

        let mut big = Device::new(bus.clone(), 0x20, ByteOrder::Big);
        assert_eq!(big.read_reg_wide(0x00).unwrap(), 0x1234);
        big.write_reg_wide(0x02, 0x1234).unwrap();

        let mut little = Device::new(bus.clone(), 0x21, ByteOrder::Little);
        assert_eq!(little.read_reg_wide(0x00).unwrap(), 0x3412);
        little.write_reg_wide(0x02, 0x1234).unwrap();

        bus.done();
    }

    #[test]
    fn bus_errors_are_passed_through() {
        let expectations = [mock_i2c::Transaction::read(0x20, vec![0x00])
            .with_error(ErrorKind::Other)];
        let mut bus = mock_i2c::Mock::new(&expectations);

        let mut dev = Device::new(bus.clone(), 0x20, ByteOrder::Big);
        assert_eq!(dev.read_direct(), Err(crate::Error::Bus(ErrorKind::Other)));

        bus.done();
    }
}
