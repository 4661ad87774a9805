//! Support for the `MCP23017` "16-Bit I/O Expander with Serial Interface"
//!
//! Datasheet: https://ww1.microchip.com/downloads/en/devicedoc/20001952c.pdf
//!
//! The MCP23x17 offers two eight-bit GPIO ports (A and B).  It has three
//! address pins, so eight devices can coexist on an I2C bus.
//!
//! The register map has two layouts, selected by the `IOCON.BANK` bit:
//!
//! - `BANK = 0` ([`AddressingMode::Paired`]): the A and B registers of each kind sit next to
//!   each other, register `i` lives at `2i` (port A) and `2i + 1` (port B).  This is the reset
//!   state.
//! - `BANK = 1` ([`AddressingMode::Split`]): all port A registers come first, register `i` lives
//!   at `i` (port A) and `i + 0x10` (port B).
//!
//! The driver finds out which layout the chip is in when it is created and then switches it to
//! the split layout with sequential addressing turned off.  If the chip is reset behind the
//! driver's back, the cached layout is stale and register accesses go to the wrong addresses.
use crate::bus::{ByteOrder, Device};
use crate::common::sealed::Sealed;
use crate::common::{IoExpander, PortConfigRaw, PortCursor};
use crate::Error;

const ADDRESSES: core::ops::Range<u8> = 0x20..0x28;

/// Written into the low bits of IOCON candidates while detecting the layout.
const IOCON_PROBE: u8 = 0b0000_0011;
/// IOCON bit 0 is unimplemented and always reads as 0.
const IOCON_UNIMPLEMENTED: u8 = 0b0000_0001;

/// Logical registers of the MCP23x17, each present once per port.
///
/// For all registers, the reset value is 0x00, except for IODIR which is 0xFF (making all pins
/// inputs) at reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Register {
    /// IODIR: input/output direction: 0=output; 1=input
    Iodir = 0,
    /// IPOL: input polarity: 0=register values match input pins; 1=opposite
    Ipol = 1,
    /// GPINTEN: interrupt-on-change: 0=disable; 1=enable
    Gpinten = 2,
    /// DEFVAL: default values for interrupt-on-change
    Defval = 3,
    /// INTCON: interrupt-on-change config: 0=compare to previous pin value;
    ///   1=compare to corresponding bit in DEFVAL
    Intcon = 4,
    /// IOCON: configuration register, shared by both ports, see [`IoCon`]
    Iocon = 5,
    /// GPPU: GPIO pull-ups: enables weak internal pull-ups on each pin (when configured
    ///   as an input)
    Gppu = 6,
    /// INTF: interrupt flags: 0=no interrupt pending; 1=corresponding pin caused interrupt
    Intf = 7,
    /// INTCAP: interrupt captured value: reflects value of each pin at the time that they
    ///   caused an interrupt
    Intcap = 8,
    /// GPIO: reflects logic level on pins
    Gpio = 9,
    /// OLAT: output latches: sets state for pins configured as outputs
    Olat = 10,
}

impl Register {
    pub const COUNT: u8 = 11;
}

impl TryFrom<u8> for Register {
    type Error = u8;

    fn try_from(index: u8) -> Result<Self, u8> {
        Ok(match index {
            0 => Register::Iodir,
            1 => Register::Ipol,
            2 => Register::Gpinten,
            3 => Register::Defval,
            4 => Register::Intcon,
            5 => Register::Iocon,
            6 => Register::Gppu,
            7 => Register::Intf,
            8 => Register::Intcap,
            9 => Register::Gpio,
            10 => Register::Olat,
            _ => return Err(index),
        })
    }
}

/// Register layout of the chip, mirrors `IOCON.BANK`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AddressingMode {
    /// `BANK = 0`: port A and B registers interleaved.
    Paired,
    /// `BANK = 1`: port A and B registers in two separate banks.
    Split,
}

impl AddressingMode {
    /// Addresses of `reg` for port A and port B in this layout.
    pub fn resolve(self, reg: Register) -> (u8, u8) {
        let index = reg as u8;
        match self {
            AddressingMode::Paired => (index << 1, (index << 1) + 1),
            AddressingMode::Split => (index, index + 0x10),
        }
    }
}

/// Contents of the IOCON configuration register.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct IoCon {
    /// Bit 7, BANK: register layout
    pub bank: AddressingMode,
    /// Bit 6, MIRROR: if enabled, INTA and INTB are logically ORed; an interrupt on either port
    /// will cause both pins to activate
    pub mirror: bool,
    /// Bit 5, SEQOP: if set, the address pointer does *not* increment after an access
    pub seqop: bool,
    /// Bit 4, DISSLW: disables slew rate control on SDA
    pub disslw: bool,
    /// Bit 3, HAEN: no effect on MCP23017
    pub haen: bool,
    /// Bit 2, ODR: interrupt pins are 0=active-driver outputs (INTPOL sets polarity)
    /// or 1=open-drain outputs (overrides INTPOL)
    pub odr: bool,
    /// Bit 1, INTPOL: interrupt pin is 0=active-low or 1=active-high
    pub intpol: bool,
}

impl IoCon {
    /// Layout the driver runs the chip in: split banks, independent interrupt pins and no
    /// address pointer increment.
    pub const fn split() -> Self {
        Self {
            bank: AddressingMode::Split,
            mirror: false,
            seqop: true,
            disslw: false,
            haen: false,
            odr: false,
            intpol: false,
        }
    }
}

impl Default for IoCon {
    /// Power-on reset state.
    fn default() -> Self {
        Self {
            bank: AddressingMode::Paired,
            mirror: false,
            seqop: false,
            disslw: false,
            haen: false,
            odr: false,
            intpol: false,
        }
    }
}

impl From<IoCon> for u8 {
    fn from(c: IoCon) -> u8 {
        ((matches!(c.bank, AddressingMode::Split) as u8) << 7)
            | ((c.mirror as u8) << 6)
            | ((c.seqop as u8) << 5)
            | ((c.disslw as u8) << 4)
            | ((c.haen as u8) << 3)
            | ((c.odr as u8) << 2)
            | ((c.intpol as u8) << 1)
    }
}

/// Interrupt-on-change configuration of one port.
///
/// On write, `None` leaves the register untouched.  On read, all fields are `Some`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct InterruptConfigRaw {
    /// GPINTEN
    pub gp_int_en: Option<u8>,
    /// DEFVAL
    pub def_val: Option<u8>,
    /// INTCON
    pub int_con: Option<u8>,
}

/// Interrupt flags and the pin levels captured when the interrupt fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct InterruptCaptureRaw {
    /// INTF
    pub flags: u8,
    /// INTCAP
    pub captured: u8,
}

/// `MCP23x17` "16-Bit I/O Expander with Serial Interface"
pub struct Mcp23x17<I2C> {
    dev: Device<I2C>,
    cursor: PortCursor,
    bank: AddressingMode,
}

impl<I2C: crate::I2cBus> Mcp23x17<I2C> {
    /// Create a driver for the chip at `address` (`0x20..=0x27`).
    ///
    /// This talks to the chip: the register layout is detected and the chip is switched to
    /// [`IoCon::split()`].
    pub fn new(i2c: I2C, address: u8) -> Result<Self, Error<I2C::Error>> {
        if !ADDRESSES.contains(&address) {
            return Err(Error::InvalidAddress(address));
        }
        let mut this = Self {
            dev: Device::new(i2c, address, ByteOrder::Big),
            cursor: PortCursor::new(2, 8),
            bank: AddressingMode::Paired,
        };
        this.bank = this.detect_addressing_mode()?;
        this.configure(IoCon::split())?;
        Ok(this)
    }

    /// Create a driver from the levels of the A2..A0 address pins.
    pub fn with_address_pins(
        i2c: I2C,
        a0: bool,
        a1: bool,
        a2: bool,
    ) -> Result<Self, Error<I2C::Error>> {
        let addr = 0x20 | ((a2 as u8) << 2) | ((a1 as u8) << 1) | (a0 as u8);
        Self::new(i2c, addr)
    }

    pub fn address(&self) -> u8 {
        self.dev.address()
    }

    /// Give back the bus.  The chip stays in the split layout.
    pub fn destroy(self) -> I2C {
        self.dev.release()
    }

    /// Register layout the driver currently assumes.
    pub fn addressing_mode(&self) -> AddressingMode {
        self.bank
    }

    /// Find out which register layout the chip is in.
    ///
    /// IOCON lives at `0x0A`/`0x0B` in the paired layout and at `0x05`/`0x15` in the split one.
    /// Each candidate gets its two low bits set and is read back: IOCON ignores the write to
    /// bit 0, any other register stores it.  Every candidate is restored afterwards, but the
    /// register behind a wrong candidate (an output latch, for example) briefly holds the probe
    /// value.  If the read-back fails, the original value is written back before the error is
    /// returned.  Should that write fail too, the register keeps the probe value.
    ///
    /// The cached layout is not touched.
    pub fn detect_addressing_mode(&mut self) -> Result<AddressingMode, Error<I2C::Error>> {
        for mode in [AddressingMode::Paired, AddressingMode::Split] {
            let (a, b) = mode.resolve(Register::Iocon);
            if self.probe_iocon(a)? && self.probe_iocon(b)? {
                #[cfg(feature = "defmt")]
                defmt::debug!(
                    "mcp23x17 {=u8:#x}: detected addressing mode {}",
                    self.dev.address(),
                    mode
                );
                return Ok(mode);
            }
        }
        Err(Error::DeviceMismatch)
    }

    /// Whether `reg` rejects writes to bit 0 like IOCON does.
    fn probe_iocon(&mut self, reg: u8) -> Result<bool, Error<I2C::Error>> {
        let original = self.dev.read_reg(reg)?;
        self.dev.write_reg(reg, original | IOCON_PROBE)?;
        let echoed = match self.dev.read_reg(reg) {
            Ok(echoed) => echoed,
            Err(e) => {
                let _ = self.dev.write_reg(reg, original);
                return Err(e);
            }
        };
        self.dev.write_reg(reg, original)?;
        Ok(echoed & IOCON_UNIMPLEMENTED == 0)
    }

    /// Write IOCON and switch to the layout it selects.
    pub fn configure(&mut self, iocon: IoCon) -> Result<(), Error<I2C::Error>> {
        let (reg, _) = self.bank.resolve(Register::Iocon);
        self.dev.write_reg(reg, iocon.into())?;
        self.bank = iocon.bank;
        #[cfg(feature = "defmt")]
        defmt::debug!(
            "mcp23x17 {=u8:#x}: IOCON set to {=u8:#x}",
            self.dev.address(),
            u8::from(iocon)
        );
        Ok(())
    }

    /// Addresses of register `index` (0..=10) for port A and port B.
    pub fn register_address(&self, index: u8) -> Result<(u8, u8), Error<I2C::Error>> {
        let reg = Self::lookup(index)?;
        Ok(self.bank.resolve(reg))
    }

    /// Read register `index` of the active port.
    pub fn read_reg_by_index(&mut self, index: u8) -> Result<u8, Error<I2C::Error>> {
        let reg = Self::lookup(index)?;
        self.read(reg)
    }

    /// Write register `index` of the active port.
    pub fn write_reg_by_index(&mut self, index: u8, value: u8) -> Result<(), Error<I2C::Error>> {
        let reg = Self::lookup(index)?;
        self.write(reg, value)
    }

    fn lookup(index: u8) -> Result<Register, Error<I2C::Error>> {
        Register::try_from(index).map_err(Error::InvalidIndex)
    }

    fn active_address(&self, reg: Register) -> u8 {
        let (a, b) = self.bank.resolve(reg);
        if self.cursor.active() == 0 {
            a
        } else {
            b
        }
    }

    fn read(&mut self, reg: Register) -> Result<u8, Error<I2C::Error>> {
        let addr = self.active_address(reg);
        self.dev.read_reg(addr)
    }

    fn write(&mut self, reg: Register, value: u8) -> Result<(), Error<I2C::Error>> {
        let addr = self.active_address(reg);
        self.dev.write_reg(addr, value)
    }

    /// Configure interrupt-on-change for the active port.
    pub fn set_int_config(&mut self, config: InterruptConfigRaw) -> Result<(), Error<I2C::Error>> {
        if let Some(v) = config.def_val {
            self.write(Register::Defval, v)?;
        }
        if let Some(v) = config.int_con {
            self.write(Register::Intcon, v)?;
        }
        // GPINTEN last, the comparison setup has to be in place before pins can fire.
        if let Some(v) = config.gp_int_en {
            self.write(Register::Gpinten, v)?;
        }
        Ok(())
    }

    pub fn int_config(&mut self) -> Result<InterruptConfigRaw, Error<I2C::Error>> {
        Ok(InterruptConfigRaw {
            gp_int_en: Some(self.read(Register::Gpinten)?),
            def_val: Some(self.read(Register::Defval)?),
            int_con: Some(self.read(Register::Intcon)?),
        })
    }

    /// Read the interrupt flags and captured pin levels of the active port.
    ///
    /// INTCAP is read right after INTF.  Reading INTCAP clears the interrupt, so a second
    /// interrupt between the two reads is reported with the first one's flags.
    pub fn if_cap(&mut self) -> Result<InterruptCaptureRaw, Error<I2C::Error>> {
        let flags = self.read(Register::Intf)?;
        let captured = self.read(Register::Intcap)?;
        Ok(InterruptCaptureRaw { flags, captured })
    }

    /// Read OLAT of the active port: the commanded output levels, not the sensed ones.
    pub fn output_latch(&mut self) -> Result<u8, Error<I2C::Error>> {
        self.read(Register::Olat)
    }

    pub fn set_output_latch(&mut self, value: u8) -> Result<(), Error<I2C::Error>> {
        self.write(Register::Olat, value)
    }
}

impl<I2C> Sealed for Mcp23x17<I2C> {
    fn cursor(&self) -> &PortCursor {
        &self.cursor
    }

    fn select_port<E>(&mut self, n_port: u8) -> Result<(), Error<E>> {
        self.cursor.select(n_port)
    }
}

impl<I2C: crate::I2cBus> IoExpander for Mcp23x17<I2C> {
    type BusError = I2C::Error;

    fn port_value(&mut self) -> Result<u8, Error<Self::BusError>> {
        self.read(Register::Gpio)
    }

    fn set_port_value(&mut self, value: u8) -> Result<(), Error<Self::BusError>> {
        self.write(Register::Gpio, value)
    }

    fn port_config_raw(&mut self) -> Result<PortConfigRaw, Error<Self::BusError>> {
        Ok(PortConfigRaw {
            direction_reg: Some(self.read(Register::Iodir)?),
            input_invert_reg: Some(self.read(Register::Ipol)?),
            pull_reg: Some(self.read(Register::Gppu)?),
        })
    }

    fn set_port_config_raw(
        &mut self,
        config: PortConfigRaw,
    ) -> Result<(), Error<Self::BusError>> {
        if let Some(v) = config.direction_reg {
            self.write(Register::Iodir, v)?;
        }
        if let Some(v) = config.input_invert_reg {
            self.write(Register::Ipol, v)?;
        }
        if let Some(v) = config.pull_reg {
            self.write(Register::Gppu, v)?;
        }
        Ok(())
    }
}
