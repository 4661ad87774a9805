//! The device module contains the internals for each of the supported I/O expanders.
//!
//! In most cases you will not need anything from here explicitly, the exposed types at the root of
//! the crate should be enough.  The chip specific extras (MCP23x17 interrupt registers, PCF8574
//! variants, ...) live in the respective modules.

pub mod any;
pub mod mcp23x17;
pub mod pcf8574;
pub mod xca9555;
