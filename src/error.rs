use core::fmt;

/// Errors reported by the expander drivers.
///
/// `E` is the error type of the underlying I2C bus.  Argument errors are always raised before any
/// bus traffic happens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<E> {
    /// Device address outside the range the chip can be strapped to.
    InvalidAddress(u8),
    /// Port number outside `0..port_count`.
    InvalidPort(u8),
    /// Logical register index outside the chip's register map.
    InvalidIndex(u8),
    /// Pin number outside `0..port_width`.
    InvalidPin(u8),
    /// The driver does not implement this operation.
    NotSupported,
    /// The device at the given address did not respond like the expected chip.
    DeviceMismatch,
    /// Transport error from the I2C bus, passed through unmodified.
    Bus(E),
}

impl<E> Error<E> {
    /// Whether this error was caused by a bad argument (address, port, index or pin).
    pub fn is_invalid_argument(&self) -> bool {
        matches!(
            self,
            Error::InvalidAddress(_)
                | Error::InvalidPort(_)
                | Error::InvalidIndex(_)
                | Error::InvalidPin(_)
        )
    }
}

impl<E: fmt::Debug> fmt::Display for Error<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidAddress(a) => write!(f, "invalid device address: {a:#04x}"),
            Error::InvalidPort(p) => write!(f, "invalid port number: {p}"),
            Error::InvalidIndex(i) => write!(f, "invalid register index: {i}"),
            Error::InvalidPin(p) => write!(f, "invalid pin number: {p}"),
            Error::NotSupported => f.write_str("operation not supported by this expander"),
            Error::DeviceMismatch => f.write_str("device does not behave like the expected chip"),
            Error::Bus(e) => write!(f, "bus error: {e:?}"),
        }
    }
}

#[cfg(any(test, feature = "std"))]
impl<E: fmt::Debug> std::error::Error for Error<E> {}

#[cfg(test)]
mod tests {
    use super::Error;

    #[test]
    fn argument_errors() {
        assert!(Error::<()>::InvalidAddress(0x30).is_invalid_argument());
        assert!(Error::<()>::InvalidPort(2).is_invalid_argument());
        assert!(Error::<()>::InvalidIndex(11).is_invalid_argument());
        assert!(Error::<()>::InvalidPin(8).is_invalid_argument());
        assert!(!Error::<()>::NotSupported.is_invalid_argument());
        assert!(!Error::Bus(()).is_invalid_argument());
    }

    #[test]
    fn display() {
        assert_eq!(
            Error::<()>::InvalidAddress(0x30).to_string(),
            "invalid device address: 0x30"
        );
        assert_eq!(Error::<()>::InvalidPort(3).to_string(), "invalid port number: 3");
    }
}
