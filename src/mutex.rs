use crate::{Error, IoExpander};

/// Common interface for mutex implementations.
///
/// The active port of an expander is driver state, so a "select port, then operate" sequence
/// must not be interleaved with another one.  [`SharedExpander`] runs such sequences with the
/// mutex held.  This trait is already implemented for a number of existing mutex types:
///
/// | Mutex | Feature Name | Notes |
/// | --- | --- | --- |
/// | [`core::cell::RefCell`] | _always available_ | For sharing within a single execution context. |
/// | [`std::sync::Mutex`][mutex-std] | `std` | For platforms where `std` is available. |
/// | [`critical_section::Mutex`][mutex-cs] | `critical-section` | Use critical-section to ensure synchronized access, via the [critical-section][crate-cs] crate. |
///
/// [mutex-std]: https://doc.rust-lang.org/std/sync/struct.Mutex.html
/// [mutex-cs]: https://docs.rs/critical-section/latest/critical_section/struct.Mutex.html
/// [crate-cs]: https://crates.io/crates/critical-section
///
/// For other mutex types, a custom implementation is needed.  Due to the orphan rule, it might be
/// necessary to wrap it in a newtype.
pub trait ExpanderMutex {
    /// The driver that is wrapped inside this mutex.
    type Expander;

    /// Create a new mutex of this type.
    fn create(v: Self::Expander) -> Self;

    /// Lock the mutex and give a closure access to the driver inside.
    fn lock<R, F: FnOnce(&mut Self::Expander) -> R>(&self, f: F) -> R;
}

impl<T> ExpanderMutex for core::cell::RefCell<T> {
    type Expander = T;

    fn create(v: Self::Expander) -> Self {
        core::cell::RefCell::new(v)
    }

    fn lock<R, F: FnOnce(&mut Self::Expander) -> R>(&self, f: F) -> R {
        let mut v = self.borrow_mut();
        f(&mut v)
    }
}

#[cfg(any(test, feature = "std"))]
impl<T> ExpanderMutex for std::sync::Mutex<T> {
    type Expander = T;

    fn create(v: Self::Expander) -> Self {
        std::sync::Mutex::new(v)
    }

    fn lock<R, F: FnOnce(&mut Self::Expander) -> R>(&self, f: F) -> R {
        let mut v = match self.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        f(&mut v)
    }
}

#[cfg(feature = "critical-section")]
impl<T> ExpanderMutex for critical_section::Mutex<core::cell::RefCell<T>> {
    type Expander = T;

    fn create(v: T) -> Self {
        critical_section::Mutex::new(core::cell::RefCell::new(v))
    }

    fn lock<R, F: FnOnce(&mut Self::Expander) -> R>(&self, f: F) -> R {
        critical_section::with(|cs| {
            let mut v = self.borrow_ref_mut(cs);
            f(&mut v)
        })
    }
}

/// An expander that can be used through a shared reference.
///
/// ```no_run
/// # let i2c = embedded_hal_mock::eh1::i2c::Mock::new(&[]);
/// use io_expander::{IoExpander, SharedExpander};
///
/// let pca = io_expander::Pca9555::new(i2c, 0x20).unwrap();
/// let shared: SharedExpander<core::cell::RefCell<_>> = SharedExpander::new(pca);
/// let level = shared.on_port(1, |exp| exp.port_value()).unwrap();
/// ```
pub struct SharedExpander<M>(M);

impl<M, X> SharedExpander<M>
where
    M: ExpanderMutex<Expander = X>,
    X: IoExpander,
{
    pub fn new(expander: X) -> Self {
        Self(M::create(expander))
    }

    /// Select `n_port` and run `f` on it, without letting anyone else in between.
    pub fn on_port<R, F>(&self, n_port: u8, f: F) -> Result<R, Error<X::BusError>>
    where
        F: FnOnce(&mut X) -> Result<R, Error<X::BusError>>,
    {
        self.0.lock(|exp| {
            exp.set_active_port(n_port)?;
            f(exp)
        })
    }

    /// Run `f` with exclusive access to the driver, on whatever port is active.
    pub fn lock<R, F: FnOnce(&mut X) -> R>(&self, f: F) -> R {
        self.0.lock(f)
    }
}
