//! Contains [`Context`], a structure which will be used by the majority of this crate.

use crate::charge_threshold::ChargeThresholdController;
use crate::charging_mode::ChargingModeController;
use crate::ec::{EcAccess, EcSys};
use crate::fan_mode::FanModeController;
use crate::{profile, Profile};
use once_cell::sync::OnceCell;
use parking_lot::{Mutex, MutexGuard};
use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

static CONTEXT: OnceCell<Context> = OnceCell::new();

/// Bad things which could happen when using the global [`Context`].
#[derive(Debug, Error)]
pub enum Error {
    #[error(
        "the global context is not initialized \
        (tip: initialize it with `gigabyte_ec::initialize()` for defaults or the variety of \
        `Context::initialize*` methods)"
    )]
    Uninitialized,
}

/// Creates controllers.
#[derive(Copy, Clone)]
pub struct Controllers<'ctx, Ec = EcSys>
where
    Ec: EcAccess,
{
    /// A reference to the [`Context`].
    pub context: &'ctx Context<Ec>,
}

impl<'ctx, Ec> Controllers<'ctx, Ec>
where
    Ec: EcAccess,
{
    /// Creates a new [`Controllers`] instance.
    pub fn new(context: &'ctx Context<Ec>) -> Self {
        Self { context }
    }

    /// Creates a new [`FanModeController`] instance.
    pub fn fan_mode(&self) -> FanModeController<'ctx, Ec> {
        FanModeController::new(self.context)
    }

    /// Creates a new [`ChargingModeController`] instance.
    pub fn charging_mode(&self) -> ChargingModeController<'ctx, Ec> {
        ChargingModeController::new(self.context)
    }

    /// Creates a new [`ChargeThresholdController`] instance.
    pub fn charge_threshold(&self) -> ChargeThresholdController<'ctx, Ec> {
        ChargeThresholdController::new(self.context)
    }
}

/// A context, which will be used by all controllers in this crate.
pub struct Context<Ec = EcSys>
where
    Ec: EcAccess,
{
    /// The profile.
    pub profile: Profile,
    ec: Mutex<Ec>,
}

impl Context {
    /// Creates a new context over the `ec_sys` debugfs transport.
    pub fn new(profile: Profile) -> Self {
        Self::with_transport(profile, EcSys::new())
    }

    /// Try and create a new context by trying to find a profile.
    pub fn try_default() -> profile::Result<Self> {
        Ok(Self::new(Profile::find()?))
    }

    /// The global context.
    pub fn global() -> Result<&'static Self> {
        CONTEXT.get().ok_or(Error::Uninitialized)
    }

    /// Initializes the global context by searching [`Profile::SEARCH_PATH`],
    /// then returns it.
    pub fn initialize() -> profile::Result<&'static Self> {
        Self::initialize_with_search_path(Profile::SEARCH_PATH.iter().cloned())
    }

    /// Initializes the global context by searching `search_path`, then
    /// returns it.
    pub fn initialize_with_search_path(
        search_path: impl IntoIterator<Item = Profile>,
    ) -> profile::Result<&'static Self> {
        match CONTEXT.get() {
            Some(context) => Ok(context),
            None => Ok(Self::initialize_with_profile(Profile::find_with_search_path(
                search_path,
            )?)),
        }
    }

    /// Initializes the global context with the specified profile, then
    /// returns it. The first initializer wins; later calls return the
    /// already initialized context untouched.
    pub fn initialize_with_profile(profile: Profile) -> &'static Self {
        CONTEXT.get_or_init(|| Self::new(profile))
    }
}

impl<Ec> Context<Ec>
where
    Ec: EcAccess,
{
    /// Creates a new context over a custom transport.
    pub fn with_transport(profile: Profile, ec: Ec) -> Self {
        Self {
            profile,
            ec: Mutex::new(ec),
        }
    }

    /// Exclusive access to the EC transport.
    ///
    /// Controllers hold the guard across a whole multi-field operation, so
    /// concurrent callers cannot interleave register accesses.
    pub fn ec(&self) -> MutexGuard<'_, Ec> {
        self.ec.lock()
    }

    /// Create a controller creator.
    pub fn controllers(&self) -> Controllers<'_, Ec> {
        Controllers::new(self)
    }
}

#[cfg(test)]
#[cfg(feature = "aorus_5_ke")]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn global_initialization_is_first_writer_wins() {
        assert!(matches!(Context::global(), Err(Error::Uninitialized)));

        let first = Context::initialize_with_profile(Profile::AORUS_5_KE);
        let again = Context::initialize_with_profile(Profile::AORUS_5_KE);

        assert!(std::ptr::eq(first, again));
        assert!(Context::global().is_ok());
    }
}
