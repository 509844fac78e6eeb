//! Control the fan mode.
//!
//! The firmware drives the fans with a handful of cooling presets rather than
//! a single speed register. On the supported boards these are `normal`, `eco`
//! (quiet, lower power), `power` (more aggressive cooling) and `turbo`
//! (everything at full tilt). One preset is spread across several EC
//! registers, so the controller only reports a mode when every register
//! agrees with the mode's table entry.

use crate::context::Context;
use crate::ec::{self, EcAccess, EcSys};
use crate::mode::{Mode, ModeFamily};
use log::info;
use thiserror::Error;

/// Handy wrapper for [`Error`].
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Bad things that could happen when dealing with the fan mode.
#[derive(Debug, Error)]
pub enum Error {
    /// An error from the embedded controller transport.
    #[error("{error}")]
    Ec {
        /// The error itself.
        #[from]
        error: ec::Error,
    },

    /// Occurs when a name is not in the profile's fan mode table.
    #[error("`{name}` is not a defined fan mode")]
    InvalidMode {
        /// The rejected name.
        name: String,
    },
}

/// Controller for the fan mode.
#[derive(Copy, Clone)]
pub struct FanModeController<'ctx, Ec = EcSys>
where
    Ec: EcAccess,
{
    /// A reference to the [`Context`].
    pub context: &'ctx Context<Ec>,
}

impl<'ctx, Ec> FanModeController<'ctx, Ec>
where
    Ec: EcAccess,
{
    /// Create a new fan mode controller.
    pub const fn new(context: &'ctx Context<Ec>) -> Self {
        Self { context }
    }

    fn family(&self) -> &'ctx ModeFamily {
        &self.context.profile.fan_modes
    }

    /// Get the current fan mode name.
    ///
    /// `Ok(None)` means the registers hold a state outside the mode table,
    /// which happens on firmware defaults the table does not describe.
    pub fn get(&self) -> ec::Result<Option<&'ctx str>> {
        let family = self.family();

        Ok(family.current(&mut *self.context.ec())?.map(Mode::name))
    }

    /// Set the fan mode by name.
    ///
    /// The name may carry one trailing newline, as handed over by
    /// `echo turbo > ...` style callers.
    pub fn set(&self, name: &str) -> Result<()> {
        let family = self.family();
        let index = family.find(name).ok_or_else(|| Error::InvalidMode {
            name: name.strip_suffix('\n').unwrap_or(name).to_owned(),
        })?;

        info!("changing fan mode to '{}'", family.modes()[index].name());
        family.apply(&mut *self.context.ec(), index)?;

        Ok(())
    }

    /// The fan mode names the profile defines, in table order.
    pub fn modes(&self) -> impl Iterator<Item = &'ctx str> {
        self.family().names()
    }
}

/// Get the current fan mode name.
pub fn get<Ec>(context: &Context<Ec>) -> ec::Result<Option<&str>>
where
    Ec: EcAccess,
{
    context.controllers().fan_mode().get()
}

/// Set the fan mode by name.
pub fn set<Ec>(context: &Context<Ec>, name: &str) -> Result<()>
where
    Ec: EcAccess,
{
    context.controllers().fan_mode().set(name)
}

/// The fan mode names the context's profile defines, in table order.
pub fn modes<Ec>(context: &Context<Ec>) -> impl Iterator<Item = &str>
where
    Ec: EcAccess,
{
    context.profile.fan_modes.names()
}
