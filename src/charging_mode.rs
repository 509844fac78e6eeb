//! Control the charging mode.
//!
//! The supported boards charge the battery in one of two regimes: `standard`,
//! which fills the battery to 100%, and `custom`, which stops charging at a
//! configurable threshold to spare a battery that spends its life on mains
//! power. The threshold itself is adjusted through
//! [`crate::charge_threshold`] once `custom` is active.

use crate::context::Context;
use crate::ec::{self, EcAccess, EcSys};
use crate::mode::{Mode, ModeFamily};
use log::info;
use thiserror::Error;

/// Handy wrapper for [`Error`].
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Bad things that could happen when dealing with the charging mode.
#[derive(Debug, Error)]
pub enum Error {
    /// An error from the embedded controller transport.
    #[error("{error}")]
    Ec {
        /// The error itself.
        #[from]
        error: ec::Error,
    },

    /// Occurs when a name is not in the profile's charging mode table.
    #[error("`{name}` is not a defined charging mode")]
    InvalidMode {
        /// The rejected name.
        name: String,
    },
}

/// Controller for the charging mode.
#[derive(Copy, Clone)]
pub struct ChargingModeController<'ctx, Ec = EcSys>
where
    Ec: EcAccess,
{
    /// A reference to the [`Context`].
    pub context: &'ctx Context<Ec>,
}

impl<'ctx, Ec> ChargingModeController<'ctx, Ec>
where
    Ec: EcAccess,
{
    /// Create a new charging mode controller.
    pub const fn new(context: &'ctx Context<Ec>) -> Self {
        Self { context }
    }

    fn family(&self) -> &'ctx ModeFamily {
        &self.context.profile.charging_modes
    }

    /// Get the current charging mode name.
    ///
    /// `Ok(None)` means the registers hold a state outside the mode table.
    /// Note that moving the charge threshold away from the table's seed value
    /// lands here too; the mode byte then no longer equals any entry.
    pub fn get(&self) -> ec::Result<Option<&'ctx str>> {
        let family = self.family();

        Ok(family.current(&mut *self.context.ec())?.map(Mode::name))
    }

    /// Set the charging mode by name.
    ///
    /// The name may carry one trailing newline.
    pub fn set(&self, name: &str) -> Result<()> {
        let family = self.family();
        let index = family.find(name).ok_or_else(|| Error::InvalidMode {
            name: name.strip_suffix('\n').unwrap_or(name).to_owned(),
        })?;

        info!("changing charging mode to '{}'", family.modes()[index].name());
        family.apply(&mut *self.context.ec(), index)?;

        Ok(())
    }

    /// The charging mode names the profile defines, in table order.
    pub fn modes(&self) -> impl Iterator<Item = &'ctx str> {
        self.family().names()
    }
}

/// Get the current charging mode name.
pub fn get<Ec>(context: &Context<Ec>) -> ec::Result<Option<&str>>
where
    Ec: EcAccess,
{
    context.controllers().charging_mode().get()
}

/// Set the charging mode by name.
pub fn set<Ec>(context: &Context<Ec>, name: &str) -> Result<()>
where
    Ec: EcAccess,
{
    context.controllers().charging_mode().set(name)
}

/// The charging mode names the context's profile defines, in table order.
pub fn modes<Ec>(context: &Context<Ec>) -> impl Iterator<Item = &str>
where
    Ec: EcAccess,
{
    context.profile.charging_modes.names()
}
