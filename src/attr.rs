//! Text renderings of the controllers, shaped like sysfs attributes.
//!
//! Daemons exposing the EC over a filesystem or D-Bus surface deal in lines
//! of text rather than typed values. This module renders each controller the
//! way a `/sys/...` attribute would: shows produce the exact bytes a reader
//! gets, stores accept the exact bytes a writer hands over, trailing newline
//! included.

use crate::context::Context;
use crate::ec::EcAccess;
use crate::{charge_threshold, charging_mode, fan_mode};
use log::error;
use std::num::ParseIntError;
use tap::Pipe;
use thiserror::Error;

/// Handy wrapper for [`Error`].
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Bad things that could happen when storing through an attribute.
#[derive(Debug, Error)]
pub enum Error {
    /// An error from the fan mode controller.
    #[error("{error}")]
    FanMode {
        /// The error itself.
        #[from]
        error: fan_mode::Error,
    },

    /// An error from the charging mode controller.
    #[error("{error}")]
    ChargingMode {
        /// The error itself.
        #[from]
        error: charging_mode::Error,
    },

    /// An error from the charge threshold controller.
    #[error("{error}")]
    ChargeThreshold {
        /// The error itself.
        #[from]
        error: charge_threshold::Error,
    },

    /// Occurs when a threshold store is handed something other than a number.
    #[error("`{input}` is not a valid threshold percentage")]
    InvalidInput {
        /// The rejected input, trimmed of its trailing newline.
        input: String,
        /// The underlying parse error.
        source: ParseIntError,
    },
}

/// Render the current fan mode.
///
/// Produces the mode name, `unknown` for a register state outside the mode
/// table or `error` when the EC cannot be read, each followed by a newline.
/// EC failures are logged before being degraded to text, so the reader always
/// gets a line.
pub fn fan_mode_show<Ec>(context: &Context<Ec>) -> String
where
    Ec: EcAccess,
{
    match fan_mode::get(context) {
        Ok(Some(name)) => format!("{name}\n"),
        Ok(None) => "unknown\n".into(),
        Err(error) => {
            error!("error reading from embedded controller: {error}");
            "error\n".into()
        }
    }
}

/// Set the fan mode from attribute input.
pub fn fan_mode_store<Ec>(context: &Context<Ec>, input: &str) -> Result<()>
where
    Ec: EcAccess,
{
    fan_mode::set(context, input)?;

    Ok(())
}

/// Render the current charging mode.
///
/// Same shape as [`fan_mode_show`]: name, `unknown` or `error`, newline
/// terminated.
pub fn charging_mode_show<Ec>(context: &Context<Ec>) -> String
where
    Ec: EcAccess,
{
    match charging_mode::get(context) {
        Ok(Some(name)) => format!("{name}\n"),
        Ok(None) => "unknown\n".into(),
        Err(error) => {
            error!("error reading from embedded controller: {error}");
            "error\n".into()
        }
    }
}

/// Set the charging mode from attribute input.
pub fn charging_mode_store<Ec>(context: &Context<Ec>, input: &str) -> Result<()>
where
    Ec: EcAccess,
{
    charging_mode::set(context, input)?;

    Ok(())
}

/// Render the charge threshold as a bare decimal percentage, no newline.
///
/// Unlike the mode shows this one does not degrade EC failures to text; the
/// caller gets the error itself.
pub fn charge_control_threshold_show<Ec>(context: &Context<Ec>) -> Result<String>
where
    Ec: EcAccess,
{
    let value = charge_threshold::get(context).map_err(charge_threshold::Error::from)?;

    Ok(value.to_string())
}

/// Set the charge threshold from attribute input.
///
/// The input is a decimal percentage with at most one trailing newline.
pub fn charge_control_threshold_store<Ec>(context: &Context<Ec>, input: &str) -> Result<()>
where
    Ec: EcAccess,
{
    let input = input.strip_suffix('\n').unwrap_or(input);
    let value = input.pipe(str::parse).map_err(|source| Error::InvalidInput {
        input: input.to_owned(),
        source,
    })?;

    charge_threshold::set(context, value)?;

    Ok(())
}
