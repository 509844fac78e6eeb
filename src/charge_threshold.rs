//! Control the custom charge threshold.
//!
//! When the charging mode is `custom`, the EC stops charging once the battery
//! reaches a threshold percentage. The supported boards accept 60 to 100
//! inclusive; anything outside that window is refused here rather than handed
//! to the EC.

use crate::context::Context;
use crate::ec::{self, EcAccess, EcSys};
use crate::profile::ChargeThreshold;
use log::info;
use std::ops::RangeInclusive;
use thiserror::Error;

/// Handy wrapper for [`Error`].
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Bad things that could happen when dealing with the charge threshold.
#[derive(Debug, Error)]
pub enum Error {
    /// An error from the embedded controller transport.
    #[error("{error}")]
    Ec {
        /// The error itself.
        #[from]
        error: ec::Error,
    },

    /// Occurs when a threshold percentage falls outside the profile's range.
    #[error("charge threshold {value}% is outside the supported {min}%..={max}% range")]
    OutOfRange {
        /// The rejected percentage.
        value: u8,
        /// Lowest accepted percentage.
        min: u8,
        /// Highest accepted percentage.
        max: u8,
    },
}

/// Controller for the charge threshold.
#[derive(Copy, Clone)]
pub struct ChargeThresholdController<'ctx, Ec = EcSys>
where
    Ec: EcAccess,
{
    /// A reference to the [`Context`].
    pub context: &'ctx Context<Ec>,
}

impl<'ctx, Ec> ChargeThresholdController<'ctx, Ec>
where
    Ec: EcAccess,
{
    /// Create a new charge threshold controller.
    pub const fn new(context: &'ctx Context<Ec>) -> Self {
        Self { context }
    }

    fn threshold(&self) -> &'ctx ChargeThreshold {
        &self.context.profile.charge_threshold
    }

    /// Get the current charge threshold percentage.
    pub fn get(&self) -> ec::Result<u8> {
        self.threshold().location.read(&mut *self.context.ec())
    }

    /// Set the charge threshold percentage.
    pub fn set(&self, value: u8) -> Result<()> {
        let threshold = self.threshold();

        if !threshold.contains(value) {
            return Err(Error::OutOfRange {
                value,
                min: threshold.min,
                max: threshold.max,
            });
        }

        info!("changing charge threshold to {value}%");
        threshold.location.write(&mut *self.context.ec(), value)?;

        Ok(())
    }

    /// The accepted threshold range, inclusive on both ends.
    pub fn range(&self) -> RangeInclusive<u8> {
        self.threshold().min..=self.threshold().max
    }
}

/// Get the current charge threshold percentage.
pub fn get<Ec>(context: &Context<Ec>) -> ec::Result<u8>
where
    Ec: EcAccess,
{
    context.controllers().charge_threshold().get()
}

/// Set the charge threshold percentage.
pub fn set<Ec>(context: &Context<Ec>, value: u8) -> Result<()>
where
    Ec: EcAccess,
{
    context.controllers().charge_threshold().set(value)
}

/// The accepted threshold range, inclusive on both ends.
pub fn range<Ec>(context: &Context<Ec>) -> RangeInclusive<u8>
where
    Ec: EcAccess,
{
    context.controllers().charge_threshold().range()
}

#[cfg(test)]
#[cfg(feature = "aorus_5_ke")]
mod tests {
    use super::*;
    use crate::ec::testing::FakeEc;
    use crate::Profile;

    fn context() -> Context<FakeEc> {
        Context::with_transport(
            Profile::AORUS_5_KE,
            FakeEc::with_registers(&[(0xA9, 0x3C)]),
        )
    }

    #[test]
    fn reads_back_what_the_ec_holds() {
        let context = context();

        let value = context
            .controllers()
            .charge_threshold()
            .get()
            .expect("get failed");

        assert_eq!(value, 60);
    }

    #[test]
    fn accepts_the_whole_supported_range() {
        let context = context();
        let charge_threshold = context.controllers().charge_threshold();

        for value in [60, 73, 100] {
            charge_threshold.set(value).expect("set failed");
            assert_eq!(charge_threshold.get().expect("get failed"), value);
        }
    }

    #[test]
    fn rejects_out_of_range_values_without_touching_the_ec() {
        let context = context();
        let charge_threshold = context.controllers().charge_threshold();

        for value in [0, 59, 101, 255] {
            let error = charge_threshold.set(value).expect_err("set succeeded");

            assert!(matches!(
                error,
                Error::OutOfRange {
                    value: rejected,
                    min: 60,
                    max: 100,
                } if rejected == value
            ));
        }

        assert!(context.ec().writes.is_empty());
    }

    #[test]
    fn range_comes_from_the_profile() {
        let context = context();

        assert_eq!(context.controllers().charge_threshold().range(), 60..=100);
    }
}
