//! Register level control of the embedded controller on GIGABYTE AORUS laptops.

#[cfg(feature = "serde")]
#[macro_use]
extern crate serde;

pub mod attr;
pub mod charge_threshold;
pub mod charging_mode;
pub mod context;
pub mod ec;
pub mod fan_mode;
pub mod field;
pub mod mode;
pub mod prelude;
pub mod profile;

pub use prelude::*;

pub fn initialize() -> profile::Result<&'static Context> {
    Context::initialize()
}

pub fn initialize_with_profile(profile: Profile) -> &'static Context {
    Context::initialize_with_profile(profile)
}

pub fn initialize_with_search_path(
    search_path: impl IntoIterator<Item = Profile>,
) -> profile::Result<&'static Context> {
    Context::initialize_with_search_path(search_path)
}

pub fn context() -> context::Result<&'static Context> {
    Context::global()
}
