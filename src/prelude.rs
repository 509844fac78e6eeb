//! Most commonly used types.

pub use crate::{
    attr::{Error as AttrError, Result as AttrResult},
    charge_threshold::{
        ChargeThresholdController, Error as ChargeThresholdError, Result as ChargeThresholdResult,
    },
    charging_mode::{
        ChargingModeController, Error as ChargingModeError, Result as ChargingModeResult,
    },
    context::{Context, Controllers, Error as ContextError, Result as ContextResult},
    ec::{EcAccess, EcSys, Error as EcError, Result as EcResult},
    fan_mode::{Error as FanModeError, FanModeController, Result as FanModeResult},
    field::FieldLocation,
    mode::{Mode, ModeFamily},
    profile::{BoardId, ChargeThreshold, Error as ProfileError, Profile, Result as ProfileResult},
};
