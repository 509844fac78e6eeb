use crate::field::FieldLocation;
#[cfg(feature = "aorus_5_ke")]
use crate::mode::Mode;
use crate::mode::ModeFamily;
use smbioslib::SMBiosBaseboardInformation;
use std::borrow::Cow;
use std::io;
use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("{error}")]
    Io {
        #[from]
        error: io::Error,
    },

    #[error("unable to find baseboard information from smbios")]
    UnableToFindBoardInformation,

    #[error("no valid profiles were found in the search path")]
    NoValidProfileInSearchPath,
}

#[derive(Debug, Clone, Ord, PartialOrd, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BoardId {
    pub vendor: Cow<'static, str>,
    pub name: Cow<'static, str>,
}

impl BoardId {
    pub const fn r#static(vendor: &'static str, name: &'static str) -> Self {
        Self {
            vendor: Cow::Borrowed(vendor),
            name: Cow::Borrowed(name),
        }
    }

    pub const fn dynamic(vendor: String, name: String) -> Self {
        Self {
            vendor: Cow::Owned(vendor),
            name: Cow::Owned(name),
        }
    }

    pub fn new(vendor: impl Into<Cow<'static, str>>, name: impl Into<Cow<'static, str>>) -> Self {
        Self {
            vendor: vendor.into(),
            name: name.into(),
        }
    }

    pub fn matches(&self, vendor: &str, name: &str) -> bool {
        self.vendor == vendor && self.name == name
    }
}

#[derive(Debug, Copy, Clone, Ord, PartialOrd, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ChargeThreshold {
    pub location: FieldLocation,
    pub min: u8,
    pub max: u8,
}

impl ChargeThreshold {
    pub const fn new(location: FieldLocation, min: u8, max: u8) -> Self {
        Self { location, min, max }
    }

    pub const fn contains(&self, value: u8) -> bool {
        self.min <= value && value <= self.max
    }
}

#[derive(Debug, Clone, Ord, PartialOrd, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Profile {
    pub name: Cow<'static, str>,
    pub board_ids: Cow<'static, [BoardId]>,
    pub fan_modes: ModeFamily,
    pub charging_modes: ModeFamily,
    pub charge_threshold: ChargeThreshold,
}

impl Profile {
    // Tables of types with drop glue (Cow fields) only get 'static lifetime
    // extension in a const's tail expression, never as borrowed argument
    // temporaries, so each one lives in its own const.
    #[cfg(feature = "aorus_5_ke")]
    const AORUS_5_KE_BOARDS: &'static [BoardId] =
        &[BoardId::r#static("GIGABYTE", "AORUS 5 KE")];

    #[cfg(feature = "aorus_5_ke")]
    const AORUS_5_KE_FAN_MODES: &'static [Mode] = &[
        Mode::r#static("normal", &[0, 0, 0, 0, 0x39, 0x39]),
        Mode::r#static("eco", &[0, 1, 0, 0, 0x39, 0x39]),
        Mode::r#static("power", &[0, 0, 1, 0, 0x39, 0x39]),
        Mode::r#static("turbo", &[1, 0, 0, 1, 0xE5, 0xE5]),
    ];

    #[cfg(feature = "aorus_5_ke")]
    const AORUS_5_KE_CHARGING_MODES: &'static [Mode] = &[
        Mode::r#static("standard", &[0, 0x61]),
        Mode::r#static("custom", &[1, 0x3C]),
    ];

    #[cfg(feature = "aorus_5_ke")]
    pub const AORUS_5_KE: Self = Self::r#static(
        "AORUS_5_KE",
        Self::AORUS_5_KE_BOARDS,
        ModeFamily::r#static(
            &[
                FieldLocation::bit(0x06, 4),
                FieldLocation::bit(0x08, 6),
                FieldLocation::bit(0x0C, 4),
                FieldLocation::bit(0x0D, 7),
                FieldLocation::byte(0xB0),
                FieldLocation::byte(0xB1),
            ],
            Self::AORUS_5_KE_FAN_MODES,
        ),
        ModeFamily::r#static(
            &[FieldLocation::bit(0x0F, 2), FieldLocation::byte(0xA9)],
            Self::AORUS_5_KE_CHARGING_MODES,
        ),
        ChargeThreshold::new(FieldLocation::byte(0xA9), 60, 100),
    );

    pub const fn r#static(
        name: &'static str,
        board_ids: &'static [BoardId],
        fan_modes: ModeFamily,
        charging_modes: ModeFamily,
        charge_threshold: ChargeThreshold,
    ) -> Self {
        Self {
            name: Cow::Borrowed(name),
            board_ids: Cow::Borrowed(board_ids),
            fan_modes,
            charging_modes,
            charge_threshold,
        }
    }

    pub const fn dynamic(
        name: String,
        board_ids: Vec<BoardId>,
        fan_modes: ModeFamily,
        charging_modes: ModeFamily,
        charge_threshold: ChargeThreshold,
    ) -> Self {
        Self {
            name: Cow::Owned(name),
            board_ids: Cow::Owned(board_ids),
            fan_modes,
            charging_modes,
            charge_threshold,
        }
    }

    pub fn new(
        name: impl Into<Cow<'static, str>>,
        board_ids: impl IntoIterator<Item = BoardId>,
        fan_modes: ModeFamily,
        charging_modes: ModeFamily,
        charge_threshold: ChargeThreshold,
    ) -> Self {
        Self {
            name: name.into(),
            board_ids: Cow::Owned(board_ids.into_iter().collect()),
            fan_modes,
            charging_modes,
            charge_threshold,
        }
    }

    #[cfg(feature = "aorus_5_ke")]
    pub const SEARCH_PATH: &'static [Self] = &[Self::AORUS_5_KE];

    #[cfg(not(feature = "aorus_5_ke"))]
    pub const SEARCH_PATH: &'static [Self] = &[];

    pub fn matches_board(&self, vendor: &str, name: &str) -> bool {
        self.board_ids.iter().any(|id| id.matches(vendor, name))
    }

    pub fn find() -> Result<Self> {
        Self::find_with_search_path(Self::SEARCH_PATH.iter().cloned())
    }

    pub fn find_with_search_path(search_path: impl IntoIterator<Item = Self>) -> Result<Self> {
        let (vendor, name) = smbioslib::table_load_from_device()?
            .find_map(|baseboard: SMBiosBaseboardInformation| {
                baseboard.manufacturer().zip(baseboard.product())
            })
            .ok_or(Error::UnableToFindBoardInformation)?;

        search_path
            .into_iter()
            .find(|profile| profile.matches_board(&vendor, &name))
            .ok_or(Error::NoValidProfileInSearchPath)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mode::MODE_NAME_MAX;
    use std::collections::HashSet;

    #[cfg(feature = "aorus_5_ke")]
    #[test]
    fn aorus_5_ke_tables_are_consistent() {
        let profile = Profile::AORUS_5_KE;

        for family in [&profile.fan_modes, &profile.charging_modes] {
            assert!(!family.modes().is_empty());

            let mut names = HashSet::new();

            for mode in family.modes() {
                assert_eq!(mode.values.len(), family.fields().len());
                assert!(mode.name().len() <= MODE_NAME_MAX);
                assert!(names.insert(mode.name()), "duplicate mode name");
            }
        }
    }

    #[cfg(feature = "aorus_5_ke")]
    #[test]
    fn aorus_5_ke_lists_fan_and_charging_modes_in_order() {
        let profile = Profile::AORUS_5_KE;

        let fan: Vec<&str> = profile.fan_modes.names().collect();
        let charging: Vec<&str> = profile.charging_modes.names().collect();

        assert_eq!(fan, ["normal", "eco", "power", "turbo"]);
        assert_eq!(charging, ["standard", "custom"]);
    }

    #[cfg(feature = "aorus_5_ke")]
    #[test]
    fn aorus_5_ke_matches_only_its_board() {
        let profile = Profile::AORUS_5_KE;

        assert!(profile.matches_board("GIGABYTE", "AORUS 5 KE"));
        assert!(!profile.matches_board("GIGABYTE", "AORUS 5 SE"));
        assert!(!profile.matches_board("gigabyte", "AORUS 5 KE"));
    }

    #[cfg(feature = "aorus_5_ke")]
    #[test]
    fn search_path_covers_the_aorus_5_ke() {
        assert!(Profile::SEARCH_PATH
            .iter()
            .any(|profile| profile.name == "AORUS_5_KE"));
    }

    #[cfg(feature = "aorus_5_ke")]
    #[test]
    fn threshold_range_is_inclusive() {
        let threshold = Profile::AORUS_5_KE.charge_threshold;

        assert!(threshold.contains(60));
        assert!(threshold.contains(100));
        assert!(!threshold.contains(59));
        assert!(!threshold.contains(101));
    }

    #[cfg(feature = "aorus_5_ke")]
    #[test]
    fn threshold_register_backs_the_custom_charging_byte() {
        let profile = Profile::AORUS_5_KE;

        // The custom charging mode seeds the same byte the threshold
        // endpoint later rewrites.
        assert_eq!(
            profile.charge_threshold.location,
            profile.charging_modes.fields()[1]
        );
    }
}
