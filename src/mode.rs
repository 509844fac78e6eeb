//! Mode tables shared between [`crate::fan_mode`] and [`crate::charging_mode`].
//!
//! A [`ModeFamily`] pairs an ordered list of register fields with an ordered
//! list of named modes, each mode carrying one value per field. The current
//! mode is whichever table entry matches the observed field values exactly;
//! the EC may legitimately sit in a state no entry describes (firmware
//! default, mid-transition), which is reported as "no match" rather than an
//! error.

use crate::ec::{self, EcAccess};
use crate::field::FieldLocation;
use log::warn;
use std::borrow::Cow;

/// Longest mode name the name lookup will compare against.
pub const MODE_NAME_MAX: usize = 10;

/// A named register state: one target/expected value per field of the owning
/// family, in field order.
#[derive(Debug, Clone, Ord, PartialOrd, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Mode {
    pub name: Cow<'static, str>,
    pub values: Cow<'static, [u8]>,
}

impl Mode {
    pub const fn r#static(name: &'static str, values: &'static [u8]) -> Self {
        Self {
            name: Cow::Borrowed(name),
            values: Cow::Borrowed(values),
        }
    }

    pub fn new(
        name: impl Into<Cow<'static, str>>,
        values: impl Into<Cow<'static, [u8]>>,
    ) -> Self {
        Self {
            name: name.into(),
            values: values.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether `input` names this mode.
    ///
    /// The comparison is exact and case-sensitive after trimming at most one
    /// trailing newline from `input`; anything longer than [`MODE_NAME_MAX`]
    /// after trimming never matches.
    pub fn matches_input(&self, input: &str) -> bool {
        let input = input.strip_suffix('\n').unwrap_or(input);

        input.len() <= MODE_NAME_MAX && self.name == input
    }
}

/// The field locations and named modes of one mode family.
#[derive(Debug, Clone, Ord, PartialOrd, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ModeFamily {
    pub fields: Cow<'static, [FieldLocation]>,
    pub modes: Cow<'static, [Mode]>,
}

impl ModeFamily {
    pub const fn r#static(fields: &'static [FieldLocation], modes: &'static [Mode]) -> Self {
        Self {
            fields: Cow::Borrowed(fields),
            modes: Cow::Borrowed(modes),
        }
    }

    pub fn new(
        fields: impl Into<Cow<'static, [FieldLocation]>>,
        modes: impl Into<Cow<'static, [Mode]>>,
    ) -> Self {
        Self {
            fields: fields.into(),
            modes: modes.into(),
        }
    }

    pub fn fields(&self) -> &[FieldLocation] {
        &self.fields
    }

    pub fn modes(&self) -> &[Mode] {
        &self.modes
    }

    /// The defined mode names, in table order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.modes.iter().map(Mode::name)
    }

    /// Read every field in table order.
    ///
    /// Fails on the first unreadable field, so a partially observed state is
    /// never mistaken for an unmatched one.
    pub fn read_fields(&self, ec: &mut impl EcAccess) -> ec::Result<Vec<u8>> {
        self.fields.iter().map(|field| field.read(ec)).collect()
    }

    /// The first mode whose whole value vector equals `observed`, or `None`
    /// when the observed state matches no table entry.
    pub fn match_values(&self, observed: &[u8]) -> Option<&Mode> {
        self.modes
            .iter()
            .find(|mode| mode.values.as_ref() == observed)
    }

    /// [`Self::read_fields`] composed with [`Self::match_values`].
    pub fn current(&self, ec: &mut impl EcAccess) -> ec::Result<Option<&Mode>> {
        let observed = self.read_fields(ec)?;

        Ok(self.match_values(&observed))
    }

    /// Index of the mode `input` names, under [`Mode::matches_input`] rules.
    pub fn find(&self, input: &str) -> Option<usize> {
        self.modes.iter().position(|mode| mode.matches_input(input))
    }

    /// Write the value vector of `modes[index]` field by field.
    ///
    /// Best-effort: a failed field write is logged and the remaining fields
    /// are still attempted, then the last failure is reported. The hardware
    /// offers no atomicity over the vector, so attempting every field gets
    /// the EC as close to the requested mode as it will go.
    ///
    /// `index` must be a valid index into [`Self::modes`], normally obtained
    /// from [`Self::find`].
    pub fn apply(&self, ec: &mut impl EcAccess, index: usize) -> ec::Result<()> {
        let mode = &self.modes[index];
        debug_assert_eq!(mode.values.len(), self.fields.len());

        let mut failure = None;

        for (position, (field, &value)) in
            self.fields.iter().zip(mode.values.iter()).enumerate()
        {
            if let Err(error) = field.write(ec, value) {
                warn!("failed to write field {position} of mode '{}': {error}", mode.name);
                failure = Some(error);
            }
        }

        match failure {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ec::testing::FakeEc;
    use crate::ec::{Direction, Error};

    const FIELDS: &[FieldLocation] = &[
        FieldLocation::bit(0x10, 0),
        FieldLocation::byte(0x20),
        FieldLocation::byte(0x30),
    ];
    const MODES: &[Mode] = &[
        Mode::r#static("low", &[0, 0x11, 0x11]),
        Mode::r#static("high", &[1, 0x22, 0x33]),
        Mode::r#static("alias", &[0, 0x11, 0x11]),
    ];

    fn family() -> ModeFamily {
        ModeFamily::r#static(FIELDS, MODES)
    }

    #[test]
    fn first_match_wins_in_table_order() {
        // "alias" repeats "low"'s vector; table order decides.
        let family = family();
        let matched = family.match_values(&[0, 0x11, 0x11]).unwrap();

        assert_eq!(matched.name(), "low");
    }

    #[test]
    fn unmatched_state_reports_no_mode() {
        assert!(family().match_values(&[1, 0x11, 0x11]).is_none());
        assert!(family().match_values(&[0, 0x11]).is_none());
    }

    #[test]
    fn current_aborts_on_an_unreadable_field() {
        let mut ec = FakeEc::new().failing_at(0x20);

        family().current(&mut ec).expect_err("current succeeded");
    }

    #[test]
    fn apply_continues_past_a_failed_field() {
        let mut ec = FakeEc::new().failing_at(0x20);
        let family = family();

        let error = family.apply(&mut ec, 1).expect_err("apply succeeded");

        // The field after the failed one was still written.
        assert_eq!(ec.registers[0x30], 0x33);
        assert!(matches!(error, Error::Access { address: 0x20, .. }));
    }

    #[test]
    fn apply_reports_the_last_failure() {
        let mut ec = FakeEc::new().failing_at(0x20).failing_at(0x30);

        let error = family().apply(&mut ec, 1).expect_err("apply succeeded");

        match error {
            Error::Access {
                address,
                direction: Direction::Write,
                ..
            } => assert_eq!(address, 0x30),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn find_trims_exactly_one_trailing_newline() {
        let family = family();

        assert_eq!(family.find("high\n"), Some(1));
        assert_eq!(family.find("high"), Some(1));
        assert_eq!(family.find("high\n\n"), None);
    }

    #[test]
    fn find_is_exact_and_case_sensitive() {
        let family = family();

        assert_eq!(family.find("HIGH"), None);
        assert_eq!(family.find("hig"), None);
        assert_eq!(family.find("highest"), None);
    }

    #[test]
    fn find_never_matches_overlong_input() {
        assert_eq!(family().find("impractical"), None);
        assert_eq!(family().find("impractical\n"), None);
    }

    #[test]
    fn names_follow_table_order() {
        let family = family();
        let names: Vec<&str> = family.names().collect();

        assert_eq!(names, ["low", "high", "alias"]);
    }
}
