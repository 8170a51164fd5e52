use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString, VariantArray};

/// Gender used for quota accounting.
///
/// Localized aliases are accepted on input only, storage always holds the
/// canonical lowercase form.
#[derive(
    EnumString,
    Display,
    VariantArray,
    AsRefStr,
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
)]
#[strum(ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    #[strum(to_string = "female", serialize = "女性")]
    #[serde(alias = "女性", alias = "Female")]
    Female,
    #[strum(to_string = "male", serialize = "男性")]
    #[serde(alias = "男性", alias = "Male")]
    Male,
}

impl Gender {
    /// Parses a gender attribute coming from the identity provider.
    pub fn parse(value: &str) -> crate::Result<Self> {
        value
            .trim()
            .parse()
            .map_err(|_| crate::Error::IneligibleGender(value.to_owned()))
    }
}

#[derive(
    EnumString,
    Display,
    VariantArray,
    AsRefStr,
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
)]
#[strum(ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Admin,
}

#[derive(
    EnumString,
    Display,
    VariantArray,
    AsRefStr,
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
)]
pub enum SkillLevel {
    S,
    A,
    #[default]
    B,
    C,
    D,
}

/// Participation lifecycle.
///
/// ```text
/// Waitlisted ─▶ Promoted
/// Registered | Waitlisted | Promoted ─▶ Cancelled
/// Registered | Promoted ─▶ Attended | Absent
/// Absent ─▶ ManuallyAttended
/// ```
#[derive(
    EnumString,
    Display,
    VariantArray,
    AsRefStr,
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
)]
pub enum Status {
    Registered,
    Waitlisted,
    Promoted,
    Attended,
    Absent,
    Cancelled,
    ManuallyAttended,
}

impl Status {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Status::Attended | Status::Absent | Status::Cancelled | Status::ManuallyAttended
        )
    }

    /// Registered or promoted participations occupy one quota slot.
    pub fn holds_slot(&self) -> bool {
        matches!(self, Status::Registered | Status::Promoted)
    }

    pub fn is_active(&self) -> bool {
        matches!(
            self,
            Status::Registered | Status::Waitlisted | Status::Promoted
        )
    }

    pub fn can_transition_to(&self, next: Status) -> bool {
        use Status::*;

        matches!(
            (self, next),
            (Waitlisted, Promoted)
                | (Registered | Waitlisted | Promoted, Cancelled)
                | (Registered | Promoted, Attended)
                | (Registered | Promoted, Absent)
                | (Absent, ManuallyAttended)
        )
    }

    pub fn transition(&self, next: Status) -> crate::Result<Status> {
        if !self.can_transition_to(next) {
            return Err(crate::Error::InvalidTransition(format!(
                "cannot move participation from {self} to {next}"
            )));
        }

        Ok(next)
    }
}

#[derive(
    EnumString,
    Display,
    VariantArray,
    AsRefStr,
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum TimeFilter {
    Upcoming,
    Past,
    #[default]
    All,
    /// Not cancelled and starting in the future.
    Available,
}
