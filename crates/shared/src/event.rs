use ulid::Ulid;

use crate::social::Role;

/// Who triggered a command, as verified by the identity provider.
#[derive(Clone, Debug)]
pub struct Metadata {
    pub id: String,
    pub trigger_by: Option<String>,
    pub role: Role,
    pub gender: Option<String>,
}

impl Metadata {
    pub fn new(
        trigger_by: impl Into<Option<String>>,
        role: Role,
        gender: impl Into<Option<String>>,
    ) -> Self {
        Self {
            id: Ulid::new().to_string(),
            trigger_by: trigger_by.into(),
            role,
            gender: gender.into(),
        }
    }

    pub fn by(trigger_by: impl Into<String>) -> Self {
        Self {
            trigger_by: Some(trigger_by.into()),
            ..Default::default()
        }
    }

    pub fn by_with_gender(trigger_by: impl Into<String>, gender: impl Into<String>) -> Self {
        Self {
            trigger_by: Some(trigger_by.into()),
            gender: Some(gender.into()),
            ..Default::default()
        }
    }

    pub fn admin(trigger_by: impl Into<String>) -> Self {
        Self {
            trigger_by: Some(trigger_by.into()),
            role: Role::Admin,
            ..Default::default()
        }
    }

    pub fn trigger_by(&self) -> crate::Result<String> {
        match self.trigger_by.to_owned() {
            Some(id) if !id.is_empty() => Ok(id),
            _ => Err(crate::Error::NotAuthorized),
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

impl Default for Metadata {
    fn default() -> Self {
        Self::new(None, Role::User, None)
    }
}
