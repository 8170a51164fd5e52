#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid identifier `{0}`")]
    InvalidIdentifier(String),

    #[error("{0} not found")]
    NotFound(String),

    #[error("already registered for this social")]
    AlreadyRegistered,

    #[error("gender `{0}` is not eligible for this social")]
    IneligibleGender(String),

    #[error("{0}")]
    InvalidTransition(String),

    #[error("registration is closed for this social")]
    RegistrationClosed,

    #[error("check-in is not open at this time")]
    OutsideCheckinWindow,

    #[error("cancellation deadline has passed")]
    OutsideCancellationWindow,

    #[error("not authorized")]
    NotAuthorized,

    #[error("no active registration for this social")]
    NotRegistered,

    #[error("social is busy, please try again")]
    Contention,

    #[error("{0}")]
    Validate(#[from] validator::ValidationErrors),

    #[error("{0}")]
    ValidationFailed(String),

    #[error("{0}")]
    Server(String),

    #[error("{0}")]
    Unknown(#[from] anyhow::Error),
}

impl Error {
    /// Stable machine readable code, part of the public contract.
    pub fn code(&self) -> &'static str {
        match self {
            Error::InvalidIdentifier(_) => "InvalidIdentifier",
            Error::NotFound(_) => "NotFound",
            Error::AlreadyRegistered => "AlreadyRegistered",
            Error::IneligibleGender(_) => "IneligibleGender",
            Error::InvalidTransition(_) => "InvalidTransition",
            Error::RegistrationClosed => "RegistrationClosed",
            Error::OutsideCheckinWindow => "OutsideCheckinWindow",
            Error::OutsideCancellationWindow => "OutsideCancellationWindow",
            Error::NotAuthorized => "NotAuthorized",
            Error::NotRegistered => "NotRegistered",
            Error::Contention => "Contention",
            Error::Validate(_) | Error::ValidationFailed(_) => "ValidationFailed",
            Error::Server(_) | Error::Unknown(_) => "Internal",
        }
    }

    pub fn is_contention(&self) -> bool {
        matches!(self, Error::Contention)
    }
}

pub type Result<T> = std::result::Result<T, Error>;

// SQLITE_BUSY, SQLITE_LOCKED and their extended variants.
const BUSY_CODES: [&str; 5] = ["5", "6", "261", "262", "517"];

impl From<sqlx::Error> for Error {
    fn from(value: sqlx::Error) -> Self {
        match &value {
            sqlx::Error::PoolTimedOut => Self::Contention,
            sqlx::Error::Database(err)
                if err
                    .code()
                    .is_some_and(|code| BUSY_CODES.contains(&code.as_ref())) =>
            {
                Self::Contention
            }
            sqlx::Error::ColumnDecode { index, source } => {
                Self::ValidationFailed(format!("stored value in column {index} is invalid: {source}"))
            }
            _ => Self::Unknown(value.into()),
        }
    }
}

impl From<std::num::TryFromIntError> for Error {
    fn from(value: std::num::TryFromIntError) -> Self {
        Self::Unknown(value.into())
    }
}

#[macro_export]
macro_rules! bail {
    ($msg:literal $(,)?) => {
        return Err($crate::Error::Server(format!($msg)))
    };
    ($err:expr $(,)?) => {
        return Err($crate::Error::Server(format!($err)))
    };
    ($fmt:expr, $($arg:tt)*) => {
        return Err($crate::Error::Server(format!($fmt, $($arg)*)))
    };
}

#[macro_export]
macro_rules! not_found {
    ($what:expr $(,)?) => {
        return Err($crate::Error::NotFound(($what).to_string()))
    };
}
