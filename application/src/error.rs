//! [`Error`]-related definitions.

use std::{fmt, num::TryFromIntError};

use derive_more::Error as StdError;
use itertools::Itertools as _;
use juniper::IntoFieldError;
use service::{
    command::create_booking,
    domain::{booking, room},
    infra::database,
};
use tracerr::{Trace, Traced};

/// Defines a new error type.
#[expect(clippy::module_name_repetitions, reason = "more readable")]
#[macro_export]
macro_rules! define_error {
    (
        enum $name:ident {
            $(
                #[code = $code:literal]
                #[status = $status_code:ident]
                #[message = $message:literal]
                $variant:ident
            ),* $(,)?
        }
    ) => {
        /// Error type.
        #[derive(
            Clone,
            Copy,
            Debug,
            ::derive_more::Display,
            ::derive_more::Error
        )]
        #[repr(u16)]
        pub enum $name {
            $(
                #[display($message)]
                #[doc = $message]
                $variant,
            )*
        }

        impl From<$name> for $crate::Error {
            fn from(err: $name) -> Self {
                match err {
                    $(
                        $name::$variant => Self {
                            code: $code,
                            status_code: ::http::StatusCode::$status_code,
                            message: $message.to_string(),
                            backtrace: None,
                        },
                    )*
                }
            }
        }
    };
}

/// GraphQL API [`Error`].
#[derive(Clone, Debug, StdError)]
pub struct Error {
    /// [`Error`] code.
    pub code: Code,

    /// [`http::StatusCode`] of this [`Error`].
    pub status_code: http::StatusCode,

    /// Backtrace of this [`Error`].
    #[error(not(backtrace))]
    pub backtrace: Option<Trace>,

    /// [`Error`] message.
    pub message: String,
}

impl Error {
    /// Creates a new [`Error`] with the provided `code`, `status_code` and
    /// `message`.
    #[must_use]
    pub fn new(
        code: Code,
        status_code: http::StatusCode,
        message: &impl ToString,
    ) -> Self {
        Self {
            code,
            status_code,
            message: message.to_string(),
            backtrace: None,
        }
    }

    /// Create a new [`Error`] representing an internal server error.
    #[must_use]
    pub fn internal(msg: &impl ToString) -> Self {
        Self {
            code: "INTERNAL_SERVER_ERROR",
            status_code: http::StatusCode::INTERNAL_SERVER_ERROR,
            message: msg.to_string(),
            backtrace: None,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Self {
            code,
            status_code: _,
            backtrace,
            message,
        } = self;

        write!(
            f,
            "[{code}]: {message}{}",
            backtrace
                .iter()
                .format_with("\n", |trace, f| f(&format_args!("{trace}"))),
        )
    }
}

impl<S> IntoFieldError<S> for Error
where
    S: From<String>,
{
    fn into_field_error(self) -> juniper::FieldError<S> {
        let mut ext = juniper::Object::with_capacity(1);
        drop(
            ext.add_field("code", juniper::Value::scalar(self.code.to_owned())),
        );
        drop(
            ext.add_field(
                "backtrace",
                juniper::Value::list(
                    self.backtrace
                        .iter()
                        .flat_map(|trace| trace.iter())
                        .map(|frame| juniper::Value::scalar(frame.to_string()))
                        .collect(),
                ),
            ),
        );
        juniper::FieldError::new(self.message, juniper::Value::object(ext))
    }
}

/// [`Error`] code.
pub type Code = &'static str;

/// Helper trait for converting types into [`Error`]s.
pub trait AsError {
    /// Tries to convert the type into an [`Error`].
    ///
    /// [`None`] is returned if the type cannot be converted into an [`Error`].
    fn try_as_error(&self) -> Option<Error>;

    /// Converts the type into an [`Error`].
    fn as_error(&self) -> Error
    where
        Self: fmt::Display,
    {
        self.try_as_error()
            .unwrap_or_else(|| Error::internal(&self))
    }

    /// Converts the type into an [`Error`] by consuming it.
    fn into_error(self) -> Error
    where
        Self: fmt::Display + Sized,
    {
        self.as_error()
    }
}

impl<E: AsError> AsError for Traced<E> {
    fn try_as_error(&self) -> Option<Error> {
        let mut error = self.as_ref().try_as_error()?;
        error.backtrace = Some(self.trace().clone());
        Some(error)
    }
}

impl AsError for database::Error {
    fn try_as_error(&self) -> Option<Error> {
        None
    }
}

impl AsError for TryFromIntError {
    fn try_as_error(&self) -> Option<Error> {
        None
    }
}

impl AsError for booking::Conflict {
    fn try_as_error(&self) -> Option<Error> {
        let held = self.bookings.iter().map(|h| &h.number).join(", ");
        let message = if held.is_empty() {
            self.to_string()
        } else {
            format!("{self}: {held}")
        };
        Some(Error::new(
            "BOOKING_CONFLICT",
            http::StatusCode::CONFLICT,
            &message,
        ))
    }
}

impl AsError for booking::ValidationError {
    fn try_as_error(&self) -> Option<Error> {
        Some(Error::new(
            "VALIDATION_FAILED",
            http::StatusCode::BAD_REQUEST,
            self,
        ))
    }
}

impl AsError for booking::InvalidTransition {
    fn try_as_error(&self) -> Option<Error> {
        Some(Error::new(
            "INVALID_TRANSITION",
            http::StatusCode::CONFLICT,
            self,
        ))
    }
}

impl AsError for booking::UnsettledBalance {
    fn try_as_error(&self) -> Option<Error> {
        Some(Error::new(
            "UNSETTLED_BALANCE",
            http::StatusCode::CONFLICT,
            self,
        ))
    }
}

impl AsError for booking::Rejection {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::InvalidTransition(e) => e.try_as_error(),
            Self::UnsettledBalance(e) => e.try_as_error(),
            Self::Validation(e) => e.try_as_error(),
        }
    }
}

impl AsError for create_booking::Failure {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Conflict(e) => e.try_as_error(),
            Self::Invalid(e) => e.try_as_error(),
            Self::RoomNotExists(id) => Some(not_exists_room(*id)),
        }
    }
}

/// Creates a new [`Error`] of a missing `Booking`.
pub(crate) fn not_exists_booking(id: booking::Id) -> Error {
    Error::new(
        "BOOKING_NOT_EXISTS",
        http::StatusCode::NOT_FOUND,
        &format!("`Booking(id: {id})` does not exist"),
    )
}

/// Creates a new [`Error`] of a missing `Room`.
pub(crate) fn not_exists_room(id: room::Id) -> Error {
    Error::new(
        "ROOM_NOT_EXISTS",
        http::StatusCode::NOT_FOUND,
        &format!("`Room(id: {id})` does not exist"),
    )
}

#[cfg(test)]
mod spec {
    use common::DateRange;
    use service::domain::{booking, room};

    use super::AsError as _;

    #[test]
    fn maps_domain_errors_to_codes() {
        let conflict = booking::Conflict {
            room_id: room::Id::new(),
            bookings: vec![booking::Hold {
                booking_id: booking::Id::new(),
                number: booking::Number::new("BK202406010000000042").unwrap(),
                stay: DateRange::new(
                    "2024-06-01".parse().unwrap(),
                    "2024-06-03".parse().unwrap(),
                )
                .unwrap(),
            }],
        };
        let err = conflict.as_error();
        assert_eq!(err.code, "BOOKING_CONFLICT");
        assert_eq!(err.status_code, http::StatusCode::CONFLICT);
        assert!(err.message.ends_with("BK202406010000000042"));

        let err = booking::Rejection::from(booking::ValidationError::EmptyStay)
            .as_error();
        assert_eq!(err.code, "VALIDATION_FAILED");
        assert_eq!(err.status_code, http::StatusCode::BAD_REQUEST);
    }
}
