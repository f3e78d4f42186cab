//! GraphQL API definitions.

pub mod booking;
pub mod guest;
mod mutation;
mod query;
pub mod room;
pub mod scalar;

use crate::{define_error, Context};

pub use self::{
    booking::Booking, guest::Guest, mutation::Mutation, query::Query,
    room::Room,
};

/// GraphQL schema.
pub type Schema = juniper::RootNode<
    'static,
    Query,
    Mutation,
    juniper::EmptySubscription<Context>,
>;

/// Creates a new [`Schema`].
#[must_use]
pub fn schema() -> Schema {
    Schema::new(Query, Mutation, juniper::EmptySubscription::new())
}

define_error! {
    enum InputError {
        #[code = "VALIDATION_FAILED"]
        #[status = BAD_REQUEST]
        #[message = "`page` must be non-negative and `size` within 1..=100"]
        Pagination,

        #[code = "VALIDATION_FAILED"]
        #[status = BAD_REQUEST]
        #[message = "End date must be after the start date"]
        EmptyDateRange,

        #[code = "VALIDATION_FAILED"]
        #[status = BAD_REQUEST]
        #[message = "Number is negative or too large"]
        NegativeNumber,

        #[code = "VALIDATION_FAILED"]
        #[status = BAD_REQUEST]
        #[message = "`OTHER` service charge requires a `description`"]
        UndescribedCharge,
    }
}

#[cfg(test)]
mod spec {
    use super::{schema, InputError};
    use crate::Error;

    #[test]
    fn exposes_no_subscriptions() {
        let sdl = schema().as_sdl();

        assert!(sdl.contains("type Query"));
        assert!(sdl.contains("type Mutation"));
        assert!(sdl.contains("createBooking"));
        assert!(sdl.contains("unavailableDates"));
        assert!(!sdl.contains("type Subscription"));
    }

    #[test]
    fn input_errors_are_bad_requests() {
        for e in [
            InputError::Pagination,
            InputError::EmptyDateRange,
            InputError::NegativeNumber,
            InputError::UndescribedCharge,
        ] {
            let err = Error::from(e);

            assert_eq!(err.code, "VALIDATION_FAILED");
            assert_eq!(err.status_code, http::StatusCode::BAD_REQUEST);
            assert_eq!(err.message, e.to_string());
        }
    }
}
