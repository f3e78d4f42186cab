//! Helpers for GraphQL scalars backed by validated domain newtypes.

use std::{fmt, marker::PhantomData, str::FromStr};

use juniper::{
    GraphQLType, InputValue, ParseScalarResult, ParseScalarValue, ScalarToken,
    ScalarValue, Value,
};

/// Helper type to use in `#[graphql(with = ..)]` attribute.
///
/// Represents the target type as a GraphQL string, validated by parsing it
/// into the `As` domain type (a `BookingNote`, a `GuestPhone`, etc).
///
/// Target type must implement [`TryFrom`] and [`AsRef`] for `As` type.
#[derive(Debug)]
pub struct Via<As>(PhantomData<As>);

impl<As> Via<As> {
    /// Outputs the target type as a string scalar via [`Display`] of `As`.
    ///
    /// [`Display`]: fmt::Display
    pub fn to_output<T, S>(value: &T) -> Value<S>
    where
        As: fmt::Display,
        T: AsRef<As>,
        S: ScalarValue,
    {
        Value::from(value.as_ref().to_string())
    }

    /// Parses the target type from a string scalar via [`FromStr`] of `As`.
    ///
    /// # Errors
    ///
    /// If the input is not a string, or the string is not a valid `As`.
    #[expect(clippy::missing_panics_doc, reason = "infallible")]
    pub fn from_input<T, S>(input: &InputValue<S>) -> Result<T, String>
    where
        As: FromStr,
        As::Err: fmt::Display,
        T: TryFrom<As> + GraphQLType<S, TypeInfo = ()>,
        T::Error: fmt::Display,
        S: ScalarValue,
    {
        let name = T::name(&()).expect("always has a name");
        let s = input.as_string_value().ok_or_else(|| {
            format!("`{name}` must be a string, found: {input}")
        })?;
        s.parse::<As>()
            .map_err(|e| format!("\"{s}\" is not a valid `{name}`: {e}"))?
            .try_into()
            .map_err(|e| format!("\"{s}\" is not a valid `{name}`: {e}"))
    }

    /// Parses the provided [`ScalarToken`] as a [`String`].
    ///
    /// # Errors
    ///
    /// If the token is not a string.
    pub fn parse_token<S: ScalarValue>(
        value: ScalarToken<'_>,
    ) -> ParseScalarResult<S> {
        <String as ParseScalarValue<S>>::from_str(value)
    }
}

#[cfg(test)]
mod spec {
    use juniper::{DefaultScalarValue, InputValue, Value};
    use service::domain::booking;

    use crate::api::booking::Note;

    use super::Via;

    type Scalar = Via<booking::Note>;

    #[test]
    fn outputs_string() {
        let note = Note::from(booking::Note::new("late arrival").unwrap());

        assert_eq!(
            Scalar::to_output::<_, DefaultScalarValue>(&note),
            Value::scalar("late arrival".to_owned()),
        );
    }

    #[test]
    fn parses_valid_string() {
        let input = InputValue::<DefaultScalarValue>::scalar("sea view");

        let note: Note = Scalar::from_input(&input).unwrap();

        assert_eq!(note.to_string(), "sea view");
    }

    #[test]
    fn rejects_invalid_input() {
        let untrimmed = InputValue::<DefaultScalarValue>::scalar(" sea view");
        let number = InputValue::<DefaultScalarValue>::scalar(42);

        let err = Scalar::from_input::<Note, _>(&untrimmed).unwrap_err();
        assert!(err.contains("BookingNote"), "{err}");
        assert!(Scalar::from_input::<Note, _>(&number).is_err());
    }
}
