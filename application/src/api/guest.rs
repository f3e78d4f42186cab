//! Guest-related definitions.

use derive_more::{AsRef, Display, From, Into};
use juniper::{graphql_object, GraphQLInputObject, GraphQLScalar};
use service::domain::guest;
use uuid::Uuid;

use crate::{api::scalar, Context};

/// Contact data of a primary guest.
#[derive(Clone, Debug, From, Into)]
pub struct Guest(guest::Info);

/// Contact data of a primary guest.
#[graphql_object(context = Context)]
impl Guest {
    /// Full name of the guest.
    #[must_use]
    pub fn full_name(&self) -> Name {
        self.0.full_name.clone().into()
    }

    /// National identity number of the guest, if known.
    #[must_use]
    pub fn national_id(&self) -> Option<NationalId> {
        self.0.national_id.clone().map(Into::into)
    }

    /// Phone number of the guest.
    #[must_use]
    pub fn phone(&self) -> Phone {
        self.0.phone.clone().into()
    }

    /// Email address of the guest, if any.
    #[must_use]
    pub fn email(&self) -> Option<Email> {
        self.0.email.clone().map(Into::into)
    }
}

/// Identity of a primary guest verified at the front desk on arrival.
#[derive(Clone, Debug, From, Into)]
pub struct Verification(guest::Verification);

/// Identity of a primary guest verified at the front desk on arrival.
#[graphql_object(name = "GuestVerification", context = Context)]
impl Verification {
    /// Full name from the presented document.
    #[must_use]
    pub fn full_name(&self) -> Name {
        self.0.full_name.clone().into()
    }

    /// National identity number from the presented document.
    #[must_use]
    pub fn national_id(&self) -> NationalId {
        self.0.national_id.clone().into()
    }

    /// Phone number of the guest.
    #[must_use]
    pub fn phone(&self) -> Phone {
        self.0.phone.clone().into()
    }
}

/// Contact data of a primary guest making a reservation.
#[derive(Clone, Debug, GraphQLInputObject)]
#[graphql(name = "GuestInput")]
pub struct Input {
    /// Full name of the guest.
    pub full_name: Name,

    /// National identity number of the guest, if known.
    pub national_id: Option<NationalId>,

    /// Phone number of the guest.
    pub phone: Phone,

    /// Email address of the guest.
    pub email: Option<Email>,
}

impl From<Input> for guest::Info {
    fn from(input: Input) -> Self {
        Self {
            full_name: input.full_name.into(),
            national_id: input.national_id.map(Into::into),
            phone: input.phone.into(),
            email: input.email.map(Into::into),
        }
    }
}

/// Identity of a primary guest from the document presented on arrival.
#[derive(Clone, Debug, GraphQLInputObject)]
#[graphql(name = "GuestVerificationInput")]
pub struct VerificationInput {
    /// Full name from the document.
    pub full_name: Name,

    /// National identity number from the document.
    pub national_id: NationalId,

    /// Phone number of the guest.
    pub phone: Phone,
}

impl From<VerificationInput> for guest::Verification {
    fn from(input: VerificationInput) -> Self {
        Self {
            full_name: input.full_name.into(),
            national_id: input.national_id.into(),
            phone: input.phone.into(),
        }
    }
}

/// Unique identifier of a guest.
#[derive(Clone, Copy, Debug, Display, From, GraphQLScalar, Into)]
#[from(guest::Id)]
#[into(guest::Id)]
#[graphql(name = "GuestId", transparent)]
pub struct Id(Uuid);

/// Full name of a guest.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(name = "GuestName", with = scalar::Via::<guest::Name>)]
pub struct Name(guest::Name);

/// National identity number of a guest.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(name = "GuestNationalId", with = scalar::Via::<guest::NationalId>)]
pub struct NationalId(guest::NationalId);

/// Phone number of a guest.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(name = "GuestPhone", with = scalar::Via::<guest::Phone>)]
pub struct Phone(guest::Phone);

/// Email address of a guest.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(name = "GuestEmail", with = scalar::Via::<guest::Email>)]
pub struct Email(guest::Email);
