//! [`Booking`]-related definitions.

use common::{Date, DateRange, DateTime, Money, Percent};
use derive_more::{AsRef, Display, From, Into};
use juniper::{graphql_object, GraphQLEnum, GraphQLInputObject, GraphQLScalar};
use service::domain::{self, booking};
use uuid::Uuid;

use crate::{api, api::scalar, Context};

/// A reservation of a hotel room.
#[derive(Clone, Debug, From, Into)]
pub struct Booking(domain::Booking);

/// A reservation of a hotel room.
#[graphql_object(context = Context)]
impl Booking {
    /// Unique identifier of this `Booking`.
    #[must_use]
    pub fn id(&self) -> Id {
        self.0.id.into()
    }

    /// Human-readable number of this `Booking`.
    #[must_use]
    pub fn number(&self) -> Number {
        self.0.number.clone().into()
    }

    /// Identifier of the group this `Booking` was reserved within, if any.
    #[must_use]
    pub fn group_id(&self) -> Option<GroupId> {
        self.0.group_id.map(Into::into)
    }

    /// Identifier of the guest made this `Booking`.
    #[must_use]
    pub fn guest_id(&self) -> api::guest::Id {
        self.0.guest_id.into()
    }

    /// Contact data of the primary guest.
    #[must_use]
    pub fn guest(&self) -> api::Guest {
        self.0.guest.clone().into()
    }

    /// Identity of the primary guest verified on arrival, if checked in.
    #[must_use]
    pub fn verification(&self) -> Option<api::guest::Verification> {
        self.0.verification.clone().map(Into::into)
    }

    /// Reserved `Room`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Booking.room",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    #[must_use]
    pub fn room(&self) -> api::Room {
        #[expect(
            unsafe_code,
            reason = "`Booking` references an existing `Room`"
        )]
        unsafe {
            api::Room::new_unchecked(self.0.room_id)
        }
    }

    /// Nights of the stay.
    #[must_use]
    pub fn stay(&self) -> Stay {
        self.0.stay.into()
    }

    /// Number of adult guests.
    #[must_use]
    pub fn adults(&self) -> i32 {
        self.0.occupancy.adults.into()
    }

    /// Number of child guests.
    #[must_use]
    pub fn children(&self) -> i32 {
        self.0.occupancy.children.into()
    }

    /// Price of a single night, fixed at the reservation moment.
    #[must_use]
    pub fn price(&self) -> Money {
        self.0.price
    }

    /// Tax rate applied to the room subtotal.
    #[must_use]
    pub fn tax_rate(&self) -> Percent {
        self.0.rates.tax
    }

    /// Service charge rate applied to the room subtotal.
    #[must_use]
    pub fn service_rate(&self) -> Percent {
        self.0.rates.service
    }

    /// Service charges accrued during the stay, including the removed ones.
    #[must_use]
    pub fn charges(&self) -> Vec<Charge> {
        self.0
            .charges
            .iter()
            .cloned()
            .enumerate()
            .map(|(index, charge)| Charge { index, charge })
            .collect()
    }

    /// Room price multiplied by the number of nights.
    #[must_use]
    pub fn subtotal(&self) -> Money {
        self.0.totals.subtotal
    }

    /// Tax on the subtotal.
    #[must_use]
    pub fn tax(&self) -> Money {
        self.0.totals.tax
    }

    /// Service charge on the subtotal.
    #[must_use]
    pub fn service_charge(&self) -> Money {
        self.0.totals.service_charge
    }

    /// Sum of all the active service charges.
    #[must_use]
    pub fn additional_charges(&self) -> Money {
        self.0.totals.additional_charges
    }

    /// Applied discount.
    #[must_use]
    pub fn discount(&self) -> Money {
        self.0.totals.discount
    }

    /// Total amount to be paid for the stay.
    #[must_use]
    pub fn total(&self) -> Money {
        self.0.totals.total
    }

    /// Deposit to be paid on check-in.
    #[must_use]
    pub fn deposit(&self) -> Money {
        self.0.deposit
    }

    /// Fee charged for the cancellation, if cancelled.
    #[must_use]
    pub fn cancellation_fee(&self) -> Option<Money> {
        self.0.cancellation_fee
    }

    /// Recorded payments.
    #[must_use]
    pub fn payments(&self) -> Vec<Payment> {
        self.0.payments.iter().cloned().map(Into::into).collect()
    }

    /// Total of all the recorded payments.
    #[must_use]
    pub fn paid(&self) -> Money {
        self.0.paid()
    }

    /// Amount owed for this `Booking` in total.
    #[must_use]
    pub fn amount_due(&self) -> Money {
        self.0.amount_due()
    }

    /// Still unpaid part of the `amountDue`.
    #[must_use]
    pub fn balance(&self) -> Money {
        self.0.balance()
    }

    /// Payment status of this `Booking`.
    #[must_use]
    pub fn payment_status(&self) -> PaymentStatus {
        self.0.payment_status.into()
    }

    /// Lifecycle status of this `Booking`.
    #[must_use]
    pub fn status(&self) -> Status {
        self.0.status.into()
    }

    /// Indicator whether this `Booking` can be cancelled.
    #[must_use]
    pub fn can_cancel(&self) -> bool {
        self.0.can_cancel()
    }

    /// Indicator whether the guests can check in.
    #[must_use]
    pub fn can_check_in(&self) -> bool {
        self.0.can_check_in()
    }

    /// Indicator whether the guests can check out.
    #[must_use]
    pub fn can_check_out(&self) -> bool {
        self.0.can_check_out()
    }

    /// Indicator whether the guests can review their stay.
    #[must_use]
    pub fn can_review(&self) -> bool {
        self.0.can_review()
    }

    /// Special requests of the guests.
    #[must_use]
    pub fn special_requests(&self) -> Option<Note> {
        self.0.special_requests.clone().map(Into::into)
    }

    /// Internal notes of the hotel staff.
    #[must_use]
    pub fn admin_notes(&self) -> Option<Note> {
        self.0.admin_notes.clone().map(Into::into)
    }

    /// Reason of the cancellation, if cancelled.
    #[must_use]
    pub fn cancellation_reason(&self) -> Option<Note> {
        self.0.cancellation_reason.clone().map(Into::into)
    }

    /// Reason of the failure, if failed.
    #[must_use]
    pub fn failure_reason(&self) -> Option<Note> {
        self.0.failure_reason.clone().map(Into::into)
    }

    /// `DateTime` when this `Booking` was created.
    #[must_use]
    pub fn created_at(&self) -> DateTime {
        self.0.created_at.coerce()
    }

    /// `DateTime` when this `Booking` was confirmed.
    #[must_use]
    pub fn confirmed_at(&self) -> Option<DateTime> {
        self.0.confirmed_at.map(|at| at.coerce())
    }

    /// `DateTime` when the guests checked in.
    #[must_use]
    pub fn checked_in_at(&self) -> Option<DateTime> {
        self.0.checked_in_at.map(|at| at.coerce())
    }

    /// `DateTime` when the guests checked out.
    #[must_use]
    pub fn checked_out_at(&self) -> Option<DateTime> {
        self.0.checked_out_at.map(|at| at.coerce())
    }

    /// `DateTime` when this `Booking` was cancelled.
    #[must_use]
    pub fn cancelled_at(&self) -> Option<DateTime> {
        self.0.cancelled_at.map(|at| at.coerce())
    }

    /// `DateTime` when this `Booking` was completed.
    #[must_use]
    pub fn completed_at(&self) -> Option<DateTime> {
        self.0.completed_at.map(|at| at.coerce())
    }

    /// `DateTime` when the paid money was refunded.
    #[must_use]
    pub fn refunded_at(&self) -> Option<DateTime> {
        self.0.refunded_at.map(|at| at.coerce())
    }
}

/// Nights of a stay: from the check-in date up to the check-out date.
#[derive(Clone, Copy, Debug, From, Into)]
pub struct Stay(DateRange);

/// Nights of a stay: from the check-in date up to the check-out date.
#[graphql_object(context = Context)]
impl Stay {
    /// Date of the first night.
    #[must_use]
    pub fn check_in(&self) -> Date {
        self.0.start()
    }

    /// Date of the departure, not a night of the stay.
    #[must_use]
    pub fn check_out(&self) -> Date {
        self.0.end()
    }

    /// Number of nights.
    #[must_use]
    pub fn nights(&self) -> i32 {
        i32::try_from(self.0.days()).unwrap_or(i32::MAX)
    }
}

/// Service charge accrued during a stay.
#[derive(Clone, Debug)]
pub struct Charge {
    /// Position of this [`Charge`] in its [`Booking`].
    index: usize,

    /// Underlying [`booking::Charge`].
    charge: booking::Charge,
}

/// Service charge accrued during a stay.
#[graphql_object(name = "ServiceCharge", context = Context)]
impl Charge {
    /// Position of this `ServiceCharge` in its `Booking`, used to remove it.
    #[must_use]
    pub fn index(&self) -> i32 {
        i32::try_from(self.index).unwrap_or(i32::MAX)
    }

    /// Category of this `ServiceCharge`.
    #[must_use]
    pub fn category(&self) -> ChargeCategory {
        self.charge.kind.category().into()
    }

    /// Description of this `ServiceCharge`.
    #[must_use]
    pub fn description(&self) -> Option<Note> {
        self.charge
            .description
            .as_ref()
            .or(self.charge.kind.other())
            .cloned()
            .map(Into::into)
    }

    /// Number of charged units.
    #[must_use]
    pub fn quantity(&self) -> i32 {
        self.charge.quantity.into()
    }

    /// Price of a single unit.
    #[must_use]
    pub fn unit_price(&self) -> Money {
        self.charge.unit_price
    }

    /// Charged amount.
    #[must_use]
    pub fn amount(&self) -> Money {
        self.charge.amount()
    }

    /// Indicator whether this `ServiceCharge` is not removed.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.charge.is_active()
    }

    /// `DateTime` when this `ServiceCharge` was accrued.
    #[must_use]
    pub fn charged_at(&self) -> DateTime {
        self.charge.charged_at.coerce()
    }

    /// `DateTime` when this `ServiceCharge` was removed.
    #[must_use]
    pub fn removed_at(&self) -> Option<DateTime> {
        self.charge.removed_at.map(|at| at.coerce())
    }
}

/// Recorded payment for a `Booking`.
#[derive(Clone, Debug, From, Into)]
pub struct Payment(booking::Payment);

/// Recorded payment for a `Booking`.
#[graphql_object(context = Context)]
impl Payment {
    /// Kind of this `Payment`.
    #[must_use]
    pub fn kind(&self) -> PaymentKind {
        self.0.kind.into()
    }

    /// Method of this `Payment`.
    #[must_use]
    pub fn method(&self) -> PaymentMethod {
        self.0.method.into()
    }

    /// Paid amount.
    #[must_use]
    pub fn amount(&self) -> Money {
        self.0.amount
    }

    /// Reference of the transaction in an external payment system.
    #[must_use]
    pub fn transaction(&self) -> Option<TransactionRef> {
        self.0.transaction.clone().map(Into::into)
    }

    /// `DateTime` when this `Payment` was made.
    #[must_use]
    pub fn paid_at(&self) -> DateTime {
        self.0.paid_at.coerce()
    }
}

/// Number of guests staying in a `Room`.
#[derive(Clone, Copy, Debug, GraphQLInputObject)]
#[graphql(name = "OccupancyInput")]
pub struct OccupancyInput {
    /// Number of adult guests.
    pub adults: i32,

    /// Number of child guests.
    #[graphql(default = 0)]
    pub children: i32,
}

impl TryFrom<OccupancyInput> for booking::Occupancy {
    type Error = std::num::TryFromIntError;

    fn try_from(input: OccupancyInput) -> Result<Self, Self::Error> {
        Ok(Self {
            adults: input.adults.try_into()?,
            children: input.children.try_into()?,
        })
    }
}

/// Unique identifier of a `Booking`.
#[derive(Clone, Copy, Debug, Display, From, GraphQLScalar, Into)]
#[from(booking::Id)]
#[into(booking::Id)]
#[graphql(name = "BookingId", transparent)]
pub struct Id(Uuid);

/// Unique identifier of a group of `Booking`s.
#[derive(Clone, Copy, Debug, Display, From, GraphQLScalar, Into)]
#[from(booking::GroupId)]
#[into(booking::GroupId)]
#[graphql(name = "BookingGroupId", transparent)]
pub struct GroupId(Uuid);

/// Human-readable number of a `Booking` in `BK{YYYYMMDD}{8 digits}` format.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(name = "BookingNumber", with = scalar::Via::<booking::Number>)]
pub struct Number(booking::Number);

/// Free-form text note of a `Booking`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(name = "BookingNote", with = scalar::Via::<booking::Note>)]
pub struct Note(booking::Note);

/// Reference of a transaction in an external payment system.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "PaymentTransactionRef",
    with = scalar::Via::<booking::payment::TransactionRef>,
)]
pub struct TransactionRef(booking::payment::TransactionRef);

/// Lifecycle status of a `Booking`.
#[derive(Clone, Copy, Debug, GraphQLEnum)]
#[graphql(name = "BookingStatus")]
pub enum Status {
    /// Reserved, awaiting confirmation.
    Pending,

    /// Confirmed by the hotel.
    Confirmed,

    /// Guests are staying.
    CheckedIn,

    /// Guests have left.
    CheckedOut,

    /// Settled and closed.
    Completed,

    /// Cancelled before arrival.
    Cancelled,

    /// Guests haven't arrived.
    NoShow,

    /// Reservation has failed.
    Failed,
}

impl From<booking::Status> for Status {
    fn from(status: booking::Status) -> Self {
        use booking::Status as S;
        match status {
            S::Pending => Self::Pending,
            S::Confirmed => Self::Confirmed,
            S::CheckedIn => Self::CheckedIn,
            S::CheckedOut => Self::CheckedOut,
            S::Completed => Self::Completed,
            S::Cancelled => Self::Cancelled,
            S::NoShow => Self::NoShow,
            S::Failed => Self::Failed,
        }
    }
}

impl From<Status> for booking::Status {
    fn from(status: Status) -> Self {
        match status {
            Status::Pending => Self::Pending,
            Status::Confirmed => Self::Confirmed,
            Status::CheckedIn => Self::CheckedIn,
            Status::CheckedOut => Self::CheckedOut,
            Status::Completed => Self::Completed,
            Status::Cancelled => Self::Cancelled,
            Status::NoShow => Self::NoShow,
            Status::Failed => Self::Failed,
        }
    }
}

/// Payment status of a `Booking`.
#[derive(Clone, Copy, Debug, GraphQLEnum)]
pub enum PaymentStatus {
    /// Nothing is paid.
    Unpaid,

    /// Some of the due amount is paid.
    PartiallyPaid,

    /// The whole due amount is paid.
    Paid,

    /// The paid money is returned to the guests.
    Refunded,
}

impl From<booking::PaymentStatus> for PaymentStatus {
    fn from(status: booking::PaymentStatus) -> Self {
        use booking::PaymentStatus as S;
        match status {
            S::Unpaid => Self::Unpaid,
            S::PartiallyPaid => Self::PartiallyPaid,
            S::Paid => Self::Paid,
            S::Refunded => Self::Refunded,
        }
    }
}

impl From<PaymentStatus> for booking::PaymentStatus {
    fn from(status: PaymentStatus) -> Self {
        match status {
            PaymentStatus::Unpaid => Self::Unpaid,
            PaymentStatus::PartiallyPaid => Self::PartiallyPaid,
            PaymentStatus::Paid => Self::Paid,
            PaymentStatus::Refunded => Self::Refunded,
        }
    }
}

/// Kind of a `Payment`.
#[derive(Clone, Copy, Debug, GraphQLEnum)]
pub enum PaymentKind {
    /// Partial payment made on check-in.
    Deposit,

    /// Payment settling the balance.
    Settlement,
}

impl From<booking::payment::Kind> for PaymentKind {
    fn from(kind: booking::payment::Kind) -> Self {
        use booking::payment::Kind as K;
        match kind {
            K::Deposit => Self::Deposit,
            K::Settlement => Self::Settlement,
        }
    }
}

/// Method of a `Payment`.
#[derive(Clone, Copy, Debug, GraphQLEnum)]
pub enum PaymentMethod {
    /// Cash at the front desk.
    Cash,

    /// Credit card.
    CreditCard,

    /// Debit card.
    DebitCard,

    /// Bank transfer.
    BankTransfer,

    /// Electronic wallet.
    EWallet,

    /// PayPal.
    Paypal,
}

impl From<booking::payment::Method> for PaymentMethod {
    fn from(method: booking::payment::Method) -> Self {
        use booking::payment::Method as M;
        match method {
            M::Cash => Self::Cash,
            M::CreditCard => Self::CreditCard,
            M::DebitCard => Self::DebitCard,
            M::BankTransfer => Self::BankTransfer,
            M::EWallet => Self::EWallet,
            M::Paypal => Self::Paypal,
        }
    }
}

impl From<PaymentMethod> for booking::payment::Method {
    fn from(method: PaymentMethod) -> Self {
        match method {
            PaymentMethod::Cash => Self::Cash,
            PaymentMethod::CreditCard => Self::CreditCard,
            PaymentMethod::DebitCard => Self::DebitCard,
            PaymentMethod::BankTransfer => Self::BankTransfer,
            PaymentMethod::EWallet => Self::EWallet,
            PaymentMethod::Paypal => Self::Paypal,
        }
    }
}

/// Category of a `ServiceCharge`.
#[derive(Clone, Copy, Debug, GraphQLEnum)]
#[graphql(name = "ServiceChargeCategory")]
pub enum ChargeCategory {
    /// Minibar consumption.
    Minibar,

    /// Laundry.
    Laundry,

    /// Room service.
    RoomService,

    /// Spa.
    Spa,

    /// Parking.
    Parking,

    /// Phone calls.
    Phone,

    /// Dining.
    Dining,

    /// Anything else, requiring a description.
    Other,
}

impl From<booking::charge::Category> for ChargeCategory {
    fn from(category: booking::charge::Category) -> Self {
        use booking::charge::Category as C;
        match category {
            C::Minibar => Self::Minibar,
            C::Laundry => Self::Laundry,
            C::RoomService => Self::RoomService,
            C::Spa => Self::Spa,
            C::Parking => Self::Parking,
            C::Phone => Self::Phone,
            C::Dining => Self::Dining,
            C::Other => Self::Other,
        }
    }
}

impl From<ChargeCategory> for booking::charge::Category {
    fn from(category: ChargeCategory) -> Self {
        match category {
            ChargeCategory::Minibar => Self::Minibar,
            ChargeCategory::Laundry => Self::Laundry,
            ChargeCategory::RoomService => Self::RoomService,
            ChargeCategory::Spa => Self::Spa,
            ChargeCategory::Parking => Self::Parking,
            ChargeCategory::Phone => Self::Phone,
            ChargeCategory::Dining => Self::Dining,
            ChargeCategory::Other => Self::Other,
        }
    }
}

pub mod list {
    //! Definitions related to the [`Booking`] list.

    use common::pagination;
    use juniper::{graphql_object, GraphQLEnum};
    use service::read;

    use super::Booking;
    use crate::Context;

    /// Page of the [`Booking`] list.
    #[derive(Clone, Debug)]
    pub struct Page(pub read::booking::list::Page);

    /// Page of the `Booking` list.
    #[graphql_object(name = "BookingPage", context = Context)]
    impl Page {
        /// `Booking`s on this page.
        #[must_use]
        pub fn items(&self) -> Vec<Booking> {
            self.0.items.iter().cloned().map(Into::into).collect()
        }

        /// Total number of `Booking`s matching the criteria.
        #[must_use]
        pub fn total(&self) -> i32 {
            count(self.0.total)
        }

        /// Zero-based number of this page.
        #[must_use]
        pub fn page(&self) -> i32 {
            count(self.0.arguments.page())
        }

        /// Maximum number of `Booking`s on a page.
        #[must_use]
        pub fn size(&self) -> i32 {
            count(self.0.arguments.size())
        }

        /// Total number of pages.
        #[must_use]
        pub fn total_pages(&self) -> i32 {
            count(self.0.total_pages())
        }

        /// Indicator whether there is a next page.
        #[must_use]
        pub fn has_next(&self) -> bool {
            self.0.has_next()
        }

        /// Indicator whether there is a previous page.
        #[must_use]
        pub fn has_previous(&self) -> bool {
            self.0.has_previous()
        }
    }

    /// Converts the provided `value` into a GraphQL `Int`, saturating.
    fn count(value: usize) -> i32 {
        i32::try_from(value).unwrap_or(i32::MAX)
    }

    /// Field to sort `Booking`s by.
    #[derive(Clone, Copy, Debug, Default, GraphQLEnum)]
    #[graphql(name = "BookingSortField")]
    pub enum SortField {
        /// Creation moment.
        #[default]
        CreatedAt,

        /// Check-in date.
        CheckIn,

        /// Total amount.
        Total,
    }

    impl From<SortField> for read::booking::list::SortField {
        fn from(field: SortField) -> Self {
            match field {
                SortField::CreatedAt => Self::CreatedAt,
                SortField::CheckIn => Self::CheckIn,
                SortField::Total => Self::Total,
            }
        }
    }

    /// Order of the sorted `Booking`s.
    #[derive(Clone, Copy, Debug, Default, GraphQLEnum)]
    pub enum SortOrder {
        /// Ascending order.
        Asc,

        /// Descending order.
        #[default]
        Desc,
    }

    impl From<SortOrder> for pagination::Order {
        fn from(order: SortOrder) -> Self {
            match order {
                SortOrder::Asc => Self::Ascending,
                SortOrder::Desc => Self::Descending,
            }
        }
    }
}
