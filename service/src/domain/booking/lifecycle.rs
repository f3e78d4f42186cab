//! [`Booking`] lifecycle transitions.
//!
//! Every transition checks its guards before touching the [`Booking`], so a
//! rejected transition leaves it unchanged.

use common::{define_kind, Date, DateRange, DateTime, Money};

use crate::domain::{guest, room::Room};

use super::{
    charge, payment, reconcile, Booking, Charge, GroupId, Id, InvalidTransition,
    Note, Number, Occupancy, Payment, PaymentStatus, Policy, Rejection, Status,
    Totals, ValidationError, MAX_ADVANCE_DAYS, MAX_NIGHTS,
};

define_kind! {
    #[doc = "Action performed upon a [`Booking`]."]
    enum Action {
        #[doc = "Confirming a reservation."]
        Confirm = 1,

        #[doc = "Checking guests in."]
        CheckIn = 2,

        #[doc = "Checking guests out."]
        CheckOut = 3,

        #[doc = "Cancelling a reservation."]
        Cancel = 4,

        #[doc = "Marking guests as not arrived."]
        MarkNoShow = 5,

        #[doc = "Closing a settled stay."]
        Complete = 6,

        #[doc = "Marking a reservation as failed."]
        MarkFailed = 7,

        #[doc = "Refunding the paid money."]
        Refund = 8,

        #[doc = "Applying a discount."]
        ApplyDiscount = 9,

        #[doc = "Adding a service charge."]
        AddCharge = 10,

        #[doc = "Removing a service charge."]
        RemoveCharge = 11,

        #[doc = "Recording a payment."]
        RecordPayment = 12,

        #[doc = "Changing the stay dates."]
        Reschedule = 13,
    }
}

impl Action {
    /// Indicates whether this [`Action`] is permitted upon a [`Booking`] in
    /// the provided [`Status`].
    #[must_use]
    pub fn is_permitted_from(self, status: Status) -> bool {
        use Status as S;

        match self {
            Self::Confirm => status == S::Pending,
            Self::CheckIn | Self::MarkNoShow => status == S::Confirmed,
            Self::CheckOut | Self::AddCharge => status == S::CheckedIn,
            Self::Complete => status == S::CheckedOut,
            Self::Cancel | Self::Reschedule => {
                matches!(status, S::Pending | S::Confirmed)
            }
            Self::MarkFailed | Self::ApplyDiscount => status.is_holding(),
            Self::Refund => matches!(status, S::Cancelled | S::Completed),
            Self::RemoveCharge => {
                matches!(status, S::CheckedIn | S::CheckedOut)
            }
            Self::RecordPayment => {
                status.is_holding() || status == S::CheckedOut
            }
        }
    }
}

/// Request to reserve a [`Room`] for a stay.
#[derive(Clone, Debug)]
pub struct Reservation {
    /// ID of the guest making the reservation.
    pub guest_id: guest::Id,

    /// Contact data of the primary guest.
    pub guest: guest::Info,

    /// Check-in date.
    pub check_in: Date,

    /// Check-out date.
    pub check_out: Date,

    /// [`Occupancy`] of the [`Room`].
    pub occupancy: Occupancy,

    /// Special requests of the guests.
    pub special_requests: Option<Note>,
}

/// Validates the stay between the provided `check_in` and `check_out` dates
/// when requested on the `today` date.
///
/// # Errors
///
/// If the stay is empty, too long, starts in the past, or starts too far in
/// the future.
pub fn validate_stay(
    check_in: Date,
    check_out: Date,
    today: Date,
) -> Result<DateRange, ValidationError> {
    use ValidationError as E;

    let stay = DateRange::new(check_in, check_out).ok_or(E::EmptyStay)?;
    if stay.days() > MAX_NIGHTS {
        return Err(E::StayTooLong {
            nights: stay.days(),
        });
    }
    if check_in < today {
        return Err(E::CheckInInPast { check_in });
    }
    if today.days_until(check_in) > MAX_ADVANCE_DAYS {
        return Err(E::CheckInTooFar { check_in });
    }
    Ok(stay)
}

impl Booking {
    /// Reserves the provided [`Room`] as a new [`Status::Pending`]
    /// [`Booking`].
    ///
    /// Availability of the [`Room`] is not checked here.
    ///
    /// # Errors
    ///
    /// If the [`Room`] is inactive, or the [`Reservation`] is invalid.
    pub fn reserve(
        room: &Room,
        reservation: Reservation,
        group_id: Option<GroupId>,
        policy: &Policy,
        now: DateTime,
    ) -> Result<Self, ValidationError> {
        let Reservation {
            guest_id,
            guest,
            check_in,
            check_out,
            occupancy,
            special_requests,
        } = reservation;

        if !room.is_active {
            return Err(ValidationError::RoomInactive { room_id: room.id });
        }
        let stay = validate_stay(check_in, check_out, now.date())?;
        occupancy.check(room.capacity)?;

        let id = Id::new();
        let totals = reconcile(
            room.price,
            stay.days(),
            policy.rates,
            &[],
            Money::zero(room.price.currency),
        );
        Ok(Self {
            id,
            number: Number::generate(id, now.date()),
            group_id,
            guest_id,
            guest,
            verification: None,
            room_id: room.id,
            stay,
            occupancy,
            price: room.price,
            rates: policy.rates,
            charges: vec![],
            totals,
            deposit: policy.deposit(totals.total),
            cancellation_fee: None,
            payments: vec![],
            payment_status: PaymentStatus::Unpaid,
            status: Status::Pending,
            special_requests,
            admin_notes: None,
            cancellation_reason: None,
            failure_reason: None,
            created_at: now.coerce(),
            confirmed_at: None,
            checked_in_at: None,
            checked_out_at: None,
            cancelled_at: None,
            completed_at: None,
            refunded_at: None,
        })
    }

    /// Checks whether the provided [`Action`] is permitted in the current
    /// [`Status`].
    fn guard(&self, action: Action) -> Result<(), InvalidTransition> {
        if action.is_permitted_from(self.status) {
            Ok(())
        } else {
            Err(InvalidTransition {
                booking_id: self.id,
                status: self.status,
                action,
            })
        }
    }

    /// Returns [`Totals`] reconciled with the provided `charges` and
    /// `discount`, over the provided `stay`.
    fn reconciled(
        &self,
        stay: DateRange,
        charges: &[Charge],
        discount: Money,
    ) -> Result<Totals, ValidationError> {
        let gross = reconcile(
            self.price,
            stay.days(),
            self.rates,
            charges,
            Money::zero(self.price.currency),
        )
        .total;
        if discount.amount > gross.amount {
            return Err(ValidationError::DiscountExceedsTotal { discount, gross });
        }
        Ok(reconcile(self.price, stay.days(), self.rates, charges, discount))
    }

    /// Confirms this [`Booking`].
    ///
    /// # Errors
    ///
    /// If this [`Booking`] is not [`Status::Pending`].
    pub fn confirm(&mut self, now: DateTime) -> Result<(), Rejection> {
        self.guard(Action::Confirm)?;

        self.status = Status::Confirmed;
        self.confirmed_at = Some(now.coerce());
        Ok(())
    }

    /// Checks the guests in, recording the deposit [`Payment`] made with the
    /// provided [`payment::Method`].
    ///
    /// # Errors
    ///
    /// If this [`Booking`] is not [`Status::Confirmed`], its check-in date
    /// hasn't come yet, or the `verification` doesn't match the reserved
    /// guest.
    pub fn check_in(
        &mut self,
        method: payment::Method,
        transaction: Option<payment::TransactionRef>,
        verification: guest::Verification,
        now: DateTime,
    ) -> Result<(), Rejection> {
        self.guard(Action::CheckIn)?;
        if now.date() < self.stay.start() {
            return Err(ValidationError::CheckInTooEarly {
                check_in: self.stay.start(),
            }
            .into());
        }
        if !verification.matches(&self.guest) {
            return Err(ValidationError::GuestMismatch.into());
        }

        self.payments.push(Payment {
            kind: payment::Kind::Deposit,
            method,
            amount: self.deposit,
            transaction,
            paid_at: now.coerce(),
        });
        self.verification = Some(verification);
        self.status = Status::CheckedIn;
        self.checked_in_at = Some(now.coerce());
        self.settle();
        if self.payment_status == PaymentStatus::Unpaid {
            self.payment_status = PaymentStatus::PartiallyPaid;
        }
        Ok(())
    }

    /// Checks the guests out.
    ///
    /// # Errors
    ///
    /// If this [`Booking`] is not [`Status::CheckedIn`], or is not paid in
    /// full.
    pub fn check_out(&mut self, now: DateTime) -> Result<(), Rejection> {
        self.guard(Action::CheckOut)?;
        let totals =
            self.reconciled(self.stay, &self.charges, self.totals.discount)?;
        let paid = self.paid();
        if paid.amount < totals.total.amount {
            return Err(super::UnsettledBalance {
                booking_id: self.id,
                due: totals.total,
                paid,
            }
            .into());
        }

        self.totals = totals;
        self.status = Status::CheckedOut;
        self.checked_out_at = Some(now.coerce());
        self.settle();
        Ok(())
    }

    /// Cancels this [`Booking`] for the provided `reason`, charging a
    /// cancellation fee according to the [`Policy`].
    ///
    /// # Errors
    ///
    /// If this [`Booking`] is neither [`Status::Pending`] nor
    /// [`Status::Confirmed`].
    pub fn cancel(
        &mut self,
        reason: Note,
        policy: &Policy,
        now: DateTime,
    ) -> Result<(), Rejection> {
        self.guard(Action::Cancel)?;

        self.cancellation_fee =
            policy.cancellation_fee(self.stay.start(), self.price, now);
        self.cancellation_reason = Some(reason);
        self.status = Status::Cancelled;
        self.cancelled_at = Some(now.coerce());
        self.settle();
        Ok(())
    }

    /// Marks the guests of this [`Booking`] as not arrived.
    ///
    /// # Errors
    ///
    /// If this [`Booking`] is not [`Status::Confirmed`], or its check-in date
    /// hasn't passed yet.
    pub fn mark_no_show(&mut self, now: DateTime) -> Result<(), Rejection> {
        self.guard(Action::MarkNoShow)?;
        if now.date() <= self.stay.start() {
            return Err(ValidationError::NoShowTooEarly {
                check_in: self.stay.start(),
            }
            .into());
        }

        self.status = Status::NoShow;
        Ok(())
    }

    /// Completes this [`Booking`] after the guests have left.
    ///
    /// # Errors
    ///
    /// If this [`Booking`] is not [`Status::CheckedOut`].
    pub fn complete(&mut self, now: DateTime) -> Result<(), Rejection> {
        self.guard(Action::Complete)?;

        self.status = Status::Completed;
        self.completed_at = Some(now.coerce());
        Ok(())
    }

    /// Marks this [`Booking`] as failed for the provided `reason`.
    ///
    /// # Errors
    ///
    /// If this [`Booking`] doesn't hold its [`Room`] anymore.
    pub fn mark_failed(&mut self, reason: Note) -> Result<(), Rejection> {
        self.guard(Action::MarkFailed)?;

        self.failure_reason = Some(reason);
        self.status = Status::Failed;
        Ok(())
    }

    /// Refunds the money paid for this [`Booking`].
    ///
    /// # Errors
    ///
    /// If this [`Booking`] is neither [`Status::Cancelled`] nor
    /// [`Status::Completed`], or nothing has been paid for it.
    pub fn refund(&mut self, now: DateTime) -> Result<(), Rejection> {
        self.guard(Action::Refund)?;
        if !matches!(
            self.payment_status,
            PaymentStatus::Paid | PaymentStatus::PartiallyPaid,
        ) {
            return Err(ValidationError::NothingToRefund {
                status: self.payment_status,
            }
            .into());
        }

        self.payment_status = PaymentStatus::Refunded;
        self.refunded_at = Some(now.coerce());
        Ok(())
    }

    /// Replaces the discount of this [`Booking`] with the provided `amount`.
    ///
    /// The deposit follows the discounted total until it's paid on check-in.
    ///
    /// # Errors
    ///
    /// If this [`Booking`] doesn't hold its [`Room`] anymore, or the `amount`
    /// is negative, not a valid amount in the [`Booking`]'s currency, or
    /// exceeds the total.
    pub fn apply_discount(
        &mut self,
        amount: Money,
        policy: &Policy,
    ) -> Result<(), Rejection> {
        self.guard(Action::ApplyDiscount)?;
        ValidationError::check_amount(self.price.currency, amount)?;
        if amount.is_negative() {
            return Err(ValidationError::NegativeAmount.into());
        }
        let totals = self.reconciled(self.stay, &self.charges, amount)?;

        self.totals = totals;
        if self.status != Status::CheckedIn {
            self.deposit = policy.deposit(totals.total);
        }
        self.settle();
        Ok(())
    }

    /// Appends a new service [`Charge`] to the ledger of this [`Booking`].
    ///
    /// Returns the index of the added [`Charge`].
    ///
    /// # Errors
    ///
    /// If this [`Booking`] is not [`Status::CheckedIn`], the `quantity` is
    /// zero, or the `unit_price` is negative or in a wrong currency.
    pub fn add_charge(
        &mut self,
        kind: charge::Kind,
        quantity: u16,
        unit_price: Money,
        description: Option<Note>,
        now: DateTime,
    ) -> Result<usize, Rejection> {
        self.guard(Action::AddCharge)?;
        if quantity == 0 {
            return Err(ValidationError::ZeroQuantity.into());
        }
        ValidationError::check_amount(self.price.currency, unit_price)?;
        if unit_price.is_negative() {
            return Err(ValidationError::NegativeAmount.into());
        }

        self.charges.push(Charge {
            kind,
            quantity,
            unit_price,
            description,
            charged_at: now.coerce(),
            removed_at: None,
        });
        self.totals = reconcile(
            self.price,
            self.nights(),
            self.rates,
            &self.charges,
            self.totals.discount,
        );
        self.settle();
        Ok(self.charges.len() - 1)
    }

    /// Removes the service [`Charge`] at the provided `index` of the ledger.
    ///
    /// The [`Charge`] stays in the ledger, marked as removed.
    ///
    /// # Errors
    ///
    /// If this [`Booking`] is neither [`Status::CheckedIn`] nor
    /// [`Status::CheckedOut`], there is no active [`Charge`] at the `index`,
    /// or the removal would make the discount exceed the total.
    pub fn remove_charge(
        &mut self,
        index: usize,
        now: DateTime,
    ) -> Result<(), Rejection> {
        self.guard(Action::RemoveCharge)?;
        let mut charges = self.charges.clone();
        let charge = charges
            .get_mut(index)
            .ok_or(ValidationError::ChargeNotExists { index })?;
        if !charge.is_active() {
            return Err(ValidationError::ChargeAlreadyRemoved { index }.into());
        }
        charge.removed_at = Some(now.coerce());
        let totals = self.reconciled(self.stay, &charges, self.totals.discount)?;

        self.charges = charges;
        self.totals = totals;
        self.settle();
        Ok(())
    }

    /// Records a settlement [`Payment`] of the provided `amount`.
    ///
    /// # Errors
    ///
    /// If this [`Booking`] is already closed or paid, or the `amount` is not
    /// positive or in a wrong currency.
    pub fn record_payment(
        &mut self,
        method: payment::Method,
        amount: Money,
        transaction: Option<payment::TransactionRef>,
        now: DateTime,
    ) -> Result<(), Rejection> {
        self.guard(Action::RecordPayment)?;
        if matches!(
            self.payment_status,
            PaymentStatus::Paid | PaymentStatus::Refunded,
        ) {
            return Err(ValidationError::AlreadyPaid {
                status: self.payment_status,
            }
            .into());
        }
        ValidationError::check_amount(self.price.currency, amount)?;
        if amount.is_negative() || amount.amount.is_zero() {
            return Err(ValidationError::NonPositiveAmount.into());
        }

        self.payments.push(Payment {
            kind: payment::Kind::Settlement,
            method,
            amount,
            transaction,
            paid_at: now.coerce(),
        });
        self.settle();
        Ok(())
    }

    /// Moves the stay of this [`Booking`] to the provided dates, recomputing
    /// its [`Totals`] and deposit.
    ///
    /// Availability of the [`Room`] is not checked here.
    ///
    /// # Errors
    ///
    /// If this [`Booking`] is neither [`Status::Pending`] nor
    /// [`Status::Confirmed`], or the new stay is invalid.
    pub fn reschedule(
        &mut self,
        check_in: Date,
        check_out: Date,
        policy: &Policy,
        now: DateTime,
    ) -> Result<(), Rejection> {
        self.guard(Action::Reschedule)?;
        let stay = validate_stay(check_in, check_out, now.date())?;
        let totals = self.reconciled(stay, &self.charges, self.totals.discount)?;

        self.stay = stay;
        self.totals = totals;
        self.deposit = policy.deposit(totals.total);
        self.settle();
        Ok(())
    }

    /// Replaces admin notes of this [`Booking`].
    pub fn annotate(&mut self, notes: Option<Note>) {
        self.admin_notes = notes;
    }
}

#[cfg(test)]
mod spec {
    use common::{Date, DateTime, Money};

    use crate::domain::{
        booking::{
            charge, payment, Action, Booking, Note, PaymentStatus, Policy,
            Rejection, Status, ValidationError,
        },
        fixture,
    };

    fn today() -> Date {
        Date::today()
    }

    fn day(offset: i64) -> Date {
        today().add_days(offset).unwrap()
    }

    fn note(s: &str) -> Note {
        Note::new(s).unwrap()
    }

    /// Performs the provided lifecycle [`Action`] with valid inputs.
    fn perform(booking: &mut Booking, action: Action) -> Result<(), Rejection> {
        let now = DateTime::now();
        match action {
            Action::Confirm => booking.confirm(now),
            Action::CheckIn => booking.check_in(
                payment::Method::Cash,
                None,
                fixture::verification(),
                now,
            ),
            Action::CheckOut => booking.check_out(now),
            Action::Cancel => {
                booking.cancel(note("Changed plans"), &Policy::default(), now)
            }
            Action::MarkNoShow => booking.mark_no_show(now),
            Action::Complete => booking.complete(now),
            Action::MarkFailed => booking.mark_failed(note("Payment failed")),
            Action::Refund => booking.refund(now),
            Action::ApplyDiscount => {
                booking.apply_discount(fixture::usd("1"), &Policy::default())
            }
            Action::AddCharge => booking
                .add_charge(charge::Kind::Spa, 1, fixture::usd("10"), None, now)
                .map(drop),
            Action::RemoveCharge => booking.remove_charge(0, now),
            Action::RecordPayment => booking.record_payment(
                payment::Method::Cash,
                fixture::usd("1"),
                None,
                now,
            ),
            Action::Reschedule => booking.reschedule(
                today(),
                day(2),
                &Policy::default(),
                now,
            ),
        }
    }

    #[test]
    fn rejects_every_unlisted_transition() {
        for status in Status::ALL {
            for action in Action::ALL {
                let mut booking =
                    fixture::booking_in(*status, day(-1), day(1));
                booking.payment_status = PaymentStatus::PartiallyPaid;
                let original = booking.clone();

                let res = perform(&mut booking, *action);

                if action.is_permitted_from(*status) {
                    assert!(
                        !matches!(res, Err(Rejection::InvalidTransition(_))),
                        "{action} from {status}: {res:?}",
                    );
                } else {
                    let Err(Rejection::InvalidTransition(e)) = res else {
                        panic!("{action} from {status} must fail: {res:?}");
                    };
                    assert_eq!(e.status, *status);
                    assert_eq!(e.action, *action);
                    assert_eq!(booking, original, "{action} from {status}");
                }
            }
        }
    }

    #[test]
    fn lists_valid_transitions() {
        use Action as A;
        use Status as S;

        let valid = |s, a: Action| a.is_permitted_from(s);
        assert!(valid(S::Pending, A::Confirm));
        assert!(valid(S::Pending, A::Cancel));
        assert!(valid(S::Confirmed, A::CheckIn));
        assert!(valid(S::Confirmed, A::Cancel));
        assert!(valid(S::Confirmed, A::MarkNoShow));
        assert!(valid(S::CheckedIn, A::CheckOut));
        assert!(valid(S::CheckedOut, A::Complete));
        for status in [S::Pending, S::Confirmed, S::CheckedIn] {
            assert!(valid(status, A::MarkFailed));
        }
        for status in [S::Completed, S::Cancelled, S::NoShow, S::Failed] {
            for action in [
                A::Confirm,
                A::CheckIn,
                A::CheckOut,
                A::Cancel,
                A::MarkNoShow,
                A::Complete,
                A::MarkFailed,
            ] {
                assert!(!valid(status, action), "{action} from {status}");
            }
        }
    }

    #[test]
    fn reserves_pending_booking() {
        let room = fixture::room("200");
        let booking = Booking::reserve(
            &room,
            fixture::reservation(day(1), day(3)),
            None,
            &Policy::default(),
            DateTime::now(),
        )
        .unwrap();

        assert_eq!(booking.status, Status::Pending);
        assert_eq!(booking.payment_status, PaymentStatus::Unpaid);
        assert_eq!(booking.nights(), 2);
        assert_eq!(booking.totals.subtotal, fixture::usd("400"));
        assert_eq!(booking.totals.tax, fixture::usd("40"));
        assert_eq!(booking.totals.service_charge, fixture::usd("20"));
        assert_eq!(booking.totals.total, fixture::usd("460"));
        assert_eq!(booking.deposit, fixture::usd("138"));
        assert!(booking.hold().is_some());
    }

    #[test]
    fn validates_reservation() {
        let room = fixture::room("200");
        let reserve = |check_in, check_out, adults, children| {
            let mut reservation = fixture::reservation(check_in, check_out);
            reservation.occupancy.adults = adults;
            reservation.occupancy.children = children;
            Booking::reserve(
                &room,
                reservation,
                None,
                &Policy::default(),
                DateTime::now(),
            )
        };

        assert_eq!(
            reserve(day(2), day(2), 1, 0),
            Err(ValidationError::EmptyStay),
        );
        assert_eq!(
            reserve(day(1), day(32), 1, 0),
            Err(ValidationError::StayTooLong { nights: 31 }),
        );
        assert_eq!(
            reserve(day(-1), day(1), 1, 0),
            Err(ValidationError::CheckInInPast { check_in: day(-1) }),
        );
        assert_eq!(
            reserve(day(366), day(367), 1, 0),
            Err(ValidationError::CheckInTooFar { check_in: day(366) }),
        );
        assert_eq!(reserve(day(1), day(2), 0, 1), Err(ValidationError::NoAdults));
        assert_eq!(
            reserve(day(1), day(2), 2, 1),
            Err(ValidationError::OverCapacity {
                occupants: 3,
                capacity: 2,
            }),
        );
        assert!(reserve(day(0), day(30), 2, 0).is_ok());

        let mut inactive = room.clone();
        inactive.is_active = false;
        assert_eq!(
            Booking::reserve(
                &inactive,
                fixture::reservation(day(1), day(2)),
                None,
                &Policy::default(),
                DateTime::now(),
            ),
            Err(ValidationError::RoomInactive { room_id: room.id }),
        );
    }

    #[test]
    fn checks_in_with_deposit() {
        let mut booking =
            fixture::booking_in(Status::Confirmed, today(), day(2));

        booking
            .check_in(
                payment::Method::CreditCard,
                Some(payment::TransactionRef::new("TXN-1").unwrap()),
                fixture::verification(),
                DateTime::now(),
            )
            .unwrap();

        assert_eq!(booking.status, Status::CheckedIn);
        assert_eq!(booking.payment_status, PaymentStatus::PartiallyPaid);
        assert_eq!(booking.paid(), booking.deposit);
        assert_eq!(booking.payments[0].kind, payment::Kind::Deposit);
        assert_eq!(booking.verification, Some(fixture::verification()));
        assert!(booking.checked_in_at.is_some());
    }

    #[test]
    fn rejects_early_or_mismatched_check_in() {
        let mut early = fixture::booking_in(Status::Confirmed, day(1), day(2));
        let original = early.clone();
        assert_eq!(
            early.check_in(
                payment::Method::Cash,
                None,
                fixture::verification(),
                DateTime::now(),
            ),
            Err(ValidationError::CheckInTooEarly { check_in: day(1) }.into()),
        );
        assert_eq!(early, original);

        let mut mismatched =
            fixture::booking_in(Status::Confirmed, today(), day(2));
        mismatched.guest.national_id = Some("079000000000".parse().unwrap());
        assert_eq!(
            mismatched.check_in(
                payment::Method::Cash,
                None,
                fixture::verification(),
                DateTime::now(),
            ),
            Err(ValidationError::GuestMismatch.into()),
        );
    }

    #[test]
    fn blocks_check_out_until_paid() {
        let mut booking =
            fixture::booking_in(Status::Confirmed, today(), day(2));
        let now = DateTime::now();
        booking
            .check_in(payment::Method::Cash, None, fixture::verification(), now)
            .unwrap();
        _ = booking
            .add_charge(charge::Kind::Minibar, 1, fixture::usd("15"), None, now)
            .unwrap();
        let before = booking.clone();

        let Err(Rejection::UnsettledBalance(e)) = booking.check_out(now) else {
            panic!("check-out must be blocked");
        };
        assert_eq!(e.due, fixture::usd("475"));
        assert_eq!(e.paid, booking.deposit);
        assert_eq!(booking, before);

        booking
            .record_payment(payment::Method::Cash, booking.balance(), None, now)
            .unwrap();
        assert_eq!(booking.payment_status, PaymentStatus::Paid);
        booking.check_out(now).unwrap();
        assert_eq!(booking.status, Status::CheckedOut);
        assert!(booking.can_review());
    }

    #[test]
    fn keeps_formula_after_charges_and_discount() {
        let mut booking =
            fixture::booking_in(Status::CheckedIn, today(), day(2));
        let now = DateTime::now();
        let check = |b: &Booking| {
            let t = b.totals;
            assert_eq!(
                t.total.amount,
                t.subtotal.amount + t.tax.amount + t.service_charge.amount
                    + t.additional_charges.amount
                    - t.discount.amount,
            );
            assert_eq!(t.subtotal, b.price.times(b.nights()));
        };

        let first = booking
            .add_charge(charge::Kind::Minibar, 1, fixture::usd("15"), None, now)
            .unwrap();
        check(&booking);
        assert_eq!(booking.totals.additional_charges, fixture::usd("15"));
        assert_eq!(booking.totals.total, fixture::usd("475"));

        _ = booking
            .add_charge(charge::Kind::Laundry, 2, fixture::usd("5"), None, now)
            .unwrap();
        booking.apply_discount(fixture::usd("25"), &Policy::default()).unwrap();
        check(&booking);
        assert_eq!(booking.totals.total, fixture::usd("460"));

        booking.remove_charge(first, now).unwrap();
        check(&booking);
        assert_eq!(booking.totals.additional_charges, fixture::usd("10"));
        assert_eq!(booking.charges.len(), 2);
        assert!(!booking.charges[first].is_active());

        assert_eq!(
            booking.remove_charge(first, now),
            Err(ValidationError::ChargeAlreadyRemoved { index: first }.into()),
        );
        assert_eq!(
            booking.remove_charge(5, now),
            Err(ValidationError::ChargeNotExists { index: 5 }.into()),
        );
    }

    #[test]
    fn validates_discount() {
        let mut booking = fixture::booking_in(Status::Pending, day(1), day(3));

        assert_eq!(
            booking.apply_discount(fixture::usd("-1"), &Policy::default()),
            Err(ValidationError::NegativeAmount.into()),
        );
        assert!(matches!(
            booking.apply_discount(fixture::usd("460.01"), &Policy::default()),
            Err(Rejection::Validation(
                ValidationError::DiscountExceedsTotal { .. }
            )),
        ));
        assert!(matches!(
            booking.apply_discount(
                Money {
                    currency: common::money::Currency::Eur,
                    ..fixture::usd("1")
                },
                &Policy::default(),
            ),
            Err(Rejection::Validation(ValidationError::CurrencyMismatch { .. })),
        ));
        booking.apply_discount(fixture::usd("460"), &Policy::default()).unwrap();
        assert!(booking.totals.total.amount.is_zero());
        booking.apply_discount(fixture::usd("60"), &Policy::default()).unwrap();
        assert_eq!(booking.totals.total, fixture::usd("400"));
    }

    #[test]
    fn follows_discounted_total_with_deposit() {
        let mut booking =
            fixture::booking_in(Status::Confirmed, today(), day(2));
        assert_eq!(booking.deposit, fixture::usd("138"));

        booking
            .apply_discount(fixture::usd("400"), &Policy::default())
            .unwrap();
        assert_eq!(booking.totals.total, fixture::usd("60"));
        assert_eq!(booking.deposit, fixture::usd("18"));

        booking
            .check_in(
                payment::Method::Cash,
                None,
                fixture::verification(),
                DateTime::now(),
            )
            .unwrap();
        assert_eq!(booking.paid(), fixture::usd("18"));
        assert!(booking.paid().amount <= booking.totals.total.amount);
        assert_eq!(booking.payment_status, PaymentStatus::PartiallyPaid);

        booking
            .apply_discount(fixture::usd("0"), &Policy::default())
            .unwrap();
        assert_eq!(booking.deposit, fixture::usd("18"));
    }

    #[test]
    fn rejects_amounts_not_fitting_cents() {
        let mut booking =
            fixture::booking_in(Status::CheckedIn, today(), day(2));
        let now = DateTime::now();
        let original = booking.clone();

        assert!(matches!(
            booking.add_charge(
                charge::Kind::Minibar,
                3,
                fixture::usd("1.005"),
                None,
                now,
            ),
            Err(Rejection::Validation(
                ValidationError::AmountTooPrecise { .. }
            )),
        ));
        assert!(matches!(
            booking.add_charge(
                charge::Kind::Spa,
                2,
                fixture::usd("79228162514264337593543950335"),
                None,
                now,
            ),
            Err(Rejection::Validation(ValidationError::AmountTooLarge { .. })),
        ));
        assert!(matches!(
            booking.record_payment(
                payment::Method::Cash,
                fixture::usd("10.001"),
                None,
                now,
            ),
            Err(Rejection::Validation(
                ValidationError::AmountTooPrecise { .. }
            )),
        ));
        assert!(matches!(
            booking.apply_discount(fixture::usd("0.001"), &Policy::default()),
            Err(Rejection::Validation(
                ValidationError::AmountTooPrecise { .. }
            )),
        ));
        assert_eq!(booking, original);

        _ = booking
            .add_charge(charge::Kind::Minibar, 3, fixture::usd("1.50"), None, now)
            .unwrap();
        assert_eq!(booking.totals.additional_charges, fixture::usd("4.5"));
    }

    #[test]
    fn rejects_charge_removal_breaking_discount() {
        let mut booking =
            fixture::booking_in(Status::CheckedIn, today(), day(2));
        let now = DateTime::now();
        let index = booking
            .add_charge(charge::Kind::Spa, 1, fixture::usd("40"), None, now)
            .unwrap();
        booking.apply_discount(fixture::usd("500"), &Policy::default()).unwrap();

        assert!(matches!(
            booking.remove_charge(index, now),
            Err(Rejection::Validation(
                ValidationError::DiscountExceedsTotal { .. }
            )),
        ));
        assert!(booking.charges[index].is_active());
    }

    #[test]
    fn cancels_with_late_fee() {
        let mut booking = fixture::booking_in(Status::Confirmed, today(), day(2));

        booking
            .cancel(note("Flight cancelled"), &Policy::default(), DateTime::now())
            .unwrap();

        assert_eq!(booking.status, Status::Cancelled);
        assert_eq!(booking.cancellation_fee, Some(fixture::usd("200")));
        assert_eq!(booking.amount_due(), fixture::usd("200"));
        assert_eq!(booking.payment_status, PaymentStatus::Unpaid);
        assert!(booking.hold().is_none());
        assert!(booking.cancelled_at.is_some());
    }

    #[test]
    fn cancels_early_for_free() {
        let mut booking =
            fixture::booking_in(Status::Pending, day(10), day(12));

        booking
            .cancel(note("Changed plans"), &Policy::default(), DateTime::now())
            .unwrap();

        assert_eq!(booking.cancellation_fee, None);
        assert!(booking.amount_due().amount.is_zero());
    }

    #[test]
    fn marks_no_show_after_check_in_date() {
        let mut booking = fixture::booking_in(Status::Confirmed, today(), day(2));
        assert_eq!(
            booking.mark_no_show(DateTime::now()),
            Err(ValidationError::NoShowTooEarly { check_in: today() }.into()),
        );

        let mut overdue =
            fixture::booking_in(Status::Confirmed, day(-1), day(1));
        overdue.mark_no_show(DateTime::now()).unwrap();
        assert_eq!(overdue.status, Status::NoShow);
        assert!(overdue.hold().is_none());
    }

    #[test]
    fn refunds_paid_bookings_only() {
        let mut unpaid = fixture::booking_in(Status::Cancelled, day(1), day(2));
        assert_eq!(
            unpaid.refund(DateTime::now()),
            Err(ValidationError::NothingToRefund {
                status: PaymentStatus::Unpaid,
            }
            .into()),
        );

        let mut paid = fixture::booking_in(Status::Completed, day(1), day(2));
        paid.payment_status = PaymentStatus::Paid;
        paid.refund(DateTime::now()).unwrap();
        assert_eq!(paid.payment_status, PaymentStatus::Refunded);
        assert_eq!(paid.status, Status::Completed);
        assert!(paid.refunded_at.is_some());
    }

    #[test]
    fn records_payments() {
        let mut booking = fixture::booking_in(Status::Confirmed, day(1), day(3));
        let now = DateTime::now();

        assert_eq!(
            booking.record_payment(payment::Method::Cash, fixture::usd("0"), None, now),
            Err(ValidationError::NonPositiveAmount.into()),
        );
        booking
            .record_payment(payment::Method::BankTransfer, fixture::usd("100"), None, now)
            .unwrap();
        assert_eq!(booking.payment_status, PaymentStatus::PartiallyPaid);
        booking
            .record_payment(payment::Method::Paypal, fixture::usd("360"), None, now)
            .unwrap();
        assert_eq!(booking.payment_status, PaymentStatus::Paid);
        assert_eq!(
            booking.record_payment(payment::Method::Cash, fixture::usd("1"), None, now),
            Err(ValidationError::AlreadyPaid {
                status: PaymentStatus::Paid,
            }
            .into()),
        );
    }

    #[test]
    fn reschedules_with_new_totals() {
        let mut booking = fixture::booking_in(Status::Confirmed, day(1), day(3));
        let policy = Policy::default();

        booking
            .reschedule(day(5), day(8), &policy, DateTime::now())
            .unwrap();

        assert_eq!(booking.nights(), 3);
        assert_eq!(booking.totals.total, fixture::usd("690"));
        assert_eq!(booking.deposit, fixture::usd("207"));
        assert_eq!(
            booking.reschedule(day(5), day(5), &policy, DateTime::now()),
            Err(ValidationError::EmptyStay.into()),
        );
    }
}
