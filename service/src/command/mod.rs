//! [`Command`] definition.

pub mod add_service_charge;
pub mod annotate_booking;
pub mod apply_booking_discount;
pub mod booking_transition;
pub mod cancel_booking;
pub mod check_in_booking;
pub mod check_out_booking;
pub mod complete_booking;
pub mod confirm_booking;
pub mod create_booking;
pub mod create_group_booking;
pub mod mark_booking_failed;
pub mod mark_booking_no_show;
pub mod mark_room_cleaned;
pub mod record_booking_payment;
pub mod refund_booking;
pub mod remove_service_charge;
pub mod reschedule_booking;

/// [`Command`] of the [`Service`].
///
/// [`Service`]: crate::Service
pub use common::Handler as Command;

pub use self::{
    add_service_charge::AddServiceCharge, annotate_booking::AnnotateBooking,
    apply_booking_discount::ApplyBookingDiscount,
    cancel_booking::CancelBooking, check_in_booking::CheckInBooking,
    check_out_booking::CheckOutBooking, complete_booking::CompleteBooking,
    confirm_booking::ConfirmBooking, create_booking::CreateBooking,
    create_group_booking::CreateGroupBooking,
    mark_booking_failed::MarkBookingFailed,
    mark_booking_no_show::MarkBookingNoShow,
    mark_room_cleaned::MarkRoomCleaned,
    record_booking_payment::RecordBookingPayment,
    refund_booking::RefundBooking,
    remove_service_charge::RemoveServiceCharge,
    reschedule_booking::RescheduleBooking,
};
