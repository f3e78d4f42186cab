//! Marker types distinguishing [`DateTimeOf`] kinds.
//!
//! [`DateTimeOf`]: crate::DateTimeOf

/// Marker type describing an entity creation.
#[derive(Clone, Copy, Debug)]
pub struct Creation;

/// Marker type describing a reservation confirmation.
#[derive(Clone, Copy, Debug)]
pub struct Confirmation;

/// Marker type describing a guest arrival.
#[derive(Clone, Copy, Debug)]
pub struct CheckIn;

/// Marker type describing a guest departure.
#[derive(Clone, Copy, Debug)]
pub struct CheckOut;

/// Marker type describing a cancellation.
#[derive(Clone, Copy, Debug)]
pub struct Cancellation;

/// Marker type describing a final closure.
#[derive(Clone, Copy, Debug)]
pub struct Completion;

/// Marker type describing a money refund.
#[derive(Clone, Copy, Debug)]
pub struct Refund;

/// Marker type describing a money payment.
#[derive(Clone, Copy, Debug)]
pub struct Payment;

/// Marker type describing an accrued charge.
#[derive(Clone, Copy, Debug)]
pub struct Charge;

/// Marker type describing an entry removal.
#[derive(Clone, Copy, Debug)]
pub struct Removal;

/// Marker type describing a failure.
#[derive(Clone, Copy, Debug)]
pub struct Failure;
