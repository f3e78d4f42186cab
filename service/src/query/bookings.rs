//! [`Query`] collection related to the multiple [`Booking`]s.

use common::operations::By;

#[cfg(doc)]
use crate::Query;
use crate::{
    domain::{booking, Booking},
    read,
};

use super::DatabaseQuery;

/// Queries all the [`Booking`]s reserved within a group, in order of
/// creation.
pub type ByGroup = DatabaseQuery<By<Vec<Booking>, booking::GroupId>>;

/// Searches for a page of [`Booking`]s.
pub type Search = DatabaseQuery<
    By<read::booking::list::Page, read::booking::list::Selector>,
>;
