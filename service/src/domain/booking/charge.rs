//! Service [`Charge`] definitions.

#[cfg(doc)]
use common::DateTime;
use common::{define_kind, unit, DateTimeOf, Money};

use super::Note;

/// Ad hoc charge accrued during a stay.
#[derive(Clone, Debug, PartialEq)]
pub struct Charge {
    /// [`Kind`] of this [`Charge`].
    pub kind: Kind,

    /// Number of charged units.
    pub quantity: u16,

    /// Price of a single unit.
    pub unit_price: Money,

    /// Description of this [`Charge`], if any.
    pub description: Option<Note>,

    /// [`DateTime`] when this [`Charge`] was accrued.
    pub charged_at: ChargeDateTime,

    /// [`DateTime`] when this [`Charge`] was removed, if it was.
    pub removed_at: Option<RemovalDateTime>,
}

impl Charge {
    /// Returns the amount of this [`Charge`].
    #[must_use]
    pub fn amount(&self) -> Money {
        self.unit_price.times(self.quantity)
    }

    /// Indicates whether this [`Charge`] counts toward the totals.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.removed_at.is_none()
    }
}

/// Kind of a [`Charge`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Kind {
    /// Drinks and snacks from the minibar.
    Minibar,

    /// Laundry service.
    Laundry,

    /// Food delivered to the room.
    RoomService,

    /// Spa procedures.
    Spa,

    /// Parking lot.
    Parking,

    /// Phone calls.
    Phone,

    /// Restaurant dining.
    Dining,

    /// Anything else, described explicitly.
    Other(Note),
}

impl Kind {
    /// Returns [`Category`] of this [`Kind`].
    #[must_use]
    pub fn category(&self) -> Category {
        match self {
            Self::Minibar => Category::Minibar,
            Self::Laundry => Category::Laundry,
            Self::RoomService => Category::RoomService,
            Self::Spa => Category::Spa,
            Self::Parking => Category::Parking,
            Self::Phone => Category::Phone,
            Self::Dining => Category::Dining,
            Self::Other(_) => Category::Other,
        }
    }

    /// Assembles a [`Kind`] out of its [`Category`] and the description of
    /// [`Category::Other`].
    ///
    /// [`None`] is returned if [`Category::Other`] is not described.
    #[must_use]
    pub fn from_parts(category: Category, other: Option<Note>) -> Option<Self> {
        Some(match category {
            Category::Minibar => Self::Minibar,
            Category::Laundry => Self::Laundry,
            Category::RoomService => Self::RoomService,
            Category::Spa => Self::Spa,
            Category::Parking => Self::Parking,
            Category::Phone => Self::Phone,
            Category::Dining => Self::Dining,
            Category::Other => Self::Other(other?),
        })
    }

    /// Returns the description of [`Kind::Other`].
    #[must_use]
    pub fn other(&self) -> Option<&Note> {
        if let Self::Other(note) = self {
            Some(note)
        } else {
            None
        }
    }
}

define_kind! {
    #[doc = "Category of a [`Charge`], as stored and reported."]
    enum Category {
        #[doc = "[`Kind::Minibar`]."]
        Minibar = 1,

        #[doc = "[`Kind::Laundry`]."]
        Laundry = 2,

        #[doc = "[`Kind::RoomService`]."]
        RoomService = 3,

        #[doc = "[`Kind::Spa`]."]
        Spa = 4,

        #[doc = "[`Kind::Parking`]."]
        Parking = 5,

        #[doc = "[`Kind::Phone`]."]
        Phone = 6,

        #[doc = "[`Kind::Dining`]."]
        Dining = 7,

        #[doc = "[`Kind::Other`]."]
        Other = 8,
    }
}

/// [`DateTime`] when a [`Charge`] was accrued.
pub type ChargeDateTime = DateTimeOf<(Charge, unit::Charge)>;

/// [`DateTime`] when a [`Charge`] was removed.
pub type RemovalDateTime = DateTimeOf<(Charge, unit::Removal)>;
