//! Abstractions for offset pagination.

/// Pagination arguments: a zero-based page number and a page size.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Arguments {
    /// Zero-based number of the requested page.
    page: usize,

    /// Maximum number of items on a page.
    size: usize,
}

impl Arguments {
    /// Page size used when none is requested.
    pub const DEFAULT_SIZE: usize = 10;

    /// Maximum allowed page size.
    pub const MAX_SIZE: usize = 100;

    /// Creates new [`Arguments`].
    ///
    /// [`None`] is returned if the `page` is negative, or the `size` is not in
    /// `1..=`[`MAX_SIZE`] range.
    ///
    /// [`MAX_SIZE`]: Self::MAX_SIZE
    pub fn new<Num>(page: Option<Num>, size: Option<Num>) -> Option<Self>
    where
        Num: TryInto<usize>,
    {
        let page = match page {
            Some(p) => p.try_into().ok()?,
            None => 0,
        };
        let size = match size {
            Some(s) => s.try_into().ok()?,
            None => Self::DEFAULT_SIZE,
        };
        (1..=Self::MAX_SIZE)
            .contains(&size)
            .then_some(Self { page, size })
    }

    /// Returns the zero-based number of the requested page.
    #[must_use]
    pub fn page(&self) -> usize {
        self.page
    }

    /// Returns the requested page size.
    #[must_use]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Returns the number of items preceding the requested page.
    #[must_use]
    pub fn offset(&self) -> usize {
        self.page.saturating_mul(self.size)
    }
}

impl Default for Arguments {
    fn default() -> Self {
        Self {
            page: 0,
            size: Self::DEFAULT_SIZE,
        }
    }
}

/// Order of items in a [`Page`].
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum Order {
    /// Ascending order.
    Ascending,

    /// Descending order.
    #[default]
    Descending,
}

impl Order {
    #[cfg(feature = "postgres")]
    /// Returns SQL keyword representing this [`Order`].
    #[must_use]
    pub const fn sql(&self) -> &'static str {
        match self {
            Self::Ascending => "ASC",
            Self::Descending => "DESC",
        }
    }

    /// Applies this [`Order`] to the provided ascending [`Ordering`].
    ///
    /// [`Ordering`]: std::cmp::Ordering
    #[must_use]
    pub fn apply(self, ord: std::cmp::Ordering) -> std::cmp::Ordering {
        match self {
            Self::Ascending => ord,
            Self::Descending => ord.reverse(),
        }
    }
}

/// Sorting of a [`Page`] by some field `F`.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub struct Sort<F> {
    /// Field to sort by.
    pub by: F,

    /// [`Order`] to sort in.
    pub order: Order,
}

/// Pagination selector.
#[derive(Clone, Debug)]
pub struct Selector<F, S> {
    /// Pagination [`Arguments`].
    pub arguments: Arguments,

    /// Filter being applied to the items.
    pub filter: F,

    /// [`Sort`]ing of the items.
    pub sort: Sort<S>,
}

/// Single page of items.
#[derive(Clone, Debug)]
pub struct Page<T> {
    /// Items on this [`Page`].
    pub items: Vec<T>,

    /// Total number of items matching the filter, on all pages.
    pub total: usize,

    /// [`Arguments`] this [`Page`] was selected with.
    pub arguments: Arguments,
}

impl<T> Page<T> {
    /// Returns the total number of pages.
    #[must_use]
    pub fn total_pages(&self) -> usize {
        self.total.div_ceil(self.arguments.size)
    }

    /// Indicates whether there is a page after this one.
    #[must_use]
    pub fn has_next(&self) -> bool {
        self.arguments.page + 1 < self.total_pages()
    }

    /// Indicates whether there is a page before this one.
    #[must_use]
    pub fn has_previous(&self) -> bool {
        self.arguments.page > 0
    }

    /// Converts items of this [`Page`] with the provided function.
    #[must_use]
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            arguments: self.arguments,
        }
    }
}

/// Defines pagination types.
#[expect(clippy::module_name_repetitions, reason = "more readable")]
#[macro_export]
macro_rules! define_pagination {
    ($node:ty, $filter:ty, $sort:ty) => {
        #[doc = "A [`Page`] of nodes."]
        pub type Page = $crate::pagination::Page<$node>;

        #[doc = "Arguments for selecting a [`Page`]."]
        pub type Arguments = $crate::pagination::Arguments;

        #[doc = "[`Page`] sorting."]
        pub type Sort = $crate::pagination::Sort<$sort>;

        #[doc = "[`Page`] selector."]
        pub type Selector = $crate::pagination::Selector<$filter, $sort>;
    };
}

#[cfg(test)]
mod spec {
    use super::{Arguments, Page};

    #[test]
    fn validates_arguments() {
        assert_eq!(Arguments::new::<i32>(None, None), Some(Arguments::default()));
        assert!(Arguments::new(Some(-1), Some(10)).is_none());
        assert!(Arguments::new(Some(0), Some(0)).is_none());
        assert!(Arguments::new(Some(0), Some(101)).is_none());
        assert_eq!(Arguments::new(Some(3), Some(20)).unwrap().offset(), 60);
    }

    #[test]
    fn counts_pages() {
        let page = |page, total| Page::<()> {
            items: vec![],
            total,
            arguments: Arguments::new(Some(page), Some(10)).unwrap(),
        };

        assert_eq!(page(0, 0).total_pages(), 0);
        assert!(!page(0, 0).has_next());
        assert_eq!(page(0, 10).total_pages(), 1);
        assert_eq!(page(0, 11).total_pages(), 2);
        assert!(page(0, 11).has_next());
        assert!(!page(1, 11).has_next());
        assert!(page(1, 11).has_previous());
    }
}
