//! Page-based slicing of listing queries.
//!
//! Listings return either the whole filtered result set or a single fixed
//! size page of it. No total count is reported.

use sea_orm::{ConnectionTrait, DbErr, EntityTrait, QuerySelect, Select};

/// Page size for campaign listings.
pub const CAMPAIGN_PAGE_SIZE: u64 = 5;
/// Page size for tourism listings.
pub const TOURISM_PAGE_SIZE: u64 = 5;
/// Page size for forum listings.
pub const FORUM_PAGE_SIZE: u64 = 5;
/// Page size for open trip listings.
pub const OPEN_TRIP_PAGE_SIZE: u64 = 10;
/// Page size for comment listings.
pub const COMMENT_PAGE_SIZE: u64 = 10;

/// Largest offset the database accepts as a bound parameter.
const MAX_OFFSET: u64 = i64::MAX as u64;

/// Requested slice of a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageRequest {
    /// The entire result set.
    All,
    /// One page, numbered from 1.
    Page {
        /// Page number.
        number: u64,
        /// Rows per page.
        size: u64,
    },
}

impl PageRequest {
    /// Interpret the raw `page` query parameter.
    ///
    /// Only a string made entirely of ASCII digits selects a page; anything
    /// else (absent, empty, signed, non-numeric) returns the whole listing.
    /// Page `0` is treated as page `1`.
    #[must_use]
    pub fn parse(raw: Option<&str>, size: u64) -> Self {
        let Some(raw) = raw else {
            return Self::All;
        };
        if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
            return Self::All;
        }
        // Overflowing digit strings are far past the last page anyway.
        let number = raw.parse::<u64>().unwrap_or(u64::MAX).max(1);
        Self::Page { number, size }
    }

    /// Number of rows to skip, if paginated.
    ///
    /// Clamped to `i64::MAX`; such a page is past the end and yields no rows.
    #[must_use]
    pub const fn offset(&self) -> Option<u64> {
        match self {
            Self::All => None,
            Self::Page { number, size } => {
                let offset = number.saturating_sub(1).saturating_mul(*size);
                Some(if offset > MAX_OFFSET { MAX_OFFSET } else { offset })
            }
        }
    }

    /// Apply the slice to an already filtered and ordered query.
    #[must_use]
    pub fn apply<E: EntityTrait>(&self, select: Select<E>) -> Select<E> {
        match self {
            Self::All => select,
            Self::Page { size, .. } => select
                .offset(self.offset().unwrap_or_default())
                .limit(*size),
        }
    }
}

/// Run a listing query with the requested slice applied.
pub async fn fetch<E, C>(select: Select<E>, page: PageRequest, db: &C) -> Result<Vec<E::Model>, DbErr>
where
    E: EntityTrait,
    C: ConnectionTrait,
{
    page.apply(select).all(db).await
}
