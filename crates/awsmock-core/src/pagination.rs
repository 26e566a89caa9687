//! Marker-based pagination for list actions.
//!
//! A listing is cut into pages of at most `max_items`. When items remain, the
//! remainder is stored under a fresh opaque marker; presenting the marker
//! later yields the next page from that stored remainder and consumes it.
//! Markers are bound to the listing `scope` that issued them. At most
//! `max_outstanding` markers are kept; issuing past that drops the oldest.

use std::sync::atomic::{AtomicU64, Ordering};

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use dashmap::DashMap;
use tracing::debug;

use crate::error::{MockError, MockResult};

/// Largest accepted page size.
pub const MAX_PAGE_SIZE: usize = 1000;

/// Default number of unconsumed markers a pager keeps.
pub const DEFAULT_MAX_OUTSTANDING: usize = 1000;

/// One page of a listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    /// Items on this page.
    pub items: Vec<T>,
    /// Whether more items remain.
    pub is_truncated: bool,
    /// Marker for the next page, present only when truncated.
    pub marker: Option<String>,
}

impl<T> Page<T> {
    /// Transform the items while keeping the paging state.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            is_truncated: self.is_truncated,
            marker: self.marker,
        }
    }
}

#[derive(Debug)]
struct Remainder<T> {
    scope: String,
    items: Vec<T>,
    seq: u64,
}

/// Issues markers and stores listing remainders behind them.
#[derive(Debug)]
pub struct MarkerPager<T: Clone> {
    remainders: DashMap<String, Remainder<T>>,
    max_outstanding: usize,
    next_seq: AtomicU64,
}

impl<T: Clone> Default for MarkerPager<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> MarkerPager<T> {
    /// Create a pager with no outstanding markers.
    #[must_use]
    pub fn new() -> Self {
        Self::with_max_outstanding(DEFAULT_MAX_OUTSTANDING)
    }

    /// Create a pager that keeps at most `max_outstanding` markers (at
    /// least one).
    #[must_use]
    pub fn with_max_outstanding(max_outstanding: usize) -> Self {
        Self {
            remainders: DashMap::new(),
            max_outstanding: max_outstanding.max(1),
            next_seq: AtomicU64::new(0),
        }
    }

    /// Cut one page out of a listing.
    ///
    /// Without `marker` the page starts at the head of `items`. With a marker
    /// the page comes from the remainder stored under it and `items` is
    /// ignored.
    ///
    /// # Errors
    ///
    /// [`MockError::InvalidPageSize`] when `max_items` is outside
    /// `1..=1000`; [`MockError::InvalidMarker`] when the marker is unknown,
    /// already used, evicted, or was issued for a different `scope`.
    ///
    /// ```
    /// use awsmock_core::MarkerPager;
    ///
    /// let pager = MarkerPager::new();
    /// let first = pager.paginate("users", vec![1, 2, 3], None, 2).unwrap();
    /// assert_eq!(first.items, vec![1, 2]);
    /// let second = pager
    ///     .paginate("users", Vec::new(), first.marker.as_deref(), 2)
    ///     .unwrap();
    /// assert_eq!(second.items, vec![3]);
    /// assert!(!second.is_truncated);
    /// ```
    pub fn paginate(
        &self,
        scope: &str,
        items: Vec<T>,
        marker: Option<&str>,
        max_items: usize,
    ) -> MockResult<Page<T>> {
        if !(1..=MAX_PAGE_SIZE).contains(&max_items) {
            return Err(MockError::InvalidPageSize {
                requested: max_items,
                max: MAX_PAGE_SIZE,
            });
        }

        let mut items = match marker {
            None => items,
            Some(m) => {
                let (_, remainder) = self
                    .remainders
                    .remove_if(m, |_, r| r.scope == scope)
                    .ok_or_else(|| MockError::InvalidMarker(m.to_owned()))?;
                remainder.items
            }
        };

        if items.len() <= max_items {
            return Ok(Page {
                items,
                is_truncated: false,
                marker: None,
            });
        }

        let rest = items.split_off(max_items);
        let next = URL_SAFE_NO_PAD.encode(crate::ids::random_bytes(24));
        debug!(scope, marker = %next, remaining = rest.len(), "issued pagination marker");
        self.remainders.insert(
            next.clone(),
            Remainder {
                scope: scope.to_owned(),
                items: rest,
                seq: self.next_seq.fetch_add(1, Ordering::Relaxed),
            },
        );
        self.evict_oldest();

        Ok(Page {
            items,
            is_truncated: true,
            marker: Some(next),
        })
    }

    fn evict_oldest(&self) {
        while self.remainders.len() > self.max_outstanding {
            let oldest = self
                .remainders
                .iter()
                .min_by_key(|entry| entry.seq)
                .map(|entry| entry.key().clone());
            let Some(marker) = oldest else { break };
            self.remainders.remove(&marker);
            debug!(marker = %marker, "evicted pagination marker");
        }
    }

    /// Number of markers not yet consumed.
    #[must_use]
    pub fn outstanding(&self) -> usize {
        self.remainders.len()
    }

    /// Drop every outstanding marker.
    pub fn reset(&self) {
        self.remainders.clear();
    }
}
