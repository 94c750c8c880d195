/// Pagination state definitions
///
/// The paginator is a small state machine: it sits at a page index until a page
/// yields no links (natural end of the listing) or the next index would reach the
/// configured cap (safety stop).
use std::fmt;

/// Represents where listing traversal currently stands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PagerState {
    /// The listing page with this index is next to be processed
    AtPage(u32),

    /// A listing page yielded zero links; no further pages exist
    Exhausted,

    /// The page cap was reached while pages still yielded links
    Capped,
}

impl PagerState {
    /// Returns true if traversal has ended
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Exhausted | Self::Capped)
    }
}

impl fmt::Display for PagerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AtPage(n) => write!(f, "at page {}", n),
            Self::Exhausted => write!(f, "exhausted"),
            Self::Capped => write!(f, "capped"),
        }
    }
}
