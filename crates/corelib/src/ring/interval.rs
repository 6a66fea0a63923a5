//! Wraparound-aware interval tests.
//!
//! Both tests measure clockwise distance from the lower bound, which makes
//! the wraparound case identical to the plain one:
//!
//! ```text
//!   id in (low, high]  <=>  0 < d(low, id) <= d(low, high)
//! ```
//!
//! A degenerate interval (`low == high`) is the whole ring: a single node
//! whose predecessor is itself owns every identifier.

use crate::token::{KeyId, Token};

/// Whether `id` lies in the half-open arc `(low, high]`.
///
/// # Example
///
/// ```rust
/// use corelib::ring::in_half_open;
/// use corelib::KeyId;
///
/// // (20, 4] on a 32-slot ring wraps through zero.
/// assert!(in_half_open(KeyId(2), KeyId(20), KeyId(4)));
/// assert!(!in_half_open(KeyId(10), KeyId(20), KeyId(4)));
/// ```
pub fn in_half_open(id: KeyId, low: KeyId, high: KeyId) -> bool {
    if low == high {
        return true;
    }
    let offset = low.distance_to(&id);
    !offset.is_zero() && offset <= low.distance_to(&high)
}

/// Whether `id` lies in the open arc `(low, high)`.
///
/// `low == high` covers every identifier except `low` itself.
pub fn in_open(id: KeyId, low: KeyId, high: KeyId) -> bool {
    if id == low {
        return false;
    }
    if low == high {
        return true;
    }
    low.distance_to(&id) < low.distance_to(&high)
}
