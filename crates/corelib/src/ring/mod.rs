//! Ring arithmetic.
//!
//! Membership tests for arcs of the identifier circle. Every routing and
//! ownership decision in the node reduces to one of these.

pub mod interval;

pub use interval::{in_half_open, in_open};
