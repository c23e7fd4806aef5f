//! Pure rendering: typed view models in, markup strings out.
//!
//! Nothing in here touches the backend or holds state, so every renderer is
//! unit-testable without a live store. All interpolated values pass through
//! [`escape::esc`].

pub mod avatar;
pub mod beat_card;
pub mod comments;
pub mod escape;
pub mod fmt;
pub mod inbox;
pub mod messages;
pub mod profile_header;
pub mod rooms;

pub use escape::esc;
