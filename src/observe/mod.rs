//! Observable state publication.
//!
//! Drivers and the run controller push every change through a [`Publisher`];
//! renderers hold a [`StateStream`] and redraw on each event, or poll a
//! [`crate::state::StateView`] snapshot.

/// Event type definitions.
pub mod events;
/// Authoritative view and subscriber fan-out.
pub mod publisher;
/// Subscriber stream handle.
pub mod stream;

pub use events::{EventPayload, StateEvent, SubscriptionId};
pub use publisher::Publisher;
pub use stream::StateStream;
