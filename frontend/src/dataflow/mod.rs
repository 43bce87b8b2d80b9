//! Reactive state primitives for the Actor+Relay architecture.
//!
//! Every piece of domain state in the calculator is owned by an [`Actor`]
//! (single value) or an [`ActorVec`] (collection) and mutated through its
//! processor task, fed by [`Relay`] event streams. [`Atom`] wraps the same
//! machinery for local UI state (hover flags, dialog visibility).
//!
//! Relays follow the `{source}_{event}_relay` naming convention: they record
//! what happened (`row_blurred_relay`), not what should be done.

pub mod actor;
pub mod actor_vec;
pub mod atom;
pub mod relay;

pub use actor::Actor;
pub use actor_vec::ActorVec;
pub use atom::Atom;
pub use relay::{Relay, relay};
