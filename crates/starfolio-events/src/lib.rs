//! Typed publish/subscribe channel connecting vehicles, planets, the camera
//! rig, the stores and the HUD.
//!
//! Producers publish [`GalaxyEvent`]s on the [`EventBus`]; each
//! [`Subscription`] owns its own inbox and only receives events published
//! while it was subscribed. There is no replay.

mod bus;
mod event;

pub use bus::{EventBus, Subscription, SubscriptionId};
pub use event::{EggNotice, EventKind, GalaxyEvent, PlanetId};
