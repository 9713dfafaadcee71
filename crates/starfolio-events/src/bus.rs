//! Fan-out bus over per-subscriber crossbeam channels.

use crossbeam_channel::{Receiver, Sender, TryRecvError};
use tracing::trace;

use crate::event::{EventKind, GalaxyEvent};

/// Handle identifying one subscription on a bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

struct Subscriber {
    id: SubscriptionId,
    /// Empty means every kind.
    kinds: Vec<EventKind>,
    tx: Sender<GalaxyEvent>,
}

impl Subscriber {
    fn wants(&self, kind: EventKind) -> bool {
        self.kinds.is_empty() || self.kinds.contains(&kind)
    }
}

/// Receiving end of a subscription.
///
/// Dropping it unsubscribes; the bus prunes the dead sender on the next
/// publish.
pub struct Subscription {
    id: SubscriptionId,
    rx: Receiver<GalaxyEvent>,
}

impl Subscription {
    /// The id to pass to [`EventBus::unsubscribe`].
    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    /// Next queued event, if any.
    pub fn try_next(&self) -> Option<GalaxyEvent> {
        match self.rx.try_recv() {
            Ok(event) => Some(event),
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => None,
        }
    }

    /// Drain everything currently queued.
    pub fn drain(&self) -> impl Iterator<Item = GalaxyEvent> + '_ {
        self.rx.try_iter()
    }

    /// Number of undelivered events.
    pub fn pending(&self) -> usize {
        self.rx.len()
    }
}

/// Synchronous publish/subscribe hub.
///
/// `publish` enqueues into every matching subscriber before returning, so a
/// consumer draining later in the same frame sees the event in that frame.
/// Events published before a subscription existed are never delivered to it.
#[derive(Default)]
pub struct EventBus {
    subscribers: Vec<Subscriber>,
    next_id: u64,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe to the given kinds. An empty slice subscribes to all kinds.
    pub fn subscribe(&mut self, kinds: &[EventKind]) -> Subscription {
        let (tx, rx) = crossbeam_channel::unbounded();
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.subscribers.push(Subscriber {
            id,
            kinds: kinds.to_vec(),
            tx,
        });
        Subscription { id, rx }
    }

    /// Subscribe to every event kind.
    pub fn subscribe_all(&mut self) -> Subscription {
        self.subscribe(&[])
    }

    /// Remove a subscription. Queued events stay readable on its receiver.
    pub fn unsubscribe(&mut self, id: SubscriptionId) {
        self.subscribers.retain(|s| s.id != id);
    }

    /// Deliver `event` to every live subscriber interested in its kind.
    /// Returns the number of subscribers it reached.
    pub fn publish(&mut self, event: GalaxyEvent) -> usize {
        let kind = event.kind();
        let mut delivered = 0;
        self.subscribers.retain(|sub| {
            if !sub.wants(kind) {
                return true;
            }
            match sub.tx.send(event.clone()) {
                Ok(()) => {
                    delivered += 1;
                    true
                }
                Err(_) => false,
            }
        });
        trace!(?kind, delivered, "event published");
        delivered
    }

    /// Live subscriber count (dead ones are pruned lazily on publish).
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::PlanetId;

    #[test]
    fn test_publish_reaches_matching_subscribers_only() {
        let mut bus = EventBus::new();
        let near = bus.subscribe(&[EventKind::UpdateNearPlanet]);
        let music = bus.subscribe(&[EventKind::MusicPlay, EventKind::MusicStop]);
        let all = bus.subscribe_all();

        let reached = bus.publish(GalaxyEvent::UpdateNearPlanet(Some(PlanetId::new(
            "tech-nebula",
        ))));
        assert_eq!(reached, 2);
        assert_eq!(near.pending(), 1);
        assert_eq!(music.pending(), 0);
        assert_eq!(all.pending(), 1);
    }

    #[test]
    fn test_no_replay_for_late_subscribers() {
        let mut bus = EventBus::new();
        bus.publish(GalaxyEvent::TriggerPlanetEntry);
        let late = bus.subscribe_all();
        assert!(late.try_next().is_none());
        bus.publish(GalaxyEvent::ExitRequested);
        assert_eq!(late.try_next(), Some(GalaxyEvent::ExitRequested));
    }

    #[test]
    fn test_events_arrive_in_publish_order() {
        let mut bus = EventBus::new();
        let sub = bus.subscribe_all();
        bus.publish(GalaxyEvent::CameraLock(true));
        bus.publish(GalaxyEvent::CameraLock(false));
        let got: Vec<_> = sub.drain().collect();
        assert_eq!(
            got,
            vec![GalaxyEvent::CameraLock(true), GalaxyEvent::CameraLock(false)]
        );
    }

    #[test]
    fn test_dropped_subscription_is_pruned() {
        let mut bus = EventBus::new();
        let keep = bus.subscribe_all();
        {
            let _gone = bus.subscribe_all();
        }
        assert_eq!(bus.subscriber_count(), 2);
        assert_eq!(bus.publish(GalaxyEvent::PhotoTaken), 1);
        assert_eq!(bus.subscriber_count(), 1);
        assert_eq!(keep.pending(), 1);
    }

    #[test]
    fn test_unsubscribe_stops_delivery() {
        let mut bus = EventBus::new();
        let sub = bus.subscribe_all();
        bus.unsubscribe(sub.id());
        assert_eq!(bus.publish(GalaxyEvent::MusicPause), 0);
        assert!(sub.try_next().is_none());
    }
}
