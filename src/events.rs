//! Typed publish/subscribe bus for loosely coupled UI modules.
//!
//! Publishing is synchronous fan-out and fire-and-forget: the publisher
//! never observes what subscribers do with an event.

use crate::types::PlanetData;

/// Identifier returned by [`EventBus::subscribe`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Events exchanged between the interaction core and UI modules.
#[derive(Clone, Debug, PartialEq)]
pub enum PlanetEvent {
    /// A planet was selected by a single click or tap.
    PlanetSelected(PlanetData),
    /// Request to display the info panel for a planet.
    ShowPlanetInfo(PlanetData),
    /// Request to hide the info panel.
    HidePlanetInfo,
}

/// Discriminant of [`PlanetEvent`], used to filter subscriptions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PlanetEventKind {
    PlanetSelected,
    ShowPlanetInfo,
    HidePlanetInfo,
}

/// Events that can be filtered by kind.
pub trait EventKind {
    type Kind: Copy + PartialEq + Send + Sync + 'static;

    fn kind(&self) -> Self::Kind;
}

impl EventKind for PlanetEvent {
    type Kind = PlanetEventKind;

    fn kind(&self) -> PlanetEventKind {
        match self {
            PlanetEvent::PlanetSelected(_) => PlanetEventKind::PlanetSelected,
            PlanetEvent::ShowPlanetInfo(_) => PlanetEventKind::ShowPlanetInfo,
            PlanetEvent::HidePlanetInfo => PlanetEventKind::HidePlanetInfo,
        }
    }
}

type Handler<E> = Box<dyn FnMut(&E) + Send + Sync>;

struct Subscription<E: EventKind> {
    id: SubscriptionId,
    filter: Option<E::Kind>,
    handler: Handler<E>,
}

/// Subscriber list for one event type.
pub struct EventBus<E: EventKind> {
    subscriptions: Vec<Subscription<E>>,
    next_id: u64,
}

impl<E: EventKind> Default for EventBus<E> {
    fn default() -> Self {
        Self {
            subscriptions: Vec::new(),
            next_id: 0,
        }
    }
}

impl<E: EventKind> EventBus<E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe to events of one kind.
    pub fn subscribe(
        &mut self,
        kind: E::Kind,
        handler: impl FnMut(&E) + Send + Sync + 'static,
    ) -> SubscriptionId {
        self.insert(Some(kind), Box::new(handler))
    }

    /// Subscribe to every event.
    pub fn subscribe_all(
        &mut self,
        handler: impl FnMut(&E) + Send + Sync + 'static,
    ) -> SubscriptionId {
        self.insert(None, Box::new(handler))
    }

    fn insert(&mut self, filter: Option<E::Kind>, handler: Handler<E>) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.subscriptions.push(Subscription {
            id,
            filter,
            handler,
        });
        id
    }

    /// Remove a subscription. Returns false if it was not present.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscriptions.len();
        self.subscriptions.retain(|s| s.id != id);
        self.subscriptions.len() != before
    }

    /// Deliver an event to every matching subscriber.
    pub fn publish(&mut self, event: &E) {
        let kind = event.kind();
        for sub in &mut self.subscriptions {
            if sub.filter.is_none_or(|k| k == kind) {
                (sub.handler)(event);
            }
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscriptions.len()
    }

    pub fn clear(&mut self) {
        self.subscriptions.clear();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;

    #[test]
    fn test_publish_respects_kind_filter() {
        let mut bus = EventBus::<PlanetEvent>::new();
        let seen = Arc::new(Mutex::new(Vec::new()));

        let sink = seen.clone();
        bus.subscribe(PlanetEventKind::PlanetSelected, move |e| {
            sink.lock().unwrap().push(e.clone());
        });

        bus.publish(&PlanetEvent::HidePlanetInfo);
        bus.publish(&PlanetEvent::PlanetSelected(PlanetData::named("Earth")));

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0], PlanetEvent::PlanetSelected(PlanetData::named("Earth")));
    }

    #[test]
    fn test_subscribe_all_and_unsubscribe() {
        let mut bus = EventBus::<PlanetEvent>::new();
        let count = Arc::new(Mutex::new(0));

        let c = count.clone();
        let id = bus.subscribe_all(move |_| *c.lock().unwrap() += 1);
        bus.publish(&PlanetEvent::HidePlanetInfo);
        assert!(bus.unsubscribe(id));
        assert!(!bus.unsubscribe(id));
        bus.publish(&PlanetEvent::HidePlanetInfo);

        assert_eq!(*count.lock().unwrap(), 1);
        assert_eq!(bus.subscriber_count(), 0);
    }
}
