//! Synchronous event channels.
//!
//! An `EventChannel` is an ordered list of subscriber closures. Dispatch runs
//! every subscriber in registration order before returning. Subscribers only
//! observe; anything that mutates the battle goes through the engine.

use std::collections::HashMap;
use std::fmt::{self, Debug, Formatter};

use hecs::Entity;

use lanebattle_core::enums::EntityKind;
use lanebattle_core::events::BattleEvent;
use lanebattle_core::types::{Position, TeamId};

pub type Subscriber<T> = Box<dyn FnMut(&T) + Send>;

pub struct EventChannel<T> {
    subscribers: Vec<Subscriber<T>>,
}

impl<T> Default for EventChannel<T> {
    fn default() -> Self {
        Self {
            subscribers: Vec::new(),
        }
    }
}

impl<T> Debug for EventChannel<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventChannel")
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

impl<T> EventChannel<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, subscriber: impl FnMut(&T) + Send + 'static) {
        self.subscribers.push(Box::new(subscriber));
    }

    pub fn dispatch(&mut self, event: &T) {
        for subscriber in &mut self.subscribers {
            subscriber(event);
        }
    }

    pub fn len(&self) -> usize {
        self.subscribers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }
}

/// Payload of an entity's destroy channel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DestroyEvent {
    pub entity: Entity,
    pub kind: EntityKind,
    pub team: TeamId,
    pub position: Position,
}

/// Payload of a charge's collision channel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionEvent {
    pub charge: Entity,
    pub struck: Entity,
    /// Where the charge's path entered the struck unit's shape.
    pub point: Position,
    pub damage: f32,
}

/// All channels of a battle plus the per-tick event log.
#[derive(Default)]
pub struct EventHub {
    log: Vec<BattleEvent>,
    listeners: EventChannel<BattleEvent>,
    destroy: HashMap<Entity, EventChannel<DestroyEvent>>,
    collision: HashMap<Entity, EventChannel<CollisionEvent>>,
}

impl EventHub {
    /// Record an event and hand it to every battle-wide listener.
    pub fn emit(&mut self, event: BattleEvent) {
        self.listeners.dispatch(&event);
        self.log.push(event);
    }

    pub fn subscribe(&mut self, listener: impl FnMut(&BattleEvent) + Send + 'static) {
        self.listeners.subscribe(listener);
    }

    pub fn on_destroy(
        &mut self,
        entity: Entity,
        subscriber: impl FnMut(&DestroyEvent) + Send + 'static,
    ) {
        self.destroy.entry(entity).or_default().subscribe(subscriber);
    }

    pub fn on_collision(
        &mut self,
        charge: Entity,
        subscriber: impl FnMut(&CollisionEvent) + Send + 'static,
    ) {
        self.collision.entry(charge).or_default().subscribe(subscriber);
    }

    /// Run the entity's destroy subscribers and drop all of its channels.
    pub fn dispatch_destroy(&mut self, event: &DestroyEvent) {
        self.collision.remove(&event.entity);
        if let Some(mut channel) = self.destroy.remove(&event.entity) {
            channel.dispatch(event);
        }
    }

    pub fn dispatch_collision(&mut self, event: &CollisionEvent) {
        if let Some(channel) = self.collision.get_mut(&event.charge) {
            channel.dispatch(event);
        }
    }

    /// Events recorded since the last `take_events`.
    pub fn events(&self) -> &[BattleEvent] {
        &self.log
    }

    pub fn take_events(&mut self) -> Vec<BattleEvent> {
        std::mem::take(&mut self.log)
    }

    /// Forget every per-entity channel and the log. Battle-wide listeners stay.
    pub fn reset(&mut self) {
        self.log.clear();
        self.destroy.clear();
        self.collision.clear();
    }
}
