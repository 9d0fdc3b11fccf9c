//! Aggregate Roots
//!
//! An aggregate root is the entity through which a cluster of domain
//! objects is changed. It records the events those changes raise until
//! they are published.

use std::sync::Arc;

use super::entity::Entity;
use super::event::{DomainEvent, DomainEvents};

pub trait AggregateRoot: Entity {
    fn domain_events(&self) -> &DomainEvents;

    fn domain_events_mut(&mut self) -> &mut DomainEvents;

    fn raise_event<E: DomainEvent>(&mut self, event: E)
    where
        Self: Sized,
    {
        self.domain_events_mut().raise(event);
    }

    fn clear_events(&mut self) {
        self.domain_events_mut().clear();
    }

    fn take_events(&mut self) -> Vec<Arc<dyn DomainEvent>> {
        self.domain_events_mut().take()
    }
}
