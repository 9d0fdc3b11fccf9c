//! Domain Events
//!
//! Aggregates record events while they change; once the change is saved the
//! recorded events are handed to a [`DomainEventPublisher`].
//!
//! ```text
//! aggregate.raise_event(e) ──▶ DomainEvents ──(saved)──▶ publish_pending_events
//!                                                             │
//!                                   EventDispatcher ◀─────────┘
//!                                         │ TypeId(e)
//!                                         ▼
//!                              HandleDomainEvent<E> ...
//! ```

use std::any::{Any, TypeId};
use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use super::error::DomainError;
use crate::error::app_error::AppResult;
use crate::messaging::BoxFuture;
use crate::type_name::short_type_name;

/// Object-safe access to [`Any`] for trait objects
pub trait AsAny: Any {
    fn as_any(&self) -> &dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Something that happened in the domain
pub trait DomainEvent: AsAny + fmt::Debug + Send + Sync {
    /// Short type name, used in logs and handler failures
    fn event_name(&self) -> Cow<'static, str> {
        short_type_name::<Self>()
    }
}

impl dyn DomainEvent {
    pub fn downcast_ref<E: DomainEvent>(&self) -> Option<&E> {
        self.as_any().downcast_ref::<E>()
    }

    pub fn is<E: DomainEvent>(&self) -> bool {
        self.as_any().is::<E>()
    }

    /// `TypeId` of the concrete event behind the trait object
    pub fn event_type_id(&self) -> TypeId {
        self.as_any().type_id()
    }
}

/// Ordered list of events raised by one aggregate
#[derive(Debug, Default, Clone)]
pub struct DomainEvents {
    events: Vec<Arc<dyn DomainEvent>>,
}

impl DomainEvents {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn raise<E: DomainEvent>(&mut self, event: E) {
        tracing::trace!(event = %event.event_name(), "Domain event raised");
        self.events.push(Arc::new(event));
    }

    pub fn events(&self) -> &[Arc<dyn DomainEvent>] {
        &self.events
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    /// Remove and return every recorded event
    pub fn take(&mut self) -> Vec<Arc<dyn DomainEvent>> {
        std::mem::take(&mut self.events)
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

#[trait_variant::make(HandleDomainEvent: Send)]
pub trait LocalHandleDomainEvent<E: DomainEvent> {
    async fn handle(&self, event: &E) -> AppResult<()>;
}

#[trait_variant::make(DomainEventPublisher: Send)]
pub trait LocalDomainEventPublisher {
    async fn publish(&self, event: Arc<dyn DomainEvent>) -> AppResult<()>;
}

type ErasedEventHandler =
    Arc<dyn Fn(Arc<dyn DomainEvent>) -> BoxFuture<'static, AppResult<()>> + Send + Sync>;

/// In-memory publisher
///
/// Routes each event to the handlers subscribed to its concrete type, in
/// subscription order. The first failing handler stops the rest and its
/// error comes back as [`DomainError::EventHandlerFailed`], keeping the
/// handler's error kind.
#[derive(Default, Clone)]
pub struct EventDispatcher {
    handlers: HashMap<TypeId, Vec<ErasedEventHandler>>,
}

impl EventDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<E, H>(&mut self, handler: H) -> &mut Self
    where
        E: DomainEvent,
        H: HandleDomainEvent<E> + Sync + 'static,
    {
        let handler = Arc::new(handler);
        let erased: ErasedEventHandler =
            Arc::new(move |event: Arc<dyn DomainEvent>| -> BoxFuture<'static, AppResult<()>> {
                let handler = Arc::clone(&handler);
                Box::pin(async move {
                    let event: &dyn DomainEvent = &*event;
                    match event.downcast_ref::<E>() {
                        Some(event) => <H as HandleDomainEvent<E>>::handle(&handler, event).await,
                        None => Ok(()),
                    }
                })
            });
        self.handlers
            .entry(TypeId::of::<E>())
            .or_default()
            .push(erased);
        self
    }

    pub fn handler_count<E: DomainEvent>(&self) -> usize {
        self.handlers.get(&TypeId::of::<E>()).map_or(0, Vec::len)
    }
}

impl fmt::Debug for EventDispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventDispatcher")
            .field("event_types", &self.handlers.len())
            .finish()
    }
}

impl DomainEventPublisher for EventDispatcher {
    async fn publish(&self, event: Arc<dyn DomainEvent>) -> AppResult<()> {
        let name = event.event_name();
        let Some(handlers) = self.handlers.get(&event.event_type_id()) else {
            tracing::debug!(event = %name, "No handlers subscribed");
            return Ok(());
        };

        for handler in handlers {
            if let Err(err) = handler(Arc::clone(&event)).await {
                tracing::warn!(event = %name, error = %err, "Domain event handler failed");
                return Err(DomainError::EventHandlerFailed {
                    event: name.into_owned(),
                    kind: err.kind(),
                    reason: err.message().to_string(),
                }
                .into());
            }
        }

        tracing::debug!(event = %name, handlers = handlers.len(), "Domain event published");
        Ok(())
    }
}

/// Publish everything the saved aggregates recorded, then clear them
///
/// Events go out in recorder order, then raise order. If any publish
/// fails the error is returned and no recorder is cleared.
pub async fn publish_pending_events<'a, P, I>(publisher: &P, recorders: I) -> AppResult<usize>
where
    P: DomainEventPublisher + Sync,
    I: IntoIterator<Item = &'a mut DomainEvents>,
{
    let mut recorders: Vec<&'a mut DomainEvents> = recorders.into_iter().collect();
    let pending: Vec<Arc<dyn DomainEvent>> = recorders
        .iter()
        .flat_map(|recorder| recorder.events().iter().cloned())
        .collect();

    for event in &pending {
        <P as DomainEventPublisher>::publish(publisher, Arc::clone(event)).await?;
    }

    for recorder in &mut recorders {
        recorder.clear();
    }

    tracing::info!(count = pending.len(), "Published pending domain events");
    Ok(pending.len())
}
