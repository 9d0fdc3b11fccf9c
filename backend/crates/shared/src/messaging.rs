//! Command / Query messaging
//!
//! Handlers are registered once per message type in a [`Messages`]
//! registry, which then routes each dispatched message to its handler.
//!
//! ```text
//! caller ── dispatch(cmd) ──▶ Messages ── TypeId(cmd) ──▶ CommandHandler<Cmd>
//! caller ── dispatch_query(q) ──▶ Messages ── TypeId(q) ──▶ QueryHandler<Q>
//! ```

use std::any::{Any, TypeId, type_name};
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use thiserror::Error;

use crate::error::{app_error::AppError, app_error::AppResult, kind::ErrorKind};

/// Heap-allocated, type-erased future
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Marker for messages that change state
pub trait Command: Send + 'static {}

/// Marker for messages that read state
pub trait Query: Send + 'static {
    type Output: Send + 'static;
}

#[trait_variant::make(CommandHandler: Send)]
pub trait LocalCommandHandler<C: Command> {
    async fn handle(&self, command: C) -> AppResult<()>;
}

#[trait_variant::make(QueryHandler: Send)]
pub trait LocalQueryHandler<Q: Query> {
    async fn handle(&self, query: Q) -> AppResult<Q::Output>;
}

#[trait_variant::make(CommandDispatcher: Send)]
pub trait LocalCommandDispatcher {
    async fn dispatch<C: Command>(&self, command: C) -> AppResult<()>;
}

#[trait_variant::make(QueryDispatcher: Send)]
pub trait LocalQueryDispatcher {
    async fn dispatch_query<Q: Query>(&self, query: Q) -> AppResult<Q::Output>;
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessagingError {
    #[error("No handler registered for {message}")]
    HandlerNotRegistered { message: &'static str },
}

impl From<MessagingError> for AppError {
    fn from(err: MessagingError) -> Self {
        AppError::new(ErrorKind::InternalServerError, err.to_string()).with_source(err)
    }
}

type ErasedCommandHandler<C> = Arc<dyn Fn(C) -> BoxFuture<'static, AppResult<()>> + Send + Sync>;
type ErasedQueryHandler<Q> =
    Arc<dyn Fn(Q) -> BoxFuture<'static, AppResult<<Q as Query>::Output>> + Send + Sync>;

/// Handler registry and dispatcher
#[derive(Default)]
pub struct Messages {
    handlers: HashMap<TypeId, Box<dyn Any + Send + Sync>>,
}

impl Messages {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the handler for command type `C`, replacing any previous one
    pub fn register_command<C, H>(&mut self, handler: H) -> &mut Self
    where
        C: Command,
        H: CommandHandler<C> + Sync + 'static,
    {
        let handler = Arc::new(handler);
        let erased: ErasedCommandHandler<C> =
            Arc::new(move |command: C| -> BoxFuture<'static, AppResult<()>> {
                let handler = Arc::clone(&handler);
                Box::pin(async move { <H as CommandHandler<C>>::handle(&handler, command).await })
            });
        self.insert::<C>(Box::new(erased));
        self
    }

    /// Register the handler for query type `Q`, replacing any previous one
    pub fn register_query<Q, H>(&mut self, handler: H) -> &mut Self
    where
        Q: Query,
        H: QueryHandler<Q> + Sync + 'static,
    {
        let handler = Arc::new(handler);
        let erased: ErasedQueryHandler<Q> =
            Arc::new(move |query: Q| -> BoxFuture<'static, AppResult<Q::Output>> {
                let handler = Arc::clone(&handler);
                Box::pin(async move { <H as QueryHandler<Q>>::handle(&handler, query).await })
            });
        self.insert::<Q>(Box::new(erased));
        self
    }

    pub fn has_handler<M: 'static>(&self) -> bool {
        self.handlers.contains_key(&TypeId::of::<M>())
    }

    fn insert<M: 'static>(&mut self, handler: Box<dyn Any + Send + Sync>) {
        if self.handlers.insert(TypeId::of::<M>(), handler).is_some() {
            tracing::warn!(message = type_name::<M>(), "Replaced existing message handler");
        }
    }

    fn lookup<M: 'static, H: Clone + 'static>(&self) -> Result<H, MessagingError> {
        self.handlers
            .get(&TypeId::of::<M>())
            .and_then(|handler| handler.downcast_ref::<H>())
            .cloned()
            .ok_or_else(|| {
                tracing::warn!(message = type_name::<M>(), "No handler registered");
                MessagingError::HandlerNotRegistered {
                    message: type_name::<M>(),
                }
            })
    }
}

impl CommandDispatcher for Messages {
    async fn dispatch<C: Command>(&self, command: C) -> AppResult<()> {
        let handler = self.lookup::<C, ErasedCommandHandler<C>>()?;
        tracing::debug!(command = type_name::<C>(), "Dispatching command");
        handler(command).await
    }
}

impl QueryDispatcher for Messages {
    async fn dispatch_query<Q: Query>(&self, query: Q) -> AppResult<Q::Output> {
        let handler = self.lookup::<Q, ErasedQueryHandler<Q>>()?;
        tracing::debug!(query = type_name::<Q>(), "Dispatching query");
        handler(query).await
    }
}
