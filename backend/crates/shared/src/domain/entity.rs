//! Entities
//!
//! An entity is identified by its id, not by its attributes. Two entities
//! are the same when their ids match, unless either one is transient
//! (has not been assigned an id yet).

use uuid::Uuid;

use crate::id::Id;

/// An entity identifier that can be in a "not yet assigned" state
pub trait Identity {
    fn is_transient(&self) -> bool;
}

macro_rules! zero_is_transient {
    ($($ty:ty),*) => {
        $(
            impl Identity for $ty {
                #[inline]
                fn is_transient(&self) -> bool {
                    *self == 0
                }
            }
        )*
    };
}

zero_is_transient!(i32, i64, u32, u64);

impl Identity for Uuid {
    #[inline]
    fn is_transient(&self) -> bool {
        self.is_nil()
    }
}

impl<M> Identity for Id<M> {
    #[inline]
    fn is_transient(&self) -> bool {
        self.is_nil()
    }
}

impl Identity for String {
    #[inline]
    fn is_transient(&self) -> bool {
        self.is_empty()
    }
}

impl<T> Identity for Option<T> {
    #[inline]
    fn is_transient(&self) -> bool {
        self.is_none()
    }
}

/// Identity-based equality
///
/// Implement this, then use [`entity_eq!`](crate::entity_eq) to derive
/// `PartialEq`, `Eq` and `Hash` from it.
pub trait Entity {
    type Id: Identity + PartialEq;

    fn id(&self) -> &Self::Id;

    fn is_transient(&self) -> bool {
        self.id().is_transient()
    }

    /// Same instance, or both persisted with equal ids
    fn same_identity(&self, other: &Self) -> bool {
        if std::ptr::eq(self, other) {
            return true;
        }

        if self.is_transient() || other.is_transient() {
            return false;
        }

        self.id() == other.id()
    }
}

/// Implement `PartialEq`, `Eq` and `Hash` for an [`Entity`] by identity
///
/// ```rust
/// use kernel::domain::entity::Entity;
///
/// struct Customer {
///     id: i64,
///     name: String,
/// }
///
/// impl Entity for Customer {
///     type Id = i64;
///     fn id(&self) -> &i64 {
///         &self.id
///     }
/// }
///
/// kernel::entity_eq!(Customer);
///
/// let a = Customer { id: 7, name: "Ann".into() };
/// let b = Customer { id: 7, name: "Ann B.".into() };
/// assert!(a == b);
/// ```
#[macro_export]
macro_rules! entity_eq {
    ($ty:ty) => {
        impl ::std::cmp::PartialEq for $ty {
            fn eq(&self, other: &Self) -> bool {
                $crate::domain::entity::Entity::same_identity(self, other)
            }
        }

        impl ::std::cmp::Eq for $ty {}

        impl ::std::hash::Hash for $ty {
            fn hash<H: ::std::hash::Hasher>(&self, state: &mut H) {
                ::std::hash::Hash::hash($crate::domain::entity::Entity::id(self), state);
            }
        }
    };
}
