//! Value Objects
//!
//! A value object has no identity: two instances with the same components
//! are interchangeable. Implement [`ValueObject`] and let
//! [`value_object_eq!`](crate::value_object_eq) derive `PartialEq`, `Eq`
//! and `Hash` from the components.

use std::hash::{Hash, Hasher};

pub trait ValueObject {
    /// The parts that make up the value, compared in order
    type Components<'a>: PartialEq + Hash
    where
        Self: 'a;

    fn equality_components(&self) -> Self::Components<'_>;

    fn value_eq(&self, other: &Self) -> bool {
        std::ptr::eq(self, other) || self.equality_components() == other.equality_components()
    }

    fn value_hash<H: Hasher>(&self, state: &mut H) {
        self.equality_components().hash(state);
    }
}

/// Implement `PartialEq`, `Eq` and `Hash` for a [`ValueObject`]
///
/// ```rust
/// use kernel::domain::value_object::ValueObject;
///
/// struct Money {
///     amount_cents: i64,
///     currency: String,
/// }
///
/// impl ValueObject for Money {
///     type Components<'a> = (i64, &'a str);
///
///     fn equality_components(&self) -> Self::Components<'_> {
///         (self.amount_cents, self.currency.as_str())
///     }
/// }
///
/// kernel::value_object_eq!(Money);
///
/// let a = Money { amount_cents: 500, currency: "EUR".into() };
/// let b = Money { amount_cents: 500, currency: "EUR".into() };
/// assert!(a == b);
/// ```
#[macro_export]
macro_rules! value_object_eq {
    ($ty:ty) => {
        impl ::std::cmp::PartialEq for $ty {
            fn eq(&self, other: &Self) -> bool {
                $crate::domain::value_object::ValueObject::value_eq(self, other)
            }
        }

        impl ::std::cmp::Eq for $ty {}

        impl ::std::hash::Hash for $ty {
            fn hash<H: ::std::hash::Hasher>(&self, state: &mut H) {
                $crate::domain::value_object::ValueObject::value_hash(self, state);
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::hash_map::DefaultHasher;

    #[derive(Debug, Default)]
    struct Address {
        street: String,
        city: String,
        apartment: Option<u16>,
    }

    impl ValueObject for Address {
        type Components<'a> = (&'a str, &'a str, Option<u16>);

        fn equality_components(&self) -> Self::Components<'_> {
            (self.street.as_str(), self.city.as_str(), self.apartment)
        }
    }

    crate::value_object_eq!(Address);

    fn address(street: &str, city: &str) -> Address {
        Address {
            street: street.to_string(),
            city: city.to_string(),
            apartment: None,
        }
    }

    fn hash_of(value: &Address) -> u64 {
        let mut hasher = DefaultHasher::new();
        value.hash(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn test_same_components_are_equal() {
        assert_eq!(address("one", "two"), address("one", "two"));
    }

    #[test]
    fn test_different_components_are_not_equal() {
        assert_ne!(address("one", "two"), address("three", "four"));

        let mut with_apartment = address("one", "two");
        with_apartment.apartment = Some(4);
        assert_ne!(with_apartment, address("one", "two"));
    }

    #[test]
    fn test_same_instance_is_equal() {
        let value = Address::default();
        assert!(value.value_eq(&value));
    }

    #[test]
    fn test_hash_follows_components() {
        assert_eq!(hash_of(&address("one", "two")), hash_of(&address("one", "two")));
        assert_ne!(hash_of(&address("one", "two")), hash_of(&address("three", "four")));
    }
}
