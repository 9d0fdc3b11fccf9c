//! Enumerations
//!
//! Smart enumerations: a closed set of named values that carry an integer
//! code and a display name, and can be looked up by either.
//!
//! ## Examples
//! ```rust
//! use kernel::domain::enumeration::Enumeration;
//!
//! #[derive(Debug)]
//! pub struct CardType {
//!     value: i32,
//!     name: &'static str,
//! }
//!
//! impl CardType {
//!     pub const AMEX: CardType = CardType { value: 1, name: "Amex" };
//!     pub const VISA: CardType = CardType { value: 2, name: "Visa" };
//! }
//!
//! impl Enumeration for CardType {
//!     fn value(&self) -> i32 {
//!         self.value
//!     }
//!     fn display_name(&self) -> &str {
//!         self.name
//!     }
//!     fn all() -> &'static [Self] {
//!         &[CardType::AMEX, CardType::VISA]
//!     }
//! }
//!
//! kernel::enumeration_impls!(CardType);
//!
//! assert_eq!(CardType::from_value(2).unwrap(), &CardType::VISA);
//! assert_eq!(CardType::AMEX.to_string(), "Amex");
//! assert!(CardType::from_display_name("Diners").is_err());
//! ```

use std::cmp::Ordering;
use std::fmt::Display;

use super::error::{DomainError, DomainResult};
use crate::type_name::short_type_name;

pub trait Enumeration: Sized + 'static {
    fn value(&self) -> i32;

    fn display_name(&self) -> &str;

    /// Every member, in declaration order
    fn all() -> &'static [Self];

    fn from_value(value: i32) -> DomainResult<&'static Self> {
        parse(value, "value", |item: &Self| item.value() == value)
    }

    fn from_display_name(display_name: &str) -> DomainResult<&'static Self> {
        parse(display_name, "display name", |item: &Self| {
            item.display_name() == display_name
        })
    }

    /// `|first - second|` over the integer codes
    fn absolute_difference(first: &Self, second: &Self) -> u32 {
        first.value().abs_diff(second.value())
    }

    fn compare_value(&self, other: &Self) -> Ordering {
        self.value().cmp(&other.value())
    }
}

fn parse<E, K>(key: K, description: &'static str, predicate: impl Fn(&E) -> bool) -> DomainResult<&'static E>
where
    E: Enumeration,
    K: Display,
{
    E::all().iter().find(|&item| predicate(item)).ok_or_else(|| {
        let type_name = short_type_name::<E>();
        tracing::debug!(%key, description, %type_name, "Enumeration lookup failed");
        DomainError::InvalidEnumeration {
            key: key.to_string(),
            description,
            type_name: type_name.into_owned(),
        }
    })
}

/// Implement equality, hashing, ordering and `Display` for an
/// [`Enumeration`] through its integer code and display name
#[macro_export]
macro_rules! enumeration_impls {
    ($ty:ty) => {
        impl ::std::cmp::PartialEq for $ty {
            fn eq(&self, other: &Self) -> bool {
                $crate::domain::enumeration::Enumeration::value(self)
                    == $crate::domain::enumeration::Enumeration::value(other)
            }
        }

        impl ::std::cmp::Eq for $ty {}

        impl ::std::hash::Hash for $ty {
            fn hash<H: ::std::hash::Hasher>(&self, state: &mut H) {
                ::std::hash::Hash::hash(&$crate::domain::enumeration::Enumeration::value(self), state);
            }
        }

        impl ::std::cmp::PartialOrd for $ty {
            fn partial_cmp(&self, other: &Self) -> ::std::option::Option<::std::cmp::Ordering> {
                ::std::option::Option::Some(::std::cmp::Ord::cmp(self, other))
            }
        }

        impl ::std::cmp::Ord for $ty {
            fn cmp(&self, other: &Self) -> ::std::cmp::Ordering {
                $crate::domain::enumeration::Enumeration::compare_value(self, other)
            }
        }

        impl ::std::fmt::Display for $ty {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str($crate::domain::enumeration::Enumeration::display_name(self))
            }
        }
    };
}
