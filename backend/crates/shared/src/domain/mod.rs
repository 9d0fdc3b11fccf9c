//! Domain modelling building blocks

pub mod aggregate;
pub mod entity;
pub mod enumeration;
pub mod error;
pub mod event;
pub mod value_object;
