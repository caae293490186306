//! YaMDb domain core.
//!
//! Pure building blocks shared by the database and HTTP layers: the error
//! type, id and timestamp aliases, roles, permission predicates, field
//! validators, rating rounding, pagination arithmetic and confirmation codes.
//! Nothing in here performs I/O.

pub mod confirmation;
pub mod error;
pub mod pagination;
pub mod permissions;
pub mod rating;
pub mod roles;
pub mod types;
pub mod validation;
