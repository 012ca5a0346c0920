//! Wire and domain types exchanged with the dashboard backend.

pub mod domain;
pub mod error;
pub mod protocol;
