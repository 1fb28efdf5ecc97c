//! Services
//!
//! Business logic services for the interview coach.

pub mod connection;
pub mod interview;

#[cfg(test)]
pub(crate) mod test_support;
