//! Service layer providing business-oriented CRUD operations on top of models.
//! - Separates business logic from data access.
//! - Reuses entity definitions in the `models` crate.
//! - Provides clear error types and documented interfaces.

pub mod customer_service;
pub mod errors;
pub mod order_service;
pub mod pagination;
#[cfg(test)]
pub mod test_support;
