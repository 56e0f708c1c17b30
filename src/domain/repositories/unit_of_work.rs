//! Transactional multi-row mutations.

use crate::domain::entities::Car;
use crate::domain::relationships::{CascadeDeletion, OwnershipTransfer};
use crate::error::AppError;
use async_trait::async_trait;

/// Executes mutations that touch several rows inside one store transaction.
///
/// Either every row of a plan changes or none does.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgUnitOfWork`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UnitOfWork: Send + Sync {
    /// Deletes the plan's root with everything referencing it at commit
    /// time: requests first, then cars, then the root.
    ///
    /// The children are collected again under a lock on the root, so the
    /// returned deletion lists the rows actually removed. It differs from
    /// `plan` when a child was attached or moved away after planning.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the root row is already gone.
    /// Returns [`AppError::Internal`] on database errors.
    async fn delete_cascade(&self, plan: &CascadeDeletion) -> Result<CascadeDeletion, AppError>;

    /// Re-points a car to its new owner after locking both customers.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the car or either customer is gone.
    /// Returns [`AppError::Conflict`] if the car's owner is no longer
    /// `transfer.from_customer_id`.
    /// Returns [`AppError::Internal`] on database errors.
    async fn transfer_car(&self, transfer: OwnershipTransfer) -> Result<Car, AppError>;

    /// Checks that the store is reachable.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] if the store cannot be queried.
    async fn ping(&self) -> Result<(), AppError>;
}
