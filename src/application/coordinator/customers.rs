use serde_json::json;
use tracing::info;
use validator::Validate;

use super::{
    ConsistencyCoordinator, ensure_unique, find_or_not_found, read_through, warm, write_through,
};
use crate::domain::entities::{Customer, NewCustomer};
use crate::domain::relationships::CascadeDeletion;
use crate::error::AppError;
use crate::infrastructure::cache::keys::index;

impl ConsistencyCoordinator {
    /// Lists every customer and warms the cache with the result.
    pub async fn all_customers(&self) -> Result<Vec<Customer>, AppError> {
        let cache = &self.caches().customers;
        let ticket = cache.begin();
        let all = self.store().customers.find_all().await?;
        warm(cache, ticket, &all);
        Ok(all)
    }

    /// Finds a customer by id, reading through the cache.
    pub async fn find_customer(&self, id: i64) -> Result<Customer, AppError> {
        find_or_not_found(
            &self.caches().customers,
            "Customer",
            id,
            self.store().customers.find_by_id(id),
        )
        .await
    }

    /// Finds a customer by email, reading through the cache.
    pub async fn find_customer_by_email(&self, email: &str) -> Result<Customer, AppError> {
        read_through(
            &self.caches().customers,
            index::EMAIL,
            email,
            self.store().customers.find_by_email(email),
        )
        .await?
        .ok_or_else(|| AppError::not_found("Customer not found", json!({ "email": email })))
    }

    pub async fn create_customer(&self, input: NewCustomer) -> Result<Customer, AppError> {
        input.validate()?;
        self.check_customer_keys(&input, None).await?;

        let created = write_through(
            &self.caches().customers,
            None,
            self.store().customers.create(input),
        )
        .await?;

        info!("Created customer #{}", created.id);
        Ok(created)
    }

    /// Replaces every attribute of a customer. Changed email or phone keys
    /// are evicted together with the old value.
    pub async fn update_customer(
        &self,
        id: i64,
        input: NewCustomer,
    ) -> Result<Customer, AppError> {
        input.validate()?;
        if self.store().customers.find_by_id(id).await?.is_none() {
            return Err(AppError::not_found("Customer not found", json!({ "id": id })));
        }
        self.check_customer_keys(&input, Some(id)).await?;

        let updated = write_through(
            &self.caches().customers,
            Some(id),
            self.store().customers.update(id, input),
        )
        .await?;

        info!("Updated customer #{}", id);
        Ok(updated)
    }

    /// Deletes a customer together with its cars and every service request
    /// referencing the customer or one of its cars.
    pub async fn delete_customer(&self, id: i64) -> Result<CascadeDeletion, AppError> {
        let plan = self.plan_customer_deletion(id).await?;
        let plan = self.execute_deletion(plan).await?;

        info!(
            "Deleted customer #{} with {} cars and {} service requests",
            id,
            plan.cars.len(),
            plan.requests.len()
        );
        Ok(plan)
    }

    /// Computes what deleting customer `id` would remove, without removing it.
    pub async fn plan_customer_deletion(&self, id: i64) -> Result<CascadeDeletion, AppError> {
        let customer = self
            .store()
            .customers
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Customer not found", json!({ "id": id })))?;

        self.graph().plan_customer_deletion(customer).await
    }

    async fn check_customer_keys(
        &self,
        input: &NewCustomer,
        own_id: Option<i64>,
    ) -> Result<(), AppError> {
        let customers = &self.store().customers;

        ensure_unique(
            customers.find_by_email(&input.email).await?,
            own_id,
            "email",
            &input.email,
            "Email already exists",
        )?;
        ensure_unique(
            customers.find_by_phone(&input.phone).await?,
            own_id,
            "phone",
            &input.phone,
            "Phone already exists",
        )
    }
}
