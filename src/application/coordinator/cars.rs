use serde_json::json;
use tracing::{info, warn};
use validator::Validate;

use super::{
    ConsistencyCoordinator, ensure_unique, find_or_not_found, read_through, warm, write_through,
};
use crate::application::graph::commit;
use crate::domain::entities::{Car, NewCar};
use crate::domain::relationships::CascadeDeletion;
use crate::error::AppError;
use crate::infrastructure::cache::keys::index;

impl ConsistencyCoordinator {
    /// Lists every car and warms the cache with the result.
    pub async fn all_cars(&self) -> Result<Vec<Car>, AppError> {
        let cache = &self.caches().cars;
        let ticket = cache.begin();
        let all = self.store().cars.find_all().await?;
        warm(cache, ticket, &all);
        Ok(all)
    }

    /// Finds a car by id, reading through the cache.
    pub async fn find_car(&self, id: i64) -> Result<Car, AppError> {
        find_or_not_found(
            &self.caches().cars,
            "Car",
            id,
            self.store().cars.find_by_id(id),
        )
        .await
    }

    /// Finds a car by VIN, reading through the cache.
    pub async fn find_car_by_vin(&self, vin: &str) -> Result<Car, AppError> {
        read_through(
            &self.caches().cars,
            index::VIN,
            vin,
            self.store().cars.find_by_vin(vin),
        )
        .await?
        .ok_or_else(|| AppError::not_found("Car not found", json!({ "vin": vin })))
    }

    /// Cars owned by a customer. The customer must exist.
    pub async fn cars_of_customer(&self, customer_id: i64) -> Result<Vec<Car>, AppError> {
        self.find_customer(customer_id).await?;
        self.graph().cars_of_customer(customer_id).await
    }

    pub async fn create_car(&self, input: NewCar) -> Result<Car, AppError> {
        input.validate()?;
        self.check_car_refs(&input, None).await?;

        let created = write_through(
            &self.caches().cars,
            None,
            self.store().cars.create(input),
        )
        .await?;

        info!(
            "Created car #{} for customer #{}",
            created.id, created.customer_id
        );
        Ok(created)
    }

    /// Replaces every attribute of a car. A new `customer_id` moves the car
    /// between the owners' car groups in the same cache step.
    pub async fn update_car(&self, id: i64, input: NewCar) -> Result<Car, AppError> {
        input.validate()?;
        if self.store().cars.find_by_id(id).await?.is_none() {
            return Err(AppError::not_found("Car not found", json!({ "id": id })));
        }
        self.check_car_refs(&input, Some(id)).await?;

        let updated = write_through(
            &self.caches().cars,
            Some(id),
            self.store().cars.update(id, input),
        )
        .await?;

        info!("Updated car #{}", id);
        Ok(updated)
    }

    /// Deletes a car and its service requests. The owner and the service
    /// centers of those requests are untouched.
    pub async fn delete_car(&self, id: i64) -> Result<CascadeDeletion, AppError> {
        let plan = self.plan_car_deletion(id).await?;
        let plan = self.execute_deletion(plan).await?;

        info!(
            "Deleted car #{} with {} service requests",
            id,
            plan.requests.len()
        );
        Ok(plan)
    }

    /// Computes what deleting car `id` would remove, without removing it.
    pub async fn plan_car_deletion(&self, id: i64) -> Result<CascadeDeletion, AppError> {
        let car = self
            .store()
            .cars
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Car not found", json!({ "id": id })))?;

        self.graph().plan_car_deletion(car).await
    }

    /// Moves a car to another customer in one store transaction.
    ///
    /// Both owners' car groups reflect the move as soon as this returns.
    pub async fn transfer_ownership(
        &self,
        car_id: i64,
        new_customer_id: i64,
    ) -> Result<Car, AppError> {
        let car = self
            .store()
            .cars
            .find_by_id(car_id)
            .await?
            .ok_or_else(|| AppError::not_found("Car not found", json!({ "id": car_id })))?;
        let transfer = self.graph().plan_transfer(&car, new_customer_id).await?;

        if transfer.is_noop() {
            return Ok(car);
        }

        let cache = &self.caches().cars;
        let ticket = cache.begin();
        let moved = match self.store().unit_of_work.transfer_car(transfer).await {
            Ok(moved) => moved,
            Err(e) => {
                if matches!(e, AppError::Internal { .. }) {
                    warn!("Transfer of car #{} failed, evicting it", car_id);
                    cache.evict_entity(&car);
                }
                return Err(e);
            }
        };
        commit(cache, ticket, &moved);

        info!(
            "Transferred car #{} from customer #{} to customer #{}",
            car_id, transfer.from_customer_id, transfer.to_customer_id
        );
        Ok(moved)
    }

    async fn check_car_refs(&self, input: &NewCar, own_id: Option<i64>) -> Result<(), AppError> {
        if self
            .store()
            .customers
            .find_by_id(input.customer_id)
            .await?
            .is_none()
        {
            return Err(AppError::not_found(
                "Customer not found",
                json!({ "id": input.customer_id }),
            ));
        }

        ensure_unique(
            self.store().cars.find_by_vin(&input.vin).await?,
            own_id,
            "vin",
            &input.vin,
            "VIN already exists",
        )
    }
}
