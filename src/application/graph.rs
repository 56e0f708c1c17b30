//! Relationship graph over the four entity kinds.
//!
//! Associations are stored one way only: a child row carries its parent's
//! id. The reverse views ("cars of customer X") are derived from the store
//! and cached as groups in the child's [`IndexedCache`], so they are rebuilt
//! from the source of truth instead of being trusted across restarts.

use serde_json::json;
use std::collections::BTreeMap;
use std::future::Future;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::domain::entities::{Car, Customer, ServiceCenter, ServiceRequest};
use crate::domain::relationships::{CascadeDeletion, CascadeRoot, OwnershipTransfer};
use crate::domain::repositories::EntityStore;
use crate::error::AppError;
use crate::infrastructure::cache::keys::group;
use crate::infrastructure::cache::{Cacheable, Caches, GroupKey, IndexedCache, ReadTicket};

/// Translates one logical mutation into the rows and cache keys it touches.
pub struct RelationshipGraph {
    store: EntityStore,
    caches: Arc<Caches>,
}

impl RelationshipGraph {
    pub fn new(store: EntityStore, caches: Arc<Caches>) -> Self {
        Self { store, caches }
    }

    pub fn store(&self) -> &EntityStore {
        &self.store
    }

    pub fn caches(&self) -> &Caches {
        &self.caches
    }

    /// Cars owned by `customer_id`, served from the group cache when the
    /// group is complete.
    pub async fn cars_of_customer(&self, customer_id: i64) -> Result<Vec<Car>, AppError> {
        read_group(
            &self.caches.cars,
            GroupKey::new(group::CUSTOMER, customer_id),
            self.store.cars.find_by_customer_id(customer_id),
        )
        .await
    }

    /// Requests filed for `customer_id`.
    pub async fn requests_of_customer(
        &self,
        customer_id: i64,
    ) -> Result<Vec<ServiceRequest>, AppError> {
        read_group(
            &self.caches.service_requests,
            GroupKey::new(group::CUSTOMER, customer_id),
            self.store.service_requests.find_by_customer_id(customer_id),
        )
        .await
    }

    /// Requests filed for `car_id`.
    pub async fn requests_of_car(&self, car_id: i64) -> Result<Vec<ServiceRequest>, AppError> {
        read_group(
            &self.caches.service_requests,
            GroupKey::new(group::CAR, car_id),
            self.store.service_requests.find_by_car_id(car_id),
        )
        .await
    }

    /// Requests handled by `service_center_id`.
    pub async fn requests_of_service_center(
        &self,
        service_center_id: i64,
    ) -> Result<Vec<ServiceRequest>, AppError> {
        read_group(
            &self.caches.service_requests,
            GroupKey::new(group::SERVICE_CENTER, service_center_id),
            self.store
                .service_requests
                .find_by_service_center_id(service_center_id),
        )
        .await
    }

    /// Collects everything deleting `customer` removes: its requests, the
    /// requests of each of its cars, and the cars themselves.
    ///
    /// Plans are always read from the store, never from cached groups.
    pub async fn plan_customer_deletion(
        &self,
        customer: Customer,
    ) -> Result<CascadeDeletion, AppError> {
        let cars = self.store.cars.find_by_customer_id(customer.id).await?;

        let mut requests: BTreeMap<i64, ServiceRequest> = BTreeMap::new();
        for request in self
            .store
            .service_requests
            .find_by_customer_id(customer.id)
            .await?
        {
            requests.insert(request.id, request);
        }
        for car in &cars {
            for request in self.store.service_requests.find_by_car_id(car.id).await? {
                requests.entry(request.id).or_insert(request);
            }
        }

        Ok(CascadeDeletion {
            requests: requests.into_values().collect(),
            cars,
            root: CascadeRoot::Customer(customer),
        })
    }

    /// Collects the requests of `car`. The owner is left alone.
    pub async fn plan_car_deletion(&self, car: Car) -> Result<CascadeDeletion, AppError> {
        let requests = self.store.service_requests.find_by_car_id(car.id).await?;

        Ok(CascadeDeletion {
            requests,
            cars: Vec::new(),
            root: CascadeRoot::Car(car),
        })
    }

    /// Collects the requests handled by `center`. Their cars and customers
    /// are left alone.
    pub async fn plan_service_center_deletion(
        &self,
        center: ServiceCenter,
    ) -> Result<CascadeDeletion, AppError> {
        let requests = self
            .store
            .service_requests
            .find_by_service_center_id(center.id)
            .await?;

        Ok(CascadeDeletion {
            requests,
            cars: Vec::new(),
            root: CascadeRoot::ServiceCenter(center),
        })
    }

    /// A request has no children.
    pub fn plan_request_deletion(&self, request: ServiceRequest) -> CascadeDeletion {
        CascadeDeletion::root_only(CascadeRoot::ServiceRequest(request))
    }

    /// Plans moving `car` to `new_customer_id` after checking the new owner
    /// exists in the store.
    pub async fn plan_transfer(
        &self,
        car: &Car,
        new_customer_id: i64,
    ) -> Result<OwnershipTransfer, AppError> {
        if self
            .store
            .customers
            .find_by_id(new_customer_id)
            .await?
            .is_none()
        {
            return Err(AppError::not_found(
                "Customer not found",
                json!({ "id": new_customer_id }),
            ));
        }

        Ok(OwnershipTransfer {
            car_id: car.id,
            from_customer_id: car.customer_id,
            to_customer_id: new_customer_id,
        })
    }

    /// Evicts every entity of an executed plan, children before parents,
    /// and forgets the groups keyed by the deleted entities.
    pub fn apply_deletion(&self, plan: &CascadeDeletion) {
        let requests = &self.caches.service_requests;
        let cars = &self.caches.cars;

        for request in &plan.requests {
            requests.evict_entity(request);
        }
        for car in &plan.cars {
            cars.evict_entity(car);
            requests.evict_group(GroupKey::new(group::CAR, car.id));
        }

        match &plan.root {
            CascadeRoot::ServiceRequest(request) => {
                requests.evict_entity(request);
            }
            CascadeRoot::Car(car) => {
                cars.evict_entity(car);
                requests.evict_group(GroupKey::new(group::CAR, car.id));
            }
            CascadeRoot::Customer(customer) => {
                self.caches.customers.evict_entity(customer);
                cars.evict_group(GroupKey::new(group::CUSTOMER, customer.id));
                requests.evict_group(GroupKey::new(group::CUSTOMER, customer.id));
            }
            CascadeRoot::ServiceCenter(center) => {
                self.caches.service_centers.evict_entity(center);
                requests.evict_group(GroupKey::new(group::SERVICE_CENTER, center.id));
            }
        }

        debug!(
            "Evicted {} rows of {} #{} cascade",
            plan.row_count(),
            plan.root.kind(),
            plan.root.id()
        );
    }
}

/// Stores the committed `value` if nothing raced the write that produced
/// it; otherwise evicts every access path it may occupy.
pub(crate) fn commit<T: Cacheable>(cache: &IndexedCache<T>, ticket: ReadTicket, value: &T) {
    if !cache.put_fresh(ticket, value.clone()) {
        cache.evict_entity(value);
        warn!(
            "Concurrent write on {}#{}, entry evicted",
            cache.name(),
            value.id()
        );
    }
}

async fn read_group<T, F>(
    cache: &IndexedCache<T>,
    key: GroupKey,
    load: F,
) -> Result<Vec<T>, AppError>
where
    T: Cacheable,
    F: Future<Output = Result<Vec<T>, AppError>>,
{
    if let Some(members) = cache.get_group(key) {
        return Ok(members);
    }

    let ticket = cache.begin();
    let members = load.await?;
    cache.put_group(ticket, key, members.clone());
    Ok(members)
}
