#![allow(dead_code)]

//! In-memory entity store for integration tests.
//!
//! Mirrors the PostgreSQL schema's constraints (unique natural keys, owner
//! checked on transfer) and counts every call so tests can tell cache hits
//! from store reads.

use async_trait::async_trait;
use chrono::Utc;
use futures::future::BoxFuture;
use fixmycar::application::coordinator::ConsistencyCoordinator;
use fixmycar::domain::entities::{
    Car, Customer, NewCar, NewCustomer, NewServiceCenter, NewServiceRequest, ServiceCenter,
    ServiceRequest,
};
use fixmycar::domain::relationships::{CascadeDeletion, CascadeRoot, OwnershipTransfer};
use fixmycar::domain::repositories::{
    CarRepository, CustomerRepository, EntityStore, ServiceCenterRepository,
    ServiceRequestRepository, UnitOfWork,
};
use fixmycar::error::AppError;
use fixmycar::infrastructure::cache::Caches;
use fixmycar::state::AppState;
use parking_lot::Mutex;
use serde_json::json;
use std::collections::{BTreeMap, HashMap};
use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

#[derive(Default)]
struct Tables {
    customers: BTreeMap<i64, Customer>,
    cars: BTreeMap<i64, Car>,
    service_centers: BTreeMap<i64, ServiceCenter>,
    service_requests: BTreeMap<i64, ServiceRequest>,
    next_id: i64,
}

impl Tables {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
    calls: Mutex<HashMap<&'static str, usize>>,
    fail_writes: AtomicBool,
    car_group_hook: Mutex<Option<BoxFuture<'static, ()>>>,
}

fn unique_violation(constraint: &str) -> AppError {
    AppError::conflict(
        "Unique constraint violated",
        json!({ "constraint": constraint }),
    )
}

fn row_not_found() -> AppError {
    AppError::not_found("Record not found", json!({}))
}

impl MemoryStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn entity_store(self: &Arc<Self>) -> EntityStore {
        EntityStore::new(
            self.clone(),
            self.clone(),
            self.clone(),
            self.clone(),
            self.clone(),
        )
    }

    /// Number of times `op` (e.g. `"customers.find_by_id"`) was called.
    pub fn calls(&self, op: &str) -> usize {
        self.calls.lock().get(op).copied().unwrap_or(0)
    }

    /// Makes every following write fail with an internal error.
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Runs `hook` once, between the next `cars.find_by_customer_id` read
    /// and its return, so a write can land while the read is in flight.
    pub fn after_car_group_read(&self, hook: impl Future<Output = ()> + Send + 'static) {
        *self.car_group_hook.lock() = Some(Box::pin(hook));
    }

    fn record(&self, op: &'static str) {
        *self.calls.lock().entry(op).or_insert(0) += 1;
    }

    fn check_write(&self) -> Result<(), AppError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(AppError::internal("Database error", json!({})));
        }
        Ok(())
    }

    // Seeding bypasses the coordinator so nothing reaches the caches.

    pub fn seed_customer(&self, email: &str) -> Customer {
        let mut t = self.tables.lock();
        let id = t.next_id();
        let customer = Customer::new(
            id,
            "Ann".into(),
            "Lee".into(),
            email.into(),
            format!("555-{:04}", id),
        );
        t.customers.insert(id, customer.clone());
        customer
    }

    pub fn seed_car(&self, vin: &str, customer_id: i64) -> Car {
        let mut t = self.tables.lock();
        let id = t.next_id();
        let car = Car::new(id, "VW".into(), "Golf".into(), vin.into(), 2010, customer_id);
        t.cars.insert(id, car.clone());
        car
    }

    pub fn seed_service_center(&self, name: &str) -> ServiceCenter {
        let mut t = self.tables.lock();
        let id = t.next_id();
        let center = ServiceCenter::new(
            id,
            name.into(),
            format!("{} Main St", id),
            format!("555-{:04}", id),
        );
        t.service_centers.insert(id, center.clone());
        center
    }

    pub fn seed_request(&self, car_id: i64, customer_id: i64, center_id: i64) -> ServiceRequest {
        let mut t = self.tables.lock();
        let id = t.next_id();
        let request = ServiceRequest::new(
            id,
            "brake check".into(),
            "PENDING".into(),
            Utc::now(),
            car_id,
            customer_id,
            center_id,
        );
        t.service_requests.insert(id, request.clone());
        request
    }

    pub fn customer_row(&self, id: i64) -> Option<Customer> {
        self.tables.lock().customers.get(&id).cloned()
    }

    pub fn car_row(&self, id: i64) -> Option<Car> {
        self.tables.lock().cars.get(&id).cloned()
    }

    pub fn request_count(&self) -> usize {
        self.tables.lock().service_requests.len()
    }

    pub fn car_count(&self) -> usize {
        self.tables.lock().cars.len()
    }
}

#[async_trait]
impl CustomerRepository for MemoryStore {
    async fn find_all(&self) -> Result<Vec<Customer>, AppError> {
        self.record("customers.find_all");
        Ok(self.tables.lock().customers.values().cloned().collect())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Customer>, AppError> {
        self.record("customers.find_by_id");
        Ok(self.tables.lock().customers.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Customer>, AppError> {
        self.record("customers.find_by_email");
        let t = self.tables.lock();
        Ok(t.customers.values().find(|c| c.email == email).cloned())
    }

    async fn find_by_phone(&self, phone: &str) -> Result<Option<Customer>, AppError> {
        self.record("customers.find_by_phone");
        let t = self.tables.lock();
        Ok(t.customers.values().find(|c| c.phone == phone).cloned())
    }

    async fn create(&self, new_customer: NewCustomer) -> Result<Customer, AppError> {
        self.record("customers.create");
        self.check_write()?;
        let mut t = self.tables.lock();
        if t.customers.values().any(|c| c.email == new_customer.email) {
            return Err(unique_violation("customers_email_key"));
        }
        let id = t.next_id();
        let customer = Customer::new(
            id,
            new_customer.first_name,
            new_customer.last_name,
            new_customer.email,
            new_customer.phone,
        );
        t.customers.insert(id, customer.clone());
        Ok(customer)
    }

    async fn update(&self, id: i64, customer: NewCustomer) -> Result<Customer, AppError> {
        self.record("customers.update");
        self.check_write()?;
        tokio::task::yield_now().await;
        let mut t = self.tables.lock();
        if !t.customers.contains_key(&id) {
            return Err(row_not_found());
        }
        if t
            .customers
            .values()
            .any(|c| c.id != id && c.email == customer.email)
        {
            return Err(unique_violation("customers_email_key"));
        }
        let updated = Customer::new(
            id,
            customer.first_name,
            customer.last_name,
            customer.email,
            customer.phone,
        );
        t.customers.insert(id, updated.clone());
        Ok(updated)
    }
}

#[async_trait]
impl CarRepository for MemoryStore {
    async fn find_all(&self) -> Result<Vec<Car>, AppError> {
        self.record("cars.find_all");
        Ok(self.tables.lock().cars.values().cloned().collect())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Car>, AppError> {
        self.record("cars.find_by_id");
        Ok(self.tables.lock().cars.get(&id).cloned())
    }

    async fn find_by_vin(&self, vin: &str) -> Result<Option<Car>, AppError> {
        self.record("cars.find_by_vin");
        Ok(self.tables.lock().cars.values().find(|c| c.vin == vin).cloned())
    }

    async fn find_by_customer_id(&self, customer_id: i64) -> Result<Vec<Car>, AppError> {
        self.record("cars.find_by_customer_id");
        let cars: Vec<Car> = self
            .tables
            .lock()
            .cars
            .values()
            .filter(|c| c.customer_id == customer_id)
            .cloned()
            .collect();

        let hook = self.car_group_hook.lock().take();
        if let Some(hook) = hook {
            hook.await;
        }
        Ok(cars)
    }

    async fn create(&self, new_car: NewCar) -> Result<Car, AppError> {
        self.record("cars.create");
        self.check_write()?;
        let mut t = self.tables.lock();
        if t.cars.values().any(|c| c.vin == new_car.vin) {
            return Err(unique_violation("cars_vin_key"));
        }
        let id = t.next_id();
        let car = Car::new(
            id,
            new_car.brand,
            new_car.model,
            new_car.vin,
            new_car.year,
            new_car.customer_id,
        );
        t.cars.insert(id, car.clone());
        Ok(car)
    }

    async fn update(&self, id: i64, car: NewCar) -> Result<Car, AppError> {
        self.record("cars.update");
        self.check_write()?;
        let mut t = self.tables.lock();
        if !t.cars.contains_key(&id) {
            return Err(row_not_found());
        }
        let updated = Car::new(id, car.brand, car.model, car.vin, car.year, car.customer_id);
        t.cars.insert(id, updated.clone());
        Ok(updated)
    }
}

#[async_trait]
impl ServiceCenterRepository for MemoryStore {
    async fn find_all(&self) -> Result<Vec<ServiceCenter>, AppError> {
        self.record("service_centers.find_all");
        Ok(self.tables.lock().service_centers.values().cloned().collect())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<ServiceCenter>, AppError> {
        self.record("service_centers.find_by_id");
        Ok(self.tables.lock().service_centers.get(&id).cloned())
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<ServiceCenter>, AppError> {
        self.record("service_centers.find_by_name");
        let t = self.tables.lock();
        Ok(t.service_centers.values().find(|c| c.name == name).cloned())
    }

    async fn find_by_address(&self, address: &str) -> Result<Option<ServiceCenter>, AppError> {
        self.record("service_centers.find_by_address");
        let t = self.tables.lock();
        Ok(t.service_centers
            .values()
            .find(|c| c.address == address)
            .cloned())
    }

    async fn find_by_phone(&self, phone: &str) -> Result<Option<ServiceCenter>, AppError> {
        self.record("service_centers.find_by_phone");
        let t = self.tables.lock();
        Ok(t.service_centers.values().find(|c| c.phone == phone).cloned())
    }

    async fn create(&self, new_center: NewServiceCenter) -> Result<ServiceCenter, AppError> {
        self.record("service_centers.create");
        self.check_write()?;
        let mut t = self.tables.lock();
        let id = t.next_id();
        let center = ServiceCenter::new(id, new_center.name, new_center.address, new_center.phone);
        t.service_centers.insert(id, center.clone());
        Ok(center)
    }

    async fn update(&self, id: i64, center: NewServiceCenter) -> Result<ServiceCenter, AppError> {
        self.record("service_centers.update");
        self.check_write()?;
        let mut t = self.tables.lock();
        if !t.service_centers.contains_key(&id) {
            return Err(row_not_found());
        }
        let updated = ServiceCenter::new(id, center.name, center.address, center.phone);
        t.service_centers.insert(id, updated.clone());
        Ok(updated)
    }
}

#[async_trait]
impl ServiceRequestRepository for MemoryStore {
    async fn find_all(&self) -> Result<Vec<ServiceRequest>, AppError> {
        self.record("service_requests.find_all");
        Ok(self.tables.lock().service_requests.values().cloned().collect())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<ServiceRequest>, AppError> {
        self.record("service_requests.find_by_id");
        Ok(self.tables.lock().service_requests.get(&id).cloned())
    }

    async fn find_by_customer_id(
        &self,
        customer_id: i64,
    ) -> Result<Vec<ServiceRequest>, AppError> {
        self.record("service_requests.find_by_customer_id");
        let t = self.tables.lock();
        Ok(t.service_requests
            .values()
            .filter(|r| r.customer_id == customer_id)
            .cloned()
            .collect())
    }

    async fn find_by_car_id(&self, car_id: i64) -> Result<Vec<ServiceRequest>, AppError> {
        self.record("service_requests.find_by_car_id");
        let t = self.tables.lock();
        Ok(t.service_requests
            .values()
            .filter(|r| r.car_id == car_id)
            .cloned()
            .collect())
    }

    async fn find_by_service_center_id(
        &self,
        service_center_id: i64,
    ) -> Result<Vec<ServiceRequest>, AppError> {
        self.record("service_requests.find_by_service_center_id");
        let t = self.tables.lock();
        Ok(t.service_requests
            .values()
            .filter(|r| r.service_center_id == service_center_id)
            .cloned()
            .collect())
    }

    async fn create(&self, new_request: NewServiceRequest) -> Result<ServiceRequest, AppError> {
        self.record("service_requests.create");
        self.check_write()?;
        let mut t = self.tables.lock();
        let id = t.next_id();
        let request = ServiceRequest::new(
            id,
            new_request.description,
            new_request.status.unwrap_or_else(|| "PENDING".to_string()),
            new_request.created_at.unwrap_or_else(Utc::now),
            new_request.car_id,
            new_request.customer_id,
            new_request.service_center_id,
        );
        t.service_requests.insert(id, request.clone());
        Ok(request)
    }

    async fn update(&self, request: ServiceRequest) -> Result<ServiceRequest, AppError> {
        self.record("service_requests.update");
        self.check_write()?;
        let mut t = self.tables.lock();
        let Some(current) = t.service_requests.get(&request.id) else {
            return Err(row_not_found());
        };
        let updated = ServiceRequest {
            created_at: current.created_at,
            ..request
        };
        t.service_requests.insert(updated.id, updated.clone());
        Ok(updated)
    }
}

#[async_trait]
impl UnitOfWork for MemoryStore {
    async fn delete_cascade(&self, plan: &CascadeDeletion) -> Result<CascadeDeletion, AppError> {
        self.record("unit_of_work.delete_cascade");
        self.check_write()?;
        let mut t = self.tables.lock();

        let root_id = plan.root.id();
        let exists = match &plan.root {
            CascadeRoot::Customer(_) => t.customers.contains_key(&root_id),
            CascadeRoot::Car(_) => t.cars.contains_key(&root_id),
            CascadeRoot::ServiceCenter(_) => t.service_centers.contains_key(&root_id),
            CascadeRoot::ServiceRequest(_) => t.service_requests.contains_key(&root_id),
        };
        if !exists {
            return Err(row_not_found());
        }

        // Children are whatever references the root now, like the locked
        // re-read the PostgreSQL store does.
        let cars: Vec<Car> = match &plan.root {
            CascadeRoot::Customer(_) => t
                .cars
                .values()
                .filter(|c| c.customer_id == root_id)
                .cloned()
                .collect(),
            _ => Vec::new(),
        };
        let requests: Vec<ServiceRequest> = t
            .service_requests
            .values()
            .filter(|r| match &plan.root {
                CascadeRoot::Customer(_) => {
                    r.customer_id == root_id || cars.iter().any(|c| c.id == r.car_id)
                }
                CascadeRoot::Car(_) => r.car_id == root_id,
                CascadeRoot::ServiceCenter(_) => r.service_center_id == root_id,
                CascadeRoot::ServiceRequest(_) => false,
            })
            .cloned()
            .collect();

        for request in &requests {
            t.service_requests.remove(&request.id);
        }
        for car in &cars {
            t.cars.remove(&car.id);
        }
        match &plan.root {
            CascadeRoot::Customer(_) => {
                t.customers.remove(&root_id);
            }
            CascadeRoot::Car(_) => {
                t.cars.remove(&root_id);
            }
            CascadeRoot::ServiceCenter(_) => {
                t.service_centers.remove(&root_id);
            }
            CascadeRoot::ServiceRequest(_) => {
                t.service_requests.remove(&root_id);
            }
        }

        Ok(CascadeDeletion {
            requests,
            cars,
            root: plan.root.clone(),
        })
    }

    async fn transfer_car(&self, transfer: OwnershipTransfer) -> Result<Car, AppError> {
        self.record("unit_of_work.transfer_car");
        self.check_write()?;
        let mut t = self.tables.lock();

        let Some(car) = t.cars.get_mut(&transfer.car_id) else {
            return Err(row_not_found());
        };
        if car.customer_id != transfer.from_customer_id {
            return Err(AppError::conflict(
                "Car changed owner concurrently",
                json!({ "car_id": transfer.car_id }),
            ));
        }
        car.customer_id = transfer.to_customer_id;
        Ok(car.clone())
    }

    async fn ping(&self) -> Result<(), AppError> {
        self.record("unit_of_work.ping");
        Ok(())
    }
}

/// Coordinator over `store` with enabled caches.
pub fn coordinator(store: &Arc<MemoryStore>) -> (Arc<ConsistencyCoordinator>, Arc<Caches>) {
    let caches = Arc::new(Caches::new(true));
    let coordinator = Arc::new(ConsistencyCoordinator::new(
        store.entity_store(),
        caches.clone(),
    ));
    (coordinator, caches)
}

/// Application state over `store` with enabled caches.
pub fn create_test_state(store: &Arc<MemoryStore>) -> AppState {
    AppState::new(store.entity_store(), Arc::new(Caches::new(true)))
}
