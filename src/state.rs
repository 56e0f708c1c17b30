//! Shared application state injected into every handler.

use std::sync::Arc;

use crate::application::coordinator::ConsistencyCoordinator;
use crate::application::services::{
    CarService, CustomerService, ServiceCenterService, ServiceRequestService,
};
use crate::domain::repositories::EntityStore;
use crate::infrastructure::cache::Caches;

/// Services and shared components of one running instance.
///
/// All four services share a single [`ConsistencyCoordinator`] and
/// therefore a single set of caches.
#[derive(Clone)]
pub struct AppState {
    pub customer_service: Arc<CustomerService>,
    pub car_service: Arc<CarService>,
    pub service_center_service: Arc<ServiceCenterService>,
    pub service_request_service: Arc<ServiceRequestService>,
    pub store: EntityStore,
    pub caches: Arc<Caches>,
}

impl AppState {
    /// Wires the services over `store` and `caches`.
    pub fn new(store: EntityStore, caches: Arc<Caches>) -> Self {
        let coordinator = Arc::new(ConsistencyCoordinator::new(store.clone(), caches.clone()));

        Self {
            customer_service: Arc::new(CustomerService::new(coordinator.clone())),
            car_service: Arc::new(CarService::new(coordinator.clone())),
            service_center_service: Arc::new(ServiceCenterService::new(coordinator.clone())),
            service_request_service: Arc::new(ServiceRequestService::new(coordinator)),
            store,
            caches,
        }
    }
}
