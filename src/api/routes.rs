//! API route configuration.

use crate::api::handlers::{cars, customers, service_centers, service_requests};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, patch, post, put},
};

/// All REST routes, nested under `/api`.
///
/// # Endpoints
///
/// - `GET|POST        /customers`
/// - `GET             /customers/by-email/{email}`
/// - `GET|PUT|DELETE  /customers/{id}`
/// - `GET             /customers/{id}/cars`
/// - `GET             /customers/{id}/requests`
/// - `GET|POST        /cars`
/// - `POST            /cars/bulk`
/// - `GET             /cars/by-vin/{vin}`
/// - `GET|PUT|DELETE  /cars/{id}`
/// - `PUT             /cars/{id}/owner` - transfer ownership
/// - `GET             /cars/{id}/requests`
/// - `GET|POST        /service-centers`
/// - `GET             /service-centers/by-name/{name}`
/// - `GET|PUT|DELETE  /service-centers/{id}`
/// - `GET             /service-centers/{id}/requests`
/// - `PUT|DELETE      /service-centers/{id}/requests/{request_id}`
/// - `GET|POST        /requests`
/// - `GET|PUT|DELETE  /requests/{id}`
/// - `PATCH           /requests/{id}/status`
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/customers",
            get(customers::list_customers_handler).post(customers::create_customer_handler),
        )
        .route(
            "/customers/by-email/{email}",
            get(customers::get_customer_by_email_handler),
        )
        .route(
            "/customers/{id}",
            get(customers::get_customer_handler)
                .put(customers::update_customer_handler)
                .delete(customers::delete_customer_handler),
        )
        .route("/customers/{id}/cars", get(customers::customer_cars_handler))
        .route(
            "/customers/{id}/requests",
            get(customers::customer_requests_handler),
        )
        .route(
            "/cars",
            get(cars::list_cars_handler).post(cars::create_car_handler),
        )
        .route("/cars/bulk", post(cars::create_cars_bulk_handler))
        .route("/cars/by-vin/{vin}", get(cars::get_car_by_vin_handler))
        .route(
            "/cars/{id}",
            get(cars::get_car_handler)
                .put(cars::update_car_handler)
                .delete(cars::delete_car_handler),
        )
        .route("/cars/{id}/owner", put(cars::transfer_car_handler))
        .route("/cars/{id}/requests", get(cars::car_requests_handler))
        .route(
            "/service-centers",
            get(service_centers::list_service_centers_handler)
                .post(service_centers::create_service_center_handler),
        )
        .route(
            "/service-centers/by-name/{name}",
            get(service_centers::get_service_center_by_name_handler),
        )
        .route(
            "/service-centers/{id}",
            get(service_centers::get_service_center_handler)
                .put(service_centers::update_service_center_handler)
                .delete(service_centers::delete_service_center_handler),
        )
        .route(
            "/service-centers/{id}/requests",
            get(service_centers::service_center_requests_handler),
        )
        .route(
            "/service-centers/{id}/requests/{request_id}",
            put(service_centers::add_request_handler)
                .delete(service_centers::remove_request_handler),
        )
        .route(
            "/requests",
            get(service_requests::list_requests_handler)
                .post(service_requests::create_request_handler),
        )
        .route(
            "/requests/{id}",
            get(service_requests::get_request_handler)
                .put(service_requests::update_request_handler)
                .delete(service_requests::delete_request_handler),
        )
        .route(
            "/requests/{id}/status",
            patch(service_requests::update_status_handler),
        )
}
