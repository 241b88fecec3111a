use actix_cors::Cors;
use actix_governor::{Governor, GovernorConfigBuilder};
use actix_web::{web, App, HttpServer, Responder, HttpResponse, middleware::Logger};
use dotenv::dotenv;
use serde::Serialize;
use std::env;
use std::path::Path;
use log::{info, error, debug, warn};

mod classifier;
mod dataset;
mod logging;
mod query;

use dataset::Dataset;
use query::RecommendError;

/// Shared, read-only application state. The dataset is loaded once in
/// `main` and never mutated afterwards, so concurrent handlers only
/// ever read it.
struct AppState {
    dataset: Dataset,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
    expected_format: serde_json::Value,
}

fn expected_filter_format() -> serde_json::Value {
    serde_json::json!({
        "foodTypes": ["Veg"],
        "cuisines": ["South Indian"],
        "minPrice": 100,
        "maxPrice": 500
    })
}

async fn health_check(state: web::Data<AppState>) -> impl Responder {
    if state.dataset.is_empty() {
        HttpResponse::Ok().json(serde_json::json!({
            "status": "degraded",
            "message": "Menu dataset is empty or failed to load"
        }))
    } else {
        HttpResponse::Ok().json(serde_json::json!({
            "status": "healthy",
            "message": format!("Serving {} menu items", state.dataset.len())
        }))
    }
}

async fn recommend(
    body: actix_web::web::Bytes,
    state: web::Data<AppState>,
) -> impl Responder {
    let request_id = chrono::Utc::now().format("%Y%m%d%H%M%S%f").to_string();
    info!("Request {}: recommendation request received", request_id);

    // Log raw request body for debugging
    let body_str = String::from_utf8_lossy(&body);
    debug!("Request {}: Raw request body: {}", request_id, body_str);

    // Try to parse the request body
    let spec = match serde_json::from_slice::<query::FilterSpec>(&body) {
        Ok(spec) => spec,
        Err(e) => {
            let error_msg = format!("Invalid request format: {}", e);
            error!("Request {}: {}", request_id, error_msg);

            // Return a helpful error response with expected format
            return HttpResponse::BadRequest().json(ErrorResponse {
                error: error_msg,
                expected_format: expected_filter_format(),
            });
        }
    };

    debug!("Request {}: Parsed filter: {:?}", request_id, spec);

    match query::recommend(state.dataset.items(), &spec) {
        Ok(picks) => {
            info!(
                "Request {}: returning {} recommendations",
                request_id,
                picks.len()
            );
            HttpResponse::Ok().json(picks)
        }
        Err(e @ RecommendError::DatasetUnavailable) => {
            error!("Request {}: {}", request_id, e);
            HttpResponse::ServiceUnavailable().json(serde_json::json!({
                "error": "Server data is empty or not loaded correctly."
            }))
        }
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();

    // Setup logging
    if let Err(e) = logging::setup_logging() {
        eprintln!("Failed to set up logging: {}", e);
        return Ok(());
    }

    let data_file =
        env::var("MENU_DATA_FILE").unwrap_or_else(|_| "data/menu_classified.csv".to_string());

    // A failed load leaves the process serving in a degraded state with
    // an empty dataset; /health reports it and queries return 503.
    let dataset = match dataset::load_dataset(Path::new(&data_file)) {
        Ok(dataset) => dataset,
        Err(e) => {
            error!("Failed to load menu data from {}: {}", data_file, e);
            warn!("Serving with an empty dataset; all queries will fail fast");
            Dataset::empty()
        }
    };

    let state = web::Data::new(AppState { dataset });

    let port = env::var("PORT")
        .ok()
        .and_then(|p| p.parse::<u16>().ok())
        .unwrap_or(5000);

    info!("Starting menumatch server on port {}", port);

    HttpServer::new(move || {
        let governor_config = GovernorConfigBuilder::default()
            .per_second(5)
            .burst_size(10)
            .finish()
            .unwrap();

        App::new()
            .wrap(Logger::default())
            .wrap(Governor::new(&governor_config))
            .wrap(Cors::permissive())
            .app_data(state.clone())
            .route("/health", web::get().to(health_check))
            .route("/api/recommend", web::post().to(recommend))
    })
    .bind(("0.0.0.0", port))?
    .run()
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{http::StatusCode, test};
    use dataset::MenuItem;

    fn item(name: &str, price: f64) -> MenuItem {
        let (food_type, cuisine) = classifier::classify(name);
        MenuItem {
            item_name: name.to_string(),
            restaurant_name: "Test Kitchen".to_string(),
            price,
            food_type,
            cuisine,
            area: None,
        }
    }

    fn app_state(items: Vec<MenuItem>) -> web::Data<AppState> {
        web::Data::new(AppState {
            dataset: Dataset::new(items),
        })
    }

    macro_rules! test_app {
        ($state:expr) => {
            test::init_service(
                App::new()
                    .app_data($state)
                    .route("/health", web::get().to(health_check))
                    .route("/api/recommend", web::post().to(recommend)),
            )
            .await
        };
    }

    #[actix_web::test]
    async fn recommend_returns_matching_items() {
        let state = app_state(vec![
            item("Chicken Biryani", 250.0),
            item("Masala Dosa", 80.0),
            item("Paneer Tikka", 180.0),
        ]);
        let app = test_app!(state);

        let req = test::TestRequest::post()
            .uri("/api/recommend")
            .set_json(serde_json::json!({"foodTypes": ["Veg"], "minPrice": 100}))
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

        let items = body.as_array().unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0]["Item_Name"], "Paneer Tikka");
        assert_eq!(items[0]["Food Type"], "Veg");
    }

    #[actix_web::test]
    async fn recommend_with_no_matches_returns_empty_array() {
        let state = app_state(vec![item("Masala Dosa", 80.0)]);
        let app = test_app!(state);

        let req = test::TestRequest::post()
            .uri("/api/recommend")
            .set_json(serde_json::json!({"cuisines": ["Italian"]}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body, serde_json::json!([]));
    }

    #[actix_web::test]
    async fn recommend_fails_fast_on_empty_dataset() {
        let state = app_state(vec![]);
        let app = test_app!(state);

        let req = test::TestRequest::post()
            .uri("/api/recommend")
            .set_json(serde_json::json!({}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert!(body["error"].as_str().unwrap().contains("not loaded"));
    }

    #[actix_web::test]
    async fn malformed_body_is_a_bad_request() {
        let state = app_state(vec![item("Masala Dosa", 80.0)]);
        let app = test_app!(state);

        let req = test::TestRequest::post()
            .uri("/api/recommend")
            .set_payload("not json")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert!(body["expected_format"].is_object());
    }

    #[actix_web::test]
    async fn health_reports_dataset_state() {
        let state = app_state(vec![item("Masala Dosa", 80.0)]);
        let app = test_app!(state);
        let req = test::TestRequest::get().uri("/health").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["status"], "healthy");

        let degraded = test_app!(app_state(vec![]));
        let req = test::TestRequest::get().uri("/health").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&degraded, req).await;
        assert_eq!(body["status"], "degraded");
    }
}
