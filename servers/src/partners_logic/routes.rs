//! # Partner REST Routes
//!
//! - `GET /api/partners?page=&size=&hasSolutions=`: one page of the joined directory.
//! - `GET /api/partners/joined-json`: the whole joined directory.
//! - `GET /health`: cache status.
//!
//! CORS applies to `/api/**` only. Panics in handlers are turned into the standard
//! 500 error body.

use super::error::ApiError;
use axum::{
    Json, Router,
    extract::{Query, State, rejection::QueryRejection},
    http::{HeaderValue, Method, header::InvalidHeaderValue},
    response::{IntoResponse, Response},
    routing::get,
};
use chrono::{DateTime, Utc};
use lib_partners::core::PageSlice;
use lib_partners::{JoinedCache, PartnerSolution, QueryService};
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::sync::Arc;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{AllowHeaders, CorsLayer};
use tower_http::trace::TraceLayer;

const DEFAULT_PAGE_SIZE: usize = 10;

#[derive(Clone)]
pub struct AppState {
    pub query: QueryService,
    pub cache: Arc<JoinedCache>,
}

impl AppState {
    pub fn new(cache: Arc<JoinedCache>) -> Self {
        Self {
            query: QueryService::new(Arc::clone(&cache)),
            cache,
        }
    }
}

/// Raw query string; values are validated by hand so every bad value gets the
/// same 400 body.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageQuery {
    pub page: Option<String>,
    pub size: Option<String>,
    pub has_solutions: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: usize,
    pub size: usize,
    pub has_solutions: bool,
}

fn parse_int(name: &str, raw: Option<&str>, default: i64) -> Result<i64, ApiError> {
    match raw.map(str::trim).filter(|v| !v.is_empty()) {
        None => Ok(default),
        Some(v) => v.parse::<i64>().map_err(|_| {
            ApiError::InvalidInput(format!("Failed to convert '{name}' value '{v}' to an integer"))
        }),
    }
}

impl TryFrom<PageQuery> for PageRequest {
    type Error = ApiError;

    fn try_from(q: PageQuery) -> Result<Self, Self::Error> {
        let page = parse_int("page", q.page.as_deref(), 0)?;
        let size = parse_int("size", q.size.as_deref(), DEFAULT_PAGE_SIZE as i64)?;

        if page < 0 {
            return Err(ApiError::InvalidInput(
                "Page index must not be less than zero".to_string(),
            ));
        }
        if size < 1 {
            return Err(ApiError::InvalidInput(
                "Page size must not be less than one".to_string(),
            ));
        }

        let has_solutions = match q.has_solutions.as_deref().map(str::trim) {
            None | Some("") => false,
            Some(v) if v.eq_ignore_ascii_case("true") => true,
            Some(v) if v.eq_ignore_ascii_case("false") => false,
            Some(v) => {
                return Err(ApiError::InvalidInput(format!(
                    "Failed to convert 'hasSolutions' value '{v}' to a boolean"
                )));
            }
        };

        let too_large = |_| ApiError::InvalidInput("Page parameters are too large".to_string());
        Ok(PageRequest {
            page: usize::try_from(page).map_err(too_large)?,
            size: usize::try_from(size).map_err(too_large)?,
            has_solutions,
        })
    }
}

/// Page object as consumed by the frontend (`content`, `totalPages`, ...).
#[derive(Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PageResponse {
    pub content: Vec<PartnerSolution>,
    pub total_elements: usize,
    pub total_pages: usize,
    pub number: usize,
    pub size: usize,
    pub number_of_elements: usize,
    pub first: bool,
    pub last: bool,
    pub empty: bool,
}

impl PageResponse {
    fn new(slice: PageSlice, request: &PageRequest) -> Self {
        let total_pages = slice.total_matching.div_ceil(request.size);
        let number_of_elements = slice.items.len();
        Self {
            empty: slice.items.is_empty(),
            content: slice.items,
            total_elements: slice.total_matching,
            total_pages,
            number: request.page,
            size: request.size,
            number_of_elements,
            first: request.page == 0,
            last: request.page.saturating_add(1) >= total_pages,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct HealthResponse {
    status: &'static str,
    cached_partners: usize,
    last_refresh: Option<DateTime<Utc>>,
}

async fn list_partners(
    State(state): State<AppState>,
    query: Result<Query<PageQuery>, QueryRejection>,
) -> Result<Json<PageResponse>, ApiError> {
    let Query(query) = query.map_err(|e| ApiError::InvalidInput(e.body_text()))?;
    let request = PageRequest::try_from(query)?;

    let offset = request.page.saturating_mul(request.size);
    let slice = state
        .query
        .get_page(offset, request.size, request.has_solutions);
    Ok(Json(PageResponse::new(slice, &request)))
}

async fn joined_json(State(state): State<AppState>) -> Json<Vec<PartnerSolution>> {
    Json(state.query.get_all())
}

async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let snapshot = state.cache.snapshot();
    Json(HealthResponse {
        status: if snapshot.is_loaded() { "UP" } else { "STARTING" },
        cached_partners: snapshot.entries.len(),
        last_refresh: snapshot.published_at,
    })
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let details = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        (*s).to_string()
    } else {
        "handler panicked".to_string()
    };
    ApiError::Internal(details).into_response()
}

/// CORS for browser clients on `origin`: GET/POST/PUT/DELETE/OPTIONS, any request
/// header, credentials allowed.
pub fn cors_layer(origin: &str) -> Result<CorsLayer, InvalidHeaderValue> {
    let origin = HeaderValue::from_str(origin)?;
    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        // A literal `*` cannot be combined with credentials.
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true))
}

pub fn app(state: AppState, cors: CorsLayer) -> Router {
    let api = Router::new()
        .route("/partners", get(list_partners))
        .route("/partners/joined-json", get(joined_json))
        .layer(cors);

    Router::new()
        .nest("/api", api)
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .layer(CatchPanicLayer::custom(handle_panic))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use lib_partners::Solution;
    use serde_json::Value;
    use tower::ServiceExt; // for `oneshot`

    fn partner(i: usize) -> PartnerSolution {
        PartnerSolution {
            partner_name: Some(format!("Partner {i}")),
            partner_id: Some(i.to_string()),
            partner_level: Some("Gold".to_string()),
            partner_type: None,
            short_description: None,
            company_overview: None,
            solutions: if i % 2 == 0 {
                vec![Solution {
                    display_name: Some(format!("Solution {i}")),
                    short_description: None,
                }]
            } else {
                Vec::new()
            },
        }
    }

    fn test_app(count: usize) -> (Router, Arc<JoinedCache>) {
        let cache = Arc::new(JoinedCache::new());
        if count > 0 {
            cache.publish((0..count).map(partner).collect());
        }
        let cors = cors_layer("http://localhost:3000").unwrap();
        (app(AppState::new(Arc::clone(&cache)), cors), cache)
    }

    async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn default_page_is_first_ten() {
        let (app, _) = test_app(25);
        let (status, body) = get_json(app, "/api/partners").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["content"].as_array().unwrap().len(), 10);
        assert_eq!(body["totalElements"], 25);
        assert_eq!(body["totalPages"], 3);
        assert_eq!(body["number"], 0);
        assert_eq!(body["first"], true);
        assert_eq!(body["last"], false);
        assert_eq!(body["content"][0]["partnerName"], "Partner 0");
    }

    #[tokio::test]
    async fn last_partial_page() {
        let (app, _) = test_app(25);
        let (status, body) = get_json(app, "/api/partners?page=2&size=10").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["numberOfElements"], 5);
        assert_eq!(body["last"], true);
        assert_eq!(body["empty"], false);
    }

    #[tokio::test]
    async fn page_past_the_end_is_empty_not_an_error() {
        let (app, _) = test_app(25);
        let (status, body) = get_json(app, "/api/partners?page=7&size=10").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["empty"], true);
        assert_eq!(body["totalElements"], 25);
    }

    #[tokio::test]
    async fn has_solutions_filters_before_paging() {
        let (app, _) = test_app(25);
        let (_, body) = get_json(app, "/api/partners?size=100&hasSolutions=true").await;

        // even ids 0..=24
        assert_eq!(body["totalElements"], 13);
        let content = body["content"].as_array().unwrap();
        assert!(content.iter().all(|p| !p["solutions"].as_array().unwrap().is_empty()));
    }

    #[tokio::test]
    async fn invalid_parameters_are_400_with_error_body() {
        for uri in [
            "/api/partners?page=-1",
            "/api/partners?size=0",
            "/api/partners?page=abc",
            "/api/partners?hasSolutions=maybe",
        ] {
            let (app, _) = test_app(5);
            let (status, body) = get_json(app, uri).await;

            assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
            assert_eq!(body["status"], 400);
            assert_eq!(body["message"], "Invalid input");
            assert!(body["details"].is_string());
            assert!(body["timestamp"].is_string());
        }
    }

    #[tokio::test]
    async fn joined_json_returns_everything() {
        let (app, _) = test_app(25);
        let (status, body) = get_json(app, "/api/partners/joined-json").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 25);
    }

    #[tokio::test]
    async fn before_first_refresh_everything_is_empty() {
        let (app, _) = test_app(0);
        let (_, page) = get_json(app.clone(), "/api/partners").await;
        assert_eq!(page["totalElements"], 0);
        assert_eq!(page["totalPages"], 0);

        let (_, all) = get_json(app.clone(), "/api/partners/joined-json").await;
        assert_eq!(all, Value::Array(Vec::new()));

        let (_, health) = get_json(app, "/health").await;
        assert_eq!(health["status"], "STARTING");
        assert_eq!(health["lastRefresh"], Value::Null);
    }

    #[tokio::test]
    async fn health_reports_loaded_cache() {
        let (app, cache) = test_app(3);
        let (status, body) = get_json(app, "/health").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "UP");
        assert_eq!(body["cachedPartners"], 3);
        assert!(body["lastRefresh"].is_string());
        assert!(cache.snapshot().is_loaded());
    }

    #[tokio::test]
    async fn cors_preflight_allows_configured_origin() {
        let (app, _) = test_app(1);
        let request = Request::builder()
            .method(Method::OPTIONS)
            .uri("/api/partners")
            .header(header::ORIGIN, "http://localhost:3000")
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "GET")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        let headers = response.headers();
        assert_eq!(
            headers.get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
            "http://localhost:3000"
        );
        assert_eq!(
            headers.get(header::ACCESS_CONTROL_ALLOW_CREDENTIALS).unwrap(),
            "true"
        );
    }

    #[test]
    fn invalid_origin_is_rejected() {
        assert!(cors_layer("bad\norigin").is_err());
    }

    #[test]
    fn panic_becomes_500() {
        let response = handle_panic(Box::new("boom"));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn page_request_defaults() {
        let request = PageRequest::try_from(PageQuery::default()).unwrap();
        assert_eq!(
            request,
            PageRequest {
                page: 0,
                size: 10,
                has_solutions: false
            }
        );
    }
}
