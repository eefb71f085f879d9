use std::collections::BTreeMap;
use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use log::{debug, error, info};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::age_range::AgeRange;
use crate::category::Gender;
use crate::charts::{self, ChartSpec};
use crate::config::ServerConfig;
use crate::dataset::Dataset;
use crate::error::DashboardError;
use crate::palette::Rgb;
use crate::selector::{GenderSelector, SelectorState};

#[derive(Clone)]
struct ServerState {
    dataset: Arc<Dataset>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ChartParams {
    pub gender: Option<String>,
    pub ages: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct Options {
    pub genders: Vec<Gender>,
    pub gender_options: Vec<&'static str>,
    pub default_gender: &'static str,
    pub age_ranges: Vec<AgeRange>,
    pub color_map: BTreeMap<String, Rgb>,
}

impl Options {
    pub fn from_dataset(dataset: &Dataset) -> Self {
        Options {
            genders: dataset.genders().to_vec(),
            gender_options: GenderSelector::OPTIONS.iter().map(|o| o.label()).collect(),
            default_gender: GenderSelector::default().label(),
            age_ranges: dataset.age_ranges().to_vec(),
            color_map: dataset.color_map().clone(),
        }
    }
}

pub struct ApiError(DashboardError);

impl From<DashboardError> for ApiError {
    fn from(err: DashboardError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = if self.0.is_input_error() {
            StatusCode::BAD_REQUEST
        } else {
            error!("request failed: {}", self.0);
            StatusCode::INTERNAL_SERVER_ERROR
        };
        (status, Json(json!({ "error": self.0.to_string() }))).into_response()
    }
}

/// Resolves one request's selector and renders the charts for it. The
/// selector lives only for the duration of the call.
pub fn charts_for(
    dataset: &Dataset,
    params: &ChartParams,
) -> Result<Vec<ChartSpec>, DashboardError> {
    let selector = SelectorState::from_query(params.gender.as_deref(), params.ages.as_deref())?;
    debug!("rendering charts for {} / {:?}", selector.gender, selector.age_ranges);
    Ok(charts::render(dataset, &selector))
}

pub fn router(dataset: Arc<Dataset>) -> Router {
    Router::new()
        .route("/api/options", get(options_handler))
        .route("/api/charts", get(charts_handler))
        .route("/healthz", get(|| async { "ok" }))
        .with_state(ServerState { dataset })
}

pub async fn serve(config: &ServerConfig, dataset: Arc<Dataset>) -> std::io::Result<()> {
    let addr = config.socket_addr();
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("dashboard listening on http://{addr} ({} records)", dataset.len());
    axum::serve(listener, router(dataset)).await
}

async fn options_handler(State(state): State<ServerState>) -> Json<Options> {
    Json(Options::from_dataset(&state.dataset))
}

async fn charts_handler(
    State(state): State<ServerState>,
    Query(params): Query<ChartParams>,
) -> Result<Json<Vec<ChartSpec>>, ApiError> {
    Ok(Json(charts_for(&state.dataset, &params)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::csv_reader::read_records;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use serde_json::Value;
    use tower::ServiceExt;

    const DATA: &str = "\
Age,Gender,Size,Color,Season,Subscription Status,Age Range
25,Male,M,Gold,Winter,Yes,18-27
30,Female,L,Gold,Winter,No,28-37
";

    fn dataset() -> Dataset {
        Dataset::from_records(read_records(DATA.as_bytes()).unwrap()).unwrap()
    }

    #[test]
    fn options_list_radio_and_checklist_values() {
        let json = serde_json::to_value(Options::from_dataset(&dataset())).unwrap();
        assert_eq!(json["gender_options"], json!(["Male", "Female", "Both"]));
        assert_eq!(json["default_gender"], "Both");
        assert_eq!(json["genders"], json!(["Male", "Female"]));
        assert_eq!(json["age_ranges"], json!(["18-27", "28-37"]));
        assert_eq!(json["color_map"]["Gold"], "rgb(255, 215, 0)");
    }

    #[test]
    fn charts_for_applies_the_request_selector() {
        let params = ChartParams {
            gender: Some("Female".to_string()),
            ages: None,
        };
        let charts = charts_for(&dataset(), &params).unwrap();
        assert_eq!(charts[0].total(), 1);
        assert_eq!(charts[0].slices[0].label, "No");
    }

    #[test]
    fn bad_selectors_are_client_errors() {
        let params = ChartParams {
            gender: Some("Nobody".to_string()),
            ages: None,
        };
        let err = charts_for(&dataset(), &params).unwrap_err();
        assert_eq!(ApiError::from(err).into_response().status(), StatusCode::BAD_REQUEST);
    }

    async fn get_json(uri: &str) -> (StatusCode, Value) {
        let response = router(Arc::new(dataset()))
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn missing_ages_selects_every_range() {
        let (status, json) = get_json("/api/charts").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json.as_array().unwrap().len(), 4);
        assert_eq!(json[0]["id"], "graph1");
        assert_eq!(json[0]["slices"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn empty_ages_yields_empty_charts() {
        let (status, json) = get_json("/api/charts?gender=Both&ages=").await;
        assert_eq!(status, StatusCode::OK);
        for chart in json.as_array().unwrap() {
            assert!(chart["slices"].as_array().unwrap().is_empty());
        }
    }

    #[tokio::test]
    async fn selected_gender_and_range_filter_the_charts() {
        let (status, json) = get_json("/api/charts?gender=Male&ages=18-27,28-37").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            json[0]["slices"],
            json!([{ "label": "Yes", "count": 1, "color": "rgb(0, 163, 108)" }])
        );
    }

    #[tokio::test]
    async fn unknown_gender_returns_a_json_error() {
        let (status, json) = get_json("/api/charts?gender=Nobody").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(json["error"].as_str().unwrap().contains("Nobody"));
    }

    #[tokio::test]
    async fn options_and_health_routes_respond() {
        let (status, json) = get_json("/api/options").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["default_gender"], "Both");

        let response = router(Arc::new(dataset()))
            .oneshot(Request::builder().uri("/healthz").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"ok");
    }
}
