use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, patch, post, put},
    Router,
};
use serde::Deserialize;
use serde_json::json;
use tracing::error;

use super::domain::{DiagnosisId, DiagnosisSubmission, IndustryId};
use super::repository::{CatalogRepository, HistoryFilter, HistoryRepository, RepositoryError};
use super::scoring::OptionWeightTable;
use super::service::{CatalogError, DiagnosisService, DiagnosisServiceError};
use super::validation::QuestionnaireDraft;

type SharedService<C, H> = State<Arc<DiagnosisService<C, H>>>;

/// Router builder exposing the catalog, scoring, history and import endpoints.
pub fn diagnosis_router<C, H>(service: Arc<DiagnosisService<C, H>>) -> Router
where
    C: CatalogRepository + 'static,
    H: HistoryRepository + 'static,
{
    Router::new()
        .route(
            "/api/v1/industries",
            get(list_industries_handler::<C, H>).post(create_industry_handler::<C, H>),
        )
        .route(
            "/api/v1/industries/:industry_id",
            put(rename_industry_handler::<C, H>).delete(delete_industry_handler::<C, H>),
        )
        .route(
            "/api/v1/industries/:industry_id/toggle",
            patch(toggle_industry_handler::<C, H>),
        )
        .route(
            "/api/v1/questions/:industry_id",
            get(questionnaire_handler::<C, H>).put(replace_questionnaire_handler::<C, H>),
        )
        .route(
            "/api/v1/scoring/:industry_id",
            get(weights_handler::<C, H>).put(update_weights_handler::<C, H>),
        )
        .route("/api/v1/diagnoses", post(submit_handler::<C, H>))
        .route("/api/v1/history", get(history_handler::<C, H>))
        .route("/api/v1/history/delete", post(bulk_delete_handler::<C, H>))
        .route(
            "/api/v1/history/:diagnosis_id",
            get(record_handler::<C, H>).delete(delete_record_handler::<C, H>),
        )
        .route(
            "/api/v1/import/questions",
            post(import_questions_handler::<C, H>),
        )
        .route(
            "/api/v1/import/feedbacks",
            post(import_feedbacks_handler::<C, H>),
        )
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub(crate) struct IndustryListQuery {
    #[serde(default)]
    include_inactive: bool,
}

#[derive(Debug, Deserialize)]
pub(crate) struct IndustryRequest {
    name: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WeightsRequest {
    weights: Vec<i32>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct BulkDeleteRequest {
    ids: Vec<DiagnosisId>,
}

pub(crate) async fn list_industries_handler<C, H>(
    State(service): SharedService<C, H>,
    Query(query): Query<IndustryListQuery>,
) -> Response
where
    C: CatalogRepository + 'static,
    H: HistoryRepository + 'static,
{
    match service.industries(query.include_inactive) {
        Ok(industries) => (StatusCode::OK, axum::Json(industries)).into_response(),
        Err(other) => error_response(other),
    }
}

pub(crate) async fn create_industry_handler<C, H>(
    State(service): SharedService<C, H>,
    axum::Json(request): axum::Json<IndustryRequest>,
) -> Response
where
    C: CatalogRepository + 'static,
    H: HistoryRepository + 'static,
{
    match service.create_industry(&request.name) {
        Ok(industry) => (StatusCode::CREATED, axum::Json(industry)).into_response(),
        Err(other) => error_response(other),
    }
}

pub(crate) async fn rename_industry_handler<C, H>(
    State(service): SharedService<C, H>,
    Path(industry_id): Path<String>,
    axum::Json(request): axum::Json<IndustryRequest>,
) -> Response
where
    C: CatalogRepository + 'static,
    H: HistoryRepository + 'static,
{
    match service.rename_industry(&IndustryId(industry_id), &request.name) {
        Ok(industry) => (StatusCode::OK, axum::Json(industry)).into_response(),
        Err(other) => error_response(other),
    }
}

pub(crate) async fn toggle_industry_handler<C, H>(
    State(service): SharedService<C, H>,
    Path(industry_id): Path<String>,
) -> Response
where
    C: CatalogRepository + 'static,
    H: HistoryRepository + 'static,
{
    match service.toggle_industry(&IndustryId(industry_id)) {
        Ok(industry) => (StatusCode::OK, axum::Json(industry)).into_response(),
        Err(other) => error_response(other),
    }
}

pub(crate) async fn delete_industry_handler<C, H>(
    State(service): SharedService<C, H>,
    Path(industry_id): Path<String>,
) -> Response
where
    C: CatalogRepository + 'static,
    H: HistoryRepository + 'static,
{
    match service.delete_industry(&IndustryId(industry_id)) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(other) => error_response(other),
    }
}

pub(crate) async fn questionnaire_handler<C, H>(
    State(service): SharedService<C, H>,
    Path(industry_id): Path<String>,
) -> Response
where
    C: CatalogRepository + 'static,
    H: HistoryRepository + 'static,
{
    match service.questionnaire(&IndustryId(industry_id)) {
        Ok(questionnaire) => (StatusCode::OK, axum::Json(questionnaire.as_ref())).into_response(),
        Err(other) => error_response(other),
    }
}

pub(crate) async fn replace_questionnaire_handler<C, H>(
    State(service): SharedService<C, H>,
    Path(industry_id): Path<String>,
    axum::Json(draft): axum::Json<QuestionnaireDraft>,
) -> Response
where
    C: CatalogRepository + 'static,
    H: HistoryRepository + 'static,
{
    match service.replace_questionnaire(&IndustryId(industry_id), draft) {
        Ok(questionnaire) => (StatusCode::OK, axum::Json(questionnaire.as_ref())).into_response(),
        Err(other) => error_response(other),
    }
}

pub(crate) async fn weights_handler<C, H>(
    State(service): SharedService<C, H>,
    Path(industry_id): Path<String>,
) -> Response
where
    C: CatalogRepository + 'static,
    H: HistoryRepository + 'static,
{
    let id = IndustryId(industry_id);
    match service.weights(&id) {
        Ok(weights) => weights_body(&id, &weights),
        Err(other) => error_response(other),
    }
}

pub(crate) async fn update_weights_handler<C, H>(
    State(service): SharedService<C, H>,
    Path(industry_id): Path<String>,
    axum::Json(request): axum::Json<WeightsRequest>,
) -> Response
where
    C: CatalogRepository + 'static,
    H: HistoryRepository + 'static,
{
    let id = IndustryId(industry_id);
    match service.update_weights(&id, OptionWeightTable::new(request.weights)) {
        Ok(weights) => weights_body(&id, &weights),
        Err(other) => error_response(other),
    }
}

pub(crate) async fn submit_handler<C, H>(
    State(service): SharedService<C, H>,
    axum::Json(submission): axum::Json<DiagnosisSubmission>,
) -> Response
where
    C: CatalogRepository + 'static,
    H: HistoryRepository + 'static,
{
    match service.submit(submission) {
        Ok(record) => (StatusCode::CREATED, axum::Json(record)).into_response(),
        Err(other) => error_response(other),
    }
}

pub(crate) async fn history_handler<C, H>(
    State(service): SharedService<C, H>,
    Query(filter): Query<HistoryFilter>,
) -> Response
where
    C: CatalogRepository + 'static,
    H: HistoryRepository + 'static,
{
    match service.history(&filter) {
        Ok(records) => {
            let views: Vec<_> = records.iter().map(|record| record.summary_view()).collect();
            (StatusCode::OK, axum::Json(views)).into_response()
        }
        Err(other) => error_response(other),
    }
}

pub(crate) async fn record_handler<C, H>(
    State(service): SharedService<C, H>,
    Path(diagnosis_id): Path<String>,
) -> Response
where
    C: CatalogRepository + 'static,
    H: HistoryRepository + 'static,
{
    match service.record(&DiagnosisId(diagnosis_id)) {
        Ok(record) => (StatusCode::OK, axum::Json(record)).into_response(),
        Err(other) => error_response(other),
    }
}

pub(crate) async fn delete_record_handler<C, H>(
    State(service): SharedService<C, H>,
    Path(diagnosis_id): Path<String>,
) -> Response
where
    C: CatalogRepository + 'static,
    H: HistoryRepository + 'static,
{
    match service.delete_record(&DiagnosisId(diagnosis_id)) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(other) => error_response(other),
    }
}

pub(crate) async fn bulk_delete_handler<C, H>(
    State(service): SharedService<C, H>,
    axum::Json(request): axum::Json<BulkDeleteRequest>,
) -> Response
where
    C: CatalogRepository + 'static,
    H: HistoryRepository + 'static,
{
    match service.delete_records(&request.ids) {
        Ok(removed) => {
            let payload = json!({
                "requested": request.ids.len(),
                "removed": removed,
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(other) => error_response(other),
    }
}

pub(crate) async fn import_questions_handler<C, H>(
    State(service): SharedService<C, H>,
    body: String,
) -> Response
where
    C: CatalogRepository + 'static,
    H: HistoryRepository + 'static,
{
    match service.import_questions(body.as_bytes()) {
        Ok(summary) => (StatusCode::OK, axum::Json(summary)).into_response(),
        Err(other) => error_response(other),
    }
}

pub(crate) async fn import_feedbacks_handler<C, H>(
    State(service): SharedService<C, H>,
    body: String,
) -> Response
where
    C: CatalogRepository + 'static,
    H: HistoryRepository + 'static,
{
    match service.import_feedbacks(body.as_bytes()) {
        Ok(summary) => (StatusCode::OK, axum::Json(summary)).into_response(),
        Err(other) => error_response(other),
    }
}

fn weights_body(id: &IndustryId, weights: &OptionWeightTable) -> Response {
    let payload = json!({
        "industry_id": id,
        "weights": weights,
    });
    (StatusCode::OK, axum::Json(payload)).into_response()
}

pub(crate) fn status_for(error: &DiagnosisServiceError) -> StatusCode {
    match error {
        DiagnosisServiceError::Questionnaire(_)
        | DiagnosisServiceError::Weights(_)
        | DiagnosisServiceError::Catalog(CatalogError::BlankIndustryName) => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        DiagnosisServiceError::Catalog(
            CatalogError::UnknownIndustry(_) | CatalogError::UnknownDiagnosis(_),
        )
        | DiagnosisServiceError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        DiagnosisServiceError::Catalog(
            CatalogError::FixedIndustry(_)
            | CatalogError::DuplicateIndustryName(_)
            | CatalogError::InactiveIndustry(_),
        )
        | DiagnosisServiceError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
        DiagnosisServiceError::Import(_) => StatusCode::BAD_REQUEST,
        DiagnosisServiceError::Repository(RepositoryError::Unavailable(_)) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

fn error_response(error: DiagnosisServiceError) -> Response {
    let status = status_for(&error);
    if status.is_server_error() {
        error!(error = %error, "diagnosis request failed");
    }

    let payload = json!({
        "error": error.to_string(),
    });
    (status, axum::Json(payload)).into_response()
}
