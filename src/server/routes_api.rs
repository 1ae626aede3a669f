use crate::server::error::AppError;
use crate::server::AppContext;
use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use mintari_common::{paths, Error, ImageRecordId};
use mintari_db::models::ImageRecord;
use serde::{Deserialize, Serialize};

const DEFAULT_LIMIT: u32 = 50;
const MAX_LIMIT: u32 = 200;

pub fn api_routes() -> Router<AppContext> {
    Router::new()
        .route("/records", get(list_records))
        .route("/records/:id", get(get_record))
}

/// A record plus the public URLs of its files.
#[derive(Debug, Serialize)]
pub struct RecordResponse {
    #[serde(flatten)]
    pub record: ImageRecord,
    pub original_url: String,
    pub transformed_url: Option<String>,
}

impl From<ImageRecord> for RecordResponse {
    fn from(record: ImageRecord) -> Self {
        Self {
            original_url: paths::media_url(&record.original_reference),
            transformed_url: record.transformed_reference.as_deref().map(paths::media_url),
            record,
        }
    }
}

#[derive(Deserialize)]
struct ListRecordsQuery {
    limit: Option<u32>,
}

async fn list_records(
    State(ctx): State<AppContext>,
    Query(params): Query<ListRecordsQuery>,
) -> Result<Json<Vec<RecordResponse>>, AppError> {
    let limit = params.limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT);
    let records = ctx.records.list_recent(limit)?;
    Ok(Json(records.into_iter().map(RecordResponse::from).collect()))
}

async fn get_record(
    State(ctx): State<AppContext>,
    Path(id): Path<String>,
) -> Result<Json<RecordResponse>, AppError> {
    let id: ImageRecordId = id
        .parse()
        .map_err(|_| Error::invalid_input(format!("invalid record id: {}", id)))?;

    let record = ctx
        .records
        .get(id)?
        .ok_or_else(|| Error::not_found(format!("record {}", id)))?;

    Ok(Json(record.into()))
}
