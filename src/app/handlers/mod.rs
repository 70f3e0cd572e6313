pub mod ai;
pub mod auth;
pub mod proposals;
pub mod templates;

use crate::utils::error::AppError;
use axum::Json;
use serde_json::{json, Value};
use uuid::Uuid;

pub async fn health_check() -> Json<Value> {
    Json(json!({ "status": "OK", "message": "ProposalPilot API is running" }))
}

/// 無法解析的 id 與不存在的文件一律回 404
pub(crate) fn parse_id(raw: &str, resource: &'static str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| AppError::NotFound { resource })
}
