use crate::app::extract::{AuthUser, JsonBody};
use crate::app::handlers::parse_id;
use crate::app::AppState;
use crate::domain::model::Template;
use crate::utils::error::{AppError, Result};
use crate::utils::validation::non_blank;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct TemplateBody {
    pub title: Option<String>,
    pub content: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct TemplateResponse {
    pub template: Template,
}

#[derive(Debug, Serialize)]
pub struct TemplateListResponse {
    pub templates: Vec<Template>,
}

pub async fn list_templates(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<Json<TemplateListResponse>> {
    let templates = state.templates.list_templates(user.id).await?;
    Ok(Json(TemplateListResponse { templates }))
}

pub async fn create_template(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    JsonBody(body): JsonBody<TemplateBody>,
) -> Result<(StatusCode, Json<TemplateResponse>)> {
    // 標題去除前後空白，內容保留原樣
    let (Some(title), Some(content)) = (
        non_blank(body.title),
        body.content.filter(|c| !c.trim().is_empty()),
    ) else {
        return Err(AppError::validation("Title and content are required"));
    };

    let now = Utc::now();
    let template = state
        .templates
        .insert_template(Template {
            id: Uuid::new_v4(),
            user_id: user.id,
            title,
            content,
            created_at: now,
            updated_at: now,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(TemplateResponse { template })))
}

pub async fn update_template(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
    JsonBody(body): JsonBody<TemplateBody>,
) -> Result<Json<TemplateResponse>> {
    let id = parse_id(&id, "Template")?;
    let mut template = state
        .templates
        .find_template(user.id, id)
        .await?
        .ok_or(AppError::NotFound {
            resource: "Template",
        })?;

    if let Some(title) = non_blank(body.title) {
        template.title = title;
    }
    if let Some(content) = body.content.filter(|c| !c.trim().is_empty()) {
        template.content = content;
    }
    template.updated_at = Utc::now();

    let template = state.templates.save_template(template).await?;
    Ok(Json(TemplateResponse { template }))
}

pub async fn delete_template(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Value>> {
    let id = parse_id(&id, "Template")?;
    if !state.templates.delete_template(user.id, id).await? {
        return Err(AppError::NotFound {
            resource: "Template",
        });
    }

    Ok(Json(json!({ "message": "Template deleted successfully" })))
}
