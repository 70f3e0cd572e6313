use crate::app::extract::{AuthUser, JsonBody};
use crate::app::handlers::parse_id;
use crate::app::AppState;
use crate::domain::model::{
    Proposal, ProposalSections, ProposalStatus, ProposalSummary, SectionsPatch, DEFAULT_TONE,
};
use crate::utils::error::{AppError, Result};
use crate::utils::validation::non_blank;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

const REQUIRED_FIELDS_MESSAGE: &str = "Client name, project title, and description are required";

/// 建立與更新共用；id、擁有者與時間戳記不接受客戶端修改
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProposalBody {
    pub client_name: Option<String>,
    pub client_company: Option<String>,
    pub project_title: Option<String>,
    pub project_description: Option<String>,
    pub budget_range: Option<String>,
    pub timeline_preference: Option<String>,
    pub services: Option<Vec<String>>,
    pub tone: Option<String>,
    pub sections: Option<SectionsPatch>,
    pub status: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ProposalResponse {
    pub proposal: Proposal,
}

#[derive(Debug, Serialize)]
pub struct ProposalListResponse {
    pub proposals: Vec<ProposalSummary>,
}

pub async fn list_proposals(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<Json<ProposalListResponse>> {
    let proposals = state.proposals.list_proposals(user.id).await?;
    Ok(Json(ProposalListResponse {
        proposals: proposals.iter().map(ProposalSummary::from).collect(),
    }))
}

pub async fn get_proposal(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
) -> Result<Json<ProposalResponse>> {
    let proposal = find_owned(&state, user.id, &id).await?;
    Ok(Json(ProposalResponse { proposal }))
}

pub async fn create_proposal(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    JsonBody(body): JsonBody<ProposalBody>,
) -> Result<(StatusCode, Json<ProposalResponse>)> {
    let (Some(client_name), Some(project_title), Some(project_description)) = (
        non_blank(body.client_name),
        non_blank(body.project_title),
        non_blank(body.project_description),
    ) else {
        return Err(AppError::validation(REQUIRED_FIELDS_MESSAGE));
    };

    let status = match body.status.as_deref() {
        None => ProposalStatus::default(),
        Some(raw) => raw
            .parse()
            .map_err(|_| AppError::validation("Status must be either 'draft' or 'sent'"))?,
    };

    let mut sections = ProposalSections::default();
    if let Some(patch) = body.sections {
        sections.merge(patch);
    }

    let now = Utc::now();
    let proposal = state
        .proposals
        .insert_proposal(Proposal {
            id: Uuid::new_v4(),
            user_id: user.id,
            client_name,
            client_company: non_blank(body.client_company),
            project_title,
            project_description,
            budget_range: non_blank(body.budget_range),
            timeline_preference: non_blank(body.timeline_preference),
            services: body.services.unwrap_or_default(),
            tone: non_blank(body.tone).unwrap_or_else(|| DEFAULT_TONE.to_string()),
            sections,
            status,
            created_at: now,
            updated_at: now,
        })
        .await?;

    tracing::info!("📝 Created proposal {} for user {}", proposal.id, user.id);
    Ok((StatusCode::CREATED, Json(ProposalResponse { proposal })))
}

pub async fn update_proposal(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
    JsonBody(body): JsonBody<ProposalBody>,
) -> Result<Json<ProposalResponse>> {
    let mut proposal = find_owned(&state, user.id, &id).await?;
    apply_update(&mut proposal, body)?;
    proposal.updated_at = Utc::now();

    let proposal = state.proposals.save_proposal(proposal).await?;
    Ok(Json(ProposalResponse { proposal }))
}

async fn find_owned(state: &AppState, owner: Uuid, raw_id: &str) -> Result<Proposal> {
    let id = parse_id(raw_id, "Proposal")?;
    state
        .proposals
        .find_proposal(owner, id)
        .await?
        .ok_or(AppError::NotFound {
            resource: "Proposal",
        })
}

fn required_text(value: String) -> Result<String> {
    non_blank(Some(value)).ok_or_else(|| AppError::validation(REQUIRED_FIELDS_MESSAGE))
}

/// Applies an edit in place; sections merge key by key, an unknown status is ignored.
fn apply_update(proposal: &mut Proposal, body: ProposalBody) -> Result<()> {
    if let Some(value) = body.client_name {
        proposal.client_name = required_text(value)?;
    }
    if let Some(value) = body.project_title {
        proposal.project_title = required_text(value)?;
    }
    if let Some(value) = body.project_description {
        proposal.project_description = required_text(value)?;
    }
    // 選填欄位送空字串代表清除
    if body.client_company.is_some() {
        proposal.client_company = non_blank(body.client_company);
    }
    if body.budget_range.is_some() {
        proposal.budget_range = non_blank(body.budget_range);
    }
    if body.timeline_preference.is_some() {
        proposal.timeline_preference = non_blank(body.timeline_preference);
    }
    if let Some(services) = body.services {
        proposal.services = services;
    }
    if let Some(tone) = non_blank(body.tone) {
        proposal.tone = tone;
    }
    if let Some(patch) = body.sections {
        proposal.sections.merge(patch);
    }
    if let Some(status) = body.status.and_then(|raw| raw.parse().ok()) {
        proposal.status = status;
    }
    Ok(())
}
