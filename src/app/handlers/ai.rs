use crate::app::extract::{AuthUser, JsonBody};
use crate::app::AppState;
use crate::domain::model::{ProposalGenerationRequest, ProposalSections, DEFAULT_TONE};
use crate::utils::error::{AppError, Result};
use crate::utils::validation::non_blank;
use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateProposalBody {
    pub client_name: Option<String>,
    pub client_company: Option<String>,
    pub project_title: Option<String>,
    pub project_description: Option<String>,
    pub budget_range: Option<String>,
    pub timeline_preference: Option<String>,
    /// 保留原始 JSON，非陣列時回傳與空陣列相同的訊息
    pub services: Option<Value>,
    pub tone: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct GenerateProposalResponse {
    pub success: bool,
    pub sections: ProposalSections,
}

impl GenerateProposalBody {
    /// 驗證必填欄位並補上預設語氣
    pub fn into_request(self) -> Result<ProposalGenerationRequest> {
        let (Some(client_name), Some(project_title), Some(project_description)) = (
            non_blank(self.client_name),
            non_blank(self.project_title),
            non_blank(self.project_description),
        ) else {
            return Err(AppError::validation(
                "Client name, project title, and description are required",
            ));
        };

        let services: Vec<String> = match self.services {
            Some(Value::Array(items)) => items
                .into_iter()
                .filter_map(|item| match item {
                    Value::String(service) => non_blank(Some(service)),
                    _ => None,
                })
                .collect(),
            _ => Vec::new(),
        };
        if services.is_empty() {
            return Err(AppError::validation("At least one service is required"));
        }

        Ok(ProposalGenerationRequest {
            client_name,
            client_company: non_blank(self.client_company),
            project_title,
            project_description,
            budget_range: non_blank(self.budget_range),
            timeline_preference: non_blank(self.timeline_preference),
            services,
            tone: non_blank(self.tone).unwrap_or_else(|| DEFAULT_TONE.to_string()),
        })
    }
}

pub async fn generate_proposal(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    JsonBody(body): JsonBody<GenerateProposalBody>,
) -> Result<Json<GenerateProposalResponse>> {
    let request = body.into_request()?;

    match state.gateway.generate(&request).await {
        Ok(sections) => {
            tracing::info!("🤖 Generated proposal sections for user {}", user.id);
            Ok(Json(GenerateProposalResponse {
                success: true,
                sections,
            }))
        }
        Err(failure) => {
            tracing::error!(
                category = %failure.category,
                status = failure.suggested_status(),
                "❌ Proposal generation failed for user {}: {}",
                user.id,
                failure.message
            );
            Err(failure.into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn body() -> GenerateProposalBody {
        GenerateProposalBody {
            client_name: Some("Acme Inc".to_string()),
            project_title: Some("Website Redesign".to_string()),
            project_description: Some("Redesign marketing site".to_string()),
            services: Some(json!(["Design", "Development"])),
            ..Default::default()
        }
    }

    #[test]
    fn test_tone_defaults_to_professional() {
        let request = body().into_request().unwrap();
        assert_eq!(request.tone, "Professional");
        assert_eq!(request.services, vec!["Design", "Development"]);
    }

    #[test]
    fn test_missing_required_field() {
        let err = GenerateProposalBody {
            project_description: Some("   ".to_string()),
            ..body()
        }
        .into_request()
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Client name, project title, and description are required"
        );
    }

    #[test]
    fn test_services_required() {
        for services in [
            None,
            Some(json!([])),
            Some(json!([" "])),
            Some(json!("Design")),
            Some(json!({ "name": "Design" })),
        ] {
            let err = GenerateProposalBody {
                services,
                ..body()
            }
            .into_request()
            .unwrap_err();
            assert_eq!(err.to_string(), "At least one service is required");
        }
    }
}
