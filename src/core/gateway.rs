use crate::core::failure::GenerationFailure;
use crate::core::prompt::build_prompt;
use crate::domain::model::{ProposalGenerationRequest, ProposalSections};
use crate::domain::ports::{CompletionProvider, CompletionRequest, CredentialSource};
use serde_json::{Map, Value};
use std::sync::Arc;

pub const TEMPERATURE: f32 = 0.7;

/// Turns a proposal request into five generated sections via the completion provider.
#[derive(Clone)]
pub struct GenerationGateway {
    provider: Arc<dyn CompletionProvider>,
    credentials: Arc<dyn CredentialSource>,
}

impl GenerationGateway {
    pub fn new(
        provider: Arc<dyn CompletionProvider>,
        credentials: Arc<dyn CredentialSource>,
    ) -> Self {
        Self {
            provider,
            credentials,
        }
    }

    pub async fn generate(
        &self,
        request: &ProposalGenerationRequest,
    ) -> Result<ProposalSections, GenerationFailure> {
        // 每次呼叫才讀取憑證，缺少時不發出任何請求
        let api_key = self
            .credentials
            .api_key()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(GenerationFailure::missing_credential)?;

        let prompt = build_prompt(request);
        let completion = CompletionRequest {
            system_instruction: prompt.system_instruction,
            user_prompt: prompt.user_prompt,
            temperature: TEMPERATURE,
            json_object: true,
        };

        tracing::debug!(
            "Requesting proposal sections for project '{}'",
            request.project_title
        );
        let content = self
            .provider
            .complete(&api_key, &completion)
            .await
            .map_err(GenerationFailure::from_provider)?;

        let content = content
            .filter(|text| !text.trim().is_empty())
            .ok_or_else(GenerationFailure::empty_response)?;

        parse_sections(&content)
    }
}

/// 解析上游回傳的 JSON；缺少的 key 以空字串補齊，多餘的 key 忽略
pub fn parse_sections(content: &str) -> Result<ProposalSections, GenerationFailure> {
    let value: Value = serde_json::from_str(content).map_err(GenerationFailure::malformed_payload)?;
    let object = value
        .as_object()
        .ok_or_else(|| GenerationFailure::malformed_payload("expected a JSON object"))?;

    Ok(ProposalSections {
        scope_of_work: section_text(object, "scopeOfWork"),
        deliverables: section_text(object, "deliverables"),
        timeline: section_text(object, "timeline"),
        pricing: section_text(object, "pricing"),
        terms: section_text(object, "terms"),
    })
}

fn section_text(object: &Map<String, Value>, key: &str) -> String {
    object.get(key).map(value_text).unwrap_or_default()
}

// 模型偶爾以陣列列出項目，逐行展開
fn value_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(text) => text.clone(),
        Value::Array(items) => items
            .iter()
            .map(value_text)
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>()
            .join("\n"),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::failure::FailureCategory;
    use crate::domain::model::DEFAULT_TONE;
    use crate::domain::ports::ProviderError;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct StaticCredentials(Option<String>);

    impl CredentialSource for StaticCredentials {
        fn api_key(&self) -> Option<String> {
            self.0.clone()
        }
    }

    /// Replays one canned outcome and records every request it receives.
    struct RecordingProvider {
        outcome: std::result::Result<Option<String>, ProviderError>,
        calls: Mutex<Vec<(String, CompletionRequest)>>,
    }

    impl RecordingProvider {
        fn new(outcome: std::result::Result<Option<String>, ProviderError>) -> Arc<Self> {
            Arc::new(Self {
                outcome,
                calls: Mutex::new(Vec::new()),
            })
        }

        fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl CompletionProvider for RecordingProvider {
        async fn complete(
            &self,
            api_key: &str,
            request: &CompletionRequest,
        ) -> std::result::Result<Option<String>, ProviderError> {
            self.calls
                .lock()
                .unwrap()
                .push((api_key.to_string(), request.clone()));
            self.outcome.clone()
        }
    }

    fn gateway(provider: Arc<RecordingProvider>, key: Option<&str>) -> GenerationGateway {
        GenerationGateway::new(
            provider,
            Arc::new(StaticCredentials(key.map(str::to_string))),
        )
    }

    fn acme_request() -> ProposalGenerationRequest {
        ProposalGenerationRequest {
            client_name: "Acme Inc".to_string(),
            client_company: None,
            project_title: "Website Redesign".to_string(),
            project_description: "Redesign marketing site".to_string(),
            budget_range: None,
            timeline_preference: None,
            services: vec!["Design".to_string(), "Development".to_string()],
            tone: DEFAULT_TONE.to_string(),
        }
    }

    #[tokio::test]
    async fn test_missing_credential_skips_network_call() {
        let provider = RecordingProvider::new(Ok(Some("{}".to_string())));
        let result = gateway(provider.clone(), None).generate(&acme_request()).await;

        let failure = result.unwrap_err();
        assert_eq!(failure.category, FailureCategory::AuthInvalid);
        assert_eq!(failure.suggested_status(), 401);
        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test]
    async fn test_blank_credential_counts_as_missing() {
        let provider = RecordingProvider::new(Ok(Some("{}".to_string())));
        let result = gateway(provider.clone(), Some("  ")).generate(&acme_request()).await;

        assert_eq!(result.unwrap_err().category, FailureCategory::AuthInvalid);
        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test]
    async fn test_acme_scenario_fills_missing_sections() {
        let provider = RecordingProvider::new(Ok(Some(
            r#"{"scopeOfWork":"Full redesign of the marketing site","timeline":"Six weeks"}"#
                .to_string(),
        )));
        let sections = gateway(provider.clone(), Some("sk-test"))
            .generate(&acme_request())
            .await
            .unwrap();

        assert_eq!(sections.scope_of_work, "Full redesign of the marketing site");
        assert_eq!(sections.timeline, "Six weeks");
        assert_eq!(sections.deliverables, "");
        assert_eq!(sections.pricing, "");
        assert_eq!(sections.terms, "");

        let calls = provider.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        let (api_key, request) = &calls[0];
        assert_eq!(api_key, "sk-test");
        assert!(request.user_prompt.contains("Tone: Professional"));
        assert!(request.json_object);
        assert!((request.temperature - 0.7).abs() < f32::EPSILON);
    }

    #[tokio::test]
    async fn test_provider_error_is_classified() {
        let provider = RecordingProvider::new(Err(ProviderError::Status {
            status: 429,
            message: Some("You exceeded your current quota".to_string()),
        }));
        let failure = gateway(provider.clone(), Some("sk-test"))
            .generate(&acme_request())
            .await
            .unwrap_err();

        assert_eq!(failure.category, FailureCategory::QuotaExceeded);
        assert_eq!(provider.call_count(), 1);
    }

    #[tokio::test]
    async fn test_empty_content_is_empty_response() {
        for outcome in [None, Some(String::new())] {
            let provider = RecordingProvider::new(Ok(outcome));
            let failure = gateway(provider, Some("sk-test"))
                .generate(&acme_request())
                .await
                .unwrap_err();
            assert_eq!(failure.category, FailureCategory::EmptyResponse);
            assert_eq!(failure.suggested_status(), 500);
        }
    }

    #[tokio::test]
    async fn test_malformed_payload_is_unknown() {
        let provider = RecordingProvider::new(Ok(Some("Here is your proposal!".to_string())));
        let failure = gateway(provider, Some("sk-test"))
            .generate(&acme_request())
            .await
            .unwrap_err();

        assert_eq!(failure.category, FailureCategory::Unknown);
        assert!(failure.message.contains("failed to parse"));
    }

    #[test]
    fn test_parse_sections_passes_full_payload_through() {
        let payload = serde_json::json!({
            "scopeOfWork": "a",
            "deliverables": "b",
            "timeline": "c",
            "pricing": "d",
            "terms": "e",
            "notes": "ignored"
        });
        let sections = parse_sections(&payload.to_string()).unwrap();

        assert_eq!(
            sections,
            ProposalSections {
                scope_of_work: "a".to_string(),
                deliverables: "b".to_string(),
                timeline: "c".to_string(),
                pricing: "d".to_string(),
                terms: "e".to_string(),
            }
        );
    }

    #[test]
    fn test_parse_sections_handles_null_and_lists() {
        let payload = r#"{"scopeOfWork":null,"deliverables":["Wireframes","Final design"],"pricing":4500}"#;
        let sections = parse_sections(payload).unwrap();

        assert_eq!(sections.scope_of_work, "");
        assert_eq!(sections.deliverables, "Wireframes\nFinal design");
        assert_eq!(sections.pricing, "4500");
    }

    #[test]
    fn test_parse_sections_rejects_non_object() {
        let failure = parse_sections("[1, 2, 3]").unwrap_err();
        assert_eq!(failure.category, FailureCategory::Unknown);
    }
}
