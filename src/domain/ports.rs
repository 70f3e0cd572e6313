use crate::domain::model::{Proposal, Template, User};
use crate::utils::error::Result;
use async_trait::async_trait;
use uuid::Uuid;

/// 依呼叫時機讀取上游憑證，缺少時回傳 None
pub trait CredentialSource: Send + Sync {
    fn api_key(&self) -> Option<String>;
}

/// One chat-completion call: a system message, a user message, sampling
/// temperature, and whether the reply must be a single JSON object.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub system_instruction: String,
    pub user_prompt: String,
    pub temperature: f32,
    pub json_object: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    /// Provider answered with a non-success status.
    Status { status: u16, message: Option<String> },
    /// No usable response (connect, timeout, undecodable body).
    Transport(String),
}

#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Returns the text content of the first choice, if the provider sent one.
    async fn complete(
        &self,
        api_key: &str,
        request: &CompletionRequest,
    ) -> std::result::Result<Option<String>, ProviderError>;
}

#[async_trait]
pub trait UserStore: Send + Sync {
    /// 以 email 唯一；重複時回傳 Conflict
    async fn insert_user(&self, user: User) -> Result<User>;
    async fn find_user(&self, id: Uuid) -> Result<Option<User>>;
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>>;
}

#[async_trait]
pub trait ProposalStore: Send + Sync {
    /// Newest first.
    async fn list_proposals(&self, owner: Uuid) -> Result<Vec<Proposal>>;
    async fn find_proposal(&self, owner: Uuid, id: Uuid) -> Result<Option<Proposal>>;
    async fn insert_proposal(&self, proposal: Proposal) -> Result<Proposal>;
    async fn save_proposal(&self, proposal: Proposal) -> Result<Proposal>;
}

#[async_trait]
pub trait TemplateStore: Send + Sync {
    /// Newest first.
    async fn list_templates(&self, owner: Uuid) -> Result<Vec<Template>>;
    async fn find_template(&self, owner: Uuid, id: Uuid) -> Result<Option<Template>>;
    async fn insert_template(&self, template: Template) -> Result<Template>;
    async fn save_template(&self, template: Template) -> Result<Template>;
    /// Returns false when no template with that id belongs to `owner`.
    async fn delete_template(&self, owner: Uuid, id: Uuid) -> Result<bool>;
}
