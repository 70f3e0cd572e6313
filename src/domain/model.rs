use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

pub const DEFAULT_TONE: &str = "Professional";
pub const DEFAULT_PLAN: &str = "free";

/// 產生提案所需的欄位；必填欄位已由呼叫端驗證
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProposalGenerationRequest {
    pub client_name: String,
    pub client_company: Option<String>,
    pub project_title: String,
    pub project_description: String,
    pub budget_range: Option<String>,
    pub timeline_preference: Option<String>,
    pub services: Vec<String>,
    pub tone: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProposalSections {
    #[serde(default)]
    pub scope_of_work: String,
    #[serde(default)]
    pub deliverables: String,
    #[serde(default)]
    pub timeline: String,
    #[serde(default)]
    pub pricing: String,
    #[serde(default)]
    pub terms: String,
}

impl ProposalSections {
    /// The five keys the provider is asked to return, in prompt order.
    pub const KEYS: [&'static str; 5] =
        ["scopeOfWork", "deliverables", "timeline", "pricing", "terms"];

    pub fn merge(&mut self, patch: SectionsPatch) {
        if let Some(value) = patch.scope_of_work {
            self.scope_of_work = value;
        }
        if let Some(value) = patch.deliverables {
            self.deliverables = value;
        }
        if let Some(value) = patch.timeline {
            self.timeline = value;
        }
        if let Some(value) = patch.pricing {
            self.pricing = value;
        }
        if let Some(value) = patch.terms {
            self.terms = value;
        }
    }
}

/// 部分更新用；未提供的 key 保留原值
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionsPatch {
    pub scope_of_work: Option<String>,
    pub deliverables: Option<String>,
    pub timeline: Option<String>,
    pub pricing: Option<String>,
    pub terms: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProposalStatus {
    #[default]
    Draft,
    Sent,
}

impl FromStr for ProposalStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(Self::Draft),
            "sent" => Ok(Self::Sent),
            other => Err(format!("Unsupported proposal status: {}", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Proposal {
    pub id: Uuid,
    pub user_id: Uuid,
    pub client_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_company: Option<String>,
    pub project_title: String,
    pub project_description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub budget_range: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeline_preference: Option<String>,
    pub services: Vec<String>,
    pub tone: String,
    pub sections: ProposalSections,
    pub status: ProposalStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 列表頁只回傳摘要欄位
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProposalSummary {
    pub id: Uuid,
    pub client_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_company: Option<String>,
    pub project_title: String,
    pub status: ProposalStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Proposal> for ProposalSummary {
    fn from(proposal: &Proposal) -> Self {
        Self {
            id: proposal.id,
            client_name: proposal.client_name.clone(),
            client_company: proposal.client_company.clone(),
            project_title: proposal.project_title.clone(),
            status: proposal.status,
            created_at: proposal.created_at,
            updated_at: proposal.updated_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Template {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub plan: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 對外公開的使用者資料（不含密碼雜湊）
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PublicUser {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub plan: String,
}

impl From<&User> for PublicUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            plan: user.plan.clone(),
        }
    }
}
