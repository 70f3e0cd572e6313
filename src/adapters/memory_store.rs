use crate::domain::model::{Proposal, Template, User};
use crate::domain::ports::{ProposalStore, TemplateStore, UserStore};
use crate::utils::error::{AppError, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

/// In-process document store. Each collection is keyed by document id and
/// every proposal/template query is filtered by owner.
#[derive(Debug, Default)]
pub struct MemoryStore {
    users: RwLock<HashMap<Uuid, User>>,
    proposals: RwLock<HashMap<Uuid, Proposal>>,
    templates: RwLock<HashMap<Uuid, Template>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn insert_user(&self, user: User) -> Result<User> {
        let mut users = self.users.write().await;
        if users
            .values()
            .any(|existing| existing.email.eq_ignore_ascii_case(&user.email))
        {
            return Err(AppError::Conflict {
                message: "User already exists with this email".to_string(),
            });
        }
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_user(&self, id: Uuid) -> Result<Option<User>> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let users = self.users.read().await;
        Ok(users
            .values()
            .find(|user| user.email.eq_ignore_ascii_case(email))
            .cloned())
    }
}

#[async_trait]
impl ProposalStore for MemoryStore {
    async fn list_proposals(&self, owner: Uuid) -> Result<Vec<Proposal>> {
        let proposals = self.proposals.read().await;
        let mut owned: Vec<Proposal> = proposals
            .values()
            .filter(|p| p.user_id == owner)
            .cloned()
            .collect();
        owned.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(owned)
    }

    async fn find_proposal(&self, owner: Uuid, id: Uuid) -> Result<Option<Proposal>> {
        let proposals = self.proposals.read().await;
        Ok(proposals.get(&id).filter(|p| p.user_id == owner).cloned())
    }

    async fn insert_proposal(&self, proposal: Proposal) -> Result<Proposal> {
        self.proposals
            .write()
            .await
            .insert(proposal.id, proposal.clone());
        Ok(proposal)
    }

    async fn save_proposal(&self, proposal: Proposal) -> Result<Proposal> {
        let mut proposals = self.proposals.write().await;
        match proposals.get_mut(&proposal.id) {
            Some(stored) if stored.user_id == proposal.user_id => {
                *stored = proposal.clone();
                Ok(proposal)
            }
            _ => Err(AppError::NotFound {
                resource: "Proposal",
            }),
        }
    }
}

#[async_trait]
impl TemplateStore for MemoryStore {
    async fn list_templates(&self, owner: Uuid) -> Result<Vec<Template>> {
        let templates = self.templates.read().await;
        let mut owned: Vec<Template> = templates
            .values()
            .filter(|t| t.user_id == owner)
            .cloned()
            .collect();
        owned.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(owned)
    }

    async fn find_template(&self, owner: Uuid, id: Uuid) -> Result<Option<Template>> {
        let templates = self.templates.read().await;
        Ok(templates.get(&id).filter(|t| t.user_id == owner).cloned())
    }

    async fn insert_template(&self, template: Template) -> Result<Template> {
        self.templates
            .write()
            .await
            .insert(template.id, template.clone());
        Ok(template)
    }

    async fn save_template(&self, template: Template) -> Result<Template> {
        let mut templates = self.templates.write().await;
        match templates.get_mut(&template.id) {
            Some(stored) if stored.user_id == template.user_id => {
                *stored = template.clone();
                Ok(template)
            }
            _ => Err(AppError::NotFound {
                resource: "Template",
            }),
        }
    }

    async fn delete_template(&self, owner: Uuid, id: Uuid) -> Result<bool> {
        let mut templates = self.templates.write().await;
        if templates.get(&id).is_some_and(|t| t.user_id == owner) {
            templates.remove(&id);
            return Ok(true);
        }
        Ok(false)
    }
}
