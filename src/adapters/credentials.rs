use crate::domain::ports::CredentialSource;

pub const OPENAI_API_KEY_VAR: &str = "OPENAI_API_KEY";

/// Reads the provider key from the process environment on every call, so a
/// corrected key is picked up without a restart.
#[derive(Debug, Clone)]
pub struct EnvCredentials {
    var: String,
}

impl EnvCredentials {
    pub fn new(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }
}

impl Default for EnvCredentials {
    fn default() -> Self {
        Self::new(OPENAI_API_KEY_VAR)
    }
}

impl CredentialSource for EnvCredentials {
    fn api_key(&self) -> Option<String> {
        std::env::var(&self.var).ok().filter(|key| !key.trim().is_empty())
    }
}
