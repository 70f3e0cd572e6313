// Adapters layer: concrete implementations of the domain ports (credentials, storage, http).

pub mod credentials;
pub mod memory_store;
pub mod openai;

pub use credentials::EnvCredentials;
pub use memory_store::MemoryStore;
pub use openai::OpenAiProvider;
