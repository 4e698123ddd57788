mod env;
mod file;
mod store;

pub use env::EnvCredentialStore;
pub use file::{CredentialsFile, FileCredentialStore};
pub use store::{resolve_credentials, CredentialError, CredentialStore, StaticCredentialStore};
