//! Cold-start credential resolution for the function surface.
//!
//! Secrets are fetched once from AWS Secrets Manager and returned as an
//! immutable [`Credentials`] value. The process environment is never written.

use std::collections::BTreeMap;
use std::fmt;

use async_trait::async_trait;
use thiserror::Error;
use tracing::{error, info};

pub const OPENAI_API_KEY: &str = "OPENAI_API_KEY";
pub const PINECONE_API_KEY: &str = "PINECONE_API_KEY";
pub const LANGSMITH_API_KEY: &str = "LANGSMITH_API_KEY";

/// (secret reference variable, credential name)
pub const SECRET_MAPPINGS: &[(&str, &str)] = &[
    ("OPENAI_API_KEY_SECRET_ARN", OPENAI_API_KEY),
    ("PINECONE_API_KEY_SECRET_ARN", PINECONE_API_KEY),
    ("LANGSMITH_API_KEY_SECRET_ARN", LANGSMITH_API_KEY),
];

#[derive(Debug, Error)]
pub enum SecretError {
    #[error("Secrets Manager request failed: {0}")]
    Fetch(String),

    #[error("Secret {0} has no string value")]
    NotAString(String),
}

/// A managed secret store reachable by secret reference (ARN or name).
#[async_trait]
pub trait SecretStore: Send + Sync {
    async fn fetch(&self, reference: &str) -> Result<String, SecretError>;
}

/// [`SecretStore`] backed by AWS Secrets Manager `GetSecretValue`.
pub struct AwsSecretStore {
    client: aws_sdk_secretsmanager::Client,
}

impl AwsSecretStore {
    pub async fn from_env() -> Self {
        let config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
        Self {
            client: aws_sdk_secretsmanager::Client::new(&config),
        }
    }
}

#[async_trait]
impl SecretStore for AwsSecretStore {
    async fn fetch(&self, reference: &str) -> Result<String, SecretError> {
        let output = self
            .client
            .get_secret_value()
            .secret_id(reference)
            .send()
            .await
            .map_err(|e| SecretError::Fetch(e.to_string()))?;

        output
            .secret_string()
            .map(str::to_string)
            .ok_or_else(|| SecretError::NotAString(reference.to_string()))
    }
}

/// Named API credentials consumed by the answer engine's clients.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    values: BTreeMap<&'static str, String>,
}

impl Credentials {
    /// Reads every known credential directly from the given variable lookup.
    pub fn from_lookup<F>(lookup: &F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let values = SECRET_MAPPINGS
            .iter()
            .filter_map(|&(_, name)| {
                lookup(name)
                    .filter(|v| !v.is_empty())
                    .map(|v| (name, v))
            })
            .collect();
        Self { values }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    pub fn openai_api_key(&self) -> Option<&str> {
        self.get(OPENAI_API_KEY)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    fn insert(&mut self, name: &'static str, value: String) {
        self.values.insert(name, value);
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // names only
        f.debug_set().entries(self.values.keys()).finish()
    }
}

/// Fills in credentials missing from `existing` by fetching their referenced
/// secrets. Fetch failures are logged and skipped; the caller surfaces the
/// gap later when the credential is actually needed.
pub async fn load_credentials<F>(
    store: &dyn SecretStore,
    existing: Credentials,
    lookup: F,
) -> Credentials
where
    F: Fn(&str) -> Option<String>,
{
    let mut credentials = existing;

    for &(reference_var, name) in SECRET_MAPPINGS {
        if credentials.contains(name) {
            continue;
        }
        let Some(reference) = lookup(reference_var).filter(|v| !v.is_empty()) else {
            continue;
        };

        match store.fetch(&reference).await {
            Ok(value) => {
                credentials.insert(name, value);
                info!("Successfully loaded {name} from secrets manager");
            }
            Err(e) => error!("Failed to load {name} from secrets manager: {e}"),
        }
    }

    credentials
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    struct FakeStore {
        secrets: HashMap<String, String>,
        fetched: Mutex<Vec<String>>,
    }

    impl FakeStore {
        fn new(secrets: &[(&str, &str)]) -> Self {
            Self {
                secrets: secrets
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect(),
                fetched: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl SecretStore for FakeStore {
        async fn fetch(&self, reference: &str) -> Result<String, SecretError> {
            self.fetched.lock().unwrap().push(reference.to_string());
            self.secrets
                .get(reference)
                .cloned()
                .ok_or_else(|| SecretError::Fetch(format!("ResourceNotFound: {reference}")))
        }
    }

    fn env(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[tokio::test]
    async fn test_fetches_referenced_secret() {
        let store = FakeStore::new(&[("arn:openai", "sk-from-store")]);
        let lookup = env(&[("OPENAI_API_KEY_SECRET_ARN", "arn:openai")]);

        let credentials =
            load_credentials(&store, Credentials::from_lookup(&lookup), &lookup).await;

        assert_eq!(credentials.openai_api_key(), Some("sk-from-store"));
    }

    #[tokio::test]
    async fn test_existing_value_is_not_refetched() {
        let store = FakeStore::new(&[("arn:openai", "sk-from-store")]);
        let lookup = env(&[
            ("OPENAI_API_KEY", "sk-local"),
            ("OPENAI_API_KEY_SECRET_ARN", "arn:openai"),
        ]);

        let credentials =
            load_credentials(&store, Credentials::from_lookup(&lookup), &lookup).await;

        assert_eq!(credentials.openai_api_key(), Some("sk-local"));
        assert!(store.fetched.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unset_reference_is_skipped() {
        let store = FakeStore::new(&[]);
        let lookup = env(&[]);

        let credentials =
            load_credentials(&store, Credentials::from_lookup(&lookup), &lookup).await;

        assert_eq!(credentials, Credentials::default());
        assert!(store.fetched.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_fetch_failure_does_not_abort_remaining_secrets() {
        let store = FakeStore::new(&[("arn:langsmith", "ls-key")]);
        let lookup = env(&[
            ("OPENAI_API_KEY_SECRET_ARN", "arn:missing"),
            ("LANGSMITH_API_KEY_SECRET_ARN", "arn:langsmith"),
        ]);

        let credentials =
            load_credentials(&store, Credentials::from_lookup(&lookup), &lookup).await;

        assert!(credentials.openai_api_key().is_none());
        assert_eq!(credentials.get(LANGSMITH_API_KEY), Some("ls-key"));
        assert_eq!(store.fetched.lock().unwrap().len(), 2);
    }

    #[test]
    fn test_debug_does_not_print_values() {
        let lookup = env(&[("OPENAI_API_KEY", "sk-very-secret")]);
        let printed = format!("{:?}", Credentials::from_lookup(&lookup));
        assert!(printed.contains("OPENAI_API_KEY"));
        assert!(!printed.contains("sk-very-secret"));
    }
}
