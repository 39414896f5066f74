//! Secrets and addresses loaded from the process environment.

use std::fmt;

use lettre::Address;
use secrecy::{ExposeSecret, SecretString};

use crate::error::{AppError, Result};

/// Environment variables that must be present before a run starts.
pub const REQUIRED_VARS: [&str; 8] = [
    "CLIENT_ID",
    "CLIENT_SECRET",
    "USER_AGENT",
    "REDDIT_USERNAME",
    "REDDIT_PASSWORD",
    "EMAIL_SENDER",
    "EMAIL_PASSWORD",
    "EMAIL_RECEIVER",
];

/// Forum and mail credentials for one run.
#[derive(Clone)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: SecretString,
    pub user_agent: String,
    pub reddit_username: String,
    pub reddit_password: SecretString,
    pub email_sender: String,
    pub email_password: SecretString,
    pub email_receiver: String,
}

impl Credentials {
    /// Read credentials from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read credentials through `lookup`.
    ///
    /// Blank values count as missing. Every missing variable is reported
    /// in a single error.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let values: Vec<Option<String>> = REQUIRED_VARS
            .iter()
            .map(|key| lookup(key).filter(|v| !v.trim().is_empty()))
            .collect();

        let missing: Vec<&str> = REQUIRED_VARS
            .iter()
            .zip(&values)
            .filter(|(_, value)| value.is_none())
            .map(|(key, _)| *key)
            .collect();
        if !missing.is_empty() {
            return Err(AppError::config(format!(
                "Missing required environment variables: {}",
                missing.join(", ")
            )));
        }

        let mut values = values.into_iter().flatten();
        let mut next = || values.next().unwrap_or_default();

        let credentials = Self {
            client_id: next(),
            client_secret: SecretString::from(next()),
            user_agent: next(),
            reddit_username: next(),
            reddit_password: SecretString::from(next()),
            email_sender: next().trim().to_string(),
            email_password: SecretString::from(next()),
            email_receiver: next().trim().to_string(),
        };

        parse_address("EMAIL_SENDER", &credentials.email_sender)?;
        parse_address("EMAIL_RECEIVER", &credentials.email_receiver)?;

        Ok(credentials)
    }

    pub(crate) fn client_secret(&self) -> &str {
        self.client_secret.expose_secret()
    }

    pub(crate) fn reddit_password(&self) -> &str {
        self.reddit_password.expose_secret()
    }

    pub(crate) fn email_password(&self) -> &str {
        self.email_password.expose_secret()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .field("user_agent", &self.user_agent)
            .field("reddit_username", &self.reddit_username)
            .field("reddit_password", &"[REDACTED]")
            .field("email_sender", &self.email_sender)
            .field("email_password", &"[REDACTED]")
            .field("email_receiver", &self.email_receiver)
            .finish()
    }
}

fn parse_address(var: &str, value: &str) -> Result<Address> {
    value
        .parse()
        .map_err(|e| AppError::config(format!("{var} is not a valid email address: {e}")))
}

#[cfg(test)]
pub(crate) mod tests {
    use std::collections::HashMap;

    use super::*;

    pub(crate) fn sample_env() -> HashMap<&'static str, String> {
        HashMap::from([
            ("CLIENT_ID", "client".to_string()),
            ("CLIENT_SECRET", "secret".to_string()),
            ("USER_AGENT", "digest-test/1.0".to_string()),
            ("REDDIT_USERNAME", "user".to_string()),
            ("REDDIT_PASSWORD", "hunter2".to_string()),
            ("EMAIL_SENDER", "sender@example.com".to_string()),
            ("EMAIL_PASSWORD", "app-password".to_string()),
            ("EMAIL_RECEIVER", "reader@example.com".to_string()),
        ])
    }

    pub(crate) fn sample_credentials() -> Credentials {
        let env = sample_env();
        Credentials::from_lookup(|key| env.get(key).cloned()).unwrap()
    }

    #[test]
    fn test_from_lookup_complete() {
        let creds = sample_credentials();
        assert_eq!(creds.client_id, "client");
        assert_eq!(creds.client_secret(), "secret");
        assert_eq!(creds.user_agent, "digest-test/1.0");
        assert_eq!(creds.reddit_password(), "hunter2");
        assert_eq!(creds.email_password(), "app-password");
        assert_eq!(creds.email_receiver, "reader@example.com");
    }

    #[test]
    fn test_missing_vars_are_all_reported() {
        let mut env = sample_env();
        env.remove("CLIENT_SECRET");
        env.insert("EMAIL_RECEIVER", "   ".to_string());

        let err = Credentials::from_lookup(|key| env.get(key).cloned()).unwrap_err();
        let message = err.to_string();
        assert!(matches!(err, AppError::Config(_)));
        assert!(message.contains("CLIENT_SECRET"));
        assert!(message.contains("EMAIL_RECEIVER"));
        assert!(!message.contains("CLIENT_ID"));
    }

    #[test]
    fn test_empty_environment_fails() {
        let err = Credentials::from_lookup(|_| None).unwrap_err();
        for var in REQUIRED_VARS {
            assert!(err.to_string().contains(var));
        }
    }

    #[test]
    fn test_invalid_receiver_address() {
        let mut env = sample_env();
        env.insert("EMAIL_RECEIVER", "not-an-address".to_string());
        let err = Credentials::from_lookup(|key| env.get(key).cloned()).unwrap_err();
        assert!(err.to_string().contains("EMAIL_RECEIVER"));
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let rendered = format!("{:?}", sample_credentials());
        assert!(!rendered.contains("hunter2"));
        assert!(!rendered.contains("app-password"));
        assert!(rendered.contains("[REDACTED]"));
    }
}
