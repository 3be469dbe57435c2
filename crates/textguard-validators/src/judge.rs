//! External judgment capability
//!
//! Checks that need a semantic call (topic relevance, toxicity) ask a
//! text-in/text-out service through the [`Judge`] trait. The pipeline never
//! implements the judgment itself; it only renders the prompt, bounds the
//! call, and reads a YES/NO answer back.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use textguard_core::{Error, Result};

/// A text-in/text-out service used for semantic checks
#[async_trait]
pub trait Judge: Send + Sync {
    /// Fill `template` with `variables` and return the service's reply
    async fn ask(&self, template: &str, variables: &[(&str, &str)]) -> Result<String>;
}

/// Substitute `{name}` placeholders in `template`
///
/// Placeholders with no matching variable are left untouched.
pub fn render_prompt(template: &str, variables: &[(&str, &str)]) -> String {
    variables
        .iter()
        .fold(template.to_string(), |prompt, (name, value)| {
            prompt.replace(&format!("{{{}}}", name), value)
        })
}

/// A strict yes/no reply from a judge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JudgeAnswer {
    Yes,
    No,
    Unclear,
}

impl JudgeAnswer {
    /// Find the first standalone YES or NO token in `reply`, ignoring case
    /// and punctuation
    pub fn parse(reply: &str) -> Self {
        reply
            .split(|c: char| !c.is_alphanumeric())
            .find_map(|word| match word.to_uppercase().as_str() {
                "YES" => Some(Self::Yes),
                "NO" => Some(Self::No),
                _ => None,
            })
            .unwrap_or(Self::Unclear)
    }
}

/// Shared judge handle with an optional per-call deadline
#[derive(Clone)]
pub struct JudgeHandle {
    judge: Arc<dyn Judge>,
    timeout: Option<Duration>,
}

impl JudgeHandle {
    /// Wrap a judge without a deadline
    pub fn new(judge: Arc<dyn Judge>) -> Self {
        Self {
            judge,
            timeout: None,
        }
    }

    /// Bound every call by `timeout`
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Ask the judge, returning [`Error::Timeout`] when the deadline passes
    pub async fn ask(&self, template: &str, variables: &[(&str, &str)]) -> Result<String> {
        match self.timeout {
            Some(limit) => tokio::time::timeout(limit, self.judge.ask(template, variables))
                .await
                .map_err(|_| Error::Timeout)?,
            None => self.judge.ask(template, variables).await,
        }
    }

    /// Ask and parse the reply as YES/NO
    pub async fn ask_yes_no(
        &self,
        template: &str,
        variables: &[(&str, &str)],
    ) -> Result<JudgeAnswer> {
        let reply = self.ask(template, variables).await?;
        Ok(JudgeAnswer::parse(&reply))
    }
}

impl std::fmt::Debug for JudgeHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JudgeHandle")
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}
