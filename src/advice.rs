//! Command analysis advice.
//!
//! Advice generation is an opaque collaborator: callers hand over a message
//! and some context and get text back. The bundled [`KeywordAdvisor`] is a
//! small offline classifier; other implementations can be plugged in via
//! the [`Advisor`] trait.

use serde::Deserialize;

/// Message returned whenever no credential is supplied.
pub const CREDENTIAL_REQUIRED: &str =
    "AI analysis requires an API key. Please configure your API key in settings.";

/// Maximum number of context characters echoed back.
const CONTEXT_PREVIEW_CHARS: usize = 200;

/// Provider assumed when a request names none.
pub const DEFAULT_PROVIDER: &str = "openai";

/// A request for advice about a command or its output.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AdviceRequest {
    /// The text to analyze, usually a command line.
    pub message: String,
    /// Additional context such as the command output.
    #[serde(default)]
    pub context: String,
    /// API credential; advice is refused without one.
    #[serde(default, alias = "api_key")]
    pub credential: Option<String>,
    /// Requested provider name.
    #[serde(default)]
    pub provider: Option<String>,
}

impl AdviceRequest {
    /// Create a request.
    pub fn new(
        message: impl Into<String>,
        context: impl Into<String>,
        credential: Option<String>,
    ) -> Self {
        Self {
            message: message.into(),
            context: context.into(),
            credential,
            provider: None,
        }
    }

    /// The credential, if present and non-blank.
    pub fn credential(&self) -> Option<&str> {
        self.credential
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
    }

    /// The requested provider, or the default.
    pub fn provider(&self) -> &str {
        self.provider
            .as_deref()
            .filter(|p| !p.trim().is_empty())
            .unwrap_or(DEFAULT_PROVIDER)
    }
}

/// Produces advice text. Implementations must not fail: any internal
/// problem is reported as text.
pub trait Advisor: Send + Sync {
    /// Analyze a request.
    fn advise(&self, request: &AdviceRequest) -> String;
}

/// Offline keyword classifier.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeywordAdvisor;

const KEYWORD_RESPONSES: &[(&str, &str)] = &[
    ("error", "I see there's an error in the command execution. Let me help you troubleshoot this issue."),
    ("git", "This appears to be a Git command. I can help you with Git operations and version control."),
    ("npm", "This is an npm command for Node.js package management. I can assist with package operations."),
    ("ls", "This is a directory listing command. I can help you navigate and understand your file system."),
    ("cd", "This is a change directory command. I can help you navigate your file system efficiently."),
    ("python", "This is a Python command. I can help you with Python development and troubleshooting."),
    ("docker", "This is a Docker command. I can assist with containerization and Docker operations."),
];

impl Advisor for KeywordAdvisor {
    fn advise(&self, request: &AdviceRequest) -> String {
        if request.credential().is_none() {
            return CREDENTIAL_REQUIRED.to_string();
        }

        let message = request.message.to_lowercase();
        let matched = KEYWORD_RESPONSES
            .iter()
            .find(|(keyword, _)| message.contains(keyword));

        match matched {
            Some((_, response)) => {
                let preview: String = request.context.chars().take(CONTEXT_PREVIEW_CHARS).collect();
                format!("{response}\n\nContext: {preview}...")
            }
            None => format!(
                "I'm analyzing your command: '{}'. Based on the context, I can provide \
                 suggestions and help troubleshoot any issues. Please make sure your {} API key \
                 is properly configured for detailed AI assistance.",
                request.message,
                request.provider()
            ),
        }
    }
}
