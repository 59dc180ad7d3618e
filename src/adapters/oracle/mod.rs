//! Subprocess-backed oracle
//!
//! Runs an AI command-line tool (`claude -p`, `gemini`, or any configured
//! argv), feeds it a prompt on stdin and parses the issues it prints.

use std::fmt;
use std::process::Stdio;
use std::time::Instant;

use async_trait::async_trait;
use log::debug;
use serde::{Deserialize, Serialize};
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use crate::core::error::OracleError;
use crate::core::models::{Issue, Severity};
use crate::core::ports::{CheckMetadata, CheckRequest, CheckResponse, Oracle};

/// Confidence assumed when the oracle does not report one
pub const DEFAULT_ISSUE_CONFIDENCE: f64 = 0.5;

/// Oracle backend selected in configuration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    /// Claude Code CLI in print mode
    #[default]
    Claude,
    /// Gemini CLI
    Gemini,
    /// Arbitrary command from the `command` setting
    Command,
}

impl Provider {
    /// Configuration name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Claude => "claude",
            Self::Gemini => "gemini",
            Self::Command => "command",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// [`Oracle`] that shells out to a program
#[derive(Debug, Clone)]
pub struct CommandOracle {
    name: String,
    program: String,
    args: Vec<String>,
}

impl CommandOracle {
    /// Oracle running `argv`, reported as `name`
    ///
    /// # Errors
    ///
    /// Returns [`OracleError::Unavailable`] if `argv` is empty.
    pub fn new(name: impl Into<String>, argv: &[String]) -> Result<Self, OracleError> {
        let (program, args) = argv
            .split_first()
            .ok_or_else(|| OracleError::Unavailable("empty oracle command".to_string()))?;
        Ok(Self {
            name: name.into(),
            program: program.clone(),
            args: args.to_vec(),
        })
    }

    /// Oracle for a configured provider
    ///
    /// `command` is only consulted for [`Provider::Command`].
    ///
    /// # Errors
    ///
    /// Returns [`OracleError::Unavailable`] if a custom command is empty.
    pub fn for_provider(provider: Provider, command: &[String]) -> Result<Self, OracleError> {
        match provider {
            Provider::Claude => Self::new("claude", &["claude".to_string(), "-p".to_string()]),
            Provider::Gemini => Self::new("gemini", &["gemini".to_string()]),
            Provider::Command => Self::new("command", command),
        }
    }

    /// Program that will be run
    #[must_use]
    pub fn program(&self) -> &str {
        &self.program
    }

    async fn run(&self, prompt: &str) -> Result<String, OracleError> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| OracleError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        let stdin = child.stdin.take();
        let write = async move {
            if let Some(mut stdin) = stdin {
                stdin.write_all(prompt.as_bytes()).await?;
                stdin.shutdown().await?;
            }
            Ok::<_, std::io::Error>(())
        };

        let (written, output) = tokio::join!(write, child.wait_with_output());
        let output = output?;
        if let Err(err) = written
            && err.kind() != std::io::ErrorKind::BrokenPipe
        {
            return Err(err.into());
        }

        if !output.status.success() {
            return Err(OracleError::Failed {
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

#[async_trait]
impl Oracle for CommandOracle {
    fn name(&self) -> &str {
        &self.name
    }

    async fn validate(&self) -> Result<(), OracleError> {
        let status = Command::new(&self.program)
            .arg("--version")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .status()
            .await
            .map_err(|err| {
                OracleError::Unavailable(format!("`{}` not found: {err}", self.program))
            })?;

        if status.success() {
            Ok(())
        } else {
            Err(OracleError::Unavailable(format!("`{} --version` exited with {status}", self.program)))
        }
    }

    async fn check(&self, request: CheckRequest<'_>) -> Result<CheckResponse, OracleError> {
        let start = Instant::now();
        let prompt = build_prompt(&request);
        debug!(
            "{}: checking {} against {} file(s) ({} byte prompt)",
            self.name,
            request.rule.path,
            request.implementations.len(),
            prompt.len()
        );

        let stdout = self.run(&prompt).await?;
        let issues = parse_response(&stdout)?;

        Ok(CheckResponse {
            issues,
            metadata: CheckMetadata {
                model: self.name.clone(),
                duration: start.elapsed(),
            },
        })
    }
}

const INSTRUCTIONS: &str = r#"You are a code reviewer. Check whether the implementation files below comply with the given specification or rule.

Respond with a single JSON object and nothing else:
{
  "issues": [
    {
      "severity": "error" | "warning" | "notice",
      "message": "Clear, actionable description of the issue",
      "file": "path/to/file",
      "line": 42,
      "confidence": 0.95
    }
  ]
}

- severity: "error" for violations of the rule, "warning" for important concerns, "notice" for minor suggestions
- line: best-effort line number of the issue
- confidence: between 0 and 1, how sure you are that this is a real issue

If there are no issues, respond with {"issues": []}"#;

/// Prompt sent to the oracle program
#[must_use]
pub fn build_prompt(request: &CheckRequest<'_>) -> String {
    let rule = request.rule;
    let source = rule.source_url.as_deref().unwrap_or(&rule.path);

    let mut prompt = format!("{INSTRUCTIONS}\n\n## Rule ({source})\n\n{}\n", rule.content);
    for file in request.implementations {
        prompt.push_str(&format!(
            "\n## File: {}\nLanguage: {}\n\n```{}\n{}\n```\n",
            file.path, file.language, file.language, file.content
        ));
    }
    prompt
}

#[derive(Debug, Deserialize)]
struct RawResponse {
    issues: Vec<RawIssue>,
}

#[derive(Debug, Deserialize)]
struct RawIssue {
    severity: Option<String>,
    message: String,
    file: Option<String>,
    line: Option<u32>,
    column: Option<u32>,
    confidence: Option<f64>,
}

impl From<RawIssue> for Issue {
    fn from(raw: RawIssue) -> Self {
        let severity =
            raw.severity.and_then(|s| s.parse::<Severity>().ok()).unwrap_or(Severity::Warning);
        let confidence = raw.confidence.unwrap_or(DEFAULT_ISSUE_CONFIDENCE).clamp(0.0, 1.0);
        Self {
            file: raw.file,
            line: raw.line,
            column: raw.column,
            ..Self::new(severity, raw.message, confidence)
        }
    }
}

/// Extract issues from oracle output
///
/// Accepts the bare `{"issues": [...]}` object, a wrapper object whose
/// `result` string holds it, or prose surrounding a single such object.
///
/// # Errors
///
/// Returns [`OracleError::MalformedResponse`] if no issues object is found.
pub fn parse_response(output: &str) -> Result<Vec<Issue>, OracleError> {
    let raw = parse_raw(output.trim())
        .or_else(|| {
            let wrapper: serde_json::Value = serde_json::from_str(output.trim()).ok()?;
            parse_raw(wrapper.get("result")?.as_str()?.trim()).or_else(|| {
                outermost_object(wrapper.get("result")?.as_str()?).and_then(parse_raw)
            })
        })
        .or_else(|| outermost_object(output).and_then(parse_raw))
        .ok_or_else(|| OracleError::MalformedResponse(snippet(output)))?;

    Ok(raw.issues.into_iter().map(Issue::from).collect())
}

fn parse_raw(text: &str) -> Option<RawResponse> {
    serde_json::from_str(text).ok()
}

fn outermost_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (start < end).then(|| &text[start..=end])
}

fn snippet(output: &str) -> String {
    let trimmed = output.trim();
    if trimmed.is_empty() {
        return "empty output".to_string();
    }
    let mut chars = trimmed.chars();
    let head: String = chars.by_ref().take(200).collect();
    if chars.next().is_some() { format!("{head}...") } else { head }
}
