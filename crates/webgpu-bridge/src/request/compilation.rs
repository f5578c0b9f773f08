use std::fmt;

use thiserror::Error;

use super::worker::complete_on_worker;
use super::{Completion, Operation, PendingRequest, RequestError, RequestStatus, WaitPolicy};

/// Severity tag of a compiler diagnostic.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum MessageKind {
    Error,
    Warning,
    Info,
}

/// 1-based position of a diagnostic in the shader source.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct SourceLocation {
    pub line: u32,
    pub column: u32,
}

/// One compiler diagnostic.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct CompilationMessage {
    pub kind: MessageKind,
    pub text: String,
    pub location: Option<SourceLocation>,
}

impl CompilationMessage {
    pub fn new(kind: MessageKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
            location: None,
        }
    }

    pub fn at(mut self, line: u32, column: u32) -> Self {
        self.location = Some(SourceLocation { line, column });
        self
    }

    pub fn is_error(&self) -> bool {
        self.kind == MessageKind::Error
    }
}

impl fmt::Display for CompilationMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.location {
            Some(SourceLocation { line, column }) => write!(f, "{line}:{column}: {}", self.text),
            None => f.write_str(&self.text),
        }
    }
}

impl From<&wgpu::CompilationMessage> for CompilationMessage {
    fn from(message: &wgpu::CompilationMessage) -> Self {
        #[allow(unreachable_patterns)]
        let kind = match message.message_type {
            wgpu::CompilationMessageType::Error => MessageKind::Error,
            wgpu::CompilationMessageType::Warning => MessageKind::Warning,
            wgpu::CompilationMessageType::Info => MessageKind::Info,
            _ => MessageKind::Info,
        };

        Self {
            kind,
            text: message.message.clone(),
            location: message.location.as_ref().map(|l| SourceLocation {
                line: l.line_number,
                column: l.line_position,
            }),
        }
    }
}

/// Everything the compilation-info callback delivers, in one invocation.
#[derive(Debug, Clone)]
pub struct CompilationOutcome {
    status: RequestStatus,
    messages: Vec<CompilationMessage>,
}

impl CompilationOutcome {
    pub fn new(status: RequestStatus, messages: Vec<CompilationMessage>) -> Self {
        Self { status, messages }
    }

    pub fn status(&self) -> RequestStatus {
        self.status
    }

    /// All diagnostics, in delivery order.
    pub fn messages(&self) -> &[CompilationMessage] {
        &self.messages
    }

    pub fn errors(&self) -> impl Iterator<Item = &CompilationMessage> {
        self.messages.iter().filter(|m| m.is_error())
    }

    pub fn warnings(&self) -> impl Iterator<Item = &CompilationMessage> {
        self.messages.iter().filter(|m| m.kind == MessageKind::Warning)
    }

    pub fn error_count(&self) -> usize {
        self.errors().count()
    }

    /// Success status and no error-tagged message. Warnings do not count.
    pub fn is_clean(&self) -> bool {
        self.status == RequestStatus::Success && self.error_count() == 0
    }

    /// Splits into the clean outcome or the full list of errors.
    pub fn into_result(self) -> Result<Self, ShaderCompileError> {
        if self.is_clean() {
            return Ok(self);
        }

        Err(ShaderCompileError {
            status: self.status,
            errors: self.messages.into_iter().filter(|m| m.is_error()).collect(),
        })
    }
}

impl From<wgpu::CompilationInfo> for CompilationOutcome {
    fn from(info: wgpu::CompilationInfo) -> Self {
        // wgpu always delivers compilation info; there is no failure status.
        Self::new(
            RequestStatus::Success,
            info.messages.iter().map(CompilationMessage::from).collect(),
        )
    }
}

/// A shader that did not compile cleanly.
#[derive(Debug, Clone, Error)]
#[error("{}", describe_errors(.status, .errors))]
pub struct ShaderCompileError {
    pub status: RequestStatus,
    /// Every error-tagged diagnostic, not just the first.
    pub errors: Vec<CompilationMessage>,
}

fn describe_errors(status: &RequestStatus, errors: &[CompilationMessage]) -> String {
    if errors.is_empty() {
        return format!("shader compilation info ended with status {status:?}");
    }

    let mut text = format!("shader compilation failed with {} error(s)", errors.len());
    for error in errors {
        text.push_str(&format!("\n  {error}"));
    }
    text
}

/// Blocks until the compilation-info request issued by `issue` completes, then
/// checks the diagnostics.
///
/// Returns the outcome (which may still hold warnings) when the shader compiled
/// cleanly, and [`RequestError::Compilation`] with every error otherwise.
pub fn validate_shader_with<F>(wait: WaitPolicy, issue: F) -> Result<CompilationOutcome, RequestError>
where
    F: FnOnce(Completion<CompilationOutcome>),
{
    let outcome = PendingRequest::issue(Operation::CompilationInfo, issue).wait_for(wait)?;

    for message in outcome.messages() {
        match message.kind {
            MessageKind::Error => log::error!("shader compile error: {message}"),
            MessageKind::Warning => log::warn!("shader compile warning: {message}"),
            MessageKind::Info => log::debug!("shader compile info: {message}"),
        }
    }

    outcome.into_result().map_err(RequestError::from)
}

/// Fetches the compilation info of `module` and checks it, blocking until done.
pub fn validate_shader(
    module: &wgpu::ShaderModule,
    wait: WaitPolicy,
) -> Result<CompilationOutcome, RequestError> {
    let module = module.clone();

    validate_shader_with(wait, move |completion| {
        complete_on_worker(completion, move || {
            CompilationOutcome::from(pollster::block_on(module.get_compilation_info()))
        });
    })
}
