use crate::error::CompletionError;
use crate::titler::sanitize::sanitize_title;

/// Retry budget for the unchanged-title condition. Transport failures are
/// never retried.
pub const MAX_TITLE_ATTEMPTS: usize = 3;

/// Upper bound on generated title length, in output tokens.
pub const MAX_TITLE_TOKENS: u32 = 48;

const MAX_CONTENT_CHARS: usize = 6_000;

const SYSTEM_PROMPT: &str = "You write a succinct, descriptive title for the text the user provides. \
Output only the title, nothing else. Do not use question marks, slashes, or backslashes. \
Reply in the same language as the text.";

/// One chat-style request to a completion service.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub system: String,
    pub user: String,
    pub max_tokens: u32,
}

/// A completion service that turns one request into raw generated text.
pub trait Completer {
    fn complete(&self, request: &CompletionRequest) -> Result<String, CompletionError>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TitleOptions {
    pub lower_case: bool,
    pub accept_subtitles: bool,
}

#[derive(Debug, Clone)]
pub struct TitleRequest<'a> {
    pub content: &'a str,
    pub current_basename: &'a str,
    pub options: TitleOptions,
}

/// Outcome of a successful derivation. `changed` is false when the retry
/// budget ran out without the service producing a title that differs from
/// the current basename; the last candidate is still returned.
#[derive(Debug, Clone)]
pub struct DerivedTitle {
    pub title: String,
    pub attempts: usize,
    pub changed: bool,
}

fn content_excerpt(content: &str) -> String {
    if content.chars().count() <= MAX_CONTENT_CHARS {
        return content.to_string();
    }
    content.chars().take(MAX_CONTENT_CHARS).collect()
}

pub fn build_completion_request(request: &TitleRequest<'_>) -> CompletionRequest {
    CompletionRequest {
        system: SYSTEM_PROMPT.to_string(),
        user: content_excerpt(request.content),
        max_tokens: MAX_TITLE_TOKENS,
    }
}

/// Derive a sanitized title for `request.content`, retrying while the
/// service echoes the current basename back.
///
/// The change check compares each candidate only against the immediately
/// preceding value, case-folded. A transport-class failure aborts the whole
/// derivation on the spot.
pub fn derive_title(
    completer: &dyn Completer,
    request: &TitleRequest<'_>,
) -> Result<DerivedTitle, CompletionError> {
    let completion_request = build_completion_request(request);
    let mut previous = request.current_basename.to_lowercase();
    let mut candidate = String::new();
    let mut attempts = 0usize;
    let mut changed = false;

    while attempts < MAX_TITLE_ATTEMPTS {
        attempts += 1;
        let raw = completer.complete(&completion_request)?;
        candidate = sanitize_title(&raw, request.options.accept_subtitles);
        if candidate.is_empty() {
            return Err(CompletionError::EmptyResponse);
        }
        if candidate.to_lowercase() != previous {
            changed = true;
            break;
        }
        previous = candidate.to_lowercase();
    }

    let title = if request.options.lower_case {
        candidate.to_lowercase()
    } else {
        candidate
    };
    Ok(DerivedTitle {
        title,
        attempts,
        changed,
    })
}
