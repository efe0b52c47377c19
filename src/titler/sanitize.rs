/// Characters that never survive into a filename fragment. The colon is
/// handled separately because it doubles as the subtitle delimiter.
const FORBIDDEN_CHARS: [char; 7] = ['"', '<', '>', '?', '*', '/', '\\'];

/// Clean raw model output into a safe filename fragment.
///
/// Rules run in a fixed order: strip a single trailing period and every
/// forbidden character, resolve the subtitle colon, then collapse whitespace
/// runs and drop any trailing periods resurfaced by the colon truncation.
/// Running the result through again yields the same string.
pub fn sanitize_title(raw: &str, accept_subtitles: bool) -> String {
    let stripped: String = raw
        .strip_suffix('.')
        .unwrap_or(raw)
        .chars()
        .filter(|c| !FORBIDDEN_CHARS.contains(c))
        .collect();

    let with_subtitle = if accept_subtitles {
        stripped.replace(':', " - ")
    } else {
        match stripped.find(':') {
            Some(idx) => stripped[..idx].to_string(),
            None => stripped,
        }
    };

    let collapsed = with_subtitle
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    collapsed.trim_end_matches('.').trim_end().to_string()
}
