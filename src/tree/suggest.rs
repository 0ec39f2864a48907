/// "Did you mean" candidates for an unresolved path segment.
///
/// Ranking:
///
/// 1. Case-insensitive exact matches of the segment (typos in case only).
/// 2. Fuzzy matches over the child names, best score first.
use nucleo_matcher::{
    Matcher, Utf32Str,
    pattern::{CaseMatching, Normalization, Pattern},
};

use super::node::CommandRef;

/// Maximum number of suggestions returned.
pub const MAX_SUGGESTIONS: usize = 3;

/// Suggest subcommands of `command` that the user may have meant by `segment`.
///
/// Returned values are qualified names, ready to be typed as a command path.
#[must_use]
pub fn suggest(command: CommandRef<'_>, segment: &str) -> Vec<String> {
    if segment.is_empty() {
        return Vec::new();
    }

    let lower = segment.to_lowercase();
    let mut exact: Vec<CommandRef<'_>> = command
        .children()
        .filter(|c| c.name().to_lowercase() == lower)
        .collect();

    let pattern = Pattern::parse(segment, CaseMatching::Ignore, Normalization::Smart);
    let mut matcher = Matcher::new(nucleo_matcher::Config::DEFAULT);

    let mut scored: Vec<(CommandRef<'_>, u32)> = command
        .children()
        .filter(|c| !exact.contains(c))
        .filter_map(|c| {
            let mut buf = Vec::new();
            let haystack = Utf32Str::new(c.name(), &mut buf);
            pattern.score(haystack, &mut matcher).map(|s| (c, s))
        })
        .collect();

    scored.sort_by(|a, b| b.1.cmp(&a.1));
    exact.extend(scored.into_iter().map(|(c, _)| c));

    exact
        .into_iter()
        .take(MAX_SUGGESTIONS)
        .map(CommandRef::qualified_name)
        .collect()
}
