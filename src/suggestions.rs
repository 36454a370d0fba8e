//! "Did you mean" suggestions for unresolved command phrases

use crate::error::Error;
use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;

const MAX_SUGGESTIONS: usize = 3;

/// Returns up to three known command names closest to `phrase`, best first.
///
/// Names are scored with a fuzzy subsequence match. When nothing matches,
/// names sharing the phrase's first word are offered instead.
#[must_use]
pub fn suggest_commands<'a>(phrase: &str, names: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let matcher = SkimMatcherV2::default().ignore_case();
    let names: Vec<&str> = names.into_iter().collect();

    let mut scored: Vec<(i64, &str)> = names
        .iter()
        .filter_map(|name| matcher.fuzzy_match(name, phrase).map(|score| (score, *name)))
        .collect();
    // Highest score first; ties keep lexical order.
    scored.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| a.1.cmp(b.1)));

    if scored.is_empty() {
        let Some(first_word) = phrase.split_whitespace().next() else {
            return Vec::new();
        };
        return names
            .iter()
            .filter(|name| name.split_whitespace().next() == Some(first_word))
            .take(MAX_SUGGESTIONS)
            .map(|name| (*name).to_string())
            .collect();
    }

    scored
        .into_iter()
        .take(MAX_SUGGESTIONS)
        .map(|(_, name)| name.to_string())
        .collect()
}

/// Builds the "invalid command" error, with suggestions when any are close.
#[must_use]
pub fn unknown_command_error<'a>(
    phrase: &str,
    names: impl IntoIterator<Item = &'a str>,
) -> Error {
    let suggestions = suggest_commands(phrase, names);
    let error = Error::unknown_command(phrase);
    if suggestions.is_empty() {
        return error.with_suggestion("Run 'commands' to list every available command.");
    }

    let quoted = suggestions
        .iter()
        .map(|s| format!("'{s}'"))
        .collect::<Vec<_>>()
        .join(", ");
    error.with_suggestion(format!("Did you mean {quoted}?"))
}

#[cfg(test)]
mod tests {
    use super::*;

    const NAMES: &[&str] = &[
        "create region",
        "describe member",
        "describe region",
        "list members",
        "list regions",
    ];

    #[test]
    fn test_fuzzy_match_finds_abbreviation() {
        let suggestions = suggest_commands("lst membrs", NAMES.iter().copied());
        assert_eq!(suggestions.first().map(String::as_str), Some("list members"));
    }

    #[test]
    fn test_at_most_three_suggestions() {
        let suggestions = suggest_commands("e", NAMES.iter().copied());
        assert_eq!(suggestions.len(), 3);
    }

    #[test]
    fn test_first_word_fallback() {
        let suggestions = suggest_commands("list xyz", NAMES.iter().copied());
        assert_eq!(suggestions, vec!["list members", "list regions"]);
    }

    #[test]
    fn test_error_carries_suggestion() {
        let err = unknown_command_error("lst membrs", NAMES.iter().copied());
        assert_eq!(err.to_string(), "Command: invalid command 'lst membrs'");
        let json = err.to_json();
        assert!(json.context.unwrap().contains("'list members'"));
    }

    #[test]
    fn test_no_match_points_to_commands() {
        let err = unknown_command_error("zzz", NAMES.iter().copied());
        assert!(err.to_json().context.unwrap().contains("commands"));
    }
}
