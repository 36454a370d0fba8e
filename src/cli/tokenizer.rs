//! Turns raw argument tokens into a target and a [`UserCommand`].

use crate::constants;
use crate::invocation::UserCommand;
use std::collections::HashMap;
use tracing::debug;

fn is_flag(token: &str) -> bool {
    token.starts_with('-')
}

/// Splits the raw token list into `(target, command)`.
///
/// `tokens[0]` is the program name. When `target_override` is set the first
/// positional token is only consumed as a target if it repeats the override;
/// otherwise it already belongs to the command phrase.
///
/// Fewer than two tokens yields an empty target and an empty command.
#[must_use]
pub fn tokenize(tokens: &[String], target_override: Option<&str>) -> (String, UserCommand) {
    if tokens.len() < 2 {
        return (String::new(), UserCommand::default());
    }

    let first = tokens[1].as_str();
    let (target, start) = match target_override {
        Some(target) if target == first => (target.to_string(), 2),
        Some(target) => (target.to_string(), 1),
        None if is_flag(first) => (String::new(), 1),
        None => (first.to_string(), 2),
    };

    let command = scan(&tokens[start..]);
    debug!(
        target: "cluster_cli::tokenizer",
        target = %target,
        command = %command.command,
        options = command.parameters.len(),
        "tokenized arguments"
    );
    (target, command)
}

fn scan(tokens: &[String]) -> UserCommand {
    let mut phrase: Vec<&str> = Vec::new();
    let mut parameters = HashMap::new();
    let mut open_option: Option<&str> = None;
    let mut options_started = false;

    for token in tokens {
        let token = token.as_str();
        if is_flag(token) {
            if let Some(flag) = open_option.replace(token) {
                parameters.insert(flag.to_string(), constants::FLAG_PRESENT.to_string());
            }
            options_started = true;
        } else if let Some(flag) = open_option.take() {
            parameters.insert(flag.to_string(), token.to_string());
        } else if options_started {
            debug!(
                target: "cluster_cli::tokenizer",
                "ignoring stray argument '{token}'"
            );
        } else {
            phrase.push(token);
        }
    }

    if let Some(flag) = open_option {
        parameters.insert(flag.to_string(), constants::FLAG_PRESENT.to_string());
    }

    UserCommand::new(phrase.join(" ").trim(), parameters)
}
