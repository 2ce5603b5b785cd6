// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Tab completion. A [`Completion`] provider receives the part of the line before the
//! cursor and returns full strings to replace it with. Providers hold no state between
//! calls; deciding what to insert or list is done here by [`resolve_completions`].

use std::sync::Arc;

pub trait Completion: Send + Sync {
    /// Candidates that could replace `prefix`.
    fn complete(&self, prefix: &str) -> Vec<String>;
}

impl<F> Completion for F
where
    F: Fn(&str) -> Vec<String> + Send + Sync,
{
    fn complete(&self, prefix: &str) -> Vec<String> { self(prefix) }
}

pub type SafeCompletion = Arc<dyn Completion>;

/// Completes with the words of a fixed list that start with the prefix.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WordListCompletion {
    pub words: Vec<String>,
}

impl WordListCompletion {
    #[must_use]
    pub fn new<S: Into<String>>(words: impl IntoIterator<Item = S>) -> Self {
        Self {
            words: words.into_iter().map(Into::into).collect(),
        }
    }
}

impl Completion for WordListCompletion {
    fn complete(&self, prefix: &str) -> Vec<String> {
        self.words
            .iter()
            .filter(|word| word.starts_with(prefix))
            .cloned()
            .collect()
    }
}

/// What a completion request does to the line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompletionOutcome {
    NoCandidates,
    /// Replace the prefix with this text.
    Replace(String),
    /// Several candidates and nothing more to insert. List them.
    List(Vec<String>),
}

/// Ask every provider and decide what to do with the combined candidates.
#[must_use]
pub fn complete_with(providers: &[SafeCompletion], prefix: &str) -> CompletionOutcome {
    let candidates = providers
        .iter()
        .flat_map(|provider| provider.complete(prefix))
        .collect();
    resolve_completions(prefix, candidates)
}

/// - A single candidate replaces the prefix, followed by a space.
/// - Several candidates whose common prefix is longer than `prefix` replace it with
///   that common prefix.
/// - Otherwise the candidates are listed, sorted and without duplicates.
#[must_use]
pub fn resolve_completions(prefix: &str, mut candidates: Vec<String>) -> CompletionOutcome {
    candidates.sort();
    candidates.dedup();

    match candidates.as_slice() {
        [] => CompletionOutcome::NoCandidates,
        [single] => CompletionOutcome::Replace(format!("{single} ")),
        many => {
            let common = longest_common_prefix(many);
            if common.chars().count() > prefix.chars().count() {
                CompletionOutcome::Replace(common)
            } else {
                CompletionOutcome::List(candidates)
            }
        }
    }
}

#[must_use]
pub fn longest_common_prefix(candidates: &[String]) -> String {
    let Some((first, rest)) = candidates.split_first() else {
        return String::new();
    };
    let mut len = first.chars().count();
    for candidate in rest {
        len = first
            .chars()
            .zip(candidate.chars())
            .take(len)
            .take_while(|(lhs, rhs)| lhs == rhs)
            .count();
    }
    first.chars().take(len).collect()
}
