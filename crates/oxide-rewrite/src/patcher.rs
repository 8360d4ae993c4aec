//! Applies insertion edits to a token stream.

use std::collections::BTreeMap;

use tracing::warn;

use crate::lexer::Token;
use crate::locator::Edit;

/// Rebuilds the text of `tokens`, inserting each edit after its anchor.
///
/// Edits sharing an anchor are emitted by ascending `order`, ties keeping
/// their position in `edits`. Edits anchored past the last token are
/// dropped. With no edits the result is the original text.
#[must_use]
pub fn apply(tokens: &[Token<'_>], edits: &[Edit]) -> String {
    let mut by_anchor: BTreeMap<usize, Vec<&Edit>> = BTreeMap::new();
    for edit in edits {
        if edit.anchor >= tokens.len() {
            warn!(
                anchor = edit.anchor,
                tokens = tokens.len(),
                "Dropping edit anchored past the end of the token stream"
            );
            continue;
        }
        by_anchor.entry(edit.anchor).or_default().push(edit);
    }
    for group in by_anchor.values_mut() {
        group.sort_by_key(|edit| edit.order);
    }

    let inserted: usize = edits.iter().map(|edit| edit.text.len()).sum();
    let original: usize = tokens.iter().map(|token| token.text.len()).sum();
    let mut output = String::with_capacity(original + inserted);

    for (index, token) in tokens.iter().enumerate() {
        output.push_str(token.text);
        if let Some(group) = by_anchor.get(&index) {
            for edit in group {
                output.push_str(&edit.text);
            }
        }
    }
    output
}
