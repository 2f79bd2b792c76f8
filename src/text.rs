//! Small text helpers shared across the HTTP-facing layers.

/// Returns the first `max_chars` characters of `text`, trimmed, appending an
/// ellipsis when content was cut.
///
/// Keeps platform HTML error pages and verbose provider bodies readable in
/// operator-facing messages.
pub(crate) fn excerpt(text: &str, max_chars: usize) -> String {
    let mut output = String::new();
    let mut chars = text.trim().chars();

    for _ in 0..max_chars {
        let Some(character) = chars.next() else {
            return output;
        };
        output.push(character);
    }

    if chars.next().is_some() {
        output.push_str("...");
    }

    output
}
