//! Length-bounded rendering for size-limited transports.

/// Appended when a message had to be cut.
pub const MORE_MARKER: &str = "📱 More strikes in app";

const SEPARATOR: &str = "\n\n";

/// Cap `text` at `max_bytes`.
///
/// Text that fits is returned unchanged. Otherwise it is cut at the last line
/// boundary that leaves room for a blank line and [`MORE_MARKER`], and the
/// marker is appended. The result never exceeds `max_bytes`. A cap too small
/// to hold the marker yields the longest whole-character prefix of the marker.
#[must_use]
pub fn bounded(text: &str, max_bytes: usize) -> String {
    if text.len() <= max_bytes {
        return text.to_string();
    }

    let suffix_len = SEPARATOR.len() + MORE_MARKER.len();
    if max_bytes < suffix_len {
        return prefix_within(MORE_MARKER, max_bytes).to_string();
    }

    let budget = max_bytes - suffix_len;
    // '\n' never occurs inside a multi-byte sequence, so this index is a char boundary.
    let cut = text.as_bytes()[..=budget.min(text.len() - 1)]
        .iter()
        .rposition(|&b| b == b'\n')
        .unwrap_or(0);
    let head = text[..cut].trim_end_matches('\n');

    if head.is_empty() {
        MORE_MARKER.to_string()
    } else {
        format!("{head}{SEPARATOR}{MORE_MARKER}")
    }
}

/// Split `text` into parts of at most `max_bytes` each.
///
/// Parts break on line boundaries; a single line longer than the cap is
/// hard-split on character boundaries. Text that fits is one part. Caps
/// below 4 bytes are raised to 4 so every character fits.
#[must_use]
pub fn split_message(text: &str, max_bytes: usize) -> Vec<String> {
    let max_bytes = max_bytes.max(4);
    if text.len() <= max_bytes {
        return vec![text.to_string()];
    }

    let mut parts = Vec::new();
    let mut current = String::new();

    for line in text.lines() {
        if line.len() > max_bytes {
            if !current.is_empty() {
                parts.push(std::mem::take(&mut current));
            }
            let mut rest = line;
            while !rest.is_empty() {
                let chunk = prefix_within(rest, max_bytes);
                parts.push(chunk.to_string());
                rest = &rest[chunk.len()..];
            }
            continue;
        }

        if current.is_empty() {
            current.push_str(line);
        } else if current.len() + 1 + line.len() <= max_bytes {
            current.push('\n');
            current.push_str(line);
        } else {
            parts.push(std::mem::replace(&mut current, line.to_string()));
        }
    }
    if !current.is_empty() {
        parts.push(current);
    }

    parts
}

fn prefix_within(text: &str, max_bytes: usize) -> &str {
    let mut end = max_bytes.min(text.len());
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}
