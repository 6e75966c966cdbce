use super::{Run, BOLD_MARKER, LINK_CLOSE, LINK_OPEN, LINK_SEPARATOR};

/// Split canonical annotated text into runs in one left-to-right pass.
///
/// Links win over bold: a bold opener still pending when a link starts is
/// unterminated and goes out verbatim. Bold spans end at a line break.
/// Unterminated markers are kept as plain text and empty spans are omitted,
/// so this never fails.
pub fn tokenize(text: &str) -> Vec<Run> {
    let mut runs = Vec::new();
    let mut plain = String::new();
    // byte offset of a pending bold opener
    let mut bold_open: Option<usize> = None;
    let mut i = 0;

    while let Some(ch) = text[i..].chars().next() {
        if ch == LINK_OPEN {
            if let Some((target, display, end)) = parse_link(text, i) {
                if let Some(start) = bold_open.take() {
                    plain.push_str(&text[start..i]);
                }
                flush_plain(&mut runs, &mut plain);
                runs.push(Run::Link {
                    text: display.to_string(),
                    target: target.to_string(),
                });
                i = end;
                continue;
            }
        }

        if ch == BOLD_MARKER {
            match bold_open.take() {
                None => bold_open = Some(i),
                Some(start) => {
                    let inner = &text[start + 1..i];
                    if !inner.is_empty() {
                        flush_plain(&mut runs, &mut plain);
                        runs.push(Run::Bold(inner.to_string()));
                    }
                }
            }
            i += 1;
            continue;
        }

        if ch == '\n' {
            if let Some(start) = bold_open.take() {
                plain.push_str(&text[start..i]);
            }
        }

        if bold_open.is_none() {
            plain.push(ch);
        }
        i += ch.len_utf8();
    }

    if let Some(start) = bold_open {
        plain.push_str(&text[start..]);
    }
    flush_plain(&mut runs, &mut plain);
    runs
}

/// Concatenated display text of `runs`, markers stripped.
pub fn plain_text(runs: &[Run]) -> String {
    runs.iter().map(Run::text).collect()
}

fn flush_plain(runs: &mut Vec<Run>, plain: &mut String) {
    if !plain.is_empty() {
        runs.push(Run::Plain(std::mem::take(plain)));
    }
}

/// Parse `<target|display>` starting at byte `open`.
/// Returns target, display and the byte offset just past the closing bracket.
fn parse_link(text: &str, open: usize) -> Option<(&str, &str, usize)> {
    let rest = &text[open + 1..];
    let close = rest.find(|c: char| c == LINK_OPEN || c == LINK_CLOSE || c == '\n')?;
    if !rest[close..].starts_with(LINK_CLOSE) {
        return None;
    }

    let (target, display) = rest[..close].split_once(LINK_SEPARATOR)?;
    if target.is_empty() || display.is_empty() || target.chars().any(char::is_whitespace) {
        return None;
    }
    Some((target, display, open + 1 + close + 1))
}
