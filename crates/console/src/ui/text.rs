pub(super) fn wrap_text_lines(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();
    for raw in text.split('\n') {
        if raw.is_empty() {
            lines.push(String::new());
            continue;
        }
        let mut buffer = String::new();
        let mut count = 0usize;
        for ch in raw.chars() {
            buffer.push(ch);
            count += 1;
            if count >= width {
                lines.push(std::mem::take(&mut buffer));
                count = 0;
            }
        }
        if !buffer.is_empty() {
            lines.push(buffer);
        }
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

/// The last `height` wrapped lines, so the caret line stays visible.
pub(super) fn tail_lines(text: &str, width: usize, height: usize) -> Vec<String> {
    let lines = wrap_text_lines(text, width);
    let skip = lines.len().saturating_sub(height.max(1));
    lines.into_iter().skip(skip).collect()
}

const TAB_WIDTH: usize = 4;

/// Service text is untrusted; control characters would corrupt the screen.
pub(super) fn sanitize_text_for_tui(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut col = 0usize;
    let mut chars = text.chars().peekable();
    while let Some(ch) = chars.next() {
        match ch {
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
                out.push('\n');
                col = 0;
            }
            '\n' => {
                out.push('\n');
                col = 0;
            }
            '\t' => {
                let spaces = TAB_WIDTH - col % TAB_WIDTH;
                out.extend(std::iter::repeat(' ').take(spaces));
                col += spaces;
            }
            _ if ch.is_control() => {
                out.push(' ');
                col += 1;
            }
            _ => {
                out.push(ch);
                col += 1;
            }
        }
    }
    out
}

pub(super) fn truncate_with_ellipsis(text: &str, max_len: usize) -> String {
    if max_len == 0 {
        return String::new();
    }
    let count = text.chars().count();
    if count <= max_len {
        return text.to_string();
    }
    if max_len <= 1 {
        return text.chars().take(max_len).collect();
    }
    let mut out: String = text.chars().take(max_len - 1).collect();
    out.push('…');
    out
}
