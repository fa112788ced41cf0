//! Tokenizer for simpl assembly text.

use crate::error::AsmError;

/// Split one line into tokens.
///
/// Tokens are separated by whitespace. A double-quoted string stays one
/// token, spaces and `;` included, and `\` escapes the next character
/// inside it. Outside quotes `;` starts a comment that runs to the end of
/// the line. Returns an empty Vec for blank and comment-only lines.
pub(crate) fn tokenize_line(line: &str, line_num: usize) -> Result<Vec<&str>, AsmError> {
    let mut tokens = Vec::new();
    let mut chars = line.char_indices().peekable();

    while let Some(&(start, c)) = chars.peek() {
        if c.is_whitespace() {
            chars.next();
            continue;
        }
        if c == ';' {
            break;
        }

        let mut end = line.len();
        let mut in_quotes = false;
        while let Some(&(i, c)) = chars.peek() {
            if !in_quotes && (c.is_whitespace() || c == ';') {
                end = i;
                break;
            }
            chars.next();
            match c {
                '"' => in_quotes = !in_quotes,
                '\\' if in_quotes => {
                    chars.next();
                }
                _ => {}
            }
        }
        if in_quotes {
            return Err(AsmError::UnterminatedString { line: line_num });
        }
        tokens.push(&line[start..end]);
    }

    Ok(tokens)
}
