//! # Shell-like Lexing Utilities
//!
//! Tokenizes a line typed into the interactive session. Single and double
//! quotes group words, a backslash escapes the next character. The raw lexer
//! keeps quotes and escapes intact together with byte positions; `unquote`
//! and `split_arguments` produce the values a command actually receives.

/// Tokenize input using a simple, shell-like lexer.
///
/// Quotes and escapes are preserved in the returned tokens.
///
/// # Example
/// ```rust
/// use hostshell_util::shell_lexing::lex_shell_like;
///
/// let tokens = lex_shell_like("katana --flag 'some value'");
/// assert_eq!(tokens, vec!["katana", "--flag", "'some value'"]);
/// ```
pub fn lex_shell_like(input: &str) -> Vec<String> {
    lex_shell_like_ranged(input)
        .into_iter()
        .map(|token| token.text.to_string())
        .collect()
}

/// Token with original byte positions.
#[derive(Debug, Clone)]
pub struct LexToken<'a> {
    pub text: &'a str,
    pub start: usize,
    pub end: usize,
}

/// Tokenize input returning borrowed slices and byte ranges.
///
/// ```rust
/// use hostshell_util::shell_lexing::lex_shell_like_ranged;
///
/// let tokens = lex_shell_like_ranged("run rv");
/// assert_eq!((tokens[1].start, tokens[1].end), (4, 6));
/// ```
pub fn lex_shell_like_ranged(input: &str) -> Vec<LexToken<'_>> {
    let mut tokens = Vec::new();
    let bytes = input.as_bytes();
    let mut index = 0usize;

    while index < bytes.len() {
        index = skip_whitespace(bytes, index);
        if index >= bytes.len() {
            break;
        }
        let start = index;
        index = token_end(bytes, index);
        tokens.push(LexToken {
            text: &input[start..index],
            start,
            end: index,
        });
    }

    tokens
}

/// Removes quoting and resolves backslash escapes in a single token.
///
/// Inside single quotes backslashes are literal, matching POSIX shells.
///
/// ```rust
/// use hostshell_util::shell_lexing::unquote;
///
/// assert_eq!(unquote("'a b'"), "a b");
/// assert_eq!(unquote("\"say \\\"hi\\\"\""), "say \"hi\"");
/// assert_eq!(unquote("path\\ with\\ spaces"), "path with spaces");
/// ```
pub fn unquote(token: &str) -> String {
    let mut out = String::with_capacity(token.len());
    let mut chars = token.chars();
    let mut in_single = false;
    let mut in_double = false;

    while let Some(c) = chars.next() {
        match c {
            '\'' if !in_double => in_single = !in_single,
            '"' if !in_single => in_double = !in_double,
            '\\' if !in_single => match chars.next() {
                Some(escaped) => out.push(escaped),
                None => out.push('\\'),
            },
            other => out.push(other),
        }
    }

    out
}

/// Lexes a line and unquotes every token.
///
/// ```rust
/// use hostshell_util::shell_lexing::split_arguments;
///
/// assert_eq!(split_arguments("rv 'shot 010' frame=12"), vec!["rv", "shot 010", "frame=12"]);
/// ```
pub fn split_arguments(input: &str) -> Vec<String> {
    lex_shell_like_ranged(input)
        .into_iter()
        .map(|token| unquote(token.text))
        .collect()
}

fn skip_whitespace(bytes: &[u8], start_index: usize) -> usize {
    let mut index = start_index;
    while index < bytes.len() && bytes[index].is_ascii_whitespace() {
        index += 1;
    }
    index
}

// Stops at unquoted whitespace or the end of input. An unterminated quote
// runs to the end of the line.
fn token_end(bytes: &[u8], start_index: usize) -> usize {
    let mut index = start_index;
    let mut in_single_quotes = false;
    let mut in_double_quotes = false;

    while index < bytes.len() {
        let byte = bytes[index];

        if byte == b'\\' && !in_single_quotes && index + 1 < bytes.len() {
            index += 2;
            continue;
        }
        if byte == b'\'' && !in_double_quotes {
            in_single_quotes = !in_single_quotes;
        } else if byte == b'"' && !in_single_quotes {
            in_double_quotes = !in_double_quotes;
        } else if !in_single_quotes && !in_double_quotes && byte.is_ascii_whitespace() {
            break;
        }
        index += 1;
    }

    index
}
