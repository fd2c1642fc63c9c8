//! Python source: identifiers and numbers go to `code`; string literals and
//! comments go to `text`. A hand-rolled character scanner, not a full
//! grammar.

use std::path::Path;

use super::{Field, LexError, TokenizerPlugin};

const SUFFIXES: &[&str] = &[".py", ".pyw"];

pub struct PythonPlugin;

impl TokenizerPlugin for PythonPlugin {
    fn suffixes(&self) -> &'static [&'static str] {
        SUFFIXES
    }

    fn exceptions(&self) -> &'static [(&'static str, &'static str)] {
        &[
            ("IndentationError", "IndentationError in {path}: {exc}"),
            ("TokenError", "TokenError in {path}: {exc}"),
            ("SyntaxError", "SyntaxError in {path}: {exc}"),
        ]
    }

    fn lex(&self, path: &Path) -> Result<Vec<(Field, String)>, LexError> {
        let src =
            std::fs::read_to_string(path).map_err(|e| LexError::new("TokenError", e.to_string()))?;
        lex_python(&src)
    }
}

fn lex_python(src: &str) -> Result<Vec<(Field, String)>, LexError> {
    let chars: Vec<char> = src.chars().collect();
    let n = chars.len();
    let mut i = 0;
    let mut out = Vec::new();

    while i < n {
        let c = chars[i];
        if c == '#' {
            let start = i;
            while i < n && chars[i] != '\n' {
                i += 1;
            }
            out.push((Field::Text, chars[start..i].iter().collect()));
        } else if c == '"' || c == '\'' {
            let quote = c;
            let triple = i + 2 < n && chars[i + 1] == quote && chars[i + 2] == quote;
            let start = i;
            i += if triple { 3 } else { 1 };
            let mut closed = false;
            while i < n {
                if chars[i] == '\\' && i + 1 < n {
                    i += 2;
                    continue;
                }
                if triple {
                    if i + 2 < n && chars[i] == quote && chars[i + 1] == quote && chars[i + 2] == quote
                    {
                        i += 3;
                        closed = true;
                        break;
                    }
                } else if chars[i] == quote {
                    i += 1;
                    closed = true;
                    break;
                } else if chars[i] == '\n' {
                    break;
                }
                i += 1;
            }
            if !closed {
                return Err(LexError::new(
                    "SyntaxError",
                    format!("unterminated string literal at offset {start}"),
                ));
            }
            out.push((Field::Text, chars[start..i].iter().collect()));
        } else if c.is_ascii_digit() {
            let start = i;
            while i < n && (chars[i].is_ascii_alphanumeric() || chars[i] == '.' || chars[i] == '_')
            {
                i += 1;
            }
            out.push((Field::Code, chars[start..i].iter().collect()));
        } else if c.is_alphabetic() || c == '_' {
            let start = i;
            while i < n && (chars[i].is_alphanumeric() || chars[i] == '_') {
                i += 1;
            }
            out.push((Field::Code, chars[start..i].iter().collect()));
        } else {
            i += 1;
        }
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identifiers_and_calls_land_in_code_field() {
        let pairs = lex_python("def foo():\n    foo()").unwrap();
        let code: Vec<&str> = pairs
            .iter()
            .filter(|(f, _)| *f == Field::Code)
            .map(|(_, t)| t.as_str())
            .collect();
        assert_eq!(code, vec!["def", "foo", "foo"]);
        assert!(pairs.iter().all(|(f, _)| *f != Field::Text));
    }

    #[test]
    fn strings_and_comments_land_in_text_field() {
        let pairs = lex_python("# a note\nx = \"hello\"").unwrap();
        let text: Vec<&str> = pairs
            .iter()
            .filter(|(f, _)| *f == Field::Text)
            .map(|(_, t)| t.as_str())
            .collect();
        assert_eq!(text, vec!["# a note", "\"hello\""]);
    }

    #[test]
    fn unterminated_string_is_a_syntax_error() {
        let err = lex_python("x = \"unterminated").unwrap_err();
        assert_eq!(err.category, "SyntaxError");
    }

    #[test]
    fn triple_quoted_strings_span_newlines() {
        let pairs = lex_python("\"\"\"line one\nline two\"\"\"").unwrap();
        assert_eq!(
            pairs,
            vec![(Field::Text, "\"\"\"line one\nline two\"\"\"".to_string())]
        );
    }
}
