//! JavaScript source: a hand-rolled scanner covering line/block comments and
//! the three quote styles (`'`, `"`, `` ` ``) without building a parse tree.

use std::path::Path;

use super::{Field, LexError, TokenizerPlugin};

const SUFFIXES: &[&str] = &[".js", ".jsx", ".mjs"];

pub struct EcmaScriptPlugin;

impl TokenizerPlugin for EcmaScriptPlugin {
    fn suffixes(&self) -> &'static [&'static str] {
        SUFFIXES
    }

    fn exceptions(&self) -> &'static [(&'static str, &'static str)] {
        &[(
            "ECMASyntaxError",
            "ECMASyntaxError in {path}: {exc}",
        )]
    }

    fn lex(&self, path: &Path) -> Result<Vec<(Field, String)>, LexError> {
        let src = std::fs::read_to_string(path)
            .map_err(|e| LexError::new("ECMASyntaxError", e.to_string()))?;
        lex_ecmascript(&src)
    }
}

fn lex_ecmascript(src: &str) -> Result<Vec<(Field, String)>, LexError> {
    let chars: Vec<char> = src.chars().collect();
    let n = chars.len();
    let mut i = 0;
    let mut out = Vec::new();

    while i < n {
        let c = chars[i];
        if c == '/' && i + 1 < n && chars[i + 1] == '/' {
            let start = i;
            while i < n && chars[i] != '\n' {
                i += 1;
            }
            out.push((Field::Text, chars[start..i].iter().collect()));
        } else if c == '/' && i + 1 < n && chars[i + 1] == '*' {
            let start = i;
            i += 2;
            let mut closed = false;
            while i + 1 < n {
                if chars[i] == '*' && chars[i + 1] == '/' {
                    i += 2;
                    closed = true;
                    break;
                }
                i += 1;
            }
            if !closed {
                return Err(LexError::new(
                    "ECMASyntaxError",
                    format!("unterminated block comment at offset {start}"),
                ));
            }
            out.push((Field::Text, chars[start..i].iter().collect()));
        } else if c == '"' || c == '\'' || c == '`' {
            let quote = c;
            let start = i;
            i += 1;
            let mut closed = false;
            while i < n {
                if chars[i] == '\\' && i + 1 < n {
                    i += 2;
                    continue;
                }
                if chars[i] == quote {
                    i += 1;
                    closed = true;
                    break;
                }
                if chars[i] == '\n' && quote != '`' {
                    break;
                }
                i += 1;
            }
            if !closed {
                return Err(LexError::new(
                    "ECMASyntaxError",
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
        } else if c.is_alphabetic() || c == '_' || c == '$' {
            let start = i;
            while i < n && (chars[i].is_alphanumeric() || chars[i] == '_' || chars[i] == '$') {
                i += 1;
            }
            out.push((Field::Code, chars[start..i].iter().collect()));
        } else {
            i += 1;
        }
    }

    Ok(out)
}
