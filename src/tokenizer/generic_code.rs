//! Catch-all for languages the two dedicated plugins don't cover. Each
//! suffix maps to a small comment/string profile rather than a full
//! per-language grammar.

use std::collections::HashMap;
use std::path::Path;

use super::{Field, LexError, TokenizerPlugin, CATEGORY_NO_LEXER_FOUND};

const SUFFIXES: &[&str] = &[
    ".rs", ".c", ".h", ".cpp", ".hpp", ".cs", ".java", ".go", ".ts", ".tsx", ".html", ".htm",
];

#[derive(Clone, Copy)]
struct LanguageProfile {
    line_comment: Option<&'static str>,
    block_comment: Option<(&'static str, &'static str)>,
    string_quotes: &'static [char],
}

const C_LIKE: LanguageProfile = LanguageProfile {
    line_comment: Some("//"),
    block_comment: Some(("/*", "*/")),
    string_quotes: &['"', '\''],
};

const MARKUP: LanguageProfile = LanguageProfile {
    line_comment: None,
    block_comment: Some(("<!--", "-->")),
    string_quotes: &['"', '\''],
};

pub struct GenericCodePlugin {
    profiles: HashMap<&'static str, LanguageProfile>,
}

impl Default for GenericCodePlugin {
    fn default() -> Self {
        let mut profiles = HashMap::new();
        for suffix in [
            ".rs", ".c", ".h", ".cpp", ".hpp", ".cs", ".java", ".go", ".ts", ".tsx",
        ] {
            profiles.insert(suffix, C_LIKE);
        }
        profiles.insert(".html", MARKUP);
        profiles.insert(".htm", MARKUP);
        Self { profiles }
    }
}

impl TokenizerPlugin for GenericCodePlugin {
    fn suffixes(&self) -> &'static [&'static str] {
        SUFFIXES
    }

    fn exceptions(&self) -> &'static [(&'static str, &'static str)] {
        &[]
    }

    fn lex(&self, path: &Path) -> Result<Vec<(Field, String)>, LexError> {
        let suffix = path
            .extension()
            .map(|e| format!(".{}", e.to_string_lossy().to_lowercase()))
            .unwrap_or_default();
        let profile = self.profiles.get(suffix.as_str()).ok_or_else(|| {
            LexError::new(
                CATEGORY_NO_LEXER_FOUND,
                format!("no language profile for suffix {suffix}"),
            )
        })?;
        let src =
            std::fs::read_to_string(path).map_err(|e| LexError::new("Io", e.to_string()))?;
        Ok(lex_generic(&src, profile))
    }
}

fn starts_with_at(chars: &[char], i: usize, pat: &str) -> bool {
    let pat: Vec<char> = pat.chars().collect();
    i + pat.len() <= chars.len() && chars[i..i + pat.len()] == pat[..]
}

fn lex_generic(src: &str, profile: &LanguageProfile) -> Vec<(Field, String)> {
    let chars: Vec<char> = src.chars().collect();
    let n = chars.len();
    let mut i = 0;
    let mut out = Vec::new();

    while i < n {
        let c = chars[i];
        if let Some(lc) = profile.line_comment {
            if starts_with_at(&chars, i, lc) {
                let start = i;
                while i < n && chars[i] != '\n' {
                    i += 1;
                }
                out.push((Field::Text, chars[start..i].iter().collect()));
                continue;
            }
        }
        if let Some((bs, be)) = profile.block_comment {
            if starts_with_at(&chars, i, bs) {
                let start = i;
                i += bs.chars().count();
                while i < n && !starts_with_at(&chars, i, be) {
                    i += 1;
                }
                i = (i + be.chars().count()).min(n);
                out.push((Field::Text, chars[start..i].iter().collect()));
                continue;
            }
        }
        if profile.string_quotes.contains(&c) {
            let quote = c;
            let start = i;
            i += 1;
            while i < n {
                if chars[i] == '\\' && i + 1 < n {
                    i += 2;
                    continue;
                }
                if chars[i] == quote {
                    i += 1;
                    break;
                }
                i += 1;
            }
            out.push((Field::Text, chars[start..i].iter().collect()));
            continue;
        }
        if c.is_ascii_digit() {
            let start = i;
            while i < n && (chars[i].is_ascii_alphanumeric() || chars[i] == '.' || chars[i] == '_')
            {
                i += 1;
            }
            out.push((Field::Code, chars[start..i].iter().collect()));
            continue;
        }
        if c.is_alphabetic() || c == '_' {
            let start = i;
            while i < n && (chars[i].is_alphanumeric() || chars[i] == '_') {
                i += 1;
            }
            out.push((Field::Code, chars[start..i].iter().collect()));
            continue;
        }
        i += 1;
    }

    out
}
