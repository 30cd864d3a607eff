//! Query body loading with environment variable expansion.

use std::path::Path;

use crate::error::{ProbeError, Result};

/// Read the query file and expand `$NAME` / `${NAME}` against the process environment.
pub fn load_query(path: &Path) -> Result<String> {
    let text = std::fs::read_to_string(path).map_err(|source| ProbeError::QueryFile {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(expand_env(&text, |name| std::env::var(name).ok()))
}

/// Shell-style variable expansion.
///
/// Unset variables become empty. A `$` that is not followed by a name is kept;
/// `${}` and an unterminated `${` are dropped.
pub fn expand_env<F>(text: &str, lookup: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(pos) = rest.find('$') {
        out.push_str(&rest[..pos]);
        let after = &rest[pos + 1..];

        match shell_name(after) {
            NameScan::Name { name, consumed } => {
                if let Some(value) = lookup(name) {
                    out.push_str(&value);
                }
                rest = &after[consumed..];
            }
            NameScan::Invalid { consumed } => rest = &after[consumed..],
            NameScan::None => {
                out.push('$');
                rest = after;
            }
        }
    }

    out.push_str(rest);
    out
}

enum NameScan<'a> {
    Name { name: &'a str, consumed: usize },
    Invalid { consumed: usize },
    None,
}

fn is_special(c: u8) -> bool {
    matches!(c, b'*' | b'#' | b'$' | b'@' | b'!' | b'?' | b'-') || c.is_ascii_digit()
}

fn is_name_char(c: u8) -> bool {
    c == b'_' || c.is_ascii_alphanumeric()
}

fn shell_name(s: &str) -> NameScan<'_> {
    let bytes = s.as_bytes();
    let Some(&first) = bytes.first() else {
        return NameScan::None;
    };

    if first == b'{' {
        if bytes.len() > 2 && is_special(bytes[1]) && bytes[2] == b'}' {
            return NameScan::Name {
                name: &s[1..2],
                consumed: 3,
            };
        }
        return match s[1..].find('}') {
            Some(0) => NameScan::Invalid { consumed: 2 },
            Some(end) => NameScan::Name {
                name: &s[1..end + 1],
                consumed: end + 2,
            },
            None => NameScan::Invalid { consumed: 1 },
        };
    }

    if is_special(first) {
        return NameScan::Name {
            name: &s[..1],
            consumed: 1,
        };
    }

    let len = bytes.iter().take_while(|&&c| is_name_char(c)).count();
    if len == 0 {
        NameScan::None
    } else {
        NameScan::Name {
            name: &s[..len],
            consumed: len,
        }
    }
}
