//! YAML output readable by Helm and kubectl
//!
//! `serde_yaml` emits YAML 1.2, where words like `yes`, `on` or `y` are
//! plain strings. Helm and kubectl decode with YAML 1.1 rules and turn them
//! into booleans, so any plain scalar spelled like a YAML 1.1 boolean or
//! null is single-quoted after serialization.

use serde::Serialize;

/// Plain scalars that a YAML 1.1 reader does not treat as strings
const YAML11_RESERVED: &[&str] = &[
    "y", "Y", "yes", "Yes", "YES", "n", "N", "no", "No", "NO", "true", "True", "TRUE", "false",
    "False", "FALSE", "on", "On", "ON", "off", "Off", "OFF", "null", "Null", "NULL", "~",
];

/// Serialize a value to YAML that reads back identically under 1.1 and 1.2
pub fn to_string<T: ?Sized + Serialize>(value: &T) -> Result<String, serde_yaml::Error> {
    serde_yaml::to_string(value).map(|text| quote_ambiguous_scalars(&text))
}

/// Single-quote plain keys and values that YAML 1.1 would not read as strings
///
/// Expects block-style output as written by `serde_yaml`. The content of
/// block scalars (`|`, `>`) is copied untouched.
pub fn quote_ambiguous_scalars(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    // Column of the node owning the block scalar currently being copied
    let mut block_owner: Option<usize> = None;

    for line in text.split_inclusive('\n') {
        let content = line.strip_suffix('\n').unwrap_or(line);

        if let Some(owner) = block_owner {
            if content.trim().is_empty() || indent_of(content) > owner {
                out.push_str(line);
                continue;
            }
            block_owner = None;
        }

        let rewritten = rewrite_line(content);
        block_owner = rewritten.block_owner;
        out.push_str(&rewritten.text);
        if line.ends_with('\n') {
            out.push('\n');
        }
    }

    out
}

struct Rewritten {
    text: String,
    block_owner: Option<usize>,
}

fn rewrite_line(line: &str) -> Rewritten {
    let mut column = indent_of(line);
    let mut rest = &line[column..];
    // Column of the innermost `- ` marker, if any
    let mut item_column = None;

    while let Some(stripped) = rest.strip_prefix("- ") {
        item_column = Some(column);
        column += 2;
        rest = stripped;
    }

    let prefix = &line[..column];

    // Quoted keys are left as they are, along with their value
    if rest.starts_with('\'') || rest.starts_with('"') {
        let block_owner = rest
            .rsplit_once(": ")
            .filter(|(_, value)| opens_block(value))
            .map(|_| column);
        return Rewritten {
            text: line.to_string(),
            block_owner,
        };
    }

    let (key, value) = match rest.split_once(": ") {
        Some((key, value)) => (Some(key), Some(value)),
        None => match rest.strip_suffix(':') {
            Some(key) => (Some(key), None),
            None => (None, Some(rest)),
        },
    };

    let mut text = String::with_capacity(line.len() + 4);
    text.push_str(prefix);

    let block_owner = match (key, value) {
        (Some(key), value) => {
            text.push_str(&quote_if_reserved(key));
            text.push(':');
            if let Some(value) = value {
                text.push(' ');
                text.push_str(&quote_if_reserved(value));
            }
            value.filter(|v| opens_block(v)).map(|_| column)
        }
        (None, Some(value)) => {
            text.push_str(&quote_if_reserved(value));
            opens_block(value).then_some(item_column.unwrap_or(column))
        }
        (None, None) => None,
    };

    Rewritten { text, block_owner }
}

fn indent_of(line: &str) -> usize {
    line.len() - line.trim_start_matches(' ').len()
}

fn opens_block(value: &str) -> bool {
    value.starts_with('|') || value.starts_with('>')
}

fn quote_if_reserved(scalar: &str) -> String {
    if YAML11_RESERVED.contains(&scalar) {
        format!("'{scalar}'")
    } else {
        scalar.to_string()
    }
}
