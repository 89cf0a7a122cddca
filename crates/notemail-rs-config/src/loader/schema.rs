//! Key and value-type checks for a single layer, before merging.

use crate::ConfigError;
use serde_json::Value;

#[derive(Clone, Copy)]
enum Kind {
    Text,
    Count,
    Number,
}

impl Kind {
    fn accepts(self, value: &Value) -> bool {
        match self {
            Kind::Text => value.is_string(),
            Kind::Count => value.is_u64(),
            Kind::Number => value.is_number(),
        }
    }

    fn expectation(self) -> &'static str {
        match self {
            Kind::Text => "must be a string",
            Kind::Count => "must be a non-negative integer",
            Kind::Number => "must be a number",
        }
    }
}

type Section = (&'static str, &'static [(&'static str, Kind)]);

const SECTIONS: &[Section] = &[
    (
        "store",
        &[
            ("api_base", Kind::Text),
            ("notion_version", Kind::Text),
            ("page_size", Kind::Count),
        ],
    ),
    (
        "vector",
        &[
            ("control_base", Kind::Text),
            ("host", Kind::Text),
            ("index_name", Kind::Text),
            ("namespace", Kind::Text),
            ("embed_model", Kind::Text),
            ("api_version", Kind::Text),
            ("top_k", Kind::Count),
            ("overfetch_factor", Kind::Count),
            ("batch_size", Kind::Count),
        ],
    ),
    (
        "assistant",
        &[
            ("base_url", Kind::Text),
            ("model", Kind::Text),
            ("instructions_path", Kind::Text),
            ("command_temperature", Kind::Number),
            ("summary_temperature", Kind::Number),
        ],
    ),
    (
        "http",
        &[
            ("timeout_secs", Kind::Count),
            ("connect_timeout_secs", Kind::Count),
        ],
    ),
];

/// Reject unknown keys and mistyped values in one layer.
pub(super) fn check(value: &Value, layer: &str) -> Result<(), ConfigError> {
    let field = |key: String, reason: &'static str| ConfigError::Field {
        layer: layer.to_string(),
        key,
        reason,
    };
    let Value::Object(root) = value else {
        return Err(field("<root>".to_string(), "must be an object"));
    };

    for (name, section) in root {
        if name == "$schema" {
            if !section.is_string() {
                return Err(field(name.clone(), Kind::Text.expectation()));
            }
            continue;
        }
        let Some((_, fields)) = SECTIONS.iter().find(|(known, _)| *known == name.as_str()) else {
            return Err(field(name.clone(), "is not a known key"));
        };
        let Value::Object(entries) = section else {
            return Err(field(name.clone(), "must be an object"));
        };
        for (key, entry) in entries {
            let path = format!("{name}.{key}");
            match fields.iter().find(|(known, _)| *known == key.as_str()) {
                None => return Err(field(path, "is not a known key")),
                Some((_, kind)) if !kind.accepts(entry) => {
                    return Err(field(path, kind.expectation()));
                }
                Some(_) => {}
            }
        }
    }
    Ok(())
}
