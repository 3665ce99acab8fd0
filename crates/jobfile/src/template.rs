// SPDX-License-Identifier: MIT

//! Command template rendering. Placeholders are `{{name}}`; rendering is
//! strict and fails on the first unresolved placeholder rather than
//! leaving it in the command literally — a job scheduler that silently
//! ran `rm -rf {{target}}` would be worse than refusing to run at all.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

#[allow(clippy::expect_used)]
static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{\s*([a-zA-Z_][a-zA-Z0-9_]*)\s*\}\}").expect("valid regex"));

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("missing template key {0:?}")]
pub struct TemplateError(pub String);

/// Render `template` against `params`, erroring on the first placeholder
/// that has no matching key.
pub fn render(template: &str, params: &HashMap<&str, String>) -> Result<String, TemplateError> {
    let mut missing: Option<String> = None;
    let rendered = PLACEHOLDER
        .replace_all(template, |caps: &regex::Captures| {
            let key = &caps[1];
            match params.get(key) {
                Some(val) => val.clone(),
                None => {
                    if missing.is_none() {
                        missing = Some(key.to_string());
                    }
                    String::new()
                }
            }
        })
        .into_owned();

    match missing {
        Some(key) => Err(TemplateError(key)),
        None => Ok(rendered),
    }
}

#[cfg(test)]
#[path = "template_tests.rs"]
mod tests;
