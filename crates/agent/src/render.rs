//! Template rendering.
//!
//! Placeholders use the `{{.Key}}` form; the bare `{{Key}}` form works too,
//! as do Handlebars block helpers (`{{#if .Key}}…{{/if}}`, `{{#each}}`).
//! Substitution is literal: values are never HTML-escaped.

use std::collections::HashMap;
use std::sync::LazyLock;

use handlebars::{Handlebars, RenderErrorReason};
use promptrelay_core::error::TemplateError;
use promptrelay_core::template::MissingKeyPolicy;
use regex_lite::{Captures, Regex};

/// A `{{ ... }}` expression.
static EXPRESSION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{[^{}]*\}\}").expect("valid expression pattern"));

/// A dot-rooted path inside an expression: `.Key` after `{{`, `~`, `(` or whitespace.
static DOT_PATH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([{~(\s])\.([A-Za-z_])").expect("valid path pattern"));

/// Rewrite `{{.Key}}` paths to the root-relative `{{Key}}` form.
fn normalize_placeholders(body: &str) -> String {
    EXPRESSION
        .replace_all(body, |caps: &Captures| {
            DOT_PATH.replace_all(&caps[0], "${1}${2}").into_owned()
        })
        .into_owned()
}

/// Renders template bodies against a variable map.
#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateRenderer {
    on_missing_key: MissingKeyPolicy,
}

impl TemplateRenderer {
    pub fn new(on_missing_key: MissingKeyPolicy) -> Self {
        Self { on_missing_key }
    }

    pub fn policy(&self) -> MissingKeyPolicy {
        self.on_missing_key
    }

    fn registry(&self) -> Handlebars<'static> {
        let mut registry = Handlebars::new();
        registry.set_strict_mode(self.on_missing_key == MissingKeyPolicy::Error);
        registry.register_escape_fn(handlebars::no_escape);
        registry
    }

    /// Render `body` with `variables`. `name` labels the template in errors.
    pub fn render(
        &self,
        name: &str,
        body: &str,
        variables: &HashMap<String, String>,
    ) -> Result<String, TemplateError> {
        let mut registry = self.registry();

        registry
            .register_template_string(name, normalize_placeholders(body))
            .map_err(|e| TemplateError::Syntax {
                template: name.to_string(),
                reason: e.to_string(),
            })?;

        registry.render(name, variables).map_err(|e| match e.reason() {
            RenderErrorReason::MissingVariable(_) => TemplateError::MissingVariable {
                template: name.to_string(),
                reason: e.to_string(),
            },
            _ => TemplateError::Syntax {
                template: name.to_string(),
                reason: e.to_string(),
            },
        })
    }
}
