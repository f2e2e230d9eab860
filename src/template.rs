use std::fmt::Write;

use crate::types::{AddressSpec, FieldMap, FieldValue};

/// Fills in the `{fieldName}` placeholders of the configured strings.
pub trait TemplateEngine: Send + Sync {
    fn render(&self, template: &str, fields: &FieldMap) -> String;

    /// Render every string inside an address spec.
    fn render_spec(&self, spec: &AddressSpec, fields: &FieldMap) -> AddressSpec {
        spec.map_strings(&|template: &str| self.render(template, fields))
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultTemplateEngine;

impl TemplateEngine for DefaultTemplateEngine {
    fn render(&self, template: &str, fields: &FieldMap) -> String {
        render_template(template, fields)
    }
}

/// Replace each `{name}` in the template with the value of the field `name`.
///
/// Field names are matched literally and may contain `}` themselves; when several names
/// fit at the same position the longest one wins.
///
/// The template is scanned once from left to right, so text coming from a field value is
/// never substituted again. Placeholders without a matching field are left as is.
pub fn render_template(template: &str, fields: &FieldMap) -> String {
    let mut output = String::with_capacity(template.len());

    let mut rest = template;

    while let Some(open) = rest.find('{') {
        output.push_str(&rest[..open]);

        let candidate = &rest[open + 1..];

        match placeholder_at(candidate, fields) {
            Some((name, value)) => {
                // Writing to a String cannot fail.
                let _ = write!(output, "{}", value);

                rest = &candidate[name.len() + 1..];
            }
            None => {
                output.push('{');
                rest = candidate;
            }
        }
    }

    output.push_str(rest);

    output
}

/// The longest field name that `candidate` starts with, followed by a closing `}`.
fn placeholder_at<'a>(
    candidate: &str,
    fields: &'a FieldMap,
) -> Option<(&'a str, &'a FieldValue)> {
    fields
        .iter()
        .filter(|(name, _)| {
            candidate.starts_with(name) && candidate[name.len()..].starts_with('}')
        })
        .max_by_key(|(name, _)| name.len())
}
