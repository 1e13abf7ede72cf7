//! Output formatting for the `sysconf` subcommands.
//!
//! `show` renders either a human-readable listing or pretty JSON; `load`
//! and `copy` report one summary line.

use serde::Serialize;

use crate::error::Result;

/// Fields of one template, resolved for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TemplateReport {
    /// Template name.
    pub template: String,
    /// Resolved fields, in the requested order.
    pub fields: Vec<FieldEntry>,
}

/// One resolved field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldEntry {
    /// Field name as requested.
    pub name: String,
    /// Resolved value; empty when the template lacks the field.
    pub value: String,
}

impl TemplateReport {
    /// Start a report for `template` with no fields.
    #[must_use]
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
            fields: Vec::new(),
        }
    }

    /// Append a resolved field.
    #[must_use]
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push(FieldEntry {
            name: name.into(),
            value: value.into(),
        });
        self
    }
}

/// Format a template report for humans.
///
/// Empty fields are omitted and multi-line values are indented beneath
/// their field name.
///
/// # Examples
///
/// ```
/// use sysconf_tools::output::{TemplateReport, format_human};
///
/// let report = TemplateReport::new("demo/host")
///     .with_field("type", "string")
///     .with_field("choices", "");
/// let output = format_human(&report);
/// assert_eq!(output, "Template: demo/host\n  type: string\n");
/// ```
#[must_use]
pub fn format_human(report: &TemplateReport) -> String {
    let mut output = format!("Template: {}\n", report.template);

    for entry in report.fields.iter().filter(|entry| !entry.value.is_empty()) {
        let mut lines = entry.value.lines();
        let first = lines.next().unwrap_or_default();
        output.push_str(&format!("  {}: {first}\n", entry.name));
        for line in lines {
            if line.is_empty() {
                output.push_str("   .\n");
            } else {
                output.push_str(&format!("   {line}\n"));
            }
        }
    }

    output
}

/// Format a template report as JSON.
///
/// # Errors
///
/// Returns [`crate::error::ToolError::Json`] when serialisation fails.
///
/// # Examples
///
/// ```
/// use sysconf_tools::output::{TemplateReport, format_json};
///
/// let json = format_json(&TemplateReport::new("demo/host")).expect("report should serialise");
/// assert!(json.contains("\"template\": \"demo/host\""));
/// ```
pub fn format_json(report: &TemplateReport) -> Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}

/// Summary printed after `sysconf load`.
#[must_use]
pub fn load_summary(templates: usize, files: usize) -> String {
    format!(
        "Loaded {templates} {} from {files} {}.",
        plural(templates, "template", "templates"),
        plural(files, "file", "files"),
    )
}

/// Summary printed after `sysconf copy`.
#[must_use]
pub fn copy_summary(copied: usize, skipped: usize) -> String {
    let mut summary = format!("Copied {copied} {}.", plural(copied, "item", "items"));
    if skipped > 0 {
        summary.push_str(&format!(" Skipped {skipped} already present."));
    }
    summary
}

const fn plural<'a>(count: usize, one: &'a str, many: &'a str) -> &'a str {
    if count == 1 { one } else { many }
}
