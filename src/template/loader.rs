//! Stanza grammar for template files.
//!
//! A template file is a sequence of stanzas separated by a blank line. Each
//! stanza holds `Name: value` lines, optionally followed by continuation lines
//! indented by one space (wrapped text), by two or more spaces (preformatted
//! text), or consisting of ` .` (a blank line). Continuations build the
//! `extended_<name>` companion of the field they follow.

use log::{debug, warn};

use super::Template;
use crate::database::Database;
use crate::error::{Result, SysconfError};

/// Base field names a stanza is expected to use.
pub const KNOWN_FIELDS: [&str; 5] = ["template", "description", "choices", "default", "type"];

const STANZA_SEPARATOR: &str = "\n\n";
const EXTENDED_PREFIX: &str = "extended_";

/// Whitespace as template files define it: ASCII only, vertical tab
/// included. Other Unicode spaces are ordinary text.
const fn is_space(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\x0B' | '\x0C' | '\r')
}

const fn is_name_char(c: char) -> bool {
    matches!(c, '-' | '_' | '@' | '.') || c.is_ascii_alphanumeric()
}

fn trim_space_end(text: &str) -> &str {
    text.trim_end_matches(is_space)
}

/// Shape of one line inside a stanza.
#[derive(Debug, PartialEq, Eq)]
enum Line<'a> {
    /// `Name: value`; the name may be empty.
    Field { name: &'a str, value: &'a str },
    /// ` .`
    Blank,
    /// Indented by two or more spaces; keeps all but the first.
    Preformatted(&'a str),
    /// Indented by one space.
    Continuation(&'a str),
}

impl<'a> Line<'a> {
    fn classify(line: &'a str) -> Option<Self> {
        let name_end = line.find(|c: char| !is_name_char(c)).unwrap_or(line.len());
        let (name, rest) = line.split_at(name_end);
        if let Some(value) = rest.strip_prefix(':') {
            let value = value.strip_prefix(is_space).unwrap_or(value);
            return Some(Self::Field { name, value });
        }

        let bit = line.strip_prefix(is_space)?;
        if bit == "." {
            Some(Self::Blank)
        } else if bit.starts_with(is_space) {
            Some(Self::Preformatted(bit))
        } else {
            Some(Self::Continuation(bit))
        }
    }
}

/// One parsed stanza: field names and values in file order.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Stanza {
    /// One-based position of the stanza in its source.
    pub number: usize,
    /// Lower-cased field names with their values, `extended_*` entries
    /// included.
    pub fields: Vec<(String, String)>,
}

impl Stanza {
    /// Value of `field`, if the stanza sets it.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, value)| value.as_str())
    }

    fn contains(&self, field: &str) -> bool {
        self.get(field).is_some()
    }
}

/// Parse every stanza of `text` without touching any store.
///
/// `source` names the input in diagnostics.
///
/// # Errors
///
/// Returns [`SysconfError::Parse`] for a line of unknown shape and
/// [`SysconfError::DuplicateField`] for a field set twice in one stanza.
pub fn parse_stanzas(text: &str, source: &str) -> Result<Vec<Stanza>> {
    chunks(text)
        .map(|(number, chunk)| parse_stanza(number, chunk, source))
        .collect()
}

pub(super) fn load(db: &mut Database, text: &str, source: &str, owner: &str) -> Result<Vec<Template>> {
    let mut loaded = Vec::new();

    for (number, chunk) in chunks(text) {
        let stanza = parse_stanza(number, chunk, source)?;
        let Some(name) = stanza.get("template") else {
            return Err(SysconfError::MissingTemplateName {
                stanza: number,
                source_name: source.to_owned(),
            });
        };
        let item_type = stanza.get("type").unwrap_or_default();

        let template = Template::factory(db, name, owner, item_type)?;
        template.clear_all(db);
        for (field, value) in stanza.fields.iter().filter(|(field, _)| field != "template") {
            template.set_field(db, field, value);
        }
        loaded.push(template);
    }

    debug!(target: "sysconf::loader", "loaded {} templates from {source}", loaded.len());
    Ok(loaded)
}

/// Split `text` into numbered, non-empty stanzas.
fn chunks(text: &str) -> impl Iterator<Item = (usize, &str)> {
    text.split(STANZA_SEPARATOR)
        .map(|chunk| chunk.trim_matches('\n'))
        .filter(|chunk| !chunk.is_empty())
        .enumerate()
        .map(|(index, chunk)| (index + 1, chunk))
}

struct StanzaBuilder<'a> {
    stanza: Stanza,
    source: &'a str,
    field: String,
    value: String,
    extended: String,
}

impl<'a> StanzaBuilder<'a> {
    fn new(number: usize, source: &'a str) -> Self {
        Self {
            stanza: Stanza {
                number,
                fields: Vec::new(),
            },
            source,
            field: String::new(),
            value: String::new(),
            extended: String::new(),
        }
    }

    fn start_field(&mut self, name: &str, value: &str) -> Result<()> {
        self.flush()?;
        self.field = name.to_lowercase();
        self.value = trim_space_end(value).to_owned();
        self.extended.clear();

        let base = self
            .field
            .split_once('-')
            .map_or(self.field.as_str(), |(base, _)| base);
        if !KNOWN_FIELDS.contains(&base) {
            warn!(
                target: "sysconf::loader",
                "unknown template field {} in stanza {} of {}",
                self.field, self.stanza.number, self.source
            );
        }
        Ok(())
    }

    fn push_blank_line(&mut self) {
        self.extended.push_str("\n\n");
    }

    fn push_continuation(&mut self, bit: &str, separator: char, terminator: &str) {
        if !self.extended.is_empty() && !self.extended.ends_with(['\n', ' ']) {
            self.extended.push(separator);
        }
        self.extended.push_str(trim_space_end(bit));
        self.extended.push_str(terminator);
    }

    fn flush(&mut self) -> Result<()> {
        if self.field.is_empty() {
            return Ok(());
        }

        let field = std::mem::take(&mut self.field);
        let value = std::mem::take(&mut self.value);
        if self.stanza.contains(&field) {
            return Err(SysconfError::DuplicateField {
                stanza: self.stanza.number,
                field,
                value,
                source_name: self.source.to_owned(),
            });
        }

        let extended = self.extended.trim_end_matches('\n');
        let extended_entry =
            (!extended.is_empty()).then(|| (format!("{EXTENDED_PREFIX}{field}"), extended.to_owned()));
        self.stanza.fields.push((field, value));
        self.stanza.fields.extend(extended_entry);
        Ok(())
    }

    fn finish(mut self) -> Result<Stanza> {
        self.flush()?;
        Ok(self.stanza)
    }
}

fn parse_stanza(number: usize, chunk: &str, source: &str) -> Result<Stanza> {
    let mut builder = StanzaBuilder::new(number, source);

    for line in chunk.split('\n') {
        match Line::classify(line) {
            Some(Line::Field { name, value }) => builder.start_field(name, value)?,
            Some(Line::Blank) => builder.push_blank_line(),
            Some(Line::Preformatted(bit)) => builder.push_continuation(bit, '\n', "\n"),
            Some(Line::Continuation(bit)) => builder.push_continuation(bit, ' ', ""),
            None => {
                return Err(SysconfError::Parse {
                    stanza: number,
                    line: line.to_owned(),
                    source_name: source.to_owned(),
                });
            }
        }
    }

    builder.finish()
}
