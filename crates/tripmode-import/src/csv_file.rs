use crate::batch::ParsedContacts;
use crate::error::{ImportError, Result};
use crate::file::ContactFile;
use csv::{ReaderBuilder, StringRecord};
use tracing::debug;
use tripmode_core::domain::{normalize_email, normalize_phone, ParsedContact};

// Priority order matters: the first alias contained in any header wins.
pub const NAME_ALIASES: [&str; 4] = ["name", "full name", "fullname", "display name"];
pub const EMAIL_ALIASES: [&str; 3] = ["email", "e-mail", "email address"];
pub const PHONE_ALIASES: [&str; 5] = ["phone", "telephone", "mobile", "cell", "phone number"];

/// Explicit header names that replace the alias search for a field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CsvColumnMapping {
    pub name_column: Option<String>,
    pub email_column: Option<String>,
    pub phone_column: Option<String>,
}

#[derive(Debug, Default, PartialEq, Eq)]
struct ColumnMap {
    name: Option<usize>,
    email: Option<usize>,
    phone: Option<usize>,
}

impl ColumnMap {
    fn resolve(headers: &StringRecord, mapping: &CsvColumnMapping) -> Self {
        Self {
            name: resolve_column(headers, mapping.name_column.as_deref(), &NAME_ALIASES),
            email: resolve_column(headers, mapping.email_column.as_deref(), &EMAIL_ALIASES),
            phone: resolve_column(headers, mapping.phone_column.as_deref(), &PHONE_ALIASES),
        }
    }
}

fn resolve_column(
    headers: &StringRecord,
    explicit: Option<&str>,
    aliases: &[&str],
) -> Option<usize> {
    match explicit {
        Some(column) => headers.iter().position(|header| header == column),
        None => find_column(headers.iter(), aliases),
    }
}

/// Finds the first header containing an alias, trying aliases in order.
pub fn find_column<'a, I>(headers: I, aliases: &[&str]) -> Option<usize>
where
    I: IntoIterator<Item = &'a str>,
{
    let lowered: Vec<String> = headers
        .into_iter()
        .map(|header| header.to_lowercase())
        .collect();
    aliases.iter().find_map(|alias| {
        let alias = alias.to_lowercase();
        lowered.iter().position(|header| header.contains(&alias))
    })
}

pub fn parse_csv_file(file: &dyn ContactFile, mapping: &CsvColumnMapping) -> Result<ParsedContacts> {
    let data = file.read_text()?;
    parse_csv(&data, mapping)
}

pub fn parse_csv(data: &str, mapping: &CsvColumnMapping) -> Result<ParsedContacts> {
    let data = data.strip_prefix('\u{feff}').unwrap_or(data);
    ensure_quotes_terminated(data)?;

    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(data.as_bytes());
    let headers = reader.headers().map_err(parse_error)?.clone();
    let columns = ColumnMap::resolve(&headers, mapping);
    debug!(
        name = ?columns.name,
        email = ?columns.email,
        phone = ?columns.phone,
        "csv columns resolved"
    );

    let mut batch = ParsedContacts::default();
    for record in reader.records() {
        let record = record.map_err(parse_error)?;
        if record.iter().all(|field| field.trim().is_empty()) {
            continue;
        }
        let line = record.position().map(|pos| pos.line()).unwrap_or_default();

        let cell = |index: Option<usize>| index.and_then(|i| record.get(i)).map(str::trim);
        let name = cell(columns.name).unwrap_or_default();
        let email = cell(columns.email).and_then(normalize_email);
        let phone = cell(columns.phone).and_then(normalize_phone);

        if name.is_empty() {
            batch.skip(format!("line {line}: missing name; skipping"));
            continue;
        }
        if email.is_none() && phone.is_none() {
            batch.skip(format!("line {line}: no email or phone for {name}; skipping"));
            continue;
        }

        batch.push(ParsedContact::new(name, email, phone));
    }

    Ok(batch)
}

fn parse_error(err: csv::Error) -> ImportError {
    ImportError::Parse(err.to_string())
}

// The csv reader accepts an unterminated quote by swallowing the rest of the
// input into one field, so this is checked up front.
fn ensure_quotes_terminated(data: &str) -> Result<()> {
    let mut in_quotes = false;
    let mut field_start = true;
    let mut line = 1;
    let mut opened_on = 1;

    let mut chars = data.chars().peekable();
    while let Some(ch) = chars.next() {
        if in_quotes {
            match ch {
                '"' if chars.peek() == Some(&'"') => {
                    chars.next();
                }
                '"' => in_quotes = false,
                '\n' => line += 1,
                _ => {}
            }
            continue;
        }

        match ch {
            '"' if field_start => {
                in_quotes = true;
                opened_on = line;
                field_start = false;
            }
            ',' | '\r' => field_start = true,
            '\n' => {
                line += 1;
                field_start = true;
            }
            _ => field_start = false,
        }
    }

    if in_quotes {
        return Err(ImportError::Parse(format!(
            "unterminated quoted field starting on line {opened_on}"
        )));
    }
    Ok(())
}
