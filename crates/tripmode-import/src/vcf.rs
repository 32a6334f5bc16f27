use crate::batch::ParsedContacts;
use crate::error::Result;
use crate::file::ContactFile;
use std::borrow::Cow;
use thiserror::Error;
use tracing::warn;
use tripmode_core::domain::{normalize_email, normalize_phone, ParsedContact};

const BEGIN_MARKER: &str = "begin:vcard";

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CardError {
    #[error("card does not start with BEGIN:VCARD")]
    MissingBegin,
    #[error("card does not end with END:VCARD")]
    MissingEnd,
    #[error("content after END:VCARD on line {0}")]
    TrailingContent(usize),
    #[error("malformed property on line {0}")]
    MalformedLine(usize),
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Property {
    name: String,
    value: String,
}

/// One parsed `BEGIN:VCARD ... END:VCARD` block.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VCard {
    properties: Vec<Property>,
}

impl VCard {
    pub fn parse(card: &str) -> std::result::Result<Self, CardError> {
        let lines: Vec<(usize, String)> = unfold_lines(card)
            .into_iter()
            .enumerate()
            .map(|(index, line)| (index + 1, line.trim().to_string()))
            .filter(|(_, line)| !line.is_empty())
            .collect();

        let Some(((_, first), rest)) = lines.split_first() else {
            return Err(CardError::MissingBegin);
        };
        if !first.eq_ignore_ascii_case("BEGIN:VCARD") {
            return Err(CardError::MissingBegin);
        }
        let Some(((_, last), body)) = rest.split_last() else {
            return Err(CardError::MissingEnd);
        };
        if !last.eq_ignore_ascii_case("END:VCARD") {
            return Err(CardError::MissingEnd);
        }

        let mut properties = Vec::with_capacity(body.len());
        for (line_no, line) in body {
            if line.eq_ignore_ascii_case("END:VCARD") {
                return Err(CardError::TrailingContent(*line_no));
            }
            let (name, value) = split_property(line).ok_or(CardError::MalformedLine(*line_no))?;
            properties.push(Property { name, value });
        }

        Ok(Self { properties })
    }

    fn raw_values<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.properties
            .iter()
            .filter(move |property| property.name == name)
            .map(|property| property.value.as_str())
    }

    /// Unescaped, trimmed values of every occurrence of `name`.
    pub fn values(&self, name: &str) -> Vec<String> {
        let name = name.to_ascii_uppercase();
        self.raw_values(&name)
            .map(|raw| unescape_vcard_value(raw).trim().to_string())
            .collect()
    }

    /// Value of the first occurrence of `name`; later occurrences are ignored.
    pub fn first_value(&self, name: &str) -> Option<String> {
        let name = name.to_ascii_uppercase();
        let raw = self.raw_values(&name).next()?;
        let value = unescape_vcard_value(raw).trim().to_string();
        (!value.is_empty()).then_some(value)
    }

    /// The first `FN` when present, otherwise `"<given> <family>"` from `N`.
    ///
    /// A blank `FN` leaves the card without a name; `N` is not consulted.
    pub fn display_name(&self) -> Option<String> {
        if self.raw_values("FN").next().is_some() {
            return self.first_value("FN");
        }

        let raw = self.raw_values("N").next()?;
        let parts: Vec<String> = split_escaped(raw, ';')
            .iter()
            .map(|part| unescape_vcard_value(part).trim().to_string())
            .collect();
        let family = parts.first().map(String::as_str).unwrap_or_default();
        let given = parts.get(1).map(String::as_str).unwrap_or_default();
        let name = [given, family]
            .into_iter()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        (!name.is_empty()).then_some(name)
    }

    pub fn email(&self) -> Option<String> {
        self.first_value("EMAIL")
            .and_then(|value| normalize_email(&value))
    }

    pub fn phone(&self) -> Option<String> {
        self.first_value("TEL")
            .and_then(|value| normalize_phone(strip_tel_uri(&value)))
    }

    pub fn to_parsed_contact(&self) -> Option<ParsedContact> {
        let contact = ParsedContact::new(self.display_name()?, self.email(), self.phone());
        contact.is_complete().then_some(contact)
    }
}

/// Splits a text blob into card fragments, each starting at a `BEGIN:VCARD`.
///
/// Text before the first marker is kept as its own fragment; whitespace-only
/// fragments are dropped.
pub fn split_cards(data: &str) -> Vec<&str> {
    // ASCII lowercasing keeps byte offsets valid for the original text.
    let lowered = data.to_ascii_lowercase();
    let mut starts: Vec<usize> = lowered
        .match_indices(BEGIN_MARKER)
        .map(|(index, _)| index)
        .collect();
    if starts.first() != Some(&0) {
        starts.insert(0, 0);
    }

    let mut cards = Vec::with_capacity(starts.len());
    for (i, start) in starts.iter().enumerate() {
        let end = starts.get(i + 1).copied().unwrap_or(data.len());
        let fragment = &data[*start..end];
        if !fragment.trim().is_empty() {
            cards.push(fragment);
        }
    }
    cards
}

pub fn parse_vcard_file(file: &dyn ContactFile) -> Result<ParsedContacts> {
    let data = file.read_text()?;
    Ok(parse_vcard(&data))
}

pub fn parse_vcard(data: &str) -> ParsedContacts {
    let mut batch = ParsedContacts::default();

    for (index, fragment) in split_cards(data).into_iter().enumerate() {
        let card_no = index + 1;
        let card = match VCard::parse(fragment) {
            Ok(card) => card,
            Err(err) => {
                warn!(card = card_no, error = %err, "skipping malformed vCard");
                batch.skip(format!("card {card_no}: {err}; skipping"));
                continue;
            }
        };

        match card.to_parsed_contact() {
            Some(contact) => batch.push(contact),
            None => batch.skip(format!(
                "card {card_no}: missing name or contact details; skipping"
            )),
        }
    }

    batch
}

fn strip_tel_uri(value: &str) -> &str {
    match value.get(..4) {
        Some(scheme) if scheme.eq_ignore_ascii_case("tel:") => &value[4..],
        _ => value,
    }
}

fn unfold_lines(input: &str) -> Vec<String> {
    let input = normalize_line_endings(input);
    let mut lines: Vec<String> = Vec::new();
    for line in input.lines() {
        if line.starts_with(' ') || line.starts_with('\t') {
            if let Some(last) = lines.last_mut() {
                last.push_str(&line[1..]);
            } else {
                lines.push(line[1..].to_string());
            }
        } else {
            lines.push(line.to_string());
        }
    }
    lines
}

fn normalize_line_endings(input: &str) -> Cow<'_, str> {
    if !input.contains('\r') {
        return Cow::Borrowed(input);
    }

    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch == '\r' {
            if matches!(chars.peek(), Some('\n')) {
                chars.next();
            }
            out.push('\n');
        } else {
            out.push(ch);
        }
    }
    Cow::Owned(out)
}

fn split_property(line: &str) -> Option<(String, String)> {
    let (left, value) = line.split_once(':')?;
    let mut name = left.split(';').next()?.trim();
    if let Some((_, grouped)) = name.rsplit_once('.') {
        name = grouped;
    }
    let valid = !name.is_empty()
        && name
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || ch == '-');
    if !valid {
        return None;
    }
    Some((name.to_ascii_uppercase(), value.to_string()))
}

fn split_escaped(value: &str, separator: char) -> Vec<String> {
    let mut items = Vec::new();
    let mut current = String::new();
    let mut escape = false;

    for ch in value.chars() {
        if escape {
            current.push(ch);
            escape = false;
            continue;
        }

        if ch == '\\' {
            current.push(ch);
            escape = true;
            continue;
        }

        if ch == separator {
            items.push(current);
            current = String::new();
        } else {
            current.push(ch);
        }
    }

    items.push(current);
    items
}

fn unescape_vcard_value(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(ch) = chars.next() {
        if ch == '\\' {
            match chars.next() {
                Some('n') | Some('N') => out.push('\n'),
                Some(other) => out.push(other),
                None => break,
            }
        } else {
            out.push(ch);
        }
    }
    out
}
