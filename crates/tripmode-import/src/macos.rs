use crate::picker::{
    ContactProperty, ContactsManager, PickedContact, PlatformError, SelectOptions,
};
use crate::vcf::{split_cards, VCard};
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::warn;

/// Contact picker backed by the macOS Contacts app.
///
/// Contacts has no selection sheet reachable from a terminal, so `select`
/// returns every person (optionally limited to one group).
#[derive(Debug, Default)]
pub struct MacosContactsManager {
    group: Option<String>,
    in_flight: AtomicBool,
}

impl MacosContactsManager {
    pub fn new(group: Option<String>) -> Self {
        Self {
            group,
            in_flight: AtomicBool::new(false),
        }
    }

    /// Returns a manager only where the Contacts app can be reached.
    pub fn detect(group: Option<String>) -> Option<Self> {
        if cfg!(target_os = "macos") {
            Some(Self::new(group))
        } else {
            None
        }
    }
}

struct InFlight<'a>(&'a AtomicBool);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl ContactsManager for MacosContactsManager {
    fn properties(&self) -> Result<Vec<ContactProperty>, PlatformError> {
        Ok(vec![
            ContactProperty::Name,
            ContactProperty::Email,
            ContactProperty::Tel,
        ])
    }

    fn select(
        &self,
        properties: &[ContactProperty],
        options: SelectOptions,
    ) -> Result<Vec<PickedContact>, PlatformError> {
        if self.in_flight.swap(true, Ordering::AcqRel) {
            return Err(PlatformError::InvalidState(
                "a Contacts export is already running".to_string(),
            ));
        }
        let _guard = InFlight(&self.in_flight);

        let data = fetch_contacts_vcf(self.group.as_deref())?;
        let mut picked = picked_from_vcf(&data, properties);
        if !options.multiple {
            picked.truncate(1);
        }
        Ok(picked)
    }
}

fn picked_from_vcf(data: &str, properties: &[ContactProperty]) -> Vec<PickedContact> {
    let wants = |property: ContactProperty| properties.contains(&property);
    let mut picked = Vec::new();

    for (index, fragment) in split_cards(data).into_iter().enumerate() {
        let card = match VCard::parse(fragment) {
            Ok(card) => card,
            Err(err) => {
                warn!(card = index + 1, error = %err, "skipping unreadable Contacts entry");
                continue;
            }
        };

        let mut contact = PickedContact::default();
        if wants(ContactProperty::Name) {
            contact.name = card.display_name().into_iter().collect();
        }
        if wants(ContactProperty::Email) {
            contact.email = non_empty(card.values("EMAIL"));
        }
        if wants(ContactProperty::Tel) {
            contact.tel = non_empty(card.values("TEL"));
        }
        picked.push(contact);
    }

    picked
}

fn non_empty(values: Vec<String>) -> Vec<String> {
    values.into_iter().filter(|value| !value.is_empty()).collect()
}

#[cfg(target_os = "macos")]
fn fetch_contacts_vcf(group: Option<&str>) -> Result<String, PlatformError> {
    use std::process::Command;

    let script = r#"
on run argv
    set oldDelimiters to AppleScript's text item delimiters
    set AppleScript's text item delimiters to linefeed
    set cards to {}
    set succeeded to false
    repeat 5 times
        try
            tell application "Contacts"
                if (count of argv) is 0 then
                    set cards to vcard of people
                else
                    set targetGroup to item 1 of argv
                    set targetGroupRef to first group whose name is targetGroup
                    set cards to vcard of people of targetGroupRef
                end if
            end tell
            set succeeded to true
            exit repeat
        on error errMsg number errNum
            if errNum is -600 then
                tell application "Contacts" to launch
                delay 0.2
            else
                error errMsg number errNum
            end if
        end try
    end repeat
    if succeeded is false then
        error "Contacts did not respond" number -600
    end if
    if (count of cards) is 0 then
        set joined to ""
    else
        set joined to cards as text
    end if
    set AppleScript's text item delimiters to oldDelimiters
    return joined
end run
"#;

    let mut cmd = Command::new("osascript");
    cmd.arg("-e").arg(script);
    if let Some(group) = group {
        if !group.trim().is_empty() {
            cmd.arg(group);
        }
    }

    let output = cmd
        .output()
        .map_err(|err| PlatformError::Other(format!("failed to run osascript: {err}")))?;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(classify_osascript_failure(
            stderr.trim(),
            &output.status.to_string(),
        ));
    }

    String::from_utf8(output.stdout)
        .map_err(|_| PlatformError::Other("Contacts output was not valid UTF-8".to_string()))
}

#[cfg(not(target_os = "macos"))]
fn fetch_contacts_vcf(_group: Option<&str>) -> Result<String, PlatformError> {
    Err(PlatformError::Other(
        "macOS Contacts import is only available on macOS".to_string(),
    ))
}

// -1743 is the Apple Events "not authorized" code; -600 means Contacts never answered.
#[cfg_attr(not(target_os = "macos"), allow(dead_code))]
fn classify_osascript_failure(stderr: &str, status: &str) -> PlatformError {
    if stderr.contains("-1743") || stderr.contains("Not authorized") {
        return PlatformError::Security(stderr.to_string());
    }
    if stderr.is_empty() {
        return PlatformError::Other(format!("osascript exited with {status}"));
    }
    PlatformError::Other(stderr.to_string())
}
