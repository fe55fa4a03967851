//! Maps an element's identifying attributes to a canonical field key.

use crate::profile::{AliasTable, EMAIL_KEY};

/// Join the attributes that identify a form control into one metadata string.
/// Missing attributes contribute an empty slot so the separators stay put.
pub fn metadata_string(
    name: Option<&str>,
    id: Option<&str>,
    placeholder: Option<&str>,
    aria_label: Option<&str>,
) -> String {
    [name, id, placeholder, aria_label]
        .iter()
        .map(|a| a.unwrap_or(""))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Find the field key for an element's metadata.
///
/// Anything mentioning "email" is the login email, whatever else it says.
/// Otherwise the alias table is scanned in order and the first key with an
/// alias contained in the metadata wins.
pub fn match_key<'a>(meta: &str, aliases: &'a AliasTable) -> Option<&'a str> {
    let meta = meta.to_lowercase();

    if meta.contains("email") {
        return Some(EMAIL_KEY);
    }

    aliases
        .iter()
        .find(|entry| entry.aliases.iter().any(|alias| meta.contains(alias.as_str())))
        .map(|entry| entry.key.as_str())
}
