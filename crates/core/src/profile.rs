//! Fill values and the alias table used to recognize fields.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Field key that email-like metadata always resolves to.
pub const EMAIL_KEY: &str = "login_email";
/// Field key whose value confirm-password fields reuse.
pub const PASSWORD_KEY: &str = "password";
/// Field key for "repeat your password" inputs.
pub const CONFIRM_PASSWORD_KEY: &str = "confirm_password";

const SAMPLE_VALUES: &[(&str, &str)] = &[
    // Account
    ("username", "sample_user_123"),
    ("first_name", "John"),
    ("last_name", "Doe"),
    ("login_email", "john.doe@example.com"),
    ("password", "SamplePassword@123"),
    // Business identity
    ("business_name", "Sample Appliance Store"),
    ("category", "Appliance Store"),
    // Location
    ("country", "Canada"),
    ("province", "Ontario"),
    ("city", "Toronto"),
    ("address", "123 Sample Street"),
    ("postal_code", "A1A1A1"),
    ("phone", "123-456-7890"),
    // Online
    ("website", "https://www.example.com"),
    ("business_email", "contact@example.com"),
    (
        "description",
        "Sample Appliance Store offers home appliances and parts \
         with professional installation and customer support.",
    ),
    // Social
    ("facebook", "https://www.facebook.com/example"),
    ("instagram", "https://www.instagram.com/example"),
    ("youtube", "https://www.youtube.com/@example"),
];

const SAMPLE_ALIASES: &[(&str, &[&str])] = &[
    ("first_name", &["first name", "fname", "given name"]),
    ("last_name", &["last name", "lname", "surname"]),
    ("username", &["username", "user name"]),
    ("login_email", &["email", "e-mail"]),
    ("password", &["password"]),
    ("confirm_password", &["confirm password", "re-enter", "verify password"]),
    (
        "business_name",
        &[
            "business name",
            "company",
            "company name",
            "organization",
            "listing title",
            "listing name",
        ],
    ),
    ("category", &["category", "categories", "business type"]),
    ("address", &["address", "street"]),
    ("city", &["city", "locality"]),
    ("province", &["province", "state", "region"]),
    ("country", &["country"]),
    ("postal_code", &["postal", "zip", "postcode"]),
    ("phone", &["phone", "telephone", "tel"]),
    ("business_email", &["business email", "contact email"]),
    ("website", &["website", "url"]),
    ("description", &["description", "about", "details"]),
    ("facebook", &["facebook"]),
    ("instagram", &["instagram"]),
    ("youtube", &["youtube"]),
];

/// One row of the alias table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AliasEntry {
    pub key: String,
    pub aliases: Vec<String>,
}

/// Ordered field key → aliases table. Scan order is the row order.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(transparent)]
pub struct AliasTable {
    entries: Vec<AliasEntry>,
}

impl AliasTable {
    /// Build a table from rows. Aliases are lowercased so matching against
    /// lowercased metadata stays case-insensitive.
    pub fn new(entries: Vec<AliasEntry>) -> Self {
        let entries = entries
            .into_iter()
            .map(|e| AliasEntry {
                key: e.key,
                aliases: e.aliases.iter().map(|a| a.to_lowercase()).collect(),
            })
            .collect();
        Self { entries }
    }

    pub fn sample() -> Self {
        Self::new(
            SAMPLE_ALIASES
                .iter()
                .map(|(key, aliases)| AliasEntry {
                    key: key.to_string(),
                    aliases: aliases.iter().map(|a| a.to_string()).collect(),
                })
                .collect(),
        )
    }

    pub fn iter(&self) -> impl Iterator<Item = &AliasEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Everything a fill pass needs to know about the person or business being
/// entered: the values, and how to recognize the fields they belong in.
#[derive(Debug, Clone, PartialEq)]
pub struct Profile {
    values: HashMap<String, String>,
    aliases: AliasTable,
}

#[derive(Deserialize)]
struct ProfileFile {
    values: Option<HashMap<String, String>>,
    aliases: Option<Vec<AliasEntry>>,
}

impl Profile {
    pub fn new(values: HashMap<String, String>, aliases: AliasTable) -> Self {
        Self { values, aliases }
    }

    /// The built-in sample dataset. All values are fake.
    pub fn sample() -> Self {
        let values = SAMPLE_VALUES
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Self::new(values, AliasTable::sample())
    }

    /// Parse a JSON profile. Sections left out fall back to the sample data.
    pub fn from_json(json: &str) -> Result<Self, ProfileError> {
        let file: ProfileFile = serde_json::from_str(json)?;
        let sample = Self::sample();
        Ok(Self {
            values: file.values.unwrap_or(sample.values),
            aliases: file.aliases.map(AliasTable::new).unwrap_or(sample.aliases),
        })
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ProfileError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ProfileError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&json)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(|s| s.as_str())
    }

    /// The value to write into a field matched as `key`. Confirm-password
    /// fields reuse the password. Empty values count as missing.
    pub fn value_for(&self, key: &str) -> Option<&str> {
        let key = if key == CONFIRM_PASSWORD_KEY { PASSWORD_KEY } else { key };
        self.get(key).filter(|v| !v.is_empty())
    }

    pub fn aliases(&self) -> &AliasTable {
        &self.aliases
    }
}

impl Default for Profile {
    fn default() -> Self {
        Self::sample()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ProfileError {
    #[error("Failed to read profile {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid profile: {0}")]
    Parse(#[from] serde_json::Error),
}
