use std::collections::BTreeMap;

/// One authorized_keys line.
///
/// Two keys are the same key only if their raw lines are byte-identical.
#[derive(Debug, Clone, Eq)]
pub struct SshKey {
    pub raw: String,
    pub comment: String,
}

impl SshKey {
    pub fn parse(line: &str) -> Self {
        let raw = line.trim_end_matches(['\r', '\n']).to_string();
        let comment = raw.split(' ').nth(2).unwrap_or("").to_string();
        Self { raw, comment }
    }
}

impl PartialEq for SshKey {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

pub type SshKeys = Vec<SshKey>;

/// Keys fetched per account name.
pub type AuthorizedKeys = BTreeMap<String, SshKeys>;

/// Parse a newline-delimited keys payload, skipping blank lines.
pub fn parse_keys(body: &str) -> SshKeys {
    body.lines()
        .filter(|line| !line.trim().is_empty())
        .map(SshKey::parse)
        .collect()
}
