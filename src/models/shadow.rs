use std::fmt;

/// Number of colon-separated fields in a shadow line.
pub const SHADOW_FIELDS: usize = 9;

/// A username to password hash pair, as fetched from a shadowd server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shadow {
    pub username: String,
    pub hash: String,
}

pub type Shadows = Vec<Shadow>;

impl Shadow {
    pub fn new(username: impl Into<String>, hash: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            hash: hash.into(),
        }
    }

    /// Rewrite an existing shadow line, replacing only the hash field.
    ///
    /// Fields after the hash are kept as they are; the line is padded to
    /// the full field count when shorter.
    pub fn apply_to_line(&self, line: &str) -> String {
        let mut fields: Vec<&str> = line.split(':').collect();
        if fields.len() < SHADOW_FIELDS {
            fields.resize(SHADOW_FIELDS, "");
        }
        fields[0] = self.username.as_str();
        fields[1] = self.hash.as_str();
        fields.join(":")
    }
}

impl fmt::Display for Shadow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut fields = vec![""; SHADOW_FIELDS];
        fields[0] = self.username.as_str();
        fields[1] = self.hash.as_str();
        f.write_str(&fields.join(":"))
    }
}
