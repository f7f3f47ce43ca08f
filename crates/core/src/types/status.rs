//! Status enums for audit log entries.

use core::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Action recorded in the audit log.
///
/// The backend writes upper-case verbs; anything unrecognised is kept as-is
/// so new actions still render.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AuditAction {
    Create,
    Update,
    Delete,
    Login,
    Other(String),
}

impl AuditAction {
    /// Parse an action name, ignoring case.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.trim().to_ascii_uppercase().as_str() {
            "CREATE" => Self::Create,
            "UPDATE" => Self::Update,
            "DELETE" => Self::Delete,
            "LOGIN" => Self::Login,
            _ => Self::Other(s.trim().to_owned()),
        }
    }

    /// Wire name of the action.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Create => "CREATE",
            Self::Update => "UPDATE",
            Self::Delete => "DELETE",
            Self::Login => "LOGIN",
            Self::Other(s) => s,
        }
    }

    /// CSS badge variant for the audit table.
    #[must_use]
    pub const fn badge_class(&self) -> &'static str {
        match self {
            Self::Create => "badge-success",
            Self::Update => "badge-warning",
            Self::Delete => "badge-destructive",
            Self::Login => "badge-primary",
            Self::Other(_) => "badge-secondary",
        }
    }
}

impl fmt::Display for AuditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for AuditAction {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for AuditAction {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(Self::parse(&s))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!(AuditAction::parse("create"), AuditAction::Create);
        assert_eq!(AuditAction::parse("Login"), AuditAction::Login);
        assert_eq!(
            AuditAction::parse("EXPORT"),
            AuditAction::Other("EXPORT".to_owned())
        );
    }

    #[test]
    fn test_badge_classes() {
        assert_eq!(AuditAction::Create.badge_class(), "badge-success");
        assert_eq!(AuditAction::Update.badge_class(), "badge-warning");
        assert_eq!(AuditAction::Delete.badge_class(), "badge-destructive");
        assert_eq!(AuditAction::Login.badge_class(), "badge-primary");
    }

    #[test]
    fn test_deserialize_unknown_action() {
        let action: AuditAction = serde_json::from_str("\"RESTORE\"").unwrap();
        assert_eq!(action.as_str(), "RESTORE");
    }
}
