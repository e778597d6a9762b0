use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::content::UnknownVariant;

/// The role a caller acts under. Passed explicitly into every lifecycle and
/// report operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActingRole {
    Admin,
    Editor,
    Viewer,
}

impl ActingRole {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ActingRole::Admin => "admin",
            ActingRole::Editor => "editor",
            ActingRole::Viewer => "viewer",
        }
    }

    /// Whether this role may change status or archive flags.
    #[must_use]
    pub fn can_edit_content(self) -> bool {
        matches!(self, ActingRole::Admin | ActingRole::Editor)
    }

    /// Whether this role may see archived pieces in reports.
    #[must_use]
    pub fn can_view_archived(self) -> bool {
        matches!(self, ActingRole::Admin)
    }
}

impl std::fmt::Display for ActingRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActingRole {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "admin" => Ok(ActingRole::Admin),
            "editor" => Ok(ActingRole::Editor),
            "viewer" => Ok(ActingRole::Viewer),
            _ => Err(UnknownVariant {
                kind: "role",
                value: s.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_admin_and_editor_edit() {
        assert!(ActingRole::Admin.can_edit_content());
        assert!(ActingRole::Editor.can_edit_content());
        assert!(!ActingRole::Viewer.can_edit_content());
    }

    #[test]
    fn only_admin_views_archived() {
        assert!(ActingRole::Admin.can_view_archived());
        assert!(!ActingRole::Editor.can_view_archived());
    }

    #[test]
    fn parses_role_names() {
        assert_eq!("ADMIN".parse::<ActingRole>(), Ok(ActingRole::Admin));
        assert!("owner".parse::<ActingRole>().is_err());
    }
}
