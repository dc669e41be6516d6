use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// One of the two fixed participants.
///
/// The wire names are shared with the mobile client and the `role` CHECK
/// constraints in the database, so renaming a variant is a breaking change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "xiaoHuang")]
    XiaoHuang,
    #[serde(rename = "xiaoZhang")]
    XiaoZhang,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown role: {0}")]
pub struct UnknownRole(pub String);

impl Role {
    pub const ALL: [Self; 2] = [Self::XiaoHuang, Self::XiaoZhang];

    /// The other participant. A card sent by one role is always received by its partner.
    #[must_use]
    pub const fn partner(self) -> Self {
        match self {
            Self::XiaoHuang => Self::XiaoZhang,
            Self::XiaoZhang => Self::XiaoHuang,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::XiaoHuang => "xiaoHuang",
            Self::XiaoZhang => "xiaoZhang",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL.into_iter().find(|role| role.as_str() == s).ok_or_else(|| UnknownRole(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partner_is_the_other_role() {
        assert_eq!(Role::XiaoHuang.partner(), Role::XiaoZhang);
        assert_eq!(Role::XiaoZhang.partner(), Role::XiaoHuang);
    }

    #[test]
    fn test_partner_is_an_involution() {
        for role in Role::ALL {
            assert_ne!(role.partner(), role);
            assert_eq!(role.partner().partner(), role);
        }
    }

    #[test]
    fn test_parse_known_roles() {
        assert_eq!("xiaoHuang".parse::<Role>().unwrap(), Role::XiaoHuang);
        assert_eq!("xiaoZhang".parse::<Role>().unwrap(), Role::XiaoZhang);
    }

    #[test]
    fn test_parse_is_case_sensitive() {
        let err = "XiaoHuang".parse::<Role>().unwrap_err();
        assert_eq!(err, UnknownRole("XiaoHuang".to_string()));
        assert!("".parse::<Role>().is_err());
        assert!("someoneElse".parse::<Role>().is_err());
    }

    #[test]
    fn test_serde_uses_wire_names() {
        assert_eq!(serde_json::to_string(&Role::XiaoZhang).unwrap(), "\"xiaoZhang\"");
        let role: Role = serde_json::from_str("\"xiaoHuang\"").unwrap();
        assert_eq!(role, Role::XiaoHuang);
        assert!(serde_json::from_str::<Role>("\"nobody\"").is_err());
    }

    #[test]
    fn test_display_matches_wire_name() {
        for role in Role::ALL {
            assert_eq!(role.to_string(), role.as_str());
        }
    }
}
