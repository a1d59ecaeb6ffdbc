//! # Domain Types
//!
//! Common data structures and enums shared by configuration, dispatch and the HTTP client.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Static gate deciding whether mutating tools are exposed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessLevel {
    #[default]
    ReadOnly,
    Full,
}

impl AccessLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccessLevel::ReadOnly => "read_only",
            AccessLevel::Full => "full",
        }
    }

    /// Whether a tool with the given access requirement may run at this level.
    pub fn permits(&self, access: ToolAccess) -> bool {
        match access {
            ToolAccess::Read => true,
            ToolAccess::Write => *self == AccessLevel::Full,
        }
    }
}

impl FromStr for AccessLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "read_only" => Ok(AccessLevel::ReadOnly),
            "full" => Ok(AccessLevel::Full),
            other => Err(format!(
                "unknown access level '{other}' (expected read_only or full)"
            )),
        }
    }
}

impl fmt::Display for AccessLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How credentials are presented to Airflow.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthType {
    #[default]
    Basic,
    Jwt,
}

impl AuthType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthType::Basic => "basic",
            AuthType::Jwt => "jwt",
        }
    }
}

impl FromStr for AuthType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "basic" => Ok(AuthType::Basic),
            "jwt" => Ok(AuthType::Jwt),
            other => Err(format!("unknown auth type '{other}' (expected basic or jwt)")),
        }
    }
}

impl fmt::Display for AuthType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Access requirement of a single tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolAccess {
    Read,
    Write,
}

/// Pagination window forwarded to list endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub limit: u32,
    pub offset: u32,
}

impl Default for Page {
    fn default() -> Self {
        Self {
            limit: default_limit(),
            offset: 0,
        }
    }
}

impl Page {
    pub fn new(limit: u32, offset: u32) -> Self {
        Self { limit, offset }
    }

    pub fn query(&self) -> [(&'static str, String); 2] {
        [
            ("limit", self.limit.to_string()),
            ("offset", self.offset.to_string()),
        ]
    }
}

/// `.` and `..` cannot travel as a literal URL path segment.
pub fn is_dot_segment(segment: &str) -> bool {
    segment == "." || segment == ".."
}

pub fn default_limit() -> u32 {
    100
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_access_level_parsing() {
        assert_eq!("read_only".parse::<AccessLevel>(), Ok(AccessLevel::ReadOnly));
        assert_eq!("FULL".parse::<AccessLevel>(), Ok(AccessLevel::Full));
        assert!("admin".parse::<AccessLevel>().is_err());
    }

    #[test]
    fn test_access_level_permits() {
        assert!(AccessLevel::ReadOnly.permits(ToolAccess::Read));
        assert!(!AccessLevel::ReadOnly.permits(ToolAccess::Write));
        assert!(AccessLevel::Full.permits(ToolAccess::Write));
    }

    #[test]
    fn test_auth_type_round_trip_through_yaml() {
        let parsed: AuthType = serde_yaml::from_str("jwt").unwrap();
        assert_eq!(parsed, AuthType::Jwt);
        assert_eq!(AuthType::Basic.to_string(), "basic");
    }

    #[test]
    fn test_page_defaults() {
        let page = Page::default();
        assert_eq!(page.limit, 100);
        assert_eq!(page.offset, 0);
        assert_eq!(
            page.query(),
            [("limit", "100".to_string()), ("offset", "0".to_string())]
        );
    }
}
