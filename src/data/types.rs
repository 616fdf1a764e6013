use sea_query::Iden;
use std::fmt;

pub const SETTINGS_VERSION: i32 = 1;

/// Label prefix that puts an issue into a named tab group.
pub const AREA_PREFIX: &str = "area:";

/// Group used for issues without an `area:` label.
pub const OTHER_GROUP: &str = "Other";

/// Pull requests are only kept when they carry this label.
pub const NEEDS_DISCUSSION_LABEL: &str = "needs discussion";

pub const DEFAULT_DAYS: u32 = 3;
pub const MIN_DAYS: u32 = 1;
pub const MAX_DAYS: u32 = 60;

// Database table identifiers
#[derive(Iden)]
pub enum SettingsMeta {
    Table,
    Key,
    Value,
}

#[derive(Iden)]
pub enum SettingsTable {
    Table,
    Key,
    Value,
}

// Browser identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WindowId(pub i64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TabId(pub i64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GroupId(pub i64);

impl fmt::Display for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "window:{}", self.0)
    }
}

impl fmt::Display for TabId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tab:{}", self.0)
    }
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "group:{}", self.0)
    }
}

/// Title of a tab group: the first `area:` label of an issue, or `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GroupName(String);

impl GroupName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn other() -> Self {
        Self(OTHER_GROUP.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_other(&self) -> bool {
        self.0 == OTHER_GROUP
    }
}

impl fmt::Display for GroupName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Display properties applied to a tab group after every membership change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupUpdate {
    pub title: String,
    pub collapsed: bool,
}

impl GroupUpdate {
    pub fn collapsed(title: &GroupName) -> Self {
        Self {
            title: title.to_string(),
            collapsed: true,
        }
    }
}
