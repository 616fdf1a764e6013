pub mod models;
pub mod query;
pub mod types;

pub use models::{Issue, IssueLabel, Label};
pub use query::{parse_date, FormInput, IssueQueryParams, Query, SettingsRecord};
pub use types::{
    GroupId, GroupName, GroupUpdate, SettingsMeta, SettingsTable, TabId, WindowId, AREA_PREFIX,
    DEFAULT_DAYS, MAX_DAYS, MIN_DAYS, NEEDS_DISCUSSION_LABEL, OTHER_GROUP, SETTINGS_VERSION,
};

pub use crate::icons::SPINNER_FRAMES;
