// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SettingKey {
    UserDisplayName,
}

impl SettingKey {
    pub const ALL: [Self; 1] = [Self::UserDisplayName];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::UserDisplayName => "user.display_name",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "user.display_name" => Some(Self::UserDisplayName),
            _ => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::UserDisplayName => "usuario activo",
        }
    }
}

/// Trims a candidate user name; `None` means "nothing to store".
pub fn normalize_user_name(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_owned())
    }
}
