// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-OpenDAM-Proprietary
//
// All rights reserved.
//
// This file is part of Open DAM and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Per-catalog configuration, stored as `.dam/config.json`.

use serde::{Deserialize, Serialize};

use crate::import::ImportOptions;
use crate::store::WriteDurability;

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DamConfig {
    pub durability: WriteDurability,
    /// Defaults for directory imports into this catalog.
    pub import: ImportOptions,
}

#[cfg(test)]
mod tests {
    use super::DamConfig;
    use crate::store::WriteDurability;

    #[test]
    fn empty_object_is_the_default_config() {
        let config: DamConfig = serde_json::from_str("{}").expect("config");
        assert_eq!(config, DamConfig::default());
    }

    #[test]
    fn fields_use_snake_case() {
        let config: DamConfig = serde_json::from_str(
            r#"{ "durability": "durable", "import": { "follow_links": true } }"#,
        )
        .expect("config");
        assert_eq!(config.durability, WriteDurability::Durable);
        assert!(config.import.follow_links);
        assert!(!config.import.include_hidden);
        assert_eq!(config.import.max_depth, None);
    }

    #[test]
    fn unknown_import_fields_are_rejected() {
        let result = serde_json::from_str::<DamConfig>(r#"{ "import": { "hidden": true } }"#);
        assert!(result.is_err());
    }
}
