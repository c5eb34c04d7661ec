use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use repocache_core::storage::Entity;

use crate::storage::inmemory::Sequenced;

/// A host name bound to a content root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Domain {
    /// Database id, `0` until the domain is persisted.
    pub id: i32,
    pub key: Uuid,
    pub domain_name: String,
    pub root_content_id: Option<i32>,
    pub language_iso_code: Option<String>,
    pub create_date: DateTime<Utc>,
}

impl Domain {
    /// Creates a new, not yet persisted domain.
    pub fn new(domain_name: impl Into<String>) -> Self {
        Self {
            id: 0,
            key: Uuid::new_v4(),
            domain_name: domain_name.into(),
            root_content_id: None,
            language_iso_code: None,
            create_date: Utc::now(),
        }
    }

    /// Binds the domain to a content root.
    pub fn with_root_content(mut self, content_id: i32) -> Self {
        self.root_content_id = Some(content_id);
        self
    }

    /// Sets the culture served on this domain.
    pub fn with_language(mut self, iso_code: impl Into<String>) -> Self {
        self.language_iso_code = Some(iso_code.into());
        self
    }

    /// Sets a specific ID for this domain.
    #[cfg(test)]
    pub fn with_id(mut self, id: i32) -> Self {
        self.id = id;
        self
    }

    /// Returns true for wildcard domains such as `*1234`, which bind a
    /// language to a content node without a host name.
    pub fn is_wildcard(&self) -> bool {
        self.domain_name.starts_with('*')
    }
}

impl Entity for Domain {
    type Id = i32;
    const TYPE_NAME: &'static str = "Domain";

    fn id(&self) -> i32 {
        self.id
    }

    fn has_identity(&self) -> bool {
        self.id > 0
    }
}

impl Sequenced for Domain {
    fn assign_id(&mut self, id: i32) {
        self.id = id;
    }

    fn validate(&self) -> Result<(), String> {
        if self.domain_name.trim().is_empty() {
            return Err("domain name must not be empty".to_string());
        }
        Ok(())
    }
}
