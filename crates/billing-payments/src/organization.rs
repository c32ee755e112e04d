//! Organization Storage
//!
//! Maps public organization uids to the Stripe customer that pays for them.

use billing_core::Organization;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::RwLock;

use crate::error::{PaymentError, Result};

/// Generate a new organization uid (`org` + 22 hex chars)
pub fn generate_uid() -> String {
    let hex = uuid::Uuid::new_v4().simple().to_string();
    format!("org{}", &hex[..22])
}

/// An organization and its billing customer
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct OrganizationRecord {
    /// Public organization data
    pub organization: Organization,
    
    /// Stripe customer id (`cus_...`), None until the first purchase
    pub customer_id: Option<String>,
}

impl OrganizationRecord {
    /// Create a record for a new organization
    pub fn new(uid: impl Into<String>, name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            organization: Organization {
                id: uid.into(),
                name: name.into(),
                is_active: true,
                created: now,
                modified: now,
            },
            customer_id: None,
        }
    }
    
    #[must_use]
    pub fn with_customer(mut self, customer_id: impl Into<String>) -> Self {
        self.customer_id = Some(customer_id.into());
        self
    }
    
    pub fn uid(&self) -> &str {
        &self.organization.id
    }
    
    /// Stripe customer, or an error naming the organization
    pub fn require_customer(&self) -> Result<&str> {
        self.customer_id
            .as_deref()
            .ok_or_else(|| PaymentError::NoCustomer(self.organization.id.clone()))
    }
}

/// Organization storage trait
pub trait OrganizationStore: Send + Sync {
    /// Save or update an organization
    fn save(&self, record: &OrganizationRecord) -> Result<()>;
    
    /// Get organization by uid
    fn get(&self, uid: &str) -> Result<Option<OrganizationRecord>>;
    
    /// All organizations, oldest first
    fn list(&self) -> Result<Vec<OrganizationRecord>>;
    
    /// Get organization by uid or fail
    fn require(&self, uid: &str) -> Result<OrganizationRecord> {
        self.get(uid)?
            .ok_or_else(|| PaymentError::OrganizationNotFound(uid.to_string()))
    }
}

/// In-memory organization store (for development)
pub struct MemoryOrganizationStore {
    organizations: RwLock<HashMap<String, OrganizationRecord>>,
}

impl Default for MemoryOrganizationStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryOrganizationStore {
    pub fn new() -> Self {
        Self {
            organizations: RwLock::new(HashMap::new()),
        }
    }
}

fn poisoned<T>(_: T) -> PaymentError {
    PaymentError::Storage("organization store lock poisoned".into())
}

impl OrganizationStore for MemoryOrganizationStore {
    fn save(&self, record: &OrganizationRecord) -> Result<()> {
        let mut organizations = self.organizations.write().map_err(poisoned)?;
        let mut record = record.clone();
        record.organization.modified = Utc::now();
        organizations.insert(record.uid().to_string(), record);
        Ok(())
    }
    
    fn get(&self, uid: &str) -> Result<Option<OrganizationRecord>> {
        let organizations = self.organizations.read().map_err(poisoned)?;
        Ok(organizations.get(uid).cloned())
    }
    
    fn list(&self) -> Result<Vec<OrganizationRecord>> {
        let organizations = self.organizations.read().map_err(poisoned)?;
        let mut result: Vec<_> = organizations.values().cloned().collect();
        result.sort_by(|a, b| {
            a.organization
                .created
                .cmp(&b.organization.created)
                .then_with(|| a.organization.id.cmp(&b.organization.id))
        });
        Ok(result)
    }
}
