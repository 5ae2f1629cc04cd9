use std::sync::Arc;

use chrono::NaiveDate;
use uuid::Uuid;

use super::errors::{AuthError, DomainError};
use super::invoice::{CustomerSummary, InvoiceDraft, InvoiceView, ListResult};

/// Persistence collaborator for invoice records. Referential integrity of
/// `customer_id` is the store's constraint to enforce; callers only see the
/// reported failure.
pub trait InvoiceStore: Send + Sync + 'static {
    fn insert(&self, draft: &InvoiceDraft, date: NaiveDate) -> Result<Uuid, DomainError>;
    fn update(&self, id: Uuid, draft: &InvoiceDraft) -> Result<(), DomainError>;
    fn delete(&self, id: Uuid) -> Result<(), DomainError>;
    fn find_by_id(&self, id: Uuid) -> Result<Option<InvoiceView>, DomainError>;
    fn list(&self, query: &str, page: i64, limit: i64) -> Result<ListResult, DomainError>;
}

pub trait CustomerDirectory: Send + Sync + 'static {
    fn search(&self, query: &str) -> Result<Vec<CustomerSummary>, DomainError>;
}

/// Cache/view-invalidation collaborator. Invalidation is fire-and-forget:
/// the caller requests it and moves on without confirmation.
pub trait ListingCache: Send + Sync + 'static {
    fn invalidate(&self, path: &str);
}

/// Authentication collaborator: checks a credential pair and classifies any
/// failure (see `AuthError`).
pub trait CredentialVerifier: Send + Sync + 'static {
    fn verify(&self, email: &str, password: &str) -> Result<(), AuthError>;
}

impl<T: InvoiceStore> InvoiceStore for Arc<T> {
    fn insert(&self, draft: &InvoiceDraft, date: NaiveDate) -> Result<Uuid, DomainError> {
        (**self).insert(draft, date)
    }

    fn update(&self, id: Uuid, draft: &InvoiceDraft) -> Result<(), DomainError> {
        (**self).update(id, draft)
    }

    fn delete(&self, id: Uuid) -> Result<(), DomainError> {
        (**self).delete(id)
    }

    fn find_by_id(&self, id: Uuid) -> Result<Option<InvoiceView>, DomainError> {
        (**self).find_by_id(id)
    }

    fn list(&self, query: &str, page: i64, limit: i64) -> Result<ListResult, DomainError> {
        (**self).list(query, page, limit)
    }
}

impl<T: ListingCache> ListingCache for Arc<T> {
    fn invalidate(&self, path: &str) {
        (**self).invalidate(path)
    }
}
