use chrono::Utc;
use uuid::Uuid;

use crate::domain::errors::DomainError;
use crate::domain::form::{parse_invoice_form, FieldErrors, FormInput};
use crate::domain::invoice::{InvoiceView, ListResult};
use crate::domain::ports::{InvoiceStore, ListingCache};

/// Path of the invoices listing; mutations invalidate it and redirect to it.
pub const INVOICES_PATH: &str = "/dashboard/invoices";

/// Outcome of a mutation. The pipeline never unwinds for control flow: the
/// caller receives one of these variants and acts on it.
#[derive(Debug)]
pub enum ActionOutcome {
    /// Mutation succeeded; transfer control to the given path.
    Redirect(String),
    /// Mutation succeeded in place; show the confirmation message.
    Completed(String),
    /// Validation failed; nothing was persisted.
    Invalid {
        field_errors: FieldErrors,
        message: String,
    },
    /// Validation passed but the store reported failure.
    Failed(String),
}

/// The validated mutation pipeline for invoice create/update/delete: parse
/// and validate the form, persist, invalidate the cached listing, then hand
/// the caller a redirect. Stateless and reentrant; the store and cache are
/// the only shared resources.
pub struct InvoiceActions<S, C> {
    store: S,
    cache: C,
}

impl<S: InvoiceStore, C: ListingCache> InvoiceActions<S, C> {
    pub fn new(store: S, cache: C) -> Self {
        Self { store, cache }
    }

    pub fn create_invoice(&self, form: &FormInput) -> ActionOutcome {
        let draft = match parse_invoice_form(form) {
            Ok(draft) => draft,
            Err(field_errors) => {
                return ActionOutcome::Invalid {
                    field_errors,
                    message: "Missing Fields. Failed to Create Invoice.".to_string(),
                }
            }
        };

        let date = Utc::now().date_naive();
        match self.store.insert(&draft, date) {
            Ok(id) => {
                log::info!("created invoice {} for customer {}", id, draft.customer_id);
                self.cache.invalidate(INVOICES_PATH);
                ActionOutcome::Redirect(INVOICES_PATH.to_string())
            }
            Err(e) => {
                log::error!("invoice insert failed: {}", e);
                ActionOutcome::Failed("Database Error: Failed to Create Invoice.".to_string())
            }
        }
    }

    pub fn update_invoice(&self, id: Uuid, form: &FormInput) -> ActionOutcome {
        let draft = match parse_invoice_form(form) {
            Ok(draft) => draft,
            Err(field_errors) => {
                return ActionOutcome::Invalid {
                    field_errors,
                    message: "Missing Fields. Failed to Update Invoice.".to_string(),
                }
            }
        };

        // The creation date stays untouched; only customer, amount, and
        // status are replaceable.
        match self.store.update(id, &draft) {
            Ok(()) => {
                log::info!("updated invoice {}", id);
                self.cache.invalidate(INVOICES_PATH);
                ActionOutcome::Redirect(INVOICES_PATH.to_string())
            }
            Err(e) => {
                log::error!("invoice update failed for {}: {}", id, e);
                ActionOutcome::Failed("Database Error: Failed to Update Invoice.".to_string())
            }
        }
    }

    pub fn delete_invoice(&self, id: Uuid) -> ActionOutcome {
        match self.store.delete(id) {
            Ok(()) => {
                log::info!("deleted invoice {}", id);
                self.cache.invalidate(INVOICES_PATH);
                ActionOutcome::Completed("Deleted Invoice.".to_string())
            }
            Err(e) => {
                log::error!("invoice delete failed for {}: {}", id, e);
                ActionOutcome::Failed("Database Error: Failed to Delete Invoice.".to_string())
            }
        }
    }

    pub fn get_invoice(&self, id: Uuid) -> Result<Option<InvoiceView>, DomainError> {
        self.store.find_by_id(id)
    }

    pub fn list_invoices(
        &self,
        query: &str,
        page: i64,
        limit: i64,
    ) -> Result<ListResult, DomainError> {
        self.store.list(query, page, limit)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    use chrono::{NaiveDate, Utc};
    use uuid::Uuid;

    use super::*;
    use crate::domain::form::{AMOUNT_ERROR, STATUS_ERROR};
    use crate::domain::invoice::{InvoiceDraft, InvoiceStatus, InvoiceView, ListResult};

    #[derive(Debug, Clone)]
    struct StoredInvoice {
        draft: InvoiceDraft,
        date: NaiveDate,
    }

    #[derive(Default)]
    struct InMemoryStore {
        rows: Mutex<HashMap<Uuid, StoredInvoice>>,
    }

    impl InMemoryStore {
        fn row(&self, id: Uuid) -> Option<StoredInvoice> {
            self.rows.lock().unwrap().get(&id).cloned()
        }

        fn len(&self) -> usize {
            self.rows.lock().unwrap().len()
        }

        fn seed(&self, draft: InvoiceDraft, date: NaiveDate) -> Uuid {
            let id = Uuid::new_v4();
            self.rows
                .lock()
                .unwrap()
                .insert(id, StoredInvoice { draft, date });
            id
        }
    }

    impl InvoiceStore for InMemoryStore {
        fn insert(&self, draft: &InvoiceDraft, date: NaiveDate) -> Result<Uuid, DomainError> {
            let id = Uuid::new_v4();
            self.rows.lock().unwrap().insert(
                id,
                StoredInvoice {
                    draft: draft.clone(),
                    date,
                },
            );
            Ok(id)
        }

        fn update(&self, id: Uuid, draft: &InvoiceDraft) -> Result<(), DomainError> {
            let mut rows = self.rows.lock().unwrap();
            let row = rows.get_mut(&id).ok_or(DomainError::NotFound)?;
            row.draft = draft.clone();
            Ok(())
        }

        fn delete(&self, id: Uuid) -> Result<(), DomainError> {
            self.rows
                .lock()
                .unwrap()
                .remove(&id)
                .map(|_| ())
                .ok_or(DomainError::NotFound)
        }

        fn find_by_id(&self, id: Uuid) -> Result<Option<InvoiceView>, DomainError> {
            Ok(self.row(id).map(|row| InvoiceView {
                id,
                customer_id: row.draft.customer_id,
                customer_name: "Ada Lovelace".to_string(),
                customer_email: "ada@example.com".to_string(),
                customer_image_url: String::new(),
                amount_cents: row.draft.amount_cents,
                status: row.draft.status,
                date: row.date,
            }))
        }

        fn list(&self, _query: &str, _page: i64, _limit: i64) -> Result<ListResult, DomainError> {
            let rows = self.rows.lock().unwrap();
            Ok(ListResult {
                items: vec![],
                total: rows.len() as i64,
            })
        }
    }

    /// A store whose every operation fails, standing in for an unreachable
    /// database.
    struct OfflineStore;

    impl InvoiceStore for OfflineStore {
        fn insert(&self, _: &InvoiceDraft, _: NaiveDate) -> Result<Uuid, DomainError> {
            Err(DomainError::Internal("connection refused".to_string()))
        }

        fn update(&self, _: Uuid, _: &InvoiceDraft) -> Result<(), DomainError> {
            Err(DomainError::Internal("connection refused".to_string()))
        }

        fn delete(&self, _: Uuid) -> Result<(), DomainError> {
            Err(DomainError::Internal("connection refused".to_string()))
        }

        fn find_by_id(&self, _: Uuid) -> Result<Option<InvoiceView>, DomainError> {
            Err(DomainError::Internal("connection refused".to_string()))
        }

        fn list(&self, _: &str, _: i64, _: i64) -> Result<ListResult, DomainError> {
            Err(DomainError::Internal("connection refused".to_string()))
        }
    }

    #[derive(Default)]
    struct RecordingCache {
        invalidations: Mutex<Vec<String>>,
    }

    impl RecordingCache {
        fn invalidated(&self) -> Vec<String> {
            self.invalidations.lock().unwrap().clone()
        }
    }

    impl ListingCache for RecordingCache {
        fn invalidate(&self, path: &str) {
            self.invalidations.lock().unwrap().push(path.to_string());
        }
    }

    fn form(customer_id: &str, amount: &str, status: &str) -> FormInput {
        [
            ("customerId", customer_id),
            ("amount", amount),
            ("status", status),
        ]
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
    }

    fn customer() -> Uuid {
        Uuid::new_v4()
    }

    fn actions() -> (
        InvoiceActions<Arc<InMemoryStore>, Arc<RecordingCache>>,
        Arc<InMemoryStore>,
        Arc<RecordingCache>,
    ) {
        let store = Arc::new(InMemoryStore::default());
        let cache = Arc::new(RecordingCache::default());
        (
            InvoiceActions::new(store.clone(), cache.clone()),
            store,
            cache,
        )
    }

    #[test]
    fn create_persists_invalidates_once_and_redirects() {
        let (actions, store, cache) = actions();
        let customer_id = customer();

        let outcome = actions.create_invoice(&form(&customer_id.to_string(), "50.5", "paid"));

        match outcome {
            ActionOutcome::Redirect(path) => assert_eq!(path, INVOICES_PATH),
            other => panic!("expected redirect, got {:?}", other),
        }
        assert_eq!(store.len(), 1);
        let row = store.rows.lock().unwrap().values().next().cloned().unwrap();
        assert_eq!(row.draft.customer_id, customer_id);
        assert_eq!(row.draft.amount_cents, 5050);
        assert_eq!(row.draft.status, InvoiceStatus::Paid);
        assert_eq!(row.date, Utc::now().date_naive());
        assert_eq!(cache.invalidated(), vec![INVOICES_PATH.to_string()]);
    }

    #[test]
    fn create_with_zero_amount_reports_field_error_and_persists_nothing() {
        let (actions, store, cache) = actions();

        let outcome = actions.create_invoice(&form(&customer().to_string(), "0", "pending"));

        match outcome {
            ActionOutcome::Invalid {
                field_errors,
                message,
            } => {
                assert_eq!(message, "Missing Fields. Failed to Create Invoice.");
                assert_eq!(field_errors["amount"], vec![AMOUNT_ERROR.to_string()]);
            }
            other => panic!("expected validation failure, got {:?}", other),
        }
        assert_eq!(store.len(), 0);
        assert!(cache.invalidated().is_empty());
    }

    #[test]
    fn create_against_offline_store_reports_summary_only() {
        let cache = Arc::new(RecordingCache::default());
        let actions = InvoiceActions::new(OfflineStore, cache.clone());

        let outcome = actions.create_invoice(&form(&customer().to_string(), "12", "pending"));

        match outcome {
            ActionOutcome::Failed(message) => {
                assert_eq!(message, "Database Error: Failed to Create Invoice.")
            }
            other => panic!("expected failure, got {:?}", other),
        }
        assert!(cache.invalidated().is_empty());
    }

    #[test]
    fn update_replaces_fields_but_keeps_the_date() {
        let (actions, store, cache) = actions();
        let original_date = NaiveDate::from_ymd_opt(2023, 11, 14).unwrap();
        let id = store.seed(
            InvoiceDraft {
                customer_id: customer(),
                amount_cents: 1000,
                status: InvoiceStatus::Pending,
            },
            original_date,
        );
        let new_customer = customer();

        let outcome = actions.update_invoice(id, &form(&new_customer.to_string(), "25", "paid"));

        match outcome {
            ActionOutcome::Redirect(path) => assert_eq!(path, INVOICES_PATH),
            other => panic!("expected redirect, got {:?}", other),
        }
        let row = store.row(id).unwrap();
        assert_eq!(row.draft.customer_id, new_customer);
        assert_eq!(row.draft.amount_cents, 2500);
        assert_eq!(row.draft.status, InvoiceStatus::Paid);
        assert_eq!(row.date, original_date);
        assert_eq!(cache.invalidated().len(), 1);
    }

    #[test]
    fn update_with_unknown_status_leaves_the_row_unchanged() {
        let (actions, store, cache) = actions();
        let draft = InvoiceDraft {
            customer_id: customer(),
            amount_cents: 1000,
            status: InvoiceStatus::Pending,
        };
        let date = Utc::now().date_naive();
        let id = store.seed(draft.clone(), date);

        let outcome =
            actions.update_invoice(id, &form(&draft.customer_id.to_string(), "25", "archived"));

        match outcome {
            ActionOutcome::Invalid { field_errors, .. } => {
                assert_eq!(field_errors["status"], vec![STATUS_ERROR.to_string()]);
            }
            other => panic!("expected validation failure, got {:?}", other),
        }
        let row = store.row(id).unwrap();
        assert_eq!(row.draft, draft);
        assert!(cache.invalidated().is_empty());
    }

    #[test]
    fn delete_invalidates_and_confirms() {
        let (actions, store, cache) = actions();
        let id = store.seed(
            InvoiceDraft {
                customer_id: customer(),
                amount_cents: 500,
                status: InvoiceStatus::Paid,
            },
            Utc::now().date_naive(),
        );

        let outcome = actions.delete_invoice(id);

        match outcome {
            ActionOutcome::Completed(message) => assert_eq!(message, "Deleted Invoice."),
            other => panic!("expected confirmation, got {:?}", other),
        }
        assert_eq!(store.len(), 0);
        assert_eq!(cache.invalidated(), vec![INVOICES_PATH.to_string()]);
    }

    #[test]
    fn delete_of_missing_invoice_reports_failure_without_invalidation() {
        let (actions, _store, cache) = actions();

        let outcome = actions.delete_invoice(Uuid::new_v4());

        match outcome {
            ActionOutcome::Failed(message) => {
                assert_eq!(message, "Database Error: Failed to Delete Invoice.")
            }
            other => panic!("expected failure, got {:?}", other),
        }
        assert!(cache.invalidated().is_empty());
    }
}
