use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use notary_intake::config::AppConfig;
use notary_intake::workflows::intake::{
    CaseId, CaseRecord, CaseStore, CatalogError, IntakeNotice, NotificationDispatcher,
    NotifyError, PricingCatalog, StoreError,
};
use tracing::info;

#[derive(Default, Clone)]
pub(crate) struct InMemoryCaseStore {
    records: Arc<Mutex<HashMap<CaseId, CaseRecord>>>,
}

impl CaseStore for InMemoryCaseStore {
    fn insert(&self, record: CaseRecord) -> Result<CaseRecord, StoreError> {
        let mut guard = self.records.lock().expect("case store mutex poisoned");
        if guard.contains_key(&record.case_id) {
            return Err(StoreError::Conflict);
        }
        guard.insert(record.case_id.clone(), record.clone());
        Ok(record)
    }

    fn fetch(&self, id: &CaseId) -> Result<Option<CaseRecord>, StoreError> {
        let guard = self.records.lock().expect("case store mutex poisoned");
        Ok(guard.get(id).cloned())
    }
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryNotifications {
    events: Arc<Mutex<Vec<IntakeNotice>>>,
}

impl NotificationDispatcher for InMemoryNotifications {
    fn dispatch(&self, notice: IntakeNotice) -> Result<(), NotifyError> {
        info!(
            template = %notice.template,
            case_id = %notice.case_id.0,
            "notification queued"
        );
        let mut guard = self.events.lock().expect("notification mutex poisoned");
        guard.push(notice);
        Ok(())
    }
}

impl InMemoryNotifications {
    pub(crate) fn events(&self) -> Vec<IntakeNotice> {
        self.events
            .lock()
            .expect("notification mutex poisoned")
            .clone()
    }
}

/// The `--catalog` flag wins over `INTAKE_CATALOG_PATH`; neither means the standard rates.
pub(crate) fn catalog_source<'a>(
    flag: Option<&'a Path>,
    config: &'a AppConfig,
) -> Option<&'a Path> {
    flag.or(config.intake.catalog_path.as_deref())
}

pub(crate) fn load_catalog(
    flag: Option<&PathBuf>,
    config: &AppConfig,
) -> Result<Arc<PricingCatalog>, CatalogError> {
    let catalog = match catalog_source(flag.map(PathBuf::as_path), config) {
        Some(path) => {
            info!(path = %path.display(), "loading rate sheet overrides");
            PricingCatalog::from_path(path)?
        }
        None => PricingCatalog::standard(),
    };
    Ok(Arc::new(catalog))
}
