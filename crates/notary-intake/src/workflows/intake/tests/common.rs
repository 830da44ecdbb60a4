use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::workflows::intake::domain::{
    AddonId, ApostilleRegion, BookingOption, Delivery, LocationType, ServiceSelection,
    ServiceType, Urgency,
};
use crate::workflows::intake::form::{FormLayout, FormStateController};
use crate::workflows::intake::handoff::{
    CaseId, CaseRecord, CaseStore, IntakeNotice, NotificationDispatcher, NotifyError, StoreError,
};
use crate::workflows::intake::{PricingCatalog, QuoteEngine};

pub(super) fn engine() -> QuoteEngine {
    QuoteEngine::new(Arc::new(PricingCatalog::standard()))
}

pub(super) fn controller() -> FormStateController {
    FormStateController::new(engine(), FormLayout::default())
}

pub(super) fn apostille(region: Option<ApostilleRegion>, documents: u32) -> ServiceSelection {
    ServiceSelection {
        region,
        num_documents: documents,
        ..ServiceSelection::for_service(ServiceType::Apostille)
    }
}

pub(super) fn power_of_attorney_mobile_expedited() -> ServiceSelection {
    ServiceSelection {
        location_type: Some(LocationType::Mobile),
        urgency: Urgency::Expedited,
        delivery: Delivery::StandardMail,
        ..ServiceSelection::for_service(ServiceType::PowerOfAttorney)
    }
}

pub(super) fn remote_deposition(
    hours: u32,
    addons: &[AddonId],
    booking: &[BookingOption],
) -> ServiceSelection {
    ServiceSelection {
        session_hours: hours,
        addons: addons.iter().copied().collect(),
        remote_urgency: booking.iter().copied().collect(),
        ..ServiceSelection::for_service(ServiceType::RemoteDeposition)
    }
}

#[derive(Default)]
pub(super) struct MemoryCaseStore {
    records: Mutex<HashMap<CaseId, CaseRecord>>,
}

impl CaseStore for MemoryCaseStore {
    fn insert(&self, record: CaseRecord) -> Result<CaseRecord, StoreError> {
        let mut guard = self.records.lock().expect("case mutex poisoned");
        if guard.contains_key(&record.case_id) {
            return Err(StoreError::Conflict);
        }
        guard.insert(record.case_id.clone(), record.clone());
        Ok(record)
    }

    fn fetch(&self, id: &CaseId) -> Result<Option<CaseRecord>, StoreError> {
        let guard = self.records.lock().expect("case mutex poisoned");
        Ok(guard.get(id).cloned())
    }
}

impl MemoryCaseStore {
    pub(super) fn len(&self) -> usize {
        self.records.lock().expect("case mutex poisoned").len()
    }
}

pub(super) struct UnavailableCaseStore;

impl CaseStore for UnavailableCaseStore {
    fn insert(&self, _record: CaseRecord) -> Result<CaseRecord, StoreError> {
        Err(StoreError::Unavailable("maintenance window".to_string()))
    }

    fn fetch(&self, _id: &CaseId) -> Result<Option<CaseRecord>, StoreError> {
        Err(StoreError::Unavailable("maintenance window".to_string()))
    }
}

#[derive(Default)]
pub(super) struct MemoryNotifications {
    events: Mutex<Vec<IntakeNotice>>,
}

impl NotificationDispatcher for MemoryNotifications {
    fn dispatch(&self, notice: IntakeNotice) -> Result<(), NotifyError> {
        self.events
            .lock()
            .expect("notification mutex poisoned")
            .push(notice);
        Ok(())
    }
}

impl MemoryNotifications {
    pub(super) fn events(&self) -> Vec<IntakeNotice> {
        self.events
            .lock()
            .expect("notification mutex poisoned")
            .clone()
    }
}

pub(super) struct OfflineNotifications;

impl NotificationDispatcher for OfflineNotifications {
    fn dispatch(&self, _notice: IntakeNotice) -> Result<(), NotifyError> {
        Err(NotifyError::Transport("sms gateway offline".to_string()))
    }
}
