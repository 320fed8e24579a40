use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use axum::response::Response;
use serde_json::Value;

use crate::workflows::deals::domain::{
    DealId, DealInput, DealRecord, DealStatus, DealSubmission, FinancingPref, PropertyType,
};
use crate::workflows::deals::repository::{DealRepository, RepositoryError, SettingsStore};
use crate::workflows::deals::settings::Settings;
use crate::workflows::deals::{deal_router, DealPipelineService};

/// Cash purchase with explicit taxes and insurance; NOI 784, CoC 7.5.
pub(super) fn cash_input() -> DealInput {
    DealInput {
        list_price: 100_000.0,
        arv_estimate: Some(130_000.0),
        repair_estimate: 20_000.0,
        monthly_rent: 1_200.0,
        taxes_insurance_monthly: 200.0,
        assignment_fee: 5_000.0,
        financing_pref: FinancingPref::Cash,
        ..DealInput::default()
    }
}

/// Larger rental where seller financing out-earns cash.
pub(super) fn leveraged_input() -> DealInput {
    DealInput {
        list_price: 300_000.0,
        arv_estimate: Some(400_000.0),
        monthly_rent: 3_000.0,
        financing_pref: FinancingPref::Any,
        ..DealInput::default()
    }
}

/// Cash deal clearing the default criteria at exactly 15% CoC.
pub(super) fn strong_submission() -> DealSubmission {
    DealSubmission {
        address: "1400 Maple Drive".to_string(),
        city: "Memphis".to_string(),
        state: "TN".to_string(),
        zip: Some("38111".to_string()),
        lat: None,
        lng: None,
        list_price: 80_000.0,
        original_price: Some(95_000.0),
        days_on_market: 150,
        property_type: PropertyType::Sfr,
        beds: 3,
        baths: 1.5,
        sqft: Some(1_200.0),
        lot_size_sqft: None,
        year_built: Some(1962),
        link: None,
        photo_url: None,
        listing_agent_name: Some("Dana Whitfield".to_string()),
        listing_agent_phone: None,
        listing_agent_email: None,
        brokerage: None,
        notes: None,
        arv_estimate: None,
        repair_estimate: 15_000.0,
        monthly_rent: 2_000.0,
        taxes_insurance_monthly: 390.0,
        assignment_fee: 5_000.0,
        financing_pref: FinancingPref::Cash,
        source: "manual_add".to_string(),
    }
}

pub(super) fn build_service() -> (
    DealPipelineService<MemoryDealRepository, MemorySettingsStore>,
    Arc<MemoryDealRepository>,
    Arc<MemorySettingsStore>,
) {
    let repository = Arc::new(MemoryDealRepository::default());
    let settings = Arc::new(MemorySettingsStore::default());
    let service = DealPipelineService::new(repository.clone(), settings.clone());
    (service, repository, settings)
}

#[derive(Default, Clone)]
pub(super) struct MemoryDealRepository {
    pub(super) records: Arc<Mutex<HashMap<DealId, DealRecord>>>,
}

impl DealRepository for MemoryDealRepository {
    fn insert(&self, record: DealRecord) -> Result<DealRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&record.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(record.id.clone(), record.clone());
        Ok(record)
    }

    fn update(&self, record: DealRecord) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if !guard.contains_key(&record.id) {
            return Err(RepositoryError::NotFound);
        }
        guard.insert(record.id.clone(), record);
        Ok(())
    }

    fn fetch(&self, id: &DealId) -> Result<Option<DealRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn list(&self, status: Option<DealStatus>) -> Result<Vec<DealRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard
            .values()
            .filter(|record| status.map_or(true, |status| record.status == status))
            .cloned()
            .collect())
    }

    fn delete(&self, id: &DealId) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        guard.remove(id).map(|_| ()).ok_or(RepositoryError::NotFound)
    }
}

#[derive(Default, Clone)]
pub(super) struct MemorySettingsStore {
    pub(super) current: Arc<Mutex<Option<Settings>>>,
}

impl MemorySettingsStore {
    pub(super) fn stored(&self) -> Option<Settings> {
        self.current.lock().expect("settings mutex poisoned").clone()
    }
}

impl SettingsStore for MemorySettingsStore {
    fn load(&self) -> Result<Option<Settings>, RepositoryError> {
        Ok(self.stored())
    }

    fn save(&self, settings: &Settings) -> Result<(), RepositoryError> {
        *self.current.lock().expect("settings mutex poisoned") = Some(settings.clone());
        Ok(())
    }
}

/// Accepts reads but refuses every write.
pub(super) struct ReadOnlyRepository;

impl DealRepository for ReadOnlyRepository {
    fn insert(&self, _record: DealRecord) -> Result<DealRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("read only".to_string()))
    }

    fn update(&self, _record: DealRecord) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("read only".to_string()))
    }

    fn fetch(&self, _id: &DealId) -> Result<Option<DealRecord>, RepositoryError> {
        Ok(None)
    }

    fn list(&self, _status: Option<DealStatus>) -> Result<Vec<DealRecord>, RepositoryError> {
        Ok(Vec::new())
    }

    fn delete(&self, _id: &DealId) -> Result<(), RepositoryError> {
        Err(RepositoryError::NotFound)
    }
}

/// Memory-backed repository that can stall listings or fail one update.
#[derive(Default)]
pub(super) struct FaultyRepository {
    pub(super) inner: MemoryDealRepository,
    pub(super) list_delay: Duration,
    pub(super) fail_update_at: Option<usize>,
    updates: AtomicUsize,
}

impl FaultyRepository {
    pub(super) fn failing_update(call: usize) -> Self {
        Self {
            fail_update_at: Some(call),
            ..Self::default()
        }
    }

    pub(super) fn slow_list(delay: Duration) -> Self {
        Self {
            list_delay: delay,
            ..Self::default()
        }
    }
}

impl DealRepository for FaultyRepository {
    fn insert(&self, record: DealRecord) -> Result<DealRecord, RepositoryError> {
        self.inner.insert(record)
    }

    fn update(&self, record: DealRecord) -> Result<(), RepositoryError> {
        let call = self.updates.fetch_add(1, Ordering::SeqCst) + 1;
        if self.fail_update_at == Some(call) {
            return Err(RepositoryError::Unavailable("disk full".to_string()));
        }
        self.inner.update(record)
    }

    fn fetch(&self, id: &DealId) -> Result<Option<DealRecord>, RepositoryError> {
        self.inner.fetch(id)
    }

    fn list(&self, status: Option<DealStatus>) -> Result<Vec<DealRecord>, RepositoryError> {
        let records = self.inner.list(status)?;
        thread::sleep(self.list_delay);
        Ok(records)
    }

    fn delete(&self, id: &DealId) -> Result<(), RepositoryError> {
        self.inner.delete(id)
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

pub(super) async fn read_text_body(response: Response) -> String {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    String::from_utf8(body.to_vec()).expect("utf-8 body")
}

pub(super) fn deal_router_with_service(
    service: DealPipelineService<MemoryDealRepository, MemorySettingsStore>,
) -> axum::Router {
    deal_router(Arc::new(service))
}
