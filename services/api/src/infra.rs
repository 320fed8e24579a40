use metrics_exporter_prometheus::PrometheusHandle;
use quickliqi::workflows::deals::{
    DealId, DealRecord, DealRepository, DealStatus, RepositoryError, Settings, SettingsStore,
};
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
    pub(crate) market_scan_enabled: bool,
}

fn lock<T>(mutex: &Mutex<T>) -> Result<MutexGuard<'_, T>, RepositoryError> {
    mutex
        .lock()
        .map_err(|_| RepositoryError::Unavailable("in-memory store lock poisoned".to_string()))
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryDealRepository {
    records: Arc<Mutex<HashMap<DealId, DealRecord>>>,
}

impl DealRepository for InMemoryDealRepository {
    fn insert(&self, record: DealRecord) -> Result<DealRecord, RepositoryError> {
        let mut guard = lock(&self.records)?;
        if guard.contains_key(&record.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(record.id.clone(), record.clone());
        Ok(record)
    }

    fn update(&self, record: DealRecord) -> Result<(), RepositoryError> {
        let mut guard = lock(&self.records)?;
        if guard.contains_key(&record.id) {
            guard.insert(record.id.clone(), record);
            Ok(())
        } else {
            Err(RepositoryError::NotFound)
        }
    }

    fn fetch(&self, id: &DealId) -> Result<Option<DealRecord>, RepositoryError> {
        let guard = lock(&self.records)?;
        Ok(guard.get(id).cloned())
    }

    fn list(&self, status: Option<DealStatus>) -> Result<Vec<DealRecord>, RepositoryError> {
        let guard = lock(&self.records)?;
        Ok(guard
            .values()
            .filter(|record| status.map_or(true, |status| record.status == status))
            .cloned()
            .collect())
    }

    fn delete(&self, id: &DealId) -> Result<(), RepositoryError> {
        let mut guard = lock(&self.records)?;
        guard
            .remove(id)
            .map(|_| ())
            .ok_or(RepositoryError::NotFound)
    }
}

#[derive(Default, Clone)]
pub(crate) struct InMemorySettingsStore {
    current: Arc<Mutex<Option<Settings>>>,
}

impl SettingsStore for InMemorySettingsStore {
    fn load(&self) -> Result<Option<Settings>, RepositoryError> {
        Ok(lock(&self.current)?.clone())
    }

    fn save(&self, settings: &Settings) -> Result<(), RepositoryError> {
        *lock(&self.current)? = Some(settings.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settings_store_starts_empty_and_keeps_last_save() {
        let store = InMemorySettingsStore::default();
        assert_eq!(store.load().expect("load"), None);

        let settings = Settings {
            min_coc_pct: 20.0,
            ..Settings::default()
        };
        store.save(&settings).expect("save");
        assert_eq!(store.load().expect("load"), Some(settings));
    }

    #[test]
    fn deleting_unknown_deal_is_not_found() {
        let repository = InMemoryDealRepository::default();
        let error = repository
            .delete(&DealId("deal-404".to_string()))
            .expect_err("nothing to delete");
        assert!(matches!(error, RepositoryError::NotFound));
    }
}
