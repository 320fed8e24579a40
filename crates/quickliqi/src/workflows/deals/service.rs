use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::Utc;
use tracing::{info, warn};

use super::domain::{DealId, DealRecord, DealStatus, DealSubmission, DealUpdate};
use super::evaluation::{evaluate, DEFAULT_ARV_MULTIPLIER};
use super::export::{deals_to_csv, ExportError};
use super::repository::{DealRepository, RepositoryError, SettingsStore};
use super::settings::{Settings, SettingsUpdate};
use super::validation::{validate_settings, validate_submission, validate_update, DealValidationError};
use crate::workflows::scoring::{opportunity_score, ScoreInput};

/// Orchestrates deal storage, evaluation, and the settings cascade.
///
/// Every path that writes a deal or the settings runs under `settings_lock`,
/// so a settings cascade never overwrites a concurrent edit or status move.
pub struct DealPipelineService<R, S> {
    repository: Arc<R>,
    settings_store: Arc<S>,
    settings_lock: Mutex<()>,
}

static DEAL_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_deal_id() -> DealId {
    let id = DEAL_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    DealId(format!("deal-{id:06}"))
}

fn score_for(record: &DealRecord) -> u8 {
    opportunity_score(&ScoreInput {
        days_on_market: record.days_on_market,
        list_price: record.list_price,
        sqft: record.sqft,
        property_type: Some(record.property_type),
    })
}

impl<R, S> DealPipelineService<R, S>
where
    R: DealRepository + 'static,
    S: SettingsStore + 'static,
{
    pub fn new(repository: Arc<R>, settings_store: Arc<S>) -> Self {
        Self {
            repository,
            settings_store,
            settings_lock: Mutex::new(()),
        }
    }

    fn lock_settings(&self) -> MutexGuard<'_, ()> {
        self.settings_lock
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn current_settings(&self) -> Result<Settings, RepositoryError> {
        match self.settings_store.load()? {
            Some(settings) => Ok(settings),
            None => {
                let defaults = Settings::default();
                self.settings_store.save(&defaults)?;
                Ok(defaults)
            }
        }
    }

    /// Validate, score, and evaluate a new deal, then persist it as `New`.
    pub fn create(&self, mut submission: DealSubmission) -> Result<DealRecord, DealServiceError> {
        validate_submission(&submission)?;
        if submission.arv_estimate.map_or(true, |arv| arv <= 0.0) {
            submission.arv_estimate = Some(submission.list_price * DEFAULT_ARV_MULTIPLIER);
        }

        let _guard = self.lock_settings();
        let settings = self.current_settings()?;

        let mut record = DealRecord::from_submission(
            next_deal_id(),
            Utc::now(),
            submission,
            0,
            Default::default(),
        );
        record.opportunity_score = score_for(&record);
        record.metrics = evaluate(&record.input(), &settings);

        let stored = self.repository.insert(record)?;
        info!(
            deal_id = %stored.id.0,
            signal = stored.metrics.deal_signal.label(),
            score = stored.opportunity_score,
            "deal created"
        );
        Ok(stored)
    }

    /// Deals newest first, optionally for a single pipeline stage.
    pub fn list(&self, status: Option<DealStatus>) -> Result<Vec<DealRecord>, DealServiceError> {
        let mut deals = self.repository.list(status)?;
        deals.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        Ok(deals)
    }

    pub fn get(&self, id: &DealId) -> Result<DealRecord, DealServiceError> {
        let record = self.repository.fetch(id)?.ok_or(RepositoryError::NotFound)?;
        Ok(record)
    }

    pub fn delete(&self, id: &DealId) -> Result<(), DealServiceError> {
        let _guard = self.lock_settings();
        self.repository.delete(id)?;
        info!(deal_id = %id.0, "deal deleted");
        Ok(())
    }

    /// Merge an edit; metrics are recomputed only when financial inputs change.
    pub fn update(&self, id: &DealId, update: DealUpdate) -> Result<DealRecord, DealServiceError> {
        validate_update(&update)?;

        let _guard = self.lock_settings();
        let mut record = self.repository.fetch(id)?.ok_or(RepositoryError::NotFound)?;
        let reevaluate = update.touches_financials();
        update.apply_to(&mut record);

        if reevaluate {
            let settings = self.current_settings()?;
            record.metrics = evaluate(&record.input(), &settings);
        }

        self.repository.update(record.clone())?;
        info!(deal_id = %record.id.0, reevaluated = reevaluate, "deal updated");
        Ok(record)
    }

    /// Pipeline move; metrics are left untouched.
    pub fn update_status(
        &self,
        id: &DealId,
        status: DealStatus,
    ) -> Result<DealRecord, DealServiceError> {
        let _guard = self.lock_settings();
        let mut record = self.repository.fetch(id)?.ok_or(RepositoryError::NotFound)?;
        record.status = status;
        self.repository.update(record.clone())?;
        info!(deal_id = %record.id.0, status = status.label(), "deal moved");
        Ok(record)
    }

    /// Current buyer criteria; defaults are stored on first read.
    pub fn settings(&self) -> Result<Settings, DealServiceError> {
        let _guard = self.lock_settings();
        Ok(self.current_settings()?)
    }

    /// Re-evaluate every deal against new criteria, then store them.
    ///
    /// The settings are saved only once every deal has been re-evaluated. If
    /// any write fails, deals already rewritten get their previous metrics
    /// back and the old settings stay in force.
    pub fn update_settings(&self, update: SettingsUpdate) -> Result<Settings, DealServiceError> {
        let _guard = self.lock_settings();
        let next = update.apply(&self.current_settings()?);
        validate_settings(&next)?;

        let mut rewritten: Vec<DealRecord> = Vec::new();
        for record in self.repository.list(None)? {
            let mut recalculated = record.clone();
            recalculated.metrics = evaluate(&recalculated.input(), &next);
            if let Err(error) = self.repository.update(recalculated) {
                self.restore(rewritten);
                return Err(error.into());
            }
            rewritten.push(record);
        }

        let recalculated = rewritten.len();
        if let Err(error) = self.settings_store.save(&next) {
            self.restore(rewritten);
            return Err(error.into());
        }

        info!(recalculated, "settings updated");
        Ok(next)
    }

    fn restore(&self, previous: Vec<DealRecord>) {
        warn!(deals = previous.len(), "settings cascade failed; restoring previous metrics");
        for record in previous {
            let id = record.id.clone();
            if let Err(error) = self.repository.update(record) {
                warn!(deal_id = %id.0, %error, "failed to restore deal metrics");
            }
        }
    }

    /// Re-evaluate every deal with the current settings. A deal that fails to
    /// save is logged and skipped; the count covers saved deals only.
    pub fn recalculate_all(&self) -> Result<usize, DealServiceError> {
        let _guard = self.lock_settings();
        let settings = self.current_settings()?;

        let mut recalculated = 0usize;
        for mut record in self.repository.list(None)? {
            let id = record.id.clone();
            record.metrics = evaluate(&record.input(), &settings);
            match self.repository.update(record) {
                Ok(()) => recalculated += 1,
                Err(error) => warn!(deal_id = %id.0, %error, "failed to recalculate deal"),
            }
        }

        info!(recalculated, "recalculated deal metrics");
        Ok(recalculated)
    }

    /// All deals as CSV, newest first.
    pub fn export_csv(&self) -> Result<String, DealServiceError> {
        let deals = self.list(None)?;
        Ok(deals_to_csv(&deals)?)
    }
}

/// Error raised by the deal pipeline service.
#[derive(Debug, thiserror::Error)]
pub enum DealServiceError {
    #[error(transparent)]
    Validation(#[from] DealValidationError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Export(#[from] ExportError),
}
