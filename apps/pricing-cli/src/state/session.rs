//! # Pricing Session
//!
//! Holds what survives between passes: the active [`PricingConfig`], the
//! operator's [`PassOptions`] and the last output that was produced
//! successfully.
//!
//! ```text
//!                 set_config / set_target
//!                   (validated first)
//!                          │
//!  ┌───────────────────────▼──────────────────────────┐
//!  │ PricingSession                                   │
//!  │   config ─────┐                                  │
//!  │   options ────┼──► refresh() ──► acquire ──► run_pass
//!  │   last_good ◄─┘        │            │          │
//!  └────────────────────────┼────────────┼──────────┘
//!                           │            ▼          ▼
//!                           │        Err: last_good untouched
//!                           ▼
//!                        Ok: last_good replaced
//! ```

use tracing::{info, warn};

use gulong_core::config::GpTarget;
use gulong_core::{run_pass, GpRate, PassOptions, PricingConfig, PricingOutput, SupplierOffer};
use gulong_data::DataSource;

use crate::error::{AppError, AppResult};

pub struct PricingSession<S> {
    source: S,
    config: PricingConfig,
    options: PassOptions,
    last_good: Option<PricingOutput>,
}

impl<S: DataSource> PricingSession<S> {
    /// Starts a session; an invalid config is rejected up front.
    pub fn new(source: S, config: PricingConfig) -> AppResult<Self> {
        config.validate().map_err(|e| AppError::validation(e.to_string()))?;
        Ok(PricingSession {
            source,
            config,
            options: PassOptions::default(),
            last_good: None,
        })
    }

    pub fn config(&self) -> &PricingConfig {
        &self.config
    }

    pub fn set_options(&mut self, options: PassOptions) {
        self.options = options;
    }

    /// Replaces the config. An invalid config leaves the current one in place.
    pub fn set_config(&mut self, config: PricingConfig) -> AppResult<()> {
        config.validate().map_err(|e| AppError::validation(e.to_string()))?;
        self.config = config;
        Ok(())
    }

    /// Changes one GP target.
    pub fn set_target(&mut self, target: GpTarget, rate: GpRate) -> AppResult<()> {
        self.set_config(self.config.with_target(target, rate))
    }

    /// Back to the default targets and competitors.
    pub fn reset_config(&mut self) {
        self.config = PricingConfig::reset();
    }

    /// Acquires a fresh snapshot and runs one pass.
    ///
    /// On any failure the previous output is kept for the next caller.
    pub async fn refresh(&mut self, offers: Option<&[SupplierOffer]>) -> AppResult<&PricingOutput> {
        let snapshot = match self.source.acquire().await {
            Ok(snapshot) => snapshot,
            Err(err) => {
                warn!(error = %err, kept_previous = self.last_good.is_some(), "Snapshot acquisition failed");
                return Err(err.into());
            }
        };

        let output = match run_pass(&snapshot, &self.config, &self.options, offers) {
            Ok(output) => output,
            Err(err) => {
                warn!(error = %err, kept_previous = self.last_good.is_some(), "Pricing pass failed");
                return Err(err.into());
            }
        };

        info!(
            rows = output.counts.rows,
            priced = output.counts.priced,
            unpriced = output.counts.unpriced,
            alerts = output.counts.alerts,
            adjustments = output.counts.adjustments,
            mismatches = output.counts.mismatches,
            "Pricing pass complete"
        );

        Ok(self.last_good.insert(output))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use gulong_core::{CatalogSnapshot, Money, SkuRecord};
    use gulong_data::{AcquisitionError, DataResult};
    use std::cell::Cell;

    struct FakeSource {
        failing: Cell<bool>,
        cost: Cell<i64>,
    }

    impl FakeSource {
        fn new() -> Self {
            FakeSource {
                failing: Cell::new(false),
                cost: Cell::new(1000),
            }
        }
    }

    impl DataSource for FakeSource {
        async fn acquire(&self) -> DataResult<CatalogSnapshot> {
            if self.failing.get() {
                return Err(AcquisitionError::ConnectionFailed("backend down".to_string()));
            }
            let date = NaiveDate::from_ymd_opt(2024, 5, 8).unwrap();
            Ok(CatalogSnapshot {
                skus: vec![SkuRecord::new("M1", "Dunlop", "SP Sport LM705", "195/55 R16")
                    .with_cost(Money::from_pesos(self.cost.get()))],
                competitors: vec![],
                column_options: vec![],
                backend_last_update: date,
                competitor_last_update: date,
            })
        }
    }

    fn slashed(output: &PricingOutput) -> Option<String> {
        output.table.get(0, "GulongPH_slashed").map(|cell| cell.to_string())
    }

    #[tokio::test]
    async fn test_refresh_produces_output() {
        let mut session = PricingSession::new(FakeSource::new(), PricingConfig::default()).unwrap();
        let output = session.refresh(None).await.unwrap();

        assert_eq!(output.counts.priced, 1);
        assert_eq!(slashed(output).as_deref(), Some("1176.00"));
        assert!(session.last_good.is_some());
    }

    #[tokio::test]
    async fn test_failed_refresh_keeps_last_good() {
        let mut session = PricingSession::new(FakeSource::new(), PricingConfig::default()).unwrap();
        session.refresh(None).await.unwrap();

        session.source.failing.set(true);
        session.source.cost.set(2000);
        let err = session.refresh(None).await.unwrap_err();

        assert_eq!(err.code, crate::error::ErrorCode::AcquisitionError);
        let kept = session.last_good.as_ref().unwrap();
        assert_eq!(slashed(kept).as_deref(), Some("1176.00"));
    }

    #[tokio::test]
    async fn test_invalid_target_keeps_config() {
        let mut session = PricingSession::new(FakeSource::new(), PricingConfig::default()).unwrap();

        assert!(session.set_target(GpTarget::Gp15, GpRate::from_whole_percent(100)).is_err());
        assert_eq!(session.config(), &PricingConfig::default());

        session.set_target(GpTarget::Gp15, GpRate::from_whole_percent(20)).unwrap();
        assert_eq!(slashed(session.refresh(None).await.unwrap()).as_deref(), Some("1250.00"));

        session.reset_config();
        assert_eq!(session.config(), &PricingConfig::default());
    }

    #[test]
    fn test_invalid_initial_config_rejected() {
        let config = PricingConfig::default().with_target(GpTarget::B2b, GpRate::from_whole_percent(-5));
        assert!(PricingSession::new(FakeSource::new(), config).is_err());
    }
}
