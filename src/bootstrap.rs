//! Startup/on-demand refresh sequencer.
//!
//! Runs a fixed, ordered list of independent refresh steps — settings, cash
//! session, dashboard, low stock, sales of day, catalog — isolating each
//! step's failure: the error is reported against that step's label only and
//! the remaining steps still run. The same sequence serves process start and
//! an explicit "refresh everything" request.

use tracing::{info, warn};

use crate::backend::Backend;
use crate::error::PosError;
use crate::present::Notice;
use crate::terminal::Terminal;

#[derive(Debug)]
pub struct StepOutcome {
    pub label: &'static str,
    /// `None` on success, otherwise the step's readable failure message.
    pub error: Option<String>,
}

impl StepOutcome {
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

#[derive(Debug, Default)]
pub struct RefreshReport {
    pub steps: Vec<StepOutcome>,
}

impl RefreshReport {
    pub fn all_ok(&self) -> bool {
        self.steps.iter().all(StepOutcome::is_ok)
    }

    pub fn failed_labels(&self) -> Vec<&'static str> {
        self.steps
            .iter()
            .filter(|s| !s.is_ok())
            .map(|s| s.label)
            .collect()
    }
}

impl<B: Backend> Terminal<B> {
    /// Run the full refresh sequence. Each step's outcome is recorded and
    /// reported independently; no failure stops the sequence.
    pub async fn refresh_all(&mut self) -> RefreshReport {
        let mut report = RefreshReport::default();

        let result = self.reload_settings().await;
        self.record_step(&mut report, "settings", result);

        let result = self.refresh_cash().await;
        self.record_step(&mut report, "cash session", result);

        let result = self.refresh_dashboard().await;
        self.record_step(&mut report, "dashboard", result);

        let result = self.refresh_low_stock().await;
        self.record_step(&mut report, "low stock", result);

        let result = self.refresh_sales_today(None, None).await;
        self.record_step(&mut report, "sales today", result);

        let result = self.refresh_catalog().await;
        self.record_step(&mut report, "catalog", result);

        if report.all_ok() {
            info!("refresh sequence completed");
        } else {
            warn!(failed = ?report.failed_labels(), "refresh sequence completed with failures");
        }
        report
    }

    fn record_step(
        &self,
        report: &mut RefreshReport,
        label: &'static str,
        result: Result<(), PosError>,
    ) {
        let error = match result {
            Ok(()) => None,
            Err(err) => {
                warn!(step = label, error = %err, "refresh step failed");
                self.presenter()
                    .notify(Notice::Err, &format!("{label}: {err}"));
                Some(err.to_string())
            }
        };
        report.steps.push(StepOutcome { label, error });
    }
}
