use std::fmt;

use serde_json::{Value as JsonValue, json};

use crate::checks::CheckOutcome;

/// Outcome of one registered check, paired with its identity.
#[derive(Debug, Clone)]
pub struct CheckReport {
    pub id: &'static str,
    pub title: &'static str,
    pub outcome: CheckOutcome,
}

/// Aggregated outcomes for a full audit run.
#[derive(Debug, Clone, Default)]
pub struct Report {
    pub checks: Vec<CheckReport>,
}

/// Counts per outcome kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
}

impl Report {
    pub fn push(&mut self, id: &'static str, title: &'static str, outcome: CheckOutcome) {
        self.checks.push(CheckReport { id, title, outcome });
    }

    pub fn summary(&self) -> Summary {
        let mut summary = Summary::default();
        for check in &self.checks {
            match check.outcome {
                CheckOutcome::Pass => summary.passed += 1,
                CheckOutcome::Fail { .. } => summary.failed += 1,
                CheckOutcome::Skip { .. } => summary.skipped += 1,
            }
        }
        summary
    }

    pub fn has_failures(&self) -> bool {
        self.checks.iter().any(|check| check.outcome.is_fail())
    }

    /// Structured rendering for `--json` output.
    pub fn to_json(&self) -> JsonValue {
        let summary = self.summary();
        let checks = self
            .checks
            .iter()
            .map(|check| {
                let reason = match &check.outcome {
                    CheckOutcome::Pass => JsonValue::Null,
                    CheckOutcome::Fail { reason } | CheckOutcome::Skip { reason } => {
                        json!(reason)
                    }
                };
                json!({
                    "id": check.id,
                    "title": check.title,
                    "status": check.outcome.label(),
                    "reason": reason,
                })
            })
            .collect::<Vec<_>>();
        json!({
            "checks": checks,
            "summary": {
                "passed": summary.passed,
                "failed": summary.failed,
                "skipped": summary.skipped,
            },
            "ok": !self.has_failures(),
        })
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for check in &self.checks {
            writeln!(f, "{:<22} {}", check.id, check.outcome)?;
        }
        let summary = self.summary();
        if summary.failed == 0 {
            writeln!(f, "✓ {} passed, {} skipped", summary.passed, summary.skipped)
        } else {
            writeln!(
                f,
                "✗ {} failed, {} passed, {} skipped",
                summary.failed, summary.passed, summary.skipped
            )
        }
    }
}
