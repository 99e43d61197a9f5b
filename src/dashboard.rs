//! Figures shown on the Dashboard page.

use crate::format::DateInput;
use crate::model::{Activity, Contact, Deal, DealStage};
use std::cmp::Reverse;

/// How many activities the dashboard lists.
pub const RECENT_ACTIVITY_LIMIT: usize = 5;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct StageTotal {
    pub stage: Option<DealStage>,
    pub count: usize,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct DashboardSummary {
    pub contact_count: usize,
    pub deal_count: usize,
    pub open_deal_count: usize,
    pub won_deal_count: usize,
    pub activity_count: usize,
    /// Sum of `value` over deals that are not closed.
    pub pipeline_value: f64,
    /// Sum of `value * probability / 100` over open deals.
    pub weighted_pipeline_value: f64,
    pub won_value: f64,
    /// One entry per pipeline stage in pipeline order, then unknown stages.
    pub stages: Vec<StageTotal>,
    /// Newest first; undated activities last.
    pub recent_activities: Vec<Activity>,
}

impl DashboardSummary {
    pub fn compute(contacts: &[Contact], deals: &[Deal], activities: &[Activity]) -> Self {
        let mut summary = Self {
            contact_count: contacts.len(),
            deal_count: deals.len(),
            activity_count: activities.len(),
            stages: DealStage::PIPELINE
                .iter()
                .map(|stage| StageTotal {
                    stage: Some(stage.clone()),
                    ..StageTotal::default()
                })
                .collect(),
            ..Self::default()
        };

        for deal in deals {
            let value = deal.value_or_zero();
            if deal.is_open() {
                summary.open_deal_count += 1;
                summary.pipeline_value += value;
                summary.weighted_pipeline_value += deal.weighted_value();
            }
            if deal.stage == Some(DealStage::ClosedWon) {
                summary.won_deal_count += 1;
                summary.won_value += value;
            }
            let total = match summary.stages.iter().position(|t| t.stage == deal.stage) {
                Some(index) => &mut summary.stages[index],
                None => {
                    summary.stages.push(StageTotal {
                        stage: deal.stage.clone(),
                        ..StageTotal::default()
                    });
                    let last = summary.stages.len() - 1;
                    &mut summary.stages[last]
                }
            };
            total.count += 1;
            total.value += value;
        }

        let mut recent: Vec<&Activity> = activities.iter().collect();
        recent.sort_by_key(|a| Reverse(a.timestamp.to_datetime()));
        summary.recent_activities = recent
            .into_iter()
            .take(RECENT_ACTIVITY_LIMIT)
            .cloned()
            .collect();
        summary
    }

    /// Share of closed deals that were won, as a percentage.
    pub fn win_rate(&self) -> Option<f64> {
        let lost = self
            .stages
            .iter()
            .find(|t| t.stage == Some(DealStage::ClosedLost))
            .map_or(0, |t| t.count);
        let closed = self.won_deal_count + lost;
        (closed > 0).then(|| self.won_deal_count as f64 * 100.0 / closed as f64)
    }
}
