use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::analytics::BucketLabel;
use crate::domain::DashboardVariant;
use crate::error::AppError;
use crate::kpi::AgingPolicy;

pub const DEFAULT_PAGE_SIZE: usize = 5;
pub const DEFAULT_DEMO_SEED: u64 = 20_240_101;

/// Dashboard knobs. Every field has a default so partial config files deserialize.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DashboardSettings {
    #[serde(default)]
    pub variant: DashboardVariant,
    /// `None` picks the variant's policy, see [`AgingPolicy::default_for`].
    #[serde(default)]
    pub aging_policy: Option<AgingPolicy>,
    /// `None` picks weekday labels for the basic variant and short dates for the extended one.
    #[serde(default)]
    pub time_series_label: Option<BucketLabel>,
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    #[serde(default = "default_assignee_colors")]
    pub assignee_colors: BTreeMap<String, String>,
    #[serde(default = "default_demo_seed")]
    pub demo_seed: u64,
}

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

fn default_demo_seed() -> u64 {
    DEFAULT_DEMO_SEED
}

pub fn default_assignee_colors() -> BTreeMap<String, String> {
    [
        ("Alex", "#0088FE"),
        ("Ben", "#00C49F"),
        ("Chris", "#FFBB28"),
        ("David", "#FF8042"),
        ("Eva", "#AF19FF"),
    ]
    .into_iter()
    .map(|(name, color)| (name.to_string(), color.to_string()))
    .collect()
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self {
            variant: DashboardVariant::default(),
            aging_policy: None,
            time_series_label: None,
            page_size: DEFAULT_PAGE_SIZE,
            assignee_colors: default_assignee_colors(),
            demo_seed: DEFAULT_DEMO_SEED,
        }
    }
}

impl DashboardSettings {
    pub fn effective_aging_policy(&self) -> AgingPolicy {
        self.aging_policy
            .unwrap_or_else(|| AgingPolicy::default_for(self.variant))
    }

    pub fn effective_bucket_label(&self) -> BucketLabel {
        self.time_series_label.unwrap_or(match self.variant {
            DashboardVariant::Basic => BucketLabel::Weekday,
            DashboardVariant::Extended => BucketLabel::ShortDate,
        })
    }

    pub fn validate(&self) -> Result<(), AppError> {
        if self.page_size == 0 {
            return Err(AppError::new(
                "CONFIG_PAGE_SIZE_INVALID",
                "page_size must be at least 1",
            ));
        }
        if let Some(policy) = self.aging_policy {
            if policy.threshold_days() == 0 {
                return Err(AppError::new(
                    "CONFIG_AGING_THRESHOLD_INVALID",
                    "Aging threshold must be at least 1 day",
                )
                .with_details(format!("policy={policy:?}")));
            }
        }
        Ok(())
    }
}
