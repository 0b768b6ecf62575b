use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use time::Date;

use crate::dates::days_before;
use crate::domain::{BreakRecord, BreakStatus, DashboardVariant};

pub const DEMO_DAYS: u32 = 90;
pub const CATEGORIES: [&str; 4] = ["Network", "Software", "Hardware", "Login Issue"];
pub const ASSIGNEES: [&str; 5] = ["Alex", "Ben", "Chris", "David", "Eva"];
pub const RESPONSIBLE_TEAMS: [&str; 4] = ["Infra Team", "App Support", "Security", "Desktop Support"];

pub fn sub_categories_for(category: &str) -> &'static [&'static str] {
    match category {
        "Network" => &["Firewall", "VPN", "Connectivity"],
        "Software" => &["Application Crash", "Update Failed", "Permissions"],
        "Hardware" => &["CPU Failure", "Disk Space", "Memory Leak"],
        "Login Issue" => &["Password Reset", "2FA Error", "Account Locked"],
        _ => &[],
    }
}

fn pick<'a, R: Rng>(rng: &mut R, values: &[&'a str]) -> &'a str {
    values[rng.gen_range(0..values.len())]
}

/// Synthesize `DEMO_DAYS` days of breaks ending at `today`, newest day first.
///
/// Each day gets 5 to 14 breaks. The basic variant resolves ~70% of breaks and derives ageing
/// from the record date; the extended variant draws uniformly from the full status set and an
/// independent 0..20 day ageing. Output is a pure function of `(today, variant, seed)`.
pub fn generate_demo_breaks(today: Date, variant: DashboardVariant, seed: u64) -> Vec<BreakRecord> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut out = Vec::new();

    for day in 0..DEMO_DAYS {
        let date = days_before(today, day);
        let daily_breaks = rng.gen_range(5..15usize);

        for j in 0..daily_breaks {
            let category = pick(&mut rng, &CATEGORIES);
            let sub_category = pick(&mut rng, sub_categories_for(category));
            let assignee = pick(&mut rng, &ASSIGNEES);
            let responsible_team = pick(&mut rng, &RESPONSIBLE_TEAMS);

            let (status, ageing, reoccurrence) = match variant {
                DashboardVariant::Basic => {
                    let status = if rng.gen_bool(0.7) {
                        BreakStatus::Resolved
                    } else {
                        BreakStatus::Open
                    };
                    (status, day, false)
                }
                DashboardVariant::Extended => {
                    let status = BreakStatus::ALL[rng.gen_range(0..BreakStatus::ALL.len())];
                    (status, rng.gen_range(0..20u32), rng.gen_bool(0.2))
                }
            };

            out.push(BreakRecord {
                id: format!("BRK-{}", 1000 + day as usize * 15 + j),
                date,
                category: category.to_string(),
                sub_category: sub_category.to_string(),
                assignee: assignee.to_string(),
                responsible_team: responsible_team.to_string(),
                status,
                ageing,
                explanation: format!(
                    "Issue with {} on server {}",
                    category.to_lowercase(),
                    101 + j
                ),
                reoccurrence,
            });
        }
    }

    tracing::debug!(count = out.len(), ?variant, seed, "generated demo breaks");
    out
}
