use brk_core::dates::days_before;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use time::Date;

use crate::model::{BreakCategory, SourceName, TradeBreakRow, TradeStatus};

const COMMENTS: [&str; 4] = [
    "Awaiting custodian confirmation",
    "Price source mismatch under review",
    "Booked late by desk",
    "Escalated to settlements",
];

/// Seeded trade breaks for `days` business dates ending at `today`, newest first.
pub fn generate_demo_trade_breaks(today: Date, days: u32, seed: u64) -> Vec<TradeBreakRow> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut out = Vec::new();

    for day in 0..days {
        let business_date = days_before(today, day);
        let count = rng.gen_range(3..12usize);
        for j in 0..count {
            let status = if rng.gen_bool(0.6) {
                TradeStatus::Open
            } else {
                TradeStatus::Closed
            };
            let break_category = BreakCategory::ALL[rng.gen_range(0..BreakCategory::ALL.len())];
            let source_name = SourceName::ALL[rng.gen_range(0..SourceName::ALL.len())];
            let ageing_days = day + rng.gen_range(0..4u32);
            let comment = rng
                .gen_bool(0.25)
                .then(|| COMMENTS[rng.gen_range(0..COMMENTS.len())].to_string());

            out.push(TradeBreakRow {
                break_id: format!(
                    "TB-{:04}{:02}{:02}-{:03}",
                    business_date.year(),
                    u8::from(business_date.month()),
                    business_date.day(),
                    j + 1
                ),
                business_date,
                status,
                break_category,
                source_name,
                ageing_days,
                comment,
            });
        }
    }

    tracing::debug!(count = out.len(), days, seed, "generated demo trade breaks");
    out
}
