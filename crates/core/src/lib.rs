use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Scale used for every stored cost amount.
pub const COST_SCALE: u32 = 2;

/// Largest amount representable by a `DECIMAL(10, 2)` column.
pub const MAX_COST_CENTS: i64 = 9_999_999_999;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Upload {
    pub id: i64,
    pub file_name: String,
    pub uploaded_at: String,
}

/// A persisted call detail row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallRecord {
    pub id: i64,
    pub upload_id: Option<i64>,
    pub call_date: String,
    pub caller: String,
    pub receiver: String,
    pub duration_minutes: u32,
    pub cost: Decimal,
    pub service: String,
}

/// A mapped row that has not been assigned to an upload yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCallRecord {
    pub call_date: String,
    pub caller: String,
    pub receiver: String,
    pub duration_minutes: u32,
    pub cost: Decimal,
    pub service: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpendingSummary {
    pub caller: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service: Option<String>,
    pub overreach_cost: Decimal,
    pub budget_covered_calls: u64,
    pub total_calls: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub budget_minutes: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overreach_minutes: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpendingTotals {
    pub overreach_cost: Decimal,
    pub budget_covered_calls: u64,
    pub total_calls: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub budget_minutes: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overreach_minutes: Option<u64>,
}

/// Outcome of a committed ingestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestReceipt {
    pub upload_id: i64,
    pub records_persisted: usize,
}

/// A zero cost is the only marker for a call covered by the budget allotment.
pub fn is_budget_covered(cost: &Decimal) -> bool {
    cost.is_zero()
}

/// Rounds half away from zero, matching `DECIMAL(10, 2)` assignment.
pub fn round_cost(cost: &Decimal) -> Decimal {
    cost.round_dp_with_strategy(COST_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

pub fn cost_to_cents(cost: &Decimal) -> Option<i64> {
    if cost.is_sign_negative() && !cost.is_zero() {
        return None;
    }
    let cents = (round_cost(cost) * Decimal::ONE_HUNDRED).to_i64()?;
    if cents > MAX_COST_CENTS {
        return None;
    }
    Some(cents)
}

pub fn cents_to_cost(cents: i64) -> Decimal {
    Decimal::new(cents, COST_SCALE)
}

pub fn spending_totals(rows: &[SpendingSummary]) -> SpendingTotals {
    let mut totals = SpendingTotals::default();
    for row in rows {
        totals.overreach_cost += row.overreach_cost;
        totals.budget_covered_calls += row.budget_covered_calls;
        totals.total_calls += row.total_calls;
        if let Some(minutes) = row.budget_minutes {
            totals.budget_minutes = Some(totals.budget_minutes.unwrap_or(0) + minutes);
        }
        if let Some(minutes) = row.overreach_minutes {
            totals.overreach_minutes = Some(totals.overreach_minutes.unwrap_or(0) + minutes);
        }
    }
    totals
}

/// Groups unsaved records by caller with the same rules the storage layer applies.
pub fn summarize_records(records: &[NewCallRecord]) -> Vec<SpendingSummary> {
    let mut by_caller: HashMap<&str, SpendingSummary> = HashMap::new();
    for record in records {
        let entry = by_caller
            .entry(record.caller.as_str())
            .or_insert_with(|| SpendingSummary {
                caller: record.caller.clone(),
                service: None,
                overreach_cost: cents_to_cost(0),
                budget_covered_calls: 0,
                total_calls: 0,
                budget_minutes: Some(0),
                overreach_minutes: Some(0),
            });
        entry.total_calls += 1;
        let minutes = u64::from(record.duration_minutes);
        if is_budget_covered(&record.cost) {
            entry.budget_covered_calls += 1;
            entry.budget_minutes = entry.budget_minutes.map(|value| value + minutes);
        } else {
            entry.overreach_cost += record.cost;
            entry.overreach_minutes = entry.overreach_minutes.map(|value| value + minutes);
        }
    }
    let mut result: Vec<SpendingSummary> = by_caller.into_values().collect();
    sort_summaries(&mut result);
    result
}

/// Highest overreach first, then caller and service ascending.
pub fn sort_summaries(rows: &mut [SpendingSummary]) {
    rows.sort_by(|a, b| {
        b.overreach_cost
            .cmp(&a.overreach_cost)
            .then_with(|| a.caller.cmp(&b.caller))
            .then_with(|| a.service.cmp(&b.service))
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(caller: &str, minutes: u32, cents: i64) -> NewCallRecord {
        NewCallRecord {
            call_date: "2024-01-01 00:00:00".to_string(),
            caller: caller.to_string(),
            receiver: "222".to_string(),
            duration_minutes: minutes,
            cost: cents_to_cost(cents),
            service: "voice".to_string(),
        }
    }

    #[test]
    fn zero_cost_with_any_scale_is_budget_covered() {
        assert!(is_budget_covered(&Decimal::ZERO));
        assert!(is_budget_covered(&Decimal::new(0, 2)));
        assert!(!is_budget_covered(&Decimal::new(1, 2)));
    }

    #[test]
    fn cost_to_cents_rejects_negative_and_oversized_amounts() {
        assert_eq!(cost_to_cents(&Decimal::new(250, 2)), Some(250));
        assert_eq!(cost_to_cents(&Decimal::new(2505, 3)), Some(251));
        assert_eq!(cost_to_cents(&Decimal::new(-1, 2)), None);
        assert_eq!(cost_to_cents(&Decimal::new(MAX_COST_CENTS + 1, 2)), None);
        assert_eq!(cents_to_cost(250).to_string(), "2.50");
    }

    #[test]
    fn summarize_records_orders_by_overreach_then_caller() {
        let records = vec![
            record("B", 3, 0),
            record("A", 10, 0),
            record("A", 5, 500),
            record("C", 1, 0),
        ];
        let summary = summarize_records(&records);
        let callers: Vec<&str> = summary.iter().map(|row| row.caller.as_str()).collect();
        assert_eq!(callers, vec!["A", "B", "C"]);
        assert_eq!(summary[0].overreach_cost, Decimal::new(5, 0));
        assert_eq!(summary[0].budget_covered_calls, 1);
        assert_eq!(summary[0].total_calls, 2);
        assert_eq!(summary[0].budget_minutes, Some(10));
        assert_eq!(summary[0].overreach_minutes, Some(5));
    }

    #[test]
    fn totals_sum_rows_and_keep_minutes_optional() {
        let rows = vec![
            SpendingSummary {
                caller: "A".to_string(),
                service: None,
                overreach_cost: Decimal::new(250, 2),
                budget_covered_calls: 1,
                total_calls: 2,
                budget_minutes: None,
                overreach_minutes: None,
            },
            SpendingSummary {
                caller: "B".to_string(),
                service: None,
                overreach_cost: Decimal::new(125, 2),
                budget_covered_calls: 3,
                total_calls: 3,
                budget_minutes: None,
                overreach_minutes: None,
            },
        ];
        let totals = spending_totals(&rows);
        assert_eq!(totals.overreach_cost, Decimal::new(375, 2));
        assert_eq!(totals.budget_covered_calls, 4);
        assert_eq!(totals.total_calls, 5);
        assert_eq!(totals.budget_minutes, None);
    }

    #[test]
    fn summary_serializes_cost_as_exact_string() {
        let row = SpendingSummary {
            caller: "111".to_string(),
            service: None,
            overreach_cost: cents_to_cost(250),
            budget_covered_calls: 1,
            total_calls: 2,
            budget_minutes: Some(10),
            overreach_minutes: None,
        };
        let value = serde_json::to_value(&row).expect("serialize");
        assert_eq!(value["overreach_cost"], "2.50");
        assert_eq!(value["budget_minutes"], 10);
        assert!(value.get("service").is_none());
    }
}
