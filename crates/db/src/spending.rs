use ledger_core::{SpendingSummary, cents_to_cost};
use rusqlite::{Row, params};

use crate::Db;
use crate::error::Result;

// Zero cost marks a budget-covered call. Costs are stored as integer cents,
// so the comparisons below are exact.
const SPENDING_ALL: &str = r#"
    SELECT caller,
           SUM(CASE WHEN cost_cents = 0 THEN 0 ELSE cost_cents END) AS overreach_cents,
           SUM(CASE WHEN cost_cents = 0 THEN 1 ELSE 0 END) AS budget_covered_calls,
           COUNT(*) AS total_calls
    FROM call_records
    GROUP BY caller
    ORDER BY overreach_cents DESC, caller ASC
"#;

const SPENDING_FOR_UPLOAD: &str = r#"
    SELECT caller,
           SUM(CASE WHEN cost_cents = 0 THEN 0 ELSE cost_cents END) AS overreach_cents,
           SUM(CASE WHEN cost_cents = 0 THEN 1 ELSE 0 END) AS budget_covered_calls,
           COUNT(*) AS total_calls,
           SUM(CASE WHEN cost_cents = 0 THEN duration ELSE 0 END) AS budget_minutes,
           SUM(CASE WHEN cost_cents = 0 THEN 0 ELSE duration END) AS overreach_minutes
    FROM call_records
    WHERE upload_id = ?1
    GROUP BY caller
    ORDER BY overreach_cents DESC, caller ASC
"#;

const SPENDING_FOR_UPLOAD_BY_SERVICE: &str = r#"
    SELECT caller,
           SUM(CASE WHEN cost_cents = 0 THEN 0 ELSE cost_cents END) AS overreach_cents,
           SUM(CASE WHEN cost_cents = 0 THEN 1 ELSE 0 END) AS budget_covered_calls,
           COUNT(*) AS total_calls,
           SUM(CASE WHEN cost_cents = 0 THEN duration ELSE 0 END) AS budget_minutes,
           SUM(CASE WHEN cost_cents = 0 THEN 0 ELSE duration END) AS overreach_minutes,
           service
    FROM call_records
    WHERE upload_id = ?1
    GROUP BY caller, service
    ORDER BY overreach_cents DESC, caller ASC, service ASC
"#;

fn count(row: &Row<'_>, idx: usize) -> std::result::Result<u64, rusqlite::Error> {
    Ok(row.get::<_, i64>(idx)?.max(0) as u64)
}

fn row_to_summary(row: &Row<'_>) -> std::result::Result<SpendingSummary, rusqlite::Error> {
    Ok(SpendingSummary {
        caller: row.get(0)?,
        service: None,
        overreach_cost: cents_to_cost(row.get(1)?),
        budget_covered_calls: count(row, 2)?,
        total_calls: count(row, 3)?,
        budget_minutes: None,
        overreach_minutes: None,
    })
}

fn row_to_upload_summary(
    row: &Row<'_>,
) -> std::result::Result<SpendingSummary, rusqlite::Error> {
    let mut summary = row_to_summary(row)?;
    summary.budget_minutes = Some(count(row, 4)?);
    summary.overreach_minutes = Some(count(row, 5)?);
    Ok(summary)
}

fn row_to_service_summary(
    row: &Row<'_>,
) -> std::result::Result<SpendingSummary, rusqlite::Error> {
    let mut summary = row_to_upload_summary(row)?;
    summary.service = Some(row.get(6)?);
    Ok(summary)
}

impl Db {
    /// Per-caller spending across every stored record.
    pub fn spending_summary(&self) -> Result<Vec<SpendingSummary>> {
        let mut stmt = self.conn.prepare(SPENDING_ALL)?;
        let rows = stmt
            .query_map([], row_to_summary)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// Per-caller spending for one upload, with minute totals. Unknown uploads
    /// produce an empty list.
    pub fn spending_summary_for_upload(&self, upload_id: i64) -> Result<Vec<SpendingSummary>> {
        let mut stmt = self.conn.prepare(SPENDING_FOR_UPLOAD)?;
        let rows = stmt
            .query_map(params![upload_id], row_to_upload_summary)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    pub fn spending_by_service_for_upload(
        &self,
        upload_id: i64,
    ) -> Result<Vec<SpendingSummary>> {
        let mut stmt = self.conn.prepare(SPENDING_FOR_UPLOAD_BY_SERVICE)?;
        let rows = stmt
            .query_map(params![upload_id], row_to_service_summary)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }
}
