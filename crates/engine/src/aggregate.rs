//! Transaction aggregation pipeline.
//!
//! The financial screens show one chronological list built from three remote
//! collections (earnings, expenses, auto-expenses). Each raw row is projected
//! into a [`TransactionRecord`] through a fixed per-kind mapping, then the
//! whole sequence is stable-sorted by date descending. Malformed rows are
//! normalized, never fatal: a bad date sorts as epoch, a bad amount becomes
//! zero, so one broken record cannot abort the rest of the list.

use api_types::record::{RawAutoExpense, RawEarning, RawExpense};
use chrono::{DateTime, NaiveDate, Utc};
use serde_json::Value;
use uuid::Uuid;

use crate::MoneyCents;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TransactionKind {
    Earning,
    Expense,
    AutoExpense,
}

impl TransactionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Earning => "earning",
            Self::Expense => "expense",
            Self::AutoExpense => "auto-expense",
        }
    }

    /// Label used when a record carries neither description nor note.
    pub fn default_label(self) -> &'static str {
        match self {
            Self::Earning => "Guadagno",
            Self::Expense => "Spesa",
            Self::AutoExpense => "Spesa veicolo",
        }
    }

    /// List glyph for the kind.
    pub fn glyph(self) -> &'static str {
        match self {
            Self::Earning => "▲",
            Self::Expense => "▼",
            Self::AutoExpense => "⛟",
        }
    }

    /// +1 for earnings, -1 otherwise.
    pub const fn sign(self) -> i64 {
        match self {
            Self::Earning => 1,
            Self::Expense | Self::AutoExpense => -1,
        }
    }
}

/// Display key of a record.
///
/// Remote ids are unique only within their collection, so every lookup and
/// every list key must carry the kind too.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RecordKey {
    pub kind: TransactionKind,
    pub id: Uuid,
}

/// Normalized projection of one remote row. Never persisted; rebuilt on
/// every fetch.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransactionRecord {
    pub key: RecordKey,
    /// Signed amount in cents; the sign always matches `key.kind.sign()`.
    pub amount: MoneyCents,
    pub label: String,
    pub occurred_at: DateTime<Utc>,
    /// Category (earnings, auto-expenses) or expense type tag.
    pub tag: Option<String>,
}

impl TransactionRecord {
    pub fn kind(&self) -> TransactionKind {
        self.key.kind
    }
}

/// The three fetched collections, as returned by the fetchers.
#[derive(Debug, Default)]
pub struct Collections {
    pub earnings: Vec<RawEarning>,
    pub expenses: Vec<RawExpense>,
    pub auto_expenses: Vec<RawAutoExpense>,
}

/// Totals derived from the aggregated sequence.
///
/// Always recomputed from the full list, never patched incrementally, so the
/// itemized view and the totals cannot drift apart.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Summary {
    pub income: MoneyCents,
    pub expenses: MoneyCents,
    pub net: MoneyCents,
    pub count: usize,
}

/// Coerces a remote amount (number, numeric string, null, garbage) to cents.
fn coerce_amount(raw: Option<&Value>) -> MoneyCents {
    match raw {
        Some(Value::Number(number)) => {
            if let Some(v) = number.as_i64() {
                MoneyCents::new(v.saturating_mul(100))
            } else {
                number
                    .as_f64()
                    .and_then(MoneyCents::from_f64)
                    .unwrap_or(MoneyCents::ZERO)
            }
        }
        Some(Value::String(s)) => s.parse().unwrap_or(MoneyCents::ZERO),
        _ => MoneyCents::ZERO,
    }
}

/// Parses a remote date; missing or unparsable values sort as epoch so a
/// malformed record lands at the end of the descending list.
fn parse_date(raw: Option<&str>) -> DateTime<Utc> {
    let Some(raw) = raw else {
        return DateTime::UNIX_EPOCH;
    };

    let trimmed = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
        return parsed.with_timezone(&Utc);
    }
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        if let Some(midnight) = date.and_hms_opt(0, 0, 0) {
            return midnight.and_utc();
        }
    }
    DateTime::UNIX_EPOCH
}

/// Label fallback chain: explicit description, then note, then kind default.
fn label_for(
    kind: TransactionKind,
    description: Option<&str>,
    note: Option<&str>,
) -> String {
    description
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .or_else(|| note.map(str::trim).filter(|s| !s.is_empty()))
        .unwrap_or(kind.default_label())
        .to_string()
}

fn project(
    kind: TransactionKind,
    id: Uuid,
    amount: Option<&Value>,
    description: Option<&str>,
    note: Option<&str>,
    date: Option<&str>,
    tag: Option<&str>,
) -> TransactionRecord {
    let magnitude = coerce_amount(amount).abs();
    TransactionRecord {
        key: RecordKey { kind, id },
        amount: if kind.sign() < 0 { -magnitude } else { magnitude },
        label: label_for(kind, description, note),
        occurred_at: parse_date(date),
        tag: tag.map(str::to_string),
    }
}

fn project_earning(raw: &RawEarning) -> TransactionRecord {
    project(
        TransactionKind::Earning,
        raw.id,
        raw.amount.as_ref(),
        raw.description.as_deref(),
        raw.note.as_deref(),
        raw.date.as_deref(),
        raw.category.as_deref(),
    )
}

fn project_expense(raw: &RawExpense) -> TransactionRecord {
    project(
        TransactionKind::Expense,
        raw.id,
        raw.amount.as_ref(),
        raw.description.as_deref(),
        raw.note.as_deref(),
        raw.date.as_deref(),
        raw.expense_type.as_deref(),
    )
}

fn project_auto_expense(raw: &RawAutoExpense) -> TransactionRecord {
    project(
        TransactionKind::AutoExpense,
        raw.id,
        raw.amount.as_ref(),
        raw.description.as_deref(),
        raw.note.as_deref(),
        raw.date.as_deref(),
        raw.category.as_deref(),
    )
}

/// Merges the fetched collections into one normalized sequence, sorted by
/// date descending.
///
/// Concatenation order is earnings, expenses, auto-expenses; the sort is
/// stable, so date ties keep that order and the output is deterministic.
pub fn aggregate(collections: &Collections) -> Vec<TransactionRecord> {
    let mut records: Vec<TransactionRecord> = collections
        .earnings
        .iter()
        .map(project_earning)
        .chain(collections.expenses.iter().map(project_expense))
        .chain(collections.auto_expenses.iter().map(project_auto_expense))
        .collect();

    records.sort_by(|a, b| b.occurred_at.cmp(&a.occurred_at));
    records
}

/// Pure, order-preserving kind filter; `None` means all kinds.
pub fn filter_by_kind(
    records: &[TransactionRecord],
    kind: Option<TransactionKind>,
) -> Vec<&TransactionRecord> {
    records
        .iter()
        .filter(|record| kind.is_none_or(|k| record.kind() == k))
        .collect()
}

/// Recomputes the totals from the full sequence.
pub fn summarize(records: &[TransactionRecord]) -> Summary {
    let mut summary = Summary::default();
    for record in records {
        if record.amount.is_negative() {
            summary.expenses += record.amount;
        } else {
            summary.income += record.amount;
        }
        summary.net += record.amount;
        summary.count += 1;
    }
    summary
}

/// Removes one record by `(kind, id)` key. Returns `false` when absent.
pub fn remove_record(records: &mut Vec<TransactionRecord>, key: RecordKey) -> bool {
    let before = records.len();
    records.retain(|record| record.key != key);
    records.len() != before
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn earning(amount: Value, date: Option<&str>) -> RawEarning {
        RawEarning {
            id: Uuid::new_v4(),
            amount: Some(amount),
            description: None,
            note: None,
            date: date.map(str::to_string),
            category: None,
            driver_id: None,
            vehicle_id: None,
        }
    }

    fn expense(amount: Value, date: Option<&str>) -> RawExpense {
        RawExpense {
            id: Uuid::new_v4(),
            amount: Some(amount),
            description: None,
            note: None,
            date: date.map(str::to_string),
            expense_type: None,
            driver_id: None,
            vehicle_id: None,
        }
    }

    #[test]
    fn sorts_by_date_descending() {
        let collections = Collections {
            earnings: vec![
                earning(json!(50), Some("2024-01-02")),
                earning(json!(10), Some("2024-01-05")),
            ],
            expenses: vec![expense(json!(20), Some("2024-01-03"))],
            auto_expenses: vec![],
        };

        let records = aggregate(&collections);
        let dates: Vec<_> = records.iter().map(|r| r.occurred_at).collect();
        let mut sorted = dates.clone();
        sorted.sort_by(|a, b| b.cmp(a));
        assert_eq!(dates, sorted);
        assert_eq!(records[0].amount.cents(), 1000);
        assert_eq!(records[1].amount.cents(), -2000);
        assert_eq!(records[2].amount.cents(), 5000);
    }

    #[test]
    fn date_ties_keep_kind_order() {
        let collections = Collections {
            earnings: vec![earning(json!(1), Some("2024-03-01"))],
            expenses: vec![expense(json!(2), Some("2024-03-01"))],
            auto_expenses: vec![RawAutoExpense {
                id: Uuid::new_v4(),
                amount: Some(json!(3)),
                description: None,
                note: None,
                date: Some("2024-03-01".to_string()),
                category: None,
                vehicle_id: None,
            }],
        };

        let records = aggregate(&collections);
        let kinds: Vec<_> = records.iter().map(|r| r.kind()).collect();
        assert_eq!(
            kinds,
            vec![
                TransactionKind::Earning,
                TransactionKind::Expense,
                TransactionKind::AutoExpense,
            ]
        );
    }

    #[test]
    fn aggregation_is_deterministic() {
        let collections = Collections {
            earnings: vec![
                earning(json!(50), Some("2024-01-02")),
                earning(json!(30), Some("2024-01-02")),
            ],
            expenses: vec![expense(json!(20), Some("2024-01-03"))],
            auto_expenses: vec![],
        };

        let first = aggregate(&collections);
        let second = aggregate(&collections);
        assert_eq!(first, second);
    }

    #[test]
    fn missing_date_sorts_as_oldest() {
        let collections = Collections {
            earnings: vec![
                earning(json!(1), None),
                earning(json!(2), Some("2024-01-01")),
            ],
            expenses: vec![expense(json!(3), Some("not a date"))],
            auto_expenses: vec![],
        };

        let records = aggregate(&collections);
        assert_eq!(records[0].amount.cents(), 200);
        // Both malformed dates collapse to epoch and land at the end.
        assert_eq!(records[1].occurred_at, DateTime::UNIX_EPOCH);
        assert_eq!(records[2].occurred_at, DateTime::UNIX_EPOCH);
    }

    #[test]
    fn amounts_are_coerced_not_propagated() {
        let collections = Collections {
            earnings: vec![
                earning(json!("12.5"), Some("2024-01-01")),
                earning(Value::Null, Some("2024-01-02")),
            ],
            expenses: vec![expense(json!("garbage"), Some("2024-01-03"))],
            auto_expenses: vec![],
        };

        let records = aggregate(&collections);
        assert_eq!(records[0].amount, MoneyCents::ZERO);
        assert_eq!(records[1].amount, MoneyCents::ZERO);
        assert_eq!(records[2].amount.cents(), 1250);
    }

    #[test]
    fn label_falls_back_description_note_default() {
        let mut raw = earning(json!(1), Some("2024-01-01"));
        raw.description = Some("Corsa aeroporto".to_string());
        raw.note = Some("nota".to_string());
        assert_eq!(project_earning(&raw).label, "Corsa aeroporto");

        raw.description = Some("  ".to_string());
        assert_eq!(project_earning(&raw).label, "nota");

        raw.note = None;
        assert_eq!(project_earning(&raw).label, "Guadagno");
    }

    #[test]
    fn filter_by_kind_preserves_order() {
        let collections = Collections {
            earnings: vec![
                earning(json!(1), Some("2024-01-05")),
                earning(json!(2), Some("2024-01-01")),
            ],
            expenses: vec![expense(json!(3), Some("2024-01-03"))],
            auto_expenses: vec![],
        };

        let records = aggregate(&collections);
        let earnings = filter_by_kind(&records, Some(TransactionKind::Earning));
        assert_eq!(earnings.len(), 2);
        assert!(earnings[0].occurred_at > earnings[1].occurred_at);
        assert_eq!(filter_by_kind(&records, None).len(), 3);
    }

    #[test]
    fn summary_recomputed_after_removal() {
        let collections = Collections {
            earnings: vec![earning(json!(50), Some("2024-01-02"))],
            expenses: vec![expense(json!(20), Some("2024-01-03"))],
            auto_expenses: vec![],
        };

        let mut records = aggregate(&collections);
        let summary = summarize(&records);
        assert_eq!(summary.income.cents(), 5000);
        assert_eq!(summary.expenses.cents(), -2000);
        assert_eq!(summary.net.cents(), 3000);
        assert_eq!(summary.count, 2);

        let key = records[0].key;
        assert!(remove_record(&mut records, key));
        assert!(!remove_record(&mut records, key));
        let summary = summarize(&records);
        assert_eq!(summary.net.cents(), 5000);
        assert_eq!(summary.count, 1);
    }
}
