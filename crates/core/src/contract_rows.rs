//! Spreadsheet rows describing contracts, and their merge into one group per
//! contract name.
//!
//! A contract sheet has one row per (contract, customer request) pair. Cells
//! arrive as JSON values exported from the sheet: numbers and text are both
//! accepted for every column, and empty cells fall back to defaults.

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};

use crate::workflow::ContractState;

// ---------------------------------------------------------------------------
// Row
// ---------------------------------------------------------------------------

/// One spreadsheet row.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct ContractRow {
    /// Contract name (`titolocommessa`). Rows without one are ignored.
    #[serde(rename = "titolocommessa", default, deserialize_with = "text_cell")]
    pub name: Option<String>,
    /// Contract number (`nrcontratto`).
    #[serde(rename = "nrcontratto", default, deserialize_with = "text_cell")]
    pub contract_number: Option<String>,
    /// Contracted days (`gg`).
    #[serde(rename = "gg", default, deserialize_with = "number_cell")]
    pub days: Option<f64>,
    #[serde(default, deserialize_with = "number_cell")]
    pub amount: Option<f64>,
    /// Customer request linked to this contract (`cr_id`).
    #[serde(rename = "cr_id", default, deserialize_with = "text_cell")]
    pub customer_request_id: Option<String>,
    /// Status code `A`, `B` or `D` (`stato`).
    #[serde(rename = "stato", default, deserialize_with = "text_cell")]
    pub status_code: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Cell {
    Number(serde_json::Number),
    Text(String),
    Bool(bool),
}

fn text_cell<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    let cell = Option::<Cell>::deserialize(deserializer)?;
    Ok(match cell {
        Some(Cell::Number(n)) => Some(n.to_string()),
        Some(Cell::Text(s)) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Some(Cell::Bool(_)) | None => None,
    })
}

fn number_cell<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
    let cell = Option::<Cell>::deserialize(deserializer)?;
    match cell {
        Some(Cell::Number(n)) => Ok(n.as_f64()),
        Some(Cell::Text(s)) => parse_decimal(&s).map_err(serde::de::Error::custom),
        Some(Cell::Bool(_)) => Err(serde::de::Error::custom("expected a number, found a boolean")),
        None => Ok(None),
    }
}

/// Parse a numeric cell typed as text, in either `1.200,50` or `1,200.50`
/// notation.
///
/// When both separators occur, the last one is the decimal separator and the
/// other groups thousands. A lone separator that occurs once is decimal
/// (`12,5`, `1.5`); one that repeats groups thousands (`1.200.000`).
fn parse_decimal(raw: &str) -> Result<Option<f64>, String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    let decimal = match (trimmed.rfind('.'), trimmed.rfind(',')) {
        (Some(dot), Some(comma)) => Some(if dot > comma { '.' } else { ',' }),
        (Some(_), None) => (trimmed.matches('.').count() == 1).then_some('.'),
        (None, Some(_)) => (trimmed.matches(',').count() == 1).then_some(','),
        (None, None) => None,
    };
    let normalized: String = trimmed
        .chars()
        .filter_map(|c| match c {
            c if Some(c) == decimal => Some('.'),
            '.' | ',' => None,
            c => Some(c),
        })
        .collect();
    normalized
        .parse::<f64>()
        .map(Some)
        .map_err(|_| format!("'{trimmed}' is not a number"))
}

// ---------------------------------------------------------------------------
// Grouping
// ---------------------------------------------------------------------------

/// All rows sharing one contract name, merged.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContractGroup {
    pub name: String,
    pub contract_number: Option<String>,
    pub days: f64,
    pub amount: f64,
    pub state: ContractState,
    /// Customer request ids in row order. May contain duplicates.
    pub customer_request_ids: Vec<String>,
    /// Rows for this name carried differing metadata; the last row won.
    pub divergent: bool,
}

impl ContractGroup {
    fn metadata_of(row: &ContractRow) -> (Option<String>, f64, f64, ContractState) {
        (
            row.contract_number.clone(),
            row.days.unwrap_or(0.0),
            row.amount.unwrap_or(0.0),
            ContractState::from_status_code(row.status_code.as_deref().unwrap_or_default()),
        )
    }

    fn from_row(name: &str, row: &ContractRow) -> Self {
        let (contract_number, days, amount, state) = Self::metadata_of(row);
        Self {
            name: name.to_string(),
            contract_number,
            days,
            amount,
            state,
            customer_request_ids: Vec::new(),
            divergent: false,
        }
    }

    fn apply(&mut self, row: &ContractRow) {
        let (contract_number, days, amount, state) = Self::metadata_of(row);
        self.contract_number = contract_number;
        self.days = days;
        self.amount = amount;
        self.state = state;
    }

    fn metadata(&self) -> (Option<String>, f64, f64, ContractState) {
        (self.contract_number.clone(), self.days, self.amount, self.state)
    }
}

/// Result of merging a sheet.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MergedRows {
    /// Groups in order of first appearance.
    pub groups: Vec<ContractGroup>,
    /// Rows dropped for lacking a contract name.
    pub unnamed_rows: usize,
    /// Named rows without a customer request id.
    pub rows_without_request: usize,
}

/// Group rows by contract name, accumulating customer request ids.
///
/// Metadata is last-row-wins; a group whose rows disagree is flagged
/// [`ContractGroup::divergent`].
pub fn merge_rows(rows: &[ContractRow]) -> MergedRows {
    let mut groups: IndexMap<String, ContractGroup> = IndexMap::new();
    let mut unnamed_rows = 0;
    let mut rows_without_request = 0;

    for row in rows {
        let Some(name) = row.name.as_deref() else {
            unnamed_rows += 1;
            continue;
        };

        let seen = groups.contains_key(name);
        let group = groups
            .entry(name.to_string())
            .or_insert_with(|| ContractGroup::from_row(name, row));
        if seen {
            if group.metadata() != ContractGroup::metadata_of(row) {
                group.divergent = true;
            }
            group.apply(row);
        }

        match &row.customer_request_id {
            Some(id) => group.customer_request_ids.push(id.clone()),
            None => rows_without_request += 1,
        }
    }

    MergedRows {
        groups: groups.into_values().collect(),
        unnamed_rows,
        rows_without_request,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
