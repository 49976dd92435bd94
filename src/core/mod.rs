//! Core logic for the in-memory budget ledger.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

mod store;

pub use store::{BudgetSnapshot, IdPolicy, LedgerStore, Totals};

/// Sentinel used for percentages that are not defined, either because they
/// were never computed or because total income is zero.
pub const UNDEFINED_PERCENTAGE: i64 = -1;

/// Errors that can occur when handing an entry to the ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryError {
    /// The kind tag or the value cannot form a well-defined entry.
    InvalidEntry(String),
}

impl fmt::Display for EntryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntryError::InvalidEntry(msg) => write!(f, "invalid entry: {msg}"),
        }
    }
}

impl std::error::Error for EntryError {}

/// Whether an entry adds to or takes from the budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntryKind {
    #[serde(rename = "inc")]
    Income,
    #[serde(rename = "exp")]
    Expense,
}

impl EntryKind {
    /// Short tag used in item references and commands.
    pub fn tag(self) -> &'static str {
        match self {
            EntryKind::Income => "inc",
            EntryKind::Expense => "exp",
        }
    }
}

impl FromStr for EntryKind {
    type Err = EntryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "inc" | "income" => Ok(EntryKind::Income),
            "exp" | "expense" => Ok(EntryKind::Expense),
            other => Err(EntryError::InvalidEntry(format!("unknown type tag `{other}`"))),
        }
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// One income or expense record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    /// Identifier, unique among live entries of the same kind.
    pub id: u64,
    /// Free-form description.
    pub description: String,
    /// Amount of the transaction.
    pub value: f64,
    /// Income or expense.
    pub kind: EntryKind,
    percentage: i64,
}

impl Entry {
    pub(crate) fn new(id: u64, kind: EntryKind, description: String, value: f64) -> Self {
        Self {
            id,
            description,
            value,
            kind,
            percentage: UNDEFINED_PERCENTAGE,
        }
    }

    /// Share of total income this entry represents, or `-1` when undefined.
    ///
    /// Only expenses ever receive a computed percentage.
    pub fn percentage(&self) -> i64 {
        self.percentage
    }

    pub(crate) fn calc_percentage(&mut self, total_income: f64) {
        self.percentage = ratio_percentage(self.value, total_income);
    }

    /// Reference to this entry in `kind-id` form.
    pub fn item_ref(&self) -> ItemRef {
        ItemRef {
            kind: self.kind,
            id: self.id,
        }
    }
}

/// Reference to a single entry, written as `inc-3` or `exp-0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ItemRef {
    pub kind: EntryKind,
    pub id: u64,
}

impl FromStr for ItemRef {
    type Err = EntryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (tag, id) = s
            .split_once('-')
            .ok_or_else(|| EntryError::InvalidEntry(format!("malformed item reference `{s}`")))?;
        let kind = tag.parse()?;
        if !id.starts_with(|c: char| c.is_ascii_digit()) {
            return Err(EntryError::InvalidEntry(format!("malformed item id `{id}`")));
        }
        let id = id
            .parse::<u64>()
            .map_err(|_| EntryError::InvalidEntry(format!("malformed item id `{id}`")))?;
        Ok(Self { kind, id })
    }
}

impl fmt::Display for ItemRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.kind, self.id)
    }
}

/// Rounds half up like `Math.round`.
pub(crate) fn round_half_up(x: f64) -> i64 {
    let floor = x.floor();
    if x - floor >= 0.5 {
        floor as i64 + 1
    } else {
        floor as i64
    }
}

/// `round(part / whole * 100)`, or the undefined sentinel when `whole` is not
/// positive.
pub(crate) fn ratio_percentage(part: f64, whole: f64) -> i64 {
    if whole > 0.0 {
        round_half_up(part / whole * 100.0)
    } else {
        UNDEFINED_PERCENTAGE
    }
}
