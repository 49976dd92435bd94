use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use super::{Entry, EntryError, EntryKind, UNDEFINED_PERCENTAGE, ratio_percentage};

/// How the next identifier of a kind is chosen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdPolicy {
    /// Per-kind counter that deletions never rewind.
    #[default]
    Monotonic,
    /// Id of the last live entry plus one, or zero when the kind is empty.
    /// Deleting the tail entry lets its id be handed out again.
    FromLastEntry,
}

/// Sum of entry values per kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Totals {
    pub income: f64,
    pub expense: f64,
}

/// Derived figures handed to the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BudgetSnapshot {
    pub budget: f64,
    pub total_income: f64,
    pub total_expense: f64,
    /// Share of income consumed by expenses, `-1` when income is zero.
    pub percentage: i64,
}

/// Owns the income and expense entries and their derived aggregates.
///
/// Derived values are only refreshed by the `calculate_*` methods or
/// [`LedgerStore::recompute`]; reads in between return whatever was computed
/// last.
#[derive(Debug, Clone)]
pub struct LedgerStore {
    income: Vec<Entry>,
    expenses: Vec<Entry>,
    next_income_id: u64,
    next_expense_id: u64,
    policy: IdPolicy,
    totals: Totals,
    budget: f64,
    percentage: i64,
}

impl Default for LedgerStore {
    fn default() -> Self {
        Self::new(IdPolicy::default())
    }
}

impl LedgerStore {
    /// Creates an empty store using the given id policy.
    pub fn new(policy: IdPolicy) -> Self {
        Self {
            income: Vec::new(),
            expenses: Vec::new(),
            next_income_id: 0,
            next_expense_id: 0,
            policy,
            totals: Totals::default(),
            budget: 0.0,
            percentage: UNDEFINED_PERCENTAGE,
        }
    }

    pub fn id_policy(&self) -> IdPolicy {
        self.policy
    }

    /// Appends a new entry and returns a copy of it.
    ///
    /// Fails when `value` is NaN or infinite. Positivity and non-empty
    /// descriptions are the caller's concern.
    pub fn add_item(
        &mut self,
        kind: EntryKind,
        description: impl Into<String>,
        value: f64,
    ) -> Result<Entry, EntryError> {
        if !value.is_finite() {
            return Err(EntryError::InvalidEntry(format!(
                "value must be finite, got {value}"
            )));
        }
        let id = self.next_id(kind);
        let entry = Entry::new(id, kind, description.into(), value);
        match kind {
            EntryKind::Income => {
                self.next_income_id = id + 1;
                self.income.push(entry.clone());
            }
            EntryKind::Expense => {
                self.next_expense_id = id + 1;
                self.expenses.push(entry.clone());
            }
        }
        debug!(kind = %kind, id, value, "Added entry");
        Ok(entry)
    }

    /// Like [`add_item`](Self::add_item) but takes the kind as a text tag
    /// (`inc` or `exp`).
    pub fn add_raw(
        &mut self,
        tag: &str,
        description: impl Into<String>,
        value: f64,
    ) -> Result<Entry, EntryError> {
        let kind = tag.parse()?;
        self.add_item(kind, description, value)
    }

    fn next_id(&self, kind: EntryKind) -> u64 {
        match self.policy {
            IdPolicy::Monotonic => match kind {
                EntryKind::Income => self.next_income_id,
                EntryKind::Expense => self.next_expense_id,
            },
            IdPolicy::FromLastEntry => self.entries(kind).last().map_or(0, |e| e.id + 1),
        }
    }

    /// Removes the entry with `id` from the `kind` collection.
    ///
    /// Unknown ids are ignored. Returns whether an entry was removed.
    pub fn delete_item(&mut self, kind: EntryKind, id: u64) -> bool {
        let entries = self.entries_mut(kind);
        match entries.iter().position(|e| e.id == id) {
            Some(index) => {
                entries.remove(index);
                debug!(kind = %kind, id, "Deleted entry");
                true
            }
            None => {
                trace!(kind = %kind, id, "Delete ignored, no such entry");
                false
            }
        }
    }

    /// Re-sums both collections.
    pub fn calculate_totals(&mut self) {
        self.totals = Totals {
            income: sum(&self.income),
            expense: sum(&self.expenses),
        };
    }

    /// Refreshes the totals, then the budget and the overall percentage.
    pub fn calculate_budget(&mut self) {
        self.calculate_totals();
        self.budget = self.totals.income - self.totals.expense;
        self.percentage = ratio_percentage(self.totals.expense, self.totals.income);
        debug!(
            income = self.totals.income,
            expense = self.totals.expense,
            budget = self.budget,
            percentage = self.percentage,
            "Budget calculated"
        );
    }

    /// Computes each expense's share of the current total income.
    pub fn calculate_percentages(&mut self) {
        let total_income = self.totals.income;
        for entry in &mut self.expenses {
            entry.calc_percentage(total_income);
        }
    }

    /// Totals, budget and percentages in dependency order.
    pub fn recompute(&mut self) {
        self.calculate_budget();
        self.calculate_percentages();
    }

    pub fn get_budget(&self) -> BudgetSnapshot {
        BudgetSnapshot {
            budget: self.budget,
            total_income: self.totals.income,
            total_expense: self.totals.expense,
            percentage: self.percentage,
        }
    }

    /// Per-expense percentages in insertion order.
    pub fn get_percentages(&self) -> Vec<i64> {
        self.expenses.iter().map(Entry::percentage).collect()
    }

    pub fn totals(&self) -> Totals {
        self.totals
    }

    pub fn income(&self) -> &[Entry] {
        &self.income
    }

    pub fn expenses(&self) -> &[Entry] {
        &self.expenses
    }

    pub fn entries(&self, kind: EntryKind) -> &[Entry] {
        match kind {
            EntryKind::Income => &self.income,
            EntryKind::Expense => &self.expenses,
        }
    }

    fn entries_mut(&mut self, kind: EntryKind) -> &mut Vec<Entry> {
        match kind {
            EntryKind::Income => &mut self.income,
            EntryKind::Expense => &mut self.expenses,
        }
    }

    pub fn get(&self, kind: EntryKind, id: u64) -> Option<&Entry> {
        self.entries(kind).iter().find(|e| e.id == id)
    }

    /// Number of live entries of both kinds.
    pub fn len(&self) -> usize {
        self.income.len() + self.expenses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.income.is_empty() && self.expenses.is_empty()
    }
}

fn sum(entries: &[Entry]) -> f64 {
    entries.iter().fold(0.0, |acc, e| acc + e.value)
}
