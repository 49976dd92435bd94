//! Text formatting for budget figures.

use std::fmt::Write;

use chrono::NaiveDate;

use crate::core::{BudgetSnapshot, Entry, EntryKind, LedgerStore};

/// Formats an amount as `+ 1,234.50` for income or `- 1,234.50` for expenses.
pub fn format_amount(value: f64, kind: EntryKind) -> String {
    let fixed = format!("{:.2}", value.abs());
    let (int, dec) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    let sign = match kind {
        EntryKind::Income => '+',
        EntryKind::Expense => '-',
    };
    format!("{sign} {}.{dec}", group_thousands(int))
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Budget is shown with `+` only when strictly positive.
pub fn format_budget(budget: f64) -> String {
    let kind = if budget > 0.0 {
        EntryKind::Income
    } else {
        EntryKind::Expense
    };
    format_amount(budget, kind)
}

/// `25%`, or `---` for zero and undefined percentages.
pub fn format_percentage(percentage: i64) -> String {
    if percentage > 0 {
        format!("{percentage}%")
    } else {
        "---".to_string()
    }
}

/// Heading such as `October, 2026`.
pub fn month_heading(date: NaiveDate) -> String {
    date.format("%B, %Y").to_string()
}

/// Budget header shown after every change.
pub fn render_summary(snapshot: &BudgetSnapshot, date: NaiveDate) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Available budget in {}", month_heading(date));
    let _ = writeln!(out, "  {}", format_budget(snapshot.budget));
    let _ = writeln!(
        out,
        "  Income    {:>16}",
        format_amount(snapshot.total_income, EntryKind::Income)
    );
    let _ = writeln!(
        out,
        "  Expenses  {:>16}  {}",
        format_amount(snapshot.total_expense, EntryKind::Expense),
        format_percentage(snapshot.percentage)
    );
    out
}

fn render_row(out: &mut String, entry: &Entry) {
    let _ = write!(
        out,
        "  {:<7} {:<24} {:>16}",
        entry.item_ref().to_string(),
        entry.description,
        format_amount(entry.value, entry.kind)
    );
    if entry.kind == EntryKind::Expense {
        let _ = write!(out, "  {}", format_percentage(entry.percentage()));
    }
    out.push('\n');
}

/// Both entry lists, expenses with their share of income.
pub fn render_entries(store: &LedgerStore) -> String {
    let mut out = String::from("Income\n");
    for entry in store.income() {
        render_row(&mut out, entry);
    }
    out.push_str("Expenses\n");
    for entry in store.expenses() {
        render_row(&mut out, entry);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn amounts_are_signed_and_grouped() {
        assert_eq!(format_amount(100.0, EntryKind::Income), "+ 100.00");
        assert_eq!(format_amount(25.0, EntryKind::Expense), "- 25.00");
        assert_eq!(format_amount(2310.4567, EntryKind::Income), "+ 2,310.46");
        assert_eq!(
            format_amount(1234567.891, EntryKind::Expense),
            "- 1,234,567.89"
        );
        assert_eq!(format_amount(-42.0, EntryKind::Income), "+ 42.00");
    }

    #[test]
    fn grouping_boundaries() {
        assert_eq!(group_thousands("0"), "0");
        assert_eq!(group_thousands("999"), "999");
        assert_eq!(group_thousands("1000"), "1,000");
        assert_eq!(group_thousands("100000"), "100,000");
    }

    #[test]
    fn budget_sign() {
        assert_eq!(format_budget(75.0), "+ 75.00");
        assert_eq!(format_budget(0.0), "- 0.00");
        assert_eq!(format_budget(-10.0), "- 10.00");
    }

    #[test]
    fn percentages() {
        assert_eq!(format_percentage(25), "25%");
        assert_eq!(format_percentage(0), "---");
        assert_eq!(format_percentage(-1), "---");
    }

    #[test]
    fn heading() {
        let date = NaiveDate::from_ymd_opt(2026, 10, 18).unwrap();
        assert_eq!(month_heading(date), "October, 2026");
    }

    #[test]
    fn entries_listing() {
        let mut store = LedgerStore::default();
        store.add_item(EntryKind::Income, "Salary", 100.0).unwrap();
        store.add_item(EntryKind::Expense, "Rent", 25.0).unwrap();
        store.recompute();
        let text = render_entries(&store);
        assert!(text.contains("inc-0"));
        assert!(text.contains("Salary"));
        assert!(text.contains("exp-0"));
        assert!(text.contains("- 25.00  25%"));
    }
}
