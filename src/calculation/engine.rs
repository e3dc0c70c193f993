//! Savable money computation.

use super::{record::CostEntry, row::FixedCostRow};

/// Anything that carries the raw cost text of a fixed-cost line.
pub trait CostLine {
    fn cost_text(&self) -> &str;
}

impl CostLine for FixedCostRow {
    fn cost_text(&self) -> &str {
        &self.cost
    }
}

impl CostLine for CostEntry {
    fn cost_text(&self) -> &str {
        &self.cost
    }
}

impl CostLine for (&str, &str) {
    fn cost_text(&self) -> &str {
        self.1
    }
}

impl CostLine for (String, String) {
    fn cost_text(&self) -> &str {
        &self.1
    }
}

impl<T: CostLine + ?Sized> CostLine for &T {
    fn cost_text(&self) -> &str {
        (**self).cost_text()
    }
}

/// Parses an integer amount exactly as typed. Whitespace is not trimmed.
pub fn parse_amount(text: &str) -> Option<i64> {
    text.parse::<i64>().ok()
}

/// Income minus the sum of every cost that parses as an integer.
///
/// Unparseable income counts as zero. Rows with an unparseable cost are left
/// out of the sum entirely.
pub fn compute<I, L>(income_text: &str, cost_rows: I) -> i64
where
    I: IntoIterator<Item = L>,
    L: CostLine,
{
    breakdown(income_text, cost_rows).savable
}

/// Parts of one computation, for display next to the savable amount.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Breakdown {
    pub income: i64,
    pub total_costs: i64,
    pub included_rows: usize,
    pub excluded_rows: usize,
    pub savable: i64,
}

pub fn breakdown<I, L>(income_text: &str, cost_rows: I) -> Breakdown
where
    I: IntoIterator<Item = L>,
    L: CostLine,
{
    let income = parse_amount(income_text).unwrap_or(0);
    let mut result = Breakdown {
        income,
        ..Breakdown::default()
    };
    for line in cost_rows {
        match parse_amount(line.cost_text()) {
            Some(cost) => {
                result.total_costs = result.total_costs.saturating_add(cost);
                result.included_rows += 1;
            }
            None => result.excluded_rows += 1,
        }
    }
    result.savable = income.saturating_sub(result.total_costs);
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_cost_is_excluded_not_zeroed() {
        let rows = [("rent", "300"), ("gym", "")];
        assert_eq!(compute("1000", rows), 700);

        let detail = breakdown("1000", rows);
        assert_eq!(detail.included_rows, 1);
        assert_eq!(detail.excluded_rows, 1);
    }

    #[test]
    fn invalid_income_defaults_to_zero() {
        assert_eq!(compute("abc", [("rent", "100")]), -100);
    }

    #[test]
    fn negative_result_is_not_clamped() {
        assert_eq!(compute("50", [("rent", "100")]), -50);
    }

    #[test]
    fn empty_calculation_is_zero() {
        let rows: [(&str, &str); 0] = [];
        assert_eq!(compute("", rows), 0);
    }

    #[test]
    fn non_numeric_and_decimal_costs_are_skipped() {
        let rows = vec![
            FixedCostRow::new("rent", "300"),
            FixedCostRow::new("phone", "twenty"),
            FixedCostRow::new("coffee", "4.5"),
            FixedCostRow::new("refund", "-50"),
        ];
        assert_eq!(compute("1000", &rows), 750);
    }

    #[test]
    fn surrounding_whitespace_makes_amount_invalid() {
        assert_eq!(parse_amount(" 10"), None);
        assert_eq!(parse_amount("+10"), Some(10));
    }

    #[test]
    fn huge_totals_saturate() {
        let max = i64::MAX.to_string();
        let rows = [("a", max.as_str()), ("b", max.as_str())];
        assert_eq!(compute("0", rows), -i64::MAX);
    }
}
