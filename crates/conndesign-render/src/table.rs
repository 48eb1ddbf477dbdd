use std::fmt;

use serde::{Deserialize, Serialize};

/// One row of a two-column-pair property table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableRow {
    pub left_symbol: String,
    pub left_value: String,
    pub right_symbol: String,
    pub right_value: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyTable {
    pub rows: Vec<TableRow>,
}

impl PropertyTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Lay out `symbols` and their matching `values` as a left half and a right
/// half of `ceil(symbols.len() / 2)` rows each.
///
/// Symbols and values are paired by index. The extra item of an odd-length
/// symbol list lands in the left half. A value index past the end of
/// `values` renders as an empty cell, and so does a symbol index past the end
/// of `symbols`.
pub fn tabulate<S, V>(symbols: &[S], values: &[V]) -> PropertyTable
where
    S: AsRef<str>,
    V: fmt::Display,
{
    let half = symbols.len() / 2 + symbols.len() % 2;
    let symbol_at = |index: usize| {
        symbols
            .get(index)
            .map(|symbol| symbol.as_ref().to_string())
            .unwrap_or_default()
    };
    let value_at = |index: usize| {
        values
            .get(index)
            .map(|value| value.to_string())
            .unwrap_or_default()
    };

    let rows = (0..half)
        .map(|row| TableRow {
            left_symbol: symbol_at(row),
            left_value: value_at(row),
            right_symbol: symbol_at(row + half),
            right_value: value_at(row + half),
        })
        .collect();
    PropertyTable { rows }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn odd_symbol_count_puts_extra_item_on_the_left() {
        let table = tabulate(&["A", "d", "t_w"], &[1.0, 2.0, 3.0]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.rows[0].left_symbol, "A");
        assert_eq!(table.rows[0].right_symbol, "t_w");
        assert_eq!(table.rows[1].left_symbol, "d");
        assert_eq!(table.rows[1].right_symbol, "");
        assert_eq!(table.rows[1].right_value, "");
    }

    #[test]
    fn short_value_list_leaves_trailing_cells_empty() {
        let symbols: Vec<String> = (0..25).map(|i| format!("s{i}")).collect();
        let values: Vec<u32> = (0..20).collect();
        let table = tabulate(&symbols, &values);

        assert_eq!(table.len(), 13);
        for row in &table.rows[..7] {
            assert!(!row.right_value.is_empty());
        }
        for row in &table.rows[7..12] {
            assert!(!row.right_symbol.is_empty());
            assert_eq!(row.right_value, "");
        }
        assert_eq!(table.rows[12].right_symbol, "");
        assert_eq!(table.rows[12].right_value, "");
        assert_eq!(table.rows[12].left_value, "12");
    }

    #[test]
    fn empty_inputs_produce_no_rows() {
        let table = tabulate::<&str, f64>(&[], &[]);
        assert!(table.is_empty());
    }
}
