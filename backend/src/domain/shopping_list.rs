//! Shopping list aggregation over a user's cart.
//!
//! Every ingredient line of every recipe in the cart is folded into one line
//! per ingredient *name*. Grouping deliberately ignores ingredient identity:
//! two ingredients that share a name but differ in unit are merged, and the
//! unit of the first row encountered wins.

use std::collections::HashMap;

/// One ingredient line of one recipe in the cart.
///
/// Rows arrive in cart insertion order, then in recipe line order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartIngredientRow {
    pub name: String,
    pub measurement_unit: String,
    pub amount: i16,
}

/// Summed quantity of one ingredient name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShoppingListLine {
    pub name: String,
    pub measurement_unit: String,
    pub total: i64,
}

/// Aggregated shopping list in first-encounter order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShoppingList {
    lines: Vec<ShoppingListLine>,
}

impl ShoppingList {
    /// Group `rows` by ingredient name and sum their amounts.
    ///
    /// # Examples
    /// ```
    /// use foodgram::domain::{CartIngredientRow, ShoppingList};
    ///
    /// let row = |name: &str, amount| CartIngredientRow {
    ///     name: name.into(),
    ///     measurement_unit: "g".into(),
    ///     amount,
    /// };
    /// let list = ShoppingList::aggregate([row("Salt", 5), row("Flour", 200), row("Salt", 3)]);
    /// assert_eq!(list.render(), "Salt - 8 g\nFlour - 200 g\n");
    /// ```
    pub fn aggregate<I>(rows: I) -> Self
    where
        I: IntoIterator<Item = CartIngredientRow>,
    {
        let mut lines: Vec<ShoppingListLine> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();

        for row in rows {
            let amount = i64::from(row.amount);
            if let Some(line) = index.get(&row.name).and_then(|&at| lines.get_mut(at)) {
                line.total += amount;
                continue;
            }
            index.insert(row.name.clone(), lines.len());
            lines.push(ShoppingListLine {
                name: row.name,
                measurement_unit: row.measurement_unit,
                total: amount,
            });
        }

        Self { lines }
    }

    pub fn lines(&self) -> &[ShoppingListLine] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Plain-text rendering, one `"{name} - {total} {unit}"` line each,
    /// newline terminated. An empty list renders as an empty string.
    pub fn render(&self) -> String {
        self.lines
            .iter()
            .map(|line| format!("{} - {} {}\n", line.name, line.total, line.measurement_unit))
            .collect()
    }
}
