use sea_orm::{ConnectionTrait, Statement, Value};

use crate::{EngineError, EntryDate, Money, ResultEngine};

use super::Engine;

/// Income and expense totals over some window.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Balance {
    pub income: Money,
    pub expense: Money,
}

impl Balance {
    /// Income minus expense.
    pub fn total(&self) -> Money {
        self.income.saturating_sub(self.expense)
    }
}

impl Engine {
    /// Totals over all of the user's entries. No entries yields zeros.
    pub async fn total_balance(&self, user_id: i32) -> ResultEngine<Balance> {
        Ok(Balance {
            income: self.sum_amounts("incomes", user_id, None).await?,
            expense: self.sum_amounts("expenses", user_id, None).await?,
        })
    }

    /// Totals over entries dated within `start..=end`.
    pub async fn period_balance(
        &self,
        user_id: i32,
        start: &EntryDate,
        end: &EntryDate,
    ) -> ResultEngine<Balance> {
        Ok(Balance {
            income: self
                .sum_amounts("incomes", user_id, Some((start, end)))
                .await?,
            expense: self
                .sum_amounts("expenses", user_id, Some((start, end)))
                .await?,
        })
    }

    /// Sums the stored decimal amounts exactly. SQLite would add them as floats.
    async fn sum_amounts(
        &self,
        table: &'static str,
        user_id: i32,
        range: Option<(&EntryDate, &EntryDate)>,
    ) -> ResultEngine<Money> {
        let backend = self.database.get_database_backend();
        let mut values: Vec<Value> = vec![user_id.into()];
        let range_cond = match range {
            Some((start, end)) => {
                values.push(start.as_str().into());
                values.push(end.as_str().into());
                " AND date >= ? AND date <= ?"
            }
            None => "",
        };

        let stmt = Statement::from_sql_and_values(
            backend,
            format!("SELECT amount FROM {table} WHERE user_id = ?{range_cond}"),
            values,
        );

        let mut sum = Money::ZERO;
        for row in self.database.query_all(stmt).await? {
            let stored: String = row.try_get("", "amount")?;
            let amount = Money::from_stored(&stored)?;
            sum = sum
                .checked_add(amount)
                .ok_or_else(|| EngineError::InvalidAmount(format!("{table} total too large")))?;
        }
        Ok(sum)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn money(s: &str) -> Money {
        s.parse().unwrap()
    }

    #[test]
    fn total_is_income_minus_expense() {
        let balance = Balance {
            income: money("150"),
            expense: money("30.005"),
        };
        assert_eq!(balance.total(), money("119.995"));
        assert_eq!(Balance::default().total().rounded(), "0.00");
    }
}
