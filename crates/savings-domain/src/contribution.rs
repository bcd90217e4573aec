//! Domain types representing deposits recorded against a goal.

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::common::*;

/// A single deposit (or withdrawal, when enabled) recorded against a goal.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Contribution {
    pub id: Uuid,
    pub amount: Decimal,
    pub date: NaiveDate,
    /// Marks the synthetic entry that carries a goal's starting balance.
    #[serde(default)]
    pub is_initial: bool,
}

impl Contribution {
    pub fn new(amount: Decimal, date: NaiveDate) -> Self {
        Self {
            id: Uuid::new_v4(),
            amount,
            date,
            is_initial: false,
        }
    }

    /// Builds the starting-balance entry created alongside a goal.
    pub fn initial(amount: Decimal, date: NaiveDate) -> Self {
        Self {
            is_initial: true,
            ..Self::new(amount, date)
        }
    }

    /// Calendar bucket `(year, month)` the contribution falls into.
    pub fn month_key(&self) -> (i32, u32) {
        (self.date.year(), self.date.month())
    }
}

impl Identifiable for Contribution {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Amounted for Contribution {
    fn amount(&self) -> Decimal {
        self.amount
    }
}

impl Displayable for Contribution {
    fn display_label(&self) -> String {
        let marker = if self.is_initial { " (initial)" } else { "" };
        format!("{} {}{}", self.date.format("%Y-%m-%d"), self.amount, marker)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn serializes_with_camel_case_fields_and_plain_date() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
        let contribution = Contribution::initial(dec!(200), date);
        let value = serde_json::to_value(&contribution).unwrap();

        assert_eq!(value["date"], "2024-01-05");
        assert_eq!(value["isInitial"], true);
        assert_eq!(value["amount"].as_f64(), Some(200.0));
    }

    #[test]
    fn missing_initial_flag_defaults_to_false() {
        let raw = format!(
            r#"{{"id":"{}","amount":12.5,"date":"2024-02-01"}}"#,
            Uuid::new_v4()
        );
        let contribution: Contribution = serde_json::from_str(&raw).unwrap();
        assert!(!contribution.is_initial);
        assert_eq!(contribution.amount, dec!(12.5));
        assert_eq!(contribution.month_key(), (2024, 2));
    }
}
