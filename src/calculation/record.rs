//! Persisted calculation record and its JSON projection.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::errors::{CalcError, Result};

use super::{
    engine::{self, Breakdown},
    row::FixedCostRow,
    row_list::RowList,
};

/// One saved fixed cost.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostEntry {
    pub description: String,
    #[serde(deserialize_with = "text_or_number")]
    pub cost: String,
}

impl CostEntry {
    pub fn new(description: impl Into<String>, cost: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            cost: cost.into(),
        }
    }
}

impl From<&FixedCostRow> for CostEntry {
    fn from(row: &FixedCostRow) -> Self {
        Self::new(row.description.clone(), row.cost.clone())
    }
}

impl From<FixedCostRow> for CostEntry {
    fn from(row: FixedCostRow) -> Self {
        Self::new(row.description, row.cost)
    }
}

impl From<(&str, &str)> for CostEntry {
    fn from((description, cost): (&str, &str)) -> Self {
        Self::new(description, cost)
    }
}

impl From<CostEntry> for FixedCostRow {
    fn from(entry: CostEntry) -> Self {
        FixedCostRow::new(entry.description, entry.cost)
    }
}

/// Income plus the ordered list of fixed costs, as written to disk.
///
/// The income is kept as the raw text the user entered. Files written by the
/// first release used `allInComingMoney` and `fixCosts`; both names are still
/// accepted on load.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalculationRecord {
    #[serde(alias = "allInComingMoney", deserialize_with = "text_or_number")]
    pub income: String,
    #[serde(alias = "fixCosts")]
    pub costs: Vec<CostEntry>,
}

impl CalculationRecord {
    pub fn new<I, E>(income: impl Into<String>, costs: I) -> Self
    where
        I: IntoIterator<Item = E>,
        E: Into<CostEntry>,
    {
        Self {
            income: income.into(),
            costs: costs.into_iter().map(Into::into).collect(),
        }
    }

    /// Snapshot of the form: the given income and the rows in on-screen order.
    pub fn from_rows(income: impl Into<String>, rows: &RowList) -> Self {
        Self::new(income, rows.rows())
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(encode_failed)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(json).map_err(malformed)?;
        let object = value
            .as_object()
            .ok_or_else(|| CalcError::MalformedRecord("expected a JSON object".into()))?;
        let entries = object.get("costs").or_else(|| object.get("fixCosts"));
        if let Some(Value::Array(entries)) = entries {
            if let Some(index) = entries.iter().position(|entry| !entry.is_object()) {
                return Err(CalcError::MalformedRecord(format!(
                    "cost entry {} is not an object",
                    index
                )));
            }
        }
        serde_json::from_value(value).map_err(malformed)
    }

    pub fn savable(&self) -> i64 {
        engine::compute(&self.income, &self.costs)
    }

    pub fn breakdown(&self) -> Breakdown {
        engine::breakdown(&self.income, &self.costs)
    }
}

/// Serializes an income and cost rows into the calculation file format.
pub fn serialize<I, E>(income_text: &str, cost_rows: I) -> Result<String>
where
    I: IntoIterator<Item = E>,
    E: Into<CostEntry>,
{
    CalculationRecord::new(income_text, cost_rows).to_json()
}

/// Parses a calculation file, failing with `MalformedRecord` on any shape error.
pub fn deserialize(json: &str) -> Result<CalculationRecord> {
    CalculationRecord::from_json(json)
}

fn malformed(err: serde_json::Error) -> CalcError {
    CalcError::MalformedRecord(err.to_string())
}

fn encode_failed(err: serde_json::Error) -> CalcError {
    CalcError::Serialization(err.to_string())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TextOrNumber {
    Text(String),
    Number(serde_json::Number),
}

fn text_or_number<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match TextOrNumber::deserialize(deserializer)? {
        TextOrNumber::Text(text) => text,
        TextOrNumber::Number(number) => number.to_string(),
    })
}
