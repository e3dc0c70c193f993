//! Calculation primitives: fixed-cost rows, the row list backing the form,
//! the persisted record, and the savable-money engine.

pub mod engine;
pub mod record;
pub mod row;
pub mod row_list;

pub use engine::{breakdown, compute, parse_amount, Breakdown, CostLine};
pub use record::{deserialize, serialize, CalculationRecord, CostEntry};
pub use row::{FixedCostRow, RowHandle};
pub use row_list::RowList;
