//! Per-screen calculation state and the view collaborator it drives.

use crate::{
    calculation::{compute, CalculationRecord, FixedCostRow, RowHandle, RowList},
    errors::{CalcError, Result},
    storage::{calculation_name_from, validate_name, CalculationStore},
};

/// Callbacks a front end implements to mirror session changes.
///
/// The session calls these; the view never calls back into the session.
pub trait CalculationView {
    fn on_row_added(&mut self, _handle: RowHandle, _row: &FixedCostRow) {}
    fn on_row_removed(&mut self, _handle: RowHandle) {}
    fn on_rows_cleared(&mut self) {}
    /// The displayed result no longer matches the rows.
    fn on_result_stale(&mut self) {}
    fn display_result(&mut self, _value: i64) {}
    fn display_error(&mut self, _error: &CalcError) {}
    /// `None` means a new, unsaved calculation.
    fn display_loaded_name(&mut self, _name: Option<&str>) {}
}

/// View that ignores every notification.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullView;

impl CalculationView for NullView {}

/// Income, rows, and the name of the calculation currently on screen.
pub struct CalculationSession<V: CalculationView = NullView> {
    income: String,
    rows: RowList,
    loaded_name: Option<String>,
    view: V,
}

impl CalculationSession<NullView> {
    pub fn new() -> Self {
        Self::with_view(NullView)
    }
}

impl Default for CalculationSession<NullView> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: CalculationView> CalculationSession<V> {
    /// Starts with a single empty row, like a freshly opened form.
    pub fn with_view(view: V) -> Self {
        let mut session = Self {
            income: String::new(),
            rows: RowList::new(),
            loaded_name: None,
            view,
        };
        session.view.display_loaded_name(None);
        session.push_row(FixedCostRow::default());
        session
    }

    pub fn income(&self) -> &str {
        &self.income
    }

    pub fn set_income(&mut self, income: impl Into<String>) {
        self.income = income.into();
    }

    pub fn rows(&self) -> &RowList {
        &self.rows
    }

    pub fn loaded_name(&self) -> Option<&str> {
        self.loaded_name.as_deref()
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    pub fn add_row(&mut self) -> RowHandle {
        let handle = self.push_row(FixedCostRow::default());
        self.view.on_result_stale();
        handle
    }

    pub fn add_row_with(
        &mut self,
        description: impl Into<String>,
        cost: impl Into<String>,
    ) -> RowHandle {
        let handle = self.push_row(FixedCostRow::new(description, cost));
        self.view.on_result_stale();
        handle
    }

    fn push_row(&mut self, row: FixedCostRow) -> RowHandle {
        let handle = self.rows.add_row_with(row.description, row.cost);
        if let Some(added) = self.rows.get(handle) {
            self.view.on_row_added(handle, added);
        }
        handle
    }

    pub fn edit_row(
        &mut self,
        handle: RowHandle,
        description: impl Into<String>,
        cost: impl Into<String>,
    ) -> Result<()> {
        let row = self
            .rows
            .get_mut(handle)
            .ok_or(CalcError::RowNotFound(handle))?;
        row.description = description.into();
        row.cost = cost.into();
        Ok(())
    }

    pub fn remove_row(&mut self, handle: RowHandle) -> Result<FixedCostRow> {
        let row = self.rows.remove_row(handle)?;
        self.view.on_row_removed(handle);
        self.view.on_result_stale();
        Ok(row)
    }

    /// Computes savable money from the current income and rows.
    pub fn calculate(&mut self) -> i64 {
        let value = compute(&self.income, self.rows.rows());
        self.view.display_result(value);
        value
    }

    pub fn to_record(&self) -> CalculationRecord {
        CalculationRecord::from_rows(self.income.clone(), &self.rows)
    }

    /// Discards the current form and starts over with one empty row.
    pub fn new_calculation(&mut self) -> i64 {
        self.clear_rows();
        self.income.clear();
        self.push_row(FixedCostRow::default());
        self.set_loaded_name(None);
        self.calculate()
    }

    /// Saves under `name`, replacing any calculation already stored there.
    pub fn save<S: CalculationStore + ?Sized>(&mut self, store: &S, name: &str) -> Result<()> {
        let name = validate_name(name)?.to_string();
        store.save(&name, &self.to_record())?;
        self.set_loaded_name(Some(name));
        Ok(())
    }

    /// Replaces the form with the calculation in `json`, read from the file
    /// `file_name`. The loaded name is the file name without its extension.
    ///
    /// The session is left untouched when the name or the JSON is rejected.
    pub fn load_json(&mut self, file_name: &str, json: &str) -> Result<i64> {
        match validate_name(calculation_name_from(file_name)) {
            Ok(name) => {
                let name = name.to_string();
                self.load_named(name, json)
            }
            Err(err) => self.reject(file_name, err),
        }
    }

    /// Loads calculation `name` from `store`. `name` is validated exactly as
    /// `save` validates it, so the loaded name always maps back to the file read.
    pub fn load<S: CalculationStore + ?Sized>(&mut self, store: &S, name: &str) -> Result<i64> {
        let read = validate_name(name)
            .map(str::to_string)
            .and_then(|name| store.load_raw(&name).map(|json| (name, json)));
        match read {
            Ok((name, json)) => self.load_named(name, &json),
            Err(err) => self.reject(name, err),
        }
    }

    fn load_named(&mut self, name: String, json: &str) -> Result<i64> {
        match CalculationRecord::from_json(json) {
            Ok(record) => Ok(self.apply_record(&name, record)),
            Err(err) => self.reject(&name, err),
        }
    }

    fn reject(&mut self, name: &str, err: CalcError) -> Result<i64> {
        tracing::warn!(calculation = name, error = %err, "load aborted");
        self.view.display_error(&err);
        Err(err)
    }

    /// Deletes the loaded calculation from `store` and starts a new one.
    pub fn delete_loaded<S: CalculationStore + ?Sized>(&mut self, store: &S) -> Result<String> {
        let name = self
            .loaded_name
            .clone()
            .ok_or_else(|| CalcError::CalculationNotFound("(unsaved)".into()))?;
        store.delete(&name)?;
        self.new_calculation();
        Ok(name)
    }

    pub fn apply_record(&mut self, name: &str, record: CalculationRecord) -> i64 {
        self.clear_rows();
        self.income = record.income;
        for entry in record.costs {
            self.push_row(entry.into());
        }
        tracing::debug!(calculation = name, rows = self.rows.len(), "calculation applied");
        self.set_loaded_name(Some(name.to_string()));
        self.calculate()
    }

    fn clear_rows(&mut self) {
        self.rows.remove_all();
        self.view.on_rows_cleared();
    }

    fn set_loaded_name(&mut self, name: Option<String>) {
        self.loaded_name = name;
        self.view.display_loaded_name(self.loaded_name.as_deref());
    }
}
