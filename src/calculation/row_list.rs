use crate::errors::{CalcError, Result};

use super::row::{FixedCostRow, RowHandle};

/// Ordered collection of fixed-cost rows backing the calculation form.
///
/// The list order is the top-to-bottom order the user sees. Removing a row
/// never reorders the survivors.
#[derive(Debug, Clone, Default)]
pub struct RowList {
    entries: Vec<(RowHandle, FixedCostRow)>,
    next_handle: u64,
}

impl PartialEq for RowList {
    fn eq(&self, other: &Self) -> bool {
        self.rows().eq(other.rows())
    }
}

impl Eq for RowList {}

impl RowList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an empty row at the end of the list.
    pub fn add_row(&mut self) -> RowHandle {
        self.push(FixedCostRow::default())
    }

    /// Appends a row pre-filled with the given description and cost.
    pub fn add_row_with(
        &mut self,
        description: impl Into<String>,
        cost: impl Into<String>,
    ) -> RowHandle {
        self.push(FixedCostRow::new(description, cost))
    }

    fn push(&mut self, row: FixedCostRow) -> RowHandle {
        let handle = RowHandle::new(self.next_handle);
        self.next_handle += 1;
        self.entries.push((handle, row));
        handle
    }

    /// Removes exactly the row identified by `handle`.
    pub fn remove_row(&mut self, handle: RowHandle) -> Result<FixedCostRow> {
        let index = self
            .position(handle)
            .ok_or(CalcError::RowNotFound(handle))?;
        let (_, row) = self.entries.remove(index);
        Ok(row)
    }

    /// Drops every row. Handles issued earlier stay invalid afterwards.
    pub fn remove_all(&mut self) {
        self.entries.clear();
    }

    pub fn rows(&self) -> impl Iterator<Item = &FixedCostRow> + '_ {
        self.entries.iter().map(|(_, row)| row)
    }

    pub fn entries(&self) -> &[(RowHandle, FixedCostRow)] {
        &self.entries
    }

    pub fn handles(&self) -> Vec<RowHandle> {
        self.entries.iter().map(|(handle, _)| *handle).collect()
    }

    pub fn get(&self, handle: RowHandle) -> Option<&FixedCostRow> {
        self.entries
            .iter()
            .find(|(candidate, _)| *candidate == handle)
            .map(|(_, row)| row)
    }

    pub fn get_mut(&mut self, handle: RowHandle) -> Option<&mut FixedCostRow> {
        self.entries
            .iter_mut()
            .find(|(candidate, _)| *candidate == handle)
            .map(|(_, row)| row)
    }

    pub fn position(&self, handle: RowHandle) -> Option<usize> {
        self.entries
            .iter()
            .position(|(candidate, _)| *candidate == handle)
    }

    /// Handle of the row currently shown at `index` (0-based).
    pub fn handle_at(&self, index: usize) -> Option<RowHandle> {
        self.entries.get(index).map(|(handle, _)| *handle)
    }

    pub fn last_handle(&self) -> Option<RowHandle> {
        self.entries.last().map(|(handle, _)| *handle)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptions(list: &RowList) -> Vec<&str> {
        list.rows().map(|row| row.description.as_str()).collect()
    }

    #[test]
    fn removing_middle_row_keeps_survivor_order() {
        let mut list = RowList::new();
        let _r1 = list.add_row_with("R1", "1");
        let r2 = list.add_row_with("R2", "2");
        let _r3 = list.add_row_with("R3", "3");

        list.remove_row(r2).expect("remove r2");
        assert_eq!(descriptions(&list), vec!["R1", "R3"]);

        list.add_row_with("R4", "4");
        assert_eq!(descriptions(&list), vec!["R1", "R3", "R4"]);
    }

    #[test]
    fn removing_unknown_handle_reports_row_not_found() {
        let mut list = RowList::new();
        let handle = list.add_row();
        list.remove_row(handle).expect("first removal");

        let err = list.remove_row(handle).unwrap_err();
        assert!(matches!(err, CalcError::RowNotFound(h) if h == handle));
    }

    #[test]
    fn remove_all_matches_fresh_list() {
        let mut list = RowList::new();
        list.add_row_with("rent", "300");
        list.add_row();
        list.remove_all();

        assert!(list.is_empty());
        assert_eq!(list, RowList::new());
    }

    #[test]
    fn remove_all_on_empty_list_is_noop() {
        let mut list = RowList::new();
        list.remove_all();
        assert!(list.is_empty());
        assert_eq!(list, RowList::new());
    }

    #[test]
    fn handles_are_not_reused_after_clear() {
        let mut list = RowList::new();
        let stale = list.add_row_with("old", "1");
        list.remove_all();
        let fresh = list.add_row_with("new", "2");

        assert_ne!(stale, fresh);
        assert!(list.get(stale).is_none());
        assert!(list.remove_row(stale).is_err());
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn get_mut_edits_row_in_place() {
        let mut list = RowList::new();
        let first = list.add_row();
        list.add_row_with("gym", "40");

        let row = list.get_mut(first).expect("row exists");
        row.description = "rent".into();
        row.cost = "300".into();

        assert_eq!(descriptions(&list), vec!["rent", "gym"]);
        assert_eq!(list.position(first), Some(0));
    }

    #[test]
    fn duplicate_descriptions_are_kept() {
        let mut list = RowList::new();
        list.add_row_with("loan", "100");
        list.add_row_with("loan", "100");
        assert_eq!(list.len(), 2);
    }
}
