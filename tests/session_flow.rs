mod common;

use savings_calc::{
    calculation::{FixedCostRow, RowHandle},
    errors::CalcError,
    session::{CalculationSession, CalculationView},
    storage::CalculationStore,
};

#[derive(Default)]
struct ScreenView {
    visible_rows: Vec<RowHandle>,
    result: Option<i64>,
    errors: usize,
    title: String,
}

impl CalculationView for ScreenView {
    fn on_row_added(&mut self, handle: RowHandle, _row: &FixedCostRow) {
        self.visible_rows.push(handle);
    }

    fn on_row_removed(&mut self, handle: RowHandle) {
        self.visible_rows.retain(|candidate| *candidate != handle);
    }

    fn on_rows_cleared(&mut self) {
        self.visible_rows.clear();
    }

    fn on_result_stale(&mut self) {
        self.result = None;
    }

    fn display_result(&mut self, value: i64) {
        self.result = Some(value);
    }

    fn display_error(&mut self, _error: &CalcError) {
        self.errors += 1;
    }

    fn display_loaded_name(&mut self, name: Option<&str>) {
        self.title = name.unwrap_or("new, unsaved").to_string();
    }
}

fn assert_view_matches_rows(session: &CalculationSession<ScreenView>) {
    assert_eq!(session.view().visible_rows, session.rows().handles());
}

#[test]
fn view_tracks_row_list_through_edits() {
    let mut session = CalculationSession::with_view(ScreenView::default());
    assert_eq!(session.view().title, "new, unsaved");
    assert_view_matches_rows(&session);

    let rent = session.rows().handle_at(0).unwrap();
    session.edit_row(rent, "rent", "300").unwrap();
    let gym = session.add_row_with("gym", "");
    session.add_row_with("phone", "25");
    session.set_income("1000");
    assert_eq!(session.calculate(), 675);

    session.remove_row(gym).unwrap();
    assert_eq!(session.view().result, None);
    assert_view_matches_rows(&session);
    assert_eq!(session.calculate(), 675);
}

#[test]
fn save_load_and_delete_cycle() {
    let (store, _) = common::setup_test_env();
    let mut session = CalculationSession::with_view(ScreenView::default());
    session.set_income("2000");
    let first = session.rows().handle_at(0).unwrap();
    session.edit_row(first, "rent", "800").unwrap();
    session.add_row_with("food", "400");
    session.save(&store, "April").unwrap();
    assert_eq!(session.view().title, "April");

    let mut reopened = CalculationSession::with_view(ScreenView::default());
    assert_eq!(reopened.load(&store, "April").unwrap(), 800);
    assert_eq!(reopened.to_record(), session.to_record());
    assert_eq!(reopened.view().result, Some(800));
    assert_view_matches_rows(&reopened);

    let deleted = reopened.delete_loaded(&store).unwrap();
    assert_eq!(deleted, "April");
    assert!(!store.exists("April"));
    assert_eq!(reopened.loaded_name(), None);
    assert_eq!(reopened.rows().len(), 1);
    assert_eq!(reopened.view().title, "new, unsaved");
}

#[test]
fn failed_load_keeps_previous_state() {
    let (store, _) = common::setup_test_env();
    std::fs::write(store.path_for("broken").unwrap(), "{not json").unwrap();

    let mut session = CalculationSession::with_view(ScreenView::default());
    session.set_income("500");
    session.add_row_with("bus", "50");
    session.save(&store, "good").unwrap();
    let before = session.to_record();

    let err = session.load(&store, "broken").unwrap_err();
    assert!(err.is_malformed());
    assert_eq!(session.to_record(), before);
    assert_eq!(session.loaded_name(), Some("good"));
    assert_eq!(session.view().errors, 1);
    assert_view_matches_rows(&session);

    assert!(matches!(
        session.load(&store, "missing"),
        Err(CalcError::CalculationNotFound(_))
    ));
    assert_eq!(session.view().errors, 2);
}

#[test]
fn deleting_unsaved_calculation_is_refused() {
    let (store, _) = common::setup_test_env();
    let mut session = CalculationSession::new();
    assert!(session.delete_loaded(&store).is_err());
}
