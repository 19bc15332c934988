use daylist_core::{
    counts, daily_progress, sort_by_date, ConfirmationReason, EditMode, EditState, FilterMode,
    MemoryStore, StoreError, TaskBoard, TaskDate, ToggleOutcome,
};

fn open_board() -> TaskBoard<MemoryStore> {
    TaskBoard::open(MemoryStore::new()).unwrap()
}

fn date(value: &str) -> TaskDate {
    TaskDate::parse(value).unwrap()
}

#[test]
fn scenario_earlier_date_sorts_first() {
    let mut board = open_board();
    board.submit_task("Buy milk", "2025-01-10").unwrap();
    board.submit_task("Pay rent", "2025-01-05").unwrap();

    let sorted = sort_by_date(board.store().tasks());
    assert_eq!(sorted[0].text, "Pay rent");
    assert_eq!(sorted[1].text, "Buy milk");

    let view = board.view(date("2025-01-01"));
    let texts = view
        .visible_tasks
        .iter()
        .map(|task| task.text.as_str())
        .collect::<Vec<_>>();
    assert_eq!(texts, vec!["Pay rent", "Buy milk"]);
}

#[test]
fn scenario_completing_todays_task_reaches_full_progress() {
    let today = date("2025-01-10");
    let mut board = open_board();
    let task = board.submit_task("Ship it", "2025-01-10").unwrap();
    assert_eq!(board.view(today).daily_percent, 0);

    let outcome = board
        .request_toggle_complete(task.id, today, |_| panic!("no confirmation expected"))
        .unwrap();
    assert_eq!(outcome, ToggleOutcome::Completed);
    assert_eq!(board.view(today).daily_percent, 100);
    assert_eq!(daily_progress(board.store().tasks(), today), 100);
}

#[test]
fn scenario_deleting_edited_task_returns_to_idle() {
    let mut board = open_board();
    let task = board.submit_task("Task A", "2025-01-10").unwrap();

    board.request_edit(task.id).unwrap();
    assert_eq!(board.session().state(), EditState::Editing(task.id));
    assert_eq!(board.view(date("2025-01-10")).edit_session.prefill.text, "Task A");

    board.request_delete(task.id).unwrap();
    assert_eq!(board.session().state(), EditState::Idle);
    assert!(board.session().pending().text.is_empty());
    assert!(board.session().pending().date.is_empty());
}

#[test]
fn scenario_blank_text_is_rejected_without_mutation() {
    let mut board = open_board();
    let err = board.submit_task("", "2025-01-01").unwrap_err();
    assert!(matches!(err, StoreError::Validation(_)));
    assert!(board.store().tasks().is_empty());
    assert!(board.view(date("2025-01-01")).is_empty);
}

#[test]
fn scenario_declined_overdue_completion_leaves_task_open() {
    let today = date("2025-01-10");
    let mut board = open_board();
    let task = board.submit_task("Yesterday", "2025-01-09").unwrap();

    let mut asked = None;
    let outcome = board
        .request_toggle_complete(task.id, today, |reason| {
            asked = Some(reason);
            false
        })
        .unwrap();

    assert_eq!(asked, Some(ConfirmationReason::Overdue));
    assert_eq!(outcome, ToggleOutcome::Declined(ConfirmationReason::Overdue));
    assert!(!board.store().get(task.id).unwrap().completed);
    assert!(!board.store().load().unwrap()[0].completed);
}

#[test]
fn confirmed_future_completion_applies_and_reopen_skips_prompt() {
    let today = date("2025-01-10");
    let mut board = open_board();
    let task = board.submit_task("Tomorrow", "2025-01-11").unwrap();

    let outcome = board
        .request_toggle_complete(task.id, today, |reason| {
            reason == ConfirmationReason::ScheduledInFuture
        })
        .unwrap();
    assert_eq!(outcome, ToggleOutcome::Completed);

    let outcome = board
        .request_toggle_complete(task.id, today, |_| panic!("reopen must not prompt"))
        .unwrap();
    assert_eq!(outcome, ToggleOutcome::Reopened);
    assert!(!board.store().get(task.id).unwrap().completed);
}

#[test]
fn toggle_missing_task_returns_not_found() {
    let mut board = open_board();
    let err = board
        .request_toggle_complete(99, date("2025-01-01"), |_| true)
        .unwrap_err();
    assert!(matches!(err, StoreError::NotFound(99)));
}

#[test]
fn edit_submit_updates_instead_of_creating() {
    let mut board = open_board();
    let task = board.submit_task("Draft", "2025-01-01").unwrap();

    board.request_edit(task.id).unwrap();
    assert_eq!(board.view(date("2025-01-01")).edit_session.mode, EditMode::Update);

    board.submit_task("Final", "2025-01-02").unwrap();
    let tasks = board.store().tasks();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].id, task.id);
    assert_eq!(tasks[0].text, "Final");
    assert_eq!(board.session().mode(), EditMode::Create);
}

#[test]
fn cancel_edit_clears_prefill() {
    let mut board = open_board();
    let task = board.submit_task("Draft", "2025-01-01").unwrap();

    board.request_edit(task.id).unwrap();
    board.cancel_edit();

    let view = board.view(date("2025-01-01"));
    assert_eq!(view.edit_session.mode, EditMode::Create);
    assert_eq!(view.edit_session.editing_id, None);
    assert!(view.edit_session.prefill.text.is_empty());
}

#[test]
fn request_edit_on_missing_task_keeps_idle() {
    let mut board = open_board();
    let err = board.request_edit(5).unwrap_err();
    assert!(matches!(err, StoreError::NotFound(5)));
    assert_eq!(board.session().state(), EditState::Idle);
}

#[test]
fn delete_all_resets_edit_session_and_empties_view() {
    let mut board = open_board();
    let task = board.submit_task("a", "2025-01-01").unwrap();
    board.submit_task("b", "2025-01-02").unwrap();
    board.request_edit(task.id).unwrap();

    board.request_delete_all().unwrap();

    let view = board.view(date("2025-01-01"));
    assert!(view.is_empty);
    assert!(view.visible_tasks.is_empty());
    assert_eq!(view.stats.total, 0);
    assert_eq!(view.edit_session.mode, EditMode::Create);
}

#[test]
fn delete_of_absent_id_is_a_no_op() {
    let mut board = open_board();
    board.submit_task("a", "2025-01-01").unwrap();
    board.request_delete(12345).unwrap();
    assert_eq!(board.store().tasks().len(), 1);
}

#[test]
fn view_applies_filter_and_search_but_stats_cover_everything() {
    let today = date("2025-01-01");
    let mut board = open_board();
    let milk = board.submit_task("Buy milk", "2025-01-01").unwrap();
    board.submit_task("Buy bread", "2025-01-01").unwrap();
    board.submit_task("Pay rent", "2025-01-02").unwrap();
    board.request_toggle_complete(milk.id, today, |_| true).unwrap();

    board.set_filter_mode(FilterMode::Active);
    board.set_search_text("buy");
    let view = board.view(today);

    assert_eq!(view.visible_tasks.len(), 1);
    assert_eq!(view.visible_tasks[0].text, "Buy bread");
    assert_eq!(view.stats, counts(board.store().tasks()));
    assert_eq!(view.stats.total, 3);
    assert_eq!(view.stats.completed, 1);
    assert_eq!(view.stats.pending, 2);
    assert_eq!(view.daily_percent, 50);
    assert_eq!(view.filter_mode, FilterMode::Active);
    assert_eq!(view.search_text, "buy");

    board.set_filter_mode(FilterMode::Completed);
    board.set_search_text("");
    let view = board.view(today);
    assert_eq!(view.visible_tasks.len(), 1);
    assert_eq!(view.visible_tasks[0].id, milk.id);
}

#[test]
fn reopened_board_sees_persisted_tasks() {
    let mut board = open_board();
    board.submit_task("persist me", "2025-01-01").unwrap();
    let storage = board.store().storage().clone();

    let reopened = TaskBoard::open(storage).unwrap();
    assert_eq!(reopened.store().tasks().len(), 1);
    assert_eq!(reopened.store().tasks()[0].text, "persist me");
}
