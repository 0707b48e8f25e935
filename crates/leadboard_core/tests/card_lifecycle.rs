use leadboard_core::db::open_db_in_memory;
use leadboard_core::{
    board_of, open_engine, Board, CardFields, Collection, EngineConfig, LifecycleError,
    ManualClock, MoveOutcome, Priority, ToggleOutcome, Transition, ORDERS_INTAKE_LIST_ID,
};

const T0: i64 = 1_714_521_600_000;

fn no_seed() -> EngineConfig {
    EngineConfig {
        seed_when_empty: false,
        ..EngineConfig::default()
    }
}

fn fields(name: &str) -> CardFields {
    CardFields {
        client_name: name.to_string(),
        client_company: "Acme SRL".to_string(),
        deal_value: 1200.0,
        priority: Priority::High,
        ..CardFields::default()
    }
}

#[test]
fn create_on_orders_list_attaches_fresh_checklist_and_orders_record() {
    let conn = open_db_in_memory().unwrap();
    let clock = ManualClock::new(T0);
    let mut engine = open_engine(&conn, &clock, no_seed()).unwrap();

    let card = engine.create(fields("Giuseppe"), "ord-in-lavorazione").unwrap();

    assert_eq!(card.board(), Board::Orders);
    let checklist = card.checklist().unwrap();
    assert_eq!(checklist.len(), 10);
    assert!(checklist.iter().all(|item| !item.completed));
    assert_eq!(card.created_at(), T0);
    assert_eq!(card.updated_at(), T0);

    let record = engine
        .records()
        .find(Collection::Orders, card.id())
        .unwrap();
    let progress = record.progress.unwrap();
    assert_eq!(progress.completed_steps, 0);
    assert_eq!(progress.total_steps, 10);
    assert_eq!(progress.completion_percent, 0);
    assert!(engine.records().find(Collection::Deals, card.id()).is_none());
}

#[test]
fn create_on_unknown_list_lands_on_goals_without_checklist() {
    let conn = open_db_in_memory().unwrap();
    let mut engine = open_engine(&conn, ManualClock::new(T0), no_seed()).unwrap();

    let card = engine.create(fields("Anna"), "backlog").unwrap();
    assert_eq!(card.board(), Board::Goals);
    assert!(card.checklist().is_none());
    assert!(engine.records().find(Collection::Deals, card.id()).is_some());
}

#[test]
fn edit_replaces_fields_and_preserves_identity() {
    let conn = open_db_in_memory().unwrap();
    let clock = ManualClock::new(T0);
    let mut engine = open_engine(&conn, &clock, no_seed()).unwrap();
    let created = engine.create(fields("Laura"), "ord-in-lavorazione").unwrap();
    engine.toggle_checklist_item(created.id(), 1).unwrap();

    clock.advance(5_000);
    let mut updated_fields = fields("Laura Bianchi");
    updated_fields.deal_value = -10.0;
    updated_fields.client_email = "not an email".to_string();
    let edited = engine.edit(created.id(), updated_fields).unwrap();

    assert_eq!(edited.id(), created.id());
    assert_eq!(edited.list_id(), created.list_id());
    assert_eq!(edited.created_at(), T0);
    assert_eq!(edited.updated_at(), T0 + 5_000);
    assert_eq!(edited.fields.deal_value, -10.0);
    assert!(edited.checklist().unwrap()[0].completed);

    let record = engine.records().find(Collection::Orders, created.id()).unwrap();
    assert_eq!(record.client, "Laura Bianchi");
}

#[test]
fn edit_missing_card_returns_not_found() {
    let conn = open_db_in_memory().unwrap();
    let mut engine = open_engine(&conn, ManualClock::new(T0), no_seed()).unwrap();

    let err = engine.edit("card_missing", fields("x")).unwrap_err();
    assert!(matches!(err, LifecycleError::NotFound(id) if id == "card_missing"));
}

#[test]
fn move_to_same_list_is_a_noop() {
    let conn = open_db_in_memory().unwrap();
    let clock = ManualClock::new(T0);
    let mut engine = open_engine(&conn, &clock, no_seed()).unwrap();
    let card = engine.create(fields("Marco"), "tra-pmi").unwrap();
    let records_before = engine.records().clone();

    clock.advance(1_000);
    let outcome = engine.move_card(card.id(), "tra-pmi").unwrap();

    assert_eq!(outcome, MoveOutcome::Unchanged);
    assert_eq!(engine.get(card.id()).unwrap().updated_at(), T0);
    assert_eq!(engine.records(), &records_before);
}

#[test]
fn move_from_negotiations_to_orders_reports_transition_and_keeps_deals_record() {
    let conn = open_db_in_memory().unwrap();
    let clock = ManualClock::new(T0);
    let mut engine = open_engine(&conn, &clock, no_seed()).unwrap();
    let card = engine.create(fields("Laura"), "tra-napoli").unwrap();

    clock.advance(60_000);
    let outcome = engine.move_card(card.id(), "ord-in-lavorazione").unwrap();

    let MoveOutcome::Moved { card: moved, transition } = outcome else {
        panic!("expected a board transition");
    };
    assert_eq!(
        transition,
        Transition {
            from: Board::Negotiations,
            to: Board::Orders
        }
    );
    assert_eq!(moved.board(), Board::Orders);
    assert_eq!(moved.checklist().unwrap().len(), 10);
    assert_eq!(moved.updated_at(), T0 + 60_000);

    let records = engine.records();
    assert!(records.find(Collection::Deals, card.id()).is_some());
    assert!(records.find(Collection::Orders, card.id()).is_some());
    assert_eq!(records.deals.len(), 1);
    assert_eq!(records.orders.len(), 1);
}

#[test]
fn checklist_survives_round_trip_through_other_boards() {
    let conn = open_db_in_memory().unwrap();
    let mut engine = open_engine(&conn, ManualClock::new(T0), no_seed()).unwrap();
    let card = engine.create(fields("Giuseppe"), "ord-in-lavorazione").unwrap();
    engine.toggle_checklist_item(card.id(), 2).unwrap();
    engine.toggle_checklist_item(card.id(), 5).unwrap();
    let checklist = engine.get(card.id()).unwrap().checklist().unwrap().to_vec();

    engine.move_card(card.id(), "tra-napoli").unwrap();
    let parked = engine.get(card.id()).unwrap();
    assert_eq!(parked.board(), Board::Negotiations);
    assert_eq!(parked.checklist().unwrap(), checklist.as_slice());

    engine.move_card(card.id(), "obj-milano").unwrap();
    engine.move_card(card.id(), "ord-spedizione").unwrap();
    let back = engine.get(card.id()).unwrap();
    assert_eq!(back.board(), Board::Orders);
    assert_eq!(back.checklist().unwrap(), checklist.as_slice());
    assert_eq!(back.checklist_progress().percent(), 20);
}

#[test]
fn move_missing_card_returns_not_found() {
    let conn = open_db_in_memory().unwrap();
    let mut engine = open_engine(&conn, ManualClock::new(T0), no_seed()).unwrap();

    let err = engine.move_card("ghost", "ord-in-lavorazione").unwrap_err();
    assert!(matches!(err, LifecycleError::NotFound(_)));
}

#[test]
fn duplicate_to_orders_leaves_source_untouched() {
    let conn = open_db_in_memory().unwrap();
    let clock = ManualClock::new(T0);
    let mut engine = open_engine(&conn, &clock, no_seed()).unwrap();
    let source = engine.create(fields("Anna"), "obj-grandi-clienti").unwrap();

    clock.advance(10_000);
    let copy = engine.duplicate_to_orders(source.id()).unwrap();

    assert_ne!(copy.id(), source.id());
    assert_eq!(copy.list_id(), ORDERS_INTAKE_LIST_ID);
    assert_eq!(copy.board(), Board::Orders);
    assert_eq!(copy.fields, source.fields);
    assert_eq!(copy.created_at(), T0 + 10_000);
    assert_eq!(copy.updated_at(), T0 + 10_000);
    assert_eq!(copy.checklist().unwrap().len(), 10);

    let after = engine.get(source.id()).unwrap();
    assert_eq!(after, &source);
    assert!(engine.records().find(Collection::Orders, copy.id()).is_some());
    assert!(engine.records().find(Collection::Orders, source.id()).is_none());
}

#[test]
fn duplicate_discards_source_checklist_progress() {
    let conn = open_db_in_memory().unwrap();
    let mut engine = open_engine(&conn, ManualClock::new(T0), no_seed()).unwrap();
    let source = engine.create(fields("Verdi"), "ord-in-lavorazione").unwrap();
    engine.toggle_checklist_item(source.id(), 1).unwrap();

    let copy = engine.duplicate_to_orders(source.id()).unwrap();
    assert!(copy.checklist().unwrap().iter().all(|item| !item.completed));
    assert!(engine.get(source.id()).unwrap().checklist().unwrap()[0].completed);
}

#[test]
fn duplicate_missing_card_returns_not_found() {
    let conn = open_db_in_memory().unwrap();
    let mut engine = open_engine(&conn, ManualClock::new(T0), no_seed()).unwrap();

    let err = engine.duplicate_to_orders("ghost").unwrap_err();
    assert!(matches!(err, LifecycleError::NotFound(_)));
}

#[test]
fn toggle_updates_progress_and_timestamp() {
    let conn = open_db_in_memory().unwrap();
    let clock = ManualClock::new(T0);
    let mut engine = open_engine(&conn, &clock, no_seed()).unwrap();
    let card = engine.create(fields("Verdi"), "ord-in-lavorazione").unwrap();

    for step in 1..=3 {
        clock.advance(1);
        engine.toggle_checklist_item(card.id(), step).unwrap();
    }

    let updated = engine.get(card.id()).unwrap();
    assert_eq!(updated.updated_at(), T0 + 3);
    let progress = engine
        .records()
        .find(Collection::Orders, card.id())
        .unwrap()
        .progress
        .unwrap();
    assert_eq!(progress.completed_steps, 3);
    assert_eq!(progress.completion_percent, 30);

    let outcome = engine.toggle_checklist_item(card.id(), 3).unwrap();
    let ToggleOutcome::Toggled(card) = outcome else {
        panic!("expected toggle");
    };
    assert!(!card.checklist().unwrap()[2].completed);
}

#[test]
fn toggle_unknown_item_or_missing_checklist_writes_nothing() {
    let conn = open_db_in_memory().unwrap();
    let clock = ManualClock::new(T0);
    let mut engine = open_engine(&conn, &clock, no_seed()).unwrap();
    let order = engine.create(fields("Verdi"), "ord-in-lavorazione").unwrap();
    let deal = engine.create(fields("Neri"), "tra-pmi").unwrap();
    let records_before = engine.records().clone();

    clock.advance(1_000);
    assert_eq!(
        engine.toggle_checklist_item(order.id(), 42).unwrap(),
        ToggleOutcome::Ignored
    );
    assert_eq!(
        engine.toggle_checklist_item(deal.id(), 1).unwrap(),
        ToggleOutcome::Ignored
    );

    assert_eq!(engine.get(order.id()).unwrap().updated_at(), T0);
    assert_eq!(engine.get(deal.id()).unwrap().updated_at(), T0);
    assert_eq!(engine.records(), &records_before);
}

#[test]
fn updated_at_never_decreases_when_clock_goes_back() {
    let conn = open_db_in_memory().unwrap();
    let clock = ManualClock::new(T0);
    let mut engine = open_engine(&conn, &clock, no_seed()).unwrap();
    let card = engine.create(fields("Rossi"), "obj-milano").unwrap();

    clock.set(T0 - 50_000);
    let edited = engine.edit(card.id(), fields("Rossi 2")).unwrap();
    assert_eq!(edited.updated_at(), T0);
    assert_eq!(edited.created_at(), T0);
}

#[test]
fn board_always_matches_list_after_every_operation() {
    let conn = open_db_in_memory().unwrap();
    let mut engine = open_engine(&conn, ManualClock::new(T0), EngineConfig::default()).unwrap();
    let card = engine.create(fields("Rossi"), "tra-napoli").unwrap();
    engine.move_card(card.id(), "ord-in-lavorazione").unwrap();
    engine.move_card("sample_3", "obj-milano").unwrap();
    engine.duplicate_to_orders("sample_1").unwrap();
    engine.edit("sample_2", fields("Bianchi")).unwrap();

    for card in engine.cards() {
        assert_eq!(board_of(card.list_id()), card.board(), "card {}", card.id());
    }
}

#[test]
fn delete_is_idempotent() {
    let conn = open_db_in_memory().unwrap();
    let mut engine = open_engine(&conn, ManualClock::new(T0), no_seed()).unwrap();
    let card = engine.create(fields("Rossi"), "obj-milano").unwrap();

    assert!(engine.delete(card.id()).unwrap());
    assert!(!engine.delete(card.id()).unwrap());
    assert!(engine.get(card.id()).is_none());
}
