//! Journey: a study week from first exposure to undo
//!
//! Ingest, inspect the schedule, query the due queue, then undo.

use chrono::Duration;
use revisa_core::{
    EntryType, EventScope, ParsedEvent, PageRecord, RevisionEngine, SchedulePolicy, ScheduleMode,
};
use revisa_e2e_tests::mocks::fixtures::TestDataFactory as F;

fn engine() -> RevisionEngine {
    RevisionEngine::new(SchedulePolicy::from_mode(ScheduleMode::Balanced, 6))
}

fn page<'a>(pages: &'a [PageRecord], id: &str) -> &'a PageRecord {
    pages.iter().find(|p| p.id == id).expect("page exists")
}

#[test]
fn test_first_study_schedules_first_step_and_leaves_topics_alone() {
    let engine = engine();
    let outcome = engine
        .ingest(&[ParsedEvent::new("P1").at(F::at(0))], &[F::cardiology_page()], F::at(0))
        .unwrap();

    assert_eq!(outcome.results[0].entry_type, EntryType::Study);
    assert_eq!(outcome.results[0].revision_index, 0);

    let p1 = &outcome.pages[0];
    assert_eq!(p1.next_revision_at, Some(F::at(24)));
    for topic in &p1.topics {
        assert_eq!(topic.revision_count, 0);
        assert_eq!(topic.last_studied_at, None);
        assert_eq!(topic.next_revision_at, None);
    }
}

#[test]
fn test_study_week() {
    let engine = engine();
    let outcome = engine.ingest(&F::study_week(), &[], F::at(0)).unwrap();

    let types: Vec<EntryType> = outcome.results.iter().map(|r| r.entry_type).collect();
    assert_eq!(
        types,
        vec![
            EntryType::Study,
            EntryType::Study,
            EntryType::Study,
            EntryType::Study,
            EntryType::Study,
            EntryType::Revision,
            EntryType::Revision,
            // the first neuro event was whole-page, so the topic itself is fresh
            EntryType::Study,
            EntryType::Revision,
        ]
    );
    assert_eq!(outcome.pages.len(), 3);

    let cardio = page(&outcome.pages, "cardio");
    assert_eq!(cardio.revision_count, 1);
    assert_eq!(cardio.first_studied_at, Some(F::at(0)));
    assert_eq!(cardio.last_studied_at, Some(F::at(72)));
    assert_eq!(cardio.next_revision_at, Some(F::at(72 + 168)));
    assert_eq!(cardio.topic("anatomy").unwrap().next_revision_at, Some(F::at(48)));
    assert_eq!(cardio.topic("physiology").unwrap().last_studied_at, None);

    let renal = page(&outcome.pages, "renal");
    assert_eq!(renal.revision_count, 2);
    assert_eq!(renal.logs.last().unwrap().revision_index, 2);
    assert_eq!(renal.next_revision_at, Some(F::at(150 + 336)));

    let neuro = page(&outcome.pages, "neuro");
    assert_eq!(neuro.topics.len(), 2);
    assert_eq!(neuro.next_revision_at, Some(F::at(26 + 24)));
    assert_eq!(
        neuro.topic("Cranial Nerves").unwrap().next_revision_at,
        Some(F::at(96 + 24))
    );
    assert_eq!(neuro.topic("Spinal Cord").unwrap().next_revision_at, Some(F::at(54)));
    assert_eq!(
        outcome.results[4].scope,
        EventScope::Topics(vec!["spinal cord".to_string()])
    );
}

#[test]
fn test_due_queue_after_study_week() {
    let engine = engine();
    let outcome = engine.ingest(&F::study_week(), &[], F::at(0)).unwrap();

    let due = engine.due(&outcome.pages, F::at(100));
    let labels: Vec<(String, Option<String>)> = due
        .iter()
        .map(|d| (d.page_id.clone(), d.topic.clone()))
        .collect();

    assert_eq!(
        labels,
        vec![
            ("cardio".to_string(), Some("Anatomy".to_string())),
            ("neuro".to_string(), None),
            ("neuro".to_string(), Some("Spinal Cord".to_string())),
        ]
    );
}

#[test]
fn test_undo_sole_log_round_trips_to_zero_state() {
    let engine = engine();
    let outcome = engine
        .ingest(&[ParsedEvent::new("P1").at(F::at(0))], &[F::cardiology_page()], F::at(0))
        .unwrap();
    let log_id = outcome.pages[0].logs[0].id.clone();

    let (pages, _) = engine.undo(&outcome.pages, "P1", &log_id).unwrap();
    assert_eq!(pages[0], F::cardiology_page());
}

#[test]
fn test_undo_latest_revision_restores_previous_schedule() {
    let engine = engine();
    let batch = F::daily_revisions("P1", 3);
    let two = engine.ingest(&batch[..2], &[], F::at(0)).unwrap();
    let three = engine.ingest(&batch[2..], &two.pages, F::at(0)).unwrap();

    let last_id = three.pages[0].logs.last().unwrap().id.clone();
    let (pages, removed) = engine.undo(&three.pages, "P1", &last_id).unwrap();

    assert_eq!(removed.revision_index, 2);
    assert_eq!(pages[0], two.pages[0]);
}

#[test]
fn test_target_count_three_masters_after_third_revision() {
    let engine = RevisionEngine::new(SchedulePolicy::from_mode(ScheduleMode::Balanced, 3));
    let outcome = engine
        .ingest(&F::daily_revisions("P1", 4), &[], F::at(0))
        .unwrap();

    let p1 = &outcome.pages[0];
    assert_eq!(p1.revision_count, 3);
    assert_eq!(p1.next_revision_at, None);
    assert!(p1.last_studied_at.is_some());
    assert_eq!(p1.last_studied_at.unwrap() - F::at(0), Duration::hours(72));
}
