//! Journey: topic-scoped versus whole-page attribution

use revisa_core::{
    EntryType, EventScope, PageRecord, ParsedEvent, RevisionEngine, SchedulePolicy,
};
use revisa_e2e_tests::mocks::fixtures::TestDataFactory as F;

fn strip_ids(mut page: PageRecord) -> PageRecord {
    for log in &mut page.logs {
        log.id.clear();
    }
    page
}

#[test]
fn test_topic_event_after_page_study_classified_per_topic() {
    let engine = RevisionEngine::default();
    let batch = [
        ParsedEvent::new("P1").at(F::at(0)),
        ParsedEvent::new("P1").with_topics(["Anatomy"]).at(F::at(6)),
    ];
    let outcome = engine.ingest(&batch, &[F::cardiology_page()], F::at(0)).unwrap();

    let second = &outcome.results[1];
    assert_eq!(second.entry_type, EntryType::Study);
    assert_eq!(second.revision_index, 0);
    assert_eq!(second.scope, EventScope::Topics(vec!["anatomy".to_string()]));

    let p1 = &outcome.pages[0];
    assert_eq!(p1.revision_count, 0);
    assert_eq!(p1.next_revision_at, Some(F::at(24)));
    assert_eq!(p1.topic("Anatomy").unwrap().next_revision_at, Some(F::at(30)));
}

#[test]
fn test_topic_revision_does_not_touch_other_scopes() {
    let engine = RevisionEngine::default();
    let setup = [
        ParsedEvent::new("P1").at(F::at(0)),
        ParsedEvent::new("P1").with_topics(["Anatomy"]).at(F::at(1)),
        ParsedEvent::new("P1").with_topics(["Physiology"]).at(F::at(2)),
    ];
    let before = engine.ingest(&setup, &[F::cardiology_page()], F::at(0)).unwrap();

    let after = engine
        .ingest(
            &[ParsedEvent::new("P1").with_topics(["anatomy"]).at(F::at(50))],
            &before.pages,
            F::at(0),
        )
        .unwrap();

    assert_eq!(after.results[0].entry_type, EntryType::Revision);

    let (b, a) = (&before.pages[0], &after.pages[0]);
    assert_eq!(a.revision_count, b.revision_count);
    assert_eq!(a.next_revision_at, b.next_revision_at);
    assert_eq!(a.first_studied_at, b.first_studied_at);
    assert_eq!(a.last_studied_at, Some(F::at(50)));
    assert_eq!(a.topic("physiology"), b.topic("physiology"));

    let anatomy = a.topic("anatomy").unwrap();
    assert_eq!(anatomy.revision_count, 1);
    assert_eq!(anatomy.last_studied_at, Some(F::at(50)));
}

#[test]
fn test_earlier_topic_event_moves_page_first_studied() {
    let engine = RevisionEngine::default();
    let base = engine
        .ingest(&[ParsedEvent::new("P1").at(F::at(10))], &[F::cardiology_page()], F::at(0))
        .unwrap();
    let out = engine
        .ingest(
            &[ParsedEvent::new("P1").with_topics(["Physiology"]).at(F::at(3))],
            &base.pages,
            F::at(0),
        )
        .unwrap();

    let p1 = &out.pages[0];
    assert_eq!(p1.first_studied_at, Some(F::at(3)));
    assert_eq!(p1.last_studied_at, Some(F::at(10)));
    assert_eq!(p1.next_revision_at, base.pages[0].next_revision_at);
}

#[test]
fn test_all_topics_is_equivalent_to_no_topics() {
    let engine = RevisionEngine::default();
    let history = [
        ParsedEvent::new("P1").at(F::at(0)),
        ParsedEvent::new("P1").with_topics(["Anatomy"]).at(F::at(5)),
    ];
    let base = engine.ingest(&history, &[F::cardiology_page()], F::at(0)).unwrap();

    let named = engine
        .ingest(
            &[ParsedEvent::new("P1").with_topics([" physiology", "ANATOMY "]).at(F::at(30))],
            &base.pages,
            F::at(0),
        )
        .unwrap();
    let bare = engine
        .ingest(&[ParsedEvent::new("P1").at(F::at(30))], &base.pages, F::at(0))
        .unwrap();

    assert_eq!(named.results[0].scope, EventScope::WholePage);
    assert_eq!(named.results[0].entry_type, bare.results[0].entry_type);
    assert_eq!(named.results[0].revision_index, bare.results[0].revision_index);
    assert_eq!(
        strip_ids(named.pages[0].clone()),
        strip_ids(bare.pages[0].clone())
    );
}

#[test]
fn test_new_topic_makes_subset_of_grown_topic_set() {
    let engine = RevisionEngine::default();
    let out = engine
        .ingest(
            &[ParsedEvent::new("P1").with_topics(["Anatomy", "Histology"]).at(F::at(0))],
            &[F::cardiology_page()],
            F::at(0),
        )
        .unwrap();

    let p1 = &out.pages[0];
    assert_eq!(p1.topics.len(), 3);
    assert_eq!(
        out.results[0].scope,
        EventScope::Topics(vec!["anatomy".to_string(), "histology".to_string()])
    );
    assert!(p1.topic("histology").unwrap().next_revision_at.is_some());
    assert_eq!(p1.topic("physiology").unwrap().next_revision_at, None);
    assert_eq!(p1.next_revision_at, None);
}

#[test]
fn test_topic_rename_keeps_history() {
    let engine = RevisionEngine::new(SchedulePolicy::default());
    let out = engine
        .ingest(
            &[ParsedEvent::new("P1").with_topics(["Anatomy"]).at(F::at(0))],
            &[F::cardiology_page()],
            F::at(0),
        )
        .unwrap();

    let renamed = engine
        .rename_topic(&out.pages[0], "anatomy", "Cardiac Anatomy")
        .unwrap();
    let topic = renamed.topic("cardiac anatomy").unwrap();
    assert_eq!(topic.last_studied_at, Some(F::at(0)));

    let next = engine
        .ingest(
            &[ParsedEvent::new("P1").with_topics(["Cardiac Anatomy"]).at(F::at(30))],
            &[renamed],
            F::at(0),
        )
        .unwrap();
    assert_eq!(next.results[0].entry_type, EntryType::Revision);
    assert_eq!(next.pages[0].topics.len(), 2);
}
