use scsc_core::model::{EvaluationOutcome, EvaluationResult, Highlight, NewLogRecord};
use scsc_core::storage::Store;
use tempfile::tempdir;

#[test]
fn test_storage_smoke_lifecycle() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let db_path = dir.path().join("nested").join("history.db");

    // 1. Open Store (creates parent dir) and init schema
    let store = Store::open(&db_path)?;
    store.init_schema()?;

    // 2. Insert a row built from a rendered report
    let long_text = "x".repeat(750);
    let report = EvaluationOutcome::Success(EvaluationResult {
        risk: 61.0,
        highlights: vec![Highlight {
            category: "abusive".into(),
            score: 61.0,
        }],
        explanation: "insulting".into(),
        rewrites: vec!["a".into(), "b".into()],
        rule_hits: vec![],
    })
    .render();
    let id = store.insert(&NewLogRecord::from_report(&long_text, &report)?)?;
    assert!(id > 0);

    // 3. Verify via raw SQL
    let conn = rusqlite::Connection::open(&db_path)?;
    let (text, categories, rewrites): (String, String, String) = conn.query_row(
        "SELECT text, categories, rewrites FROM logs WHERE id = ?1",
        [id],
        |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?)),
    )?;
    assert_eq!(text.chars().count(), 500);
    assert_eq!(categories, "abusive");
    assert_eq!(rewrites, "a|b");

    // 4. Read back through a read-only handle
    let ro = Store::open_read_only(&db_path)?;
    let rows = ro.list_recent(50)?;
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].id, id);
    assert_eq!(rows[0].text_sha256, scsc_core::fingerprint::sha256_hex(&long_text));

    Ok(())
}

#[test]
fn test_read_only_store_rejects_writes() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let db_path = dir.path().join("history.db");
    Store::open(&db_path)?.init_schema()?;

    let ro = Store::open_read_only(&db_path)?;
    let report = EvaluationOutcome::Failure {
        reason: "boom".into(),
    }
    .render();
    assert!(ro
        .insert(&NewLogRecord::from_report("text", &report)?)
        .is_err());
    Ok(())
}

#[test]
fn test_failure_rows_are_marked() -> anyhow::Result<()> {
    let store = Store::memory()?;
    store.init_schema()?;

    let report = EvaluationOutcome::Failure {
        reason: "network down".into(),
    }
    .render();
    store.insert(&NewLogRecord::from_report("hi", &report)?)?;

    let rows = store.list_recent(10)?;
    assert!(!rows[0].ok);
    assert_eq!(rows[0].categories, "error");
    assert_eq!(rows[0].rewrites, "");
    assert_eq!(rows[0].risk, 0.0);
    Ok(())
}
