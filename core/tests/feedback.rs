//! Reviewer feedback: precondition order, exactly-once, and no mutation on
//! rejection.

use antifraud_core::{
    engine::RiskEngine,
    error::{FraudError, FraudResult},
    transaction::TransactionRequest,
    verdict::{Region, Verdict},
};
use chrono::NaiveDate;

const CARD: &str = "4000008449433403";

fn submit(engine: &RiskEngine, amount: i64) -> FraudResult<i64> {
    engine.evaluate(&TransactionRequest {
        amount,
        ip:     "192.168.1.1".into(),
        number: CARD.into(),
        region: Region::Eca,
        date:   NaiveDate::from_ymd_opt(2022, 1, 22)
            .unwrap()
            .and_hms_opt(16, 4, 0)
            .unwrap(),
    })?;
    let history = engine.history_for(CARD)?;
    Ok(history.last().map(|r| r.transaction_id).unwrap_or_default())
}

#[test]
fn feedback_returns_updated_snapshot() -> FraudResult<()> {
    let engine = RiskEngine::build_test()?;
    let id = submit(&engine, 1000)?;

    let snapshot = engine.record_feedback(id, Verdict::Allowed)?;
    assert_eq!(snapshot.transaction_id, id);
    assert_eq!(snapshot.result, Verdict::ManualProcessing);
    assert_eq!(snapshot.feedback, Some(Verdict::Allowed));

    let stored = engine.store.get_transaction(id)?.expect("record exists");
    assert_eq!(stored, snapshot);
    Ok(())
}

#[test]
fn unknown_transaction_is_not_found() -> FraudResult<()> {
    let engine = RiskEngine::build_test()?;
    let err = engine.record_feedback(42, Verdict::Allowed).unwrap_err();
    assert!(matches!(err, FraudError::NotFound { .. }), "{err}");
    Ok(())
}

#[test]
fn correction_equal_to_result_is_unprocessable() -> FraudResult<()> {
    let engine = RiskEngine::build_test()?;
    let id = submit(&engine, 100)?;

    let err = engine.record_feedback(id, Verdict::Allowed).unwrap_err();
    assert!(matches!(err, FraudError::Unprocessable { .. }), "{err}");
    assert_eq!(engine.store.get_transaction(id)?.unwrap().feedback, None);
    Ok(())
}

#[test]
fn second_feedback_always_conflicts() -> FraudResult<()> {
    let engine = RiskEngine::build_test()?;
    let id = submit(&engine, 1000)?;
    engine.record_feedback(id, Verdict::Prohibited)?;

    for target in [Verdict::Allowed, Verdict::Prohibited] {
        let err = engine.record_feedback(id, target).unwrap_err();
        assert_eq!(err.kind(), "conflict", "{target}: {err}");
    }
    // Restating the original result is still reported as unprocessable.
    let err = engine.record_feedback(id, Verdict::ManualProcessing).unwrap_err();
    assert_eq!(err.kind(), "unprocessable");

    assert_eq!(
        engine.store.get_transaction(id)?.unwrap().feedback,
        Some(Verdict::Prohibited)
    );
    Ok(())
}

#[test]
fn concurrent_feedback_records_exactly_once() -> FraudResult<()> {
    let engine = RiskEngine::build_test()?;
    let id = submit(&engine, 1000)?;

    let results: Vec<_> = std::thread::scope(|s| {
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let engine = &engine;
                let target = if i % 2 == 0 { Verdict::Allowed } else { Verdict::Prohibited };
                s.spawn(move || engine.record_feedback(id, target))
            })
            .collect();
        handles.into_iter().map(|h| h.join().expect("thread")).collect()
    });

    let successes = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(successes, 1);
    assert!(results
        .iter()
        .filter_map(|r| r.as_ref().err())
        .all(|e| e.kind() == "conflict"));
    Ok(())
}
