//! Stolen-card and suspicious-address administration.

use antifraud_core::{engine::RiskEngine, error::FraudResult};

#[test]
fn stolen_cards_add_list_remove() -> FraudResult<()> {
    let engine = RiskEngine::build_test()?;

    let a = engine.add_stolen_card("4000008449433403")?;
    let b = engine.add_stolen_card("4532015112830366")?;
    assert!(a.id < b.id);

    let listed: Vec<String> = engine.list_stolen_cards()?.into_iter().map(|e| e.value).collect();
    assert_eq!(listed, vec!["4000008449433403", "4532015112830366"]);

    engine.remove_stolen_card("4000008449433403")?;
    assert_eq!(engine.list_stolen_cards()?, vec![b]);
    Ok(())
}

#[test]
fn stolen_card_errors() -> FraudResult<()> {
    let engine = RiskEngine::build_test()?;
    engine.add_stolen_card("4000008449433403")?;

    assert_eq!(engine.add_stolen_card("4000008449433403").unwrap_err().kind(), "conflict");
    assert_eq!(engine.add_stolen_card("4000008449433404").unwrap_err().kind(), "malformed_input");
    assert_eq!(engine.remove_stolen_card("4532015112830366").unwrap_err().kind(), "not_found");
    assert_eq!(engine.remove_stolen_card("abc").unwrap_err().kind(), "malformed_input");
    assert_eq!(engine.list_stolen_cards()?.len(), 1);
    Ok(())
}

#[test]
fn suspicious_ips_add_list_remove() -> FraudResult<()> {
    let engine = RiskEngine::build_test()?;

    engine.add_suspicious_ip("192.168.1.1")?;
    engine.add_suspicious_ip("10.0.0.1")?;
    assert_eq!(engine.add_suspicious_ip("10.0.0.1").unwrap_err().kind(), "conflict");
    assert_eq!(engine.add_suspicious_ip("1.2.3").unwrap_err().kind(), "malformed_input");

    engine.remove_suspicious_ip("192.168.1.1")?;
    assert_eq!(engine.remove_suspicious_ip("192.168.1.1").unwrap_err().kind(), "not_found");
    assert_eq!(engine.remove_suspicious_ip("256.1.1.1").unwrap_err().kind(), "malformed_input");

    let listed: Vec<String> = engine.list_suspicious_ips()?.into_iter().map(|e| e.value).collect();
    assert_eq!(listed, vec!["10.0.0.1"]);
    Ok(())
}

#[test]
fn membership_is_exact_match() -> FraudResult<()> {
    let engine = RiskEngine::build_test()?;
    engine.add_suspicious_ip("10.0.0.1")?;

    use antifraud_core::store::Blocklist;
    assert!(engine.store.blocklist_contains(Blocklist::SuspiciousIp, "10.0.0.1")?);
    assert!(!engine.store.blocklist_contains(Blocklist::SuspiciousIp, "10.0.0.10")?);
    assert!(!engine.store.blocklist_contains(Blocklist::SuspiciousIp, "10.0.0")?);
    assert!(!engine.store.blocklist_contains(Blocklist::StolenCard, "10.0.0.1")?);
    Ok(())
}
