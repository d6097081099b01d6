use ronitech_site::config::GateConfig;
use ronitech_site::service::access_gate::{AccessGate, GateOutcome, GateState};
use std::time::{Duration, Instant};

fn create_test_gate() -> AccessGate {
    AccessGate::new(&GateConfig::from_test_env())
}

#[test]
fn test_three_wrong_codes_deny() {
    let mut gate = create_test_gate();
    let now = Instant::now();

    match gate.submit("A", now) {
        GateOutcome::Rejected { attempt, remaining, message, .. } => {
            assert_eq!(attempt, 1);
            assert_eq!(remaining, 2);
            assert_eq!(message, "Invalid code. Attempt 1/3");
        }
        other => panic!("unexpected outcome: {:?}", other),
    }
    assert_eq!(gate.state(now), GateState::Locked { attempts: 1 });

    match gate.submit("B", now) {
        GateOutcome::Rejected { message, .. } => assert_eq!(message, "Invalid code. Attempt 2/3"),
        other => panic!("unexpected outcome: {:?}", other),
    }

    assert_eq!(
        gate.submit("C", now),
        GateOutcome::Denied { message: "Too many failed attempts. Access denied.".to_string() }
    );
    assert!(matches!(gate.state(now), GateState::Denied { .. }));
    assert!(!gate.is_unlocked());
}

#[test]
fn test_correct_code_after_two_misses_unlocks() {
    let mut gate = create_test_gate();
    let now = Instant::now();
    gate.submit("WRONG1", now);
    gate.submit("WRONG2", now);

    assert_eq!(gate.submit("RONITECH2025", now), GateOutcome::Unlocked);
    assert_eq!(gate.state(now), GateState::Unlocked);

    // Leaving the console re-locks with a fresh counter
    gate.close();
    assert_eq!(gate.state(now), GateState::Locked { attempts: 0 });
}

#[test]
fn test_code_is_upper_cased() {
    let mut gate = create_test_gate();
    assert_eq!(gate.submit("ronitech2025", Instant::now()), GateOutcome::Unlocked);
}

#[test]
fn test_empty_code_is_not_an_attempt() {
    let mut gate = create_test_gate();
    let now = Instant::now();
    assert_eq!(gate.submit("", now), GateOutcome::EmptyCode);
    assert_eq!(gate.state(now), GateState::Locked { attempts: 0 });
}

#[test]
fn test_denied_refuses_then_resets_after_lockout() {
    let mut gate = create_test_gate();
    let start = Instant::now();
    for code in ["A", "B", "C"] {
        gate.submit(code, start);
    }

    let during = start + Duration::from_millis(500);
    match gate.submit("RONITECH2025", during) {
        GateOutcome::Refused { retry_in_ms } => assert_eq!(retry_in_ms, 1500),
        other => panic!("unexpected outcome: {:?}", other),
    }
    assert!(matches!(gate.state(during), GateState::Denied { .. }));

    let after = start + Duration::from_secs(2);
    assert!(gate.refresh(after));
    assert_eq!(gate.state(after), GateState::Locked { attempts: 0 });
    assert_eq!(gate.submit("RONITECH2025", after), GateOutcome::Unlocked);
}

#[test]
fn test_close_resets_attempts() {
    let mut gate = create_test_gate();
    let now = Instant::now();
    gate.submit("A", now);
    gate.submit("B", now);
    gate.close();

    match gate.submit("C", now) {
        GateOutcome::Rejected { attempt, .. } => assert_eq!(attempt, 1),
        other => panic!("unexpected outcome: {:?}", other),
    }
}

#[test]
fn test_view_reports_state() {
    let mut gate = create_test_gate();
    let now = Instant::now();
    gate.submit("A", now);
    let view = gate.view(now);
    assert_eq!(view.state, "locked");
    assert_eq!(view.attempts, 1);
    assert_eq!(view.max_attempts, 3);
    assert_eq!(view.retry_in_ms, None);

    gate.submit("B", now);
    gate.submit("C", now);
    let view = gate.view(now + Duration::from_millis(250));
    assert_eq!(view.state, "denied");
    assert_eq!(view.retry_in_ms, Some(1750));
}
