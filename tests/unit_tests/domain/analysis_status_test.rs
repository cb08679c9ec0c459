use std::str::FromStr;

use call_quality::domain::AnalysisStatus;

#[test]
fn given_each_status_when_round_tripping_through_str_then_value_is_preserved() {
    for status in AnalysisStatus::ALL {
        assert_eq!(AnalysisStatus::from_str(status.as_str()), Ok(status));
        assert_eq!(status.to_string(), status.as_str());
    }
}

#[test]
fn given_unknown_string_when_parsing_then_returns_error() {
    assert!(AnalysisStatus::from_str("queued").is_err());
    assert!(AnalysisStatus::from_str("Done").is_err());
}

#[test]
fn given_happy_path_when_checking_transitions_then_each_step_is_allowed() {
    assert!(AnalysisStatus::Pending.can_transition_to(AnalysisStatus::Transcribing));
    assert!(AnalysisStatus::Transcribing.can_transition_to(AnalysisStatus::Analyzing));
    assert!(AnalysisStatus::Analyzing.can_transition_to(AnalysisStatus::Done));
}

#[test]
fn given_skipped_stage_when_checking_transitions_then_rejected() {
    assert!(!AnalysisStatus::Pending.can_transition_to(AnalysisStatus::Analyzing));
    assert!(!AnalysisStatus::Pending.can_transition_to(AnalysisStatus::Done));
    assert!(!AnalysisStatus::Transcribing.can_transition_to(AnalysisStatus::Done));
}

#[test]
fn given_backward_move_when_checking_transitions_then_rejected() {
    assert!(!AnalysisStatus::Analyzing.can_transition_to(AnalysisStatus::Transcribing));
    assert!(!AnalysisStatus::Transcribing.can_transition_to(AnalysisStatus::Pending));
    assert!(!AnalysisStatus::Done.can_transition_to(AnalysisStatus::Analyzing));
}

#[test]
fn given_non_terminal_status_when_failing_then_error_is_reachable() {
    for status in [
        AnalysisStatus::Pending,
        AnalysisStatus::Transcribing,
        AnalysisStatus::Analyzing,
    ] {
        assert!(!status.is_terminal());
        assert!(status.can_transition_to(AnalysisStatus::Error));
    }
}

#[test]
fn given_terminal_status_when_reanalyzing_then_only_transcribing_is_allowed() {
    for status in [AnalysisStatus::Done, AnalysisStatus::Error] {
        assert!(status.is_terminal());
        for next in AnalysisStatus::ALL {
            assert_eq!(
                status.can_transition_to(next),
                next == AnalysisStatus::Transcribing,
                "{} -> {}",
                status,
                next
            );
        }
    }
}

#[test]
fn given_target_status_when_listing_predecessors_then_matches_transition_table() {
    assert_eq!(
        AnalysisStatus::predecessors(AnalysisStatus::Done),
        vec![AnalysisStatus::Analyzing]
    );
    assert_eq!(
        AnalysisStatus::predecessors(AnalysisStatus::Transcribing),
        vec![AnalysisStatus::Pending, AnalysisStatus::Done, AnalysisStatus::Error]
    );
    assert_eq!(
        AnalysisStatus::predecessors(AnalysisStatus::Pending),
        Vec::<AnalysisStatus>::new()
    );
}
