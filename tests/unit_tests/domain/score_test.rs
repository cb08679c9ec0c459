use call_quality::domain::{Score, ScoreOutOfRange};

#[test]
fn given_bounds_when_creating_score_then_both_ends_are_accepted() {
    assert_eq!(Score::new(0).unwrap().value(), 0);
    assert_eq!(Score::new(100).unwrap().value(), Score::MAX);
}

#[test]
fn given_value_outside_bounds_when_creating_score_then_returns_error_with_value() {
    assert_eq!(Score::new(101), Err(ScoreOutOfRange(101)));
    assert_eq!(Score::new(-5), Err(ScoreOutOfRange(-5)));
}

#[test]
fn given_database_integer_when_converting_then_range_is_checked() {
    assert_eq!(Score::try_from(55i32).unwrap().value(), 55);
    assert!(Score::try_from(250i32).is_err());
}

#[test]
fn given_score_when_displayed_then_shows_plain_number() {
    assert_eq!(Score::new(7).unwrap().to_string(), "7");
}
