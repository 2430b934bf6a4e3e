use std::fs;

use dialectic_core::{
    extract_arguments, validate_citations, Message, ScenarioBank, ScenarioFilter, Side,
    Transcript,
};

#[test]
fn test_load_scenario_directory() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("a.json"),
        r#"{"id": 1, "level": "easy", "situation": "s1", "question": "q1",
            "answer_options": ["proved", "disproved"], "label": "proved"}"#,
    )
    .unwrap();
    fs::write(
        dir.path().join("b.json"),
        r#"[
            {"id": "2", "level": "hard", "situation": "s2", "question": "q2",
             "answer_options": ["proved", "disproved", "unknown"], "label": "unknown"},
            {"id": "3", "level": "hard", "situation": "s3", "question": "q3",
             "answer_options": ["proved", "disproved"], "label": "disproved"}
        ]"#,
    )
    .unwrap();
    fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

    let bank = ScenarioBank::load_dir(dir.path()).unwrap();
    assert_eq!(bank.len(), 3);
    assert_eq!(bank.get("1").unwrap().level, "easy");
    assert_eq!(bank.get("2").unwrap().opposing_answer(), "proved");

    let hard = bank.filter(&ScenarioFilter::new(Some("hard"), None));
    assert_eq!(hard.filtered_count, 2);
}

#[test]
fn test_malformed_scenario_file_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("bad.json"), "{ not json").unwrap();

    let err = ScenarioBank::load_dir(dir.path()).unwrap_err();
    assert!(err.to_string().contains("bad.json"));
}

#[test]
fn test_validated_argument_feeds_history() {
    let situation = "Rule 1: if it rains, the ground is wet. It rains.";
    let raw = "<thinking>Rule 1 settles it</thinking>\n\
               <argument>Per <quote>if it rains, the ground is wet</quote> and \
               <quote>it snows</quote>.</argument>";

    let checked = validate_citations(raw, situation);
    assert_eq!(
        extract_arguments(&checked),
        "Per <v_quote>if it rains, the ground is wet</v_quote> and <u_quote>it snows</u_quote>."
    );

    let mut transcript = Transcript::new();
    transcript.push(Message::debater(Side::A, 1, "m", raw, situation));
    let history = transcript.format_history();
    assert!(history.starts_with("A: Per <v_quote>"));
    assert!(!history.contains("Rule 1 settles it"));
}
