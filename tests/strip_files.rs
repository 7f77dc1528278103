use std::fs;
use std::path::PathBuf;

use tokenfix::strip::DEFAULT_TEMPLATE;
use tokenfix::{StripOutcome, Stripper};

fn fixture(name: &str, content: &str) -> PathBuf {
    let path = std::env::temp_dir().join(name);
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn run_isolates_a_missing_file() {
    let with_template = fixture(
        "tokenfix_it_present.js",
        &format!("const t = [\"a\", {DEFAULT_TEMPLATE}];"),
    );
    let without_template = fixture("tokenfix_it_absent.js", "const t = [\"a\"];");

    let files = vec![
        std::env::temp_dir()
            .join("tokenfix_it_missing.js")
            .to_string_lossy()
            .into_owned(),
        with_template.to_string_lossy().into_owned(),
        without_template.to_string_lossy().into_owned(),
    ];

    let stripper = Stripper::new(DEFAULT_TEMPLATE).unwrap();
    // the missing first file must not stop the other two
    assert_eq!(stripper.run(&files), 1);
    assert_eq!(
        fs::read_to_string(&with_template).unwrap(),
        "const t = [\"a\"];"
    );
    assert_eq!(
        fs::read_to_string(&without_template).unwrap(),
        "const t = [\"a\"];"
    );

    fs::remove_file(&with_template).unwrap();
    fs::remove_file(&without_template).unwrap();
}

#[test]
fn run_twice_changes_nothing_the_second_time() {
    let path = fixture(
        "tokenfix_it_rerun.js",
        &format!("[\"a\", {DEFAULT_TEMPLATE}, \"b\"]"),
    );
    let files = vec![path.to_string_lossy().into_owned()];

    let stripper = Stripper::new(DEFAULT_TEMPLATE).unwrap();
    assert_eq!(stripper.run(&files), 1);
    let once = fs::read_to_string(&path).unwrap();
    assert_eq!(once, "[\"a\", \"b\"]");

    assert_eq!(stripper.run(&files), 0);
    assert_eq!(fs::read_to_string(&path).unwrap(), once);

    fs::remove_file(&path).unwrap();
}

#[test]
fn custom_template_leaves_other_entries_alone() {
    let path = fixture(
        "tokenfix_it_custom.js",
        "const greetings = [\"hi\", \"bye (formal)\", \"later\"];",
    );
    let files = vec![path.to_string_lossy().into_owned()];

    let stripper = Stripper::new("\"bye (formal)\"").unwrap();
    assert_eq!(stripper.run(&files), 1);
    assert_eq!(
        fs::read_to_string(&path).unwrap(),
        "const greetings = [\"hi\", \"later\"];"
    );

    fs::remove_file(&path).unwrap();
}

#[test]
fn strip_file_reports_outcome_per_file() {
    let path = fixture("tokenfix_it_outcome.js", "nothing to see");
    let stripper = Stripper::new(DEFAULT_TEMPLATE).unwrap();
    assert_eq!(stripper.strip_file(&path).unwrap(), StripOutcome::NotFound);
    fs::remove_file(&path).unwrap();
}
