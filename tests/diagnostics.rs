//! Warnings emitted while loading templates.
//!
//! `logtest` installs a process-wide logger, so every assertion lives in a
//! single test.

use logtest::Logger;
use sysconf::{Database, Question, Template};

fn drain_warnings(logger: &mut Logger) -> Vec<(String, String)> {
    let mut warnings = Vec::new();
    while let Some(record) = logger.pop() {
        if record.level() == log::Level::Warn {
            warnings.push((record.target().to_owned(), record.args().to_string()));
        }
    }
    warnings
}

const REPAIR_PREFIX: &str = "possible database corruption: re-adding missing question ";

fn repair_warnings(warnings: &[(String, String)]) -> Vec<&str> {
    let mut repaired: Vec<&str> = warnings
        .iter()
        .filter(|(target, _)| target == "sysconf::template")
        .filter_map(|(_, message)| message.strip_prefix(REPAIR_PREFIX))
        .collect();
    repaired.sort_unstable();
    repaired
}

#[test]
fn loading_warns_about_unknown_fields_and_repairs() {
    let mut logger = Logger::start();
    let mut db = Database::in_memory();

    let text = "Template: demo/host\nType: string\nColour: blue\nDescription: Host\n";
    Template::load(&mut db, text, "demo.templates", "demo").expect("load should succeed");

    let warnings = drain_warnings(&mut logger);
    assert_eq!(
        warnings,
        vec![(
            "sysconf::loader".to_owned(),
            "unknown template field colour in stanza 1 of demo.templates".to_owned()
        )]
    );

    db.config_mut().remove_owner("demo/host", "demo");
    assert!(!db.config().exists("demo/host"));

    Template::factory(&mut db, "demo/host", "demo", "string").expect("factory should repair");

    let warnings = drain_warnings(&mut logger);
    assert_eq!(repair_warnings(&warnings), ["demo/host"], "got {warnings:?}");
    assert_eq!(warnings.len(), 1, "got {warnings:?}");
    let question = Question::get(&mut db, "demo/host").expect("question should be restored");
    assert_eq!(question.template(&db).as_deref(), Some("demo/host"));
    assert_eq!(question.owners(&db), vec!["demo".to_owned()]);

    // Two questions share the template and both have gone missing.
    db.templates_mut().add_owner("demo/host", "demo/alias", "string");
    db.config_mut().remove_owner("demo/host", "demo");
    assert!(!db.config().exists("demo/alias"));

    Template::factory(&mut db, "demo/host", "other", "string").expect("factory should repair");

    let warnings = drain_warnings(&mut logger);
    assert_eq!(repair_warnings(&warnings), ["demo/alias", "demo/host"], "got {warnings:?}");
    assert_eq!(warnings.len(), 2, "got {warnings:?}");

    Template::factory(&mut db, "demo/host", "third", "string").expect("factory should succeed");
    Template::get(&mut db, "demo/host").expect("template should exist");
    Question::get(&mut db, "demo/alias").expect("question should exist");

    let warnings = drain_warnings(&mut logger);
    assert!(warnings.is_empty(), "repaired questions warned again: {warnings:?}");
}
