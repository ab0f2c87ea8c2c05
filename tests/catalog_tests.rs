use std::io::Write;

use runtimelab::error::SimError;
use runtimelab::report;
use runtimelab::scenario::{ConcurrencyModel, Language, MemoryAction, ScenarioCatalog};

const CUSTOM_CATALOG: &str = r#"{
  "memory": [
    {
      "id": "tiny-leak",
      "title": "Tiny leak",
      "description": "One block, never freed",
      "programs": {
        "c": {
          "code": "char *p = malloc(16);\np = NULL;",
          "steps": [
            { "line_number": 1, "action": "allocate-heap", "block_id": "p", "block_size": 16 },
            { "line_number": 2, "action": "leak", "block_id": "p", "label": "pointer overwritten" }
          ]
        }
      }
    }
  ],
  "concurrency": [
    {
      "id": "web-request",
      "title": "Overridden web request",
      "description": "Replaces the built-in scenario",
      "tasks": [
        { "id": "only", "name": "Only task", "duration": 50, "type": "io" }
      ],
      "implementations": {
        "go": { "code": "go work()", "model": "goroutines", "description": "one goroutine" }
      }
    }
  ]
}"#;

#[test]
fn test_builtin_catalog_is_valid() {
    let catalog = ScenarioCatalog::builtin();
    assert_eq!(catalog.validate(), Vec::<String>::new());
    assert!(catalog.memory_scenarios().len() >= 5);
    assert!(catalog.concurrency_scenarios().len() >= 3);

    // The event-loop example scenario is available in JavaScript
    let web = catalog.require_concurrency("web-request").expect("builtin");
    assert_eq!(
        web.implementation(Language::JavaScript).map(|i| i.model),
        Some(ConcurrencyModel::EventLoop)
    );
}

#[test]
fn test_load_catalog_from_file() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    file.write_all(CUSTOM_CATALOG.as_bytes()).expect("write");

    let loaded = ScenarioCatalog::from_path(file.path()).expect("valid catalog");
    let leak = loaded.require_memory("tiny-leak").expect("loaded");
    let steps = &leak.program(Language::C).expect("c program").steps;
    assert_eq!(steps[1].action, MemoryAction::Leak);
    assert_eq!(steps[1].label.as_deref(), Some("pointer overwritten"));
    assert_eq!(steps[0].block_size, Some(16));
}

#[test]
fn test_merge_replaces_by_id() {
    let mut catalog = ScenarioCatalog::builtin();
    let builtin_count = catalog.concurrency_scenarios().len();
    catalog.merge(ScenarioCatalog::from_json_str(CUSTOM_CATALOG).expect("valid catalog"));

    assert_eq!(catalog.concurrency_scenarios().len(), builtin_count);
    let web = catalog.require_concurrency("web-request").expect("present");
    assert_eq!(web.title, "Overridden web request");
    assert_eq!(web.tasks.len(), 1);
    assert!(!web.tasks[0].blocks_event_loop);
    assert!(catalog.memory_scenario("tiny-leak").is_some());
    assert!(catalog.memory_scenario("stack-vs-heap").is_some());
}

#[test]
fn test_json_round_trip_keeps_builtins() {
    let catalog = ScenarioCatalog::builtin();
    let json = catalog.to_json().expect("serializable");
    let reloaded = ScenarioCatalog::from_json_str(&json).expect("valid catalog");

    assert_eq!(
        reloaded.memory_scenarios().len(),
        catalog.memory_scenarios().len()
    );
    let before = catalog.require_memory("garbage-collection").expect("builtin");
    let after = reloaded.require_memory("garbage-collection").expect("reloaded");
    assert_eq!(before.programs, after.programs);
}

#[test]
fn test_malformed_json_is_a_parse_error() {
    let err = ScenarioCatalog::from_json_str("{ \"memory\": [ { \"id\": 3 } ] }");
    assert!(matches!(err, Err(SimError::CatalogParse { path: None, .. })));

    let err = ScenarioCatalog::from_path(std::path::Path::new("/definitely/missing.json"));
    assert!(matches!(err, Err(SimError::CatalogIo { .. })));
}

#[test]
fn test_serialize_error_is_not_a_parse_error() {
    let source = serde_json::from_str::<u8>("-1").expect_err("out of range");
    let err = SimError::CatalogSerialize { source };
    assert!(err.to_string().starts_with("Failed to serialize catalog"));
    assert!(std::error::Error::source(&err).is_some());
}

#[test]
fn test_inconsistent_catalog_reports_problems() {
    let json = r#"{
      "memory": [
        { "id": "bad", "title": "Bad", "description": "",
          "programs": { "c": { "code": "", "steps": [
            { "line_number": 1, "action": "free" }
          ] } } }
      ],
      "concurrency": [
        { "id": "dup", "title": "Dup", "description": "",
          "tasks": [
            { "id": "x", "name": "X", "duration": 1, "type": "cpu" },
            { "id": "x", "name": "X again", "duration": 1, "type": "cpu" }
          ],
          "implementations": {} }
      ]
    }"#;

    match ScenarioCatalog::from_json_str(json) {
        Err(SimError::InvalidCatalog { problems }) => assert!(problems.len() >= 2),
        other => panic!("expected InvalidCatalog, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn test_language_names_parse() {
    assert_eq!("c++".parse::<Language>().ok(), Some(Language::Cpp));
    assert_eq!("JS".parse::<Language>().ok(), Some(Language::JavaScript));
    assert!(matches!(
        "cobol".parse::<Language>(),
        Err(SimError::UnknownLanguage { .. })
    ));
}

#[test]
fn test_reports() {
    let catalog = ScenarioCatalog::builtin();

    let listing = report::list_report(&catalog);
    assert!(listing.contains("stack-vs-heap"));
    assert!(listing.contains("javascript=event-loop"));

    let memory = report::memory_report(&catalog, "memory-leak", Some(Language::C), None)
        .expect("report");
    assert!(memory.contains("Leaked: 400 bytes"));

    let concurrency =
        report::concurrency_report(&catalog, "web-request", Some(Language::JavaScript), 10)
            .expect("report");
    assert!(concurrency.contains("Total time:      2350 ms"));
    assert!(concurrency.contains("Efficiency:      85%"));

    assert!(matches!(
        report::memory_report(&catalog, "nope", None, None),
        Err(SimError::UnknownScenario { .. })
    ));
    assert!(matches!(
        report::concurrency_report(&catalog, "web-request", Some(Language::Swift), 10),
        Err(SimError::LanguageNotAvailable { .. })
    ));
}
