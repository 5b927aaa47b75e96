use std::fs;
use std::path::PathBuf;

use blog_pilot::config::BlogConfig;
use blog_pilot::gate::{GateDecision, GateState, PublicationGate};
use tempfile::TempDir;

const HEAD: &str = r#"{"label":"IA para tu PyME","title":"Automatiza tu pyme","date":"09/04/2025","author":"Leire Legarreta","readTime":"4 MIN","summary":"Resumen.","coverImage":"/images/blog/automatiza-pyme.jpeg","slug":"automatiza-pyme","content":""#;

fn artifact(dir: &TempDir, content: &str) -> PathBuf {
    let path = dir.path().join("automatiza-pyme.json");
    fs::write(&path, format!("{HEAD}{content}\"}}")).unwrap();
    path
}

fn gate() -> PublicationGate {
    PublicationGate::from_config(&BlogConfig::default())
}

#[tokio::test]
async fn test_scenario_c_unescaped_newline_is_repaired() {
    let dir = TempDir::new().unwrap();
    let path = artifact(&dir, "Primera línea\nSegunda línea");
    let original = fs::read_to_string(&path).unwrap();

    let outcome = gate().evaluate(&path).await.unwrap();

    assert!(outcome.is_accepted());
    assert!(outcome.repair_attempted());
    let GateDecision::Accepted {
        post,
        repaired,
        cleaned_content,
    } = &outcome.decision
    else {
        panic!("expected acceptance");
    };
    assert!(*repaired);
    assert_eq!(post.content, "Primera línea\nSegunda línea");

    let cleaned = cleaned_content.as_deref().unwrap();
    assert_ne!(cleaned, original);
    assert_eq!(fs::read_to_string(&path).unwrap(), cleaned);
    assert!(dir.path().join("DEBUG_automatiza-pyme.json").exists());
}

#[tokio::test]
async fn test_accepted_artifact_gets_sanitized_write_back() {
    let dir = TempDir::new().unwrap();
    let path = artifact(&dir, "Texto\u{1}limpio");

    let outcome = gate().evaluate(&path).await.unwrap();

    assert!(outcome.is_accepted());
    assert!(!outcome.repair_attempted());
    assert_eq!(
        fs::read_to_string(&path).unwrap(),
        format!("{HEAD}Textolimpio\"}}")
    );
}

#[tokio::test]
async fn test_rejection_keeps_original_and_debug_copy() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("roto.json");
    let text = r#"{"title": "sin cerrar""#;
    fs::write(&path, text).unwrap();

    let outcome = gate().evaluate(&path).await.unwrap();

    assert!(!outcome.is_accepted());
    assert!(!outcome.repair_attempted());
    assert_eq!(outcome.trace.last(), Some(&GateState::Rejected));
    assert_eq!(fs::read_to_string(&path).unwrap(), text);

    let GateDecision::Rejected { debug_file, errors, .. } = &outcome.decision else {
        panic!("expected rejection");
    };
    assert_eq!(debug_file, &dir.path().join("DEBUG_roto.json"));
    assert_eq!(fs::read_to_string(debug_file).unwrap(), text);
    assert!(errors[0].message.starts_with("invalid JSON"));
}

#[tokio::test]
async fn test_repair_runs_once_and_reports_first_errors() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("mal.json");
    // Parses after repair but still breaks the slug rule.
    let text = HEAD.replace("\"automatiza-pyme\",\"content\"", "\"Automatiza Pyme\",\"content\"")
        + "línea\notra\"}";
    fs::write(&path, &text).unwrap();

    let outcome = gate().evaluate(&path).await.unwrap();

    assert!(!outcome.is_accepted());
    assert_eq!(
        outcome
            .trace
            .iter()
            .filter(|s| **s == GateState::Repairing)
            .count(),
        1
    );
    let GateDecision::Rejected {
        errors,
        retry_errors,
        ..
    } = &outcome.decision
    else {
        panic!("expected rejection");
    };
    assert!(errors[0].message.contains("control character"));
    assert!(retry_errors.iter().any(|e| e.field.as_deref() == Some("slug")));
    assert_eq!(fs::read_to_string(&path).unwrap(), text);
}
