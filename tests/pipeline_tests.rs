use std::fs;
use std::path::Path;

use blog_pilot::artifact::ArtifactLocator;
use blog_pilot::collection::CollectionStore;
use blog_pilot::config::{BlogConfig, Credentials, NotificationConfig};
use blog_pilot::notification::Notifier;
use blog_pilot::pipeline::{Pipeline, RunStatus};
use serde_json::{Value, json};
use tempfile::TempDir;

fn offline_config() -> BlogConfig {
    let mut config = BlogConfig::default();
    config.git.enabled = false;
    config.notification.slack = false;
    config.generation.command.clear();
    config
}

fn pipeline(dir: &Path, config: BlogConfig) -> Pipeline {
    let notifier = Notifier::offline(NotificationConfig::default(), None);
    Pipeline::new(dir, config, Credentials::default(), notifier)
}

fn post_text(slug: &str) -> String {
    json!({
        "label": "IA para tu PyME",
        "title": format!("Post {slug}"),
        "date": "16/10/2026",
        "author": "Elbio Nielsen",
        "readTime": "6 MIN",
        "summary": "Resumen.",
        "coverImage": format!("/images/blog/{slug}.jpeg"),
        "slug": slug,
        "content": "Contenido"
    })
    .to_string()
}

#[tokio::test]
async fn test_scenario_e_accepted_artifact_is_merged_and_removed() {
    let dir = TempDir::new().unwrap();
    let collection = dir.path().join("blog_posts.json");
    fs::write(&collection, format!("[{}]", post_text("anterior"))).unwrap();
    let artifact = dir.path().join("nuevo.json");
    fs::write(&artifact, post_text("nuevo")).unwrap();

    let before = CollectionStore::new(&collection).len().await.unwrap();
    let report = pipeline(dir.path(), offline_config())
        .publish_artifact(&artifact)
        .await;

    assert_eq!(report.status, RunStatus::Success, "{report:?}");
    assert_eq!(CollectionStore::new(&collection).len().await.unwrap(), before + 1);
    assert!(!artifact.exists());

    let entries: Vec<Value> =
        serde_json::from_str(&fs::read_to_string(&collection).unwrap()).unwrap();
    assert_eq!(entries[0]["slug"], "anterior");
    assert_eq!(entries[1]["slug"], "nuevo");
}

#[tokio::test]
async fn test_rejected_artifact_is_never_merged_or_deleted() {
    let dir = TempDir::new().unwrap();
    let artifact = dir.path().join("malo.json");
    let text = post_text("malo").replace("16/10/2026", "2026-10-16");
    fs::write(&artifact, &text).unwrap();

    let report = pipeline(dir.path(), offline_config())
        .publish_artifact(&artifact)
        .await;

    assert_eq!(report.status, RunStatus::Error);
    assert_eq!(report.errors.len(), 1);
    assert_eq!(fs::read_to_string(&artifact).unwrap(), text);
    assert!(dir.path().join("DEBUG_malo.json").exists());
    assert!(!dir.path().join("blog_posts.json").exists());
}

#[tokio::test]
async fn test_git_failure_is_reported_as_deploy_failure() {
    // Not a git repository, so staging fails after the merge.
    let dir = TempDir::new().unwrap();
    let artifact = dir.path().join("sin-git.json");
    fs::write(&artifact, post_text("sin-git")).unwrap();

    let mut config = offline_config();
    config.git.enabled = true;
    let report = pipeline(dir.path(), config).publish_artifact(&artifact).await;

    assert_eq!(report.status, RunStatus::Error);
    assert_eq!(report.message, "Blog post validated but deployment failed");
    assert!(report.errors[0].starts_with("Git add failed"));
    assert!(dir.path().join("blog_posts.json").exists());
}

#[tokio::test]
async fn test_locator_skips_collection_debug_and_package_files() {
    let dir = TempDir::new().unwrap();
    for name in [
        "blog_posts.json",
        "DEBUG_viejo.json",
        "package.json",
        ".hidden.json",
        "notas.txt",
    ] {
        fs::write(dir.path().join(name), "{}").unwrap();
    }

    let locator = ArtifactLocator::new(dir.path(), "blog_posts.json", "DEBUG_");
    assert!(locator.latest().await.is_err());

    fs::write(dir.path().join("candidato.json"), "{}").unwrap();
    assert_eq!(
        locator.latest().await.unwrap(),
        dir.path().join("candidato.json")
    );
}

#[tokio::test]
async fn test_generator_output_is_discovered_and_published() {
    let dir = TempDir::new().unwrap();
    let mut config = offline_config();
    let script = format!("printf '%s' '{}' > generado.json", post_text("generado"));
    config.generation.command = vec!["sh".into(), "-c".into(), script];

    let credentials = Credentials::from_lookup(|_: &str| Some("key".to_string()));
    let notifier = Notifier::offline(NotificationConfig::default(), None);
    let report = Pipeline::new(dir.path(), config, credentials, notifier)
        .run()
        .await
        .unwrap();

    assert!(report.is_success(), "{report:?}");
    assert_eq!(report.slug.as_deref(), Some("generado"));
    assert_eq!(
        CollectionStore::new(dir.path().join("blog_posts.json"))
            .len()
            .await
            .unwrap(),
        1
    );
}
