use chrono::Utc;
use paper_statistics::models::{Node, ProgressUpdate, PublishedStatistics, Statement};
use paper_statistics::services::analyze;
use paper_statistics::{
    GlobalStatistics, JsonFileStore, PaperAnalysisResult, ProgressStore, RunStatus, StoreError,
    TemplateRegistry,
};
use tempfile::TempDir;

fn sample_result(paper_id: &str) -> PaperAnalysisResult {
    let statements = vec![
        Statement::new(Node::resource("R1"), "P1", Node::literal("L1")),
        Statement::new(Node::resource("R1"), "P2", Node::resource("R2")),
    ];
    PaperAnalysisResult::from_analysis(paper_id, analyze(&statements))
}

#[tokio::test]
async fn test_results_survive_reopen() {
    let dir = TempDir::new().unwrap();
    let template = TemplateRegistry::builtin().get("empire").unwrap().clone();

    let store = JsonFileStore::new(dir.path());
    store.save_result(&template, &sample_result("R200")).await.unwrap();
    store.save_result(&template, &sample_result("R100")).await.unwrap();
    // 覆盖写入
    store.save_result(&template, &sample_result("R100")).await.unwrap();

    let reopened = JsonFileStore::new(dir.path());
    let cached = reopened.load_progress(&template).await.unwrap();
    let ids: Vec<_> = cached.cached_results.iter().map(|r| r.paper_id.as_str()).collect();
    assert_eq!(ids, vec!["R100", "R200"]);
    assert!(cached.processed_paper_ids.contains("R200"));
    assert!(cached.cached_results[0].same_content(&sample_result("R100")));

    assert!(dir.path().join("empire/papers/R100.json").exists());
    assert!(!dir.path().join("empire/papers/R100.json.tmp").exists());
}

#[tokio::test]
async fn test_missing_namespace_is_empty() {
    let dir = TempDir::new().unwrap();
    let store = JsonFileStore::new(dir.path());
    let template = TemplateRegistry::builtin().get("nlp4re").unwrap().clone();

    assert!(store.load_progress(&template).await.unwrap().cached_results.is_empty());
    assert!(store.load_progress_summary(&template).await.unwrap().is_none());
    assert!(store.load_published(&template).await.unwrap().is_none());
    store.delete_result(&template, "R1").await.unwrap();
    store.purge(&template).await.unwrap();
}

#[tokio::test]
async fn test_progress_document_merges_updates() {
    let dir = TempDir::new().unwrap();
    let store = JsonFileStore::new(dir.path());
    let template = TemplateRegistry::builtin().get("empire").unwrap().clone();

    store
        .save_progress_summary(&template, ProgressUpdate::started(3, 1))
        .await
        .unwrap();
    store
        .save_progress_summary(&template, ProgressUpdate::paper_done(2, "R2"))
        .await
        .unwrap();

    let progress = store.load_progress_summary(&template).await.unwrap().unwrap();
    assert_eq!(progress.status, RunStatus::Running);
    assert_eq!(progress.total_papers, 3);
    assert_eq!(progress.processed_count, 2);
    assert_eq!(progress.current_paper.as_deref(), Some("R2"));
    assert!(progress.started_at.is_some());

    let raw = std::fs::read_to_string(dir.path().join("empire/empire-statistics-progress.json")).unwrap();
    assert!(raw.contains("\"processedCount\": 2"));
}

#[tokio::test]
async fn test_purge_keeps_published_record() {
    let dir = TempDir::new().unwrap();
    let store = JsonFileStore::new(dir.path());
    let template = TemplateRegistry::builtin().get("empire").unwrap().clone();

    store.save_result(&template, &sample_result("R1")).await.unwrap();
    store
        .save_progress_summary(&template, ProgressUpdate::started(1, 0))
        .await
        .unwrap();
    store
        .publish_statistics(&PublishedStatistics {
            template_key: template.key.clone(),
            statistic_id: template.statistic_id.clone(),
            global_stats: GlobalStatistics {
                paper_count: 1,
                ..Default::default()
            },
            published_at: Utc::now(),
        })
        .await
        .unwrap();

    store.purge(&template).await.unwrap();

    assert!(store.load_progress(&template).await.unwrap().cached_results.is_empty());
    assert!(store.load_progress_summary(&template).await.unwrap().is_none());
    let published = store.load_published(&template).await.unwrap().unwrap();
    assert_eq!(published.global_stats.paper_count, 1);
}

#[tokio::test]
async fn test_corrupt_result_is_skipped() {
    let dir = TempDir::new().unwrap();
    let store = JsonFileStore::new(dir.path());
    let template = TemplateRegistry::builtin().get("empire").unwrap().clone();

    store.save_result(&template, &sample_result("R1")).await.unwrap();
    std::fs::write(dir.path().join("empire/papers/R2.json"), "{ not json").unwrap();

    let cached = store.load_progress(&template).await.unwrap();
    assert_eq!(cached.cached_results.len(), 1);
    assert_eq!(cached.cached_results[0].paper_id, "R1");
}

#[tokio::test]
async fn test_opaque_paper_ids_round_trip() {
    let dir = TempDir::new().unwrap();
    let store = JsonFileStore::new(dir.path());
    let template = TemplateRegistry::builtin().get("empire").unwrap().clone();

    for paper_id in ["urn:uuid:42", "paper#p1", "../escape"] {
        store.save_result(&template, &sample_result(paper_id)).await.unwrap();
    }

    let reopened = JsonFileStore::new(dir.path());
    let cached = reopened.load_progress(&template).await.unwrap();
    let mut ids: Vec<_> = cached.processed_paper_ids.iter().cloned().collect();
    ids.sort();
    assert_eq!(ids, vec!["../escape", "paper#p1", "urn:uuid:42"]);
    assert!(cached
        .cached_results
        .iter()
        .all(|r| r.same_content(&sample_result(&r.paper_id))));

    // 所有文档都留在结果目录内
    let files = std::fs::read_dir(dir.path().join("empire/papers")).unwrap().count();
    assert_eq!(files, 3);
    assert!(!dir.path().join("empire/escape.json").exists());

    reopened.delete_result(&template, "paper#p1").await.unwrap();
    let cached = reopened.load_progress(&template).await.unwrap();
    assert!(!cached.processed_paper_ids.contains("paper#p1"));
    assert_eq!(cached.cached_results.len(), 2);
}

#[tokio::test]
async fn test_invalid_template_key_is_rejected() {
    let dir = TempDir::new().unwrap();
    let store = JsonFileStore::new(dir.path());
    let mut template = TemplateRegistry::builtin().get("empire").unwrap().clone();
    template.key = "../outside".to_string();

    let err = store
        .save_result(&template, &sample_result("R1"))
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::InvalidKey(_)));

    let err = store
        .save_result(
            &TemplateRegistry::builtin().get("empire").unwrap().clone(),
            &sample_result(""),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::InvalidKey(_)));
}
