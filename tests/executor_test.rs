//! ActionExecutor 并发执行与部分失败汇总

mod common;

use common::{thread, threads, RecordingApi, RecordingSystem};
use ghn::{parse, Action, ActionExecutor, CommandMap};
use std::sync::Arc;

fn executor(api: &Arc<RecordingApi>, system: &Arc<RecordingSystem>) -> ActionExecutor {
    ActionExecutor::new(api.clone(), system.clone())
}

#[tokio::test]
async fn test_all_units_succeed() {
    let api = Arc::new(RecordingApi::new());
    let system = Arc::new(RecordingSystem::new());
    let snapshot = threads(5);

    let commands = parse("1o 2r 3d 4y", snapshot.len());
    let summary = executor(&api, &system).execute(&commands, &snapshot).await;

    assert_eq!(summary.succeeded, 4);
    assert_eq!(summary.failed, 0);
    assert!(summary.errors.is_empty());
    assert_eq!(summary.status_line(), "Executed 4 actions");
    assert_eq!(api.calls(), vec!["mark_done:t3", "mark_read:t2"]);
    assert_eq!(system.opened(), vec!["https://github.com/acme/widgets/issues/t1"]);
    assert_eq!(system.copied(), vec!["https://github.com/acme/widgets/issues/t4"]);
}

#[tokio::test]
async fn test_one_failing_unit_does_not_cancel_others() {
    let api = Arc::new(RecordingApi::new().fail_on("mark_done:t2"));
    let system = Arc::new(RecordingSystem::new());
    let snapshot = threads(3);

    let commands = parse("1r 2d 3d", snapshot.len());
    let summary = executor(&api, &system).execute(&commands, &snapshot).await;

    assert_eq!(summary.succeeded, 2);
    assert_eq!(summary.failed, 1);
    assert_eq!(summary.total(), 3);
    assert_eq!(summary.errors.len(), summary.failed);
    assert!(summary.errors[0].contains("mark_done:t2 exploded"));
    assert_eq!(api.calls(), vec!["mark_done:t2", "mark_done:t3", "mark_read:t1"]);
    assert!(summary.status_line().starts_with("2 succeeded, 1 failed: "));
}

#[tokio::test]
async fn test_local_failure_is_counted() {
    let api = Arc::new(RecordingApi::new());
    let system = Arc::new(RecordingSystem::failing_open());
    let snapshot = threads(2);

    let commands = parse("1o 2o", snapshot.len());
    let summary = executor(&api, &system).execute(&commands, &snapshot).await;

    assert_eq!(summary.failed, 2);
    assert_eq!(summary.succeeded, 0);
    assert_eq!(summary.errors, vec!["xdg-open not found", "xdg-open not found"]);
}

#[tokio::test]
async fn test_vanished_index_is_skipped_and_not_counted() {
    let api = Arc::new(RecordingApi::new());
    let system = Arc::new(RecordingSystem::new());

    // 命令针对 5 条，执行时快照只剩 2 条
    let commands = parse("2r 5d", 5);
    let snapshot = threads(2);
    let summary = executor(&api, &system).execute(&commands, &snapshot).await;

    assert_eq!(summary.total(), 1);
    assert_eq!(summary.succeeded, 1);
    assert_eq!(api.calls(), vec!["mark_read:t2"]);
}

#[tokio::test]
async fn test_empty_commands() {
    let api = Arc::new(RecordingApi::new());
    let system = Arc::new(RecordingSystem::new());

    let summary = executor(&api, &system)
        .execute(&CommandMap::new(), &threads(3))
        .await;

    assert_eq!(summary.total(), 0);
    assert!(api.calls().is_empty());
}

#[tokio::test]
async fn test_unsubscribe_then_mark_done() {
    let api = Arc::new(RecordingApi::new());
    let system = Arc::new(RecordingSystem::new());
    let snapshot = threads(1);

    let commands = parse("1q", 1);
    let summary = executor(&api, &system).execute(&commands, &snapshot).await;

    assert_eq!(summary.succeeded, 1);
    assert_eq!(
        api.calls(),
        vec![
            "mark_done:t1".to_string(),
            "unsubscribe:https://api.github.com/notifications/threads/t1/subscription".to_string(),
        ]
    );
}

#[tokio::test]
async fn test_failed_unsubscribe_still_marks_done() {
    let api = Arc::new(RecordingApi::new().fail_on(
        "unsubscribe:https://api.github.com/notifications/threads/t1/subscription",
    ));
    let system = Arc::new(RecordingSystem::new());
    let snapshot = threads(1);

    let summary = executor(&api, &system)
        .execute(&parse("1q", 1), &snapshot)
        .await;

    // 单元结果只取决于 mark_done
    assert_eq!(summary.succeeded, 1);
    assert_eq!(summary.failed, 0);
    assert!(api.calls().contains(&"mark_done:t1".to_string()));
}

#[tokio::test]
async fn test_unsubscribe_without_subject_identity() {
    let api = Arc::new(RecordingApi::new());
    let system = Arc::new(RecordingSystem::new());
    let mut item = thread("t1");
    item.subject_id = None;

    let summary = executor(&api, &system)
        .execute(&parse("1q", 1), &[item])
        .await;

    assert_eq!(summary.succeeded, 1);
    assert_eq!(api.calls(), vec!["mark_done:t1"]);
}

#[tokio::test]
async fn test_open_without_url_is_skipped() {
    let api = Arc::new(RecordingApi::new());
    let system = Arc::new(RecordingSystem::new());
    let mut item = thread("t1");
    item.subject.url = None;

    let mut commands = CommandMap::new();
    commands.insert(1, vec![Action::Open, Action::Yank, Action::MarkRead]);
    let summary = executor(&api, &system).execute(&commands, &[item]).await;

    // 没有地址时 open/yank 不调度，标记已读照常执行
    assert_eq!(summary.total(), 1);
    assert_eq!(summary.succeeded, 1);
    assert!(system.opened().is_empty());
    assert!(system.copied().is_empty());
    assert_eq!(api.calls(), vec!["mark_read:t1"]);
}
