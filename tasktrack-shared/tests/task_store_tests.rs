/// Integration tests for project-scoped task access and the status workflow
///
/// Run with: cargo test --test task_store_tests

mod common;

use std::time::Duration;

use common::{project, task, TestContext};
use tasktrack_shared::error::{CoreError, Resource};
use tasktrack_shared::models::{TaskStatus, UpdateTask};
use tasktrack_shared::policy::{CompletionStampPolicy, Policies};
use uuid::Uuid;

fn status(status: TaskStatus) -> UpdateTask {
    UpdateTask {
        status: Some(status),
        ..Default::default()
    }
}

fn title(title: &str) -> UpdateTask {
    UpdateTask {
        title: Some(title.to_string()),
        ..Default::default()
    }
}

/// Keeps consecutive completion stamps apart
async fn tick() {
    tokio::time::sleep(Duration::from_millis(5)).await;
}

#[tokio::test]
async fn test_create_defaults_to_todo() {
    let ctx = TestContext::new();
    let alice = ctx.user("alice@example.com").await;
    let p = ctx.projects.create_project(&alice, project("Work")).await.unwrap();
    let owned = ctx.projects.get_project(&alice, p.id).await.unwrap();

    let created = ctx.tasks.create_task(&owned, task("Draft", None)).await.unwrap();

    assert_eq!(created.status, TaskStatus::Todo);
    assert!(created.completed_at.is_none());
    assert_eq!(created.project_id, p.id);
}

#[tokio::test]
async fn test_create_completed_is_stamped() {
    let ctx = TestContext::new();
    let alice = ctx.user("alice@example.com").await;
    let p = ctx.projects.create_project(&alice, project("Work")).await.unwrap();
    let owned = ctx.projects.get_project(&alice, p.id).await.unwrap();

    let created = ctx
        .tasks
        .create_task(&owned, task("Done already", Some(TaskStatus::Completed)))
        .await
        .unwrap();

    assert_eq!(created.completed_at, Some(created.created_at));
}

#[tokio::test]
async fn test_create_rejects_blank_title() {
    let ctx = TestContext::new();
    let alice = ctx.user("alice@example.com").await;
    let p = ctx.projects.create_project(&alice, project("Work")).await.unwrap();
    let owned = ctx.projects.get_project(&alice, p.id).await.unwrap();

    let err = ctx.tasks.create_task(&owned, task("   ", None)).await.unwrap_err();
    assert!(matches!(err, CoreError::Validation { field: "title", .. }));
    assert!(ctx.tasks.list_tasks(&owned).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_list_is_scoped_to_project() {
    let ctx = TestContext::new();
    let alice = ctx.user("alice@example.com").await;
    let p1 = ctx.projects.create_project(&alice, project("One")).await.unwrap();
    let p2 = ctx.projects.create_project(&alice, project("Two")).await.unwrap();
    let one = ctx.projects.get_project(&alice, p1.id).await.unwrap();
    let two = ctx.projects.get_project(&alice, p2.id).await.unwrap();

    ctx.tasks.create_task(&one, task("a", None)).await.unwrap();
    ctx.tasks.create_task(&two, task("b", None)).await.unwrap();
    ctx.tasks.create_task(&one, task("c", None)).await.unwrap();

    let titles: Vec<_> = ctx
        .tasks
        .list_tasks(&one)
        .await
        .unwrap()
        .into_iter()
        .map(|t| t.title)
        .collect();
    assert_eq!(titles, vec!["a", "c"]);
}

#[tokio::test]
async fn test_complete_reopen_complete_restamps() {
    let ctx = TestContext::new();
    let alice = ctx.user("alice@example.com").await;
    let p = ctx.projects.create_project(&alice, project("Work")).await.unwrap();
    let owned = ctx.projects.get_project(&alice, p.id).await.unwrap();
    let t = ctx.tasks.create_task(&owned, task("Cycle", None)).await.unwrap();

    let completed = ctx
        .tasks
        .update_task(&owned, t.id, status(TaskStatus::Completed))
        .await
        .unwrap();
    let first_stamp = completed.completed_at.expect("completion time set");

    tick().await;
    let reopened = ctx.tasks.update_task(&owned, t.id, status(TaskStatus::Todo)).await.unwrap();
    assert!(reopened.completed_at.is_none());

    tick().await;
    let recompleted = ctx
        .tasks
        .update_task(&owned, t.id, status(TaskStatus::Completed))
        .await
        .unwrap();
    let second_stamp = recompleted.completed_at.expect("completion time set");

    assert!(second_stamp > first_stamp);
}

#[tokio::test]
async fn test_every_update_policy_restamps_title_change() {
    let ctx = TestContext::new();
    let alice = ctx.user("alice@example.com").await;
    let p = ctx.projects.create_project(&alice, project("Work")).await.unwrap();
    let owned = ctx.projects.get_project(&alice, p.id).await.unwrap();
    let t = ctx
        .tasks
        .create_task(&owned, task("Done", Some(TaskStatus::Completed)))
        .await
        .unwrap();

    tick().await;
    let renamed = ctx.tasks.update_task(&owned, t.id, title("Done, renamed")).await.unwrap();

    assert_eq!(renamed.title, "Done, renamed");
    assert_eq!(renamed.status, TaskStatus::Completed);
    assert!(renamed.completed_at.unwrap() > t.completed_at.unwrap());
}

#[tokio::test]
async fn test_status_change_policy_keeps_stamp_on_title_change() {
    let ctx = TestContext::with_policies(Policies {
        completion_stamp: CompletionStampPolicy::StatusChange,
        ..Default::default()
    });
    let alice = ctx.user("alice@example.com").await;
    let p = ctx.projects.create_project(&alice, project("Work")).await.unwrap();
    let owned = ctx.projects.get_project(&alice, p.id).await.unwrap();
    let t = ctx
        .tasks
        .create_task(&owned, task("Done", Some(TaskStatus::Completed)))
        .await
        .unwrap();

    tick().await;
    let renamed = ctx.tasks.update_task(&owned, t.id, title("Renamed")).await.unwrap();
    assert_eq!(renamed.completed_at, t.completed_at);

    let reopened = ctx
        .tasks
        .update_task(&owned, t.id, status(TaskStatus::InProgress))
        .await
        .unwrap();
    assert!(reopened.completed_at.is_none());
}

#[tokio::test]
async fn test_update_missing_task_is_not_found() {
    let ctx = TestContext::new();
    let alice = ctx.user("alice@example.com").await;
    let p = ctx.projects.create_project(&alice, project("Work")).await.unwrap();
    let owned = ctx.projects.get_project(&alice, p.id).await.unwrap();

    let err = ctx
        .tasks
        .update_task(&owned, Uuid::new_v4(), status(TaskStatus::Completed))
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::NotFound(Resource::Task)));
}

#[tokio::test]
async fn test_task_of_other_project_is_not_reachable() {
    let ctx = TestContext::new();
    let alice = ctx.user("alice@example.com").await;
    let p1 = ctx.projects.create_project(&alice, project("One")).await.unwrap();
    let p2 = ctx.projects.create_project(&alice, project("Two")).await.unwrap();
    let one = ctx.projects.get_project(&alice, p1.id).await.unwrap();
    let two = ctx.projects.get_project(&alice, p2.id).await.unwrap();
    let t = ctx.tasks.create_task(&one, task("in one", None)).await.unwrap();

    // Addressed through the wrong project
    let err = ctx.tasks.delete_task(&two, t.id).await.unwrap_err();
    assert!(matches!(err, CoreError::NotFound(Resource::Task)));
    assert_eq!(ctx.tasks.list_tasks(&one).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_foreign_task_does_not_resolve() {
    let ctx = TestContext::new();
    let alice = ctx.user("alice@example.com").await;
    let mallory = ctx.user("mallory@example.com").await;
    let p = ctx.projects.create_project(&alice, project("Private")).await.unwrap();
    let owned = ctx.projects.get_project(&alice, p.id).await.unwrap();
    let t = ctx.tasks.create_task(&owned, task("secret", None)).await.unwrap();

    let foreign = ctx.tasks.resolve_task_project(&mallory, t.id).await.unwrap_err();
    let missing = ctx.tasks.resolve_task_project(&mallory, Uuid::new_v4()).await.unwrap_err();
    assert!(matches!(foreign, CoreError::NotFound(Resource::Task)));
    assert!(matches!(missing, CoreError::NotFound(Resource::Task)));

    // The owner resolves it to the right project
    let resolved = ctx.tasks.resolve_task_project(&alice, t.id).await.unwrap();
    assert_eq!(resolved.id(), p.id);
}

#[tokio::test]
async fn test_delete_task_once() {
    let ctx = TestContext::new();
    let alice = ctx.user("alice@example.com").await;
    let p = ctx.projects.create_project(&alice, project("Work")).await.unwrap();
    let owned = ctx.projects.get_project(&alice, p.id).await.unwrap();
    let t = ctx.tasks.create_task(&owned, task("Temp", None)).await.unwrap();

    ctx.tasks.delete_task(&owned, t.id).await.unwrap();
    let err = ctx.tasks.delete_task(&owned, t.id).await.unwrap_err();
    assert!(matches!(err, CoreError::NotFound(Resource::Task)));
}

#[tokio::test]
async fn test_project_stats() {
    let ctx = TestContext::new();
    let alice = ctx.user("alice@example.com").await;
    let p = ctx.projects.create_project(&alice, project("Work")).await.unwrap();
    let owned = ctx.projects.get_project(&alice, p.id).await.unwrap();

    let empty = ctx.tasks.project_stats(&owned).await.unwrap();
    assert_eq!(empty.total, 0);
    assert!(empty.buckets.iter().all(|b| b.value == 0));

    ctx.tasks.create_task(&owned, task("a", None)).await.unwrap();
    ctx.tasks.create_task(&owned, task("b", Some(TaskStatus::Todo))).await.unwrap();
    ctx.tasks.create_task(&owned, task("c", Some(TaskStatus::Completed))).await.unwrap();

    let stats = ctx.tasks.project_stats(&owned).await.unwrap();
    let pairs: Vec<_> = stats.buckets.iter().map(|b| (b.name, b.value)).collect();
    assert_eq!(pairs, vec![("To Do", 2), ("In Progress", 0), ("Completed", 1)]);
}
