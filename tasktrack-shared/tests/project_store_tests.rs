/// Integration tests for owner-scoped project access
///
/// Run with: cargo test --test project_store_tests

mod common;

use common::{project, task, TestContext};
use tasktrack_shared::error::{CoreError, Resource};
use tasktrack_shared::policy::{Policies, ProjectDeletePolicy};
use uuid::Uuid;

#[tokio::test]
async fn test_list_returns_only_own_projects() {
    let ctx = TestContext::new();
    let alice = ctx.user("alice@example.com").await;
    let bob = ctx.user("bob@example.com").await;

    ctx.projects.create_project(&alice, project("Alpha")).await.unwrap();
    ctx.projects.create_project(&bob, project("Bravo")).await.unwrap();
    ctx.projects.create_project(&alice, project("Charlie")).await.unwrap();

    let listed = ctx.projects.list_projects(&alice).await.unwrap();
    assert_eq!(listed.len(), 2);
    assert!(listed.iter().all(|p| p.user_id == alice.user_id));

    let titles: Vec<_> = listed.iter().map(|p| p.title.as_str()).collect();
    assert_eq!(titles, vec!["Alpha", "Charlie"]);
}

#[tokio::test]
async fn test_list_empty_is_not_an_error() {
    let ctx = TestContext::new();
    let alice = ctx.user("alice@example.com").await;

    assert!(ctx.projects.list_projects(&alice).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_fifth_project_exceeds_quota() {
    let ctx = TestContext::new();
    let alice = ctx.user("alice@example.com").await;

    let mut created = Vec::new();
    for title in ["P1", "P2", "P3", "P4"] {
        created.push(ctx.projects.create_project(&alice, project(title)).await.unwrap());
    }

    let err = ctx
        .projects
        .create_project(&alice, project("P5"))
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::QuotaExceeded { limit: 4, current: 4 }));

    // Existing projects untouched
    let listed = ctx.projects.list_projects(&alice).await.unwrap();
    assert_eq!(listed, created);
}

#[tokio::test]
async fn test_quota_is_per_user() {
    let ctx = TestContext::new();
    let alice = ctx.user("alice@example.com").await;
    let bob = ctx.user("bob@example.com").await;

    for title in ["P1", "P2", "P3", "P4"] {
        ctx.projects.create_project(&alice, project(title)).await.unwrap();
    }

    assert!(ctx.projects.create_project(&bob, project("B1")).await.is_ok());
}

#[tokio::test]
async fn test_deleting_frees_quota() {
    let ctx = TestContext::new();
    let alice = ctx.user("alice@example.com").await;

    let mut ids = Vec::new();
    for title in ["P1", "P2", "P3", "P4"] {
        ids.push(ctx.projects.create_project(&alice, project(title)).await.unwrap().id);
    }

    ctx.projects.delete_project(&alice, ids[0]).await.unwrap();
    assert!(ctx.projects.create_project(&alice, project("P5")).await.is_ok());
}

#[tokio::test]
async fn test_foreign_and_missing_projects_look_the_same() {
    let ctx = TestContext::new();
    let alice = ctx.user("alice@example.com").await;
    let bob = ctx.user("bob@example.com").await;

    let bobs = ctx.projects.create_project(&bob, project("Bob's")).await.unwrap();

    let foreign = ctx.projects.get_project(&alice, bobs.id).await.unwrap_err();
    let missing = ctx.projects.get_project(&alice, Uuid::new_v4()).await.unwrap_err();

    assert!(matches!(foreign, CoreError::NotFound(Resource::Project)));
    assert!(matches!(missing, CoreError::NotFound(Resource::Project)));
    assert_eq!(foreign.to_string(), missing.to_string());

    // Bob still sees his own project
    let owned = ctx.projects.get_project(&bob, bobs.id).await.unwrap();
    assert_eq!(owned.id(), bobs.id);
}

#[tokio::test]
async fn test_delete_succeeds_exactly_once() {
    let ctx = TestContext::new();
    let alice = ctx.user("alice@example.com").await;
    let created = ctx.projects.create_project(&alice, project("Once")).await.unwrap();

    let deleted = ctx.projects.delete_project(&alice, created.id).await.unwrap();
    assert_eq!(deleted.project_id, created.id);

    let err = ctx.projects.delete_project(&alice, created.id).await.unwrap_err();
    assert!(matches!(err, CoreError::NotFound(Resource::Project)));
}

#[tokio::test]
async fn test_cannot_delete_foreign_project() {
    let ctx = TestContext::new();
    let alice = ctx.user("alice@example.com").await;
    let bob = ctx.user("bob@example.com").await;
    let bobs = ctx.projects.create_project(&bob, project("Keep")).await.unwrap();

    let err = ctx.projects.delete_project(&alice, bobs.id).await.unwrap_err();
    assert!(matches!(err, CoreError::NotFound(Resource::Project)));

    assert!(ctx.projects.get_project(&bob, bobs.id).await.is_ok());
}

#[tokio::test]
async fn test_orphan_policy_leaves_tasks() {
    let ctx = TestContext::new();
    let alice = ctx.user("alice@example.com").await;
    let created = ctx.projects.create_project(&alice, project("Orphan")).await.unwrap();
    let owned = ctx.projects.get_project(&alice, created.id).await.unwrap();
    let t = ctx.tasks.create_task(&owned, task("left behind", None)).await.unwrap();

    let deleted = ctx.projects.delete_project(&alice, created.id).await.unwrap();
    assert_eq!(deleted.tasks_removed, 0);
    assert_eq!(ctx.repo.task_count_for_project(created.id).await, 1);

    // Orphaned tasks are unreachable
    let err = ctx.tasks.resolve_task_project(&alice, t.id).await.unwrap_err();
    assert!(matches!(err, CoreError::NotFound(Resource::Task)));
}

#[tokio::test]
async fn test_cascade_policy_removes_tasks() {
    let ctx = TestContext::with_policies(Policies {
        project_delete: ProjectDeletePolicy::Cascade,
        ..Default::default()
    });
    let alice = ctx.user("alice@example.com").await;
    let created = ctx.projects.create_project(&alice, project("Cascade")).await.unwrap();
    let owned = ctx.projects.get_project(&alice, created.id).await.unwrap();
    ctx.tasks.create_task(&owned, task("one", None)).await.unwrap();
    ctx.tasks.create_task(&owned, task("two", None)).await.unwrap();

    let deleted = ctx.projects.delete_project(&alice, created.id).await.unwrap();
    assert_eq!(deleted.tasks_removed, 2);
    assert_eq!(ctx.repo.task_count_for_project(created.id).await, 0);
}

#[tokio::test]
async fn test_restrict_policy_blocks_non_empty_project() {
    let ctx = TestContext::with_policies(Policies {
        project_delete: ProjectDeletePolicy::Restrict,
        ..Default::default()
    });
    let alice = ctx.user("alice@example.com").await;
    let created = ctx.projects.create_project(&alice, project("Restrict")).await.unwrap();
    let owned = ctx.projects.get_project(&alice, created.id).await.unwrap();
    let t = ctx.tasks.create_task(&owned, task("blocker", None)).await.unwrap();

    let err = ctx.projects.delete_project(&alice, created.id).await.unwrap_err();
    assert!(matches!(err, CoreError::HasDependents(1)));
    assert!(ctx.projects.get_project(&alice, created.id).await.is_ok());

    ctx.tasks.delete_task(&owned, t.id).await.unwrap();
    assert!(ctx.projects.delete_project(&alice, created.id).await.is_ok());
}
