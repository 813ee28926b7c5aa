use std::sync::Arc;

use board_server::application::comment_service::CommentService;
use board_server::application::post_service::PostService;
use board_server::data::memory::MemoryRepository;
use board_server::data::repository::ContentRepository;
use board_server::domain::error::DomainError;

fn setup() -> (
    Arc<MemoryRepository>,
    Arc<PostService<MemoryRepository>>,
    Arc<CommentService<MemoryRepository>>,
) {
    let repo = Arc::new(MemoryRepository::new());
    let posts = Arc::new(PostService::new(Arc::clone(&repo)));
    let comments = Arc::new(CommentService::new(Arc::clone(&repo)));
    (repo, posts, comments)
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn fifty_concurrent_creations_do_not_lose_counter_updates() {
    let (repo, posts, comments) = setup();
    let post = posts.create_post("Concurrency".into()).await.unwrap();

    let mut handles = Vec::new();
    for i in 0..50 {
        let comments = Arc::clone(&comments);
        let post_id = post.id;
        handles.push(tokio::spawn(async move {
            comments
                .create_comment(post_id, format!("author-{i}"), "A comment".into())
                .await
                .unwrap();
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    let post = posts.get_post(post.id).await.unwrap();
    assert_eq!(post.comments_count, 50);
    assert_eq!(repo.list_comments(post.id).await.unwrap().len(), 50);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn two_concurrent_creations_then_one_deletion_leave_count_at_one() {
    let (_repo, posts, comments) = setup();
    let post = posts.create_post("Race then delete".into()).await.unwrap();

    let a = {
        let comments = Arc::clone(&comments);
        let post_id = post.id;
        tokio::spawn(async move {
            comments
                .create_comment(post_id, "alice".into(), "first".into())
                .await
                .unwrap()
        })
    };
    let b = {
        let comments = Arc::clone(&comments);
        let post_id = post.id;
        tokio::spawn(async move {
            comments
                .create_comment(post_id, "bob".into(), "second".into())
                .await
                .unwrap()
        })
    };
    let first = a.await.unwrap();
    let _second = b.await.unwrap();

    comments.delete_comment(post.id, first.id).await.unwrap();

    let post = posts.get_post(post.id).await.unwrap();
    assert_eq!(post.comments_count, 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn counter_matches_live_count_after_a_mixed_workload() {
    let (repo, posts, comments) = setup();
    let grows = posts.create_post("grows".into()).await.unwrap();
    let churns = posts.create_post("churns".into()).await.unwrap();
    let edited = posts.create_post("edited".into()).await.unwrap();

    // Comments that the workload below deletes while new ones are created.
    let mut doomed = Vec::new();
    for i in 0..5 {
        let comment = comments
            .create_comment(churns.id, format!("early-{i}"), "to be removed".into())
            .await
            .unwrap();
        doomed.push(comment.id);
    }
    let mut kept = Vec::new();
    for i in 0..3 {
        let comment = comments
            .create_comment(edited.id, format!("keeper-{i}"), "to be edited".into())
            .await
            .unwrap();
        kept.push(comment.id);
    }

    let mut handles = Vec::new();
    for i in 0..10 {
        let comments = Arc::clone(&comments);
        let post_id = grows.id;
        handles.push(tokio::spawn(async move {
            comments
                .create_comment(post_id, format!("grower-{i}"), "new".into())
                .await
                .map(|_| ())
        }));
    }
    for id in doomed {
        let comments = Arc::clone(&comments);
        let post_id = churns.id;
        handles.push(tokio::spawn(
            async move { comments.delete_comment(post_id, id).await },
        ));
    }
    for i in 0..7 {
        let comments = Arc::clone(&comments);
        let post_id = churns.id;
        handles.push(tokio::spawn(async move {
            comments
                .create_comment(post_id, format!("late-{i}"), "replacement".into())
                .await
                .map(|_| ())
        }));
    }
    for id in kept {
        let comments = Arc::clone(&comments);
        let post_id = edited.id;
        handles.push(tokio::spawn(async move {
            comments
                .update_comment(
                    post_id,
                    id,
                    board_server::domain::comment::CommentUpdate {
                        author: None,
                        content: Some("edited".into()),
                    },
                )
                .await
                .map(|_| ())
        }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    for post in repo.list_posts().await.unwrap() {
        let live = repo.list_comments(post.id).await.unwrap().len() as i64;
        assert_eq!(
            post.comments_count, live,
            "post {} counter diverged from its live comment count",
            post.id
        );
    }
    assert_eq!(posts.get_post(grows.id).await.unwrap().comments_count, 10);
    assert_eq!(posts.get_post(churns.id).await.unwrap().comments_count, 7);
    assert_eq!(posts.get_post(edited.id).await.unwrap().comments_count, 3);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn deleting_a_post_removes_every_owned_comment() {
    let (repo, posts, comments) = setup();
    let post = posts.create_post("doomed".into()).await.unwrap();
    for i in 0..4 {
        comments
            .create_comment(post.id, format!("author-{i}"), "gone soon".into())
            .await
            .unwrap();
    }

    posts.delete_post(post.id).await.unwrap();

    assert!(matches!(
        posts.get_post(post.id).await,
        Err(DomainError::PostNotFound(_))
    ));
    assert!(repo.list_comments(post.id).await.unwrap().is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn post_deletion_racing_comment_creation_leaves_no_orphans() {
    let (repo, posts, comments) = setup();
    let post = posts.create_post("contested".into()).await.unwrap();

    let mut handles = Vec::new();
    for i in 0..10 {
        let comments = Arc::clone(&comments);
        let post_id = post.id;
        handles.push(tokio::spawn(async move {
            // Losing the race to the cascade is expected here.
            let _ = comments
                .create_comment(post_id, format!("racer-{i}"), "maybe".into())
                .await;
        }));
    }
    {
        let posts = Arc::clone(&posts);
        let post_id = post.id;
        handles.push(tokio::spawn(async move {
            posts.delete_post(post_id).await.unwrap();
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    assert!(matches!(
        posts.get_post(post.id).await,
        Err(DomainError::PostNotFound(_))
    ));
    assert!(repo.list_comments(post.id).await.unwrap().is_empty());
}
