//! Communities, feed, mentorship and the learning hub.

mod common;

use connect_model::{ConnectError, Vote};
use connect_rbac::Role;
use connect_service::communities::{CommunityPostParams, CreateCommunityParams};
use connect_service::feed::{CommentParams, CreatePostParams, FeedParams};
use connect_service::learning::{
    CreateResourceParams, LearningPathParams, ParseResumeParams, ResourceListParams,
};
use connect_service::mentorship::{
    MentorListParams, MentorshipRequestParams, RespondParams, SendMessageParams,
};

use common::world;

fn community(name: &str) -> CreateCommunityParams {
    CreateCommunityParams {
        name: name.to_string(),
        description: Some("Everything about competitive programming".to_string()),
        banner: None,
    }
}

fn post(channel: Option<&str>, text: &str) -> CommunityPostParams {
    CommunityPostParams {
        channel: channel.map(str::to_string),
        text: text.to_string(),
    }
}

#[tokio::test]
async fn test_join_is_idempotent_and_leave_keeps_creator() {
    let w = world();
    let creator = w.user("Asha Verma", Role::Alumni).await;
    let student = w.user("Ravi Kumar", Role::Student).await;
    let created = w.services.communities.create(&creator, community("CP Club")).await.unwrap();
    assert!(created.is_member(creator.id));

    w.services.communities.join(&student, created.id).await.unwrap();
    let details = w.services.communities.join(&student, created.id).await.unwrap();
    assert_eq!(details.members_count, 2);

    let details = w.services.communities.leave(&student, created.id).await.unwrap();
    assert_eq!(details.members_count, 1);
    let details = w.services.communities.leave(&student, created.id).await.unwrap();
    assert_eq!(details.members_count, 1);

    let denied = w.services.communities.leave(&creator, created.id).await;
    assert!(matches!(denied, Err(ConnectError::InvalidState(_))));
}

#[tokio::test]
async fn test_posting_needs_membership_and_channel() {
    let w = world();
    let creator = w.user("Asha Verma", Role::Alumni).await;
    let student = w.user("Ravi Kumar", Role::Student).await;
    let c = w.services.communities.create(&creator, community("CP Club")).await.unwrap();

    let outsider = w.services.communities.post(&student, c.id, post(None, "Hello")).await;
    assert!(matches!(outsider, Err(ConnectError::Forbidden(_))));

    w.services.communities.join(&student, c.id).await.unwrap();
    let missing = w.services.communities.post(&student, c.id, post(Some("memes"), "Hi")).await;
    assert!(matches!(missing, Err(ConnectError::NotFound(_))));
    let blank = w.services.communities.post(&student, c.id, post(None, "   ")).await;
    assert!(matches!(blank, Err(ConnectError::ValidationFailed(_))));

    let details = w.services.communities.post(&student, c.id, post(None, "Hello all")).await.unwrap();
    assert_eq!(details.posts.len(), 1);
    assert_eq!(details.posts[0].post.channel, "general");
    assert_eq!(details.posts[0].author.as_ref().map(|a| a.id), Some(student.id));
}

#[tokio::test]
async fn test_feed_like_and_delete_rules() {
    let w = world();
    let author = w.user("Ravi Kumar", Role::Student).await;
    let other = w.user("Neha Singh", Role::Student).await;
    let admin = w.user("Admin", Role::Admin).await;

    let item = w
        .services
        .feed
        .create(
            &author,
            CreatePostParams {
                text: Some("Placed at Acme!".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    let id = item.post.id;

    w.services.feed.like(&other, id).await.unwrap();
    let liked = w.services.feed.like(&other, id).await.unwrap();
    assert_eq!(liked.likes_count, 1);
    let unliked = w.services.feed.unlike(&other, id).await.unwrap();
    assert_eq!(unliked.likes_count, 0);

    let commented = w
        .services
        .feed
        .comment(&other, id, CommentParams { text: "Congrats".to_string() })
        .await
        .unwrap();
    assert_eq!(commented.comments_count, 1);

    let denied = w.services.feed.delete(&other, id).await;
    assert!(matches!(denied, Err(ConnectError::Forbidden(_))));
    w.services.feed.delete(&admin, id).await.unwrap();
    assert!(w.services.feed.list(FeedParams::default()).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_empty_feed_post_rejected() {
    let w = world();
    let author = w.user("Ravi Kumar", Role::Student).await;
    let empty = w.services.feed.create(&author, CreatePostParams::default()).await;
    assert!(matches!(empty, Err(ConnectError::ValidationFailed(_))));
}

#[tokio::test]
async fn test_mentorship_request_lifecycle() {
    let w = world();
    let mentee = w.user("Ravi Kumar", Role::Student).await;
    let mentor = w.user("Asha Verma", Role::Alumni).await;
    let peer = w.user("Neha Singh", Role::Student).await;

    let mentors = w.services.mentorship.mentors(&mentee, MentorListParams::default()).await.unwrap();
    assert_eq!(mentors.len(), 1);
    assert_eq!(mentors[0].id, mentor.id);

    let to_student = w
        .services
        .mentorship
        .send_request(&mentee, MentorshipRequestParams { mentor_id: Some(peer.id), message: None })
        .await;
    assert!(matches!(to_student, Err(ConnectError::NotFound(_))));

    let to_self = w
        .services
        .mentorship
        .send_request(&mentor, MentorshipRequestParams { mentor_id: Some(mentor.id), message: None })
        .await;
    assert!(matches!(to_self, Err(ConnectError::ValidationFailed(_))));

    let ask = || MentorshipRequestParams {
        mentor_id: Some(mentor.id),
        message: Some("Guide me on system design".to_string()),
    };
    let request = w.services.mentorship.send_request(&mentee, ask()).await.unwrap();
    let duplicate = w.services.mentorship.send_request(&mentee, ask()).await.unwrap_err();
    assert!(matches!(duplicate, ConnectError::Conflict(_)));
    assert_eq!(
        duplicate.to_string(),
        "A mentorship request to this mentor is already pending"
    );

    let accept = || RespondParams { status: "accepted".to_string() };
    let denied = w.services.mentorship.respond(&mentee, request.request.id, accept()).await;
    assert!(matches!(denied, Err(ConnectError::Forbidden(_))));
    let answered = w.services.mentorship.respond(&mentor, request.request.id, accept()).await.unwrap();
    assert_eq!(answered.request.status.as_str(), "accepted");

    // The pair is free again once the pending request is answered.
    assert!(w.services.mentorship.send_request(&mentee, ask()).await.is_ok());
}

#[tokio::test]
async fn test_chat_is_oldest_first() {
    let w = world();
    let a = w.user("Ravi Kumar", Role::Student).await;
    let b = w.user("Asha Verma", Role::Alumni).await;
    let say = |text: &str| SendMessageParams { text: text.to_string() };

    w.services.mentorship.send_message(&a, b.id, say("Hi")).await.unwrap();
    w.services.mentorship.send_message(&b, a.id, say("Hello!")).await.unwrap();
    w.services.mentorship.send_message(&a, b.id, say("Got a minute?")).await.unwrap();

    let chat = w.services.mentorship.chat(&b, a.id).await.unwrap();
    let texts: Vec<&str> = chat.iter().map(|m| m.text.as_str()).collect();
    assert_eq!(texts, vec!["Hi", "Hello!", "Got a minute?"]);

    let blank = w.services.mentorship.send_message(&a, b.id, say("  ")).await;
    assert!(matches!(blank, Err(ConnectError::ValidationFailed(_))));
    let nobody = w.services.mentorship.send_message(&a, uuid::Uuid::now_v7(), say("Hi")).await;
    assert!(matches!(nobody, Err(ConnectError::NotFound(_))));
}

#[tokio::test]
async fn test_votes_are_exclusive() {
    let w = world();
    let user = w.user("Ravi Kumar", Role::Student).await;
    let resource = w
        .services
        .learning
        .create(
            &user,
            CreateResourceParams {
                title: "Rust Book".to_string(),
                url: "https://doc.rust-lang.org/book/".to_string(),
                skills: vec!["Rust".to_string()],
                ..Default::default()
            },
        )
        .await
        .unwrap();
    let id = resource.resource.id;

    w.services.learning.vote(&user, id, Vote::Up).await.unwrap();
    let up = w.services.learning.vote(&user, id, Vote::Up).await.unwrap();
    assert_eq!(up.score, 1);
    let down = w.services.learning.vote(&user, id, Vote::Down).await.unwrap();
    assert_eq!(down.score, -1);
    assert!(down.resource.upvotes.is_empty());

    let rust = ResourceListParams { skill: Some("rust".to_string()) };
    assert_eq!(w.services.learning.list(rust).await.len(), 1);
    let go = ResourceListParams { skill: Some("go".to_string()) };
    assert!(w.services.learning.list(go).await.is_empty());
}

#[tokio::test]
async fn test_ai_helpers_fall_back_when_offline() {
    let w = world();
    let user = w.user("Ravi Kumar", Role::Student).await;

    let analysis = w
        .services
        .learning
        .parse_resume(&user, ParseResumeParams { resume_text: "Rust, Go".to_string() })
        .await
        .unwrap();
    assert_eq!(analysis, connect_ai::ResumeAnalysis::fallback());

    let path = w
        .services
        .learning
        .learning_path(&user, LearningPathParams { goal_role: Some("SRE".to_string()) })
        .await
        .unwrap();
    assert_eq!(path, connect_ai::LearningPath::fallback());
}
