//! Client against an in-process server on an ephemeral port.

use std::sync::Arc;

use hopeboard_client::{ApiClient, ApiOutcome, BoardSession, ClientError, SAVE_FAILED_MESSAGE};
use hopeboard_core::models::{LetterFilter, NewLetter, ResourceTag};
use hopeboard_core::{AddOutcome, Canvas, ElementType, Visibility};
use hopeboard_server::{build_router, AppState};
use tokio::net::TcpListener;

async fn spawn_server() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = build_router(Arc::new(AppState::in_memory()), false);
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

#[tokio::test]
async fn health_and_login() {
    let base = spawn_server().await;
    let mut client = ApiClient::new(&base).unwrap();

    let health = client.health().await.unwrap();
    assert_eq!(health.status, "OK");
    assert_eq!(health.counts.letters, 1);

    assert_eq!(client.check_auth().await.unwrap(), None);

    let login = client.login("ava", "pw").await.unwrap();
    assert_eq!(client.token(), Some(login.token.as_str()));
    let me = client.check_auth().await.unwrap().unwrap();
    assert_eq!(me.id, login.user.id);

    let mut stranger = ApiClient::new(&base).unwrap();
    let err = stranger.login("ava", "nope").await.unwrap_err();
    assert!(matches!(err, ClientError::Unauthorized { .. }));

    client.logout().await.unwrap();
    assert_eq!(client.token(), None);
    let stale = ApiClient::new(&base).unwrap().with_token(Some(login.token));
    assert_eq!(stale.check_auth().await.unwrap(), None);
}

#[tokio::test]
async fn board_session_round_trip() {
    let base = spawn_server().await;
    let mut owner = ApiClient::new(&base).unwrap();
    owner.login("ava", "pw").await.unwrap();

    let mut session = BoardSession::create(&owner, Some("Trip Notes"), Canvas::default())
        .await
        .unwrap();
    let id = session.id();
    {
        let editor = session.editor_mut();
        assert!(editor.is_editable());
        let AddOutcome::Added(_) = editor.add(ElementType::Sticker).unwrap() else {
            panic!("stickers are added inline");
        };
        editor.set_visibility(Visibility::Public).unwrap();
    }
    let saved = session.save(&owner).await.unwrap();
    // Welcome element plus the sticker
    assert_eq!(saved.elements.len(), 2);
    assert!(saved.is_public());

    let reopened = BoardSession::open(&owner, id, true, Canvas::default()).await.unwrap();
    assert!(reopened.editor().is_editable());
    assert_eq!(reopened.editor().elements().len(), 2);

    let mut other = ApiClient::new(&base).unwrap();
    other.login("ben", "pw").await.unwrap();
    let mut viewer = BoardSession::open(&other, id, true, Canvas::default()).await.unwrap();
    assert!(!viewer.editor().is_editable());
    let err = viewer.save(&other).await.unwrap_err();
    assert_eq!(err.to_string(), SAVE_FAILED_MESSAGE);

    let share = reopened.editor().board().share_token.clone();
    let anon = ApiClient::new(&base).unwrap();
    let shared = BoardSession::open_shared(&anon, &share, Canvas::default()).await.unwrap();
    assert_eq!(shared.id(), id);
    assert_eq!(anon.public_boards().await.unwrap().len(), 1);
    assert!(anon.user_boards().await.unwrap().is_empty());
}

#[tokio::test]
async fn save_rejected_by_server_surfaces_generic_message() {
    let base = spawn_server().await;
    let mut owner = ApiClient::new(&base).unwrap();
    owner.login("ava", "pw").await.unwrap();
    let mut session = BoardSession::create(&owner, None, Canvas::default()).await.unwrap();

    // Token revoked between open and save
    let mut revoker = owner.clone();
    revoker.logout().await.unwrap();

    let err = session.save(&owner).await.unwrap_err();
    assert_eq!(err.to_string(), SAVE_FAILED_MESSAGE);
    assert!(matches!(err.cause, ClientError::Unauthorized { .. }));
}

#[tokio::test]
async fn letters_and_resources() {
    let base = spawn_server().await;
    let client = ApiClient::new(&base).unwrap();

    let letter = client
        .create_letter(&NewLetter {
            recipient: Some("Future me".into()),
            category: Some("encouragement".into()),
            message: "You made it through".into(),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(client.like_letter(letter.id).await.unwrap(), 1);

    let found = client
        .letters(&LetterFilter {
            search: Some("future".into()),
            category: None,
        })
        .await
        .unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].likes, 1);

    let missing = client.like_letter(uuid::Uuid::new_v4()).await.unwrap_err();
    assert!(missing.is_not_found());

    let outcome: ApiOutcome<_> = client.resources(Some(ResourceTag::SelfCare)).await.into();
    assert!(outcome.success);
    assert_eq!(outcome.data.unwrap()[0].title, "Mindful Breathing");
}

#[tokio::test]
async fn unreachable_server_is_a_network_error() {
    let client = ApiClient::new("http://127.0.0.1:9").unwrap();
    let err = client.health().await.unwrap_err();
    assert!(matches!(err, ClientError::Network(_)));
}
