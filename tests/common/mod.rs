//! Test helpers for REST API tests.
//!
//! Provides an in-memory server wired to a canned page source, and token
//! helpers standing in for the external identity provider.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum_test::TestServer;
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::json;

use ytshelf::config::{FeedCacheConfig, YoutubeConfig};
use ytshelf::web::handlers::AppState;
use ytshelf::web::middleware::JwtState;
use ytshelf::web::router::{create_health_router, create_router};
use ytshelf::youtube::{feed_url, FetchError, PageSource};
use ytshelf::Database;

pub const JWT_SECRET: &str = "test-secret-key-for-testing-only";
pub const BASE_URL: &str = "https://yt.test";
pub const ALICE: &str = "alice@example.com";
pub const BOB: &str = "bob@example.com";

/// Page source answering from a mutable URL map. Unknown URLs return 404.
#[derive(Default)]
pub struct FakeYoutube {
    pages: Mutex<HashMap<String, Result<String, FetchError>>>,
    requests: AtomicUsize,
}

impl FakeYoutube {
    pub fn set_page(&self, url: &str, body: &str) {
        self.pages
            .lock()
            .unwrap()
            .insert(url.to_string(), Ok(body.to_string()));
    }

    pub fn set_feed(&self, channel_id: &str, body: &str) {
        self.set_page(&feed_url(BASE_URL, channel_id), body);
    }

    pub fn fail_feed(&self, channel_id: &str, status: u16) {
        self.pages.lock().unwrap().insert(
            feed_url(BASE_URL, channel_id),
            Err(FetchError::Status(status)),
        );
    }

    pub fn request_count(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PageSource for FakeYoutube {
    async fn get_text(&self, url: &str, _user_agent: Option<&str>) -> Result<String, FetchError> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        self.pages
            .lock()
            .unwrap()
            .get(url)
            .cloned()
            .unwrap_or(Err(FetchError::Status(404)))
    }
}

/// Server plus handles to its collaborators.
pub struct TestContext {
    pub server: TestServer,
    pub youtube: Arc<FakeYoutube>,
    pub db: Database,
}

/// Create a test server with an in-memory database and a fake provider.
pub async fn create_test_server() -> TestContext {
    let db = Database::open_in_memory()
        .await
        .expect("Failed to create test database");
    let youtube = Arc::new(FakeYoutube::default());

    let youtube_config = YoutubeConfig {
        base_url: BASE_URL.to_string(),
        ..YoutubeConfig::default()
    };
    let app_state = Arc::new(AppState::with_source(
        db.clone(),
        youtube.clone(),
        &youtube_config,
        &FeedCacheConfig::default(),
    ));
    let jwt_state = Arc::new(JwtState::new(JWT_SECRET));

    let router = create_router(app_state, jwt_state, &[]).merge(create_health_router());
    let server = TestServer::new(router).expect("Failed to create test server");

    TestContext {
        server,
        youtube,
        db,
    }
}

/// Bearer header value for a user, as the identity provider would issue it.
pub fn bearer(email: &str) -> String {
    let claims = json!({
        "sub": email,
        "email": email,
        "iat": chrono::Utc::now().timestamp(),
        "exp": chrono::Utc::now().timestamp() + 3600,
    });
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(JWT_SECRET.as_bytes()),
    )
    .expect("Failed to encode token");
    format!("Bearer {}", token)
}

/// A well-formed channel ID built from one repeated character.
pub fn channel_id(c: char) -> String {
    format!("UC{}", c.to_string().repeat(22))
}

/// Channel feed with `(video_id, published)` entries.
pub fn feed_xml(title: &str, entries: &[(&str, &str)]) -> String {
    let mut body = String::new();
    for (video_id, published) in entries {
        body.push_str(&format!(
            r#"<entry>
  <id>yt:video:{id}</id>
  <title>Video {id}</title>
  <published>{published}</published>
  <media:group>
    <media:thumbnail url="https://i1.ytimg.com/vi/{id}/hqdefault.jpg" width="480" height="360"/>
    <media:description>About {id}</media:description>
  </media:group>
</entry>"#,
            id = video_id,
            published = published
        ));
    }
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<feed xmlns:yt="http://www.youtube.com/xml/schemas/2015" xmlns:media="http://search.yahoo.com/mrss/" xmlns="http://www.w3.org/2005/Atom">
<title>{}</title>
{}
</feed>"#,
        title, body
    )
}

/// Add a channel by its `/channel/` URL and return the response body.
pub async fn add_channel(ctx: &TestContext, user: &str, id: &str, title: &str) -> serde_json::Value {
    ctx.youtube.set_feed(id, &feed_xml(title, &[]));
    let response = ctx
        .server
        .post("/api/channels")
        .add_header(
            axum::http::header::AUTHORIZATION,
            axum::http::HeaderValue::from_str(&bearer(user)).unwrap(),
        )
        .json(&json!({ "url": format!("https://www.youtube.com/channel/{}", id) }))
        .await;
    response.assert_status(axum::http::StatusCode::CREATED);
    response.json()
}

/// Create a category and return its ID.
pub async fn create_category(ctx: &TestContext, user: &str, name: &str) -> i64 {
    let response = ctx
        .server
        .post("/api/categories")
        .add_header(
            axum::http::header::AUTHORIZATION,
            axum::http::HeaderValue::from_str(&bearer(user)).unwrap(),
        )
        .json(&json!({ "name": name }))
        .await;
    response.assert_status(axum::http::StatusCode::CREATED);
    response.json::<serde_json::Value>()["data"]["id"]
        .as_i64()
        .unwrap()
}
