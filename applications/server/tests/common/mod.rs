//! Common test utilities and fixtures
#![allow(dead_code)]

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, Response},
    Router,
};
use melody_core::{storage::StorageContext, CreateSong, CreateUser, Identity, Role, Song, User};
use melody_server::{
    create_router,
    services::{AuthService, BlobSource, FileStorage},
    state::AppState,
};
use melody_storage::{Database, LocalStorageContext};
use std::sync::Arc;
use tempfile::TempDir;
use tower::util::ServiceExt;

pub const TEST_SECRET: &str = "test-secret-key";
pub const TEST_PASSWORD: &str = "Passw0rd";
pub const MULTIPART_BOUNDARY: &str = "melody-test-boundary";

/// Router plus handles onto everything behind it
pub struct TestApp {
    pub router: Router,
    pub db: Arc<Database>,
    pub auth_service: Arc<AuthService>,
    pub storage: Arc<FileStorage>,
    _db_dir: TempDir,
    _media_dir: TempDir,
}

impl TestApp {
    /// Fresh app on a temp-file database (not `:memory:`, the pool holds
    /// several connections) and a temp media directory
    pub async fn new() -> Self {
        Self::with_chunk_size(4096).await
    }

    pub async fn with_chunk_size(chunk_size: usize) -> Self {
        let db_dir = TempDir::new().unwrap();
        let db_url = format!("sqlite://{}", db_dir.path().join("test.db").display());
        let db = Arc::new(LocalStorageContext::open(&db_url).await.unwrap());

        let media_dir = TempDir::new().unwrap();
        let storage = Arc::new(FileStorage::new(media_dir.path().to_path_buf()));
        storage.initialize().await.unwrap();

        // Minimum bcrypt cost keeps tests fast
        let auth_service = Arc::new(AuthService::new(TEST_SECRET.to_string(), 1, 4));

        let blobs: Arc<dyn BlobSource> = storage.clone();
        let app_state = AppState::new(db.clone(), Arc::clone(&auth_service), blobs, chunk_size);

        Self {
            router: create_router(app_state, 10 * 1024 * 1024),
            db,
            auth_service,
            storage,
            _db_dir: db_dir,
            _media_dir: media_dir,
        }
    }

    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.router.clone().oneshot(request).await.unwrap()
    }

    /// Insert a user directly and return it with a valid token
    pub async fn seed_user(&self, email: &str, role: Role) -> (User, String) {
        let user = self
            .db
            .create_user(CreateUser {
                email: email.to_string(),
                password_hash: self.auth_service.hash_password(TEST_PASSWORD).unwrap(),
                name: email.split('@').next().unwrap_or(email).to_string(),
                date_of_birth: "1995-06-15".to_string(),
                role,
            })
            .await
            .unwrap();
        let token = self.token_for(&user.identity());
        (user, token)
    }

    pub fn token_for(&self, identity: &Identity) -> String {
        self.auth_service.create_token(identity).unwrap()
    }

    /// Store a media blob and a song row pointing at it
    pub async fn seed_song(&self, title: &str, data: &[u8], genres: &[&str], artists: &[&str]) -> Song {
        let locator = self.storage.store("mp3", data).await.unwrap();
        self.db
            .create_song(CreateSong {
                title: title.to_string(),
                file_path: locator,
                genres: genres.iter().map(|s| (*s).to_string()).collect(),
                artists: artists.iter().map(|s| (*s).to_string()).collect(),
            })
            .await
            .unwrap()
    }

    /// Number of files in the media directory
    pub fn media_file_count(&self) -> usize {
        std::fs::read_dir(self.storage.base_path()).unwrap().count()
    }
}

pub fn get(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::empty()).unwrap()
}

pub fn json_request(
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: &serde_json::Value,
) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

pub fn delete(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("DELETE").uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::empty()).unwrap()
}

/// Build a multipart/form-data upload with text fields and one optional file
pub fn multipart_upload(
    token: &str,
    fields: &[(&str, &str)],
    file: Option<(&str, &[u8])>,
) -> Request<Body> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{MULTIPART_BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    if let Some((file_name, data)) = file {
        body.extend_from_slice(
            format!(
                "--{MULTIPART_BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{file_name}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{MULTIPART_BOUNDARY}--\r\n").as_bytes());

    Request::builder()
        .method("POST")
        .uri("/api/songs")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={MULTIPART_BOUNDARY}"),
        )
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::from(body))
        .unwrap()
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}
