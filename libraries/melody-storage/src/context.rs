use crate::{playlists, songs, tags, users};
use async_trait::async_trait;
use melody_core::{error::Result, storage::StorageContext, types::*};
use sqlx::SqlitePool;

/// Local storage context using `SQLite`
pub struct LocalStorageContext {
    pool: SqlitePool,
}

impl LocalStorageContext {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create the pool, run migrations and wrap the result
    pub async fn open(database_url: &str) -> Result<Self> {
        let pool = crate::create_pool(database_url).await?;
        crate::run_migrations(&pool)
            .await
            .map_err(|e| melody_core::MelodyError::storage(format!("Migration failed: {e}")))?;
        Ok(Self::new(pool))
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl StorageContext for LocalStorageContext {
    // Users
    async fn create_user(&self, user: CreateUser) -> Result<User> {
        users::create(&self.pool, user).await
    }

    async fn get_user(&self, id: UserId) -> Result<Option<User>> {
        users::get_by_id(&self.pool, id).await
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        users::get_by_email(&self.pool, email).await
    }

    async fn get_credentials_by_email(&self, email: &str) -> Result<Option<UserCredentials>> {
        users::get_credentials_by_email(&self.pool, email).await
    }

    async fn get_all_users(&self) -> Result<Vec<User>> {
        users::get_all(&self.pool).await
    }

    async fn search_users(&self, name: &str) -> Result<Vec<User>> {
        users::search_by_name(&self.pool, name).await
    }

    async fn update_user(&self, id: UserId, update: UpdateUser) -> Result<User> {
        users::update(&self.pool, id, update).await
    }

    async fn delete_user(&self, id: UserId) -> Result<()> {
        users::delete(&self.pool, id).await
    }

    // Songs
    async fn get_all_songs(&self) -> Result<Vec<Song>> {
        songs::get_all(&self.pool).await
    }

    async fn get_song(&self, id: SongId) -> Result<Option<Song>> {
        songs::get_by_id(&self.pool, id).await
    }

    async fn search_songs(&self, query: &str) -> Result<Vec<Song>> {
        songs::search(&self.pool, query).await
    }

    async fn search_songs_by_genres(&self, genres: &[String]) -> Result<Vec<Song>> {
        songs::search_by_genres(&self.pool, genres).await
    }

    async fn create_song(&self, song: CreateSong) -> Result<Song> {
        songs::create(&self.pool, song).await
    }

    async fn update_song(&self, id: SongId, update: UpdateSong) -> Result<Song> {
        songs::update(&self.pool, id, update).await
    }

    async fn delete_song(&self, id: SongId) -> Result<Song> {
        songs::delete(&self.pool, id).await
    }

    // Tags
    async fn get_all_tags(&self, kind: TagKind) -> Result<Vec<Tag>> {
        tags::get_all(&self.pool, kind).await
    }

    async fn find_tag(&self, kind: TagKind, name: &str) -> Result<Option<Tag>> {
        tags::find_by_name(&self.pool, kind, name).await
    }

    // Playlists
    async fn create_playlist(&self, playlist: CreatePlaylist) -> Result<Playlist> {
        playlists::create(&self.pool, playlist).await
    }

    async fn get_playlist(&self, id: PlaylistId) -> Result<Option<Playlist>> {
        playlists::get_by_id(&self.pool, id).await
    }

    async fn get_user_playlists(&self, user_id: UserId) -> Result<Vec<Playlist>> {
        playlists::get_user_playlists(&self.pool, user_id).await
    }

    async fn search_user_playlists(
        &self,
        user_id: UserId,
        query: &str,
        page: Page,
    ) -> Result<Vec<Playlist>> {
        playlists::search_user_playlists(&self.pool, user_id, query, page).await
    }

    async fn get_playlist_songs(&self, id: PlaylistId) -> Result<Vec<Song>> {
        playlists::get_songs(&self.pool, id).await
    }

    async fn search_playlist_songs(
        &self,
        id: PlaylistId,
        query: &str,
        page: Page,
    ) -> Result<Vec<Song>> {
        playlists::search_songs(&self.pool, id, query, page).await
    }

    async fn add_song_to_playlist(&self, playlist_id: PlaylistId, song_id: SongId) -> Result<()> {
        playlists::add_song(&self.pool, playlist_id, song_id).await
    }

    async fn remove_song_from_playlist(
        &self,
        playlist_id: PlaylistId,
        song_id: SongId,
    ) -> Result<()> {
        playlists::remove_song(&self.pool, playlist_id, song_id).await
    }

    async fn delete_playlist(&self, id: PlaylistId) -> Result<()> {
        playlists::delete(&self.pool, id).await
    }
}
