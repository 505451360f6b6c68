//! Storage trait consumed by the HTTP layer

use crate::error::Result;
use crate::types::{
    CreatePlaylist, CreateSong, CreateUser, Page, Playlist, PlaylistId, Song, SongId, Tag,
    TagKind, UpdateSong, UpdateUser, User, UserCredentials, UserId,
};
use async_trait::async_trait;

/// Storage context providing access to database operations
///
/// Implementations carry no caller identity: authorization is decided by
/// the caller before reaching storage, with ids passed explicitly.
#[async_trait]
pub trait StorageContext: Send + Sync {
    // ========================================================================
    // Users
    // ========================================================================

    /// Create a new user. Fails with `Duplicate` if the email is taken.
    async fn create_user(&self, user: CreateUser) -> Result<User>;

    async fn get_user(&self, id: UserId) -> Result<Option<User>>;

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>>;

    /// User plus stored password hash, for login
    async fn get_credentials_by_email(&self, email: &str) -> Result<Option<UserCredentials>>;

    async fn get_all_users(&self) -> Result<Vec<User>>;

    /// Substring match on display name
    async fn search_users(&self, name: &str) -> Result<Vec<User>>;

    /// Apply a partial update. Fails with `NotFound` for an unknown id.
    async fn update_user(&self, id: UserId, update: UpdateUser) -> Result<User>;

    /// Delete a user; owned playlists cascade
    async fn delete_user(&self, id: UserId) -> Result<()>;

    // ========================================================================
    // Songs
    // ========================================================================

    async fn get_all_songs(&self) -> Result<Vec<Song>>;

    async fn get_song(&self, id: SongId) -> Result<Option<Song>>;

    /// Substring match on title or any linked artist name
    async fn search_songs(&self, query: &str) -> Result<Vec<Song>>;

    /// Songs linked to at least one of the given genre names
    async fn search_songs_by_genres(&self, genres: &[String]) -> Result<Vec<Song>>;

    /// Insert a song and link its tags in one transaction
    async fn create_song(&self, song: CreateSong) -> Result<Song>;

    /// Update title and/or replace tag sets in one transaction
    async fn update_song(&self, id: SongId, update: UpdateSong) -> Result<Song>;

    /// Delete a song and return the removed row so its blob can be unlinked
    async fn delete_song(&self, id: SongId) -> Result<Song>;

    // ========================================================================
    // Tags
    // ========================================================================

    async fn get_all_tags(&self, kind: TagKind) -> Result<Vec<Tag>>;

    async fn find_tag(&self, kind: TagKind, name: &str) -> Result<Option<Tag>>;

    // ========================================================================
    // Playlists
    // ========================================================================

    async fn create_playlist(&self, playlist: CreatePlaylist) -> Result<Playlist>;

    async fn get_playlist(&self, id: PlaylistId) -> Result<Option<Playlist>>;

    /// Playlists owned by a user, newest first
    async fn get_user_playlists(&self, user_id: UserId) -> Result<Vec<Playlist>>;

    async fn search_user_playlists(
        &self,
        user_id: UserId,
        query: &str,
        page: Page,
    ) -> Result<Vec<Playlist>>;

    /// Songs of a playlist in the order they were added
    async fn get_playlist_songs(&self, id: PlaylistId) -> Result<Vec<Song>>;

    async fn search_playlist_songs(
        &self,
        id: PlaylistId,
        query: &str,
        page: Page,
    ) -> Result<Vec<Song>>;

    /// Fails with `Duplicate` if the song is already in the playlist
    async fn add_song_to_playlist(&self, playlist_id: PlaylistId, song_id: SongId) -> Result<()>;

    /// Fails with `NotFound` if the song is not in the playlist
    async fn remove_song_from_playlist(
        &self,
        playlist_id: PlaylistId,
        song_id: SongId,
    ) -> Result<()>;

    async fn delete_playlist(&self, id: PlaylistId) -> Result<()>;
}
