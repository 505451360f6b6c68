mod ids;
mod playlist;
mod song;
mod tag;
mod user;

pub use ids::{ArtistId, GenreId, Identity, Page, PlaylistId, Role, SongId, TagId, UserId};
pub use playlist::{CreatePlaylist, Playlist};
pub use song::{CreateSong, Song, UpdateSong};
pub use tag::{Tag, TagKind};
pub use user::{CreateUser, UpdateUser, User, UserCredentials};
