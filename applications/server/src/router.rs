/// HTTP router assembly
use crate::{api, middleware, state::AppState};
use axum::{
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, TraceLayer},
};

/// Build the full application router with every route nested under `/api`
pub fn create_router(app_state: AppState, max_body_bytes: usize) -> Router {
    let auth_routes = Router::new()
        .route("/register", post(api::auth::register))
        .route("/login", post(api::auth::login));

    let user_routes = Router::new()
        .route("/", get(api::users::list_users))
        .route("/search", get(api::users::search_users))
        .route(
            "/:id",
            get(api::users::get_user)
                .put(api::users::update_user)
                .delete(api::users::delete_user),
        );

    let song_routes = Router::new()
        .route(
            "/",
            get(api::songs::list_songs).post(api::songs::create_song),
        )
        .route("/search", get(api::songs::search_songs))
        .route(
            "/search-by-genres",
            get(api::songs::search_songs_by_genres),
        )
        .route("/stream/:id", get(api::stream::stream_song))
        .route(
            "/:id",
            get(api::songs::get_song)
                .put(api::songs::update_song)
                .delete(api::songs::delete_song),
        );

    let playlist_routes = Router::new()
        .route(
            "/",
            get(api::playlists::list_playlists).post(api::playlists::create_playlist),
        )
        .route("/search", get(api::playlists::search_playlists))
        .route(
            "/songs",
            post(api::playlists::add_song_to_playlist)
                .delete(api::playlists::remove_song_from_playlist),
        )
        .route("/:id", axum::routing::delete(api::playlists::delete_playlist))
        .route("/:id/songs", get(api::playlists::get_playlist_songs))
        .route(
            "/:id/songs/search",
            get(api::playlists::search_playlist_songs),
        );

    let api_routes = Router::new()
        .route("/health", get(api::health::health))
        .nest("/auth", auth_routes)
        .nest("/users", user_routes)
        .nest("/songs", song_routes)
        .nest("/playlists", playlist_routes)
        .layer(axum_middleware::from_fn_with_state(
            Arc::clone(&app_state.auth_service),
            middleware::identity_middleware,
        ));

    Router::new()
        .nest("/api", api_routes)
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::default().include_headers(true)),
        )
        .layer(CorsLayer::permissive())
        .with_state(app_state)
}
