pub mod auth;
pub mod dashboard;
pub mod error;
pub mod middleware;
pub mod participants;
pub mod profile;
pub mod reactions;
pub mod rsvp;
pub mod wishes;

use axum::{
    Router, middleware as axum_middleware,
    routing::{delete, get, post},
};

use crate::auth::AppState;
use crate::middleware::{require_admin, require_auth};

/// Every route the service exposes. Transport layers (CORS, tracing) are
/// added by the binary.
pub fn router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/auth/login", post(auth::login))
        .route("/auth/register", post(auth::register))
        .route("/auth/admin/login", post(auth::admin_login))
        .route("/wishes", get(wishes::list_wishes))
        .route(
            "/wishes/{wish_id}/reactions",
            get(reactions::get_reactions).post(reactions::add_reaction),
        );

    let participant_routes = Router::new()
        .route("/me", get(profile::me).patch(profile::update_me))
        .route("/rsvp", post(rsvp::submit_rsvp))
        .route("/rsvp/me", get(rsvp::my_rsvp))
        .route("/wishes", post(wishes::post_wish))
        .route_layer(axum_middleware::from_fn_with_state(state.clone(), require_auth));

    let admin_routes = Router::new()
        .route(
            "/admin/participants",
            get(participants::list_participants)
                .post(participants::upsert_participant)
                .delete(participants::delete_participants),
        )
        .route("/admin/participants/import", post(participants::import_participants))
        .route("/admin/rsvps", get(participants::list_rsvps))
        .route("/admin/dashboard", get(dashboard::dashboard))
        .route("/admin/wishes/{wish_id}", delete(wishes::delete_wish))
        .route_layer(axum_middleware::from_fn(require_admin))
        .route_layer(axum_middleware::from_fn_with_state(state.clone(), require_auth));

    Router::new()
        .merge(public_routes)
        .merge(participant_routes)
        .merge(admin_routes)
        .with_state(state)
}
