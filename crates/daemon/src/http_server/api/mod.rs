use axum::routing::{get, post};
use axum::Router;

pub mod client;
pub mod files;

use crate::ServiceState;

pub fn router(state: ServiceState) -> Router<ServiceState> {
    Router::new()
        .route(
            "/files",
            get(files::list_root::handler).delete(files::delete::handler),
        )
        .route(
            "/files/:id",
            get(files::list_children::handler)
                .post(files::create::handler)
                .put(files::update::handler),
        )
        .route("/root", get(files::root::handler))
        .route("/nodes/:id", get(files::get::handler))
        .route("/info/:id", get(files::info::handler))
        .route("/direct", get(files::direct::handler))
        .route("/search", get(files::search::handler))
        .route(
            "/upload/:id",
            post(files::upload::create_handler).put(files::upload::replace_handler),
        )
        .with_state(state)
}
