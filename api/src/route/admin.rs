use axum::{
    routing::{get, post, put},
    Router,
};
use registry::AppRegistry;

use crate::handler::admin::{
    approve_user, book_space_for_user, create_user, list_users, reject_user, request_picture,
    update_user,
};

pub fn build_admin_routers() -> Router<AppRegistry> {
    // The first segment is a user id on the account routes and an event id
    // on book-for-user; it has to carry one name for the router.
    let user_routers = Router::new()
        .route("/", get(list_users))
        .route("/", post(create_user))
        .route("/:id", put(update_user))
        .route("/:id/approve", post(approve_user))
        .route("/:id/reject", post(reject_user))
        .route("/:id/request-picture", post(request_picture))
        .route("/:id/:space_id/book-for-user", post(book_space_for_user));

    Router::new().nest("/admin/users", user_routers)
}
