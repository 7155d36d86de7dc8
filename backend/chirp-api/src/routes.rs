//! Route configuration
//!
//! Centralized route setup: public health and auth endpoints first, then the
//! authenticated `/api/v1` scope. Each domain manages its own routes.

use actix_web::web;

use crate::handlers;
use crate::middleware::JwtAuthMiddleware;

/// Configure all routes for the application
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg
        // Health endpoints stay outside authentication
        .route("/api/v1/health", web::get().to(handlers::health::health_check))
        .route(
            "/api/v1/health/ready",
            web::get().to(handlers::health::readiness_check),
        )
        .route(
            "/api/v1/health/live",
            web::get().to(handlers::health::liveness_check),
        )
        .service(
            web::scope("/api/v1/auth")
                .route("/register", web::post().to(handlers::auth::register))
                .route("/login", web::post().to(handlers::auth::login))
                .route("/refresh", web::post().to(handlers::auth::refresh))
                .service(
                    web::resource("/logout")
                        .wrap(JwtAuthMiddleware)
                        .route(web::post().to(handlers::auth::logout)),
                ),
        )
        .service(
            web::scope("/api/v1")
                .wrap(JwtAuthMiddleware)
                .configure(routes::users::configure)
                .configure(routes::posts::configure)
                .configure(routes::comments::configure)
                .configure(routes::follows::configure)
                .configure(routes::feed::configure)
                .configure(routes::notifications::configure),
        );
}

// Sub-modules for each domain
mod routes {
    use super::*;

    pub mod users {
        use super::*;
        pub fn configure(cfg: &mut web::ServiceConfig) {
            cfg.service(
                web::scope("/users")
                    .route("", web::get().to(handlers::users::list_users))
                    .route(
                        "/{id}/followers",
                        web::get().to(handlers::users::get_followers),
                    )
                    .route(
                        "/{id}/following",
                        web::get().to(handlers::users::get_following),
                    )
                    .service(
                        web::resource("/{id}")
                            .route(web::get().to(handlers::users::get_user))
                            .route(web::patch().to(handlers::users::update_profile))
                            .route(web::delete().to(handlers::users::delete_user)),
                    ),
            );
        }
    }

    pub mod posts {
        use super::*;
        pub fn configure(cfg: &mut web::ServiceConfig) {
            cfg.service(
                web::scope("/posts")
                    .service(
                        web::resource("")
                            .route(web::post().to(handlers::posts::create_post))
                            .route(web::get().to(handlers::posts::list_posts)),
                    )
                    .route(
                        "/user/{user_id}",
                        web::get().to(handlers::posts::get_user_posts),
                    )
                    .route("/{post_id}/like", web::post().to(handlers::likes::like_post))
                    .route(
                        "/{post_id}/unlike",
                        web::post().to(handlers::likes::unlike_post),
                    )
                    .service(
                        web::resource("/{post_id}/comments")
                            .route(web::post().to(handlers::comments::create_comment))
                            .route(web::get().to(handlers::comments::list_comments)),
                    )
                    .service(
                        web::resource("/{post_id}")
                            .route(web::get().to(handlers::posts::get_post))
                            .route(web::patch().to(handlers::posts::update_post))
                            .route(web::delete().to(handlers::posts::delete_post)),
                    ),
            );
        }
    }

    pub mod comments {
        use super::*;
        pub fn configure(cfg: &mut web::ServiceConfig) {
            cfg.service(
                web::scope("/comments").service(
                    web::resource("/{comment_id}")
                        .route(web::patch().to(handlers::comments::update_comment))
                        .route(web::delete().to(handlers::comments::delete_comment)),
                ),
            );
        }
    }

    pub mod follows {
        use super::*;
        pub fn configure(cfg: &mut web::ServiceConfig) {
            cfg.service(
                web::scope("/follows")
                    .service(
                        web::resource("")
                            .route(web::post().to(handlers::follows::create_follow))
                            .route(web::get().to(handlers::follows::list_follows)),
                    )
                    .route("/{id}", web::delete().to(handlers::follows::delete_follow)),
            );
        }
    }

    pub mod feed {
        use super::*;
        pub fn configure(cfg: &mut web::ServiceConfig) {
            cfg.service(
                web::scope("/feed").route("", web::get().to(handlers::feed::get_feed)),
            );
        }
    }

    pub mod notifications {
        use super::*;
        pub fn configure(cfg: &mut web::ServiceConfig) {
            cfg.service(
                web::scope("/notifications")
                    .route(
                        "",
                        web::get().to(handlers::notifications::list_notifications),
                    )
                    // Must be registered ahead of the `{id}` resource
                    .route(
                        "/mark_all_as_read",
                        web::patch().to(handlers::notifications::mark_all_as_read),
                    )
                    .service(
                        web::resource("/{id}")
                            .route(web::get().to(handlers::notifications::get_notification))
                            .route(web::patch().to(handlers::notifications::mark_as_read)),
                    ),
            );
        }
    }
}
