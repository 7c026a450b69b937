//! HTTP handlers and route configuration.

mod auth;
mod categories;
mod comments;
mod health;
mod likes;
mod posts;
mod tags;
mod users;

use actix_web::web;

use quill_core::pagination::Page;
use quill_shared::PageEnvelope;

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            // Public routes
            .route("/health", web::get().to(health::health_check))
            // Auth routes
            .service(
                web::scope("/auth")
                    .route("/register", web::post().to(auth::register))
                    .route("/login", web::post().to(auth::login))
                    .route("/me", web::get().to(auth::me)),
            )
            // Post routes
            .service(
                web::scope("/posts")
                    .route("", web::post().to(posts::create))
                    .route("", web::get().to(posts::list))
                    .route("/published", web::get().to(posts::list_published))
                    .route(
                        "/category/{category_id}",
                        web::get().to(posts::list_by_category),
                    )
                    .route("/tag/name/{name}", web::get().to(posts::list_by_tag_name))
                    .route("/tag/{tag_id}", web::get().to(posts::list_by_tag))
                    .route("/{id}", web::get().to(posts::get))
                    .route("/{id}", web::put().to(posts::update))
                    .route("/{id}", web::delete().to(posts::delete))
                    .route("/{id}/status", web::patch().to(posts::update_status))
                    .route("/{id}/image", web::patch().to(posts::update_image))
                    .route("/{id}/like", web::post().to(likes::toggle))
                    .route("/{id}/like", web::get().to(likes::info))
                    .route("/{id}/comments", web::get().to(comments::list_by_post)),
            )
            // Comment routes
            .service(
                web::scope("/comments")
                    .route("", web::post().to(comments::create))
                    .route("/{id}", web::get().to(comments::get))
                    .route("/{id}", web::put().to(comments::update))
                    .route("/{id}", web::delete().to(comments::delete)),
            )
            // User profile routes
            .service(
                web::scope("/users")
                    .route("", web::get().to(users::list))
                    .route("/{id}/profile", web::put().to(users::update_profile))
                    .route(
                        "/{id}/profile-picture",
                        web::patch().to(users::update_picture),
                    ),
            )
            // Tag routes
            .service(
                web::scope("/tags")
                    .route("", web::post().to(tags::create))
                    .route("", web::get().to(tags::list))
                    .route("/{id}", web::get().to(tags::get))
                    .route("/{id}", web::delete().to(tags::delete)),
            )
            // Category routes
            .service(
                web::scope("/categories")
                    .route("", web::post().to(categories::create))
                    .route("", web::get().to(categories::list))
                    .route("/{id}", web::get().to(categories::get))
                    .route("/{id}", web::delete().to(categories::delete)),
            ),
    );
}

/// Wrap a core page in the wire envelope.
pub(crate) fn envelope<T>(page: Page<T>) -> PageEnvelope<T> {
    let last = page.is_last();
    PageEnvelope {
        content: page.items,
        page_no: page.page,
        page_size: page.size,
        total_elements: page.total_items,
        total_pages: page.total_pages,
        last,
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use actix_web::http::StatusCode;
    use actix_web::{App, test};
    use uuid::Uuid;

    use quill_core::ports::TokenService;
    use quill_infra::{JwtConfig, JwtTokenService};

    use super::configure_routes;
    use crate::state::AppState;

    fn token_service() -> Arc<dyn TokenService> {
        Arc::new(JwtTokenService::new(JwtConfig::default()))
    }

    macro_rules! spawn_app {
        ($tokens:expr) => {
            test::init_service(
                App::new()
                    .app_data(actix_web::web::Data::new(AppState::new(None).await))
                    .app_data(actix_web::web::Data::new($tokens))
                    .configure(configure_routes),
            )
            .await
        };
    }

    #[actix_web::test]
    async fn mutating_routes_reject_anonymous_callers() {
        let app = spawn_app!(token_service());
        let id = Uuid::new_v4();

        for req in [
            test::TestRequest::put().uri(&format!("/api/posts/{id}")),
            test::TestRequest::delete().uri(&format!("/api/posts/{id}")),
            test::TestRequest::patch().uri(&format!("/api/posts/{id}/status")),
            test::TestRequest::patch().uri(&format!("/api/posts/{id}/image")),
            test::TestRequest::put().uri(&format!("/api/comments/{id}")),
            test::TestRequest::delete().uri(&format!("/api/comments/{id}")),
            test::TestRequest::post().uri("/api/tags"),
            test::TestRequest::delete().uri(&format!("/api/tags/{id}")),
            test::TestRequest::post().uri("/api/categories"),
            test::TestRequest::delete().uri(&format!("/api/categories/{id}")),
            test::TestRequest::put().uri(&format!("/api/users/{id}/profile")),
            test::TestRequest::patch().uri(&format!("/api/users/{id}/profile-picture")),
        ] {
            let res = test::call_service(&app, req.to_request()).await;
            assert_eq!(res.status(), StatusCode::UNAUTHORIZED, "{}", res.request().uri());
        }
    }

    #[actix_web::test]
    async fn bearer_token_gets_past_the_auth_gate() {
        let tokens = token_service();
        let app = spawn_app!(tokens.clone());
        let token = tokens
            .generate_token(Uuid::new_v4(), "ada", "ada@example.com", vec!["author".into()])
            .unwrap();

        // The post does not exist, so an authenticated delete reaches the
        // service and comes back 404 rather than 401.
        let req = test::TestRequest::delete()
            .uri(&format!("/api/posts/{}", Uuid::new_v4()))
            .insert_header(("Authorization", format!("Bearer {token}")))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }
}
