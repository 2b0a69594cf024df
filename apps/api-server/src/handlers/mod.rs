//! HTTP handlers and route configuration.

mod health;
mod posts;
mod tags;
mod users;

#[cfg(test)]
mod tests;

use actix_web::{HttpRequest, HttpResponse, web};

use crate::middleware::auth::Authentication;
use crate::middleware::error::{AppError, AppResult};

/// Configure all application routes.
///
/// Every route sits behind [`Authentication`], which attaches the caller when
/// a bearer token is present. Gating is left to the handlers' extractors.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config()).app_data(path_config()).service(
        web::scope("/api")
            .wrap(Authentication)
            // Public routes
            .route("/health", web::get().to(health::health_check))
            .service(
                web::scope("/users")
                    .route("", web::get().to(users::list_users))
                    .route("/register", web::post().to(users::register))
                    .route("/login", web::post().to(users::login))
                    .route("/me", web::get().to(users::me))
                    .route("/me", web::patch().to(users::update_me)),
            )
            .service(
                web::scope("/posts")
                    .route("", web::get().to(posts::list_posts))
                    .route("", web::post().to(posts::create_post))
                    .route("/{id}", web::get().to(posts::get_post))
                    .route("/{id}", web::patch().to(posts::update_post))
                    .route("/{id}", web::delete().to(posts::delete_post)),
            )
            .service(
                web::scope("/tags")
                    .route("", web::get().to(tags::list_tags))
                    .route("/{tag_name}/posts", web::get().to(tags::posts_by_tag)),
            )
            .default_service(web::to(not_found)),
    );
}

async fn not_found(req: HttpRequest) -> AppResult<HttpResponse> {
    Err(AppError::NotFound(format!(
        "No route for {} {}",
        req.method(),
        req.path()
    )))
}

/// Report malformed JSON bodies as problem details.
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .error_handler(|err, _req| AppError::BadRequest(err.to_string()).into())
}

fn path_config() -> web::PathConfig {
    web::PathConfig::default()
        .error_handler(|err, _req| AppError::BadRequest(err.to_string()).into())
}
