//! HTTP handlers and route configuration.

mod categories;
mod health;
mod posts;
mod uploads;


use actix_web::web;
use bloghub_core::domain::MAX_IMAGE_SIZE;

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/health", web::get().to(health::health_check))
            .service(
                web::scope("/categories")
                    .route("", web::get().to(categories::list))
                    .route("", web::post().to(categories::create))
                    .route("/slug/{slug}", web::get().to(categories::get_by_slug))
                    .route("/{id}", web::get().to(categories::get_by_id))
                    .route("/{id}", web::patch().to(categories::update))
                    .route("/{id}", web::delete().to(categories::delete)),
            )
            .service(
                web::scope("/posts")
                    .route("", web::get().to(posts::list))
                    .route("", web::post().to(posts::create))
                    .route("/slug/{slug}", web::get().to(posts::get_by_slug))
                    .route("/{id}", web::patch().to(posts::update))
                    .route("/{id}", web::delete().to(posts::delete)),
            )
            .service(
                web::resource("/uploads")
                    // One byte over the limit so oversized bodies reach validation.
                    .app_data(web::PayloadConfig::new(MAX_IMAGE_SIZE + 1))
                    .route(web::post().to(uploads::upload)),
            ),
    );
}
