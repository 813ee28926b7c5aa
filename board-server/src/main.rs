use std::sync::Arc;

use actix_cors::Cors;
use actix_web::middleware::{DefaultHeaders, Logger};
use actix_web::{App, HttpServer, web};

use board_server::application::comment_service::CommentService;
use board_server::application::post_service::PostService;
use board_server::data::postgres::PostgresRepository;
use board_server::infrastructure::config::AppConfig;
use board_server::infrastructure::database::{create_pool, init_schema};
use board_server::infrastructure::logging::init_logging;
use board_server::presentation::handlers;
use board_server::presentation::middleware::{RequestIdMiddleware, TimingMiddleware};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    init_logging();

    let config = AppConfig::from_env().expect("invalid configuration");
    let pool = create_pool(&config.database_url)
        .await
        .expect("failed to connect to database");
    init_schema(&pool)
        .await
        .expect("failed to initialize schema");

    let repo = Arc::new(PostgresRepository::new(pool));
    let post_service = PostService::new(Arc::clone(&repo));
    let comment_service = CommentService::new(Arc::clone(&repo));

    let config_data = config.clone();

    HttpServer::new(move || {
        let cors = build_cors(&config_data);
        App::new()
            .wrap(Logger::default())
            .wrap(RequestIdMiddleware)
            .wrap(TimingMiddleware)
            .wrap(
                DefaultHeaders::new()
                    .add(("X-Content-Type-Options", "nosniff"))
                    .add(("Referrer-Policy", "no-referrer")),
            )
            .wrap(cors)
            .app_data(web::Data::new(post_service.clone()))
            .app_data(web::Data::new(comment_service.clone()))
            .service(handlers::post::list_posts)
            .service(handlers::post::get_post)
            .service(handlers::post::create_post)
            .service(handlers::post::delete_post)
            .service(handlers::comment::list_comments)
            .service(handlers::comment::get_comment)
            .service(handlers::comment::create_comment)
            .service(handlers::comment::update_comment)
            .service(handlers::comment::delete_comment)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}

fn build_cors(config: &AppConfig) -> Cors {
    let mut cors = Cors::default()
        .allowed_methods(vec!["GET", "POST", "PATCH", "DELETE"])
        .allowed_headers(vec![actix_web::http::header::CONTENT_TYPE])
        .max_age(3600);

    // Credentials cannot be combined with a wildcard origin.
    if config.cors_origins.iter().any(|origin| origin == "*") {
        cors = cors.allow_any_origin();
    } else {
        cors = cors.supports_credentials();
        for origin in &config.cors_origins {
            cors = cors.allowed_origin(origin);
        }
    }

    cors
}
