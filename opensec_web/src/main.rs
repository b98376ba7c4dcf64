use actix_web::{get, middleware::Logger, App, HttpResponse, HttpServer, Responder};
use serde::Serialize;

#[derive(Serialize)]
struct Status {
    version: &'static str,
}

#[get("/status")]
async fn status() -> impl Responder {
    HttpResponse::Ok().json(Status {
        version: env!("CARGO_PKG_VERSION"),
    })
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    HttpServer::new(|| App::new().wrap(Logger::default()).service(status))
        .bind(("127.0.0.1", 8080))?
        .run()
        .await
}
