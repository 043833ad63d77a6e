mod api;
mod executor;
mod types;
mod web;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init();
    web::server::run_server().await
}
