use actix_web::{
    error,
    web,
    App,
    HttpResponse,
    HttpServer,
    Responder,
};
use log::info;

use std::net::Ipv4Addr;

use crate::api::{
    get_server_port,
    health_check,
    shutdown,
};

use crate::executor::ExecutionEngine;

use crate::types::ExecutionRequest;

async fn execute_code(
    engine: web::Data<ExecutionEngine>,
    request: web::Json<ExecutionRequest>,
) -> impl Responder {
    info!(
        "Received request to execute {} bytes of code",
        request.code.len()
    );

    let result = engine.execute(&request.code).await;

    info!(
        "Execution finished: exit_code={} success={}",
        result.exit_code, result.success
    );
    HttpResponse::Ok().json(result)
}

async fn not_found() -> impl Responder {
    HttpResponse::NotFound().body("Not Found")
}

/// Missing `code` field and malformed JSON both surface as a 400 with the
/// deserializer's diagnostic instead of the default opaque error.
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        let message = err.to_string();
        error::InternalError::from_response(err, HttpResponse::BadRequest().body(message)).into()
    })
}

pub async fn run_server() -> std::io::Result<()> {
    let port = get_server_port();
    let server_address = (Ipv4Addr::UNSPECIFIED, port);

    info!(
        "VM API server starting on {}:{}",
        server_address.0, server_address.1
    );
    info!("Ready to receive code execution requests");

    HttpServer::new(|| {
        App::new()
            .app_data(web::Data::new(ExecutionEngine::new()))
            .app_data(json_config())
            .route("/execute", web::post().to(execute_code))
            .route("/health", web::get().to(health_check))
            .route("/shutdown", web::post().to(shutdown))
            .default_service(web::route().to(not_found))
    })
    .bind(server_address)?
    .run()
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ExecutionResult;
    use actix_web::test;
    use serde_json::json;
    use std::time::Duration;
    use tempfile::tempdir;

    fn test_app(
        scratch: &std::path::Path,
    ) -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        let engine = ExecutionEngine::with_config("python3", scratch, Duration::from_secs(30));
        App::new()
            .app_data(web::Data::new(engine))
            .app_data(json_config())
            .route("/execute", web::post().to(execute_code))
            .route("/health", web::get().to(health_check))
            .default_service(web::route().to(not_found))
    }

    #[actix_web::test]
    async fn test_health_endpoint() {
        let scratch = tempdir().unwrap();
        let app = test::init_service(test_app(scratch.path())).await;

        let resp = test::call_service(&app, test::TestRequest::get().uri("/health").to_request())
            .await;
        assert!(resp.status().is_success());

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["status"], "healthy");
    }

    #[actix_web::test]
    async fn test_execute_returns_result() {
        let scratch = tempdir().unwrap();
        let app = test::init_service(test_app(scratch.path())).await;

        let req = test::TestRequest::post()
            .uri("/execute")
            .set_json(json!({"code": "print('hello')"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert!(resp.status().is_success());

        let result: ExecutionResult = test::read_body_json(resp).await;
        assert_eq!(result.stdout, "hello\n");
        assert_eq!(result.exit_code, 0);
        assert!(result.success);
    }

    #[actix_web::test]
    async fn test_execute_failing_code_is_still_a_200() {
        let scratch = tempdir().unwrap();
        let app = test::init_service(test_app(scratch.path())).await;

        let req = test::TestRequest::post()
            .uri("/execute")
            .set_json(json!({"code": "raise SystemError('down')"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert!(resp.status().is_success());

        let result: ExecutionResult = test::read_body_json(resp).await;
        assert!(!result.success);
        assert!(result.stderr.contains("down"));
    }

    #[actix_web::test]
    async fn test_execute_missing_code_field_is_400() {
        let scratch = tempdir().unwrap();
        let app = test::init_service(test_app(scratch.path())).await;

        let req = test::TestRequest::post()
            .uri("/execute")
            .set_json(json!({"language": "python"}))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), actix_web::http::StatusCode::BAD_REQUEST);
        // No side effects: the engine never ran, so no temp file was created.
        assert_eq!(std::fs::read_dir(scratch.path()).unwrap().count(), 0);
    }

    #[actix_web::test]
    async fn test_execute_malformed_json_is_400() {
        let scratch = tempdir().unwrap();
        let app = test::init_service(test_app(scratch.path())).await;

        let req = test::TestRequest::post()
            .uri("/execute")
            .insert_header(("content-type", "application/json"))
            .set_payload("{not json")
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), actix_web::http::StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_unknown_route_is_404() {
        let scratch = tempdir().unwrap();
        let app = test::init_service(test_app(scratch.path())).await;

        let resp = test::call_service(
            &app,
            test::TestRequest::get().uri("/does-not-exist").to_request(),
        )
        .await;

        assert_eq!(resp.status(), actix_web::http::StatusCode::NOT_FOUND);
    }
}
