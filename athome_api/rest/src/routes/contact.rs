use std::sync::Arc;

use anyhow::Context;
use athome_core_contact_contracts::{
    ContactFeatureService, ContactSendMessageError, ContactSendOutcome,
};
use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, State},
    http::{header, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing, Extension, Json, Router,
};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::warn;

use super::{error, internal_server_error, INTERNAL_SERVER_ERROR_MESSAGE};
use crate::{
    extractors::session::Session,
    middlewares::client_ip::ClientIp,
    models::contact::{parse_submission, ApiContactResponse},
};

pub const SEND_PATH: &str = "/api/send";

pub fn router(service: Arc<impl ContactFeatureService>) -> Router<()> {
    Router::new()
        .route(
            SEND_PATH,
            routing::post(send)
                .options(preflight)
                .fallback(method_not_allowed),
        )
        .with_state(service)
}

pub fn cors_layer(allowed_origins: &[String]) -> anyhow::Result<CorsLayer> {
    let allow_origin = if allowed_origins.iter().any(|origin| origin == "*") {
        AllowOrigin::any()
    } else {
        AllowOrigin::list(
            allowed_origins
                .iter()
                .map(|origin| {
                    origin
                        .parse::<HeaderValue>()
                        .with_context(|| format!("Invalid allowed origin: {origin:?}"))
                })
                .collect::<anyhow::Result<Vec<_>>>()?,
        )
    };

    Ok(CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]))
}

async fn preflight() -> StatusCode {
    StatusCode::OK
}

async fn method_not_allowed() -> Response {
    error(StatusCode::METHOD_NOT_ALLOWED, "Method not allowed")
}

async fn send(
    service: State<Arc<impl ContactFeatureService>>,
    session: Session,
    Extension(ClientIp(client_ip)): Extension<ClientIp>,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    let body = match body {
        Ok(body) => body,
        Err(rejection) if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE => {
            return (
                session,
                error(StatusCode::PAYLOAD_TOO_LARGE, "Request body too large"),
            )
                .into_response();
        }
        Err(rejection) => {
            warn!("Failed to read request body: {rejection}");
            return (
                session,
                error(StatusCode::BAD_REQUEST, "Invalid JSON data"),
            )
                .into_response();
        }
    };

    if let Err(err) = service.check_cooldown(session.id).await {
        return (session, send_error(err)).into_response();
    }

    let Some(submission) = parse_submission(&body) else {
        return (
            session,
            error(StatusCode::BAD_REQUEST, "Invalid JSON data"),
        )
            .into_response();
    };

    let response = match service
        .send_message(session.id, client_ip, submission)
        .await
    {
        Ok(ContactSendOutcome::Delivered) => Json(ApiContactResponse::ok(
            "Thank you! Your message has been sent successfully.",
        ))
        .into_response(),
        Ok(ContactSendOutcome::Suppressed) => {
            Json(ApiContactResponse::ok("Message sent")).into_response()
        }
        Err(err) => send_error(err),
    };

    (session, response).into_response()
}

fn send_error(err: ContactSendMessageError) -> Response {
    match err {
        ContactSendMessageError::RateLimited => error(
            StatusCode::TOO_MANY_REQUESTS,
            "Please wait before submitting again",
        ),
        ContactSendMessageError::Validation(errors) => (
            StatusCode::BAD_REQUEST,
            Json(ApiContactResponse {
                errors: Some(errors.iter().map(ToString::to_string).collect()),
                ..ApiContactResponse::error("Validation failed")
            }),
        )
            .into_response(),
        ContactSendMessageError::Send => {
            error(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_SERVER_ERROR_MESSAGE)
        }
        ContactSendMessageError::Other(err) => internal_server_error(err),
    }
}

#[cfg(test)]
mod tests {
    use athome_core_contact_contracts::MockContactFeatureService;
    use athome_core_health_contracts::MockHealthFeatureService;
    use athome_demo::{
        contact::{ASHA, SPAM},
        session::SESSION_1,
        CLIENT_IP,
    };
    use athome_models::contact::{ContactSubmission, ContactValidationError};
    use axum::{body::Body, http::Request};
    use http_body_util::BodyExt;
    use pretty_assertions::assert_eq;
    use tower::ServiceExt;

    use super::*;
    use crate::{tests::test_router, MAX_BODY_SIZE};

    fn post(body: impl Into<Body>) -> Request<Body> {
        Request::post(SEND_PATH)
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::COOKIE, format!("athome_session={}", *SESSION_1))
            .body(body.into())
            .unwrap()
    }

    fn post_json(submission: &ContactSubmission) -> Request<Body> {
        post(serde_json::to_vec(submission).unwrap())
    }

    async fn call(
        contact: MockContactFeatureService,
        request: Request<Body>,
    ) -> (StatusCode, Option<ApiContactResponse>) {
        let response = test_router(MockHealthFeatureService::new(), contact)
            .oneshot(request)
            .await
            .unwrap();
        let status = response.status();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&body).ok())
    }

    #[tokio::test]
    async fn ok() {
        // Arrange
        let contact = MockContactFeatureService::new()
            .with_check_cooldown(*SESSION_1, false)
            .with_send_message(
                *SESSION_1,
                CLIENT_IP,
                ASHA.clone(),
                Ok(ContactSendOutcome::Delivered),
            );

        // Act
        let (status, body) = call(contact, post_json(&ASHA)).await;

        // Assert
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            Some(ApiContactResponse::ok(
                "Thank you! Your message has been sent successfully."
            ))
        );
    }

    #[tokio::test]
    async fn json_without_content_type() {
        // Arrange
        let contact = MockContactFeatureService::new()
            .with_check_cooldown(*SESSION_1, false)
            .with_send_message(
                *SESSION_1,
                CLIENT_IP,
                ASHA.clone(),
                Ok(ContactSendOutcome::Delivered),
            );

        let mut request = post_json(&ASHA);
        request.headers_mut().remove(header::CONTENT_TYPE);

        // Act
        let (status, _) = call(contact, request).await;

        // Assert
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn new_session_sets_cookie() {
        // Arrange
        let mut contact = MockContactFeatureService::new();
        contact
            .expect_check_cooldown()
            .once()
            .return_once(|_| Box::pin(std::future::ready(Ok(()))));
        contact
            .expect_send_message()
            .once()
            .return_once(|_, _, _| {
                Box::pin(std::future::ready(Ok(ContactSendOutcome::Delivered)))
            });

        let request = Request::post(SEND_PATH)
            .body(Body::from(serde_json::to_vec(&*ASHA).unwrap()))
            .unwrap();

        // Act
        let response = test_router(MockHealthFeatureService::new(), contact)
            .oneshot(request)
            .await
            .unwrap();

        // Assert
        assert_eq!(response.status(), StatusCode::OK);
        let cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .unwrap()
            .to_str()
            .unwrap();
        assert!(cookie.starts_with("athome_session="));
    }

    #[tokio::test]
    async fn honeypot() {
        // Arrange
        let contact = MockContactFeatureService::new()
            .with_check_cooldown(*SESSION_1, false)
            .with_send_message(
                *SESSION_1,
                CLIENT_IP,
                SPAM.clone(),
                Ok(ContactSendOutcome::Suppressed),
            );

        // Act
        let (status, body) = call(contact, post_json(&SPAM)).await;

        // Assert
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, Some(ApiContactResponse::ok("Message sent")));
    }

    #[tokio::test]
    async fn validation_failed() {
        // Arrange
        let submission = ContactSubmission {
            name: "A".into(),
            message: "Hi".into(),
            ..ASHA.clone()
        };
        let contact = MockContactFeatureService::new()
            .with_check_cooldown(*SESSION_1, false)
            .with_send_message(
                *SESSION_1,
                CLIENT_IP,
                submission.clone(),
                Err(ContactSendMessageError::Validation(vec![
                    ContactValidationError::NameTooShort,
                    ContactValidationError::MessageTooShort,
                ])),
            );

        // Act
        let (status, body) = call(contact, post_json(&submission)).await;

        // Assert
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body,
            Some(ApiContactResponse {
                success: false,
                message: "Validation failed".into(),
                errors: Some(vec![
                    "Name is required (minimum 2 characters)".into(),
                    "Message is required (minimum 10 characters)".into(),
                ]),
            })
        );
    }

    #[tokio::test]
    async fn null_fields_are_empty() {
        // Arrange
        let submission = ContactSubmission {
            name: "A".into(),
            ..Default::default()
        };
        let contact = MockContactFeatureService::new()
            .with_check_cooldown(*SESSION_1, false)
            .with_send_message(
                *SESSION_1,
                CLIENT_IP,
                submission,
                Err(ContactSendMessageError::Validation(vec![
                    ContactValidationError::NameTooShort,
                    ContactValidationError::InvalidEmail,
                    ContactValidationError::MessageTooShort,
                ])),
            );

        // Act
        let (status, body) = call(
            contact,
            post(r#"{"name": "A", "phone": null, "honeypot": null}"#),
        )
        .await;

        // Assert
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.unwrap().message, "Validation failed");
    }

    #[tokio::test]
    async fn invalid_json() {
        for body in ["", "name=Asha&email=asha%40example.com", "[1, 2, 3]", "{", "{}"] {
            // Arrange
            let contact = MockContactFeatureService::new().with_check_cooldown(*SESSION_1, false);

            // Act
            let (status, response) = call(contact, post(body)).await;

            // Assert
            assert_eq!(status, StatusCode::BAD_REQUEST, "{body:?}");
            assert_eq!(
                response,
                Some(ApiContactResponse::error("Invalid JSON data")),
                "{body:?}"
            );
        }
    }

    #[tokio::test]
    async fn rate_limited() {
        // Arrange
        let contact = MockContactFeatureService::new().with_check_cooldown(*SESSION_1, true);

        // Act
        let (status, body) = call(contact, post("not even json")).await;

        // Assert
        assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(
            body,
            Some(ApiContactResponse::error(
                "Please wait before submitting again"
            ))
        );
    }

    #[tokio::test]
    async fn send_failed() {
        // Arrange
        let contact = MockContactFeatureService::new()
            .with_check_cooldown(*SESSION_1, false)
            .with_send_message(
                *SESSION_1,
                CLIENT_IP,
                ASHA.clone(),
                Err(ContactSendMessageError::Send),
            );

        // Act
        let (status, body) = call(contact, post_json(&ASHA)).await;

        // Assert
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body,
            Some(ApiContactResponse::error(INTERNAL_SERVER_ERROR_MESSAGE))
        );
    }

    #[tokio::test]
    async fn internal_error_is_not_leaked() {
        // Arrange
        let contact = MockContactFeatureService::new()
            .with_check_cooldown(*SESSION_1, false)
            .with_send_message(
                *SESSION_1,
                CLIENT_IP,
                ASHA.clone(),
                Err(anyhow::anyhow!("smtp password rejected").into()),
            );

        // Act
        let (status, body) = call(contact, post_json(&ASHA)).await;

        // Assert
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body,
            Some(ApiContactResponse::error(INTERNAL_SERVER_ERROR_MESSAGE))
        );
    }

    #[tokio::test]
    async fn preflight() {
        // Arrange
        let request = Request::options(SEND_PATH)
            .header(header::ORIGIN, "https://moreathome.in")
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
            .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type")
            .body(Body::empty())
            .unwrap();

        // Act
        let response = test_router(
            MockHealthFeatureService::new(),
            MockContactFeatureService::new(),
        )
        .oneshot(request)
        .await
        .unwrap();

        // Assert
        assert_eq!(response.status(), StatusCode::OK);
        let headers = response.headers();
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
        let methods = headers[header::ACCESS_CONTROL_ALLOW_METHODS].to_str().unwrap();
        assert!(methods.contains("POST"), "{methods}");
        assert!(response
            .into_body()
            .collect()
            .await
            .unwrap()
            .to_bytes()
            .is_empty());
    }

    #[tokio::test]
    async fn method_not_allowed() {
        for method in [Method::GET, Method::PUT, Method::DELETE] {
            // Arrange
            let request = Request::builder()
                .method(method.clone())
                .uri(SEND_PATH)
                .body(Body::empty())
                .unwrap();

            // Act
            let (status, body) = call(MockContactFeatureService::new(), request).await;

            // Assert
            assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED, "{method}");
            assert_eq!(
                body,
                Some(ApiContactResponse::error("Method not allowed")),
                "{method}"
            );
        }
    }

    #[tokio::test]
    async fn body_too_large() {
        // Arrange
        let contact = MockContactFeatureService::new();
        let body = serde_json::to_vec(&ContactSubmission {
            message: "x".repeat(MAX_BODY_SIZE),
            ..ASHA.clone()
        })
        .unwrap();

        // Act
        let (status, response) = call(contact, post(body)).await;

        // Assert
        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(
            response,
            Some(ApiContactResponse::error("Request body too large"))
        );
    }

    #[test]
    fn cors_origin_list() {
        assert!(
            cors_layer(&["https://moreathome.in".into(), "https://www.moreathome.in".into()])
                .is_ok()
        );
        assert!(cors_layer(&["https://bad\norigin".into()]).is_err());
    }
}
