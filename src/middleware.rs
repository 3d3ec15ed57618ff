use axum::{extract::Request, middleware::Next, response::Response};

use crate::error::BffError;

/// Parsed `pageSize` header, inserted into request extensions for the
/// listing handler.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageSize(pub i32);

/// Precondition for the product-listing route: the `pageSize` header must be
/// present, an integer, and positive.
pub async fn require_page_size(mut request: Request, next: Next) -> Result<Response, BffError> {
    let header = match request.headers().get("pageSize") {
        Some(value) => value,
        None => {
            return Err(BffError::Validation(String::from(
                "pageSize header is required",
            )))
        }
    };

    let page_size = match header.to_str().ok().and_then(|raw| raw.parse::<i32>().ok()) {
        Some(page_size) => page_size,
        None => {
            return Err(BffError::Validation(String::from(
                "pageSize must be a valid integer",
            )))
        }
    };

    if page_size <= 0 {
        return Err(BffError::Validation(String::from(
            "page size is negative or 0",
        )));
    }

    request.extensions_mut().insert(PageSize(page_size));
    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request as HttpRequest, StatusCode};
    use axum::middleware::from_fn;
    use axum::routing::get;
    use axum::{Extension, Router};
    use serde_json::Value;
    use tower::ServiceExt;

    fn app() -> Router {
        Router::new()
            .route(
                "/probe",
                get(|Extension(page_size): Extension<PageSize>| async move {
                    page_size.0.to_string()
                }),
            )
            .layer(from_fn(require_page_size))
    }

    async fn get_with_header(header: Option<&str>) -> axum::response::Response {
        let mut request = HttpRequest::get("/probe");
        if let Some(value) = header {
            request = request.header("pageSize", value);
        }
        app()
            .oneshot(request.body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn missing_header_is_rejected() {
        let response = get_with_header(None).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["message"], "pageSize header is required");
        assert_eq!(body["status"], 400);
    }

    #[tokio::test]
    async fn non_integer_header_is_rejected() {
        let response = get_with_header(Some("abc")).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["message"], "pageSize must be a valid integer");
    }

    #[tokio::test]
    async fn zero_or_negative_header_is_rejected() {
        for raw in ["0", "-3"] {
            let response = get_with_header(Some(raw)).await;

            assert_eq!(response.status(), StatusCode::BAD_REQUEST);
            let body = body_json(response).await;
            assert_eq!(body["message"], "page size is negative or 0");
        }
    }

    #[tokio::test]
    async fn valid_header_reaches_the_handler_parsed() {
        let response = get_with_header(Some("25")).await;

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&bytes[..], b"25");
    }
}
