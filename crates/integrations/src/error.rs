//! Error type shared by the HTTP clients and its mapping onto
//! [`ServiceError`].

use blogcraft_core::services::ServiceError;

/// Errors from any of the REST clients in this crate.
#[derive(Debug, thiserror::Error)]
pub enum IntegrationError {
    /// The HTTP request itself failed (network, DNS, TLS, body decode).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The service returned a non-2xx status code.
    #[error("API error ({status}): {body}")]
    ApiError {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// A 2xx response was missing the data we asked for.
    #[error("unexpected response: {0}")]
    MissingData(String),
}

impl From<IntegrationError> for ServiceError {
    fn from(err: IntegrationError) -> Self {
        match err {
            IntegrationError::Request(e) if e.is_decode() => ServiceError::Decode(e.to_string()),
            IntegrationError::Request(e) => ServiceError::Transport(e.to_string()),
            IntegrationError::ApiError { status, body } => ServiceError::Status { status, body },
            IntegrationError::MissingData(msg) => ServiceError::Decode(msg),
        }
    }
}

/// Ensure the response has a success status code. Returns the response
/// unchanged on success, or [`IntegrationError::ApiError`] carrying the
/// status and body text on failure.
pub(crate) async fn ensure_success(
    response: reqwest::Response,
) -> Result<reqwest::Response, IntegrationError> {
    let status = response.status();
    if !status.is_success() {
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "<unreadable body>".to_string());
        return Err(IntegrationError::ApiError {
            status: status.as_u16(),
            body,
        });
    }
    Ok(response)
}

/// Parse a successful JSON response body into the expected type.
pub(crate) async fn parse_response<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, IntegrationError> {
    let response = ensure_success(response).await?;
    Ok(response.json::<T>().await?)
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn api_error_maps_to_status() {
        let err: ServiceError = IntegrationError::ApiError {
            status: 503,
            body: "busy".into(),
        }
        .into();
        assert_matches!(err, ServiceError::Status { status: 503, body } if body == "busy");
    }

    #[test]
    fn missing_data_maps_to_decode() {
        let err: ServiceError = IntegrationError::MissingData("no candidates".into()).into();
        assert_matches!(err, ServiceError::Decode(msg) if msg == "no candidates");
    }

    #[test]
    fn request_error_maps_to_transport() {
        let req_err = reqwest::Client::new().get("://bad").build().unwrap_err();
        let err: ServiceError = IntegrationError::Request(req_err).into();
        assert_matches!(err, ServiceError::Transport(_));
    }
}
