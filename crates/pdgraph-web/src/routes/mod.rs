//! Route handlers.

pub mod config;
pub mod endpoint;
pub mod graph;

use axum::http::StatusCode;
use pdgraph_core::PdgError;

/// Map a graph error to an HTTP status, keeping the message as the body.
pub(crate) fn error_response(err: PdgError) -> (StatusCode, String) {
    let status = match &err {
        err if err.is_remote() => StatusCode::BAD_GATEWAY,
        PdgError::ConfigIo(_) | PdgError::ConfigParse(_) | PdgError::ConfigSerialize(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
        _ => StatusCode::BAD_REQUEST,
    };
    (status, err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_response_status_mapping() {
        let (status, body) = error_response(PdgError::Remote {
            status: 422,
            body: "invalid".into(),
        });
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body, "invalid");

        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        assert_eq!(error_response(PdgError::ConfigIo(io)).0, StatusCode::INTERNAL_SERVER_ERROR);

        let (status, _) = error_response(PdgError::MissingAncestor("incidents.one".into()));
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
