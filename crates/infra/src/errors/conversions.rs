//! Conversions from external infrastructure errors into domain errors.

#[cfg(feature = "keychain")]
use keyring::Error as KeyringError;
use reqwest::Error as HttpError;
use smartthings_domain::EndpointError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub EndpointError);

impl From<InfraError> for EndpointError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<EndpointError> for InfraError {
    fn from(value: EndpointError) -> Self {
        Self(value)
    }
}

trait IntoEndpointError {
    fn into_endpoint_error(self) -> EndpointError;
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → EndpointError */
/* -------------------------------------------------------------------------- */

impl IntoEndpointError for HttpError {
    fn into_endpoint_error(self) -> EndpointError {
        if self.is_timeout() {
            return EndpointError::Network("HTTP request timed out".into());
        }

        if self.is_connect() {
            return EndpointError::Network(format!("HTTP connection failure: {self}"));
        }

        if self.is_builder() {
            return EndpointError::InvalidInput(format!("invalid HTTP request: {self}"));
        }

        if self.is_decode() {
            return EndpointError::Serialization(format!("failed to read HTTP response: {self}"));
        }

        EndpointError::Network(self.to_string())
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        Self(value.into_endpoint_error())
    }
}

/* -------------------------------------------------------------------------- */
/* std::io::Error → EndpointError */
/* -------------------------------------------------------------------------- */

impl IntoEndpointError for std::io::Error {
    fn into_endpoint_error(self) -> EndpointError {
        match self.kind() {
            std::io::ErrorKind::NotFound => {
                EndpointError::TokenStore(format!("credentials not found: {self}"))
            }
            std::io::ErrorKind::PermissionDenied => {
                EndpointError::TokenStore(format!("permission denied: {self}"))
            }
            _ => EndpointError::TokenStore(self.to_string()),
        }
    }
}

impl From<std::io::Error> for InfraError {
    fn from(value: std::io::Error) -> Self {
        Self(value.into_endpoint_error())
    }
}

/* -------------------------------------------------------------------------- */
/* keyring::Error → EndpointError */
/* -------------------------------------------------------------------------- */

#[cfg(feature = "keychain")]
impl IntoEndpointError for KeyringError {
    fn into_endpoint_error(self) -> EndpointError {
        let description = self.to_string();

        match self {
            KeyringError::NoEntry => EndpointError::TokenStore("keychain entry not found".into()),
            KeyringError::BadEncoding(_) => {
                EndpointError::TokenStore("credential in keychain is not valid UTF-8".into())
            }
            KeyringError::PlatformFailure(err) => {
                EndpointError::TokenStore(format!("keychain platform error: {err}"))
            }
            KeyringError::NoStorageAccess(err) => {
                EndpointError::TokenStore(format!("unable to access secure storage: {err}"))
            }
            _ => EndpointError::TokenStore(description),
        }
    }
}

#[cfg(feature = "keychain")]
impl From<KeyringError> for InfraError {
    fn from(value: KeyringError) -> Self {
        Self(value.into_endpoint_error())
    }
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */

#[cfg(test)]
mod tests {
    use std::net::TcpListener;

    use super::*;

    #[tokio::test]
    async fn connection_refused_maps_to_network_error() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = reqwest::Client::builder().no_proxy().build().unwrap();
        let error = client.get(format!("http://{addr}")).send().await.unwrap_err();

        let mapped: EndpointError = InfraError::from(error).into();
        match mapped {
            EndpointError::Network(msg) => assert!(msg.contains("connection")),
            other => panic!("expected network error, got {other:?}"),
        }
    }

    #[test]
    fn io_not_found_maps_to_token_store_error() {
        let err = std::io::Error::new(std::io::ErrorKind::NotFound, "missing.json");
        let mapped: EndpointError = InfraError::from(err).into();
        match mapped {
            EndpointError::TokenStore(msg) => assert!(msg.contains("not found")),
            other => panic!("expected token store error, got {other:?}"),
        }
    }

    #[cfg(feature = "keychain")]
    #[test]
    fn keyring_no_entry_maps_to_token_store() {
        let mapped: EndpointError = InfraError::from(KeyringError::NoEntry).into();
        match mapped {
            EndpointError::TokenStore(msg) => assert!(msg.contains("keychain")),
            other => panic!("expected token store error, got {other:?}"),
        }
    }
}
