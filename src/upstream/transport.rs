//! HTTP transport seam between the host protocol and the network.

use crate::error::Error;
use std::fs;
use std::path::Path;
use thiserror::Error as ThisError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Put,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub method: Method,
    pub url: String,
    /// Form-encoded body; repeated names are kept in order.
    pub form: Vec<(String, String)>,
}

impl Request {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            url: url.into(),
            form: Vec::new(),
        }
    }

    pub fn put(url: impl Into<String>, form: Vec<(String, String)>) -> Self {
        Self {
            method: Method::Put,
            url: url.into(),
            form,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: u16,
    pub body: String,
}

#[derive(Debug, ThisError)]
pub enum TransportError {
    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error("{0}")]
    Connection(String),
}

pub trait Transport {
    fn send(&self, request: &Request) -> Result<Response, TransportError>;
}

/// Blocking HTTPS transport pinned to a single trusted certificate.
pub struct HttpTransport {
    client: reqwest::blocking::Client,
}

impl HttpTransport {
    pub fn new(client: reqwest::blocking::Client) -> Self {
        Self { client }
    }

    /// Build a client that trusts only the certificate at `cert_path`.
    pub fn with_pinned_cert(cert_path: &Path) -> Result<Self, Error> {
        let invalid = |reason: String| Error::InvalidCertificate {
            path: cert_path.to_path_buf(),
            reason,
        };
        let pem = fs::read(cert_path).map_err(|e| invalid(e.to_string()))?;
        // rustls defers PEM parsing to build(), where a file without any
        // certificate block silently yields an empty root store.
        let certs =
            reqwest::Certificate::from_pem_bundle(&pem).map_err(|e| invalid(e.to_string()))?;
        if certs.is_empty() {
            return Err(invalid("no PEM certificate found".to_string()));
        }
        let mut builder = reqwest::blocking::Client::builder()
            .use_rustls_tls()
            .tls_built_in_root_certs(false)
            .user_agent(concat!("shadowc/", env!("CARGO_PKG_VERSION")));
        for cert in certs {
            builder = builder.add_root_certificate(cert);
        }
        let client = builder
            .build()
            .map_err(|e| invalid(format!("build HTTP client: {}", e)))?;
        Ok(Self::new(client))
    }
}

impl Transport for HttpTransport {
    fn send(&self, request: &Request) -> Result<Response, TransportError> {
        let builder = match request.method {
            Method::Get => self.client.get(&request.url),
            Method::Put if request.form.is_empty() => self.client.put(&request.url),
            Method::Put => self.client.put(&request.url).form(&request.form),
        };
        let response = builder.send()?;
        let status = response.status().as_u16();
        let body = response.text()?;
        Ok(Response { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_cert_is_invalid_certificate() {
        let err = HttpTransport::with_pinned_cert(Path::new("/nonexistent/cert.pem"))
            .err()
            .unwrap();
        assert!(matches!(err, Error::InvalidCertificate { .. }));
    }

    #[test]
    fn test_garbage_pem_is_invalid_certificate() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("cert.pem");
        fs::write(&path, "this is not a certificate\n").unwrap();
        let err = HttpTransport::with_pinned_cert(&path).err().unwrap();
        assert!(matches!(err, Error::InvalidCertificate { path: p, .. } if p == path));
    }
}
