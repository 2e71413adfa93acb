//! A single shadowd server and its token-addressed routes.

use crate::constants;
use crate::error::Error;
use crate::upstream::transport::{Request, Transport};
use std::cell::Cell;
use std::fmt;
use std::rc::Rc;
use tracing::{debug, trace};

pub struct ShadowdHost {
    address: String,
    transport: Rc<dyn Transport>,
    alive: Cell<bool>,
}

impl ShadowdHost {
    /// Create a host for a bare `host:port` address.
    pub fn new(address: impl Into<String>, transport: Rc<dyn Transport>) -> Result<Self, Error> {
        let address = address.into();
        if address.contains("://") {
            return Err(Error::InvalidAddress(address));
        }
        Ok(Self {
            address,
            transport,
            alive: Cell::new(true),
        })
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn is_alive(&self) -> bool {
        self.alive.get()
    }

    /// Exclude this host for the rest of the run. There is no way back.
    pub fn mark_dead(&self) {
        self.alive.set(false);
    }

    fn url(&self, route: &str, path: &str) -> String {
        format!("{}://{}/{}/{}", constants::SCHEME, self.address, route, path)
    }

    /// `GET /t/<token>`: the current hash for a token.
    pub fn fetch_hash(&self, token: &str) -> Result<String, Error> {
        self.execute(Request::get(self.url(constants::HASH_ROUTE, token)), token)
    }

    /// `GET /ssh/<token>`: newline-delimited authorized keys.
    pub fn fetch_keys(&self, token: &str) -> Result<String, Error> {
        self.execute(Request::get(self.url(constants::SSH_ROUTE, token)), token)
    }

    /// `GET /t/<base>/`: every token known under `base`.
    pub fn fetch_tokens(&self, base: &str) -> Result<Vec<String>, Error> {
        let base = format!("{}/", base.trim_end_matches('/'));
        let body = self.execute(Request::get(self.url(constants::HASH_ROUTE, &base)), &base)?;
        Ok(split_lines(&body))
    }

    /// `PUT /t/<token>` with an empty body: salts of the current hash table entries.
    pub fn fetch_change_salts(&self, token: &str) -> Result<Vec<String>, Error> {
        let request = Request::put(self.url(constants::HASH_ROUTE, token), Vec::new());
        let body = self.execute(request, token)?;
        Ok(split_lines(&body))
    }

    /// `PUT /t/<token>` with one proof per salt and the new password.
    pub fn submit_password_change(
        &self,
        token: &str,
        proofs: &[String],
        password: &str,
    ) -> Result<(), Error> {
        let mut form: Vec<(String, String)> = proofs
            .iter()
            .map(|proof| (constants::PROOF_FIELD.to_string(), proof.clone()))
            .collect();
        form.push((constants::PASSWORD_FIELD.to_string(), password.to_string()));
        let request = Request::put(self.url(constants::HASH_ROUTE, token), form);
        self.execute(request, token).map(|_| ())
    }

    fn execute(&self, request: Request, token: &str) -> Result<String, Error> {
        debug!(method = ?request.method, url = %request.url, "shadowd request");
        let response = self
            .transport
            .send(&request)
            .map_err(|e| Error::HostFailure {
                address: self.address.clone(),
                reason: e.to_string(),
            })?;
        trace!(status = response.status, "shadowd response");
        match response.status {
            200 => Ok(response.body.trim_end_matches('\n').to_string()),
            204 | 404 => Err(Error::NotFound {
                address: self.address.clone(),
                token: token.to_string(),
            }),
            status => Err(Error::HostFailure {
                address: self.address.clone(),
                reason: format!("unexpected status {}: {}", status, response.body.trim()),
            }),
        }
    }
}

impl fmt::Debug for ShadowdHost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShadowdHost")
            .field("address", &self.address)
            .field("alive", &self.alive.get())
            .finish()
    }
}

impl fmt::Display for ShadowdHost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.address)
    }
}

fn split_lines(body: &str) -> Vec<String> {
    body.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}
