//! Ready-made check functions
//!
//! Each check answers "is the awaited condition true yet?" once per call.
//! `Ok(false)` means not yet; `Err` is a transient failure the poller logs
//! before trying again.

use std::fmt;
use std::io;
use std::net::{TcpStream, ToSocketAddrs};
use std::path::PathBuf;
use std::time::Duration;

/// Errors from a single check attempt
#[derive(Debug, thiserror::Error)]
pub enum CheckError {
    /// Filesystem or socket error other than "not there yet"
    #[error("I/O error checking {target}: {source}")]
    Io {
        target: String,
        #[source]
        source: io::Error,
    },

    /// Host name resolved to no addresses
    #[error("{0} did not resolve to any address")]
    Unresolved(String),

    /// The HTTP request itself failed (connection, timeout, TLS)
    #[error("HTTP request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

/// Wait for a path to appear, or to disappear
#[derive(Debug, Clone)]
pub struct FileCheck {
    path: PathBuf,
    absent: bool,
}

impl FileCheck {
    pub fn exists(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            absent: false,
        }
    }

    pub fn absent(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            absent: true,
        }
    }

    pub fn check(&self) -> Result<bool, CheckError> {
        let exists = self.path.try_exists().map_err(|source| CheckError::Io {
            target: self.path.display().to_string(),
            source,
        })?;
        Ok(exists != self.absent)
    }
}

/// Wait for a TCP listener to accept connections
#[derive(Debug, Clone)]
pub struct TcpCheck {
    address: String,
    connect_timeout: Duration,
}

impl TcpCheck {
    pub fn new(address: impl Into<String>, connect_timeout: Duration) -> Self {
        Self {
            address: address.into(),
            connect_timeout,
        }
    }

    pub fn check(&self) -> Result<bool, CheckError> {
        let addrs: Vec<_> = self
            .address
            .to_socket_addrs()
            .map_err(|source| CheckError::Io {
                target: self.address.clone(),
                source,
            })?
            .collect();

        if addrs.is_empty() {
            return Err(CheckError::Unresolved(self.address.clone()));
        }

        for addr in &addrs {
            match TcpStream::connect_timeout(addr, self.connect_timeout) {
                Ok(_) => return Ok(true),
                Err(e) if is_not_ready(&e) => {
                    tracing::debug!(%addr, error = %e, "not accepting connections yet");
                }
                Err(source) => {
                    return Err(CheckError::Io {
                        target: addr.to_string(),
                        source,
                    })
                }
            }
        }

        Ok(false)
    }
}

/// Connection failures that just mean "nobody listening yet"
fn is_not_ready(error: &io::Error) -> bool {
    matches!(
        error.kind(),
        io::ErrorKind::ConnectionRefused
            | io::ErrorKind::ConnectionReset
            | io::ErrorKind::TimedOut
            | io::ErrorKind::WouldBlock
    )
}

/// Wait for an HTTP endpoint to answer GET with a given status
#[derive(Debug, Clone)]
pub struct HttpCheck {
    client: reqwest::blocking::Client,
    url: String,
    expected_status: u16,
}

impl HttpCheck {
    pub fn new(
        url: impl Into<String>,
        expected_status: u16,
        attempt_timeout: Duration,
    ) -> Result<Self, CheckError> {
        let url = url.into();
        let client = reqwest::blocking::Client::builder()
            .timeout(attempt_timeout)
            .build()
            .map_err(|source| CheckError::Http {
                url: url.clone(),
                source,
            })?;

        Ok(Self {
            client,
            url,
            expected_status,
        })
    }

    pub fn check(&self) -> Result<bool, CheckError> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .map_err(|source| CheckError::Http {
                url: self.url.clone(),
                source,
            })?;

        let status = response.status().as_u16();
        if status != self.expected_status {
            tracing::debug!(url = %self.url, status, expected = self.expected_status, "unexpected status");
        }
        Ok(status == self.expected_status)
    }
}

/// Any of the supported checks
#[derive(Debug, Clone)]
pub enum Check {
    File(FileCheck),
    Tcp(TcpCheck),
    Http(HttpCheck),
}

impl Check {
    pub fn check(&self) -> Result<bool, CheckError> {
        match self {
            Check::File(check) => check.check(),
            Check::Tcp(check) => check.check(),
            Check::Http(check) => check.check(),
        }
    }
}

impl fmt::Display for Check {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Check::File(check) if check.absent => {
                write!(f, "{} to be removed", check.path.display())
            }
            Check::File(check) => write!(f, "{} to exist", check.path.display()),
            Check::Tcp(check) => write!(f, "tcp://{} to accept connections", check.address),
            Check::Http(check) => {
                write!(f, "{} to return {}", check.url, check.expected_status)
            }
        }
    }
}
