//! TLS transport.

#![allow(clippy::missing_errors_doc)]

use std::io;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use rustls::pki_types::ServerName;
use tokio::io::{AsyncRead, AsyncWrite, ReadBuf};
use tokio::net::TcpStream;
use tokio_rustls::TlsConnector;
use tokio_rustls::client::TlsStream;
use tracing::debug;

use super::Config;
use crate::{Error, Result};

/// An established implicit-TLS connection.
pub struct ImapStream(Box<TlsStream<TcpStream>>);

impl AsyncRead for ImapStream {
    fn poll_read(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        Pin::new(&mut *self.get_mut().0).poll_read(cx, buf)
    }
}

impl AsyncWrite for ImapStream {
    fn poll_write(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        Pin::new(&mut *self.get_mut().0).poll_write(cx, buf)
    }

    fn poll_flush(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Pin::new(&mut *self.get_mut().0).poll_flush(cx)
    }

    fn poll_shutdown(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Pin::new(&mut *self.get_mut().0).poll_shutdown(cx)
    }
}

/// Creates a TLS connector trusting the webpki root set.
pub fn create_tls_connector() -> TlsConnector {
    let root_store = rustls::RootCertStore {
        roots: webpki_roots::TLS_SERVER_ROOTS.to_vec(),
    };
    let config = rustls::ClientConfig::builder()
        .with_root_certificates(root_store)
        .with_no_client_auth();
    TlsConnector::from(Arc::new(config))
}

/// Dials `config` and completes the TLS handshake within
/// `config.connect_timeout`.
///
/// An elapsed deadline is reported as [`Error::Timeout`].
pub async fn connect_tls(config: &Config) -> Result<ImapStream> {
    let server_name = ServerName::try_from(config.host.clone())?;
    let addr = config.socket_addr();
    debug!(%addr, "connecting");

    let handshake = async {
        let tcp = TcpStream::connect(&addr).await?;
        let tls = create_tls_connector().connect(server_name, tcp).await?;
        Ok::<_, Error>(tls)
    };

    let tls = tokio::time::timeout(config.connect_timeout, handshake)
        .await
        .map_err(|_| Error::Timeout(config.connect_timeout))??;

    debug!(%addr, "TLS established");
    Ok(ImapStream(Box::new(tls)))
}
