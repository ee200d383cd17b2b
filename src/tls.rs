//! TLS for `https` targets.
//!
//! With verification off (the default), any certificate is accepted for any
//! hostname. With verification on, only the roots from the configured PEM file
//! are trusted.

use std::fs::File;
use std::io::BufReader;
use std::net::IpAddr;
use std::path::Path;
use std::sync::Arc;

use rustls::client::danger::{HandshakeSignatureValid, ServerCertVerified, ServerCertVerifier};
use rustls::crypto::{self, CryptoProvider};
use rustls::pki_types::{CertificateDer, ServerName, UnixTime};
use rustls::{ClientConfig, DigitallySignedStruct, RootCertStore, SignatureScheme};
use tokio::net::TcpStream;
use tokio_rustls::client::TlsStream;
use tokio_rustls::TlsConnector;
use url::Host;

use crate::config::Target;
use crate::error::{Error, Result};

#[derive(Debug)]
struct AcceptAnyServerCert(Arc<CryptoProvider>);

impl ServerCertVerifier for AcceptAnyServerCert {
    fn verify_server_cert(
        &self,
        _end_entity: &CertificateDer<'_>,
        _intermediates: &[CertificateDer<'_>],
        _server_name: &ServerName<'_>,
        _ocsp_response: &[u8],
        _now: UnixTime,
    ) -> std::result::Result<ServerCertVerified, rustls::Error> {
        Ok(ServerCertVerified::assertion())
    }

    fn verify_tls12_signature(
        &self,
        message: &[u8],
        cert: &CertificateDer<'_>,
        dss: &DigitallySignedStruct,
    ) -> std::result::Result<HandshakeSignatureValid, rustls::Error> {
        crypto::verify_tls12_signature(message, cert, dss, &self.0.signature_verification_algorithms)
    }

    fn verify_tls13_signature(
        &self,
        message: &[u8],
        cert: &CertificateDer<'_>,
        dss: &DigitallySignedStruct,
    ) -> std::result::Result<HandshakeSignatureValid, rustls::Error> {
        crypto::verify_tls13_signature(message, cert, dss, &self.0.signature_verification_algorithms)
    }

    fn supported_verify_schemes(&self) -> Vec<SignatureScheme> {
        self.0.signature_verification_algorithms.supported_schemes()
    }
}

pub fn client_config(target: &Target) -> Result<ClientConfig> {
    let provider = Arc::new(crypto::ring::default_provider());
    let builder = ClientConfig::builder_with_provider(provider.clone())
        .with_safe_default_protocol_versions()
        .map_err(|err| Error::Tls(err.to_string()))?;

    let mut config = if target.tls_verify {
        let path = target.ca_cert.as_deref().ok_or_else(|| {
            Error::Tls("certificate verification needs --ca-cert with trusted roots".to_string())
        })?;
        builder
            .with_root_certificates(load_roots(path)?)
            .with_no_client_auth()
    } else {
        builder
            .dangerous()
            .with_custom_certificate_verifier(Arc::new(AcceptAnyServerCert(provider)))
            .with_no_client_auth()
    };
    config.alpn_protocols = vec![b"http/1.1".to_vec()];
    Ok(config)
}

fn load_roots(path: &Path) -> Result<RootCertStore> {
    let file = File::open(path)
        .map_err(|err| Error::Tls(format!("cannot read {}: {err}", path.display())))?;
    let mut roots = RootCertStore::empty();
    for cert in rustls_pemfile::certs(&mut BufReader::new(file)) {
        let cert = cert.map_err(|err| Error::Tls(format!("bad pem in {}: {err}", path.display())))?;
        roots
            .add(cert)
            .map_err(|err| Error::Tls(err.to_string()))?;
    }
    if roots.is_empty() {
        return Err(Error::Tls(format!("no certificates in {}", path.display())));
    }
    Ok(roots)
}

/// IP literals become `IpAddress` names; `Url` keeps IPv6 hosts bracketed in `host_str`.
pub fn server_name(host: Host<&str>) -> Result<ServerName<'static>> {
    match host {
        Host::Domain(domain) => ServerName::try_from(domain.to_owned())
            .map_err(|err| Error::Tls(format!("invalid server name '{domain}': {err}"))),
        Host::Ipv4(ip) => Ok(ServerName::IpAddress(IpAddr::V4(ip).into())),
        Host::Ipv6(ip) => Ok(ServerName::IpAddress(IpAddr::V6(ip).into())),
    }
}

pub async fn connect(
    target: &Target,
    host: Host<&str>,
    stream: TcpStream,
) -> Result<TlsStream<TcpStream>> {
    let connector = TlsConnector::from(Arc::new(client_config(target)?));
    let server_name = server_name(host)?;
    connector
        .connect(server_name, stream)
        .await
        .map_err(|err| Error::Tls(err.to_string()))
}
