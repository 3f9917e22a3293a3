//! TLS trust-anchor resolution and loading.

use std::fs;
use std::path::{Path, PathBuf};

use tonic::transport::Certificate;
use x509_cert::der::Decode;

use crate::error::{ClientError, ClientResult};

/// File name of the peer TLS root certificate in the MSP layout.
pub const TRUST_ANCHOR_FILE: &str = "ca.crt";

/// Directory depth below the base directory that the fallback search visits.
pub const MAX_SEARCH_DEPTH: usize = 16;

/// Locate the TLS root certificate.
///
/// Checks `configured` first. If it does not exist, walks `base` for a
/// `ca.crt` whose path mentions `host_alias`, then for any file ending in
/// `ca.crt`. Both walks stop at the first hit.
pub fn resolve_tls_cert_path(configured: &Path, base: &Path, host_alias: &str) -> Option<PathBuf> {
    if configured.exists() {
        return Some(configured.to_path_buf());
    }

    find_file(base, MAX_SEARCH_DEPTH, &|path: &Path| {
        file_name_lower(path) == TRUST_ANCHOR_FILE && path.to_string_lossy().contains(host_alias)
    })
    .or_else(|| {
        find_file(base, MAX_SEARCH_DEPTH, &|path: &Path| {
            file_name_lower(path).ends_with(TRUST_ANCHOR_FILE)
        })
    })
}

fn file_name_lower(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_lowercase())
        .unwrap_or_default()
}

/// Depth-first search in sorted order; unreadable directories are skipped.
fn find_file(dir: &Path, depth: usize, matches: &dyn Fn(&Path) -> bool) -> Option<PathBuf> {
    let mut entries: Vec<PathBuf> = fs::read_dir(dir)
        .ok()?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .collect();
    entries.sort();

    for path in entries {
        if path.is_dir() {
            if depth == 0 {
                continue;
            }
            if let Some(found) = find_file(&path, depth - 1, matches) {
                return Some(found);
            }
        } else if matches(&path) {
            return Some(path);
        }
    }
    None
}

/// Read a PEM trust anchor, rejecting files with no certificate in them.
pub fn load_trust_anchor(path: &Path) -> ClientResult<Certificate> {
    let pem = fs::read(path)
        .map_err(|e| ClientError::configuration(path, format!("failed to read TLS cert: {}", e)))?;

    let mut reader = pem.as_slice();
    let mut count = 0usize;
    for cert in rustls_pemfile::certs(&mut reader) {
        let der =
            cert.map_err(|e| ClientError::configuration(path, format!("invalid PEM: {}", e)))?;
        x509_cert::Certificate::from_der(der.as_ref()).map_err(|e| {
            ClientError::configuration(path, format!("failed to append TLS cert: {}", e))
        })?;
        count += 1;
    }
    if count == 0 {
        return Err(ClientError::configuration(
            path,
            "failed to append TLS cert: no PEM certificates found",
        ));
    }

    tracing::debug!(path = %path.display(), certificates = count, "TLS trust anchor loaded");
    Ok(Certificate::from_pem(pem))
}
