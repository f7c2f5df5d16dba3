//! Custom assertions for WebDAV integration tests.

use crate::common::TestServer;
use reqwest::StatusCode;
use sha2::{Digest, Sha256};
use std::collections::HashSet;

/// Assert that a file exists and has the expected content.
pub async fn assert_file_content(server: &TestServer, path: &str, expected: &[u8]) {
    match server.get_bytes(path).await {
        Ok(actual) => {
            assert_eq!(
                actual.as_ref(),
                expected,
                "File content mismatch at {}: expected {} bytes, got {} bytes",
                path,
                expected.len(),
                actual.len()
            );
        }
        Err((status, body)) => {
            panic!("Failed to read file {path}: status={status}, body={body}");
        }
    }
}

/// Assert that a file's SHA-256 hash matches.
pub async fn assert_file_hash(server: &TestServer, path: &str, expected_hash: &[u8; 32]) {
    match server.get_bytes(path).await {
        Ok(actual) => {
            let actual_hash = sha256(&actual);
            assert_eq!(
                &actual_hash, expected_hash,
                "File hash mismatch at {path}: expected {expected_hash:x?}, got {actual_hash:x?}"
            );
        }
        Err((status, body)) => {
            panic!("Failed to read file {path}: status={status}, body={body}");
        }
    }
}

/// Assert that a response has a specific status code.
pub fn assert_status(actual: StatusCode, expected: StatusCode, context: &str) {
    assert_eq!(
        actual, expected,
        "{context}: expected status {expected}, got {actual}"
    );
}

/// Assert that a directory lists exactly the expected entries.
///
/// `expected` holds full hrefs, with a trailing `/` for collections.
pub async fn assert_dir_entries(server: &TestServer, path: &str, expected: &[&str]) {
    let (status, body) = server.propfind_body(path, "1").await;
    assert_eq!(
        status,
        StatusCode::MULTI_STATUS,
        "PROPFIND {path} failed with status {status}: {body}"
    );

    let mut actual: HashSet<String> = extract_hrefs(&body).into_iter().collect();

    // PROPFIND includes the directory itself
    let normalized = path.trim_end_matches('/');
    actual.remove(normalized);
    actual.remove(&format!("{normalized}/"));

    let expected: HashSet<String> = expected.iter().map(ToString::to_string).collect();
    let missing: Vec<_> = expected.difference(&actual).collect();
    let extra: Vec<_> = actual.difference(&expected).collect();

    assert!(
        missing.is_empty() && extra.is_empty(),
        "Directory {path} entries mismatch:\n  missing: {missing:?}\n  extra: {extra:?}\n  body: {body}"
    );
}

/// Calculate SHA-256 hash of data.
pub fn sha256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Extract decoded href values from a PROPFIND multistatus body.
///
/// Matches `<href>` with any namespace prefix. Not a general XML parser.
pub fn extract_hrefs(xml: &str) -> Vec<String> {
    let mut hrefs = Vec::new();
    let mut rest = xml;
    while let Some(lt) = rest.find('<') {
        rest = &rest[lt + 1..];
        let Some(gt) = rest.find('>') else { break };
        let tag = &rest[..gt];
        rest = &rest[gt + 1..];
        if tag.starts_with('/') {
            continue;
        }
        let local = tag.rsplit(':').next().unwrap_or(tag);
        if local == "href" {
            let end = rest.find('<').unwrap_or(rest.len());
            hrefs.push(percent_decode(&rest[..end]));
        }
    }
    hrefs
}

/// Decode `%XX` escapes as UTF-8.
fn percent_decode(s: &str) -> String {
    let bytes = s.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() {
            let decoded = std::str::from_utf8(&bytes[i + 1..i + 3])
                .ok()
                .and_then(|hex| u8::from_str_radix(hex, 16).ok());
            if let Some(byte) = decoded {
                out.push(byte);
                i += 3;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sha256() {
        let hash = sha256(b"hello world");
        let expected: [u8; 32] = [
            0xb9, 0x4d, 0x27, 0xb9, 0x93, 0x4d, 0x3e, 0x08, 0xa5, 0x2e, 0x52, 0xd7, 0xda, 0x7d,
            0xab, 0xfa, 0xc4, 0x84, 0xef, 0xe3, 0x7a, 0x53, 0x80, 0xee, 0x90, 0x88, 0xf7, 0xac,
            0xe2, 0xef, 0xcd, 0xe9,
        ];
        assert_eq!(hash, expected);
    }

    #[test]
    fn test_extract_hrefs() {
        let xml = "<D:multistatus><D:response><D:href>/</D:href></D:response>\
                   <D:response><D:href>/with%20space.txt</D:href></D:response></D:multistatus>";
        assert_eq!(extract_hrefs(xml), vec!["/", "/with space.txt"]);
    }

    #[test]
    fn test_percent_decode() {
        assert_eq!(percent_decode("hello%20world"), "hello world");
        assert_eq!(percent_decode("caf%C3%A9"), "café");
        assert_eq!(percent_decode("100%"), "100%");
    }
}
