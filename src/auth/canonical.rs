//! Canonical form of a signed request.

/// The (method, path, timestamp, body) tuple a signature covers.
///
/// Signer and verifier must build this from identical values: no trailing
/// slash trimming, no case folding, no body re-serialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CanonicalRequest<'a> {
    /// HTTP method, uppercase.
    pub method: &'a str,
    /// Request path with leading slash and without query string.
    pub path: &'a str,
    /// Unix seconds exactly as sent in the timestamp header.
    pub timestamp: &'a str,
    /// Raw body bytes, empty for methods without a body.
    pub body: &'a [u8],
}

impl<'a> CanonicalRequest<'a> {
    pub fn new(method: &'a str, path: &'a str, timestamp: &'a str, body: &'a [u8]) -> Self {
        Self {
            method,
            path,
            timestamp,
            body,
        }
    }

    /// Get the message to sign.
    ///
    /// Format: `{method}\n{path}\n{timestamp}\n{body}`
    pub fn signing_message(&self) -> Vec<u8> {
        let mut message = Vec::with_capacity(
            self.method.len() + self.path.len() + self.timestamp.len() + self.body.len() + 3,
        );
        message.extend_from_slice(self.method.as_bytes());
        message.push(b'\n');
        message.extend_from_slice(self.path.as_bytes());
        message.push(b'\n');
        message.extend_from_slice(self.timestamp.as_bytes());
        message.push(b'\n');
        message.extend_from_slice(self.body);
        message
    }

    /// The signing message as text. Non-UTF-8 body bytes are replaced, so
    /// use this for display only.
    pub fn to_display_string(&self) -> String {
        String::from_utf8_lossy(&self.signing_message()).into_owned()
    }
}

/// Whether requests with this method have their body covered by the
/// signature. Every other method signs an empty body.
pub fn method_carries_body(method: &str) -> bool {
    matches!(method, "POST" | "PUT" | "PATCH")
}
