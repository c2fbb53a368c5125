//! Pod identity embedded in a remote node's comment field.
//!
//! The comment is the only side channel the scheduler offers, so the pod's
//! identity rides there as `key=value` pairs. Decoding is deliberately
//! permissive: foreign or empty comment text yields the zero value rather
//! than an error, since administrators may overwrite the comment at any
//! time.

use std::fmt;

/// Pod identity carried in `RemoteNode.comment`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PodInfo {
    pub namespace: String,
    pub pod_name: String,
    /// The orchestration host the pod is bound to.
    pub host: String,
}

impl PodInfo {
    pub fn new(namespace: &str, pod_name: &str, host: &str) -> Self {
        Self {
            namespace: namespace.to_string(),
            pod_name: pod_name.to_string(),
            host: host.to_string(),
        }
    }

    /// Render the comment wire form.
    pub fn encode(&self) -> String {
        format!(
            "namespace={},pod={},host={}",
            self.namespace, self.pod_name, self.host
        )
    }

    /// Parse comment text. Unrecognized keys and malformed fragments are
    /// skipped; nothing recognizable yields the zero value.
    pub fn decode(text: &str) -> Self {
        let mut info = Self::default();
        for fragment in text.split(',') {
            let Some((key, value)) = fragment.split_once('=') else {
                continue;
            };
            match key.trim() {
                "namespace" => info.namespace = value.to_string(),
                "pod" => info.pod_name = value.to_string(),
                "host" => info.host = value.to_string(),
                _ => {}
            }
        }
        info
    }
}

impl fmt::Display for PodInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}
