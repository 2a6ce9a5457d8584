//! Merging of the `servers` list.

use crate::value::Value;

fn server_url(server: &Value) -> Option<&str> {
    server.as_map().and_then(|s| s.get_str("url"))
}

/// Appends overlay servers whose `url` is not yet listed.
///
/// Entries without a string `url` are compared structurally.
pub fn merge_servers(base: &mut Vec<Value>, overlay: &[Value]) {
    for server in overlay {
        let present = match server_url(server) {
            Some(url) => base.iter().any(|s| server_url(s) == Some(url)),
            None => base.contains(server),
        };
        if !present {
            base.push(server.clone());
        }
    }
}
