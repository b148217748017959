//! Host name used as the machine component of partition keys.

use std::path::Path;

const FALLBACK_MACHINE: &str = "localhost";
const HOSTNAME_FILE: &str = "/etc/hostname";

/// Resolves the local machine name.
///
/// Checks `HOSTNAME` and `COMPUTERNAME`, then `/etc/hostname`, and falls back
/// to `localhost`. Colons are replaced since they delimit partition keys.
pub fn local_machine_name() -> String {
    let from_env = ["HOSTNAME", "COMPUTERNAME"]
        .iter()
        .find_map(|var| std::env::var(var).ok());
    resolve_machine_name(from_env, Path::new(HOSTNAME_FILE))
}

fn resolve_machine_name(from_env: Option<String>, hostname_file: &Path) -> String {
    from_env
        .and_then(|name| sanitize_machine_name(&name))
        .or_else(|| {
            std::fs::read_to_string(hostname_file)
                .ok()
                .and_then(|name| sanitize_machine_name(&name))
        })
        .unwrap_or_else(|| FALLBACK_MACHINE.to_string())
}

pub fn sanitize_machine_name(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(trimmed.replace(':', "_"))
}
