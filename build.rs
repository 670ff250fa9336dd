use std::process::Command;
use std::time::{SystemTime, UNIX_EPOCH};

// Exposes APILINK_VERSION: the git tag without its `v`, a dirty tree gets
// a build timestamp, and builds outside git use the package version.
fn main() {
    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=.git/index");

    let described = Command::new("git")
        .args(["describe", "--tags", "--always", "--dirty"])
        .output()
        .ok()
        .filter(|o| o.status.success())
        .and_then(|o| String::from_utf8(o.stdout).ok())
        .map(|s| s.trim().trim_start_matches('v').to_string())
        .filter(|s| !s.is_empty());

    let version = match described {
        Some(v) if v.ends_with("-dirty") => format!("{}-{}", v, build_time()),
        Some(v) => v,
        None => format!("{}-unknown", env!("CARGO_PKG_VERSION")),
    };

    println!("cargo:rustc-env=APILINK_VERSION={}", version);
}

fn build_time() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}
