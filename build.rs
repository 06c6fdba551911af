fn main() {
    // Re-run if git HEAD changes (new commits, checkouts, etc.)
    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=.git/refs/");

    println!("cargo:rustc-env=RETOUCH_VERSION={}", version());
}

/// Builds from a release tag report the crate version; everything else
/// reports `dev@<short-hash>` so bug reports pin an exact commit.
fn version() -> String {
    if git(&["describe", "--exact-match", "--tags", "HEAD"]).is_some() {
        return std::env::var("CARGO_PKG_VERSION").unwrap_or_default();
    }
    match git(&["rev-parse", "--short", "HEAD"]) {
        Some(hash) => format!("dev@{hash}"),
        None => "dev@unknown".to_string(),
    }
}

fn git(args: &[&str]) -> Option<String> {
    let output = std::process::Command::new("git").args(args).output().ok()?;
    if !output.status.success() {
        return None;
    }
    let value = String::from_utf8_lossy(&output.stdout).trim().to_string();
    (!value.is_empty()).then_some(value)
}
