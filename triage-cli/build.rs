use std::path::Path;
use std::process::Command;

/// `0.1.0 (abc1234)` inside a git checkout, plain `0.1.0` from a source tarball.
fn main() {
    let version = std::env::var("CARGO_PKG_VERSION").unwrap_or_default();
    let manifest_dir = std::env::var("CARGO_MANIFEST_DIR").unwrap_or_else(|_| ".".into());
    let git_dir = Path::new(&manifest_dir).join("..").join(".git");

    let long_version = if git_dir.exists() {
        println!("cargo:rerun-if-changed={}", git_dir.join("HEAD").display());
        println!("cargo:rerun-if-changed={}", git_dir.join("refs").display());
        match short_sha(&git_dir) {
            Some(sha) => format!("{version} ({sha})"),
            None => version,
        }
    } else {
        version
    };

    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rustc-env=TRIAGE_LONG_VERSION={long_version}");
}

fn short_sha(git_dir: &Path) -> Option<String> {
    let out = Command::new("git")
        .arg("--git-dir")
        .arg(git_dir)
        .args(["rev-parse", "--short", "HEAD"])
        .output()
        .ok()?;
    let sha = String::from_utf8(out.stdout).ok()?.trim().to_string();
    (out.status.success() && !sha.is_empty()).then_some(sha)
}
