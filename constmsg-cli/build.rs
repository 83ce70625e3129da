use std::process::{Command, Output};

/// Expose the commit and branch being built, for `--version`.
fn git_info() -> Option<()> {
    let Output { stdout, status, .. } = Command::new("git")
        .args(["rev-parse", "HEAD", "--abbrev-ref", "HEAD"])
        .output()
        .ok()?;
    if !status.success() {
        return None;
    }
    let info = std::str::from_utf8(&stdout).ok()?;
    let (commit, branch) = info.trim_end().split_once('\n')?;
    println!("cargo:rustc-env=CONSTMSG_GIT_COMMIT={commit}");
    println!("cargo:rustc-env=CONSTMSG_GIT_BRANCH={branch}");
    println!("cargo:rustc-cfg=has_git");
    Some(())
}

fn main() {
    println!("cargo:rustc-check-cfg=cfg(has_git)");
    println!("cargo:rerun-if-changed=../.git/HEAD");
    if git_info().is_none() {
        println!("cargo:rustc-env=CONSTMSG_GIT_COMMIT=unknown");
        println!("cargo:rustc-env=CONSTMSG_GIT_BRANCH=unknown");
    }
}
