use std::{thread, time::Duration};

use xshell::{cmd, Shell};

/// Crates in publish order, the derive first.
const CRATES: [&str; 2] = ["clop-macros", "clop"];

fn main() -> xshell::Result<()> {
    let sh = Shell::new()?;

    cmd!(sh, "rustup toolchain install stable --no-self-update").run()?;
    let _e = sh.push_env("RUSTUP_TOOLCHAIN", "stable");
    cmd!(sh, "rustc --version").run()?;

    Section::new("TEST").run(|| {
        cmd!(sh, "cargo test --workspace --no-run").run()?;
        cmd!(sh, "cargo test --workspace").run()
    })?;
    Section::new("DOC").run(|| {
        let _e = sh.push_env("RUSTDOCFLAGS", "-D warnings");
        cmd!(sh, "cargo doc --no-deps -p clop").run()
    })?;
    Section::new("PUBLISH").run(|| publish(&sh))
}

/// Tags and publishes a version that master has not released yet.
fn publish(sh: &Shell) -> xshell::Result<()> {
    let pkgid = cmd!(sh, "cargo pkgid -p clop").read()?;
    let version = pkgid.rsplit(['#', '@']).next().unwrap_or_default().to_string();
    let tag = format!("v{version}");

    let branch = cmd!(sh, "git branch --show-current").read()?;
    let tags = cmd!(sh, "git tag --list").read()?;
    if branch != "master" || tags.split_ascii_whitespace().any(|it| it == tag) {
        println!("nothing to publish for {tag} on {branch}");
        return Ok(());
    }

    cmd!(sh, "git tag {tag}").run()?;
    for (i, krate) in CRATES.iter().enumerate() {
        cmd!(sh, "cargo publish -p {krate}").run()?;
        if i + 1 < CRATES.len() {
            wait_for_index(sh, krate, &version)?;
        }
    }
    cmd!(sh, "git push --tags").run()
}

/// The next crate can only be published once the index serves this one.
fn wait_for_index(sh: &Shell, krate: &str, version: &str) -> xshell::Result<()> {
    for _ in 0..100 {
        thread::sleep(Duration::from_secs(3));
        let stderr = cmd!(sh, "cargo install {krate} --version {version} --bin non-existing")
            .ignore_status()
            .read_stderr()?;
        if stderr.contains("Installing") {
            return Ok(());
        }
    }
    eprintln!("{krate} {version} did not show up in the index, publishing anyway");
    Ok(())
}

/// A collapsible group in the CI log.
struct Section;

impl Section {
    fn new(name: &str) -> Section {
        println!("::group::{name}");
        Section
    }

    /// Closes the group once `f` returns, failed or not.
    fn run<T>(self, f: impl FnOnce() -> T) -> T {
        f()
    }
}

impl Drop for Section {
    fn drop(&mut self) {
        println!("::endgroup::");
    }
}
