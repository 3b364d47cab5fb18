//! Container build and run smoke tests.
//!
//! The image tests need a Docker daemon and build the release image, so they are
//! ignored by default. Run with: cargo test --test container_smoke_test -- --ignored

use std::path::Path;
use std::process::{Command, Output};

fn project_root() -> &'static Path {
    Path::new(env!("CARGO_MANIFEST_DIR"))
}

fn docker_available() -> bool {
    Command::new("docker")
        .arg("--version")
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

fn docker(args: &[&str]) -> Output {
    Command::new("docker")
        .args(args)
        .current_dir(project_root())
        .output()
        .unwrap_or_else(|e| panic!("failed to run docker {args:?}: {e}"))
}

/// Removes the image when the test finishes, even on panic.
struct ImageGuard<'a>(&'a str);

impl Drop for ImageGuard<'_> {
    fn drop(&mut self) {
        let _ = docker(&["rmi", "-f", self.0]);
    }
}

fn build_image(tag: &str) -> ImageGuard<'_> {
    let build = docker(&["build", "-t", tag, "."]);
    assert!(
        build.status.success(),
        "docker build failed: {}",
        String::from_utf8_lossy(&build.stderr)
    );
    ImageGuard(tag)
}

#[test]
#[ignore = "requires a Docker daemon"]
fn test_container_builds_and_prints_greeting() {
    if !docker_available() {
        eprintln!("skipping: docker is not available");
        return;
    }

    let image = build_image("project-test:latest");
    let run = docker(&["run", "--rm", image.0]);

    assert!(
        run.status.success(),
        "container failed: {}",
        String::from_utf8_lossy(&run.stderr)
    );
    assert!(String::from_utf8_lossy(&run.stdout).contains("Hello, World!"));
}

#[test]
#[ignore = "requires a Docker daemon"]
fn test_container_sets_log_level() {
    if !docker_available() {
        eprintln!("skipping: docker is not available");
        return;
    }

    let image = build_image("project-test-env:latest");
    let run = docker(&["run", "--rm", "--entrypoint", "sh", image.0, "-c", "echo $LOG_LEVEL"]);

    assert!(
        run.status.success(),
        "container failed: {}",
        String::from_utf8_lossy(&run.stderr)
    );
    assert!(String::from_utf8_lossy(&run.stdout).contains("INFO"));
}

#[test]
fn test_dockerfile_copies_lockfile() {
    let dockerfile = std::fs::read_to_string(project_root().join("Dockerfile")).unwrap();
    let copy = dockerfile
        .lines()
        .find(|line| line.starts_with("COPY Cargo.toml"))
        .expect("manifest COPY line");
    assert!(copy.contains("Cargo.lock"), "lockfile not copied: {copy}");
}
