mod common;

use std::collections::BTreeSet;

use apkgraph_core::config::DownloadConfig;
use apkgraph_core::source::DependencySource;
use apkgraph_graph::{BuildOptions, DependencyGraph};
use apkgraph_repo::archive::ArchiveBackedSource;
use apkgraph_repo::fetch::{archive_name, archive_url, ArchiveFetcher};
use apkgraph_repo::metadata::{parse_archive, read_dependencies};
use tempfile::TempDir;

fn set(items: &[&str]) -> BTreeSet<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[test]
fn test_archive_name_and_url() {
    assert_eq!(archive_name("busybox", "1.37.0-r13"), "busybox-1.37.0-r13.apk");
    assert_eq!(
        archive_url("https://mirror/alpine/main/x86_64/", "a-1.apk"),
        "https://mirror/alpine/main/x86_64/a-1.apk"
    );
    assert_eq!(archive_url("https://mirror/x86_64", "a-1.apk"), "https://mirror/x86_64/a-1.apk");
}

#[test]
fn test_pkginfo_in_concatenated_gzip_members() {
    let bytes = common::apk_bytes("busybox", &["musl", "so:libc.musl-x86_64.so.1"]);
    let deps = parse_archive(bytes.as_slice()).unwrap();
    assert_eq!(deps, set(&["musl", "so:libc.musl-x86_64.so.1"]));
}

#[test]
fn test_control_tarball_fallback() {
    let bytes = common::control_bytes(&["libc6", "zlib1g"]);
    let deps = parse_archive(bytes.as_slice()).unwrap();
    assert_eq!(deps, set(&["libc6", "zlib1g"]));
}

#[test]
fn test_pkginfo_preferred_over_control() {
    let inner = common::gzip(&common::tar_bytes(&[("control", b"Depends: from-control\n")]));
    let bytes = common::gzip(&common::tar_bytes(&[
        ("control.tar.gz", &inner),
        (".PKGINFO", b"depend = from-pkginfo\n"),
    ]));
    let deps = parse_archive(bytes.as_slice()).unwrap();
    assert_eq!(deps, set(&["from-pkginfo"]));
}

#[test]
fn test_archive_without_metadata_is_an_error() {
    let bytes = common::gzip(&common::tar_bytes(&[("usr/bin/tool", b"binary")]));
    let err = parse_archive(bytes.as_slice()).unwrap_err();
    assert!(err.to_string().contains("no package metadata"), "got: {err}");
}

#[test]
fn test_corrupt_archive_reports_path() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("broken-1.0.apk");
    std::fs::write(&path, b"definitely not gzip").unwrap();
    let err = read_dependencies(&path).unwrap_err();
    let msg = err.to_string();
    assert!(msg.starts_with("Archive error"), "got: {msg}");
    assert!(msg.contains("broken-1.0.apk"), "got: {msg}");
}

#[test]
fn test_local_fetcher_finds_versioned_archive() {
    let tmp = TempDir::new().unwrap();
    let expected = common::write_apk(tmp.path(), "busybox", "1.0", &["musl"]);
    let fetcher = ArchiveFetcher::local(tmp.path(), "1.0");
    assert_eq!(fetcher.fetch("busybox").unwrap(), expected);
}

#[test]
fn test_local_fetcher_missing_archive() {
    let tmp = TempDir::new().unwrap();
    let fetcher = ArchiveFetcher::local(tmp.path(), "1.0");
    let err = fetcher.fetch("busybox").unwrap_err();
    assert!(err.to_string().contains("does not exist locally"), "got: {err}");
}

#[test]
fn test_archive_source_feeds_the_graph() {
    let tmp = TempDir::new().unwrap();
    common::write_apk(tmp.path(), "app", "1.0", &["musl", "zlib", "ghost"]);
    common::write_apk(tmp.path(), "zlib", "1.0", &["musl"]);
    common::write_apk(tmp.path(), "musl", "1.0", &[]);

    let source = ArchiveBackedSource::new(ArchiveFetcher::local(tmp.path(), "1.0"));
    let mut graph = DependencyGraph::new();
    graph.build("app", &source, &BuildOptions::default());

    let visited: Vec<&str> = graph.visited().iter().map(String::as_str).collect();
    assert_eq!(visited, ["app", "ghost", "musl", "zlib"]);
    assert_eq!(graph.dependencies("zlib"), BTreeSet::from(["musl"]));
    assert_eq!(graph.failures().len(), 1);
    assert_eq!(graph.failures()[0].package, "ghost");
}

#[test]
fn test_remote_fetcher_downloads_archive() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("GET", "/main/busybox-1.0.apk")
        .with_status(200)
        .with_body(common::apk_bytes("busybox", &["musl"]))
        .create();

    let tmp = TempDir::new().unwrap();
    let config = DownloadConfig {
        dir: tmp.path().join("downloads"),
        ..DownloadConfig::default()
    };
    let fetcher = ArchiveFetcher::remote(format!("{}/main/", server.url()), "1.0", &config).unwrap();
    let source = ArchiveBackedSource::new(fetcher);

    assert_eq!(source.dependencies_of("busybox").unwrap(), set(&["musl"]));
    assert!(tmp.path().join("downloads/busybox-1.0.apk").is_file());
    mock.assert();
}

#[test]
fn test_remote_fetcher_http_error() {
    let mut server = mockito::Server::new();
    let _mock = server
        .mock("GET", "/missing-1.0.apk")
        .with_status(404)
        .create();

    let tmp = TempDir::new().unwrap();
    let config = DownloadConfig {
        dir: tmp.path().to_path_buf(),
        ..DownloadConfig::default()
    };
    let fetcher = ArchiveFetcher::remote(server.url(), "1.0", &config).unwrap();
    let err = fetcher.fetch("missing").unwrap_err();
    assert!(err.to_string().contains("HTTP 404"), "got: {err}");
}

#[test]
fn test_remote_fetcher_rejects_empty_download() {
    let mut server = mockito::Server::new();
    let _mock = server
        .mock("GET", "/empty-1.0.apk")
        .with_status(200)
        .with_body("")
        .create();

    let tmp = TempDir::new().unwrap();
    let config = DownloadConfig {
        dir: tmp.path().to_path_buf(),
        ..DownloadConfig::default()
    };
    let fetcher = ArchiveFetcher::remote(server.url(), "1.0", &config).unwrap();
    let err = fetcher.fetch("empty").unwrap_err();
    assert!(err.to_string().contains("empty file"), "got: {err}");
    assert!(!tmp.path().join("empty-1.0.apk").exists());
}

#[test]
fn test_remote_fetcher_rejects_path_traversal() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("GET", mockito::Matcher::Any)
        .with_status(200)
        .with_body(common::apk_bytes("evil", &[]))
        .expect(0)
        .create();

    let tmp = TempDir::new().unwrap();
    let downloads = tmp.path().join("a").join("downloads");
    let config = DownloadConfig {
        dir: downloads,
        ..DownloadConfig::default()
    };
    let fetcher = ArchiveFetcher::remote(format!("{}/main/", server.url()), "1.0", &config).unwrap();

    for package in ["../../evil", "sub/evil", "..\\evil", "/evil"] {
        let err = fetcher.fetch(package).unwrap_err();
        assert!(err.to_string().starts_with("Invalid input"), "got: {err}");
    }
    assert!(!tmp.path().join("evil-1.0.apk").exists());
    mock.assert();
}

#[test]
fn test_local_fetcher_rejects_path_traversal() {
    let tmp = TempDir::new().unwrap();
    let repo = tmp.path().join("repo");
    std::fs::create_dir(&repo).unwrap();
    common::write_apk(tmp.path(), "outside", "1.0", &[]);

    let fetcher = ArchiveFetcher::local(&repo, "1.0");
    let err = fetcher.fetch("../outside").unwrap_err();
    assert!(err.to_string().starts_with("Invalid input"), "got: {err}");
}

#[test]
fn test_traversing_dependency_is_a_lookup_failure() {
    let tmp = TempDir::new().unwrap();
    common::write_apk(tmp.path(), "app", "1.0", &["../escape", "musl"]);
    common::write_apk(tmp.path(), "musl", "1.0", &[]);

    let source = ArchiveBackedSource::new(ArchiveFetcher::local(tmp.path(), "1.0"));
    let mut graph = DependencyGraph::new();
    graph.build("app", &source, &BuildOptions::default());

    assert_eq!(graph.failures().len(), 1);
    assert_eq!(graph.failures()[0].package, "../escape");
    assert!(graph.failures()[0].message.contains("not a plain file name"));
    assert_eq!(graph.dependencies("app"), BTreeSet::from(["../escape", "musl"]));
}
