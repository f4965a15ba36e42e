#![allow(dead_code)]

use std::io::Write;
use std::path::{Path, PathBuf};

use flate2::write::GzEncoder;
use flate2::Compression;

pub fn tar_bytes(files: &[(&str, &[u8])]) -> Vec<u8> {
    let mut builder = tar::Builder::new(Vec::new());
    for (path, content) in files {
        let mut header = tar::Header::new_gnu();
        header.set_path(path).unwrap();
        header.set_size(content.len() as u64);
        header.set_mode(0o644);
        header.set_cksum();
        builder.append(&header, *content).unwrap();
    }
    builder.into_inner().unwrap()
}

pub fn gzip(bytes: &[u8]) -> Vec<u8> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(bytes).unwrap();
    encoder.finish().unwrap()
}

/// Alpine layout: a signature segment and a control segment, each its own
/// gzip member, concatenated.
pub fn apk_bytes(name: &str, deps: &[&str]) -> Vec<u8> {
    let signature = gzip(&tar_bytes(&[(".SIGN.RSA.test.rsa.pub", b"signature")]));
    let mut pkginfo = format!("# Generated by abuild\npkgname = {name}\n");
    for dep in deps {
        pkginfo.push_str(&format!("depend = {dep}\n"));
    }
    let control = gzip(&tar_bytes(&[(".PKGINFO", pkginfo.as_bytes())]));
    [signature, control].concat()
}

/// Debian-style layout: an outer gzip tar holding `control.tar.gz`.
pub fn control_bytes(deps: &[&str]) -> Vec<u8> {
    let control = format!("Package: demo\nDepends: {}\n", deps.join(", "));
    let inner = gzip(&tar_bytes(&[("control", control.as_bytes())]));
    gzip(&tar_bytes(&[
        ("debian-binary", b"2.0\n"),
        ("control.tar.gz", &inner),
    ]))
}

pub fn write_apk(dir: &Path, name: &str, version: &str, deps: &[&str]) -> PathBuf {
    let path = dir.join(format!("{name}-{version}.apk"));
    std::fs::write(&path, apk_bytes(name, deps)).unwrap();
    path
}
