use std::collections::HashSet;

use classpath::{walk, Classpath, Error};

use crate::testdata;

fn parse_single(path: &std::path::Path) -> Classpath {
    let classpath = Classpath::parse(&path.to_string_lossy());
    assert_eq!(classpath.len(), 1, "fixture must parse to one container");
    classpath
}

#[test]
fn walks_directory_containers() {
    let _ = pretty_env_logger::try_init();
    let root = tempfile::tempdir().expect("create tempdir");
    testdata::file(root.path(), "a/b/C.class", b"stub");
    testdata::file(root.path(), "a/D.class", b"stub");
    testdata::file(root.path(), "a/notes.txt", b"not a class");

    let classpath = parse_single(root.path());
    let found = walk(&classpath, |_| false)
        .map(|entry| entry.map(|e| e.class_path().to_owned()))
        .collect::<Result<HashSet<_>, _>>()
        .expect("walk fixture");

    let expected = ["a/b/C", "a/D"]
        .into_iter()
        .map(str::to_owned)
        .collect::<HashSet<_>>();
    assert_eq!(found, expected);
}

#[test]
fn walks_archive_containers() {
    let _ = pretty_env_logger::try_init();
    let root = tempfile::tempdir().expect("create tempdir");
    let jar = root.path().join("app.jar");
    testdata::stored_jar(
        &jar,
        &[
            ("p/Q.class", b"artifact-bytes"),
            ("META-INF/MANIFEST.MF", b"Manifest-Version: 1.0"),
        ],
    );

    let classpath = parse_single(&jar);
    let entries = walk(&classpath, |_| false)
        .collect::<Result<Vec<_>, _>>()
        .expect("walk fixture");

    assert_eq!(entries.len(), 1);
    let entry = &entries[0];
    assert_eq!(entry.class_path(), "p/Q");
    assert_eq!(entry.container().name(), "jar:app_jar");
    assert_eq!(entry.bytes().expect("read entry"), b"artifact-bytes");
}

#[test]
fn archives_without_classes_contribute_no_entries() {
    let root = tempfile::tempdir().expect("create tempdir");
    let jar = root.path().join("empty.jar");
    testdata::stored_jar(&jar, &[("META-INF/MANIFEST.MF", b"Manifest-Version: 1.0")]);

    let classpath = parse_single(&jar);
    let entries = walk(&classpath, |_| false)
        .collect::<Result<Vec<_>, _>>()
        .expect("walk fixture");

    assert!(entries.is_empty());
}

#[test]
fn skip_predicate_prevents_opening() {
    let root = tempfile::tempdir().expect("create tempdir");
    testdata::file(root.path(), "a/C.class", b"stub");

    let classpath = parse_single(root.path());
    let mut consulted = Vec::new();
    let entries = walk(&classpath, |name| {
        consulted.push(name.to_owned());
        true
    })
    .collect::<Result<Vec<_>, _>>()
    .expect("walk fixture");

    assert!(entries.is_empty());
    assert_eq!(consulted.len(), 1);
    assert!(consulted[0].starts_with("dir:"));
}

#[test]
fn unreadable_archives_are_reported_and_passed_over() {
    let _ = pretty_env_logger::try_init();
    let root = tempfile::tempdir().expect("create tempdir");
    let bad = root.path().join("corrupt.jar");
    std::fs::write(&bad, b"this is not a zip archive").expect("write fixture");
    testdata::file(&root.path().join("classes"), "ok/C.class", b"stub");

    let joined =
        std::env::join_paths([bad.as_path(), root.path().join("classes").as_path()])
            .expect("join classpath");
    let classpath = Classpath::parse(&joined.to_string_lossy());
    assert_eq!(classpath.len(), 2);

    let (mut failures, mut found) = (Vec::new(), Vec::new());
    for entry in walk(&classpath, |_| false) {
        match entry {
            Ok(entry) => found.push(entry.class_path().to_owned()),
            Err(error) => failures.push(error),
        }
    }

    assert_eq!(found, vec!["ok/C".to_owned()]);
    assert_eq!(failures.len(), 1);
    assert!(matches!(failures[0], Error::Expand { .. }));
}
