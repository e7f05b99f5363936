use std::env;

use classpath::{display_name, Classpath, ContainerKind};

use crate::testdata;

#[test]
fn recognizes_directories_and_archives() {
    let root = tempfile::tempdir().expect("create tempdir");
    let classes = root.path().join("classes");
    std::fs::create_dir(&classes).expect("create classes dir");
    let jar = root.path().join("app.jar");
    testdata::stored_jar(&jar, &[]);

    let joined = env::join_paths([&classes, &jar]).expect("join classpath");
    let classpath = Classpath::parse(&joined.to_string_lossy());

    assert_eq!(classpath.len(), 2);
    let kinds = classpath
        .containers()
        .iter()
        .map(|c| c.kind())
        .collect::<Vec<_>>();
    assert_eq!(kinds, vec![ContainerKind::Directory, ContainerKind::Jar]);

    let names = classpath
        .containers()
        .iter()
        .map(|c| c.name().as_str())
        .collect::<Vec<_>>();
    assert_eq!(names[0], format!("dir:{}", classes.display()));
    assert_eq!(names[1], "jar:app_jar");
}

#[test]
fn drops_unrecognized_entries() {
    let root = tempfile::tempdir().expect("create tempdir");
    let readme = root.path().join("README.txt");
    std::fs::write(&readme, b"not a container").expect("write fixture");
    let missing = root.path().join("missing.jar");

    let joined = env::join_paths([&readme, &missing]).expect("join classpath");
    let classpath = Classpath::parse(&joined.to_string_lossy());

    assert!(classpath.is_empty());
}

#[test]
fn archive_suffixes_are_case_insensitive() {
    let root = tempfile::tempdir().expect("create tempdir");
    let jar = root.path().join("Lib.JAR");
    testdata::stored_jar(&jar, &[]);

    let classpath = Classpath::parse(&jar.to_string_lossy());

    assert_eq!(classpath.len(), 1);
    assert_eq!(classpath.containers()[0].kind(), ContainerKind::Jar);
    assert_eq!(classpath.containers()[0].name(), "jar:Lib_jar");
}

#[test]
fn display_names_decode_container_encodings() {
    assert_eq!(display_name("dir:/work/classes"), "/work/classes");
    assert_eq!(display_name("jar:guava_jar"), "guava.jar");
    assert_eq!(display_name("war:shop_war"), "shop.war");
    assert_eq!(display_name("ear:suite_ear"), "suite.ear");
    assert_eq!(display_name("rar:adapter_rar"), "adapter.rar");
    assert_eq!(display_name("plain.name"), "plain.name");
}
