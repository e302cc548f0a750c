// Sample store round trips and the shipped samples

use rustsharp::samples::{check, validate, Sample, SampleError, SampleStore};
use std::path::Path;

fn shipped_samples() -> SampleStore {
    SampleStore::new(Path::new(env!("CARGO_MANIFEST_DIR")).join("samples"))
}

#[test]
fn test_shipped_samples_translate_to_expected() {
    let store = shipped_samples();
    let names = store.list().expect("Failed to list samples");
    assert!(names.len() >= 4, "expected the shipped samples, found {:?}", names);

    for name in names {
        let sample = store.load(&name).expect("Failed to load sample");
        let translated = rustsharp::translate(&sample.source).expect("Translation failed");
        if let Err(mismatch) = check(&translated, &sample.expected) {
            panic!("sample '{}' does not match: {}\n{}", name, mismatch, translated);
        }
    }
}

#[test]
fn test_shadowing_sample_binds_distinct_names() {
    let sample = shipped_samples().load("shadowing").expect("Failed to load sample");
    let translated = rustsharp::translate(&sample.source).expect("Translation failed");
    let bindings = check(&translated, &sample.expected).expect("sample should match");
    assert_eq!(bindings.get("x").map(String::as_str), Some("X"));
    assert_eq!(bindings.get("x1").map(String::as_str), Some("X1"));
    assert_eq!(bindings.get("x2").map(String::as_str), Some("X2"));
}

#[test]
fn test_store_round_trip() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let store = SampleStore::new(dir.path());
    assert!(store.list().unwrap().is_empty());

    let sample = Sample {
        source: "fn one() -> i32 { 1 }".to_string(),
        expected: "public static class Crate { public static int One() { return 1; } }".to_string(),
    };
    store.save("one", &sample).unwrap();
    store
        .save(
            "another",
            &Sample {
                source: "struct S;".to_string(),
                expected: String::new(),
            },
        )
        .unwrap();

    assert_eq!(store.list().unwrap(), vec!["another".to_string(), "one".to_string()]);
    assert!(dir.path().join("one.expected.cs").exists());

    let loaded = store.load("one").unwrap();
    assert_eq!(loaded, sample);
    assert!(validate(&rustsharp::translate(&loaded.source).unwrap(), &loaded.expected));

    store.delete("one").unwrap();
    assert_eq!(store.list().unwrap(), vec!["another".to_string()]);
    assert!(!dir.path().join("one.rs").exists());
    assert!(matches!(store.load("one"), Err(SampleError::Io { .. })));
}

#[test]
fn test_save_creates_missing_directory() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let store = SampleStore::new(dir.path().join("nested"));
    store.save("s", &Sample::default()).unwrap();
    assert_eq!(store.list().unwrap(), vec!["s".to_string()]);
}

#[test]
fn test_invalid_names_are_rejected() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let store = SampleStore::new(dir.path());
    assert!(matches!(
        store.save("a/b", &Sample::default()),
        Err(SampleError::InvalidName(ref name)) if name == "a/b"
    ));
}
