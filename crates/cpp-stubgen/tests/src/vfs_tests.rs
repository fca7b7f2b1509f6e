use std::path::Path;

use super::*;

#[test]
fn lexical_cleanup() {
    assert_eq!(lexically_normalized(Path::new("/a/./b/../c.h")), Path::new("/a/c.h"));
    assert_eq!(lexically_normalized(Path::new("../x.cpp")), Path::new("../x.cpp"));
}

#[test]
fn missing_files_normalize_lexically() {
    assert_eq!(normalized_path(Path::new("/no-such-dir/./x/../shape.h")), Path::new("/no-such-dir/shape.h"));
}

#[test]
fn same_file_sees_through_symlinks_and_dots() {
    let dir = tempfile::tempdir().unwrap();
    let real = dir.path().join("shape.h");
    std::fs::write(&real, "").unwrap();
    let dotted = dir.path().join(".").join("shape.h");
    assert!(same_file(&real, &dotted));
    assert!(!same_file(&real, &dir.path().join("other.h")));

    #[cfg(unix)]
    {
        let link = dir.path().join("link.h");
        std::os::unix::fs::symlink(&real, &link).unwrap();
        assert!(same_file(&real, &link));
    }
}

#[test]
fn absolute_paths_are_anchored_at_the_current_directory() {
    let absolute = absolute_normalized(Path::new("no-such-file.cpp"));
    assert!(absolute.is_absolute());
    assert!(absolute.ends_with("no-such-file.cpp"));
}
