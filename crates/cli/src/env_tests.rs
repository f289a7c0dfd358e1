// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;

#[test]
fn test_vars_constants() {
    assert_eq!(vars::NOTESYNC_CONFIG, "NOTESYNC_CONFIG");
    assert_eq!(vars::NOTESYNC_DATA_DIR, "NOTESYNC_DATA_DIR");
}

#[test]
fn test_data_dir_roundtrip() {
    std::env::set_var("NOTESYNC_DATA_DIR", "/tmp/notesync-env-test");
    assert_eq!(data_dir(), Some(PathBuf::from("/tmp/notesync-env-test")));

    std::env::set_var("NOTESYNC_DATA_DIR", "");
    assert_eq!(data_dir(), None);

    std::env::remove_var("NOTESYNC_DATA_DIR");
    assert_eq!(data_dir(), None);
}
