// -*- coding: utf-8 -*-
//
// Copyright (C) 2026 Michael Büsch <m@bues.ch>
//
// Licensed under the Apache License version 2.0
// or the MIT license, at your option.
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! This crate implements the creation of a local user account of `mkuser`.
//!
//! An [AccountSpec] is first validated and completed by [resolve].
//! That step only reads. It checks every uniqueness rule and allocates
//! free user and group ids.
//! The resulting [Account] is then written by [commit].

#![forbid(unsafe_code)]

mod commit;
mod error;
mod fs;
mod resolve;
mod spec;

pub use crate::{
    commit::commit,
    error::{AccountError, AccountResult, Field, IdKind},
    fs::{Filesystem, HostFs},
    resolve::{allocate_id, resolve},
    spec::{
        Account, AccountSpec, Policy, DEFAULT_HOME_BASE, DEFAULT_HOME_MODE, DEFAULT_SHELL,
        ID_FIRST, ID_LAST,
    },
};
use mkuser_db::{AccountFiles, Identity};

/// Validate `spec` and create the account.
///
/// All checks complete before the first write.
pub fn add_account<I, F>(
    spec: &AccountSpec,
    identity: &I,
    files: &AccountFiles,
    fs: &F,
    policy: &Policy,
    verbose: bool,
) -> AccountResult<Account>
where
    I: Identity + ?Sized,
    F: Filesystem + ?Sized,
{
    let account = resolve(spec, identity, fs, policy)?;
    commit(&account, files, fs, policy.home_mode, verbose)?;
    Ok(account)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::fake::{FakeFs, FsOp};
    use std::{
        fs::{create_dir, metadata, read_to_string, write},
        os::unix::fs::{symlink, MetadataExt as _},
        path::{Path, PathBuf},
    };
    use tempfile::TempDir;

    fn setup(passwd: &str, group: &str) -> (TempDir, AccountFiles) {
        let dir = TempDir::new().unwrap();
        let files = AccountFiles::new(dir.path().join("passwd"), dir.path().join("group"));
        write(files.passwd_path(), passwd).unwrap();
        write(files.group_path(), group).unwrap();
        (dir, files)
    }

    #[test]
    fn test_alice_on_empty_db() {
        let (_dir, files) = setup("", "");
        let fs = FakeFs::default();
        let account = add_account(
            &AccountSpec::new("alice"),
            &files,
            &files,
            &fs,
            &Policy::default(),
            false,
        )
        .unwrap();

        assert_eq!((account.uid, account.gid), (1, 1));
        assert_eq!(account.group_name, "alice");
        assert_eq!(account.home_dir, PathBuf::from("/home/alice"));
        assert_eq!(account.shell, "/sbin/nologin");

        assert_eq!(
            read_to_string(files.passwd_path()).unwrap(),
            "alice:alice:1:1::/home/alice:/sbin/nologin\n"
        );
        assert_eq!(read_to_string(files.group_path()).unwrap(), "alice:x:1:\n");
        assert_eq!(
            *fs.ops.borrow(),
            vec![
                FsOp::CreateDir(PathBuf::from("/home/alice"), 0o755),
                FsOp::Chown(PathBuf::from("/home/alice"), 1, 1),
            ]
        );
    }

    #[test]
    fn test_existing_home_no_writes() {
        let (_dir, files) = setup("", "");
        let fs = FakeFs::with_paths(&["/data/alice"]);
        let mut spec = AccountSpec::new("alice");
        spec.home_dir = Some(PathBuf::from("/data/alice"));

        let err = add_account(&spec, &files, &files, &fs, &Policy::default(), false).unwrap_err();
        assert_eq!(err.conflict_field(), Some(Field::HomeDir));
        assert_eq!(read_to_string(files.passwd_path()).unwrap(), "");
        assert_eq!(read_to_string(files.group_path()).unwrap(), "");
        assert!(fs.ops.borrow().is_empty());
    }

    #[test]
    fn test_unknown_group_no_writes() {
        let (_dir, files) = setup("", "wheel:x:10:\n");
        let fs = FakeFs::default();
        let mut spec = AccountSpec::new("alice");
        spec.supplementary_groups = vec!["nosuchgroup".to_string()];

        let err = add_account(&spec, &files, &files, &fs, &Policy::default(), false).unwrap_err();
        assert!(matches!(err, AccountError::UnknownGroup(ref g) if g == "nosuchgroup"));
        assert_eq!(read_to_string(files.passwd_path()).unwrap(), "");
        assert_eq!(read_to_string(files.group_path()).unwrap(), "wheel:x:10:\n");
        assert!(fs.ops.borrow().is_empty());
    }

    #[test]
    fn test_second_account_sees_first() {
        let (_dir, files) = setup("root:x:0:0:root:/root:/bin/sh\n", "root:x:0:\nwheel:x:10:root\n");
        let fs = FakeFs::default();
        let policy = Policy::default();

        let mut spec = AccountSpec::new("alice");
        spec.supplementary_groups = vec!["wheel".to_string()];
        add_account(&spec, &files, &files, &fs, &policy, false).unwrap();

        let bob = add_account(&AccountSpec::new("bob"), &files, &files, &fs, &policy, false).unwrap();
        assert_eq!((bob.uid, bob.gid), (2, 2));

        let err = add_account(&AccountSpec::new("alice"), &files, &files, &fs, &policy, false)
            .unwrap_err();
        assert_eq!(err.conflict_field(), Some(Field::Username));

        assert_eq!(
            read_to_string(files.group_path()).unwrap(),
            "root:x:0:\nwheel:x:10:root,alice\nalice:x:1:\nbob:x:2:\n"
        );
    }

    #[test]
    fn test_alternate_root() {
        let root = TempDir::new().unwrap();
        create_dir(root.path().join("etc")).unwrap();
        create_dir(root.path().join("home")).unwrap();
        write(root.path().join("etc/passwd"), "").unwrap();
        write(root.path().join("etc/group"), "").unwrap();
        let files = AccountFiles::default().with_root(root.path());
        let fs = HostFs::with_root(root.path());

        // Without privileges we can only chown to ourselves.
        let meta = metadata(root.path()).unwrap();
        let mut spec = AccountSpec::new("alice");
        spec.uid = Some(meta.uid());
        spec.gid = Some(meta.gid());

        let account = add_account(&spec, &files, &files, &fs, &Policy::default(), false).unwrap();
        assert_eq!(account.home_dir, Path::new("/home/alice"));
        assert!(root.path().join("home/alice").is_dir());
        assert_eq!(
            read_to_string(root.path().join("etc/passwd")).unwrap(),
            format!(
                "alice:alice:{}:{}::/home/alice:/sbin/nologin\n",
                meta.uid(),
                meta.gid()
            )
        );
    }

    #[test]
    fn test_dangling_home_symlink_no_writes() {
        let root = TempDir::new().unwrap();
        create_dir(root.path().join("etc")).unwrap();
        create_dir(root.path().join("home")).unwrap();
        write(root.path().join("etc/passwd"), "").unwrap();
        write(root.path().join("etc/group"), "").unwrap();
        symlink("/nonexistent-target", root.path().join("home/alice")).unwrap();
        let files = AccountFiles::default().with_root(root.path());
        let fs = HostFs::with_root(root.path());

        let err = add_account(
            &AccountSpec::new("alice"),
            &files,
            &files,
            &fs,
            &Policy::default(),
            false,
        )
        .unwrap_err();
        assert_eq!(err.conflict_field(), Some(Field::HomeDir));
        assert_eq!(read_to_string(root.path().join("etc/passwd")).unwrap(), "");
        assert_eq!(read_to_string(root.path().join("etc/group")).unwrap(), "");
    }
}

// vim: ts=4 sw=4 expandtab
