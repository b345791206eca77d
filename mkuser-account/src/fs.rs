// -*- coding: utf-8 -*-
//
// Copyright (C) 2026 Michael Büsch <m@bues.ch>
//
// Licensed under the Apache License version 2.0
// or the MIT license, at your option.
// SPDX-License-Identifier: Apache-2.0 OR MIT

use mkuser_db::rooted;
use std::{
    fs::{read_dir, set_permissions, symlink_metadata, DirBuilder, Permissions},
    io,
    os::unix::fs::{lchown, DirBuilderExt as _, PermissionsExt as _},
    path::{Path, PathBuf},
};

/// Filesystem operations needed to set up a home directory.
pub trait Filesystem {
    /// Does anything exist at `path`?
    ///
    /// A symbolic link counts as existing, even if its target does not.
    fn exists(&self, path: &Path) -> io::Result<bool>;

    /// Create a single directory with the given permission bits.
    fn create_dir(&self, path: &Path, mode: u32) -> io::Result<()>;

    /// Set the owner of `path` and everything below it.
    fn chown_recursive(&self, path: &Path, uid: u32, gid: u32) -> io::Result<()>;
}

/// The real filesystem, optionally below an alternate root directory.
#[derive(Clone, Debug, Default)]
pub struct HostFs {
    root: Option<PathBuf>,
}

impl HostFs {
    pub fn new() -> Self {
        Default::default()
    }

    /// All paths are interpreted relative to `root`.
    pub fn with_root(root: &Path) -> Self {
        Self {
            root: Some(root.to_path_buf()),
        }
    }

    fn host_path(&self, path: &Path) -> PathBuf {
        match &self.root {
            Some(root) => rooted(root, path),
            None => path.to_path_buf(),
        }
    }
}

impl Filesystem for HostFs {
    fn exists(&self, path: &Path) -> io::Result<bool> {
        match symlink_metadata(self.host_path(path)) {
            Ok(_) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e),
        }
    }

    fn create_dir(&self, path: &Path, mode: u32) -> io::Result<()> {
        let path = self.host_path(path);
        DirBuilder::new().mode(mode).create(&path)?;
        // The umask may have cleared bits.
        set_permissions(&path, Permissions::from_mode(mode))
    }

    fn chown_recursive(&self, path: &Path, uid: u32, gid: u32) -> io::Result<()> {
        chown_tree(&self.host_path(path), uid, gid)
    }
}

fn with_path(op: &str, path: &Path) -> impl FnOnce(io::Error) -> io::Error {
    let msg = format!("{op} {}", path.display());
    move |e| io::Error::new(e.kind(), format!("{msg}: {e}"))
}

/// Pre-order walk in name order. Symbolic links are not followed.
fn chown_tree(path: &Path, uid: u32, gid: u32) -> io::Result<()> {
    lchown(path, Some(uid), Some(gid)).map_err(with_path("chown", path))?;

    let meta = symlink_metadata(path).map_err(with_path("stat", path))?;
    if meta.is_dir() {
        let mut entries = read_dir(path)
            .map_err(with_path("read directory", path))?
            .map(|entry| entry.map(|e| e.path()))
            .collect::<io::Result<Vec<_>>>()
            .map_err(with_path("read directory", path))?;
        entries.sort();
        for entry in entries {
            chown_tree(&entry, uid, gid)?;
        }
    }
    Ok(())
}



// vim: ts=4 sw=4 expandtab
