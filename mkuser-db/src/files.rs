// -*- coding: utf-8 -*-
//
// Copyright (C) 2026 Michael Büsch <m@bues.ch>
//
// Licensed under the Apache License version 2.0
// or the MIT license, at your option.
// SPDX-License-Identifier: Apache-2.0 OR MIT

use crate::{
    db::{parse_group, parse_passwd, AccountDb},
    identity::Identity,
    record::{enroll_members, DbError, GroupEntry, PasswdEntry},
};
use std::{
    fs::{read_to_string, OpenOptions},
    io::{self, Write as _},
    path::{Path, PathBuf},
};

pub const PASSWD_PATH: &str = "/etc/passwd";
pub const GROUP_PATH: &str = "/etc/group";

/// Place an absolute system path below an alternate root directory.
pub fn rooted(root: &Path, path: &Path) -> PathBuf {
    root.join(path.strip_prefix("/").unwrap_or(path))
}

fn invalid_data(path: &Path, e: DbError) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, format!("{}: {e}", path.display()))
}

/// The passwd and group database files.
///
/// Every read is a full read of the file, so lookups always see
/// the records appended so far.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AccountFiles {
    passwd: PathBuf,
    group: PathBuf,
}

impl Default for AccountFiles {
    fn default() -> Self {
        Self::new(PASSWD_PATH, GROUP_PATH)
    }
}

impl AccountFiles {
    pub fn new(passwd: impl Into<PathBuf>, group: impl Into<PathBuf>) -> Self {
        Self {
            passwd: passwd.into(),
            group: group.into(),
        }
    }

    /// The same databases below an alternate root directory.
    pub fn with_root(&self, root: &Path) -> Self {
        Self {
            passwd: rooted(root, &self.passwd),
            group: rooted(root, &self.group),
        }
    }

    pub fn passwd_path(&self) -> &Path {
        &self.passwd
    }

    pub fn group_path(&self) -> &Path {
        &self.group
    }

    pub fn read_users(&self) -> io::Result<Vec<PasswdEntry>> {
        let data = read_to_string(&self.passwd)?;
        parse_passwd(&data).map_err(|e| invalid_data(&self.passwd, e))
    }

    pub fn read_groups(&self) -> io::Result<Vec<GroupEntry>> {
        let data = read_to_string(&self.group)?;
        parse_group(&data).map_err(|e| invalid_data(&self.group, e))
    }

    /// Read both databases into a snapshot.
    pub fn load(&self) -> io::Result<AccountDb> {
        let mut db = AccountDb::new();
        for user in self.read_users()? {
            db.add_user(user);
        }
        for group in self.read_groups()? {
            db.add_group(group);
        }
        Ok(db)
    }

    /// Append a record to the passwd file.
    /// The file must exist already.
    pub fn append_user(&self, entry: &PasswdEntry) -> io::Result<()> {
        append_line(&self.passwd, &entry.to_string())
    }

    /// Append a record to the group file.
    /// The file must exist already.
    pub fn append_group(&self, entry: &GroupEntry) -> io::Result<()> {
        append_line(&self.group, &entry.to_string())
    }

    /// Rewrite the group file with `username` added to the
    /// member lists of `groups`.
    pub fn enroll(&self, username: &str, groups: &[String]) -> io::Result<()> {
        let data = read_to_string(&self.group)?;
        let data =
            enroll_members(&data, username, groups).map_err(|e| invalid_data(&self.group, e))?;
        OpenOptions::new()
            .write(true)
            .truncate(true)
            .open(&self.group)?
            .write_all(data.as_bytes())
    }
}

fn append_line(path: &Path, line: &str) -> io::Result<()> {
    OpenOptions::new()
        .append(true)
        .open(path)?
        .write_all(format!("{line}\n").as_bytes())
}

impl Identity for AccountFiles {
    fn user_name_exists(&self, name: &str) -> io::Result<bool> {
        Ok(self.read_users()?.iter().any(|u| u.name == name))
    }

    fn user_id_exists(&self, uid: u32) -> io::Result<bool> {
        Ok(self.read_users()?.iter().any(|u| u.uid == uid))
    }

    fn group_name_exists(&self, name: &str) -> io::Result<bool> {
        Ok(self.read_groups()?.iter().any(|g| g.name == name))
    }

    fn group_id_exists(&self, gid: u32) -> io::Result<bool> {
        Ok(self.read_groups()?.iter().any(|g| g.gid == gid))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::write;
    use tempfile::TempDir;

    fn setup(passwd: &str, group: &str) -> (TempDir, AccountFiles) {
        let dir = TempDir::new().unwrap();
        let files = AccountFiles::new(dir.path().join("passwd"), dir.path().join("group"));
        write(files.passwd_path(), passwd).unwrap();
        write(files.group_path(), group).unwrap();
        (dir, files)
    }

    #[test]
    fn test_rooted() {
        assert_eq!(
            rooted(Path::new("/mnt/sys"), Path::new("/etc/passwd")),
            PathBuf::from("/mnt/sys/etc/passwd")
        );
        assert_eq!(
            rooted(Path::new("/mnt/sys"), Path::new("etc/group")),
            PathBuf::from("/mnt/sys/etc/group")
        );
        let files = AccountFiles::default().with_root(Path::new("/target"));
        assert_eq!(files.passwd_path(), Path::new("/target/etc/passwd"));
        assert_eq!(files.group_path(), Path::new("/target/etc/group"));
    }

    #[test]
    fn test_append_visible_to_lookup() {
        let (_dir, files) = setup("root:x:0:0:root:/root:/bin/sh\n", "root:x:0:\n");
        assert!(!files.user_name_exists("alice").unwrap());
        assert!(!files.group_id_exists(5).unwrap());

        files
            .append_user(&PasswdEntry {
                name: "alice".to_string(),
                group: "alice".to_string(),
                uid: 5,
                gid: 5,
                gecos: String::new(),
                home: "/home/alice".to_string(),
                shell: "/sbin/nologin".to_string(),
            })
            .unwrap();
        files.append_group(&GroupEntry::new("alice", 5)).unwrap();

        assert!(files.user_name_exists("alice").unwrap());
        assert!(files.user_id_exists(5).unwrap());
        assert!(files.group_name_exists("alice").unwrap());
        assert!(files.group_id_exists(5).unwrap());

        assert_eq!(
            read_to_string(files.passwd_path()).unwrap(),
            "root:x:0:0:root:/root:/bin/sh\nalice:alice:5:5::/home/alice:/sbin/nologin\n"
        );
        assert_eq!(
            read_to_string(files.group_path()).unwrap(),
            "root:x:0:\nalice:x:5:\n"
        );
    }

    #[test]
    fn test_append_requires_existing_file() {
        let dir = TempDir::new().unwrap();
        let files = AccountFiles::new(dir.path().join("passwd"), dir.path().join("group"));
        let err = files.append_group(&GroupEntry::new("alice", 1)).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn test_enroll() {
        let (_dir, files) = setup("", "a:x:1:\nb:x:2:bob\nc:x:3:\n");
        files
            .enroll("alice", &["b".to_string(), "c".to_string()])
            .unwrap();
        assert_eq!(
            read_to_string(files.group_path()).unwrap(),
            "a:x:1:\nb:x:2:bob,alice\nc:x:3:alice\n"
        );
    }

    #[test]
    fn test_malformed_database() {
        let (_dir, files) = setup("garbage\n", "");
        let err = files.user_id_exists(1).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
        assert!(err.to_string().contains("passwd line 1"));
    }

    #[test]
    fn test_load() {
        let (_dir, files) = setup("root:x:0:0:root:/root:/bin/sh\n", "root:x:0:\nwheel:x:10:root\n");
        let db = files.load().unwrap();
        assert_eq!(db.users().len(), 1);
        assert_eq!(db.groups().len(), 2);
    }
}

// vim: ts=4 sw=4 expandtab
