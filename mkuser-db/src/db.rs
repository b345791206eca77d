// -*- coding: utf-8 -*-
//
// Copyright (C) 2026 Michael Büsch <m@bues.ch>
//
// Licensed under the Apache License version 2.0
// or the MIT license, at your option.
// SPDX-License-Identifier: Apache-2.0 OR MIT

use crate::{
    identity::Identity,
    record::{is_compat_line, DbError, GroupEntry, PasswdEntry},
};
use std::io;

/// Parsed snapshot of the passwd and group databases.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AccountDb {
    users: Vec<PasswdEntry>,
    groups: Vec<GroupEntry>,
}

impl AccountDb {
    /// An empty database.
    pub fn new() -> Self {
        Default::default()
    }

    /// Parse the contents of a passwd and a group file.
    pub fn parse(passwd: &str, group: &str) -> Result<Self, DbError> {
        Ok(Self {
            users: parse_passwd(passwd)?,
            groups: parse_group(group)?,
        })
    }

    pub fn users(&self) -> &[PasswdEntry] {
        &self.users
    }

    pub fn groups(&self) -> &[GroupEntry] {
        &self.groups
    }

    /// Get a user by name.
    pub fn user(&self, name: &str) -> Option<&PasswdEntry> {
        self.users.iter().find(|u| u.name == name)
    }

    /// Get a group by name.
    pub fn group(&self, name: &str) -> Option<&GroupEntry> {
        self.groups.iter().find(|g| g.name == name)
    }

    pub fn add_user(&mut self, entry: PasswdEntry) {
        self.users.push(entry);
    }

    pub fn add_group(&mut self, entry: GroupEntry) {
        self.groups.push(entry);
    }
}

impl Identity for AccountDb {
    fn user_name_exists(&self, name: &str) -> io::Result<bool> {
        Ok(self.user(name).is_some())
    }

    fn user_id_exists(&self, uid: u32) -> io::Result<bool> {
        Ok(self.users.iter().any(|u| u.uid == uid))
    }

    fn group_name_exists(&self, name: &str) -> io::Result<bool> {
        Ok(self.group(name).is_some())
    }

    fn group_id_exists(&self, gid: u32) -> io::Result<bool> {
        Ok(self.groups.iter().any(|g| g.gid == gid))
    }
}

/// Parse all records of a passwd file.
/// Blank lines and NIS compat lines are skipped.
pub fn parse_passwd(content: &str) -> Result<Vec<PasswdEntry>, DbError> {
    let mut users = vec![];
    for (idx, line) in content.lines().enumerate() {
        if line.trim().is_empty() || is_compat_line(line) {
            continue;
        }
        let entry = PasswdEntry::parse(line).map_err(|source| DbError {
            database: "passwd",
            line: idx + 1,
            source,
        })?;
        users.push(entry);
    }
    Ok(users)
}

/// Parse all records of a group file.
/// Blank lines and NIS compat lines are skipped.
pub fn parse_group(content: &str) -> Result<Vec<GroupEntry>, DbError> {
    let mut groups = vec![];
    for (idx, line) in content.lines().enumerate() {
        if line.trim().is_empty() || is_compat_line(line) {
            continue;
        }
        let entry = GroupEntry::parse(line).map_err(|source| DbError {
            database: "group",
            line: idx + 1,
            source,
        })?;
        groups.push(entry);
    }
    Ok(groups)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::RecordError;

    const PASSWD: &str = "\
root:x:0:0:root:/root:/bin/bash
daemon:x:1:1:daemon:/usr/sbin:/usr/sbin/nologin
+::::::

bob:x:1000:1000:Bob:/home/bob:/bin/sh
";

    const GROUP: &str = "\
root:x:0:
daemon:x:1:
wheel:x:10:root,bob
bob:x:1000:
";

    #[test]
    fn test_parse() {
        let db = AccountDb::parse(PASSWD, GROUP).unwrap();
        assert_eq!(db.users().len(), 3);
        assert_eq!(db.groups().len(), 4);
        assert_eq!(db.user("bob").unwrap().uid, 1000);
        assert_eq!(db.group("wheel").unwrap().members, vec!["root", "bob"]);
    }

    #[test]
    fn test_lookup() {
        let db = AccountDb::parse(PASSWD, GROUP).unwrap();
        assert!(db.user_name_exists("daemon").unwrap());
        assert!(!db.user_name_exists("alice").unwrap());
        assert!(db.user_id_exists(1000).unwrap());
        assert!(!db.user_id_exists(2).unwrap());
        assert!(db.group_name_exists("wheel").unwrap());
        assert!(!db.group_name_exists("audio").unwrap());
        assert!(db.group_id_exists(10).unwrap());
        assert!(!db.group_id_exists(11).unwrap());
    }

    #[test]
    fn test_parse_error_line() {
        let err = AccountDb::parse("root:x:0:0:root:/root:/bin/bash\nbroken\n", "").unwrap_err();
        assert_eq!(err.database, "passwd");
        assert_eq!(err.line, 2);
        assert_eq!(
            err.source,
            RecordError::FieldCount {
                expected: 7,
                got: 1
            }
        );

        let err = AccountDb::parse("", "g:x:nan:\n").unwrap_err();
        assert_eq!(err.database, "group");
        assert_eq!(err.line, 1);
    }

    #[test]
    fn test_add() {
        let mut db = AccountDb::new();
        db.add_group(GroupEntry::new("staff", 50));
        assert!(db.group_id_exists(50).unwrap());
        assert!(!db.user_id_exists(50).unwrap());
    }
}

// vim: ts=4 sw=4 expandtab
