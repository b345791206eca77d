// -*- coding: utf-8 -*-
//
// Copyright (C) 2026 Michael Büsch <m@bues.ch>
//
// Licensed under the Apache License version 2.0
// or the MIT license, at your option.
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::fmt;
use thiserror::Error;

const PASSWD_FIELDS: usize = 7;
const GROUP_FIELDS: usize = 4;

/// Error while parsing a single database line.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RecordError {
    #[error("expected {expected} colon separated fields, got {got}")]
    FieldCount { expected: usize, got: usize },

    #[error("invalid numeric id '{0}'")]
    BadId(String),
}

/// Error while parsing a whole database file.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{database} line {line}: {source}")]
pub struct DbError {
    /// `"passwd"` or `"group"`.
    pub database: &'static str,
    /// 1-based line number.
    pub line: usize,
    #[source]
    pub source: RecordError,
}

fn parse_id(s: &str) -> Result<u32, RecordError> {
    s.parse().map_err(|_| RecordError::BadId(s.to_string()))
}

/// NIS compat entries (`+name`, `-name`, `+`) carry no local id.
pub(crate) fn is_compat_line(line: &str) -> bool {
    line.starts_with('+') || line.starts_with('-')
}

/// One line of the passwd database:
/// `name:group:uid:gid:gecos:home:shell`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PasswdEntry {
    pub name: String,
    /// Second field.
    /// New records carry the primary group name here.
    /// Existing lines usually hold a password placeholder like `x`.
    pub group: String,
    pub uid: u32,
    pub gid: u32,
    pub gecos: String,
    pub home: String,
    pub shell: String,
}

impl PasswdEntry {
    pub fn parse(line: &str) -> Result<Self, RecordError> {
        let fields: Vec<&str> = line.splitn(PASSWD_FIELDS, ':').collect();
        if fields.len() != PASSWD_FIELDS {
            return Err(RecordError::FieldCount {
                expected: PASSWD_FIELDS,
                got: fields.len(),
            });
        }
        Ok(Self {
            name: fields[0].to_string(),
            group: fields[1].to_string(),
            uid: parse_id(fields[2])?,
            gid: parse_id(fields[3])?,
            gecos: fields[4].to_string(),
            home: fields[5].to_string(),
            shell: fields[6].to_string(),
        })
    }
}

impl fmt::Display for PasswdEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}:{}:{}:{}:{}",
            self.name, self.group, self.uid, self.gid, self.gecos, self.home, self.shell
        )
    }
}

/// One line of the group database:
/// `name:password:gid:member,member,...`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GroupEntry {
    pub name: String,
    pub password: String,
    pub gid: u32,
    pub members: Vec<String>,
}

impl GroupEntry {
    /// A fresh group without members and with the `x` password placeholder.
    pub fn new(name: &str, gid: u32) -> Self {
        Self {
            name: name.to_string(),
            password: "x".to_string(),
            gid,
            members: vec![],
        }
    }

    pub fn parse(line: &str) -> Result<Self, RecordError> {
        let fields: Vec<&str> = line.splitn(GROUP_FIELDS, ':').collect();
        if fields.len() != GROUP_FIELDS {
            return Err(RecordError::FieldCount {
                expected: GROUP_FIELDS,
                got: fields.len(),
            });
        }
        let members = if fields[3].is_empty() {
            vec![]
        } else {
            fields[3].split(',').map(str::to_string).collect()
        };
        Ok(Self {
            name: fields[0].to_string(),
            password: fields[1].to_string(),
            gid: parse_id(fields[2])?,
            members,
        })
    }
}

impl fmt::Display for GroupEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}:{}",
            self.name,
            self.password,
            self.gid,
            self.members.join(",")
        )
    }
}

/// Add `username` to the member list of every group line
/// whose name is contained in `groups`.
///
/// All other lines, including blank lines and the trailing newline,
/// are passed through unchanged.
/// A user that already is a member of a group is not added a second time,
/// so a group line never lists the same member twice.
pub fn enroll_members(content: &str, username: &str, groups: &[String]) -> Result<String, DbError> {
    let mut out = String::with_capacity(content.len() + groups.len() * (username.len() + 1));
    for (idx, line) in content.split('\n').enumerate() {
        if idx > 0 {
            out.push('\n');
        }

        let name = line.split(':').next().unwrap_or_default();
        if line.is_empty() || !groups.iter().any(|g| g == name) {
            out.push_str(line);
            continue;
        }

        let fields: Vec<&str> = line.splitn(GROUP_FIELDS, ':').collect();
        let Some(members) = fields.get(GROUP_FIELDS - 1) else {
            return Err(DbError {
                database: "group",
                line: idx + 1,
                source: RecordError::FieldCount {
                    expected: GROUP_FIELDS,
                    got: fields.len(),
                },
            });
        };

        out.push_str(line);
        if members.is_empty() {
            out.push_str(username);
        } else if members.split(',').any(|m| m == username) {
            // Already a member.
        } else {
            out.push(',');
            out.push_str(username);
        }
    }
    Ok(out)
}


// vim: ts=4 sw=4 expandtab
