// -*- coding: utf-8 -*-
//
// Copyright (C) 2026 Michael Büsch <m@bues.ch>
//
// Licensed under the Apache License version 2.0
// or the MIT license, at your option.
// SPDX-License-Identifier: Apache-2.0 OR MIT

use mkuser_db::{GroupEntry, PasswdEntry};
use std::{ops::RangeInclusive, path::PathBuf};

/// Shell of new accounts, if none is requested.
pub const DEFAULT_SHELL: &str = "/sbin/nologin";

/// Directory below which default home directories are placed.
pub const DEFAULT_HOME_BASE: &str = "/home";

/// Mode of newly created home directories.
pub const DEFAULT_HOME_MODE: u32 = 0o755;

/// Lowest id considered by the allocator.
pub const ID_FIRST: u32 = 1;

/// Highest id considered by the allocator.
pub const ID_LAST: u32 = 65536;

/// A requested account.
///
/// Everything but the user name is optional and will be
/// filled in by [crate::resolve]. Empty strings count as unset.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AccountSpec {
    pub username: String,
    pub uid: Option<u32>,
    pub gid: Option<u32>,
    pub group_name: Option<String>,
    pub home_dir: Option<PathBuf>,
    pub shell: Option<String>,
    /// Existing groups the new user becomes a member of.
    pub supplementary_groups: Vec<String>,
}

impl AccountSpec {
    pub fn new(username: &str) -> Self {
        Self {
            username: username.to_string(),
            ..Default::default()
        }
    }
}

/// A fully resolved account, ready to be committed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Account {
    pub username: String,
    pub uid: u32,
    pub gid: u32,
    pub group_name: String,
    pub home_dir: PathBuf,
    pub shell: String,
    pub supplementary_groups: Vec<String>,
}

impl Account {
    /// The record for the passwd database.
    pub fn passwd_entry(&self) -> PasswdEntry {
        PasswdEntry {
            name: self.username.clone(),
            group: self.group_name.clone(),
            uid: self.uid,
            gid: self.gid,
            gecos: String::new(),
            home: self.home_dir.to_string_lossy().into_owned(),
            shell: self.shell.clone(),
        }
    }

    /// The record for the group database.
    pub fn group_entry(&self) -> GroupEntry {
        GroupEntry::new(&self.group_name, self.gid)
    }
}

/// Site policy for defaults and id allocation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Policy {
    pub uid_range: RangeInclusive<u32>,
    pub gid_range: RangeInclusive<u32>,
    pub home_base: PathBuf,
    pub shell: String,
    pub home_mode: u32,
}

impl Default for Policy {
    fn default() -> Self {
        Self {
            uid_range: ID_FIRST..=ID_LAST,
            gid_range: ID_FIRST..=ID_LAST,
            home_base: PathBuf::from(DEFAULT_HOME_BASE),
            shell: DEFAULT_SHELL.to_string(),
            home_mode: DEFAULT_HOME_MODE,
        }
    }
}


// vim: ts=4 sw=4 expandtab
