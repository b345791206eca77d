// -*- coding: utf-8 -*-
//
// Copyright (C) 2026 Michael Büsch <m@bues.ch>
//
// Licensed under the Apache License version 2.0
// or the MIT license, at your option.
// SPDX-License-Identifier: Apache-2.0 OR MIT

use crate::identity::Identity;
use nix::{
    errno::Errno,
    unistd::{Gid, Group, Uid, User},
};
use std::io;

/// Lookups through the operating system name service (getpwnam and friends).
///
/// Depending on the NSS configuration this may see more than the local
/// files, and caching daemons may hide records appended during this run.
#[derive(Clone, Copy, Debug, Default)]
pub struct NssIdentity;

/// getpwnam(3) lists these as "not found" on some C libraries.
fn found<T>(res: nix::Result<Option<T>>) -> io::Result<bool> {
    match res {
        Ok(entry) => Ok(entry.is_some()),
        Err(Errno::ENOENT | Errno::ESRCH | Errno::EBADF | Errno::EPERM) => Ok(false),
        Err(e) => Err(e.into()),
    }
}

impl Identity for NssIdentity {
    fn user_name_exists(&self, name: &str) -> io::Result<bool> {
        found(User::from_name(name))
    }

    fn user_id_exists(&self, uid: u32) -> io::Result<bool> {
        found(User::from_uid(Uid::from_raw(uid)))
    }

    fn group_name_exists(&self, name: &str) -> io::Result<bool> {
        found(Group::from_name(name))
    }

    fn group_id_exists(&self, gid: u32) -> io::Result<bool> {
        found(Group::from_gid(Gid::from_raw(gid)))
    }
}


// vim: ts=4 sw=4 expandtab
