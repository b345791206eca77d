// -*- coding: utf-8 -*-
//
// Copyright (C) 2026 Michael Büsch <m@bues.ch>
//
// Licensed under the Apache License version 2.0
// or the MIT license, at your option.
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! This crate implements access to the local account databases
//! `/etc/passwd` and `/etc/group` of `mkuser`.
//!
//! It provides the record formats, parsing of the database files,
//! appending and rewriting records, and the [Identity] lookup service
//! backed by the files, by the system name service or by an
//! in-memory snapshot.

#![forbid(unsafe_code)]

mod db;
mod files;
mod identity;
mod nss;
mod record;

pub use crate::{
    db::{parse_group, parse_passwd, AccountDb},
    files::{rooted, AccountFiles, GROUP_PATH, PASSWD_PATH},
    identity::Identity,
    nss::NssIdentity,
    record::{enroll_members, DbError, GroupEntry, PasswdEntry, RecordError},
};

// vim: ts=4 sw=4 expandtab
