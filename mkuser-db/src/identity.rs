// -*- coding: utf-8 -*-
//
// Copyright (C) 2026 Michael Büsch <m@bues.ch>
//
// Licensed under the Apache License version 2.0
// or the MIT license, at your option.
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::io;

/// Name and id lookup in the user and group databases.
///
/// Implementations must reflect the current state of the databases,
/// including records appended earlier during the same run.
pub trait Identity {
    /// Does a user with this name exist?
    fn user_name_exists(&self, name: &str) -> io::Result<bool>;

    /// Does a user with this numeric id exist?
    fn user_id_exists(&self, uid: u32) -> io::Result<bool>;

    /// Does a group with this name exist?
    fn group_name_exists(&self, name: &str) -> io::Result<bool>;

    /// Does a group with this numeric id exist?
    fn group_id_exists(&self, gid: u32) -> io::Result<bool>;
}

impl<T: Identity + ?Sized> Identity for &T {
    fn user_name_exists(&self, name: &str) -> io::Result<bool> {
        (**self).user_name_exists(name)
    }

    fn user_id_exists(&self, uid: u32) -> io::Result<bool> {
        (**self).user_id_exists(uid)
    }

    fn group_name_exists(&self, name: &str) -> io::Result<bool> {
        (**self).group_name_exists(name)
    }

    fn group_id_exists(&self, gid: u32) -> io::Result<bool> {
        (**self).group_id_exists(gid)
    }
}

impl<T: Identity + ?Sized> Identity for Box<T> {
    fn user_name_exists(&self, name: &str) -> io::Result<bool> {
        (**self).user_name_exists(name)
    }

    fn user_id_exists(&self, uid: u32) -> io::Result<bool> {
        (**self).user_id_exists(uid)
    }

    fn group_name_exists(&self, name: &str) -> io::Result<bool> {
        (**self).group_name_exists(name)
    }

    fn group_id_exists(&self, gid: u32) -> io::Result<bool> {
        (**self).group_id_exists(gid)
    }
}

// vim: ts=4 sw=4 expandtab
