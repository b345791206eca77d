// -*- coding: utf-8 -*-
//
// Copyright (C) 2026 Michael Büsch <m@bues.ch>
//
// Licensed under the Apache License version 2.0
// or the MIT license, at your option.
// SPDX-License-Identifier: Apache-2.0 OR MIT

use crate::{
    error::{AccountError, AccountResult, Field, IdKind},
    fs::Filesystem,
    spec::{Account, AccountSpec, Policy},
};
use mkuser_db::Identity;
use std::{io, ops::RangeInclusive};

/// Find the lowest id in `range` for which `taken` returns false.
pub fn allocate_id<F>(kind: IdKind, range: &RangeInclusive<u32>, mut taken: F) -> AccountResult<u32>
where
    F: FnMut(u32) -> io::Result<bool>,
{
    for id in range.clone() {
        let in_use = taken(id).map_err(|e| AccountError::io(format!("Look up {kind} {id}"), e))?;
        if !in_use {
            return Ok(id);
        }
    }
    Err(AccountError::ExhaustedIdSpace {
        kind,
        first: *range.start(),
        last: *range.end(),
    })
}

/// Reject values that would break the colon separated records.
fn check_record_text(field: Field, value: &str) -> AccountResult<()> {
    let list_item = matches!(field, Field::Username | Field::GroupName);
    if value
        .chars()
        .any(|c| c == ':' || c == '\n' || c == '\0' || (list_item && c == ','))
    {
        return Err(AccountError::Invalid {
            field,
            value: value.to_string(),
        });
    }
    Ok(())
}

fn lookup(res: io::Result<bool>, what: impl FnOnce() -> String) -> AccountResult<bool> {
    res.map_err(|e| AccountError::io(what(), e))
}

fn non_empty(s: &Option<String>) -> Option<String> {
    s.as_ref().filter(|s| !s.is_empty()).cloned()
}

/// Validate a requested account and fill in all unset fields.
///
/// The checks run in a fixed order and the first failing check
/// is reported. Nothing is written.
pub fn resolve<I, F>(
    spec: &AccountSpec,
    identity: &I,
    fs: &F,
    policy: &Policy,
) -> AccountResult<Account>
where
    I: Identity + ?Sized,
    F: Filesystem + ?Sized,
{
    let username = spec.username.as_str();
    if username.is_empty() {
        return Err(AccountError::MissingField(Field::Username));
    }
    check_record_text(Field::Username, username)?;
    if lookup(identity.user_name_exists(username), || {
        format!("Look up user '{username}'")
    })? {
        return Err(AccountError::conflict(
            Field::Username,
            format!("user '{username}' already exists"),
        ));
    }

    let uid = match spec.uid {
        None => allocate_id(IdKind::User, &policy.uid_range, |id| {
            identity.user_id_exists(id)
        })?,
        Some(uid) => {
            if lookup(identity.user_id_exists(uid), || format!("Look up uid {uid}"))? {
                return Err(AccountError::conflict(
                    Field::Uid,
                    format!("uid {uid} is already in use"),
                ));
            }
            uid
        }
    };

    let gid = match spec.gid {
        None => allocate_id(IdKind::Group, &policy.gid_range, |id| {
            identity.group_id_exists(id)
        })?,
        Some(gid) => {
            if lookup(identity.group_id_exists(gid), || format!("Look up gid {gid}"))? {
                return Err(AccountError::conflict(
                    Field::Gid,
                    format!("gid {gid} is already in use"),
                ));
            }
            gid
        }
    };

    let group_name = non_empty(&spec.group_name).unwrap_or_else(|| username.to_string());
    check_record_text(Field::GroupName, &group_name)?;
    if lookup(identity.group_name_exists(&group_name), || {
        format!("Look up group '{group_name}'")
    })? {
        return Err(AccountError::conflict(
            Field::GroupName,
            format!("group '{group_name}' already exists"),
        ));
    }

    let home_dir = spec
        .home_dir
        .as_ref()
        .filter(|p| !p.as_os_str().is_empty())
        .cloned()
        .unwrap_or_else(|| policy.home_base.join(username));
    let Some(home_str) = home_dir.to_str() else {
        return Err(AccountError::Invalid {
            field: Field::HomeDir,
            value: home_dir.to_string_lossy().into_owned(),
        });
    };
    check_record_text(Field::HomeDir, home_str)?;
    if fs
        .exists(&home_dir)
        .map_err(|e| AccountError::io(format!("Stat {}", home_dir.display()), e))?
    {
        return Err(AccountError::conflict(
            Field::HomeDir,
            format!("home directory {} already exists", home_dir.display()),
        ));
    }

    let shell = non_empty(&spec.shell).unwrap_or_else(|| policy.shell.clone());
    check_record_text(Field::Shell, &shell)?;

    let mut supplementary_groups: Vec<String> = Vec::with_capacity(spec.supplementary_groups.len());
    for group in &spec.supplementary_groups {
        if supplementary_groups.contains(group) {
            continue;
        }
        if !lookup(identity.group_name_exists(group), || {
            format!("Look up group '{group}'")
        })? {
            return Err(AccountError::UnknownGroup(group.clone()));
        }
        supplementary_groups.push(group.clone());
    }

    Ok(Account {
        username: username.to_string(),
        uid,
        gid,
        group_name,
        home_dir,
        shell,
        supplementary_groups,
    })
}


// vim: ts=4 sw=4 expandtab
