// -*- coding: utf-8 -*-
//
// Copyright (C) 2026 Michael Büsch <m@bues.ch>
//
// Licensed under the Apache License version 2.0
// or the MIT license, at your option.
// SPDX-License-Identifier: Apache-2.0 OR MIT

use crate::{
    error::{AccountError, AccountResult},
    fs::Filesystem,
    spec::Account,
};
use mkuser_db::AccountFiles;

/// Write a resolved account to the databases and set up its home directory.
///
/// The steps run in a fixed order and the first failure aborts.
/// Steps that already completed are not undone, so a failure after the
/// first database write leaves a partially created account behind.
///
/// Committing the same account twice duplicates its records.
pub fn commit<F>(
    account: &Account,
    files: &AccountFiles,
    fs: &F,
    home_mode: u32,
    verbose: bool,
) -> AccountResult<()>
where
    F: Filesystem + ?Sized,
{
    let passwd_entry = account.passwd_entry();
    if verbose {
        println!("Append to {}: {passwd_entry}", files.passwd_path().display());
    }
    files.append_user(&passwd_entry).map_err(|e| {
        AccountError::io(format!("Append to {}", files.passwd_path().display()), e)
    })?;

    let group_entry = account.group_entry();
    if verbose {
        println!("Append to {}: {group_entry}", files.group_path().display());
    }
    files.append_group(&group_entry).map_err(|e| {
        AccountError::io(format!("Append to {}", files.group_path().display()), e)
    })?;

    if !account.supplementary_groups.is_empty() {
        if verbose {
            println!(
                "Add {} to groups: {}",
                account.username,
                account.supplementary_groups.join(", ")
            );
        }
        files
            .enroll(&account.username, &account.supplementary_groups)
            .map_err(|e| AccountError::io(format!("Rewrite {}", files.group_path().display()), e))?;
    }

    let home = &account.home_dir;
    let home_exists = fs
        .exists(home)
        .map_err(|e| AccountError::io(format!("Stat {}", home.display()), e))?;
    if !home_exists {
        if verbose {
            println!("Create directory {} (mode={home_mode:o})", home.display());
        }
        fs.create_dir(home, home_mode)
            .map_err(|e| AccountError::io(format!("Create directory {}", home.display()), e))?;
    }

    if verbose {
        println!(
            "Set owner of {} to {}:{}",
            home.display(),
            account.uid,
            account.gid
        );
    }
    fs.chown_recursive(home, account.uid, account.gid)
        .map_err(|e| AccountError::io(format!("Set owner of {}", home.display()), e))?;

    Ok(())
}


// vim: ts=4 sw=4 expandtab
