// -*- coding: utf-8 -*-
//
// Copyright (C) 2026 Michael Büsch <m@bues.ch>
//
// Licensed under the Apache License version 2.0
// or the MIT license, at your option.
// SPDX-License-Identifier: Apache-2.0 OR MIT

#![forbid(unsafe_code)]

use anyhow::{self as ah, format_err as err, Context as _};
use clap::Parser;
use mkuser_account::{add_account, resolve, Account, AccountSpec, Filesystem, HostFs, Policy};
use mkuser_conf::{Config, Lookup};
use mkuser_db::{AccountFiles, Identity, NssIdentity};
use std::path::PathBuf;

#[derive(Parser, Debug)]
struct Opts {
    /// Name of the new user.
    username: Option<String>,

    /// Override the default path to the configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Numeric user id.
    ///
    /// If not given, then the lowest free id from the
    /// `[IDS] uid-min` to `uid-max` range is used.
    #[arg(short, long)]
    uid: Option<u32>,

    /// Numeric id of the new primary group.
    ///
    /// If not given, then the lowest free id from the
    /// `[IDS] gid-min` to `gid-max` range is used.
    #[arg(short, long)]
    gid: Option<u32>,

    /// Name of the new primary group.
    ///
    /// Defaults to the user name.
    #[arg(short = 'n', long)]
    group_name: Option<String>,

    /// Home directory.
    ///
    /// Defaults to `[DEFAULTS] home-base` joined with the user name.
    /// The directory must not exist yet.
    #[arg(short = 'd', long)]
    home: Option<PathBuf>,

    /// Login shell.
    ///
    /// Defaults to `[DEFAULTS] shell` from the configuration file.
    #[arg(short, long)]
    shell: Option<String>,

    /// Comma separated list of existing supplementary groups.
    #[arg(short = 'G', long, value_delimiter = ',')]
    groups: Vec<String>,

    /// Operate on the system below this root directory.
    ///
    /// The account databases and the home directory are taken
    /// relative to ROOT. The written records keep the paths
    /// as seen from inside of ROOT.
    #[arg(short = 'R', long)]
    root: Option<PathBuf>,

    /// Override the `[GENERAL] lookup` setting from the configuration file.
    #[arg(long)]
    lookup: Option<Lookup>,

    /// Check and print the account, but do not write anything.
    #[arg(long)]
    dry_run: bool,

    /// Show detailed information about what happens internally.
    #[arg(long)]
    verbose: bool,

    /// Show version information and exit.
    #[arg(long, short = 'v')]
    version: bool,
}

impl Opts {
    /// Get the configuration path from command line or default.
    pub fn get_config(&self) -> PathBuf {
        if let Some(config) = &self.config {
            config.clone()
        } else {
            Config::get_default_path()
        }
    }

    pub fn get_username(&self) -> ah::Result<&str> {
        self.username
            .as_deref()
            .ok_or_else(|| err!("No user name given. See --help."))
    }

    pub fn get_spec(&self) -> ah::Result<AccountSpec> {
        Ok(AccountSpec {
            username: self.get_username()?.to_string(),
            uid: self.uid,
            gid: self.gid,
            group_name: self.group_name.clone(),
            home_dir: self.home.clone(),
            shell: self.shell.clone(),
            supplementary_groups: self
                .groups
                .iter()
                .map(|g| g.trim().to_string())
                .filter(|g| !g.is_empty())
                .collect(),
        })
    }
}

fn get_policy(conf: &Config) -> Policy {
    Policy {
        uid_range: conf.uid_range(),
        gid_range: conf.gid_range(),
        home_base: conf.home_base().to_path_buf(),
        shell: conf.shell().to_string(),
        home_mode: conf.home_mode(),
    }
}

fn print_account(account: &Account) {
    println!("User {}:", account.username);
    println!("\tUID: {}", account.uid);
    println!("\tGID: {}", account.gid);
    println!("\tGroup: {}", account.group_name);
    println!("\tHome: {}", account.home_dir.display());
    println!("\tShell: {}", account.shell);
    if !account.supplementary_groups.is_empty() {
        println!("\tGroups: {}", account.supplementary_groups.join(","));
    }
}

fn run(opts: &Opts, conf: &Config) -> ah::Result<()> {
    let spec = opts.get_spec()?;
    let verbose = opts.verbose || conf.debug();
    let lookup = opts.lookup.unwrap_or(conf.lookup());

    let mut files = AccountFiles::new(conf.passwd(), conf.group());
    let fs = match &opts.root {
        Some(root) => {
            if lookup == Lookup::Nss {
                return Err(err!(
                    "--root can not be used with 'lookup = nss'. \
                    The name service only knows about the running system."
                ));
            }
            files = files.with_root(root);
            HostFs::with_root(root)
        }
        None => HostFs::new(),
    };

    let identity: Box<dyn Identity> = match lookup {
        Lookup::Files => Box::new(files.clone()),
        Lookup::Nss => Box::new(NssIdentity),
    };

    if verbose {
        if let Some(path) = conf.get_path() {
            println!("Configuration: {}", path.display());
        }
        println!("Lookup: {lookup}");
        println!("Database: {} {}", files.passwd_path().display(), files.group_path().display());
    }

    let policy = get_policy(conf);
    let fs: &dyn Filesystem = &fs;

    if opts.dry_run {
        let account = resolve(&spec, &identity, fs, &policy)?;
        print_account(&account);
        println!("{}: {}", files.passwd_path().display(), account.passwd_entry());
        println!("{}: {}", files.group_path().display(), account.group_entry());
        println!("Dry run. Nothing has been written.");
        return Ok(());
    }

    let account = add_account(&spec, &identity, &files, fs, &policy, verbose)
        .with_context(|| format!("Failed to add user '{}'", spec.username))?;
    if verbose {
        print_account(&account);
    }
    Ok(())
}

fn main() -> ah::Result<()> {
    let opts = Opts::parse();

    if opts.version {
        println!("mkuser version {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    let mut conf = Config::new();
    conf.load(&opts.get_config())
        .context("Configuration file")?;

    run(&opts, &conf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mkuser_account::{DEFAULT_HOME_BASE, DEFAULT_HOME_MODE, DEFAULT_SHELL, ID_FIRST, ID_LAST};
    use std::path::Path;

    #[test]
    fn test_opts() {
        let opts = Opts::parse_from([
            "mkuser", "alice", "-u", "1001", "-G", "wheel, audio,,video", "--dry-run",
        ]);
        let spec = opts.get_spec().unwrap();
        assert_eq!(spec.username, "alice");
        assert_eq!(spec.uid, Some(1001));
        assert_eq!(spec.gid, None);
        assert_eq!(spec.supplementary_groups, vec!["wheel", "audio", "video"]);
        assert!(opts.dry_run);
    }

    #[test]
    fn test_version_without_username() {
        let opts = Opts::try_parse_from(["mkuser", "-v"]).unwrap();
        assert!(opts.version);
        assert_eq!(opts.username, None);

        let opts = Opts::try_parse_from(["mkuser"]).unwrap();
        assert!(opts.get_spec().is_err());
        assert!(run(&opts, &Config::new()).is_err());
    }

    #[test]
    fn test_lookup_override() {
        let opts = Opts::parse_from(["mkuser", "alice", "--lookup", "nss"]);
        assert_eq!(opts.lookup, Some(Lookup::Nss));
        assert!(Opts::try_parse_from(["mkuser", "alice", "--lookup", "ldap"]).is_err());
    }

    #[test]
    fn test_root_with_nss() {
        let opts = Opts::parse_from(["mkuser", "alice", "--root", "/mnt", "--lookup", "nss"]);
        assert!(run(&opts, &Config::new()).is_err());
    }

    #[test]
    fn test_policy() {
        let conf = Config::new();
        assert_eq!(get_policy(&conf), Policy::default());
        assert_eq!(conf.home_base(), Path::new(DEFAULT_HOME_BASE));
        assert_eq!(conf.shell(), DEFAULT_SHELL);
        assert_eq!(conf.home_mode(), DEFAULT_HOME_MODE);
        assert_eq!(conf.uid_range(), ID_FIRST..=ID_LAST);
        assert_eq!(conf.gid_range(), ID_FIRST..=ID_LAST);

        let files = AccountFiles::default();
        assert_eq!(conf.passwd(), files.passwd_path());
        assert_eq!(conf.group(), files.group_path());
    }
}

// vim: ts=4 sw=4 expandtab
