// -*- coding: utf-8 -*-
//
// Copyright (C) 2026 Michael Büsch <m@bues.ch>
//
// Licensed under the Apache License version 2.0
// or the MIT license, at your option.
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! This crate implements the configuration file parsing of `mkuser`.
//!
//! Defaults for a missing configuration file
//! or missing individual configuration entries are implemented here.

#![forbid(unsafe_code)]

mod ini;
mod parse;

use crate::{
    ini::Ini,
    parse::{parse_bool, parse_mode, parse_u32},
};
use anyhow::{self as ah, format_err as err, Context as _};
use std::{
    ops::RangeInclusive,
    path::{Path, PathBuf},
};

/// The default configuration path, relative to the install prefix.
const CONF_PATH: &str = "etc/mkuser.conf";

const DEFAULT_PASSWD: &str = "/etc/passwd";
const DEFAULT_GROUP: &str = "/etc/group";
const DEFAULT_HOME_BASE: &str = "/home";
const DEFAULT_SHELL: &str = "/sbin/nologin";
const DEFAULT_HOME_MODE: u32 = 0o755;
const DEFAULT_ID_MIN: u32 = 1;
const DEFAULT_ID_MAX: u32 = 65536;

/// Source of user and group lookups.
#[derive(Clone, Copy, PartialEq, Eq, Default, Debug)]
pub enum Lookup {
    /// Read the configured passwd and group files (default).
    #[default]
    Files,

    /// Ask the operating system name service.
    ///
    /// This also sees accounts from other NSS sources,
    /// but caching may hide accounts created a moment ago.
    Nss,
}

impl std::fmt::Display for Lookup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> Result<(), std::fmt::Error> {
        match self {
            Self::Files => write!(f, "files"),
            Self::Nss => write!(f, "nss"),
        }
    }
}

impl std::str::FromStr for Lookup {
    type Err = ah::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().trim() {
            "files" => Ok(Self::Files),
            "nss" => Ok(Self::Nss),
            other => Err(err!(
                "Config option 'lookup = {other}' is not valid. Valid values are: files, nss."
            )),
        }
    }
}

fn get_debug(ini: &Ini) -> ah::Result<bool> {
    if let Some(debug) = ini.get("GENERAL", "debug") {
        return parse_bool(debug);
    }
    Ok(false)
}

fn get_lookup(ini: &Ini) -> ah::Result<Lookup> {
    if let Some(lookup) = ini.get("GENERAL", "lookup") {
        return lookup.parse();
    }
    Ok(Default::default())
}

fn get_path(ini: &Ini, section: &str, option: &str, default: &str) -> ah::Result<PathBuf> {
    match ini.get(section, option).map(str::trim) {
        Some("") => Err(err!("[{section}] {option} is empty")),
        Some(path) => Ok(PathBuf::from(path)),
        None => Ok(PathBuf::from(default)),
    }
}

fn get_shell(ini: &Ini) -> ah::Result<String> {
    match ini.get("DEFAULTS", "shell").map(str::trim) {
        Some("") => Err(err!("[DEFAULTS] shell is empty")),
        Some(shell) => Ok(shell.to_string()),
        None => Ok(DEFAULT_SHELL.to_string()),
    }
}

fn get_home_mode(ini: &Ini) -> ah::Result<u32> {
    if let Some(mode) = ini.get("DEFAULTS", "home-mode") {
        return parse_mode(mode).context("[DEFAULTS] home-mode");
    }
    Ok(DEFAULT_HOME_MODE)
}

fn get_id_range(ini: &Ini, min_opt: &str, max_opt: &str) -> ah::Result<RangeInclusive<u32>> {
    let min = match ini.get("IDS", min_opt) {
        Some(min) => parse_u32(min).with_context(|| format!("[IDS] {min_opt}"))?,
        None => DEFAULT_ID_MIN,
    };
    let max = match ini.get("IDS", max_opt) {
        Some(max) => parse_u32(max).with_context(|| format!("[IDS] {max_opt}"))?,
        None => DEFAULT_ID_MAX,
    };
    if min > max {
        return Err(err!("[IDS] {min_opt}={min} is bigger than {max_opt}={max}"));
    }
    Ok(min..=max)
}

/// Parsed mkuser.conf.
#[derive(Clone, Debug)]
pub struct Config {
    path: Option<PathBuf>,
    debug: bool,
    lookup: Lookup,
    passwd: PathBuf,
    group: PathBuf,
    home_base: PathBuf,
    shell: String,
    home_mode: u32,
    uid_range: RangeInclusive<u32>,
    gid_range: RangeInclusive<u32>,
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

impl Config {
    /// Create a new configuration instance with all-default values.
    pub fn new() -> Self {
        Self {
            path: None,
            debug: false,
            lookup: Default::default(),
            passwd: PathBuf::from(DEFAULT_PASSWD),
            group: PathBuf::from(DEFAULT_GROUP),
            home_base: PathBuf::from(DEFAULT_HOME_BASE),
            shell: DEFAULT_SHELL.to_string(),
            home_mode: DEFAULT_HOME_MODE,
            uid_range: DEFAULT_ID_MIN..=DEFAULT_ID_MAX,
            gid_range: DEFAULT_ID_MIN..=DEFAULT_ID_MAX,
        }
    }

    /// Get the default configuration file path.
    pub fn get_default_path() -> PathBuf {
        // The build-time environment variable MKUSER_CONF_PREFIX can be
        // used to give an additional prefix.
        let prefix = option_env!("MKUSER_CONF_PREFIX").unwrap_or("/");

        let mut path = PathBuf::new();
        path.push(prefix);
        path.push(CONF_PATH);
        path
    }

    /// Get the actual path the configuration was read from.
    pub fn get_path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// (Re-)load a configuration from a file.
    ///
    /// A missing file leaves all values at their defaults.
    pub fn load(&mut self, path: &Path) -> ah::Result<()> {
        if !path.exists() {
            return Ok(());
        }
        let ini = Ini::new_from_file(path)
            .with_context(|| format!("Failed to load configuration {path:?}"))?;
        self.load_ini(&ini)?;
        self.path = Some(path.to_path_buf());
        Ok(())
    }

    /// (Re-)load a configuration from a parsed [Ini] instance.
    fn load_ini(&mut self, ini: &Ini) -> ah::Result<()> {
        let debug = get_debug(ini)?;
        let lookup = get_lookup(ini)?;
        let passwd = get_path(ini, "DATABASE", "passwd", DEFAULT_PASSWD)?;
        let group = get_path(ini, "DATABASE", "group", DEFAULT_GROUP)?;
        let home_base = get_path(ini, "DEFAULTS", "home-base", DEFAULT_HOME_BASE)?;
        let shell = get_shell(ini)?;
        let home_mode = get_home_mode(ini)?;
        let uid_range = get_id_range(ini, "uid-min", "uid-max")?;
        let gid_range = get_id_range(ini, "gid-min", "gid-max")?;

        self.debug = debug;
        self.lookup = lookup;
        self.passwd = passwd;
        self.group = group;
        self.home_base = home_base;
        self.shell = shell;
        self.home_mode = home_mode;
        self.uid_range = uid_range;
        self.gid_range = gid_range;
        Ok(())
    }

    /// Get the `debug` option from `[GENERAL]` section.
    pub fn debug(&self) -> bool {
        self.debug
    }

    /// Get the `lookup` option from `[GENERAL]` section.
    pub fn lookup(&self) -> Lookup {
        self.lookup
    }

    /// Get the `passwd` option from `[DATABASE]` section.
    pub fn passwd(&self) -> &Path {
        &self.passwd
    }

    /// Get the `group` option from `[DATABASE]` section.
    pub fn group(&self) -> &Path {
        &self.group
    }

    /// Get the `home-base` option from `[DEFAULTS]` section.
    pub fn home_base(&self) -> &Path {
        &self.home_base
    }

    /// Get the `shell` option from `[DEFAULTS]` section.
    pub fn shell(&self) -> &str {
        &self.shell
    }

    /// Get the `home-mode` option from `[DEFAULTS]` section.
    pub fn home_mode(&self) -> u32 {
        self.home_mode
    }

    /// Get the `uid-min` and `uid-max` options from `[IDS]` section.
    pub fn uid_range(&self) -> RangeInclusive<u32> {
        self.uid_range.clone()
    }

    /// Get the `gid-min` and `gid-max` options from `[IDS]` section.
    pub fn gid_range(&self) -> RangeInclusive<u32> {
        self.gid_range.clone()
    }
}


// vim: ts=4 sw=4 expandtab
