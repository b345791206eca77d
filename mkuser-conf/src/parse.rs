// -*- coding: utf-8 -*-
//
// Copyright (C) 2026 Michael Büsch <m@bues.ch>
//
// Licensed under the Apache License version 2.0
// or the MIT license, at your option.
// SPDX-License-Identifier: Apache-2.0 OR MIT

use anyhow::{self as ah, format_err as err};

pub fn parse_bool(s: &str) -> ah::Result<bool> {
    let s = s.to_lowercase();
    let s = s.trim();
    match s {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(err!("Invalid boolean string")),
    }
}

pub fn parse_u32(s: &str) -> ah::Result<u32> {
    let s = s.trim();
    if let Some(s) = s.strip_prefix("0x") {
        Ok(u32::from_str_radix(s, 16)?)
    } else {
        Ok(s.parse::<u32>()?)
    }
}

/// Parse file permission bits.
/// Octal by default, like chmod. A `0x` prefix selects hexadecimal.
pub fn parse_mode(s: &str) -> ah::Result<u32> {
    let s = s.trim();
    let mode = if let Some(s) = s.strip_prefix("0x") {
        u32::from_str_radix(s, 16)?
    } else {
        u32::from_str_radix(s.strip_prefix("0o").unwrap_or(s), 8)?
    };
    if mode > 0o7777 {
        return Err(err!("Mode {mode:o} has bits outside of 7777"));
    }
    Ok(mode)
}


// vim: ts=4 sw=4 expandtab
