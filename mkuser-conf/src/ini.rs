// -*- coding: utf-8 -*-
//
// Copyright (C) 2026 Michael Büsch <m@bues.ch>
//
// Licensed under the Apache License version 2.0
// or the MIT license, at your option.
// SPDX-License-Identifier: Apache-2.0 OR MIT

use anyhow::{self as ah, format_err as err, Context as _};
use std::{
    collections::HashMap,
    io::Read as _,
    path::Path,
};

/// All options from a `.ini` file section.
struct IniSection {
    options: HashMap<String, String>,
}

impl IniSection {
    fn new() -> Self {
        Self {
            options: HashMap::new(),
        }
    }
}

/// Simple `.ini` file parser.
///
/// A backslash at the end of an option line continues the
/// option value on the next line.
pub struct Ini {
    sections: HashMap<String, IniSection>,
}

impl Ini {
    pub fn new() -> Self {
        Self {
            sections: HashMap::new(),
        }
    }

    pub fn new_from_file(path: &Path) -> ah::Result<Self> {
        let mut this = Self::new();
        this.read_file(path)?;
        Ok(this)
    }

    pub fn read_file(&mut self, path: &Path) -> ah::Result<()> {
        let mut file = std::fs::OpenOptions::new()
            .read(true)
            .open(path)
            .context("Open configuration file")?;
        let mut buf = vec![];
        file.read_to_end(&mut buf)
            .context("Read configuration file")?;
        self.parse_bytes(buf)
    }

    pub fn parse_bytes(&mut self, content: Vec<u8>) -> ah::Result<()> {
        self.parse_str(
            &String::from_utf8(content)
                .context("Configuration content file to UTF-8 conversion")?,
        )
    }

    pub fn parse_str(&mut self, content: &str) -> ah::Result<()> {
        let mut sections: HashMap<String, IniSection> = HashMap::new();
        let mut in_section: Option<String> = None;
        let mut lines = content.lines().enumerate();

        while let Some((idx, line)) = lines.next() {
            let lineno = idx + 1;
            let line = line.trim_start();
            if line.is_empty() {
                continue; // This is an empty line.
            }
            if line.starts_with('#') {
                continue; // This is a comment.
            }
            // Section start?
            if line.starts_with('[') {
                let line = line.trim_end();
                if !line.ends_with(']') {
                    return Err(err!("Line {lineno}: Invalid section name: '{line}'"));
                }
                let sname = &line['['.len_utf8()..line.len() - ']'.len_utf8()];
                if sname.is_empty() {
                    return Err(err!("Line {lineno}: Section name is empty: '{line}'"));
                }
                if sname.contains('\\') {
                    return Err(err!("Line {lineno}: Invalid section name: '{line}'"));
                }
                if sections.contains_key(sname) {
                    return Err(err!("Line {lineno}: Duplicate section name: '{line}'"));
                }
                sections.insert(sname.to_string(), IniSection::new());
                in_section = Some(sname.to_string());
                continue;
            }
            // Are we inside of a section?
            let Some(section) = &in_section else {
                return Err(err!("Line {lineno}: Option is not inside of a section: '{line}'"));
            };
            let Some(idx) = line.find('=') else {
                return Err(err!("Line {lineno}: Option has no equal sign '=': '{line}'"));
            };
            let opt_name = line[..idx].trim_end().to_string();
            if opt_name.is_empty() {
                return Err(err!("Line {lineno}: Option name is empty: '{line}'"));
            }

            // Join continuation lines.
            let mut opt_value = String::new();
            let mut part = line[idx + '='.len_utf8()..].trim_start();
            loop {
                let trimmed = part.trim_end();
                if let Some(head) = trimmed.strip_suffix('\\') {
                    opt_value.push_str(head);
                    let Some((_, next)) = lines.next() else {
                        return Err(err!(
                            "Line {lineno}: Option '{opt_name}' continues past the end of file"
                        ));
                    };
                    part = next.trim_start();
                } else {
                    opt_value.push_str(trimmed);
                    break;
                }
            }

            if let Some(sect) = sections.get_mut(section) {
                sect.options.insert(opt_name, opt_value);
            }
        }
        self.sections = sections;
        Ok(())
    }

    /// Get the value of an option from the given section.
    pub fn get(&self, section: &str, option: &str) -> Option<&str> {
        self.sections
            .get(section)
            .and_then(|sect| sect.options.get(option))
            .map(|opt| opt.as_str())
    }
}

impl Default for Ini {
    fn default() -> Self {
        Self::new()
    }
}

// vim: ts=4 sw=4 expandtab
