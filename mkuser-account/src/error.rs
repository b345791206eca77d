// -*- coding: utf-8 -*-
//
// Copyright (C) 2026 Michael Büsch <m@bues.ch>
//
// Licensed under the Apache License version 2.0
// or the MIT license, at your option.
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::{fmt, io};
use thiserror::Error;

/// Account field an error refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Field {
    Username,
    Uid,
    Gid,
    GroupName,
    HomeDir,
    Shell,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Username => write!(f, "username"),
            Self::Uid => write!(f, "uid"),
            Self::Gid => write!(f, "gid"),
            Self::GroupName => write!(f, "groupname"),
            Self::HomeDir => write!(f, "homedir"),
            Self::Shell => write!(f, "shell"),
        }
    }
}

/// Numeric id namespace.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IdKind {
    User,
    Group,
}

impl fmt::Display for IdKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::User => write!(f, "uid"),
            Self::Group => write!(f, "gid"),
        }
    }
}

#[derive(Debug, Error)]
pub enum AccountError {
    #[error("required field '{0}' is not set")]
    MissingField(Field),

    #[error("{field} conflict: {detail}")]
    Conflict { field: Field, detail: String },

    #[error("supplementary group '{0}' does not exist")]
    UnknownGroup(String),

    #[error("no free {kind} left in range {first}..={last}")]
    ExhaustedIdSpace { kind: IdKind, first: u32, last: u32 },

    #[error("{field} '{value}' contains characters not allowed in account records")]
    Invalid { field: Field, value: String },

    #[error("{context}")]
    Io {
        context: String,
        #[source]
        source: io::Error,
    },
}

impl AccountError {
    pub(crate) fn conflict(field: Field, detail: impl Into<String>) -> Self {
        Self::Conflict {
            field,
            detail: detail.into(),
        }
    }

    pub(crate) fn io(context: impl Into<String>, source: io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// The field of a conflict, if this is a conflict.
    pub fn conflict_field(&self) -> Option<Field> {
        match self {
            Self::Conflict { field, .. } => Some(*field),
            _ => None,
        }
    }
}

pub type AccountResult<T> = Result<T, AccountError>;


// vim: ts=4 sw=4 expandtab
