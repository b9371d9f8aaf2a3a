//! # Capabilities
//!
//! An API key carries a scope: an integer bitmask where every bit grants one
//! operation capability. [`CapabilitySet`] wraps that integer and exposes
//! the only question callers ever ask of it, [`CapabilitySet::grants`].
//!
//! ## The zero sentinel
//!
//! A scope of exactly `0` does **not** mean "nothing is allowed". It is the
//! unrestricted scope issued to full-access keys, and it grants every
//! capability, including ones that do not exist yet. Any nonzero scope is an
//! explicit allow-list.

use std::fmt;
use std::ops::{BitOr, BitOrAssign};

use serde::{Deserialize, Serialize};

/// A set of granted (or required) capabilities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CapabilitySet(u32);

impl CapabilitySet {
    /// Scope of a full-access key.
    pub const UNRESTRICTED: Self = Self(0);

    pub const READ_FILE: Self = Self(1 << 0);
    pub const UPLOAD_FILE: Self = Self(1 << 1);
    pub const DELETE_FILE: Self = Self(1 << 2);
    pub const READ_DIRECTORY: Self = Self(1 << 3);
    pub const CREATE_DIRECTORY: Self = Self(1 << 4);
    pub const DELETE_DIRECTORY: Self = Self(1 << 5);

    /// Every base capability as an explicit allow-list.
    pub const ALL: Self = Self(
        Self::READ_FILE.0
            | Self::UPLOAD_FILE.0
            | Self::DELETE_FILE.0
            | Self::READ_DIRECTORY.0
            | Self::CREATE_DIRECTORY.0
            | Self::DELETE_DIRECTORY.0,
    );

    const NAMED: [(Self, &'static str); 6] = [
        (Self::READ_FILE, "read-file"),
        (Self::UPLOAD_FILE, "upload-file"),
        (Self::DELETE_FILE, "delete-file"),
        (Self::READ_DIRECTORY, "read-directory"),
        (Self::CREATE_DIRECTORY, "create-directory"),
        (Self::DELETE_DIRECTORY, "delete-directory"),
    ];

    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    pub const fn bits(&self) -> u32 {
        self.0
    }

    pub const fn is_unrestricted(&self) -> bool {
        self.0 == 0
    }

    /// Whether every bit of `other` is also set in `self`.
    ///
    /// Purely bitwise: unlike [`grants`](Self::grants) this does not treat
    /// zero as unrestricted.
    pub const fn contains(&self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Whether a session holding this scope may perform an operation that
    /// requires `required`.
    ///
    /// An unrestricted scope grants everything. Otherwise this is a superset
    /// check: every required bit must be granted, a partial overlap is not
    /// enough.
    pub const fn grants(&self, required: Self) -> bool {
        self.is_unrestricted() || self.contains(required)
    }
}

impl BitOr for CapabilitySet {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for CapabilitySet {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl From<u32> for CapabilitySet {
    fn from(bits: u32) -> Self {
        Self(bits)
    }
}

impl fmt::Display for CapabilitySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_unrestricted() {
            return write!(f, "unrestricted");
        }

        let mut names = Self::NAMED
            .iter()
            .filter(|(capability, _)| self.contains(*capability))
            .map(|(_, name)| name.to_string())
            .collect::<Vec<_>>();

        let unknown = self.0 & !Self::ALL.0;
        if unknown != 0 {
            names.push(format!("{:#x}", unknown));
        }

        write!(f, "{}", names.join("|"))
    }
}
