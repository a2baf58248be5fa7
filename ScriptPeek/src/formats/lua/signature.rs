//! Lua bytecode signatures
//!
//! Precompiled Lua chunks start with `ESC "Lua"` followed by a version
//! byte (`0x51` for 5.1, `0x52` for 5.2, ...).

use std::fmt;

/// Magic prefixes for known Lua bytecode versions
pub mod magic {
    /// `ESC "Lua"`, shared by every version
    pub const LUA: [u8; 4] = [0x1B, 0x4C, 0x75, 0x61];

    /// Lua 5.2 (`ESC "Lua" 0x52`)
    pub const LUA52: [u8; 5] = [0x1B, 0x4C, 0x75, 0x61, 0x52];

    /// Lua 5.3 (`ESC "Lua" 0x53`)
    pub const LUA53: [u8; 5] = [0x1B, 0x4C, 0x75, 0x61, 0x53];
}

/// Lua bytecode version identified from the header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub enum LuaVersion {
    /// Lua 5.1 (also the fallback for a bare `ESC "Lua"` prefix)
    Lua51,
    /// Lua 5.2
    Lua52,
    /// Lua 5.3
    Lua53,
}

impl LuaVersion {
    /// Version label, e.g. `"5.1"`.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            LuaVersion::Lua51 => "5.1",
            LuaVersion::Lua52 => "5.2",
            LuaVersion::Lua53 => "5.3",
        }
    }
}

impl fmt::Display for LuaVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Lua {}", self.label())
    }
}

/// Signatures in match order. Longer prefixes come first so 5.2 and 5.3
/// are not swallowed by the shared 4-byte prefix.
pub const SIGNATURES: [(&[u8], LuaVersion); 3] = [
    (&magic::LUA52, LuaVersion::Lua52),
    (&magic::LUA53, LuaVersion::Lua53),
    (&magic::LUA, LuaVersion::Lua51),
];

/// Identify the bytecode version from the start of `data`.
#[must_use]
pub fn detect_header(data: &[u8]) -> Option<LuaVersion> {
    SIGNATURES
        .iter()
        .find(|(prefix, _)| data.starts_with(prefix))
        .map(|&(_, version)| version)
}
