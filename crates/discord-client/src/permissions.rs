use crate::types::{Guild, Member, Role};
use std::fmt;
use std::ops::BitOr;

/// Discord permission bitset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Permissions(u64);

impl Permissions {
    pub const NONE: Permissions = Permissions(0);
    pub const ADMINISTRATOR: Permissions = Permissions(1 << 3);
    pub const MANAGE_CHANNELS: Permissions = Permissions(1 << 4);
    pub const SEND_MESSAGES: Permissions = Permissions(1 << 11);
    pub const ALL: Permissions = Permissions(u64::MAX);

    pub fn bits(self) -> u64 {
        self.0
    }

    /// Parse the decimal string form Discord uses on the wire.
    /// Malformed input counts as no permissions.
    pub fn parse(raw: &str) -> Self {
        Permissions(raw.trim().parse().unwrap_or(0))
    }

    pub fn contains(self, other: Permissions) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for Permissions {
    type Output = Permissions;

    fn bitor(self, rhs: Permissions) -> Permissions {
        Permissions(self.0 | rhs.0)
    }
}

impl fmt::Display for Permissions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Guild-level permissions of `member`, ignoring channel overwrites.
///
/// The guild owner and anyone holding ADMINISTRATOR get everything. Otherwise
/// the `@everyone` role (whose id equals the guild id) is OR-ed with each of
/// the member's roles.
pub fn guild_permissions(
    guild: &Guild,
    member_id: &str,
    member: &Member,
    roles: &[Role],
) -> Permissions {
    if guild.owner_id == member_id {
        return Permissions::ALL;
    }

    let perms = roles
        .iter()
        .filter(|r| r.id == guild.id || member.roles.contains(&r.id))
        .fold(Permissions::NONE, |acc, r| acc | Permissions::parse(&r.permissions));

    if perms.contains(Permissions::ADMINISTRATOR) {
        Permissions::ALL
    } else {
        perms
    }
}
