use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::data::model::{CurveTable, canonical_name};

// ---------------------------------------------------------------------------
// Role – what a curve measures, independent of its mnemonic
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    GammaRay,
    BulkDensity,
    NeutronPorosity,
    Resistivity,
    Sonic,
    SpontaneousPotential,
}

impl Role {
    pub const ALL: [Role; 6] = [
        Role::GammaRay,
        Role::BulkDensity,
        Role::NeutronPorosity,
        Role::Resistivity,
        Role::Sonic,
        Role::SpontaneousPotential,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Role::GammaRay => "GAMMA_RAY",
            Role::BulkDensity => "BULK_DENSITY",
            Role::NeutronPorosity => "NEUTRON_POROSITY",
            Role::Resistivity => "RESISTIVITY",
            Role::Sonic => "SONIC",
            Role::SpontaneousPotential => "SPONTANEOUS_POTENTIAL",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown role: {0}")]
pub struct UnknownRole(pub String);

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_uppercase().replace([' ', '-'], "_");
        Role::ALL
            .into_iter()
            .find(|r| r.as_str() == key)
            .ok_or_else(|| UnknownRole(s.to_string()))
    }
}

// ---------------------------------------------------------------------------
// RoleAliasSet – ordered acceptable mnemonics per role
// ---------------------------------------------------------------------------

/// Maps each role to the mnemonics that may carry it, most preferred first.
#[derive(Debug, Clone, PartialEq)]
pub struct RoleAliasSet {
    aliases: BTreeMap<Role, Vec<String>>,
}

impl Default for RoleAliasSet {
    fn default() -> Self {
        let defaults: [(Role, &[&str]); 6] = [
            (Role::GammaRay, &["GR"]),
            (Role::BulkDensity, &["RHOB", "RHOP"]),
            (Role::NeutronPorosity, &["NPHI", "NEUTRON"]),
            (Role::Resistivity, &["RESD", "RT", "RESISTIVITY"]),
            (Role::Sonic, &["DT"]),
            (Role::SpontaneousPotential, &["SP"]),
        ];
        RoleAliasSet {
            aliases: defaults
                .into_iter()
                .map(|(role, names)| (role, names.iter().map(|n| canonical_name(n)).collect()))
                .collect(),
        }
    }
}

impl RoleAliasSet {
    /// Replace the alias list of `role`.
    pub fn with_aliases<S: AsRef<str>>(mut self, role: Role, aliases: &[S]) -> Self {
        let aliases = aliases.iter().map(|a| canonical_name(a.as_ref())).collect();
        self.aliases.insert(role, aliases);
        self
    }

    pub fn aliases(&self, role: Role) -> &[String] {
        self.aliases.get(&role).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Canonical name of the curve carrying `role`, if any.
    ///
    /// Alias order decides: the first alias present in the table wins,
    /// whatever other matching columns exist.
    pub fn resolve(&self, table: &CurveTable, role: Role) -> Option<String> {
        self.aliases(role)
            .iter()
            .find(|alias| table.contains(alias))
            .cloned()
    }

    /// Resolve every known role against `table` in one pass.
    pub fn resolve_all(&self, table: &CurveTable) -> ResolvedRoles {
        let names = Role::ALL
            .into_iter()
            .map(|role| (role, self.resolve(table, role)))
            .collect();
        ResolvedRoles { names }
    }
}

/// Resolve `role` with the default alias set.
pub fn resolve(table: &CurveTable, role: Role) -> Option<String> {
    RoleAliasSet::default().resolve(table, role)
}

// ---------------------------------------------------------------------------
// ResolvedRoles – outcome of resolving every role for one table
// ---------------------------------------------------------------------------

/// Role → curve name, with `None` for roles no column carries.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ResolvedRoles {
    names: BTreeMap<Role, Option<String>>,
}

impl ResolvedRoles {
    pub fn get(&self, role: Role) -> Option<&str> {
        self.names.get(&role).and_then(|n| n.as_deref())
    }

    /// Roles among `roles` that did not resolve, in the order given.
    pub fn missing(&self, roles: &[Role]) -> Vec<Role> {
        roles
            .iter()
            .copied()
            .filter(|&r| self.get(r).is_none())
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Role, Option<&str>)> {
        self.names.iter().map(|(r, n)| (*r, n.as_deref()))
    }
}
