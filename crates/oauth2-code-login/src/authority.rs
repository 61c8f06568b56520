//! Mapping from provider authorities to application authorities.

use crate::config::defaults;
use crate::models::{Authorities, GrantedAuthority};

/// Turns the raw authorities of a resolved identity into the authorities
/// granted to the principal.
///
/// Implementations must be deterministic and free of side effects.
pub trait AuthorityMapper: Send + Sync {
    fn map_authorities(&self, authorities: &Authorities) -> Authorities;
}

impl<F> AuthorityMapper for F
where
    F: Fn(&Authorities) -> Authorities + Send + Sync,
{
    fn map_authorities(&self, authorities: &Authorities) -> Authorities {
        self(authorities)
    }
}

/// Returns authorities unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityAuthorityMapper;

impl AuthorityMapper for IdentityAuthorityMapper {
    fn map_authorities(&self, authorities: &Authorities) -> Authorities {
        authorities.clone()
    }
}

/// Case conversion applied by [`SimpleAuthorityMapper`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaseConversion {
    Upper,
    Lower,
}

/// Adds a role prefix, optionally converts case, and optionally adds a
/// default authority.
///
/// `admin` becomes `ROLE_admin` with the default settings, or `ROLE_ADMIN`
/// with [`CaseConversion::Upper`]. The prefix is applied after case
/// conversion and is never doubled.
#[derive(Debug, Clone)]
pub struct SimpleAuthorityMapper {
    prefix: String,
    case: Option<CaseConversion>,
    default_authority: Option<GrantedAuthority>,
}

impl SimpleAuthorityMapper {
    #[must_use]
    pub fn new() -> Self {
        Self { prefix: defaults::ROLE_PREFIX.to_string(), case: None, default_authority: None }
    }

    #[must_use]
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    #[must_use]
    pub const fn with_case(mut self, case: CaseConversion) -> Self {
        self.case = Some(case);
        self
    }

    /// Authority added to every mapped set, e.g. `ROLE_USER`.
    #[must_use]
    pub fn with_default_authority(mut self, authority: impl Into<String>) -> Self {
        self.default_authority = Some(GrantedAuthority::new(authority));
        self
    }

    fn map_one(&self, authority: &str) -> GrantedAuthority {
        let converted = match self.case {
            Some(CaseConversion::Upper) => authority.to_uppercase(),
            Some(CaseConversion::Lower) => authority.to_lowercase(),
            None => authority.to_string(),
        };
        if converted.starts_with(&self.prefix) {
            GrantedAuthority::new(converted)
        } else {
            GrantedAuthority::new(format!("{}{converted}", self.prefix))
        }
    }
}

impl Default for SimpleAuthorityMapper {
    fn default() -> Self {
        Self::new()
    }
}

impl AuthorityMapper for SimpleAuthorityMapper {
    fn map_authorities(&self, authorities: &Authorities) -> Authorities {
        let mut mapped: Authorities =
            authorities.iter().map(|a| self.map_one(a.as_str())).collect();
        if let Some(default) = &self.default_authority {
            mapped.insert(default.clone());
        }
        mapped
    }
}
