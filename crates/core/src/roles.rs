//! Well-known roles and the acting user.
//!
//! Role names are issued by the external auth service inside the JWT `role`
//! claim; anything not listed here is rejected as unauthorized.

use serde::Serialize;

use crate::error::CoreError;
use crate::types::DbId;

pub const ROLE_CUSTOMER: &str = "customer";
pub const ROLE_MERCHANT: &str = "merchant";
pub const ROLE_AGENT: &str = "agent";
pub const ROLE_ADMIN: &str = "admin";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Customer,
    Merchant,
    Agent,
    Admin,
}

impl Role {
    pub fn parse(s: &str) -> Result<Self, CoreError> {
        match s {
            ROLE_CUSTOMER => Ok(Self::Customer),
            ROLE_MERCHANT => Ok(Self::Merchant),
            ROLE_AGENT => Ok(Self::Agent),
            ROLE_ADMIN => Ok(Self::Admin),
            other => Err(CoreError::Unauthorized(format!("Unknown role '{other}'"))),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Customer => ROLE_CUSTOMER,
            Self::Merchant => ROLE_MERCHANT,
            Self::Agent => ROLE_AGENT,
            Self::Admin => ROLE_ADMIN,
        }
    }
}

/// The user on whose behalf an operation runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    pub user_id: DbId,
    pub role: Role,
}

impl Actor {
    pub fn new(user_id: DbId, role: Role) -> Self {
        Self { user_id, role }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Whether this actor may edit a product owned by `merchant_id`.
    pub fn manages_product(&self, merchant_id: DbId) -> bool {
        self.is_admin() || (self.role == Role::Merchant && self.user_id == merchant_id)
    }

    /// Fail with `Forbidden` unless [`Actor::manages_product`] holds.
    pub fn ensure_manages_product(&self, merchant_id: DbId) -> Result<(), CoreError> {
        if self.manages_product(merchant_id) {
            Ok(())
        } else {
            Err(CoreError::Forbidden(
                "Only the owning merchant or an admin may manage this product".into(),
            ))
        }
    }

    /// Customers book for themselves, agents for referred customers, admins for anyone.
    pub fn can_place_orders(&self) -> bool {
        matches!(self.role, Role::Customer | Role::Agent | Role::Admin)
    }
}
