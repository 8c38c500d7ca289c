use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use uuid::Uuid;

use crate::error::WorkflowError;

/// Role resolved by the upstream auth layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Admin,
    Author,
}

/// Caller identity passed explicitly into every workflow operation.
/// Sessions terminate upstream; the service only ever sees this value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Caller {
    pub user_id: Uuid,
    pub role: Role,
}

impl Caller {
    pub fn admin(user_id: Uuid) -> Self {
        Caller {
            user_id,
            role: Role::Admin,
        }
    }

    pub fn author(user_id: Uuid) -> Self {
        Caller {
            user_id,
            role: Role::Author,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    pub fn require_admin(&self) -> Result<(), WorkflowError> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(WorkflowError::Unauthorized)
        }
    }

    /// Admins may view anything; authors only their own records.
    pub fn may_view(&self, owner_id: Uuid) -> bool {
        self.is_admin() || self.user_id == owner_id
    }
}

/// Reads the identity headers forwarded by the auth proxy. Requests without
/// a resolvable identity never reach the workflow.
#[async_trait]
impl<S> FromRequestParts<S> for Caller
where
    S: Send + Sync,
{
    type Rejection = WorkflowError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user_id = parts
            .headers
            .get("x-user-id")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| Uuid::parse_str(v).ok())
            .ok_or(WorkflowError::Unauthorized)?;

        let role = match parts.headers.get("x-user-role").and_then(|v| v.to_str().ok()) {
            Some("admin") => Role::Admin,
            Some("author") => Role::Author,
            _ => return Err(WorkflowError::Unauthorized),
        };

        Ok(Caller { user_id, role })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admins_may_view_everything() {
        let admin = Caller::admin(Uuid::new_v4());
        assert!(admin.may_view(Uuid::new_v4()));
        assert!(admin.require_admin().is_ok());
    }

    #[test]
    fn authors_are_scoped_to_their_own_records() {
        let author_id = Uuid::new_v4();
        let author = Caller::author(author_id);
        assert!(author.may_view(author_id));
        assert!(!author.may_view(Uuid::new_v4()));
        assert!(matches!(
            author.require_admin(),
            Err(WorkflowError::Unauthorized)
        ));
    }
}
