use uuid::Uuid;

/// Authenticated request context, produced by the capability guard and
/// carried in request extensions.
#[derive(Debug, Clone)]
pub struct AuthCtx {
    pub user_id: Uuid,
    roles: Vec<String>,
}

impl AuthCtx {
    pub fn new(user_id: Uuid, roles: Vec<String>) -> Self {
        Self { user_id, roles }
    }

    pub fn is_admin(&self) -> bool {
        self.roles.iter().any(|r| r == "admin")
    }
}
