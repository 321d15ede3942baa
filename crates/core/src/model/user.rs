use crate::model::ids::UserId;

/// Account as reported by the remote API's `/me` endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub name: Option<String>,
    pub username: String,
    pub email: String,
}

impl User {
    #[must_use]
    pub fn new(
        id: UserId,
        name: Option<String>,
        username: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            id,
            name: name.filter(|n| !n.trim().is_empty()),
            username: username.into(),
            email: email.into(),
        }
    }

    /// Name used for greetings: full name, then username, then "User".
    #[must_use]
    pub fn display_name(&self) -> &str {
        if let Some(name) = self.name.as_deref() {
            return name;
        }
        if self.username.trim().is_empty() {
            "User"
        } else {
            &self.username
        }
    }
}
