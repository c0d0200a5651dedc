use uuid::Uuid;

/// An already-authenticated caller, as supplied by the auth collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Caller {
    pub user_id: Uuid,
    /// Session (authorization token) the request was made with.
    pub authorization_token_id: Uuid,
}
