use serde::{Deserialize, Serialize};

/// An acting or referenced user. Identity is resolved outside this crate;
/// records only keep the id and the name seen at the time of the action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub user_name: String,
}

impl User {
    pub fn new(id: i64, user_name: impl Into<String>) -> Self {
        Self {
            id,
            user_name: user_name.into(),
        }
    }
}
