//! Data Transfer Objects - request/response types for the API.

use serde::{Deserialize, Serialize};

/// Request to register a new user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterUserRequest {
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub location: String,
}

/// Request to login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Response containing authentication tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Tags may be sent as a JSON list or as one whitespace separated string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TagInput {
    List(Vec<String>),
    Text(String),
}

impl TagInput {
    /// Raw tag names, not yet deduplicated.
    pub fn into_names(self) -> Vec<String> {
        match self {
            TagInput::List(names) => names,
            TagInput::Text(raw) => raw.split_whitespace().map(str::to_string).collect(),
        }
    }
}

/// Request to create a post.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePostRequest {
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub tags: Option<TagInput>,
}

/// Request to update a post. Absent fields are left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdatePostRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    pub active: Option<bool>,
    pub tags: Option<TagInput>,
}

/// Request to update the current user. Absent fields are left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub location: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_input_accepts_list_and_text() {
        let list: CreatePostRequest =
            serde_json::from_str(r##"{"title":"T","content":"C","tags":["#a","#b"]}"##).unwrap();
        assert_eq!(
            list.tags.unwrap().into_names(),
            vec!["#a".to_string(), "#b".to_string()]
        );

        let text: CreatePostRequest =
            serde_json::from_str(r##"{"title":"T","content":"C","tags":" #a  #b "}"##).unwrap();
        assert_eq!(
            text.tags.unwrap().into_names(),
            vec!["#a".to_string(), "#b".to_string()]
        );

        let none: CreatePostRequest =
            serde_json::from_str(r#"{"title":"T","content":"C"}"#).unwrap();
        assert!(none.tags.is_none());
    }
}
