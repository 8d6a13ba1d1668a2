//! Request envelopes for the dashboard API routes.
//!
//! Every field is `Option` at the serde level; see [`super::envelope`].

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Roles a workspace member can be given through the dashboard.
/// Ownership transfer is not exposed here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MembershipRole {
    Member,
    Admin,
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct LoginRequest {
    #[validate(
        required(message = "Email is required."),
        email(message = "Enter a valid email address.")
    )]
    pub email: Option<String>,

    #[validate(
        required(message = "Password is required."),
        length(min = 1, message = "Password is required.")
    )]
    pub password: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct RegisterRequest {
    #[validate(
        required(message = "Email is required."),
        email(message = "Enter a valid email address.")
    )]
    pub email: Option<String>,

    #[validate(
        required(message = "Password is required."),
        length(min = 8, max = 128, message = "Password must be 8 to 128 characters.")
    )]
    pub password: Option<String>,

    #[validate(length(max = 150))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,

    #[validate(length(max = 150))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct RefreshRequest {
    #[validate(
        required(message = "Refresh token is required."),
        length(min = 1, message = "Refresh token is required.")
    )]
    pub refresh: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct PasswordResetRequest {
    #[validate(
        required(message = "Email is required."),
        email(message = "Enter a valid email address.")
    )]
    pub email: Option<String>,
}

/// Create or rename a workspace.
#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct WorkspaceRequest {
    #[validate(
        required(message = "Workspace name is required."),
        length(min = 1, max = 120, message = "Workspace name must be 1 to 120 characters.")
    )]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct MembershipUpdate {
    #[validate(required(message = "Role is required."))]
    pub role: Option<MembershipRole>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct InvitationCreate {
    #[validate(
        required(message = "Workspace is required."),
        length(min = 1, max = 128)
    )]
    pub workspace: Option<String>,

    #[validate(
        required(message = "Email is required."),
        email(message = "Enter a valid email address.")
    )]
    pub email: Option<String>,

    #[validate(required(message = "Role is required."))]
    pub role: Option<MembershipRole>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct CheckoutRequest {
    #[validate(
        required(message = "Workspace is required."),
        length(min = 1, max = 128)
    )]
    pub workspace: Option<String>,

    #[validate(
        required(message = "Price is required."),
        length(min = 1, max = 128)
    )]
    pub price_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct PortalRequest {
    #[validate(
        required(message = "Workspace is required."),
        length(min = 1, max = 128)
    )]
    pub workspace: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct ChatCreate {
    #[validate(length(max = 200, message = "Title must be at most 200 characters."))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct MessageCreate {
    #[validate(
        required(message = "Message content is required."),
        length(min = 1, max = 8000, message = "Message must be 1 to 8000 characters.")
    )]
    pub content: Option<String>,
}
