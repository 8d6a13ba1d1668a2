//! The dashboard API surface.
//!
//! One entry per inbound method + path. Paths shared by several entries are
//! grouped into a single axum route by the server.

use crate::routing::route::{Callback, ProxyRoute};
use crate::validation::envelopes::{
    ChatCreate, CheckoutRequest, InvitationCreate, LoginRequest, MembershipUpdate, MessageCreate,
    PasswordResetRequest, PortalRequest, RefreshRequest, RegisterRequest, WorkspaceRequest,
};

use crate::routing::route::HttpMethod::{Delete, Get, Post, Put};

const CHECKOUT_CALLBACKS: &[Callback] = &[
    Callback {
        field: "success_url",
        path: "/dashboard/billing?checkout=success",
    },
    Callback {
        field: "cancel_url",
        path: "/dashboard/billing?checkout=cancelled",
    },
];

const PORTAL_CALLBACKS: &[Callback] = &[Callback {
    field: "return_url",
    path: "/dashboard/billing",
}];

const INVITATION_CALLBACKS: &[Callback] = &[Callback {
    field: "accept_url",
    path: "/invitations/accept",
}];

const PASSWORD_RESET_CALLBACKS: &[Callback] = &[Callback {
    field: "confirm_url",
    path: "/auth/reset-password/confirm",
}];

/// Every proxied route, in registration order.
pub fn catalog() -> Vec<ProxyRoute> {
    vec![
        // Authentication
        ProxyRoute::public("auth.login", Post, "/api/auth/login", "/auth/jwt/create/")
            .body::<LoginRequest>(),
        ProxyRoute::public("auth.register", Post, "/api/auth/register", "/auth/users/")
            .body::<RegisterRequest>(),
        ProxyRoute::public("auth.refresh", Post, "/api/auth/refresh", "/auth/jwt/refresh/")
            .body::<RefreshRequest>(),
        ProxyRoute::public(
            "auth.password_reset",
            Post,
            "/api/auth/password-reset",
            "/auth/users/reset_password/",
        )
        .body::<PasswordResetRequest>()
        .callbacks(PASSWORD_RESET_CALLBACKS),
        ProxyRoute::protected("auth.me", Get, "/api/auth/me", "/auth/users/me/"),
        // Workspaces
        ProxyRoute::protected("workspaces.list", Get, "/api/workspaces", "/api/workspaces/"),
        ProxyRoute::protected("workspaces.create", Post, "/api/workspaces", "/api/workspaces/")
            .body::<WorkspaceRequest>(),
        ProxyRoute::protected(
            "workspaces.get",
            Get,
            "/api/workspaces/{workspace_id}",
            "/api/workspaces/{workspace_id}/",
        ),
        ProxyRoute::protected(
            "workspaces.update",
            Put,
            "/api/workspaces/{workspace_id}",
            "/api/workspaces/{workspace_id}/",
        )
        .body::<WorkspaceRequest>(),
        ProxyRoute::protected(
            "workspaces.delete",
            Delete,
            "/api/workspaces/{workspace_id}",
            "/api/workspaces/{workspace_id}/",
        ),
        // Memberships
        ProxyRoute::protected(
            "memberships.list",
            Get,
            "/api/workspaces/{workspace_id}/memberships",
            "/api/workspaces/{workspace_id}/memberships/",
        ),
        ProxyRoute::protected(
            "memberships.update",
            Put,
            "/api/workspaces/{workspace_id}/memberships/{membership_id}",
            "/api/workspaces/{workspace_id}/memberships/{membership_id}/",
        )
        .body::<MembershipUpdate>(),
        ProxyRoute::protected(
            "memberships.delete",
            Delete,
            "/api/workspaces/{workspace_id}/memberships/{membership_id}",
            "/api/workspaces/{workspace_id}/memberships/{membership_id}/",
        ),
        // Invitations
        ProxyRoute::protected("invitations.list", Get, "/api/invitations", "/api/invitations/"),
        ProxyRoute::protected("invitations.create", Post, "/api/invitations", "/api/invitations/")
            .body::<InvitationCreate>()
            .callbacks(INVITATION_CALLBACKS),
        ProxyRoute::protected(
            "invitations.delete",
            Delete,
            "/api/invitations/{invitation_id}",
            "/api/invitations/{invitation_id}/",
        ),
        ProxyRoute::protected(
            "invitations.accept",
            Post,
            "/api/invitations/{invitation_id}/accept",
            "/api/invitations/{invitation_id}/accept/",
        ),
        // Billing
        ProxyRoute::protected("subscriptions.list", Get, "/api/subscriptions", "/api/subscriptions/"),
        ProxyRoute::protected("billing.checkout", Post, "/api/billing/checkout", "/api/billing/checkout/")
            .body::<CheckoutRequest>()
            .callbacks(CHECKOUT_CALLBACKS),
        ProxyRoute::protected("billing.portal", Post, "/api/billing/portal", "/api/billing/portal/")
            .body::<PortalRequest>()
            .callbacks(PORTAL_CALLBACKS),
        // Assistant chat
        ProxyRoute::protected("chats.list", Get, "/api/chats", "/api/chats/"),
        ProxyRoute::protected("chats.create", Post, "/api/chats", "/api/chats/").body::<ChatCreate>(),
        ProxyRoute::protected("chats.get", Get, "/api/chats/{chat_id}", "/api/chats/{chat_id}/"),
        ProxyRoute::protected("chats.delete", Delete, "/api/chats/{chat_id}", "/api/chats/{chat_id}/"),
        ProxyRoute::protected(
            "chats.message",
            Post,
            "/api/chats/{chat_id}/messages",
            "/api/chats/{chat_id}/messages/",
        )
        .body::<MessageCreate>(),
        // Documents
        ProxyRoute::protected("documents.list", Get, "/api/documents", "/api/documents/"),
        ProxyRoute::protected(
            "documents.get",
            Get,
            "/api/documents/{document_id}",
            "/api/documents/{document_id}/",
        ),
        ProxyRoute::protected(
            "documents.delete",
            Delete,
            "/api/documents/{document_id}",
            "/api/documents/{document_id}/",
        ),
        // Emails
        ProxyRoute::protected("emails.list", Get, "/api/emails", "/api/emails/"),
        ProxyRoute::protected("emails.get", Get, "/api/emails/{email_id}", "/api/emails/{email_id}/"),
    ]
}
