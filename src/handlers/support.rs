//! Support ticket HTTP handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::error::ApiError;
use crate::handlers::AuthenticatedUser;
use crate::models::UserRole;
use crate::state::AppState;
use crate::support::{
    CreateTicketRequest, ReplyRequest, SupportTicket, TicketReply, TicketThread,
};

/// POST /api/support/tickets - Open a ticket
pub async fn create_ticket(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(req): Json<CreateTicketRequest>,
) -> Result<(StatusCode, Json<SupportTicket>), ApiError> {
    req.validate()?;

    let ticket = state
        .support_service
        .create_ticket(user.user_id, &req.subject, &req.message)
        .await?;

    Ok((StatusCode::CREATED, Json(ticket)))
}

/// GET /api/support/tickets - The caller's tickets
pub async fn list_tickets(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<Vec<SupportTicket>>, ApiError> {
    let tickets = state.support_service.list_tickets(user.user_id).await?;

    Ok(Json(tickets))
}

/// GET /api/support/tickets/:id - A ticket with its thread
pub async fn get_thread(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(ticket_id): Path<Uuid>,
) -> Result<Json<TicketThread>, ApiError> {
    let thread = state
        .support_service
        .thread(ticket_id, user.user_id, user.role == UserRole::Admin)
        .await?;

    Ok(Json(thread))
}

/// POST /api/support/tickets/:id/replies - Reply to a ticket
pub async fn add_reply(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(ticket_id): Path<Uuid>,
    Json(req): Json<ReplyRequest>,
) -> Result<(StatusCode, Json<TicketReply>), ApiError> {
    req.validate()?;

    let reply = state
        .support_service
        .add_reply(
            ticket_id,
            user.user_id,
            user.role == UserRole::Admin,
            &req.message,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(reply)))
}

/// POST /api/support/tickets/:id/close - Close a ticket
pub async fn close_ticket(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(ticket_id): Path<Uuid>,
) -> Result<Json<SupportTicket>, ApiError> {
    let ticket = state
        .support_service
        .close_ticket(ticket_id, user.user_id, user.role == UserRole::Admin)
        .await?;

    Ok(Json(ticket))
}
