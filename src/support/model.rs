//! Support models and data structures

use serde::{Deserialize, Serialize};
use sqlx::types::chrono::{DateTime, Utc};
use uuid::Uuid;
use validator::Validate;

/// Support ticket
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone)]
pub struct SupportTicket {
    pub id: Uuid,
    pub user_id: Uuid,
    pub subject: String,
    pub message: String,
    pub status: TicketStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Ticket status
#[derive(Debug, Serialize, Deserialize, sqlx::Type, Clone, Copy, PartialEq, Eq)]
#[sqlx(type_name = "ticket_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TicketStatus {
    Open,
    /// Waiting on the user after a staff reply
    Pending,
    Closed,
}

/// One message in a ticket thread
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone)]
pub struct TicketReply {
    pub id: Uuid,
    pub ticket_id: Uuid,
    pub user_id: Uuid,
    pub is_admin: bool,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

/// A ticket with its replies, oldest first
#[derive(Debug, Serialize)]
pub struct TicketThread {
    pub ticket: SupportTicket,
    pub replies: Vec<TicketReply>,
}

/// Request DTO for opening a ticket
#[derive(Debug, Deserialize, Validate)]
pub struct CreateTicketRequest {
    #[validate(length(min = 1, max = 200))]
    pub subject: String,
    #[validate(length(min = 1, max = 5000))]
    pub message: String,
}

/// Request DTO for replying to a ticket
#[derive(Debug, Deserialize, Validate)]
pub struct ReplyRequest {
    #[validate(length(min = 1, max = 5000))]
    pub message: String,
}
