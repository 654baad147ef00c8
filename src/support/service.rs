//! Support service layer - tickets and reply threads

use sqlx::PgPool;
use thiserror::Error;
use uuid::Uuid;

use crate::support::{SupportTicket, TicketReply, TicketStatus, TicketThread};

/// Support errors
#[derive(Error, Debug)]
pub enum SupportError {
    #[error("Ticket not found: {0}")]
    NotFound(Uuid),

    #[error("Not your ticket")]
    Forbidden,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Support service
#[derive(Clone)]
pub struct SupportService {
    db_pool: PgPool,
}

impl SupportService {
    /// Create a new support service instance
    pub fn new(db_pool: PgPool) -> Self {
        Self { db_pool }
    }

    /// Open a new ticket
    pub async fn create_ticket(
        &self,
        user_id: Uuid,
        subject: &str,
        message: &str,
    ) -> Result<SupportTicket, SupportError> {
        let ticket = sqlx::query_as::<_, SupportTicket>(
            r#"
            INSERT INTO support_tickets (id, user_id, subject, message, status)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(subject)
        .bind(message)
        .bind(TicketStatus::Open)
        .fetch_one(&self.db_pool)
        .await?;

        tracing::info!(ticket_id = %ticket.id, user_id = %user_id, "Support ticket opened");

        Ok(ticket)
    }

    /// A user's tickets, newest first
    pub async fn list_tickets(&self, user_id: Uuid) -> Result<Vec<SupportTicket>, SupportError> {
        let tickets = sqlx::query_as::<_, SupportTicket>(
            "SELECT * FROM support_tickets WHERE user_id = $1 ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.db_pool)
        .await?;

        Ok(tickets)
    }

    /// Full thread for a ticket. Non-admins can only read their own.
    pub async fn thread(
        &self,
        ticket_id: Uuid,
        caller_id: Uuid,
        is_admin: bool,
    ) -> Result<TicketThread, SupportError> {
        let ticket = self.get_authorized(ticket_id, caller_id, is_admin).await?;

        let replies = sqlx::query_as::<_, TicketReply>(
            "SELECT * FROM ticket_replies WHERE ticket_id = $1 ORDER BY created_at",
        )
        .bind(ticket_id)
        .fetch_all(&self.db_pool)
        .await?;

        Ok(TicketThread { ticket, replies })
    }

    /// Append a reply. A reply to a closed ticket reopens it; a staff
    /// reply parks the ticket as pending for the user.
    pub async fn add_reply(
        &self,
        ticket_id: Uuid,
        caller_id: Uuid,
        is_admin: bool,
        message: &str,
    ) -> Result<TicketReply, SupportError> {
        self.get_authorized(ticket_id, caller_id, is_admin).await?;

        let mut tx = self.db_pool.begin().await?;

        let reply = sqlx::query_as::<_, TicketReply>(
            r#"
            INSERT INTO ticket_replies (id, ticket_id, user_id, is_admin, message)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(ticket_id)
        .bind(caller_id)
        .bind(is_admin)
        .bind(message)
        .fetch_one(&mut *tx)
        .await?;

        let next_status = if is_admin {
            TicketStatus::Pending
        } else {
            TicketStatus::Open
        };

        sqlx::query(
            "UPDATE support_tickets SET status = $1, updated_at = NOW() WHERE id = $2",
        )
        .bind(next_status)
        .bind(ticket_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(reply)
    }

    /// Close a ticket (owner or staff)
    pub async fn close_ticket(
        &self,
        ticket_id: Uuid,
        caller_id: Uuid,
        is_admin: bool,
    ) -> Result<SupportTicket, SupportError> {
        self.get_authorized(ticket_id, caller_id, is_admin).await?;

        let ticket = sqlx::query_as::<_, SupportTicket>(
            r#"
            UPDATE support_tickets SET status = 'closed', updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(ticket_id)
        .fetch_one(&self.db_pool)
        .await?;

        Ok(ticket)
    }

    async fn get_authorized(
        &self,
        ticket_id: Uuid,
        caller_id: Uuid,
        is_admin: bool,
    ) -> Result<SupportTicket, SupportError> {
        let ticket: Option<SupportTicket> =
            sqlx::query_as("SELECT * FROM support_tickets WHERE id = $1")
                .bind(ticket_id)
                .fetch_optional(&self.db_pool)
                .await?;
        let ticket = ticket.ok_or(SupportError::NotFound(ticket_id))?;

        if !is_admin && ticket.user_id != caller_id {
            return Err(SupportError::Forbidden);
        }

        Ok(ticket)
    }
}
