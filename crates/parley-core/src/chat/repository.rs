//! ConversationRepository trait definition.
//!
//! Provides the durable per-user conversation collection: conversation CRUD
//! and append-only message persistence. Follows the same RPITIT pattern as
//! `UserRepository`.

use parley_types::chat::{Conversation, Message, Sender};
use parley_types::error::RepositoryError;
use uuid::Uuid;

/// Repository trait for conversation and message persistence.
///
/// Implementations live in parley-infra (e.g., `SqliteConversationRepository`).
/// All operations persist immediately; there is no separate commit step.
pub trait ConversationRepository: Send + Sync {
    /// Insert a new empty conversation.
    fn create_conversation(
        &self,
        conversation: &Conversation,
    ) -> impl std::future::Future<Output = Result<Conversation, RepositoryError>> + Send;

    /// Get a conversation by id, scoped to its owner. `None` when the
    /// conversation does not exist or is owned by someone else.
    fn get_conversation(
        &self,
        user_id: &Uuid,
        conversation_id: &Uuid,
    ) -> impl std::future::Future<Output = Result<Option<Conversation>, RepositoryError>> + Send;

    /// List a user's conversations, most recently updated first.
    fn list_conversations(
        &self,
        user_id: &Uuid,
    ) -> impl std::future::Future<Output = Result<Vec<Conversation>, RepositoryError>> + Send;

    /// Append a message to a conversation's log.
    ///
    /// Assigns the next sequence number and the append timestamp, and bumps
    /// the conversation's `message_count` and `updated_at`. The append is
    /// the sole mutation and is visible to subsequent reads.
    fn append_message(
        &self,
        conversation_id: &Uuid,
        sender: Sender,
        body: &str,
    ) -> impl std::future::Future<Output = Result<Message, RepositoryError>> + Send;

    /// Get a conversation's messages in append order.
    fn get_messages(
        &self,
        conversation_id: &Uuid,
    ) -> impl std::future::Future<Output = Result<Vec<Message>, RepositoryError>> + Send;

    /// Delete a conversation and its messages, scoped to the owner.
    ///
    /// Fails with `NotFound` when no matching conversation is owned by the
    /// user; a second delete of the same id also fails with `NotFound`.
    fn delete_conversation(
        &self,
        user_id: &Uuid,
        conversation_id: &Uuid,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;
}
