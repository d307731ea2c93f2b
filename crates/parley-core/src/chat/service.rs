//! Chat service orchestrating conversation lifecycle and message exchange.
//!
//! ChatService coordinates between the UserRepository, the
//! ConversationRepository, and the CompletionGateway for the full
//! conversation lifecycle: creating, listing, and deleting conversations,
//! and running a single send-message exchange against the provider.

use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use parley_types::chat::{
    ChatReply, Conversation, ConversationDetail, Sender, DEFAULT_CONVERSATION_TITLE,
};
use parley_types::error::ChatError;

use crate::chat::context::{build_context, DEFAULT_CONTEXT_TURNS};
use crate::chat::repository::ConversationRepository;
use crate::identity::UserRepository;
use crate::llm::CompletionGateway;

/// Orchestrates conversation persistence and the completion round trip.
///
/// Generic over the repository and gateway traits to maintain clean
/// architecture (parley-core never depends on parley-infra).
pub struct ChatService<U, C, G>
where
    U: UserRepository,
    C: ConversationRepository,
    G: CompletionGateway,
{
    users: U,
    conversations: C,
    gateway: G,
    context_turns: usize,
}

impl<U, C, G> ChatService<U, C, G>
where
    U: UserRepository,
    C: ConversationRepository,
    G: CompletionGateway,
{
    /// Create a new chat service with the given repositories and gateway.
    pub fn new(users: U, conversations: C, gateway: G) -> Self {
        Self {
            users,
            conversations,
            gateway,
            context_turns: DEFAULT_CONTEXT_TURNS,
        }
    }

    /// Override the context window size (in turns).
    pub fn with_context_turns(mut self, context_turns: usize) -> Self {
        self.context_turns = context_turns;
        self
    }

    /// Resolve the user or fail with `NotFound`.
    async fn require_user(&self, user_id: &Uuid) -> Result<(), ChatError> {
        match self.users.get(user_id).await? {
            Some(_) => Ok(()),
            None => Err(ChatError::NotFound),
        }
    }

    // --- Conversation lifecycle ---

    /// Create a new empty conversation for a user.
    ///
    /// The title defaults when absent; blank titles count as absent.
    pub async fn create_conversation(
        &self,
        user_id: &Uuid,
        title: Option<String>,
    ) -> Result<Conversation, ChatError> {
        self.require_user(user_id).await?;

        let title = title
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_CONVERSATION_TITLE.to_string());
        let now = Utc::now();
        let conversation = Conversation {
            id: Uuid::now_v7(),
            user_id: *user_id,
            title,
            message_count: 0,
            created_at: now,
            updated_at: now,
        };

        let created = self.conversations.create_conversation(&conversation).await?;
        info!(conversation_id = %created.id, "Conversation created");
        Ok(created)
    }

    /// List a user's conversations, most recently updated first.
    pub async fn list_conversations(
        &self,
        user_id: &Uuid,
    ) -> Result<Vec<Conversation>, ChatError> {
        self.require_user(user_id).await?;
        Ok(self.conversations.list_conversations(user_id).await?)
    }

    /// Get a conversation with its full ordered message log.
    pub async fn get_conversation(
        &self,
        user_id: &Uuid,
        conversation_id: &Uuid,
    ) -> Result<ConversationDetail, ChatError> {
        self.require_user(user_id).await?;

        let conversation = self
            .conversations
            .get_conversation(user_id, conversation_id)
            .await?
            .ok_or(ChatError::NotFound)?;
        let messages = self.conversations.get_messages(conversation_id).await?;

        Ok(ConversationDetail {
            conversation,
            messages,
        })
    }

    /// Delete a conversation and its messages.
    pub async fn delete_conversation(
        &self,
        user_id: &Uuid,
        conversation_id: &Uuid,
    ) -> Result<(), ChatError> {
        self.require_user(user_id).await?;
        self.conversations
            .delete_conversation(user_id, conversation_id)
            .await?;
        info!(conversation_id = %conversation_id, "Conversation deleted");
        Ok(())
    }

    // --- Message exchange ---

    /// Run one send-message exchange against the completion provider.
    ///
    /// The user's turn is persisted before the outbound call and survives a
    /// gateway failure: a failed exchange leaves the conversation with a
    /// dangling unanswered user turn, and the caller sees the gateway error.
    /// On success the reply is appended as an assistant turn and returned.
    pub async fn send_message(
        &self,
        user_id: &Uuid,
        conversation_id: &Uuid,
        text: &str,
    ) -> Result<ChatReply, ChatError> {
        if text.trim().is_empty() {
            return Err(ChatError::InvalidInput(
                "message text must not be empty".to_string(),
            ));
        }
        self.require_user(user_id).await?;

        let conversation = self
            .conversations
            .get_conversation(user_id, conversation_id)
            .await?
            .ok_or(ChatError::NotFound)?;

        self.conversations
            .append_message(&conversation.id, Sender::User, text)
            .await?;

        // The window is built over the updated log, so the turn appended
        // above is always part of the outbound context.
        let log = self.conversations.get_messages(&conversation.id).await?;
        let turns = build_context(&log, self.context_turns)?;

        let reply = match self.gateway.complete(&turns).await {
            Ok(reply) => reply,
            Err(e) => {
                warn!(
                    conversation_id = %conversation.id,
                    provider = self.gateway.name(),
                    error = %e,
                    "Completion call failed; user turn remains persisted"
                );
                return Err(ChatError::Gateway(e));
            }
        };

        self.conversations
            .append_message(&conversation.id, Sender::Assistant, &reply)
            .await?;

        Ok(ChatReply {
            reply,
            conversation_id: conversation.id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parley_types::chat::Message;
    use parley_types::error::{GatewayError, RepositoryError};
    use parley_types::identity::User;
    use parley_types::llm::PromptTurn;
    use std::sync::Mutex;

    // In-memory fakes implementing the ports, enough to drive the
    // orchestration state machine without a database or network.

    #[derive(Default)]
    struct InMemoryUsers {
        users: Mutex<Vec<User>>,
    }

    impl InMemoryUsers {
        fn with_user(user: User) -> Self {
            Self {
                users: Mutex::new(vec![user]),
            }
        }
    }

    impl UserRepository for InMemoryUsers {
        async fn create(&self, user: &User) -> Result<User, RepositoryError> {
            self.users.lock().unwrap().push(user.clone());
            Ok(user.clone())
        }

        async fn get(&self, user_id: &Uuid) -> Result<Option<User>, RepositoryError> {
            Ok(self
                .users
                .lock()
                .unwrap()
                .iter()
                .find(|u| &u.id == user_id)
                .cloned())
        }

        async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError> {
            Ok(self
                .users
                .lock()
                .unwrap()
                .iter()
                .find(|u| u.email == email)
                .cloned())
        }

        async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepositoryError> {
            Ok(self
                .users
                .lock()
                .unwrap()
                .iter()
                .find(|u| u.username == username)
                .cloned())
        }
    }

    #[derive(Default)]
    struct InMemoryConversations {
        conversations: Mutex<Vec<Conversation>>,
        messages: Mutex<Vec<Message>>,
    }

    impl ConversationRepository for InMemoryConversations {
        async fn create_conversation(
            &self,
            conversation: &Conversation,
        ) -> Result<Conversation, RepositoryError> {
            self.conversations.lock().unwrap().push(conversation.clone());
            Ok(conversation.clone())
        }

        async fn get_conversation(
            &self,
            user_id: &Uuid,
            conversation_id: &Uuid,
        ) -> Result<Option<Conversation>, RepositoryError> {
            Ok(self
                .conversations
                .lock()
                .unwrap()
                .iter()
                .find(|c| &c.id == conversation_id && &c.user_id == user_id)
                .cloned())
        }

        async fn list_conversations(
            &self,
            user_id: &Uuid,
        ) -> Result<Vec<Conversation>, RepositoryError> {
            Ok(self
                .conversations
                .lock()
                .unwrap()
                .iter()
                .filter(|c| &c.user_id == user_id)
                .cloned()
                .collect())
        }

        async fn append_message(
            &self,
            conversation_id: &Uuid,
            sender: Sender,
            body: &str,
        ) -> Result<Message, RepositoryError> {
            let mut messages = self.messages.lock().unwrap();
            let seq = messages
                .iter()
                .filter(|m| &m.conversation_id == conversation_id)
                .count() as u32;
            let message = Message {
                id: Uuid::now_v7(),
                conversation_id: *conversation_id,
                seq,
                sender,
                body: body.to_string(),
                created_at: Utc::now(),
            };
            messages.push(message.clone());
            Ok(message)
        }

        async fn get_messages(
            &self,
            conversation_id: &Uuid,
        ) -> Result<Vec<Message>, RepositoryError> {
            Ok(self
                .messages
                .lock()
                .unwrap()
                .iter()
                .filter(|m| &m.conversation_id == conversation_id)
                .cloned()
                .collect())
        }

        async fn delete_conversation(
            &self,
            user_id: &Uuid,
            conversation_id: &Uuid,
        ) -> Result<(), RepositoryError> {
            let mut conversations = self.conversations.lock().unwrap();
            let before = conversations.len();
            conversations.retain(|c| !(&c.id == conversation_id && &c.user_id == user_id));
            if conversations.len() == before {
                return Err(RepositoryError::NotFound);
            }
            self.messages
                .lock()
                .unwrap()
                .retain(|m| &m.conversation_id != conversation_id);
            Ok(())
        }
    }

    /// Gateway stub: replies with a canned string, or fails every call.
    struct StubGateway {
        reply: Option<String>,
        seen_turns: Mutex<Vec<Vec<PromptTurn>>>,
    }

    impl StubGateway {
        fn replying(reply: &str) -> Self {
            Self {
                reply: Some(reply.to_string()),
                seen_turns: Mutex::new(Vec::new()),
            }
        }

        fn failing() -> Self {
            Self {
                reply: None,
                seen_turns: Mutex::new(Vec::new()),
            }
        }
    }

    impl CompletionGateway for StubGateway {
        fn name(&self) -> &str {
            "stub"
        }

        async fn complete(&self, turns: &[PromptTurn]) -> Result<String, GatewayError> {
            self.seen_turns.lock().unwrap().push(turns.to_vec());
            match &self.reply {
                Some(reply) => Ok(reply.clone()),
                None => Err(GatewayError::Http {
                    status: 503,
                    message: "service unavailable".to_string(),
                }),
            }
        }
    }

    fn make_user() -> User {
        User {
            id: Uuid::now_v7(),
            username: "ada".to_string(),
            email: "ada@example.com".to_string(),
            password_hash: "hash".to_string(),
            created_at: Utc::now(),
        }
    }

    fn make_service(
        user: &User,
        gateway: StubGateway,
    ) -> ChatService<InMemoryUsers, InMemoryConversations, StubGateway> {
        ChatService::new(
            InMemoryUsers::with_user(user.clone()),
            InMemoryConversations::default(),
            gateway,
        )
    }

    #[tokio::test]
    async fn test_create_conversation_with_title() {
        let user = make_user();
        let service = make_service(&user, StubGateway::replying("ok"));

        let created = service
            .create_conversation(&user.id, Some("Trip planning".to_string()))
            .await
            .unwrap();
        assert_eq!(created.title, "Trip planning");
        assert_eq!(created.message_count, 0);

        let all = service.list_conversations(&user.id).await.unwrap();
        assert_eq!(all.len(), 1);

        let detail = service.get_conversation(&user.id, &created.id).await.unwrap();
        assert!(detail.messages.is_empty());
    }

    #[tokio::test]
    async fn test_create_conversation_defaults_title() {
        let user = make_user();
        let service = make_service(&user, StubGateway::replying("ok"));

        let created = service.create_conversation(&user.id, None).await.unwrap();
        assert_eq!(created.title, DEFAULT_CONVERSATION_TITLE);

        let blank = service
            .create_conversation(&user.id, Some("   ".to_string()))
            .await
            .unwrap();
        assert_eq!(blank.title, DEFAULT_CONVERSATION_TITLE);
    }

    #[tokio::test]
    async fn test_unknown_user_is_not_found() {
        let user = make_user();
        let service = make_service(&user, StubGateway::replying("ok"));

        let stranger = Uuid::now_v7();
        let err = service.list_conversations(&stranger).await.unwrap_err();
        assert!(matches!(err, ChatError::NotFound));
    }

    #[tokio::test]
    async fn test_send_message_success_appends_both_turns() {
        let user = make_user();
        let service = make_service(&user, StubGateway::replying("It's sunny."));
        let conversation = service.create_conversation(&user.id, None).await.unwrap();

        let reply = service
            .send_message(&user.id, &conversation.id, "What's the weather?")
            .await
            .unwrap();
        assert_eq!(reply.reply, "It's sunny.");
        assert_eq!(reply.conversation_id, conversation.id);

        let detail = service
            .get_conversation(&user.id, &conversation.id)
            .await
            .unwrap();
        assert_eq!(detail.messages.len(), 2);
        assert_eq!(detail.messages[0].sender, Sender::User);
        assert_eq!(detail.messages[0].body, "What's the weather?");
        assert_eq!(detail.messages[1].sender, Sender::Assistant);
        assert_eq!(detail.messages[1].body, "It's sunny.");
    }

    #[tokio::test]
    async fn test_send_message_gateway_failure_keeps_user_turn() {
        let user = make_user();
        let service = make_service(&user, StubGateway::failing());
        let conversation = service.create_conversation(&user.id, None).await.unwrap();

        let err = service
            .send_message(&user.id, &conversation.id, "hello?")
            .await
            .unwrap_err();
        assert!(matches!(err, ChatError::Gateway(_)));

        // Exactly one message: the dangling user turn, no assistant reply.
        let detail = service
            .get_conversation(&user.id, &conversation.id)
            .await
            .unwrap();
        assert_eq!(detail.messages.len(), 1);
        assert_eq!(detail.messages[0].sender, Sender::User);
    }

    #[tokio::test]
    async fn test_send_message_empty_text_mutates_nothing() {
        let user = make_user();
        let service = make_service(&user, StubGateway::replying("ok"));
        let conversation = service.create_conversation(&user.id, None).await.unwrap();

        let err = service
            .send_message(&user.id, &conversation.id, "   ")
            .await
            .unwrap_err();
        assert!(matches!(err, ChatError::InvalidInput(_)));

        let detail = service
            .get_conversation(&user.id, &conversation.id)
            .await
            .unwrap();
        assert!(detail.messages.is_empty());
    }

    #[tokio::test]
    async fn test_send_message_unknown_conversation_is_not_found() {
        let user = make_user();
        let service = make_service(&user, StubGateway::replying("ok"));

        let err = service
            .send_message(&user.id, &Uuid::now_v7(), "hello")
            .await
            .unwrap_err();
        assert!(matches!(err, ChatError::NotFound));
    }

    #[tokio::test]
    async fn test_send_message_window_includes_newest_turn() {
        let user = make_user();
        let gateway = StubGateway::replying("ack");
        let service = make_service(&user, gateway).with_context_turns(3);
        let conversation = service.create_conversation(&user.id, None).await.unwrap();

        for text in ["one", "two", "three"] {
            service
                .send_message(&user.id, &conversation.id, text)
                .await
                .unwrap();
        }

        let seen = service.gateway.seen_turns.lock().unwrap();
        // Last call saw at most 3 turns and its newest is the triggering text.
        let last = seen.last().unwrap();
        assert_eq!(last.len(), 3);
        assert_eq!(last.last().unwrap().text, "three");
    }

    #[tokio::test]
    async fn test_delete_conversation_twice_is_not_found() {
        let user = make_user();
        let service = make_service(&user, StubGateway::replying("ok"));
        let conversation = service.create_conversation(&user.id, None).await.unwrap();

        service
            .delete_conversation(&user.id, &conversation.id)
            .await
            .unwrap();
        let err = service
            .delete_conversation(&user.id, &conversation.id)
            .await
            .unwrap_err();
        assert!(matches!(err, ChatError::NotFound));
    }
}
