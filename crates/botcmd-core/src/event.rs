//! The hosting framework's side of a dispatch: incoming message, client
//! context and reply capability.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use botcmd_types::error::ReplyError;
use botcmd_types::message::Message;
use tokio::runtime::Handle;

/// Context of the bot client that received a message.
pub trait BotClient: Send + Sync {
    /// Username the bot runs as, if known yet.
    fn username(&self) -> Option<String>;

    /// Runtime that fire-and-forget reply tasks are spawned on.
    fn runtime(&self) -> Handle;
}

/// Sends a reply to the message being dispatched.
///
/// Object-safe: the future is boxed so dispatch can hold `Arc<dyn Replier>`
/// and move it into a spawned task.
pub trait Replier: Send + Sync {
    fn send_reply(
        &self,
        text: String,
    ) -> Pin<Box<dyn Future<Output = Result<(), ReplyError>> + Send + '_>>;
}

/// One incoming message as handed to [`Command::dispatch`](crate::Command::dispatch).
#[derive(Clone)]
pub struct CommandEvent {
    pub message: Arc<Message>,
    pub client: Arc<dyn BotClient>,
    pub replier: Arc<dyn Replier>,
}

impl CommandEvent {
    pub fn new(
        message: impl Into<Arc<Message>>,
        client: Arc<dyn BotClient>,
        replier: Arc<dyn Replier>,
    ) -> Self {
        Self {
            message: message.into(),
            client,
            replier,
        }
    }
}

impl std::fmt::Debug for CommandEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandEvent")
            .field("message", &self.message)
            .field("username", &self.client.username())
            .finish_non_exhaustive()
    }
}

/// [`BotClient`] with a fixed username, running on a given tokio runtime.
#[derive(Debug, Clone)]
pub struct LocalClient {
    username: Option<String>,
    handle: Handle,
}

impl LocalClient {
    pub fn new(username: Option<String>, handle: Handle) -> Self {
        Self { username, handle }
    }

    /// Client bound to the runtime of the calling task.
    ///
    /// # Panics
    ///
    /// Panics when called outside a tokio runtime.
    pub fn current(username: Option<String>) -> Self {
        Self::new(username, Handle::current())
    }
}

impl BotClient for LocalClient {
    fn username(&self) -> Option<String> {
        self.username.clone()
    }

    fn runtime(&self) -> Handle {
        self.handle.clone()
    }
}
