use crate::protocols::chat::ChatMessage;

/// Capability set every streaming agent exposes.
///
/// Agents differ in prompt and allowed tag protocol, not in how their
/// streams are driven — concrete agents are independent implementers,
/// not a class hierarchy.
pub trait StreamableAgent: Send + Sync {
    /// Stable agent identifier, used in logs and spans.
    fn name(&self) -> &str;

    /// System prompt establishing the agent's tag protocol.
    fn build_system_prompt(&self) -> String;

    /// Messages for one request; the default is system + user.
    fn build_messages(&self, query: &str) -> Vec<ChatMessage> {
        vec![
            ChatMessage::system(self.build_system_prompt()),
            ChatMessage::user(query),
        ]
    }

    /// Whether `tag_name` belongs to this agent's protocol. Tags outside
    /// it still degrade gracefully downstream; this is an observability
    /// hook, not a gate.
    fn validate_operation(&self, tag_name: &str) -> bool;
}
