//! Test utilities and module declarations for storage tests.


use chatvec_core::{Message, StoredMessage};

pub fn create_test_message(id: &str, conversation: &str, role: &str) -> Message {
    Message {
        conversation_id: conversation.to_owned(),
        message_id: id.to_owned(),
        role: role.to_owned(),
        text: format!("Test message {id}"),
        create_time: Some(1_700_000_000.0),
        update_time: None,
    }
}

pub fn create_test_record(id: &str, role: &str, embedding: Vec<f32>) -> StoredMessage {
    StoredMessage::new(create_test_message(id, "test-conversation", role), Some(embedding))
}
