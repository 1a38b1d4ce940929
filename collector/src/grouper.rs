use shared::{Message, MessageGroups};

/// Bucket messages by their exact subject, keeping arrival order.
///
/// Each message becomes one formatted block; nothing is dropped or reordered.
pub fn group_by_subject(messages: Vec<Message>) -> MessageGroups {
    let mut groups = MessageGroups::new();

    for message in messages {
        let block = format_message(&message);
        groups.push(message.subject, block);
    }

    groups
}

/// Render a message into the block sent for summarization and stored per group
pub fn format_message(message: &Message) -> String {
    format!(
        "Email: {}\nFrom: {}\nDate: {}\n\n---\n\n{}\n",
        message.subject.as_deref().unwrap_or_default(),
        message.sender.as_deref().unwrap_or_default(),
        message.date.as_deref().unwrap_or_default(),
        message.body.as_deref().unwrap_or_default(),
    )
}
