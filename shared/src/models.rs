use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Placeholder stored and exported in place of an absent subject
pub const NO_SUBJECT: &str = "No Subject";

/// Placeholders for calendar fields the provider left out
pub const NO_TITLE: &str = "No Title";
pub const NO_LOCATION: &str = "No Location";
pub const NO_DESCRIPTION: &str = "No Description";

/// Email message as extracted from the provider record
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Raw `Date` header value
    pub date: Option<String>,
    pub subject: Option<String>,
    pub sender: Option<String>,
    /// First `text/plain` part, if any
    pub body: Option<String>,
}

/// Messages sharing the exact same subject, in arrival order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageGroup {
    pub subject: Option<String>,
    pub members: Vec<String>,
}

impl MessageGroup {
    /// Subject with the placeholder substituted for `None`
    pub fn display_subject(&self) -> &str {
        self.subject.as_deref().unwrap_or(NO_SUBJECT)
    }

    /// Members joined the way they are stored and sent for summarization
    pub fn joined_members(&self) -> String {
        self.members.join("\n")
    }
}

/// Ordered collection of message groups.
///
/// Groups keep first-arrival order; lookup is exact match on the raw subject,
/// so `"Trip"` and `"trip "` are different groups and `None` is its own key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageGroups {
    groups: Vec<MessageGroup>,
    index: HashMap<Option<String>, usize>,
}

impl MessageGroups {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a formatted member to the group keyed by `subject`, creating it if needed
    pub fn push(&mut self, subject: Option<String>, member: String) {
        match self.index.get(&subject) {
            Some(&position) => self.groups[position].members.push(member),
            None => {
                self.index.insert(subject.clone(), self.groups.len());
                self.groups.push(MessageGroup {
                    subject,
                    members: vec![member],
                });
            }
        }
    }

    pub fn get(&self, subject: Option<&str>) -> Option<&MessageGroup> {
        self.index
            .get(&subject.map(str::to_string))
            .map(|&position| &self.groups[position])
    }

    pub fn iter(&self) -> impl Iterator<Item = &MessageGroup> {
        self.groups.iter()
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Number of messages across all groups
    pub fn member_count(&self) -> usize {
        self.groups.iter().map(|g| g.members.len()).sum()
    }

    pub fn into_groups(self) -> Vec<MessageGroup> {
        self.groups
    }
}

impl<'a> IntoIterator for &'a MessageGroups {
    type Item = &'a MessageGroup;
    type IntoIter = std::slice::Iter<'a, MessageGroup>;

    fn into_iter(self) -> Self::IntoIter {
        self.groups.iter()
    }
}

/// Calendar entry with placeholders already substituted
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CalendarEvent {
    pub summary: String,
    pub start: String,
    pub end: String,
    pub location: String,
    pub description: String,
}

/// One generated notification per subject group
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationRecord {
    pub subject: String,
    pub notification: String,
}
