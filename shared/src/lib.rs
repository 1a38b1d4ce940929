pub mod api;
pub mod models;

pub use models::{
    CalendarEvent, Message, MessageGroup, MessageGroups, NotificationRecord, NO_DESCRIPTION,
    NO_LOCATION, NO_SUBJECT, NO_TITLE,
};
