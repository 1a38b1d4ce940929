// Mirrors the DDL in `db.rs`; tables are created on first use.

diesel::table! {
    grouped_emails (id) {
        id -> Int4,
        #[max_length = 255]
        subject -> Varchar,
        body -> Text,
    }
}

diesel::table! {
    calendar_events (id) {
        id -> Int4,
        #[max_length = 255]
        summary -> Nullable<Varchar>,
        start -> Nullable<Text>,
        end -> Nullable<Text>,
        #[max_length = 255]
        location -> Nullable<Varchar>,
        description -> Nullable<Text>,
    }
}

diesel::allow_tables_to_appear_in_same_query!(calendar_events, grouped_emails,);
