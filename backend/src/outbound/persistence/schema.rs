//! Diesel table definitions.
//!
//! The database also carries a unique index on `(owner_id, name)` for
//! projects and an `ON DELETE CASCADE` foreign key from tasks to projects.

diesel::table! {
    projects (id) {
        id -> Uuid,
        #[max_length = 100]
        name -> Varchar,
        description -> Nullable<Text>,
        owner_id -> Text,
    }
}

diesel::table! {
    tasks (id) {
        id -> Uuid,
        #[max_length = 100]
        title -> Varchar,
        description -> Nullable<Text>,
        status -> Text,
        project_id -> Uuid,
    }
}

diesel::table! {
    outbox_events (id) {
        id -> Int8,
        topic -> Text,
        payload -> Text,
        delivered -> Bool,
        created_at -> Timestamptz,
    }
}

diesel::joinable!(tasks -> projects (project_id));
diesel::allow_tables_to_appear_in_same_query!(projects, tasks);
