diesel::table! {
    testaments (id) {
        id -> Integer,
        name -> Text,
    }
}

diesel::table! {
    books (id) {
        id -> Integer,
        position -> Integer,
        name -> Text,
        abbrev -> Text,
        testament_id -> Integer,
    }
}

diesel::table! {
    versions (id) {
        id -> Integer,
        name -> Text,
        abbrev -> Text,
        active -> Bool,
        created_at -> Timestamp,
    }
}

diesel::table! {
    verses (id) {
        id -> Integer,
        chapter -> Integer,
        number -> Integer,
        text -> Text,
        book_id -> Integer,
        version_id -> Integer,
    }
}

diesel::table! {
    chapter_verse_counts (id) {
        id -> Integer,
        chapter -> Integer,
        verse_count -> Integer,
        book_id -> Integer,
    }
}

diesel::table! {
    reading_lists (id) {
        id -> Integer,
        title -> Text,
        content -> Text,
    }
}

diesel::joinable!(books -> testaments (testament_id));
diesel::joinable!(verses -> books (book_id));
diesel::joinable!(verses -> versions (version_id));
diesel::joinable!(chapter_verse_counts -> books (book_id));

diesel::allow_tables_to_appear_in_same_query!(
    testaments,
    books,
    versions,
    verses,
    chapter_verse_counts,
    reading_lists,
);
