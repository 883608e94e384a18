diesel::table! {
    foods (id) {
        id -> Integer,
    }
}

diesel::table! {
    food_names (id) {
        id -> Integer,
        food_id -> Integer,
        language -> Text,
        name -> Text,
        is_primary -> Bool,
    }
}

diesel::table! {
    histamine_infos (food_id) {
        food_id -> Integer,
        compatibility_score -> Text,
        rapid_histamine_formation -> Text,
        other_amines -> Text,
        liberator -> Text,
        blocker -> Text,
        notes -> Text,
        information_source_id -> Nullable<Integer>,
    }
}

diesel::table! {
    information_sources (id) {
        id -> Integer,
        name -> Text,
    }
}

diesel::table! {
    food_types (id) {
        id -> Integer,
        name -> Text,
    }
}

diesel::table! {
    food_type_relations (id) {
        id -> Integer,
        food_id -> Integer,
        food_type_id -> Integer,
    }
}

diesel::joinable!(food_names -> foods (food_id));
diesel::joinable!(histamine_infos -> foods (food_id));
diesel::joinable!(histamine_infos -> information_sources (information_source_id));
diesel::joinable!(food_type_relations -> foods (food_id));
diesel::joinable!(food_type_relations -> food_types (food_type_id));

diesel::allow_tables_to_appear_in_same_query!(
    foods,
    food_names,
    histamine_infos,
    information_sources,
    food_types,
    food_type_relations,
);
