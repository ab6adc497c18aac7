use super::query::Query;

/// Marker field listing the ids of every field indexed on a document.
pub const VISIBLE_FIELD_IDS: &str = "visiblefieldids";

/// Marker field listing the ids of every field holding a non-empty value.
pub const NON_EMPTY_FIELD_IDS: &str = "nonemptyfieldids";

/// Field carrying the document id, used when matching against external
/// document sets such as change history.
pub const DOCUMENT_ID_FIELD: &str = "docid";

/// `visiblefieldids:<field>`: the field exists on the document at all.
pub fn visibility_query(field: &str) -> Query {
    Query::term(VISIBLE_FIELD_IDS, field)
}

/// `nonemptyfieldids:<field>`: the field exists and has a value.
pub fn non_empty_query(field: &str) -> Query {
    Query::term(NON_EMPTY_FIELD_IDS, field)
}
