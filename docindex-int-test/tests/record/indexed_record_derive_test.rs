#[cfg(test)]
#[allow(dead_code)]
mod tests {
    use docindex::errors::ErrorKind;
    use docindex::index::{CanonicalIndex, LocalIndexBuilder};
    use docindex::schema::{IdKind, IndexedRecord};
    use docindex_derive::IndexedRecord;
    use docindex_int_test::test_util::ObjectId;

    #[test]
    fn test_default_collection_name() {
        #[derive(IndexedRecord)]
        pub struct UserProfile {
            #[record(name = "_id,omitempty")]
            id: ObjectId,
            nickname: String,
        }

        let schema = UserProfile::schema().unwrap();
        assert_eq!(schema.collection(), "userProfile");
        assert_eq!(schema.id_kind(), IdKind::ObjectId);
        assert_eq!(schema.id_field().storage_name(), "_id");
        assert_eq!(schema.fields()[1].storage_name(), "nickname");
        assert_eq!(schema.indexed_fields().count(), 0);
    }

    #[test]
    fn test_custom_collection_and_field_names() {
        #[derive(IndexedRecord)]
        #[record(collection = "people")]
        pub struct Person {
            #[record(name = "_id")]
            id: String,
            #[record(name = "emailAddress,omitempty", index = "unique")]
            email: String,
            #[record(name = "lastName", index = "group=uniqueName,groupseq=1")]
            last_name: String,
            #[record(name = "firstName", index = "group=uniqueName,groupseq=2")]
            first_name: String,
            #[record(index = "single=-1")]
            created: i64,
        }

        let schema = Person::schema().unwrap();
        assert_eq!(schema.collection(), "people");
        assert_eq!(schema.id_kind(), IdKind::String);

        let indexed: Vec<(&str, Option<&str>)> = schema
            .indexed_fields()
            .map(|field| (field.storage_name(), field.directive()))
            .collect();
        assert_eq!(
            indexed,
            vec![
                ("emailAddress", Some("unique")),
                ("lastName", Some("group=uniqueName,groupseq=1")),
                ("firstName", Some("group=uniqueName,groupseq=2")),
                ("created", Some("single=-1")),
            ]
        );

        let models = LocalIndexBuilder::from_schema(&schema).unwrap().build();
        let keys: Vec<String> = models.iter().map(|m| m.canonical_key().to_string()).collect();
        assert_eq!(keys, vec!["emailAddress_", "created_", "firstName_lastName_"]);
        assert_eq!(models[2].default_name(), "lastName_1_firstName_1");
        assert!(models[2].is_unique());
    }

    #[test]
    fn test_qualified_object_id_path() {
        #[derive(IndexedRecord)]
        pub struct Event {
            #[record(name = "_id")]
            id: docindex_int_test::test_util::ObjectId,
        }

        assert_eq!(Event::schema().unwrap().id_kind(), IdKind::ObjectId);
    }

    #[test]
    fn test_raw_identifier_field() {
        #[derive(IndexedRecord)]
        pub struct Token {
            #[record(name = "_id")]
            id: String,
            #[record(index = "single=1")]
            r#type: String,
        }

        let schema = Token::schema().unwrap();
        assert_eq!(schema.fields()[1].storage_name(), "type");
    }

    #[test]
    fn test_identifier_not_stored_as_id() {
        #[derive(IndexedRecord)]
        pub struct Order {
            id: String,
            total: i64,
        }

        let err = Order::schema().unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::SchemaConventionError);
        assert!(err.message().contains("order"));
    }

    #[test]
    fn test_duplicate_storage_names() {
        #[derive(IndexedRecord)]
        pub struct Invoice {
            #[record(name = "_id")]
            id: String,
            #[record(name = "number")]
            number: i64,
            #[record(name = "number,omitempty", index = "unique")]
            legacy_number: i64,
        }

        let err = Invoice::schema().unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::SchemaConventionError);
    }

    #[test]
    fn test_invalid_directive_surfaces_on_build() {
        #[derive(IndexedRecord)]
        pub struct Comment {
            #[record(name = "_id")]
            id: String,
            #[record(index = "sparse")]
            body: String,
        }

        let schema = Comment::schema().unwrap();
        let err = LocalIndexBuilder::from_schema(&schema).unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::DirectiveParseError);
        assert_eq!(err.message(), "field 'body', unsupported key:sparse");
    }
}
