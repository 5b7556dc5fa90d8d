use docindex::errors::ErrorKind;
use docindex::reconcile::IndexStatus;
use docindex::schema::IndexedRecord;
use docindex_derive::IndexedRecord;
use docindex_int_test::test_util::{cleanup, create_test_context, run_test, seed_index, ObjectId};

#[derive(IndexedRecord)]
#[allow(dead_code)]
struct Customer {
    #[record(name = "_id,omitempty")]
    id: ObjectId,
    #[record(index = "unique")]
    email: String,
    #[record(name = "lastName", index = "group=uniqueName,groupseq=1")]
    last_name: String,
    #[record(name = "firstName", index = "group=uniqueName,groupseq=2")]
    first_name: String,
    #[record(name = "signedUp", index = "single=-1")]
    signed_up: i64,
    note: String,
}

#[derive(IndexedRecord)]
#[record(collection = "customer")]
#[allow(dead_code)]
struct CustomerV2 {
    #[record(name = "_id,omitempty")]
    id: ObjectId,
    #[record(index = "unique")]
    email: String,
    #[record(name = "signedUp", index = "single=-1")]
    signed_up: i64,
    #[record(index = "single=1")]
    country: String,
}

#[derive(IndexedRecord)]
#[record(collection = "customer")]
#[allow(dead_code)]
struct CustomerLooseEmail {
    #[record(name = "_id,omitempty")]
    id: ObjectId,
    #[record(index = "single=1")]
    email: String,
}

#[test]
fn test_first_start_creates_collection() {
    run_test(
        create_test_context,
        |ctx| {
            let sync = ctx.sync(true, true)?;
            assert!(sync.init_model::<Customer>()?);
            assert_eq!(
                ctx.store().index_names("customer"),
                vec!["_id_", "email_1", "signedUp_-1", "lastName_1_firstName_1"]
            );

            // second start finds everything in place
            assert!(!sync.init_model::<Customer>()?);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_auto_check_off_skips_store() {
    run_test(
        create_test_context,
        |ctx| {
            let sync = ctx.sync(false, false)?;
            assert!(!sync.init_model::<Customer>()?);
            assert!(ctx.failing().calls().is_empty());
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_schema_change_without_auto_update_is_reported() {
    run_test(
        create_test_context,
        |ctx| {
            ctx.sync(true, true)?.init_model::<Customer>()?;
            ctx.failing().reset();

            let err = ctx.sync(true, false)?.init_model::<CustomerV2>().err().unwrap();
            assert_eq!(err.kind(), &ErrorKind::PendingDrop);
            assert!(err.message().contains("firstName_lastName_"));
            assert!(err.message().contains("country_"));
            assert!(ctx.failing().mutations().is_empty());
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_schema_change_with_auto_update_converges() {
    run_test(
        create_test_context,
        |ctx| {
            ctx.sync(true, true)?.init_model::<Customer>()?;

            let sync = ctx.sync(true, true)?;
            assert!(!sync.init_model::<CustomerV2>()?);
            assert_eq!(
                ctx.store().index_names("customer"),
                vec!["_id_", "email_1", "signedUp_-1", "country_1"]
            );

            let plan = sync.plan(&CustomerV2::schema()?)?;
            assert!(plan.is_consistent());
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_uniqueness_change_is_refused() {
    run_test(
        create_test_context,
        |ctx| {
            ctx.sync(true, true)?.init_model::<Customer>()?;
            ctx.failing().reset();

            let err = ctx
                .sync(true, true)?
                .init_model::<CustomerLooseEmail>()
                .err()
                .unwrap();
            assert_eq!(err.kind(), &ErrorKind::UniqueMismatch);
            assert!(err.message().contains("email_"));
            assert!(ctx.failing().mutations().is_empty());
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_plan_reports_every_pair() {
    run_test(
        create_test_context,
        |ctx| {
            seed_index(ctx.store(), "customer", "email_1", &["email"], true);
            seed_index(ctx.store(), "customer", "legacy_1", &["legacy"], false);
            let sync = ctx.sync(false, false)?;

            let plan = sync.plan(&CustomerV2::schema()?)?;
            let statuses: Vec<(String, IndexStatus)> = plan
                .entries()
                .iter()
                .map(|entry| (entry.key().to_string(), entry.status()))
                .collect();
            assert_eq!(
                statuses,
                vec![
                    ("email_".to_string(), IndexStatus::Consistent),
                    ("legacy_".to_string(), IndexStatus::ToDrop),
                    ("signedUp_".to_string(), IndexStatus::ToCreate),
                    ("country_".to_string(), IndexStatus::ToCreate),
                ]
            );
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_ensure_indexes_runs_with_auto_check_off() {
    run_test(
        create_test_context,
        |ctx| {
            let sync = ctx.sync(false, true)?;
            let outcome = sync.ensure_indexes(&Customer::schema()?)?;
            assert!(outcome.created());
            assert_eq!(outcome.collection(), "customer");
            assert_eq!(ctx.store().index_names("customer").len(), 4);
            Ok(())
        },
        cleanup,
    )
}
