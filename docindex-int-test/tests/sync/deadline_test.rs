use docindex::errors::ErrorKind;
use docindex::schema::IndexedRecord;
use docindex_derive::IndexedRecord;
use docindex_int_test::test_util::{cleanup, create_test_context, run_test, seed_index, AdminCall};
use std::time::Duration;

#[derive(IndexedRecord)]
#[allow(dead_code)]
struct Session {
    #[record(name = "_id")]
    id: String,
    #[record(index = "unique")]
    token: String,
}

#[test]
fn test_deadline_stops_run_before_next_call() {
    run_test(
        create_test_context,
        |ctx| {
            seed_index(ctx.store(), "session", "legacy_1", &["legacy"], false);
            ctx.failing().delay(Duration::from_millis(60));
            let sync = ctx.sync_with_timeout(true, Duration::from_millis(20))?;

            let err = sync.init_model::<Session>().err().unwrap();
            assert_eq!(err.kind(), &ErrorKind::Timeout);
            assert_eq!(ctx.failing().calls(), vec![AdminCall::Exists("session".into())]);
            assert_eq!(ctx.store().index_names("session"), vec!["_id_", "legacy_1"]);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_run_within_deadline_completes() {
    run_test(
        create_test_context,
        |ctx| {
            let sync = ctx.sync_with_timeout(true, Duration::from_secs(30))?;
            assert!(sync.init_model::<Session>()?);
            assert_eq!(ctx.store().index_names("session"), vec!["_id_", "token_1"]);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_each_run_gets_a_fresh_deadline() {
    run_test(
        create_test_context,
        |ctx| {
            let sync = ctx.sync_with_timeout(true, Duration::from_millis(200))?;
            assert!(sync.init_model::<Session>()?);
            std::thread::sleep(Duration::from_millis(250));
            let outcome = sync.ensure_indexes(&Session::schema()?)?;
            assert!(outcome.plan().is_consistent());
            Ok(())
        },
        cleanup,
    )
}
