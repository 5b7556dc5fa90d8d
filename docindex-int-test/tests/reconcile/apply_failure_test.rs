use docindex::common::IndexDirection;
use docindex::errors::ErrorKind;
use docindex::index::IndexModel;
use docindex::reconcile::Reconciler;
use docindex::store::{CollectionAdmin, CollectionHandle};
use docindex_int_test::test_util::{cleanup, create_test_context, run_test, seed_index, AdminCall};

#[test]
fn test_failed_create_does_not_stop_run() {
    run_test(
        create_test_context,
        |ctx| {
            ctx.store().create_collection("user");
            ctx.failing().fail_create("a_1");
            let local = vec![
                IndexModel::single("a", IndexDirection::Ascending, false),
                IndexModel::single("b", IndexDirection::Ascending, false),
            ];
            let collection = CollectionHandle::new("user", CollectionAdmin::new(ctx.failing().clone()));

            let outcome = Reconciler::new(true).reconcile(&collection, &local)?;
            assert!(!outcome.is_clean());
            assert_eq!(outcome.failures().len(), 1);

            let failure = &outcome.failures()[0];
            assert_eq!(failure.kind(), &ErrorKind::ApplyError);
            assert!(!failure.is_fatal());
            assert_eq!(failure.cause().map(|c| c.kind()), Some(&ErrorKind::StoreIOError));
            assert!(failure.message().contains("a_1"));

            assert_eq!(ctx.store().index_names("user"), vec!["_id_", "b_1"]);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_failed_drop_does_not_stop_run() {
    run_test(
        create_test_context,
        |ctx| {
            seed_index(ctx.store(), "user", "old_1", &["old"], false);
            seed_index(ctx.store(), "user", "stale_1", &["stale"], false);
            ctx.failing().fail_drop("old_1");
            let local = vec![IndexModel::single("fresh", IndexDirection::Ascending, true)];
            let collection = CollectionHandle::new("user", CollectionAdmin::new(ctx.failing().clone()));

            let outcome = Reconciler::new(true).reconcile(&collection, &local)?;
            assert_eq!(outcome.failures().len(), 1);
            assert_eq!(
                ctx.failing().mutations(),
                vec![
                    AdminCall::Drop("user".into(), "old_1".into()),
                    AdminCall::Drop("user".into(), "stale_1".into()),
                    AdminCall::Create("user".into(), vec!["fresh_1".into()]),
                ]
            );
            assert_eq!(ctx.store().index_names("user"), vec!["_id_", "old_1", "fresh_1"]);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_failed_batch_create_on_new_collection_propagates() {
    run_test(
        create_test_context,
        |ctx| {
            ctx.failing().fail_create("b_1");
            let local = vec![
                IndexModel::single("a", IndexDirection::Ascending, false),
                IndexModel::single("b", IndexDirection::Ascending, false),
            ];
            let collection = CollectionHandle::new("user", CollectionAdmin::new(ctx.failing().clone()));

            let err = Reconciler::new(true).reconcile(&collection, &local).err().unwrap();
            assert_eq!(err.kind(), &ErrorKind::StoreIOError);
            assert!(!ctx.store().has_collection("user"));
            Ok(())
        },
        cleanup,
    )
}
