use docindex::common::IndexDirection;
use docindex::errors::ErrorKind;
use docindex::index::{CanonicalKey, IndexModel, LocalIndexBuilder};
use docindex::reconcile::{IndexStatus, Reconciler};
use docindex::store::{CollectionAdmin, CollectionHandle};
use docindex_int_test::test_util::{cleanup, create_test_context, run_test, seed_index, AdminCall};

fn handle(ctx: &docindex_int_test::test_util::TestContext, name: &str) -> CollectionHandle {
    CollectionHandle::new(name, CollectionAdmin::new(ctx.failing().clone()))
}

#[test]
fn test_compound_order_follows_groupseq() {
    let models = LocalIndexBuilder::new()
        .add_raw("a", "group=g,groupseq=2")
        .unwrap()
        .add_raw("b", "group=g,groupseq=1")
        .unwrap()
        .build();

    assert_eq!(models.len(), 1);
    assert_eq!(models[0].field_names(), vec!["b", "a"]);
    assert!(!models[0].is_unique());
}

#[test]
fn test_unique_prefix_makes_group_unique() {
    let models = LocalIndexBuilder::new()
        .add_raw("x", "group=uniqueX,groupseq=1")
        .unwrap()
        .build();

    assert_eq!(models.len(), 1);
    assert!(models[0].is_compound());
    assert!(models[0].is_unique());
}

#[test]
fn test_canonical_key_is_order_insensitive() {
    assert_eq!(CanonicalKey::encode(["a", "b"]), CanonicalKey::encode(["b", "a"]));
}

#[test]
fn test_creates_single_missing_index() {
    run_test(
        create_test_context,
        |ctx| {
            ctx.store().create_collection("user");
            let local = vec![IndexModel::single("a", IndexDirection::Ascending, true)];

            let outcome = Reconciler::new(true).reconcile(&handle(&ctx, "user"), &local)?;
            assert!(!outcome.created());
            assert_eq!(
                ctx.failing().mutations(),
                vec![AdminCall::Create("user".into(), vec!["a_1".into()])]
            );
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_undeclared_index_blocks_without_auto_update() {
    run_test(
        create_test_context,
        |ctx| {
            seed_index(ctx.store(), "user", "a_1_b_1", &["a", "b"], false);

            let err = Reconciler::new(false)
                .reconcile(&handle(&ctx, "user"), &[])
                .err()
                .unwrap();
            assert_eq!(err.kind(), &ErrorKind::PendingDrop);
            assert!(err.is_fatal());
            assert!(err.message().contains("a_b_"));
            assert!(ctx.failing().mutations().is_empty());
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_unique_mismatch_with_auto_update() {
    run_test(
        create_test_context,
        |ctx| {
            seed_index(ctx.store(), "user", "a_1", &["a"], false);
            let local = vec![IndexModel::single("a", IndexDirection::Ascending, true)];

            let err = Reconciler::new(true)
                .reconcile(&handle(&ctx, "user"), &local)
                .err()
                .unwrap();
            assert_eq!(err.kind(), &ErrorKind::UniqueMismatch);
            assert!(ctx.failing().mutations().is_empty());
            assert_eq!(ctx.store().index_names("user"), vec!["_id_", "a_1"]);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_missing_collection_with_auto_update() {
    run_test(
        create_test_context,
        |ctx| {
            let local = LocalIndexBuilder::new()
                .add_raw("email", "unique")?
                .add_raw("created", "single=-1")?
                .add_raw("last", "group=name,groupseq=1")?
                .add_raw("first", "group=name,groupseq=2")?
                .build();

            let outcome = Reconciler::new(true).reconcile(&handle(&ctx, "user"), &local)?;
            assert!(outcome.created());
            assert_eq!(
                ctx.store().index_names("user"),
                vec!["_id_", "email_1", "created_-1", "last_1_first_1"]
            );
            // one batch call for a new collection
            assert_eq!(ctx.failing().mutations().len(), 1);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_missing_collection_without_auto_update() {
    run_test(
        create_test_context,
        |ctx| {
            let local = vec![IndexModel::single("a", IndexDirection::Ascending, false)];
            let err = Reconciler::new(false)
                .reconcile(&handle(&ctx, "audit"), &local)
                .err()
                .unwrap();
            assert_eq!(err.kind(), &ErrorKind::PendingCreation);
            assert_eq!(err.message(), "remote collection `audit`, to be created");
            assert_eq!(ctx.failing().calls(), vec![AdminCall::Exists("audit".into())]);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_direction_and_order_do_not_affect_consistency() {
    run_test(
        create_test_context,
        |ctx| {
            ctx.store().insert_catalog_entry(
                "user",
                docindex::store::IndexCatalogEntry::new(
                    "first_-1_last_1",
                    vec![("first".into(), -1), ("last".into(), 1)],
                    None,
                ),
            );
            let local = LocalIndexBuilder::new()
                .add_raw("last", "group=name,groupseq=1")?
                .add_raw("first", "group=name,groupseq=2")?
                .build();

            let outcome = Reconciler::new(false).reconcile(&handle(&ctx, "user"), &local)?;
            assert!(outcome.plan().is_consistent());
            assert_eq!(outcome.entries()[0].status(), IndexStatus::Consistent);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_converges_in_one_run() {
    run_test(
        create_test_context,
        |ctx| {
            seed_index(ctx.store(), "user", "legacy_1", &["legacy"], false);
            seed_index(ctx.store(), "user", "email_1", &["email"], true);
            let local = LocalIndexBuilder::new()
                .add_raw("email", "unique")?
                .add_raw("age", "single=1")?
                .build();
            let collection = handle(&ctx, "user");

            let first = Reconciler::new(true).reconcile(&collection, &local)?;
            assert!(first.is_clean());
            assert_eq!(
                ctx.failing().mutations(),
                vec![
                    AdminCall::Drop("user".into(), "legacy_1".into()),
                    AdminCall::Create("user".into(), vec!["age_1".into()]),
                ]
            );

            let second = Reconciler::new(false).reconcile(&collection, &local)?;
            assert!(second.plan().is_consistent());
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_store_failure_on_listing_aborts() {
    run_test(
        create_test_context,
        |ctx| {
            ctx.store().create_collection("user");
            ctx.failing().fail_list();

            let err = Reconciler::new(true)
                .reconcile(&handle(&ctx, "user"), &[])
                .err()
                .unwrap();
            assert_eq!(err.kind(), &ErrorKind::StoreIOError);
            assert!(ctx.failing().mutations().is_empty());
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_store_failure_on_existence_check_aborts() {
    run_test(
        create_test_context,
        |ctx| {
            ctx.failing().fail_exists();
            let err = Reconciler::new(true)
                .reconcile(&handle(&ctx, "user"), &[])
                .err()
                .unwrap();
            assert_eq!(err.kind(), &ErrorKind::StoreIOError);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_undecodable_catalog_entry() {
    run_test(
        create_test_context,
        |ctx| {
            ctx.store().insert_catalog_entry(
                "user",
                docindex::store::IndexCatalogEntry::new("geo_2d", vec![("geo".into(), 2)], None),
            );
            let err = Reconciler::new(true)
                .reconcile(&handle(&ctx, "user"), &[])
                .err()
                .unwrap();
            assert_eq!(err.kind(), &ErrorKind::EncodingError);
            assert!(ctx.failing().mutations().is_empty());
            Ok(())
        },
        cleanup,
    )
}
