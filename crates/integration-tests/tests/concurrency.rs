//! Version-fence behavior under contention.
//!
//! Every cart write carries the version read at the start of the operation;
//! when several writers share the same snapshot, exactly one lands and the
//! rest fail with a conflict.

use tokio::task::JoinSet;

use buy_recipes_core::CartId;
use buy_recipes_integration_tests::test_pool;
use buy_recipes_server::db::{self, RepositoryError};
use buy_recipes_server::services::CartService;

#[tokio::test]
async fn stale_version_is_rejected() {
    let pool = test_pool().await;
    let service = CartService::new(&pool);
    let cart = service.create(0).await.unwrap();

    let mut conn = pool.acquire().await.unwrap();
    let first = db::carts::update_total(&mut conn, cart.id, 100, 0)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(first.version, 1);

    // Same snapshot again: the row moved on, so the write must not land
    let second = db::carts::update_total(&mut conn, cart.id, 200, 0).await;
    assert!(matches!(second, Err(RepositoryError::Conflict(_))));

    let persisted = db::carts::find_by_id(&mut conn, cart.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(persisted.total_in_cents, 100);
    assert_eq!(persisted.version, 1);
}

#[tokio::test]
async fn missing_cart_is_absence_not_conflict() {
    let pool = test_pool().await;
    let mut conn = pool.acquire().await.unwrap();

    let result = db::carts::update_total(&mut conn, CartId::new(9999), 1, 0)
        .await
        .unwrap();
    assert!(result.is_none());
}

#[tokio::test(flavor = "multi_thread")]
async fn concurrent_writers_sharing_a_snapshot_race_to_one_winner() {
    const WRITERS: i64 = 8;

    let pool = test_pool().await;
    let service = CartService::new(&pool);
    let cart = service.create(0).await.unwrap();

    // All writers read the same version before any of them writes
    let base_version = {
        let mut conn = pool.acquire().await.unwrap();
        db::carts::find_by_id(&mut conn, cart.id)
            .await
            .unwrap()
            .unwrap()
            .version
    };

    let mut tasks = JoinSet::new();
    for n in 1..=WRITERS {
        let pool = pool.clone();
        let cart_id = cart.id;
        tasks.spawn(async move {
            let mut conn = pool.acquire().await?;
            db::carts::update_total(&mut conn, cart_id, n * 100, base_version).await
        });
    }

    let mut wins = 0;
    let mut conflicts = 0;
    while let Some(result) = tasks.join_next().await {
        match result.unwrap() {
            Ok(Some(_)) => wins += 1,
            Err(RepositoryError::Conflict(_)) => conflicts += 1,
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    assert_eq!(wins, 1);
    assert_eq!(conflicts, WRITERS - 1);

    // Exactly one version bump survived the race
    let mut conn = pool.acquire().await.unwrap();
    let persisted = db::carts::find_by_id(&mut conn, cart.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(persisted.version, base_version + 1);
}

#[tokio::test]
async fn losing_mutation_leaves_no_partial_items() {
    let pool = test_pool().await;
    let service = CartService::new(&pool);

    let mut conn = pool.acquire().await.unwrap();
    let flour = db::products::insert(&mut conn, "Flour", 299).await.unwrap();
    drop(conn);

    let cart = service.create(0).await.unwrap();

    // Move the cart forward so a snapshot taken at version 0 is stale
    let mut conn = pool.acquire().await.unwrap();
    db::carts::update_total(&mut conn, cart.id, 0, 0)
        .await
        .unwrap()
        .unwrap();
    drop(conn);

    // Replay an add against the stale snapshot: insert the item, then hit
    // the fence. The transaction must roll back the item insert.
    let mut tx = pool.begin().await.unwrap();
    db::carts::insert_item(&mut tx, cart.id, flour.id).await.unwrap();
    let fenced = db::carts::update_total(&mut tx, cart.id, 299, 0).await;
    assert!(matches!(fenced, Err(RepositoryError::Conflict(_))));
    drop(tx);

    let mut conn = pool.acquire().await.unwrap();
    let items = db::carts::find_items(&mut conn, cart.id).await.unwrap();
    assert!(items.is_empty());
}
