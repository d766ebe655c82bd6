use game_stash_catalog::{CatalogRecord, Game};
use game_stash_db::{catalog, LocalDb, StoreError};
use tempfile::{tempdir, TempDir};

fn init_logs() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn game(id: i64, name: &str) -> CatalogRecord {
    CatalogRecord::Game(Game {
        id,
        name: name.to_string(),
        slug: name.to_lowercase().replace(' ', "-"),
        released: None,
        rating: None,
        background_image: None,
        metacritic: None,
        playtime: None,
    })
}

async fn created_db() -> (TempDir, LocalDb) {
    let dir = tempdir().unwrap();
    let db = LocalDb::with_root(dir.path(), "gamestash", 1);
    db.create(&catalog()).await.unwrap();
    (dir, db)
}

#[tokio::test]
async fn bulk_requires_creation() {
    init_logs();
    let dir = tempdir().unwrap();
    let db = LocalDb::with_root(dir.path(), "gamestash", 1);

    let err = db.add_bulk("games", vec![game(1, "A")]).await.unwrap_err();
    assert!(matches!(err, StoreError::NotInitialized));
    assert!(!db.db_path().exists());
}

#[tokio::test]
async fn bulk_rejects_empty_batches() {
    init_logs();
    let (_dir, db) = created_db().await;

    let err = db.add_bulk("games", Vec::new()).await.unwrap_err();
    assert!(matches!(err, StoreError::InvalidArgument(_)));
}

#[tokio::test]
async fn bulk_adds_missing_and_keeps_existing() {
    init_logs();
    let (_dir, db) = created_db().await;

    // Key 2 is already cached with a different value than the batch carries.
    db.add("games", &game(2, "Cached Name")).await.unwrap();

    let batch = vec![game(1, "A"), game(2, "Refetched Name"), game(3, "C")];
    let present = db.add_bulk("games", batch).await.unwrap();

    // Every record ended up present-or-added, pre-existing ones included.
    assert_eq!(present.len(), 3);
    assert!(present.contains(&game(1, "A")));
    assert!(present.contains(&game(2, "Refetched Name")));
    assert!(present.contains(&game(3, "C")));

    // The pre-existing value was not overwritten.
    assert_eq!(
        db.get_by_id("games", 2).await.unwrap(),
        Some(game(2, "Cached Name"))
    );
    assert_eq!(db.get_all("games").await.unwrap().len(), 3);
}

#[tokio::test]
async fn bulk_resolves_once_when_every_chain_fails() {
    init_logs();
    let (_dir, db) = created_db().await;

    // Pull the table out from under the store; the creation flag and the
    // on-disk version stay intact, so every chain hits a live engine error.
    let conn = rusqlite::Connection::open(db.db_path()).unwrap();
    conn.execute_batch("DROP TABLE games;").unwrap();
    drop(conn);

    let batch = vec![game(1, "A"), game(2, "B"), game(3, "C")];
    let present = db.add_bulk("games", batch).await.unwrap();

    // Sub-operation failures are absorbed: the batch resolves, with every
    // failed record excluded from the result.
    assert!(present.is_empty());
}

#[tokio::test]
async fn bulk_completes_batches_larger_than_the_fanout_bound() {
    init_logs();
    let (_dir, db) = created_db().await;

    let batch: Vec<CatalogRecord> = (1..=25).map(|id| game(id, &format!("G{id}"))).collect();
    let present = db.add_bulk("games", batch).await.unwrap();
    assert_eq!(present.len(), 25);

    // Result order is completion order; key order only holds in the store.
    let mut ids: Vec<i64> = present.iter().map(CatalogRecord::key).collect();
    ids.sort_unstable();
    assert_eq!(ids, (1..=25).collect::<Vec<i64>>());
    assert_eq!(db.get_all("games").await.unwrap().len(), 25);
}

#[tokio::test]
async fn bulk_duplicate_keys_settle_on_one_row() {
    init_logs();
    let (_dir, db) = created_db().await;

    // Two chains race for the same key: one adds, the other either sees it
    // (present) or collides (absorbed failure). Either way the store holds
    // exactly one row and the batch resolves.
    let present = db
        .add_bulk("games", vec![game(7, "First"), game(7, "Second")])
        .await
        .unwrap();
    assert!(!present.is_empty() && present.len() <= 2);

    let all = db.get_all("games").await.unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].key(), 7);
}

#[tokio::test]
async fn bulk_mixed_batch_accounts_for_every_record() {
    init_logs();
    let (_dir, db) = created_db().await;

    db.add("games", &game(10, "Old Ten")).await.unwrap();
    db.add("games", &game(20, "Old Twenty")).await.unwrap();

    let batch: Vec<CatalogRecord> = vec![
        game(10, "Ten"),
        game(11, "Eleven"),
        game(12, "Twelve"),
        game(20, "Twenty"),
        game(21, "Twenty-one"),
        game(22, "Twenty-two"),
    ];
    let present = db.add_bulk("games", batch).await.unwrap();

    assert_eq!(present.len(), 6);
    assert_eq!(db.get_all("games").await.unwrap().len(), 6);

    // Pre-existing values kept, fresh ones added.
    assert_eq!(
        db.get_by_id("games", 10).await.unwrap(),
        Some(game(10, "Old Ten"))
    );
    assert_eq!(
        db.get_by_id("games", 11).await.unwrap(),
        Some(game(11, "Eleven"))
    );
}
