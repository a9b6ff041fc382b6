use chrono::Duration;
use quiz_core::time::fixed_now;
use storage::repository::{SettingsRecord, SettingsRepository, Storage};
use storage::sqlite::SqliteRepository;

#[tokio::test]
async fn sqlite_starts_without_settings() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_settings_empty?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("migrate");

    assert!(repo.get_settings().await.unwrap().is_none());
}

#[tokio::test]
async fn sqlite_roundtrips_and_overwrites_source_location() {
    let repo =
        SqliteRepository::connect("sqlite:file:memdb_settings_roundtrip?mode=memory&cache=shared")
            .await
            .expect("connect");
    repo.migrate().await.expect("migrate");

    let first = SettingsRecord {
        source_location: Some("https://example.com/first.json".into()),
        updated_at: fixed_now(),
    };
    repo.save_settings(&first).await.unwrap();
    assert_eq!(repo.get_settings().await.unwrap(), Some(first));

    let second = SettingsRecord {
        source_location: Some("not even a url".into()),
        updated_at: fixed_now() + Duration::minutes(5),
    };
    repo.save_settings(&second).await.unwrap();
    assert_eq!(repo.get_settings().await.unwrap(), Some(second));
}

#[tokio::test]
async fn migrations_are_idempotent() {
    let url = "sqlite:file:memdb_settings_migrate?mode=memory&cache=shared";
    let repo = SqliteRepository::connect(url).await.expect("connect");
    repo.migrate().await.expect("first migrate");
    repo.migrate().await.expect("second migrate");

    let storage = Storage::sqlite(url).await.expect("storage");
    assert!(storage.settings.get_settings().await.unwrap().is_none());
}
