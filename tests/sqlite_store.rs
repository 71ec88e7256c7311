//! Repository behaviour over the SeaORM store, on an in-memory SQLite database.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use sea_orm::{ConnectionTrait, DatabaseConnection, DbBackend, Statement};
use sea_orm_migration::MigratorTrait;

use student_records::config::PoolConfig;
use student_records::domain::{
    DomainError, NewStudent, StudentFilter, StudentPatch, StudentStatus, StudentStore,
};
use student_records::infrastructure::database::migrator::Migrator;
use student_records::shared::types::pagination::PaginationPolicy;
use student_records::{init_database, DatabaseConfig, SeaOrmStudentStore, StudentQueryRepository};

async fn connect_unmigrated() -> DatabaseConnection {
    // One connection: every pooled connection to `sqlite::memory:` would
    // otherwise get its own empty database.
    let config = DatabaseConfig {
        url: "sqlite::memory:".to_string(),
        pool: PoolConfig {
            max_connections: 1,
            min_connections: 1,
            ..PoolConfig::default()
        },
    };
    init_database(&config).await.unwrap()
}

async fn connect() -> DatabaseConnection {
    let db = connect_unmigrated().await;
    Migrator::up(&db, None).await.unwrap();
    db
}

async fn setup(cache_ttl: Option<Duration>) -> (Arc<SeaOrmStudentStore>, StudentQueryRepository) {
    let mut store = SeaOrmStudentStore::new(connect().await);
    if let Some(ttl) = cache_ttl {
        store = store.with_cache(ttl);
    }
    let store = Arc::new(store);
    let repo = StudentQueryRepository::new(store.clone(), PaginationPolicy::default());
    (store, repo)
}

fn new_student(rga: &str, name: &str) -> NewStudent {
    NewStudent {
        name: name.to_string(),
        rga: rga.to_string(),
        course: "Engenharia".to_string(),
        status: Some(StudentStatus::Active),
    }
}

#[tokio::test]
async fn add_then_read_back() {
    let (_, repo) = setup(None).await;
    let created = repo.add(new_student("2020.0001.001-1", "Ana Souza")).await.unwrap();

    let fetched = repo.get_by_id(&created.id).await.unwrap();
    assert_eq!(fetched, created);
    assert_eq!(fetched.status, Some(StudentStatus::Active));
    assert_eq!(repo.get_all().await.unwrap().len(), 1);
}

#[tokio::test]
async fn duplicate_rga_is_a_conflict() {
    let (_, repo) = setup(None).await;
    repo.add(new_student("2020.0001.001-1", "Ana")).await.unwrap();

    let err = repo
        .add(new_student("2020.0001.001-1", "Outra"))
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Conflict(_)));
}

#[tokio::test]
async fn unique_index_backs_the_conflict_check() {
    let (store, _) = setup(None).await;
    store.insert(new_student("2020.0001.001-1", "Ana")).await.unwrap();

    // Straight to the store, skipping the repository's pre-check.
    let err = store
        .insert(new_student("2020.0001.001-1", "Bia"))
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Conflict(_)), "{err:?}");
}

#[tokio::test]
async fn name_search_is_case_insensitive_and_literal() {
    let (_, repo) = setup(None).await;
    repo.add(new_student("2020.0001.001-1", "Mariana Lima")).await.unwrap();
    repo.add(new_student("2020.0001.002-1", "ANA Paula")).await.unwrap();
    repo.add(new_student("2020.0001.003-1", "Bruno 100%")).await.unwrap();
    repo.add(new_student("2020.0001.004-1", "Carla_Dias")).await.unwrap();
    repo.add(new_student("2020.0001.005-1", "JOSÉ ÁVILA")).await.unwrap();

    let names: HashSet<String> = repo
        .get_by_name("ana")
        .await
        .unwrap()
        .into_iter()
        .map(|s| s.name)
        .collect();
    assert_eq!(
        names,
        HashSet::from(["Mariana Lima".to_string(), "ANA Paula".to_string()])
    );

    // non-ASCII letters fold too
    let accented = repo.get_by_name("josé ávila").await.unwrap();
    assert_eq!(accented.len(), 1);
    assert_eq!(accented[0].name, "JOSÉ ÁVILA");
    assert_eq!(repo.get_by_name("Ávi").await.unwrap().len(), 1);

    assert_eq!(repo.get_by_name("%").await.unwrap().len(), 1);
    assert_eq!(repo.get_by_name("_").await.unwrap().len(), 1);

    let page = repo.get_by_name_paged("ana", None, Some(1)).await.unwrap();
    assert_eq!(page.total_item_count, 2);
    assert_eq!(page.page_count, 2);
    assert!(page.has_next_page);
}

#[tokio::test]
async fn renamed_students_are_found_by_their_new_name() {
    let (_, repo) = setup(None).await;
    let a = repo.add(new_student("2020.0001.001-1", "Ana")).await.unwrap();
    repo.update(
        &a.id,
        StudentPatch {
            name: Some("ÉRICA".into()),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    assert_eq!(repo.get_by_name("érica").await.unwrap().len(), 1);
    assert!(repo.get_by_name("ana").await.unwrap().is_empty());
}

#[tokio::test]
async fn migration_backfills_search_key_for_existing_rows() {
    let db = connect_unmigrated().await;
    Migrator::up(&db, Some(1)).await.unwrap();
    db.execute(Statement::from_string(
        DbBackend::Sqlite,
        "INSERT INTO students (id, rga, name, course, status, registered_in) \
         VALUES ('3f1c1a52-8a8e-4f7e-9d55-0c7e3b1f2a10', '2020.0001.001-1', \
         'JOSÉ ÁVILA', 'Direito', 'ativo', '2024-01-01T00:00:00+00:00')",
    ))
    .await
    .unwrap();

    Migrator::up(&db, None).await.unwrap();

    let store = Arc::new(SeaOrmStudentStore::new(db));
    let repo = StudentQueryRepository::new(store, PaginationPolicy::default());
    let found = repo.get_by_name("josé").await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].rga, "2020.0001.001-1");
}

#[tokio::test]
async fn pages_partition_the_listing_in_registration_order() {
    let (_, repo) = setup(None).await;
    let mut ids = Vec::new();
    for i in 0..5 {
        let s = repo
            .add(new_student(&format!("2020.0001.00{i}-1"), &format!("Aluno {i}")))
            .await
            .unwrap();
        ids.push(s.id);
        tokio::time::sleep(Duration::from_millis(2)).await;
    }

    let mut seen = Vec::new();
    for page in 1..=3 {
        let result = repo.get_all_paged(Some(page), Some(2)).await.unwrap();
        assert_eq!(result.total_item_count, 5);
        assert_eq!(result.page_count, 3);
        assert_eq!(result.has_previous_page, page > 1);
        assert_eq!(result.has_next_page, page < 3);
        seen.extend(result.items.into_iter().map(|s| s.id));
    }
    assert_eq!(seen, ids);

    let beyond = repo.get_all_paged(Some(9), Some(2)).await.unwrap();
    assert!(beyond.items.is_empty());
    assert_eq!(beyond.total_item_count, 5);
}

#[tokio::test]
async fn update_and_delete() {
    let (_, repo) = setup(None).await;
    let a = repo.add(new_student("2020.0001.001-1", "Ana")).await.unwrap();
    let b = repo.add(new_student("2020.0001.002-1", "Bia")).await.unwrap();

    let updated = repo
        .update(
            &a.id,
            StudentPatch {
                course: Some("Medicina".into()),
                status: Some(StudentStatus::Inactive),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.course, "Medicina");
    assert_eq!(updated.name, "Ana");
    assert_eq!(updated.registered_in, a.registered_in);

    let err = repo
        .update(
            &b.id,
            StudentPatch {
                rga: Some(a.rga.clone()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Conflict(_)));

    let deleted = repo.delete(&a.id).await.unwrap();
    assert_eq!(deleted.course, "Medicina");
    assert!(matches!(
        repo.get_by_id(&a.id).await,
        Err(DomainError::NotFound { .. })
    ));
    assert!(matches!(
        repo.delete(&a.id).await,
        Err(DomainError::NotFound { .. })
    ));
}

#[tokio::test]
async fn repository_writes_are_visible_through_the_cache() {
    let (store, repo) = setup(Some(Duration::from_secs(60))).await;
    let a = repo.add(new_student("2020.0001.001-1", "Ana")).await.unwrap();
    assert_eq!(repo.get_all_paged(None, None).await.unwrap().total_item_count, 1);

    // A write that bypasses the repository does not clear the cache...
    store.insert(new_student("2020.0001.002-1", "Bia")).await.unwrap();
    assert_eq!(store.count(&StudentFilter::All).await.unwrap(), 1);

    // ...one through the repository does, for every cached read.
    repo.update(
        &a.id,
        StudentPatch {
            name: Some("Ana Maria".into()),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(repo.get_all_paged(None, None).await.unwrap().total_item_count, 2);
    assert_eq!(repo.get_by_id(&a.id).await.unwrap().name, "Ana Maria");

    repo.delete(&a.id).await.unwrap();
    assert_eq!(repo.get_all().await.unwrap().len(), 1);
}

#[tokio::test]
async fn cached_reads_expire_after_ttl() {
    let (store, repo) = setup(Some(Duration::from_millis(50))).await;
    assert!(repo.get_all().await.unwrap().is_empty());

    store.insert(new_student("2020.0001.001-1", "Ana")).await.unwrap();
    tokio::time::sleep(Duration::from_millis(80)).await;

    assert_eq!(repo.get_all().await.unwrap().len(), 1);
}
