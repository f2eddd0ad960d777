mod common;

use std::path::Path;

use pagila_reports::{
    AppError, ReportExecutor,
    entities::category,
    loader::{self, LOAD_ORDER},
    models::CategoryFilmCount,
};
use sea_orm::{EntityTrait, PaginatorTrait};
use serde_json::{Value, json};

fn fixture() -> Vec<(&'static str, Value)> {
    vec![
        ("city", json!([{ "city_id": 1, "city": "Athenai" }, { "city_id": 2, "city": "Kamyin-Kau" }])),
        (
            "address",
            json!([
                { "address_id": 1, "address": "47 MySakila Drive", "city_id": 1 },
                { "address_id": 2, "address": "28 MySQL Boulevard", "city_id": 2 }
            ]),
        ),
        (
            "customer",
            json!([
                { "customer_id": 1, "first_name": "Mary", "last_name": "Smith", "address_id": 1, "active": true },
                { "customer_id": 2, "first_name": "Linda", "last_name": "Williams", "address_id": 2, "active": false }
            ]),
        ),
        (
            "category",
            json!([{ "category_id": 1, "name": "Children" }, { "category_id": 2, "name": "Sci-Fi" }]),
        ),
        (
            "film",
            json!([
                { "film_id": 1, "title": "Academy Dinosaur", "length": 86 },
                { "film_id": 2, "title": "Ace Goldfinger", "length": 48 },
                { "film_id": 3, "title": "Alice Fantasia", "length": null }
            ]),
        ),
        (
            "film_category",
            json!([
                { "film_id": 1, "category_id": 1 },
                { "film_id": 2, "category_id": 1 },
                { "film_id": 3, "category_id": 2 }
            ]),
        ),
        ("actor", json!([{ "actor_id": 1, "first_name": "Penelope", "last_name": "Guiness" }])),
        ("film_actor", json!([{ "actor_id": 1, "film_id": 1 }, { "actor_id": 1, "film_id": 2 }])),
        ("inventory", json!([{ "inventory_id": 1, "film_id": 1 }, { "inventory_id": 2, "film_id": 2 }])),
        (
            "rental",
            json!([
                { "rental_id": 1, "inventory_id": 1, "customer_id": 1 },
                { "rental_id": 2, "inventory_id": 2, "customer_id": 2 }
            ]),
        ),
        (
            "payment",
            json!([
                { "payment_id": 1, "rental_id": 1, "amount": 2.99 },
                { "payment_id": 2, "rental_id": 2, "amount": 0.99 }
            ]),
        ),
    ]
}

fn write_fixture(dir: &Path, tables: &[(&str, Value)]) {
    for (table, rows) in tables {
        let path = loader::data_file(dir, table);
        std::fs::write(path, serde_json::to_vec_pretty(rows).unwrap()).unwrap();
    }
}

#[tokio::test]
async fn loads_every_table_in_dependency_order() {
    let db = common::setup().await;
    let tmp = tempfile::tempdir().unwrap();
    write_fixture(tmp.path(), &fixture());

    let summary = loader::load_dir(&db, tmp.path()).await.unwrap();

    let tables: Vec<&str> = summary.tables.iter().map(|(t, _)| t.as_str()).collect();
    assert_eq!(tables, LOAD_ORDER);
    assert_eq!(summary.rows("film"), Some(3));
    assert_eq!(summary.rows("payment"), Some(2));
    assert_eq!(summary.total_rows(), 23);

    let rows = ReportExecutor::new(db).films_per_category().await.unwrap();
    assert_eq!(
        rows,
        vec![
            CategoryFilmCount { category: "Children".into(), film_count: 2 },
            CategoryFilmCount { category: "Sci-Fi".into(), film_count: 1 },
        ]
    );
}

#[tokio::test]
async fn reloading_is_idempotent_and_updates_rows() {
    let db = common::setup().await;
    let tmp = tempfile::tempdir().unwrap();
    let mut tables = fixture();
    write_fixture(tmp.path(), &tables);
    loader::load_dir(&db, tmp.path()).await.unwrap();

    for (table, rows) in tables.iter_mut() {
        if *table == "category" {
            *rows = json!([{ "category_id": 1, "name": "Kids" }, { "category_id": 2, "name": "Sci-Fi" }]);
        }
    }
    write_fixture(tmp.path(), &tables);
    loader::load_dir(&db, tmp.path()).await.unwrap();

    assert_eq!(category::Entity::find().count(&db).await.unwrap(), 2);
    let kids = category::Entity::find_by_id(1).one(&db).await.unwrap().unwrap();
    assert_eq!(kids.name, "Kids");
}

#[tokio::test]
async fn missing_file_aborts_before_touching_the_store() {
    let db = common::setup().await;
    let tmp = tempfile::tempdir().unwrap();
    let tables: Vec<_> = fixture().into_iter().filter(|(t, _)| *t != "payment").collect();
    write_fixture(tmp.path(), &tables);

    let err = loader::load_dir(&db, tmp.path()).await.unwrap_err();

    assert!(matches!(err, AppError::MissingDataFile(ref p) if p.ends_with("payment.json")));
    assert_eq!(category::Entity::find().count(&db).await.unwrap(), 0);
}

#[tokio::test]
async fn malformed_file_names_its_path() {
    let db = common::setup().await;
    let tmp = tempfile::tempdir().unwrap();
    write_fixture(tmp.path(), &fixture());
    std::fs::write(loader::data_file(tmp.path(), "film"), b"[{ \"film_id\": ").unwrap();

    let err = loader::load_dir(&db, tmp.path()).await.unwrap_err();

    assert!(matches!(err, AppError::Json { ref path, .. } if path.ends_with("film.json")));
    assert_eq!(category::Entity::find().count(&db).await.unwrap(), 0);
}
