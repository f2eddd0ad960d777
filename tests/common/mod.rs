#![allow(dead_code)]

use pagila_reports::{
    ReportExecutor, db,
    entities::{
        actor, address, category, city, customer, film, film_actor, film_category, inventory,
        payment, rental,
    },
};
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};

/// A migrated in-memory store. One pooled connection keeps every query on
/// the same in-memory database.
pub async fn setup() -> DatabaseConnection {
    db::connect_and_migrate("sqlite::memory:", 1).await.expect("in-memory store migrates")
}

pub async fn executor() -> (ReportExecutor, Seed) {
    let db = setup().await;
    (ReportExecutor::new(db.clone()), Seed { db })
}

/// Row-by-row seeding through entity active models. Ids are explicit so
/// tests can refer to them.
pub struct Seed {
    pub db: DatabaseConnection,
}

impl Seed {
    pub async fn category(&self, id: i32, name: &str) {
        category::ActiveModel { category_id: Set(id), name: Set(name.to_owned()) }
            .insert(&self.db)
            .await
            .expect("insert category");
    }

    pub async fn film(&self, id: i32, title: &str, length: Option<i32>) {
        film::ActiveModel { film_id: Set(id), title: Set(title.to_owned()), length: Set(length) }
            .insert(&self.db)
            .await
            .expect("insert film");
    }

    pub async fn film_category(&self, film_id: i32, category_id: i32) {
        film_category::ActiveModel { film_id: Set(film_id), category_id: Set(category_id) }
            .insert(&self.db)
            .await
            .expect("insert film_category");
    }

    pub async fn actor(&self, id: i32, first_name: &str, last_name: &str) {
        actor::ActiveModel {
            actor_id: Set(id),
            first_name: Set(first_name.to_owned()),
            last_name: Set(last_name.to_owned()),
        }
        .insert(&self.db)
        .await
        .expect("insert actor");
    }

    pub async fn film_actor(&self, actor_id: i32, film_id: i32) {
        film_actor::ActiveModel { actor_id: Set(actor_id), film_id: Set(film_id) }
            .insert(&self.db)
            .await
            .expect("insert film_actor");
    }

    pub async fn inventory(&self, id: i32, film_id: i32) {
        inventory::ActiveModel { inventory_id: Set(id), film_id: Set(film_id) }
            .insert(&self.db)
            .await
            .expect("insert inventory");
    }

    pub async fn city(&self, id: i32, name: &str) {
        city::ActiveModel { city_id: Set(id), city: Set(name.to_owned()) }
            .insert(&self.db)
            .await
            .expect("insert city");
    }

    pub async fn address(&self, id: i32, city_id: i32) {
        address::ActiveModel {
            address_id: Set(id),
            address: Set(format!("{id} Main Street")),
            city_id: Set(city_id),
        }
        .insert(&self.db)
        .await
        .expect("insert address");
    }

    pub async fn customer(&self, id: i32, address_id: i32, active: bool) {
        customer::ActiveModel {
            customer_id: Set(id),
            first_name: Set(format!("First{id}")),
            last_name: Set(format!("Last{id}")),
            address_id: Set(address_id),
            active: Set(active),
        }
        .insert(&self.db)
        .await
        .expect("insert customer");
    }

    pub async fn rental(&self, id: i32, inventory_id: i32, customer_id: i32) {
        rental::ActiveModel {
            rental_id: Set(id),
            inventory_id: Set(inventory_id),
            customer_id: Set(customer_id),
        }
        .insert(&self.db)
        .await
        .expect("insert rental");
    }

    pub async fn payment(&self, id: i32, rental_id: i32, cents: i64) {
        payment::ActiveModel {
            payment_id: Set(id),
            rental_id: Set(Some(rental_id)),
            amount: Set(Decimal::new(cents, 2)),
        }
        .insert(&self.db)
        .await
        .expect("insert payment");
    }

    /// One city, address and customer for tests that only need someone to
    /// rent films.
    pub async fn default_customer(&self) -> i32 {
        self.city(900, "Nowhere").await;
        self.address(900, 900).await;
        self.customer(900, 900, true).await;
        900
    }
}
