//! The fixed battery of analytical reports over the rental-store schema.
//!
//! Every report runs as a single query inside its own read-only transaction,
//! so the joins it performs see one consistent snapshot. Dropping a report
//! future rolls that transaction back; no partial rows are ever returned.

mod ranking;

pub use ranking::dense_rank;

use futures::{StreamExt, TryStreamExt, stream};
use sea_orm::{
    AccessMode, ColumnTrait, Condition, ConnectionTrait, DatabaseBackend, DatabaseConnection,
    DatabaseTransaction, EntityName, EntityTrait, FromQueryResult, IsolationLevel, JoinType,
    QueryFilter, QueryOrder, QuerySelect, RelationTrait, Selector, SelectorTrait,
    TransactionTrait,
    sea_query::{Alias, Expr, Func, IntoColumnRef, SimpleExpr},
};
use tracing::{debug, info};

use crate::{
    entities::{
        actor, address, category, city, customer, film, film_actor, film_category, inventory,
        payment, rental,
    },
    error::StoreResult,
    models::{
        ActorFilmCount, ActorRentalCount, CategoryFilmCount, CityCustomerActivity, CityGroup,
        CityGroupCategory, GrossingCategory, RankedActor, ReportKind, ReportOutput, UnstockedFilm,
    },
};

const TOP_ACTORS_LIMIT: u64 = 10;
const CHILDREN_CATEGORY: &str = "Children";
const CHILDREN_MAX_RANK: u32 = 3;

#[derive(Clone, Debug)]
pub struct ReportExecutor {
    db: DatabaseConnection,
}

#[derive(Debug, FromQueryResult)]
struct CityGroupTotal {
    city_group: String,
    category: String,
    total_length: i64,
}

impl ReportExecutor {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn run(&self, kind: ReportKind) -> StoreResult<ReportOutput> {
        debug!(report = %kind, "running report");

        let output = match kind {
            ReportKind::FilmsPerCategory => {
                ReportOutput::from_rows(kind, &self.films_per_category().await?)
            },
            ReportKind::TopActorsByRentals => {
                ReportOutput::from_rows(kind, &self.top_actors_by_rentals().await?)
            },
            ReportKind::TopGrossingCategory => {
                ReportOutput::from_rows(kind, &self.top_grossing_category().await?)
            },
            ReportKind::FilmsWithoutInventory => {
                ReportOutput::from_rows(kind, &self.films_without_inventory().await?)
            },
            ReportKind::TopChildrenActors => {
                ReportOutput::from_rows(kind, &self.top_children_actors().await?)
            },
            ReportKind::CityCustomerActivity => {
                ReportOutput::from_rows(kind, &self.city_customer_activity().await?)
            },
            ReportKind::TopCategoryPerCityGroup => {
                ReportOutput::from_rows(kind, &self.top_category_per_city_group().await?)
            },
        };

        info!(report = %kind, rows = output.rows.len(), "report complete");
        Ok(output)
    }

    /// Runs `kinds` with at most `max_concurrent` in flight, each on its own
    /// pooled connection. Output order matches `kinds`; the first failure
    /// fails the whole batch.
    pub async fn run_all(
        &self,
        kinds: &[ReportKind],
        max_concurrent: usize,
    ) -> StoreResult<Vec<ReportOutput>> {
        stream::iter(kinds.iter().copied())
            .map(|kind| self.run(kind))
            .buffered(max_concurrent.max(1))
            .try_collect()
            .await
    }

    /// Selects one full row from every table the reports read, so a missing
    /// table or column surfaces as a schema mismatch before any report runs.
    pub async fn verify_schema(&self) -> StoreResult<()> {
        let txn = self.snapshot().await?;

        check_table(&txn, category::Entity).await?;
        check_table(&txn, film::Entity).await?;
        check_table(&txn, film_category::Entity).await?;
        check_table(&txn, actor::Entity).await?;
        check_table(&txn, film_actor::Entity).await?;
        check_table(&txn, inventory::Entity).await?;
        check_table(&txn, rental::Entity).await?;
        check_table(&txn, payment::Entity).await?;
        check_table(&txn, customer::Entity).await?;
        check_table(&txn, address::Entity).await?;
        check_table(&txn, city::Entity).await?;

        txn.commit().await?;
        Ok(())
    }

    /// Number of linked films per category name, most films first.
    pub async fn films_per_category(&self) -> StoreResult<Vec<CategoryFilmCount>> {
        let film_count = film_category::Column::FilmId.count();

        let query = film_category::Entity::find()
            .select_only()
            .column_as(category::Column::Name, "category")
            .column_as(film_count.clone(), "film_count")
            .join(JoinType::InnerJoin, film_category::Relation::Category.def())
            .group_by(category::Column::Name)
            .order_by_desc(film_count)
            .order_by_asc(category::Column::Name)
            .into_model::<CategoryFilmCount>();

        self.fetch(ReportKind::FilmsPerCategory, query).await
    }

    /// The ten actors whose films were rented most. Ties at the cut-off are
    /// not expanded; lower actor ids win.
    pub async fn top_actors_by_rentals(&self) -> StoreResult<Vec<ActorRentalCount>> {
        let rental_count = rental::Column::RentalId.count();

        let query = actor::Entity::find()
            .select_only()
            .column(actor::Column::ActorId)
            .column(actor::Column::FirstName)
            .column(actor::Column::LastName)
            .column_as(rental_count.clone(), "rental_count")
            .join(JoinType::InnerJoin, actor::Relation::FilmActor.def())
            .join(JoinType::InnerJoin, film_actor::Relation::Film.def())
            .join(JoinType::InnerJoin, film::Relation::Inventory.def())
            .join(JoinType::InnerJoin, inventory::Relation::Rental.def())
            .group_by(actor::Column::ActorId)
            .group_by(actor::Column::FirstName)
            .group_by(actor::Column::LastName)
            .order_by_desc(rental_count)
            .order_by_asc(actor::Column::ActorId)
            .limit(TOP_ACTORS_LIMIT)
            .into_model::<ActorRentalCount>();

        self.fetch(ReportKind::TopActorsByRentals, query).await
    }

    /// The category with the largest payment total, or nothing when no
    /// payment reaches any category.
    pub async fn top_grossing_category(&self) -> StoreResult<Vec<GrossingCategory>> {
        // SQLite sums decimals as doubles; compare totals at cent precision.
        let revenue =
            SimpleExpr::from(Func::round_with_precision(payment::Column::Amount.sum(), 2));

        let query = category::Entity::find()
            .select_only()
            .column_as(category::Column::Name, "category")
            .join(JoinType::InnerJoin, category::Relation::FilmCategory.def())
            .join(JoinType::InnerJoin, film_category::Relation::Film.def())
            .join(JoinType::InnerJoin, film::Relation::Inventory.def())
            .join(JoinType::InnerJoin, inventory::Relation::Rental.def())
            .join(JoinType::InnerJoin, rental::Relation::Payment.def())
            .group_by(category::Column::CategoryId)
            .group_by(category::Column::Name)
            .order_by_desc(revenue)
            .order_by_asc(category::Column::CategoryId)
            .limit(1)
            .into_model::<GrossingCategory>();

        self.fetch(ReportKind::TopGrossingCategory, query).await
    }

    /// Films with no inventory copy, found with an anti-join.
    pub async fn films_without_inventory(&self) -> StoreResult<Vec<UnstockedFilm>> {
        let query = film::Entity::find()
            .select_only()
            .column(film::Column::Title)
            .join(JoinType::LeftJoin, film::Relation::Inventory.def())
            .filter(inventory::Column::InventoryId.is_null())
            .order_by_asc(film::Column::FilmId)
            .into_model::<UnstockedFilm>();

        self.fetch(ReportKind::FilmsWithoutInventory, query).await
    }

    /// Actors dense-ranked by distinct "Children" films, keeping every actor
    /// ranked third or better.
    pub async fn top_children_actors(&self) -> StoreResult<Vec<RankedActor>> {
        let film_count = SimpleExpr::from(Func::count_distinct(Expr::col((
            film_actor::Entity,
            film_actor::Column::FilmId,
        ))));

        let query = actor::Entity::find()
            .select_only()
            .column(actor::Column::ActorId)
            .column(actor::Column::FirstName)
            .column(actor::Column::LastName)
            .column_as(film_count.clone(), "film_count")
            .join(JoinType::InnerJoin, actor::Relation::FilmActor.def())
            .join(JoinType::InnerJoin, film_actor::Relation::Film.def())
            .join(JoinType::InnerJoin, film::Relation::FilmCategory.def())
            .join(JoinType::InnerJoin, film_category::Relation::Category.def())
            .filter(category::Column::Name.eq(CHILDREN_CATEGORY))
            .group_by(actor::Column::ActorId)
            .group_by(actor::Column::FirstName)
            .group_by(actor::Column::LastName)
            .order_by_desc(film_count)
            .order_by_asc(actor::Column::ActorId)
            .into_model::<ActorFilmCount>();

        let actors = self.fetch(ReportKind::TopChildrenActors, query).await?;

        Ok(dense_rank(actors, CHILDREN_MAX_RANK, |a| a.film_count)
            .into_iter()
            .map(|(rank, actor)| RankedActor { rank, actor })
            .collect())
    }

    /// Active and inactive customer counts for every city, including cities
    /// without addresses or customers. Both counters come from one pass.
    pub async fn city_customer_activity(&self) -> StoreResult<Vec<CityCustomerActivity>> {
        let active = count_where(customer::Column::Active.eq(true));
        let inactive = count_where(customer::Column::Active.eq(false));

        let query = city::Entity::find()
            .select_only()
            .column(city::Column::CityId)
            .column(city::Column::City)
            .column_as(active, "active_customers")
            .column_as(inactive.clone(), "inactive_customers")
            .join(JoinType::LeftJoin, city::Relation::Address.def())
            .join(JoinType::LeftJoin, address::Relation::Customer.def())
            .group_by(city::Column::CityId)
            .group_by(city::Column::City)
            .order_by_desc(inactive)
            .order_by_asc(city::Column::CityId)
            .into_model::<CityCustomerActivity>();

        self.fetch(ReportKind::CityCustomerActivity, query).await
    }

    /// The category with the most rented minutes in each city group. Ties at
    /// the top all appear.
    pub async fn top_category_per_city_group(&self) -> StoreResult<Vec<CityGroupCategory>> {
        let starts_with_a =
            Expr::expr(Func::lower(Expr::col((city::Entity, city::Column::City)))).like("a%");
        let contains_hyphen = city::Column::City.contains("-");

        // First matching branch wins, so "A-" cities count once, as starts_with_a.
        let city_group = SimpleExpr::Case(Box::new(
            Expr::case(starts_with_a.clone(), CityGroup::StartsWithA.label())
                .case(contains_hyphen.clone(), CityGroup::ContainsHyphen.label()),
        ));
        let total_length = film::Column::Length.sum();

        let query = rental::Entity::find()
            .select_only()
            .column_as(city_group, "city_group")
            .column_as(category::Column::Name, "category")
            .column_as(total_length.clone(), "total_length")
            .join(JoinType::InnerJoin, rental::Relation::Inventory.def())
            .join(JoinType::InnerJoin, inventory::Relation::Film.def())
            .join(JoinType::InnerJoin, film::Relation::FilmCategory.def())
            .join(JoinType::InnerJoin, film_category::Relation::Category.def())
            .join(JoinType::InnerJoin, rental::Relation::Customer.def())
            .join(JoinType::InnerJoin, customer::Relation::Address.def())
            .join(JoinType::InnerJoin, address::Relation::City.def())
            .filter(Condition::any().add(starts_with_a).add(contains_hyphen))
            .filter(film::Column::Length.is_not_null())
            .group_by(SimpleExpr::Column(Alias::new("city_group").into_column_ref()))
            .group_by(category::Column::Name)
            .order_by_desc(total_length)
            .order_by_asc(category::Column::Name)
            .into_model::<CityGroupTotal>();

        let totals = self.fetch(ReportKind::TopCategoryPerCityGroup, query).await?;

        let mut leaders = Vec::new();
        for group in CityGroup::ALL {
            let in_group = totals.iter().filter(|t| t.city_group == group.label());
            for (_, top) in dense_rank(in_group, 1, |t| t.total_length) {
                leaders.push(CityGroupCategory {
                    city_group: group,
                    category: top.category.clone(),
                    total_length: top.total_length,
                });
            }
        }

        Ok(leaders)
    }

    async fn fetch<S>(&self, kind: ReportKind, selector: Selector<S>) -> StoreResult<Vec<S::Item>>
    where
        S: SelectorTrait,
    {
        let txn = self.snapshot().await?;
        let rows = selector.all(&txn).await?;
        txn.commit().await?;

        debug!(report = %kind, rows = rows.len(), "query returned");
        Ok(rows)
    }

    async fn snapshot(&self) -> StoreResult<DatabaseTransaction> {
        // SQLite isolation and access mode are connection-global; a plain
        // deferred transaction already reads from one snapshot.
        let txn = match self.db.get_database_backend() {
            DatabaseBackend::Postgres => {
                self.db
                    .begin_with_config(
                        Some(IsolationLevel::RepeatableRead),
                        Some(AccessMode::ReadOnly),
                    )
                    .await?
            },
            _ => self.db.begin().await?,
        };
        Ok(txn)
    }
}

fn count_where(condition: SimpleExpr) -> SimpleExpr {
    Func::count(Expr::case(condition, 1)).into()
}

async fn check_table<E: EntityTrait>(txn: &DatabaseTransaction, entity: E) -> StoreResult<()> {
    E::find().one(txn).await?;
    debug!(table = entity.table_name(), "table present");
    Ok(())
}
