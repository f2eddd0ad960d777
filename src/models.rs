use std::{fmt, str::FromStr};

use sea_orm::FromQueryResult;
use serde::Serialize;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, clap::ValueEnum)]
pub enum ReportKind {
    FilmsPerCategory,
    TopActorsByRentals,
    TopGrossingCategory,
    FilmsWithoutInventory,
    TopChildrenActors,
    CityCustomerActivity,
    TopCategoryPerCityGroup,
}

impl ReportKind {
    pub const ALL: [ReportKind; 7] = [
        ReportKind::FilmsPerCategory,
        ReportKind::TopActorsByRentals,
        ReportKind::TopGrossingCategory,
        ReportKind::FilmsWithoutInventory,
        ReportKind::TopChildrenActors,
        ReportKind::CityCustomerActivity,
        ReportKind::TopCategoryPerCityGroup,
    ];

    /// Stable identifier, used for file names and the XML root element.
    pub fn name(self) -> &'static str {
        match self {
            ReportKind::FilmsPerCategory => "films_per_category",
            ReportKind::TopActorsByRentals => "top_actors_by_rentals",
            ReportKind::TopGrossingCategory => "top_grossing_category",
            ReportKind::FilmsWithoutInventory => "films_without_inventory",
            ReportKind::TopChildrenActors => "top_children_actors",
            ReportKind::CityCustomerActivity => "city_customer_activity",
            ReportKind::TopCategoryPerCityGroup => "top_category_per_city_group",
        }
    }
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Json,
    Xml,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Xml => "xml",
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown output format `{0}` (expected json or xml)")]
pub struct UnknownFormat(String);

impl FromStr for OutputFormat {
    type Err = UnknownFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "xml" => Ok(OutputFormat::Xml),
            _ => Err(UnknownFormat(s.to_string())),
        }
    }
}

/// City partition used by the per-group category report. Declaration order
/// is evaluation priority: a city matching both goes to `StartsWithA`.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum CityGroup {
    StartsWithA,
    ContainsHyphen,
}

impl CityGroup {
    pub const ALL: [CityGroup; 2] = [CityGroup::StartsWithA, CityGroup::ContainsHyphen];

    pub fn label(self) -> &'static str {
        match self {
            CityGroup::StartsWithA => "starts_with_a",
            CityGroup::ContainsHyphen => "contains_hyphen",
        }
    }
}

/// A typed value in a report row.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Cell {
    Text(String),
    Integer(i64),
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Text(s) => f.write_str(s),
            Cell::Integer(n) => write!(f, "{n}"),
        }
    }
}

impl From<String> for Cell {
    fn from(value: String) -> Self {
        Cell::Text(value)
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::Text(value.to_string())
    }
}

impl From<i64> for Cell {
    fn from(value: i64) -> Self {
        Cell::Integer(value)
    }
}

impl From<i32> for Cell {
    fn from(value: i32) -> Self {
        Cell::Integer(value.into())
    }
}

impl From<u32> for Cell {
    fn from(value: u32) -> Self {
        Cell::Integer(value.into())
    }
}

/// A typed report row with a fixed column layout.
pub trait ReportRow {
    const COLUMNS: &'static [&'static str];

    fn cells(&self) -> Vec<Cell>;
}

/// Column-named, ordered result of one report, ready for serialisation.
#[derive(Clone, Debug, PartialEq)]
pub struct ReportOutput {
    pub kind: ReportKind,
    pub columns: &'static [&'static str],
    pub rows: Vec<Vec<Cell>>,
}

impl ReportOutput {
    pub fn from_rows<R: ReportRow>(kind: ReportKind, rows: &[R]) -> Self {
        Self { kind, columns: R::COLUMNS, rows: rows.iter().map(ReportRow::cells).collect() }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[derive(Clone, Debug, Eq, PartialEq, FromQueryResult)]
pub struct CategoryFilmCount {
    pub category: String,
    pub film_count: i64,
}

impl ReportRow for CategoryFilmCount {
    const COLUMNS: &'static [&'static str] = &["category", "film_count"];

    fn cells(&self) -> Vec<Cell> {
        vec![self.category.as_str().into(), self.film_count.into()]
    }
}

#[derive(Clone, Debug, Eq, PartialEq, FromQueryResult)]
pub struct ActorRentalCount {
    pub actor_id: i32,
    pub first_name: String,
    pub last_name: String,
    pub rental_count: i64,
}

impl ReportRow for ActorRentalCount {
    const COLUMNS: &'static [&'static str] =
        &["actor_id", "first_name", "last_name", "rental_count"];

    fn cells(&self) -> Vec<Cell> {
        vec![
            self.actor_id.into(),
            self.first_name.as_str().into(),
            self.last_name.as_str().into(),
            self.rental_count.into(),
        ]
    }
}

#[derive(Clone, Debug, Eq, PartialEq, FromQueryResult)]
pub struct GrossingCategory {
    pub category: String,
}

impl ReportRow for GrossingCategory {
    const COLUMNS: &'static [&'static str] = &["category"];

    fn cells(&self) -> Vec<Cell> {
        vec![self.category.as_str().into()]
    }
}

#[derive(Clone, Debug, Eq, PartialEq, FromQueryResult)]
pub struct UnstockedFilm {
    pub title: String,
}

impl ReportRow for UnstockedFilm {
    const COLUMNS: &'static [&'static str] = &["title"];

    fn cells(&self) -> Vec<Cell> {
        vec![self.title.as_str().into()]
    }
}

#[derive(Clone, Debug, Eq, PartialEq, FromQueryResult)]
pub struct ActorFilmCount {
    pub actor_id: i32,
    pub first_name: String,
    pub last_name: String,
    pub film_count: i64,
}

/// An actor together with its dense rank by film count.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RankedActor {
    pub rank: u32,
    pub actor: ActorFilmCount,
}

impl ReportRow for RankedActor {
    const COLUMNS: &'static [&'static str] =
        &["rank", "actor_id", "first_name", "last_name", "film_count"];

    fn cells(&self) -> Vec<Cell> {
        vec![
            self.rank.into(),
            self.actor.actor_id.into(),
            self.actor.first_name.as_str().into(),
            self.actor.last_name.as_str().into(),
            self.actor.film_count.into(),
        ]
    }
}

#[derive(Clone, Debug, Eq, PartialEq, FromQueryResult)]
pub struct CityCustomerActivity {
    pub city_id: i32,
    pub city: String,
    pub active_customers: i64,
    pub inactive_customers: i64,
}

impl ReportRow for CityCustomerActivity {
    const COLUMNS: &'static [&'static str] =
        &["city_id", "city", "active_customers", "inactive_customers"];

    fn cells(&self) -> Vec<Cell> {
        vec![
            self.city_id.into(),
            self.city.as_str().into(),
            self.active_customers.into(),
            self.inactive_customers.into(),
        ]
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CityGroupCategory {
    pub city_group: CityGroup,
    pub category: String,
    pub total_length: i64,
}

impl ReportRow for CityGroupCategory {
    const COLUMNS: &'static [&'static str] = &["city_group", "category", "total_length"];

    fn cells(&self) -> Vec<Cell> {
        vec![
            self.city_group.label().into(),
            self.category.as_str().into(),
            self.total_length.into(),
        ]
    }
}
