use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

const INDEXES: &[(&str, Tbl, Col)] = &[
    ("idx_address_city_id", Tbl::Address, Col::CityId),
    ("idx_customer_address_id", Tbl::Customer, Col::AddressId),
    ("idx_film_category_category_id", Tbl::FilmCategory, Col::CategoryId),
    ("idx_film_actor_film_id", Tbl::FilmActor, Col::FilmId),
    ("idx_inventory_film_id", Tbl::Inventory, Col::FilmId),
    ("idx_rental_inventory_id", Tbl::Rental, Col::InventoryId),
    ("idx_rental_customer_id", Tbl::Rental, Col::CustomerId),
    ("idx_payment_rental_id", Tbl::Payment, Col::RentalId),
];

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for &(name, table, column) in INDEXES {
            manager
                .create_index(
                    Index::create()
                        .name(name)
                        .if_not_exists()
                        .table(table)
                        .col(column)
                        .to_owned(),
                )
                .await?;
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for &(name, table, _) in INDEXES.iter().rev() {
            manager.drop_index(Index::drop().name(name).table(table).to_owned()).await?;
        }

        Ok(())
    }
}

#[derive(Clone, Copy, DeriveIden)]
enum Tbl {
    Address,
    Customer,
    FilmCategory,
    FilmActor,
    Inventory,
    Rental,
    Payment,
}

#[derive(Clone, Copy, DeriveIden)]
enum Col {
    CityId,
    AddressId,
    CategoryId,
    FilmId,
    InventoryId,
    CustomerId,
    RentalId,
}
