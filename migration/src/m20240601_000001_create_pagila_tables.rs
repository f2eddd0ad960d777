use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(City::Table)
                    .if_not_exists()
                    .col(pk_auto(City::CityId))
                    .col(string(City::City))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Address::Table)
                    .if_not_exists()
                    .col(pk_auto(Address::AddressId))
                    .col(string(Address::Address))
                    .col(integer(Address::CityId))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_address_city")
                            .from(Address::Table, Address::CityId)
                            .to(City::Table, City::CityId),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Customer::Table)
                    .if_not_exists()
                    .col(pk_auto(Customer::CustomerId))
                    .col(string(Customer::FirstName))
                    .col(string(Customer::LastName))
                    .col(integer(Customer::AddressId))
                    .col(boolean(Customer::Active))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_customer_address")
                            .from(Customer::Table, Customer::AddressId)
                            .to(Address::Table, Address::AddressId),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Category::Table)
                    .if_not_exists()
                    .col(pk_auto(Category::CategoryId))
                    .col(string(Category::Name))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Film::Table)
                    .if_not_exists()
                    .col(pk_auto(Film::FilmId))
                    .col(string(Film::Title))
                    .col(integer_null(Film::Length))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(FilmCategory::Table)
                    .if_not_exists()
                    .col(integer(FilmCategory::FilmId))
                    .col(integer(FilmCategory::CategoryId))
                    .primary_key(
                        Index::create().col(FilmCategory::FilmId).col(FilmCategory::CategoryId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_film_category_film")
                            .from(FilmCategory::Table, FilmCategory::FilmId)
                            .to(Film::Table, Film::FilmId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_film_category_category")
                            .from(FilmCategory::Table, FilmCategory::CategoryId)
                            .to(Category::Table, Category::CategoryId),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Actor::Table)
                    .if_not_exists()
                    .col(pk_auto(Actor::ActorId))
                    .col(string(Actor::FirstName))
                    .col(string(Actor::LastName))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(FilmActor::Table)
                    .if_not_exists()
                    .col(integer(FilmActor::ActorId))
                    .col(integer(FilmActor::FilmId))
                    .primary_key(Index::create().col(FilmActor::ActorId).col(FilmActor::FilmId))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_film_actor_actor")
                            .from(FilmActor::Table, FilmActor::ActorId)
                            .to(Actor::Table, Actor::ActorId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_film_actor_film")
                            .from(FilmActor::Table, FilmActor::FilmId)
                            .to(Film::Table, Film::FilmId),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Inventory::Table)
                    .if_not_exists()
                    .col(pk_auto(Inventory::InventoryId))
                    .col(integer(Inventory::FilmId))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_inventory_film")
                            .from(Inventory::Table, Inventory::FilmId)
                            .to(Film::Table, Film::FilmId),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Rental::Table)
                    .if_not_exists()
                    .col(pk_auto(Rental::RentalId))
                    .col(integer(Rental::InventoryId))
                    .col(integer(Rental::CustomerId))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_rental_inventory")
                            .from(Rental::Table, Rental::InventoryId)
                            .to(Inventory::Table, Inventory::InventoryId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_rental_customer")
                            .from(Rental::Table, Rental::CustomerId)
                            .to(Customer::Table, Customer::CustomerId),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Payment::Table)
                    .if_not_exists()
                    .col(pk_auto(Payment::PaymentId))
                    .col(integer_null(Payment::RentalId))
                    .col(decimal_len(Payment::Amount, 5, 2))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_payment_rental")
                            .from(Payment::Table, Payment::RentalId)
                            .to(Rental::Table, Rental::RentalId),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Payment::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(Rental::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(Inventory::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(FilmActor::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(Actor::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(FilmCategory::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(Film::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(Category::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(Customer::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(Address::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(City::Table).to_owned()).await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum City {
    Table,
    CityId,
    City,
}

#[derive(DeriveIden)]
enum Address {
    Table,
    AddressId,
    Address,
    CityId,
}

#[derive(DeriveIden)]
enum Customer {
    Table,
    CustomerId,
    FirstName,
    LastName,
    AddressId,
    Active,
}

#[derive(DeriveIden)]
enum Category {
    Table,
    CategoryId,
    Name,
}

#[derive(DeriveIden)]
enum Film {
    Table,
    FilmId,
    Title,
    Length,
}

#[derive(DeriveIden)]
enum FilmCategory {
    Table,
    FilmId,
    CategoryId,
}

#[derive(DeriveIden)]
enum Actor {
    Table,
    ActorId,
    FirstName,
    LastName,
}

#[derive(DeriveIden)]
enum FilmActor {
    Table,
    ActorId,
    FilmId,
}

#[derive(DeriveIden)]
enum Inventory {
    Table,
    InventoryId,
    FilmId,
}

#[derive(DeriveIden)]
enum Rental {
    Table,
    RentalId,
    InventoryId,
    CustomerId,
}

#[derive(DeriveIden)]
enum Payment {
    Table,
    PaymentId,
    RentalId,
    Amount,
}
