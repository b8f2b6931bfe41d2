use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_users_table::Migration),
            Box::new(m20240101_000002_create_catalog_tables::Migration),
            Box::new(m20240101_000003_create_shopping_cart_tables::Migration),
        ]
    }
}

// Migration implementations

mod m20240101_000001_create_users_table {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000001_create_users_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Users::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Users::Id)
                                .big_integer()
                                .auto_increment()
                                .primary_key()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Users::Username)
                                .string()
                                .not_null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(Users::Email).string().not_null())
                        .col(ColumnDef::new(Users::PasswordHash).string())
                        .col(ColumnDef::new(Users::Role).string_len(20).not_null())
                        .col(ColumnDef::new(Users::Provider).string_len(20).not_null())
                        .col(
                            ColumnDef::new(Users::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Users::Table).to_owned())
                .await
        }
    }

    #[derive(Iden)]
    enum Users {
        Table,
        Id,
        Username,
        Email,
        PasswordHash,
        Role,
        Provider,
        CreatedAt,
    }
}

mod m20240101_000002_create_catalog_tables {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000002_create_catalog_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(MovieGenres::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(MovieGenres::Id)
                                .big_integer()
                                .auto_increment()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(MovieGenres::Name).string().not_null())
                        .col(ColumnDef::new(MovieGenres::Description).string())
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(Movies::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Movies::Id)
                                .big_integer()
                                .auto_increment()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Movies::Name).string().not_null())
                        .col(ColumnDef::new(Movies::Description).string_len(500))
                        .col(
                            ColumnDef::new(Movies::Price)
                                .decimal_len(19, 4)
                                .not_null(),
                        )
                        .col(ColumnDef::new(Movies::ImageUrl).string())
                        .col(ColumnDef::new(Movies::GenreId).big_integer().not_null())
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_movies_genre")
                                .from(Movies::Table, Movies::GenreId)
                                .to(MovieGenres::Table, MovieGenres::Id),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(Actors::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Actors::Id)
                                .big_integer()
                                .auto_increment()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Actors::Name).string().not_null())
                        .col(ColumnDef::new(Actors::Surname).string().not_null())
                        .col(ColumnDef::new(Actors::Bio).string())
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(MovieActors::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(MovieActors::MovieId)
                                .big_integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(MovieActors::ActorId)
                                .big_integer()
                                .not_null(),
                        )
                        .primary_key(
                            Index::create()
                                .col(MovieActors::MovieId)
                                .col(MovieActors::ActorId),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_movie_actors_movie")
                                .from(MovieActors::Table, MovieActors::MovieId)
                                .to(Movies::Table, Movies::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_movie_actors_actor")
                                .from(MovieActors::Table, MovieActors::ActorId)
                                .to(Actors::Table, Actors::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(MovieActors::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Actors::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Movies::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(MovieGenres::Table).to_owned())
                .await
        }
    }

    #[derive(Iden)]
    enum MovieGenres {
        Table,
        Id,
        Name,
        Description,
    }

    #[derive(Iden)]
    enum Movies {
        Table,
        Id,
        Name,
        Description,
        Price,
        ImageUrl,
        GenreId,
    }

    #[derive(Iden)]
    enum Actors {
        Table,
        Id,
        Name,
        Surname,
        Bio,
    }

    #[derive(Iden)]
    enum MovieActors {
        Table,
        MovieId,
        ActorId,
    }
}

mod m20240101_000003_create_shopping_cart_tables {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000003_create_shopping_cart_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(ShoppingCarts::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(ShoppingCarts::Id)
                                .big_integer()
                                .auto_increment()
                                .primary_key()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(ShoppingCarts::UserId)
                                .big_integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(ShoppingCarts::Status)
                                .string_len(20)
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(ShoppingCarts::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_shopping_carts_user")
                                .from(ShoppingCarts::Table, ShoppingCarts::UserId)
                                .to(Users::Table, Users::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            // Closes the find-or-create race: two concurrent first accesses
            // for one user cannot both insert a `created` cart.
            manager
                .create_index(
                    Index::create()
                        .name("idx_shopping_carts_user_status")
                        .table(ShoppingCarts::Table)
                        .col(ShoppingCarts::UserId)
                        .col(ShoppingCarts::Status)
                        .unique()
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(CartItems::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(CartItems::Id)
                                .big_integer()
                                .auto_increment()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(CartItems::CartId).big_integer().not_null())
                        .col(ColumnDef::new(CartItems::MovieId).big_integer().not_null())
                        .col(
                            ColumnDef::new(CartItems::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_cart_items_cart")
                                .from(CartItems::Table, CartItems::CartId)
                                .to(ShoppingCarts::Table, ShoppingCarts::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_cart_items_movie")
                                .from(CartItems::Table, CartItems::MovieId)
                                .to(Movies::Table, Movies::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            // Set semantics on movie id within one cart.
            manager
                .create_index(
                    Index::create()
                        .name("idx_cart_items_cart_movie")
                        .table(CartItems::Table)
                        .col(CartItems::CartId)
                        .col(CartItems::MovieId)
                        .unique()
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(CartItems::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(ShoppingCarts::Table).to_owned())
                .await
        }
    }

    #[derive(Iden)]
    enum Users {
        Table,
        Id,
    }

    #[derive(Iden)]
    enum Movies {
        Table,
        Id,
    }

    #[derive(Iden)]
    enum ShoppingCarts {
        Table,
        Id,
        UserId,
        Status,
        CreatedAt,
    }

    #[derive(Iden)]
    enum CartItems {
        Table,
        Id,
        CartId,
        MovieId,
        CreatedAt,
    }
}
