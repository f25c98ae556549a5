pub mod customer;
pub mod monthly_metric;
pub mod sea_orm_active_enums;
pub mod unit;
pub mod user;

use sea_orm::{ConnectionTrait, DatabaseConnection, DbErr, EntityTrait, Schema};

/// Creates every table from its entity definition if it does not exist yet.
/// Customers come before units because units reference them.
pub async fn create_tables(db: &DatabaseConnection) -> Result<(), DbErr> {
    let backend = db.get_database_backend();
    let schema = Schema::new(backend);

    create_table(db, &schema, customer::Entity).await?;
    create_table(db, &schema, unit::Entity).await?;
    create_table(db, &schema, monthly_metric::Entity).await?;
    create_table(db, &schema, user::Entity).await?;

    Ok(())
}

async fn create_table<E: EntityTrait>(
    db: &DatabaseConnection,
    schema: &Schema,
    entity: E,
) -> Result<(), DbErr> {
    let mut statement = schema.create_table_from_entity(entity);
    statement.if_not_exists();
    db.execute(db.get_database_backend().build(&statement))
        .await?;
    tracing::debug!("Ensured table {}", entity.table_name());
    Ok(())
}
