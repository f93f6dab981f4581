use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "customizations")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: Uuid,
    pub customer_id: Uuid,
    pub cake_id: Uuid,
    pub message: String,
    pub egg_version: bool,
    pub toppings: String,
    pub shape: String,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::customers::Entity",
        from = "Column::CustomerId",
        to = "super::customers::Column::Id"
    )]
    Customers,
    #[sea_orm(
        belongs_to = "super::cakes::Entity",
        from = "Column::CakeId",
        to = "super::cakes::Column::Id"
    )]
    Cakes,
}

impl Related<super::customers::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Customers.def()
    }
}

impl Related<super::cakes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Cakes.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
