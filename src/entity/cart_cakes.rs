use sea_orm::entity::prelude::*;

// One row per cake unit in a cart; the same cake may appear repeatedly.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "cart_cakes")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: Uuid,
    pub cart_id: Uuid,
    pub cake_id: Uuid,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::carts::Entity",
        from = "Column::CartId",
        to = "super::carts::Column::Id"
    )]
    Carts,
    #[sea_orm(
        belongs_to = "super::cakes::Entity",
        from = "Column::CakeId",
        to = "super::cakes::Column::Id"
    )]
    Cakes,
}

impl Related<super::carts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Carts.def()
    }
}

impl Related<super::cakes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Cakes.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
