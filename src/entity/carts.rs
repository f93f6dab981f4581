use sea_orm::entity::prelude::*;

// customer_id carries a unique index; it is what keeps a customer on a
// single cart even under concurrent adds.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "carts")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub customer_id: Uuid,
    pub customization_id: Option<Uuid>,
    pub quantity: i32,
    pub total_amount: i64,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
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
        belongs_to = "super::customizations::Entity",
        from = "Column::CustomizationId",
        to = "super::customizations::Column::Id"
    )]
    Customizations,
    #[sea_orm(has_many = "super::cart_cakes::Entity")]
    CartCakes,
}

impl Related<super::customers::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Customers.def()
    }
}

impl Related<super::customizations::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Customizations.def()
    }
}

impl Related<super::cart_cakes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CartCakes.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
