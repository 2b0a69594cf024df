//! User entity for SeaORM.

use sea_orm::entity::prelude::*;
use sea_orm::{FromQueryResult, Set};

use juicebox_core::domain::{Author, PublicUser, User};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub username: String,
    pub password: String,
    pub name: String,
    pub location: String,
    pub active: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::post::Entity")]
    Post,
}

impl Related<super::post::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Post.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Columns safe to hand out; the password column is never selected.
pub const PUBLIC_COLUMNS: [Column; 5] = [
    Column::Id,
    Column::Username,
    Column::Name,
    Column::Location,
    Column::Active,
];

/// Columns attached to a hydrated post.
pub const AUTHOR_COLUMNS: [Column; 4] =
    [Column::Id, Column::Username, Column::Name, Column::Location];

/// Row shape for [`PUBLIC_COLUMNS`].
#[derive(Debug, FromQueryResult)]
pub struct PublicUserRow {
    pub id: Uuid,
    pub username: String,
    pub name: String,
    pub location: String,
    pub active: bool,
}

/// Row shape for [`AUTHOR_COLUMNS`].
#[derive(Debug, FromQueryResult)]
pub struct AuthorRow {
    pub id: Uuid,
    pub username: String,
    pub name: String,
    pub location: String,
}

impl From<PublicUserRow> for PublicUser {
    fn from(row: PublicUserRow) -> Self {
        Self {
            id: row.id,
            username: row.username,
            name: row.name,
            location: row.location,
            active: row.active,
        }
    }
}

impl From<AuthorRow> for Author {
    fn from(row: AuthorRow) -> Self {
        Self {
            id: row.id,
            username: row.username,
            name: row.name,
            location: row.location,
        }
    }
}

/// Conversion from SeaORM Model to Domain User.
impl From<Model> for User {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            username: model.username,
            password_hash: model.password,
            name: model.name,
            location: model.location,
            active: model.active,
        }
    }
}

/// Conversion from Domain User to SeaORM ActiveModel.
impl From<User> for ActiveModel {
    fn from(user: User) -> Self {
        Self {
            id: Set(user.id),
            username: Set(user.username),
            password: Set(user.password_hash),
            name: Set(user.name),
            location: Set(user.location),
            active: Set(user.active),
        }
    }
}
