use std::fmt;
use std::str::FromStr;

use diesel::backend::Backend;
use diesel::deserialize::{self, FromSql};
use diesel::prelude::*;
use diesel::serialize::{self, IsNull, Output, ToSql};
use diesel::sql_types::Text;
use diesel::sqlite::Sqlite;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::CatalogError;
use crate::schema::{
    food_names, food_type_relations, food_types, foods, histamine_infos, information_sources,
};

/// A value outside one of the closed choice sets.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("'{value}' is not a valid {kind}")]
pub struct InvalidChoice {
    pub kind: &'static str,
    pub value: String,
}

impl From<InvalidChoice> for CatalogError {
    fn from(err: InvalidChoice) -> Self {
        CatalogError::BadRequest(err.to_string())
    }
}

/// Stores a closed enum as its TEXT spelling and refuses anything else on read.
macro_rules! text_choice {
    ($ty:ident, $kind:literal, { $($variant:ident => $text:literal),+ $(,)? }) => {
        impl $ty {
            pub const ALL: &'static [$ty] = &[$($ty::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($ty::$variant => $text),+
                }
            }
        }

        impl FromStr for $ty {
            type Err = InvalidChoice;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($text => Ok($ty::$variant),)+
                    other => Err(InvalidChoice {
                        kind: $kind,
                        value: other.to_string(),
                    }),
                }
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl ToSql<Text, Sqlite> for $ty {
            fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, Sqlite>) -> serialize::Result {
                out.set_value(self.as_str());
                Ok(IsNull::No)
            }
        }

        impl FromSql<Text, Sqlite> for $ty {
            fn from_sql(bytes: <Sqlite as Backend>::RawValue<'_>) -> deserialize::Result<Self> {
                let value = <String as FromSql<Text, Sqlite>>::from_sql(bytes)?;
                Ok(value.parse::<$ty>()?)
            }
        }
    };
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    Deserialize,
    diesel::AsExpression,
    diesel::FromSqlRow,
)]
#[diesel(sql_type = Text)]
pub enum CompatibilityScore {
    #[serde(rename = "0")]
    Zero,
    #[serde(rename = "1")]
    One,
    #[serde(rename = "2")]
    Two,
    #[serde(rename = "3")]
    Three,
    #[default]
    #[serde(rename = "unknown")]
    Unknown,
}

text_choice!(CompatibilityScore, "compatibility score", {
    Zero => "0",
    One => "1",
    Two => "2",
    Three => "3",
    Unknown => "unknown",
});

/// Yes / no / unknown.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    Deserialize,
    diesel::AsExpression,
    diesel::FromSqlRow,
)]
#[diesel(sql_type = Text)]
#[serde(rename_all = "lowercase")]
pub enum Ynu {
    True,
    False,
    #[default]
    Unknown,
}

text_choice!(Ynu, "yes/no/unknown value", {
    True => "true",
    False => "false",
    Unknown => "unknown",
});

#[derive(Debug, Clone, PartialEq, Queryable, Selectable, Identifiable)]
#[diesel(table_name = foods)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Food {
    pub id: i32,
}

#[derive(Debug, Clone, PartialEq, Queryable, Selectable, Identifiable, Associations)]
#[diesel(table_name = food_names)]
#[diesel(belongs_to(Food))]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct FoodName {
    pub id: i32,
    pub food_id: i32,
    pub language: String,
    pub name: String,
    pub is_primary: bool,
}

#[derive(Insertable)]
#[diesel(table_name = food_names)]
pub struct NewFoodName<'a> {
    pub food_id: i32,
    pub language: &'a str,
    pub name: &'a str,
    pub is_primary: bool,
}

#[derive(Debug, Clone, PartialEq, Queryable, Selectable, Identifiable)]
#[diesel(table_name = information_sources)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct InformationSource {
    pub id: i32,
    pub name: String,
}

#[derive(Insertable)]
#[diesel(table_name = information_sources)]
pub struct NewInformationSource<'a> {
    pub name: &'a str,
}

// food_id is both the owner reference and the primary key
#[derive(Debug, Clone, PartialEq, Queryable, Selectable, Identifiable, Associations)]
#[diesel(table_name = histamine_infos)]
#[diesel(primary_key(food_id))]
#[diesel(belongs_to(Food))]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct HistamineInfo {
    pub food_id: i32,
    pub compatibility_score: CompatibilityScore,
    pub rapid_histamine_formation: Ynu,
    pub other_amines: Ynu,
    pub liberator: Ynu,
    pub blocker: Ynu,
    pub notes: String,
    pub information_source_id: Option<i32>,
}

#[derive(Insertable, AsChangeset)]
#[diesel(table_name = histamine_infos)]
#[diesel(treat_none_as_null = true)]
pub struct NewHistamineInfo<'a> {
    pub food_id: i32,
    pub compatibility_score: CompatibilityScore,
    pub rapid_histamine_formation: Ynu,
    pub other_amines: Ynu,
    pub liberator: Ynu,
    pub blocker: Ynu,
    pub notes: &'a str,
    pub information_source_id: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Queryable, Selectable, Identifiable)]
#[diesel(table_name = food_types)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct FoodType {
    pub id: i32,
    pub name: String,
}

#[derive(Insertable)]
#[diesel(table_name = food_types)]
pub struct NewFoodType<'a> {
    pub name: &'a str,
}

#[derive(Debug, Clone, PartialEq, Queryable, Selectable, Identifiable, Associations)]
#[diesel(table_name = food_type_relations)]
#[diesel(belongs_to(Food))]
#[diesel(belongs_to(FoodType))]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct FoodTypeRelation {
    pub id: i32,
    pub food_id: i32,
    pub food_type_id: i32,
}

#[derive(Insertable)]
#[diesel(table_name = food_type_relations)]
pub struct NewFoodTypeRelation {
    pub food_id: i32,
    pub food_type_id: i32,
}
