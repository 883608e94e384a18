//! Response shapes. Identity of the histamine record and its source link are
//! kept out of the nested food view on purpose; only the flattened name
//! lookup resolves the source name.

use serde::{Deserialize, Serialize};

use crate::models::{CompatibilityScore, FoodName, FoodType, HistamineInfo, Ynu};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodResponse {
    pub id: i32,
    pub food_names: Vec<FoodNameResponse>,
    pub histamine_info: Option<HistamineInfoResponse>,
    pub food_types: Vec<FoodTypeResponse>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodNameResponse {
    pub language: String,
    pub name: String,
    pub is_primary: bool,
}

impl From<FoodName> for FoodNameResponse {
    fn from(name: FoodName) -> Self {
        Self {
            language: name.language,
            name: name.name,
            is_primary: name.is_primary,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistamineInfoResponse {
    pub compatibility_score: CompatibilityScore,
    pub rapid_histamine_formation: Ynu,
    pub other_amines: Ynu,
    pub liberator: Ynu,
    pub blocker: Ynu,
    pub notes: String,
}

impl From<HistamineInfo> for HistamineInfoResponse {
    fn from(info: HistamineInfo) -> Self {
        Self {
            compatibility_score: info.compatibility_score,
            rapid_histamine_formation: info.rapid_histamine_formation,
            other_amines: info.other_amines,
            liberator: info.liberator,
            blocker: info.blocker,
            notes: info.notes,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodTypeResponse {
    pub food_type_name: String,
}

impl From<FoodType> for FoodTypeResponse {
    fn from(food_type: FoodType) -> Self {
        Self {
            food_type_name: food_type.name,
        }
    }
}

/// Result of a name lookup: the matched name flattened together with the
/// food's histamine data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodHistamineResponse {
    pub food: String,
    pub language: String,
    pub compatibility_score: CompatibilityScore,
    pub rapid_histamine_formation: Ynu,
    pub other_amines: Ynu,
    pub liberator: Ynu,
    pub blocker: Ynu,
    pub notes: String,
    pub information_source: Option<String>,
}

impl FoodHistamineResponse {
    pub fn new(name: FoodName, info: HistamineInfo, information_source: Option<String>) -> Self {
        Self {
            food: name.name,
            language: name.language,
            compatibility_score: info.compatibility_score,
            rapid_histamine_formation: info.rapid_histamine_formation,
            other_amines: info.other_amines,
            liberator: info.liberator,
            blocker: info.blocker,
            notes: info.notes,
            information_source,
        }
    }
}
