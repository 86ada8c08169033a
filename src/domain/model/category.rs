use crate::domain::schema::Schema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewCategory {
    #[validate(length(min = 1, message = "must not be empty"))]
    pub name: String,
}

impl Schema for NewCategory {
    const REQUIRED: &'static [&'static str] = &["name"];
}

impl NewCategory {
    pub fn into_document(self, id: Uuid) -> Category {
        Category {
            id,
            name: self.name,
        }
    }
}
