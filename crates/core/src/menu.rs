use crate::error::MenuError;
use serde::{Deserialize, Serialize};

const MENU_JSON: &str = include_str!("../data/menu.json");

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MenuItem {
    pub name: String,
    pub price: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl MenuItem {
    pub fn display_price(&self) -> String {
        format!("Rs. {}", self.price)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuCategory {
    pub category: String,
    pub items: Vec<MenuItem>,
}

/// The full static menu, parsed from the embedded table once at startup
/// and never mutated afterwards. Category and item order follow the
/// embedded data.
#[derive(Debug, Clone)]
pub struct Menu {
    categories: Vec<MenuCategory>,
}

impl Menu {
    pub fn load() -> Result<Self, MenuError> {
        Self::from_json(MENU_JSON)
    }

    pub fn from_json(json: &str) -> Result<Self, MenuError> {
        let categories: Vec<MenuCategory> = serde_json::from_str(json)?;
        let menu = Self { categories };
        menu.validate()?;
        Ok(menu)
    }

    fn validate(&self) -> Result<(), MenuError> {
        if self.categories.is_empty() {
            return Err(MenuError::Empty);
        }

        for category in &self.categories {
            if category.items.is_empty() {
                return Err(MenuError::EmptyCategory(category.category.clone()));
            }

            for item in &category.items {
                if item.name.trim().is_empty() {
                    return Err(MenuError::EmptyName(category.category.clone()));
                }
                if item.price == 0 {
                    return Err(MenuError::NonPositivePrice {
                        category: category.category.clone(),
                        item: item.name.clone(),
                    });
                }
            }
        }

        Ok(())
    }

    pub fn category_names(&self) -> Vec<&str> {
        self.categories
            .iter()
            .map(|category| category.category.as_str())
            .collect()
    }

    pub fn category(&self, name: &str) -> Option<&MenuCategory> {
        self.categories
            .iter()
            .find(|category| category.category.eq_ignore_ascii_case(name))
    }

    pub fn categories(&self) -> &[MenuCategory] {
        &self.categories
    }
}
