use core::fmt;
use core::str::FromStr;
use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use restoflow_core::{DomainError, Entity};

use crate::recipe::Recipe;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MenuItemId(uuid::Uuid);

restoflow_core::uuid_newtype!(MenuItemId, "MenuItemId");

/// Closed set of menu sections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MenuCategory {
    Starters,
    Mains,
    Desserts,
    Drinks,
}

impl MenuCategory {
    pub const ALL: [MenuCategory; 4] = [
        MenuCategory::Starters,
        MenuCategory::Mains,
        MenuCategory::Desserts,
        MenuCategory::Drinks,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            MenuCategory::Starters => "starters",
            MenuCategory::Mains => "mains",
            MenuCategory::Desserts => "desserts",
            MenuCategory::Drinks => "drinks",
        }
    }
}

impl fmt::Display for MenuCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MenuCategory {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        MenuCategory::ALL
            .into_iter()
            .find(|c| c.as_str() == wanted)
            .ok_or_else(|| DomainError::invalid(format!("unknown menu category '{s}'")))
    }
}

/// A dish or drink that can be ordered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuItem {
    pub id: MenuItemId,
    pub name: String,
    pub description: String,
    pub price: Decimal,
    /// Fraction, e.g. `0.08` for impoconsumo.
    pub tax_rate: Decimal,
    pub category: MenuCategory,
    pub is_available: bool,
    pub recipe: Option<Recipe>,
}

impl Entity for MenuItem {
    type Id = MenuItemId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// The restaurant's menu.
#[derive(Debug, Clone, Default)]
pub struct Menu {
    items: BTreeMap<MenuItemId, MenuItem>,
}

impl Menu {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, item: MenuItem) -> Result<(), DomainError> {
        if item.name.trim().is_empty() {
            return Err(DomainError::invalid("menu item name cannot be empty"));
        }
        if item.price.is_sign_negative() {
            return Err(DomainError::invalid(format!(
                "price of '{}' cannot be negative",
                item.name
            )));
        }
        if item.tax_rate.is_sign_negative() {
            return Err(DomainError::invalid(format!(
                "tax rate of '{}' cannot be negative",
                item.name
            )));
        }
        if self.items.contains_key(&item.id) {
            return Err(DomainError::conflict(format!("menu item {} already exists", item.id)));
        }
        self.items.insert(item.id, item);
        Ok(())
    }

    pub fn get(&self, id: &MenuItemId) -> Result<&MenuItem, DomainError> {
        self.items
            .get(id)
            .ok_or_else(|| DomainError::not_found(format!("menu item {id}")))
    }

    /// Lookup that also refuses items switched off for service.
    pub fn orderable(&self, id: &MenuItemId) -> Result<&MenuItem, DomainError> {
        let item = self.get(id)?;
        if !item.is_available {
            return Err(DomainError::invalid(format!("'{}' is not available", item.name)));
        }
        Ok(item)
    }

    pub fn set_available(&mut self, id: &MenuItemId, available: bool) -> Result<(), DomainError> {
        let item = self
            .items
            .get_mut(id)
            .ok_or_else(|| DomainError::not_found(format!("menu item {id}")))?;
        item.is_available = available;
        Ok(())
    }

    pub fn items(&self) -> impl Iterator<Item = &MenuItem> {
        self.items.values()
    }

    pub fn available(&self) -> impl Iterator<Item = &MenuItem> {
        self.items.values().filter(|i| i.is_available)
    }

    pub fn in_category(&self, category: MenuCategory) -> impl Iterator<Item = &MenuItem> {
        self.items.values().filter(move |i| i.category == category)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn item(name: &str, category: MenuCategory) -> MenuItem {
        MenuItem {
            id: MenuItemId::new(),
            name: name.to_string(),
            description: String::new(),
            price: dec!(12000),
            tax_rate: dec!(0.08),
            category,
            is_available: true,
            recipe: None,
        }
    }

    #[test]
    fn unavailable_items_are_not_orderable() {
        let mut menu = Menu::new();
        let lemonade = item("Coconut lemonade", MenuCategory::Drinks);
        let id = lemonade.id;
        menu.add(lemonade).unwrap();

        assert!(menu.orderable(&id).is_ok());
        menu.set_available(&id, false).unwrap();
        assert!(matches!(menu.orderable(&id), Err(DomainError::InvalidArgument(_))));
        assert_eq!(menu.available().count(), 0);
        assert!(matches!(menu.get(&MenuItemId::new()), Err(DomainError::NotFound(_))));
    }

    #[test]
    fn rejects_negative_price() {
        let mut menu = Menu::new();
        let mut bad = item("Carpaccio", MenuCategory::Starters);
        bad.price = dec!(-1);
        assert!(menu.add(bad).is_err());
        assert!(menu.is_empty());
    }

    #[test]
    fn category_parses_case_insensitively() {
        assert_eq!("Drinks".parse::<MenuCategory>().unwrap(), MenuCategory::Drinks);
        assert!("sides".parse::<MenuCategory>().is_err());
        assert_eq!(serde_json::to_string(&MenuCategory::Mains).unwrap(), "\"mains\"");
    }
}
