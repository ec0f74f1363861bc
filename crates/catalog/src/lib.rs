//! Menu catalog: dishes, their categories and the recipes that tie each
//! dish to the ingredients it consumes.

pub mod menu;
pub mod recipe;

pub use menu::{Menu, MenuCategory, MenuItem, MenuItemId};
pub use recipe::{Recipe, RecipeLine};
