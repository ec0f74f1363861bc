use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use restoflow_core::{DomainError, Entity};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SupplierId(uuid::Uuid);

restoflow_core::uuid_newtype!(SupplierId, "SupplierId");

/// Vendor an ingredient is bought from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Supplier {
    pub id: SupplierId,
    pub name: String,
    pub contact_name: String,
    pub phone: String,
    pub email: String,
}

impl Entity for Supplier {
    type Id = SupplierId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Suppliers known to one restaurant.
///
/// Ingredients only hold a weak `SupplierId`; a dangling reference resolves
/// to [`SupplierDirectory::UNASSIGNED`] instead of failing.
#[derive(Debug, Clone, Default)]
pub struct SupplierDirectory {
    suppliers: BTreeMap<SupplierId, Supplier>,
}

impl SupplierDirectory {
    pub const UNASSIGNED: &'static str = "Unassigned supplier";

    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, supplier: Supplier) -> Result<(), DomainError> {
        if supplier.name.trim().is_empty() {
            return Err(DomainError::invalid("supplier name cannot be empty"));
        }
        if self.suppliers.contains_key(&supplier.id) {
            return Err(DomainError::conflict(format!(
                "supplier {} already registered",
                supplier.id
            )));
        }
        self.suppliers.insert(supplier.id, supplier);
        Ok(())
    }

    pub fn get(&self, id: &SupplierId) -> Option<&Supplier> {
        self.suppliers.get(id)
    }

    pub fn display_name(&self, id: Option<SupplierId>) -> &str {
        id.and_then(|id| self.suppliers.get(&id))
            .map(|s| s.name.as_str())
            .unwrap_or(Self::UNASSIGNED)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Supplier> {
        self.suppliers.values()
    }

    pub fn len(&self) -> usize {
        self.suppliers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.suppliers.is_empty()
    }
}
