use fxhash::FxHashMap;

use crate::{define_index_newtype, json::request::JsonCylinderType};

define_index_newtype!(CylinderIdx, CylinderType);

#[derive(Debug, Clone, PartialEq)]
pub struct CylinderType {
    pub id: String,
    pub full_weight_kg: f64,
    pub empty_weight_kg: f64,
}

/// Cylinder types of a request, addressable by id.
#[derive(Debug, Clone, Default)]
pub struct CylinderCatalog {
    types: Vec<CylinderType>,
    by_id: FxHashMap<String, CylinderIdx>,
}

impl CylinderCatalog {
    /// A repeated id replaces the weights of the earlier entry.
    pub fn from_json(types: &[JsonCylinderType]) -> Self {
        let mut catalog = CylinderCatalog::default();

        for cylinder in types {
            let cylinder_type = CylinderType {
                id: cylinder.id.clone(),
                full_weight_kg: cylinder.full_weight_kg,
                empty_weight_kg: cylinder.empty_weight_kg,
            };

            match catalog.by_id.get(&cylinder.id) {
                Some(&idx) => catalog.types[idx] = cylinder_type,
                None => {
                    catalog
                        .by_id
                        .insert(cylinder.id.clone(), CylinderIdx::new(catalog.types.len()));
                    catalog.types.push(cylinder_type);
                }
            }
        }

        catalog
    }

    pub fn find(&self, id: &str) -> Option<CylinderIdx> {
        self.by_id.get(id).copied()
    }

    pub fn get(&self, idx: CylinderIdx) -> Option<&CylinderType> {
        self.types.get(idx.get())
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CylinderType> {
        self.types.iter()
    }
}
