use std::rc::Rc;

use catalog_foundation::CatalogItem;

/// A model listing as shown in the catalog.
#[derive(Clone, Debug, PartialEq)]
pub struct ModelRecord {
    pub id: u64,
    pub name: String,
    pub author: String,
    pub downloads: u64,
}

impl ModelRecord {
    pub fn new(id: u64) -> Self {
        const AUTHORS: [&str; 4] = ["acme-labs", "openweights", "tinyml", "northwind"];
        Self {
            id,
            name: format!("model-{id:05}"),
            author: AUTHORS[(id % AUTHORS.len() as u64) as usize].to_string(),
            downloads: (id * 7_919) % 100_000,
        }
    }
}

impl CatalogItem for ModelRecord {
    type Id = u64;

    fn id(&self) -> u64 {
        self.id
    }
}

/// `count` records with ids `0..count`.
pub fn sample_models(count: usize) -> Rc<[ModelRecord]> {
    (0..count as u64).map(ModelRecord::new).collect()
}

/// One record per id, in the given order. Repeated ids are kept.
pub fn models_with_ids(ids: impl IntoIterator<Item = u64>) -> Rc<[ModelRecord]> {
    ids.into_iter().map(ModelRecord::new).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_models_are_ordered_by_id() {
        let models = sample_models(5);
        let ids: Vec<u64> = models.iter().map(CatalogItem::id).collect();
        assert_eq!(ids, vec![0, 1, 2, 3, 4]);
        assert_eq!(models[3].name, "model-00003");
    }

    #[test]
    fn test_models_with_ids_keeps_duplicates() {
        let models = models_with_ids([4, 4, 9]);
        assert_eq!(models.len(), 3);
        assert_eq!(models[0], models[1]);
    }
}
