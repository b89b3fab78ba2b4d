//! Static lookup collaborator. Stands in for a remote fragrance database;
//! the renderer only depends on the record shape it returns.

use crate::record::FragranceRecord;

pub fn fetch_by_name(name: &str) -> FragranceRecord {
    let name = name.trim().to_string();
    let description =
        format!("{name} is a rich, smoky, long-lasting evening scent built for cool weather.");
    FragranceRecord {
        name,
        longevity: "8+ HRS".to_string(),
        projection: "2+ FEET".to_string(),
        when: vec!["Fall".to_string(), "Winter".to_string()],
        where_: vec!["Evenings".to_string(), "Formal".to_string(), "Night Outs".to_string()],
        profile: vec!["Woody".to_string(), "Smoky".to_string(), "Aromatic".to_string()],
        notes: vec!["Cypriol".to_string(), "Amyris".to_string(), "Atlas Cedar".to_string()],
        year: "2024".to_string(),
        rating: "8.1/10".to_string(),
        description,
    }
}
