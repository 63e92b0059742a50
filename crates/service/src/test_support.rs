#![cfg(test)]
use std::{path::PathBuf, sync::Arc};

use models::Beer;

use crate::errors::ServiceError;
use crate::store::{BeerStore, Upserted};

/// Fresh path inside its own temp directory; the file itself does not exist yet.
pub fn temp_store_path() -> PathBuf {
    std::env::temp_dir()
        .join(format!("beer_store_{}", uuid::Uuid::new_v4()))
        .join("beers.json")
}

fn names(beers: Vec<Beer>) -> Vec<String> {
    let mut out: Vec<String> = beers.into_iter().map(|b| b.name).collect();
    out.sort();
    out
}

/// Behaviour every `BeerStore` must share, starting from an empty store.
pub async fn assert_store_contract(store: &dyn BeerStore) -> anyhow::Result<()> {
    assert!(store.list().await.is_empty());
    assert!(matches!(store.get("ipa").await, Err(ServiceError::NotFound(_))));

    let ipa = Beer::new("ipa").with_style("IPA").with_abv(6.2);
    store.add(ipa.clone()).await?;
    assert_eq!(store.get("ipa").await?, ipa);
    assert_eq!(names(store.list().await), vec!["ipa"]);

    // duplicate add leaves the original in place
    let dup = Beer::new("ipa").with_style("NEIPA");
    assert!(matches!(store.add(dup).await, Err(ServiceError::AlreadyExists(_))));
    assert_eq!(store.get("ipa").await?, ipa);
    assert_eq!(store.list().await.len(), 1);

    // update of an absent name changes nothing
    assert!(matches!(store.update(Beer::new("lager")).await, Err(ServiceError::NotFound(_))));
    assert!(matches!(store.get("lager").await, Err(ServiceError::NotFound(_))));
    assert_eq!(store.list().await.len(), 1);

    let session = Beer::new("ipa").with_style("Session IPA");
    store.update(session.clone()).await?;
    assert_eq!(store.get("ipa").await?, session);

    assert_eq!(store.upsert(Beer::new("stout")).await?, Upserted::Created);
    assert_eq!(store.upsert(Beer::new("stout").with_style("Imperial")).await?, Upserted::Updated);
    assert_eq!(store.get("stout").await?.style(), Some("Imperial"));
    assert_eq!(names(store.list().await), vec!["ipa", "stout"]);

    store.remove("ipa").await?;
    assert!(matches!(store.get("ipa").await, Err(ServiceError::NotFound(_))));
    assert!(matches!(store.remove("ipa").await, Err(ServiceError::NotFound(_))));
    assert_eq!(names(store.list().await), vec!["stout"]);
    Ok(())
}

/// Many concurrent upserts of one name: exactly one of them creates it.
pub async fn assert_concurrent_upsert_creates_once(store: Arc<dyn BeerStore>) -> anyhow::Result<()> {
    const WRITERS: usize = 32;

    let tasks: Vec<_> = (0..WRITERS)
        .map(|i| {
            let store = Arc::clone(&store);
            tokio::spawn(async move { store.upsert(Beer::new("ipa").with_field("batch", i as u64)).await })
        })
        .collect();

    let mut created = 0;
    let mut updated = 0;
    for task in tasks {
        match task.await?? {
            Upserted::Created => created += 1,
            Upserted::Updated => updated += 1,
        }
    }
    assert_eq!(created, 1);
    assert_eq!(updated, WRITERS - 1);
    assert_eq!(names(store.list().await), vec!["ipa"]);
    Ok(())
}
