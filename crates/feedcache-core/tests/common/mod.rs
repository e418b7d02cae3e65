//! Behavioural assertions shared by every FeedStore test suite

#![allow(dead_code)]

use chrono::{DateTime, Duration, Utc};
use feedcache_core::{CacheRetrieval, FeedImage, FeedStore, FeedStoreExt};
use std::sync::{Arc, Mutex};
use url::Url;
use uuid::Uuid;

pub fn unique_image() -> FeedImage {
    FeedImage::new(Uuid::new_v4(), any_url())
}

pub fn unique_image_feed() -> Vec<FeedImage> {
    vec![
        unique_image()
            .with_description("a description")
            .with_location("a location"),
        unique_image(),
    ]
}

pub fn any_url() -> Url {
    Url::parse("http://any-url.com").unwrap()
}

pub fn a_timestamp() -> DateTime<Utc> {
    Utc::now() - Duration::days(1)
}

pub async fn expect_retrieve<S: FeedStore + ?Sized>(sut: &S, expected: CacheRetrieval) {
    let retrieved = sut.retrieve_async().await.expect("retrieve failed");
    assert_eq!(retrieved, expected);
}

pub async fn expect_retrieve_twice<S: FeedStore + ?Sized>(sut: &S, expected: CacheRetrieval) {
    expect_retrieve(sut, expected.clone()).await;
    expect_retrieve(sut, expected).await;
}

pub async fn assert_retrieve_delivers_empty_on_empty_cache<S: FeedStore + ?Sized>(sut: &S) {
    expect_retrieve(sut, CacheRetrieval::Empty).await;
}

pub async fn assert_retrieve_has_no_side_effects_on_empty_cache<S: FeedStore + ?Sized>(sut: &S) {
    expect_retrieve_twice(sut, CacheRetrieval::Empty).await;
}

pub async fn assert_retrieve_delivers_found_values_on_non_empty_cache<S: FeedStore + ?Sized>(
    sut: &S,
) {
    let feed = unique_image_feed();
    let timestamp = a_timestamp();

    sut.insert_async(feed.clone(), timestamp).await.expect("insert failed");

    expect_retrieve(sut, CacheRetrieval::Found { feed, timestamp }).await;
}

pub async fn assert_retrieve_has_no_side_effects_on_non_empty_cache<S: FeedStore + ?Sized>(
    sut: &S,
) {
    let feed = unique_image_feed();
    let timestamp = a_timestamp();

    sut.insert_async(feed.clone(), timestamp).await.expect("insert failed");

    expect_retrieve_twice(sut, CacheRetrieval::Found { feed, timestamp }).await;
}

pub async fn assert_insert_delivers_no_error_on_empty_cache<S: FeedStore + ?Sized>(sut: &S) {
    let result = sut.insert_async(unique_image_feed(), a_timestamp()).await;
    assert!(result.is_ok(), "expected successful insert, got {result:?}");
}

pub async fn assert_insert_delivers_no_error_on_non_empty_cache<S: FeedStore + ?Sized>(sut: &S) {
    sut.insert_async(unique_image_feed(), a_timestamp()).await.expect("first insert failed");

    let result = sut.insert_async(unique_image_feed(), Utc::now()).await;
    assert!(result.is_ok(), "expected override to succeed, got {result:?}");
}

pub async fn assert_insert_overrides_previously_inserted_values<S: FeedStore + ?Sized>(sut: &S) {
    sut.insert_async(unique_image_feed(), a_timestamp()).await.expect("first insert failed");

    let latest_feed = unique_image_feed();
    let latest_timestamp = Utc::now();
    sut.insert_async(latest_feed.clone(), latest_timestamp).await.expect("second insert failed");

    expect_retrieve(
        sut,
        CacheRetrieval::Found {
            feed: latest_feed,
            timestamp: latest_timestamp,
        },
    )
    .await;
}

pub async fn assert_delete_delivers_no_error_on_empty_cache<S: FeedStore + ?Sized>(sut: &S) {
    let result = sut.delete_async().await;
    assert!(result.is_ok(), "expected empty cache deletion to succeed, got {result:?}");
}

pub async fn assert_delete_has_no_side_effects_on_empty_cache<S: FeedStore + ?Sized>(sut: &S) {
    sut.delete_async().await.expect("delete failed");

    expect_retrieve(sut, CacheRetrieval::Empty).await;
}

pub async fn assert_delete_delivers_no_error_on_non_empty_cache<S: FeedStore + ?Sized>(sut: &S) {
    sut.insert_async(unique_image_feed(), a_timestamp()).await.expect("insert failed");

    let result = sut.delete_async().await;
    assert!(result.is_ok(), "expected non-empty cache deletion to succeed, got {result:?}");
}

pub async fn assert_delete_empties_previously_inserted_cache<S: FeedStore + ?Sized>(sut: &S) {
    sut.insert_async(unique_image_feed(), a_timestamp()).await.expect("insert failed");
    sut.delete_async().await.expect("delete failed");

    expect_retrieve(sut, CacheRetrieval::Empty).await;
}

/// Issue insert / delete / insert / retrieve without waiting in between.
/// Completions must report in call order and the retrieve must observe the
/// second insert.
pub async fn assert_side_effects_run_serially<S: FeedStore + ?Sized>(sut: &S) {
    let order = Arc::new(Mutex::new(Vec::new()));
    let latest_feed = unique_image_feed();
    let latest_timestamp = Utc::now();

    let o = Arc::clone(&order);
    sut.insert(
        unique_image_feed(),
        a_timestamp(),
        Box::new(move |result| {
            if result.is_ok() {
                o.lock().unwrap().push("insert 1");
            }
        }),
    );

    let o = Arc::clone(&order);
    sut.delete_cached_feed(Box::new(move |result| {
        if result.is_ok() {
            o.lock().unwrap().push("delete");
        }
    }));

    let o = Arc::clone(&order);
    sut.insert(
        latest_feed.clone(),
        latest_timestamp,
        Box::new(move |result| {
            if result.is_ok() {
                o.lock().unwrap().push("insert 2");
            }
        }),
    );

    let o = Arc::clone(&order);
    let expected = CacheRetrieval::Found {
        feed: latest_feed,
        timestamp: latest_timestamp,
    };
    let observed = expected.clone();
    sut.retrieve(Box::new(move |result| {
        if result.ok() == Some(observed) {
            o.lock().unwrap().push("retrieve");
        }
    }));

    // queued behind everything above
    expect_retrieve(sut, expected).await;

    assert_eq!(
        *order.lock().unwrap(),
        vec!["insert 1", "delete", "insert 2", "retrieve"],
        "expected side effects to run serially"
    );
}
