mod common;

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use reeltaste_api::db::MemoryInteractionStore;
use reeltaste_api::error::AppError;
use reeltaste_api::models::{category_by_id, CategoryItem, FailureKind, RatingAction, RefreshOutcome};
use reeltaste_api::services::interactions::apply_rating;
use reeltaste_api::services::orchestrator::{Phase, RecommendationSession};
use reeltaste_api::services::random::RandomSource;

use common::{movie, movie_in_genre, posterless, ScriptedCatalog};

fn session(
    catalog: ScriptedCatalog,
    store: &Arc<MemoryInteractionStore>,
    seed: u64,
) -> RecommendationSession {
    RecommendationSession::new(Arc::new(catalog), Arc::clone(store), RandomSource::seeded(seed))
}

fn sci_fi() -> CategoryItem {
    *category_by_id("sci_fi").unwrap()
}

fn deck_ids(items: &[reeltaste_api::models::CandidateMovie]) -> Vec<u64> {
    items.iter().map(|m| m.id).collect()
}

async fn like_comedies(store: &MemoryInteractionStore, ids: std::ops::Range<u64>) {
    for id in ids {
        apply_rating(store, &movie_in_genre(id, 35), RatingAction::Like)
            .await
            .unwrap();
    }
}

#[tokio::test]
async fn favorite_slot_tag_wins_when_slots_overlap() {
    let store = Arc::new(MemoryInteractionStore::new());
    like_comedies(&store, 1..5).await;

    // Film 500 comes back from both the favorite-genre slot and the regional
    // slot; the merged deck must keep the earlier slot's reason.
    let catalog = ScriptedCatalog::new().on_discover(|query| {
        if query.include_genres == [35] && query.min_vote_count == Some(1000) {
            Ok(vec![movie(500), movie(501), movie(502)])
        } else if query.original_language.as_deref() == Some("zh") {
            Ok(vec![movie(500), movie(510), movie(511)])
        } else {
            Ok(Vec::new())
        }
    });

    let session = session(catalog, &store, 3);
    let outcome = session.refresh(true).await.unwrap();

    let RefreshOutcome::Ready { items } = outcome else {
        panic!("expected a dealt deck");
    };
    assert_eq!(
        deck_ids(&items).into_iter().collect::<HashSet<_>>(),
        [500, 501, 502, 510, 511].into_iter().collect()
    );

    let contested = items.iter().find(|m| m.id == 500).unwrap();
    assert_eq!(contested.recommendation_reason.as_deref(), Some("Hidden gem"));
    let regional = items.iter().find(|m| m.id == 510).unwrap();
    assert_eq!(
        regional.recommendation_reason.as_deref(),
        Some("Chinese-language hit")
    );
}

#[tokio::test]
async fn deck_excludes_seen_watchlisted_and_posterless_films() {
    let store = Arc::new(MemoryInteractionStore::new());
    apply_rating(store.as_ref(), &movie(100), RatingAction::Like)
        .await
        .unwrap();
    apply_rating(store.as_ref(), &movie(101), RatingAction::AddToWatch)
        .await
        .unwrap();

    let catalog = ScriptedCatalog::new().on_discover(|query| {
        if query.include_genres == [878] {
            Ok(vec![
                movie(100),
                movie(101),
                posterless(102),
                movie(103),
                movie(104),
            ])
        } else {
            Ok(Vec::new())
        }
    });

    let session = session(catalog, &store, 4);
    let outcome = session.change_category(Some(sci_fi())).await.unwrap();

    let RefreshOutcome::Ready { items } = outcome else {
        panic!("expected a dealt deck");
    };
    assert_eq!(
        deck_ids(&items).into_iter().collect::<HashSet<_>>(),
        [103, 104].into_iter().collect()
    );
}

#[tokio::test]
async fn reset_deck_caps_at_fifteen_cards() {
    let store = Arc::new(MemoryInteractionStore::new());
    let catalog = ScriptedCatalog::new()
        .on_discover(|_| Ok((200..220).map(movie).collect()));

    let session = session(catalog, &store, 5);
    let outcome = session.change_category(Some(sci_fi())).await.unwrap();

    let RefreshOutcome::Ready { items } = outcome else {
        panic!("expected a dealt deck");
    };
    assert_eq!(items.len(), 15);

    let ids: HashSet<u64> = deck_ids(&items).into_iter().collect();
    assert_eq!(ids.len(), 15);
    assert!(ids.iter().all(|id| (200..220).contains(id)));
    assert_eq!(session.current_batch().await.len(), 15);
}

#[tokio::test]
async fn same_seed_replays_the_same_deck_order() {
    let catalog_a = ScriptedCatalog::new()
        .on_discover(|_| Ok((200..220).map(movie).collect()));
    let catalog_b = ScriptedCatalog::new()
        .on_discover(|_| Ok((200..220).map(movie).collect()));

    let store_a = Arc::new(MemoryInteractionStore::new());
    let store_b = Arc::new(MemoryInteractionStore::new());
    let session_a = session(catalog_a, &store_a, 42);
    let session_b = session(catalog_b, &store_b, 42);

    let RefreshOutcome::Ready { items: deck_a } =
        session_a.change_category(Some(sci_fi())).await.unwrap()
    else {
        panic!("expected a dealt deck");
    };
    let RefreshOutcome::Ready { items: deck_b } =
        session_b.change_category(Some(sci_fi())).await.unwrap()
    else {
        panic!("expected a dealt deck");
    };

    assert_eq!(deck_ids(&deck_a), deck_ids(&deck_b));
}

#[tokio::test]
async fn load_more_appends_only_new_ids_and_keeps_deck_prefix() {
    let store = Arc::new(MemoryInteractionStore::new());
    // Every page shares film 99; the rest of the page is page-specific.
    let catalog = ScriptedCatalog::new().on_discover(|query| {
        let base = 300 + u64::from(query.page) * 10;
        let mut page = vec![movie(99)];
        page.extend((base..base + 4).map(movie));
        Ok(page)
    });

    let session = session(catalog, &store, 6);
    let RefreshOutcome::Ready { items: first } =
        session.change_category(Some(sci_fi())).await.unwrap()
    else {
        panic!("expected a dealt deck");
    };
    assert_eq!(first.len(), 5);

    let RefreshOutcome::Ready { items: extended } = session.load_more().await.unwrap() else {
        panic!("expected a dealt deck");
    };

    let first_ids = deck_ids(&first);
    let extended_ids = deck_ids(&extended);
    assert_eq!(&extended_ids[..first_ids.len()], &first_ids[..]);
    assert_eq!(extended_ids.iter().filter(|&&id| id == 99).count(), 1);
    assert!(extended_ids.len() == 5 || extended_ids.len() == 9);
}

#[tokio::test]
async fn upcoming_deck_keeps_release_order() {
    let store = Arc::new(MemoryInteractionStore::new());
    let catalog = ScriptedCatalog::new().on_discover(|query| {
        if query.release_after.is_some() {
            Ok(vec![movie(201), movie(202), movie(203), movie(204), movie(205)])
        } else {
            Ok(Vec::new())
        }
    });

    let session = session(catalog, &store, 7);
    let upcoming = *category_by_id("upcoming").unwrap();
    let outcome = session.change_category(Some(upcoming)).await.unwrap();

    let RefreshOutcome::Ready { items } = outcome else {
        panic!("expected a dealt deck");
    };
    assert_eq!(deck_ids(&items), vec![201, 202, 203, 204, 205]);
}

#[tokio::test]
async fn failing_similar_slot_does_not_sink_a_smart_refresh() {
    let store = Arc::new(MemoryInteractionStore::new());
    like_comedies(&store, 1..5).await;

    let catalog = ScriptedCatalog::new()
        .on_similar(|_| Err(AppError::Catalog("similar endpoint down".to_string())))
        .on_discover(|query| {
            if query.include_genres == [35] && query.min_vote_count == Some(1000) {
                Ok(vec![movie(500), movie(501), movie(502)])
            } else {
                Ok(Vec::new())
            }
        });

    let session = session(catalog, &store, 8);
    let outcome = session.refresh(true).await.unwrap();

    let RefreshOutcome::Ready { items } = outcome else {
        panic!("expected a dealt deck");
    };
    assert_eq!(
        deck_ids(&items).into_iter().collect::<HashSet<_>>(),
        [500, 501, 502].into_iter().collect()
    );
    assert_eq!(session.phase().await, Phase::Ready);
}

#[tokio::test]
async fn smart_mode_with_nothing_to_deal_fails_only_on_reset() {
    let store = Arc::new(MemoryInteractionStore::new());
    let session = session(ScriptedCatalog::new(), &store, 9);

    // Extending an empty deck with nothing available is not an error.
    let outcome = session.refresh(false).await.unwrap();
    assert_eq!(outcome, RefreshOutcome::Ready { items: Vec::new() });
    assert_eq!(session.phase().await, Phase::Ready);

    let outcome = session.refresh(true).await.unwrap();
    let RefreshOutcome::Failed { kind, .. } = outcome else {
        panic!("expected a failure");
    };
    assert_eq!(kind, FailureKind::NoResults);
    assert_eq!(session.phase().await, Phase::Failed);
}

#[tokio::test]
async fn exhausted_category_reports_a_benign_failure() {
    let store = Arc::new(MemoryInteractionStore::new());
    let session = session(ScriptedCatalog::new(), &store, 10);

    let outcome = session.change_category(Some(sci_fi())).await.unwrap();

    let RefreshOutcome::Failed { kind, message } = outcome else {
        panic!("expected a failure");
    };
    assert_eq!(kind, FailureKind::CategoryExhausted);
    assert!(message.contains("Sci-Fi"));
    assert_eq!(session.phase().await, Phase::Failed);
}

#[tokio::test]
async fn category_network_failure_surfaces_only_on_reset() {
    let store = Arc::new(MemoryInteractionStore::new());
    let fail = Arc::new(AtomicBool::new(false));
    let fail_in_script = Arc::clone(&fail);

    let catalog = ScriptedCatalog::new().on_discover(move |_| {
        if fail_in_script.load(Ordering::SeqCst) {
            Err(AppError::Catalog("catalog down".to_string()))
        } else {
            Ok(vec![movie(700), movie(701)])
        }
    });

    let session = session(catalog, &store, 11);
    let RefreshOutcome::Ready { items } = session.change_category(Some(sci_fi())).await.unwrap()
    else {
        panic!("expected a dealt deck");
    };
    let dealt: HashSet<u64> = deck_ids(&items).into_iter().collect();
    assert_eq!(dealt, [700, 701].into_iter().collect());

    fail.store(true, Ordering::SeqCst);

    // A failed extension keeps the current deck on the table.
    let RefreshOutcome::Ready { items } = session.load_more().await.unwrap() else {
        panic!("expected the current deck back");
    };
    assert_eq!(deck_ids(&items).into_iter().collect::<HashSet<_>>(), dealt);

    // A failed rebuild reports the network problem and leaves nothing dealt.
    let RefreshOutcome::Failed { kind, .. } = session.refresh(true).await.unwrap() else {
        panic!("expected a failure");
    };
    assert_eq!(kind, FailureKind::Network);
    assert_eq!(session.phase().await, Phase::Failed);
    assert!(session.current_batch().await.is_empty());
}

#[tokio::test]
async fn second_reset_deals_an_independent_deck() {
    let store = Arc::new(MemoryInteractionStore::new());
    let calls = Arc::new(AtomicU64::new(0));
    let calls_in_script = Arc::clone(&calls);

    let catalog = ScriptedCatalog::new().on_discover(move |_| {
        let call = calls_in_script.fetch_add(1, Ordering::SeqCst);
        let base = (call + 1) * 1000;
        Ok((base..base + 5).map(movie).collect())
    });

    let session = session(catalog, &store, 12);
    let RefreshOutcome::Ready { items: first } =
        session.change_category(Some(sci_fi())).await.unwrap()
    else {
        panic!("expected a dealt deck");
    };
    let RefreshOutcome::Ready { items: second } = session.refresh(true).await.unwrap() else {
        panic!("expected a dealt deck");
    };

    let first_ids: HashSet<u64> = deck_ids(&first).into_iter().collect();
    let second_ids: HashSet<u64> = deck_ids(&second).into_iter().collect();
    assert_eq!(second_ids.len(), 5);
    assert!(first_ids.is_disjoint(&second_ids));
}

#[tokio::test]
async fn overtaken_refresh_reports_superseded_and_leaves_the_deck_alone() {
    let store = Arc::new(MemoryInteractionStore::new());
    let calls = Arc::new(AtomicU64::new(0));
    let calls_in_script = Arc::clone(&calls);
    let slow = Arc::new(AtomicBool::new(false));

    let catalog = ScriptedCatalog::new()
        .on_discover(move |_| {
            let call = calls_in_script.fetch_add(1, Ordering::SeqCst);
            let base = (call + 1) * 1000;
            Ok((base..base + 5).map(movie).collect())
        })
        .with_slow_discover(Arc::clone(&slow), Duration::from_millis(500));

    let session = Arc::new(session(catalog, &store, 13));
    session.change_category(Some(sci_fi())).await.unwrap();

    slow.store(true, Ordering::SeqCst);
    let overtaken = tokio::spawn({
        let session = Arc::clone(&session);
        async move { session.refresh(true).await }
    });

    tokio::time::sleep(Duration::from_millis(100)).await;
    slow.store(false, Ordering::SeqCst);
    let winner = session.refresh(true).await.unwrap();
    let overtaken = overtaken.await.unwrap().unwrap();

    assert_eq!(overtaken, RefreshOutcome::Superseded);
    let RefreshOutcome::Ready { items } = winner else {
        panic!("expected the newer refresh to deal");
    };
    assert_eq!(
        deck_ids(&session.current_batch().await),
        deck_ids(&items)
    );
    assert_eq!(session.phase().await, Phase::Ready);
}

#[tokio::test]
async fn onboarding_deck_ignores_seen_history() {
    let store = Arc::new(MemoryInteractionStore::new());
    apply_rating(store.as_ref(), &movie_in_genre(100, 35), RatingAction::Like)
        .await
        .unwrap();

    let catalog = ScriptedCatalog::new().on_discover(|query| match query.min_vote_count {
        Some(3000) => Ok(vec![movie(100), movie(120)]),
        Some(1000) => Ok(vec![movie(121)]),
        Some(500) => Ok(vec![movie(122)]),
        _ => Ok(Vec::new()),
    });

    let session = session(catalog, &store, 14);
    let outcome = session.onboarding_batch().await;

    let RefreshOutcome::Ready { items } = outcome else {
        panic!("expected a starter deck");
    };
    let ids: HashSet<u64> = deck_ids(&items).into_iter().collect();
    // The starter deck rates films the user already knows; film 100 stays.
    assert_eq!(ids, [100, 120, 121, 122].into_iter().collect());
    assert!(items
        .iter()
        .all(|m| m.recommendation_reason.as_deref() == Some("Drama")));
}

#[tokio::test]
async fn inspiration_deck_excludes_seen_watchlist_and_caller_ids() {
    let store = Arc::new(MemoryInteractionStore::new());
    apply_rating(store.as_ref(), &movie(100), RatingAction::Like)
        .await
        .unwrap();
    apply_rating(store.as_ref(), &movie(101), RatingAction::AddToWatch)
        .await
        .unwrap();

    let catalog = ScriptedCatalog::new().on_discover(|query| match query.min_vote_count {
        Some(500) => Ok(vec![movie(100), movie(103)]),
        Some(100) => Ok(vec![movie(102), movie(105)]),
        None => Ok(vec![movie(101), posterless(104)]),
        _ => Ok(Vec::new()),
    });

    let session = session(catalog, &store, 15);
    let already_dealt: HashSet<u64> = [102].into_iter().collect();
    let outcome = session.inspiration_batch(&already_dealt).await.unwrap();

    let RefreshOutcome::Ready { items } = outcome else {
        panic!("expected a blind-box deck");
    };
    let ids: HashSet<u64> = deck_ids(&items).into_iter().collect();
    assert_eq!(ids, [103, 104, 105].into_iter().collect());

    let stock = [
        "Inspiration pick",
        "Blind-box surprise",
        "Worth a try",
        "Just press play",
    ];
    assert!(items
        .iter()
        .all(|m| stock.contains(&m.recommendation_reason.as_deref().unwrap())));
}
