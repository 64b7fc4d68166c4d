//! Runs the async work `App` asks for and turns the results into events.

use futures::future::join_all;

use crate::feed::TokenSource;
use crate::types::{AppEvent, Effect};

/// Execute one effect against a token source. Every effect produces exactly
/// one event; errors are flattened to strings since the app only logs them.
pub async fn run_effect<S: TokenSource + ?Sized>(source: &S, effect: Effect) -> AppEvent {
    match effect {
        Effect::FetchTokens { seq, category, url } => {
            let result = source.fetch_tokens(&url).await.map_err(|e| e.to_string());
            AppEvent::TokensLoaded { seq, category, result }
        }
        Effect::DiscoverCategories { listing_url, raw_base_url } => {
            let result = source
                .list_categories(&listing_url, &raw_base_url)
                .await
                .map_err(|e| e.to_string());
            AppEvent::CategoriesLoaded(result)
        }
        Effect::ProbeLogo { url } => {
            let ok = source.probe_logo(&url).await;
            AppEvent::LogoProbed { url, ok }
        }
    }
}

/// Run a batch of effects concurrently; events come back in effect order.
pub async fn run_effects<S: TokenSource + ?Sized>(source: &S, effects: Vec<Effect>) -> Vec<AppEvent> {
    join_all(effects.into_iter().map(|e| run_effect(source, e))).await
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use super::*;
    use crate::categories::Category;
    use crate::feed::{FeedError, FeedOutcome};
    use async_trait::async_trait;

    struct Failing;

    #[async_trait]
    impl TokenSource for Failing {
        async fn fetch_tokens(&self, url: &str) -> Result<FeedOutcome, FeedError> {
            Err(FeedError::Status { url: url.to_string(), status: 503 })
        }

        async fn list_categories(&self, _: &str, raw: &str) -> Result<Vec<Category>, FeedError> {
            Ok(vec![Category { name: "bsc".into(), url: format!("{raw}bsc.json") }])
        }

        async fn probe_logo(&self, _url: &str) -> bool {
            false
        }
    }

    #[tokio::test]
    async fn fetch_error_keeps_sequence_and_category() {
        let ev = run_effect(
            &Failing,
            Effect::FetchTokens { seq: 7, category: "Bsc".into(), url: "https://f.test/bsc.json".into() },
        )
        .await;
        match ev {
            AppEvent::TokensLoaded { seq, category, result } => {
                assert_eq!(seq, 7);
                assert_eq!(category, "Bsc");
                assert!(result.unwrap_err().contains("503"));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[tokio::test]
    async fn discovery_and_probe_map_to_events() {
        let ev = run_effect(
            &Failing,
            Effect::DiscoverCategories { listing_url: "https://l.test".into(), raw_base_url: "https://r.test/".into() },
        )
        .await;
        let AppEvent::CategoriesLoaded(Ok(list)) = ev else { panic!("unexpected {ev:?}") };
        assert_eq!(list[0].url, "https://r.test/bsc.json");

        let ev = run_effect(&Failing, Effect::ProbeLogo { url: "https://x.test/a.png".into() }).await;
        assert!(matches!(ev, AppEvent::LogoProbed { ok: false, .. }));
    }

    #[tokio::test]
    async fn batch_preserves_order() {
        let events = run_effects(
            &Failing,
            vec![
                Effect::ProbeLogo { url: "https://x.test/a.png".into() },
                Effect::FetchTokens { seq: 1, category: "Bsc".into(), url: "https://f.test".into() },
            ],
        )
        .await;
        assert_eq!(events.len(), 2);
        assert!(matches!(events[0], AppEvent::LogoProbed { .. }));
        assert!(matches!(events[1], AppEvent::TokensLoaded { seq: 1, .. }));
    }
}
