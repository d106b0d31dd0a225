use std::{collections::HashSet, sync::Arc, time::Duration};

use tokio::task::JoinSet;

use crate::{
    error::{AppError, AppResult},
    models::{
        BudgetTier, Interest, PersonalizedParameters, PersonalizedRequest, PersonalizedResponse,
        Place,
    },
    services::{
        auth::Caller,
        providers::{NearbyQuery, PlacesProvider, DEFAULT_SEARCH_RADIUS},
    },
};

/// Tunables for the personalized recommendation aggregator
#[derive(Debug, Clone, PartialEq)]
pub struct RecommendationSettings {
    /// Places kept per interest after budget filtering
    pub per_interest_limit: usize,
    /// Length cap on the final list
    pub max_results: usize,
    /// Interests accepted per request; each costs one provider call
    pub max_interests: usize,
    /// Nearby-search radius in meters
    pub search_radius: u32,
    /// Timeout applied to each provider call independently
    pub provider_timeout: Duration,
}

impl Default for RecommendationSettings {
    fn default() -> Self {
        Self {
            per_interest_limit: 5,
            max_results: 20,
            max_interests: 10,
            search_radius: DEFAULT_SEARCH_RADIUS,
            provider_timeout: Duration::from_secs(5),
        }
    }
}

/// Generates personalized place recommendations
///
/// ## Algorithm
/// 1. Validate coordinates, budget tier and interest count (before any call)
/// 2. For each interest, in caller order, search the first mapped place type
///    concurrently; a failed or timed-out search contributes nothing
/// 3. Per interest: drop places outside the budget, keep the first N
/// 4. De-duplicate by place id (first occurrence wins)
/// 5. Stable sort by rating descending, absent rating ranks as 0
/// 6. Truncate to the result cap
#[tracing::instrument(
    skip_all,
    fields(user_id = %caller.user_id, interests = request.interests.len(), budget = %request.budget)
)]
pub async fn personalized_recommendations(
    provider: Arc<dyn PlacesProvider>,
    settings: &RecommendationSettings,
    caller: &Caller,
    request: PersonalizedRequest,
) -> AppResult<PersonalizedResponse> {
    request.location.validate()?;
    let budget: BudgetTier = request.budget.parse()?;

    if request.interests.len() > settings.max_interests {
        return Err(AppError::InvalidInput(format!(
            "At most {} interests are allowed, got {}",
            settings.max_interests,
            request.interests.len()
        )));
    }

    let interests: Vec<Interest> = request
        .interests
        .iter()
        .map(|tag| Interest::parse(tag))
        .collect();

    let per_interest = fetch_candidates(provider, settings, &request, &interests).await;
    let recommendations = merge_candidates(per_interest, budget, settings);

    tracing::info!(
        recommendations = recommendations.len(),
        "Personalized recommendations generated"
    );

    Ok(PersonalizedResponse {
        recommendations,
        parameters: PersonalizedParameters {
            interests: request.interests,
            budget,
            location: request.location,
        },
    })
}

/// Fans out one nearby search per interest and returns the results in
/// interest order. Failures are logged and yield an empty list for that
/// interest. Searches still in flight are aborted if this future is dropped.
async fn fetch_candidates(
    provider: Arc<dyn PlacesProvider>,
    settings: &RecommendationSettings,
    request: &PersonalizedRequest,
    interests: &[Interest],
) -> Vec<Vec<Place>> {
    let mut tasks = JoinSet::new();

    for (index, interest) in interests.iter().enumerate() {
        let query = NearbyQuery::new(request.location, interest.primary_place_type().as_str())
            .with_radius(settings.search_radius);
        let provider = Arc::clone(&provider);
        let timeout = settings.provider_timeout;

        tasks.spawn(async move {
            let outcome = tokio::time::timeout(timeout, provider.nearby_search(&query)).await;
            (index, outcome)
        });
    }

    let mut results: Vec<Vec<Place>> = interests.iter().map(|_| Vec::new()).collect();

    while let Some(joined) = tasks.join_next().await {
        let (index, outcome) = match joined {
            Ok(finished) => finished,
            Err(e) => {
                tracing::error!(error = %e, "Task join error");
                continue;
            }
        };
        let tag = &request.interests[index];
        let place_type = interests[index].primary_place_type();

        match outcome {
            Ok(Ok(places)) => {
                tracing::debug!(interest = %tag, place_type = %place_type, found = places.len(), "Interest search completed");
                results[index] = places;
            }
            Ok(Err(e)) => {
                tracing::warn!(interest = %tag, place_type = %place_type, error = %e, "Places search failed for interest");
            }
            Err(_) => {
                tracing::warn!(
                    interest = %tag,
                    place_type = %place_type,
                    timeout_ms = settings.provider_timeout.as_millis() as u64,
                    "Places search timed out for interest"
                );
            }
        }
    }

    results
}

/// Merges per-interest search results into the final ranked list
pub fn merge_candidates(
    per_interest: Vec<Vec<Place>>,
    budget: BudgetTier,
    settings: &RecommendationSettings,
) -> Vec<Place> {
    let mut candidates = Vec::new();
    for places in per_interest {
        candidates.extend(filter_by_budget(places, budget, settings.per_interest_limit));
    }

    let mut ranked = rank_by_rating(dedup_by_place_id(candidates));
    ranked.truncate(settings.max_results);
    ranked
}

/// Keeps places the budget allows, at most `limit`, in provider order
pub fn filter_by_budget(places: Vec<Place>, budget: BudgetTier, limit: usize) -> Vec<Place> {
    places
        .into_iter()
        .filter(|place| budget.allows(place.price_level))
        .take(limit)
        .collect()
}

/// Drops later occurrences of an already-seen place id
pub fn dedup_by_place_id(places: Vec<Place>) -> Vec<Place> {
    let mut seen = HashSet::new();
    places
        .into_iter()
        .filter(|place| seen.insert(place.place_id.clone()))
        .collect()
}

/// Stable sort by rating, highest first
pub fn rank_by_rating(mut places: Vec<Place>) -> Vec<Place> {
    places.sort_by(|a, b| b.ranking_score().total_cmp(&a.ranking_score()));
    places
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Location, PlaceDetails};
    use crate::services::providers::MockPlacesProvider;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio_test::{assert_err, assert_ok};

    fn place(id: &str, rating: Option<f64>, price_level: Option<u8>) -> Place {
        Place {
            place_id: id.to_string(),
            name: format!("Place {}", id),
            rating,
            price_level,
            types: vec![],
            vicinity: None,
            location: None,
            photos: vec![],
        }
    }

    fn ids(places: &[Place]) -> Vec<&str> {
        places.iter().map(|p| p.place_id.as_str()).collect()
    }

    fn caller() -> Caller {
        Caller {
            user_id: "tester".to_string(),
        }
    }

    fn request(interests: &[&str], budget: &str) -> PersonalizedRequest {
        PersonalizedRequest {
            location: Location::new(41.0082, 28.9784),
            interests: interests.iter().map(|s| s.to_string()).collect(),
            budget: budget.to_string(),
        }
    }

    /// Provider that serves fixed results per place type, sleeps for some
    /// types and fails for others
    struct ScriptedProvider {
        slow_types: Vec<&'static str>,
        failing_types: Vec<&'static str>,
    }

    #[async_trait::async_trait]
    impl PlacesProvider for ScriptedProvider {
        async fn nearby_search(&self, query: &NearbyQuery) -> AppResult<Vec<Place>> {
            let place_type = query.place_type.as_str();
            if self.slow_types.contains(&place_type) {
                tokio::time::sleep(Duration::from_secs(30)).await;
            }
            if self.failing_types.contains(&place_type) {
                return Err(AppError::ExternalApi("OVER_QUERY_LIMIT".to_string()));
            }
            Ok(vec![place(&format!("{}-1", place_type), Some(4.0), None)])
        }

        async fn place_details(&self, place_id: &str) -> AppResult<PlaceDetails> {
            Err(AppError::NotFound(place_id.to_string()))
        }

        fn name(&self) -> &'static str {
            "scripted"
        }
    }

    /// Provider whose searches never finish in time; counts searches dropped
    /// before completing
    struct HangingProvider {
        dropped: Arc<AtomicUsize>,
    }

    struct DropCounter(Arc<AtomicUsize>);

    impl Drop for DropCounter {
        fn drop(&mut self) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[async_trait::async_trait]
    impl PlacesProvider for HangingProvider {
        async fn nearby_search(&self, _query: &NearbyQuery) -> AppResult<Vec<Place>> {
            let _guard = DropCounter(self.dropped.clone());
            tokio::time::sleep(Duration::from_secs(30)).await;
            Ok(vec![])
        }

        async fn place_details(&self, place_id: &str) -> AppResult<PlaceDetails> {
            Err(AppError::NotFound(place_id.to_string()))
        }

        fn name(&self) -> &'static str {
            "hanging"
        }
    }

    /// Provider where the restaurant search finishes last and shares a place
    /// with every other search
    struct StaggeredProvider;

    #[async_trait::async_trait]
    impl PlacesProvider for StaggeredProvider {
        async fn nearby_search(&self, query: &NearbyQuery) -> AppResult<Vec<Place>> {
            if query.place_type == "restaurant" {
                tokio::time::sleep(Duration::from_millis(50)).await;
                return Ok(vec![place("shared", Some(4.0), Some(1))]);
            }
            Ok(vec![place("shared", Some(4.0), Some(2))])
        }

        async fn place_details(&self, place_id: &str) -> AppResult<PlaceDetails> {
            Err(AppError::NotFound(place_id.to_string()))
        }

        fn name(&self) -> &'static str {
            "staggered"
        }
    }

    #[test]
    fn test_filter_by_budget_keeps_unpriced_and_truncates() {
        let places = vec![
            place("a", Some(4.0), Some(3)),
            place("b", Some(4.0), None),
            place("c", Some(4.0), Some(0)),
            place("d", Some(4.0), Some(1)),
            place("e", Some(4.0), Some(4)),
        ];

        let kept = filter_by_budget(places, BudgetTier::Low, 2);
        assert_eq!(ids(&kept), vec!["b", "c"]);
    }

    #[test]
    fn test_dedup_keeps_first_occurrence() {
        let places = vec![
            place("a", Some(1.0), Some(1)),
            place("b", Some(2.0), None),
            place("a", Some(5.0), Some(2)),
        ];

        let unique = dedup_by_place_id(places);
        assert_eq!(ids(&unique), vec!["a", "b"]);
        assert_eq!(unique[0].rating, Some(1.0));
    }

    #[test]
    fn test_rank_is_stable_and_treats_missing_rating_as_zero() {
        let places = vec![
            place("unrated", None, None),
            place("x", Some(4.0), None),
            place("zero", Some(0.0), None),
            place("y", Some(4.0), None),
            place("top", Some(4.9), None),
        ];

        let ranked = rank_by_rating(places);
        assert_eq!(ids(&ranked), vec!["top", "x", "y", "unrated", "zero"]);
        assert_eq!(ranked[3].rating, None);
    }

    #[test]
    fn test_merge_caps_results() {
        let per_interest: Vec<Vec<Place>> = (0..6)
            .map(|i| {
                (0..5)
                    .map(|j| place(&format!("{}-{}", i, j), Some(j as f64), None))
                    .collect()
            })
            .collect();

        let merged = merge_candidates(per_interest, BudgetTier::Medium, &Default::default());
        assert_eq!(merged.len(), 20);
        assert!(merged
            .windows(2)
            .all(|w| w[0].ranking_score() >= w[1].ranking_score()));
    }

    #[tokio::test]
    async fn test_food_and_nature_low_budget_scenario() {
        let mut mock = MockPlacesProvider::new();
        mock.expect_nearby_search()
            .times(2)
            .returning(|query| match query.place_type.as_str() {
                "restaurant" => Ok(vec![
                    place("a", Some(4.5), Some(1)),
                    place("b", Some(3.0), Some(3)),
                ]),
                "park" => Ok(vec![
                    place("a", Some(4.5), Some(1)),
                    place("c", Some(5.0), None),
                ]),
                other => panic!("unexpected place type {}", other),
            });

        let response = personalized_recommendations(
            Arc::new(mock),
            &RecommendationSettings::default(),
            &caller(),
            request(&["food", "nature"], "low"),
        )
        .await
        .unwrap();

        assert_eq!(ids(&response.recommendations), vec!["c", "a"]);
        assert_eq!(response.recommendations[0].rating, Some(5.0));
        assert_eq!(response.parameters.budget, BudgetTier::Low);
        assert_eq!(response.parameters.interests, vec!["food", "nature"]);
    }

    #[tokio::test]
    async fn test_one_call_per_interest_including_repeats() {
        let mut mock = MockPlacesProvider::new();
        mock.expect_nearby_search()
            .withf(|query| query.place_type == "museum" && query.radius == 5000)
            .times(3)
            .returning(|_| Ok(vec![place("m", Some(4.2), None)]));

        let response = personalized_recommendations(
            Arc::new(mock),
            &RecommendationSettings::default(),
            &caller(),
            request(&["culture", "Culture", "CULTURE"], "medium"),
        )
        .await
        .unwrap();

        assert_eq!(ids(&response.recommendations), vec!["m"]);
    }

    #[tokio::test]
    async fn test_unrecognized_interest_searches_tourist_attractions() {
        let mut mock = MockPlacesProvider::new();
        mock.expect_nearby_search()
            .withf(|query| query.place_type == "tourist_attraction")
            .times(1)
            .returning(|_| Ok(vec![]));

        let response = personalized_recommendations(
            Arc::new(mock),
            &RecommendationSettings::default(),
            &caller(),
            request(&["birdwatching"], "high"),
        )
        .await;

        let response = assert_ok!(response);
        assert!(response.recommendations.is_empty());
    }

    #[tokio::test]
    async fn test_unrecognized_budget_rejected_before_any_call() {
        let mut mock = MockPlacesProvider::new();
        mock.expect_nearby_search().times(0);

        let result = personalized_recommendations(
            Arc::new(mock),
            &RecommendationSettings::default(),
            &caller(),
            request(&["food"], "expensive"),
        )
        .await;

        assert!(matches!(result, Err(AppError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_invalid_coordinates_rejected_before_any_call() {
        let mut mock = MockPlacesProvider::new();
        mock.expect_nearby_search().times(0);

        let mut bad = request(&["food"], "low");
        bad.location = Location::new(123.0, 0.0);

        let result = personalized_recommendations(
            Arc::new(mock),
            &RecommendationSettings::default(),
            &caller(),
            bad,
        )
        .await;

        assert_err!(result);
    }

    #[tokio::test]
    async fn test_too_many_interests_rejected() {
        let mut mock = MockPlacesProvider::new();
        mock.expect_nearby_search().times(0);

        let settings = RecommendationSettings {
            max_interests: 2,
            ..Default::default()
        };

        let result = personalized_recommendations(
            Arc::new(mock),
            &settings,
            &caller(),
            request(&["food", "art", "sports"], "medium"),
        )
        .await;

        assert!(matches!(result, Err(AppError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_no_interests_yields_empty_list() {
        let mut mock = MockPlacesProvider::new();
        mock.expect_nearby_search().times(0);

        let response = personalized_recommendations(
            Arc::new(mock),
            &RecommendationSettings::default(),
            &caller(),
            request(&[], "medium"),
        )
        .await
        .unwrap();

        assert!(response.recommendations.is_empty());
    }

    #[tokio::test]
    async fn test_timed_out_interest_is_absorbed() {
        let provider = ScriptedProvider {
            slow_types: vec!["restaurant"],
            failing_types: vec![],
        };
        let settings = RecommendationSettings {
            provider_timeout: Duration::from_millis(50),
            ..Default::default()
        };

        let response = personalized_recommendations(
            Arc::new(provider),
            &settings,
            &caller(),
            request(&["food", "nature"], "medium"),
        )
        .await
        .unwrap();

        assert_eq!(ids(&response.recommendations), vec!["park-1"]);
    }

    #[tokio::test]
    async fn test_results_joined_in_interest_order_not_completion_order() {
        let response = personalized_recommendations(
            Arc::new(StaggeredProvider),
            &RecommendationSettings::default(),
            &caller(),
            request(&["food", "nature"], "medium"),
        )
        .await
        .unwrap();

        assert_eq!(ids(&response.recommendations), vec!["shared"]);
        assert_eq!(response.recommendations[0].price_level, Some(1));
    }

    #[tokio::test]
    async fn test_dropped_request_aborts_in_flight_searches() {
        let dropped = Arc::new(AtomicUsize::new(0));
        let provider = HangingProvider {
            dropped: dropped.clone(),
        };
        let settings = RecommendationSettings {
            provider_timeout: Duration::from_secs(30),
            ..Default::default()
        };
        let caller = caller();

        let pending = personalized_recommendations(
            Arc::new(provider),
            &settings,
            &caller,
            request(&["food", "nature", "art"], "medium"),
        );
        let cut_short = tokio::time::timeout(Duration::from_millis(50), pending).await;
        assert!(cut_short.is_err());

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(dropped.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_failed_interest_is_absorbed() {
        let provider = ScriptedProvider {
            slow_types: vec![],
            failing_types: vec!["park", "stadium"],
        };

        let response = personalized_recommendations(
            Arc::new(provider),
            &RecommendationSettings::default(),
            &caller(),
            request(&["nature", "sports", "art"], "medium"),
        )
        .await
        .unwrap();

        assert_eq!(ids(&response.recommendations), vec!["art_gallery-1"]);
    }

    #[tokio::test]
    async fn test_all_interests_failing_is_not_an_error() {
        let provider = ScriptedProvider {
            slow_types: vec![],
            failing_types: vec!["park"],
        };

        let response = personalized_recommendations(
            Arc::new(provider),
            &RecommendationSettings::default(),
            &caller(),
            request(&["nature"], "low"),
        )
        .await;

        let response = assert_ok!(response);
        assert!(response.recommendations.is_empty());
    }

    #[tokio::test]
    async fn test_per_interest_limit_applied_after_filtering() {
        let mut mock = MockPlacesProvider::new();
        mock.expect_nearby_search().times(1).returning(|_| {
            Ok(vec![
                place("pricey-1", Some(5.0), Some(4)),
                place("pricey-2", Some(5.0), Some(4)),
                place("r1", Some(3.0), Some(1)),
                place("r2", Some(3.1), Some(2)),
                place("r3", Some(3.2), None),
                place("r4", Some(3.3), Some(1)),
                place("r5", Some(3.4), Some(2)),
                place("r6", Some(3.5), Some(1)),
            ])
        });

        let response = personalized_recommendations(
            Arc::new(mock),
            &RecommendationSettings::default(),
            &caller(),
            request(&["food"], "medium"),
        )
        .await
        .unwrap();

        assert_eq!(
            ids(&response.recommendations),
            vec!["r5", "r4", "r3", "r2", "r1"]
        );
    }
}
