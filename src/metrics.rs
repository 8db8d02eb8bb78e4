use crate::model::Category;

/// Aggregates computed once per load from the full, unfiltered dataset.
/// Filtered views reuse these so shares stay relative to the whole.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EngagementStats {
    pub total: u64,
    pub max: u64,
}

pub fn compute_stats(categories: &[Category]) -> EngagementStats {
    EngagementStats {
        total: categories.iter().map(|c| c.favorites).sum(),
        max: categories.iter().map(|c| c.favorites).max().unwrap_or(0),
    }
}

/// Descending by favorites; stable, so ties keep their source order.
pub fn sorted_by_favorites(categories: &[Category]) -> Vec<Category> {
    let mut out = categories.to_vec();
    out.sort_by(|a, b| b.favorites.cmp(&a.favorites));
    out
}

/// Case-insensitive substring match on the category name. An empty term
/// matches everything.
pub fn filter_by_name(categories: &[Category], term: &str) -> Vec<Category> {
    let term = term.to_lowercase();
    categories
        .iter()
        .filter(|c| c.name.to_lowercase().contains(&term))
        .cloned()
        .collect()
}

/// Share of the unfiltered total, in percent. Zero when the total is zero.
pub fn share_percent(stats: EngagementStats, favorites: u64) -> f64 {
    if stats.total == 0 {
        return 0.0;
    }
    (favorites as f64 / stats.total as f64) * 100.0
}

/// Whether a count ties the global maximum. Every tied category is marked,
/// not a single winner.
pub fn is_top(stats: EngagementStats, favorites: u64) -> bool {
    favorites == stats.max
}

/// Fixed name-to-icon table with a fallback for unknown categories.
pub fn icon(name: &str) -> &'static str {
    match name {
        "Beleza" => "💄",
        "Esportes" => "🏀",
        "Moda" => "👗",
        "Eletrônicos" => "📱",
        "Casa" => "🏠",
        _ => "🔥",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cat(name: &str, favorites: u64) -> Category {
        Category {
            name: name.to_string(),
            favorites,
        }
    }

    #[test]
    fn sorts_descending_and_marks_top() {
        let data = vec![cat("Moda", 10), cat("Beleza", 30)];
        let stats = compute_stats(&data);
        let sorted = sorted_by_favorites(&data);

        assert_eq!(sorted[0].name, "Beleza");
        assert_eq!(sorted[1].name, "Moda");
        assert!(is_top(stats, 30));
        assert!(!is_top(stats, 10));
        assert_eq!(share_percent(stats, 30), 75.0);
        assert_eq!(share_percent(stats, 10), 25.0);
    }

    #[test]
    fn all_tied_maxima_are_marked() {
        let data = vec![cat("Beleza", 61), cat("Esportes", 61), cat("Casa", 30)];
        let stats = compute_stats(&data);

        let marked: Vec<&str> = data
            .iter()
            .filter(|c| is_top(stats, c.favorites))
            .map(|c| c.name.as_str())
            .collect();
        assert_eq!(marked, vec!["Beleza", "Esportes"]);
    }

    #[test]
    fn sort_is_stable_for_ties() {
        let data = vec![cat("Beleza", 61), cat("Esportes", 61), cat("Moda", 55)];
        let sorted = sorted_by_favorites(&data);
        assert_eq!(sorted[0].name, "Beleza");
        assert_eq!(sorted[1].name, "Esportes");
    }

    #[test]
    fn shares_sum_to_one_hundred_within_rounding() {
        let data = vec![
            cat("Eletrônicos", 42),
            cat("Moda", 55),
            cat("Casa", 30),
            cat("Beleza", 61),
            cat("Esportes", 61),
        ];
        let stats = compute_stats(&data);

        // Rounded to one decimal per card; the sum stays within rounding
        // error of 100.
        let sum: f64 = data
            .iter()
            .map(|c| (share_percent(stats, c.favorites) * 10.0).round() / 10.0)
            .sum();
        assert!((sum - 100.0).abs() < 0.3, "sum was {}", sum);
    }

    #[test]
    fn filter_is_case_insensitive_substring() {
        let data = vec![cat("Beleza", 30), cat("Eletrônicos", 42), cat("Moda", 10)];
        let sorted = sorted_by_favorites(&data);

        let hit = filter_by_name(&sorted, "ele");
        assert_eq!(hit.len(), 2);
        assert!(hit.iter().any(|c| c.name == "Beleza"));
        assert!(hit.iter().any(|c| c.name == "Eletrônicos"));

        assert!(filter_by_name(&sorted, "xyz").is_empty());
        assert_eq!(filter_by_name(&sorted, "").len(), 3);
    }

    #[test]
    fn filtered_views_keep_global_top_marker() {
        let data = vec![cat("Moda", 10), cat("Beleza", 30)];
        let stats = compute_stats(&data);
        let filtered = filter_by_name(&data, "beleza");

        assert_eq!(filtered.len(), 1);
        assert!(is_top(stats, filtered[0].favorites));

        // A filtered view that drops the maximum must not promote a new one.
        let filtered = filter_by_name(&data, "moda");
        assert!(!is_top(stats, filtered[0].favorites));
    }

    #[test]
    fn empty_dataset_yields_zero_shares() {
        let stats = compute_stats(&[]);
        assert_eq!(stats.total, 0);
        assert_eq!(stats.max, 0);
        assert_eq!(share_percent(stats, 0), 0.0);
    }

    #[test]
    fn icons_cover_known_names_with_fallback() {
        assert_eq!(icon("Beleza"), "💄");
        assert_eq!(icon("Casa"), "🏠");
        assert_eq!(icon("Livros"), "🔥");
    }
}
