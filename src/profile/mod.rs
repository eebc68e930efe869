//! Goal profiles.
//!
//! A [`GoalProfile`] holds two independent weight vectors over the
//! categories:
//!
//! - **importance**: enters the utility formula squared, so categories a
//!   goal cares little about lose selection pressure quickly.
//! - **budget share**: the ideal fraction of the total budget a category
//!   should consume. Sums to 1.0 for every goal.
//!
//! Both are static configuration. Unknown goal identifiers resolve to the
//! `universal` profile.

use crate::catalog::Category;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Intended use of a build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Goal {
    Games,
    Office,
    Graphics,
    Video,
    Programming,
    Universal,
}

impl Goal {
    pub const ALL: [Goal; 6] = [
        Goal::Games,
        Goal::Office,
        Goal::Graphics,
        Goal::Video,
        Goal::Programming,
        Goal::Universal,
    ];

    pub fn id(self) -> &'static str {
        match self {
            Goal::Games => "games",
            Goal::Office => "office",
            Goal::Graphics => "graphics",
            Goal::Video => "video",
            Goal::Programming => "programming",
            Goal::Universal => "universal",
        }
    }

    /// Parses an exact goal identifier.
    pub fn from_id(id: &str) -> Option<Goal> {
        Goal::ALL.iter().copied().find(|g| g.id() == id)
    }
}

impl fmt::Display for Goal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// One weight per category, indexed by [`Category::index`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CategoryWeights([f64; Category::COUNT]);

impl CategoryWeights {
    pub const fn new(
        cpu: f64,
        memory: f64,
        motherboard: f64,
        power_supply: f64,
        case: f64,
        video_card: f64,
        storage: f64,
    ) -> Self {
        Self([cpu, memory, motherboard, power_supply, case, video_card, storage])
    }

    pub fn get(&self, category: Category) -> f64 {
        self.0[category.index()]
    }

    pub fn sum(&self) -> f64 {
        self.0.iter().sum()
    }

    /// `(category, weight)` pairs in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (Category, f64)> + '_ {
        Category::ALL.iter().map(move |&c| (c, self.get(c)))
    }
}

/// Static weighting configuration for one goal.
#[derive(Debug, Clone, PartialEq)]
pub struct GoalProfile {
    pub goal: Goal,
    pub importance: CategoryWeights,
    pub budget_share: CategoryWeights,
}

impl GoalProfile {
    /// Profile for a goal identifier, falling back to `universal`.
    pub fn resolve(goal_id: &str) -> &'static GoalProfile {
        let goal = Goal::from_id(goal_id).unwrap_or(Goal::Universal);
        Self::for_goal(goal)
    }

    pub fn for_goal(goal: Goal) -> &'static GoalProfile {
        &PROFILES[goal as usize]
    }

    /// Ideal spend on a category for the given total budget.
    pub fn target_price(&self, category: Category, budget: f64) -> f64 {
        self.budget_share.get(category) * budget
    }
}

//                                   cpu   mem   mobo  psu   case  gpu   storage
static PROFILES: [GoalProfile; 6] = [
    GoalProfile {
        goal: Goal::Games,
        importance: CategoryWeights::new(0.20, 0.10, 0.10, 0.08, 0.07, 0.35, 0.10),
        budget_share: CategoryWeights::new(0.20, 0.10, 0.10, 0.07, 0.03, 0.40, 0.10),
    },
    GoalProfile {
        goal: Goal::Office,
        importance: CategoryWeights::new(0.25, 0.15, 0.12, 0.08, 0.10, 0.10, 0.20),
        budget_share: CategoryWeights::new(0.30, 0.20, 0.10, 0.05, 0.05, 0.10, 0.20),
    },
    GoalProfile {
        goal: Goal::Graphics,
        importance: CategoryWeights::new(0.25, 0.15, 0.08, 0.05, 0.05, 0.30, 0.12),
        budget_share: CategoryWeights::new(0.25, 0.15, 0.05, 0.05, 0.05, 0.35, 0.10),
    },
    GoalProfile {
        goal: Goal::Video,
        importance: CategoryWeights::new(0.30, 0.15, 0.05, 0.05, 0.05, 0.25, 0.15),
        budget_share: CategoryWeights::new(0.35, 0.15, 0.05, 0.05, 0.05, 0.25, 0.10),
    },
    GoalProfile {
        goal: Goal::Programming,
        importance: CategoryWeights::new(0.30, 0.20, 0.10, 0.08, 0.07, 0.10, 0.15),
        budget_share: CategoryWeights::new(0.30, 0.25, 0.05, 0.05, 0.05, 0.15, 0.15),
    },
    GoalProfile {
        goal: Goal::Universal,
        importance: CategoryWeights::new(0.25, 0.15, 0.10, 0.08, 0.07, 0.20, 0.15),
        budget_share: CategoryWeights::new(0.25, 0.15, 0.10, 0.05, 0.05, 0.25, 0.15),
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profiles_indexed_by_goal() {
        for goal in Goal::ALL {
            assert_eq!(GoalProfile::for_goal(goal).goal, goal);
        }
    }

    #[test]
    fn test_budget_shares_sum_to_one() {
        for goal in Goal::ALL {
            let sum = GoalProfile::for_goal(goal).budget_share.sum();
            assert!((sum - 1.0).abs() < 1e-9, "{goal}: {sum}");
        }
    }

    #[test]
    fn test_importance_roughly_normalized() {
        for goal in Goal::ALL {
            let sum = GoalProfile::for_goal(goal).importance.sum();
            assert!((sum - 1.0).abs() < 0.05, "{goal}: {sum}");
        }
    }

    #[test]
    fn test_unknown_goal_falls_back_to_universal() {
        assert_eq!(GoalProfile::resolve("unknown_value").goal, Goal::Universal);
        assert_eq!(GoalProfile::resolve("Games").goal, Goal::Universal);
        assert_eq!(GoalProfile::resolve("games").goal, Goal::Games);
    }

    #[test]
    fn test_target_price() {
        let profile = GoalProfile::for_goal(Goal::Games);
        assert!((profile.target_price(Category::VideoCard, 1000.0) - 400.0).abs() < 1e-9);
        assert!((profile.target_price(Category::Case, 1000.0) - 30.0).abs() < 1e-9);
    }
}
