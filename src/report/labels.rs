//! Human-facing category and goal labels.

use crate::catalog::Category;
use crate::profile::Goal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Label language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    #[serde(alias = "ru")]
    Russian,
    #[serde(alias = "en")]
    English,
}

impl Locale {
    pub fn category_label(self, category: Category) -> &'static str {
        match self {
            Locale::Russian => match category {
                Category::Cpu => "Процессор",
                Category::Memory => "Оперативная память",
                Category::Motherboard => "Материнская плата",
                Category::PowerSupply => "Блок питания",
                Category::Case => "Корпус",
                Category::VideoCard => "Видеокарта",
                Category::Storage => "Накопитель",
            },
            Locale::English => match category {
                Category::Cpu => "CPU",
                Category::Memory => "Memory",
                Category::Motherboard => "Motherboard",
                Category::PowerSupply => "Power Supply",
                Category::Case => "Case",
                Category::VideoCard => "Video Card",
                Category::Storage => "Storage",
            },
        }
    }

    /// Label for a goal identifier. Unknown identifiers are returned as-is.
    pub fn goal_label(self, goal_id: &str) -> String {
        let Some(goal) = Goal::from_id(goal_id) else {
            return goal_id.to_string();
        };
        let label = match self {
            Locale::Russian => match goal {
                Goal::Games => "Игровой",
                Goal::Office => "Офисный",
                Goal::Graphics => "Для графики",
                Goal::Video => "Для видеомонтажа",
                Goal::Programming => "Для программирования",
                Goal::Universal => "Универсальный",
            },
            Locale::English => match goal {
                Goal::Games => "Gaming",
                Goal::Office => "Office",
                Goal::Graphics => "Graphics",
                Goal::Video => "Video editing",
                Goal::Programming => "Programming",
                Goal::Universal => "Universal",
            },
        };
        label.to_string()
    }
}

impl FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "ru" | "russian" => Ok(Locale::Russian),
            "en" | "english" => Ok(Locale::English),
            _ => Err(format!("unknown locale: {s}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_labels() {
        assert_eq!(Locale::Russian.category_label(Category::VideoCard), "Видеокарта");
        assert_eq!(Locale::English.category_label(Category::PowerSupply), "Power Supply");
    }

    #[test]
    fn test_goal_labels() {
        assert_eq!(Locale::Russian.goal_label("games"), "Игровой");
        assert_eq!(Locale::English.goal_label("video"), "Video editing");
    }

    #[test]
    fn test_unknown_goal_label_is_verbatim() {
        assert_eq!(Locale::Russian.goal_label("unknown_value"), "unknown_value");
        assert_eq!(Locale::English.goal_label("Games"), "Games");
    }

    #[test]
    fn test_parse_locale() {
        assert_eq!("RU".parse::<Locale>().unwrap(), Locale::Russian);
        assert_eq!("english".parse::<Locale>().unwrap(), Locale::English);
        assert!("de".parse::<Locale>().is_err());
    }
}
