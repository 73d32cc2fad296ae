use serde::{Deserialize, Serialize};

/// Fields requested from the country API. Anything else is dropped server side.
pub const COUNTRY_FIELDS: &str = "name,capital,population,flags,languages";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flags {
    #[serde(default)]
    pub svg: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Language {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Country {
    pub name: String,
    #[serde(default)]
    pub capital: Option<String>,
    #[serde(default)]
    pub population: u64,
    pub flags: Flags,
    #[serde(default)]
    pub languages: Vec<Language>,
}

impl Country {
    pub fn flag_url(&self) -> &str {
        &self.flags.svg
    }

    pub fn capital(&self) -> &str {
        self.capital.as_deref().unwrap_or_default()
    }

    /// Language names joined with a comma, in API order.
    pub fn language_names(&self) -> String {
        self.languages
            .iter()
            .map(|l| l.name.as_str())
            .collect::<Vec<_>>()
            .join(",")
    }
}

#[cfg(test)]
pub(crate) fn sample(name: &str) -> Country {
    Country {
        name: name.to_string(),
        capital: Some(format!("{name} City")),
        population: 1_000,
        flags: Flags {
            svg: format!("https://flagcdn.com/{}.svg", name.to_lowercase()),
        },
        languages: vec![Language {
            name: "English".to_string(),
        }],
    }
}
