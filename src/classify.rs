use crate::country::Country;

/// Largest result set that is still shown as a list.
pub const MAX_LIST_MATCHES: usize = 10;

pub const TOO_MANY_MATCHES: &str = "Too many matches found. Please enter a more specific name.";
pub const NO_SUCH_COUNTRY: &str = "Oops, there is no country with that name";

/// What a successful lookup should turn into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Nothing,
    Detail(Country),
    List(Vec<Country>),
    TooMany(usize),
}

/// Which region currently holds markup. At most one of them ever does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisplayState {
    #[default]
    Empty,
    ShowingList,
    ShowingDetail,
}

impl Outcome {
    pub fn classify(mut countries: Vec<Country>) -> Self {
        match countries.len() {
            0 => Outcome::Nothing,
            1 => Outcome::Detail(countries.remove(0)),
            2..=MAX_LIST_MATCHES => Outcome::List(countries),
            n => Outcome::TooMany(n),
        }
    }

    /// Display state once this outcome has been applied.
    pub fn display_state(&self) -> DisplayState {
        match self {
            Outcome::Detail(_) => DisplayState::ShowingDetail,
            Outcome::List(_) => DisplayState::ShowingList,
            Outcome::Nothing | Outcome::TooMany(_) => DisplayState::Empty,
        }
    }
}
