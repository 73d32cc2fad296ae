//! HTML markup for the two display regions.
//!
//! Both renderers are pure: the same records always produce the same bytes.

use crate::country::Country;

/// Escape text for use in element content or a quoted attribute.
pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// One `<li>` per country, flag then name, as a single batch.
pub fn render_list(countries: &[Country]) -> String {
    countries
        .iter()
        .map(|country| {
            let name = escape(&country.name);
            format!(
                "<li class=\"country-list__item\">\
                 <img class=\"country-list__flag\" src=\"{src}\" alt=\"Flag of {name}\"/>\
                 <p class=\"country-list__name\">{name}</p>\
                 </li>",
                src = escape(country.flag_url()),
            )
        })
        .collect()
}

/// Detail card(s). Only ever called with one country.
pub fn render_detail(countries: &[Country]) -> String {
    countries
        .iter()
        .map(|country| {
            format!(
                "<ul class=\"country-info__list\">\
                 <li class=\"country-info__item\">\
                 <img class=\"country-info__flag\" src=\"{src}\" alt=\"flag\"/>\
                 <span class=\"country-info__name\">{name}</span>\
                 </li>\
                 {capital}{population}{languages}\
                 </ul>",
                src = escape(country.flag_url()),
                name = escape(&country.name),
                capital = info_item("Capital", country.capital()),
                population = info_item("Population", &country.population.to_string()),
                languages = info_item("Languages", &country.language_names()),
            )
        })
        .collect()
}

fn info_item(title: &str, text: &str) -> String {
    format!(
        "<li class=\"country-info__item\">\
         <h2 class=\"country-info__title\">{title}:</h2>\
         <p class=\"country-info__text\">{}</p>\
         </li>",
        escape(text)
    )
}
