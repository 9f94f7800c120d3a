//! Country menu pagination.
//!
//! Slack limits the number of options of a `static_select` menu, so the
//! country list is split into pages of `page_size` countries, each page
//! rendered as its own menu.

/// An option of a country menu.
///
/// `text` and `value` are both the country name, byte for byte.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuOption {
    pub text: String,
    pub value: String,
}

/// A page of the country menu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuPage {
    /// Page number, starting at 1
    pub number: usize,
    /// First country of the page, used in the label
    pub first_country: String,
    /// Countries of the page, in list order
    pub options: Vec<MenuOption>,
}

impl MenuPage {
    /// Label shown next to the menu, for example `[2] From: Belgium…`.
    pub fn label(&self) -> String {
        format!("[{}] From: {}…", self.number, self.first_country)
    }
}

/// Splits a country list into menu pages.
///
/// Returns `None` for an empty list. Otherwise every page holds `page_size`
/// countries except the last one which holds the remainder. A page size of
/// zero is treated as one.
///
/// # Examples
///
/// ```
/// # use covibot::commands::menu::paginate;
/// let countries: Vec<String> = ["Afghanistan", "Albania", "Algeria"].map(String::from).into();
/// let pages = paginate(&countries, 2).unwrap();
/// assert_eq!(pages.len(), 2);
/// assert_eq!(pages[1].label(), "[2] From: Algeria…");
/// ```
pub fn paginate(countries: &[String], page_size: usize) -> Option<Vec<MenuPage>> {
    if countries.is_empty() {
        return None;
    }

    let pages = countries
        .chunks(page_size.max(1))
        .enumerate()
        .map(|(index, chunk)| MenuPage {
            number: index + 1,
            first_country: chunk[0].clone(),
            options: chunk
                .iter()
                .map(|country| MenuOption {
                    text: country.clone(),
                    value: country.clone(),
                })
                .collect(),
        })
        .collect();

    Some(pages)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn countries(count: usize) -> Vec<String> {
        (0..count).map(|i| format!("Country {}", i)).collect()
    }

    #[test]
    fn test_paginate_empty_list() {
        assert_eq!(paginate(&[], 20), None);
    }

    #[test]
    fn test_paginate_page_counts() {
        for (count, page_size, expected_pages) in [
            (1, 20, 1),
            (20, 20, 1),
            (21, 20, 2),
            (45, 20, 3),
            (215, 20, 11),
            (7, 1, 7),
            (3, 100, 1),
        ] {
            let pages = paginate(&countries(count), page_size).unwrap();
            assert_eq!(
                pages.len(),
                expected_pages,
                "{} countries by {}",
                count,
                page_size
            );
        }
    }

    #[test]
    fn test_paginate_page_sizes() {
        let pages = paginate(&countries(45), 20).unwrap();

        let sizes: Vec<usize> = pages.iter().map(|page| page.options.len()).collect();
        assert_eq!(sizes, vec![20, 20, 5]);
    }

    #[test]
    fn test_paginate_keeps_every_country_in_order() {
        let list = countries(53);
        let pages = paginate(&list, 20).unwrap();

        let values: Vec<String> = pages
            .iter()
            .flat_map(|page| page.options.iter().map(|option| option.value.clone()))
            .collect();
        assert_eq!(values, list);
    }

    #[test]
    fn test_paginate_labels() {
        let list: Vec<String> = ["Afghanistan", "Albania", "Algeria", "Andorra", "Angola"]
            .iter()
            .map(|s| s.to_string())
            .collect();

        let pages = paginate(&list, 2).unwrap();

        let labels: Vec<String> = pages.iter().map(MenuPage::label).collect();
        assert_eq!(
            labels,
            vec![
                "[1] From: Afghanistan…",
                "[2] From: Algeria…",
                "[3] From: Angola…"
            ]
        );
    }

    #[test]
    fn test_paginate_option_text_equals_value() {
        let list = vec!["Côte d'Ivoire".to_string(), "S. Korea".to_string()];

        let pages = paginate(&list, 20).unwrap();

        for option in &pages[0].options {
            assert_eq!(option.text, option.value);
        }
        assert_eq!(pages[0].options[0].value, "Côte d'Ivoire");
    }

    #[test]
    fn test_paginate_zero_page_size() {
        let pages = paginate(&countries(3), 0).unwrap();

        assert_eq!(pages.len(), 3);
        assert!(pages.iter().all(|page| page.options.len() == 1));
    }

    #[test]
    fn test_paginate_is_deterministic() {
        let list = countries(42);

        assert_eq!(paginate(&list, 20), paginate(&list, 20));
    }
}
