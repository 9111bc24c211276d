use crate::domain::model::{CountryTable, LocationIndex, TrailingField};
use crate::utils::encoding::decode_lossy;
use crate::utils::error::Result;
use csv::ReaderBuilder;

/// Fixed corrections from colloquial country suffixes to the names the
/// population dataset uses.
const COUNTRY_ALIASES: &[(&str, &str)] = &[
    ("USA", "United States"),
    ("UK", "United Kingdom"),
    ("England", "United Kingdom"),
    ("Scotland", "United Kingdom"),
    ("Wales", "United Kingdom"),
];

pub fn canonical_country(raw: &str) -> &str {
    COUNTRY_ALIASES
        .iter()
        .find(|(alias, _)| *alias == raw)
        .map(|(_, canonical)| *canonical)
        .unwrap_or(raw)
}

/// Parses the flat-text catalog into titles aggregated per location,
/// filtered to one target year.
pub struct CatalogParser {
    year: String,
}

impl CatalogParser {
    pub fn new(year: impl Into<String>) -> Self {
        Self { year: year.into() }
    }

    pub fn parse_bytes(
        &self,
        bytes: &[u8],
        countries: Option<&mut CountryTable>,
    ) -> Result<LocationIndex> {
        self.parse_str(&decode_lossy(bytes), countries)
    }

    /// One pass over the catalog. Each line carries tab-separated
    /// fields: the first holds `Title (YYYY...)` plus optional
    /// bracketed attributes, the last holds the location unless it is
    /// a categorical tag, in which case the location sits one field
    /// earlier. Lines without a parenthetical year never match.
    pub fn parse_str(
        &self,
        text: &str,
        mut countries: Option<&mut CountryTable>,
    ) -> Result<LocationIndex> {
        let mut result = LocationIndex::new();

        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .delimiter(b'\t')
            .quoting(false)
            .flexible(true)
            .from_reader(text.as_bytes());

        for record in reader.records() {
            let record = record?;
            let fields: Vec<&str> = record.iter().collect();
            let Some(last) = fields.last() else { continue };

            let location = match TrailingField::classify(last) {
                TrailingField::Location(location) => location,
                TrailingField::Tag(_) => match fields.len().checked_sub(2) {
                    Some(index) => fields[index].to_string(),
                    None => continue,
                },
            };

            let Some((raw_title, suffix)) = fields[0].split_once('(') else {
                continue;
            };
            if !year_matches(suffix, &self.year) {
                continue;
            }

            // quotes break downstream text embedding
            let title = raw_title.replace('\'', "\"");

            // Counted once per matching line, duplicates included.
            if let Some(countries) = countries.as_deref_mut() {
                let tail = location.rsplit(", ").next().unwrap_or(&location);
                let country = canonical_country(tail);
                if let Some(entry) = countries.get_mut(country) {
                    entry.film_count += 1;
                }
            }

            let titles = result.entry(location).or_default();
            if !titles.contains(&title) {
                titles.push(title);
            }
        }

        tracing::debug!(
            "Catalog pass for {} matched {} locations",
            self.year,
            result.len()
        );
        Ok(result)
    }
}

/// The first four characters after the opening parenthesis must equal
/// the requested year string exactly.
fn year_matches(suffix: &str, year: &str) -> bool {
    let prefix: String = suffix.chars().take(4).collect();
    prefix == year
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::CountryEntry;

    fn table_with(entries: &[(&str, f64)]) -> CountryTable {
        entries
            .iter()
            .map(|(name, population)| (name.to_string(), CountryEntry::new(*population)))
            .collect()
    }

    #[test]
    fn test_titles_unique_per_location_in_first_seen_order() {
        let catalog = "Alpha (1999)\tLondon, UK\n\
                       Beta (1999)\tLondon, UK\n\
                       Alpha (1999)\tLondon, UK\n";
        let parser = CatalogParser::new("1999");
        let films = parser.parse_str(catalog, None).unwrap();

        assert_eq!(films.len(), 1);
        assert_eq!(films["London, UK"], vec!["Alpha ", "Beta "]);
    }

    #[test]
    fn test_year_filter_is_exact_prefix_match() {
        let catalog = "Alpha (1999)\tParis, France\n\
                       Beta (2000)\tParis, France\n\
                       Gamma\tParis, France\n";
        let parser = CatalogParser::new("1999");
        let films = parser.parse_str(catalog, None).unwrap();

        assert_eq!(films["Paris, France"], vec!["Alpha "]);
    }

    #[test]
    fn test_line_without_parenthetical_never_matches() {
        let parser = CatalogParser::new("1999");
        let films = parser.parse_str("NoYearAtAll\tBerlin, Germany\n", None).unwrap();
        assert!(films.is_empty());
    }

    #[test]
    fn test_trailing_tag_shifts_location_one_field_left() {
        let catalog = "Alpha (1999)\tKyiv, Ukraine\t(TV)\n";
        let parser = CatalogParser::new("1999");
        let films = parser.parse_str(catalog, None).unwrap();

        assert_eq!(films.len(), 1);
        assert!(films.contains_key("Kyiv, Ukraine"));
    }

    #[test]
    fn test_apostrophes_become_double_quotes() {
        let catalog = "L'Atalante d'or (1999)\tParis, France\n";
        let parser = CatalogParser::new("1999");
        let films = parser.parse_str(catalog, None).unwrap();

        assert_eq!(films["Paris, France"], vec!["L\"Atalante d\"or "]);
    }

    #[test]
    fn test_country_alias_increments_same_entry() {
        let mut countries = table_with(&[("United States", 300_000_000.0)]);
        let catalog = "Alpha (1999)\tNew York, USA\n\
                       Beta (1999)\tBoston, United States\n";
        let parser = CatalogParser::new("1999");
        parser.parse_str(catalog, Some(&mut countries)).unwrap();

        assert_eq!(countries["United States"].film_count, 2);
    }

    #[test]
    fn test_film_count_increments_once_per_matching_line() {
        let mut countries = table_with(&[("United Kingdom", 60_000_000.0)]);
        // same title and location repeated: the title list dedups, the
        // country count does not
        let catalog = "Alpha (1999)\tLondon, UK\n\
                       Alpha (1999)\tLondon, UK\n";
        let parser = CatalogParser::new("1999");
        let films = parser.parse_str(catalog, Some(&mut countries)).unwrap();

        assert_eq!(films["London, UK"].len(), 1);
        assert_eq!(countries["United Kingdom"].film_count, 2);
    }

    #[test]
    fn test_unknown_country_suffix_is_ignored() {
        let mut countries = table_with(&[("France", 60_000_000.0)]);
        let catalog = "Alpha (1999)\tAtlantis\n";
        let parser = CatalogParser::new("1999");
        parser.parse_str(catalog, Some(&mut countries)).unwrap();

        assert_eq!(countries["France"].film_count, 0);
    }

    #[test]
    fn test_same_country_distinct_locations_stay_separate() {
        let mut countries = table_with(&[("United Kingdom", 60_000_000.0)]);
        let catalog = "Alpha (1999)\tLondon, UK\n\
                       Beta (1999)\tLondon, England\n";
        let parser = CatalogParser::new("1999");
        let films = parser.parse_str(catalog, Some(&mut countries)).unwrap();

        assert_eq!(countries["United Kingdom"].film_count, 2);
        assert_eq!(films.len(), 2);
        assert!(films.contains_key("London, UK"));
        assert!(films.contains_key("London, England"));
    }

    #[test]
    fn test_undecodable_bytes_are_dropped_not_fatal() {
        let parser = CatalogParser::new("1999");
        let bytes = b"Alpha (1999)\tLviv, \xFFUkraine\n";
        let films = parser.parse_bytes(bytes, None).unwrap();

        assert!(films.contains_key("Lviv, Ukraine"));
    }

    #[test]
    fn test_empty_input() {
        let parser = CatalogParser::new("1999");
        assert!(parser.parse_str("", None).unwrap().is_empty());
    }
}
