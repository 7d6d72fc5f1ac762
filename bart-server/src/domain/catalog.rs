//! The BART station list.
//!
//! The first five entries are the curated favourites shown at the top of
//! the selectors; the rest are alphabetical.

use super::StationCode;

const STATIONS: &[(&str, &str)] = &[
    ("PHIL", "Pleasant Hill / Contra Costa Center"),
    ("EMBR", "Embarcadero (SF)"),
    ("CIVC", "Civic Center / UN Plaza"),
    ("16TH", "16th St Mission (SF)"),
    ("WCRK", "Walnut Creek"),
    ("12TH", "12th St. Oakland City Center"),
    ("19TH", "19th St. Oakland"),
    ("24TH", "24th St. Mission (SF)"),
    ("ANTC", "Antioch"),
    ("ASHB", "Ashby (Berkeley)"),
    ("BALB", "Balboa Park (SF)"),
    ("BAYF", "Bay Fair (San Leandro)"),
    ("BERY", "Berryessa / North San Jose"),
    ("CAST", "Castro Valley"),
    ("COLM", "Colma"),
    ("COLS", "Coliseum"),
    ("CONC", "Concord"),
    ("DALY", "Daly City"),
    ("DBRK", "Downtown Berkeley"),
    ("DELN", "El Cerrito del Norte"),
    ("DUBL", "Dublin/Pleasanton"),
    ("FRMT", "Fremont"),
    ("FTVL", "Fruitvale (Oakland)"),
    ("GLEN", "Glen Park (SF)"),
    ("HAYW", "Hayward"),
    ("LAFY", "Lafayette"),
    ("LAKE", "Lake Merritt (Oakland)"),
    ("MCAR", "MacArthur (Oakland)"),
    ("MLBR", "Millbrae"),
    ("MLPT", "Milpitas"),
    ("MONT", "Montgomery St. (SF)"),
    ("NBRK", "North Berkeley"),
    ("NCON", "North Concord/Martinez"),
    ("OAKL", "Oakland Int'l Airport"),
    ("ORIN", "Orinda"),
    ("PCTR", "Pittsburg Center"),
    ("PITT", "Pittsburg/Bay Point"),
    ("POWL", "Powell St. (SF)"),
    ("PLZA", "El Cerrito Plaza"),
    ("RICH", "Richmond"),
    ("ROCK", "Rockridge (Oakland)"),
    ("SANL", "San Leandro"),
    ("SBRN", "San Bruno"),
    ("SFIA", "San Francisco Int'l Airport"),
    ("SHAY", "South Hayward"),
    ("SSAN", "South San Francisco"),
    ("UCTY", "Union City"),
    ("WARM", "Warm Springs / South Fremont"),
    ("WDUB", "West Dublin"),
    ("WOAK", "West Oakland"),
];

/// A station code with its display name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Station {
    pub code: StationCode,
    pub name: &'static str,
}

/// Iterate the catalog in display order.
pub fn stations() -> impl Iterator<Item = Station> {
    STATIONS.iter().filter_map(|&(code, name)| {
        StationCode::parse(code)
            .ok()
            .map(|code| Station { code, name })
    })
}

/// Display name for a station code, if the code is in the catalog.
pub fn station_name(code: &StationCode) -> Option<&'static str> {
    STATIONS
        .iter()
        .find(|(c, _)| *c == code.as_str())
        .map(|(_, name)| *name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn every_entry_is_a_valid_code() {
        assert_eq!(stations().count(), STATIONS.len());
    }

    #[test]
    fn codes_are_unique() {
        let codes: HashSet<_> = stations().map(|s| s.code).collect();
        assert_eq!(codes.len(), STATIONS.len());
    }

    #[test]
    fn curated_stations_come_first() {
        let first: Vec<_> = stations().take(5).map(|s| s.code.to_string()).collect();
        assert_eq!(first, ["PHIL", "EMBR", "CIVC", "16TH", "WCRK"]);
    }

    #[test]
    fn lookup_by_code() {
        let daly = StationCode::parse("DALY").unwrap();
        assert_eq!(station_name(&daly), Some("Daly City"));

        let unknown = StationCode::parse("ZZZZ").unwrap();
        assert_eq!(station_name(&unknown), None);
    }
}
